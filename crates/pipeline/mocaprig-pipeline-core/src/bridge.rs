//! Bridges: consumers of processed channel values.
//!
//! `SceneBridge` feeds the provider objects the driver-binding engine reads
//! from; the emit bridges exist for inspection without a scene.

use mocaprig_api::{SampleBatch, SceneGraph};

/// Consumes one stage's output for one frame.
pub trait Bridge {
    fn apply(&mut self, frame: u64, batch: &SampleBatch, scene: &mut dyn SceneGraph);
}

/// Writes channel values into the same-named provider objects. Channels
/// without a scene object are logged skips; partial samples only touch the
/// components they carry.
#[derive(Debug, Default)]
pub struct SceneBridge {
    applied: u64,
}

impl SceneBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total samples written since construction.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl Bridge for SceneBridge {
    fn apply(&mut self, _frame: u64, batch: &SampleBatch, scene: &mut dyn SceneGraph) {
        for sample in batch.iter() {
            let Some(mut transform) = scene.object_transform(&sample.channel) else {
                log::warn!("no provider object '{}' in scene; sample dropped", sample.channel);
                continue;
            };
            if let Some(location) = sample.location {
                transform.location = location;
            }
            if let Some(rotation) = sample.rotation {
                transform.rotation = rotation;
            }
            if let Some(scale) = sample.scale {
                transform.scale = scale;
            }
            scene.set_object_transform(&sample.channel, transform);
            self.applied += 1;
        }
    }
}

/// Emits every sample for display, one log line each.
#[derive(Debug, Default)]
pub struct RawEmitBridge;

impl Bridge for RawEmitBridge {
    fn apply(&mut self, frame: u64, batch: &SampleBatch, _scene: &mut dyn SceneGraph) {
        for sample in batch.iter() {
            log::info!("frame {frame}: {sample}");
        }
    }
}

/// Verbose diagnostics consumer; counts emissions so tests can observe flow.
#[derive(Debug, Default)]
pub struct DebugBridge {
    emitted: usize,
}

impl DebugBridge {
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl Bridge for DebugBridge {
    fn apply(&mut self, frame: u64, batch: &SampleBatch, _scene: &mut dyn SceneGraph) {
        log::debug!("frame {frame}: {} channel samples", batch.len());
        for sample in batch.iter() {
            log::debug!("  {sample}");
        }
        self.emitted += batch.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocaprig_api::{ChannelSample, Transform, Vec3};
    use std::collections::HashMap;

    // minimal scene: objects only, installs unused
    #[derive(Default)]
    struct ObjectScene {
        objects: HashMap<String, Transform>,
    }

    impl SceneGraph for ObjectScene {
        fn has_object(&self, name: &str) -> bool {
            self.objects.contains_key(name)
        }
        fn object_transform(&self, name: &str) -> Option<Transform> {
            self.objects.get(name).copied()
        }
        fn set_object_transform(&mut self, name: &str, transform: Transform) -> bool {
            self.objects.insert(name.to_string(), transform).is_some()
        }
        fn has_armature(&self, _name: &str) -> bool {
            false
        }
        fn bone_head(&self, _armature: &str, _bone: &str) -> Option<Vec3> {
            None
        }
        fn install_driver(&mut self, _install: mocaprig_api::DriverInstall) {}
        fn install_constraint(&mut self, _install: mocaprig_api::ConstraintInstall) {}
    }

    #[test]
    fn scene_bridge_merges_partial_samples() {
        let mut scene = ObjectScene::default();
        scene.objects.insert(
            "cgt_left_shoulder".into(),
            Transform {
                rotation: Vec3::new(0.1, 0.2, 0.3),
                ..Default::default()
            },
        );

        let mut batch = SampleBatch::new();
        batch.push(ChannelSample::location(
            "cgt_left_shoulder",
            Vec3::new(1.0, 2.0, 3.0),
        ));

        let mut bridge = SceneBridge::new();
        bridge.apply(0, &batch, &mut scene);

        let t = scene.objects["cgt_left_shoulder"];
        assert_eq!(t.location, Vec3::new(1.0, 2.0, 3.0));
        // untouched components survive
        assert_eq!(t.rotation, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(bridge.applied(), 1);
    }

    #[test]
    fn scene_bridge_skips_unknown_channels() {
        let mut scene = ObjectScene::default();
        let mut batch = SampleBatch::new();
        batch.push(ChannelSample::location("cgt_ghost", Vec3::ZERO));

        let mut bridge = SceneBridge::new();
        bridge.apply(0, &batch, &mut scene);
        assert_eq!(bridge.applied(), 0);
        assert!(scene.objects.is_empty());
    }
}
