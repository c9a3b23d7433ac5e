//! End-to-end demo against synthetic detection data: install the Rigify pose
//! bindings once, then drain a short capture through the scene bridge.
//!
//! Run with `RUST_LOG=debug cargo run --example pose_capture`.

use anyhow::Result;

use mocaprig_api::{RawFrame, Vec3};
use mocaprig_pipeline::{
    CaptureConfig, CaptureTarget, ConsumerKind, Detector, Pipeline, PipelineConfig, PipelineError,
};
use mocaprig_rig::BindingEngine;
use mocaprig_test_fixtures::rigify_scene;

/// Generates a few frames of slowly drifting pose landmarks.
struct SyntheticDetector {
    remaining: u64,
    opened: bool,
}

impl Detector for SyntheticDetector {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), PipelineError> {
        let (w, h) = config.resolution.dimensions();
        log::info!("synthetic capture open at {w}x{h}");
        self.opened = true;
        Ok(())
    }

    fn initialize_model(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, PipelineError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        let t = self.remaining as f32 * 0.02;
        let mut frame = RawFrame::new(self.remaining);
        frame.pose = (0..33)
            .map(|i| Vec3::new(i as f32 * 0.01 + t, 0.5, 0.5 + i as f32 * 0.005))
            .collect();
        Ok(Some(frame))
    }

    fn close(&mut self) {
        log::info!("synthetic capture closed");
        self.opened = false;
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut scene = rigify_scene("rig");

    // binding installation happens once, up front
    let mut engine = BindingEngine::rigify_pose(&scene, "rig")?;
    let providers = scene.object_names();
    let installed = engine.bind(&mut scene, &providers, false);
    log::info!("installed {installed} rig bindings");

    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Pose, ConsumerKind::ApplyToScene),
        Box::new(SyntheticDetector {
            remaining: 15,
            opened: false,
        }),
    );
    pipeline.init_detector(&CaptureConfig::default())?;
    pipeline.init_bridge();

    while pipeline.run_frame(&mut scene)? {}
    log::info!("processed {} frames", pipeline.frames_processed());

    pipeline.shutdown();
    Ok(())
}
