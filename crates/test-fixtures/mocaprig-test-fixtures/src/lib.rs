//! In-memory scene mock and frame builders shared by the workspace tests.
//!
//! `MockScene` implements the `SceneGraph` seam over plain hash maps and
//! records every driver/constraint installation so tests can assert on the
//! exact rig-side effects.

use std::collections::HashMap;

use mocaprig_api::{
    ConstraintInstall, DriverInstall, RawFrame, SceneGraph, Transform, Vec3,
};

#[derive(Default)]
pub struct MockScene {
    objects: HashMap<String, Transform>,
    armatures: HashMap<String, HashMap<String, Vec3>>,
    pub drivers: Vec<DriverInstall>,
    pub constraints: Vec<ConstraintInstall>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, name: impl Into<String>, transform: Transform) -> &mut Self {
        self.objects.insert(name.into(), transform);
        self
    }

    pub fn add_object_at(&mut self, name: impl Into<String>, location: Vec3) -> &mut Self {
        self.add_object(
            name,
            Transform {
                location,
                ..Default::default()
            },
        )
    }

    pub fn add_armature(
        &mut self,
        name: impl Into<String>,
        bones: &[(&str, Vec3)],
    ) -> &mut Self {
        let bones = bones
            .iter()
            .map(|(bone, head)| (bone.to_string(), *head))
            .collect();
        self.armatures.insert(name.into(), bones);
        self
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    /// Installed drivers on one target, useful for idempotence assertions.
    pub fn drivers_for(&self, target: &str) -> Vec<&DriverInstall> {
        self.drivers.iter().filter(|d| d.target == target).collect()
    }
}

impl SceneGraph for MockScene {
    fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    fn object_transform(&self, name: &str) -> Option<Transform> {
        self.objects.get(name).copied()
    }

    fn set_object_transform(&mut self, name: &str, transform: Transform) -> bool {
        match self.objects.get_mut(name) {
            Some(slot) => {
                *slot = transform;
                true
            }
            None => false,
        }
    }

    fn has_armature(&self, name: &str) -> bool {
        self.armatures.contains_key(name)
    }

    fn bone_head(&self, armature: &str, bone: &str) -> Option<Vec3> {
        self.armatures.get(armature)?.get(bone).copied()
    }

    fn install_driver(&mut self, install: DriverInstall) {
        // upsert on (target, property), like a host's driver_add
        if let Some(existing) = self
            .drivers
            .iter_mut()
            .find(|d| d.target == install.target && d.property == install.property)
        {
            *existing = install;
        } else {
            self.drivers.push(install);
        }
    }

    fn install_constraint(&mut self, install: ConstraintInstall) {
        if let Some(existing) = self
            .constraints
            .iter_mut()
            .find(|c| c.bone == install.bone && c.kind == install.kind)
        {
            *existing = install;
        } else {
            self.constraints.push(install);
        }
    }
}

/// Bones a Rigify pose setup touches, heads spread so offsets and limb
/// lengths come out non-zero.
pub const RIGIFY_BONES: [(&str, Vec3); 16] = [
    ("upper_arm_fk.L", Vec3 { x: -0.2, y: 0.0, z: 1.4 }),
    ("forearm_fk.L", Vec3 { x: -0.2, y: 0.0, z: 1.1 }),
    ("hand_fk.L", Vec3 { x: -0.2, y: 0.0, z: 0.85 }),
    ("upper_arm_fk.R", Vec3 { x: 0.2, y: 0.0, z: 1.4 }),
    ("forearm_fk.R", Vec3 { x: 0.2, y: 0.0, z: 1.1 }),
    ("hand_fk.R", Vec3 { x: 0.2, y: 0.0, z: 0.85 }),
    ("upper_arm_ik.L", Vec3 { x: -0.2, y: 0.0, z: 1.4 }),
    ("upper_arm_ik.R", Vec3 { x: 0.2, y: 0.0, z: 1.4 }),
    ("hips", Vec3 { x: 0.0, y: 0.0, z: 0.9 }),
    ("chest", Vec3 { x: 0.0, y: 0.0, z: 1.2 }),
    ("hand_ik.L", Vec3 { x: 0.3, y: 0.0, z: 0.85 }),
    ("hand_ik.R", Vec3 { x: -0.3, y: 0.0, z: 0.85 }),
    ("forearm_tweak.L", Vec3 { x: 0.25, y: 0.0, z: 1.1 }),
    ("forearm_tweak.R", Vec3 { x: -0.25, y: 0.0, z: 1.1 }),
    ("foot_ik.L", Vec3 { x: 0.1, y: 0.0, z: 0.1 }),
    ("foot_ik.R", Vec3 { x: -0.1, y: 0.0, z: 0.1 }),
];

/// Provider object names the detection side creates for a pose capture.
pub const POSE_PROVIDERS: [&str; 18] = [
    "cgt_left_shoulder",
    "cgt_right_shoulder",
    "cgt_left_wrist",
    "cgt_right_wrist",
    "cgt_left_elbow",
    "cgt_right_elbow",
    "cgt_left_hip",
    "cgt_right_hip",
    "cgt_left_knee",
    "cgt_right_knee",
    "cgt_left_ankle",
    "cgt_right_ankle",
    "hip_center",
    "shoulder_center",
    "cgt_left_hand_ik_driver",
    "cgt_right_hand_ik_driver",
    "cgt_left_forearm_ik_driver",
    "cgt_right_forearm_ik_driver",
];

/// Scene with the Rigify armature, all pose providers and all fan-out driver
/// targets present. Note shin/foot IK driver objects are included as well so
/// every table entry can bind.
pub fn rigify_scene(armature: &str) -> MockScene {
    let mut scene = MockScene::new();
    scene.add_armature(armature, &{
        let mut bones = RIGIFY_BONES.to_vec();
        bones.push(("shin_tweak.L", Vec3::new(0.1, 0.0, 0.45)));
        bones.push(("shin_tweak.R", Vec3::new(-0.1, 0.0, 0.45)));
        bones
    });
    for (i, provider) in POSE_PROVIDERS.iter().enumerate() {
        scene.add_object_at(*provider, Vec3::new(i as f32 * 0.1, 0.0, 1.0));
    }
    for driver in [
        "cgt_left_shin_ik_driver",
        "cgt_right_shin_ik_driver",
        "cgt_left_foot_ik_driver",
        "cgt_right_foot_ik_driver",
    ] {
        scene.add_object_at(driver, Vec3::ZERO);
    }
    scene
}

/// Synthetic pose frame with 33 landmarks laid out on a grid.
pub fn pose_frame(frame: u64) -> RawFrame {
    let mut raw = RawFrame::new(frame);
    raw.pose = (0..33)
        .map(|i| Vec3::new(i as f32 * 0.01, 0.5, 0.5 + i as f32 * 0.005))
        .collect();
    raw
}

/// Synthetic holistic frame: two hands, a face mesh stub and a full pose.
pub fn holistic_frame(frame: u64) -> RawFrame {
    let mut raw = pose_frame(frame);
    raw.hands = vec![
        (0..21).map(|i| Vec3::new(0.3, i as f32 * 0.01, 0.5)).collect(),
        (0..21).map(|i| Vec3::new(0.7, i as f32 * 0.01, 0.5)).collect(),
    ];
    raw.face = (0..468).map(|i| Vec3::new(0.5, 0.3, i as f32 * 0.001)).collect();
    raw
}
