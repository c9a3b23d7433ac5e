//! Canonical reference and fan-out tables for a Rigify humanoid rig.
//!
//! Channel names carry the `cgt_` prefix of the provider objects the
//! detection side creates; bone names follow Rigify conventions. Arm and leg
//! mappings are mirrored (a left-side channel drives the right-side bone)
//! because detection coordinates are camera-facing.

use mocaprig_api::{ConstraintKind, SceneGraph, Vec3};

use crate::error::RigError;
use crate::expression::{average_limb_length, location_offset, DriverExpression};
use crate::reference::{BindingKind, FanOutTable, ReferenceTable};
use crate::BindingEngine;

/// Bone segment pairs averaged into the arm normalization length.
pub const ARM_BONE_PAIRS: [[&str; 2]; 4] = [
    ["upper_arm_fk.L", "forearm_fk.L"],
    ["forearm_fk.L", "hand_fk.L"],
    ["upper_arm_fk.R", "forearm_fk.R"],
    ["forearm_fk.R", "hand_fk.R"],
];

fn value_expression(target: Option<&str>, expression: DriverExpression) -> BindingKind {
    BindingKind::ValueExpression {
        target: target.map(str::to_string),
        expression,
    }
}

fn constraint(bone: &str, kind: ConstraintKind) -> BindingKind {
    BindingKind::TransformConstraint {
        bone: bone.to_string(),
        kind,
    }
}

/// Build the pose reference and fan-out tables, precomputing the arm offsets
/// and the average limb length from the scene. The offsets pair the IK anchor
/// bone of one side with the shoulder provider of the other (mirrored rig).
pub fn pose_references(scene: &dyn SceneGraph, armature: &str) -> (ReferenceTable, FanOutTable) {
    let avg_arm_length = average_limb_length(scene, armature, &ARM_BONE_PAIRS);
    let left_arm_offset = location_offset(scene, armature, "upper_arm_ik.L", "cgt_right_shoulder");
    let right_arm_offset = location_offset(scene, armature, "upper_arm_ik.R", "cgt_left_shoulder");

    let normalized = |offset| DriverExpression::LocationNormalized {
        offset,
        limb_length: avg_arm_length,
    };

    let mut fan_out = FanOutTable::new();
    fan_out.insert(
        "cgt_left_shoulder",
        vec![
            "cgt_left_hand_ik_driver".into(),
            "cgt_left_forearm_ik_driver".into(),
        ],
    );
    fan_out.insert(
        "cgt_right_shoulder",
        vec![
            "cgt_right_hand_ik_driver".into(),
            "cgt_right_forearm_ik_driver".into(),
        ],
    );
    fan_out.insert(
        "cgt_left_hip",
        vec![
            "cgt_left_shin_ik_driver".into(),
            "cgt_left_foot_ik_driver".into(),
        ],
    );
    fan_out.insert(
        "cgt_right_hip",
        vec![
            "cgt_right_shin_ik_driver".into(),
            "cgt_right_foot_ik_driver".into(),
        ],
    );

    let mut table = ReferenceTable::new();

    // arm drivers
    table.insert(
        "cgt_left_shoulder",
        value_expression(None, DriverExpression::ScaleToLocation),
    );
    table.insert(
        "cgt_left_wrist",
        value_expression(Some("cgt_left_hand_ik_driver"), normalized(left_arm_offset)),
    );
    table.insert(
        "cgt_left_elbow",
        value_expression(
            Some("cgt_left_forearm_ik_driver"),
            normalized(left_arm_offset),
        ),
    );
    table.insert(
        "cgt_right_shoulder",
        value_expression(None, DriverExpression::ScaleToLocation),
    );
    table.insert(
        "cgt_right_wrist",
        value_expression(
            Some("cgt_right_hand_ik_driver"),
            normalized(right_arm_offset),
        ),
    );
    table.insert(
        "cgt_right_elbow",
        value_expression(
            Some("cgt_right_forearm_ik_driver"),
            normalized(right_arm_offset),
        ),
    );

    // leg drivers
    table.insert(
        "cgt_left_hip",
        value_expression(None, DriverExpression::ScaleToLocation),
    );
    table.insert(
        "cgt_left_knee",
        value_expression(
            Some("cgt_left_shin_ik_driver"),
            normalized(Vec3::ZERO),
        ),
    );
    table.insert(
        "cgt_left_ankle",
        value_expression(
            Some("cgt_left_foot_ik_driver"),
            normalized(Vec3::ZERO),
        ),
    );
    table.insert(
        "cgt_right_hip",
        value_expression(None, DriverExpression::ScaleToLocation),
    );
    table.insert(
        "cgt_right_knee",
        value_expression(
            Some("cgt_right_shin_ik_driver"),
            normalized(Vec3::ZERO),
        ),
    );
    table.insert(
        "cgt_right_ankle",
        value_expression(
            Some("cgt_right_foot_ik_driver"),
            normalized(Vec3::ZERO),
        ),
    );

    // torso rotation constraints
    table.insert("hip_center", constraint("hips", ConstraintKind::CopyRotation));
    table.insert(
        "shoulder_center",
        constraint("chest", ConstraintKind::CopyRotation),
    );

    // arm constraints (mirrored)
    table.insert(
        "cgt_left_hand_ik_driver",
        constraint("hand_ik.R", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_right_hand_ik_driver",
        constraint("hand_ik.L", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_left_forearm_ik_driver",
        constraint("forearm_tweak.R", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_right_forearm_ik_driver",
        constraint("forearm_tweak.L", ConstraintKind::CopyLocation),
    );

    // leg constraints (mirrored). Earlier presets bound both foot drivers to
    // foot_ik.L; left and right stay independently configurable here.
    table.insert(
        "cgt_right_foot_ik_driver",
        constraint("foot_ik.L", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_left_foot_ik_driver",
        constraint("foot_ik.R", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_left_shin_ik_driver",
        constraint("shin_tweak.L", ConstraintKind::CopyLocation),
    );
    table.insert(
        "cgt_right_shin_ik_driver",
        constraint("shin_tweak.R", ConstraintKind::CopyLocation),
    );

    (table, fan_out)
}

impl BindingEngine {
    /// Engine preloaded with the Rigify pose tables.
    pub fn rigify_pose(scene: &dyn SceneGraph, armature: &str) -> Result<Self, RigError> {
        let (table, fan_out) = pose_references(scene, armature);
        BindingEngine::new(scene, armature, table, fan_out)
    }
}
