//! Value-expression templates.
//!
//! Two canonical templates exist, and their numeric behavior is a
//! compatibility contract with previously-authored rig presets:
//!
//! - `ScaleToLocation`: every axis reads the provider's Z scale unchanged,
//!   installed on the target's scale. Used for the shoulder/hip anchors, where
//!   detection writes the current limb length into the provider's scale.
//! - `LocationNormalized`: axis value =
//!   `offset[axis] + (limb_length / source_scale) * source_location[axis]`.
//!   `offset` is the displacement between a rig anchor bone and the provider's
//!   rest location; `limb_length` is the average length of a fixed set of
//!   bone segments. Both are computed once at table construction.

use serde::{Deserialize, Serialize};

use mocaprig_api::{SceneGraph, TargetProperty, Transform, Vec3};

/// Per-axis expression template for a value-expression binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DriverExpression {
    /// Copy the provider's Z scale into every axis of the target property.
    ScaleToLocation,
    /// Normalize the provider's location by limb length and shift by a rig
    /// offset.
    LocationNormalized { offset: Vec3, limb_length: f32 },
}

impl DriverExpression {
    /// Target property the driver is installed on. Scale-to-location lands on
    /// the target's scale: that scale carries the limb length the `(scale)`
    /// term of a normalized driver on the same object divides by, so the two
    /// templates can share one target.
    pub fn target_property(&self) -> TargetProperty {
        match self {
            DriverExpression::ScaleToLocation => TargetProperty::Scale,
            DriverExpression::LocationNormalized { .. } => TargetProperty::Location,
        }
    }

    /// Provider data path feeding each axis sub-expression.
    pub fn data_paths(&self) -> [&'static str; 3] {
        match self {
            DriverExpression::ScaleToLocation => ["scale.z", "scale.z", "scale.z"],
            DriverExpression::LocationNormalized { .. } => {
                ["location.x", "location.y", "location.z"]
            }
        }
    }

    /// Rendered per-axis sub-expression prefixes. The host completes each by
    /// appending the driver variable bound to the matching data path; an empty
    /// prefix is an identity copy.
    pub fn axis_expressions(&self) -> [String; 3] {
        match self {
            DriverExpression::ScaleToLocation => [String::new(), String::new(), String::new()],
            DriverExpression::LocationNormalized {
                offset,
                limb_length,
            } => [
                format!("{}+{}/(scale) * ", offset.x, limb_length),
                format!("{}+{}/(scale) * ", offset.y, limb_length),
                format!("{}+{}/(scale) * ", offset.z, limb_length),
            ],
        }
    }

    /// Evaluate the template for one axis against a provider transform.
    /// This is the exact arithmetic the rendered expressions perform.
    pub fn evaluate(&self, axis: usize, source: &Transform) -> f32 {
        match self {
            DriverExpression::ScaleToLocation => source.scale.z,
            DriverExpression::LocationNormalized {
                offset,
                limb_length,
            } => offset.axis(axis) + limb_length / source.scale.z * source.location.axis(axis),
        }
    }
}

/// Mean head-to-head distance across a list of bone segment pairs. Used as the
/// `limb_length` normalization factor; computed once at construction.
pub fn average_limb_length(
    scene: &dyn SceneGraph,
    armature: &str,
    segment_pairs: &[[&str; 2]],
) -> f32 {
    let mut total = 0.0f32;
    let mut counted = 0usize;
    for pair in segment_pairs {
        match (
            scene.bone_head(armature, pair[0]),
            scene.bone_head(armature, pair[1]),
        ) {
            (Some(a), Some(b)) => {
                total += a.distance(&b);
                counted += 1;
            }
            _ => {
                log::warn!("bone pair [{}, {}] missing on '{armature}'", pair[0], pair[1]);
            }
        }
    }
    if counted == 0 {
        return 0.0;
    }
    total / counted as f32
}

/// Displacement between a rig anchor bone's head and a provider object's rest
/// location (`anchor.head - provider.location`). Falls back to zero with a
/// logged warning when either side is missing.
pub fn location_offset(
    scene: &dyn SceneGraph,
    armature: &str,
    anchor_bone: &str,
    provider: &str,
) -> Vec3 {
    let head = scene.bone_head(armature, anchor_bone);
    let rest = scene.object_transform(provider).map(|t| t.location);
    match (head, rest) {
        (Some(head), Some(rest)) => head - rest,
        _ => {
            log::warn!("offset fallback to zero: bone '{anchor_bone}' or provider '{provider}' missing");
            Vec3::ZERO
        }
    }
}
