//! Channel reference table and fan-out table.
//!
//! The reference table is an external, versioned contract: channel names must
//! exactly match the provider object names the host scene exposes. A renamed
//! provider degrades to a logged skip at resolve time rather than an error,
//! which is a known compatibility risk of the format.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use mocaprig_api::ConstraintKind;

use crate::expression::DriverExpression;

/// How a channel binds onto the rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BindingKind {
    /// Multi-axis value expression on a scene object. `target` may be `None`
    /// for entries that are always fanned out (the fan-out override fills the
    /// concrete target in).
    ValueExpression {
        target: Option<String>,
        expression: DriverExpression,
    },
    /// Transform-copy constraint on a pose bone.
    TransformConstraint {
        bone: String,
        kind: ConstraintKind,
    },
}

impl BindingKind {
    /// Replace the concrete target slot, used when expanding fan-out entries.
    /// Base parameters are otherwise preserved.
    pub fn with_target(&self, target: &str) -> BindingKind {
        match self {
            BindingKind::ValueExpression { expression, .. } => BindingKind::ValueExpression {
                target: Some(target.to_string()),
                expression: expression.clone(),
            },
            BindingKind::TransformConstraint { kind, .. } => BindingKind::TransformConstraint {
                bone: target.to_string(),
                kind: *kind,
            },
        }
    }
}

/// Ordered channel -> binding map. Iteration order is resolve order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReferenceTable {
    entries: IndexMap<String, BindingKind>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel: impl Into<String>, kind: BindingKind) {
        self.entries.insert(channel.into(), kind);
    }

    pub fn get(&self, channel: &str) -> Option<&BindingKind> {
        self.entries.get(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindingKind)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Constraint target bones referenced by more than one channel. Authoring
    /// defect candidates: a shared constraint target means two channels fight
    /// over one bone.
    pub fn duplicate_constraint_targets(&self) -> Vec<(String, Vec<String>)> {
        let mut by_bone: IndexMap<&str, Vec<String>> = IndexMap::new();
        for (channel, kind) in &self.entries {
            if let BindingKind::TransformConstraint { bone, .. } = kind {
                by_bone.entry(bone.as_str()).or_default().push(channel.clone());
            }
        }
        by_bone
            .into_iter()
            .filter(|(_, channels)| channels.len() > 1)
            .map(|(bone, channels)| (bone.to_string(), channels))
            .collect()
    }
}

/// Ordered channel -> fan-out target list. Order determines relation order,
/// nothing more.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FanOutTable {
    targets: IndexMap<String, Vec<String>>,
}

impl FanOutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel: impl Into<String>, targets: Vec<String>) {
        self.targets.insert(channel.into(), targets);
    }

    pub fn get(&self, channel: &str) -> Option<&[String]> {
        self.targets.get(channel).map(|t| t.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_target_preserves_expression() {
        let base = BindingKind::ValueExpression {
            target: None,
            expression: DriverExpression::ScaleToLocation,
        };
        let overridden = base.with_target("cgt_left_hand_ik_driver");
        match overridden {
            BindingKind::ValueExpression { target, expression } => {
                assert_eq!(target.as_deref(), Some("cgt_left_hand_ik_driver"));
                assert_eq!(expression, DriverExpression::ScaleToLocation);
            }
            _ => panic!("kind changed during override"),
        }
    }

    #[test]
    fn duplicate_constraint_targets_are_reported() {
        let mut table = ReferenceTable::new();
        table.insert(
            "cgt_right_foot_ik_driver",
            BindingKind::TransformConstraint {
                bone: "foot_ik.L".into(),
                kind: ConstraintKind::CopyLocation,
            },
        );
        table.insert(
            "cgt_left_foot_ik_driver",
            BindingKind::TransformConstraint {
                bone: "foot_ik.L".into(),
                kind: ConstraintKind::CopyLocation,
            },
        );
        let dupes = table.duplicate_constraint_targets();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].0, "foot_ik.L");
        assert_eq!(dupes[0].1.len(), 2);
    }
}
