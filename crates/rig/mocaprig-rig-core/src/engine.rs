//! Resolution and application of channel bindings.
//!
//! `resolve` pairs reference-table entries with the provider objects actually
//! present in the scene, expanding fan-out channels into one relation per
//! target. `apply` installs the resulting bindings, keeping an explicit
//! registry of what is already bound so repeated application is idempotent.

use std::collections::HashMap;

use mocaprig_api::{ConstraintInstall, DriverInstall, SceneGraph};

use crate::error::RigError;
use crate::reference::{BindingKind, FanOutTable, ReferenceTable};

/// Resolved pairing of a provider object with binding parameters. Fan-out
/// produces several relations sharing one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingRelation {
    /// Provider object name (equals the channel name).
    pub provider: String,
    pub kind: BindingKind,
}

/// Record of one binding created on the rig, keyed by target + property so a
/// second application is detected without tagging foreign objects.
#[derive(Clone, Debug, PartialEq)]
pub struct InstalledBinding {
    pub target: String,
    pub property: &'static str,
    pub source: String,
}

#[derive(Debug)]
pub struct BindingEngine {
    armature: String,
    table: ReferenceTable,
    fan_out: FanOutTable,
    installed: HashMap<(String, &'static str), InstalledBinding>,
}

impl BindingEngine {
    /// A missing armature is a fatal configuration problem; everything else
    /// degrades at resolve/apply time.
    pub fn new(
        scene: &dyn SceneGraph,
        armature: impl Into<String>,
        table: ReferenceTable,
        fan_out: FanOutTable,
    ) -> Result<Self, RigError> {
        let armature = armature.into();
        if !scene.has_armature(&armature) {
            return Err(RigError::MissingArmature(armature));
        }
        for (bone, channels) in table.duplicate_constraint_targets() {
            log::warn!(
                "constraint target '{bone}' mapped from multiple channels {channels:?}; candidate authoring defect"
            );
        }
        Ok(Self {
            armature,
            table,
            fan_out,
            installed: HashMap::new(),
        })
    }

    pub fn armature(&self) -> &str {
        &self.armature
    }

    pub fn reference_table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Bindings created so far, in no particular order.
    pub fn installed(&self) -> impl Iterator<Item = &InstalledBinding> {
        self.installed.values()
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Pair every table entry with an available provider. Channels without a
    /// provider are logged and skipped; fan-out channels expand to one
    /// relation per target with only the target slot overridden.
    pub fn resolve(&self, providers: &[String]) -> Vec<MappingRelation> {
        let mut relations = Vec::new();
        for (channel, kind) in self.table.iter() {
            if !providers.iter().any(|p| p == channel) {
                log::warn!("mapping failed for '{channel}': no matching provider object");
                continue;
            }
            match self.fan_out.get(channel) {
                Some(targets) => {
                    for target in targets {
                        relations.push(MappingRelation {
                            provider: channel.clone(),
                            kind: kind.with_target(target),
                        });
                    }
                }
                None => relations.push(MappingRelation {
                    provider: channel.clone(),
                    kind: kind.clone(),
                }),
            }
        }
        relations
    }

    /// Install bindings for the given relations. Returns the number created
    /// this call; already-assigned bindings are skipped unless `overwrite`.
    pub fn apply(
        &mut self,
        scene: &mut dyn SceneGraph,
        relations: &[MappingRelation],
        overwrite: bool,
    ) -> usize {
        let mut created = 0usize;
        for relation in relations {
            match &relation.kind {
                BindingKind::ValueExpression { target, expression } => {
                    let Some(target) = target.as_deref() else {
                        log::warn!(
                            "channel '{}' has no concrete driver target; skipped",
                            relation.provider
                        );
                        continue;
                    };
                    if !scene.has_object(target) {
                        log::warn!(
                            "driver target '{target}' for channel '{}' not in scene; skipped",
                            relation.provider
                        );
                        continue;
                    }
                    let property = expression.target_property();
                    let key = (target.to_string(), property.as_str());
                    if self.installed.contains_key(&key) && !overwrite {
                        log::debug!("driver on '{target}.{property}' already assigned; skipped");
                        continue;
                    }
                    scene.install_driver(DriverInstall {
                        target: target.to_string(),
                        property,
                        source: relation.provider.clone(),
                        data_paths: expression.data_paths().map(str::to_string),
                        expressions: expression.axis_expressions(),
                    });
                    self.installed.insert(
                        key,
                        InstalledBinding {
                            target: target.to_string(),
                            property: property.as_str(),
                            source: relation.provider.clone(),
                        },
                    );
                    created += 1;
                }
                BindingKind::TransformConstraint { bone, kind } => {
                    if scene.bone_head(&self.armature, bone).is_none() {
                        log::warn!(
                            "constraint bone '{bone}' for channel '{}' not in armature '{}'; skipped",
                            relation.provider,
                            self.armature
                        );
                        continue;
                    }
                    let key = (bone.clone(), kind.as_str());
                    if self.installed.contains_key(&key) && !overwrite {
                        log::debug!("constraint {} on '{bone}' already assigned; skipped", kind.as_str());
                        continue;
                    }
                    scene.install_constraint(ConstraintInstall {
                        armature: self.armature.clone(),
                        bone: bone.clone(),
                        source: relation.provider.clone(),
                        kind: *kind,
                    });
                    self.installed.insert(
                        key,
                        InstalledBinding {
                            target: bone.clone(),
                            property: kind.as_str(),
                            source: relation.provider.clone(),
                        },
                    );
                    created += 1;
                }
            }
        }
        created
    }

    /// Convenience: resolve against the providers and apply in one step.
    pub fn bind(
        &mut self,
        scene: &mut dyn SceneGraph,
        providers: &[String],
        overwrite: bool,
    ) -> usize {
        let relations = self.resolve(providers);
        self.apply(scene, &relations, overwrite)
    }
}
