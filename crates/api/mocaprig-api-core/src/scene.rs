//! The seam to the host 3D scene.
//!
//! The workspace never talks to a concrete scene API directly. Hosts expose
//! named objects with location/rotation/scale, an armature with named pose
//! bones, procedural per-axis value expressions ("drivers") and transform-copy
//! constraints. `SceneGraph` captures exactly that surface; the test fixtures
//! provide an in-memory implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::Vec3;

/// Object transform as the host exposes it. Rotation is Euler, radians.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

/// Transform property a binding reads from or writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetProperty {
    Location,
    Rotation,
    Scale,
}

impl TargetProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetProperty::Location => "location",
            TargetProperty::Rotation => "rotation",
            TargetProperty::Scale => "scale",
        }
    }
}

impl fmt::Display for TargetProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transform-copy constraint kinds the rig side uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    CopyLocation,
    CopyRotation,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::CopyLocation => "COPY_LOCATION",
            ConstraintKind::CopyRotation => "COPY_ROTATION",
        }
    }
}

/// Fully rendered value-expression driver, ready for the host to install on
/// `target`'s `property`. One sub-expression per spatial axis; each expression
/// string is a prefix the host completes with the driver variable bound to the
/// matching `data_paths` entry on `source` (empty prefix = identity copy).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverInstall {
    pub target: String,
    pub property: TargetProperty,
    pub source: String,
    pub data_paths: [String; 3],
    pub expressions: [String; 3],
}

/// Transform-copy constraint, ready for the host to attach to a pose bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintInstall {
    pub armature: String,
    pub bone: String,
    pub source: String,
    pub kind: ConstraintKind,
}

/// Host scene surface. All scene mutation happens through the single `&mut`
/// passed down the frame chain; the trait is deliberately not `Sync`-bound.
pub trait SceneGraph {
    fn has_object(&self, name: &str) -> bool;

    fn object_transform(&self, name: &str) -> Option<Transform>;

    /// Write an object transform. Returns false when the object is absent.
    fn set_object_transform(&mut self, name: &str, transform: Transform) -> bool;

    fn has_armature(&self, name: &str) -> bool;

    /// Rest-pose head location of a bone, or `None` when armature or bone is
    /// missing.
    fn bone_head(&self, armature: &str, bone: &str) -> Option<Vec3>;

    /// Install (or replace) a value-expression driver on
    /// `(install.target, install.property)`.
    fn install_driver(&mut self, install: DriverInstall);

    /// Attach a transform-copy constraint to `install.bone`.
    fn install_constraint(&mut self, install: ConstraintInstall);
}
