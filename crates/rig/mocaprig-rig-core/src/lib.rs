//! mocaprig-rig-core: the driver-binding engine
//!
//! Turns a static channel reference table plus the provider objects present in
//! the scene into installed rig-side bindings: procedural per-axis value
//! expressions or transform-copy constraints. Binding installation happens
//! once up front; the per-frame loop only ever writes provider transforms.
//!
//! Missing providers and bones are logged skips, never errors. Only a missing
//! armature at construction time is fatal.

pub mod engine;
pub mod error;
pub mod expression;
pub mod reference;
pub mod rigify;

pub use engine::{BindingEngine, InstalledBinding, MappingRelation};
pub use error::RigError;
pub use expression::{average_limb_length, location_offset, DriverExpression};
pub use reference::{BindingKind, FanOutTable, ReferenceTable};
pub use rigify::pose_references;
