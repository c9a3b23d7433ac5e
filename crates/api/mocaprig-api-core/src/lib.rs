//! mocaprig-api-core: shared contracts for the mocap-to-rig pipeline (host-agnostic)
//!
//! This crate defines the data that flows between the detection side and the
//! rig side, plus the `SceneGraph` trait that abstracts the host 3D scene.
//! Concrete hosts (or the test mock) implement `SceneGraph`; everything else
//! in the workspace is written against these types only.

pub mod frame;
pub mod math;
pub mod sample;
pub mod scene;

pub use frame::RawFrame;
pub use math::Vec3;
pub use sample::{ChannelSample, SampleBatch};
pub use scene::{
    ConstraintInstall, ConstraintKind, DriverInstall, SceneGraph, TargetProperty, Transform,
};
