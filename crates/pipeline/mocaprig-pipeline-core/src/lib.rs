//! mocaprig-pipeline-core: per-frame dataflow orchestration
//!
//! Wires a detection backend, one or more processing stages and one or more
//! bridges behind a synchronous notification layer. A frame is fully drained
//! through detect -> process -> notify -> bridge-apply before the next pull;
//! all scene mutation happens through the single `&mut SceneGraph` threaded
//! down that chain.

pub mod bridge;
pub mod capture;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod processing;

pub use bridge::{Bridge, DebugBridge, RawEmitBridge, SceneBridge};
pub use capture::{CaptureConfig, CaptureSource, Detector, InputMode, Resolution};
pub use error::PipelineError;
pub use events::{FrameListener, FrameObserver, HolisticObserver, RawObserver, StageObserver};
pub use orchestrator::{CaptureTarget, ConsumerKind, Pipeline, PipelineConfig};
pub use processing::{FaceProcessor, HandProcessor, PoseProcessor, ProcessingStage};
