//! Top-level pipeline composition.
//!
//! A `Pipeline` is built from a `(CaptureTarget, ConsumerKind)` pair; the
//! stage/bridge selection is resolved once at wiring time by plain enum
//! dispatch, and the per-frame loop just pulls and notifies. There is no
//! process-wide registry: each pipeline instance owns its detector, listener
//! and wiring.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use mocaprig_api::SceneGraph;

use crate::bridge::{Bridge, DebugBridge, RawEmitBridge, SceneBridge};
use crate::capture::{CaptureConfig, Detector, InputMode};
use crate::error::PipelineError;
use crate::events::{FrameListener, FrameObserver, HolisticObserver, RawObserver, StageObserver};
use crate::processing::{FaceProcessor, HandProcessor, PoseProcessor, ProcessingStage};

/// What the detection backend tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureTarget {
    Hand,
    Pose,
    Face,
    Holistic,
    Freemocap,
}

impl CaptureTarget {
    /// Composite targets wire the three sub-stages behind one observer.
    pub fn is_composite(&self) -> bool {
        matches!(self, CaptureTarget::Holistic | CaptureTarget::Freemocap)
    }
}

impl FromStr for CaptureTarget {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HAND" => Ok(CaptureTarget::Hand),
            "POSE" => Ok(CaptureTarget::Pose),
            "FACE" => Ok(CaptureTarget::Face),
            "HOLISTIC" => Ok(CaptureTarget::Holistic),
            "FREEMOCAP" => Ok(CaptureTarget::Freemocap),
            other => Err(PipelineError::Configuration(other.to_string())),
        }
    }
}

/// Where processed values go.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerKind {
    /// Write into the scene's provider objects.
    ApplyToScene,
    /// Emit unprocessed landmark data for display.
    RawEmit,
    /// Emit verbose diagnostics.
    DebugEmit,
}

impl FromStr for ConsumerKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // composite suffixes are packaging, not a different consumer
        match s.trim_end_matches("_HOLISTIC").trim_end_matches("_FREEMOCAP") {
            "APPLY_TO_SCENE" => Ok(ConsumerKind::ApplyToScene),
            "RAW_EMIT" => Ok(ConsumerKind::RawEmit),
            "DEBUG_EMIT" => Ok(ConsumerKind::DebugEmit),
            _ => Err(PipelineError::Configuration(s.to_string())),
        }
    }
}

/// Immutable pipeline selection, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub target: CaptureTarget,
    pub consumer: ConsumerKind,
}

impl PipelineConfig {
    pub fn new(target: CaptureTarget, consumer: ConsumerKind) -> Self {
        Self { target, consumer }
    }

    /// Parse from host-facing string keys; unknown keys fail fast.
    pub fn from_keys(target: &str, consumer: &str) -> Result<Self, PipelineError> {
        Ok(Self {
            target: target.parse()?,
            consumer: consumer.parse()?,
        })
    }
}

fn bridge_for(consumer: ConsumerKind) -> Box<dyn Bridge> {
    match consumer {
        ConsumerKind::ApplyToScene => Box::new(SceneBridge::new()),
        ConsumerKind::RawEmit => Box::new(RawEmitBridge),
        ConsumerKind::DebugEmit => Box::new(DebugBridge::default()),
    }
}

fn stage_for(target: CaptureTarget) -> Box<dyn ProcessingStage> {
    match target {
        CaptureTarget::Hand => Box::new(HandProcessor),
        CaptureTarget::Face => Box::new(FaceProcessor),
        // composite targets never reach here; pose is the simple default
        _ => Box::new(PoseProcessor),
    }
}

/// One capture pipeline: detector, stages, bridges and the listener between
/// them. Single logical thread of control; the scene is only touched through
/// the `&mut` handed to `run_frame`.
pub struct Pipeline {
    config: PipelineConfig,
    detector: Box<dyn Detector>,
    listener: FrameListener,
    frames_processed: u64,
    wired: bool,
    released: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, detector: Box<dyn Detector>) -> Self {
        log::info!(
            "setting up pipeline ({:?}, {:?})",
            config.target,
            config.consumer
        );
        Self {
            config,
            detector,
            listener: FrameListener::new(),
            frames_processed: 0,
            wired: false,
            released: false,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn observer_count(&self) -> usize {
        self.listener.len()
    }

    /// Configure and start the detection backend. Session replay skips the
    /// capture-dimension setup entirely and only initializes the model; for
    /// stream/recorded input a capture source that fails to open aborts setup
    /// before any stage runs.
    pub fn init_detector(&mut self, config: &CaptureConfig) -> Result<(), PipelineError> {
        if config.input_mode == InputMode::SessionReplay {
            return self.detector.initialize_model();
        }
        let (width, height) = config.resolution.dimensions();
        log::debug!("opening capture source at {width}x{height}");
        self.detector.open(config)?;
        self.detector.initialize_model()
    }

    /// Wire stages, bridges and the listener for the configured selection.
    /// Idempotent: a second call is a no-op.
    pub fn init_bridge(&mut self) {
        if self.wired {
            return;
        }
        let observer: Box<dyn FrameObserver> = match (self.config.target, self.config.consumer) {
            (_, ConsumerKind::RawEmit) => Box::new(RawObserver::new(Box::new(RawEmitBridge))),
            (target, consumer) if target.is_composite() => Box::new(HolisticObserver::new(
                StageObserver::new(Box::new(HandProcessor), bridge_for(consumer)),
                StageObserver::new(Box::new(FaceProcessor), bridge_for(consumer)),
                StageObserver::new(Box::new(PoseProcessor), bridge_for(consumer)),
            )),
            (target, consumer) => {
                Box::new(StageObserver::new(stage_for(target), bridge_for(consumer)))
            }
        };
        self.listener.attach(observer);
        self.wired = true;
    }

    /// Pull one frame and drain it through the whole chain. Returns
    /// `Ok(false)` when the stream ends.
    pub fn run_frame(&mut self, scene: &mut dyn SceneGraph) -> Result<bool, PipelineError> {
        match self.detector.next_frame()? {
            Some(frame) => {
                if frame.is_empty() {
                    log::debug!("frame {}: no detections", frame.frame);
                }
                self.listener.notify(&frame, scene);
                self.frames_processed += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Release the detection backend. Safe to call more than once; `Drop`
    /// falls back to this as well.
    pub fn shutdown(&mut self) {
        if !self.released {
            self.detector.close();
            self.released = true;
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
