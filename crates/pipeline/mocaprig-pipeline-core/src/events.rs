//! Notification layer between frame production and consumption.
//!
//! A single publisher (the detector, once per frame) notifies observers
//! synchronously in attach order. There is no buffering: a frame is fully
//! drained through every observer before the next one is pulled. Composite
//! capture differs only in packaging: one observer that sequences the three
//! sub-stage/bridge pairs in a fixed order.

use mocaprig_api::{ChannelSample, RawFrame, SampleBatch, SceneGraph};

use crate::bridge::Bridge;
use crate::processing::ProcessingStage;

/// Receives each pulled frame with scene access.
pub trait FrameObserver {
    fn notify(&mut self, frame: &RawFrame, scene: &mut dyn SceneGraph);
}

/// Ordered, synchronous observer registry.
#[derive(Default)]
pub struct FrameListener {
    observers: Vec<Box<dyn FrameObserver>>,
}

impl FrameListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: Box<dyn FrameObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Push one frame through every observer, in attach order.
    pub fn notify(&mut self, frame: &RawFrame, scene: &mut dyn SceneGraph) {
        for observer in &mut self.observers {
            observer.notify(frame, scene);
        }
    }
}

/// One processing stage feeding one bridge.
pub struct StageObserver {
    stage: Box<dyn ProcessingStage>,
    bridge: Box<dyn Bridge>,
}

impl StageObserver {
    pub fn new(stage: Box<dyn ProcessingStage>, bridge: Box<dyn Bridge>) -> Self {
        Self { stage, bridge }
    }
}

impl FrameObserver for StageObserver {
    fn notify(&mut self, frame: &RawFrame, scene: &mut dyn SceneGraph) {
        let batch = self.stage.process(frame);
        self.bridge.apply(frame.frame, &batch, scene);
    }
}

/// Composite observer for holistic capture: hand, face and pose stages run in
/// that fixed order, each output forwarded to its own bridge before the next
/// stage runs.
pub struct HolisticObserver {
    hand: StageObserver,
    face: StageObserver,
    pose: StageObserver,
}

impl HolisticObserver {
    pub fn new(hand: StageObserver, face: StageObserver, pose: StageObserver) -> Self {
        Self { hand, face, pose }
    }
}

impl FrameObserver for HolisticObserver {
    fn notify(&mut self, frame: &RawFrame, scene: &mut dyn SceneGraph) {
        self.hand.notify(frame, scene);
        self.face.notify(frame, scene);
        self.pose.notify(frame, scene);
    }
}

/// Processor-less packaging for RAW emission: landmarks become location-only
/// samples with positional channel names.
pub struct RawObserver {
    bridge: Box<dyn Bridge>,
}

impl RawObserver {
    pub fn new(bridge: Box<dyn Bridge>) -> Self {
        Self { bridge }
    }
}

impl FrameObserver for RawObserver {
    fn notify(&mut self, frame: &RawFrame, scene: &mut dyn SceneGraph) {
        let mut batch = SampleBatch::new();
        for (slot, hand) in frame.hands.iter().enumerate() {
            for (i, lm) in hand.iter().enumerate() {
                batch.push(ChannelSample::location(format!("hand{slot}_{i}"), *lm));
            }
        }
        for (i, lm) in frame.face.iter().enumerate() {
            batch.push(ChannelSample::location(format!("face_{i}"), *lm));
        }
        for (i, lm) in frame.pose.iter().enumerate() {
            batch.push(ChannelSample::location(format!("pose_{i}"), *lm));
        }
        self.bridge.apply(frame.frame, &batch, scene);
    }
}
