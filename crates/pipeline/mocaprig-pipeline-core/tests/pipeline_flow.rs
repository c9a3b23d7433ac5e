use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use mocaprig_api::{RawFrame, SampleBatch, SceneGraph};
use mocaprig_pipeline::{
    Bridge, CaptureConfig, CaptureSource, CaptureTarget, ConsumerKind, Detector, FaceProcessor,
    FrameListener, HandProcessor, HolisticObserver, InputMode, Pipeline, PipelineConfig,
    PipelineError, PoseProcessor, StageObserver,
};
use mocaprig_test_fixtures::{holistic_frame, rigify_scene, MockScene};

/// Scripted detector: hands over queued frames, records lifecycle calls.
#[derive(Default)]
struct MockDetector {
    frames: VecDeque<RawFrame>,
    fail_open: bool,
    state: Rc<RefCell<DetectorState>>,
}

#[derive(Default)]
struct DetectorState {
    opened: bool,
    model_initialized: bool,
    closed: u32,
    frames_served: u32,
}

impl MockDetector {
    fn with_frames(frames: Vec<RawFrame>) -> (Self, Rc<RefCell<DetectorState>>) {
        let state = Rc::new(RefCell::new(DetectorState::default()));
        (
            Self {
                frames: frames.into(),
                fail_open: false,
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl Detector for MockDetector {
    fn open(&mut self, _config: &CaptureConfig) -> Result<(), PipelineError> {
        if self.fail_open {
            return Err(PipelineError::CaptureOpen(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such capture device",
            )));
        }
        self.state.borrow_mut().opened = true;
        Ok(())
    }

    fn initialize_model(&mut self) -> Result<(), PipelineError> {
        self.state.borrow_mut().model_initialized = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, PipelineError> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.state.borrow_mut().frames_served += 1;
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed += 1;
    }
}

/// Bridge that records which stage outputs reached it, in arrival order.
struct RecordingBridge {
    label: &'static str,
    sink: Rc<RefCell<Vec<(String, usize)>>>,
}

impl Bridge for RecordingBridge {
    fn apply(&mut self, _frame: u64, batch: &SampleBatch, _scene: &mut dyn SceneGraph) {
        self.sink
            .borrow_mut()
            .push((self.label.to_string(), batch.len()));
    }
}

#[test]
fn holistic_frame_push_runs_stages_in_fixed_order() {
    let sink: Rc<RefCell<Vec<(String, usize)>>> = Rc::default();
    let bridge = |label| {
        Box::new(RecordingBridge {
            label,
            sink: Rc::clone(&sink),
        }) as Box<dyn Bridge>
    };

    let mut listener = FrameListener::new();
    listener.attach(Box::new(HolisticObserver::new(
        StageObserver::new(Box::new(HandProcessor), bridge("hand")),
        StageObserver::new(Box::new(FaceProcessor), bridge("face")),
        StageObserver::new(Box::new(PoseProcessor), bridge("pose")),
    )));

    let mut scene = MockScene::new();
    listener.notify(&holistic_frame(0), &mut scene);

    let order = sink.borrow();
    let labels: Vec<_> = order.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, ["hand", "face", "pose"]);
    // each bridge received its own stage's output
    assert_eq!(order[0].1, 2, "two hands");
    assert_eq!(order[1].1, 1, "one face anchor");
    assert_eq!(order[2].1, 14, "pose channels plus torso centers");
}

#[test]
fn capture_open_failure_surfaces_before_any_stage_runs() {
    let (mut detector, state) = MockDetector::with_frames(vec![holistic_frame(0)]);
    detector.fail_open = true;

    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Pose, ConsumerKind::ApplyToScene),
        Box::new(detector),
    );

    let err = pipeline
        .init_detector(&CaptureConfig {
            source: CaptureSource::Device(9),
            ..Default::default()
        })
        .expect_err("bad capture source must fail");
    assert!(matches!(err, PipelineError::CaptureOpen(_)));

    let st = state.borrow();
    assert!(!st.model_initialized);
    assert_eq!(st.frames_served, 0);
}

#[test]
fn session_replay_skips_capture_setup() {
    let (detector, state) = MockDetector::with_frames(vec![]);
    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Freemocap, ConsumerKind::ApplyToScene),
        Box::new(detector),
    );

    pipeline
        .init_detector(&CaptureConfig {
            input_mode: InputMode::SessionReplay,
            ..Default::default()
        })
        .expect("replay init");

    let st = state.borrow();
    assert!(!st.opened, "no capture device for session replay");
    assert!(st.model_initialized);
}

#[test]
fn init_bridge_is_idempotent() {
    let (detector, _state) = MockDetector::with_frames(vec![]);
    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Holistic, ConsumerKind::DebugEmit),
        Box::new(detector),
    );

    pipeline.init_bridge();
    pipeline.init_bridge();
    assert_eq!(pipeline.observer_count(), 1);
}

#[test]
fn frames_drain_through_scene_bridge_into_providers() {
    let (detector, _state) = MockDetector::with_frames(vec![holistic_frame(0), holistic_frame(1)]);
    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Pose, ConsumerKind::ApplyToScene),
        Box::new(detector),
    );
    pipeline.init_detector(&CaptureConfig::default()).unwrap();
    pipeline.init_bridge();

    let mut scene = rigify_scene("rig");
    let before = scene
        .object_transform("cgt_left_shoulder")
        .unwrap()
        .location;

    while pipeline.run_frame(&mut scene).unwrap() {}

    assert_eq!(pipeline.frames_processed(), 2);
    let after = scene
        .object_transform("cgt_left_shoulder")
        .unwrap()
        .location;
    assert_ne!(before, after, "bridge must write provider transforms");
    // anchor scale carries the limb length for the drivers
    let scale = scene.object_transform("cgt_left_shoulder").unwrap().scale;
    assert!(scale.z > 0.0);
}

#[test]
fn teardown_releases_the_detector_exactly_once() {
    let (detector, state) = MockDetector::with_frames(vec![]);
    let mut pipeline = Pipeline::new(
        PipelineConfig::new(CaptureTarget::Hand, ConsumerKind::RawEmit),
        Box::new(detector),
    );
    pipeline.shutdown();
    drop(pipeline);
    assert_eq!(state.borrow().closed, 1);
}
