//! Capture configuration and the detection backend seam.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use mocaprig_api::RawFrame;

use crate::error::PipelineError;

/// Capture stream resolution presets with their exact pixel pairs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Sd,
    Hd,
    Fhd,
}

impl Resolution {
    /// (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Resolution::Sd => (720, 480),
            Resolution::Hd => (1240, 720),
            Resolution::Fhd => (1920, 1080),
        }
    }
}

/// How frames reach the detector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Pre-recorded movie file.
    Recorded,
    /// Live capture stream.
    #[default]
    Stream,
    /// Replay of a previously recorded session; no capture device is opened.
    SessionReplay,
}

impl InputMode {
    /// Wire code used by host configuration surfaces.
    pub fn code(&self) -> u8 {
        match self {
            InputMode::Recorded => 0,
            InputMode::Stream => 1,
            InputMode::SessionReplay => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<InputMode> {
        match code {
            0 => Some(InputMode::Recorded),
            1 => Some(InputMode::Stream),
            2 => Some(InputMode::SessionReplay),
            _ => None,
        }
    }
}

/// Capture input: a device slot or a file on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureSource {
    Device(u32),
    File(PathBuf),
}

impl Default for CaptureSource {
    fn default() -> Self {
        // default webcam slot
        CaptureSource::Device(0)
    }
}

/// Parameters handed to the detector at initialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: CaptureSource,
    pub resolution: Resolution,
    /// Host capture-backend selector (passed through opaquely).
    pub backend: i32,
    /// Timeline frame the first result keys to.
    pub frame_start: u32,
    /// Keyframe sampling step; 1 keys every captured frame.
    pub key_step: u32,
    pub input_mode: InputMode,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: CaptureSource::default(),
            resolution: Resolution::Sd,
            backend: 0,
            frame_start: 0,
            key_step: 1,
            input_mode: InputMode::Stream,
        }
    }
}

/// Detection backend seam. The backend may run inference however it likes
/// internally, but delivers results through a single synchronous per-frame
/// call.
pub trait Detector {
    /// Open the capture source. Not called for session replay.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), PipelineError>;

    /// Load/warm the detection model.
    fn initialize_model(&mut self) -> Result<(), PipelineError>;

    /// Pull the next frame. `Ok(None)` ends the stream.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, PipelineError>;

    /// Release capture handles. Called exactly once at teardown.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_pixel_pairs_are_exact() {
        assert_eq!(Resolution::Sd.dimensions(), (720, 480));
        assert_eq!(Resolution::Hd.dimensions(), (1240, 720));
        assert_eq!(Resolution::Fhd.dimensions(), (1920, 1080));
    }

    #[test]
    fn input_mode_codes_roundtrip() {
        for mode in [InputMode::Recorded, InputMode::Stream, InputMode::SessionReplay] {
            assert_eq!(InputMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(InputMode::from_code(3), None);
    }

    #[test]
    fn capture_config_roundtrip_json() {
        let config = CaptureConfig {
            source: CaptureSource::File("take_01.mp4".into()),
            resolution: Resolution::Hd,
            backend: 1,
            frame_start: 12,
            key_step: 2,
            input_mode: InputMode::Recorded,
        };
        let s = serde_json::to_string(&config).unwrap();
        let parsed: CaptureConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(config, parsed);
    }
}
