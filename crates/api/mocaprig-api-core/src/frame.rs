//! Per-frame landmark data delivered by a detection backend.
//!
//! The backend is opaque to this workspace; it only has to hand over
//! normalized landmark coordinates once per frame. Empty vectors mean the
//! corresponding model produced no detection for this frame.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// One frame of raw detection output.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFrame {
    /// Source frame index (timeline position, honoring the sampling step).
    pub frame: u64,
    /// Detected hands, each a landmark list (21 points per MediaPipe hand).
    pub hands: Vec<Vec<Vec3>>,
    /// Face mesh landmarks.
    pub face: Vec<Vec3>,
    /// Body pose landmarks (33 points per MediaPipe pose).
    pub pose: Vec<Vec3>,
}

impl RawFrame {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            ..Default::default()
        }
    }

    /// True when no model produced any landmarks this frame.
    pub fn is_empty(&self) -> bool {
        self.hands.iter().all(|h| h.is_empty()) && self.face.is_empty() && self.pose.is_empty()
    }
}
