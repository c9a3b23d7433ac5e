//! Processed channel values emitted by processing stages and consumed by
//! bridges.
//!
//! A `ChannelSample` carries the per-frame value for one named motion channel
//! (e.g. `cgt_left_shoulder`); a `SampleBatch` is the full output of one
//! stage for one frame. Batches serialize as plain JSON arrays so they can be
//! dumped for inspection by the debug consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::Vec3;

/// Value for one named channel in one frame. Components that a stage does not
/// compute stay `None` and leave the provider object untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelSample {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec3>,
    /// Euler rotation in radians.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
}

impl ChannelSample {
    pub fn location(channel: impl Into<String>, location: Vec3) -> Self {
        Self {
            channel: channel.into(),
            location: Some(location),
            rotation: None,
            scale: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl fmt::Display for ChannelSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A stage's output for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBatch(pub Vec<ChannelSample>);

impl SampleBatch {
    pub fn new() -> Self {
        SampleBatch(Vec::new())
    }

    pub fn push(&mut self, sample: ChannelSample) {
        self.0.push(sample);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelSample> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ChannelSample> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_roundtrip_json() {
        let mut batch = SampleBatch::new();
        batch.push(
            ChannelSample::location("cgt_left_shoulder", Vec3::new(0.1, 0.2, 0.3))
                .with_scale(Vec3::splat(1.5)),
        );
        let s = serde_json::to_string(&batch).unwrap();
        let parsed: SampleBatch = serde_json::from_str(&s).unwrap();
        assert_eq!(batch, parsed);
    }

    #[test]
    fn absent_components_are_omitted() {
        let sample = ChannelSample::location("cgt_left_wrist", Vec3::ZERO);
        let s = serde_json::to_string(&sample).unwrap();
        assert!(!s.contains("rotation"));
        assert!(!s.contains("scale"));
    }
}
