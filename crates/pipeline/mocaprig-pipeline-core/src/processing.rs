//! Processing stages: raw landmarks in, named channel values out.
//!
//! Stages only translate; they never touch the scene. Channel names match the
//! provider objects the rig side binds against (`cgt_*`).

use mocaprig_api::{ChannelSample, RawFrame, SampleBatch, Vec3};

/// One frame of raw landmark data becomes one batch of channel values.
pub trait ProcessingStage {
    fn process(&mut self, frame: &RawFrame) -> SampleBatch;
}

/// MediaPipe pose landmark indices for the channels the rig consumes.
const POSE_CHANNELS: [(usize, &str); 12] = [
    (11, "cgt_left_shoulder"),
    (12, "cgt_right_shoulder"),
    (13, "cgt_left_elbow"),
    (14, "cgt_right_elbow"),
    (15, "cgt_left_wrist"),
    (16, "cgt_right_wrist"),
    (23, "cgt_left_hip"),
    (24, "cgt_right_hip"),
    (25, "cgt_left_knee"),
    (26, "cgt_right_knee"),
    (27, "cgt_left_ankle"),
    (28, "cgt_right_ankle"),
];

/// In-plane angle of the segment from `a` to `b`.
fn roll_angle(a: Vec3, b: Vec3) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Summed segment length along a chain of landmark indices.
fn chain_length(pose: &[Vec3], chain: [usize; 3]) -> Option<f32> {
    let a = pose.get(chain[0])?;
    let b = pose.get(chain[1])?;
    let c = pose.get(chain[2])?;
    Some(a.distance(b) + b.distance(c))
}

/// Body pose stage. Emits channel locations, current limb lengths as anchor
/// scales (consumed by the scale-to-location template) and torso-center
/// rotations.
#[derive(Debug, Default)]
pub struct PoseProcessor;

impl ProcessingStage for PoseProcessor {
    fn process(&mut self, frame: &RawFrame) -> SampleBatch {
        let mut batch = SampleBatch::new();
        let pose = &frame.pose;
        if pose.is_empty() {
            return batch;
        }

        for (index, channel) in POSE_CHANNELS {
            let Some(position) = pose.get(index) else {
                continue;
            };
            let mut sample = ChannelSample::location(channel, *position);
            // current limb length rides on the anchor channels
            let scale = match channel {
                "cgt_left_shoulder" => chain_length(pose, [11, 13, 15]),
                "cgt_right_shoulder" => chain_length(pose, [12, 14, 16]),
                "cgt_left_hip" => chain_length(pose, [23, 25, 27]),
                "cgt_right_hip" => chain_length(pose, [24, 26, 28]),
                _ => None,
            };
            if let Some(length) = scale {
                sample = sample.with_scale(Vec3::splat(length));
            }
            batch.push(sample);
        }

        if let (Some(l), Some(r)) = (pose.get(11), pose.get(12)) {
            batch.push(
                ChannelSample::location("shoulder_center", l.midpoint(r))
                    .with_rotation(Vec3::new(0.0, 0.0, roll_angle(*r, *l))),
            );
        }
        if let (Some(l), Some(r)) = (pose.get(23), pose.get(24)) {
            batch.push(
                ChannelSample::location("hip_center", l.midpoint(r))
                    .with_rotation(Vec3::new(0.0, 0.0, roll_angle(*r, *l))),
            );
        }

        batch
    }
}

/// Hand stage: wrist location plus palm roll per detected hand. The first
/// detected hand is treated as left, the second as right.
#[derive(Debug, Default)]
pub struct HandProcessor;

const WRIST: usize = 0;
const MIDDLE_MCP: usize = 9;

impl ProcessingStage for HandProcessor {
    fn process(&mut self, frame: &RawFrame) -> SampleBatch {
        let mut batch = SampleBatch::new();
        for (slot, hand) in frame.hands.iter().enumerate().take(2) {
            let channel = if slot == 0 {
                "cgt_left_hand"
            } else {
                "cgt_right_hand"
            };
            let Some(wrist) = hand.get(WRIST) else {
                continue;
            };
            let mut sample = ChannelSample::location(channel, *wrist);
            if let Some(palm) = hand.get(MIDDLE_MCP) {
                sample = sample.with_rotation(Vec3::new(0.0, 0.0, roll_angle(*wrist, *palm)));
            }
            batch.push(sample);
        }
        batch
    }
}

/// Face stage: head anchor from the nose tip plus head roll from the eye
/// outer corners.
#[derive(Debug, Default)]
pub struct FaceProcessor;

const NOSE_TIP: usize = 1;
const RIGHT_EYE_OUTER: usize = 33;
const LEFT_EYE_OUTER: usize = 263;

impl ProcessingStage for FaceProcessor {
    fn process(&mut self, frame: &RawFrame) -> SampleBatch {
        let mut batch = SampleBatch::new();
        let Some(nose) = frame.face.get(NOSE_TIP) else {
            return batch;
        };
        let mut sample = ChannelSample::location("cgt_face_rotation", *nose);
        if let (Some(r), Some(l)) = (
            frame.face.get(RIGHT_EYE_OUTER),
            frame.face.get(LEFT_EYE_OUTER),
        ) {
            sample = sample.with_rotation(Vec3::new(0.0, 0.0, roll_angle(*r, *l)));
        }
        batch.push(sample);
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_pose_frame() -> RawFrame {
        let mut frame = RawFrame::new(0);
        frame.pose = (0..33)
            .map(|i| Vec3::new(i as f32 * 0.01, 0.5, 0.5))
            .collect();
        frame
    }

    #[test]
    fn pose_stage_emits_all_mapped_channels() {
        let frame = grid_pose_frame();
        let batch = PoseProcessor.process(&frame);
        // 12 landmark channels plus the two torso centers
        assert_eq!(batch.len(), 14);
        assert!(batch.iter().any(|s| s.channel == "cgt_left_shoulder"));
        assert!(batch.iter().any(|s| s.channel == "hip_center"));
    }

    #[test]
    fn anchor_channels_carry_limb_length_scale() {
        let frame = grid_pose_frame();
        let batch = PoseProcessor.process(&frame);
        let shoulder = batch
            .iter()
            .find(|s| s.channel == "cgt_left_shoulder")
            .unwrap();
        // distances 11->13 and 13->15 are 0.02 each on the grid
        let scale = shoulder.scale.expect("anchor carries scale");
        assert!((scale.z - 0.04).abs() < 1e-6);
    }

    #[test]
    fn short_landmark_list_degrades_to_partial_batch() {
        let mut frame = RawFrame::new(0);
        frame.pose = (0..16)
            .map(|i| Vec3::new(i as f32 * 0.01, 0.5, 0.5))
            .collect();
        let batch = PoseProcessor.process(&frame);
        // shoulders/elbows/wrists resolve, hips and below do not
        assert!(batch.iter().any(|s| s.channel == "cgt_left_wrist"));
        assert!(!batch.iter().any(|s| s.channel == "cgt_left_hip"));
        assert!(!batch.iter().any(|s| s.channel == "hip_center"));
    }

    #[test]
    fn hand_stage_names_slots_left_then_right() {
        let mut frame = RawFrame::new(0);
        frame.hands = vec![
            (0..21).map(|i| Vec3::new(0.2, i as f32 * 0.01, 0.0)).collect(),
            (0..21).map(|i| Vec3::new(0.8, i as f32 * 0.01, 0.0)).collect(),
        ];
        let batch = HandProcessor.process(&frame);
        let channels: Vec<_> = batch.iter().map(|s| s.channel.as_str()).collect();
        assert_eq!(channels, ["cgt_left_hand", "cgt_right_hand"]);
    }

    #[test]
    fn face_stage_is_empty_without_landmarks() {
        let frame = RawFrame::new(0);
        assert!(FaceProcessor.process(&frame).is_empty());
    }
}
