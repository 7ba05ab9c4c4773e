use anyhow::Result;

use crate::config::DetectionConfig;
use crate::landmark::{Landmark, LandmarkSet, PixelPoint};

use super::keypoint::{KeypointIndex, Pose};

/// ランドマーク供給元
///
/// 計測側は `LandmarkSet` しか見ない。検出結果の中身は実装ごとに自由。
pub trait LandmarkProvider {
    type Frame;
    type Detection;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Self::Detection>;

    /// 人物が見つからなければ `None`
    fn extract(&self, detection: &Self::Detection, frame_size: (u32, u32)) -> Option<LandmarkSet>;
}

/// 検出の信頼度閾値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholds {
    /// ランドマーク9点の平均がこれ未満なら人物なし
    pub detection: f32,
    /// これ未満のランドマークは集合から外す
    pub landmark: f32,
}

impl ConfidenceThresholds {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            detection: config.min_detection_confidence,
            landmark: config.min_landmark_confidence,
        }
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

pub fn keypoint_for(landmark: Landmark) -> KeypointIndex {
    match landmark {
        Landmark::Nose => KeypointIndex::Nose,
        Landmark::LeftShoulder => KeypointIndex::LeftShoulder,
        Landmark::RightShoulder => KeypointIndex::RightShoulder,
        Landmark::LeftHip => KeypointIndex::LeftHip,
        Landmark::RightHip => KeypointIndex::RightHip,
        Landmark::LeftKnee => KeypointIndex::LeftKnee,
        Landmark::RightKnee => KeypointIndex::RightKnee,
        Landmark::LeftAnkle => KeypointIndex::LeftAnkle,
        Landmark::RightAnkle => KeypointIndex::RightAnkle,
    }
}

/// 正規化座標のPoseをフレームのピクセル座標ランドマークに変換
pub fn extract_landmarks(
    pose: &Pose,
    frame_size: (u32, u32),
    thresholds: &ConfidenceThresholds,
) -> Option<LandmarkSet> {
    let (width, height) = frame_size;
    let indices = Landmark::ALL.map(keypoint_for);
    if pose.average_confidence_of(&indices) < thresholds.detection {
        return None;
    }

    let landmarks: LandmarkSet = Landmark::ALL
        .into_iter()
        .filter_map(|landmark| {
            let kp = pose.get(keypoint_for(landmark));
            kp.is_valid(thresholds.landmark)
                .then(|| (landmark, PixelPoint::from(kp.to_pixel(width, height))))
        })
        .collect();

    Some(landmarks)
}
