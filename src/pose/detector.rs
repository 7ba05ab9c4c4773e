use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::core::Mat;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use crate::landmark::LandmarkSet;

use super::keypoint::{Keypoint, Pose};
use super::preprocess::preprocess_for_movenet;
use super::provider::{extract_landmarks, ConfidenceThresholds, LandmarkProvider};

/// MoveNet Lightning (ONNX) による単一人物の姿勢検出
pub struct PoseDetector {
    session: Session,
    thresholds: ConfidenceThresholds,
}

impl PoseDetector {
    pub fn new<P: AsRef<Path>>(model_path: P, thresholds: ConfidenceThresholds) -> Result<Self> {
        let model_path = model_path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model {}", model_path.display()))?;

        log::info!("pose model loaded: {}", model_path.display());
        Ok(Self { session, thresholds })
    }

    /// 前処理済みテンソル [1, 192, 192, 3] から推論
    pub fn infer(&mut self, input: Array4<f32>) -> Result<Pose> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("Inference failed")?;

        // 出力は [1, 1, 17, 3] (y, x, confidence)
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let mut pose = Pose::default();
        for (i, kp) in pose.keypoints.iter_mut().enumerate() {
            *kp = Keypoint::new(output[[0, 0, i, 1]], output[[0, 0, i, 0]], output[[0, 0, i, 2]]);
        }
        Ok(pose)
    }
}

impl LandmarkProvider for PoseDetector {
    type Frame = Mat;
    type Detection = Pose;

    fn detect(&mut self, frame: &Mat) -> Result<Pose> {
        let input = preprocess_for_movenet(frame)?;
        self.infer(input)
    }

    fn extract(&self, pose: &Pose, frame_size: (u32, u32)) -> Option<LandmarkSet> {
        extract_landmarks(pose, frame_size, &self.thresholds)
    }
}
