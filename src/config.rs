use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub measurement: MeasurementConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default = "default_camera_index")]
    pub index: i32,
    #[serde(default = "default_frame_width")]
    pub width: u32,
    #[serde(default = "default_frame_height")]
    pub height: u32,
}

fn default_camera_index() -> i32 { 0 }
fn default_frame_width() -> u32 { 1280 }
fn default_frame_height() -> u32 { 720 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_frame_width(),
            height: default_frame_height(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// MoveNet ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 人物検出とみなす平均信頼度
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,
    /// 個々のランドマークを採用する信頼度
    #[serde(default = "default_min_landmark_confidence")]
    pub min_landmark_confidence: f32,
}

fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_min_detection_confidence() -> f32 { 0.5 }
fn default_min_landmark_confidence() -> f32 { 0.5 }

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            min_detection_confidence: default_min_detection_confidence(),
            min_landmark_confidence: default_min_landmark_confidence(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MeasurementConfig {
    /// 身長入力が空のときに使う基準身長（cm）
    #[serde(default = "default_reference_height_cm")]
    pub reference_height_cm: f64,
}

fn default_reference_height_cm() -> f64 { crate::measure::DEFAULT_REFERENCE_HEIGHT_CM }

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            reference_height_cm: default_reference_height_cm(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_show_landmarks")]
    pub show_landmarks: bool,
    /// ランドマークの色 (0xRRGGBB)
    #[serde(default = "default_landmark_color")]
    pub landmark_color: u32,
    /// 骨格線の色 (0xRRGGBB)
    #[serde(default = "default_connection_color")]
    pub connection_color: u32,
}

fn default_show_landmarks() -> bool { true }
fn default_landmark_color() -> u32 { 0x00FF00 }
fn default_connection_color() -> u32 { 0x0000FF }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_landmarks: default_show_landmarks(),
            landmark_color: default_landmark_color(),
            connection_color: default_connection_color(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }
}
