use std::fmt;

use crate::config::MeasurementConfig;
use crate::landmark::{Landmark, LandmarkSet, PixelPoint};

use super::error::MeasureError;
use super::geometry::{distance, mean_distance, midpoint};

/// 身長が指定されなかったときの基準身長（cm）
pub const DEFAULT_REFERENCE_HEIGHT_CM: f64 = 170.0;

/// 校正に必要なランドマーク（鼻と両足首）
pub const CALIBRATION_LANDMARKS: [Landmark; 3] =
    [Landmark::Nose, Landmark::LeftAnkle, Landmark::RightAnkle];

/// 計測に必要なランドマーク
pub const MEASUREMENT_LANDMARKS: [Landmark; 6] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

/// 計測結果（すべてcm、非負）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub shoulder_width_cm: f64,
    pub torso_length_cm: f64,
    pub hip_width_cm: f64,
    pub inseam_cm: f64,
}

impl Measurements {
    pub const NAMES: [&'static str; 4] = [
        "shoulder_width_cm",
        "torso_length_cm",
        "hip_width_cm",
        "inseam_cm",
    ];

    pub fn values(&self) -> [f64; 4] {
        [
            self.shoulder_width_cm,
            self.torso_length_cm,
            self.hip_width_cm,
            self.inseam_cm,
        ]
    }

    /// (名前, 値) を固定順で返す
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::NAMES.into_iter().zip(self.values())
    }
}

impl fmt::Display for Measurements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {:.1}", name, value)?;
        }
        Ok(())
    }
}

/// 身長で校正し、ランドマークから体の寸法を求める
///
/// 校正は鼻から両足首の中点までのピクセル距離を身長で割った
/// `pixels_per_cm` を1つ保持するだけ。再校正すると上書きされる。
#[derive(Debug, Clone)]
pub struct MeasurementEngine {
    height_cm: f64,
    pixels_per_cm: Option<f64>,
}

impl MeasurementEngine {
    pub fn new(height_cm: f64) -> Result<Self, MeasureError> {
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(MeasureError::InvalidHeight(height_cm));
        }
        Ok(Self {
            height_cm,
            pixels_per_cm: None,
        })
    }

    pub fn from_config(config: &MeasurementConfig) -> Result<Self, MeasureError> {
        Self::new(config.reference_height_cm)
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn pixels_per_cm(&self) -> Option<f64> {
        self.pixels_per_cm
    }

    pub fn is_calibrated(&self) -> bool {
        self.pixels_per_cm.is_some()
    }

    /// 校正を破棄
    pub fn reset(&mut self) {
        self.pixels_per_cm = None;
    }

    /// 校正。失敗しても既存の校正はそのまま残る。
    pub fn calibrate(&mut self, landmarks: Option<&LandmarkSet>) -> bool {
        let Some(landmarks) = landmarks else {
            log::debug!("calibration skipped: no landmarks");
            return false;
        };
        match self.try_calibrate(landmarks) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("calibration rejected: {}", e);
                false
            }
        }
    }

    /// 校正して新しい `pixels_per_cm` を返す
    pub fn try_calibrate(&mut self, landmarks: &LandmarkSet) -> Result<f64, MeasureError> {
        let [nose, left_ankle, right_ankle] = require(landmarks, CALIBRATION_LANDMARKS)?;

        let ankle = midpoint(left_ankle.to_f64(), right_ankle.to_f64());
        let body_height_px = distance(nose.to_f64(), ankle);
        if !(body_height_px > 0.0) || !body_height_px.is_finite() {
            return Err(MeasureError::DegenerateGeometry {
                distance_px: body_height_px,
            });
        }

        let scale = body_height_px / self.height_cm;
        if let Some(prev) = self.pixels_per_cm {
            log::info!("recalibrated: {:.4} -> {:.4} px/cm", prev, scale);
        } else {
            log::info!(
                "calibrated: {:.1} px for {:.1} cm ({:.4} px/cm)",
                body_height_px,
                self.height_cm,
                scale
            );
        }
        self.pixels_per_cm = Some(scale);
        Ok(scale)
    }

    /// 計測。未校正・ランドマーク欠損時は `None`（部分的な結果は返さない）
    pub fn calculate_measurements(&self, landmarks: Option<&LandmarkSet>) -> Option<Measurements> {
        let landmarks = landmarks?;
        match self.try_calculate(landmarks) {
            Ok(m) => Some(m),
            Err(e) => {
                log::debug!("measurement unavailable: {}", e);
                None
            }
        }
    }

    pub fn try_calculate(&self, landmarks: &LandmarkSet) -> Result<Measurements, MeasureError> {
        let scale = self.pixels_per_cm.ok_or(MeasureError::Uncalibrated)?;
        let [ls, rs, lh, rh, la, ra] =
            require(landmarks, MEASUREMENT_LANDMARKS)?.map(PixelPoint::to_f64);

        let shoulder_px = distance(ls, rs);
        let torso_px = mean_distance((ls, lh), (rs, rh));
        let hip_px = distance(lh, rh);
        let inseam_px = mean_distance((lh, la), (rh, ra));

        Ok(Measurements {
            shoulder_width_cm: shoulder_px / scale,
            torso_length_cm: torso_px / scale,
            hip_width_cm: hip_px / scale,
            inseam_cm: inseam_px / scale,
        })
    }
}

impl Default for MeasurementEngine {
    fn default() -> Self {
        Self {
            height_cm: DEFAULT_REFERENCE_HEIGHT_CM,
            pixels_per_cm: None,
        }
    }
}

/// 必要なランドマークを順に取り出す。欠けていれば全部まとめて報告する。
fn require<const N: usize>(
    landmarks: &LandmarkSet,
    required: [Landmark; N],
) -> Result<[PixelPoint; N], MeasureError> {
    let mut points = [PixelPoint::default(); N];
    let mut missing = Vec::new();
    for (slot, landmark) in points.iter_mut().zip(required) {
        match landmarks.get(landmark) {
            Some(p) => *slot = p,
            None => missing.push(landmark),
        }
    }
    if missing.is_empty() {
        Ok(points)
    } else {
        Err(MeasureError::MissingLandmarks(missing))
    }
}
