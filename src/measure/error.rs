use thiserror::Error;

use crate::landmark::Landmark;

/// 校正・計測が失敗した理由
///
/// どれもフレーム単位で回復可能。次のフレームで再試行すればよい。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("missing landmarks: {}", join_names(.0))]
    MissingLandmarks(Vec<Landmark>),
    #[error("not calibrated")]
    Uncalibrated,
    #[error("degenerate geometry: body height is {distance_px} px")]
    DegenerateGeometry { distance_px: f64 },
    #[error("invalid height: {0} cm (must be a positive number)")]
    InvalidHeight(f64),
}

fn join_names(landmarks: &[Landmark]) -> String {
    landmarks
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmarks_message_lists_names() {
        let err = MeasureError::MissingLandmarks(vec![Landmark::Nose, Landmark::RightAnkle]);
        assert_eq!(err.to_string(), "missing landmarks: nose, right_ankle");
    }
}
