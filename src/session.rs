use anyhow::Result;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::landmark::LandmarkSet;
use crate::measure::{MeasureError, MeasurementEngine, Measurements};
use crate::pose::LandmarkProvider;

const RULE: &str = "============================================================";

/// キー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Calibrate,
    Measure,
    Quit,
}

impl Command {
    /// c: 校正, m: 計測, q: 終了（大文字も可）
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'c' => Some(Self::Calibrate),
            'm' => Some(Self::Measure),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Calibrated { pixels_per_cm: f64 },
    CalibrationFailed(MeasureError),
    Measured(Measurements),
    MeasurementFailed(MeasureError),
    Quit,
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calibrated { pixels_per_cm } => {
                write!(f, "Calibration successful! ({:.4} px/cm)", pixels_per_cm)
            }
            Self::CalibrationFailed(e) => write!(
                f,
                "Calibration failed ({}). Make sure your full body is visible.",
                e
            ),
            Self::Measured(m) => {
                writeln!(f, "Body measurements (cm):")?;
                for (name, value) in m.iter() {
                    writeln!(f, "  {:<18} {:>6.1}", name, value)?;
                }
                Ok(())
            }
            Self::MeasurementFailed(MeasureError::Uncalibrated) => {
                write!(f, "Please calibrate first (press 'c').")
            }
            Self::MeasurementFailed(e) => write!(f, "Measurement failed ({}).", e),
            Self::Quit => write!(f, "Quitting..."),
        }
    }
}

/// 1フレーム処理の結果
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// 1始まり
    pub frame_index: u64,
    /// オーバーレイ描画用
    pub landmarks: Option<LandmarkSet>,
    pub outcome: Option<CommandOutcome>,
}

/// セッション統計。フレームは保存も送信もしない。
#[derive(Debug, Clone)]
pub struct SessionStats {
    frames_processed: u64,
    started_at: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            frames_processed: 0,
            started_at: Instant::now(),
        }
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frames_saved(&self) -> u64 {
        0
    }

    pub fn bytes_transmitted(&self) -> u64 {
        0
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn summary(&self) -> String {
        self.render_summary(self.elapsed())
    }

    fn render_summary(&self, elapsed: Duration) -> String {
        format!(
            "{RULE}\nPRIVACY SUMMARY:\n \
             Total frames processed: {}\n \
             Total frames saved: {}\n \
             Data transmitted: {} bytes (all processing local)\n \
             Session duration: {:.1} seconds\n{RULE}",
            self.frames_processed,
            self.frames_saved(),
            self.bytes_transmitted(),
            elapsed.as_secs_f64(),
        )
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// フレームごとに検出→(コマンドがあれば)校正/計測 を行う同期ループ本体
pub struct MeasurementSession<P: LandmarkProvider> {
    provider: P,
    engine: MeasurementEngine,
    stats: SessionStats,
    running: bool,
}

impl<P: LandmarkProvider> MeasurementSession<P> {
    pub fn new(provider: P, engine: MeasurementEngine) -> Self {
        Self {
            provider,
            engine,
            stats: SessionStats::new(),
            running: true,
        }
    }

    pub fn engine(&self) -> &MeasurementEngine {
        &self.engine
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn status_text(&self) -> &'static str {
        if self.engine.is_calibrated() {
            "Calibrated - Press 'm' to measure"
        } else {
            "Press 'c' to calibrate"
        }
    }

    /// 検出器のエラーはそのまま返す。ランドマーク不足は outcome に入る。
    pub fn process_frame(
        &mut self,
        frame: &P::Frame,
        frame_size: (u32, u32),
        command: Option<Command>,
    ) -> Result<FrameReport> {
        self.stats.frames_processed += 1;

        let detection = self.provider.detect(frame)?;
        let landmarks = self.provider.extract(&detection, frame_size);
        let outcome = command.map(|c| self.apply(c, landmarks.as_ref()));

        Ok(FrameReport {
            frame_index: self.stats.frames_processed,
            landmarks,
            outcome,
        })
    }

    fn apply(&mut self, command: Command, landmarks: Option<&LandmarkSet>) -> CommandOutcome {
        let empty = LandmarkSet::new();
        let landmarks = landmarks.unwrap_or(&empty);
        match command {
            Command::Calibrate => match self.engine.try_calibrate(landmarks) {
                Ok(pixels_per_cm) => CommandOutcome::Calibrated { pixels_per_cm },
                Err(e) => CommandOutcome::CalibrationFailed(e),
            },
            Command::Measure => match self.engine.try_calculate(landmarks) {
                Ok(m) => CommandOutcome::Measured(m),
                Err(e) => CommandOutcome::MeasurementFailed(e),
            },
            Command::Quit => {
                self.stop();
                CommandOutcome::Quit
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeightInputError {
    #[error("Please enter a valid number.")]
    NotANumber(String),
    #[error("Please enter a positive number.")]
    NotPositive(f64),
}

/// 身長入力をパース。空なら `default_cm`。
pub fn parse_height(input: &str, default_cm: f64) -> Result<f64, HeightInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default_cm);
    }
    let value: f64 = input
        .parse()
        .map_err(|_| HeightInputError::NotANumber(input.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(HeightInputError::NotPositive(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;
    use anyhow::bail;

    enum FakeFrame {
        Person(LandmarkSet),
        Nobody,
        Broken,
    }

    /// フレームに埋め込んだランドマークをそのまま返す
    struct FakeProvider;

    impl LandmarkProvider for FakeProvider {
        type Frame = FakeFrame;
        type Detection = Option<LandmarkSet>;

        fn detect(&mut self, frame: &FakeFrame) -> Result<Option<LandmarkSet>> {
            match frame {
                FakeFrame::Person(l) => Ok(Some(l.clone())),
                FakeFrame::Nobody => Ok(None),
                FakeFrame::Broken => bail!("decoder error"),
            }
        }

        fn extract(&self, detection: &Option<LandmarkSet>, _frame_size: (u32, u32)) -> Option<LandmarkSet> {
            detection.clone()
        }
    }

    const FRAME: (u32, u32) = (640, 480);

    fn person() -> FakeFrame {
        FakeFrame::Person(
            LandmarkSet::new()
                .with(Landmark::Nose, (100, 0))
                .with(Landmark::LeftShoulder, (80, 50))
                .with(Landmark::RightShoulder, (120, 50))
                .with(Landmark::LeftHip, (85, 110))
                .with(Landmark::RightHip, (115, 110))
                .with(Landmark::LeftAnkle, (90, 200))
                .with(Landmark::RightAnkle, (110, 200)),
        )
    }

    fn session() -> MeasurementSession<FakeProvider> {
        MeasurementSession::new(FakeProvider, MeasurementEngine::new(170.0).unwrap())
    }

    #[test]
    fn test_command_from_key() {
        assert_eq!(Command::from_key('c'), Some(Command::Calibrate));
        assert_eq!(Command::from_key('M'), Some(Command::Measure));
        assert_eq!(Command::from_key('q'), Some(Command::Quit));
        assert_eq!(Command::from_key('x'), None);
    }

    #[test]
    fn test_frame_without_command() {
        let mut s = session();
        let report = s.process_frame(&person(), FRAME, None).unwrap();
        assert_eq!(report.frame_index, 1);
        assert!(report.landmarks.is_some());
        assert!(report.outcome.is_none());
        assert_eq!(s.status_text(), "Press 'c' to calibrate");
    }

    #[test]
    fn test_calibrate_then_measure() {
        let mut s = session();
        let report = s.process_frame(&person(), FRAME, Some(Command::Calibrate)).unwrap();
        match report.outcome {
            Some(CommandOutcome::Calibrated { pixels_per_cm }) => {
                assert!((pixels_per_cm - 200.0 / 170.0).abs() < 1e-12)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(s.status_text(), "Calibrated - Press 'm' to measure");

        let report = s.process_frame(&person(), FRAME, Some(Command::Measure)).unwrap();
        match report.outcome {
            Some(CommandOutcome::Measured(m)) => assert!((m.shoulder_width_cm - 34.0).abs() < 1e-9),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(s.stats().frames_processed(), 2);
    }

    #[test]
    fn test_measure_before_calibration() {
        let mut s = session();
        let report = s.process_frame(&person(), FRAME, Some(Command::Measure)).unwrap();
        assert_eq!(
            report.outcome,
            Some(CommandOutcome::MeasurementFailed(MeasureError::Uncalibrated))
        );
    }

    #[test]
    fn test_calibrate_without_person_keeps_running() {
        let mut s = session();
        let report = s.process_frame(&FakeFrame::Nobody, FRAME, Some(Command::Calibrate)).unwrap();
        assert!(report.landmarks.is_none());
        assert!(matches!(
            report.outcome,
            Some(CommandOutcome::CalibrationFailed(MeasureError::MissingLandmarks(ref missing)))
                if missing.len() == 3
        ));
        assert!(s.is_running());
        assert!(!s.engine().is_calibrated());
    }

    #[test]
    fn test_detector_error_propagates_but_counts_frame() {
        let mut s = session();
        assert!(s.process_frame(&FakeFrame::Broken, FRAME, None).is_err());
        assert_eq!(s.stats().frames_processed(), 1);
        assert!(s.is_running());
    }

    #[test]
    fn test_quit() {
        let mut s = session();
        let report = s.process_frame(&person(), FRAME, Some(Command::Quit)).unwrap();
        assert_eq!(report.outcome, Some(CommandOutcome::Quit));
        assert!(!s.is_running());
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            CommandOutcome::MeasurementFailed(MeasureError::Uncalibrated).to_string(),
            "Please calibrate first (press 'c')."
        );
        let text = CommandOutcome::Measured(Measurements {
            shoulder_width_cm: 34.0,
            torso_length_cm: 51.2,
            hip_width_cm: 25.5,
            inseam_cm: 76.9,
        })
        .to_string();
        assert!(text.starts_with("Body measurements (cm):\n"));
        assert!(text.contains("shoulder_width_cm    34.0"));
    }

    #[test]
    fn test_privacy_summary() {
        let mut stats = SessionStats::new();
        stats.frames_processed = 42;
        let summary = stats.render_summary(Duration::from_millis(12_340));
        assert!(summary.contains("Total frames processed: 42"));
        assert!(summary.contains("Total frames saved: 0"));
        assert!(summary.contains("Data transmitted: 0 bytes"));
        assert!(summary.contains("Session duration: 12.3 seconds"));
    }

    #[test]
    fn test_parse_height() {
        assert_eq!(parse_height(" 182.5\n", 170.0), Ok(182.5));
        assert_eq!(parse_height("", 170.0), Ok(170.0));
        assert_eq!(
            parse_height("tall", 170.0),
            Err(HeightInputError::NotANumber("tall".to_string()))
        );
        assert_eq!(parse_height("-5", 170.0), Err(HeightInputError::NotPositive(-5.0)));
        assert!(parse_height("0", 170.0).is_err());
        assert!(parse_height("inf", 170.0).is_err());
    }
}
