pub mod engine;
pub mod error;
pub mod geometry;

pub use engine::{
    MeasurementEngine, Measurements, CALIBRATION_LANDMARKS, DEFAULT_REFERENCE_HEIGHT_CM,
    MEASUREMENT_LANDMARKS,
};
pub use error::MeasureError;
