#[cfg(feature = "desktop")]
pub mod detector;
pub mod keypoint;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod provider;

#[cfg(feature = "desktop")]
pub use detector::PoseDetector;
pub use keypoint::{Keypoint, KeypointIndex, Pose};
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_movenet;
pub use provider::{extract_landmarks, keypoint_for, ConfidenceThresholds, LandmarkProvider};
