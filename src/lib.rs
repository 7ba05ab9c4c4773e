#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod landmark;
pub mod measure;
pub mod pose;
#[cfg(feature = "desktop")]
pub mod render;
pub mod session;
