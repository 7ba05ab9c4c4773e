pub mod skeleton;
pub mod window;

pub use skeleton::SKELETON_CONNECTIONS;
pub use window::MinifbRenderer;
