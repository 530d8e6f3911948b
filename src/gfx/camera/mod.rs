pub mod camera_utils;
pub mod viewer_camera;

// Re-export main types
pub use camera_utils::{look_at_basis, LookAtBasis, OPENGL_TO_WGPU_MATRIX};
pub use viewer_camera::{CameraMode, FreeCamera, ViewerCamera};
