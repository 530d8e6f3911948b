//! Three-mode viewer camera
//!
//! - **Free**: fly-through camera steered by the movement keys and mouse-look.
//! - **Chase**: fixed downward tilt, translated to follow the rocket with a
//!   constant offset and no smoothing.
//! - **GroundFixed**: stationary eye that keeps the rocket centred, built
//!   from [`look_at_basis`]. Its frame is mirrored, so it is drawn with
//!   clockwise front faces.

use std::f32::consts::FRAC_PI_2;

use cgmath::{perspective, Matrix4, Point3, Rad, Vector3};
use log::{info, warn};

use super::camera_utils::{look_at_basis, OPENGL_TO_WGPU_MATRIX};
use crate::{config::CameraConfig, controls::HeldControls, simulation::RocketPose};

/// Cursor drift from the window centre, in pixels, tolerated before recentring
const RECENTER_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Chase,
    GroundFixed,
}

impl CameraMode {
    /// Free -> Chase -> GroundFixed -> Free
    pub fn next(self) -> Self {
        match self {
            CameraMode::Free => CameraMode::Chase,
            CameraMode::Chase => CameraMode::GroundFixed,
            CameraMode::GroundFixed => CameraMode::Free,
        }
    }

    /// Winding that faces the viewer under this mode's view matrix
    pub fn front_face(self) -> wgpu::FrontFace {
        match self {
            CameraMode::GroundFixed => wgpu::FrontFace::Cw,
            CameraMode::Free | CameraMode::Chase => wgpu::FrontFace::Ccw,
        }
    }
}

/// Position and orientation of the free camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeCamera {
    pub position: Point3<f32>,
    /// Yaw, radians
    pub phi: f32,
    /// Pitch, radians, clamped to [-pi/2, pi/2]; positive looks down
    pub theta: f32,
}

impl FreeCamera {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            phi: 0.0,
            theta: 0.0,
        }
    }

    /// World-space direction the camera looks along
    pub fn forward(&self) -> Vector3<f32> {
        Vector3::new(
            self.phi.sin() * self.theta.cos(),
            -self.theta.sin(),
            -self.phi.cos() * self.theta.cos(),
        )
    }

    /// Horizontal strafe direction
    pub fn right(&self) -> Vector3<f32> {
        Vector3::new(self.phi.cos(), 0.0, self.phi.sin())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.theta))
            * Matrix4::from_angle_y(Rad(self.phi))
            * Matrix4::from_translation(-Vector3::new(
                self.position.x,
                self.position.y,
                self.position.z,
            ))
    }

    fn look(&mut self, dx: f32, dy: f32) {
        self.phi += dx;
        self.theta = (self.theta + dy).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

#[derive(Debug, Clone)]
pub struct ViewerCamera {
    mode: CameraMode,
    free: FreeCamera,
    config: CameraConfig,
    aspect: f32,
    mouse_look: bool,
    last_cursor: (f64, f64),
}

impl ViewerCamera {
    pub fn new(config: CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            mode: CameraMode::Free,
            free: FreeCamera::new(config.free_start),
            config,
            aspect: 1.0,
            mouse_look: false,
            last_cursor: (0.0, 0.0),
        };
        camera.resize(width, height);
        camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn free(&self) -> &FreeCamera {
        &self.free
    }

    pub fn is_mouse_look(&self) -> bool {
        self.mouse_look
    }

    pub fn cycle_mode(&mut self) -> CameraMode {
        self.mode = self.mode.next();
        info!("Camera mode: {:?}", self.mode);
        self.mode
    }

    /// Zero-sized windows keep the previous aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Flips mouse-look, parking the cursor reference at `center` when it
    /// turns on. Returns the new state.
    pub fn toggle_mouse_look(&mut self, center: (f64, f64)) -> bool {
        self.mouse_look = !self.mouse_look;
        if self.mouse_look {
            self.last_cursor = center;
        }
        self.mouse_look
    }

    /// Applies cursor motion to the free camera's yaw and pitch
    ///
    /// Returns the position the cursor should be warped back to when it has
    /// drifted from `center`. Ignored unless mouse-look is on.
    pub fn cursor_moved(&mut self, position: (f64, f64), center: (f64, f64)) -> Option<(f64, f64)> {
        if !self.mouse_look {
            return None;
        }

        let dx = (position.0 - self.last_cursor.0) as f32;
        let dy = (position.1 - self.last_cursor.1) as f32;
        let sensitivity = self.config.mouse_sensitivity;
        self.free.look(dx * sensitivity, dy * sensitivity);

        let drifted = (position.0 - center.0).abs() > RECENTER_THRESHOLD
            || (position.1 - center.1).abs() > RECENTER_THRESHOLD;
        if drifted {
            self.last_cursor = center;
            Some(center)
        } else {
            self.last_cursor = position;
            None
        }
    }

    /// Moves the free camera for one frame of held input
    ///
    /// Runs in every mode so the free camera keeps its place while another
    /// mode is active.
    pub fn advance(&mut self, held: &HeldControls, dt: f32) {
        if !held.is_moving() {
            return;
        }

        let step = self.config.move_speed
            * held.speed_multiplier(self.config.boost, self.config.brake)
            * dt;
        let forward = self.free.forward();
        let right = self.free.right();

        let mut delta = Vector3::new(0.0, 0.0, 0.0);
        if held.forward {
            delta += forward;
        }
        if held.backward {
            delta -= forward;
        }
        if held.right {
            delta += right;
        }
        if held.left {
            delta -= right;
        }
        if held.up {
            delta += Vector3::unit_y();
        }
        if held.down {
            delta -= Vector3::unit_y();
        }

        self.free.position += delta * step;
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * perspective(self.config.fov_y, self.aspect, self.config.near, self.config.far)
    }

    pub fn view_matrix(&self, rocket: &RocketPose) -> Matrix4<f32> {
        match self.mode {
            CameraMode::Free => self.free.view_matrix(),
            CameraMode::Chase => self.chase_view(rocket),
            CameraMode::GroundFixed => self.ground_view(rocket),
        }
    }

    pub fn build_view_projection_matrix(&self, rocket: &RocketPose) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix(rocket)
    }

    pub fn front_face(&self) -> wgpu::FrontFace {
        self.mode.front_face()
    }

    fn chase_view(&self, rocket: &RocketPose) -> Matrix4<f32> {
        let eye = Vector3::new(rocket.x, rocket.y, rocket.z) + self.config.chase_offset;
        Matrix4::from_angle_x(self.config.chase_tilt) * Matrix4::from_translation(-eye)
    }

    fn ground_view(&self, rocket: &RocketPose) -> Matrix4<f32> {
        let eye = self.config.ground_eye;
        let target = Point3::new(rocket.x, rocket.y, rocket.z);

        look_at_basis(eye, target, Vector3::unit_y())
            .or_else(|| look_at_basis(eye, target, Vector3::unit_z()))
            .map(|basis| basis.view_matrix())
            .unwrap_or_else(|| {
                warn!("Ground camera eye coincides with the rocket; holding a fixed view");
                // Mirrored like the look-at basis so the Cw pipeline still culls back faces
                Matrix4::from_nonuniform_scale(-1.0, 1.0, 1.0)
                    * Matrix4::from_translation(-Vector3::new(eye.x, eye.y, eye.z))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Deg, InnerSpace, SquareMatrix, Vector4};

    fn camera() -> ViewerCamera {
        ViewerCamera::new(CameraConfig::default(), 1280, 720)
    }

    fn rocket_at(x: f32, y: f32) -> RocketPose {
        RocketPose {
            x,
            y,
            z: -10.0,
            heading: Deg(0.0),
        }
    }

    #[test]
    fn modes_cycle_through_all_three() {
        let mut camera = camera();
        assert_eq!(camera.mode(), CameraMode::Free);
        assert_eq!(camera.cycle_mode(), CameraMode::Chase);
        assert_eq!(camera.cycle_mode(), CameraMode::GroundFixed);
        assert_eq!(camera.cycle_mode(), CameraMode::Free);
    }

    #[test]
    fn only_ground_mode_flips_winding() {
        assert_eq!(CameraMode::Free.front_face(), wgpu::FrontFace::Ccw);
        assert_eq!(CameraMode::Chase.front_face(), wgpu::FrontFace::Ccw);
        assert_eq!(CameraMode::GroundFixed.front_face(), wgpu::FrontFace::Cw);
    }

    #[test]
    fn free_forward_moves_along_view() {
        let mut camera = camera();
        let start = camera.free().position;
        let held = HeldControls {
            forward: true,
            ..Default::default()
        };

        camera.advance(&held, 1.0);
        let moved = camera.free().position - start;
        assert_relative_eq!(moved.z, -1.5, epsilon = 1e-5);
        assert_relative_eq!(moved.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn boost_and_brake_scale_movement_once() {
        let mut camera = camera();
        let start = camera.free().position;
        let held = HeldControls {
            up: true,
            boost: true,
            ..Default::default()
        };
        camera.advance(&held, 0.5);
        assert_relative_eq!(camera.free().position.y - start.y, 1.5 * 4.0 * 0.5, epsilon = 1e-5);

        let start = camera.free().position;
        let held = HeldControls {
            right: true,
            brake: true,
            ..Default::default()
        };
        camera.advance(&held, 1.0);
        assert_relative_eq!(camera.free().position.x - start.x, 1.5 * 0.2, epsilon = 1e-5);
    }

    #[test]
    fn free_view_looks_down_forward() {
        let mut camera = camera();
        camera.free.phi = 0.7;
        camera.free.theta = 0.3;

        let eye = camera.free().position;
        let ahead = eye + camera.free().forward() * 4.0;
        let in_view = camera.free().view_matrix() * Vector4::new(ahead.x, ahead.y, ahead.z, 1.0);

        assert_relative_eq!(in_view.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(in_view.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(in_view.z, -4.0, epsilon = 1e-4);
        assert_relative_eq!(camera.free().right().dot(camera.free().forward()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn mouse_look_requires_toggle() {
        let mut camera = camera();
        let center = (640.0, 360.0);

        assert_eq!(camera.cursor_moved((700.0, 360.0), center), None);
        assert_eq!(camera.free().phi, 0.0);

        assert!(camera.toggle_mouse_look(center));
        let warp = camera.cursor_moved((650.0, 340.0), center);

        assert_eq!(warp, Some(center));
        assert_relative_eq!(camera.free().phi, 0.1, epsilon = 1e-6);
        assert_relative_eq!(camera.free().theta, -0.2, epsilon = 1e-6);

        assert!(!camera.toggle_mouse_look(center));
    }

    #[test]
    fn small_cursor_motion_is_not_recentred() {
        let mut camera = camera();
        let center = (640.0, 360.0);
        camera.toggle_mouse_look(center);

        assert_eq!(camera.cursor_moved((641.0, 360.0), center), None);
        assert_relative_eq!(camera.free().phi, 0.01, epsilon = 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        let center = (640.0, 360.0);
        camera.toggle_mouse_look(center);

        for _ in 0..10 {
            camera.cursor_moved((640.0, 2000.0), center);
        }
        assert_relative_eq!(camera.free().theta, FRAC_PI_2);
    }

    #[test]
    fn chase_tracks_rocket() {
        let mut camera = camera();
        camera.cycle_mode();

        let a = camera.view_matrix(&rocket_at(0.0, 1.0)) * Vector4::new(0.0, 1.0, -10.0, 1.0);
        let b = camera.view_matrix(&rocket_at(-5.0, 4.0)) * Vector4::new(-5.0, 4.0, -10.0, 1.0);

        for i in 0..4 {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn ground_view_centres_rocket() {
        let mut camera = camera();
        camera.cycle_mode();
        camera.cycle_mode();

        let rocket = rocket_at(-3.0, 6.0);
        let clip = camera.build_view_projection_matrix(&rocket) * Vector4::new(-3.0, 6.0, -10.0, 1.0);

        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-4);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-4);
        assert!(clip.z / clip.w > 0.0 && clip.z / clip.w < 1.0);
    }

    #[test]
    fn ground_view_survives_rocket_at_eye() {
        let config = CameraConfig::default().with_ground_eye(Point3::new(0.0, 1.0, -10.0));
        let mut camera = ViewerCamera::new(config, 800, 600);
        camera.cycle_mode();
        camera.cycle_mode();

        let view = camera.view_matrix(&rocket_at(0.0, 1.0));
        assert!(view.x.x.is_finite());
    }

    #[test]
    fn ground_views_are_always_mirrored() {
        let config = CameraConfig::default().with_ground_eye(Point3::new(0.0, 1.0, -10.0));
        let mut camera = ViewerCamera::new(config, 800, 600);
        camera.cycle_mode();
        camera.cycle_mode();
        assert_eq!(camera.front_face(), wgpu::FrontFace::Cw);

        let tracking = camera.view_matrix(&rocket_at(4.0, 6.0));
        assert!(tracking.determinant() < 0.0);

        let fallback = camera.view_matrix(&rocket_at(0.0, 1.0));
        assert!(fallback.determinant() < 0.0);
        let origin = fallback * Vector4::new(0.0, 1.0, -10.0, 1.0);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-5);
    }
}
