//! Viewer configuration
//!
//! Everything here is read once at startup. Lighting in particular is never
//! reloaded: the values are written to the GPU a single time.

use std::path::PathBuf;

use cgmath::{Deg, InnerSpace, Point3, Vector3};
use log::info;

pub const ASSET_DIR_ENV: &str = "SKYWARD_ASSET_DIR";
pub const VSYNC_ENV: &str = "SKYWARD_VSYNC";

#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub camera: CameraConfig,
    pub rocket: RocketConfig,
    pub lighting: LightingConfig,
}

impl ViewerConfig {
    /// Defaults with the environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(ASSET_DIR_ENV) {
            info!("Asset directory overridden to '{}'", dir);
            config.assets.dir = PathBuf::from(dir);
        }

        if let Ok(value) = std::env::var(VSYNC_ENV) {
            config.window.vsync = parse_flag(&value);
        }

        config
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_assets(mut self, assets: AssetPaths) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_rocket(mut self, rocket: RocketConfig) -> Self {
        self.rocket = rocket;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Present with `Fifo` instead of `AutoNoVsync`
    pub vsync: bool,
    pub clear_color: wgpu::Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skyward".to_string(),
            width: 1280,
            height: 720,
            vsync: false,
            clear_color: wgpu::Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 1.0,
            },
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

/// Where the terrain model and its texture live
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub dir: PathBuf,
    pub terrain_obj: String,
    pub terrain_texture: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            terrain_obj: "langerso.obj".to_string(),
            terrain_texture: "L3211E-4k.jpg".to_string(),
        }
    }
}

impl AssetPaths {
    pub fn terrain_obj_path(&self) -> PathBuf {
        self.dir.join(&self.terrain_obj)
    }

    pub fn terrain_texture_path(&self) -> PathBuf {
        self.dir.join(&self.terrain_texture)
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_y: Deg<f32>,
    pub near: f32,
    pub far: f32,
    /// World units per second before boost/brake
    pub move_speed: f32,
    pub boost: f32,
    pub brake: f32,
    /// Radians per pixel of cursor travel
    pub mouse_sensitivity: f32,
    /// Chase camera position relative to the rocket
    pub chase_offset: Vector3<f32>,
    /// Downward pitch of the chase camera
    pub chase_tilt: Deg<f32>,
    /// Fixed eye of the ground camera
    pub ground_eye: Point3<f32>,
    /// Where the free camera starts
    pub free_start: Point3<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: Deg(60.0),
            near: 0.1,
            far: 100.0,
            move_speed: 1.5,
            boost: 4.0,
            brake: 0.2,
            mouse_sensitivity: 0.01,
            chase_offset: Vector3::new(0.0, 1.5, 5.0),
            chase_tilt: Deg(15.0),
            ground_eye: Point3::new(6.0, 1.0, -4.0),
            free_start: Point3::new(0.0, 3.0, 5.0),
        }
    }
}

impl CameraConfig {
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_ground_eye(mut self, eye: Point3<f32>) -> Self {
        self.ground_eye = eye;
        self
    }

    pub fn with_chase(mut self, offset: Vector3<f32>, tilt: Deg<f32>) -> Self {
        self.chase_offset = offset;
        self.chase_tilt = tilt;
        self
    }
}

/// Launch point and speeds of the rocket
///
/// The arc shape itself is fixed in [`crate::simulation::rocket`].
#[derive(Debug, Clone, PartialEq)]
pub struct RocketConfig {
    pub initial_x: f32,
    pub initial_y: f32,
    pub launch_z: f32,
    /// Climb rate while ascending, units per second
    pub ascent_rate: f32,
    /// Base horizontal speed while arcing, units per second
    pub glide_speed: f32,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            initial_x: 0.0,
            initial_y: 1.0,
            launch_z: -10.0,
            ascent_rate: 1.0,
            glide_speed: 2.0,
        }
    }
}

impl RocketConfig {
    pub fn with_launch_point(mut self, x: f32, y: f32, z: f32) -> Self {
        self.initial_x = x;
        self.initial_y = y;
        self.launch_z = z;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction towards the light, normalized
    pub direction: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub ambient: Vector3<f32>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, 1.0, -1.0).normalize(),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            ambient: Vector3::new(0.2, 0.2, 0.2),
        }
    }
}

/// Point light with `1 / (constant + linear*d + quadratic*d^2)` falloff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    pub intensity: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn new(position: Point3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            intensity: 1.0,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_attenuation(mut self, constant: f32, linear: f32, quadratic: f32) -> Self {
        self.constant = constant;
        self.linear = linear;
        self.quadratic = quadratic;
        self
    }

    /// Light reaching a point `distance` away, as a fraction of `intensity`
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

pub const POINT_LIGHT_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
}

impl Default for LightingConfig {
    fn default() -> Self {
        // Red, green and blue lamps around the launchpad
        Self {
            directional: DirectionalLight::default(),
            points: [
                PointLight::new(Point3::new(1.0, 1.5, -10.0), Vector3::new(1.0, 0.2, 0.2)),
                PointLight::new(Point3::new(-1.0, 1.5, -10.0), Vector3::new(0.2, 1.0, 0.2)),
                PointLight::new(Point3::new(0.0, 1.5, -11.0), Vector3::new(0.2, 0.2, 1.0)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_viewer_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.move_speed, 1.5);
        assert_eq!(config.camera.boost, 4.0);
        assert_eq!(config.camera.brake, 0.2);
        assert_eq!(config.camera.mouse_sensitivity, 0.01);
        assert_eq!(config.camera.fov_y, Deg(60.0));
        assert_eq!(config.window.title, "Skyward");
    }

    #[test]
    fn asset_paths_join_directory() {
        let assets = AssetPaths {
            dir: PathBuf::from("data"),
            ..Default::default()
        };
        assert_eq!(assets.terrain_obj_path(), PathBuf::from("data/langerso.obj"));
        assert_eq!(
            assets.terrain_texture_path(),
            PathBuf::from("data/L3211E-4k.jpg")
        );
    }

    #[test]
    fn builders_replace_sections() {
        let config = ViewerConfig::default()
            .with_window(WindowConfig::default().with_size(640, 480).with_vsync(true))
            .with_rocket(RocketConfig::default().with_launch_point(2.0, 3.0, -4.0));

        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert!(config.window.vsync);
        assert_eq!(config.rocket.initial_x, 2.0);
        assert_eq!(config.rocket.launch_z, -4.0);
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn point_light_falloff() {
        let light = PointLight::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .with_attenuation(1.0, 0.5, 0.25);

        assert_relative_eq!(light.attenuation(0.0), 1.0);
        assert_relative_eq!(light.attenuation(2.0), 1.0 / 3.0);
    }

    #[test]
    fn directional_light_is_normalized() {
        assert_relative_eq!(DirectionalLight::default().direction.magnitude(), 1.0);
    }
}
