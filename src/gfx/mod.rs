//! # Graphics Module
//!
//! Everything between the simulation state and the pixels on screen.
//!
//! - **Camera System** ([`camera`]) - free, chase and ground-fixed views
//! - **Geometry** ([`geometry`]) - mesh container, procedural primitives, OBJ loading
//! - **Scene Composition** ([`scene`]) - rigs of meshes placed under moving roots
//! - **Rendering Pipeline** ([`rendering`]) - surface, pipelines and draw submission
//! - **Resource Management** ([`resources`]) - textures and shared uniform bindings
//!
//! ## Usage
//!
//! ```no_run
//! use skyward::config::ViewerConfig;
//! use skyward::gfx::camera::ViewerCamera;
//! use skyward::simulation::RocketFlight;
//!
//! let config = ViewerConfig::default();
//! let camera = ViewerCamera::new(config.camera.clone(), 1280, 720);
//! let rocket = RocketFlight::new(config.rocket.clone());
//! let view_proj = camera.build_view_projection_matrix(&rocket.pose());
//! # let _ = view_proj;
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::ViewerCamera;
pub use rendering::render_engine::RenderEngine;
