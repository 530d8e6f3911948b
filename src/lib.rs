// src/lib.rs
//! Skyward
//!
//! An interactive 3D scene viewer built on wgpu and winit: procedural
//! primitives composed into a rocket on a launchpad, a scripted flight, and
//! free, chase and ground-fixed cameras.

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod gfx;
pub mod simulation;
pub mod state;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SkywardApp;
pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
