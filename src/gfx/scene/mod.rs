//! # Scene Composition Module
//!
//! This module places every mesh in the world for the current frame. There is
//! no retained scene graph: each frame the live rocket pose is turned into a
//! fixed sequence of draws.
//!
//! ## Key Components
//!
//! - [`Rig`] - a table of (local transform, mesh) parts under one root
//! - [`SceneLayout`] - the four rigs (rocket, gauge, pointer, ground) and their roots
//! - [`Scene`] - a layout plus the uploaded [`GpuMesh`] for each mesh
//! - [`Vertex3D`] - interleaved vertex format shared by every mesh
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Matrix4, SquareMatrix, Vector3};
//! use skyward::config::RocketConfig;
//! use skyward::gfx::geometry::make_square_cone;
//! use skyward::gfx::scene::SceneLayout;
//! use skyward::simulation::RocketFlight;
//!
//! let terrain = make_square_cone(false, Vector3::new(1.0, 1.0, 1.0), Matrix4::identity());
//! let (layout, library) = SceneLayout::assemble(&RocketConfig::default(), terrain);
//!
//! let flight = RocketFlight::new(RocketConfig::default());
//! let draws = layout.draw_items(&flight.pose());
//! assert!(draws.iter().all(|item| library.get(item.mesh).is_some()));
//! ```

pub mod object;
pub mod rig;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawMesh, GpuMesh};
pub use rig::{normal_matrix, DrawItem, FrameDraw, MeshId, Rig, RigPart};
pub use scene::{MeshLibrary, Scene, SceneLayout};
pub use vertex::Vertex3D;
