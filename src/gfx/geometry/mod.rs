//! # Procedural Geometry Generation
//!
//! This module provides the CPU-side mesh container shared by every generator
//! and loader, plus the generators themselves.
//!
//! ## Supported Primitives
//!
//! - **Cone**: circular base approximated by `subdivisions` steps, flat shaded
//! - **Square cone**: four-sided pyramid on a unit square footprint
//! - **Cylinder**: unit-radius tube along +X, smooth shaded sides
//! - **Cube**: constant box data at two fixed sizes, no parameters
//!
//! Meshes are not indexed. Every triangle owns three freshly duplicated
//! vertices, so `vertex_count() % 3 == 0` always holds for generated data.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Matrix4, SquareMatrix, Vector3};
//! use skyward::gfx::geometry::{concatenate, make_cone, make_cylinder};
//!
//! let red = Vector3::new(1.0, 0.0, 0.0);
//! let cone = make_cone(false, 4, red, Matrix4::identity());
//! assert_eq!(cone.vertex_count(), 12);
//!
//! let tube = make_cylinder(true, 16, red, Matrix4::identity());
//! let both = concatenate(cone, &tube);
//! assert_eq!(both.vertex_count(), 12 + 192);
//! ```

pub mod cube;
pub mod obj_loader;
pub mod primitives;

pub use cube::{static_cube, CubeColor, CubeSize};
pub use obj_loader::load_wavefront_obj;
pub use primitives::*;

use cgmath::{Vector2, Vector3};

use crate::{error::IntegrityError, gfx::scene::vertex::Vertex3D};

/// Per-vertex attribute streams ready for GPU upload
///
/// `positions`, `colors` and `normals` always have the same length;
/// `tex_coords` is either empty or matches them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<Vector3<f32>>,
    /// Linear RGB colors in [0, 1]
    pub colors: Vec<Vector3<f32>>,
    /// Normal vectors, unit length after any pre-transform
    pub normals: Vec<Vector3<f32>>,
    /// Texture coordinates (u, v), possibly empty
    pub tex_coords: Vec<Vector2<f32>>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in this mesh
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one flat-shaded triangle
    pub fn push_triangle(
        &mut self,
        corners: [Vector3<f32>; 3],
        normal: Vector3<f32>,
        color: Vector3<f32>,
    ) {
        for corner in corners {
            self.positions.push(corner);
            self.normals.push(normal);
            self.colors.push(color);
        }
    }

    /// Checks the parallel-attribute invariant
    ///
    /// Called by the upload step; generators never call it themselves.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        let positions = self.positions.len();
        if positions != self.colors.len() || positions != self.normals.len() {
            return Err(IntegrityError::AttributeLengthMismatch {
                positions,
                colors: self.colors.len(),
                normals: self.normals.len(),
            });
        }

        if !self.tex_coords.is_empty() && self.tex_coords.len() != positions {
            return Err(IntegrityError::TexcoordLengthMismatch {
                positions,
                texcoords: self.tex_coords.len(),
            });
        }

        if positions % 3 != 0 {
            return Err(IntegrityError::PartialTriangle(positions));
        }

        Ok(())
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    ///
    /// Missing texture coordinates become `(0, 0)`.
    pub fn to_vertices(&self) -> Result<Vec<Vertex3D>, IntegrityError> {
        self.validate()?;

        let vertices = (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i].into(),
                color: self.colors[i].into(),
                normal: self.normals[i].into(),
                tex_coords: self
                    .tex_coords
                    .get(i)
                    .map(|&uv| uv.into())
                    .unwrap_or([0.0, 0.0]),
            })
            .collect();

        Ok(vertices)
    }
}

/// Appends `b`'s attribute streams onto `a`'s, keeping vertex order
///
/// No validation happens here; a broken invariant is reported at upload.
/// Texture coordinates are only carried over when both sides have them, so
/// the result never claims partial coverage.
pub fn concatenate(mut a: MeshData, b: &MeshData) -> MeshData {
    let keep_tex_coords = !a.tex_coords.is_empty() && !b.tex_coords.is_empty();

    a.positions.extend_from_slice(&b.positions);
    a.colors.extend_from_slice(&b.colors);
    a.normals.extend_from_slice(&b.normals);

    if keep_tex_coords {
        a.tex_coords.extend_from_slice(&b.tex_coords);
    } else {
        a.tex_coords.clear();
    }

    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    fn white() -> Vector3<f32> {
        Vector3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn concatenate_preserves_order_and_length() {
        let a = make_cone(false, 4, white(), Matrix4::identity());
        let b = make_square_cone(true, white(), Matrix4::identity());

        let joined = concatenate(a.clone(), &b);

        assert_eq!(joined.vertex_count(), a.vertex_count() + b.vertex_count());
        assert_eq!(&joined.positions[..a.vertex_count()], &a.positions[..]);
        assert_eq!(&joined.positions[a.vertex_count()..], &b.positions[..]);
        assert_eq!(&joined.normals[a.vertex_count()..], &b.normals[..]);
        joined.validate().expect("joined mesh should stay consistent");
    }

    #[test]
    fn concatenate_is_associative() {
        let a = make_cone(true, 3, white(), Matrix4::identity());
        let b = make_cylinder(false, 5, white(), Matrix4::identity());
        let c = make_square_cone(false, white(), Matrix4::identity());

        let left = concatenate(concatenate(a.clone(), &b), &c);
        let right = concatenate(a, &concatenate(b, &c));

        assert_eq!(left.positions, right.positions);
        assert_eq!(left.colors, right.colors);
        assert_eq!(left.normals, right.normals);
    }

    #[test]
    fn concatenate_with_empty_is_identity() {
        let a = make_cylinder(true, 6, white(), Matrix4::identity());
        let joined = concatenate(a.clone(), &MeshData::new());
        assert_eq!(joined, a);
    }

    #[test]
    fn concatenate_drops_partial_tex_coords() {
        let mut a = make_square_cone(false, white(), Matrix4::identity());
        a.tex_coords = vec![Vector2::new(0.5, 0.5); a.vertex_count()];
        let b = make_square_cone(false, white(), Matrix4::identity());

        let joined = concatenate(a, &b);
        assert!(joined.tex_coords.is_empty());
        assert!(joined.validate().is_ok());
    }

    #[test]
    fn validate_reports_mismatched_colors() {
        let mut mesh = make_cone(false, 3, white(), Matrix4::identity());
        mesh.colors.pop();

        assert_eq!(
            mesh.validate(),
            Err(IntegrityError::AttributeLengthMismatch {
                positions: 9,
                colors: 8,
                normals: 9,
            })
        );
    }

    #[test]
    fn validate_reports_partial_tex_coords() {
        let mut mesh = make_cone(false, 3, white(), Matrix4::identity());
        mesh.tex_coords = vec![Vector2::new(0.0, 0.0); 2];

        assert_eq!(
            mesh.validate(),
            Err(IntegrityError::TexcoordLengthMismatch {
                positions: 9,
                texcoords: 2,
            })
        );
    }

    #[test]
    fn vertices_default_missing_tex_coords() {
        let mesh = make_square_cone(false, white(), Matrix4::identity());
        let vertices = mesh.to_vertices().expect("generated mesh is valid");

        assert_eq!(vertices.len(), 12);
        assert!(vertices.iter().all(|v| v.tex_coords == [0.0, 0.0]));
        assert_eq!(vertices[0].color, [1.0, 1.0, 1.0]);
    }
}
