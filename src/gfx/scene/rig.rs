//! Rigs: flat tables of parts parented to one root transform
//!
//! There is no hierarchy beyond the single root. Each part's model matrix is
//! `root * local`, recomputed every frame from the live root.

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};

/// Index of a mesh in the scene's mesh table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct RigPart {
    pub label: &'static str,
    pub mesh: MeshId,
    pub local: Matrix4<f32>,
    pub textured: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rig {
    pub name: &'static str,
    pub parts: Vec<RigPart>,
}

impl Rig {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, label: &'static str, mesh: MeshId, local: Matrix4<f32>) -> Self {
        self.parts.push(RigPart {
            label,
            mesh,
            local,
            textured: false,
        });
        self
    }

    pub fn with_textured_part(
        mut self,
        label: &'static str,
        mesh: MeshId,
        local: Matrix4<f32>,
    ) -> Self {
        self.parts.push(RigPart {
            label,
            mesh,
            local,
            textured: true,
        });
        self
    }

    /// One draw per part, in table order
    pub fn evaluate(&self, root: Matrix4<f32>) -> impl Iterator<Item = DrawItem> + '_ {
        self.parts.iter().map(move |part| DrawItem {
            label: part.label,
            mesh: part.mesh,
            model: root * part.local,
            textured: part.textured,
        })
    }
}

/// A part placed in the world for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub label: &'static str,
    pub mesh: MeshId,
    pub model: Matrix4<f32>,
    pub textured: bool,
}

impl DrawItem {
    pub fn to_frame_draw(&self, view_proj: Matrix4<f32>) -> FrameDraw {
        FrameDraw {
            mesh: self.mesh,
            model: self.model,
            proj_view_model: view_proj * self.model,
            normal_matrix: normal_matrix(&self.model),
            textured: self.textured,
        }
    }
}

/// Everything one draw call needs besides the mesh buffer itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDraw {
    pub mesh: MeshId,
    pub model: Matrix4<f32>,
    pub proj_view_model: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub textured: bool,
}

/// Upper 3x3 of the inverse-transpose of `model`
///
/// Singular models (a part scaled to nothing) get the identity.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate());
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}
