//! Constant box primitive used for the instrument gauge
//!
//! The box is tall and thin (a quarter as wide as it is high) and comes in two
//! fixed sizes and three palette colors. There is no generator: the vertex
//! tables below are the primitive.

use cgmath::Vector3;

use super::MeshData;

/// Which of the two fixed box sizes to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeSize {
    /// 0.125 x 0.5 x 0.125
    Large,
    /// 0.0625 x 0.25 x 0.0625
    Small,
}

impl CubeSize {
    /// Half extents along x, y and z
    pub fn half_extents(self) -> Vector3<f32> {
        match self {
            CubeSize::Large => Vector3::new(0.0625, 0.25, 0.0625),
            CubeSize::Small => Vector3::new(0.03125, 0.125, 0.03125),
        }
    }
}

/// Palette colors the static box is shipped in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeColor {
    Brown,
    Black,
    Gold,
}

impl CubeColor {
    pub fn rgb(self) -> Vector3<f32> {
        match self {
            CubeColor::Brown => Vector3::new(0.4039, 0.3294, 0.2627),
            CubeColor::Black => Vector3::new(0.0, 0.0, 0.0),
            CubeColor::Gold => Vector3::new(0.8039, 0.7020, 0.4019),
        }
    }
}

/// Corner signs per vertex, six vertices per face, counter-clockwise from outside
#[rustfmt::skip]
const CORNERS: [[f32; 3]; 36] = [
    // Top face
    [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0],
    [ 1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    // Front face
    [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    [ 1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
    // Left face
    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0], [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0],
    // Bottom face
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0],
    [-1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // Right face
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // Back face
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0],
    [-1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
];

/// Outward normal per face, in the same order as `CORNERS`
#[rustfmt::skip]
const FACE_NORMALS: [[f32; 3]; 6] = [
    [ 0.0,  1.0,  0.0],
    [ 0.0,  0.0,  1.0],
    [-1.0,  0.0,  0.0],
    [ 0.0, -1.0,  0.0],
    [ 1.0,  0.0,  0.0],
    [ 0.0,  0.0, -1.0],
];

/// Returns the box at `size`, painted `color`
pub fn static_cube(size: CubeSize, color: CubeColor) -> MeshData {
    let half = size.half_extents();
    let rgb = color.rgb();
    let mut mesh = MeshData::new();

    for (i, corner) in CORNERS.iter().enumerate() {
        mesh.positions.push(Vector3::new(
            corner[0] * half.x,
            corner[1] * half.y,
            corner[2] * half.z,
        ));
        mesh.normals.push(FACE_NORMALS[i / 6].into());
        mesh.colors.push(rgb);
    }

    mesh
}
