use cgmath::{InnerSpace, Matrix3, Matrix4, Point3, Vector3};

/// Remaps OpenGL clip depth (-1..1) onto wgpu's (0..1)
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const DEGENERATE_EPSILON: f32 = 1e-6;

/// Orthonormal camera frame produced by [`look_at_basis`]
///
/// `right` is `up_hint x forward`, which makes the frame left-handed relative
/// to `look_at_rh`. Views built from it mirror the image horizontally, so
/// geometry drawn through them must use clockwise front faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAtBasis {
    pub eye: Point3<f32>,
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl LookAtBasis {
    /// World-to-camera matrix with rows `right`, `up`, `-forward`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Vector3::new(self.eye.x, self.eye.y, self.eye.z);
        let (r, u, f) = (self.right, self.up, self.forward);

        #[rustfmt::skip]
        let view = Matrix4::new(
            r.x, u.x, -f.x, 0.0,
            r.y, u.y, -f.y, 0.0,
            r.z, u.z, -f.z, 0.0,
            -r.dot(eye), -u.dot(eye), f.dot(eye), 1.0,
        );
        view
    }
}

/// Builds a camera frame at `eye` facing `target`
///
/// Returns `None` when the eye sits on the target or the view direction is
/// parallel to `world_up`; no frame exists in either case.
pub fn look_at_basis(
    eye: Point3<f32>,
    target: Point3<f32>,
    world_up: Vector3<f32>,
) -> Option<LookAtBasis> {
    let to_target = target - eye;
    if to_target.magnitude2() < DEGENERATE_EPSILON {
        return None;
    }
    let forward = to_target.normalize();

    let right = world_up.cross(forward);
    if right.magnitude2() < DEGENERATE_EPSILON {
        return None;
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Some(LookAtBasis {
        eye,
        forward,
        right,
        up,
    })
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

/// Lays a 3x3 out as three 16-byte columns, as WGSL `mat3x3<f32>` expects
pub fn convert_matrix3_to_padded(matrix3: Matrix3<f32>) -> [[f32; 4]; 3] {
    let mut result = [[0.0; 4]; 3];
    for (column, out) in result.iter_mut().enumerate() {
        out[0] = matrix3[column][0];
        out[1] = matrix3[column][1];
        out[2] = matrix3[column][2];
    }
    result
}
