//! # Primitive Shape Generation
//!
//! Parametric solids used to assemble the rocket and the launchpad. Every
//! generator takes the same shape parameters: an optional cap, a flat color,
//! and a pre-transform applied to each generated vertex.
//!
//! Local frames before the pre-transform:
//!
//! - cone: base circle of radius 1 in the YZ plane at x = 0, apex at (1, 0, 0)
//! - cylinder: unit circles at x = 0 and x = 1
//! - square cone: base square of side 1 centred in the XY plane, apex at (0, 0, 1)
//!
//! The cone applies its pre-transform affinely (w is ignored). The square cone
//! and the cylinder divide by w, so they accept projective pre-transforms.
//! Normals always go through the inverse-transpose of the pre-transform and
//! are re-normalized.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix, Vector3, Vector4};
use log::warn;

use super::MeshData;

/// Generate a cone around the +X axis
///
/// Emits `subdivisions` flat-shaded side triangles, plus `subdivisions` cap
/// triangles when `capped` is set. Fewer than 3 subdivisions yield degenerate
/// triangles; callers enforce the minimum.
pub fn make_cone(
    capped: bool,
    subdivisions: usize,
    color: Vector3<f32>,
    pre_transform: Matrix4<f32>,
) -> MeshData {
    let mut mesh = MeshData::new();
    let apex = Vector3::new(1.0, 0.0, 0.0);

    for i in 0..subdivisions {
        let base1 = unit_circle_point(0.0, i, subdivisions);
        let base2 = unit_circle_point(0.0, i + 1, subdivisions);

        let normal = safe_normalize((apex - base1).cross(base2 - base1));
        mesh.push_triangle([base1, base2, apex], normal, color);
    }

    if capped {
        let center = Vector3::new(0.0, 0.0, 0.0);
        let normal = Vector3::new(-1.0, 0.0, 0.0);

        for i in 0..subdivisions {
            let base1 = unit_circle_point(0.0, i, subdivisions);
            let base2 = unit_circle_point(0.0, i + 1, subdivisions);
            mesh.push_triangle([center, base2, base1], normal, color);
        }
    }

    apply_pre_transform(&mut mesh, &pre_transform, Projection::Affine);
    mesh
}

/// Generate a four-sided pyramid on a unit-footprint square
///
/// Four flat-shaded side triangles, plus a two-triangle base when `capped`.
pub fn make_square_cone(capped: bool, color: Vector3<f32>, pre_transform: Matrix4<f32>) -> MeshData {
    let mut mesh = MeshData::new();

    let apex = Vector3::new(0.0, 0.0, 1.0);
    let base = [
        Vector3::new(-0.5, -0.5, 0.0),
        Vector3::new(0.5, -0.5, 0.0),
        Vector3::new(0.5, 0.5, 0.0),
        Vector3::new(-0.5, 0.5, 0.0),
    ];

    for i in 0..4 {
        let p0 = base[i];
        let p1 = base[(i + 1) % 4];
        let normal = safe_normalize((p1 - p0).cross(apex - p0));
        mesh.push_triangle([p0, p1, apex], normal, color);
    }

    if capped {
        let down = Vector3::new(0.0, 0.0, -1.0);
        mesh.push_triangle([base[0], base[3], base[2]], down, color);
        mesh.push_triangle([base[2], base[1], base[0]], down, color);
    }

    apply_pre_transform(&mut mesh, &pre_transform, Projection::Perspective);
    mesh
}

/// Generate a unit-radius cylinder between x = 0 and x = 1
///
/// Each of the `subdivisions` side segments is a quad split into two
/// triangles whose vertices carry the radial direction at their own angle,
/// so the sides are smooth shaded. Caps are fanned around the axis with
/// constant axial normals.
pub fn make_cylinder(
    capped: bool,
    subdivisions: usize,
    color: Vector3<f32>,
    pre_transform: Matrix4<f32>,
) -> MeshData {
    let mut mesh = MeshData::new();

    for i in 0..subdivisions {
        let prev = unit_circle_point(0.0, i, subdivisions);
        let curr = unit_circle_point(0.0, i + 1, subdivisions);
        let prev_top = unit_circle_point(1.0, i, subdivisions);
        let curr_top = unit_circle_point(1.0, i + 1, subdivisions);

        let n_prev = radial_normal(prev);
        let n_curr = radial_normal(curr);

        push_vertex(&mut mesh, prev, n_prev, color);
        push_vertex(&mut mesh, curr, n_curr, color);
        push_vertex(&mut mesh, prev_top, n_prev, color);

        push_vertex(&mut mesh, curr, n_curr, color);
        push_vertex(&mut mesh, curr_top, n_curr, color);
        push_vertex(&mut mesh, prev_top, n_prev, color);
    }

    if capped {
        let center_bottom = Vector3::new(0.0, 0.0, 0.0);
        let normal_bottom = Vector3::new(-1.0, 0.0, 0.0);
        let center_top = Vector3::new(1.0, 0.0, 0.0);
        let normal_top = Vector3::new(1.0, 0.0, 0.0);

        for i in 0..subdivisions {
            let v1 = unit_circle_point(0.0, i, subdivisions);
            let v2 = unit_circle_point(0.0, i + 1, subdivisions);
            mesh.push_triangle([center_bottom, v2, v1], normal_bottom, color);

            let v1_top = unit_circle_point(1.0, i, subdivisions);
            let v2_top = unit_circle_point(1.0, i + 1, subdivisions);
            mesh.push_triangle([center_top, v1_top, v2_top], normal_top, color);
        }
    }

    apply_pre_transform(&mut mesh, &pre_transform, Projection::Perspective);
    mesh
}

/// Whether transformed positions are divided by their w component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Affine,
    Perspective,
}

fn apply_pre_transform(mesh: &mut MeshData, pre_transform: &Matrix4<f32>, projection: Projection) {
    let normal_transform = inverse_transpose(pre_transform);

    for p in mesh.positions.iter_mut() {
        let t = pre_transform * p.extend(1.0);
        *p = match projection {
            Projection::Affine => t.truncate(),
            Projection::Perspective => t.truncate() / t.w,
        };
    }

    for n in mesh.normals.iter_mut() {
        let t = normal_transform * Vector4::new(n.x, n.y, n.z, 0.0);
        *n = safe_normalize(t.truncate());
    }
}

/// Inverse-transpose of `m`, falling back to identity for singular input
pub fn inverse_transpose(m: &Matrix4<f32>) -> Matrix4<f32> {
    match m.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            warn!("singular transform has no inverse; using identity for normals");
            Matrix4::identity()
        }
    }
}

fn unit_circle_point(x: f32, step: usize, subdivisions: usize) -> Vector3<f32> {
    let angle = step as f32 / subdivisions as f32 * 2.0 * PI;
    Vector3::new(x, angle.cos(), angle.sin())
}

fn radial_normal(p: Vector3<f32>) -> Vector3<f32> {
    safe_normalize(Vector3::new(0.0, p.y, p.z))
}

fn push_vertex(mesh: &mut MeshData, position: Vector3<f32>, normal: Vector3<f32>, color: Vector3<f32>) {
    mesh.positions.push(position);
    mesh.normals.push(normal);
    mesh.colors.push(color);
}

/// Normalizes `v`, leaving zero-length vectors (from degenerate triangles) at zero
fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    let length = v.magnitude();
    if length > f32::EPSILON {
        v / length
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}
