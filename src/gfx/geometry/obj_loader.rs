//! Wavefront OBJ loading
//!
//! Models are de-indexed into the flat layout every other mesh uses: each
//! index of each (triangulated) face becomes a fresh vertex.

use std::path::Path;

use cgmath::{Vector2, Vector3};
use log::{debug, info};

use super::MeshData;
use crate::error::{ViewerError, ViewerResult};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_TEX_COORD: [f32; 2] = [0.0, 0.0];
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Loads every model in an OBJ file into one flat mesh
///
/// Polygons are triangulated before extraction. Vertices without a normal
/// get `(0, 1, 0)`, vertices without texture coordinates get `(0, 0)`, and
/// every vertex is white since OBJ carries no per-vertex color.
pub fn load_wavefront_obj(path: impl AsRef<Path>) -> ViewerResult<MeshData> {
    let path = path.as_ref();

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| ViewerError::ObjLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut mesh = MeshData::new();
    for model in &models {
        debug!(
            "model '{}': {} indices, {} normals, {} texcoords",
            model.name,
            model.mesh.indices.len(),
            model.mesh.normals.len() / 3,
            model.mesh.texcoords.len() / 2
        );
        append_model(&mut mesh, &model.mesh);
    }

    info!(
        "Loaded '{}': {} models, {} triangles",
        path.display(),
        models.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// De-indexes one tobj mesh onto the end of `out`
///
/// With `single_index` set, normals and texcoords share the position index
/// and are either absent or exactly as long as the positions.
fn append_model(out: &mut MeshData, mesh: &tobj::Mesh) {
    for &index in &mesh.indices {
        let index = index as usize;

        let p = &mesh.positions[index * 3..index * 3 + 3];
        out.positions.push(Vector3::new(p[0], p[1], p[2]));

        let normal = mesh
            .normals
            .get(index * 3..index * 3 + 3)
            .map(|n| [n[0], n[1], n[2]])
            .unwrap_or(DEFAULT_NORMAL);
        out.normals.push(normal.into());

        let tex_coord = mesh
            .texcoords
            .get(index * 2..index * 2 + 2)
            .map(|t| [t[0], t[1]])
            .unwrap_or(DEFAULT_TEX_COORD);
        out.tex_coords.push(Vector2::from(tex_coord));

        out.colors.push(DEFAULT_COLOR.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    fn write_obj(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("skyward_{}_{}.obj", name, std::process::id()));
        fs::write(&path, contents).expect("temp dir is writable");
        path
    }

    #[test]
    fn quad_is_triangulated_and_defaulted() {
        let path = write_obj(
            "quad",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );

        let mesh = load_wavefront_obj(&path).expect("valid OBJ");
        fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.validate().is_ok());
        assert!(mesh.normals.iter().all(|&n| n == Vector3::new(0.0, 1.0, 0.0)));
        assert!(mesh.tex_coords.iter().all(|&t| t == Vector2::new(0.0, 0.0)));
        assert!(mesh.colors.iter().all(|&c| c == Vector3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn normals_and_texcoords_are_carried_over() {
        let path = write_obj(
            "tri",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0.25 0.75\n\
             vn 0 0 1\n\
             f 1/1/1 2/1/1 3/1/1\n",
        );

        let mesh = load_wavefront_obj(&path).expect("valid OBJ");
        fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions[1], Vector3::new(1.0, 0.0, 0.0));
        assert!(mesh.normals.iter().all(|&n| n == Vector3::new(0.0, 0.0, 1.0)));
        assert!(mesh.tex_coords.iter().all(|&t| t == Vector2::new(0.25, 0.75)));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_wavefront_obj("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ViewerError::ObjLoad { .. }));
        assert!(!err.is_caller_bug());
    }
}
