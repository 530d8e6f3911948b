//! Error types for the viewer
//!
//! Two classes of failure:
//!
//! - [`IntegrityError`] - a generator or loader produced malformed mesh data.
//!   This is a bug in the calling code, not a runtime condition.
//! - [`ViewerError`] - the environment failed us (no adapter, missing asset,
//!   unparseable file). Fatal at startup, logged and reported by the binary.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Mesh data that violates the parallel-attribute layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error(
        "mesh data arrays have inconsistent sizes: {positions} positions, {colors} colors, {normals} normals"
    )]
    AttributeLengthMismatch {
        positions: usize,
        colors: usize,
        normals: usize,
    },

    #[error("mesh has {texcoords} texture coordinates for {positions} positions")]
    TexcoordLengthMismatch { positions: usize, texcoords: usize },

    #[error("vertex count {0} is not a whole number of triangles")]
    PartialTriangle(usize),
}

/// Errors that can occur while starting up or loading assets
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("failed to acquire the next frame: {0}")]
    Frame(wgpu::SurfaceError),

    #[error("unable to load OBJ file '{path}': {source}")]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("unable to load texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pipeline '{pipeline}' uses shader '{shader}', which was never loaded")]
    UnknownShader { pipeline: String, shader: String },

    #[error("mesh '{label}' failed integrity check: {source}")]
    Integrity {
        label: String,
        #[source]
        source: IntegrityError,
    },
}

impl ViewerError {
    /// True when the error points at a bug in mesh-producing code rather than
    /// at the environment.
    pub fn is_caller_bug(&self) -> bool {
        matches!(self, ViewerError::Integrity { .. })
    }

    pub fn integrity(label: impl Into<String>, source: IntegrityError) -> Self {
        ViewerError::Integrity {
            label: label.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_errors_are_caller_bugs() {
        let err = ViewerError::integrity("fins", IntegrityError::PartialTriangle(4));
        assert!(err.is_caller_bug());
        assert!(err.to_string().contains("fins"));
    }

    #[test]
    fn load_errors_are_environment_failures() {
        let err = ViewerError::ObjLoad {
            path: PathBuf::from("missing.obj"),
            source: tobj::LoadError::OpenFileFailed,
        };
        assert!(!err.is_caller_bug());
        assert!(err.to_string().contains("missing.obj"));
    }

    #[test]
    fn mismatch_message_lists_all_lengths() {
        let err = IntegrityError::AttributeLengthMismatch {
            positions: 3,
            colors: 2,
            normals: 3,
        };
        assert_eq!(
            err.to_string(),
            "mesh data arrays have inconsistent sizes: 3 positions, 2 colors, 3 normals"
        );
    }
}
