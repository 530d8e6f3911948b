//! GPU-resident meshes
//!
//! A [`GpuMesh`] is the upload of one [`MeshData`]: a single interleaved
//! vertex buffer plus its vertex count. Meshes are created once at load time
//! and drawn non-indexed every frame.

use log::debug;

use crate::{
    error::{ViewerError, ViewerResult},
    gfx::geometry::MeshData,
};

pub struct GpuMesh {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GpuMesh {
    /// Validates `mesh` and copies it into a new vertex buffer
    ///
    /// Fails with [`ViewerError::Integrity`] when the attribute streams
    /// disagree in length.
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> ViewerResult<Self> {
        let vertices = mesh
            .to_vertices()
            .map_err(|source| ViewerError::integrity(label, source))?;

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles",
            label,
            vertices.len(),
            vertices.len() / 3
        );

        Ok(Self {
            label: label.to_string(),
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        })
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        if mesh.vertex_count == 0 {
            return;
        }
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.draw(0..mesh.vertex_count, 0..1);
    }
}
