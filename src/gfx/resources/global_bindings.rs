//! Uniform bindings shared by every draw
//!
//! Three bind groups feed the scene shader:
//!
//! - group 0: lighting, written once at startup
//! - group 1: per-draw matrices, one dynamic-offset slot per draw
//! - group 2: the texture for the current draw (white when untextured)

use crate::{
    config::{LightingConfig, PointLight, POINT_LIGHT_COUNT},
    gfx::{
        camera::camera_utils::{convert_matrix3_to_padded, convert_matrix4_to_array},
        resources::texture_resource::TextureResource,
        scene::FrameDraw,
    },
    wgpu_utils::{binding_types, DynamicUniformBuffer, UniformBuffer},
};

/// Initial per-draw slots; grows on demand
const INITIAL_DRAW_CAPACITY: usize = 32;

/// MUST match `DirectionalLight` in scene.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    direction: [f32; 4],
    diffuse: [f32; 4],
    ambient: [f32; 4],
}

/// MUST match `PointLight` in scene.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    position: [f32; 3],
    intensity: f32,
    color: [f32; 3],
    constant: f32,
    linear: f32,
    quadratic: f32,
    _padding: [f32; 2],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            intensity: light.intensity,
            color: light.color.into(),
            constant: light.constant,
            linear: light.linear,
            quadratic: light.quadratic,
            _padding: [0.0; 2],
        }
    }
}

/// MUST match `Lighting` in scene.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    directional: DirectionalLightUniform,
    points: [PointLightUniform; POINT_LIGHT_COUNT],
}

impl LightingUniform {
    pub fn from_config(config: &LightingConfig) -> Self {
        let d = &config.directional;
        Self {
            directional: DirectionalLightUniform {
                direction: d.direction.extend(0.0).into(),
                diffuse: d.diffuse.extend(1.0).into(),
                ambient: d.ambient.extend(1.0).into(),
            },
            points: [
                PointLightUniform::from(&config.points[0]),
                PointLightUniform::from(&config.points[1]),
                PointLightUniform::from(&config.points[2]),
            ],
        }
    }
}

/// MUST match `DrawUniforms` in scene.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    proj_view_model: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 3],
    use_texture: u32,
    _padding: [u32; 3],
}

impl From<&FrameDraw> for DrawUniform {
    fn from(draw: &FrameDraw) -> Self {
        Self {
            proj_view_model: convert_matrix4_to_array(draw.proj_view_model),
            model: convert_matrix4_to_array(draw.model),
            normal_matrix: convert_matrix3_to_padded(draw.normal_matrix),
            use_texture: draw.textured as u32,
            _padding: [0; 3],
        }
    }
}

pub type LightingUBO = UniformBuffer<LightingUniform>;

/// Owns the bind group layouts and the lighting/per-draw bind groups
pub struct GlobalBindings {
    lighting_layout: wgpu::BindGroupLayout,
    draw_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    _lighting_ubo: LightingUBO,
    lighting_group: wgpu::BindGroup,
    draws: DynamicUniformBuffer<DrawUniform>,
    draw_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the layouts and uploads `lighting`, which never changes afterwards
    pub fn new(device: &wgpu::Device, lighting: &LightingConfig) -> Self {
        let lighting_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lighting Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::FRAGMENT,
                binding_types::uniform(),
            )],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                binding_types::uniform_dynamic(std::mem::size_of::<DrawUniform>() as u64),
            )],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                binding_types::entry(0, wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
                binding_types::entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let lighting_ubo = LightingUBO::new_with_data(device, &LightingUniform::from_config(lighting));
        let lighting_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lighting Bind Group"),
            layout: &lighting_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lighting_ubo.binding_resource(),
            }],
        });

        let draws = DynamicUniformBuffer::new(device, INITIAL_DRAW_CAPACITY);
        let draw_group = Self::create_draw_group(device, &draw_layout, &draws);

        Self {
            lighting_layout,
            draw_layout,
            texture_layout,
            _lighting_ubo: lighting_ubo,
            lighting_group,
            draws,
            draw_group,
        }
    }

    fn create_draw_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        draws: &DynamicUniformBuffer<DrawUniform>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: draws.binding_resource(),
            }],
        })
    }

    /// Bind group layouts in group order, for pipeline creation
    pub fn bind_group_layouts(&self) -> [&wgpu::BindGroupLayout; 3] {
        [&self.lighting_layout, &self.draw_layout, &self.texture_layout]
    }

    /// Builds a group-2 bind group for `texture`
    pub fn create_texture_group(
        &self,
        device: &wgpu::Device,
        texture: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Uploads this frame's per-draw uniforms, in draw order
    pub fn write_draws(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[FrameDraw]) {
        let uniforms: Vec<DrawUniform> = draws.iter().map(DrawUniform::from).collect();
        if self.draws.write(device, queue, &uniforms) {
            log::debug!("Per-draw uniform buffer grown to {} slots", uniforms.len());
            self.draw_group = Self::create_draw_group(device, &self.draw_layout, &self.draws);
        }
    }

    pub fn lighting_group(&self) -> &wgpu::BindGroup {
        &self.lighting_group
    }

    pub fn draw_group(&self) -> &wgpu::BindGroup {
        &self.draw_group
    }

    /// Dynamic offset selecting draw `index` in [`Self::draw_group`]
    pub fn draw_offset(&self, index: usize) -> u32 {
        self.draws.offset(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix3, Matrix4, SquareMatrix};
    use crate::gfx::scene::MeshId;

    #[test]
    fn uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 48);
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 48);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 192);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 192);
    }

    #[test]
    fn lighting_copies_config() {
        let config = LightingConfig::default();
        let uniform = LightingUniform::from_config(&config);

        assert_eq!(uniform.directional.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(uniform.directional.direction[3], 0.0);
        let color: [f32; 3] = config.points[1].color.into();
        assert_eq!(uniform.points[1].color, color);
        assert_eq!(uniform.points[2].quadratic, config.points[2].quadratic);
    }

    #[test]
    fn draw_uniform_carries_texture_flag() {
        let draw = FrameDraw {
            mesh: MeshId(0),
            model: Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0)),
            proj_view_model: Matrix4::from_scale(2.0),
            normal_matrix: Matrix3::identity(),
            textured: true,
        };
        let uniform = DrawUniform::from(&draw);

        assert_eq!(uniform.use_texture, 1);
        assert_eq!(uniform.proj_view_model[0][0], 2.0);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.normal_matrix[1], [0.0, 1.0, 0.0, 0.0]);
    }
}
