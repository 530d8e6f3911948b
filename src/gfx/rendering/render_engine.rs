//! WGPU-based rendering engine for the viewer
//!
//! Owns the surface, device and queue, the depth buffer, the two scene
//! pipelines and the shared bind groups. One call to
//! [`RenderEngine::render_frame`] clears the frame and issues one draw per
//! [`FrameDraw`].

use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::{Device, TextureFormat};

use crate::{
    config::{LightingConfig, WindowConfig},
    error::{ViewerError, ViewerResult},
    gfx::{
        resources::{global_bindings::GlobalBindings, texture_resource::TextureResource},
        scene::{object::DrawMesh, FrameDraw, Scene},
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Pipeline for counter-clockwise front faces
pub const SCENE_PIPELINE: &str = "Scene";
/// Same pipeline with clockwise front faces, for mirrored views
pub const SCENE_FLIPPED_PIPELINE: &str = "SceneFlipped";

/// Name of the scene pipeline whose winding matches `front_face`
pub fn scene_pipeline_for(front_face: wgpu::FrontFace) -> &'static str {
    match front_face {
        wgpu::FrontFace::Ccw => SCENE_PIPELINE,
        wgpu::FrontFace::Cw => SCENE_FLIPPED_PIPELINE,
    }
}

/// Present mode for the requested vsync setting
pub fn present_mode_for(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Prefers a non-sRGB format; shading happens directly in output space
pub fn pick_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Surface, device and the two scene pipelines behind one draw call per frame
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    white_group: wgpu::BindGroup,
    scene_texture_group: Option<wgpu::BindGroup>,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Sets up the GPU for `window` at `width` x `height` physical pixels
    ///
    /// Clear color and vsync come from `window_config`. `lighting` is
    /// uploaded once and never changes afterwards.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        window_config: &WindowConfig,
        lighting: &LightingConfig,
    ) -> ViewerResult<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter '{}' ({:?}, {:?} backend, driver {} {})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend,
            adapter_info.driver,
            adapter_info.driver_info
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    // Terrain textures are large; take whatever the adapter offers
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&surface_capabilities.formats)
            .ok_or(ViewerError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode_for(window_config.vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        debug!(
            "Surface configured: {}x{} {:?}, {:?}",
            config.width, config.height, format, config.present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device, lighting);
        let white = TextureResource::white(&device, &queue);
        let white_group = global_bindings.create_texture_group(&device, &white, "White Texture Group");

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        let layouts: Vec<wgpu::BindGroupLayout> = global_bindings
            .bind_group_layouts()
            .into_iter()
            .cloned()
            .collect();
        let scene_config = PipelineConfig::default()
            .with_shader("scene")
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_color_format(format)
            .with_bind_group_layouts(layouts);

        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            scene_config.clone().with_label(SCENE_PIPELINE),
        );
        pipeline_manager.register_pipeline(
            SCENE_FLIPPED_PIPELINE,
            scene_config
                .with_label(SCENE_FLIPPED_PIPELINE)
                .with_front_face(wgpu::FrontFace::Cw),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_bindings,
            white_group,
            scene_texture_group: None,
            clear_color: window_config.clear_color,
        })
    }

    /// Binds `texture` for every draw flagged as textured
    pub fn set_scene_texture(&mut self, texture: &TextureResource) {
        self.scene_texture_group = Some(self.global_bindings.create_texture_group(
            &self.device,
            texture,
            "Scene Texture Group",
        ));
    }

    /// Renders one frame
    ///
    /// `draws` come from [`Scene::frame_draws`]; `front_face` picks the
    /// pipeline so that mirrored cameras cull the same faces as normal ones.
    /// A lost or outdated surface is reconfigured and the frame skipped;
    /// only unrecoverable surface errors are returned.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        draws: &[FrameDraw],
        front_face: wgpu::FrontFace,
    ) -> ViewerResult<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(err) => return Err(ViewerError::Frame(err)),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.global_bindings
            .write_draws(&self.device, &self.queue, draws);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipeline_name = scene_pipeline_for(front_face);
            if let Some(pipeline) = self.pipeline_manager.pipeline(pipeline_name) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.lighting_group(), &[]);

                for (index, draw) in draws.iter().enumerate() {
                    let Some(mesh) = scene.mesh(draw.mesh) else {
                        warn!("Draw {} references unknown mesh {:?}", index, draw.mesh);
                        continue;
                    };

                    let texture_group = match (&self.scene_texture_group, draw.textured) {
                        (Some(group), true) => group,
                        _ => &self.white_group,
                    };

                    render_pass.set_bind_group(
                        1,
                        self.global_bindings.draw_group(),
                        &[self.global_bindings.draw_offset(index)],
                    );
                    render_pass.set_bind_group(2, texture_group, &[]);
                    render_pass.draw_mesh(mesh);
                }
            } else {
                warn!("Pipeline '{}' is missing; drawing nothing", pipeline_name);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (a minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
