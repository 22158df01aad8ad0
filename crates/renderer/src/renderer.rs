//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{Camera, CameraUniform, LightUniform, Lighting},
    mesh::Mesh,
    pipeline::{
        create_camera_bind_group_layout, create_line_pipeline, create_mesh_pipeline, create_star_pipeline,
        create_texture_bind_group_layout, MeshPass,
    },
    texture::{texture_bind_group, Texture},
    vertex::{InstanceData, LineVertex, StarInstance},
    RenderError,
};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Mesh instances that fit in the shared per-frame instance buffer.
pub const MAX_INSTANCES: u32 = 16384;
/// Star sprites that fit in the star buffer.
pub const MAX_STARS: u32 = 16384;

/// Index into the renderer's texture table. Id 0 is the white fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

impl TextureId {
    pub const WHITE: TextureId = TextureId(0);
}

/// Swap-chain image and encoder for one frame.
pub struct Frame {
    output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

struct TextureSlot {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    // Pipelines
    mesh_pipelines: HashMap<MeshPass, wgpu::RenderPipeline>,
    star_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    // Bind groups and layouts
    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,
    light_buffer: wgpu::Buffer,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    textures: Vec<TextureSlot>,

    // Depth buffer
    depth_texture: Texture,

    // Instance buffer for batched rendering
    instance_buffer: wgpu::Buffer,
    /// Tracks current write offset into instance_buffer per frame.
    /// Each draw writes to a unique region so `queue.write_buffer` calls
    /// don't overwrite each other (all writes execute before command buffer).
    frame_instance_offset: u32,
    star_buffer: wgpu::Buffer,

    destroyed: bool,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Buffer"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let texture_bind_group_layout = create_texture_bind_group_layout(&device);

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let white = Texture::white_pixel(&device, &queue);
        let white_bind_group = texture_bind_group(&device, &texture_bind_group_layout, &white, "White Bind Group");
        let textures = vec![TextureSlot {
            texture: white,
            bind_group: white_bind_group,
        }];

        let mesh_pipelines: HashMap<MeshPass, wgpu::RenderPipeline> = MeshPass::ALL
            .into_iter()
            .map(|pass| {
                let pipeline = create_mesh_pipeline(
                    &device,
                    config.format,
                    &camera_bind_group_layout,
                    &texture_bind_group_layout,
                    pass,
                );
                (pass, pipeline)
            })
            .collect();
        let star_pipeline = create_star_pipeline(&device, config.format, &camera_bind_group_layout);
        let line_pipeline = create_line_pipeline(&device, config.format, &camera_bind_group_layout);

        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<InstanceData>() * MAX_INSTANCES as usize) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let star_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Star Buffer"),
            size: (std::mem::size_of::<StarInstance>() * MAX_STARS as usize) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            mesh_pipelines,
            star_pipeline,
            line_pipeline,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            light_buffer,
            texture_bind_group_layout,
            textures,
            depth_texture,
            instance_buffer,
            frame_instance_offset: 0,
            star_buffer,
            destroyed: false,
        })
    }

    /// Handle window resize. Zero-sized (minimised) windows keep the old surface.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if self.destroyed || new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture.destroy();
        self.depth_texture =
            Texture::create_depth_texture(&self.device, self.config.width, self.config.height, "Depth Texture");
    }

    /// Upload an sRGB RGBA8 image. If the device refuses it the white fallback is
    /// returned instead and a warning is logged.
    pub fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8], label: &str) -> TextureId {
        match Texture::from_rgba(&self.device, &self.queue, width, height, rgba, label) {
            Ok(texture) => {
                let bind_group = texture_bind_group(&self.device, &self.texture_bind_group_layout, &texture, label);
                self.textures.push(TextureSlot { texture, bind_group });
                TextureId(self.textures.len() - 1)
            }
            Err(e) => {
                log::warn!("Texture '{}' refused ({}), using white", label, e);
                TextureId::WHITE
            }
        }
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera_uniform.update(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[self.camera_uniform]));
    }

    pub fn update_lighting(&mut self, lighting: &Lighting) {
        let uniform = LightUniform::from(lighting);
        self.queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Acquire the next swap-chain image and clear colour and depth.
    pub fn begin_frame(&mut self) -> Result<Frame, RenderError> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        self.frame_instance_offset = 0;
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                // Reconfigure so the next frame has a valid surface.
                self.surface.configure(&self.device, &self.config);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        Ok(Frame { output, view, encoder })
    }

    fn load_pass<'a>(
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        depth: &'a wgpu::TextureView,
        label: &'a str,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Render meshes with instancing, loading existing frame content (no clear).
    pub fn draw_meshes(
        &mut self,
        frame: &mut Frame,
        mesh: &Mesh,
        pass: MeshPass,
        texture: TextureId,
        instances: &[InstanceData],
    ) {
        if instances.is_empty() {
            return;
        }

        // Allocate a unique region in the instance buffer for this draw call
        let offset = self.frame_instance_offset;
        let remaining = MAX_INSTANCES.saturating_sub(offset) as usize;
        let instance_count = instances.len().min(remaining);
        if instance_count == 0 {
            log::warn!("Instance buffer full, dropping {} instances", instances.len());
            return;
        }

        let byte_offset = (offset as usize * std::mem::size_of::<InstanceData>()) as u64;
        self.queue.write_buffer(
            &self.instance_buffer,
            byte_offset,
            bytemuck::cast_slice(&instances[..instance_count]),
        );
        self.frame_instance_offset = offset + instance_count as u32;

        let Some(pipeline) = self.mesh_pipelines.get(&pass) else {
            return;
        };
        let bind_group = &self
            .textures
            .get(texture.0)
            .unwrap_or(&self.textures[TextureId::WHITE.0])
            .bind_group;

        let mut render_pass = Self::load_pass(&mut frame.encoder, &frame.view, &self.depth_texture.view, "Mesh Pass");
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.num_indices, 0, offset..(offset + instance_count as u32));
    }

    /// Draw every star sprite in one instanced call.
    pub fn draw_stars(&mut self, frame: &mut Frame, stars: &[StarInstance]) {
        let count = stars.len().min(MAX_STARS as usize);
        if count == 0 {
            return;
        }
        self.queue
            .write_buffer(&self.star_buffer, 0, bytemuck::cast_slice(&stars[..count]));

        let mut render_pass = Self::load_pass(&mut frame.encoder, &frame.view, &self.depth_texture.view, "Star Pass");
        render_pass.set_pipeline(&self.star_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.star_buffer.slice(..));
        render_pass.draw(0..6, 0..count as u32);
    }

    /// Draw a segment list (pairs of vertices).
    pub fn draw_lines(&mut self, frame: &mut Frame, vertices: &[LineVertex]) {
        if vertices.len() < 2 {
            return;
        }
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut render_pass = Self::load_pass(&mut frame.encoder, &frame.view, &self.depth_texture.view, "Line Pass");
        render_pass.set_pipeline(&self.line_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.draw(0..(vertices.len() as u32 & !1), 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, frame: Frame) {
        let Frame { output, encoder, .. } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Release GPU resources. Later frames fail with `RenderError::Destroyed`.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for slot in &self.textures {
            slot.texture.destroy();
        }
        self.depth_texture.destroy();
        self.instance_buffer.destroy();
        self.star_buffer.destroy();
        self.camera_buffer.destroy();
        self.light_buffer.destroy();
        log::info!("Renderer released {} textures", self.textures.len());
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Access the device for mesh creation.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}
