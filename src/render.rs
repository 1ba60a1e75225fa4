use crate::constants::{DECOR_SKY_COLOR, LINE_COLOR, SKY_COLOR};
use crate::sprites::SpriteAtlas;
use flock_core::{BirdInstance, SpriteGlobals};
use glam::{Mat4, Vec3};
use web_sys as web;

mod birds;
mod helpers;
mod lines;

use birds::{create_birds_resources, BirdsResources, SpriteUniforms};
use lines::{create_lines_resources, pack_segments, LineUniforms, LinesResources};

/// Everything the renderer needs from one engine frame.
pub struct SceneFrame<'s> {
    pub view_proj: Mat4,
    pub time: f32,
    pub globals: SpriteGlobals,
    pub instances: &'s [BirdInstance],
    /// Connector segments, `None` while lines are hidden.
    pub segments: Option<&'s [[Vec3; 2]]>,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    birds: BirdsResources,
    lines: LinesResources,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        atlas: &SpriteAtlas,
        bird_capacity: usize,
        line_capacity: usize,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = helpers::create_depth_view(&device, config.width, config.height);
        let birds = create_birds_resources(&device, &queue, format, atlas, bird_capacity);
        let lines = create_lines_resources(&device, format, line_capacity);
        log::info!(
            "[render] {:?} surface {}x{}, {} bird slots, {} line slots",
            format,
            config.width,
            config.height,
            bird_capacity,
            line_capacity
        );

        let mut state = Self {
            surface,
            device,
            queue,
            depth_view,
            birds,
            lines,
            width: config.width,
            height: config.height,
            config,
            clear_color: wgpu::Color::BLACK,
        };
        state.set_decor_reveal(0.0);
        Ok(state)
    }

    /// Blend the sky toward its scenery tint as the decor is revealed.
    pub fn set_decor_reveal(&mut self, reveal: f32) {
        let k = reveal.clamp(0.0, 1.0) as f64;
        let mix = |i: usize| SKY_COLOR[i] + (DECOR_SKY_COLOR[i] - SKY_COLOR[i]) * k;
        self.clear_color = wgpu::Color {
            r: mix(0),
            g: mix(1),
            b: mix(2),
            a: 1.0,
        };
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = helpers::create_depth_view(&self.device, width, height);
        }
    }

    pub fn render(&mut self, scene: &SceneFrame<'_>) -> Result<(), wgpu::SurfaceError> {
        let view_proj = scene.view_proj.to_cols_array_2d();
        let sprite_uniforms = SpriteUniforms {
            view_proj,
            time: scene.time,
            visual_scale: scene.globals.visual_scale,
            facing_flip: scene.globals.facing_flip,
            audio_spin: scene.globals.audio_spin,
            y_rotation: scene.globals.y_rotation,
            opacity: 1.0,
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(
            &self.birds.uniform_buffer,
            0,
            bytemuck::bytes_of(&sprite_uniforms),
        );
        let bird_count = scene.instances.len().min(self.birds.capacity);
        self.queue.write_buffer(
            &self.birds.instance_buffer,
            0,
            bytemuck::cast_slice(&scene.instances[..bird_count]),
        );

        let line_vertices = scene
            .segments
            .map(|s| pack_segments(s, self.lines.capacity))
            .unwrap_or_default();
        if !line_vertices.is_empty() {
            let line_uniforms = LineUniforms {
                view_proj,
                color: LINE_COLOR,
            };
            self.queue.write_buffer(
                &self.lines.uniform_buffer,
                0,
                bytemuck::bytes_of(&line_uniforms),
            );
            self.queue.write_buffer(
                &self.lines.vertex_buffer,
                0,
                bytemuck::cast_slice(&line_vertices),
            );
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if bird_count > 0 {
                rpass.set_pipeline(&self.birds.pipeline);
                rpass.set_bind_group(0, &self.birds.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.birds.instance_buffer.slice(..));
                rpass.draw(0..6, 0..bird_count as u32);
            }
            if !line_vertices.is_empty() {
                rpass.set_pipeline(&self.lines.pipeline);
                rpass.set_bind_group(0, &self.lines.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.lines.vertex_buffer.slice(..));
                rpass.draw(0..line_vertices.len() as u32, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
