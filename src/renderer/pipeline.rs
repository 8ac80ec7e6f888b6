//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::RenderError;
use super::scene::Scene;
use super::sprite::SpriteLayer;
use super::vertex::{SpriteVertex, Vertex, colors};

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    sprite: SpriteLayer,
    /// Backing store size in device pixels
    pub size: (u32, u32),
    /// Play-field size in CSS pixels, the space the scene is built in
    pub logical_size: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        size: (u32, u32),
        logical_size: (f32, f32),
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sky-flap-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        // Colors are authored as plain sRGB hex values, so skip the sRGB encode
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{}, format: {:?}, alpha: {:?}",
            config.width,
            config.height,
            config.format,
            config.alpha_mode
        );
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Rotated and y-flipped shapes change winding
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder, replaced every frame
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let sprite = SpriteLayer::new(&device, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            sprite,
            size,
            logical_size,
        })
    }

    pub fn resize(&mut self, size: (u32, u32), logical_size: (f32, f32)) {
        if size.0 > 0 && size.1 > 0 {
            self.size = size;
            self.logical_size = logical_size;
            self.config.width = size.0;
            self.config.height = size.1;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size (after `SurfaceError::Lost`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn sprite_ready(&self) -> bool {
        self.sprite.ready()
    }

    pub fn upload_sprite(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), RenderError> {
        self.sprite
            .upload(&self.device, &self.queue, width, height, rgba)
    }

    /// Upload vertices and render
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let logical = self.logical_size;
        let ndc_vertices: Vec<Vertex> = scene
            .triangles
            .iter()
            .map(|v| {
                let [x, y] = css_to_ndc(v.position, logical);
                Vertex::new(x, y, v.color)
            })
            .collect();
        let sprite_quad = scene.sprite.map(|quad| {
            quad.map(|v| {
                let [x, y] = css_to_ndc(v.position, logical);
                SpriteVertex::new(x, y, v.uv[0], v.uv[1])
            })
        });

        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
            if let Some(quad) = &sprite_quad {
                self.sprite.draw(&self.device, &mut render_pass, quad);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Convert a CSS-pixel position (y down) to normalized device coordinates (y up)
pub fn css_to_ndc(position: [f32; 2], logical_size: (f32, f32)) -> [f32; 2] {
    let (w, h) = (logical_size.0.max(1.0), logical_size.1.max(1.0));
    [position[0] / w * 2.0 - 1.0, 1.0 - position[1] / h * 2.0]
}
