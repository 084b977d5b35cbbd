//! WebGPU sprite pipeline
//!
//! One textured-quad pipeline draws both entities and bitmap text. Quads are
//! collected during the frame and drawn in submission order, switching the
//! texture bind group whenever the visual changes.

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::shapes::{sprite_quad, text_quads, world_to_ndc};
use super::vertex::{Vertex, colors};
use super::{Presenter, VisualTable};
use crate::assets::{AssetError, ImageData, VisualHandle};

/// A texture uploaded to the GPU together with its bind group
struct SpriteTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        image: &ImageData,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            bind_group,
        }
    }
}

/// Contiguous run of vertices sharing one texture
#[derive(Debug, Clone, Copy)]
struct Batch {
    visual: VisualHandle,
    start: u32,
    end: u32,
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    visuals: VisualTable<SpriteTexture>,
    /// World-space vertices queued this frame
    vertices: Vec<Vertex>,
    batches: Vec<Batch>,
    clear_color: wgpu::Color,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rocket-lander-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface config: {}x{} {:?}", width, height, surface_format);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pixel art: nearest filtering, clamp so quads don't bleed
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
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
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            visuals: VisualTable::new(),
            vertices: Vec::new(),
            batches: Vec::new(),
            clear_color: colors::BACKGROUND,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_high_contrast(&mut self, enabled: bool) {
        self.clear_color = if enabled {
            colors::BACKGROUND_HIGH_CONTRAST
        } else {
            colors::BACKGROUND
        };
    }

    fn queue_vertices(&mut self, visual: VisualHandle, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(batch) if batch.visual == visual && batch.end == start => batch.end = end,
            _ => self.batches.push(Batch { visual, start, end }),
        }
    }

    /// Upload queued vertices and render
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| {
                let p = world_to_ndc(Vec2::from(v.position), self.size);
                Vertex::new(p.x, p.y, v.uv[0], v.uv[1])
            })
            .collect();

        // Recreate buffer each frame (a few dozen quads)
        let vertex_buffer = (!ndc_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

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
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for batch in &self.batches {
                    let Some(texture) = self.visuals.get(batch.visual) else {
                        log::warn!("Skipping draw for released visual {:?}", batch.visual);
                        continue;
                    };
                    render_pass.set_bind_group(0, &texture.bind_group, &[]);
                    render_pass.draw(batch.start..batch.end, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Presenter for RenderState {
    fn load_visual(&mut self, path: &str) -> Result<VisualHandle, AssetError> {
        let Self {
            device,
            queue,
            bind_group_layout,
            sampler,
            visuals,
            ..
        } = self;
        visuals.get_or_load(path, |path| {
            let image = ImageData::load(path)?;
            log::info!("Uploaded texture {} ({}x{})", path, image.width, image.height);
            Ok(SpriteTexture::upload(
                device,
                queue,
                bind_group_layout,
                sampler,
                path,
                &image,
            ))
        })
    }

    fn draw_entity(&mut self, visual: VisualHandle, position: Vec2, extents: Vec2) {
        self.queue_vertices(visual, &sprite_quad(position, extents));
    }

    fn draw_text(
        &mut self,
        font: VisualHandle,
        text: &str,
        glyph_size: f32,
        glyph_spacing: f32,
        position: Vec2,
    ) {
        let vertices = text_quads(text, glyph_size, glyph_spacing, position);
        self.queue_vertices(font, &vertices);
    }

    fn present(&mut self) {
        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                self.resize(self.size.0, self.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
        self.vertices.clear();
        self.batches.clear();
    }

    fn release_visuals(&mut self) -> usize {
        let released = self.visuals.clear();
        log::info!("Released {} textures", released);
        released
    }
}
