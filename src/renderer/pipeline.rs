//! WebGPU render pipeline setup
//!
//! Four pipelines over one shader module and one bind group: lit meshes
//! (globe, satellites), the depth-read-only atmosphere shell, unlit triangle
//! quads (dot matrix), and unlit lines (boundaries, arcs). Dynamic geometry
//! is regenerated and re-uploaded each frame; only the globe/atmosphere mesh
//! is cached between frames.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::{palette, FlatVertex, MeshVertex};
use crate::camera::{CameraUniform, OrbitController};
use crate::scene::SceneGraph;

/// Light rig as the shader sees it; intensities ride in the w components
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightsUniform {
    ambient: [f32; 4],
    dir0_color: [f32; 4],
    dir0_direction: [f32; 4],
    dir1_color: [f32; 4],
    dir1_direction: [f32; 4],
    point_color: [f32; 4],
    point_position: [f32; 4],
    /// x = shininess
    params: [f32; 4],
}

fn lights_uniform(scene: &SceneGraph) -> LightsUniform {
    let rig = &scene.lights;
    let pack = |color: [f32; 4], w: f32| [color[0], color[1], color[2], w];

    LightsUniform {
        ambient: pack(rig.ambient.color, rig.ambient.intensity),
        dir0_color: pack(rig.directionals[0].color, rig.directionals[0].intensity),
        dir0_direction: {
            let d = rig.directionals[0].direction;
            [d[0], d[1], d[2], 0.0]
        },
        dir1_color: pack(rig.directionals[1].color, rig.directionals[1].intensity),
        dir1_direction: {
            let d = rig.directionals[1].direction;
            [d[0], d[1], d[2], 0.0]
        },
        point_color: pack(rig.point.color, rig.point.intensity),
        point_position: {
            let p = rig.point.position;
            [p[0], p[1], p[2], 1.0]
        },
        params: [scene.globe.shininess, 0.0, 0.0, 0.0],
    }
}

/// Main render state
pub struct GlobeRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,

    mesh_pipeline: wgpu::RenderPipeline,
    atmosphere_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    /// Cached globe + atmosphere geometry; rebuilt on composition
    static_buffer: wgpu::Buffer,
    globe_vertex_count: u32,
    atmosphere_vertex_count: u32,

    depth_view: wgpu::TextureView,

    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl GlobeRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("globewire-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera"),
            contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lights"),
            contents: bytemuck::bytes_of(&LightsUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str,
                             vs: &str,
                             fs: &str,
                             buffer: wgpu::VertexBufferLayout<'static>,
                             topology: wgpu::PrimitiveTopology,
                             depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[buffer],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let mesh_pipeline = make_pipeline(
            "mesh_pipeline",
            "vs_mesh",
            "fs_mesh",
            MeshVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let atmosphere_pipeline = make_pipeline(
            "atmosphere_pipeline",
            "vs_mesh",
            "fs_mesh",
            MeshVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            false,
        );
        let quad_pipeline = make_pipeline(
            "quad_pipeline",
            "vs_flat",
            "fs_flat",
            FlatVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let line_pipeline = make_pipeline(
            "line_pipeline",
            "vs_flat",
            "fs_flat",
            FlatVertex::desc(),
            wgpu::PrimitiveTopology::LineList,
            true,
        );

        let static_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("static_mesh"),
            contents: bytemuck::cast_slice(&[MeshVertex::zeroed()]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_view = Self::create_depth_view(&device, width, height);

        Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            atmosphere_pipeline,
            quad_pipeline,
            line_pipeline,
            camera_buffer,
            lights_buffer,
            bind_group,
            static_buffer,
            globe_vertex_count: 0,
            atmosphere_vertex_count: 0,
            depth_view,
            size: (width, height),
        }
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Upload the globe body and atmosphere shell geometry
    ///
    /// Call once after composing the scene (and again if the scene is
    /// recomposed); the rest of the frame geometry is dynamic.
    pub fn upload_static(&mut self, scene: &SceneGraph) {
        let globe = shapes::static_mesh_globe(scene);
        let atmosphere = shapes::static_mesh_atmosphere(scene);
        self.globe_vertex_count = globe.len() as u32;
        self.atmosphere_vertex_count = atmosphere.len() as u32;

        let mut vertices = globe;
        vertices.extend(atmosphere);
        self.static_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("static_mesh"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        self.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&lights_uniform(scene)),
        );
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = Self::create_depth_view(&self.device, new_width, new_height);
        }
    }

    /// Draw one frame of the scene
    pub fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &OrbitController,
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera.uniform()));

        let dot_vertices = shapes::dot_quads(&scene.dots);
        let mut line_vertices = shapes::boundary_lines(&scene.boundaries);
        line_vertices.extend(shapes::arc_lines(&scene.arcs));
        let satellite_vertices = shapes::satellite_mesh(&scene.satellites);

        let make_buffer = |label: &str, contents: &[u8]| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage: wgpu::BufferUsages::VERTEX,
                })
        };
        let dot_buffer = make_buffer("dots", bytemuck::cast_slice(&dot_vertices));
        let line_buffer = make_buffer("lines", bytemuck::cast_slice(&line_vertices));
        let satellite_buffer = make_buffer("satellites", bytemuck::cast_slice(&satellite_vertices));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let [r, g, b, a] = palette::BACKGROUND;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: f64::from(a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);

            // Globe body
            if self.globe_vertex_count > 0 {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(0, self.static_buffer.slice(..));
                pass.draw(0..self.globe_vertex_count, 0..1);
            }

            // Dot matrix
            if !dot_vertices.is_empty() {
                pass.set_pipeline(&self.quad_pipeline);
                pass.set_vertex_buffer(0, dot_buffer.slice(..));
                pass.draw(0..dot_vertices.len() as u32, 0..1);
            }

            // Boundaries and arcs
            if !line_vertices.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, line_buffer.slice(..));
                pass.draw(0..line_vertices.len() as u32, 0..1);
            }

            // Satellites
            if !satellite_vertices.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(0, satellite_buffer.slice(..));
                pass.draw(0..satellite_vertices.len() as u32, 0..1);
            }

            // Atmosphere last: blends over everything, reads depth but does
            // not write it
            if self.atmosphere_vertex_count > 0 {
                pass.set_pipeline(&self.atmosphere_pipeline);
                pass.set_vertex_buffer(0, self.static_buffer.slice(..));
                pass.draw(
                    self.globe_vertex_count
                        ..self.globe_vertex_count + self.atmosphere_vertex_count,
                    0..1,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
