// Interactive viewer for the warren dungeon-layout generator.
// Rooms and corridors render as INSTANCED quads in a single draw call;
// egui debug layers (stats panel, wireframe, circumcircles) composite on top.

mod engine;

use std::collections::VecDeque;

use winit::{
    event::{Event as WinitEvent, WindowEvent, ElementState, KeyEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};
use glam::{Mat4, Vec2};
use engine::{
    camera::LayoutCamera,
    config::GenConfig,
    debug_overlay::{CircleDraw, DebugOverlay, LayoutStats, TriangleDraw},
    error::GenError,
    input::InputState,
    pipeline::{Generator, Phase},
    rapier_space::RapierSpace,
    rng::LayoutRng,
    rooms::RoomStatus,
};

// ============================================================================
// VERTEX DEFINITION
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// ============================================================================
// INSTANCE DATA (per room / corridor)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadInstance {
    center: [f32; 2],
    size: [f32; 2],
    rotation: f32,
    _padding: f32,  // Align color to 16 bytes
    color: [f32; 4],
}

impl QuadInstance {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,  // One per instance, not per vertex
            attributes: &[
                // Center (location 1)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Size (location 2)
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Rotation (location 3)
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                // Color (location 4)
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// Unit quad centered on the origin; instances scale it to room extents.
const QUAD_VERTICES: &[Vertex] = &[
    Vertex { position: [-0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5] },
    Vertex { position: [ 0.5,  0.5] },
    Vertex { position: [-0.5,  0.5] },
];

const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

// Fill colors keyed to room status, plus corridors.
const ROOM_COLOR: [f32; 4] = [0.00, 0.45, 0.45, 1.0];
const ACTIVE_COLOR: [f32; 4] = [1.00, 0.62, 0.10, 1.0];
const SLEEPING_COLOR: [f32; 4] = [0.50, 0.50, 0.50, 1.0];
const CORRIDOR_COLOR: [f32; 4] = [0.35, 0.35, 0.35, 1.0];

// ============================================================================
// UNIFORM DATA (camera only)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

impl Uniforms {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    num_indices: u32,
    max_instances: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    // Debug overlay (F3 stats, F4 wireframe, F5 circumcircles)
    overlay: DebugOverlay,
    show_stats: bool,
    show_triangles: bool,
    show_circles: bool,

    // Layout generation
    generator: Generator<RapierSpace>,
    camera: LayoutCamera,
    input: InputState,
    last_update: std::time::Instant,

    // Frame statistics for the stats panel
    frame_times: VecDeque<f32>,
    fps: u32,
    frame_count: u32,
    last_fps_update: std::time::Instant,
}

impl State {
    async fn new(window: std::sync::Arc<winit::window::Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_quad.wgsl").into()),
        });

        let uniforms = Uniforms::new();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Quad Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), QuadInstance::desc()],  // Vertex + Instance buffers
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,  // y-down ortho flips winding
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertices"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Indices"),
            contents: bytemuck::cast_slice(QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Create instance buffer (a layout tops out well under this)
        let max_instances = 1024;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Layout Instances"),
            size: (max_instances * std::mem::size_of::<QuadInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let num_indices = QUAD_INDICES.len() as u32;

        let overlay = DebugOverlay::new(&window, &device, surface_format);

        // Fresh seed each launch; SPACE rerolls without restarting
        let layout_config = GenConfig::default();
        let camera = LayoutCamera::for_region(layout_config.region);
        let input = InputState::new(Vec2::new(size.width as f32, size.height as f32));
        let mut generator =
            Generator::new(layout_config, RapierSpace::new(), LayoutRng::from_entropy());
        generator.refresh();

        Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            num_indices,
            max_instances,
            uniform_buffer,
            uniform_bind_group,
            overlay,
            show_stats: true,
            show_triangles: false,
            show_circles: false,
            generator,
            camera,
            input,
            last_update: std::time::Instant::now(),
            frame_times: VecDeque::with_capacity(120),
            fps: 0,
            frame_count: 0,
            last_fps_update: std::time::Instant::now(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn update(&mut self) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(&self.input, dt);

        // One generation step per frame so the pile settles on screen
        require_generation(self.generator.tick());

        // Frame statistics
        self.frame_times.push_back(dt * 1000.0);
        if self.frame_times.len() > 120 {
            self.frame_times.pop_front();
        }
        self.frame_count += 1;
        if (now - self.last_fps_update).as_secs_f32() >= 1.0 {
            self.fps = self.frame_count;
            println!("{}", fps_line(self.fps, self.generator.rooms().len()));
            self.frame_count = 0;
            self.last_fps_update = now;
        }
    }

    fn layout_stats(&self) -> LayoutStats {
        let (avg, min, max) = frame_time_spread(&self.frame_times);
        let stats = self.generator.stats();
        let rooms = self.generator.rooms();
        let (corridor_count, loop_count) = match self.generator.corridors() {
            Some(set) => (set.spanning.len(), set.loops.len()),
            None => (0, 0),
        };

        LayoutStats {
            fps: self.fps,
            frame_time_avg_ms: avg,
            frame_time_min_ms: min,
            frame_time_max_ms: max,
            phase: self.generator.phase().name(),
            seed: self.generator.seed(),
            room_count: rooms.len(),
            active_rooms: rooms.iter().filter(|r| r.active()).count(),
            triangle_count: self.generator.triangles().map_or(0, |t| t.len()),
            corridor_count,
            loop_count,
            generations: stats.generations,
            retries: stats.retries,
            triangulation_ms: stats.triangulation_ms,
            spanning_ms: stats.spanning_ms,
            resolution: (self.config.width, self.config.height),
            camera_target: (self.camera.target().x, self.camera.target().y),
            camera_zoom_pct: self.camera.zoom() * 100.0,
        }
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Collect instance data BEFORE creating render pass.
        // Corridors go first so rooms draw over their endpoints.
        let mut instances = Vec::new();
        if let Some(set) = self.generator.corridors() {
            for corridor in set.iter() {
                instances.push(QuadInstance {
                    center: [
                        (corridor.a.x + corridor.b.x) / 2.0,
                        (corridor.a.y + corridor.b.y) / 2.0,
                    ],
                    size: [corridor.length + 2.0, 4.0],
                    rotation: corridor.angle,
                    _padding: 0.0,
                    color: CORRIDOR_COLOR,
                });
            }
        }
        for room in self.generator.rooms() {
            let color = match self.generator.room_status(room) {
                RoomStatus::Active => ACTIVE_COLOR,
                RoomStatus::Sleeping => SLEEPING_COLOR,
                RoomStatus::Default => ROOM_COLOR,
            };
            instances.push(QuadInstance {
                center: self.generator.room_center(room).to_array(),
                size: [room.width, room.height],
                rotation: 0.0,
                _padding: 0.0,
                color,
            });
        }

        let instance_count = instances.len().min(self.max_instances);

        // Write instance data to buffer BEFORE render pass
        if !instances.is_empty() {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..instance_count]),
            );
        }

        let viewport = Vec2::new(self.size.width as f32, self.size.height as f32);
        let uniforms = Uniforms {
            view_proj: self.camera.view_projection(viewport).to_cols_array_2d(),
        };

        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        // NOW create render pass (after all buffer writes)
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Layout Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));  // Instance data
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // ONE DRAW CALL for every room and corridor
            render_pass.draw_indexed(0..self.num_indices, 0, 0..instance_count as u32);
        }

        // Debug layers on top. egui paints in logical points while the camera
        // projects to physical pixels; divide by the scale factor to line up.
        let ppp = window.scale_factor() as f32;
        let project = |p: engine::geom::Point| {
            let s = self.camera.world_to_screen(Vec2::new(p.x, p.y), viewport) / ppp;
            egui::pos2(s.x, s.y)
        };

        let stats = if self.show_stats {
            Some(self.layout_stats())
        } else {
            None
        };

        let triangles: Option<Vec<TriangleDraw>> = if self.show_triangles {
            self.generator.triangles().map(|tris| {
                tris.iter()
                    .map(|t| {
                        let [a, b, c] = *t.vertices();
                        TriangleDraw {
                            a: project(a),
                            b: project(b),
                            c: project(c),
                        }
                    })
                    .collect()
            })
        } else {
            None
        };

        let circles: Option<Vec<CircleDraw>> = if self.show_circles {
            self.generator.triangles().map(|tris| {
                tris.iter()
                    .filter_map(|t| t.circumcircle().ok())
                    .map(|c| CircleDraw {
                        center: project(c.center),
                        radius_px: self.camera.scale_to_screen(c.radius) / ppp,
                    })
                    .collect()
            })
        } else {
            None
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: ppp,
        };

        self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &screen_descriptor,
            stats.as_ref(),
            triangles.as_deref(),
            circles.as_deref(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn frame_time_spread(times: &VecDeque<f32>) -> (f32, f32, f32) {
    if times.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let sum: f32 = times.iter().sum();
    let min = times.iter().copied().fold(f32::INFINITY, f32::min);
    let max = times.iter().copied().fold(0.0_f32, f32::max);
    (sum / times.len() as f32, min, max)
}

/// Unwrap one generator tick. The anchor retry inside `tick` is the only
/// automatic recovery; any error that reaches the viewer is a consistency
/// fault and aborts.
fn require_generation(step: Result<Phase, GenError>) -> Phase {
    match step {
        Ok(phase) => phase,
        Err(err) => panic!("generation failed: {err}"),
    }
}

fn fps_line(fps: u32, rooms: usize) -> String {
    format!("FPS: {} | Rooms: {} | Draw calls: 1", fps, rooms)
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();

    let window_attributes = Window::default_attributes()
        .with_title("Warren - dungeon layout viewer (SPACE rerolls, F3/F4/F5 debug)")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    let window = std::sync::Arc::new(event_loop.create_window(window_attributes).unwrap());

    let mut state = pollster::block_on(State::new(window.clone()));

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                // egui gets first look; camera input skips events it consumed
                let response = state.overlay.handle_window_event(&window, event);
                if !response.consumed {
                    state.input.process_event(event);
                }

                match event {
                    WindowEvent::CloseRequested => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(code),
                                repeat: false,
                                ..
                            },
                        ..
                    } => match code {
                        KeyCode::Escape => control_flow.exit(),
                        KeyCode::Space => state.generator.refresh(),
                        KeyCode::F3 => state.show_stats = !state.show_stats,
                        KeyCode::F4 => state.show_triangles = !state.show_triangles,
                        KeyCode::F5 => state.show_circles = !state.show_circles,
                        _ => {}
                    },
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => control_flow.exit(),
                            Err(e) => eprintln!("{:?}", e),
                        }
                        state.input.end_frame();
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    }).unwrap();
}
