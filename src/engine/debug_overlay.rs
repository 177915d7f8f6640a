use egui::epaint::Shadow;

pub struct LayoutStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub phase: &'static str,
    /// RNG seed of the current layout, for replaying it.
    pub seed: u64,
    pub room_count: usize,
    pub active_rooms: usize,
    pub triangle_count: usize,
    pub corridor_count: usize,
    pub loop_count: usize,
    pub generations: u32,
    pub retries: u32,
    /// Time spent on the last triangulation pass (ms). 0 if not yet run.
    pub triangulation_ms: f32,
    /// Time spent on the last spanning-tree pass (ms). 0 if not yet run.
    pub spanning_ms: f32,
    pub resolution: (u32, u32),
    pub camera_target: (f32, f32),
    pub camera_zoom_pct: f32,
}

/// One triangulation face, already projected to egui screen points.
///
/// Rendered as a yellow wireframe over the room quads. Toggled with F4.
pub struct TriangleDraw {
    pub a: egui::Pos2,
    pub b: egui::Pos2,
    pub c: egui::Pos2,
}

/// One circumcircle, already projected to egui screen points.
///
/// Drawn as a thin white outline with a dot at the center. Toggled with F5.
pub struct CircleDraw {
    /// Circumcenter projected to screen.
    pub center: egui::Pos2,
    /// Radius scaled to screen points.
    pub radius_px: f32,
}

pub struct DebugOverlay {
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame covering all optional debug layers:
    ///
    /// - `circles`   : F5 circumcircle outlines (`None` = hidden).
    /// - `triangles` : F4 triangulation wireframe (`None` = hidden).
    /// - `stats`     : F3 stats panel (`None` = hidden).
    ///
    /// All layers are tessellated in a single egui pass.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: Option<&LayoutStats>,
        triangles: Option<&[TriangleDraw]>,
        circles: Option<&[CircleDraw]>,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── F5: circumcircles (drawn first, behind the wireframe) ─────────
            if let Some(circles) = circles {
                if !circles.is_empty() {
                    let painter = ctx.layer_painter(egui::LayerId::new(
                        egui::Order::Background,
                        egui::Id::new("circumcircles"),
                    ));
                    let outline = egui::Stroke::new(
                        1.0,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 90),
                    );
                    for circle in circles {
                        painter.circle_stroke(circle.center, circle.radius_px, outline);
                        // Dot at the circumcenter.
                        painter.circle_filled(
                            circle.center,
                            1.5,
                            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 160),
                        );
                    }
                }
            }

            // ── F4: triangulation wireframe ───────────────────────────────────
            if let Some(faces) = triangles {
                if !faces.is_empty() {
                    let painter = ctx.layer_painter(egui::LayerId::new(
                        egui::Order::Background,
                        egui::Id::new("triangulation_wire"),
                    ));
                    let wire = egui::Stroke::new(
                        1.0,
                        egui::Color32::from_rgba_unmultiplied(255, 230, 40, 200),
                    );
                    for face in faces {
                        painter.line_segment([face.a, face.b], wire);
                        painter.line_segment([face.b, face.c], wire);
                        painter.line_segment([face.c, face.a], wire);
                    }
                }
            }

            // ── F3: stats panel ──────────────────────────────────────────────
            if let Some(stats) = stats {
                egui::Area::new(egui::Id::new("debug_overlay"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!(
                                    "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                    stats.frame_time_avg_ms,
                                    stats.frame_time_min_ms,
                                    stats.frame_time_max_ms
                                ));
                                ui.label(format!(
                                    "Phase: {}  (layout #{} | retries {})",
                                    stats.phase, stats.generations, stats.retries
                                ));
                                ui.label(format!("Seed: 0x{:016X}", stats.seed));
                                ui.label(format!(
                                    "Rooms: {} ({} active)",
                                    stats.room_count, stats.active_rooms
                                ));
                                ui.label(format!(
                                    "Triangles: {}  Corridors: {} + {} loops",
                                    stats.triangle_count,
                                    stats.corridor_count,
                                    stats.loop_count
                                ));
                                ui.label(format!(
                                    "Triangulate: {:.2} ms  Span: {:.2} ms",
                                    stats.triangulation_ms, stats.spanning_ms
                                ));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                                ui.label(format!(
                                    "Camera: ({:.1}, {:.1})  zoom {:.0}%",
                                    stats.camera_target.0,
                                    stats.camera_target.1,
                                    stats.camera_zoom_pct
                                ));
                            });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
