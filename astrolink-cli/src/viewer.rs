//! Interactive viewer for astrolink scenarios
//!
//! Plays the rendering side of the simulation: reads body states and the
//! camera view every frame, forwards clicks as picks, and reloads the
//! scenario file when it changes on disk.

use astrolink_core::{
    build_simulation_context, build_simulation_context_from_source, default_scenario,
    get_body_states, BodyState, CameraView, SimulationContext,
};
use eframe::egui;
use glam::{Mat4, Vec3};
use notify::{Event, RecommendedWatcher, Watcher};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;
use tracing::{info, warn};

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const STEP_DT: f32 = 1.0 / 60.0;
const DEFAULT_LOCK_DISTANCE: f32 = 30.0;

pub struct ViewerApp {
    source_path: Option<PathBuf>,
    source_text: String,
    ctx_opt: Option<SimulationContext>,
    last_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    lock_distance: f32,
    last_frame: Instant,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(source_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let source_text = match &source_path {
            Some(path) => std::fs::read_to_string(path)
                .unwrap_or_else(|e| format!("# error reading file: {}", e)),
            None => String::new(),
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), source_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                warn!(error = %e, "file watching disabled");
            }
        }

        let mut app = Self {
            source_path,
            source_text,
            ctx_opt: None,
            last_error: None,
            playing: true,
            speed_multiplier: 1.0,
            lock_distance: DEFAULT_LOCK_DISTANCE,
            last_frame: Instant::now(),
            file_watcher: watcher,
            file_receiver: rx,
        };

        app.reload_context();
        app
    }

    fn reload_context(&mut self) {
        let result = match self.source_path {
            Some(_) => build_simulation_context_from_source(&self.source_text).map(|(ctx, _)| ctx),
            None => build_simulation_context(&default_scenario()),
        };

        match result {
            Ok(ctx) => {
                self.ctx_opt = Some(ctx);
                self.last_error = None;
                info!("scenario loaded");
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.ctx_opt = None;
                self.playing = false;
            }
        }
        self.last_frame = Instant::now();
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    let Some(source_path) = &self.source_path else {
                        continue;
                    };
                    if paths.contains(source_path) {
                        if let Ok(new_text) = std::fs::read_to_string(source_path) {
                            self.source_text = new_text;
                            needs_reload = true;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        }

        if needs_reload {
            self.reload_context();
        }
    }

    /// Advance by `dt` seconds, pausing on a simulation error
    fn tick(&mut self, dt: f32) {
        let Some(ctx) = self.ctx_opt.as_mut() else {
            return;
        };
        if let Err(e) = ctx.on_tick(dt) {
            warn!(error = %e, "simulation stopped");
            self.last_error = Some(e.to_string());
            self.playing = false;
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                self.playing = !self.playing;
                self.last_frame = Instant::now();
            }
            if ui.button("⏮ Reset").clicked() {
                self.reload_context();
            }
            if ui.button("⏭ Step").clicked() {
                self.tick(STEP_DT);
            }

            ui.separator();
            ui.label("Speed:");
            ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=10.0));

            ui.separator();
            ui.label("Lock distance:");
            ui.add(egui::Slider::new(&mut self.lock_distance, 1.0..=200.0));

            let Some(ctx) = self.ctx_opt.as_mut() else {
                return;
            };
            let ids: Vec<String> = get_body_states(ctx)
                .into_iter()
                .filter(|b| !b.is_wormhole_endpoint)
                .map(|b| b.id)
                .collect();
            for id in ids {
                if ui.button(format!("🔒 {}", id)).clicked() {
                    if let Err(e) = ctx.lock_on(&id, self.lock_distance) {
                        self.last_error = Some(e.to_string());
                    }
                }
            }
            if ui.button("Unlock").clicked() {
                ctx.unlock();
            }

            ui.separator();
            ui.label(format!("Tick: {}", ctx.current_tick));
        });
    }

    fn scene(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let response = ui.allocate_rect(rect, egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        let Some(ctx) = self.ctx_opt.as_mut() else {
            return;
        };

        let projection = Projection::new(ctx.camera.view(), rect);
        let mut visible: Vec<(BodyState, egui::Pos2, f32, f32)> = get_body_states(ctx)
            .into_iter()
            .filter_map(|b| {
                let (pos, depth) = projection.project(b.position)?;
                let radius = projection.screen_radius(b.radius, depth);
                Some((b, pos, radius, depth))
            })
            .collect();
        // Far to near
        visible.sort_by(|a, b| b.3.total_cmp(&a.3));

        for (body, pos, radius, _) in &visible {
            let radius = radius.clamp(2.0, 400.0);
            if body.is_wormhole_endpoint {
                let color = if body.id.ends_with("-a") {
                    egui::Color32::RED
                } else {
                    egui::Color32::BLUE
                };
                painter.circle_stroke(*pos, radius, egui::Stroke::new(1.5, color));
            } else {
                let glow = (body.transit_energy / 4.0).clamp(0.0, 1.0);
                let color = egui::Color32::from_rgb(
                    (120.0 + 135.0 * glow) as u8,
                    180,
                    (255.0 - 100.0 * glow) as u8,
                );
                painter.circle_filled(*pos, radius, color);
            }
            painter.text(
                *pos + egui::vec2(0.0, radius + 6.0),
                egui::Align2::CENTER_TOP,
                &body.id,
                egui::FontId::default(),
                egui::Color32::WHITE,
            );
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                // Nearest body whose disc contains the click, front-most first
                let picked = visible
                    .iter()
                    .rev()
                    .find(|(_, pos, radius, _)| pos.distance(pointer) <= radius.max(6.0));
                if let Some((body, ..)) = picked {
                    info!(body = %body.id, "picked");
                    ctx.on_pick(body.position);
                }
            }
        }
    }
}

/// Perspective projection of world points into the scene rect
struct Projection {
    view_proj: Mat4,
    focal: f32,
    rect: egui::Rect,
}

impl Projection {
    fn new(view: CameraView, rect: egui::Rect) -> Self {
        let aspect = (rect.width() / rect.height().max(1.0)).max(0.01);
        let proj = Mat4::perspective_rh(FOV_Y, aspect, 0.1, 10_000.0);
        let look = Mat4::look_at_rh(view.eye, view.aim, Vec3::Y);
        Self {
            view_proj: proj * look,
            focal: proj.y_axis.y * rect.height() / 2.0,
            rect,
        }
    }

    /// Screen position and view depth, or `None` behind the camera
    fn project(&self, world: Vec3) -> Option<(egui::Pos2, f32)> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let center = self.rect.center();
        let pos = center
            + egui::vec2(
                ndc.x * self.rect.width() / 2.0,
                -ndc.y * self.rect.height() / 2.0,
            );
        Some((pos, clip.w))
    }

    fn screen_radius(&self, radius: f32, depth: f32) -> f32 {
        radius * self.focal / depth
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        if self.last_error.is_some() {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(100.0);
                if let Some(ref error) = self.last_error {
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED),
                    );
                }
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.scene(ui));

        // Wall-clock dt, no fixed step
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if self.playing {
            self.tick(dt * self.speed_multiplier);
            ctx.request_repaint();
        }
    }
}
