#![windows_subsystem = "windows"]
//! EcoSort - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod markdown;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::info;
use types::*;
use ui::components;
use utils::format_file_size;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "ecosort.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ecosort=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = utils::get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "EcoSort starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(720.0, 880.0)))
        .with_min_inner_size([560.0, 640.0])
        .with_title("EcoSort");

    // Window/taskbar icon rasterized from the inline logo SVG
    {
        let (pixels, w, h) = utils::rasterize_logo(64);
        let icon = egui::IconData {
            rgba: pixels,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "EcoSort",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Pick up finished background file loads, then dropped files
        self.poll_pending_file(ctx);
        self.handle_dropped_files(ctx);

        self.render_settings_window(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
                    .show(ui, |ui| {
                        self.render_header(ui, ctx);
                        ui.add_space(theme::SPACING_XL);

                        if self.uploaded.is_some() {
                            self.render_preview_card(ui, ctx);
                        } else {
                            self.render_upload_card(ui, ctx);
                        }

                        ui.add_space(theme::SPACING_XL);
                        self.render_suggestion_container(ui);
                        ui.add_space(theme::SPACING_XL);
                    });
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shutting down, saving settings");
        self.save_settings();
    }
}

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let texture = self.logo_texture.get_or_insert_with(|| {
                let (pixels, w, h) = utils::rasterize_logo(96);
                ctx.load_texture(
                    "logo",
                    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
            ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(36.0, 36.0)));

            ui.add_space(theme::SPACING_SM);
            ui.vertical(|ui| {
                ui.spacing_mut().item_spacing.y = 2.0;
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("ECOSORT")
                            .size(theme::FONT_TITLE)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Snap your trash, sort it right")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let gear = ui.add(theme::button(egui_phosphor::regular::GEAR.to_string()));
                if gear.clicked() {
                    self.server_url_edit = self.server_url.clone();
                    self.show_settings = !self.show_settings;
                }
            });
        });
    }

    /// Empty upload area with a dashed drop zone. The zone lights up while
    /// files hover over the window.
    fn render_upload_card(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let mut pick = false;

        let frame_resp = theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.add_space(56.0);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(egui_phosphor::regular::IMAGE)
                            .size(44.0)
                            .color(if hovering_files {
                                theme::ACCENT
                            } else {
                                theme::TEXT_DIM
                            }),
                    )
                    .selectable(false),
                );
                ui.add_space(theme::SPACING_MD);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Drag & drop an image of your trash")
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("PNG, JPG, BMP or WEBP")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                ui.add_space(theme::SPACING_LG);
                if ui
                    .add(theme::button_accent(format!(
                        "{}  Choose File",
                        egui_phosphor::regular::UPLOAD_SIMPLE
                    )))
                    .clicked()
                {
                    pick = true;
                }
                ui.add_space(56.0);
            });
        });

        let border_color = if hovering_files {
            theme::ACCENT
        } else {
            theme::BORDER_DEFAULT
        };
        components::dashed_border(
            ui.painter(),
            frame_resp.response.rect.shrink(7.0),
            border_color,
        );

        if pick {
            self.open_file_picker(ctx);
        }
    }

    /// Preview panel: image, file name and size, remove/classify actions and
    /// the classification result.
    fn render_preview_card(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        // Clone what the closures need so the buttons can act on self after
        let (texture, file_name, size_label) = {
            let Some(img) = &self.uploaded else { return };
            (
                img.texture.clone(),
                img.file_name.clone(),
                format_file_size(img.size_bytes),
            )
        };
        let classify_phase = self.classify.lock().unwrap().clone();

        let mut do_remove = false;
        let mut do_classify = false;
        let mut do_open = false;
        let mut tips_for: Option<String> = None;

        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.add_space(theme::SPACING_MD);

                // Fit the image into the card, capped in height
                let tex_size = texture.size();
                let aspect = tex_size[1] as f32 / tex_size[0] as f32;
                let mut w = (ui.available_width() - 32.0).min(440.0);
                let mut h = w * aspect;
                if h > 300.0 {
                    h = 300.0;
                    w = h / aspect;
                }
                ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(w, h)));

                ui.add_space(theme::SPACING_MD);

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 6.0;
                    let name_resp = ui.add(
                        egui::Label::new(
                            egui::RichText::new(&file_name)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .sense(egui::Sense::click()),
                    );
                    if name_resp.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    if name_resp.clicked() {
                        do_open = true;
                    }
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&size_label)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });

                ui.add_space(theme::SPACING_LG);

                ui.horizontal(|ui| {
                    let classifying = classify_phase == ClassifyPhase::Classifying;
                    let classify_btn = ui.add_enabled(
                        !classifying,
                        theme::button_accent(format!(
                            "{}  Classify",
                            egui_phosphor::regular::SPARKLE
                        )),
                    );
                    if classify_btn.clicked() {
                        do_classify = true;
                    }

                    let remove_btn = ui.add(theme::button_danger(format!(
                        "{}  Remove",
                        egui_phosphor::regular::TRASH
                    )));
                    if remove_btn.clicked() {
                        do_remove = true;
                    }
                });

                // Classification outcome
                match &classify_phase {
                    ClassifyPhase::Idle => {}
                    ClassifyPhase::Classifying => {
                        ui.add_space(theme::SPACING_MD);
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new("Classifying...")
                                        .size(theme::FONT_LABEL)
                                        .color(theme::TEXT_MUTED),
                                )
                                .selectable(false),
                            );
                        });
                    }
                    ClassifyPhase::Classified(c) => {
                        ui.add_space(theme::SPACING_MD);
                        ui.horizontal(|ui| {
                            components::trash_type_badge(ui, &c.label);
                            components::confidence_bar(ui, c.confidence);
                        });
                        ui.add_space(theme::SPACING_MD);
                        if ui
                            .add(theme::button_accent(format!(
                                "{}  Get Disposal Tips",
                                egui_phosphor::regular::RECYCLE
                            )))
                            .clicked()
                        {
                            tips_for = Some(c.label.clone());
                        }
                    }
                    ClassifyPhase::Error(msg) => {
                        ui.add_space(theme::SPACING_MD);
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(msg)
                                    .size(theme::FONT_LABEL)
                                    .color(theme::STATUS_ERROR),
                            )
                            .selectable(false),
                        );
                    }
                }

                ui.add_space(theme::SPACING_MD);
            });
        });

        if do_open {
            self.open_in_viewer();
        }
        if do_remove {
            self.remove_image();
        }
        if do_classify {
            self.request_classification(ctx);
        }
        if let Some(trash_type) = tips_for {
            self.request_disposal_suggestion(ctx, trash_type);
        }
    }

    /// The suggestion container: hidden until the first request, then shows
    /// exactly one of loading, rendered markdown, or an error message.
    fn render_suggestion_container(&mut self, ui: &mut egui::Ui) {
        let phase = self.suggestion.lock().unwrap().phase.clone();

        match phase {
            SuggestionPhase::Hidden => {}
            SuggestionPhase::Loading => {
                theme::section_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(SUGGESTION_LOADING_MSG)
                                    .size(theme::FONT_BODY)
                                    .color(theme::TEXT_MUTED),
                            )
                            .selectable(false),
                        );
                    });
                });
            }
            SuggestionPhase::Ready(md) => {
                theme::section_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(egui_phosphor::regular::RECYCLE)
                                    .size(theme::FONT_HEADING)
                                    .color(theme::ACCENT),
                            )
                            .selectable(false),
                        );
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("Disposal Tips")
                                    .size(theme::FONT_HEADING)
                                    .strong()
                                    .color(theme::TEXT_PRIMARY),
                            )
                            .selectable(false),
                        );
                    });
                    ui.separator();
                    ui.add_space(theme::SPACING_SM);
                    markdown::render_markdown(ui, &md);
                });
            }
            SuggestionPhase::Error(msg) => {
                theme::section_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(msg)
                                .size(theme::FONT_BODY)
                                .color(theme::STATUS_ERROR),
                        )
                        .selectable(false),
                    );
                });
            }
        }
    }

    fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("SERVER URL")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut self.server_url_edit)
                        .hint_text(DEFAULT_SERVER_URL)
                        .desired_width(280.0),
                );

                ui.add_space(theme::SPACING_MD);
                ui.horizontal(|ui| {
                    if ui.add(theme::button_accent("Save")).clicked() {
                        let url = self.server_url_edit.trim().trim_end_matches('/');
                        self.server_url = if url.is_empty() {
                            DEFAULT_SERVER_URL.to_string()
                        } else {
                            url.to_string()
                        };
                        self.save_settings();
                        self.show_settings = false;
                        info!(server_url = %self.server_url, "Server URL updated");
                    }
                    if ui.add(theme::button("Reset")).clicked() {
                        self.server_url_edit = DEFAULT_SERVER_URL.to_string();
                    }
                });

                ui.add_space(theme::SPACING_SM);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });

        if !open {
            self.show_settings = false;
        }
    }
}
