//! App module - contains the main application state and logic

mod classify;
mod suggestion;
mod upload;

use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Upload state: `Some` shows the preview panel, `None` the upload area
    pub(crate) uploaded: Option<UploadedImage>,
    pub(crate) pending_file: Arc<Mutex<Option<LoadedFile>>>,

    // Exchange state shared with background tasks
    pub(crate) classify: Arc<Mutex<ClassifyPhase>>,
    pub(crate) suggestion: Arc<Mutex<SuggestionState>>,

    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) client: reqwest::Client,
    pub(crate) server_url: String,

    // Window chrome
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,

    // Settings window
    pub(crate) show_settings: bool,
    pub(crate) server_url_edit: String,

    pub(crate) data_dir: PathBuf,
    pub(crate) last_dir: Option<PathBuf>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let server_url = settings.server_url_or_default();
        let last_dir = settings.last_dir.as_ref().map(PathBuf::from);

        debug!(server_url = %server_url, "App state initialized");

        Self {
            uploaded: None,
            pending_file: Arc::new(Mutex::new(None)),
            classify: Arc::new(Mutex::new(ClassifyPhase::Idle)),
            suggestion: Arc::new(Mutex::new(SuggestionState::default())),
            runtime: tokio::runtime::Runtime::new().expect("failed to start tokio runtime"),
            client: reqwest::Client::new(),
            server_url_edit: server_url.clone(),
            server_url,
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            show_settings: false,
            data_dir,
            last_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            server_url: Some(self.server_url.clone()),
            last_dir: self
                .last_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        };
        settings.save(&self.data_dir);
    }

    /// Back to the empty upload area: drop the selection, the classification
    /// tied to it, and hide the suggestion container.
    pub fn reset_upload(&mut self) {
        self.uploaded = None;
        *self.pending_file.lock().unwrap() = None;
        *self.classify.lock().unwrap() = ClassifyPhase::Idle;
        self.suggestion.lock().unwrap().phase = SuggestionPhase::Hidden;
    }
}
