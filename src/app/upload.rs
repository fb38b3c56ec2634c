//! File selection, drag-and-drop, and preview loading

use super::App;
use crate::constants::IMAGE_EXTENSIONS;
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl App {
    /// Open the native file picker and hand the chosen path to `select_file`.
    /// Cancelling the dialog is a no-op.
    pub fn open_file_picker(&mut self, ctx: &egui::Context) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.last_dir = path.parent().map(PathBuf::from);
            self.select_file(ctx, path);
        }
    }

    /// Read and decode the file off the UI thread. The decoded image lands in
    /// `pending_file` and is picked up by `poll_pending_file` on the next
    /// frame. Read or decode failures are logged and otherwise unobserved:
    /// the upload area simply stays up.
    pub fn select_file(&mut self, ctx: &egui::Context, path: PathBuf) {
        info!(path = %path.display(), "File selected");

        let pending = self.pending_file.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read file");
                    return;
                }
            };

            let image = match image::load_from_memory(&bytes) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    egui::ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw())
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to decode image");
                    return;
                }
            };

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            *pending.lock().unwrap() = Some(LoadedFile {
                file_name,
                size_bytes: bytes.len() as u64,
                path,
                image,
            });
            ctx.request_repaint();
        });
    }

    /// Pick up a finished background load: upload the texture and switch to
    /// the preview panel. A new selection replaces the old one and clears any
    /// classification or suggestion tied to it.
    pub fn poll_pending_file(&mut self, ctx: &egui::Context) {
        let loaded = self.pending_file.lock().unwrap().take();
        let Some(loaded) = loaded else { return };

        let texture = ctx.load_texture(
            loaded.file_name.clone(),
            loaded.image,
            egui::TextureOptions::LINEAR,
        );

        debug!(file = %loaded.file_name, bytes = loaded.size_bytes, "Preview ready");

        self.uploaded = Some(UploadedImage {
            path: loaded.path,
            file_name: loaded.file_name,
            size_bytes: loaded.size_bytes,
            texture,
        });
        *self.classify.lock().unwrap() = ClassifyPhase::Idle;
        self.suggestion.lock().unwrap().phase = SuggestionPhase::Hidden;
    }

    /// A file dropped on the window follows the same path as picker
    /// selection.
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|f| f.path) {
            self.select_file(ctx, path);
        }
    }

    pub fn remove_image(&mut self) {
        if let Some(img) = &self.uploaded {
            info!(file = %img.file_name, "Image removed");
        }
        self.reset_upload();
    }

    /// Open the selected file in the system image viewer
    pub fn open_in_viewer(&self) {
        if let Some(img) = &self.uploaded {
            let _ = open::that(&img.path);
        }
    }
}
