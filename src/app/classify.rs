//! Classification request logic

use super::App;
use crate::constants::{CLASSIFY_PATH, GENERIC_FAILURE_MSG};
use crate::types::*;
use eframe::egui;
use tracing::{error, info};

fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "bmp" => "image/bmp",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "png" => "image/png",
        _ => "application/octet-stream",
    }
}

impl App {
    /// Send the selected image to the backend for classification. The result
    /// lands in the shared classify state; transport and parse failures are
    /// logged and collapsed into the generic message.
    pub fn request_classification(&mut self, ctx: &egui::Context) {
        let Some(img) = &self.uploaded else { return };

        let path = img.path.clone();
        let file_name = img.file_name.clone();
        let url = format!("{}{}", self.server_url, CLASSIFY_PATH);

        info!(file = %file_name, url = %url, "Requesting classification");
        *self.classify.lock().unwrap() = ClassifyPhase::Classifying;

        let state = self.classify.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result: Result<ClassifyPhase, String> = async {
                let bytes = tokio::fs::read(&path).await.map_err(|e| e.to_string())?;
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(mime_for(&file_name))
                    .map_err(|e| e.to_string())?;
                let form = reqwest::multipart::Form::new().part("file", part);

                let response = client
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;

                if !response.status().is_success() {
                    return Err(format!("network response was not ok: HTTP {}", response.status()));
                }

                let body: ClassifyResponse = response.json().await.map_err(|e| e.to_string())?;
                body.into_phase()
            }
            .await;

            let mut s = state.lock().unwrap();
            match result {
                Ok(phase) => {
                    if let ClassifyPhase::Classified(c) = &phase {
                        info!(label = %c.label, confidence = c.confidence, "Image classified");
                    }
                    *s = phase;
                }
                Err(e) => {
                    error!(error = %e, "Classification failed");
                    *s = ClassifyPhase::Error(GENERIC_FAILURE_MSG.to_string());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }
}
