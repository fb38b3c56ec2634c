//! Disposal suggestion request logic

use super::App;
use crate::constants::SUGGESTION_PATH;
use crate::types::*;
use eframe::egui;
use tracing::{error, info};

impl App {
    /// Fetch an AI disposal suggestion for the classified trash type.
    ///
    /// The container is put into Loading synchronously, before the request is
    /// spawned. Requests are never cancelled: a second click while one is in
    /// flight leaves both running, and whichever settles last overwrites the
    /// container.
    pub fn request_disposal_suggestion(&mut self, ctx: &egui::Context, trash_type: String) {
        let request = self.suggestion.lock().unwrap().begin();
        let url = format!("{}{}", self.server_url, SUGGESTION_PATH);

        info!(request, trash_type = %trash_type, url = %url, "Requesting disposal suggestion");

        let state = self.suggestion.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result: Result<SuggestionPhase, String> = async {
                let response = client
                    .post(&url)
                    .json(&SuggestionRequest { trash_type })
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;

                if !response.status().is_success() {
                    return Err(format!("network response was not ok: HTTP {}", response.status()));
                }

                let body: SuggestionResponse = response.json().await.map_err(|e| e.to_string())?;
                body.into_phase()
            }
            .await;

            let mut s = state.lock().unwrap();
            match result {
                Ok(phase) => s.settle(phase),
                Err(e) => {
                    // Cause is logged only; the user sees the fixed message
                    error!(request, error = %e, "Failed to fetch disposal suggestion");
                    s.settle(generic_failure());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }
}
