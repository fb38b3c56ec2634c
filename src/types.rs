//! Common types and data structures

use eframe::egui;
use std::path::PathBuf;

use crate::constants::GENERIC_FAILURE_MSG;

/// A picked file after the background read + decode, waiting for the UI
/// thread to upload its texture
pub struct LoadedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub image: egui::ColorImage,
}

/// The image currently shown in the preview panel. `Some` means the preview
/// panel is visible, `None` means the empty upload area is — never both.
pub struct UploadedImage {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub texture: egui::TextureHandle,
}

/// Classification result for the current image
#[derive(Clone, PartialEq, Debug)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// State of the classify exchange
#[derive(Clone, PartialEq, Debug)]
pub enum ClassifyPhase {
    Idle,
    Classifying,
    Classified(Classification),
    Error(String), // user-visible message, cause already logged
}

/// What the suggestion container shows. Exactly one variant at a time,
/// reflecting the most recently settled request.
#[derive(Clone, PartialEq, Debug)]
pub enum SuggestionPhase {
    Hidden,
    Loading,
    Ready(String), // markdown from the backend
    Error(String), // final user-visible message, rendered in the error color
}

/// Shared state for the disposal-suggestion exchange. Requests are never
/// cancelled: each spawned task settles this state unconditionally, so the
/// last response to arrive wins regardless of click order.
pub struct SuggestionState {
    pub phase: SuggestionPhase,
    pub request_count: u64,
}

impl Default for SuggestionState {
    fn default() -> Self {
        Self {
            phase: SuggestionPhase::Hidden,
            request_count: 0,
        }
    }
}

impl SuggestionState {
    /// Reveal the container with the loading indicator. Returns the request
    /// number, used only for log correlation.
    pub fn begin(&mut self) -> u64 {
        self.request_count += 1;
        self.phase = SuggestionPhase::Loading;
        self.request_count
    }

    /// Overwrite the container with a settled outcome.
    pub fn settle(&mut self, phase: SuggestionPhase) {
        self.phase = phase;
    }
}

/// Request body for `/get_disposal_suggestion`
#[derive(serde::Serialize)]
pub struct SuggestionRequest {
    pub trash_type: String,
}

/// Response body from `/get_disposal_suggestion`
#[derive(serde::Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SuggestionResponse {
    /// Collapse a parsed body into a container phase. An `error` field wins
    /// over `suggestion`; a body carrying neither is malformed and reported
    /// as `Err` for the caller to log and collapse into the generic message.
    pub fn into_phase(self) -> Result<SuggestionPhase, String> {
        if let Some(err) = self.error {
            return Ok(SuggestionPhase::Error(format!("Error: {}", err)));
        }
        match self.suggestion {
            Some(md) => Ok(SuggestionPhase::Ready(md)),
            None => Err("response body has neither `suggestion` nor `error`".to_string()),
        }
    }
}

/// Response body from `/classify`
#[derive(serde::Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClassifyResponse {
    pub fn into_phase(self) -> Result<ClassifyPhase, String> {
        if let Some(err) = self.error {
            return Ok(ClassifyPhase::Error(format!("Error: {}", err)));
        }
        match (self.prediction, self.confidence) {
            (Some(label), Some(confidence)) => Ok(ClassifyPhase::Classified(Classification {
                label,
                confidence,
            })),
            _ => Err("response body missing `prediction` or `confidence`".to_string()),
        }
    }
}

/// The collapsed user-facing phase for any transport, status, or parse
/// failure. The underlying cause is only logged.
pub fn generic_failure() -> SuggestionPhase {
    SuggestionPhase::Error(GENERIC_FAILURE_MSG.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_body_maps_to_ready() {
        let body: SuggestionResponse =
            serde_json::from_str(r#"{"suggestion": "**bold**"}"#).unwrap();
        assert_eq!(
            body.into_phase().unwrap(),
            SuggestionPhase::Ready("**bold**".to_string())
        );
    }

    #[test]
    fn error_body_is_shown_verbatim_with_prefix() {
        let body: SuggestionResponse = serde_json::from_str(r#"{"error": "bad type"}"#).unwrap();
        assert_eq!(
            body.into_phase().unwrap(),
            SuggestionPhase::Error("Error: bad type".to_string())
        );
    }

    #[test]
    fn error_field_wins_over_suggestion() {
        let body: SuggestionResponse =
            serde_json::from_str(r#"{"suggestion": "tips", "error": "quota"}"#).unwrap();
        assert_eq!(
            body.into_phase().unwrap(),
            SuggestionPhase::Error("Error: quota".to_string())
        );
    }

    #[test]
    fn empty_body_is_malformed() {
        let body: SuggestionResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_phase().is_err());
    }

    #[test]
    fn suggestion_state_loading_precedes_settle() {
        let mut state = SuggestionState::default();
        assert_eq!(state.phase, SuggestionPhase::Hidden);

        let req = state.begin();
        assert_eq!(req, 1);
        assert_eq!(state.phase, SuggestionPhase::Loading);

        state.settle(SuggestionPhase::Ready("ok".to_string()));
        assert_eq!(state.phase, SuggestionPhase::Ready("ok".to_string()));
    }

    #[test]
    fn last_settled_response_wins() {
        let mut state = SuggestionState::default();
        state.begin();
        state.begin();

        // Two in-flight requests settle out of click order: the container
        // reflects whichever lands last.
        state.settle(SuggestionPhase::Ready("second".to_string()));
        state.settle(SuggestionPhase::Ready("first".to_string()));
        assert_eq!(state.phase, SuggestionPhase::Ready("first".to_string()));
    }

    #[test]
    fn classify_body_maps_to_classification() {
        let body: ClassifyResponse =
            serde_json::from_str(r#"{"prediction": "plastic", "confidence": 0.93}"#).unwrap();
        match body.into_phase().unwrap() {
            ClassifyPhase::Classified(c) => {
                assert_eq!(c.label, "plastic");
                assert!((c.confidence - 0.93).abs() < f32::EPSILON);
            }
            other => panic!("unexpected phase: {:?}", other),
        }
    }

    #[test]
    fn classify_error_body() {
        let body: ClassifyResponse =
            serde_json::from_str(r#"{"error": "No file uploaded"}"#).unwrap();
        assert_eq!(
            body.into_phase().unwrap(),
            ClassifyPhase::Error("Error: No file uploaded".to_string())
        );
    }

    #[test]
    fn classify_partial_body_is_malformed() {
        let body: ClassifyResponse = serde_json::from_str(r#"{"prediction": "glass"}"#).unwrap();
        assert!(body.into_phase().is_err());
    }
}
