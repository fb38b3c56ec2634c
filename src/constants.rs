//! Application constants and configuration

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const SUGGESTION_PATH: &str = "/get_disposal_suggestion";
pub const CLASSIFY_PATH: &str = "/classify";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shown in the suggestion container while the request is in flight
pub const SUGGESTION_LOADING_MSG: &str = "♻️ Asking the AI for disposal tips...";

/// Shown for any transport, status, or parse failure
pub const GENERIC_FAILURE_MSG: &str = "Sorry, something went wrong. Please try again.";

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];
