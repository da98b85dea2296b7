//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Backend
  pub default_api_base: String,
  pub http_timeout_secs: u64,

  // YouTube
  pub watch_url_base: String,
  pub placeholder_thumbnail: String,

  // Video list rendering
  pub description_preview_chars: usize,

  // Summarization request defaults
  pub summarize_style: String,
  pub summarize_max_length: u32,
  pub summarize_language: String,
  pub summarize_format: String,

  // Status banners
  pub banner_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
