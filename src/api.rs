//! Typed client for the tracking/summarization backend.
//!
//! Every operation maps to one REST call. Non-2xx responses carry a JSON
//! `{"detail": ...}` body; that string becomes the error message, with a
//! generic status-code fallback when the body is not structured JSON.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use crate::constants::constants;
use crate::videos::VideoRecord;

/// A tracked channel as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRecord {
  pub channel_id: String,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

impl ChannelRecord {
  /// Display name: the fetched title, or the raw id until the backend has one.
  pub fn display_title(&self) -> &str {
    self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(&self.channel_id)
  }
}

/// A tracked search keyword. Mutations address the numeric row id.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRecord {
  #[serde(default)]
  pub id: Option<i64>,
  pub keyword: String,
  #[serde(default)]
  pub description: Option<String>,
}

/// Result of summarizing arbitrary text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextSummary {
  pub summary: String,
  #[serde(default)]
  pub key_phrases: Option<Vec<String>>,
  #[serde(default)]
  pub quality_score: Option<serde_json::Map<String, Value>>,
}

/// Result of summarizing a video by URL.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoSummary {
  pub title: String,
  pub channel: String,
  pub summary: String,
}

// --- Paths ---
//
// Identifiers land in URL path segments and are percent-encoded here, nowhere else.

fn channels_path() -> &'static str {
  "/api/v1/youtube/channels/"
}

fn channel_item_path(channel_id: &str) -> String {
  format!("/api/v1/youtube/channels/{}", urlencoding::encode(channel_id))
}

fn keywords_path() -> &'static str {
  "/api/v1/youtube/keywords/"
}

fn keyword_item_path(id: i64) -> String {
  format!("/api/v1/youtube/keywords/{}", id)
}

fn search_by_channel_path(channel_id: &str) -> String {
  format!("/api/v1/youtube/search/by-channel/{}", urlencoding::encode(channel_id))
}

fn search_by_keyword_path(keyword: &str) -> String {
  format!("/api/v1/youtube/search/by-keyword/{}", urlencoding::encode(keyword))
}

// --- Client ---

pub struct ApiClient {
  http: Client,
  base: String,
}

impl ApiClient {
  pub fn new(base: &str) -> Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(constants().http_timeout_secs))
      .build()
      .context("Failed to build HTTP client")?;
    Ok(Self { http, base: base.trim_end_matches('/').to_string() })
  }

  pub fn base(&self) -> &str {
    &self.base
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base, path)
  }

  // --- Channels ---

  pub async fn list_channels(&self) -> Result<Vec<ChannelRecord>> {
    let resp = self.get(channels_path()).await?;
    read_json(resp).await
  }

  pub async fn add_channel(&self, channel_id: &str) -> Result<ChannelRecord> {
    let resp = self.post(channels_path(), &json!({ "channel_id": channel_id })).await?;
    read_json(resp).await
  }

  pub async fn update_channel(&self, channel_id: &str, description: &str) -> Result<ChannelRecord> {
    let resp = self.put(&channel_item_path(channel_id), &json!({ "description": description })).await?;
    read_json(resp).await
  }

  pub async fn delete_channel(&self, channel_id: &str) -> Result<()> {
    let resp = self.delete(&channel_item_path(channel_id)).await?;
    read_ok(resp).await
  }

  // --- Keywords ---

  pub async fn list_keywords(&self) -> Result<Vec<KeywordRecord>> {
    let resp = self.get(keywords_path()).await?;
    read_json(resp).await
  }

  pub async fn add_keyword(&self, keyword: &str) -> Result<KeywordRecord> {
    let resp = self.post(keywords_path(), &json!({ "keyword": keyword })).await?;
    read_json(resp).await
  }

  pub async fn update_keyword(&self, id: i64, description: &str) -> Result<KeywordRecord> {
    let resp = self.put(&keyword_item_path(id), &json!({ "description": description })).await?;
    read_json(resp).await
  }

  pub async fn delete_keyword(&self, id: i64) -> Result<()> {
    let resp = self.delete(&keyword_item_path(id)).await?;
    read_ok(resp).await
  }

  // --- Search ---

  pub async fn search_by_channel(&self, channel_id: &str) -> Result<Vec<VideoRecord>> {
    let resp = self.get(&search_by_channel_path(channel_id)).await?;
    read_json(resp).await
  }

  pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<VideoRecord>> {
    let resp = self.get(&search_by_keyword_path(keyword)).await?;
    read_json(resp).await
  }

  // --- Summarization ---

  pub async fn summarize_text(&self, text: &str) -> Result<TextSummary> {
    let c = constants();
    let body = json!({
      "text": text,
      "style": c.summarize_style,
      "max_length": c.summarize_max_length,
      "language": c.summarize_language,
      "format": c.summarize_format,
    });
    let resp = self.post("/api/v1/summarize", &body).await?;
    read_json(resp).await
  }

  pub async fn summarize_video(&self, video_id: &str) -> Result<VideoSummary> {
    let url = format!("{}{}", constants().watch_url_base, video_id);
    let body = json!({ "url": url, "language": constants().summarize_language });
    let resp = self.post("/api/v1/summarize/youtube", &body).await?;
    read_json(resp).await
  }

  // --- Transport ---

  async fn get(&self, path: &str) -> Result<Response> {
    debug!(path, "GET");
    self.http.get(self.url(path)).send().await.map_err(connection_error)
  }

  async fn post(&self, path: &str, body: &Value) -> Result<Response> {
    debug!(path, "POST");
    self.http.post(self.url(path)).json(body).send().await.map_err(connection_error)
  }

  async fn put(&self, path: &str, body: &Value) -> Result<Response> {
    debug!(path, "PUT");
    self.http.put(self.url(path)).json(body).send().await.map_err(connection_error)
  }

  async fn delete(&self, path: &str) -> Result<Response> {
    debug!(path, "DELETE");
    self.http.delete(self.url(path)).send().await.map_err(connection_error)
  }
}

/// Transport failures (refused connection, DNS, timeout) all surface as one
/// generic connection error; the underlying cause goes to the log only.
fn connection_error(e: reqwest::Error) -> anyhow::Error {
  debug!(err = %e, "transport failure");
  anyhow!("Cannot reach the backend — is it running?")
}

/// Extract the backend `detail` message from a non-2xx response, falling
/// back to the status code when the body is not structured JSON.
async fn error_detail(resp: Response) -> anyhow::Error {
  let status = resp.status();
  match resp.json::<Value>().await {
    Ok(body) => match body.get("detail").and_then(Value::as_str) {
      Some(detail) => anyhow!("{}", detail),
      None => anyhow!("Request failed (status {})", status.as_u16()),
    },
    Err(_) => anyhow!("Request failed (status {})", status.as_u16()),
  }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
  if !resp.status().is_success() {
    return Err(error_detail(resp).await);
  }
  resp.json::<T>().await.context("Malformed response body")
}

async fn read_ok(resp: Response) -> Result<()> {
  if !resp.status().is_success() {
    return Err(error_detail(resp).await);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- path building ---

  #[test]
  fn channel_paths_percent_encode_the_id() {
    assert_eq!(channel_item_path("UC abc/def"), "/api/v1/youtube/channels/UC%20abc%2Fdef");
    assert_eq!(search_by_channel_path("@handle"), "/api/v1/youtube/search/by-channel/%40handle");
  }

  #[test]
  fn keyword_search_path_encodes_hangul() {
    assert_eq!(
      search_by_keyword_path("러스트 입문"),
      "/api/v1/youtube/search/by-keyword/%EB%9F%AC%EC%8A%A4%ED%8A%B8%20%EC%9E%85%EB%AC%B8"
    );
  }

  #[test]
  fn plain_ids_pass_through_unchanged() {
    assert_eq!(channel_item_path("UCxyz123"), "/api/v1/youtube/channels/UCxyz123");
    assert_eq!(keyword_item_path(42), "/api/v1/youtube/keywords/42");
  }

  #[test]
  fn base_url_trailing_slash_is_normalized() {
    let client = ApiClient::new("http://localhost:8000/").unwrap();
    assert_eq!(client.url(channels_path()), "http://localhost:8000/api/v1/youtube/channels/");
  }

  // --- record helpers ---

  #[test]
  fn channel_display_title_falls_back_to_id() {
    let titled: ChannelRecord =
      serde_json::from_str(r#"{"channel_id": "UC1", "title": "My Channel"}"#).unwrap();
    let untitled: ChannelRecord = serde_json::from_str(r#"{"channel_id": "UC2"}"#).unwrap();
    assert_eq!(titled.display_title(), "My Channel");
    assert_eq!(untitled.display_title(), "UC2");
  }

  #[test]
  fn keyword_record_tolerates_missing_optional_fields() {
    let k: KeywordRecord = serde_json::from_str(r#"{"keyword": "rust"}"#).unwrap();
    assert_eq!(k.keyword, "rust");
    assert_eq!(k.id, None);
    assert_eq!(k.description, None);
  }

  #[test]
  fn text_summary_optional_fields_default() {
    let s: TextSummary = serde_json::from_str(r#"{"summary": "short"}"#).unwrap();
    assert_eq!(s.summary, "short");
    assert!(s.key_phrases.is_none());
    assert!(s.quality_score.is_none());
  }
}
