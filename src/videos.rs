//! The video result view: an owned list of records fetched from the backend,
//! re-sortable and substring-filterable without re-fetching.
//!
//! Records are never mutated here. `load`/`sort`/`filter` only rebuild the
//! `visible` index list; rendering reads through it.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

use crate::constants::constants;

/// Display label when a record has no view count (distinct from a count of 0).
pub const NO_VIEW_DATA: &str = "조회수 정보 없음";
/// Display label when a record has no description.
pub const NO_DESCRIPTION: &str = "설명 없음";
/// Display label when a record has no publish date.
pub const NO_DATE: &str = "날짜 정보 없음";

/// A single video's metadata as returned by the search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRecord {
  pub video_id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default, deserialize_with = "de_published_at")]
  pub published_at: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "de_view_count")]
  pub view_count: Option<u64>,
  #[serde(default)]
  pub thumbnail: Option<String>,
}

impl VideoRecord {
  /// The external playback URL for this record.
  pub fn watch_url(&self) -> String {
    format!("{}{}", constants().watch_url_base, self.video_id)
  }

  /// Thumbnail URL, substituting the fixed placeholder when absent.
  pub fn thumbnail_url(&self) -> &str {
    self.thumbnail.as_deref().filter(|s| !s.is_empty()).unwrap_or(&constants().placeholder_thumbnail)
  }
}

/// The backend sends `view_count` either as a JSON number or as a numeric
/// string depending on which service path produced the record. Unparseable
/// strings degrade to "no data" rather than failing the whole response.
fn de_view_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Num(u64),
    Text(String),
  }
  Ok(match Option::<Raw>::deserialize(deserializer)? {
    None => None,
    Some(Raw::Num(n)) => Some(n),
    Some(Raw::Text(s)) => s.trim().parse().ok(),
  })
}

/// Timestamps arrive as ISO-8601 with an offset (YouTube API passthrough) or
/// as naive datetimes (backend ORM rows). Naive values are taken as UTC.
fn de_published_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(deserializer)?;
  Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|n| n.and_utc())
}

// --- Sorting ---

/// Ordering criterion applied to the full record set before any filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  DateDesc,
  DateAsc,
  ViewsDesc,
  ViewsAsc,
  TitleAsc,
  TitleDesc,
}

impl SortKey {
  pub const ALL: [SortKey; 6] =
    [SortKey::DateDesc, SortKey::DateAsc, SortKey::ViewsDesc, SortKey::ViewsAsc, SortKey::TitleAsc, SortKey::TitleDesc];

  pub fn label(self) -> &'static str {
    match self {
      SortKey::DateDesc => "newest",
      SortKey::DateAsc => "oldest",
      SortKey::ViewsDesc => "most viewed",
      SortKey::ViewsAsc => "least viewed",
      SortKey::TitleAsc => "title a–z",
      SortKey::TitleDesc => "title z–a",
    }
  }

  /// Parse a stored key name. Unrecognized input falls back to the default
  /// order instead of erroring.
  pub fn from_config(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "date_asc" => SortKey::DateAsc,
      "views_desc" => SortKey::ViewsDesc,
      "views_asc" => SortKey::ViewsAsc,
      "title_asc" => SortKey::TitleAsc,
      "title_desc" => SortKey::TitleDesc,
      _ => SortKey::DateDesc,
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

fn published(r: &VideoRecord) -> DateTime<Utc> {
  // Missing dates sort as the earliest possible instant.
  r.published_at.unwrap_or(DateTime::UNIX_EPOCH)
}

fn views(r: &VideoRecord) -> u64 {
  r.view_count.unwrap_or(0)
}

fn compare(a: &VideoRecord, b: &VideoRecord, key: SortKey) -> Ordering {
  match key {
    SortKey::DateDesc => published(b).cmp(&published(a)),
    SortKey::DateAsc => published(a).cmp(&published(b)),
    SortKey::ViewsDesc => views(b).cmp(&views(a)),
    SortKey::ViewsAsc => views(a).cmp(&views(b)),
    SortKey::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    SortKey::TitleDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
  }
}

// --- The view ---

/// Owns the fetched record set plus the active sort key and filter term.
/// All transformations produce a fresh `visible` index list; the records
/// themselves are untouched.
pub struct VideoView {
  records: Vec<VideoRecord>,
  active_sort: SortKey,
  filter: String,
  /// Indices into `records`: full set ordered by `active_sort`, then reduced
  /// by the filter term. Rebuilt on every load/sort/filter call.
  visible: Vec<usize>,
}

impl VideoView {
  pub fn new() -> Self {
    Self { records: Vec::new(), active_sort: SortKey::DateDesc, filter: String::new(), visible: Vec::new() }
  }

  /// Replace the record set with a freshly fetched one. Resets the filter
  /// term and returns the sort key to the default most-recent-first order.
  pub fn load(&mut self, records: Vec<VideoRecord>) {
    self.records = records;
    self.filter.clear();
    self.active_sort = SortKey::DateDesc;
    self.rebuild();
  }

  /// Re-sort the full record set by `key`, then reapply the current filter.
  /// Sorting never starts from a previously filtered subset.
  pub fn sort(&mut self, key: SortKey) {
    self.active_sort = key;
    self.rebuild();
  }

  /// Set the filter term (raw, untrimmed user input). A term that trims to
  /// empty restores the full set ordered by the active sort key. Each call
  /// re-derives from the full set; only the latest term applies.
  pub fn filter(&mut self, term: &str) {
    self.filter = term.to_string();
    self.rebuild();
  }

  fn rebuild(&mut self) {
    let mut order: Vec<usize> = (0..self.records.len()).collect();
    // sort_by is stable: equal keys keep the fetched relative order.
    order.sort_by(|&a, &b| compare(&self.records[a], &self.records[b], self.active_sort));

    let needle = self.filter.trim().to_lowercase();
    self.visible = if needle.is_empty() {
      order
    } else {
      order.into_iter().filter(|&i| Self::matches(&self.records[i], &needle)).collect()
    };
  }

  /// Case-insensitive substring match against title and description.
  fn matches(record: &VideoRecord, needle_lower: &str) -> bool {
    if record.title.to_lowercase().contains(needle_lower) {
      return true;
    }
    if let Some(ref desc) = record.description
      && desc.to_lowercase().contains(needle_lower)
    {
      return true;
    }
    false
  }

  pub fn active_sort(&self) -> SortKey {
    self.active_sort
  }

  pub fn filter_term(&self) -> &str {
    &self.filter
  }

  /// Number of records currently displayed (after filtering).
  pub fn visible_len(&self) -> usize {
    self.visible.len()
  }

  /// Number of records loaded (before filtering).
  pub fn total_len(&self) -> usize {
    self.records.len()
  }

  /// The record at the given display position, if any.
  pub fn get(&self, display_idx: usize) -> Option<&VideoRecord> {
    self.visible.get(display_idx).map(|&i| &self.records[i])
  }

  /// Records in display order.
  pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
    self.visible.iter().map(|&i| &self.records[i])
  }
}

// --- Display formatting ---

/// Render a view count with magnitude-scaled Korean units. A missing count
/// renders as an explicit "no data" label, distinct from zero.
pub fn format_view_count(count: Option<u64>) -> String {
  let Some(n) = count else {
    return NO_VIEW_DATA.to_string();
  };
  if n >= 10_000_000 {
    format!("{:.1}천만", n as f64 / 10_000_000.0)
  } else if n >= 10_000 {
    format!("{:.1}만", n as f64 / 10_000.0)
  } else if n >= 1_000 {
    format!("{:.1}천", n as f64 / 1_000.0)
  } else {
    n.to_string()
  }
}

/// Description preview: first `description_preview_chars` characters plus an
/// ellipsis when longer. The stored value is untouched.
pub fn preview_description(description: Option<&str>) -> String {
  let max_chars = constants().description_preview_chars;
  match description.filter(|d| !d.is_empty()) {
    Some(d) if d.chars().count() > max_chars => {
      let head: String = d.chars().take(max_chars).collect();
      format!("{}…", head)
    }
    Some(d) => d.to_string(),
    None => NO_DESCRIPTION.to_string(),
  }
}

/// Publish date in the backend's display convention ("2024년 3월 1일").
pub fn format_published_at(ts: Option<DateTime<Utc>>) -> String {
  match ts {
    Some(dt) => format!("{}년 {}월 {}일", dt.year(), dt.month(), dt.day()),
    None => NO_DATE.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(video_id: &str) -> VideoRecord {
    VideoRecord {
      video_id: video_id.to_string(),
      title: String::new(),
      description: None,
      published_at: None,
      view_count: None,
      thumbnail: None,
    }
  }

  fn with_date(video_id: &str, rfc3339: &str) -> VideoRecord {
    VideoRecord { published_at: parse_timestamp(rfc3339), ..record(video_id) }
  }

  fn with_views(video_id: &str, views: Option<u64>) -> VideoRecord {
    VideoRecord { view_count: views, ..record(video_id) }
  }

  fn with_title(video_id: &str, title: &str) -> VideoRecord {
    VideoRecord { title: title.to_string(), ..record(video_id) }
  }

  fn visible_ids(view: &VideoView) -> Vec<&str> {
    view.iter().map(|r| r.video_id.as_str()).collect()
  }

  // --- load ---

  #[test]
  fn load_empty_is_valid_and_shows_nothing() {
    let mut view = VideoView::new();
    view.load(Vec::new());
    assert_eq!(view.total_len(), 0);
    assert_eq!(view.visible_len(), 0);
    assert!(view.get(0).is_none());
  }

  #[test]
  fn load_resets_sort_and_filter() {
    let mut view = VideoView::new();
    view.load(vec![with_title("a", "alpha"), with_title("b", "beta")]);
    view.sort(SortKey::TitleDesc);
    view.filter("alpha");
    assert_eq!(view.visible_len(), 1);

    view.load(vec![with_title("c", "gamma")]);
    assert_eq!(view.active_sort(), SortKey::DateDesc);
    assert_eq!(view.filter_term(), "");
    assert_eq!(view.visible_len(), 1);
  }

  // --- sort ---

  #[test]
  fn date_sort_reverses_when_all_distinct() {
    let mut view = VideoView::new();
    view.load(vec![
      with_date("mid", "2024-06-15T00:00:00Z"),
      with_date("new", "2024-12-01T00:00:00Z"),
      with_date("old", "2023-01-01T00:00:00Z"),
    ]);
    assert_eq!(visible_ids(&view), ["new", "mid", "old"]);

    view.sort(SortKey::DateAsc);
    assert_eq!(visible_ids(&view), ["old", "mid", "new"]);
  }

  #[test]
  fn missing_date_sorts_as_epoch() {
    let mut view = VideoView::new();
    view.load(vec![with_date("dated", "2024-01-01T00:00:00Z"), record("undated")]);
    view.sort(SortKey::DateAsc);
    assert_eq!(visible_ids(&view), ["undated", "dated"]);

    view.sort(SortKey::DateDesc);
    assert_eq!(visible_ids(&view), ["dated", "undated"]);
  }

  #[test]
  fn views_desc_treats_missing_as_zero() {
    let mut view = VideoView::new();
    view.load(vec![with_views("five", Some(5)), with_views("none", None), with_views("hundred", Some(100))]);
    view.sort(SortKey::ViewsDesc);
    assert_eq!(visible_ids(&view), ["hundred", "five", "none"]);
  }

  #[test]
  fn views_asc_ties_keep_loaded_order() {
    let mut view = VideoView::new();
    view.load(vec![with_views("none", None), with_views("zero", Some(0)), with_views("one", Some(1))]);
    view.sort(SortKey::ViewsAsc);
    // none and zero both compare as 0; stable sort keeps loaded order.
    assert_eq!(visible_ids(&view), ["none", "zero", "one"]);
  }

  #[test]
  fn title_sort_is_case_insensitive() {
    let mut view = VideoView::new();
    view.load(vec![with_title("b", "banana"), with_title("a", "Apple"), with_title("c", "cherry")]);
    view.sort(SortKey::TitleAsc);
    assert_eq!(visible_ids(&view), ["a", "b", "c"]);

    view.sort(SortKey::TitleDesc);
    assert_eq!(visible_ids(&view), ["c", "b", "a"]);
  }

  #[test]
  fn missing_title_sorts_as_empty_string() {
    let mut view = VideoView::new();
    view.load(vec![with_title("titled", "anything"), record("untitled")]);
    view.sort(SortKey::TitleAsc);
    assert_eq!(visible_ids(&view), ["untitled", "titled"]);
  }

  // --- filter ---

  #[test]
  fn filter_matches_title_case_insensitively() {
    let mut view = VideoView::new();
    view.load(vec![with_title("hit", "The ABC Special"), with_title("miss", "Something else")]);
    view.sort(SortKey::TitleDesc);
    view.filter("abc");
    assert_eq!(visible_ids(&view), ["hit"]);
  }

  #[test]
  fn filter_matches_description() {
    let mut view = VideoView::new();
    let mut r = with_title("desc", "unrelated title");
    r.description = Some("deep dive into Rust".to_string());
    view.load(vec![r, with_title("other", "another video")]);
    view.filter("RUST");
    assert_eq!(visible_ids(&view), ["desc"]);
  }

  #[test]
  fn filter_term_is_trimmed() {
    let mut view = VideoView::new();
    view.load(vec![with_title("a", "alpha"), with_title("b", "beta")]);
    view.filter("  alpha  ");
    assert_eq!(visible_ids(&view), ["a"]);

    view.filter("   ");
    assert_eq!(view.visible_len(), 2);
  }

  #[test]
  fn empty_filter_restores_full_set_in_active_sort() {
    let mut view = VideoView::new();
    view.load(vec![with_title("b", "beta"), with_title("a", "alpha"), with_title("c", "gamma")]);
    view.sort(SortKey::TitleAsc);
    view.filter("alpha");
    assert_eq!(view.visible_len(), 1);

    view.filter("");
    assert_eq!(view.visible_len(), 3);
    assert_eq!(visible_ids(&view), ["a", "b", "c"]);
  }

  #[test]
  fn filter_rederives_from_full_set_not_previous_subset() {
    let mut view = VideoView::new();
    view.load(vec![with_title("a", "apple pie"), with_title("b", "banana bread"), with_title("c", "apple crumble")]);
    view.filter("apple");
    assert_eq!(view.visible_len(), 2);
    // "banana" matches nothing within the previous subset but one record in
    // the full set; the full set must win.
    view.filter("banana");
    assert_eq!(visible_ids(&view), ["b"]);
  }

  #[test]
  fn sort_after_filter_operates_on_full_set() {
    let mut view = VideoView::new();
    view.load(vec![
      with_views("a", Some(10)),
      with_views("b", Some(30)),
      VideoRecord { title: "match".to_string(), ..with_views("m", Some(20)) },
    ]);
    view.filter("match");
    assert_eq!(view.visible_len(), 1);

    view.sort(SortKey::ViewsDesc);
    // Filter is reapplied after sorting the full set: still one visible, but
    // the total count is unchanged underneath.
    assert_eq!(view.visible_len(), 1);
    assert_eq!(view.total_len(), 3);

    view.filter("");
    assert_eq!(visible_ids(&view), ["b", "m", "a"]);
  }

  // --- SortKey ---

  #[test]
  fn sort_key_from_config_round_trips() {
    assert_eq!(SortKey::from_config("date_asc"), SortKey::DateAsc);
    assert_eq!(SortKey::from_config("VIEWS_DESC"), SortKey::ViewsDesc);
    assert_eq!(SortKey::from_config("title_desc"), SortKey::TitleDesc);
  }

  #[test]
  fn sort_key_from_config_unknown_defaults_to_date_desc() {
    assert_eq!(SortKey::from_config("shuffle"), SortKey::DateDesc);
    assert_eq!(SortKey::from_config(""), SortKey::DateDesc);
  }

  #[test]
  fn sort_key_cycle_covers_all_and_wraps() {
    let mut key = SortKey::DateDesc;
    for _ in 0..SortKey::ALL.len() {
      key = key.next();
    }
    assert_eq!(key, SortKey::DateDesc);
    assert_eq!(SortKey::DateDesc.prev(), SortKey::TitleDesc);
  }

  // --- formatting ---

  #[test]
  fn view_count_formatting_units() {
    assert_eq!(format_view_count(Some(999)), "999");
    assert_eq!(format_view_count(Some(1_500)), "1.5천");
    assert_eq!(format_view_count(Some(25_000)), "2.5만");
    assert_eq!(format_view_count(Some(15_000_000)), "1.5천만");
    assert_eq!(format_view_count(None), NO_VIEW_DATA);
  }

  #[test]
  fn view_count_zero_is_not_no_data() {
    assert_eq!(format_view_count(Some(0)), "0");
  }

  #[test]
  fn view_count_exact_unit_boundaries() {
    assert_eq!(format_view_count(Some(1_000)), "1.0천");
    assert_eq!(format_view_count(Some(10_000)), "1.0만");
    assert_eq!(format_view_count(Some(10_000_000)), "1.0천만");
  }

  #[test]
  fn description_preview_truncates_at_100_chars() {
    let long: String = "x".repeat(150);
    let preview = preview_description(Some(&long));
    assert_eq!(preview.chars().count(), 101);
    assert!(preview.ends_with('…'));
    assert!(preview.starts_with(&"x".repeat(100)));
  }

  #[test]
  fn description_preview_short_is_unchanged() {
    let short: String = "y".repeat(50);
    assert_eq!(preview_description(Some(&short)), short);
  }

  #[test]
  fn description_preview_counts_chars_not_bytes() {
    // 150 hangul syllables are 450 bytes; the cut must be at 100 characters.
    let hangul: String = "가".repeat(150);
    let preview = preview_description(Some(&hangul));
    assert_eq!(preview.chars().count(), 101);
  }

  #[test]
  fn description_preview_missing_or_empty() {
    assert_eq!(preview_description(None), NO_DESCRIPTION);
    assert_eq!(preview_description(Some("")), NO_DESCRIPTION);
  }

  #[test]
  fn published_at_formatting() {
    assert_eq!(format_published_at(parse_timestamp("2024-03-01T09:30:00Z")), "2024년 3월 1일");
    assert_eq!(format_published_at(None), NO_DATE);
  }

  // --- deserialization ---

  #[test]
  fn view_count_accepts_number_or_numeric_string() {
    let n: VideoRecord = serde_json::from_str(r#"{"video_id": "v", "view_count": 1000}"#).unwrap();
    let s: VideoRecord = serde_json::from_str(r#"{"video_id": "v", "view_count": "1000"}"#).unwrap();
    assert_eq!(n.view_count, Some(1000));
    assert_eq!(s.view_count, n.view_count);
  }

  #[test]
  fn view_count_garbage_string_degrades_to_none() {
    let r: VideoRecord = serde_json::from_str(r#"{"video_id": "v", "view_count": "unknown"}"#).unwrap();
    assert_eq!(r.view_count, None);
  }

  #[test]
  fn published_at_accepts_offset_and_naive_forms() {
    let offset: VideoRecord =
      serde_json::from_str(r#"{"video_id": "v", "published_at": "2024-05-01T12:00:00+09:00"}"#).unwrap();
    let naive: VideoRecord =
      serde_json::from_str(r#"{"video_id": "v", "published_at": "2024-05-01T12:00:00"}"#).unwrap();
    assert!(offset.published_at.is_some());
    assert!(naive.published_at.is_some());
  }

  #[test]
  fn missing_fields_degrade_to_placeholders() {
    let r: VideoRecord = serde_json::from_str(r#"{"video_id": "v"}"#).unwrap();
    assert_eq!(r.title, "");
    assert_eq!(format_view_count(r.view_count), NO_VIEW_DATA);
    assert_eq!(preview_description(r.description.as_deref()), NO_DESCRIPTION);
    assert_eq!(format_published_at(r.published_at), NO_DATE);
    assert!(r.thumbnail_url().contains("placeholder"));
  }

  #[test]
  fn watch_url_is_built_from_video_id() {
    let r = record("dQw4w9WgXcQ");
    assert_eq!(r.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
  }
}
