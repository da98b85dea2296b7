use anyhow::{Result, anyhow};
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::{ApiClient, ChannelRecord, KeywordRecord, TextSummary, VideoSummary};
use crate::config::Config;
use crate::constants::constants;
use crate::input::char_to_byte_index;
use crate::theme::THEMES;
use crate::videos::{VideoRecord, VideoView};

// --- Screens and modes ---

/// Top-level tab. Channels and Keywords manage the tracked sets; Videos is
/// the result view; Summary shows the latest summarization output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Channels,
  Keywords,
  Videos,
  Summary,
}

impl Screen {
  pub const ALL: [Screen; 4] = [Screen::Channels, Screen::Keywords, Screen::Videos, Screen::Summary];

  pub fn label(self) -> &'static str {
    match self {
      Screen::Channels => "Channels",
      Screen::Keywords => "Keywords",
      Screen::Videos => "Videos",
      Screen::Summary => "Summary",
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// Keyboard focus within the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Navigating the active screen's list.
  List,
  /// Editing the input line; Enter dispatches `input_action`.
  Input,
  /// Typing a filter term for the video view (live, per keystroke).
  Filter,
  /// Awaiting y/n for `pending_delete`.
  Confirm,
}

/// What Enter does with the input line's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
  AddChannel,
  AddKeyword,
  EditChannel { channel_id: String },
  EditKeyword { id: i64 },
  SummarizeText,
}

impl InputAction {
  /// Title for the input box.
  pub fn label(&self) -> &'static str {
    match self {
      InputAction::AddChannel => " Add channel (ID or URL) ",
      InputAction::AddKeyword => " Add keyword ",
      InputAction::EditChannel { .. } => " Edit channel description ",
      InputAction::EditKeyword { .. } => " Edit keyword description ",
      InputAction::SummarizeText => " Summarize text ",
    }
  }
}

/// A delete awaiting confirmation.
#[derive(Debug, Clone)]
pub enum PendingDelete {
  Channel { channel_id: String, title: String },
  Keyword { id: i64, keyword: String },
}

impl PendingDelete {
  pub fn describe(&self) -> String {
    match self {
      PendingDelete::Channel { title, .. } => format!("Delete channel \"{}\"?", title),
      PendingDelete::Keyword { keyword, .. } => format!("Delete keyword \"{}\"?", keyword),
    }
  }
}

/// Where the current video set came from, for banner text.
#[derive(Debug, Clone)]
pub enum SearchOrigin {
  Channel(String),
  Keyword(String),
}

impl SearchOrigin {
  pub fn label(&self) -> String {
    match self {
      SearchOrigin::Channel(name) => format!("channel '{}'", name),
      SearchOrigin::Keyword(kw) => format!("keyword '{}'", kw),
    }
  }
}

/// Output of the latest summarize call, either flavor.
#[derive(Debug, Clone)]
pub enum SummaryResult {
  Text(TextSummary),
  Video(VideoSummary),
}

/// Outcome of a CRUD mutation: picks the success banner and which list to
/// reload afterwards.
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
  ChannelAdded { title: String },
  ChannelUpdated,
  ChannelDeleted,
  KeywordAdded { keyword: String },
  KeywordUpdated,
  KeywordDeleted,
}

/// In-flight async task receivers. Replacing a receiver abandons the earlier
/// request; the last call to complete wins.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) channels_rx: Option<oneshot::Receiver<Result<Vec<ChannelRecord>>>>,
  pub(crate) keywords_rx: Option<oneshot::Receiver<Result<Vec<KeywordRecord>>>>,
  pub(crate) videos_rx: Option<oneshot::Receiver<Result<Vec<VideoRecord>>>>,
  pub(crate) summary_rx: Option<oneshot::Receiver<Result<SummaryResult>>>,
  pub(crate) mutate_rx: Option<oneshot::Receiver<Result<Mutation>>>,
}

// --- App state ---

pub struct App {
  pub api: Arc<ApiClient>,
  pub screen: Screen,
  pub mode: Mode,
  pub theme_index: usize,

  pub channels: Vec<ChannelRecord>,
  pub channel_list: ListState,
  pub keywords: Vec<KeywordRecord>,
  pub keyword_list: ListState,

  pub videos: VideoView,
  pub video_list: ListState,
  /// Cursor position within the filter term (char index).
  pub filter_cursor: usize,
  /// Horizontal scroll offset for the filter input.
  pub filter_scroll: usize,

  pub summary: Option<SummaryResult>,
  pub summary_scroll: u16,

  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub input_action: InputAction,

  pub pending_delete: Option<PendingDelete>,
  pub should_quit: bool,

  /// In-progress message ("Loading channels…"), cleared when the task lands.
  pub busy: Option<String>,
  pub last_error: Option<String>,
  pub notice: Option<String>,
  error_time: Option<Instant>,
  notice_time: Option<Instant>,

  pub(crate) tasks: AsyncTasks,
  pending_search: Option<SearchOrigin>,
  saved_api_base: Option<String>,
}

impl App {
  pub fn new(api: ApiClient, config: &Config) -> Self {
    let theme_index =
      config.theme_name.as_ref().and_then(|name| THEMES.iter().position(|t| t.name == name)).unwrap_or(0);

    Self {
      api: Arc::new(api),
      screen: Screen::Channels,
      mode: Mode::List,
      theme_index,
      channels: Vec::new(),
      channel_list: ListState::default(),
      keywords: Vec::new(),
      keyword_list: ListState::default(),
      videos: VideoView::new(),
      video_list: ListState::default(),
      filter_cursor: 0,
      filter_scroll: 0,
      summary: None,
      summary_scroll: 0,
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      input_action: InputAction::AddChannel,
      pending_delete: None,
      should_quit: false,
      busy: None,
      last_error: None,
      notice: None,
      error_time: None,
      notice_time: None,
      tasks: AsyncTasks::default(),
      pending_search: None,
      saved_api_base: config.api_base.clone(),
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config { theme_name: Some(self.theme().name.to_string()), api_base: self.saved_api_base.clone() };
    config.save();
  }

  // --- Banners ---

  pub fn set_error(&mut self, msg: String) {
    warn!(msg = %msg, "error banner");
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  pub fn set_notice(&mut self, msg: String) {
    self.notice = Some(msg);
    self.notice_time = Some(Instant::now());
  }

  /// Clear stale banners after the configured TTL.
  pub fn expire_banners(&mut self) {
    let ttl = Duration::from_secs(constants().banner_secs);
    if let Some(t) = self.error_time
      && t.elapsed() >= ttl
    {
      self.last_error = None;
      self.error_time = None;
    }
    if let Some(t) = self.notice_time
      && t.elapsed() >= ttl
    {
      self.notice = None;
      self.notice_time = None;
    }
  }

  // --- Selection helpers ---

  pub fn selected_channel(&self) -> Option<&ChannelRecord> {
    self.channel_list.selected().and_then(|i| self.channels.get(i))
  }

  pub fn selected_keyword(&self) -> Option<&KeywordRecord> {
    self.keyword_list.selected().and_then(|i| self.keywords.get(i))
  }

  pub fn selected_video(&self) -> Option<&VideoRecord> {
    self.video_list.selected().and_then(|i| self.videos.get(i))
  }

  fn clamp_selection(list: &mut ListState, len: usize) {
    if len == 0 {
      list.select(None);
    } else if let Some(i) = list.selected()
      && i >= len
    {
      list.select(Some(len - 1));
    }
  }

  /// Keep the video selection within the filtered range.
  pub fn clamp_video_selection(&mut self) {
    let len = self.videos.visible_len();
    if len == 0 {
      self.video_list.select(None);
    } else {
      match self.video_list.selected() {
        Some(i) if i >= len => self.video_list.select(Some(len - 1)),
        None => self.video_list.select(Some(0)),
        _ => {}
      }
    }
  }

  // --- Input line ---

  pub fn begin_input(&mut self, action: InputAction, prefill: &str) {
    self.input = prefill.to_string();
    self.cursor_position = self.input.chars().count();
    self.input_scroll = 0;
    self.input_action = action;
    self.mode = Mode::Input;
    self.clear_error();
  }

  pub fn cancel_input(&mut self) {
    self.input.clear();
    self.cursor_position = 0;
    self.input_scroll = 0;
    self.mode = Mode::List;
  }

  /// Dispatch the input line's content according to the pending action.
  pub fn submit_input(&mut self) {
    let text = self.input.trim().to_string();
    match self.input_action.clone() {
      InputAction::AddChannel => {
        if text.is_empty() {
          self.set_error("Enter a channel ID.".to_string());
          return;
        }
        self.trigger_add_channel(text);
      }
      InputAction::AddKeyword => {
        if text.is_empty() {
          self.set_error("Enter a keyword.".to_string());
          return;
        }
        self.trigger_add_keyword(text);
      }
      InputAction::EditChannel { channel_id } => {
        self.trigger_update_channel(channel_id, text);
      }
      InputAction::EditKeyword { id } => {
        self.trigger_update_keyword(id, text);
      }
      InputAction::SummarizeText => {
        if text.is_empty() {
          self.set_error("Enter text to summarize.".to_string());
          return;
        }
        self.trigger_summarize_text(text);
      }
    }
    self.cancel_input();
  }

  // --- Filter editing (Videos screen) ---

  pub fn filter_insert(&mut self, c: char) {
    let mut term = self.videos.filter_term().to_string();
    let byte_idx = char_to_byte_index(&term, self.filter_cursor);
    term.insert(byte_idx, c);
    self.filter_cursor += 1;
    self.videos.filter(&term);
    self.clamp_video_selection();
  }

  pub fn filter_backspace(&mut self) {
    if self.filter_cursor == 0 {
      return;
    }
    let mut term = self.videos.filter_term().to_string();
    self.filter_cursor -= 1;
    let byte_idx = char_to_byte_index(&term, self.filter_cursor);
    term.remove(byte_idx);
    self.videos.filter(&term);
    self.clamp_video_selection();
  }

  pub fn filter_delete(&mut self) {
    let mut term = self.videos.filter_term().to_string();
    if self.filter_cursor >= term.chars().count() {
      return;
    }
    let byte_idx = char_to_byte_index(&term, self.filter_cursor);
    term.remove(byte_idx);
    self.videos.filter(&term);
    self.clamp_video_selection();
  }

  pub fn filter_clear(&mut self) {
    self.filter_cursor = 0;
    self.filter_scroll = 0;
    self.videos.filter("");
    self.clamp_video_selection();
  }

  pub fn cycle_sort(&mut self, forward: bool) {
    let key = if forward { self.videos.active_sort().next() } else { self.videos.active_sort().prev() };
    self.videos.sort(key);
    self.clamp_video_selection();
  }

  // --- Async completion polling ---

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.channels_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.busy = None;
          match result {
            Ok(channels) => {
              info!(count = channels.len(), "channels loaded");
              self.channels = channels;
              Self::clamp_selection(&mut self.channel_list, self.channels.len());
              if self.channel_list.selected().is_none() && !self.channels.is_empty() {
                self.channel_list.select(Some(0));
              }
            }
            Err(e) => self.set_error(format!("Failed to load channels: {:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.channels_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.busy = None;
          self.set_error("Channel list task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.keywords_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.busy = None;
          match result {
            Ok(keywords) => {
              info!(count = keywords.len(), "keywords loaded");
              self.keywords = keywords;
              Self::clamp_selection(&mut self.keyword_list, self.keywords.len());
              if self.keyword_list.selected().is_none() && !self.keywords.is_empty() {
                self.keyword_list.select(Some(0));
              }
            }
            Err(e) => self.set_error(format!("Failed to load keywords: {:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.keywords_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.busy = None;
          self.set_error("Keyword list task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.videos_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.busy = None;
          let origin = self.pending_search.take();
          match result {
            Ok(records) => {
              let label = origin.map(|o| o.label()).unwrap_or_else(|| "search".to_string());
              info!(count = records.len(), %label, "videos loaded");
              let count = records.len();
              self.videos.load(records);
              self.filter_cursor = 0;
              self.filter_scroll = 0;
              self.video_list.select(if count > 0 { Some(0) } else { None });
              self.screen = Screen::Videos;
              self.mode = Mode::List;
              if count == 0 {
                self.set_error(format!("No videos found for {}.", label));
              } else {
                self.set_notice(format!("Loaded {} videos — {}.", count, label));
              }
            }
            Err(e) => self.set_error(format!("{:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.videos_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.busy = None;
          self.pending_search = None;
          self.set_error("Search task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.summary_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.busy = None;
          match result {
            Ok(summary) => {
              self.summary = Some(summary);
              self.summary_scroll = 0;
              self.screen = Screen::Summary;
              self.mode = Mode::List;
            }
            Err(e) => self.set_error(format!("{:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.summary_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.busy = None;
          self.set_error("Summarize task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.mutate_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.busy = None;
          match result {
            Ok(mutation) => self.apply_mutation(mutation),
            Err(e) => self.set_error(format!("{:#}", e)),
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.mutate_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.busy = None;
          self.set_error("Request task failed.".to_string());
        }
      }
    }
  }

  fn apply_mutation(&mut self, mutation: Mutation) {
    match mutation {
      Mutation::ChannelAdded { title } => {
        self.set_notice(format!("Channel \"{}\" added.", title));
        self.trigger_load_channels();
      }
      Mutation::ChannelUpdated => {
        self.set_notice("Channel updated.".to_string());
        self.trigger_load_channels();
      }
      Mutation::ChannelDeleted => {
        self.set_notice("Channel deleted.".to_string());
        self.trigger_load_channels();
      }
      Mutation::KeywordAdded { keyword } => {
        self.set_notice(format!("Keyword \"{}\" added.", keyword));
        self.trigger_load_keywords();
      }
      Mutation::KeywordUpdated => {
        self.set_notice("Keyword updated.".to_string());
        self.trigger_load_keywords();
      }
      Mutation::KeywordDeleted => {
        self.set_notice("Keyword deleted.".to_string());
        self.trigger_load_keywords();
      }
    }
  }

  // --- Triggers (spawn a request, stash the receiver) ---

  pub fn trigger_load_channels(&mut self) {
    self.busy = Some("Loading channels…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.list_channels().await);
    });
    self.tasks.channels_rx = Some(rx);
  }

  pub fn trigger_load_keywords(&mut self) {
    self.busy = Some("Loading keywords…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.list_keywords().await);
    });
    self.tasks.keywords_rx = Some(rx);
  }

  pub fn trigger_add_channel(&mut self, channel_id: String) {
    info!(channel_id = %channel_id, "add channel");
    self.busy = Some("Fetching channel info…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let result = api
        .add_channel(&channel_id)
        .await
        .map(|c| Mutation::ChannelAdded { title: c.display_title().to_string() })
        .map_err(|e| anyhow!(friendly_add_channel_error(&format!("{:#}", e))));
      let _ = tx.send(result);
    });
    self.tasks.mutate_rx = Some(rx);
  }

  pub fn trigger_update_channel(&mut self, channel_id: String, description: String) {
    self.busy = Some("Updating channel…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.update_channel(&channel_id, &description).await.map(|_| Mutation::ChannelUpdated));
    });
    self.tasks.mutate_rx = Some(rx);
  }

  pub fn trigger_delete_channel(&mut self, channel_id: String) {
    info!(channel_id = %channel_id, "delete channel");
    self.busy = Some("Deleting channel…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.delete_channel(&channel_id).await.map(|_| Mutation::ChannelDeleted));
    });
    self.tasks.mutate_rx = Some(rx);
  }

  pub fn trigger_add_keyword(&mut self, keyword: String) {
    info!(keyword = %keyword, "add keyword");
    self.busy = Some("Adding keyword…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.add_keyword(&keyword).await.map(|k| Mutation::KeywordAdded { keyword: k.keyword }));
    });
    self.tasks.mutate_rx = Some(rx);
  }

  pub fn trigger_update_keyword(&mut self, id: i64, description: String) {
    self.busy = Some("Updating keyword…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.update_keyword(id, &description).await.map(|_| Mutation::KeywordUpdated));
    });
    self.tasks.mutate_rx = Some(rx);
  }

  pub fn trigger_delete_keyword(&mut self, id: i64) {
    info!(id, "delete keyword");
    self.busy = Some("Deleting keyword…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.delete_keyword(id).await.map(|_| Mutation::KeywordDeleted));
    });
    self.tasks.mutate_rx = Some(rx);
  }

  /// Fetch the videos of a tracked channel. Replacing `videos_rx` abandons
  /// any earlier in-flight search; the last load wins.
  pub fn trigger_search_channel(&mut self, channel_id: String, display: String) {
    info!(channel_id = %channel_id, "search by channel");
    self.busy = Some(format!("Fetching videos — {}…", display));
    self.pending_search = Some(SearchOrigin::Channel(display));
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.search_by_channel(&channel_id).await);
    });
    self.tasks.videos_rx = Some(rx);
  }

  pub fn trigger_search_keyword(&mut self, keyword: String) {
    info!(keyword = %keyword, "search by keyword");
    self.busy = Some(format!("Fetching videos — '{}'…", keyword));
    self.pending_search = Some(SearchOrigin::Keyword(keyword.clone()));
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.search_by_keyword(&keyword).await);
    });
    self.tasks.videos_rx = Some(rx);
  }

  pub fn trigger_summarize_selected(&mut self) {
    let Some(record) = self.selected_video() else { return };
    let video_id = record.video_id.clone();
    info!(video_id = %video_id, "summarize video");
    self.busy = Some("Summarizing video…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.summarize_video(&video_id).await.map(SummaryResult::Video));
    });
    self.tasks.summary_rx = Some(rx);
  }

  pub fn trigger_summarize_text(&mut self, text: String) {
    info!(chars = text.chars().count(), "summarize text");
    self.busy = Some("Summarizing text…".to_string());
    let api = Arc::clone(&self.api);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.summarize_text(&text).await.map(SummaryResult::Text));
    });
    self.tasks.summary_rx = Some(rx);
  }
}

/// Replace the two known backend phrases with friendlier banners; anything
/// else is shown verbatim.
fn friendly_add_channel_error(detail: &str) -> String {
  if detail.contains("Channel not found") {
    "Channel not found — check the channel ID or URL.".to_string()
  } else if detail.contains("이미 등록된 채널") {
    "That channel is already registered.".to_string()
  } else {
    detail.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_app() -> App {
    let api = ApiClient::new("http://localhost:8000").unwrap();
    App::new(api, &Config::default())
  }

  // --- friendly_add_channel_error ---

  #[test]
  fn add_channel_error_maps_not_found() {
    let msg = friendly_add_channel_error("Channel not found: UCdoesnotexist");
    assert_eq!(msg, "Channel not found — check the channel ID or URL.");
  }

  #[test]
  fn add_channel_error_maps_already_registered() {
    let msg = friendly_add_channel_error("이미 등록된 채널입니다: UCabc");
    assert_eq!(msg, "That channel is already registered.");
  }

  #[test]
  fn add_channel_error_passes_through_unknown() {
    assert_eq!(friendly_add_channel_error("quota exceeded"), "quota exceeded");
  }

  // --- Screen cycling ---

  #[test]
  fn screen_cycle_wraps_both_ways() {
    assert_eq!(Screen::Channels.next(), Screen::Keywords);
    assert_eq!(Screen::Summary.next(), Screen::Channels);
    assert_eq!(Screen::Channels.prev(), Screen::Summary);
  }

  // --- Input line ---

  #[test]
  fn begin_input_prefills_and_positions_cursor() {
    let mut app = test_app();
    app.begin_input(InputAction::EditChannel { channel_id: "UC1".to_string() }, "기존 설명");
    assert_eq!(app.mode, Mode::Input);
    assert_eq!(app.input, "기존 설명");
    assert_eq!(app.cursor_position, 5);
  }

  #[test]
  fn cancel_input_returns_to_list() {
    let mut app = test_app();
    app.begin_input(InputAction::AddKeyword, "");
    app.input.push_str("rust");
    app.cancel_input();
    assert_eq!(app.mode, Mode::List);
    assert!(app.input.is_empty());
  }

  #[test]
  fn submit_empty_add_channel_sets_error_and_stays() {
    let mut app = test_app();
    app.begin_input(InputAction::AddChannel, "");
    app.submit_input();
    assert_eq!(app.mode, Mode::Input);
    assert!(app.last_error.is_some());
  }

  // --- Filter editing ---

  #[test]
  fn filter_editing_keeps_view_in_sync() {
    let mut app = test_app();
    app.filter_insert('a');
    app.filter_insert('b');
    assert_eq!(app.videos.filter_term(), "ab");
    app.filter_backspace();
    assert_eq!(app.videos.filter_term(), "a");
    app.filter_clear();
    assert_eq!(app.videos.filter_term(), "");
    assert_eq!(app.filter_cursor, 0);
  }

  // --- Banners ---

  #[test]
  fn set_error_records_time_and_clear_resets() {
    let mut app = test_app();
    app.set_error("boom".to_string());
    assert!(app.last_error.is_some());
    app.clear_error();
    assert!(app.last_error.is_none());
  }

  // --- PendingDelete ---

  #[test]
  fn pending_delete_describes_target() {
    let d = PendingDelete::Channel { channel_id: "UC1".to_string(), title: "News".to_string() };
    assert_eq!(d.describe(), "Delete channel \"News\"?");
    let k = PendingDelete::Keyword { id: 7, keyword: "rust".to_string() };
    assert_eq!(k.describe(), "Delete keyword \"rust\"?");
  }
}
