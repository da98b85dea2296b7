use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, InputAction, Mode, PendingDelete, Screen};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn select_next(list: &mut ratatui::widgets::ListState, count: usize) {
  if count > 0 {
    let i = list.selected().map_or(0, |i| (i + 1) % count);
    list.select(Some(i));
  }
}

fn select_prev(list: &mut ratatui::widgets::ListState, count: usize) {
  if count > 0 {
    let i = list.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
    list.select(Some(i));
  }
}

/// Open a URL in the platform default browser, detached from the TUI.
fn open_in_browser(app: &mut App, url: &str) {
  #[cfg(target_os = "macos")]
  let cmd = "open";
  #[cfg(not(target_os = "macos"))]
  let cmd = "xdg-open";
  match std::process::Command::new(cmd)
    .arg(url)
    .stdin(std::process::Stdio::null())
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .spawn()
  {
    Ok(mut child) => {
      // Reap the child in a background thread to avoid zombie processes.
      std::thread::spawn(move || {
        let _ = child.wait();
      });
    }
    Err(e) => {
      app.set_error(format!("Failed to open browser: {}", e));
    }
  }
}

/// Switch tab, lazily loading list screens the first time they're shown.
fn switch_screen(app: &mut App, screen: Screen) {
  app.screen = screen;
  app.mode = Mode::List;
  match screen {
    Screen::Channels if app.channels.is_empty() && app.tasks.channels_rx.is_none() => {
      app.trigger_load_channels();
    }
    Screen::Keywords if app.keywords.is_empty() && app.tasks.keywords_rx.is_none() => {
      app.trigger_load_keywords();
    }
    _ => {}
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.mode {
    Mode::List => handle_list_key(app, key),
    Mode::Input => handle_input_key(app, key),
    Mode::Filter => handle_filter_key(app, key),
    Mode::Confirm => handle_confirm_key(app, key),
  }
}

fn handle_list_key(app: &mut App, key: event::KeyEvent) {
  // Tab switching is shared across screens.
  match key.code {
    KeyCode::Tab => {
      switch_screen(app, app.screen.next());
      return;
    }
    KeyCode::BackTab => {
      switch_screen(app, app.screen.prev());
      return;
    }
    KeyCode::Char('1') => {
      switch_screen(app, Screen::Channels);
      return;
    }
    KeyCode::Char('2') => {
      switch_screen(app, Screen::Keywords);
      return;
    }
    KeyCode::Char('3') => {
      switch_screen(app, Screen::Videos);
      return;
    }
    KeyCode::Char('4') => {
      switch_screen(app, Screen::Summary);
      return;
    }
    KeyCode::Char('q') => {
      app.should_quit = true;
      return;
    }
    _ => {}
  }

  match app.screen {
    Screen::Channels => handle_channels_key(app, key),
    Screen::Keywords => handle_keywords_key(app, key),
    Screen::Videos => handle_videos_key(app, key),
    Screen::Summary => handle_summary_key(app, key),
  }
}

fn handle_channels_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => select_next(&mut app.channel_list, app.channels.len()),
    KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.channel_list, app.channels.len()),
    KeyCode::Char('a') => app.begin_input(InputAction::AddChannel, ""),
    KeyCode::Char('e') => {
      if let Some(channel) = app.selected_channel() {
        let channel_id = channel.channel_id.clone();
        let description = channel.description.clone().unwrap_or_default();
        app.begin_input(InputAction::EditChannel { channel_id }, &description);
      }
    }
    KeyCode::Char('d') => {
      if let Some(channel) = app.selected_channel() {
        let channel_id = channel.channel_id.clone();
        let title = channel.display_title().to_string();
        app.pending_delete = Some(PendingDelete::Channel { channel_id, title });
        app.mode = Mode::Confirm;
      }
    }
    KeyCode::Char('v') | KeyCode::Enter => {
      if let Some(channel) = app.selected_channel() {
        let channel_id = channel.channel_id.clone();
        let display = channel.display_title().to_string();
        app.trigger_search_channel(channel_id, display);
      }
    }
    KeyCode::Char('r') => app.trigger_load_channels(),
    _ => {}
  }
}

fn handle_keywords_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => select_next(&mut app.keyword_list, app.keywords.len()),
    KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.keyword_list, app.keywords.len()),
    KeyCode::Char('a') => app.begin_input(InputAction::AddKeyword, ""),
    KeyCode::Char('e') => {
      if let Some(keyword) = app.selected_keyword() {
        match keyword.id {
          Some(id) => {
            let description = keyword.description.clone().unwrap_or_default();
            app.begin_input(InputAction::EditKeyword { id }, &description);
          }
          None => app.set_error("Keyword has no id yet — reload the list.".to_string()),
        }
      }
    }
    KeyCode::Char('d') => {
      if let Some(keyword) = app.selected_keyword() {
        let id = keyword.id;
        let name = keyword.keyword.clone();
        match id {
          Some(id) => {
            app.pending_delete = Some(PendingDelete::Keyword { id, keyword: name });
            app.mode = Mode::Confirm;
          }
          None => app.set_error("Keyword has no id yet — reload the list.".to_string()),
        }
      }
    }
    KeyCode::Char('v') | KeyCode::Enter => {
      if let Some(keyword) = app.selected_keyword() {
        let keyword = keyword.keyword.clone();
        app.trigger_search_keyword(keyword);
      }
    }
    KeyCode::Char('r') => app.trigger_load_keywords(),
    _ => {}
  }
}

fn handle_videos_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => select_next(&mut app.video_list, app.videos.visible_len()),
    KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.video_list, app.videos.visible_len()),
    KeyCode::Char('s') => app.cycle_sort(true),
    KeyCode::Char('S') => app.cycle_sort(false),
    KeyCode::Char('/') => {
      if app.videos.total_len() > 0 {
        app.filter_cursor = app.videos.filter_term().chars().count();
        app.mode = Mode::Filter;
      }
    }
    KeyCode::Enter => app.trigger_summarize_selected(),
    KeyCode::Char('o') => {
      if let Some(record) = app.selected_video() {
        let url = record.watch_url();
        open_in_browser(app, &url);
      }
    }
    _ => {}
  }
}

fn handle_summary_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => app.summary_scroll = app.summary_scroll.saturating_add(1),
    KeyCode::Up | KeyCode::Char('k') => app.summary_scroll = app.summary_scroll.saturating_sub(1),
    KeyCode::PageDown => app.summary_scroll = app.summary_scroll.saturating_add(10),
    KeyCode::PageUp => app.summary_scroll = app.summary_scroll.saturating_sub(10),
    KeyCode::Char('t') => app.begin_input(InputAction::SummarizeText, ""),
    _ => {}
  }
}

fn handle_input_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.submit_input();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      app.cancel_input();
    }
    _ => {}
  }
}

fn handle_filter_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char(c) => app.filter_insert(c),
    KeyCode::Backspace => app.filter_backspace(),
    KeyCode::Delete => app.filter_delete(),
    KeyCode::Left => {
      app.filter_cursor = app.filter_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.filter_cursor < app.videos.filter_term().chars().count() {
        app.filter_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.filter_cursor = 0;
    }
    KeyCode::End => {
      app.filter_cursor = app.videos.filter_term().chars().count();
    }
    KeyCode::Down => select_next(&mut app.video_list, app.videos.visible_len()),
    KeyCode::Up => select_prev(&mut app.video_list, app.videos.visible_len()),
    KeyCode::Enter => {
      // Keep the filter applied and return to list navigation.
      app.mode = Mode::List;
    }
    KeyCode::Esc => {
      app.filter_clear();
      app.mode = Mode::List;
    }
    _ => {}
  }
}

fn handle_confirm_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char('y') | KeyCode::Enter => {
      match app.pending_delete.take() {
        Some(PendingDelete::Channel { channel_id, .. }) => app.trigger_delete_channel(channel_id),
        Some(PendingDelete::Keyword { id, .. }) => app.trigger_delete_keyword(id),
        None => {}
      }
      app.mode = Mode::List;
    }
    KeyCode::Char('n') | KeyCode::Esc => {
      app.pending_delete = None;
      app.mode = Mode::List;
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "a한글"; // a=1 byte, 한/글=3 bytes each
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 4);
    assert_eq!(char_to_byte_index(s, 3), 7); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }
}
