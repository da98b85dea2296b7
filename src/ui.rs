use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Mode, Screen, SummaryResult};
use crate::theme::Theme;
use crate::videos::{format_published_at, format_view_count, preview_description};

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, tabs_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_tabs(frame, app, tabs_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ ym ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let mut spans = vec![Span::raw(" ")];
  for (i, screen) in Screen::ALL.iter().enumerate() {
    let label = format!(" {} {} ", i + 1, screen.label());
    let style = if *screen == app.screen {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::styled(label, style));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  match app.screen {
    Screen::Channels => render_channels(frame, app, area),
    Screen::Keywords => render_keywords(frame, app, area),
    Screen::Videos => render_videos(frame, app, area),
    Screen::Summary => render_summary(frame, app, area),
  }
}

fn bordered(theme: &Theme, title: String) -> Block<'_> {
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
}

fn render_placeholder(frame: &mut Frame, theme: &Theme, area: Rect, title: String, lines: Vec<&str>) {
  let mut text = vec![Line::from("")];
  for l in lines {
    text.push(Line::from(Span::styled(l.to_string(), Style::default().fg(theme.muted))));
  }
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(bordered(theme, title));
  frame.render_widget(paragraph, area);
}

fn render_channels(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if app.channels.is_empty() {
    render_placeholder(frame, theme, area, " Channels ".to_string(), vec![
      "No channels tracked yet.",
      "Press a to add one by ID or URL.",
    ]);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .channels
    .iter()
    .enumerate()
    .map(|(i, channel)| {
      let is_selected = Some(i) == app.channel_list.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let title = truncate_str(channel.display_title(), inner_w);
      let meta = match channel.description.as_deref().filter(|d| !d.is_empty()) {
        Some(desc) => format!("{} · {}", channel.channel_id, desc),
        None => channel.channel_id.clone(),
      };
      let lines = vec![
        Line::from(Span::styled(title, Style::default().fg(fg))),
        Line::from(Span::styled(format!("  {}", truncate_str(&meta, inner_w)), Style::default().fg(theme.muted))),
      ];
      ListItem::new(lines).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(bordered(theme, format!(" Channels — {} tracked ", app.channels.len())))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.channel_list);
}

fn render_keywords(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if app.keywords.is_empty() {
    render_placeholder(frame, theme, area, " Keywords ".to_string(), vec![
      "No keywords tracked yet.",
      "Press a to add one.",
    ]);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .keywords
    .iter()
    .enumerate()
    .map(|(i, keyword)| {
      let is_selected = Some(i) == app.keyword_list.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let desc = keyword.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("—");
      let lines = vec![
        Line::from(Span::styled(truncate_str(&keyword.keyword, inner_w), Style::default().fg(fg))),
        Line::from(Span::styled(format!("  {}", truncate_str(desc, inner_w)), Style::default().fg(theme.muted))),
      ];
      ListItem::new(lines).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(bordered(theme, format!(" Keywords — {} tracked ", app.keywords.len())))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.keyword_list);
}

fn render_videos(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  // An empty loaded set shows only the placeholder, with no sort/filter controls.
  if app.videos.total_len() == 0 {
    render_placeholder(frame, theme, area, " Videos ".to_string(), vec![
      "검색 결과가 없습니다.",
      "Pick a channel or keyword and press v to fetch videos.",
    ]);
    return;
  }

  let [list_area, detail_area] = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);

  render_video_list(frame, app, list_area);
  render_video_detail(frame, app, detail_area);
}

fn render_video_list(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .videos
    .iter()
    .enumerate()
    .map(|(i, record)| {
      let is_selected = Some(i) == app.video_list.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let right = format!("{}  {}", format_view_count(record.view_count), format_published_at(record.published_at));
      let right_w = right.chars().count();
      let title_max = inner_w.saturating_sub(right_w + 2);
      let title = truncate_str(&record.title, title_max);
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);

      let first = Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      let second = Line::from(Span::styled(
        format!("  {}", truncate_str(&preview_description(record.description.as_deref()), inner_w.saturating_sub(2))),
        Style::default().fg(theme.muted),
      ));
      ListItem::new(vec![first, second]).bg(bg)
    })
    .collect();

  let title = if app.videos.filter_term().trim().is_empty() {
    format!(" Videos — {} · {} ", app.videos.total_len(), app.videos.active_sort().label())
  } else {
    format!(
      " Videos — {}/{} · {} · /{} ",
      app.videos.visible_len(),
      app.videos.total_len(),
      app.videos.active_sort().label(),
      app.videos.filter_term().trim()
    )
  };

  let list = List::new(items)
    .block(bordered(theme, title))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.video_list);
}

fn render_video_detail(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let block = bordered(theme, " Selected ".to_string()).padding(Padding::horizontal(1));

  let Some(record) = app.selected_video() else {
    let paragraph = Paragraph::new(Line::from(Span::styled("no matches", Style::default().fg(theme.muted))))
      .alignment(Alignment::Center)
      .block(block);
    frame.render_widget(paragraph, area);
    return;
  };

  let inner_w = area.width.saturating_sub(4) as usize;
  let label = |name: &str| Span::styled(format!("{:<10}", name), Style::default().fg(theme.muted));

  let mut lines = vec![
    Line::from(""),
    Line::from(Span::styled(record.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(vec![label("Views"), Span::styled(format_view_count(record.view_count), Style::default().fg(theme.fg))]),
    Line::from(vec![
      label("Published"),
      Span::styled(format_published_at(record.published_at), Style::default().fg(theme.fg)),
    ]),
    Line::from(""),
  ];
  lines.push(Line::from(Span::styled(preview_description(record.description.as_deref()), Style::default().fg(theme.fg))));
  lines.push(Line::from(""));
  lines.push(Line::from(vec![
    label("Thumb"),
    Span::styled(truncate_str(record.thumbnail_url(), inner_w.saturating_sub(10)), Style::default().fg(theme.muted)),
  ]));
  lines.push(Line::from(Span::styled(
    truncate_str(&record.watch_url(), inner_w),
    Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
  )));

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
  frame.render_widget(paragraph, area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();

  let Some(ref summary) = app.summary else {
    render_placeholder(frame, theme, area, " Summary ".to_string(), vec![
      "No summary yet.",
      "Select a video and press Enter, or press t to summarize pasted text.",
    ]);
    return;
  };

  let mut lines: Vec<Line> = Vec::new();
  match summary {
    SummaryResult::Video(v) => {
      lines.push(Line::from(Span::styled(v.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))));
      lines.push(Line::from(vec![
        Span::styled("Channel  ", Style::default().fg(theme.muted)),
        Span::styled(v.channel.clone(), Style::default().fg(theme.fg)),
      ]));
      lines.push(Line::from(""));
      for part in v.summary.lines() {
        lines.push(Line::from(Span::styled(part.to_string(), Style::default().fg(theme.fg))));
      }
    }
    SummaryResult::Text(t) => {
      for part in t.summary.lines() {
        lines.push(Line::from(Span::styled(part.to_string(), Style::default().fg(theme.fg))));
      }
      if let Some(ref phrases) = t.key_phrases
        && !phrases.is_empty()
      {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Key phrases", Style::default().fg(theme.accent))));
        for phrase in phrases {
          lines.push(Line::from(Span::styled(format!("  • {}", phrase), Style::default().fg(theme.fg))));
        }
      }
      if let Some(ref scores) = t.quality_score {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Quality", Style::default().fg(theme.accent))));
        for (key, value) in scores {
          lines.push(Line::from(Span::styled(format!("  {}: {}", key, value), Style::default().fg(theme.fg))));
        }
      }
    }
  }

  let paragraph = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.summary_scroll, 0))
    .block(bordered(theme, " Summary ".to_string()).padding(Padding::horizontal(1)));
  frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if app.mode == Mode::Confirm
    && let Some(ref pending) = app.pending_delete
  {
    (format!(" ⚠  {} (y/n)", pending.describe()), Style::default().fg(theme.error))
  } else if let Some(msg) = &app.busy {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(msg) = &app.notice {
    (format!(" ✓ {}", msg), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  match app.mode {
    Mode::Input => {
      let title = app.input_action.label().to_string();
      let text = app.input.clone();
      let cursor = app.cursor_position;
      let mut scroll = app.input_scroll;
      render_text_input(frame, theme, area, &text, cursor, &mut scroll, &title);
      app.input_scroll = scroll;
    }
    Mode::Filter => {
      let text = app.videos.filter_term().to_string();
      let cursor = app.filter_cursor;
      let mut scroll = app.filter_scroll;
      render_text_input(frame, theme, area, &text, cursor, &mut scroll, " Filter videos ");
      app.filter_scroll = scroll;
    }
    _ => {
      let hint = match app.screen {
        Screen::Channels => "a — add a channel",
        Screen::Keywords => "a — add a keyword",
        Screen::Videos => {
          if app.videos.total_len() > 0 {
            "/ — filter · s — sort"
          } else {
            ""
          }
        }
        Screen::Summary => "t — summarize pasted text",
      };
      let block = Block::bordered()
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .padding(Padding::horizontal(1));
      let paragraph = Paragraph::new(hint).style(Style::default().fg(theme.muted)).block(block);
      frame.render_widget(paragraph, area);
    }
  }
}

/// Render a single-line text input with a horizontal scroll window and a
/// visible cursor. `scroll` is updated to keep the cursor in view.
fn render_text_input(
  frame: &mut Frame,
  theme: &Theme,
  area: Rect,
  text: &str,
  cursor_position: usize,
  scroll: &mut usize,
  title: &str,
) {
  let border_color = theme.accent;
  let input_block = Block::bordered()
    .title(title.to_string())
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(text, cursor_position);

  if cursor_col < *scroll {
    *scroll = cursor_col;
  } else if cursor_col >= *scroll + inner_w {
    *scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= *scroll)
    .take_while(|(start, _, _)| *start < *scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  let cursor_x = area.x + 2 + (cursor_col - *scroll) as u16;
  frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.mode {
    Mode::Input => vec![("Enter", "Submit"), ("Esc", "Cancel")],
    Mode::Filter => vec![("Enter", "Apply"), ("Esc", "Clear"), ("↑/↓", "Navigate")],
    Mode::Confirm => vec![("y", "Delete"), ("n", "Keep")],
    Mode::List => match app.screen {
      Screen::Channels | Screen::Keywords => {
        vec![("j/k", "Navigate"), ("a", "Add"), ("e", "Edit"), ("d", "Delete"), ("v", "Videos"), ("r", "Reload"), ("q", "Quit")]
      }
      Screen::Videos => {
        let mut k = vec![("j/k", "Navigate")];
        if app.videos.total_len() > 0 {
          k.push(("s", "Sort"));
          k.push(("/", "Filter"));
          k.push(("Enter", "Summarize"));
          k.push(("o", "Open"));
        }
        k.push(("q", "Quit"));
        k
      }
      Screen::Summary => vec![("j/k", "Scroll"), ("t", "Text"), ("q", "Quit")],
    },
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
