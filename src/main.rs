mod api;
mod app;
mod config;
mod constants;
mod input;
mod theme;
mod ui;
mod videos;

use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use app::App;
use config::Config;
use constants::constants;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Backend base URL (overrides the saved preference).
  #[arg(long)]
  api_base: Option<String>,
}

// --- Logging ---

/// Route tracing output to a daily-rolled file in the platform data dir.
/// Stdout belongs to the TUI, so nothing is ever logged there.
fn init_logging() -> Option<WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "ym")?;
  let log_dir = proj_dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "ym.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging();

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let config = Config::load();
  let base = args
    .api_base
    .or_else(|| config.api_base.clone())
    .unwrap_or_else(|| constants().default_api_base.clone());
  info!(base = %base, "starting");

  let api = ApiClient::new(&base)?;
  let mut app = App::new(api, &config);

  // Populate the landing screen right away.
  app.trigger_load_channels();
  app.trigger_load_keywords();

  loop {
    app.check_pending();
    app.expire_banners();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  Ok(())
}
