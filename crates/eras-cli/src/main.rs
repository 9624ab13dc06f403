//! `eras` — terminal client for the Eras chronological-ordering card game.
//!
//! # Usage
//!
//! ```
//! eras --url http://localhost:8000
//! eras --config ~/.config/eras/config.toml --log-file eras.log
//! ```

mod app;
mod client;
mod input;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, DisableMouseCapture, EnableMouseCapture, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "eras", about = "Terminal client for the Eras timeline game")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the match server (default: http://localhost:8000).
  #[arg(long, env = "ERAS_URL")]
  url: Option<String>,

  /// Write diagnostics to this file (the terminal itself is owned by the
  /// TUI). Logging is off when omitted.
  #[arg(long, value_name = "FILE")]
  log_file: Option<std::path::PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Initialise tracing into a file, if asked for.
  if let Some(path) = &args.log_file {
    let file = std::fs::File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_writer(std::sync::Mutex::new(file))
      .with_ansi(false)
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8000".to_string()),
  };

  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, input::probe());

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
    .context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Kick off the first match; failures surface on the idle screen.
  app.start_game();

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(
    terminal.backend_mut(),
    LeaveAlternateScreen,
    DisableMouseCapture
  )
  .ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

/// One iteration ≈ one animation frame: advance timers and the auto-scroll
/// loop, redraw, then wait briefly for input.
async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    let size = terminal.size().context("querying terminal size")?;
    app.update_layout(Rect::new(0, 0, size.width, size.height));
    app.tick().await;

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting. The
    // timeout doubles as the animation-frame cadence for auto-scroll.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(33))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key)?;
          if !cont {
            break;
          }
        }
        Event::Mouse(mouse) => {
          app.handle_mouse(&mouse);
        }
        Event::Resize(_, _) => {
          // Layout is recomputed at the top of the next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
