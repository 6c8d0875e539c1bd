//! `viscal` CLI: drive the scheduling engine headlessly over `.ics` files.
//!
//! ## Usage
//!
//! ```sh
//! # Today's events across two calendars
//! viscal agenda work.ics home.ics
//!
//! # Replay keystrokes against a fixed "now", then save what they changed
//! viscal --now 2026-03-02T09:10:00-08:00 replay --keys 'oStandup<CR>' --write work.ics
//!
//! # What a 618x1000 window would paint, as JSON
//! viscal layout --width 618 --height 1000 work.ics
//!
//! # Engine settings from a TOML file
//! viscal --config viscal.toml agenda work.ics
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` to see engine state changes.

mod keys;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viscal_engine::{format_duration, Clock, Engine, EngineConfig, FixedClock, SystemClock};
use viscal_ics::IcsFileSource;

#[derive(Parser)]
#[command(name = "viscal", version, about = "Keyboard-driven day-timeline calendar, headless")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine settings (TOML); defaults apply for anything missing
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pin "now" to an RFC 3339 timestamp instead of the system clock
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reference day's events
    Agenda {
        /// Calendar files, one calendar each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Feed a key script through the engine and print the resulting agenda
    Replay {
        /// Keys to press, e.g. `3J<C-s>` (see `<C-x>`, `<Tab>`, `<Esc>`, `<CR>`, `<BS>`, `<F1>`)
        #[arg(short, long)]
        keys: String,
        /// Save calendars the script asked to save
        #[arg(short, long)]
        write: bool,
        /// Calendar files, one calendar each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the painted layout as JSON
    Layout {
        #[arg(long, default_value_t = 618.0)]
        width: f64,
        #[arg(long, default_value_t = 1000.0)]
        height: f64,
        /// Calendar files, one calendar each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let mut source = IcsFileSource::new(config.tz().context("Invalid configuration")?);

    match cli.command {
        Commands::Agenda { files } => {
            let engine = open_engine(config, cli.now, &files, &mut source)?;
            print!("{}", render_agenda(&engine));
        }
        Commands::Replay { keys, write, files } => {
            let keys = keys::parse_keys(&keys).context("Invalid key script")?;
            let mut engine = open_engine(config, cli.now, &files, &mut source)?;
            for key in keys {
                engine.handle_key(key);
            }
            if write {
                let written = engine
                    .persist(&mut source)
                    .context("Failed to save calendars")?;
                eprintln!("Saved {} calendar(s)", written);
            } else if !engine.pending_saves().is_empty() {
                debug!(pending = engine.pending_saves().len(), "discarding save requests without --write");
            }
            print!("{}", render_agenda(&engine));
        }
        Commands::Layout {
            width,
            height,
            files,
        } => {
            let mut engine = open_engine(config, cli.now, &files, &mut source)?;
            let layout = engine.layout(width, height);
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_now(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config: {}", path.display()))
}

fn open_engine(
    config: EngineConfig,
    now: Option<DateTime<Utc>>,
    files: &[PathBuf],
    source: &mut IcsFileSource,
) -> Result<Engine> {
    let clock: Box<dyn Clock> = match now {
        Some(t) => Box::new(FixedClock(t)),
        None => Box::new(SystemClock),
    };
    let mut engine = Engine::new(config, clock).context("Invalid configuration")?;
    for path in files {
        engine
            .load_from(&mut *source, calendar_name(path), path)
            .with_context(|| format!("Failed to load calendar: {}", path.display()))?;
    }
    Ok(engine)
}

/// A calendar is named after its file: `work.ics` is "work".
fn calendar_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per event of the reference day. The selected event is marked `>`,
/// and an open edit is shown on a trailing line.
fn render_agenda(engine: &Engine) -> String {
    let tz = engine.tz();
    let selected = engine.selected_event().map(|e| e.id());
    let mut lines = vec![engine.view().today.with_timezone(&tz).format("%A %Y-%m-%d").to_string()];

    for event in engine.agenda() {
        let marker = if Some(event.id()) == selected { '>' } else { ' ' };
        let calendar = engine
            .store()
            .calendar(event.calendar())
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        let summary = if event.summary.is_empty() {
            "(untitled)"
        } else {
            event.summary.as_str()
        };
        let when = if event.is_all_day() {
            "all day".to_string()
        } else {
            format!(
                "{}-{} {:>6}",
                event.start().with_timezone(&tz).format("%H:%M"),
                event.end().with_timezone(&tz).format("%H:%M"),
                format_duration(event.duration().num_seconds()),
            )
        };
        lines.push(format!("{marker} {when:<18}  {summary}  [{calendar}]"));
    }

    if let Some(session) = engine.edit_session() {
        lines.push(format!("-- editing: {} --", session.buffer.as_str()));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
