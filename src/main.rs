//! rideterm binary: connect, enter the terminal UI, run until quit.

// Rust guideline compliant 2026-01

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use rideterm::config::KeyMap;
use rideterm::constants::{DEFAULT_ADDR, DEFAULT_LOG_FILE, LOG_FILE_ENV};
use rideterm::docs::{DocIndex, JsonDocIndex};
use rideterm::protocol::transcript::ProtocolLog;
use rideterm::protocol::ProtocolClient;
use rideterm::tui::{install_panic_hook, App, Runner, TerminalGuard, Workspace};

/// Flags that may be spelled with a single dash.
const SINGLE_DASH_FLAGS: [&str; 2] = ["addr", "log"];

#[derive(Parser, Debug)]
#[command(name = "rideterm")]
#[command(version)]
#[command(about = "Multi-pane terminal client for interpreter sessions over RIDE")]
struct Cli {
    /// Interpreter address (host:port)
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Append a timestamped protocol transcript to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Rewrite `-addr x` / `-log=x` to clap's double-dash form.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if SINGLE_DASH_FLAGS.contains(&name) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

fn log_path() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file at {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging(&log_path())?;
    let cli = Cli::parse_from(normalize_args(std::env::args()));
    log::info!("rideterm {} starting, addr={}", env!("CARGO_PKG_VERSION"), cli.addr);

    let protocol_log = match &cli.log {
        Some(path) => ProtocolLog::open(path)
            .with_context(|| format!("failed to open protocol log {}", path.display()))?,
        None => ProtocolLog::disabled(),
    };
    let mut client = ProtocolClient::connect(&cli.addr, protocol_log)
        .with_context(|| format!("failed to connect to {}", cli.addr))?;
    let inbound = client.spawn_reader()?;

    let keymap = KeyMap::load();
    let docs = JsonDocIndex::load_default().map(|index| Box::new(index) as Box<dyn DocIndex>);
    if docs.is_none() {
        log::info!("No documentation index found");
    }

    install_panic_hook();
    let guard = TerminalGuard::enter().context("failed to initialise terminal")?;
    let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    let size = terminal.size()?;
    let app = App::new(Workspace::new(keymap, docs), Rect::new(0, 0, size.width, size.height));

    let mut runner = Runner::new(app, terminal, client, inbound);
    let result = runner.run();
    runner.transport().shutdown();
    drop(guard);

    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    log::info!("rideterm exiting");
    result
}
