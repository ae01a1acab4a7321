use anyhow::Context;
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use holdem_trio::config::TableConfig;
use holdem_trio::logging;
use holdem_trio::session::Session;
use holdem_trio::tui::{app::AppState, controller};
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// Three-seat Texas Hold'em in the terminal.
#[derive(Parser, Debug)]
#[command(name = "holdem-trio", version, about)]
struct Cli {
    /// TOML table configuration; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for deterministic deals. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write logs.
    #[arg(long, default_value = "holdem-trio.log")]
    log_file: PathBuf,
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => TableConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TableConfig::default(),
    };
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    if !io::stdout().is_terminal() {
        println!(
            "holdem-trio requires a real terminal (TTY).\n\
             Run it in a terminal and press q to quit. Version: {}",
            holdem_trio::VERSION
        );
        return Ok(());
    }

    logging::init(&cli.log_file)
        .with_context(|| format!("opening log file {}", cli.log_file.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let _guard = runtime.enter();

    let session = Session::from_config(&cfg).context("building table")?;
    let mut app = AppState::new(session);

    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(100));

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    drop(app);
    res.context("terminal UI failed")
}
