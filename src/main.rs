//! recs-tui - A terminal front-end for multi-domain title recommendations.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;

mod action;
mod app;
mod client;
mod config;
mod tui;
mod ui;
mod wizard;

use action::Action;
use app::App;
use client::FallbackPolicy;
use config::Config;
use wizard::{Domain, Flow, Step};

/// Recommendation category selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DomainArg {
    Books,
    Anime,
    Movies,
    /// Legacy TV service
    Tv,
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "recs-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recommendation service URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Legacy TV service URL (overrides config)
    #[arg(long)]
    legacy_server: Option<String>,

    /// Category to open at startup
    #[arg(short, long, value_enum)]
    domain: Option<DomainArg>,

    /// Show an empty list instead of sample picks when the service fails
    #[arg(long)]
    no_fallback: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,
}

impl Args {
    /// Apply command-line overrides. Returns the flow to open.
    fn apply(&self, config: &mut Config) -> Flow {
        if let Some(server) = &self.server {
            config.server.url = server.clone();
        }
        if let Some(legacy) = &self.legacy_server {
            config.server.legacy_url = legacy.clone();
            config.recommendations.legacy_tv = true;
        }
        if self.no_fallback {
            config.recommendations.fallback = FallbackPolicy::None;
        }

        match self.domain {
            Some(DomainArg::Books) => config.ui.default_domain = Domain::Books,
            Some(DomainArg::Anime) => config.ui.default_domain = Domain::Anime,
            Some(DomainArg::Movies) => config.ui.default_domain = Domain::Movies,
            Some(DomainArg::Tv) => {
                config.recommendations.legacy_tv = true;
                return Flow::LegacyTv;
            }
            None => {}
        }

        Flow::from(config.ui.default_domain)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hooks
    tui::install_hooks()?;

    // Initialize logging
    let log_file = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recs-tui")
        .join("recs-tui.log");

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_subscriber::fmt::layer()
        .with_writer(std::fs::File::create(&log_file)?)
        .with_ansi(false);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::sink) // Don't write to stdout in TUI mode
        .finish()
        .with(file_appender)
        .try_init()
        .ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };
    let start_flow = args.apply(&mut config);

    if args.save_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        config.save(&path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create application
    let mut app = App::new(config, action_tx.clone());

    // Initialize terminal
    let mut terminal = tui::init()?;

    // Initialize application
    app.init();
    action_tx.send(Action::SwitchFlow(start_flow))?;

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        // Render UI
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with timeout
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = handle_key_event(key.code, key.modifiers, &app);
                    if action != Action::None {
                        action_tx.send(action)?;
                    }
                }
            }
        }

        // Send tick action
        action_tx.send(Action::Tick)?;

        // Process all pending actions
        while let Ok(action) = action_rx.try_recv() {
            app.handle_action(action)?;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    tui::restore()?;

    Ok(())
}

/// Map key events to actions.
fn handle_key_event(code: KeyCode, modifiers: KeyModifiers, app: &App) -> Action {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    // Global keys
    match code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Action::Quit,
        KeyCode::Char('x') if ctrl => return Action::ClearError,
        _ => {}
    }

    // Handle help overlay
    if app.show_help {
        return match code {
            KeyCode::Esc | KeyCode::F(1) => Action::HideHelp,
            _ => Action::None,
        };
    }

    match code {
        KeyCode::F(1) => return Action::ShowHelp,
        KeyCode::Tab => return Action::NextFlow,
        KeyCode::BackTab => return Action::PrevFlow,
        KeyCode::Char('r') if ctrl => return Action::Restart,
        _ => {}
    }

    match app.panel().wizard.step {
        Step::Collecting => handle_collect_key(code, ctrl),
        Step::DetailsEntry => handle_details_key(code),
        Step::Results => handle_results_key(code),
    }
}

/// Handle key events while entering titles.
fn handle_collect_key(code: KeyCode, ctrl: bool) -> Action {
    match code {
        KeyCode::Char('n') if ctrl => Action::Continue,
        KeyCode::Char('d') if ctrl => Action::RemoveSelectedTitle,
        KeyCode::Char(_) if ctrl => Action::None,
        KeyCode::Char(c) => Action::TitleInput(c),
        KeyCode::Backspace => Action::TitleBackspace,
        KeyCode::Enter => Action::ConfirmTitle,
        KeyCode::Delete => Action::RemoveSelectedTitle,
        KeyCode::Up => Action::NavigateUp,
        KeyCode::Down => Action::NavigateDown,
        KeyCode::Right => Action::AcceptSuggestion,
        KeyCode::PageDown => Action::NextSuggestion,
        KeyCode::PageUp => Action::PrevSuggestion,
        _ => Action::None,
    }
}

/// Handle key events on the preferences step.
fn handle_details_key(code: KeyCode) -> Action {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Action::NavigateUp,
        KeyCode::Down | KeyCode::Char('j') => Action::NavigateDown,
        KeyCode::Left | KeyCode::Char('h') => Action::CyclePreference { forward: false },
        KeyCode::Right | KeyCode::Char('l') => Action::CyclePreference { forward: true },
        KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => Action::ClearPreference,
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Back,
        _ => Action::None,
    }
}

/// Handle key events on the results step.
fn handle_results_key(code: KeyCode) -> Action {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Action::NavigateUp,
        KeyCode::Down | KeyCode::Char('j') => Action::NavigateDown,
        KeyCode::Enter | KeyCode::Char('r') => Action::Restart,
        _ => Action::None,
    }
}
