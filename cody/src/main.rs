//! cody: mock technical interviews in the terminal.
//!
//! Entry point for the `cody` binary. Wires together the configuration
//! (`config`), terminal lifecycle (`tui`), event bus (`event`), UI (`ui`),
//! theme system (`theme`), and the session controller and effect runtime from
//! `cody-core`.
//!
//! # Startup sequence
//!
//! 1. Load config and open the log file. Both are read-only on the terminal and
//!    safe before terminal init; failures are printed to stderr.
//! 2. Build the interview service client, controller, and runtime.
//! 3. `install_panic_hook()` so the terminal is restored before a panic prints.
//! 4. `register_sigterm()`, polled in the event loop heartbeat.
//! 5. `init_tui()` and `spawn_event_task()`.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs. A
//! draw error is held until the terminal has been restored.

mod app;
mod config;
mod event;
mod theme;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cody_core::{Action, HttpInterviewService, Runtime, SessionContext, SessionController};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::AppState;
use crate::config::Config;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

/// How often the SIGTERM flag is checked when no events arrive.
const HEARTBEAT: Duration = Duration::from_millis(50);

/// Sends tracing output to the configured log file. The terminal belongs to
/// the TUI, so nothing is logged there.
fn init_logging(config: &Config) {
    let path = config.log_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("cody: cannot create log directory {:?}: {}", parent, e);
            return;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cody: cannot open log file {:?}: {}", path, e);
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cody=info,cody_core=info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("cody: logging disabled: {}", e);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::load();
    init_logging(&config);
    let theme = theme::Theme::from_name(&config.theme);
    ui::highlight::warm_up();

    let service = HttpInterviewService::new(&config.server_url, config.request_timeout())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    tracing::info!(server = %service.base_url(), "cody starting");

    let mut controller = SessionController::new(SessionContext {
        interview_duration: config.interview_duration(),
        ..SessionContext::default()
    });
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut runtime = Runtime::new(Arc::new(service), action_tx);
    let mut state = AppState::new(&controller.session().code);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let mut outcome = Ok(());
    'event_loop: loop {
        // Key, paste, and mouse handlers may hand back a session action.
        let mut next = KeyAction::Continue;

        tokio::select! {
            _ = tokio::time::sleep(HEARTBEAT) => {}
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        let drawn = terminal.draw(|frame| {
                            ui::render(frame, &mut state, controller.session(), &theme)
                        });
                        if let Err(e) = drawn {
                            outcome = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Tick) => state.on_tick(),
                    Some(AppEvent::Key(key)) => {
                        next = keybindings::handle_key(key, &mut state, controller.session());
                    }
                    Some(AppEvent::Paste(text)) => {
                        next = keybindings::handle_paste(&text, &mut state, controller.session());
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        next = keybindings::handle_mouse(mouse, &mut state, controller.session());
                    }
                    // ratatui picks up the new size on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    None => break 'event_loop,
                }
            }
            Some(action) = action_rx.recv() => {
                next = KeyAction::Dispatch(action);
            }
        }

        match next {
            KeyAction::Quit => break 'event_loop,
            KeyAction::Dispatch(action) => match controller.dispatch(action) {
                Ok(effects) => {
                    for warning in runtime.execute(effects) {
                        state.set_notice(warning);
                    }
                    state.sync_editor(&controller.session().code);
                }
                Err(e) => state.set_notice(e.to_string()),
            },
            KeyAction::Continue => {}
        }

        if term_flag.load(Ordering::Relaxed) {
            break 'event_loop;
        }
    }

    tracing::info!("cody exiting");
    drop(runtime);
    tui::restore_tui()?;
    outcome
}
