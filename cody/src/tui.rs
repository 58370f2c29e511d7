//! Terminal lifecycle management for cody.
//!
//! The TUI renders to stderr through a buffered writer, leaving stdout free for
//! anything a wrapper script wants to pipe. Tracing output goes to a log file
//! (see `main.rs`) and never to the terminal.

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stderr writer.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enables raw mode, enters the alternate screen, and turns on mouse capture
/// and bracketed paste. Call [`restore_tui`] at every exit path.
///
/// # Errors
///
/// Returns `Err` if `enable_raw_mode`, `execute!`, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state. Idempotent.
///
/// ratatui 0.30 does not restore the terminal on `Drop`, so this must run on
/// every exit path including the panic hook.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(
        stderr(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before the panic message
/// prints. Must be called before [`init_tui`]; chains onto the previous hook.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Registers a SIGTERM handler that flips the returned flag.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
