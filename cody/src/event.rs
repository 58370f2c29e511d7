//! Event bus for cody.
//!
//! Terminal input and the two UI clocks are normalised into a single `AppEvent`
//! enum and sent over a tokio unbounded MPSC channel. Session results produced
//! by the core runtime travel on their own channel of `cody_core::Action`; the
//! main loop selects over both.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) expires transient status notices.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Render cadence.
pub const RENDER_INTERVAL: Duration = Duration::from_millis(33);
/// Logic tick cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// All terminal-side events the application can receive.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release and repeat are filtered).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste into whichever input has focus.
    Paste(String),
    /// Logic tick.
    Tick,
    /// Render tick.
    Render,
}

/// Holds the sender and receiver ends of the terminal event channel.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that feeds the terminal event channel.
///
/// Runs until the receiver is dropped. `reader.next().fuse()` keeps
/// `tokio::select!` from polling a finished crossterm stream.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(TICK_INTERVAL);
        let mut render_interval = interval(RENDER_INTERVAL);
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    Some(Ok(Event::Paste(text))) => tx.send(AppEvent::Paste(text)),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
