use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

use opencore_console::app::ApiEvent;

/// Unified application event.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// One-second clock: uptime, edge pruning, toast expiry.
    Tick,
    /// Time to poll `/heartbeat` again.
    HeartbeatDue,
    Api(ApiEvent),
}

/// Spawn a thread that polls crossterm input events and sends them to the channel.
pub fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            let sent = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
                Ok(Event::Mouse(mouse)) => tx.send(AppEvent::Mouse(mouse)),
                _ => Ok(()),
            };
            if sent.is_err() {
                break;
            }
        }
    });
}

/// Spawn a timer thread that sends `make()` at the given interval.
pub fn spawn_timer(tx: mpsc::Sender<AppEvent>, interval: Duration, make: fn() -> AppEvent) {
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        if tx.send(make()).is_err() {
            break;
        }
    });
}
