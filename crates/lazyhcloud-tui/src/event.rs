//! Terminal event handling

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal events
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Reads terminal events on a blocking task
///
/// While paused the reader stops consuming input so a foreground child
/// process gets the keyboard to itself.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    paused: Arc<AtomicBool>,
}

impl EventHandler {
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let paused = Arc::new(AtomicBool::new(false));
        let reader_paused = paused.clone();

        tokio::task::spawn_blocking(move || loop {
            if tx.is_closed() {
                break;
            }
            if reader_paused.load(Ordering::SeqCst) {
                std::thread::sleep(poll_rate);
                continue;
            }
            if !event::poll(poll_rate).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(CrosstermEvent::Key(key)) => tx.send(Event::Key(key)),
                Ok(CrosstermEvent::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx, paused }
    }

    /// Stop reading input until [`EventHandler::resume`]
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
