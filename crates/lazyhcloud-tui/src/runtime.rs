//! The main loop: draw, wait for input or a command result, transition,
//! dispatch

use crate::clipboard::Clipboard;
use crate::event::{Event, EventHandler};
use crate::executor::{Dispatch, Executor};
use crate::{shell, ui, TuiResult};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazyhcloud_core::{init, transition, AppState, Command, Message, Multiplexer, ShellTarget};
use lazyhcloud_provider::Connector;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How often the event reader checks for input
pub const EVENT_POLL: Duration = Duration::from_millis(100);

pub struct App {
    state: AppState,
    executor: Executor,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    pub fn new(
        multiplexer: Multiplexer,
        connector: Arc<dyn Connector>,
        clipboard: Arc<dyn Clipboard>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(multiplexer),
            executor: Executor::new(connector, clipboard, config_path, tx),
            rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the startup commands
    pub fn start(&mut self) -> Vec<ShellTarget> {
        let state = self.take_state();
        let (state, cmds) = init(state);
        self.state = state;
        self.dispatch_all(cmds)
    }

    /// Fold one message into the state and dispatch what it asks for.
    /// Returns the foreground sessions the caller has to run.
    pub fn update(&mut self, message: Message) -> Vec<ShellTarget> {
        let state = self.take_state();
        let (state, cmds) = transition(state, message);
        self.state = state;
        self.dispatch_all(cmds)
    }

    /// Next result from a background command
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    fn take_state(&mut self) -> AppState {
        let placeholder = AppState::new(self.state.multiplexer);
        std::mem::replace(&mut self.state, placeholder)
    }

    fn dispatch_all(&mut self, cmds: Vec<Command>) -> Vec<ShellTarget> {
        cmds.into_iter()
            .filter_map(|cmd| match self.executor.dispatch(cmd) {
                Dispatch::Done => None,
                Dispatch::Foreground(target) => Some(target),
            })
            .collect()
    }

    /// Run until the state asks to quit
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
    ) -> TuiResult<()> {
        let mut foreground = self.start();

        while !self.state.should_quit {
            for target in foreground.drain(..) {
                let result = suspend_for_shell(terminal, events, target).await?;
                self.executor.send(Message::ShellExited(result));
            }

            terminal.draw(|frame| ui::draw(frame, &self.state))?;

            let message = tokio::select! {
                event = events.next() => match event {
                    Some(Event::Key(key)) => Some(Message::Key(key)),
                    Some(Event::Resize(_, _)) => None,
                    None => {
                        tracing::debug!("Event reader stopped");
                        break;
                    }
                },
                message = self.rx.recv() => message,
            };

            if let Some(message) = message {
                foreground = self.update(message);
            }
        }

        Ok(())
    }
}

/// Hand the terminal to an interactive ssh and take it back afterwards
async fn suspend_for_shell<B: Backend>(
    terminal: &mut Terminal<B>,
    events: &EventHandler,
    target: ShellTarget,
) -> TuiResult<Result<(), String>> {
    events.pause();
    // Let a poll that was already running finish before ssh reads stdin
    tokio::time::sleep(EVENT_POLL * 2).await;

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;

    let result = tokio::task::spawn_blocking(move || shell::run_foreground(&target))
        .await
        .unwrap_or_else(|e| Err(format!("ssh task failed: {}", e)));

    shell::reset_terminal();
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    terminal.clear()?;
    events.resume();

    Ok(result)
}
