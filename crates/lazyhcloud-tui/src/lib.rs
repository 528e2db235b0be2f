//! Terminal UI for lazyhcloud
//!
//! Owns the terminal, runs commands produced by the core state machine and
//! renders the state with Ratatui.

mod clipboard;
mod error;
mod event;
pub mod executor;
mod runtime;
pub mod shell;
pub mod ui;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use error::{TuiError, TuiResult};
pub use event::{Event, EventHandler};
pub use executor::{Dispatch, Executor};
pub use runtime::{App, EVENT_POLL};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazyhcloud_core::{Environment, SystemEnvironment};
use lazyhcloud_provider::HcloudConnector;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

/// Settings from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Config file to use instead of the default location
    pub config_path: Option<PathBuf>,
    /// API base URL
    pub endpoint: String,
    /// Logs go to a file, so they may stay enabled while the TUI is up
    pub log_to_file: bool,
}

/// Run the TUI application
pub async fn run(options: RunOptions) -> TuiResult<()> {
    // Logs written to the terminal would corrupt the display; the guard
    // restores the previous subscriber when dropped
    let _guard = (!options.log_to_file).then(|| {
        tracing::subscriber::set_default(
            tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
        )
    });

    let multiplexer = SystemEnvironment.multiplexer();
    tracing::info!("Starting lazyhcloud (multiplexer: {})", multiplexer);

    let mut app = App::new(
        multiplexer,
        Arc::new(HcloudConnector::new(options.endpoint)),
        Arc::new(SystemClipboard::default()),
        options.config_path,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(EVENT_POLL);
    let res = app.run(&mut terminal, &mut events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
