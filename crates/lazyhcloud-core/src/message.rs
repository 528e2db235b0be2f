//! Messages into the state machine and commands out of it

use crate::{ActionOutcome, MenuAction, ShellVariant, StatusLine};
use crossterm::event::KeyEvent;
use lazyhcloud_config::Config;
use lazyhcloud_provider::{Resource, ResourceKind, SnapshotInfo};
use std::time::Duration;

/// Input to [`crate::transition`]: a key press or a completed command
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    ConfigLoaded(Config),
    ConfigSaved,
    ResourcesLoaded {
        kind: ResourceKind,
        items: Vec<Resource>,
        /// Session that asked for the listing
        generation: u64,
    },
    /// A menu action was resolved against a freshly fetched resource
    ActionResolved {
        kind: ResourceKind,
        id: u64,
        outcome: ActionOutcome,
        generation: u64,
    },
    SnapshotStarted {
        server_id: u64,
        info: SnapshotInfo,
    },
    Copied {
        what: String,
        text: String,
    },
    ShellLaunched(String),
    /// Foreground SSH session ended (or failed to start)
    ShellExited(Result<(), String>),
    /// Non-fatal notice from a command
    Status(StatusLine),
    ClearStatus,
    /// Provider or config I/O failure
    Failed(String),
}

/// Where and as whom to open an SSH session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellTarget {
    pub user: String,
    pub host: String,
    pub server_name: String,
    /// Preferred terminal emulator for new-terminal launches
    pub terminal: Option<String>,
}

impl ShellTarget {
    /// `user@host` as passed to ssh
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Work for the runtime. Each command yields at most one [`Message`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadConfig,
    SaveConfig(Config),
    /// Build the provider client for a session. Completes without a message.
    Connect {
        token: String,
    },
    Disconnect,
    /// List a kind. `generation` is echoed back on the result.
    LoadResources {
        kind: ResourceKind,
        generation: u64,
    },
    /// Re-fetch `(kind, id)` and resolve `action` against the result
    RunAction {
        kind: ResourceKind,
        id: u64,
        action: MenuAction,
        generation: u64,
    },
    CopyToClipboard {
        text: String,
        what: String,
    },
    LaunchShell {
        variant: ShellVariant,
        target: ShellTarget,
    },
    /// Hand the terminal to an interactive ssh until it exits
    ForegroundShell {
        target: ShellTarget,
    },
    CreateSnapshot {
        server_id: u64,
        description: String,
    },
    ClearStatusAfter(Duration),
}
