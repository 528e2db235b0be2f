//! Runs [`Command`]s and feeds their results back as [`Message`]s
//!
//! Every command except the connection bookkeeping becomes its own tokio
//! task. Tasks are never cancelled; a result that arrives after the user has
//! moved on is still delivered and the state machine decides what to do
//! with it.

use crate::clipboard::Clipboard;
use crate::shell;
use futures::future::join_all;
use lazyhcloud_config::Config;
use lazyhcloud_core::{
    resolve, ActionOutcome, Command, DetailView, MenuAction, Message, ShellTarget, StatusLine,
};
use lazyhcloud_provider::{
    get_existing, Connector, Resource, ResourceKind, ResourceProvider, Result as ProviderResult,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the runtime loop has to do after a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Handled, any result arrives on the channel
    Done,
    /// Suspend the TUI and run ssh in the foreground
    Foreground(ShellTarget),
}

pub struct Executor {
    connector: Arc<dyn Connector>,
    provider: Option<Arc<dyn ResourceProvider>>,
    clipboard: Arc<dyn Clipboard>,
    /// Overrides the default config location
    config_path: Option<PathBuf>,
    tx: mpsc::UnboundedSender<Message>,
}

impl Executor {
    pub fn new(
        connector: Arc<dyn Connector>,
        clipboard: Arc<dyn Clipboard>,
        config_path: Option<PathBuf>,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            connector,
            provider: None,
            clipboard,
            config_path,
            tx,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    pub fn dispatch(&mut self, command: Command) -> Dispatch {
        tracing::debug!("Dispatching {}", command_name(&command));

        match command {
            Command::LoadConfig => {
                let path = self.config_path.clone();
                self.spawn_blocking(move || {
                    let loaded = match path {
                        Some(path) => Config::load_from(&path),
                        None => Config::load(),
                    };
                    match loaded {
                        Ok(config) => Message::ConfigLoaded(config),
                        Err(e) => Message::Failed(e.to_string()),
                    }
                });
            }
            Command::SaveConfig(config) => {
                let path = self.config_path.clone();
                self.spawn_blocking(move || {
                    let saved = match path {
                        Some(path) => config.save_to(&path),
                        None => config.save(),
                    };
                    match saved {
                        Ok(()) => Message::ConfigSaved,
                        Err(e) => Message::Failed(e.to_string()),
                    }
                });
            }
            Command::Connect { token } => match self.connector.connect(&token) {
                Ok(provider) => self.provider = Some(provider),
                Err(e) => self.send(Message::Failed(e.to_string())),
            },
            Command::Disconnect => self.provider = None,
            Command::LoadResources { kind, generation } => {
                if let Some(provider) = self.require_provider() {
                    self.spawn(async move {
                        match provider.list(kind).await {
                            Ok(items) => {
                                tracing::debug!("Loaded {} {}", items.len(), kind);
                                Message::ResourcesLoaded {
                                    kind,
                                    items,
                                    generation,
                                }
                            }
                            Err(e) => Message::Failed(e.to_string()),
                        }
                    });
                }
            }
            Command::RunAction {
                kind,
                id,
                action,
                generation,
            } => {
                if let Some(provider) = self.require_provider() {
                    self.spawn(async move {
                        match run_action(provider.as_ref(), kind, id, action).await {
                            Ok(outcome) => Message::ActionResolved {
                                kind,
                                id,
                                outcome,
                                generation,
                            },
                            Err(e) => Message::Failed(e.to_string()),
                        }
                    });
                }
            }
            Command::CreateSnapshot {
                server_id,
                description,
            } => {
                if let Some(provider) = self.require_provider() {
                    self.spawn(async move {
                        match create_snapshot(provider.as_ref(), server_id, &description).await {
                            Ok(info) => Message::SnapshotStarted { server_id, info },
                            Err(e) => Message::Failed(e.to_string()),
                        }
                    });
                }
            }
            Command::CopyToClipboard { text, what } => {
                let clipboard = self.clipboard.clone();
                self.spawn_blocking(move || match clipboard.write_all(&text) {
                    Ok(()) => Message::Copied { what, text },
                    Err(e) => Message::Status(StatusLine::error(format!(
                        "Failed to copy {}: {}",
                        what, e
                    ))),
                });
            }
            Command::LaunchShell { variant, target } => {
                self.spawn_blocking(move || {
                    let launched = shell::launch_command(
                        variant,
                        &target,
                        cfg!(target_os = "macos"),
                        &shell::on_path,
                    )
                    .and_then(|cmd| shell::spawn_launch(&cmd));
                    match launched {
                        Ok(report) => Message::ShellLaunched(report),
                        Err(e) => Message::Status(StatusLine::error(e.to_string())),
                    }
                });
            }
            Command::ForegroundShell { target } => return Dispatch::Foreground(target),
            Command::ClearStatusAfter(delay) => {
                self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Message::ClearStatus
                });
            }
        }

        Dispatch::Done
    }

    /// The session's provider, or a failure message when there is none
    fn require_provider(&self) -> Option<Arc<dyn ResourceProvider>> {
        if self.provider.is_none() {
            self.send(Message::Failed("Not connected to a project".to_string()));
        }
        self.provider.clone()
    }

    pub(crate) fn send(&self, message: Message) {
        // Receiver gone means the loop has exited
        let _ = self.tx.send(message);
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn spawn_blocking<F>(&self, task: F)
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(task());
        });
    }
}

/// Command name for logs. Never includes the token.
fn command_name(command: &Command) -> String {
    match command {
        Command::LoadConfig => "LoadConfig".to_string(),
        Command::SaveConfig(_) => "SaveConfig".to_string(),
        Command::Connect { .. } => "Connect".to_string(),
        Command::Disconnect => "Disconnect".to_string(),
        Command::LoadResources { kind, generation } => {
            format!("LoadResources({}, session {})", kind, generation)
        }
        Command::RunAction {
            kind, id, action, ..
        } => format!("RunAction({} {}, {:?})", kind.noun(), id, action),
        Command::CopyToClipboard { what, .. } => format!("CopyToClipboard({})", what),
        Command::LaunchShell { variant, target } => {
            format!("LaunchShell({:?}, {})", variant, target.destination())
        }
        Command::ForegroundShell { target } => {
            format!("ForegroundShell({})", target.destination())
        }
        Command::CreateSnapshot { server_id, .. } => format!("CreateSnapshot({})", server_id),
        Command::ClearStatusAfter(delay) => format!("ClearStatusAfter({:?})", delay),
    }
}

/// Re-fetch a resource by ID and resolve a menu action against it
pub async fn run_action(
    provider: &dyn ResourceProvider,
    kind: ResourceKind,
    id: u64,
    action: MenuAction,
) -> ProviderResult<ActionOutcome> {
    let mut resource = get_existing(provider, kind, id).await?;
    enrich_attached_server(provider, &mut resource).await;

    let mut outcome = resolve(action, &resource);
    if let ActionOutcome::OpenDetail(DetailView::ServerDetail { server, networks }) = &mut outcome
    {
        *networks = attached_networks(provider, &server.private_net).await;
    }
    Ok(outcome)
}

/// Snapshot a server after confirming it still exists
pub async fn create_snapshot(
    provider: &dyn ResourceProvider,
    server_id: u64,
    description: &str,
) -> ProviderResult<lazyhcloud_provider::SnapshotInfo> {
    get_existing(provider, ResourceKind::Servers, server_id).await?;
    provider.create_snapshot(server_id, description).await
}

/// Fill in the attached server's name for volumes and floating IPs
async fn enrich_attached_server(provider: &dyn ResourceProvider, resource: &mut Resource) {
    let (server_id, server_name) = match resource {
        Resource::Volume(v) => (v.server, &mut v.server_name),
        Resource::FloatingIp(fip) => (fip.server, &mut fip.server_name),
        _ => return,
    };
    let Some(server_id) = server_id else {
        return;
    };

    match provider.get(ResourceKind::Servers, server_id).await {
        Ok(Some(server)) => *server_name = Some(server.display_name()),
        Ok(None) => tracing::warn!("Attached server {} not found", server_id),
        Err(e) => tracing::warn!("Failed to fetch attached server {}: {}", server_id, e),
    }
}

/// Networks a server is attached to, skipping any that fail to load
async fn attached_networks(
    provider: &dyn ResourceProvider,
    private_net: &[lazyhcloud_provider::PrivateNet],
) -> Vec<lazyhcloud_provider::Network> {
    let fetches = private_net
        .iter()
        .map(|net| provider.get(ResourceKind::Networks, net.network));

    join_all(fetches)
        .await
        .into_iter()
        .zip(private_net)
        .filter_map(|(result, net)| match result {
            Ok(Some(Resource::Network(network))) => Some(network),
            Ok(_) => {
                tracing::warn!("Network {} not found", net.network);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to fetch network {}: {}", net.network, e);
                None
            }
        })
        .collect()
}
