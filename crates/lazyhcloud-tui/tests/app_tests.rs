//! End-to-end tests of the App loop without a terminal
//!
//! Messages are pulled off the executor channel by hand and fed back through
//! `App::update`, which is what `App::run` does between draws.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lazyhcloud_config::{Config, ProjectConfig};
use lazyhcloud_core::*;
use lazyhcloud_provider::test_support::*;
use lazyhcloud_provider::{Resource, ResourceKind};
use lazyhcloud_tui::{App, Clipboard, ClipboardError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl Clipboard for RecordingClipboard {
    fn write_all(&self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Config file with one default project, in a temp dir
fn config_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config
        .add_project(ProjectConfig::new("prod", "tok-prod"))
        .unwrap();
    config.save_to(&path).unwrap();
    path
}

struct Fixture {
    app: App,
    provider: MockProvider,
    connector: MockConnector,
    clipboard: Arc<RecordingClipboard>,
    _dir: TempDir,
}

impl Fixture {
    fn new(resources: Vec<Resource>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir);
        let provider = MockProvider::with_resources(resources);
        let connector = MockConnector::new(provider.clone());
        let clipboard = Arc::new(RecordingClipboard::default());
        let app = App::new(
            Multiplexer::None,
            Arc::new(connector.clone()),
            clipboard.clone(),
            Some(path),
        );
        Self {
            app,
            provider,
            connector,
            clipboard,
            _dir: dir,
        }
    }

    /// Wait for the next background result and fold it in
    async fn pump(&mut self) -> Message {
        let message = tokio::time::timeout(Duration::from_secs(5), self.app.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("channel closed");
        let foreground = self.app.update(message.clone());
        assert!(foreground.is_empty());
        message
    }

    async fn started(resources: Vec<Resource>) -> Self {
        let mut fixture = Self::new(resources);
        assert!(fixture.app.start().is_empty());

        let loaded = fixture.pump().await;
        assert!(matches!(loaded, Message::ConfigLoaded(_)));
        let listed = fixture.pump().await;
        assert!(matches!(
            listed,
            Message::ResourcesLoaded {
                kind: ResourceKind::Servers,
                ..
            }
        ));
        fixture
    }
}

fn servers() -> Vec<Resource> {
    vec![
        Resource::Server(mock_server(1, "web-1")),
        Resource::Server(mock_server(2, "db-1")),
    ]
}

// ----------------------------------------------------------------------------
// Startup
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_start_opens_default_project() {
    let fixture = Fixture::started(servers()).await;
    let state = fixture.app.state();

    assert_eq!(state.phase, Phase::ResourceView);
    assert_eq!(state.session.as_ref().unwrap().label(), "prod");
    assert_eq!(state.cache.entry(ResourceKind::Servers).items.len(), 2);
    assert_eq!(state.loading_kind, None);
    assert_eq!(
        *fixture.connector.tokens.lock().unwrap(),
        vec!["tok-prod".to_string()]
    );
    assert_eq!(
        fixture.provider.get_calls(),
        vec![MockCall::List {
            kind: ResourceKind::Servers
        }]
    );
}

#[tokio::test]
async fn test_switching_tab_loads_once() {
    let mut fixture = Fixture::started(servers()).await;

    fixture.app.update(key(KeyCode::Tab));
    fixture.pump().await;
    fixture.app.update(key(KeyCode::BackTab));
    fixture.app.update(key(KeyCode::Tab));

    let lists = fixture
        .provider
        .get_calls()
        .into_iter()
        .filter(|c| matches!(c, MockCall::List { .. }))
        .count();
    assert_eq!(lists, 2);
    assert_eq!(fixture.app.state().active_kind, ResourceKind::Networks);
}

// ----------------------------------------------------------------------------
// Context menu round trip
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_copy_from_menu_refetches_and_copies() {
    let mut fixture = Fixture::started(servers()).await;

    // The server gets a new address after the list was loaded
    let mut moved = mock_server(1, "web-1");
    moved.public_net.ipv4.as_mut().unwrap().ip = "203.0.113.99".to_string();
    fixture.provider.upsert(Resource::Server(moved));

    fixture.app.update(key(KeyCode::Enter));
    assert_eq!(fixture.app.state().phase, Phase::ContextMenu);
    fixture.app.update(key(KeyCode::Char('3')));

    let resolved = fixture.pump().await;
    assert!(matches!(resolved, Message::ActionResolved { id: 1, .. }));
    let copied = fixture.pump().await;
    assert_eq!(
        copied,
        Message::Copied {
            what: "server public IP".to_string(),
            text: "203.0.113.99".to_string(),
        }
    );

    assert_eq!(
        *fixture.clipboard.writes.lock().unwrap(),
        vec!["203.0.113.99".to_string()]
    );
    let state = fixture.app.state();
    assert_eq!(state.phase, Phase::ResourceView);
    assert_eq!(
        state.status.as_ref().unwrap().text,
        "Copied server public IP: 203.0.113.99"
    );
}

#[tokio::test]
async fn test_menu_on_deleted_server_ends_in_error() {
    let mut fixture = Fixture::started(servers()).await;
    fixture.provider.remove(ResourceKind::Servers, 1);

    fixture.app.update(key(KeyCode::Enter));
    fixture.app.update(key(KeyCode::Char('2')));
    fixture.pump().await;

    let state = fixture.app.state();
    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.error.as_deref(), Some("server 1 not found"));

    fixture.app.update(key(KeyCode::Char('q')));
    assert!(fixture.app.state().should_quit);
}

#[tokio::test]
async fn test_current_terminal_shell_is_returned_to_caller() {
    let mut fixture = Fixture::started(servers()).await;

    fixture.app.update(key(KeyCode::Enter));
    let index = fixture
        .app
        .state()
        .context_menu
        .as_ref()
        .unwrap()
        .items
        .iter()
        .position(|item| item.action == MenuAction::Shell(ShellVariant::CurrentTerminal))
        .unwrap();
    for _ in 0..index {
        fixture.app.update(key(KeyCode::Down));
    }
    fixture.app.update(key(KeyCode::Enter));

    let message = tokio::time::timeout(Duration::from_secs(5), fixture.app.recv())
        .await
        .unwrap()
        .unwrap();
    let foreground = fixture.app.update(message);

    assert_eq!(
        foreground,
        vec![ShellTarget {
            user: "root".to_string(),
            host: "203.0.113.1".to_string(),
            server_name: "web-1".to_string(),
            terminal: None,
        }]
    );
}

#[tokio::test]
async fn test_back_from_browser_disconnects() {
    let mut fixture = Fixture::started(servers()).await;

    fixture.app.update(key(KeyCode::Char('q')));

    let state = fixture.app.state();
    assert_eq!(state.phase, Phase::ProjectSelect);
    assert!(state.session.is_none());
    assert!(!state.should_quit);
}
