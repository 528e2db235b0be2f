//! Rendering tests using TestBackend
//!
//! States are built by feeding messages through the core state machine, then
//! drawn into an in-memory buffer and checked as text.

mod helpers;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpers::render_state;
use lazyhcloud_config::{Config, ProjectConfig};
use lazyhcloud_core::*;
use lazyhcloud_provider::test_support::*;
use lazyhcloud_provider::{Resource, ResourceKind};

const WIDTH: u16 = 110;
const HEIGHT: u16 = 32;

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ch(c: char) -> Message {
    key(KeyCode::Char(c))
}

fn apply(state: AppState, messages: Vec<Message>) -> AppState {
    messages
        .into_iter()
        .fold(state, |state, msg| transition(state, msg).0)
}

fn config_with(projects: &[&str], default: Option<&str>) -> Config {
    let mut config = Config::default();
    for name in projects {
        config
            .add_project(ProjectConfig::new(*name, format!("tok-{}", name)))
            .unwrap();
    }
    config.default_project = default.map(str::to_string);
    config
}

/// Session on project "prod" with nothing loaded yet
fn connected() -> AppState {
    apply(
        AppState::new(Multiplexer::Tmux),
        vec![Message::ConfigLoaded(config_with(&["prod"], Some("prod")))],
    )
}

fn with_servers() -> AppState {
    apply(
        connected(),
        vec![Message::ResourcesLoaded {
            kind: ResourceKind::Servers,
            items: vec![
                Resource::Server(mock_server(1, "web-1")),
                Resource::Server(mock_server(2, "db-1")),
            ],
            generation: 1,
        }],
    )
}

fn render(state: &AppState) -> String {
    render_state(state, WIDTH, HEIGHT)
}

// ----------------------------------------------------------------------------
// Project selection
// ----------------------------------------------------------------------------

#[test]
fn test_render_loading_configuration() {
    let output = render(&AppState::new(Multiplexer::None));

    assert!(output.contains("lazyhcloud"));
    assert!(output.contains("Hetzner Cloud resource browser"));
    assert!(output.contains("Loading configuration..."));
}

#[test]
fn test_render_no_projects() {
    let state = apply(
        AppState::new(Multiplexer::None),
        vec![Message::ConfigLoaded(Config::default()), key(KeyCode::Esc)],
    );
    assert_eq!(state.phase, Phase::ProjectSelect);

    let output = render(&state);
    assert!(output.contains("No projects configured."));
    assert!(output.contains("Press 'a' to add a project"));
}

#[test]
fn test_render_project_list_marks_default() {
    let state = apply(
        AppState::new(Multiplexer::None),
        vec![Message::ConfigLoaded(config_with(&["prod", "staging"], None))],
    );
    let mut state = apply(state, vec![ch('j')]);
    state.config.as_mut().unwrap().default_project = Some("prod".to_string());

    let output = render(&state);
    assert!(output.contains("prod (default)"));
    assert!(output.contains("▶ staging"));
    assert!(output.contains("a: Add"));
}

#[test]
fn test_render_add_project_form() {
    let state = apply(
        AppState::new(Multiplexer::None),
        vec![
            Message::ConfigLoaded(config_with(&["prod"], None)),
            ch('a'),
            ch('d'),
            ch('e'),
            ch('v'),
        ],
    );
    assert_eq!(state.phase, Phase::ProjectManage);

    let output = render(&state);
    assert!(output.contains("Add Project"));
    assert!(output.contains("Name   dev"));
    assert!(output.contains("Tab: Switch field"));
}

#[test]
fn test_render_token_input_hides_token() {
    let state = apply(
        AppState::new(Multiplexer::None),
        vec![
            Message::ConfigLoaded(Config::default()),
            ch('s'),
            ch('e'),
            ch('c'),
        ],
    );
    assert_eq!(state.phase, Phase::TokenInput);

    let output = render(&state);
    assert!(output.contains("API Token"));
    assert!(!output.contains("sec"));
}

// ----------------------------------------------------------------------------
// Resource browser
// ----------------------------------------------------------------------------

#[test]
fn test_render_header_shows_project_and_tabs() {
    let output = render(&with_servers());

    assert!(output.contains("lazyhcloud - prod"));
    for kind in ResourceKind::ALL {
        assert!(output.contains(kind.label()), "missing tab {}", kind.label());
    }
}

#[test]
fn test_render_loading_placeholder() {
    let output = render(&connected());

    assert!(output.contains("Loading servers..."));
    assert!(output.contains("Servers…"));
}

#[test]
fn test_render_empty_kind() {
    let state = apply(
        with_servers(),
        vec![
            ch('l'),
            Message::ResourcesLoaded {
                kind: ResourceKind::Networks,
                items: vec![],
                generation: 1,
            },
        ],
    );

    let output = render(&state);
    assert!(output.contains("No networks found"));
}

#[test]
fn test_render_server_table() {
    let output = render(&with_servers());

    assert!(output.contains("Servers (2)"));
    assert!(output.contains("web-1"));
    assert!(output.contains("db-1"));
    assert!(output.contains("203.0.113.1"));
    assert!(output.contains("10.0.0.2"));
    assert!(output.contains("cx22"));
    assert!(output.contains("▶ web-1"));
}

#[test]
fn test_render_volume_table() {
    let mut state = apply(
        with_servers(),
        vec![Message::ResourcesLoaded {
            kind: ResourceKind::Volumes,
            items: vec![Resource::Volume(mock_volume(3, "pgdata", Some(2)))],
            generation: 1,
        }],
    );
    state.active_kind = ResourceKind::Volumes;

    let output = render(&state);
    assert!(output.contains("Volumes (1)"));
    assert!(output.contains("pgdata"));
    assert!(output.contains("10 GB"));
}

#[test]
fn test_render_context_menu_numbers_items() {
    let state = apply(with_servers(), vec![key(KeyCode::Enter)]);
    assert_eq!(state.phase, Phase::ContextMenu);

    let output = render(&state);
    assert!(output.contains("1. Cancel"));
    assert!(output.contains("2. View Labels"));
    assert!(output.contains("3. Copy Public IP"));
    assert!(output.contains("SSH in new tmux window"));
    assert!(output.contains("Create Snapshot"));
    assert!(output.contains(" web-1 "));
}

#[test]
fn test_render_snapshot_prompt() {
    let mut state = apply(with_servers(), vec![key(KeyCode::Enter)]);
    let index = state
        .context_menu
        .as_ref()
        .unwrap()
        .items
        .iter()
        .position(|item| item.action == MenuAction::CreateSnapshot)
        .unwrap();
    state.context_menu.as_mut().unwrap().selected = index;
    let state = apply(state, vec![key(KeyCode::Enter), ch('v'), ch('1')]);
    assert_eq!(state.phase, Phase::SnapshotInput);

    let output = render(&state);
    assert!(output.contains("Create Snapshot"));
    assert!(output.contains("Snapshot of web-1"));
    assert!(output.contains("v1"));
}

// ----------------------------------------------------------------------------
// Detail views
// ----------------------------------------------------------------------------

fn open(state: AppState, kind: ResourceKind, id: u64, view: DetailView) -> AppState {
    let generation = state.generation;
    apply(
        state,
        vec![Message::ActionResolved {
            kind,
            id,
            outcome: ActionOutcome::OpenDetail(view),
            generation,
        }],
    )
}

#[test]
fn test_render_labels() {
    let view = DetailView::Labels {
        kind: ResourceKind::Servers,
        name: "web-1".to_string(),
        labels: vec![
            ("env".to_string(), "prod".to_string()),
            ("team".to_string(), "infra".to_string()),
        ],
    };
    let state = open(with_servers(), ResourceKind::Servers, 1, view);

    let output = render(&state);
    assert!(output.contains("Labels: web-1"));
    assert!(output.contains("env = prod"));
    assert!(output.contains("team = infra"));
}

#[test]
fn test_render_server_detail() {
    let view = DetailView::ServerDetail {
        server: Box::new(mock_server(1, "web-1")),
        networks: vec![mock_network(1, "backend")],
    };
    let state = open(with_servers(), ResourceKind::Servers, 1, view);

    let output = render(&state);
    assert!(output.contains("Server: web-1"));
    assert!(output.contains("203.0.113.1"));
    assert!(output.contains("2 vCPU"));
    assert!(output.contains("Private networks"));
    assert!(output.contains("backend"));
    assert!(output.contains("10.0.1.0/24"));
}

#[test]
fn test_render_network_subnets() {
    let view = DetailView::NetworkSubnets {
        name: "backend".to_string(),
        ip_range: "10.0.0.0/16".to_string(),
        subnets: mock_network(1, "backend").subnets,
    };
    let state = open(with_servers(), ResourceKind::Networks, 1, view);

    let output = render(&state);
    assert!(output.contains("Subnets: backend"));
    assert!(output.contains("10.0.0.0/16"));
    assert!(output.contains("eu-central"));
    assert!(output.contains("gw 10.0.0.1"));
}

// ----------------------------------------------------------------------------
// Footer and errors
// ----------------------------------------------------------------------------

#[test]
fn test_render_footer_help_without_status() {
    let output = render(&with_servers());

    assert!(output.contains("Enter: Actions"));
    assert!(output.contains("r: Reload"));
}

#[test]
fn test_render_status_replaces_help() {
    let state = apply(
        with_servers(),
        vec![Message::Copied {
            what: "server public IP".to_string(),
            text: "203.0.113.1".to_string(),
        }],
    );

    let output = render(&state);
    assert!(output.contains("Copied server public IP: 203.0.113.1"));
    assert!(!output.contains("Enter: Actions"));
}

#[test]
fn test_render_error_screen() {
    let state = apply(
        with_servers(),
        vec![Message::Failed("server 1 not found".to_string())],
    );
    assert_eq!(state.phase, Phase::Error);

    let output = render(&state);
    assert!(output.contains("Error"));
    assert!(output.contains("server 1 not found"));
    assert!(output.contains("Press q or Esc to quit"));
    assert!(!output.contains("web-1"));
}

#[test]
fn test_render_small_terminal_does_not_panic() {
    let state = apply(with_servers(), vec![key(KeyCode::Enter)]);
    let output = render_state(&state, 20, 8);
    assert!(!output.is_empty());
}
