//! The transition function
//!
//! `transition(state, message)` is the only place state changes. It never
//! performs I/O; anything slow is returned as a [`Command`] whose result comes
//! back later as another [`Message`].

use crate::{
    build_menu, ActionOutcome, AppState, Command, DetailView, FormField, MenuAction, Message,
    Phase, Session, ShellTarget, ShellVariant, SnapshotForm, StatusLine, TextInput,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lazyhcloud_config::ProjectConfig;
use lazyhcloud_provider::ResourceKind;
use std::time::Duration;

/// How long a status line stays up
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Initial state plus the commands to run at startup
pub fn init(state: AppState) -> (AppState, Vec<Command>) {
    (state, vec![Command::LoadConfig])
}

/// Fold one message into the state
pub fn transition(mut state: AppState, message: Message) -> (AppState, Vec<Command>) {
    let mut cmds = Vec::new();

    match message {
        Message::Key(key) => handle_key(&mut state, key, &mut cmds),
        Message::ConfigLoaded(config) => on_config_loaded(&mut state, config, &mut cmds),
        Message::ConfigSaved => set_status(
            &mut state,
            StatusLine::success("Project configuration saved"),
            &mut cmds,
        ),
        Message::ResourcesLoaded {
            kind,
            items,
            generation,
        } => {
            if !state.is_current(generation) {
                tracing::debug!(
                    "Dropping {} listing from session {} (current {})",
                    kind,
                    generation,
                    state.generation
                );
            } else {
                // Applied even if a newer reload is in flight: last write wins
                state.cache.store(kind, items);
                if state.loading_kind == Some(kind) {
                    state.loading_kind = None;
                }
            }
        }
        Message::ActionResolved {
            kind,
            id,
            outcome,
            generation,
        } => {
            if state.is_current(generation) {
                apply_outcome(&mut state, kind, id, outcome, &mut cmds)
            } else {
                tracing::debug!(
                    "Dropping action result for {} {} from session {}",
                    kind.noun(),
                    id,
                    generation
                );
            }
        }
        Message::SnapshotStarted { server_id, info } => {
            let text = match info.description {
                Some(desc) => format!("Snapshot \"{}\" of server {} started", desc, server_id),
                None => format!("Snapshot of server {} started", server_id),
            };
            set_status(&mut state, StatusLine::success(text), &mut cmds);
        }
        Message::Copied { what, text } => set_status(
            &mut state,
            StatusLine::success(format!("Copied {}: {}", what, text)),
            &mut cmds,
        ),
        Message::ShellLaunched(description) => {
            set_status(&mut state, StatusLine::success(description), &mut cmds)
        }
        Message::ShellExited(result) => {
            let line = match result {
                Ok(()) => StatusLine::info("SSH session ended"),
                Err(e) => StatusLine::error(format!("SSH failed: {}", e)),
            };
            set_status(&mut state, line, &mut cmds);
        }
        Message::Status(line) => set_status(&mut state, line, &mut cmds),
        // Unconditional: an older timer may clear a newer status
        Message::ClearStatus => state.status = None,
        Message::Failed(error) => fail(&mut state, error),
    }

    (state, cmds)
}

/// Show a status line and schedule its removal
fn set_status(state: &mut AppState, line: StatusLine, cmds: &mut Vec<Command>) {
    state.status = Some(line);
    cmds.push(Command::ClearStatusAfter(STATUS_TIMEOUT));
}

fn fail(state: &mut AppState, error: String) {
    // The first failure is the cause; later ones are usually its fallout
    if state.phase == Phase::Error {
        tracing::debug!("Ignoring failure while in error phase: {}", error);
        return;
    }
    tracing::debug!("Entering error phase: {}", error);
    state.phase = Phase::Error;
    state.error = Some(error);
    state.context_menu = None;
    state.detail = None;
    state.snapshot_form = None;
    state.loading_kind = None;
}

fn on_config_loaded(state: &mut AppState, config: lazyhcloud_config::Config, cmds: &mut Vec<Command>) {
    let default = config.default_project().cloned();
    let empty = config.projects.is_empty();
    state.config = Some(config);
    state.project_cursor = 0;

    if state.phase != Phase::ProjectSelect {
        return;
    }

    if let Some(project) = default {
        state.project_cursor = state
            .projects()
            .iter()
            .position(|p| p.name == project.name)
            .unwrap_or(0);
        start_session(state, Some(project.name), project.token, cmds);
    } else if empty {
        state.token_input.clear();
        state.phase = Phase::TokenInput;
    }
}

/// Open a session and load the first tab
fn start_session(
    state: &mut AppState,
    project: Option<String>,
    token: String,
    cmds: &mut Vec<Command>,
) {
    let session = Session { project, token };
    state.generation += 1;
    tracing::info!(
        "Opening session {} for {}",
        state.generation,
        session.label()
    );

    state.cache.reset();
    state.active_kind = ResourceKind::Servers;
    state.context_menu = None;
    state.detail = None;
    state.phase = Phase::ResourceView;
    state.loading_kind = Some(state.active_kind);

    cmds.push(Command::Connect {
        token: session.token.clone(),
    });
    cmds.push(Command::LoadResources {
        kind: state.active_kind,
        generation: state.generation,
    });
    state.session = Some(session);
}

fn end_session(state: &mut AppState, cmds: &mut Vec<Command>) {
    state.session = None;
    state.generation += 1;
    state.cache.reset();
    state.loading_kind = None;
    state.context_menu = None;
    state.detail = None;
    state.snapshot_form = None;
    state.phase = Phase::ProjectSelect;
    cmds.push(Command::Disconnect);
}

/// Go to the parent phase, or quit from a phase without one
fn go_back(state: &mut AppState, cmds: &mut Vec<Command>) {
    match state.phase.parent() {
        None => state.should_quit = true,
        Some(Phase::ProjectSelect) if state.phase == Phase::ResourceView => end_session(state, cmds),
        Some(parent) => {
            state.context_menu = None;
            state.detail = None;
            state.detail_scroll = 0;
            state.snapshot_form = None;
            state.phase = parent;
        }
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // In text fields only Esc goes back, so `q` can be typed
    let is_back = match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('q') => !state.phase.is_text_input(),
        _ => false,
    };
    if is_back {
        go_back(state, cmds);
        return;
    }

    match state.phase {
        Phase::ProjectSelect => handle_project_select_key(state, key, cmds),
        Phase::ProjectManage => handle_project_manage_key(state, key, cmds),
        Phase::TokenInput => handle_token_input_key(state, key, cmds),
        Phase::ResourceView => handle_resource_view_key(state, key, cmds),
        Phase::ContextMenu => handle_context_menu_key(state, key, cmds),
        Phase::SnapshotInput => handle_snapshot_input_key(state, key, cmds),
        Phase::LabelView
        | Phase::ServerDetailView
        | Phase::NetworkSubnetView
        | Phase::FirewallRuleView
        | Phase::LoadBalancerTargetView
        | Phase::LoadBalancerServiceView => handle_detail_key(state, key),
        Phase::Error => {}
    }
}

fn handle_project_select_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    // Still loading the config
    if state.config.is_none() {
        return;
    }
    let count = state.projects().len();

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            if count > 0 {
                state.project_cursor = (state.project_cursor + 1) % count;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if count > 0 {
                state.project_cursor = state.project_cursor.checked_sub(1).unwrap_or(count - 1);
            }
        }
        KeyCode::Enter => {
            if let Some(project) = state.projects().get(state.project_cursor).cloned() {
                start_session(state, Some(project.name), project.token, cmds);
            }
        }
        KeyCode::Char('a') => {
            state.project_form = Default::default();
            state.phase = Phase::ProjectManage;
        }
        KeyCode::Char('t') => {
            state.token_input.clear();
            state.phase = Phase::TokenInput;
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let Some(name) = state
                .projects()
                .get(state.project_cursor)
                .map(|p| p.name.clone())
            else {
                return;
            };
            if let Some(config) = state.config.as_mut() {
                config.remove_project(&name);
                let remaining = config.projects.len();
                cmds.push(Command::SaveConfig(config.clone()));
                state.project_cursor = state.project_cursor.min(remaining.saturating_sub(1));
            }
        }
        KeyCode::Char('s') => {
            let Some(name) = state
                .projects()
                .get(state.project_cursor)
                .map(|p| p.name.clone())
            else {
                return;
            };
            if let Some(config) = state.config.as_mut() {
                if config.set_default(&name).is_ok() {
                    cmds.push(Command::SaveConfig(config.clone()));
                }
            }
        }
        _ => {}
    }
}

fn handle_project_manage_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            state.project_form.toggle_focus()
        }
        KeyCode::Enter => {
            if state.project_form.focus == FormField::Name {
                state.project_form.toggle_focus();
                return;
            }
            let form = &state.project_form;
            if form.name.is_empty() || form.token.is_empty() {
                set_status(
                    state,
                    StatusLine::warning("Project name and token are required"),
                    cmds,
                );
                return;
            }

            let project = ProjectConfig::new(
                form.name.value().trim(),
                form.token.value().trim(),
            );
            let name = project.name.clone();
            let Some(config) = state.config.as_mut() else {
                return;
            };
            if let Err(e) = config.add_project(project) {
                set_status(state, StatusLine::warning(e.to_string()), cmds);
                return;
            }
            cmds.push(Command::SaveConfig(config.clone()));
            state.project_cursor = config
                .projects
                .iter()
                .position(|p| p.name == name)
                .unwrap_or(0);
            state.project_form = Default::default();
            state.phase = Phase::ProjectSelect;
        }
        _ => {
            state.project_form.focused_mut().handle_key(&key);
        }
    }
}

fn handle_token_input_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Enter => {
            if state.token_input.is_empty() {
                set_status(state, StatusLine::warning("Token must not be empty"), cmds);
                return;
            }
            let token = state.token_input.value().trim().to_string();
            state.token_input = TextInput::masked();
            start_session(state, None, token, cmds);
        }
        _ => {
            state.token_input.handle_key(&key);
        }
    }
}

fn switch_tab(state: &mut AppState, kind: ResourceKind, cmds: &mut Vec<Command>) {
    state.active_kind = kind;
    if !state.cache.is_loaded(kind) && state.loading_kind != Some(kind) {
        state.loading_kind = Some(kind);
        cmds.push(Command::LoadResources {
            kind,
            generation: state.generation,
        });
    }
}

fn reload(state: &mut AppState, cmds: &mut Vec<Command>) {
    let kind = state.active_kind;
    state.cache.invalidate(kind);
    state.loading_kind = Some(kind);
    cmds.push(Command::LoadResources {
        kind,
        generation: state.generation,
    });
}

fn handle_resource_view_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    let kind = state.active_kind;
    match key.code {
        KeyCode::Tab => switch_tab(state, kind.next(), cmds),
        KeyCode::BackTab => switch_tab(state, kind.prev(), cmds),
        KeyCode::Right | KeyCode::Char('l') => {
            if kind.index() + 1 < ResourceKind::ALL.len() {
                switch_tab(state, kind.next(), cmds);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if kind.index() > 0 {
                switch_tab(state, kind.prev(), cmds);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => state.cache.entry_mut(kind).move_cursor(true),
        KeyCode::Up | KeyCode::Char('k') => state.cache.entry_mut(kind).move_cursor(false),
        KeyCode::Char('r') => reload(state, cmds),
        KeyCode::Enter => {
            if let Some(id) = state.selected_resource().map(|r| r.id()) {
                state.context_menu = Some(build_menu(kind, id, state.multiplexer));
                state.phase = Phase::ContextMenu;
            }
        }
        _ => {}
    }
}

fn handle_context_menu_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    let Some(menu) = state.context_menu.as_mut() else {
        state.phase = Phase::ResourceView;
        return;
    };

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => menu.select_next(),
        KeyCode::Up | KeyCode::Char('k') => menu.select_prev(),
        KeyCode::Enter => {
            let idx = menu.selected;
            execute_menu_item(state, idx, cmds);
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(idx) = menu.shortcut_index(c) {
                execute_menu_item(state, idx, cmds);
            }
        }
        _ => {}
    }
}

/// Close the menu and run the item at `idx`
fn execute_menu_item(state: &mut AppState, idx: usize, cmds: &mut Vec<Command>) {
    let Some(menu) = state.context_menu.take() else {
        return;
    };
    state.phase = Phase::ResourceView;

    let Some(action) = menu.items.get(idx).map(|item| item.action) else {
        return;
    };
    tracing::debug!(
        "Menu action {:?} on {} {}",
        action,
        menu.kind.noun(),
        menu.resource_id
    );

    match action {
        MenuAction::Cancel => {}
        MenuAction::CreateSnapshot => {
            let server_name = state
                .cache
                .find(menu.kind, menu.resource_id)
                .map(|r| r.display_name())
                .unwrap_or_else(|| format!("server {}", menu.resource_id));
            state.snapshot_form = Some(SnapshotForm {
                server_id: menu.resource_id,
                server_name,
                description: TextInput::new(),
            });
            state.phase = Phase::SnapshotInput;
        }
        action => cmds.push(Command::RunAction {
            kind: menu.kind,
            id: menu.resource_id,
            action,
            generation: state.generation,
        }),
    }
}

fn handle_snapshot_input_key(state: &mut AppState, key: KeyEvent, cmds: &mut Vec<Command>) {
    let Some(form) = state.snapshot_form.as_mut() else {
        state.phase = Phase::ResourceView;
        return;
    };

    match key.code {
        KeyCode::Enter => {
            if form.description.is_empty() {
                set_status(
                    state,
                    StatusLine::warning("Snapshot description must not be empty"),
                    cmds,
                );
                return;
            }
            cmds.push(Command::CreateSnapshot {
                server_id: form.server_id,
                description: form.description.value().trim().to_string(),
            });
            state.snapshot_form = None;
            state.phase = Phase::ResourceView;
        }
        _ => {
            form.description.handle_key(&key);
        }
    }
}

fn handle_detail_key(state: &mut AppState, key: KeyEvent) {
    let rows = state.detail.as_ref().map_or(0, DetailView::row_count);
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            if state.detail_scroll + 1 < rows {
                state.detail_scroll += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.detail_scroll = state.detail_scroll.saturating_sub(1);
        }
        KeyCode::Home | KeyCode::Char('g') => state.detail_scroll = 0,
        _ => {}
    }
}

fn apply_outcome(
    state: &mut AppState,
    kind: ResourceKind,
    id: u64,
    outcome: ActionOutcome,
    cmds: &mut Vec<Command>,
) {
    if state.phase == Phase::Error {
        tracing::debug!("Dropping action result for {} {}", kind.noun(), id);
        return;
    }

    match outcome {
        ActionOutcome::Nothing => {}
        ActionOutcome::Copy { text, what } => cmds.push(Command::CopyToClipboard { text, what }),
        ActionOutcome::MissingField(text) => set_status(state, StatusLine::warning(text), cmds),
        ActionOutcome::Notice(text) => set_status(state, StatusLine::info(text), cmds),
        ActionOutcome::OpenDetail(view) => {
            state.context_menu = None;
            state.snapshot_form = None;
            state.phase = view.phase();
            state.detail = Some(view);
            state.detail_scroll = 0;
        }
        ActionOutcome::Launch {
            variant,
            host,
            server_name,
        } => {
            let defaults = state
                .config
                .as_ref()
                .map(|c| c.defaults.clone())
                .unwrap_or_default();
            let target = ShellTarget {
                user: defaults.ssh_user,
                host,
                server_name,
                terminal: defaults.terminal,
            };
            if variant == ShellVariant::CurrentTerminal {
                cmds.push(Command::ForegroundShell { target });
            } else {
                cmds.push(Command::LaunchShell { variant, target });
            }
        }
    }
}
