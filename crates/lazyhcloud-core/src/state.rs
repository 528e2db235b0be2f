//! Application state

use crate::{ContextMenu, DetailView, Multiplexer, ResourceCache, TextInput};
use lazyhcloud_config::Config;
use lazyhcloud_provider::{Resource, ResourceKind};

/// The active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    ProjectSelect,
    ProjectManage,
    TokenInput,
    ResourceView,
    ContextMenu,
    LabelView,
    ServerDetailView,
    NetworkSubnetView,
    FirewallRuleView,
    LoadBalancerTargetView,
    LoadBalancerServiceView,
    SnapshotInput,
    Error,
}

impl Phase {
    pub const ALL: [Phase; 13] = [
        Phase::ProjectSelect,
        Phase::ProjectManage,
        Phase::TokenInput,
        Phase::ResourceView,
        Phase::ContextMenu,
        Phase::LabelView,
        Phase::ServerDetailView,
        Phase::NetworkSubnetView,
        Phase::FirewallRuleView,
        Phase::LoadBalancerTargetView,
        Phase::LoadBalancerServiceView,
        Phase::SnapshotInput,
        Phase::Error,
    ];

    /// Where "back" leads. `None` means leaving this phase exits the program.
    pub fn parent(&self) -> Option<Phase> {
        match self {
            Self::ProjectSelect | Self::Error => None,
            Self::ProjectManage | Self::TokenInput | Self::ResourceView => {
                Some(Self::ProjectSelect)
            }
            Self::ContextMenu
            | Self::LabelView
            | Self::ServerDetailView
            | Self::NetworkSubnetView
            | Self::FirewallRuleView
            | Self::LoadBalancerTargetView
            | Self::LoadBalancerServiceView
            | Self::SnapshotInput => Some(Self::ResourceView),
        }
    }

    /// Phases where printable keys are typed into a field
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            Self::ProjectManage | Self::TokenInput | Self::SnapshotInput
        )
    }

    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            Self::LabelView
                | Self::ServerDetailView
                | Self::NetworkSubnetView
                | Self::FirewallRuleView
                | Self::LoadBalancerTargetView
                | Self::LoadBalancerServiceView
        )
    }
}

/// An authenticated session against one project
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// `None` for a one-off token that is not saved
    pub project: Option<String>,
    pub token: String,
}

impl Session {
    pub fn label(&self) -> &str {
        self.project.as_deref().unwrap_or("(unsaved token)")
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("project", &self.project)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient notice shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusLine {
    pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Token,
}

/// Add-project form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: TextInput,
    pub token: TextInput,
    pub focus: FormField,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: TextInput::new(),
            token: TextInput::masked(),
            focus: FormField::Name,
        }
    }
}

impl ProjectForm {
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Token => &mut self.token,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Token,
            FormField::Token => FormField::Name,
        };
    }
}

/// Snapshot description prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotForm {
    pub server_id: u64,
    /// Name from the list, for the prompt title only
    pub server_name: String,
    pub description: TextInput,
}

/// Everything the dashboard knows
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub phase: Phase,
    /// Tab shown in the resource browser
    pub active_kind: ResourceKind,
    pub cache: ResourceCache,
    /// Kind whose listing is in flight, if any
    pub loading_kind: Option<ResourceKind>,
    pub session: Option<Session>,
    /// Bumped whenever a session starts or ends. Results tagged with an
    /// older value belong to a previous session.
    pub generation: u64,
    /// Present only while `phase == Phase::ContextMenu`
    pub context_menu: Option<ContextMenu>,
    /// Present only while a detail phase is active
    pub detail: Option<DetailView>,
    pub detail_scroll: usize,
    pub status: Option<StatusLine>,
    /// Message shown by the error screen
    pub error: Option<String>,
    /// `None` until the config has been loaded
    pub config: Option<Config>,
    /// Highlighted row on the project screen
    pub project_cursor: usize,
    pub token_input: TextInput,
    pub project_form: ProjectForm,
    pub snapshot_form: Option<SnapshotForm>,
    /// Detected once at startup
    pub multiplexer: Multiplexer,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(multiplexer: Multiplexer) -> Self {
        Self {
            phase: Phase::ProjectSelect,
            active_kind: ResourceKind::Servers,
            cache: ResourceCache::new(),
            loading_kind: None,
            session: None,
            generation: 0,
            context_menu: None,
            detail: None,
            detail_scroll: 0,
            status: None,
            error: None,
            config: None,
            project_cursor: 0,
            token_input: TextInput::masked(),
            project_form: ProjectForm::default(),
            snapshot_form: None,
            multiplexer,
            should_quit: false,
        }
    }

    /// Projects from the loaded config, empty while loading
    pub fn projects(&self) -> &[lazyhcloud_config::ProjectConfig] {
        self.config
            .as_ref()
            .map(|c| c.projects.as_slice())
            .unwrap_or_default()
    }

    /// Resource highlighted in the active tab
    pub fn selected_resource(&self) -> Option<&Resource> {
        self.cache.entry(self.active_kind).selected()
    }

    pub fn is_loading(&self, kind: ResourceKind) -> bool {
        self.loading_kind == Some(kind)
    }

    /// Whether a result tagged `generation` belongs to the open session
    pub fn is_current(&self, generation: u64) -> bool {
        self.session.is_some() && generation == self.generation
    }
}
