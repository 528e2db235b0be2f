//! UI rendering. Drawing is a pure function of [`AppState`].

mod detail;
mod dialogs;
mod header_footer;
mod projects;
mod resources;

use lazyhcloud_core::{AppState, Phase, StatusLevel};
use lazyhcloud_provider::ResourceKind;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};

use detail::*;
use dialogs::*;
use header_footer::*;
use projects::*;
use resources::*;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, state, chunks[0]);
    let content = chunks[1];

    match state.phase {
        Phase::ProjectSelect => draw_projects(frame, state, content),
        Phase::ProjectManage => {
            draw_projects(frame, state, content);
            draw_project_form(frame, state, area);
        }
        Phase::TokenInput => {
            draw_projects(frame, state, content);
            draw_token_input(frame, state, area);
        }
        Phase::ResourceView => draw_resources(frame, state, content),
        Phase::ContextMenu => {
            draw_resources(frame, state, content);
            draw_context_menu(frame, state, content);
        }
        Phase::SnapshotInput => {
            draw_resources(frame, state, content);
            draw_snapshot_prompt(frame, state, area);
        }
        Phase::LabelView
        | Phase::ServerDetailView
        | Phase::NetworkSubnetView
        | Phase::FirewallRuleView
        | Phase::LoadBalancerTargetView
        | Phase::LoadBalancerServiceView => draw_detail(frame, state, content),
        Phase::Error => draw_error(frame, state, content),
    }

    draw_footer(frame, state, chunks[2]);
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn status_color(level: StatusLevel) -> Color {
    match level {
        StatusLevel::Info => Color::Cyan,
        StatusLevel::Success => Color::Green,
        StatusLevel::Warning => Color::Yellow,
        StatusLevel::Error => Color::Red,
    }
}

/// "servers", "load balancers", "floating IPs"
fn plural(kind: ResourceKind) -> String {
    format!("{}s", kind.noun())
}
