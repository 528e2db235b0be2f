use super::*;
use lazyhcloud_core::{ContextMenu, ListStatus};
use lazyhcloud_provider::Resource;
use ratatui::widgets::TableState;

/// Draw the active tab's list, or its loading / empty placeholder
pub(super) fn draw_resources(frame: &mut Frame, state: &AppState, area: Rect) {
    let kind = state.active_kind;
    let title = format!(" {} ", kind.label());

    let placeholder = match state.cache.list_status(kind) {
        ListStatus::Loading => Some((format!("Loading {}...", plural(kind)), Color::Yellow)),
        ListStatus::Empty => Some((format!("No {} found", plural(kind)), Color::DarkGray)),
        ListStatus::Ready => None,
    };
    if let Some((text, color)) = placeholder {
        let p = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
        return;
    }

    let entry = state.cache.entry(kind);
    let (header, widths) = columns(kind);
    let header = Row::new(header.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows: Vec<Row> = entry.items.iter().map(row).collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", kind.label(), entry.items.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(Some(entry.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn columns(kind: ResourceKind) -> (&'static [&'static str], Vec<Constraint>) {
    match kind {
        ResourceKind::Servers => (
            &["Name", "Status", "Public IP", "Private IP", "Type", "Location"],
            vec![
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        ),
        ResourceKind::Networks => (
            &["Name", "IP Range", "Subnets", "Servers"],
            vec![
                Constraint::Min(16),
                Constraint::Length(18),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        ),
        ResourceKind::LoadBalancers => (
            &["Name", "Public IPv4", "Type", "Location", "Targets"],
            vec![
                Constraint::Min(16),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        ),
        ResourceKind::FloatingIps => (
            &["Name", "Address", "Type", "Server"],
            vec![
                Constraint::Min(16),
                Constraint::Length(24),
                Constraint::Length(6),
                Constraint::Length(10),
            ],
        ),
        ResourceKind::Firewalls => (
            &["Name", "Rules", "Applied To"],
            vec![
                Constraint::Min(16),
                Constraint::Length(6),
                Constraint::Length(10),
            ],
        ),
        ResourceKind::Volumes => (
            &["Name", "Size", "Server", "Location", "Status"],
            vec![
                Constraint::Min(16),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
        ),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn row(resource: &Resource) -> Row<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    match resource {
        Resource::Server(s) => {
            let status_color = match s.status {
                lazyhcloud_provider::ServerStatus::Running => Color::Green,
                lazyhcloud_provider::ServerStatus::Off => Color::DarkGray,
                _ => Color::Yellow,
            };
            Row::new(vec![
                Cell::from(s.name.clone()).style(Style::default().bold()),
                Cell::from(s.status.to_string()).style(Style::default().fg(status_color)),
                Cell::from(or_dash(s.public_ipv4())),
                Cell::from(or_dash(s.private_ip())),
                Cell::from(or_dash(s.server_type.as_ref().map(|t| t.name.as_str()))),
                Cell::from(or_dash(
                    s.datacenter
                        .as_ref()
                        .and_then(|dc| dc.location.as_ref())
                        .map(|l| l.name.as_str()),
                ))
                .style(dim),
            ])
        }
        Resource::Network(n) => Row::new(vec![
            Cell::from(n.name.clone()).style(Style::default().bold()),
            Cell::from(n.ip_range.clone()),
            Cell::from(n.subnets.len().to_string()),
            Cell::from(n.servers.len().to_string()),
        ]),
        Resource::LoadBalancer(lb) => Row::new(vec![
            Cell::from(lb.name.clone()).style(Style::default().bold()),
            Cell::from(or_dash(lb.public_ipv4())),
            Cell::from(or_dash(
                lb.load_balancer_type.as_ref().map(|t| t.name.as_str()),
            )),
            Cell::from(or_dash(lb.location.as_ref().map(|l| l.name.as_str()))).style(dim),
            Cell::from(lb.targets.len().to_string()),
        ]),
        Resource::FloatingIp(fip) => Row::new(vec![
            Cell::from(fip.display_name()).style(Style::default().bold()),
            Cell::from(fip.ip.clone()),
            Cell::from(fip.ip_type.clone()),
            Cell::from(fip.server.map_or("-".to_string(), |id| id.to_string())),
        ]),
        Resource::Firewall(fw) => Row::new(vec![
            Cell::from(fw.name.clone()).style(Style::default().bold()),
            Cell::from(fw.rules.len().to_string()),
            Cell::from(fw.applied_to.len().to_string()),
        ]),
        Resource::Volume(v) => Row::new(vec![
            Cell::from(v.name.clone()).style(Style::default().bold()),
            Cell::from(format!("{} GB", v.size)),
            Cell::from(v.server.map_or("-".to_string(), |id| id.to_string())),
            Cell::from(or_dash(v.location.as_ref().map(|l| l.name.as_str()))).style(dim),
            Cell::from(v.status.clone()),
        ]),
    }
}

/// Numbered action list over the resource table
pub(super) fn draw_context_menu(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(menu) = &state.context_menu else {
        return;
    };

    let name = state
        .cache
        .find(menu.kind, menu.resource_id)
        .map(|r| r.display_name())
        .unwrap_or_else(|| format!("{} {}", menu.kind.noun(), menu.resource_id));

    let items: Vec<ListItem> = menu
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let key = ContextMenu::shortcut_label(i)
                .map(|c| format!("{}.", c))
                .unwrap_or_default();
            let style = if i == menu.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<3}", key), Style::default().fg(Color::Yellow)),
                Span::raw(item.label.clone()),
            ]))
            .style(style)
        })
        .collect();

    let width = menu
        .items
        .iter()
        .map(|item| item.label.chars().count())
        .chain(std::iter::once(name.chars().count() + 4))
        .max()
        .unwrap_or(20) as u16
        + 8;
    let popup = centered_rect(width.max(30), menu.items.len() as u16 + 2, area);

    frame.render_widget(Clear, popup);
    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ", name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(list, popup);
}
