use super::*;

pub(super) fn draw_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let title = match &state.session {
        Some(session) => format!(" lazyhcloud - {} ", session.label()),
        None => " lazyhcloud ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.session.is_none() || state.phase == Phase::Error {
        let subtitle = Paragraph::new(Span::styled(
            "Hetzner Cloud resource browser",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(subtitle, area);
        return;
    }

    let titles: Vec<Line> = ResourceKind::ALL
        .iter()
        .map(|kind| {
            let mut label = kind.label().to_string();
            if state.is_loading(*kind) {
                label.push('…');
            }
            if *kind == state.active_kind {
                Line::from(Span::styled(label, Style::default().fg(Color::White).bold()))
            } else {
                Line::from(Span::styled(label, Style::default().fg(Color::Gray)))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(block)
        .select(state.active_kind.index())
        .style(Style::default())
        .highlight_style(Style::default())
        .divider(" │ ");

    frame.render_widget(tabs, area);
}

/// Key help for the current phase
pub(super) fn footer_help(state: &AppState) -> &'static str {
    match state.phase {
        Phase::ProjectSelect => {
            if state.config.is_none() {
                "Loading configuration...  q: Quit"
            } else {
                "j/k: Navigate  Enter: Open  a: Add  t: Use token  d: Delete  s: Set default  q: Quit"
            }
        }
        Phase::ProjectManage => "Tab: Switch field  Enter: Next/Save  Esc: Cancel",
        Phase::TokenInput => "Enter: Connect  Esc: Back",
        Phase::ResourceView => {
            "Tab/h/l: Switch tab  j/k: Navigate  Enter: Actions  r: Reload  q: Back"
        }
        Phase::ContextMenu => "j/k: Navigate  Enter/1-9: Select  Esc/q: Close",
        Phase::SnapshotInput => "Enter: Create snapshot  Esc: Cancel",
        Phase::LabelView
        | Phase::ServerDetailView
        | Phase::NetworkSubnetView
        | Phase::FirewallRuleView
        | Phase::LoadBalancerTargetView
        | Phase::LoadBalancerServiceView => "j/k: Scroll  g: Top  Esc/q: Back",
        Phase::Error => "q/Esc: Quit",
    }
}

pub(super) fn draw_footer(frame: &mut Frame, state: &AppState, area: Rect) {
    let line = match &state.status {
        Some(status) => Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(status_color(status.level)),
        )),
        None => Line::from(Span::styled(
            footer_help(state),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
