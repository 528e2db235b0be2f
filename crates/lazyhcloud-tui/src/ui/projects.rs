use super::*;
use lazyhcloud_core::{FormField, TextInput};

pub(super) fn draw_projects(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title(" Projects ").borders(Borders::ALL);

    let Some(config) = &state.config else {
        let loading = Paragraph::new("Loading configuration...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(loading, area);
        return;
    };

    if config.projects.is_empty() {
        let empty = Paragraph::new(
            "No projects configured.\n\n\
             Press 'a' to add a project or 't' to connect with a one-off token.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = config
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let selected = i == state.project_cursor;
            let marker = if selected { "▶ " } else { "  " };
            let mut spans = vec![
                Span::raw(marker),
                Span::styled(project.name.clone(), Style::default().bold()),
            ];
            if config.is_default(&project.name) {
                spans.push(Span::styled(
                    " (default)",
                    Style::default().fg(Color::Yellow),
                ));
            }
            let style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One labelled input row, with a cursor when focused
fn input_line<'a>(label: &'a str, input: &TextInput, focused: bool) -> Line<'a> {
    let value = input.display();
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![Span::styled(format!("{:<7}", label), label_style)];
    if focused {
        let split = value
            .char_indices()
            .nth(input.cursor_column())
            .map_or(value.len(), |(i, _)| i);
        spans.push(Span::raw(value[..split].to_string()));
        spans.push(Span::styled("│", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(value[split..].to_string()));
    } else {
        spans.push(Span::raw(value));
    }
    Line::from(spans)
}

fn draw_form(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>, help: &str) {
    let mut text = vec![Line::from("")];
    text.extend(lines);
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        help.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup = centered_rect(60, text.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    let form = Paragraph::new(text).block(
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(form, popup);
}

pub(super) fn draw_project_form(frame: &mut Frame, state: &AppState, area: Rect) {
    let form = &state.project_form;
    draw_form(
        frame,
        area,
        "Add Project",
        vec![
            input_line("Name", &form.name, form.focus == FormField::Name),
            input_line("Token", &form.token, form.focus == FormField::Token),
        ],
        "Tab: Switch field  Enter: Save  Esc: Cancel",
    );
}

pub(super) fn draw_token_input(frame: &mut Frame, state: &AppState, area: Rect) {
    draw_form(
        frame,
        area,
        "API Token",
        vec![
            Line::from("Connect without saving a project."),
            Line::from(""),
            input_line("Token", &state.token_input, true),
        ],
        "Enter: Connect  Esc: Back",
    );
}
