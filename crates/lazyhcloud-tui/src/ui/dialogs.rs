use super::*;

/// Builder for modal dialogs with consistent styling
pub(super) struct DialogBuilder<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    width: u16,
    border_color: Color,
}

impl<'a> DialogBuilder<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            width: 50,
            border_color: Color::Yellow,
        }
    }

    pub fn width(mut self, w: u16) -> Self {
        self.width = w;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.lines.push(Line::from(text.into()));
        self
    }

    pub fn styled_message(mut self, line: Line<'a>) -> Self {
        self.lines.push(line);
        self
    }

    pub fn empty_line(mut self) -> Self {
        self.lines.push(Line::from(""));
        self
    }

    /// Dimmed key help at the bottom
    pub fn help(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
        self
    }

    /// Render centered in `area`
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let height = (self.lines.len() as u16) + 2;
        let dialog_area = centered_rect(self.width, height, area);

        frame.render_widget(Clear, dialog_area);

        let dialog = Paragraph::new(self.lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color)),
            );

        frame.render_widget(dialog, dialog_area);
    }
}

pub(super) fn draw_snapshot_prompt(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(form) = &state.snapshot_form else {
        return;
    };

    let value = form.description.display();
    let split = value
        .char_indices()
        .nth(form.description.cursor_column())
        .map_or(value.len(), |(i, _)| i);

    DialogBuilder::new("Create Snapshot")
        .width(60)
        .empty_line()
        .message(format!("Snapshot of {}", form.server_name))
        .empty_line()
        .styled_message(Line::from(vec![
            Span::styled("Description ", Style::default().fg(Color::Cyan).bold()),
            Span::raw(value[..split].to_string()),
            Span::styled("│", Style::default().fg(Color::Cyan)),
            Span::raw(value[split..].to_string()),
        ]))
        .empty_line()
        .help("Enter: Create  Esc: Cancel")
        .render(frame, area);
}

pub(super) fn draw_error(frame: &mut Frame, state: &AppState, area: Rect) {
    let message = state.error.as_deref().unwrap_or("Unknown error");

    // +4 for borders and padding
    let width = (message.chars().count() as u16 + 4).clamp(40, area.width.max(40));
    DialogBuilder::new("Error")
        .width(width)
        .border_color(Color::Red)
        .empty_line()
        .styled_message(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )))
        .empty_line()
        .help("Press q or Esc to quit")
        .render(frame, area);
}
