//! Help chat side panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::ChatLog;
use crate::tui::styles::MedicalTheme;

fn history_paragraph(history: &ChatLog) -> Paragraph<'_> {
    let mut lines = Vec::with_capacity(history.len() * 3);
    for entry in history.iter() {
        lines.push(Line::from(vec![
            Span::styled("You: ", MedicalTheme::key_hint()),
            Span::styled(entry.question.as_str(), MedicalTheme::text()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Bot: ", MedicalTheme::subtitle()),
            Span::styled(entry.answer.as_str(), MedicalTheme::text_secondary()),
        ]));
        lines.push(Line::from(""));
    }
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Rows to scroll so the last wrapped row of the history sits at the bottom
/// of a bordered `area`.
fn history_scroll(history: &ChatLog, area: Rect) -> u16 {
    let width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2);
    let rows = history_paragraph(history).line_count(width);
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(visible)
}

/// Render the chat history with the input line underneath.
pub fn render_chat(f: &mut Frame, area: Rect, history: &ChatLog, input: &str, focused: bool) {
    let border_style = if focused {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    // Keep the newest exchange in view.
    let scroll = history_scroll(history, chunks[0]);
    let history_view = history_paragraph(history).scroll((scroll, 0)).block(
        Block::default()
            .title(Span::styled(" Ask the Assistant ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(history_view, chunks[0]);

    let mut input_spans = vec![Span::raw(" "), Span::styled(input, MedicalTheme::text())];
    if focused {
        input_spans.push(Span::styled("▌", MedicalTheme::cursor()));
    } else if input.is_empty() {
        input_spans.push(Span::styled(
            "Ask a question about the inputs",
            MedicalTheme::text_muted(),
        ));
    }

    let input_view = Paragraph::new(Line::from(input_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(input_view, chunks[1]);
}
