//! UI module: View components for the TUI.

pub mod chat;
pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub const DISCLAIMER: &str = "This is a predictive tool. Always consult a doctor for medical advice.";

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(Line::from(Span::styled(DISCLAIMER, MedicalTheme::text_muted())))
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
