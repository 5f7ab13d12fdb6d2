//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Diagnosis, Explanation};
use crate::tui::styles::MedicalTheme;

/// Bar lengths are integers; weights are multiplied by this before rounding.
const BAR_RESOLUTION: f64 = 1000.0;

/// Outcome of the last submission
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Prediction succeeded
    Diagnosis(Diagnosis),
    /// Input was refused before reaching the model
    Rejected(String),
    /// Scaling, prediction or explanation failed
    Failed,
}

/// One horizontal bar: label, bar length and the signed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionBar {
    pub feature: String,
    pub length: u64,
    pub weight: f64,
}

/// Bars for the attribution chart, largest magnitude first.
#[must_use]
pub fn attribution_bars(explanation: &Explanation) -> Vec<AttributionBar> {
    explanation
        .ranked()
        .into_iter()
        .map(|a| AttributionBar {
            feature: a.feature.clone(),
            length: (a.weight.abs() * BAR_RESOLUTION).round() as u64,
            weight: a.weight,
        })
        .collect()
}

/// Render the result pane
pub fn render_result(f: &mut Frame, area: Rect, outcome: &Outcome) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    match outcome {
        Outcome::Diagnosis(diagnosis) => render_diagnosis(f, chunks[0], diagnosis),
        Outcome::Rejected(message) => {
            render_message(f, chunks[0], "Submission rejected", message);
        }
        Outcome::Failed => render_message(
            f,
            chunks[0],
            "Prediction failed",
            "The model could not process this record. Details were written to the log.",
        ),
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back to form ", MedicalTheme::key_desc()),
        Span::styled("[Tab] ", MedicalTheme::key_hint()),
        Span::styled("Chat", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, chunks[1]);
}

fn render_diagnosis(f: &mut Frame, area: Rect, diagnosis: &Diagnosis) {
    let block = Block::default()
        .title(Span::styled(" Prediction Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Verdict
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Attributions
        ])
        .margin(1)
        .split(inner);

    let verdict = Paragraph::new(vec![
        Line::from(Span::styled(
            diagnosis.verdict.message(),
            MedicalTheme::verdict(diagnosis.verdict),
        )),
        Line::from(Span::styled(
            diagnosis.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(verdict, chunks[0]);

    if let Some(p) = diagnosis.probability {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(" Disease Probability ", MedicalTheme::text_secondary()))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            )
            .gauge_style(MedicalTheme::probability(p))
            .ratio(p.clamp(0.0, 1.0))
            .label(format!("{:.1}%", p * 100.0));
        f.render_widget(gauge, chunks[1]);
    } else {
        let note = Paragraph::new(Line::from(Span::styled(
            "This model does not report probabilities.",
            MedicalTheme::text_muted(),
        )))
        .alignment(Alignment::Center);
        f.render_widget(note, chunks[1]);
    }

    let bars: Vec<Bar> = attribution_bars(&diagnosis.explanation)
        .into_iter()
        .map(|bar| {
            Bar::default()
                .label(Line::from(bar.feature))
                .value(bar.length)
                .text_value(format!("{:+.3}", bar.weight))
                .style(MedicalTheme::attribution(bar.weight))
                .value_style(MedicalTheme::text())
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Feature Attributions ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, chunks[2]);
}

fn render_message(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("! {title}"), MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureAttribution;

    #[test]
    fn test_bars_sorted_by_magnitude() {
        let explanation = Explanation {
            base_value: 0.0,
            attributions: [("age", 0.1), ("cp", -0.9), ("thal", 0.4)]
                .into_iter()
                .map(|(feature, weight)| FeatureAttribution {
                    feature: feature.to_string(),
                    value: 0.0,
                    weight,
                })
                .collect(),
        };

        let bars = attribution_bars(&explanation);
        let order: Vec<&str> = bars.iter().map(|b| b.feature.as_str()).collect();
        assert_eq!(order, ["cp", "thal", "age"]);
        assert_eq!(bars[0].length, 900);
        assert!(bars[0].weight < 0.0);
    }
}
