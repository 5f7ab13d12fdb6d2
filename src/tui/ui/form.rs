//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Attribute, FieldKind, PatientRecord, RawValue};
use crate::tui::styles::MedicalTheme;

/// How a single field takes input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Index into a closed option list
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
    /// Typed numeric text
    Text(String),
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub attribute: Attribute,
    pub input: FieldInput,
}

impl FormField {
    fn new(attribute: Attribute) -> Self {
        let input = match attribute.kind() {
            FieldKind::Categorical { options } => FieldInput::Choice {
                options,
                selected: 0,
            },
            FieldKind::Numeric { .. } => FieldInput::Text(String::new()),
        };
        Self { attribute, input }
    }

    fn hint(&self) -> String {
        match self.attribute.kind() {
            FieldKind::Numeric { min, max, step } if step < 1.0 => {
                format!("{min:.1}-{max:.1}")
            }
            FieldKind::Numeric { min, max, .. } => format!("{min}-{max}"),
            FieldKind::Categorical { .. } => String::new(),
        }
    }

    /// Text shown for the current value.
    #[must_use]
    pub fn display(&self) -> &str {
        match &self.input {
            FieldInput::Choice { options, selected } => {
                options.get(*selected).copied().unwrap_or_default()
            }
            FieldInput::Text(text) => text.as_str(),
        }
    }

    fn set(&mut self, value: RawValue<'_>) {
        match (&mut self.input, value) {
            (FieldInput::Choice { options, selected }, RawValue::Label(label)) => {
                *selected = options.iter().position(|o| *o == label).unwrap_or(0);
            }
            (FieldInput::Text(text), RawValue::Number(v)) => {
                text.zeroize();
                *text = v.to_string();
            }
            _ => {}
        }
    }
}

/// Patient form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        let mut state = Self {
            fields: Attribute::ALL.into_iter().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        };
        state.load_record(&PatientRecord::default());
        state
    }
}

impl FormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the selected option of a categorical field. Wraps around.
    pub fn cycle_option(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        if let FieldInput::Choice { options, selected } = &mut field.input {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Add a character to the current numeric field. A decimal point is only
    /// taken by fractional fields.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let fractional = field.attribute.is_fractional();
        if let FieldInput::Text(text) = &mut field.input {
            if c.is_ascii_digit() || (c == '.' && fractional) {
                text.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Text(text) = &mut self.fields[self.selected_field].input {
            text.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let FieldInput::Text(text) = &mut self.fields[self.selected_field].input {
            text.zeroize();
        }
    }

    /// Wipe all typed buffers from memory.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            if let FieldInput::Text(text) = &mut field.input {
                text.zeroize();
            }
        }
        self.error_message = None;
    }

    /// Overwrite every field with the values of `record`.
    pub fn load_record(&mut self, record: &PatientRecord) {
        for field in &mut self.fields {
            field.set(record.value(field.attribute));
        }
        self.error_message = None;
    }

    /// Restore the form defaults.
    pub fn reset(&mut self) {
        self.clear_sensitive();
        self.load_record(&PatientRecord::default());
        self.selected_field = 0;
    }

    /// Load a sample elevated-risk record.
    pub fn load_sample_data(&mut self) {
        self.load_record(&PatientRecord::sample());
    }

    /// Parse the form into a record. Range checks happen at inference time,
    /// except for values too large for the record's integer fields.
    ///
    /// # Errors
    /// Returns a message naming the first field whose text is not a number
    /// of the expected kind, or does not fit the field at all.
    pub fn to_patient_record(&self) -> Result<PatientRecord, String> {
        let mut record = PatientRecord::default();

        for field in &self.fields {
            let text = field.display().trim();
            let label = field.attribute.label();
            let attribute = field.attribute;

            match attribute {
                Attribute::Age => record.age = parse_whole(attribute, text)?,
                Attribute::RestingBp => record.resting_bp = parse_whole(attribute, text)?,
                Attribute::Cholesterol => record.cholesterol = parse_whole(attribute, text)?,
                Attribute::MaxHeartRate => record.max_heart_rate = parse_whole(attribute, text)?,
                Attribute::MajorVessels => record.major_vessels = parse_whole(attribute, text)?,
                Attribute::Oldpeak => {
                    record.oldpeak = text
                        .parse()
                        .map_err(|_| format!("{label}: invalid number"))?;
                }
                Attribute::Sex => record.sex = text.to_string(),
                Attribute::ChestPain => record.chest_pain = text.to_string(),
                Attribute::FastingBloodSugar => record.fasting_blood_sugar = text.to_string(),
                Attribute::RestEcg => record.rest_ecg = text.to_string(),
                Attribute::ExerciseAngina => record.exercise_angina = text.to_string(),
                Attribute::Slope => record.slope = text.to_string(),
                Attribute::Thal => record.thal = text.to_string(),
            }
        }

        Ok(record)
    }
}

/// Parse an unsigned whole number. Digits that overflow `T` are reported as
/// out of range rather than malformed.
fn parse_whole<T: std::str::FromStr>(attribute: Attribute, text: &str) -> Result<T, String> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{}: expected a whole number", attribute.label()));
    }
    text.parse().map_err(|_| {
        let value = text.parse::<f64>().unwrap_or(f64::INFINITY);
        attribute.out_of_range_message(value)
    })
}

/// Render the patient data input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state, focused);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Heart Disease Prediction", MedicalTheme::title()),
        Span::styled(" │ Enter Patient Information", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState, focused: bool) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mid = state.fields.len().div_ceil(2);
    let selected = focused.then_some(state.selected_field);

    render_field_column(f, columns[0], &state.fields[..mid], 0, selected);
    render_field_column(f, columns[1], &state.fields[mid..], mid, selected);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: Option<usize>,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = selected == Some(offset + i);
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.attribute.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Choice { .. } => {
                if is_selected {
                    spans.push(Span::styled("◀ ", MedicalTheme::key_hint()));
                }
                spans.push(Span::styled(field.display(), MedicalTheme::text()));
                if is_selected {
                    spans.push(Span::styled(" ▶", MedicalTheme::key_hint()));
                }
            }
            FieldInput::Text(text) => {
                if text.is_empty() {
                    spans.push(Span::styled(field.hint(), MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(text.as_str(), MedicalTheme::text()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", MedicalTheme::cursor()));
                }
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.as_str(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Tab] ", MedicalTheme::key_hint()),
            Span::styled("Chat", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
