//! Main TUI application state machine.
//!
//! Handles:
//! - Focus switching between the form and the chat panel
//! - Input event handling
//! - Running one synchronous prediction per submission

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use zeroize::Zeroize;

use crate::adapters::artifacts::load_artifacts;
use crate::application::{ChatAssistant, InferenceService};
use crate::config::AppConfig;
use crate::CardioError;

use super::ui::{
    chat::render_chat,
    form::{render_form, FormState},
    render_disclaimer,
    result::{render_result, Outcome},
};

/// What the left pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Which pane receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Chat,
}

/// Main application state
pub struct App {
    screen: Screen,
    focus: Focus,
    should_quit: bool,
    inference_service: InferenceService,
    assistant: ChatAssistant,
    form_state: FormState,
    chat_input: String,
    outcome: Option<Outcome>,
}

impl App {
    /// Load artifacts from the configured directory and build the app.
    ///
    /// # Errors
    /// Returns error if any artifact is missing, malformed or fails its
    /// integrity check. The app never starts half-loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let artifacts = load_artifacts(&config.artifact_dir, config.load_options())
            .with_context(|| {
                format!(
                    "Failed to load artifacts from {}. Set CARDIOSENSE_ARTIFACT_DIR to a directory containing best_model.json, scaler.json and label_encoders.json.",
                    config.artifact_dir.display()
                )
            })?;

        Ok(Self::with_dependencies(
            InferenceService::from_artifacts(artifacts),
            ChatAssistant::with_capacity(config.chat_capacity),
        ))
    }

    /// Create application with injected dependencies.
    #[must_use]
    pub fn with_dependencies(inference_service: InferenceService, assistant: ChatAssistant) -> Self {
        Self {
            screen: Screen::Form,
            focus: Focus::Form,
            should_quit: false,
            inference_service,
            assistant,
            form_state: FormState::default(),
            chat_input: String::new(),
            outcome: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.form_state.clear_sensitive();
        self.chat_input.zeroize();

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                let panes = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(rows[0]);

                match (self.screen, &self.outcome) {
                    (Screen::Result, Some(outcome)) => render_result(f, panes[0], outcome),
                    _ => render_form(f, panes[0], &self.form_state, self.focus == Focus::Form),
                }

                render_chat(
                    f,
                    panes[1],
                    self.assistant.history(),
                    &self.chat_input,
                    self.focus == Focus::Chat,
                );

                render_disclaimer(f, rows[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if key == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Form => Focus::Chat,
                Focus::Chat => Focus::Form,
            };
            return;
        }

        match (self.focus, self.screen) {
            (Focus::Chat, _) => self.handle_chat_key(key),
            (Focus::Form, Screen::Form) => self.handle_form_key(key),
            (Focus::Form, Screen::Result) => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.form_state.prev_field(),
            KeyCode::Down => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_option(false),
            KeyCode::Right => self.form_state.cycle_option(true),
            KeyCode::Char('s' | 'S') => self.form_state.load_sample_data(),
            KeyCode::Char('r' | 'R') => self.form_state.reset(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc) {
            self.screen = Screen::Form;
        }
    }

    fn handle_chat_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.chat_input.push(c),
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Esc => self.chat_input.zeroize(),
            KeyCode::Enter => {
                let question = std::mem::take(&mut self.chat_input);
                self.assistant.ask(&question);
            }
            _ => {}
        }
    }

    /// Run one prediction cycle on the current form contents.
    fn submit_form(&mut self) {
        let record = match self.form_state.to_patient_record() {
            Ok(record) => record,
            Err(message) => {
                self.form_state.error_message = Some(message);
                return;
            }
        };

        let outcome = match self.inference_service.run_inference(&record) {
            Ok(diagnosis) => Outcome::Diagnosis(diagnosis),
            Err(e) => {
                if e.is_rejection() {
                    tracing::warn!("Submission rejected: {}", e);
                } else {
                    tracing::error!("Prediction failed: {}", e);
                }
                Outcome::from(&e)
            }
        };

        self.outcome = Some(outcome);
        self.screen = Screen::Result;
    }
}

impl From<&CardioError> for Outcome {
    fn from(e: &CardioError) -> Self {
        if e.is_rejection() {
            Self::Rejected(e.to_string())
        } else {
            Self::Failed
        }
    }
}
