//! TUI module: Terminal User Interface using Ratatui.
//!
//! One page: the patient form (or the last result) on the left and the help
//! chat on the right.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
