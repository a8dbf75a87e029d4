//! Ratatui front-end: one table screen plus modal popups for the editor,
//! delete confirmation, filter bar and alerts.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
