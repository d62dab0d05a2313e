//! Ratatui front-end: tabbed listings, the grouped collection view, and the
//! modal forms and pickers that drive the catalog workflows.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
