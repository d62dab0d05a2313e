//! Core library surface for the music catalog.
//!
//! `db` owns every SQL statement, `catalog` composes them into the multi-step
//! workflows and read views, and the two front-ends (`ui` for the interactive
//! terminal, `cli` for one-shot commands) only ever go through `catalog`.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Error type shared by the persistence and workflow layers.
pub use error::{CatalogError, Result};

/// The four catalog entities.
pub use models::{Album, Artist, Genre, Track};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
