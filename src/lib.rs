//! Core library surface for the Customer Manager TUI application.
//!
//! The `bin` target only wires these pieces together: load the config, start
//! logging, connect the store, and hand it to the UI.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod table;
pub mod ui;

pub use config::Config;

/// The store seam and its SQLite implementation.
pub use db::{CustomerStore, SqliteStore, StoreError};

/// Domain types passed between the store and the UI.
pub use models::{Column, Customer, CustomerFields};

pub use table::{CustomerTable, DataOrigin, SortOrder, TableView};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
