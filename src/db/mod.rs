//! Persistence module split across logical submodules.

mod connection;
mod customers;
mod error;
mod store;

pub use connection::{ensure_schema, SqliteStore};
pub use error::StoreError;
pub use store::CustomerStore;
