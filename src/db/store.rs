use crate::models::{Customer, CustomerFields};

use super::StoreError;

/// Data-access seam used by the UI. The SQLite implementation is the only one
/// shipped; tests substitute their own to force failures.
pub trait CustomerStore {
    /// Whether a live connection is held.
    fn is_connected(&self) -> bool;

    /// Every row in whatever order the database returns them. A disconnected
    /// store yields an empty list rather than an error.
    fn list(&self) -> Result<Vec<Customer>, StoreError>;

    /// Insert a new row and return the id the database assigned.
    fn insert(&self, fields: &CustomerFields) -> Result<i64, StoreError>;

    /// Overwrite all editable columns of `id` and stamp `date_updated`.
    fn update(&self, id: i64, fields: &CustomerFields) -> Result<(), StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Release the connection. Safe to call repeatedly.
    fn disconnect(&mut self);
}
