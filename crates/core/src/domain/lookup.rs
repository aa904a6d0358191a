// Layered lookup result
//
// Distinguishes "ancestor missing" from "entity missing" so that a Get below a
// parent can report the right error code.

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    ParentMissing,
    Missing,
    Found(T),
}

impl<T> Lookup<T> {
    /// Collapse into a Result, building the error for each missing layer lazily
    pub fn into_result(
        self,
        parent_missing: impl FnOnce() -> StoreError,
        missing: impl FnOnce() -> StoreError,
    ) -> Result<T> {
        match self {
            Lookup::ParentMissing => Err(parent_missing()),
            Lookup::Missing => Err(missing()),
            Lookup::Found(value) => Ok(value),
        }
    }
}
