//! Row ownership predicate
//!
//! Every mutating lifecycle operation checks ownership explicitly against the
//! loaded row instead of trusting any row-level security in the store.

use uuid::Uuid;

use crate::{Error, Result};

/// A persisted row that belongs to exactly one user
pub trait Owned {
    /// Id of the owning user
    fn owner_id(&self) -> Uuid;

    /// Human-readable kind used in error messages ("brand", "asset", ...)
    fn kind(&self) -> &'static str;
}

/// True when `row` belongs to `caller`
pub fn is_owned_by<R: Owned + ?Sized>(row: &R, caller: Uuid) -> bool {
    row.owner_id() == caller
}

/// Fail with [`Error::Authorization`] unless `row` belongs to `caller`
pub fn ensure_owner<R: Owned + ?Sized>(row: &R, caller: Uuid) -> Result<()> {
    if is_owned_by(row, caller) {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "this {} does not belong to you",
            row.kind()
        )))
    }
}
