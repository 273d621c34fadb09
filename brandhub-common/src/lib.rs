//! # BrandHub Common Library
//!
//! Shared code for the BrandHub services including:
//! - Error taxonomy used by every lifecycle operation
//! - Configuration loading (CLI → ENV → TOML → defaults)
//! - Database schema initialization and row models
//! - The ownership predicate guarding every mutation
//! - Timestamp and date normalization helpers

pub mod config;
pub mod db;
pub mod error;
pub mod ownership;
pub mod time;

pub use error::{Error, Result};
pub use ownership::{ensure_owner, Owned};
