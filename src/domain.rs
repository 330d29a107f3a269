//! Domain models for the environment editor.
//!
//! This module contains the row type, key validation, and configuration.

/// Rows and their identifiers.
pub mod row;
pub use row::{EnvironmentVariable, RowId};

/// Key validation rules.
pub mod key;
pub use key::{KeyError, validate_key};

mod config;
pub use config::Config;
