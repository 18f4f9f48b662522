#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Admin reporting queries.
//!
//! Each public function in [`reports`] runs one aggregate query over the
//! live tables and returns typed rows from `rideway_analytics_models`.
//! Nothing here is materialized; every call reflects current table
//! state.

pub mod reports;

use thiserror::Error;

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
