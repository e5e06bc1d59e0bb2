//! Export functionality.
//!
//! This module dumps the SQLite store into flat CSV files, one per table.

mod csv;

pub use csv::{export_csv, ExportSummary};
