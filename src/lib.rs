//! Tally - best-effort .xlsx cell resolver for usage reconciliation
//!
//! Reads the first worksheet of a spreadsheet export directly from its zip
//! archive, resolves every cell to its displayed text, and totals a duration
//! column over rows whose created date matches.
//!
//! # Features
//!
//! - Shared-string, inline-string and literal cells
//! - Damaged input degrades instead of failing: placeholders plus a list of defects
//! - Column roles by explicit header mapping or case-insensitive header guess
//! - Date-substring filtering and duration totals in seconds and minutes
//!
//! # Example
//!
//! ```no_run
//! use xlsx_tally::usage::{summarize, ColumnMap, DateFilter};
//! use xlsx_tally::xlsx::resolve_path;
//!
//! let resolution = resolve_path("sessions.xlsx")?;
//! for defect in resolution.defects() {
//!     eprintln!("degraded: {}", defect);
//! }
//!
//! let header = resolution.header().cloned().unwrap_or_default();
//! let columns = ColumnMap::detect(&header);
//! let report = summarize(resolution.data_rows(), &columns, &DateFilter::default());
//!
//! println!("Total: {:.1} minutes", report.total_mins());
//! # Ok::<(), xlsx_tally::error::TallyError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod usage;
pub mod xlsx;

// Re-export commonly used types
pub use error::{TallyError, TallyResult};
pub use types::{Cell, CellKind, Defect, Resolution, Row, SharedStringTable};
