//! Usage reconciliation on top of resolved rows
//!
//! - Column roles from the header (explicit mapping, else substring guess)
//! - Date-substring filter on the created column
//! - Duration totals in seconds and minutes
//! - Date survey and first-match row mapping for inspecting unfamiliar exports

mod columns;
mod report;
mod survey;

pub use columns::{Binding, ColumnMap, ColumnRole};
pub use report::{parse_duration, summarize, DateFilter, SessionLine, UsageReport, DEFAULT_DATES};
pub use survey::{date_survey, first_match, MappedCell};
