//! Date-filtered duration totals

use super::columns::{ColumnMap, ColumnRole};
use crate::types::Row;
use serde::Serialize;
use tracing::{debug, warn};

/// Substrings matched against the created column by default
pub const DEFAULT_DATES: [&str; 2] = ["2025-12-11", "2025-12-12"];

/// Which rows take part in the total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    dates: Vec<String>,
}

impl Default for DateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DATES.iter().map(|d| d.to_string()).collect())
    }
}

impl DateFilter {
    pub fn new(dates: Vec<String>) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// True if `text` contains any configured date substring
    pub fn matches(&self, text: &str) -> bool {
        self.dates.iter().any(|d| text.contains(d.as_str()))
    }
}

/// Parse a duration cell. Anything that is not a finite number counts as zero.
pub fn parse_duration(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// One included row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLine {
    pub id: String,
    pub status: String,
    pub created: String,
    pub ended: String,
    pub name: String,
    pub duration_secs: f64,
}

impl SessionLine {
    pub fn duration_mins(&self) -> f64 {
        self.duration_secs / 60.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageReport {
    pub sessions: Vec<SessionLine>,
    pub total_secs: f64,
}

impl UsageReport {
    pub fn total_mins(&self) -> f64 {
        self.total_secs / 60.0
    }
}

/// Walk `data_rows`, keep those whose created column matches `filter`,
/// and total their durations.
pub fn summarize(data_rows: &[Row], columns: &ColumnMap, filter: &DateFilter) -> UsageReport {
    let Some(created_idx) = columns.index(ColumnRole::Created) else {
        warn!("no created column found; no rows can match the date filter");
        return UsageReport::default();
    };

    let mut report = UsageReport::default();
    for row in data_rows {
        let Some(created) = row.get(created_idx) else {
            continue;
        };
        if !filter.matches(created) {
            continue;
        }

        let duration_secs = columns
            .value(row, ColumnRole::Duration)
            .map(parse_duration)
            .unwrap_or(0.0);
        let field = |role| columns.value(row, role).unwrap_or("?").to_string();

        report.total_secs += duration_secs;
        report.sessions.push(SessionLine {
            id: row.first().cloned().unwrap_or_default(),
            status: field(ColumnRole::Status),
            created: created.clone(),
            ended: field(ColumnRole::Ended),
            name: field(ColumnRole::Name),
            duration_secs,
        });
    }

    debug!(
        sessions = report.sessions.len(),
        total_secs = report.total_secs,
        "usage summarized"
    );
    report
}
