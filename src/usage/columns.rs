//! Column role detection over a header row

use crate::error::{TallyError, TallyResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What a column means to the usage pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    Created,
    Duration,
    Ended,
    Status,
    Name,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Created,
        ColumnRole::Duration,
        ColumnRole::Ended,
        ColumnRole::Status,
        ColumnRole::Name,
    ];

    /// Lowercase substring looked for in header text
    pub fn key(self) -> &'static str {
        match self {
            ColumnRole::Created => "created",
            ColumnRole::Duration => "duration",
            ColumnRole::Ended => "ended",
            ColumnRole::Status => "status",
            ColumnRole::Name => "name",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColumnRole {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        let wanted = s.trim().to_lowercase();
        ColumnRole::ALL
            .into_iter()
            .find(|role| role.key() == wanted)
            .ok_or_else(|| {
                TallyError::Config(format!(
                    "unknown column role '{}' (expected one of: created, duration, ended, status, name)",
                    s
                ))
            })
    }
}

/// How a column index was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Header named by the caller
    Explicit,
    /// Substring heuristic on header text
    Guessed,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Explicit => f.write_str("explicit"),
            Binding::Guessed => f.write_str("guessed"),
        }
    }
}

/// Resolved column index per role. Missing roles are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<ColumnRole, (usize, Binding)>,
}

impl ColumnMap {
    /// Guess every role by case-insensitive substring match on the header.
    /// When several headers contain the key the last one wins.
    pub fn detect(header: &[String]) -> Self {
        Self::resolve(header, &BTreeMap::new())
    }

    /// Bind roles from `explicit` (role → exact header text, case-insensitive),
    /// then guess the remaining roles.
    ///
    /// An explicit header that is not present leaves its role unbound rather
    /// than falling back to a guess.
    pub fn resolve(header: &[String], explicit: &BTreeMap<ColumnRole, String>) -> Self {
        let lowered: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut columns = BTreeMap::new();

        for role in ColumnRole::ALL {
            if let Some(wanted) = explicit.get(&role) {
                let wanted = wanted.trim().to_lowercase();
                if let Some(idx) = lowered.iter().position(|h| *h == wanted) {
                    columns.insert(role, (idx, Binding::Explicit));
                }
                continue;
            }
            if let Some(idx) = lowered.iter().rposition(|h| h.contains(role.key())) {
                columns.insert(role, (idx, Binding::Guessed));
            }
        }

        Self { columns }
    }

    pub fn index(&self, role: ColumnRole) -> Option<usize> {
        self.columns.get(&role).map(|(idx, _)| *idx)
    }

    pub fn binding(&self, role: ColumnRole) -> Option<Binding> {
        self.columns.get(&role).map(|(_, b)| *b)
    }

    /// Value of `role`'s column in `row`, if both exist
    pub fn value<'r>(&self, row: &'r [String], role: ColumnRole) -> Option<&'r str> {
        self.index(role)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }
}
