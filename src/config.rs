//! Run settings: optional YAML file merged with command-line flags
//!
//! ```yaml
//! dates: ["2025-12-11", "2025-12-12"]
//! columns:
//!   duration: "Billed Seconds"
//!   created: "Started At"
//! ```
//!
//! Flags win over the file; the file wins over built-in defaults.

use crate::error::{TallyError, TallyResult};
use crate::usage::{ColumnRole, DateFilter};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// On-disk config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub dates: Vec<String>,
    pub columns: BTreeMap<String, String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> TallyResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> TallyResult<Self> {
        // An empty file deserializes as unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Effective settings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub filter: DateFilter,
    pub columns: BTreeMap<ColumnRole, String>,
}

impl Settings {
    /// Merge config file (if any) with flag values.
    ///
    /// `column_flags` are `role=Header Text` pairs.
    pub fn build(
        config: Option<&Path>,
        date_flags: &[String],
        column_flags: &[String],
    ) -> TallyResult<Self> {
        let file = match config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let mut columns = BTreeMap::new();
        for (role, header) in &file.columns {
            columns.insert(role.parse::<ColumnRole>()?, header.clone());
        }
        for flag in column_flags {
            let (role, header) = parse_column_flag(flag)?;
            columns.insert(role, header);
        }

        let dates: Vec<String> = date_flags
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        let filter = if !dates.is_empty() {
            DateFilter::new(dates)
        } else if !file.dates.is_empty() {
            DateFilter::new(file.dates)
        } else {
            DateFilter::default()
        };

        Ok(Self { filter, columns })
    }
}

/// `duration=Billed Seconds` → (Duration, "Billed Seconds")
pub fn parse_column_flag(flag: &str) -> TallyResult<(ColumnRole, String)> {
    let (role, header) = flag.split_once('=').ok_or_else(|| {
        TallyError::Config(format!(
            "column mapping '{}' must look like ROLE=HEADER",
            flag
        ))
    })?;
    let header = header.trim();
    if header.is_empty() {
        return Err(TallyError::Config(format!(
            "column mapping '{}' has an empty header",
            flag
        )));
    }
    Ok((role.parse::<ColumnRole>()?, header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_column_flag() {
        let (role, header) = parse_column_flag("duration=Billed Seconds").unwrap();
        assert_eq!(role, ColumnRole::Duration);
        assert_eq!(header, "Billed Seconds");
        assert!(parse_column_flag("duration").is_err());
        assert!(parse_column_flag("duration=").is_err());
        assert!(parse_column_flag("size=Bytes").is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::build(None, &[], &[]).unwrap();
        assert_eq!(settings.filter, DateFilter::default());
        assert!(settings.columns.is_empty());
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "dates: [\"2026-01-02\"]\ncolumns:\n  duration: Seconds\n  created: Start"
        )
        .unwrap();

        let settings = Settings::build(Some(file.path()), &[], &[]).unwrap();
        assert_eq!(settings.filter.dates(), &["2026-01-02".to_string()]);
        assert_eq!(settings.columns[&ColumnRole::Duration], "Seconds");

        let flags = vec!["duration=Billed".to_string()];
        let dates = vec!["2026-02".to_string()];
        let settings = Settings::build(Some(file.path()), &dates, &flags).unwrap();
        assert_eq!(settings.filter.dates(), &["2026-02".to_string()]);
        assert_eq!(settings.columns[&ColumnRole::Duration], "Billed");
        assert_eq!(settings.columns[&ColumnRole::Created], "Start");
    }

    #[test]
    fn test_config_rejects_unknown_keys_and_roles() {
        assert!(ConfigFile::from_yaml("datez: []").is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "columns:\n  size: Bytes").unwrap();
        assert!(Settings::build(Some(file.path()), &[], &[]).is_err());
    }

    #[test]
    fn test_empty_config_file() {
        assert_eq!(ConfigFile::from_yaml("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = Settings::build(Some(Path::new("/nonexistent/tally.yaml")), &[], &[]);
        assert!(matches!(err, Err(TallyError::Io(_))));
    }
}
