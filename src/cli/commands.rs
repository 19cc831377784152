use crate::config::Settings;
use crate::error::{TallyError, TallyResult};
use crate::types::{Resolution, Row};
use crate::usage::{self, Binding, ColumnMap, ColumnRole, UsageReport};
use crate::xlsx;
use clap::ValueEnum;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Output format for `dump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Cells joined with " | "
    Text,
    /// Every field quoted, one row per line
    Csv,
    /// Array of arrays
    Json,
}

/// Options shared by the commands that look at columns and dates
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub config: Option<PathBuf>,
    pub dates: Vec<String>,
    pub columns: Vec<String>,
    pub strict: bool,
}

impl ScanOptions {
    fn settings(&self) -> TallyResult<Settings> {
        Settings::build(self.config.as_deref(), &self.dates, &self.columns)
    }
}

/// Truncate to `width` characters, then left-align in `width`
fn cell(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Resolve the archive, report defects on stderr, and enforce `--strict`
fn load(file: &Path, strict: bool) -> TallyResult<Resolution> {
    let resolution = xlsx::resolve_path(file)?;

    if resolution.is_degraded() {
        let defects = resolution.defects();
        eprintln!(
            "{}",
            format!("⚠️  {} defect(s) while reading {}", defects.len(), file.display()).yellow()
        );
        for defect in defects.iter().take(10) {
            eprintln!("   - {}", defect);
        }
        if defects.len() > 10 {
            eprintln!("   ... and {} more", defects.len() - 10);
        }
        if strict {
            return Err(TallyError::Degraded(format!(
                "{} defect(s) in {}",
                defects.len(),
                file.display()
            )));
        }
    }

    Ok(resolution)
}

fn describe_columns(columns: &ColumnMap) -> String {
    ColumnRole::ALL
        .iter()
        .map(|role| match (columns.index(*role), columns.binding(*role)) {
            (Some(idx), Some(binding)) => format!("{}={} ({})", role, idx, binding),
            _ => format!("{}=-", role),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render rows in the requested format
pub fn render_rows(rows: &[Row], format: DumpFormat) -> TallyResult<String> {
    let out = match format {
        DumpFormat::Text => rows
            .iter()
            .map(|r| r.join(" | "))
            .collect::<Vec<_>>()
            .join("\n"),
        DumpFormat::Csv => rows
            .iter()
            .map(|r| r.iter().map(|v| csv_field(v)).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n"),
        DumpFormat::Json => serde_json::to_string_pretty(rows)?,
    };
    Ok(out)
}

/// Render the session table and totals
pub fn render_report(report: &UsageReport) -> String {
    let mut lines = vec![format!(
        "{} | {} | {} | {} | {:<10} | {}",
        cell("ID", 15),
        cell("Status", 10),
        cell("Created", 25),
        cell("Ended", 25),
        "Duration (s)",
        cell("Mins", 10)
    )];
    for s in &report.sessions {
        lines.push(format!(
            "{} | {} | {} | {} | {:<10.1} | {:<10.1}",
            cell(&s.id, 15),
            cell(&s.status, 10),
            cell(&s.created, 25),
            cell(&s.ended, 25),
            s.duration_secs,
            s.duration_mins()
        ));
    }
    lines.join("\n")
}

/// Execute the dump command
pub fn dump(file: PathBuf, format: DumpFormat, strict: bool) -> TallyResult<()> {
    let resolution = load(&file, strict)?;
    let out = render_rows(resolution.rows(), format)?;
    if !out.is_empty() {
        println!("{}", out);
    }
    Ok(())
}

/// Execute the usage command - filter by date and total durations
pub fn usage(file: PathBuf, opts: ScanOptions, json: bool, verbose: bool) -> TallyResult<()> {
    let settings = opts.settings()?;
    let resolution = load(&file, opts.strict)?;

    let header = resolution.header().cloned().unwrap_or_default();
    let columns = ColumnMap::resolve(&header, &settings.columns);
    let report = usage::summarize(resolution.data_rows(), &columns, &settings.filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🔥 Tally - Session Usage".bold().green());
    println!("   File:  {}", file.display());
    println!("   Dates: {}", settings.filter.dates().join(", "));
    println!();

    if verbose {
        println!("   Header:  {:?}", header);
    }
    println!("   Columns: {}", describe_columns(&columns));
    if columns.index(ColumnRole::Created).is_none() {
        println!(
            "{}",
            "⚠️  No created column found - nothing can match the date filter".yellow()
        );
    }
    if columns.binding(ColumnRole::Duration) == Some(Binding::Guessed) && verbose {
        println!(
            "{}",
            "   Duration column was guessed from header text; pass --column duration=HEADER to pin it".cyan()
        );
    }
    println!();

    println!("{}", "--- SESSIONS ---".bold().cyan());
    println!("{}", render_report(&report));
    println!();

    println!("{}", "--- SUMMARY ---".bold().cyan());
    println!("Sessions: {}", report.sessions.len());
    println!(
        "{}",
        format!("Total Duration: {:.1} seconds", report.total_secs).bold()
    );
    println!(
        "{}",
        format!("Total Duration: {:.1} minutes", report.total_mins()).bold()
    );

    Ok(())
}

/// Execute the inspect command - header, detected columns, sample rows, dates
pub fn inspect(file: PathBuf, opts: ScanOptions) -> TallyResult<()> {
    let settings = opts.settings()?;
    let resolution = load(&file, opts.strict)?;

    println!("{}", "🔍 Tally - Inspect".bold().green());
    println!("   File: {}", file.display());
    println!("   Rows: {}\n", resolution.rows().len());

    let Some(header) = resolution.header() else {
        println!("{}", "⚠️  Worksheet has no rows".yellow());
        return Ok(());
    };
    let columns = ColumnMap::resolve(header, &settings.columns);

    println!("{}", "📋 Header:".bold().cyan());
    for (idx, name) in header.iter().enumerate() {
        println!("   {} [{}]", idx, name);
    }
    println!();

    println!("{}", "🧭 Columns:".bold().cyan());
    for role in ColumnRole::ALL {
        match (columns.index(role), columns.binding(role)) {
            (Some(idx), Some(binding)) => println!("   {:<9} {} ({})", role.to_string(), idx, binding),
            _ => println!("   {:<9} not found", role.to_string()),
        }
    }
    println!();

    println!("{}", "--- FIRST 5 ROWS ---".bold().cyan());
    for row in resolution.data_rows().iter().take(5) {
        println!("   {:?}", row);
    }
    println!();

    println!("{}", "--- UNIQUE DATES FOUND ---".bold().cyan());
    match columns.index(ColumnRole::Created) {
        Some(idx) => {
            let dates = usage::date_survey(resolution.data_rows(), idx);
            println!("   {}", dates.join(", "));
        }
        None => println!("   (no created column)"),
    }

    Ok(())
}

/// Execute the map command - first matching row as index/header/value lines
pub fn map(file: PathBuf, opts: ScanOptions) -> TallyResult<()> {
    let settings = opts.settings()?;
    let resolution = load(&file, opts.strict)?;
    let header = resolution.header().cloned().unwrap_or_default();

    match usage::first_match(&header, resolution.data_rows(), &settings.filter) {
        Some(mapped) => {
            println!("{}", "--- MATCHED ROW MAPPING ---".bold().cyan());
            for c in mapped {
                println!("{} [{}]: {}", c.index, c.header, c.value);
            }
        }
        None => {
            println!(
                "{}",
                format!(
                    "No row contains any of: {}",
                    settings.filter.dates().join(", ")
                )
                .yellow()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
