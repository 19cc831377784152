use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xlsx_tally::cli::{self, DumpFormat, ScanOptions};
use xlsx_tally::error::TallyResult;
use xlsx_tally::logging;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Decode .xlsx exports cell by cell and reconcile session durations.")]
#[command(long_about = "Tally - best-effort .xlsx reader for usage reconciliation

Reads the first worksheet of an .xlsx export straight from the archive,
resolves shared strings, and keeps going when the file is damaged:
unresolvable cells become placeholders like STR#42 and are reported.

COMMANDS:
  dump     - Print every row (text, csv or json)
  usage    - Filter rows by created date and total the duration column
  inspect  - Show header, detected columns, sample rows and dates present
  map      - Show the first matching row as index [header]: value

EXAMPLES:
  tally dump sessions.xlsx --format csv
  tally usage sessions.xlsx                              # 2025-12-11 and 2025-12-12
  tally usage sessions.xlsx -d 2026-01-05 -c duration=\"Billed Seconds\"
  tally inspect sessions.xlsx

LOGGING:
  Diagnostics go to stderr. Set RUST_LOG=xlsx_tally=debug or pass -v.")]
#[command(version)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanArgs {
    /// Path to the .xlsx file
    file: PathBuf,

    /// Date substring to match in the created column (repeatable or comma separated)
    #[arg(short, long = "date", env = "TALLY_DATES", value_delimiter = ',')]
    dates: Vec<String>,

    /// Pin a column role to an exact header: ROLE=HEADER (roles: created, duration, ended, status, name)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// YAML config file with `dates` and `columns`
    #[arg(long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Fail instead of printing degraded output
    #[arg(long)]
    strict: bool,
}

impl From<ScanArgs> for ScanOptions {
    fn from(args: ScanArgs) -> Self {
        ScanOptions {
            config: args.config,
            dates: args.dates,
            columns: args.columns,
            strict: args.strict,
        }
    }
}

/// Like [`ScanArgs`] without date filters; inspect shows every date present
#[derive(Args)]
struct InspectArgs {
    /// Path to the .xlsx file
    file: PathBuf,

    /// Pin a column role to an exact header: ROLE=HEADER (roles: created, duration, ended, status, name)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// YAML config file with `columns`
    #[arg(long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Fail instead of printing degraded output
    #[arg(long)]
    strict: bool,
}

impl From<InspectArgs> for ScanOptions {
    fn from(args: InspectArgs) -> Self {
        ScanOptions {
            config: args.config,
            dates: Vec::new(),
            columns: args.columns,
            strict: args.strict,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every row of the first worksheet
    Dump {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: DumpFormat,

        /// Fail instead of printing degraded output
        #[arg(long)]
        strict: bool,
    },

    #[command(long_about = "Total session durations for rows created on the given dates.

A row is included when its created column contains any --date substring.
Columns are found by header text: 'created', 'duration', 'ended', 'status'
and 'name' are matched case-insensitively as substrings, last match wins.
Use --column ROLE=HEADER to pin a role to an exact header instead.

Durations that are empty or not numbers count as 0.

EXAMPLES:
  tally usage sessions.xlsx
  tally usage sessions.xlsx -d 2025-12-11 -d 2025-12-12
  tally usage sessions.xlsx -c created=\"Start Time\" --json")]
    /// Filter rows by date and total the duration column
    Usage {
        #[command(flatten)]
        scan: ScanArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show header, detected columns, first rows and dates present
    Inspect {
        #[command(flatten)]
        args: InspectArgs,
    },

    /// Show the first row containing a target date, cell by cell
    Map {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

fn main() -> TallyResult<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Dump {
            file,
            format,
            strict,
        } => cli::dump(file, format, strict),

        Commands::Usage { scan, json } => {
            cli::usage(scan.file.clone(), scan.into(), json, cli.verbose)
        }

        Commands::Inspect { args } => cli::inspect(args.file.clone(), args.into()),

        Commands::Map { scan } => cli::map(scan.file.clone(), scan.into()),
    }
}
