//! Best-effort .xlsx cell value resolver
//!
//! Opens the archive, builds the shared string table, decodes the first
//! worksheet and resolves every cell to its displayed text:
//! - `t="s"` cells are looked up in the shared string table
//! - `t="inlineStr"` cells use their inline text
//! - everything else is the value node verbatim (absent → `""`)
//!
//! Problems inside the archive never abort the scan. They are collected as
//! [`Defect`]s on a [`Resolution::Degraded`], with placeholder values standing
//! in for what could not be resolved. Only failing to read the file or the
//! zip container is fatal.

mod shared_strings;
mod worksheet;

pub use shared_strings::parse_shared_strings;
pub use worksheet::{parse_cell_ref, parse_worksheet};

use crate::error::TallyResult;
use crate::types::{Cell, CellKind, Defect, Resolution, Row, SharedStringTable};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
pub const FIRST_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

/// Placeholder substituted for a shared-string reference that cannot be resolved
pub fn shared_string_placeholder(raw: &str) -> String {
    format!("STR#{}", raw)
}

/// Resolve the first worksheet of the archive at `path`
pub fn resolve_path<P: AsRef<Path>>(path: P) -> TallyResult<Resolution> {
    XlsxResolver::open(path)?.resolve()
}

/// Reader over one opened archive
pub struct XlsxResolver<R> {
    archive: ZipArchive<R>,
}

impl XlsxResolver<BufReader<File>> {
    /// Open an archive on disk. Missing files and non-zip input are fatal.
    pub fn open<P: AsRef<Path>>(path: P) -> TallyResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening archive");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxResolver<R> {
    pub fn from_reader(reader: R) -> TallyResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Names of all entries in the archive
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// The worksheet treated as "first": `sheet1.xml`, else the lowest-numbered sheet part
    pub fn first_sheet_part(&self) -> Option<String> {
        if self.archive.file_names().any(|name| name == FIRST_SHEET_PART) {
            return Some(FIRST_SHEET_PART.to_string());
        }
        // Ties like sheet2.xml / sheet02.xml break on name, not archive order
        self.archive
            .file_names()
            .filter_map(|name| sheet_number(name).map(|n| (n, name)))
            .min()
            .map(|(_, name)| name.to_string())
    }

    /// Build the shared string table, recording why it is empty or partial
    pub fn shared_strings(&mut self) -> TallyResult<(SharedStringTable, Vec<Defect>)> {
        let Some(xml) = self.read_entry(SHARED_STRINGS_PART)? else {
            return Ok((SharedStringTable::default(), vec![Defect::MissingSharedStrings]));
        };

        let (table, err) = parse_shared_strings(&xml);
        debug!(entries = table.len(), "shared strings loaded");
        let defects = err
            .map(|message| Defect::MalformedPart {
                part: SHARED_STRINGS_PART.to_string(),
                message,
            })
            .into_iter()
            .collect();
        Ok((table, defects))
    }

    /// Decode the first worksheet into rows of displayed values
    pub fn resolve(&mut self) -> TallyResult<Resolution> {
        let (table, mut defects) = self.shared_strings()?;

        let sheet = match self.first_sheet_part() {
            Some(part) => self.read_entry(&part)?.map(|xml| (part, xml)),
            None => None,
        };
        let Some((part, xml)) = sheet else {
            defects.push(Defect::MissingWorksheet);
            log_defects(&defects);
            return Ok(Resolution::from_parts(Vec::new(), defects));
        };

        let (cell_rows, err) = parse_worksheet(&xml);
        if let Some(message) = err {
            defects.push(Defect::MalformedPart {
                part: part.clone(),
                message,
            });
        }

        let rows: Vec<Row> = cell_rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| match resolve_cell(cell, &table) {
                        Ok(value) => value,
                        Err((placeholder, defect)) => {
                            defects.push(defect);
                            placeholder
                        }
                    })
                    .collect()
            })
            .collect();

        debug!(part = %part, rows = rows.len(), "worksheet resolved");
        log_defects(&defects);
        Ok(Resolution::from_parts(rows, defects))
    }

    fn read_entry(&mut self, name: &str) -> TallyResult<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::with_capacity(initial_capacity(entry.size()));
        entry.read_to_end(&mut buf)?;
        debug!(entry = name, bytes = buf.len(), "read archive entry");
        Ok(Some(buf))
    }
}

/// Resolve one cell to its displayed value.
///
/// An unusable shared-string reference yields `Err` carrying the placeholder
/// to display and the defect to record.
pub fn resolve_cell(
    cell: &Cell,
    table: &SharedStringTable,
) -> Result<String, (String, Defect)> {
    let raw = cell.raw.as_deref().unwrap_or_default();
    match cell.kind {
        CellKind::SharedString if cell.raw.is_none() => Ok(String::new()),
        CellKind::SharedString => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| table.get(index))
            .map(str::to_string)
            .ok_or_else(|| {
                (
                    shared_string_placeholder(raw),
                    Defect::BadSharedStringIndex {
                        row: cell.row,
                        col: cell.col,
                        raw: raw.to_string(),
                        table_len: table.len(),
                    },
                )
            }),
        CellKind::InlineString | CellKind::Literal => Ok(raw.to_string()),
    }
}

/// `xl/worksheets/sheet12.xml` → 12
fn sheet_number(name: &str) -> Option<u32> {
    name.strip_prefix("xl/worksheets/sheet")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Declared entry sizes come from the archive and are not trusted
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}

/// Message for a part that ended with elements still open
fn unexpected_end(open: &[Vec<u8>]) -> Option<String> {
    open.last().map(|name| {
        format!(
            "unexpected end of part inside <{}>",
            String::from_utf8_lossy(name)
        )
    })
}

fn log_defects(defects: &[Defect]) {
    for defect in defects {
        warn!("{}", defect);
    }
}
