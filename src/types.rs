use std::fmt;

//==============================================================================
// Cells
//==============================================================================

/// How a cell's payload is turned into its displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// `t="s"` - payload is an index into the shared string table
    SharedString,
    /// `t="inlineStr"` - text lives inside the cell's `<is>` element
    InlineString,
    /// Anything else (numbers, booleans, formula strings, untyped)
    Literal,
}

impl CellKind {
    /// Map the `t` attribute of a `<c>` element to a kind
    pub fn from_type_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            _ => CellKind::Literal,
        }
    }
}

/// A single decoded `<c>` element, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Zero-based row
    pub row: u32,
    /// Zero-based column
    pub col: u32,
    /// Text of the value node; `None` when the cell has no value
    pub raw: Option<String>,
    pub kind: CellKind,
}

/// Resolved cell values in document order. Never padded.
pub type Row = Vec<String>;

//==============================================================================
// Shared String Table
//==============================================================================

/// Positional pool of strings referenced by `t="s"` cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStringTable {
    strings: Vec<String>,
}

impl SharedStringTable {
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

//==============================================================================
// Defects and Resolution
//==============================================================================

/// A recoverable problem found while resolving an archive.
/// The affected value was replaced by a placeholder (or skipped) and the scan went on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// No `xl/sharedStrings.xml`; the table is treated as empty
    MissingSharedStrings,
    /// No worksheet part in the archive; zero rows produced
    MissingWorksheet,
    /// A `t="s"` cell whose payload is not a valid table index
    BadSharedStringIndex {
        row: u32,
        col: u32,
        raw: String,
        table_len: usize,
    },
    /// Markup error inside a part; everything decoded before it is kept
    MalformedPart { part: String, message: String },
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::MissingSharedStrings => write!(f, "shared strings part missing"),
            Defect::MissingWorksheet => write!(f, "no worksheet found in archive"),
            Defect::BadSharedStringIndex {
                row,
                col,
                raw,
                table_len,
            } => write!(
                f,
                "shared string index '{}' at row {}, column {} not in table of {} entries",
                raw,
                row + 1,
                col + 1,
                table_len
            ),
            Defect::MalformedPart { part, message } => {
                write!(f, "malformed {}: {}", part, message)
            }
        }
    }
}

/// Outcome of resolving an archive that could be opened at all.
/// Fatal failures are `Err(TallyError)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every cell resolved from the archive as written
    Clean(Vec<Row>),
    /// Rows are usable but some values are placeholders or parts were missing
    Degraded { rows: Vec<Row>, defects: Vec<Defect> },
}

impl Resolution {
    pub fn from_parts(rows: Vec<Row>, defects: Vec<Defect>) -> Self {
        if defects.is_empty() {
            Resolution::Clean(rows)
        } else {
            Resolution::Degraded { rows, defects }
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Resolution::Clean(rows) => rows,
            Resolution::Degraded { rows, .. } => rows,
        }
    }

    pub fn defects(&self) -> &[Defect] {
        match self {
            Resolution::Clean(_) => &[],
            Resolution::Degraded { defects, .. } => defects,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded { .. })
    }

    /// First row, if any
    pub fn header(&self) -> Option<&Row> {
        self.rows().first()
    }

    /// All rows after the header
    pub fn data_rows(&self) -> &[Row] {
        self.rows().get(1..).unwrap_or(&[])
    }
}
