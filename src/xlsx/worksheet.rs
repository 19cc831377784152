//! Worksheet part → rows of undecoded [`Cell`]s

use super::unexpected_end;
use crate::types::{Cell, CellKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse the `<sheetData>` of a worksheet part into rows of cells, in document order.
///
/// Cells keep their raw payload; shared-string lookup happens in the resolver.
/// Rows with no `<c>` children still produce an (empty) row.
/// On a markup error the rows completed so far are returned together with the
/// error message. A part that ends with elements still open is an error too; the
/// row it was in the middle of is kept.
pub fn parse_worksheet(xml: &[u8]) -> (Vec<Vec<Cell>>, Option<String>) {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut state = SheetState::default();
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => return (rows, Some(e.to_string())),
        };
        match &event {
            Event::Start(e) => open.push(e.local_name().as_ref().to_vec()),
            Event::End(_) => {
                open.pop();
            }
            _ => {}
        }
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => state.start_row(&e, rows.len()),
                b"c" if state.in_row => state.start_cell(&e),
                b"v" if state.cell.is_some() => {
                    state.in_v = true;
                    state.value.clear();
                    state.has_value = true;
                }
                b"is" if state.cell.is_some() => {
                    state.in_is = true;
                    state.value.clear();
                    state.has_value = true;
                }
                b"rPh" if state.in_is => state.phonetic_depth += 1,
                b"t" if state.in_is && state.phonetic_depth == 0 => state.in_t = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    state.start_row(&e, rows.len());
                    rows.push(state.finish_row());
                }
                b"c" if state.in_row => {
                    state.start_cell(&e);
                    state.finish_cell();
                }
                // <v/> is an explicit empty value
                b"v" if state.cell.is_some() => state.has_value = true,
                _ => {}
            },
            Event::Text(e) if state.collecting() => match e.unescape() {
                Ok(text) => state.value.push_str(&text),
                Err(err) => return (rows, Some(err.to_string())),
            },
            Event::CData(e) if state.collecting() => {
                state
                    .value
                    .push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => state.in_v = false,
                b"t" => state.in_t = false,
                b"rPh" => state.phonetic_depth = state.phonetic_depth.saturating_sub(1),
                b"is" => state.in_is = false,
                b"c" => state.finish_cell(),
                b"row" if state.in_row => rows.push(state.finish_row()),
                _ => {}
            },
            Event::Eof => {
                if state.in_row {
                    state.finish_cell();
                    rows.push(state.finish_row());
                }
                return (rows, unexpected_end(&open));
            }
            _ => {}
        }
        buf.clear();
    }
}

#[derive(Default)]
struct SheetState {
    in_row: bool,
    row_index: u32,
    next_col: u32,
    cells: Vec<Cell>,
    cell: Option<(u32, CellKind)>,
    in_v: bool,
    in_is: bool,
    in_t: bool,
    phonetic_depth: usize,
    has_value: bool,
    value: String,
}

impl SheetState {
    fn collecting(&self) -> bool {
        self.in_v || (self.in_is && self.in_t)
    }

    fn start_row(&mut self, e: &BytesStart<'_>, rows_seen: usize) {
        self.in_row = true;
        self.next_col = 0;
        self.cells.clear();
        self.row_index = attr(e, b"r")
            .and_then(|r| r.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1))
            .unwrap_or(rows_seen as u32);
    }

    fn start_cell(&mut self, e: &BytesStart<'_>) {
        let kind = CellKind::from_type_attr(attr(e, b"t").as_deref());
        let col = attr(e, b"r")
            .and_then(|r| parse_cell_ref(&r))
            .map(|(_, col)| col)
            .unwrap_or(self.next_col);
        self.next_col = col + 1;
        self.cell = Some((col, kind));
        self.has_value = false;
        self.value.clear();
    }

    fn finish_cell(&mut self) {
        if let Some((col, kind)) = self.cell.take() {
            let raw = if self.has_value {
                Some(std::mem::take(&mut self.value))
            } else {
                None
            };
            self.cells.push(Cell {
                row: self.row_index,
                col,
                raw,
                kind,
            });
        }
        self.in_v = false;
        self.in_is = false;
        self.in_t = false;
        self.phonetic_depth = 0;
    }

    fn finish_row(&mut self) -> Vec<Cell> {
        self.in_row = false;
        std::mem::take(&mut self.cells)
    }
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse an A1-style reference ("B3") into zero-based (row, col)
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut col = 0u32;
    for c in letters.chars() {
        col = col
            .checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }
    let row = digits.parse::<u32>().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            body
        )
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("B3"), Some((2, 1)));
        assert_eq!(parse_cell_ref("Z10"), Some((9, 25)));
        assert_eq!(parse_cell_ref("AA1"), Some((0, 26)));
        assert_eq!(parse_cell_ref("ab2"), Some((1, 27)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A"), None);
    }

    #[test]
    fn test_cells_keep_kind_and_raw() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>3611.0</v></c><c r="C1" t="b"><v>1</v></c></row>"#,
        );
        let (rows, err) = parse_worksheet(xml.as_bytes());
        assert!(err.is_none());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row[0].kind, CellKind::SharedString);
        assert_eq!(row[0].raw.as_deref(), Some("0"));
        assert_eq!(row[1].kind, CellKind::Literal);
        assert_eq!(row[1].raw.as_deref(), Some("3611.0"));
        assert_eq!((row[2].row, row[2].col), (0, 2));
    }

    #[test]
    fn test_cell_without_value() {
        let xml = sheet(r#"<row r="1"><c r="A1" s="1"/><c r="B1" t="s"></c></row>"#);
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0][0].raw, None);
        assert_eq!(rows[0][1].raw, None);
        assert_eq!(rows[0][1].kind, CellKind::SharedString);
    }

    #[test]
    fn test_inline_string_text() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><r><t>in</t></r><r><t>line</t></r></is></c></row>"#,
        );
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows[0][0].kind, CellKind::InlineString);
        assert_eq!(rows[0][0].raw.as_deref(), Some("inline"));
    }

    #[test]
    fn test_short_rows_and_empty_rows() {
        let xml = sheet(
            r#"<row r="1"><c r="A1"><v>1</v></c><c r="B1"><v>2</v></c><c r="C1"><v>3</v></c></row><row r="2"><c r="A2"><v>4</v></c></row><row r="3"/>"#,
        );
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].len(), 1);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_positional_coordinates_without_refs() {
        let xml = sheet(r#"<row><c><v>a</v></c><c><v>b</v></c></row><row><c><v>c</v></c></row>"#);
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!((rows[0][1].row, rows[0][1].col), (0, 1));
        assert_eq!((rows[1][0].row, rows[1][0].col), (1, 0));
    }

    #[test]
    fn test_formula_cell_uses_cached_value() {
        let xml = sheet(r#"<row r="1"><c r="A1"><f>SUM(B1:C1)</f><v>90.5</v></c></row>"#);
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows[0][0].raw.as_deref(), Some("90.5"));
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = sheet(r#"<row r="1"><c r="A1" t="str"><v>a &lt; b</v></c></row>"#);
        let (rows, _) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows[0][0].raw.as_deref(), Some("a < b"));
    }

    #[test]
    fn test_malformed_keeps_completed_rows() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1"><v>ok</v></c></row><row r="2"><c r="A2"><v>x</c></row></sheetData></worksheet>"#;
        let (rows, err) = parse_worksheet(xml.as_bytes());
        assert!(err.is_some());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].raw.as_deref(), Some("ok"));
    }

    #[test]
    fn test_cut_off_part_is_an_error() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c></row><row r="2"><c r="A2"><v>4"#;
        let (rows, err) = parse_worksheet(xml.as_bytes());
        assert_eq!(err.as_deref(), Some("unexpected end of part inside <v>"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].raw.as_deref(), Some("4"));
    }

    #[test]
    fn test_unclosed_sheet_data_is_an_error() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c></row>"#;
        let (rows, err) = parse_worksheet(xml.as_bytes());
        assert_eq!(rows.len(), 1);
        assert_eq!(err.as_deref(), Some("unexpected end of part inside <sheetData>"));
    }

    #[test]
    fn test_complete_part_has_no_error() {
        let (_, err) = parse_worksheet(sheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#).as_bytes());
        assert_eq!(err, None);
    }
}
