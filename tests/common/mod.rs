//! Hand-built .xlsx fixtures
//!
//! Only the parts the resolver reads are written, so tests can drop or
//! corrupt any of them.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Cell payload for [`sheet_xml`]
pub enum C<'a> {
    /// `t="s"` with this raw index
    S(&'a str),
    /// Untyped numeric literal
    N(&'a str),
    /// `t="inlineStr"`
    Inline(&'a str),
    /// Cell element with no value
    Blank,
}

pub fn write_archive(path: &Path, parts: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, body) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

pub fn shared_strings_xml(strings: &[&str]) -> String {
    let items: String = strings
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{}" count="{n}" uniqueCount="{n}">{}</sst>"#,
        NS,
        items,
        n = strings.len()
    )
}

pub fn sheet_xml(rows: &[Vec<C<'_>>]) -> String {
    let mut body = String::new();
    for (r, row) in rows.iter().enumerate() {
        body.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let at = format!("{}{}", column_letter(c), r + 1);
            match cell {
                C::S(idx) => body.push_str(&format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, at, idx)),
                C::N(v) => body.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, at, escape(v))),
                C::Inline(v) => body.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    at,
                    escape(v)
                )),
                C::Blank => body.push_str(&format!(r#"<c r="{}" s="1"/>"#, at)),
            }
        }
        body.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{}"><sheetData>{}</sheetData></worksheet>"#,
        NS, body
    )
}

fn column_letter(idx: usize) -> String {
    let mut n = idx + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A session export: shared-string header and dates, numeric durations.
///
/// Rows (after header):
/// - s1 2025-12-11 60      included
/// - s2 2025-12-12 30.5    included
/// - s3 2025-12-11 "bad"   included, counts 0
/// - s4 2025-12-12 blank   included, counts 0
/// - s5 2025-12-10 999     excluded
pub fn session_export(dir: &TempDir) -> PathBuf {
    let strings = [
        "ID",
        "Status",
        "Created At",
        "Ended At",
        "Duration (s)",
        "s1",
        "s2",
        "s3",
        "s4",
        "s5",
        "ended",
        "2025-12-11T09:15:00.000Z",
        "2025-12-12T14:00:00.000Z",
        "2025-12-10T23:59:00.000Z",
        "bad",
    ];
    let rows = vec![
        vec![C::S("0"), C::S("1"), C::S("2"), C::S("3"), C::S("4")],
        vec![C::S("5"), C::S("10"), C::S("11"), C::Blank, C::N("60")],
        vec![C::S("6"), C::S("10"), C::S("12"), C::Blank, C::N("30.5")],
        vec![C::S("7"), C::S("10"), C::S("11"), C::Blank, C::S("14")],
        vec![C::S("8"), C::S("10"), C::S("12"), C::Blank, C::Blank],
        vec![C::S("9"), C::S("10"), C::S("13"), C::Blank, C::N("999")],
    ];
    let path = dir.path().join("sessions.xlsx");
    write_archive(
        &path,
        &[
            ("xl/sharedStrings.xml", &shared_strings_xml(&strings)),
            ("xl/worksheets/sheet1.xml", &sheet_xml(&rows)),
        ],
    );
    path
}
