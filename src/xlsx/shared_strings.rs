//! `xl/sharedStrings.xml` → [`SharedStringTable`]

use super::unexpected_end;
use crate::types::SharedStringTable;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parse a shared strings part.
///
/// Each `<si>` contributes one entry in document order: the concatenation of
/// its `<t>` nodes (plain or inside `<r>` runs), skipping phonetic `<rPh>` runs.
/// An `<si>` without text yields `""`.
///
/// On a markup error the entries decoded so far are returned together with the
/// error message. A part that ends inside an `<si>` keeps that entry's partial
/// text and reports the truncation.
pub fn parse_shared_strings(xml: &[u8]) -> (SharedStringTable, Option<String>) {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut phonetic_depth = 0usize;
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => return (SharedStringTable::new(strings), Some(e.to_string())),
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
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" if in_si => phonetic_depth += 1,
                b"t" if in_si && phonetic_depth == 0 => in_t = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::Text(e) if in_t => match e.unescape() {
                Ok(text) => current.push_str(&text),
                Err(err) => return (SharedStringTable::new(strings), Some(err.to_string())),
            },
            Event::CData(e) if in_t => {
                current.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"si" if in_si => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                _ => {}
            },
            Event::Eof => {
                if in_si {
                    strings.push(current);
                }
                return (SharedStringTable::new(strings), unexpected_end(&open));
            }
            _ => {}
        }
        buf.clear();
    }
}
