//! Lenient HTML walk over the documentation page.
//!
//! The page is wiki-rendered HTML, not XML: void elements are unclosed, entities
//! are HTML-only, and nesting is occasionally sloppy. The walk therefore runs
//! quick-xml with end-name checking disabled and treats the event stream as a
//! flat tag soup, tracking just enough state to recover the section headings and
//! the field tables:
//!
//! - `h2` headings carry the protocol phase, `h3` headings the bound direction
//!   ("Serverbound" means the client sends, "Clientbound" the server)
//! - a table whose header row contains `Packet ID` is a message field table; its
//!   first data row leads with the id, state, and bound cells (spanned down the
//!   table), so field cells start at offset 3 there and at 0 in every later row

use std::collections::HashMap;

use quick_xml::{events::Event, Reader};

use crate::{
    docs::DocumentedField,
    message::{parse_id, Direction, Protocol},
    Result,
};

/// Offset of the first field cell in a table's first data row; the id, state,
/// and bound cells precede it.
const FIRST_ROW_FIELD_OFFSET: usize = 3;

/// Extract every message field table from the page.
pub(super) fn read_field_tables(
    text: &str,
) -> Result<HashMap<(Protocol, Direction, u16), Vec<DocumentedField>>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = false;

    let mut tables = HashMap::new();

    let mut protocol: Option<Protocol> = None;
    let mut direction: Option<Direction> = None;
    let mut heading: Option<String> = None;

    let mut table_depth = 0usize;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Option<Vec<String>> = None;
    let mut cell: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| malformed_error!("Documentation page tokenization failed: {}", err))?;

        match event {
            Event::Eof => break,
            Event::Start(start) => {
                match start.local_name().as_ref().to_ascii_lowercase().as_slice() {
                    b"h2" | b"h3" => heading = Some(String::new()),
                    b"table" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            rows.clear();
                        }
                    }
                    b"tr" if table_depth == 1 => row = Some(Vec::new()),
                    b"td" | b"th" if table_depth == 1 && row.is_some() => {
                        cell = Some(String::new());
                    }
                    _ => {}
                }
            }
            Event::End(end) => match end.local_name().as_ref().to_ascii_lowercase().as_slice() {
                b"h2" => {
                    if let Some(text) = heading.take() {
                        protocol = parse_protocol(&text);
                        // A new phase section invalidates the previous direction
                        direction = None;
                    }
                }
                b"h3" => {
                    if let Some(text) = heading.take() {
                        if let Some(parsed) = parse_direction(&text) {
                            direction = Some(parsed);
                        }
                    }
                }
                b"table" => {
                    if table_depth == 1 {
                        record_table(&rows, protocol, direction, &mut tables);
                        rows.clear();
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                b"tr" => {
                    if let Some(cells) = row.take() {
                        rows.push(cells);
                    }
                }
                b"td" | b"th" => {
                    if let (Some(text), Some(cells)) = (cell.take(), row.as_mut()) {
                        cells.push(squash(&text));
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                // HTML-only entities fail XML unescaping; fall back to raw bytes
                let chunk = match text.unescape() {
                    Ok(unescaped) => unescaped.into_owned(),
                    Err(_) => String::from_utf8_lossy(&text).into_owned(),
                };
                if let Some(buffer) = cell.as_mut() {
                    buffer.push_str(&chunk);
                    buffer.push(' ');
                } else if let Some(buffer) = heading.as_mut() {
                    buffer.push_str(&chunk);
                    buffer.push(' ');
                }
            }
            _ => {}
        }
    }

    Ok(tables)
}

/// Index one table if it is a message field table under a known section.
fn record_table(
    rows: &[Vec<String>],
    protocol: Option<Protocol>,
    direction: Option<Direction>,
    tables: &mut HashMap<(Protocol, Direction, u16), Vec<DocumentedField>>,
) {
    let (Some(protocol), Some(direction)) = (protocol, direction) else {
        return;
    };

    let mut iter = rows.iter();
    let Some(header) = iter.next() else { return };
    if !header.iter().any(|cell| cell.contains("Packet ID")) {
        return;
    }

    let Some(first) = iter.next() else { return };
    let Some(id) = first
        .first()
        .and_then(|cell| cell.split_whitespace().next())
        .and_then(parse_id)
    else {
        log::warn!("field table under {protocol}/{direction} has an unparsable packet id; skipped");
        return;
    };

    let mut fields = Vec::new();
    push_field(&mut fields, first, FIRST_ROW_FIELD_OFFSET);
    for data_row in iter {
        push_field(&mut fields, data_row, 0);
    }

    tables.insert((protocol, direction, id), fields);
}

/// Append the field triple starting at `offset`, if the row carries one.
/// Rows too short (spanned "No fields" markers) contribute nothing.
fn push_field(fields: &mut Vec<DocumentedField>, cells: &[String], offset: usize) {
    let rest = &cells[offset.min(cells.len())..];
    if rest.len() < 2 {
        return;
    }
    fields.push(DocumentedField {
        name: rest[0].clone(),
        kind: rest[1].clone(),
        notes: rest.get(2).cloned().unwrap_or_default(),
    });
}

fn parse_protocol(heading: &str) -> Option<Protocol> {
    heading
        .split_whitespace()
        .next()
        .and_then(|word| word.parse().ok())
}

fn parse_direction(heading: &str) -> Option<Direction> {
    let lower = heading.to_ascii_lowercase();
    if lower.contains("serverbound") {
        Some(Direction::Client)
    } else if lower.contains("clientbound") {
        Some(Direction::Server)
    } else {
        None
    }
}

/// Collapse runs of whitespace left behind by nested markup.
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_vocabulary() {
        assert_eq!(parse_direction("Serverbound "), Some(Direction::Client));
        assert_eq!(parse_direction(" Clientbound"), Some(Direction::Server));
        assert_eq!(parse_direction("Definitions"), None);
    }

    #[test]
    fn protocol_heading_first_word() {
        assert_eq!(parse_protocol(" Play "), Some(Protocol::Play));
        assert_eq!(parse_protocol("Status once more"), Some(Protocol::Status));
        assert_eq!(parse_protocol("Packet format"), None);
    }

    #[test]
    fn squash_collapses_markup_gaps() {
        assert_eq!(squash("  Entity \n  ID  "), "Entity ID");
    }

    #[test]
    fn short_rows_contribute_no_field() {
        let mut fields = Vec::new();
        push_field(
            &mut fields,
            &["0x0B".into(), "Play".into(), "Server".into(), "No fields".into()],
            FIRST_ROW_FIELD_OFFSET,
        );
        assert!(fields.is_empty());
    }
}
