//! Human-authored protocol documentation: per-message field tables.
//!
//! The documentation side of the reconciliation comes from a community-maintained
//! protocol page: one HTML document, sectioned by protocol phase and bound
//! direction, with one table per message listing its fields in documented order
//! with a field name, a prose type, and free-form notes.
//!
//! [`ProtocolDocs`] is the parsed form, indexed by `(protocol, direction, id)`.
//! Parsing lives in [`html`]; this module owns the types and lookup.

pub mod html;

use std::{collections::HashMap, fs, path::Path};

use crate::{
    message::{Direction, MessageType, Protocol},
    Error, Result,
};

/// One documented field of a message, in the documentation's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedField {
    /// Field name as documented (prose, e.g. `Entity ID`)
    pub name: String,
    /// Documented type text (prose, e.g. `VarInt`, `Unsigned Byte`, `Array of Int`)
    pub kind: String,
    /// Free-form notes column
    pub notes: String,
}

/// All message field tables recovered from one documentation page.
pub struct ProtocolDocs {
    tables: HashMap<(Protocol, Direction, u16), Vec<DocumentedField>>,
}

impl ProtocolDocs {
    /// Parse a protocol documentation page from its HTML text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] only for input the lenient HTML walk
    /// cannot tokenize at all; structurally surprising markup is skipped.
    pub fn parse_html(text: &str) -> Result<Self> {
        let tables = html::read_field_tables(text)?;
        Ok(ProtocolDocs { tables })
    }

    /// Load and parse a documentation page from disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] on I/O failure, else as [`Self::parse_html`].
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse_html(&fs::read_to_string(path)?)
    }

    /// Number of message tables found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if the page yielded no message tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The documented fields of a message type, in documented order.
    ///
    /// # Errors
    /// Returns [`Error::DocsNotFound`] when the page has no table for the type.
    pub fn fields(&self, ty: &MessageType) -> Result<&[DocumentedField]> {
        self.tables
            .get(&(ty.protocol, ty.direction, ty.id))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::DocsNotFound(ty.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><div id="mw-content-text">
        <h2><span class="mw-headline" id="Play">Play</span></h2>
        <h3><span class="mw-headline">Clientbound</span></h3>
        <h4>Explosion</h4>
        <table class="wikitable">
          <tr><th>Packet ID</th><th>State</th><th>Bound To</th>
              <th>Field Name</th><th>Field Type</th><th>Notes</th></tr>
          <tr><td rowspan="3">0x1C</td><td rowspan="3">Play</td><td rowspan="3">Client</td>
              <td>X</td><td>Float</td><td>Center X</td></tr>
          <tr><td>Y</td><td>Float</td><td>Center Y</td></tr>
          <tr><td>Record Count</td><td>Int</td><td>Array length</td></tr>
        </table>
        <h3><span class="mw-headline">Serverbound</span></h3>
        <table class="wikitable">
          <tr><th>Packet ID</th><th>State</th><th>Bound To</th>
              <th>Field Name</th><th>Field Type</th><th>Notes</th></tr>
          <tr><td>0x0B</td><td>Play</td><td>Server</td>
              <td colspan="3"><i>No fields</i></td></tr>
        </table>
        <table class="wikitable">
          <tr><th>Just prose</th></tr>
          <tr><td>ignored</td></tr>
        </table>
        </div></body></html>
    "#;

    fn docs() -> ProtocolDocs {
        ProtocolDocs::parse_html(PAGE).unwrap()
    }

    fn ty(protocol: Protocol, direction: Direction, id: u16) -> MessageType {
        MessageType {
            protocol,
            direction,
            id,
            name: "TEST".to_string(),
        }
    }

    #[test]
    fn clientbound_table_is_indexed_as_server_sent() {
        let docs = docs();
        let fields = docs
            .fields(&ty(Protocol::Play, Direction::Server, 0x1C))
            .unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "X");
        assert_eq!(fields[0].kind, "Float");
        assert_eq!(fields[2].name, "Record Count");
        assert_eq!(fields[2].notes, "Array length");
    }

    #[test]
    fn fieldless_message_yields_empty_table() {
        let docs = docs();
        let fields = docs
            .fields(&ty(Protocol::Play, Direction::Client, 0x0B))
            .unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn non_packet_tables_are_skipped() {
        assert_eq!(docs().len(), 2);
    }

    #[test]
    fn missing_table_is_docs_not_found() {
        assert!(matches!(
            docs().fields(&ty(Protocol::Login, Direction::Client, 0x00)),
            Err(Error::DocsNotFound(_))
        ));
    }
}
