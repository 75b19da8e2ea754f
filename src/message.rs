//! Message (packet) identity: protocol phase, bound direction, and the catalog
//! mapping packet types to their compiled class names.
//!
//! A [`MessageType`] is the logical identifier the whole pipeline is keyed by:
//! documentation lookup, class resolution, and the derived wrapper class name all
//! start from it. The [`MessageCatalog`] is the declarative replacement for the
//! original runtime packet registry: a plain text file shipping one line per
//! packet, mapping `(protocol, direction, id, name)` to a JVM internal class name.

use std::{fs, path::Path, sync::Arc};

use strum::{AsRefStr, Display, EnumString};

use crate::Result;

/// Protocol phase a packet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Protocol {
    /// Initial connection handshake
    Handshaking,
    /// Main game state
    Play,
    /// Server list ping
    Status,
    /// Authentication and encryption
    Login,
}

/// Which peer receives the packet.
///
/// Documentation pages speak of "Serverbound"/"Clientbound"; the accessor library
/// names the *sender*, so serverbound packets are `Client` and clientbound packets
/// are `Server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Sent by the client (serverbound)
    Client,
    /// Sent by the server (clientbound)
    Server,
}

/// Logical identifier of one network message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageType {
    /// Protocol phase
    pub protocol: Protocol,
    /// Sending peer
    pub direction: Direction,
    /// Numeric packet id within (protocol, direction)
    pub id: u16,
    /// UPPER_SNAKE packet name (e.g. `SPAWN_ENTITY`)
    pub name: String,
}

impl MessageType {
    /// The `PacketType` reference expression emitted into generated code,
    /// e.g. `PacketType.Play.Server.SPAWN_ENTITY`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!(
            "PacketType.{}.{}.{}",
            self.protocol, self.direction, self.name
        )
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/0x{:02X} {}",
            self.protocol, self.direction, self.id, self.name
        )
    }
}

/// One catalog line: a message type and the internal name of its class.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The message type
    pub ty: MessageType,
    /// JVM internal name of the implementing class
    pub class_name: Arc<str>,
}

/// The packet catalog: the full list of message types to generate, with their
/// compiled class bindings.
///
/// # Format
///
/// One entry per line, whitespace separated; `#` starts a comment:
///
/// ```text
/// # protocol direction id    name          class
/// PLAY       SERVER    0x00  SPAWN_ENTITY  net/minecraft/server/PacketPlayOutSpawnEntity
/// PLAY       CLIENT    0x0F  KEEP_ALIVE    net/minecraft/server/PacketPlayInKeepAlive
/// ```
pub struct MessageCatalog {
    entries: Vec<CatalogEntry>,
}

impl MessageCatalog {
    /// Parse a catalog from its text form.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a line with the wrong field count or
    /// an unparsable protocol, direction, or id.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            };
            if line.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 5 {
                return Err(malformed_error!(
                    "Catalog line {}: expected 5 fields, found {}",
                    line_no + 1,
                    parts.len()
                ));
            }

            let protocol: Protocol = parts[0]
                .parse()
                .map_err(|_| malformed_error!("Catalog line {}: unknown protocol {}", line_no + 1, parts[0]))?;
            let direction: Direction = parts[1]
                .parse()
                .map_err(|_| malformed_error!("Catalog line {}: unknown direction {}", line_no + 1, parts[1]))?;
            let id = parse_id(parts[2]).ok_or_else(|| {
                malformed_error!("Catalog line {}: invalid packet id {}", line_no + 1, parts[2])
            })?;

            entries.push(CatalogEntry {
                ty: MessageType {
                    protocol,
                    direction,
                    id,
                    name: parts[3].to_string(),
                },
                class_name: Arc::from(parts[4]),
            });
        }

        Ok(MessageCatalog { entries })
    }

    /// Load and parse a catalog file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] on I/O failure and [`crate::Error::Malformed`]
    /// on parse failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// All catalog entries, in file order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up the class bound to a message type.
    #[must_use]
    pub fn class_of(&self, ty: &MessageType) -> Option<&Arc<str>> {
        self.entries
            .iter()
            .find(|entry| entry.ty == *ty)
            .map(|entry| &entry.class_name)
    }
}

/// Parse a packet id, accepting `0x`-prefixed hex or plain decimal.
pub(crate) fn parse_id(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
