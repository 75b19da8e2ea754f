//! The `Code` attribute: method bytecode and its line number table.

use std::collections::BTreeSet;

use crate::{classfile::constantpool::ConstantPool, file::parser::Parser, Result};

/// Parsed `Code` attribute of one method.
///
/// Carries the raw bytecode plus the merged set of `LineNumberTable` start offsets.
/// The exception table and all other nested attributes (stack map frames, local
/// variable tables) are skipped; the scanner has no use for them.
#[derive(Debug, Clone)]
pub struct CodeAttribute {
    /// Operand stack depth limit, as declared
    pub max_stack: u16,
    /// Local variable slot count, as declared
    pub max_locals: u16,
    /// Raw bytecode of the method body
    pub code: Vec<u8>,
    /// Bytecode offsets at which a new source line begins.
    ///
    /// A class compiled without debug information has an empty set, which makes the
    /// scanner's line-boundary heuristic reject every field read - by design the
    /// degraded path, not an error.
    pub line_starts: BTreeSet<u16>,
}

impl CodeAttribute {
    /// Parse a `Code` attribute body from the parser's current position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] or [`crate::Error::Malformed`] on
    /// truncated or inconsistent attribute data.
    pub fn parse(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Self> {
        let max_stack = parser.read::<u16>()?;
        let max_locals = parser.read::<u16>()?;

        let code_len = parser.read::<u32>()? as usize;
        let code = parser.read_bytes(code_len)?.to_vec();

        let exception_count = parser.read::<u16>()? as usize;
        parser.advance_by(exception_count * 8)?;

        let mut line_starts = BTreeSet::new();
        let attribute_count = parser.read::<u16>()?;
        for _ in 0..attribute_count {
            let name_index = parser.read::<u16>()?;
            let length = parser.read::<u32>()? as usize;

            // The format permits multiple LineNumberTable attributes per Code
            // attribute; their entries are merged.
            if pool.utf8(name_index)?.as_ref() == "LineNumberTable" {
                let entry_count = parser.read::<u16>()?;
                if length != 2 + entry_count as usize * 4 {
                    return Err(malformed_error!(
                        "LineNumberTable length {} does not match {} entries",
                        length,
                        entry_count
                    ));
                }
                for _ in 0..entry_count {
                    let start_pc = parser.read::<u16>()?;
                    let _line = parser.read::<u16>()?;
                    line_starts.insert(start_pc);
                }
            } else {
                parser.advance_by(length)?;
            }
        }

        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
            line_starts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_lnt_name() -> ConstantPool {
        // Single Utf8 entry: "LineNumberTable"
        let name = "LineNumberTable";
        let mut data = vec![1u8];
        data.extend_from_slice(&(name.len() as u16).to_be_bytes());
        data.extend_from_slice(name.as_bytes());

        let mut parser = Parser::new(&data);
        ConstantPool::parse(&mut parser, 2).unwrap()
    }

    fn code_attribute_bytes(code: &[u8], lines: &[(u16, u16)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&1u16.to_be_bytes()); // max_stack
        data.extend_from_slice(&2u16.to_be_bytes()); // max_locals
        data.extend_from_slice(&(code.len() as u32).to_be_bytes());
        data.extend_from_slice(code);
        data.extend_from_slice(&0u16.to_be_bytes()); // exception table
        data.extend_from_slice(&1u16.to_be_bytes()); // one attribute
        data.extend_from_slice(&1u16.to_be_bytes()); // name index: "LineNumberTable"
        data.extend_from_slice(&((2 + lines.len() * 4) as u32).to_be_bytes());
        data.extend_from_slice(&(lines.len() as u16).to_be_bytes());
        for (pc, line) in lines {
            data.extend_from_slice(&pc.to_be_bytes());
            data.extend_from_slice(&line.to_be_bytes());
        }
        data
    }

    #[test]
    fn parses_code_and_line_starts() {
        let pool = pool_with_lnt_name();
        let data = code_attribute_bytes(&[0x00, 0xB1], &[(0, 10), (1, 11)]);

        let mut parser = Parser::new(&data);
        let attr = CodeAttribute::parse(&mut parser, &pool).unwrap();

        assert_eq!(attr.max_stack, 1);
        assert_eq!(attr.max_locals, 2);
        assert_eq!(attr.code, vec![0x00, 0xB1]);
        assert_eq!(
            attr.line_starts.iter().copied().collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn no_line_table_yields_empty_set() {
        let pool = pool_with_lnt_name();
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.push(0xB1); // return
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());

        let mut parser = Parser::new(&data);
        let attr = CodeAttribute::parse(&mut parser, &pool).unwrap();
        assert!(attr.line_starts.is_empty());
    }
}
