//! Low-level byte stream parser for class file decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary
//! parser for reading JVM class file structures: the constant pool, field and method
//! tables, attributes, and raw bytecode. All multi-byte values in a class file are
//! big-endian, and every read is bounds-checked so that truncated or hostile input
//! surfaces as [`crate::Error::OutOfBounds`] instead of a panic.
//!
//! # Key Components
//!
//! - [`Parser`] - the cursor; tracks a position within a borrowed byte slice
//! - [`ClassIO`] - trait implemented by the primitive types the format uses
//!
//! # Usage Examples
//!
//! ```rust
//! use wrapgen::Parser;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! let magic = parser.read::<u32>()?;
//! assert_eq!(magic, 0xCAFE_BABE);
//! let minor = parser.read::<u16>()?;
//! assert_eq!(minor, 0);
//! # Ok::<(), wrapgen::Error>(())
//! ```

use crate::Result;

/// Trait for primitive types that can be decoded from big-endian bytes.
///
/// Implemented for the integer and floating point widths that appear in class
/// files: `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`, `f32`, `f64`.
pub trait ClassIO: Sized {
    /// The fixed-size byte array this type decodes from.
    type Bytes: for<'a> TryFrom<&'a [u8]>;

    /// Decode a value from its big-endian byte representation.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_class_io {
    ($($ty:ty),*) => {
        $(
            impl ClassIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_class_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// A bounds-checked, big-endian cursor over one class binary.
///
/// The parser maintains an internal position and provides typed sequential reads plus
/// random access via [`Parser::seek`]. It never copies the underlying data; slices
/// returned by [`Parser::read_bytes`] borrow from the input.
///
/// # Examples
///
/// ```rust
/// use wrapgen::Parser;
///
/// let data = [0x00, 0x10, 0xFF];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read::<u16>()?, 0x0010);
/// assert_eq!(parser.read::<u8>()?, 0xFF);
/// assert!(!parser.has_more_data());
/// # Ok::<(), wrapgen::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to the end of the data (one past the last byte) is allowed; any
    /// read from there fails.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if this would move past the end of the data.
    pub fn advance_by(&mut self, count: usize) -> Result<()> {
        let new_pos = self
            .position
            .checked_add(count)
            .ok_or(out_of_bounds_error!())?;
        self.seek(new_pos)
    }

    /// Peek at the byte at the current position without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(out_of_bounds_error!())
    }

    /// Read a primitive value in big-endian byte order and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes remaining.
    pub fn read<T: ClassIO>(&mut self) -> Result<T> {
        let type_len = std::mem::size_of::<T>();
        if self.position + type_len > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let Ok(bytes) = self.data[self.position..self.position + type_len].try_into() else {
            return Err(out_of_bounds_error!());
        };

        self.position += type_len;
        Ok(T::from_be_bytes(bytes))
    }

    /// Read `count` raw bytes and advance past them.
    ///
    /// The returned slice borrows from the underlying data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes remaining.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .ok_or(out_of_bounds_error!())?;
        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Read a length-delimited UTF-8 string and advance past it.
    ///
    /// Class files use JVM "modified UTF-8"; the differences (embedded NUL encoding,
    /// surrogate pairs for supplementary characters) never occur in the identifier
    /// strings this tool consumes, so invalid sequences are replaced rather than
    /// treated as structural errors.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes remaining.
    pub fn read_string_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_sequential() {
        let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read::<u16>().unwrap(), 1);
        assert_eq!(parser.read::<u32>().unwrap(), 2);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn read_signed_and_float() {
        let data = [0xFF, 0xFF, 0x3F, 0x80, 0x00, 0x00];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read::<i16>().unwrap(), -1);
        assert!((parser.read::<f32>().unwrap() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn read_past_end_fails() {
        let data = [0x01];
        let mut parser = Parser::new(&data);

        assert!(parser.read::<u32>().is_err());
        // A failed read must not move the cursor
        assert_eq!(parser.pos(), 0);
        assert_eq!(parser.read::<u8>().unwrap(), 1);
    }

    #[test]
    fn seek_and_peek() {
        let data = [0x0A, 0x0B, 0x0C];
        let mut parser = Parser::new(&data);

        parser.seek(2).unwrap();
        assert_eq!(parser.peek_byte().unwrap(), 0x0C);
        assert_eq!(parser.pos(), 2);

        // Seeking to the end is fine, past it is not
        parser.seek(3).unwrap();
        assert!(parser.peek_byte().is_err());
        assert!(parser.seek(4).is_err());
    }

    #[test]
    fn read_bytes_borrows() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        parser.advance_by(1).unwrap();
        let slice = parser.read_bytes(2).unwrap();
        assert_eq!(slice, &[0x02, 0x03]);
        assert_eq!(parser.pos(), 3);
    }

    #[test]
    fn read_string_utf8_lossy() {
        let data = [b'P', b'a', b'c', b'k', b'e', b't'];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_string_utf8(6).unwrap(), "Packet");
    }
}
