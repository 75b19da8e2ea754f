//! Binary input backends for compiled class files.
//!
//! This module provides the [`crate::file::File`] type, the owned container for one
//! compiled class binary, and the [`crate::file::parser::Parser`] cursor used to decode
//! it. Class binaries are either memory-mapped from disk (the common case when loading a
//! directory of compiled classes) or adopted from an in-memory buffer (tests, archives
//! unpacked by a caller).
//!
//! # Architecture
//!
//! A [`File`] owns the bytes and hands out `&[u8]` slices; all structural decoding goes
//! through [`parser::Parser`], which performs bounds-checked big-endian reads. The class
//! file format is big-endian throughout, so unlike most binary formats there is no
//! little-endian path here.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use wrapgen::File;
//!
//! let file = File::from_file(std::path::Path::new("PacketPlayOutExplosion.class"))?;
//! assert_eq!(&file.data()[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! # Ok::<(), wrapgen::Error>(())
//! ```

pub mod parser;

use std::{fs, path::Path};

use memmap2::Mmap;

use crate::{Error, Result};

/// One compiled class binary, held either as a memory map or an owned buffer.
///
/// Memory mapping keeps directory loads cheap: only the pages the parser touches are
/// faulted in, and the operating system shares the cache across processes.
pub struct File {
    data: FileData,
}

enum FileData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl File {
    /// Memory-map a class file from disk.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be opened or mapped, and
    /// [`Error::Empty`] for a zero-length file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;

        // Safety contract of memmap2: the file must not be truncated while mapped.
        // Class files are static build artifacts, which is the supported use case.
        let mapped = unsafe { Mmap::map(&file)? };
        if mapped.is_empty() {
            return Err(Error::Empty);
        }

        Ok(File {
            data: FileData::Mapped(mapped),
        })
    }

    /// Adopt an in-memory class binary.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] if the buffer holds no data.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Empty);
        }

        Ok(File {
            data: FileData::Owned(data),
        })
    }

    /// The raw bytes of the class binary.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        match &self.data {
            FileData::Mapped(mapped) => mapped,
            FileData::Owned(owned) => owned,
        }
    }

    /// Total size of the binary in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the binary holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}
