// Copyright 2026 the wrapgen authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
// - 'file/mod.rs' uses mmap to map a file into memory

//! # wrapgen
//!
//! A generator for typed packet wrapper classes: it reconciles the field order
//! recovered from compiled JVM class files with human-authored protocol
//! documentation, and emits one accessor class per network message.
//!
//! Obfuscated message classes carry no field names worth reading, and the
//! positional accessor API used at runtime addresses fields only by type and
//! occurrence. The documentation knows names, prose types, and wire order, but
//! nothing about the compiled layout. `wrapgen` joins the two:
//!
//! 1. **Scan** - parse each message class and replay its write method's bytecode
//!    to recover the serialization (wire) order of its fields
//!    ([`scanner::WireScanner`])
//! 2. **Enumerate** - list the class's instance fields in declaration (memory)
//!    order, the order the accessor containers index by ([`provider::ClassSet`])
//! 3. **Read** - extract per-message field tables from the documentation page
//!    ([`docs::ProtocolDocs`])
//! 4. **Reconcile** - join documentation rows with wire positions and compute
//!    each field's container slot ([`reconcile::Reconciler`])
//! 5. **Synthesize** - render the wrapper class source
//!    ([`synth::SourceSynthesizer`])
//!
//! Failures degrade with matching granularity: a damaged binary or missing
//! documentation table fails one message; an unresolvable or unmappable field
//! degrades one accessor pair into a marker comment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wrapgen::prelude::*;
//!
//! let config = GeneratorConfig::default();
//! let classes = ClassSet::from_dir(Path::new("classes/"), &config.root_class())?;
//! let docs = ProtocolDocs::from_file(Path::new("protocol.html"))?;
//! let catalog = MessageCatalog::from_file(Path::new("packets.catalog"))?;
//!
//! let generator = WrapperGenerator::new(&classes, &docs, &catalog, &config);
//! for (ty, result) in generator.generate_all() {
//!     match result {
//!         Ok(wrapper) => println!("{}: {} fields", wrapper.class_name, wrapper.field_count),
//!         Err(err) => eprintln!("{ty}: {err}"),
//!     }
//! }
//! # Ok::<(), wrapgen::Error>(())
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// Minimal JVM class file reader: constant pool, fields, methods, `Code`.
pub mod classfile;

/// Protocol documentation: per-message field tables parsed from the wiki page.
pub mod docs;

/// The assembled generation pipeline and its configuration.
pub mod generator;

/// Message identity (protocol, direction, id, name) and the packet catalog.
pub mod message;

/// The loaded class set: ancestry resolution and memory-order enumeration.
pub mod provider;

/// Positional reconciliation of documented fields with recovered wire order.
pub mod reconcile;

/// Wire-order recovery from write-method bytecode.
pub mod scanner;

/// Source synthesis of the wrapper classes.
pub mod synth;

/// Runtime type tags and the accessor mapping table.
pub mod typemap;

/// `wrapgen` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;
pub use file::{parser::Parser, File};
pub use generator::{GeneratedWrapper, GeneratorConfig, WrapperGenerator};
