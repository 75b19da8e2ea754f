//! Convenient re-exports of the most commonly used types and traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use wrapgen::prelude::*;
//!
//! let config = GeneratorConfig::default();
//! let classes = ClassSet::from_dir("classes/".as_ref(), &config.root_class())?;
//! # Ok::<(), wrapgen::Error>(())
//! ```

pub use crate::{
    classfile::ClassFile,
    docs::{DocumentedField, ProtocolDocs},
    error::Error,
    generator::{GeneratedWrapper, GeneratorConfig, WrapperGenerator},
    message::{CatalogEntry, Direction, MessageCatalog, MessageType, Protocol},
    provider::{ClassSet, FieldDescriptor},
    reconcile::{DegradeReason, FieldOutcome, ReconciledField, Reconciler, Reconciliation},
    scanner::{WireField, WireScanner},
    synth::{wrapper_class_name, SourceSynthesizer},
    typemap::{TypeAncestry, TypeMappingEntry, TypeMappingRegistry, TypeTag},
    Result,
};
