//! Wire-order recovery: replaying a message class's write method to learn the
//! serialization order of its fields.
//!
//! Compiled message classes serialize themselves through a single write method
//! that reads one field per source statement and puts it on the wire. The scanner
//! walks that method's bytecode linearly and records, per source line, the first
//! `getfield` whose owner is the class under scan. The resulting sequence is the
//! wire order the documentation's field tables are reconciled against.
//!
//! # Architecture
//!
//! The walk is a plain offset loop over the code array using
//! [`opcodes::instruction_len`]; no stack modeling, no control-flow analysis.
//! Two heuristics pin the semantics:
//!
//! - **One field per line.** A `getfield` is only accepted when the current source
//!   line (per the `LineNumberTable`) has not yet produced one. Helper reads on
//!   the same statement (`this.list.size()` style) are thereby ignored. The
//!   acceptance check consumes the line's budget even when the owner does not
//!   match, so a foreign read cannot unmask a later read on the same line.
//! - **Super splice.** An `invokespecial` of a method with the same name and
//!   descriptor is the `super.write(...)` chain; the superclass's scan result is
//!   spliced into the sequence at the call site.
//!
//! A field read that cannot be resolved through the class's ancestry keeps its
//! position as [`WireField::Unresolved`] so the positional reconciliation stays
//! aligned; the failure surfaces per field, not per message.

pub mod opcodes;

use std::sync::Arc;

use crate::{
    provider::{ClassSet, FieldDescriptor},
    Error, Result,
};

/// Recursion bound for the super-call chain; hostile input only.
const MAX_SCAN_DEPTH: usize = 32;

/// One position of the recovered wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireField {
    /// The read was resolved through the ancestry to a typed field.
    Resolved(FieldDescriptor),
    /// The read named a field no loaded class declares; position preserved.
    Unresolved(Arc<str>),
}

impl WireField {
    /// The field name, resolved or not.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            WireField::Resolved(field) => &field.name,
            WireField::Unresolved(name) => name,
        }
    }
}

/// Scans write methods for wire order.
///
/// Configured once per run with the obfuscated name and descriptor of the write
/// method (e.g. `b` / `(Lnet/minecraft/server/PacketDataSerializer;)V`).
pub struct WireScanner<'a> {
    classes: &'a ClassSet,
    method_name: String,
    method_descriptor: String,
}

impl<'a> WireScanner<'a> {
    /// Create a scanner over a class set.
    #[must_use]
    pub fn new(classes: &'a ClassSet, method_name: &str, method_descriptor: &str) -> Self {
        WireScanner {
            classes,
            method_name: method_name.to_string(),
            method_descriptor: method_descriptor.to_string(),
        }
    }

    /// Recover the wire order of `class_name`'s fields.
    ///
    /// A class without the write method, without a `Code` attribute, or compiled
    /// without a line number table yields an empty order; those are the degraded
    /// inputs the reconciler reports on, not scan failures.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if the class is not loaded,
    /// [`Error::RecursionLimit`] if the super chain exceeds [`MAX_SCAN_DEPTH`],
    /// and parse errors for damaged bytecode.
    pub fn scan(&self, class_name: &str) -> Result<Vec<WireField>> {
        self.classes.require(class_name)?;
        let mut order = Vec::new();
        self.scan_class(class_name, 0, &mut order)?;
        Ok(order)
    }

    fn scan_class(&self, class_name: &str, depth: usize, order: &mut Vec<WireField>) -> Result<()> {
        if depth >= MAX_SCAN_DEPTH {
            return Err(Error::RecursionLimit(MAX_SCAN_DEPTH));
        }

        let Some(class) = self.classes.get(class_name) else {
            // The chain reached a class outside the loaded set; its contribution
            // to the wire order is unknowable, so it is skipped.
            log::warn!("superclass {class_name} not in class set; wire order truncated");
            return Ok(());
        };

        let Some(method) = class.method(&self.method_name, &self.method_descriptor) else {
            return Ok(());
        };
        let Some(code_attr) = &method.code else {
            return Ok(());
        };

        let code = &code_attr.code;
        let mut line_open = false;
        let mut pc = 0usize;

        while pc < code.len() {
            if code_attr.line_starts.contains(&(pc as u16)) {
                line_open = true;
            }

            match code[pc] {
                opcodes::GETFIELD if line_open => {
                    // First read of the line decides; later reads are helpers
                    line_open = false;

                    let index = u16::from_be_bytes([
                        *code.get(pc + 1).ok_or(out_of_bounds_error!())?,
                        *code.get(pc + 2).ok_or(out_of_bounds_error!())?,
                    ]);
                    let member = class.constant_pool.field_ref(index)?;

                    if member.class_name == class_name {
                        match self.classes.resolve_field(class_name, member.name) {
                            Ok(field) => order.push(WireField::Resolved(field)),
                            Err(Error::FieldNotFound { field, .. }) => {
                                log::warn!(
                                    "field {field} read by {class_name}'s write method resolves to no declaration"
                                );
                                order.push(WireField::Unresolved(Arc::from(field.as_str())));
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
                opcodes::INVOKESPECIAL => {
                    let index = u16::from_be_bytes([
                        *code.get(pc + 1).ok_or(out_of_bounds_error!())?,
                        *code.get(pc + 2).ok_or(out_of_bounds_error!())?,
                    ]);
                    let member = class.constant_pool.method_ref(index)?;

                    // Same name and descriptor marks the super.write(...) chain
                    if member.name == self.method_name && member.descriptor == self.method_descriptor
                    {
                        if let Some(parent) = &class.super_name {
                            let parent = parent.clone();
                            self.scan_class(&parent, depth + 1, order)?;
                        }
                    }
                }
                _ => {}
            }

            pc += opcodes::instruction_len(code, pc)?;
        }

        Ok(())
    }
}
