//! Positional reconciliation of documented fields with recovered wire order.
//!
//! The two inputs describe the same serialized layout from opposite ends: the
//! documentation lists fields in wire order with human names and prose types, and
//! the scanner recovers wire order as typed field references. Neither carries the
//! other's information, so the join is purely positional: documented field `i`
//! is the field behind wire position `i`.
//!
//! For each documented position the reconciler produces a [`ReconciledField`]
//! whose [`FieldOutcome`] is either everything synthesis needs to emit a typed
//! accessor pair, or a [`DegradeReason`] naming exactly why that one field cannot
//! be generated. Degradation is always per field: a single unresolvable read, a
//! missing mapping, or a documentation table longer than the recovered order
//! never suppresses the other fields of the message.
//!
//! The occurrence index - which slot of the per-type accessor container the field
//! occupies - is computed against memory order: it is the number of fields with
//! the same runtime type that precede the target in declaration order.

use crate::{
    docs::DocumentedField,
    provider::FieldDescriptor,
    scanner::WireField,
    typemap::{TypeAncestry, TypeMappingEntry, TypeMappingRegistry},
};

/// Why a documented field cannot be given a typed accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradeReason {
    /// The recovered wire order is shorter than the documentation table.
    NoWireField,
    /// The wire position's field read resolved to no declaration.
    UnresolvedField(String),
    /// The field's runtime type has no registered accessor mapping.
    NoMapping(FieldDescriptor),
    /// The field resolved outside the memory-order window, so it has no
    /// container slot (declared above the message base class).
    NoSlot(FieldDescriptor),
}

/// What synthesis does with one documented field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// A typed accessor pair can be generated.
    Accessible {
        /// The resolved field behind this wire position
        descriptor: FieldDescriptor,
        /// Its accessor mapping
        mapping: TypeMappingEntry,
        /// Slot within the per-type accessor container
        occurrence_index: usize,
    },
    /// Only a marker comment can be generated.
    Degraded(DegradeReason),
}

/// One documented field joined with its wire position.
#[derive(Debug, Clone)]
pub struct ReconciledField {
    /// The documentation row, untouched
    pub doc: DocumentedField,
    /// The join result
    pub outcome: FieldOutcome,
}

/// The full reconciliation result for one message.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// One entry per documented field, in documented order
    pub fields: Vec<ReconciledField>,
    /// Wire positions beyond the documented count; recovered but undocumented
    pub extra_wire: Vec<WireField>,
}

impl Reconciliation {
    /// True if every documented field got a typed accessor.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.extra_wire.is_empty()
            && self
                .fields
                .iter()
                .all(|field| matches!(field.outcome, FieldOutcome::Accessible { .. }))
    }

    /// Number of degraded fields.
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| matches!(field.outcome, FieldOutcome::Degraded(_)))
            .count()
    }
}

/// Joins documentation tables with scan results.
pub struct Reconciler<'a> {
    registry: &'a TypeMappingRegistry,
    ancestry: &'a dyn TypeAncestry,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over an accessor registry and an ancestry oracle.
    #[must_use]
    pub fn new(registry: &'a TypeMappingRegistry, ancestry: &'a dyn TypeAncestry) -> Self {
        Reconciler { registry, ancestry }
    }

    /// Join `docs` with `wire`, computing occurrence indices against `memory`.
    #[must_use]
    pub fn reconcile(
        &self,
        docs: &[DocumentedField],
        wire: &[WireField],
        memory: &[FieldDescriptor],
    ) -> Reconciliation {
        let fields = docs
            .iter()
            .enumerate()
            .map(|(position, doc)| ReconciledField {
                doc: doc.clone(),
                outcome: self.outcome_at(wire.get(position), memory),
            })
            .collect();

        Reconciliation {
            fields,
            extra_wire: wire.get(docs.len()..).unwrap_or_default().to_vec(),
        }
    }

    fn outcome_at(&self, wire: Option<&WireField>, memory: &[FieldDescriptor]) -> FieldOutcome {
        let descriptor = match wire {
            None => return FieldOutcome::Degraded(DegradeReason::NoWireField),
            Some(WireField::Unresolved(name)) => {
                return FieldOutcome::Degraded(DegradeReason::UnresolvedField(name.to_string()))
            }
            Some(WireField::Resolved(descriptor)) => descriptor,
        };

        let Some(mapping) = self.registry.lookup(&descriptor.tag, self.ancestry) else {
            return FieldOutcome::Degraded(DegradeReason::NoMapping(descriptor.clone()));
        };

        let Some(occurrence_index) = occurrence_index(memory, descriptor) else {
            return FieldOutcome::Degraded(DegradeReason::NoSlot(descriptor.clone()));
        };

        FieldOutcome::Accessible {
            descriptor: descriptor.clone(),
            mapping: mapping.clone(),
            occurrence_index,
        }
    }
}

/// Count same-typed fields preceding `target` in memory order; `None` when the
/// target is not part of the memory-order window at all.
fn occurrence_index(memory: &[FieldDescriptor], target: &FieldDescriptor) -> Option<usize> {
    let mut count = 0;
    for field in memory {
        if field.name == target.name && field.declaring_class == target.declaring_class {
            return Some(count);
        }
        if field.tag == target.tag {
            count += 1;
        }
    }
    None
}
