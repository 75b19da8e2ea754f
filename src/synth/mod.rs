//! Source synthesis: turning a reconciliation result into wrapper class text.
//!
//! One wrapper class is emitted per message type. Its shape is fixed: a file
//! header, the package and imports, a `TYPE` constant referencing the message,
//! two constructors (fresh container and wrapping an existing one), and one
//! getter/setter pair per documented field. Fields whose reconciliation degraded
//! are emitted as marker comments in their documented position, so a generated
//! file always accounts for every documented field.
//!
//! # Typing rules
//!
//! The accessor signature type comes from the documentation, not the container:
//! a field stored as `int` but documented as `Unsigned Byte` surfaces as `byte`,
//! with casts inserted on both the read and write path. Two exceptions:
//!
//! - wrapper mappings (chat components, game profiles, ...) replace the
//!   documented type entirely; the container already converts
//! - when the container type is `int` or `float` and the documented type is
//!   `byte` or `short`, the container type wins uncast; the narrow documented
//!   type reflects wire encoding, not the runtime value range
//!
//! Fields whose accessor name contains `EntityID` additionally get the
//! `getEntity(World)` / `getEntity(PacketEvent)` convenience pair, indexed by
//! the field's documented position.

pub mod indent;
pub mod naming;

use crate::{
    message::MessageType,
    reconcile::{DegradeReason, FieldOutcome, ReconciledField, Reconciliation},
    synth::indent::IndentWriter,
};

/// File header emitted at the top of every generated wrapper.
const HEADER: &[&str] = &[
    "/**",
    " * This file is part of PacketWrapper.",
    " *",
    " * Machine generated from protocol documentation and compiled classes;",
    " * manual edits will be overwritten by the next generation run.",
    " */",
];

/// The name of the wrapper class generated for a message type,
/// e.g. `WrapperPlayServerSpawnEntity`.
#[must_use]
pub fn wrapper_class_name(ty: &MessageType) -> String {
    format!(
        "Wrapper{}{}{}",
        ty.protocol,
        ty.direction,
        naming::to_camel_case(&ty.name)
    )
}

/// Renders wrapper class source.
pub struct SourceSynthesizer {
    package: String,
}

impl SourceSynthesizer {
    /// Create a synthesizer emitting classes into `package`.
    #[must_use]
    pub fn new(package: &str) -> Self {
        SourceSynthesizer {
            package: package.to_string(),
        }
    }

    /// Render the complete wrapper class for one message.
    #[must_use]
    pub fn render(&self, ty: &MessageType, reconciliation: &Reconciliation) -> String {
        let class_name = wrapper_class_name(ty);
        let mut writer = IndentWriter::new();

        for line in HEADER {
            writer.line(line);
        }
        writer.line(&format!("package {};", self.package)).blank();
        writer.line("import com.comphenix.protocol.PacketType;");
        writer.line("import com.comphenix.protocol.events.PacketContainer;");
        writer.blank();
        writer.line(&format!("public class {class_name} extends AbstractPacket {{"));
        writer.blank();

        writer.indent();
        writer.line(&format!(
            "public static final PacketType TYPE = {};",
            ty.reference()
        ));
        writer.blank();

        writer.line(&format!("public {class_name}() {{"));
        writer.indent();
        writer.line("super(new PacketContainer(TYPE), TYPE);");
        writer.line("handle.getModifier().writeDefaults();");
        writer.dedent();
        writer.line("}").blank();

        writer.line(&format!("public {class_name}(PacketContainer packet) {{"));
        writer.indent();
        writer.line("super(packet, TYPE);");
        writer.dedent();
        writer.line("}").blank();

        for (position, field) in reconciliation.fields.iter().enumerate() {
            self.render_field(&mut writer, position, field);
        }

        writer.dedent();
        writer.line("}");
        writer.finish()
    }

    fn render_field(&self, writer: &mut IndentWriter, position: usize, field: &ReconciledField) {
        let (mapping, occurrence_index) = match &field.outcome {
            FieldOutcome::Degraded(reason) => {
                let comment = match reason {
                    DegradeReason::NoWireField => {
                        format!("// Cannot generate field {}", field.doc.name)
                    }
                    DegradeReason::UnresolvedField(name) => {
                        format!("// Cannot resolve field {name}")
                    }
                    DegradeReason::NoMapping(descriptor) => {
                        format!("// Cannot find type for {}", descriptor.name)
                    }
                    DegradeReason::NoSlot(descriptor) => {
                        format!("// Cannot locate container slot for {}", descriptor.name)
                    }
                };
                writer.line(&comment);
                return;
            }
            FieldOutcome::Accessible {
                descriptor: _,
                mapping,
                occurrence_index,
            } => (mapping, occurrence_index),
        };

        let stem = naming::accessor_stem(&field.doc.name);
        let documented_type = naming::normalize_type_text(&field.doc.kind);

        let mut surface_type = documented_type.clone();
        let mut read_cast = String::new();
        let mut write_cast = String::new();

        if mapping.is_wrapper {
            surface_type = mapping.external_type.clone();
        } else if mapping.external_type != documented_type {
            read_cast = format!(" ({documented_type})");
            write_cast = format!(" ({})", mapping.external_type);
        }

        // Containers widen narrow wire encodings; surface the container type
        let container_is_wide = mapping.external_type.eq_ignore_ascii_case("int")
            || mapping.external_type.eq_ignore_ascii_case("float");
        let documented_is_narrow = documented_type.eq_ignore_ascii_case("byte")
            || documented_type.eq_ignore_ascii_case("short");
        if container_is_wide && documented_is_narrow {
            surface_type = mapping.external_type.clone();
            read_cast.clear();
            write_cast.clear();
        }

        let note = naming::lowercase_first(&field.doc.notes);
        let note = note.trim();

        writer.line("/**");
        writer.line(&format!(" * Retrieve {}.", field.doc.name));
        if !note.is_empty() {
            writer.line(" * <p>");
            writer.line(&format!(" * Notes: {note}"));
        }
        writer.line(&format!(" * @return The current {}", field.doc.name));
        writer.line(" */");
        writer.line(&format!("public {surface_type} get{stem}() {{"));
        writer.indent();
        writer.line(&format!(
            "return{read_cast} handle.{}.read({occurrence_index});",
            mapping.accessor_method
        ));
        writer.dedent();
        writer.line("}").blank();

        if stem.to_lowercase().contains("entityid") {
            self.render_entity_accessors(writer, position);
        }

        writer.line("/**");
        writer.line(&format!(" * Set {}.", field.doc.name));
        writer.line(" * @param value - new value.");
        writer.line(" */");
        writer.line(&format!("public void set{stem}({surface_type} value) {{"));
        writer.indent();
        writer.line(&format!(
            "handle.{}.write({occurrence_index},{write_cast} value);",
            mapping.accessor_method
        ));
        writer.dedent();
        writer.line("}").blank();
    }

    fn render_entity_accessors(&self, writer: &mut IndentWriter, position: usize) {
        writer.line("/**");
        writer.line(" * Retrieve the entity involved in this event.");
        writer.line(" * @param world - the current world of the entity.");
        writer.line(" * @return The involved entity.");
        writer.line(" */");
        writer.line("public Entity getEntity(World world) {");
        writer.indent();
        writer.line(&format!("return handle.getEntityModifier(world).read({position});"));
        writer.dedent();
        writer.line("}").blank();

        writer.line("/**");
        writer.line(" * Retrieve the entity involved in this event.");
        writer.line(" * @param event - the packet event.");
        writer.line(" * @return The involved entity.");
        writer.line(" */");
        writer.line("public Entity getEntity(PacketEvent event) {");
        writer.indent();
        writer.line("return getEntity(event.getPlayer().getWorld());");
        writer.dedent();
        writer.line("}").blank();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        docs::DocumentedField,
        message::{Direction, Protocol},
        provider::FieldDescriptor,
        reconcile::{FieldOutcome, ReconciledField, Reconciliation},
        typemap::{TypeMappingEntry, TypeTag},
    };

    fn message() -> MessageType {
        MessageType {
            protocol: Protocol::Play,
            direction: Direction::Server,
            id: 0x1C,
            name: "EXPLOSION".to_string(),
        }
    }

    fn accessible(
        doc_name: &str,
        doc_kind: &str,
        notes: &str,
        field_name: &str,
        tag: TypeTag,
        mapping: TypeMappingEntry,
        occurrence_index: usize,
    ) -> ReconciledField {
        ReconciledField {
            doc: DocumentedField {
                name: doc_name.to_string(),
                kind: doc_kind.to_string(),
                notes: notes.to_string(),
            },
            outcome: FieldOutcome::Accessible {
                descriptor: FieldDescriptor {
                    name: Arc::from(field_name),
                    declaring_class: Arc::from("mc/PacketA"),
                    tag,
                },
                mapping,
                occurrence_index,
            },
        }
    }

    fn int_mapping() -> TypeMappingEntry {
        TypeMappingEntry {
            external_type: "int".to_string(),
            accessor_method: "getIntegers()".to_string(),
            is_wrapper: false,
        }
    }

    fn float_mapping() -> TypeMappingEntry {
        TypeMappingEntry {
            external_type: "float".to_string(),
            accessor_method: "getFloat()".to_string(),
            is_wrapper: false,
        }
    }

    #[test]
    fn renders_class_skeleton() {
        let synthesizer = SourceSynthesizer::new("com.comphenix.packetwrapper");
        let source = synthesizer.render(
            &message(),
            &Reconciliation {
                fields: vec![],
                extra_wire: vec![],
            },
        );

        assert!(source.contains("package com.comphenix.packetwrapper;"));
        assert!(source.contains("public class WrapperPlayServerExplosion extends AbstractPacket {"));
        assert!(source.contains(
            "public static final PacketType TYPE = PacketType.Play.Server.EXPLOSION;"
        ));
        assert!(source.contains("public WrapperPlayServerExplosion() {"));
        assert!(source.contains("handle.getModifier().writeDefaults();"));
        assert!(source.contains("public WrapperPlayServerExplosion(PacketContainer packet) {"));
    }

    #[test]
    fn matching_types_need_no_cast() {
        let field = accessible("X", "Float", "Center X", "a", TypeTag::Float, float_mapping(), 0);
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields: vec![field],
                extra_wire: vec![],
            },
        );

        assert!(source.contains("public float getX() {"));
        assert!(source.contains("return handle.getFloat().read(0);"));
        assert!(source.contains("public void setX(float value) {"));
        assert!(source.contains("handle.getFloat().write(0, value);"));
        assert!(source.contains(" * Notes: center X"));
    }

    #[test]
    fn documented_type_drives_casts() {
        // Stored as int, documented as Slot-independent "Long"? use String case:
        // container String vs documented "Chat" stays uncast only when equal;
        // here: container int, documented long
        let field = accessible("Size", "Long", "", "a", TypeTag::Int, int_mapping(), 2);
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields: vec![field],
                extra_wire: vec![],
            },
        );

        assert!(source.contains("public long getSize() {"));
        assert!(source.contains("return (long) handle.getIntegers().read(2);"));
        assert!(source.contains("public void setSize(long value) {"));
        assert!(source.contains("handle.getIntegers().write(2, (int) value);"));
    }

    #[test]
    fn narrow_documented_types_widen_to_container() {
        let field = accessible("Count", "Unsigned Byte", "", "a", TypeTag::Int, int_mapping(), 0);
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields: vec![field],
                extra_wire: vec![],
            },
        );

        assert!(source.contains("public int getCount() {"));
        assert!(source.contains("return handle.getIntegers().read(0);"));
        assert!(source.contains("public void setCount(int value) {"));
        assert!(source.contains("handle.getIntegers().write(0, value);"));
    }

    #[test]
    fn wrapper_mapping_replaces_documented_type() {
        let mapping = TypeMappingEntry {
            external_type: "WrappedChatComponent".to_string(),
            accessor_method: "getChatComponents()".to_string(),
            is_wrapper: true,
        };
        let field = accessible(
            "Chat Message",
            "Chat",
            "",
            "a",
            TypeTag::object("mc/IChatBaseComponent"),
            mapping,
            0,
        );
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields: vec![field],
                extra_wire: vec![],
            },
        );

        assert!(source.contains("public WrappedChatComponent getChatMessage() {"));
        assert!(source.contains("return handle.getChatComponents().read(0);"));
        assert!(source.contains("public void setChatMessage(WrappedChatComponent value) {"));
    }

    #[test]
    fn entity_id_fields_get_companion_accessors() {
        let fields = vec![
            accessible("X", "Float", "", "x", TypeTag::Float, float_mapping(), 0),
            accessible("Entity ID", "VarInt", "", "a", TypeTag::Int, int_mapping(), 0),
        ];
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields,
                extra_wire: vec![],
            },
        );

        assert!(source.contains("public int getEntityID() {"));
        assert!(source.contains("public Entity getEntity(World world) {"));
        // Indexed by documented position, not container slot
        assert!(source.contains("return handle.getEntityModifier(world).read(1);"));
        assert!(source.contains("public Entity getEntity(PacketEvent event) {"));
        assert!(source.contains("return getEntity(event.getPlayer().getWorld());"));
    }

    #[test]
    fn degraded_fields_become_marker_comments() {
        use crate::reconcile::DegradeReason;

        let fields = vec![ReconciledField {
            doc: DocumentedField {
                name: "Phantom".to_string(),
                kind: "Int".to_string(),
                notes: String::new(),
            },
            outcome: FieldOutcome::Degraded(DegradeReason::NoWireField),
        }];
        let source = SourceSynthesizer::new("p").render(
            &message(),
            &Reconciliation {
                fields,
                extra_wire: vec![],
            },
        );

        assert!(source.contains("// Cannot generate field Phantom"));
        assert!(!source.contains("getPhantom"));
    }
}
