//! Constant pool parsing and symbolic reference resolution.
//!
//! The constant pool is the class file's string and symbol table: every class name,
//! field reference, and method reference used by the bytecode is an index into it.
//! This module parses the pool into [`Constant`] entries and resolves the two
//! compound shapes the scanner cares about - field references (`getfield` operands)
//! and method references (`invokespecial` operands) - into flat [`MemberRef`]s.
//!
//! Entries are indexed 1-based as in the format; `Long` and `Double` occupy two
//! slots, with the second slot unusable.

use std::sync::Arc;

use crate::{file::parser::Parser, Result};

/// Constant pool entry tags, as defined by the class file format.
mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

/// One parsed constant pool entry.
///
/// Compound entries keep their raw indices; resolution to strings happens on
/// demand through [`ConstantPool`] accessors.
#[derive(Debug, Clone)]
pub enum Constant {
    /// Modified UTF-8 string data
    Utf8(Arc<str>),
    /// 32-bit integer constant
    Integer(i32),
    /// 32-bit float constant
    Float(f32),
    /// 64-bit integer constant (occupies two pool slots)
    Long(i64),
    /// 64-bit float constant (occupies two pool slots)
    Double(f64),
    /// Symbolic class reference; `name_index` points at a [`Constant::Utf8`]
    Class {
        /// Index of the internal class name
        name_index: u16,
    },
    /// String literal; points at a [`Constant::Utf8`]
    String {
        /// Index of the literal's characters
        string_index: u16,
    },
    /// Field reference (owner class + name-and-type)
    FieldRef {
        /// Index of the owning [`Constant::Class`]
        class_index: u16,
        /// Index of the [`Constant::NameAndType`]
        name_and_type_index: u16,
    },
    /// Method reference (owner class + name-and-type)
    MethodRef {
        /// Index of the owning [`Constant::Class`]
        class_index: u16,
        /// Index of the [`Constant::NameAndType`]
        name_and_type_index: u16,
    },
    /// Interface method reference (owner class + name-and-type)
    InterfaceMethodRef {
        /// Index of the owning [`Constant::Class`]
        class_index: u16,
        /// Index of the [`Constant::NameAndType`]
        name_and_type_index: u16,
    },
    /// Name and descriptor pair
    NameAndType {
        /// Index of the member name
        name_index: u16,
        /// Index of the member descriptor
        descriptor_index: u16,
    },
    /// Method handle (invokedynamic machinery; carried but unused here)
    MethodHandle {
        /// Reference kind (1-9)
        reference_kind: u8,
        /// Index of the referenced member
        reference_index: u16,
    },
    /// Method type descriptor
    MethodType {
        /// Index of the descriptor
        descriptor_index: u16,
    },
    /// Dynamically-computed constant
    Dynamic {
        /// Index into the bootstrap methods attribute
        bootstrap_method_attr_index: u16,
        /// Index of the [`Constant::NameAndType`]
        name_and_type_index: u16,
    },
    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the bootstrap methods attribute
        bootstrap_method_attr_index: u16,
        /// Index of the [`Constant::NameAndType`]
        name_and_type_index: u16,
    },
    /// Module declaration (module-info only)
    Module {
        /// Index of the module name
        name_index: u16,
    },
    /// Package declaration (module-info only)
    Package {
        /// Index of the package name
        name_index: u16,
    },
    /// Slot 0 and the trailing slot of `Long`/`Double` entries
    Unusable,
}

/// A field or method reference resolved to flat strings.
///
/// Borrowed views into the pool's UTF-8 entries; cheap to produce per instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'a> {
    /// Internal name of the owning class (e.g. `net/minecraft/server/PacketPlayOutExplosion`)
    pub class_name: &'a str,
    /// Member name
    pub name: &'a str,
    /// Field or method descriptor
    pub descriptor: &'a str,
}

/// The parsed constant pool of one class file.
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Parse the constant pool from the parser's current position.
    ///
    /// `count` is the raw `constant_pool_count` from the class header; the number of
    /// logical entries is `count - 1`, with long/double entries consuming two slots.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag and
    /// [`crate::Error::OutOfBounds`] on truncated data.
    pub fn parse(parser: &mut Parser<'_>, count: u16) -> Result<Self> {
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index = 1;
        while index < count {
            let tag = parser.read::<u8>()?;
            let constant = match tag {
                tag::UTF8 => {
                    let len = parser.read::<u16>()? as usize;
                    Constant::Utf8(Arc::from(parser.read_string_utf8(len)?))
                }
                tag::INTEGER => Constant::Integer(parser.read::<i32>()?),
                tag::FLOAT => Constant::Float(parser.read::<f32>()?),
                tag::LONG => Constant::Long(parser.read::<i64>()?),
                tag::DOUBLE => Constant::Double(parser.read::<f64>()?),
                tag::CLASS => Constant::Class {
                    name_index: parser.read::<u16>()?,
                },
                tag::STRING => Constant::String {
                    string_index: parser.read::<u16>()?,
                },
                tag::FIELD_REF => Constant::FieldRef {
                    class_index: parser.read::<u16>()?,
                    name_and_type_index: parser.read::<u16>()?,
                },
                tag::METHOD_REF => Constant::MethodRef {
                    class_index: parser.read::<u16>()?,
                    name_and_type_index: parser.read::<u16>()?,
                },
                tag::INTERFACE_METHOD_REF => Constant::InterfaceMethodRef {
                    class_index: parser.read::<u16>()?,
                    name_and_type_index: parser.read::<u16>()?,
                },
                tag::NAME_AND_TYPE => Constant::NameAndType {
                    name_index: parser.read::<u16>()?,
                    descriptor_index: parser.read::<u16>()?,
                },
                tag::METHOD_HANDLE => Constant::MethodHandle {
                    reference_kind: parser.read::<u8>()?,
                    reference_index: parser.read::<u16>()?,
                },
                tag::METHOD_TYPE => Constant::MethodType {
                    descriptor_index: parser.read::<u16>()?,
                },
                tag::DYNAMIC => Constant::Dynamic {
                    bootstrap_method_attr_index: parser.read::<u16>()?,
                    name_and_type_index: parser.read::<u16>()?,
                },
                tag::INVOKE_DYNAMIC => Constant::InvokeDynamic {
                    bootstrap_method_attr_index: parser.read::<u16>()?,
                    name_and_type_index: parser.read::<u16>()?,
                },
                tag::MODULE => Constant::Module {
                    name_index: parser.read::<u16>()?,
                },
                tag::PACKAGE => Constant::Package {
                    name_index: parser.read::<u16>()?,
                },
                _ => {
                    return Err(malformed_error!(
                        "Unknown constant pool tag {} at entry {}",
                        tag,
                        index
                    ))
                }
            };

            let double_width = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            index += 1;

            if double_width {
                entries.push(Constant::Unusable);
                index += 1;
            }
        }

        Ok(ConstantPool { entries })
    }

    /// Number of pool slots, including slot 0 and long/double padding slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Fetch the entry at a 1-based pool index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for out-of-range indices.
    pub fn get(&self, index: u16) -> Result<&Constant> {
        self.entries
            .get(index as usize)
            .ok_or_else(|| malformed_error!("Constant pool index {} out of range", index))
    }

    /// Resolve a [`Constant::Utf8`] entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index does not name a UTF-8 entry.
    pub fn utf8(&self, index: u16) -> Result<&Arc<str>> {
        match self.get(index)? {
            Constant::Utf8(text) => Ok(text),
            _ => Err(malformed_error!("Expected Utf8 constant at index {}", index)),
        }
    }

    /// Resolve a [`Constant::Class`] entry to its internal name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index does not name a class entry.
    pub fn class_name(&self, index: u16) -> Result<&Arc<str>> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(malformed_error!(
                "Expected Class constant at index {}",
                index
            )),
        }
    }

    /// Resolve a field reference to owner, name, and descriptor.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index does not name a field reference
    /// or the referenced entries have the wrong shape.
    pub fn field_ref(&self, index: u16) -> Result<MemberRef<'_>> {
        match self.get(index)? {
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            } => self.member_ref(*class_index, *name_and_type_index),
            _ => Err(malformed_error!(
                "Expected FieldRef constant at index {}",
                index
            )),
        }
    }

    /// Resolve a method reference (plain or interface) to owner, name, and descriptor.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index does not name a method reference
    /// or the referenced entries have the wrong shape.
    pub fn method_ref(&self, index: u16) -> Result<MemberRef<'_>> {
        match self.get(index)? {
            Constant::MethodRef {
                class_index,
                name_and_type_index,
            }
            | Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => self.member_ref(*class_index, *name_and_type_index),
            _ => Err(malformed_error!(
                "Expected MethodRef constant at index {}",
                index
            )),
        }
    }

    fn member_ref(&self, class_index: u16, name_and_type_index: u16) -> Result<MemberRef<'_>> {
        let class_name = self.class_name(class_index)?;
        match self.get(name_and_type_index)? {
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => Ok(MemberRef {
                class_name,
                name: self.utf8(*name_index)?,
                descriptor: self.utf8(*descriptor_index)?,
            }),
            _ => Err(malformed_error!(
                "Expected NameAndType constant at index {}",
                name_and_type_index
            )),
        }
    }
}
