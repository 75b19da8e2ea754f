//! Minimal JVM class file reader.
//!
//! This module parses the subset of the class file format the pipeline needs:
//! the constant pool, the class's identity and superclass, its declared fields,
//! and its methods including the `Code` attribute with line number information.
//! Everything else (interfaces beyond their names, annotations, inner classes,
//! source debug extensions) is skipped without being materialized.
//!
//! # Architecture
//!
//! Parsing is a single forward pass over a [`crate::file::parser::Parser`]:
//!
//! 1. magic + version check
//! 2. [`constantpool::ConstantPool`]
//! 3. access flags, this/super class, interface names
//! 4. field table ([`FieldInfo`]; attributes skipped)
//! 5. method table ([`MethodInfo`]; `Code` attribute parsed via [`code::CodeAttribute`])
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use wrapgen::{classfile::ClassFile, File};
//!
//! let file = File::from_file(std::path::Path::new("PacketPlayOutExplosion.class"))?;
//! let class = ClassFile::parse(file.data())?;
//! println!("{} extends {:?}", class.name, class.super_name);
//! # Ok::<(), wrapgen::Error>(())
//! ```

pub mod code;
pub mod constantpool;
pub mod flags;

use std::sync::Arc;

use crate::{
    classfile::{code::CodeAttribute, constantpool::ConstantPool, flags::AccessFlags},
    file::parser::Parser,
    Error, Result,
};

/// The class file magic number, `0xCAFEBABE`.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// One declared field of a class.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Access and property flags
    pub access: AccessFlags,
    /// Field name
    pub name: Arc<str>,
    /// Field descriptor (e.g. `I`, `[B`, `Ljava/lang/String;`)
    pub descriptor: Arc<str>,
}

/// One declared method of a class.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Access and property flags
    pub access: AccessFlags,
    /// Method name
    pub name: Arc<str>,
    /// Method descriptor (e.g. `(Lnet/minecraft/server/PacketDataSerializer;)V`)
    pub descriptor: Arc<str>,
    /// The method's `Code` attribute; `None` for abstract and native methods
    pub code: Option<CodeAttribute>,
}

/// A parsed class file.
pub struct ClassFile {
    /// Minor format version
    pub minor_version: u16,
    /// Major format version
    pub major_version: u16,
    /// The constant pool
    pub constant_pool: ConstantPool,
    /// Class access flags
    pub access: AccessFlags,
    /// Internal name of this class (e.g. `net/minecraft/server/PacketPlayOutExplosion`)
    pub name: Arc<str>,
    /// Internal name of the superclass; `None` only for `java/lang/Object`
    pub super_name: Option<Arc<str>>,
    /// Internal names of directly implemented interfaces
    pub interfaces: Vec<Arc<str>>,
    /// Declared fields, in declaration order
    pub fields: Vec<FieldInfo>,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    /// Parse a class file from its raw bytes.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the magic number is missing, and
    /// [`Error::Malformed`] / [`Error::OutOfBounds`] for structural damage.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Empty);
        }

        let mut parser = Parser::new(data);

        if parser.read::<u32>()? != MAGIC {
            return Err(Error::NotSupported);
        }

        let minor_version = parser.read::<u16>()?;
        let major_version = parser.read::<u16>()?;

        let pool_count = parser.read::<u16>()?;
        let constant_pool = ConstantPool::parse(&mut parser, pool_count)?;

        let access = AccessFlags::from_raw(parser.read::<u16>()?);

        let this_class = parser.read::<u16>()?;
        let name = constant_pool.class_name(this_class)?.clone();

        let super_class = parser.read::<u16>()?;
        let super_name = if super_class == 0 {
            None
        } else {
            Some(constant_pool.class_name(super_class)?.clone())
        };

        let interface_count = parser.read::<u16>()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            let index = parser.read::<u16>()?;
            interfaces.push(constant_pool.class_name(index)?.clone());
        }

        let field_count = parser.read::<u16>()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let field_access = AccessFlags::from_raw(parser.read::<u16>()?);
            let name_index = parser.read::<u16>()?;
            let descriptor_index = parser.read::<u16>()?;
            skip_attributes(&mut parser)?;

            fields.push(FieldInfo {
                access: field_access,
                name: constant_pool.utf8(name_index)?.clone(),
                descriptor: constant_pool.utf8(descriptor_index)?.clone(),
            });
        }

        let method_count = parser.read::<u16>()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            let method_access = AccessFlags::from_raw(parser.read::<u16>()?);
            let name_index = parser.read::<u16>()?;
            let descriptor_index = parser.read::<u16>()?;

            let mut code = None;
            let attribute_count = parser.read::<u16>()?;
            for _ in 0..attribute_count {
                let attr_name_index = parser.read::<u16>()?;
                let length = parser.read::<u32>()? as usize;

                if constant_pool.utf8(attr_name_index)?.as_ref() == "Code" {
                    let end = parser.pos() + length;
                    code = Some(CodeAttribute::parse(&mut parser, &constant_pool)?);
                    // Nested attributes we don't parse may leave the cursor short
                    parser.seek(end)?;
                } else {
                    parser.advance_by(length)?;
                }
            }

            methods.push(MethodInfo {
                access: method_access,
                name: constant_pool.utf8(name_index)?.clone(),
                descriptor: constant_pool.utf8(descriptor_index)?.clone(),
                code,
            });
        }

        Ok(ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access,
            name,
            super_name,
            interfaces,
            fields,
            methods,
        })
    }

    /// Find a method by exact name and descriptor.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name.as_ref() == name && m.descriptor.as_ref() == descriptor)
    }

    /// Find a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name.as_ref() == name)
    }
}

/// Skip over an attribute table without materializing it.
fn skip_attributes(parser: &mut Parser<'_>) -> Result<()> {
    let count = parser.read::<u16>()?;
    for _ in 0..count {
        let _name_index = parser.read::<u16>()?;
        let length = parser.read::<u32>()? as usize;
        parser.advance_by(length)?;
    }
    Ok(())
}
