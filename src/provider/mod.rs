//! The loaded class set: lookup by internal name, ancestry walks, and the
//! memory-order field enumeration.
//!
//! The reconciler needs two views of a message class that only the compiled
//! binaries can provide: the ancestry-resolved type of any field the write method
//! reads, and the declaration ("memory") order of all instance fields, which is the
//! order the positional accessor containers index by. [`ClassSet`] owns every
//! parsed [`ClassFile`] of a generation run and serves both.
//!
//! Classes above the configured root class (the common message base class) belong
//! to the framework, not to any one message; the memory-order walk stops below it
//! and its fields are never enumerated.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use wrapgen::provider::ClassSet;
//!
//! let classes = ClassSet::from_dir(
//!     std::path::Path::new("classes/"),
//!     "net/minecraft/server/Packet",
//! )?;
//! for field in classes.memory_order("net/minecraft/server/PacketPlayOutExplosion")? {
//!     println!("{} {} (declared by {})", field.tag, field.name, field.declaring_class);
//! }
//! # Ok::<(), wrapgen::Error>(())
//! ```

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use crate::{
    classfile::ClassFile,
    file::File,
    typemap::{TypeAncestry, TypeTag},
    Error, Result,
};

/// A field resolved through a class's ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared
    pub name: Arc<str>,
    /// Internal name of the class that declares the field
    pub declaring_class: Arc<str>,
    /// The field's runtime type
    pub tag: TypeTag,
}

/// Bound on superclass chain length; hostile input can link classes into a cycle.
const MAX_ANCESTRY_DEPTH: usize = 32;

/// All classes loaded for a generation run, indexed by internal name.
pub struct ClassSet {
    classes: HashMap<Arc<str>, ClassFile>,
    root_class: Arc<str>,
}

impl ClassSet {
    /// Create an empty set.
    ///
    /// `root_class` is the internal name of the common message base class; ancestry
    /// enumeration stops when it is reached, so its own fields (ids, framework
    /// bookkeeping) never count towards memory order.
    #[must_use]
    pub fn new(root_class: &str) -> Self {
        ClassSet {
            classes: HashMap::new(),
            root_class: Arc::from(root_class),
        }
    }

    /// Load every `.class` file under `dir`, recursively.
    ///
    /// Files that fail to parse abort the load; an unreadable directory entry is an
    /// I/O error. Non-class files are ignored.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] on I/O failure and the underlying parse error
    /// for a damaged class binary.
    pub fn from_dir(dir: &Path, root_class: &str) -> Result<Self> {
        let mut set = ClassSet::new(root_class);
        set.load_dir(dir)?;
        Ok(set)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "class") {
                let file = File::from_file(&path)?;
                let class = ClassFile::parse(file.data())?;
                log::debug!("loaded class {} from {}", class.name, path.display());
                self.insert(class);
            }
        }
        Ok(())
    }

    /// Parse a class binary and add it to the set. Useful for in-memory inputs.
    ///
    /// # Errors
    /// Returns the underlying parse error for a damaged class binary.
    pub fn insert_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.insert(ClassFile::parse(data)?);
        Ok(())
    }

    /// Add a parsed class, replacing any previous class of the same name.
    pub fn insert(&mut self, class: ClassFile) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Number of loaded classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if no classes are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The configured root (message base) class.
    #[must_use]
    pub fn root_class(&self) -> &Arc<str> {
        &self.root_class
    }

    /// Fetch a class by internal name.
    #[must_use]
    pub fn get(&self, internal_name: &str) -> Option<&ClassFile> {
        self.classes.get(internal_name)
    }

    /// Fetch a class by internal name, failing if absent.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] when the name is not in the set.
    pub fn require(&self, internal_name: &str) -> Result<&ClassFile> {
        self.get(internal_name)
            .ok_or_else(|| Error::ClassNotFound(internal_name.to_string()))
    }

    /// Resolve a field through the ancestry of `internal_name`: the nearest class
    /// in the chain declaring an instance field of that name wins.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if the starting class is not loaded,
    /// [`Error::FieldNotFound`] when the chain is exhausted without a match, and
    /// [`Error::RecursionLimit`] for a cyclic or absurdly deep chain.
    pub fn resolve_field(&self, internal_name: &str, field_name: &str) -> Result<FieldDescriptor> {
        self.require(internal_name)?;

        let mut current = internal_name;
        for _ in 0..MAX_ANCESTRY_DEPTH {
            let Some(class) = self.get(current) else {
                // Chain left the loaded set (e.g. a JDK superclass)
                return Err(Error::FieldNotFound {
                    class: internal_name.to_string(),
                    field: field_name.to_string(),
                });
            };

            if let Some(field) = class.field(field_name) {
                if !field.access.is_static() {
                    return Ok(FieldDescriptor {
                        name: field.name.clone(),
                        declaring_class: class.name.clone(),
                        tag: TypeTag::from_descriptor(&field.descriptor)?,
                    });
                }
            }

            match &class.super_name {
                Some(parent) => current = parent,
                None => {
                    return Err(Error::FieldNotFound {
                        class: internal_name.to_string(),
                        field: field_name.to_string(),
                    })
                }
            }
        }

        Err(Error::RecursionLimit(MAX_ANCESTRY_DEPTH))
    }

    /// Enumerate a class's instance fields in memory order: own declarations first
    /// (in declaration order), then each superclass's, stopping below the root
    /// class. Static fields are excluded; they have no accessor slot.
    ///
    /// A superclass missing from the loaded set truncates the walk with a warning
    /// instead of failing, matching the scanner's behavior for the same gap.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if the starting class itself is not loaded
    /// and [`Error::RecursionLimit`] for a cyclic or absurdly deep chain.
    pub fn memory_order(&self, internal_name: &str) -> Result<Vec<FieldDescriptor>> {
        self.require(internal_name)?;

        let mut order = Vec::new();
        let mut current = internal_name.to_string();
        let mut depth = 0usize;

        while current != self.root_class.as_ref() && current != "java/lang/Object" {
            if depth >= MAX_ANCESTRY_DEPTH {
                return Err(Error::RecursionLimit(MAX_ANCESTRY_DEPTH));
            }
            depth += 1;

            let Some(class) = self.get(&current) else {
                log::warn!(
                    "superclass {} of {} is not in the class set; memory order truncated",
                    current,
                    internal_name
                );
                break;
            };

            for field in &class.fields {
                if !field.access.is_static() {
                    order.push(FieldDescriptor {
                        name: field.name.clone(),
                        declaring_class: class.name.clone(),
                        tag: TypeTag::from_descriptor(&field.descriptor)?,
                    });
                }
            }

            match &class.super_name {
                Some(parent) => current = parent.to_string(),
                None => break,
            }
        }

        Ok(order)
    }
}

impl TypeAncestry for ClassSet {
    fn superclass(&self, internal_name: &str) -> Option<Arc<str>> {
        self.get(internal_name)
            .and_then(|class| class.super_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ClassBuilder;

    fn example_set() -> ClassSet {
        let mut set = ClassSet::new("mc/Packet");
        set.insert_bytes(
            &ClassBuilder::new("mc/Packet", "java/lang/Object")
                .field("timestamp", "J")
                .build(),
        )
        .unwrap();
        set.insert_bytes(
            &ClassBuilder::new("mc/PacketBase", "mc/Packet")
                .field("a", "I")
                .static_field("COUNTER", "I")
                .build(),
        )
        .unwrap();
        set.insert_bytes(
            &ClassBuilder::new("mc/PacketChild", "mc/PacketBase")
                .field("b", "Ljava/lang/String;")
                .field("c", "I")
                .build(),
        )
        .unwrap();
        set
    }

    #[test]
    fn memory_order_walks_up_to_root() {
        let set = example_set();
        let order = set.memory_order("mc/PacketChild").unwrap();

        let names: Vec<&str> = order.iter().map(|f| f.name.as_ref()).collect();
        // Own fields first, then the superclass's; statics and root fields excluded
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(order[2].declaring_class.as_ref(), "mc/PacketBase");
        assert_eq!(order[2].tag, TypeTag::Int);
    }

    #[test]
    fn resolve_field_searches_ancestry() {
        let set = example_set();
        let field = set.resolve_field("mc/PacketChild", "a").unwrap();
        assert_eq!(field.declaring_class.as_ref(), "mc/PacketBase");
        assert_eq!(field.tag, TypeTag::Int);
    }

    #[test]
    fn resolve_field_skips_statics() {
        let set = example_set();
        assert!(matches!(
            set.resolve_field("mc/PacketChild", "COUNTER"),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn unknown_start_class_fails() {
        let set = example_set();
        assert!(matches!(
            set.memory_order("mc/Missing"),
            Err(Error::ClassNotFound(_))
        ));
    }

    #[test]
    fn missing_superclass_truncates_order() {
        let mut set = ClassSet::new("mc/Packet");
        set.insert_bytes(
            &ClassBuilder::new("mc/Orphan", "mc/Gone")
                .field("x", "F")
                .build(),
        )
        .unwrap();

        let order = set.memory_order("mc/Orphan").unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].name.as_ref(), "x");
    }

    #[test]
    fn cyclic_superclass_chain_is_bounded() {
        // Two hostile binaries whose superclasses point at each other; every
        // ancestry walk must terminate instead of spinning
        let mut set = ClassSet::new("mc/Packet");
        set.insert_bytes(&ClassBuilder::new("mc/A", "mc/B").field("x", "I").build())
            .unwrap();
        set.insert_bytes(&ClassBuilder::new("mc/B", "mc/A").field("y", "I").build())
            .unwrap();

        assert!(matches!(
            set.memory_order("mc/A"),
            Err(Error::RecursionLimit(_))
        ));
        assert!(matches!(
            set.resolve_field("mc/A", "missing"),
            Err(Error::RecursionLimit(_))
        ));
    }

    #[test]
    fn ancestry_oracle_reports_superclass() {
        let set = example_set();
        assert_eq!(
            set.superclass("mc/PacketChild").as_deref(),
            Some("mc/PacketBase")
        );
        assert_eq!(set.superclass("mc/Unknown"), None);
    }
}
