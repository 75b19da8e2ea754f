//! Runtime type tags and the fixed table mapping them to container accessors.
//!
//! The storage API underneath the generated wrappers does not address fields by
//! name: it exposes one positional accessor per runtime type
//! (`getIntegers()`, `getStrings()`, `getItemModifier()`, ...), indexed by the
//! field's order of occurrence among same-typed siblings. This module provides:
//!
//! - [`TypeTag`] - a nominal tag for a field's runtime type, parsed from its JVM
//!   field descriptor. The type universe is closed, so tags are plain data with
//!   structural equality; there is no runtime polymorphism involved.
//! - [`TypeMappingRegistry`] - the fixed table from well-known tags to
//!   [`TypeMappingEntry`]s. Lookup walks the type's superclass chain (nearest
//!   registered ancestor wins), which is how e.g. every enum type resolves to the
//!   generic `Enum` accessor.
//! - [`TypeAncestry`] - the superclass oracle the walk consults, implemented by
//!   the class set for loaded classes.
//!
//! # Usage Examples
//!
//! ```rust
//! use wrapgen::typemap::{NoAncestry, TypeMappingRegistry, TypeTag};
//!
//! let registry = TypeMappingRegistry::standard("net/minecraft/server");
//! let tag = TypeTag::from_descriptor("[B")?;
//! let entry = registry.lookup(&tag, &NoAncestry).unwrap();
//! assert_eq!(entry.accessor_method, "getByteArrays()");
//! assert_eq!(entry.external_type, "byte[]");
//! # Ok::<(), wrapgen::Error>(())
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::Result;

/// Nominal identifier of a field's runtime type.
///
/// Equality is structural: two `Object` tags are equal exactly when their internal
/// names match, and an array tag is equal to another array tag with the same
/// element. This is the equality the occurrence index is computed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `boolean` (`Z`)
    Boolean,
    /// `byte` (`B`)
    Byte,
    /// `char` (`C`)
    Char,
    /// `short` (`S`)
    Short,
    /// `int` (`I`)
    Int,
    /// `long` (`J`)
    Long,
    /// `float` (`F`)
    Float,
    /// `double` (`D`)
    Double,
    /// Array type with the given element tag (`[` prefix)
    Array(Box<TypeTag>),
    /// Reference type by internal name (`L...;`)
    Object(Arc<str>),
}

impl TypeTag {
    /// Parse a JVM field descriptor into a tag.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the descriptor is empty, truncated,
    /// or carries trailing characters.
    pub fn from_descriptor(descriptor: &str) -> Result<Self> {
        let (tag, rest) = Self::parse_prefix(descriptor)?;
        if !rest.is_empty() {
            return Err(malformed_error!(
                "Trailing characters in field descriptor {}",
                descriptor
            ));
        }
        Ok(tag)
    }

    fn parse_prefix(descriptor: &str) -> Result<(Self, &str)> {
        let mut chars = descriptor.chars();
        let tag = match chars.next() {
            Some('Z') => TypeTag::Boolean,
            Some('B') => TypeTag::Byte,
            Some('C') => TypeTag::Char,
            Some('S') => TypeTag::Short,
            Some('I') => TypeTag::Int,
            Some('J') => TypeTag::Long,
            Some('F') => TypeTag::Float,
            Some('D') => TypeTag::Double,
            Some('[') => {
                let (element, rest) = Self::parse_prefix(chars.as_str())?;
                return Ok((TypeTag::Array(Box::new(element)), rest));
            }
            Some('L') => {
                let rest = chars.as_str();
                let end = rest.find(';').ok_or_else(|| {
                    malformed_error!("Unterminated object descriptor {}", descriptor)
                })?;
                return Ok((TypeTag::Object(Arc::from(&rest[..end])), &rest[end + 1..]));
            }
            _ => {
                return Err(malformed_error!(
                    "Invalid field descriptor {:?}",
                    descriptor
                ))
            }
        };
        Ok((tag, chars.as_str()))
    }

    /// Convenience constructor for an object tag.
    #[must_use]
    pub fn object(internal_name: &str) -> Self {
        TypeTag::Object(Arc::from(internal_name))
    }

    /// Convenience constructor for an array tag.
    #[must_use]
    pub fn array(element: TypeTag) -> Self {
        TypeTag::Array(Box::new(element))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Byte => write!(f, "byte"),
            TypeTag::Char => write!(f, "char"),
            TypeTag::Short => write!(f, "short"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::Long => write!(f, "long"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Double => write!(f, "double"),
            TypeTag::Array(element) => write!(f, "{element}[]"),
            TypeTag::Object(name) => write!(f, "{name}"),
        }
    }
}

/// Bound on the lookup's ancestry walk; hostile class input can make the
/// superclass oracle report a cycle.
const MAX_LOOKUP_DEPTH: usize = 32;

/// Superclass oracle used by [`TypeMappingRegistry::lookup`]'s ancestry walk.
pub trait TypeAncestry {
    /// The internal name of the direct superclass of `internal_name`, if known.
    fn superclass(&self, internal_name: &str) -> Option<Arc<str>>;
}

/// An ancestry oracle that knows nothing; walk stops after the exact tag.
pub struct NoAncestry;

impl TypeAncestry for NoAncestry {
    fn superclass(&self, _internal_name: &str) -> Option<Arc<str>> {
        None
    }
}

/// One row of the type mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappingEntry {
    /// The accessor-facing type name emitted into generated source
    pub external_type: String,
    /// The container method fetching the per-occurrence accessor, e.g. `getIntegers()`
    pub accessor_method: String,
    /// Whether the external type is a wrapper object that replaces the documented
    /// type entirely (no primitive casting possible)
    pub is_wrapper: bool,
}

/// The fixed table from runtime type tags to container accessors.
pub struct TypeMappingRegistry {
    entries: HashMap<TypeTag, TypeMappingEntry>,
}

impl TypeMappingRegistry {
    /// An empty registry; useful for tests and exotic containers.
    #[must_use]
    pub fn new() -> Self {
        TypeMappingRegistry {
            entries: HashMap::new(),
        }
    }

    /// The standard table for the vanilla container API.
    ///
    /// `server_package` is the internal-name prefix of the obfuscated server classes
    /// (e.g. `net/minecraft/server/v1_15_R1`); domain value types are registered
    /// under it.
    #[must_use]
    pub fn standard(server_package: &str) -> Self {
        let mut registry = TypeMappingRegistry::new();

        let nms = |class: &str| TypeTag::object(&format!("{server_package}/{class}"));

        registry.insert(TypeTag::Boolean, "boolean", "getBooleans()", false);
        registry.insert(TypeTag::Byte, "byte", "getBytes()", false);
        registry.insert(TypeTag::Short, "short", "getShorts()", false);
        registry.insert(TypeTag::Int, "int", "getIntegers()", false);
        registry.insert(TypeTag::Long, "long", "getLongs()", false);
        registry.insert(TypeTag::Float, "float", "getFloat()", false);
        registry.insert(TypeTag::Double, "double", "getDoubles()", false);

        registry.insert(TypeTag::array(TypeTag::Byte), "byte[]", "getByteArrays()", false);
        registry.insert(TypeTag::array(TypeTag::Int), "int[]", "getIntegerArrays()", false);
        registry.insert(
            TypeTag::array(TypeTag::object("java/lang/String")),
            "String[]",
            "getStringArrays()",
            false,
        );
        registry.insert(
            TypeTag::array(nms("IChatBaseComponent")),
            "WrappedChatComponent[]",
            "getChatComponentArrays()",
            true,
        );

        registry.insert(TypeTag::object("java/lang/String"), "String", "getStrings()", false);
        registry.insert(TypeTag::object("java/util/UUID"), "UUID", "getUUIDs()", false);
        registry.insert(
            TypeTag::object("java/lang/Enum"),
            "Enum<?>",
            "getSpecificModifier(Enum.class)",
            false,
        );
        // Two historical rows share the List key; the position-list row is the
        // surviving one.
        registry.insert(
            TypeTag::object("java/util/List"),
            "List<BlockPosition>",
            "getBlockPositionCollectionModifier()",
            true,
        );
        registry.insert(
            TypeTag::object("java/util/Map"),
            "Map<?,?>",
            "getSpecificModifier(Map.class)",
            false,
        );
        registry.insert(
            TypeTag::object("java/util/Set"),
            "Set<?>",
            "getSpecificModifier(Set.class)",
            false,
        );
        registry.insert(
            TypeTag::object("java/security/PublicKey"),
            "PublicKey",
            "getSpecificModifier(PublicKey.class)",
            false,
        );
        registry.insert(
            TypeTag::object("com/mojang/authlib/GameProfile"),
            "WrappedGameProfile",
            "getGameProfiles()",
            true,
        );

        registry.insert(nms("Block"), "Material", "getBlocks()", true);
        registry.insert(nms("IBlockData"), "WrappedBlockData", "getBlockData()", false);
        registry.insert(nms("BlockPosition"), "BlockPosition", "getBlockPositionModifier()", true);
        registry.insert(
            nms("IChatBaseComponent"),
            "WrappedChatComponent",
            "getChatComponents()",
            true,
        );
        registry.insert(
            nms("ChunkCoordIntPair"),
            "ChunkCoordIntPair",
            "getChunkCoordIntPairs()",
            true,
        );
        registry.insert(
            nms("DataWatcher"),
            "WrappedDataWatcher",
            "getDataWatcherModifier()",
            true,
        );
        registry.insert(nms("EnumDifficulty"), "Difficulty", "getDifficulties()", false);
        registry.insert(nms("EnumHand"), "Hand", "getHands()", false);
        registry.insert(nms("ItemStack"), "ItemStack", "getItemModifier()", false);
        registry.insert(nms("MinecraftKey"), "MinecraftKey", "getMinecraftKeys()", false);
        registry.insert(nms("NBTTagCompound"), "NbtBase<?>", "getNbtModifier()", false);
        registry.insert(nms("ServerPing"), "WrappedServerPing", "getServerPings()", true);
        registry.insert(nms("SoundEffect"), "Sound", "getSoundEffects()", false);
        registry.insert(nms("SoundCategory"), "SoundCategory", "getSoundCategories()", false);
        registry.insert(nms("Vec3D"), "Vector", "getVectors()", false);
        registry.insert(nms("WorldType"), "WorldType", "getWorldTypeModifier()", false);

        registry
    }

    /// Register (or replace) a table row.
    pub fn insert(&mut self, tag: TypeTag, external_type: &str, accessor_method: &str, is_wrapper: bool) {
        self.entries.insert(
            tag,
            TypeMappingEntry {
                external_type: external_type.to_string(),
                accessor_method: accessor_method.to_string(),
                is_wrapper,
            },
        );
    }

    /// Look up the mapping for a tag, walking the superclass chain of object tags.
    ///
    /// The walk tries the exact tag first, then each ancestor in order, so the
    /// nearest registered ancestor wins. `java/lang/Object` itself never matches,
    /// mirroring the exclusive upper bound of the original table. Returns `None`
    /// when neither the tag nor any ancestor is registered, and likewise when the
    /// oracle reports a cyclic chain; the reconciler turns both into a degraded
    /// field.
    #[must_use]
    pub fn lookup(&self, tag: &TypeTag, ancestry: &dyn TypeAncestry) -> Option<&TypeMappingEntry> {
        let mut current = tag.clone();

        for _ in 0..MAX_LOOKUP_DEPTH {
            if let TypeTag::Object(name) = &current {
                if name.as_ref() == "java/lang/Object" {
                    return None;
                }
            }

            if let Some(entry) = self.entries.get(&current) {
                return Some(entry);
            }

            match &current {
                TypeTag::Object(name) => match ancestry.superclass(name) {
                    Some(parent) => current = TypeTag::Object(parent),
                    None => return None,
                },
                // Primitive and array tags have no ancestry to walk
                _ => return None,
            }
        }

        log::warn!("type mapping lookup for {tag} abandoned after {MAX_LOOKUP_DEPTH} ancestry hops");
        None
    }
}

impl Default for TypeMappingRegistry {
    fn default() -> Self {
        Self::standard("net/minecraft/server")
    }
}
