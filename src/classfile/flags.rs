//! Access flag bitmasks for classes, fields, and methods.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// JVM access and property flags.
    ///
    /// The class file format reuses the same bit positions for class, field, and
    /// method flags with context-dependent meanings; only the bits this tool
    /// inspects are named (the rest are carried through untouched by
    /// `from_bits_retain`).
    pub struct AccessFlags: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Declared protected
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Class: treat superclass methods specially in invokespecial
        const SUPER = 0x0020;
        /// Class: is an interface
        const INTERFACE = 0x0200;
        /// Class or method: declared abstract
        const ABSTRACT = 0x0400;
        /// Compiler-generated, not present in source
        const SYNTHETIC = 0x1000;
        /// Class: declared as an enum type
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Build flags from the raw class file value, keeping unrecognized bits.
    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Returns `true` if the `STATIC` bit is set.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.contains(AccessFlags::STATIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_unknown_bits() {
        let flags = AccessFlags::from_raw(0x0808);
        assert!(flags.is_static());
        assert_eq!(flags.bits(), 0x0808);
    }
}
