//! Access and property flags shared by types, fields, methods and parameters.
//!
//! The low 16 bits hold the raw `access_flags` values of the class-file format. Several bit
//! values are reused by the format for different member kinds (`ACC_SUPER` and
//! `ACC_SYNCHRONIZED`, `ACC_VOLATILE` and `ACC_BRIDGE`, `ACC_TRANSIENT` and `ACC_VARARGS`), so
//! those constants alias each other here too. The bits above 16 are markers set while decoding
//! or rewriting the model; they never come from the binary.

use bitflags::bitflags;

/// Mask selecting the bits that come straight from a class-file `access_flags` field.
pub const ACCESS_FLAGS_MASK: u64 = 0xFFFF;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Access flags and model markers for types and members
    pub struct Flags: u64 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private`
        const PRIVATE = 0x0002;
        /// Declared `protected`
        const PROTECTED = 0x0004;
        /// Declared `static`
        const STATIC = 0x0008;
        /// Declared `final`
        const FINAL = 0x0010;
        /// Treat superclass methods specially on `invokespecial` (types only)
        const SUPER = 0x0020;
        /// Declared `synchronized` (methods only)
        const SYNCHRONIZED = 0x0020;
        /// Declared `volatile` (fields only)
        const VOLATILE = 0x0040;
        /// A compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared `transient` (fields only)
        const TRANSIENT = 0x0080;
        /// Declared with a variable number of arguments (methods only)
        const VARARGS = 0x0080;
        /// Declared `native`
        const NATIVE = 0x0100;
        /// An interface
        const INTERFACE = 0x0200;
        /// Declared `abstract`
        const ABSTRACT = 0x0400;
        /// Declared `strictfp`
        const STRICT = 0x0800;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
        /// An annotation interface
        const ANNOTATION = 0x2000;
        /// An enum type or enum constant field
        const ENUM = 0x4000;
        /// Implicitly declared (parameters only)
        const MANDATED = 0x8000;
        /// A module descriptor
        const MODULE = 0x8000;

        /// Carries a `Deprecated` attribute
        const DEPRECATED = 1 << 17;
        /// A local or anonymous type, or a type reparented into its enum
        const ANONYMOUS = 1 << 18;
        /// A non-abstract interface method
        const DEFAULT = 1 << 19;
        /// The constructor of an anonymous type
        const ANONCONSTR = 1 << 20;
        /// Already visited by the anonymous-enum pass
        const DEOBFUSCATED = 1 << 21;
    }
}

impl Flags {
    /// Build flags from a raw `access_flags` value.
    #[must_use]
    pub fn from_access(access: u16) -> Self {
        Flags::from_bits_retain(u64::from(access))
    }

    /// Only the bits that belong in a class-file `access_flags` field.
    #[must_use]
    pub fn access(self) -> u16 {
        (self.bits() & ACCESS_FLAGS_MASK) as u16
    }

    /// Replace the access bits, keeping every model marker.
    #[must_use]
    pub fn with_access(self, access: u16) -> Self {
        Flags::from_bits_retain((self.bits() & !ACCESS_FLAGS_MASK) | u64::from(access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_access() {
        let flags = Flags::from_access(0x4031);
        assert!(flags.contains(Flags::PUBLIC | Flags::FINAL | Flags::SUPER | Flags::ENUM));
        assert!(!flags.contains(Flags::INTERFACE));
        assert_eq!(flags.access(), 0x4031);
    }

    #[test]
    fn test_with_access_keeps_markers() {
        let flags = (Flags::PUBLIC | Flags::ANONYMOUS | Flags::DEOBFUSCATED).with_access(0x0010);

        assert!(flags.contains(Flags::FINAL));
        assert!(!flags.contains(Flags::PUBLIC));
        assert!(flags.contains(Flags::ANONYMOUS | Flags::DEOBFUSCATED));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Flags::SUPER, Flags::SYNCHRONIZED);
        assert_eq!(Flags::VOLATILE, Flags::BRIDGE);
        assert_eq!(Flags::TRANSIENT, Flags::VARARGS);
    }
}
