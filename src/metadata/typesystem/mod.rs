//! JVM type model.
//!
//! Every type the analysis talks about is a [`TypeRef`]: a primitive, a class, an array, a
//! parameterized or raw class, a wildcard, a captured wildcard, a type variable, an
//! intersection, or one of the two synthetic types (bottom and null). Class-like and
//! type-variable nodes live in the [`TypeRegistry`] and are addressed by [`ClassId`] and
//! [`GenericParamId`]; the structural variants are shared, immutable values.
//!
//! # Key Components
//!
//! - [`TypeRef`]: the closed set of type variants, dispatched through [`TypeVisitor`]
//! - [`TypeRegistry`]: arenas for classes, generic parameters and members, plus the name index
//! - [`ClassNode`] / [`TypeDefinition`]: an interned class and, once loaded, its definition
//! - [`OwnedCollection`]: ordered member lists whose elements point back at their owner
//! - [`PrimitiveKind`]: the nine primitive kinds (including `void`)
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::metadata::typesystem::{TypeRef, TypeRegistry};
//!
//! let types = TypeRegistry::new();
//! let strings = TypeRef::array(TypeRef::STRING);
//!
//! assert_eq!(strings.name(&types), "String[]");
//! assert_eq!(strings.full_name(&types), "java.lang.String[]");
//! assert_eq!(strings.internal_name(&types), "[java/lang/String");
//! assert_eq!(strings.erased_signature(&types), "[Ljava/lang/String;");
//! ```

pub mod arena;
mod base;
mod collection;
mod definition;
mod primitives;
mod registry;
mod visitor;

pub use base::{
    ArrayType, CapturedType, CompoundType, ParameterizedType, TypeRef, WildcardBound,
    WildcardType, BOTTOM_TYPE_NAME, NULL_TYPE_NAME,
};
pub use collection::{CollectionLinker, OwnedCollection};
pub use definition::{
    ClassNode, GenericOwner, GenericParameterNode, ResolutionState, SignatureCache,
    TypeDefinition,
};
pub use primitives::PrimitiveKind;
pub use registry::TypeRegistry;
pub use visitor::TypeVisitor;

arena_id!(
    /// Identifies an interned class in the [`TypeRegistry`]
    ClassId
);
arena_id!(
    /// Identifies a type variable in the [`TypeRegistry`]
    GenericParamId
);

impl ClassId {
    /// `java/lang/Object`
    pub const OBJECT: ClassId = ClassId(0);
    /// `java/lang/Class`
    pub const CLASS: ClassId = ClassId(1);
    /// `java/lang/String`
    pub const STRING: ClassId = ClassId(2);
    /// `java/lang/Enum`
    pub const ENUM: ClassId = ClassId(3);
    /// `java/lang/Cloneable`
    pub const CLONEABLE: ClassId = ClassId(4);
    /// `java/io/Serializable`
    pub const SERIALIZABLE: ClassId = ClassId(5);
    /// `java/lang/Number`
    pub const NUMBER: ClassId = ClassId(6);
    /// `java/lang/Comparable`
    pub const COMPARABLE: ClassId = ClassId(7);
    /// `java/lang/Throwable`
    pub const THROWABLE: ClassId = ClassId(8);
    /// `java/lang/Boolean`
    pub const BOOLEAN: ClassId = ClassId(9);
    /// `java/lang/Byte`
    pub const BYTE: ClassId = ClassId(10);
    /// `java/lang/Character`
    pub const CHARACTER: ClassId = ClassId(11);
    /// `java/lang/Short`
    pub const SHORT: ClassId = ClassId(12);
    /// `java/lang/Integer`
    pub const INTEGER: ClassId = ClassId(13);
    /// `java/lang/Long`
    pub const LONG: ClassId = ClassId(14);
    /// `java/lang/Float`
    pub const FLOAT: ClassId = ClassId(15);
    /// `java/lang/Double`
    pub const DOUBLE: ClassId = ClassId(16);
    /// `java/lang/Void`
    pub const VOID: ClassId = ClassId(17);

    /// The primitive kind this wrapper class boxes, if it is one.
    #[must_use]
    pub fn unboxed_kind(self) -> Option<PrimitiveKind> {
        let kind = match self {
            ClassId::BOOLEAN => PrimitiveKind::Boolean,
            ClassId::BYTE => PrimitiveKind::Byte,
            ClassId::CHARACTER => PrimitiveKind::Char,
            ClassId::SHORT => PrimitiveKind::Short,
            ClassId::INTEGER => PrimitiveKind::Int,
            ClassId::LONG => PrimitiveKind::Long,
            ClassId::FLOAT => PrimitiveKind::Float,
            ClassId::DOUBLE => PrimitiveKind::Double,
            ClassId::VOID => PrimitiveKind::Void,
            _ => return None,
        };
        Some(kind)
    }
}
