use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::metadata::{
    signatures::encoders,
    typesystem::{ClassId, GenericParamId, PrimitiveKind, TypeRegistry, TypeVisitor},
};

/// Display name of the universal subtype.
pub const BOTTOM_TYPE_NAME: &str = "__Bottom";
/// Display name of the null type.
pub const NULL_TYPE_NAME: &str = "__Null";

/// A reference to a type.
///
/// The variant set is closed; code that needs per-variant behavior matches on it or implements
/// [`TypeVisitor`]. Class-like references only carry a [`ClassId`]: names, definitions and
/// members live in the [`TypeRegistry`], so a `TypeRef` is cheap to clone and compare.
///
/// Equality is structural: two parameterized references are equal when they name the same
/// class with equal arguments, no matter where they were built. Captured types are the only
/// exception; each capture is a fresh type and only equals itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive or `void`
    Primitive(PrimitiveKind),
    /// A declared class or interface used without type arguments
    Class(ClassId),
    /// An array of some element type
    Array(Arc<ArrayType>),
    /// A generic class applied to type arguments
    Parameterized(Arc<ParameterizedType>),
    /// A generic class used without type arguments (its erasure)
    Raw(ClassId),
    /// `?`, `? extends T` or `? super T`, only valid as a type argument
    Wildcard(Arc<WildcardType>),
    /// A wildcard after capture conversion
    Captured(Arc<CapturedType>),
    /// A declared type variable
    GenericParameter(GenericParamId),
    /// An intersection of bounds, as in `T extends A & B`
    Compound(Arc<CompoundType>),
    /// The universal subtype, e.g. the lower bound of `? extends T`
    Bottom,
    /// The type of `null`
    Null,
}

/// Element type of an array.
///
/// Names are derived from the element on every call; the element's declaring type and simple
/// name can still change after the array reference is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    element: TypeRef,
}

impl ArrayType {
    /// The element type.
    #[must_use]
    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}

/// A generic definition applied to type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    /// The generic class
    pub definition: ClassId,
    /// One argument per declared type parameter, in declaration order
    pub type_arguments: Vec<TypeRef>,
}

/// The bound of a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(TypeRef),
    /// `? super T`
    Super(TypeRef),
}

/// A wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardType {
    /// The declared bound
    pub bound: WildcardBound,
}

impl WildcardType {
    /// `true` for `? extends T`.
    #[must_use]
    pub fn has_extends_bound(&self) -> bool {
        matches!(self.bound, WildcardBound::Extends(_))
    }

    /// `true` for `? super T`.
    #[must_use]
    pub fn has_super_bound(&self) -> bool {
        matches!(self.bound, WildcardBound::Super(_))
    }

    /// `true` for `?`.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        matches!(self.bound, WildcardBound::Unbounded)
    }

    /// The declared upper bound, or `Object`.
    #[must_use]
    pub fn extends_bound(&self) -> TypeRef {
        match &self.bound {
            WildcardBound::Extends(bound) => bound.clone(),
            _ => TypeRef::OBJECT,
        }
    }

    /// The declared lower bound, or [`TypeRef::Bottom`].
    #[must_use]
    pub fn super_bound(&self) -> TypeRef {
        match &self.bound {
            WildcardBound::Super(bound) => bound.clone(),
            _ => TypeRef::Bottom,
        }
    }
}

/// A fresh type variable produced by capture conversion.
///
/// Every `CapturedType` is distinct: equality and hashing go by address.
#[derive(Debug)]
pub struct CapturedType {
    super_bound: TypeRef,
    extends_bound: TypeRef,
    wildcard: WildcardType,
}

impl CapturedType {
    /// Create a captured type.
    ///
    /// An absent `super_bound` becomes [`TypeRef::Bottom`] and an absent `extends_bound`
    /// becomes `Object`.
    #[must_use]
    pub fn new(
        super_bound: Option<TypeRef>,
        extends_bound: Option<TypeRef>,
        wildcard: WildcardType,
    ) -> Self {
        CapturedType {
            super_bound: super_bound.unwrap_or(TypeRef::Bottom),
            extends_bound: extends_bound.unwrap_or(TypeRef::OBJECT),
            wildcard,
        }
    }

    /// The lower bound; [`TypeRef::Bottom`] if there is none.
    #[must_use]
    pub fn super_bound(&self) -> &TypeRef {
        &self.super_bound
    }

    /// The upper bound; `Object` if there is none.
    #[must_use]
    pub fn extends_bound(&self) -> &TypeRef {
        &self.extends_bound
    }

    /// The wildcard this type was captured from.
    #[must_use]
    pub fn wildcard(&self) -> &WildcardType {
        &self.wildcard
    }

    /// `true` unless the lower bound is [`TypeRef::Bottom`].
    #[must_use]
    pub fn has_super_bound(&self) -> bool {
        self.super_bound != TypeRef::Bottom
    }

    /// `true` unless the upper bound is `Object`.
    #[must_use]
    pub fn has_extends_bound(&self) -> bool {
        self.extends_bound != TypeRef::OBJECT
    }
}

impl PartialEq for CapturedType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for CapturedType {}

impl Hash for CapturedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

/// An intersection type: an optional class bound plus interface bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundType {
    /// The class component, if any
    pub base: Option<TypeRef>,
    /// The interface components, in declaration order
    pub interfaces: Vec<TypeRef>,
}

impl CompoundType {
    /// Every component, class bound first.
    pub fn components(&self) -> impl Iterator<Item = &TypeRef> {
        self.base.iter().chain(self.interfaces.iter())
    }
}

impl TypeRef {
    /// `boolean`
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveKind::Boolean);
    /// `byte`
    pub const BYTE: TypeRef = TypeRef::Primitive(PrimitiveKind::Byte);
    /// `char`
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveKind::Char);
    /// `short`
    pub const SHORT: TypeRef = TypeRef::Primitive(PrimitiveKind::Short);
    /// `int`
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveKind::Int);
    /// `long`
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveKind::Long);
    /// `float`
    pub const FLOAT: TypeRef = TypeRef::Primitive(PrimitiveKind::Float);
    /// `double`
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveKind::Double);
    /// `void`
    pub const VOID: TypeRef = TypeRef::Primitive(PrimitiveKind::Void);
    /// `java.lang.Object`
    pub const OBJECT: TypeRef = TypeRef::Class(ClassId::OBJECT);
    /// `java.lang.String`
    pub const STRING: TypeRef = TypeRef::Class(ClassId::STRING);
    /// `java.lang.Class`
    pub const CLASS: TypeRef = TypeRef::Class(ClassId::CLASS);

    /// An array of `element`.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Arc::new(ArrayType { element }))
    }

    /// `element` wrapped in `rank` array dimensions.
    #[must_use]
    pub fn array_of_rank(element: TypeRef, rank: usize) -> Self {
        (0..rank).fold(element, |element, _| TypeRef::array(element))
    }

    /// `definition<arguments...>`.
    #[must_use]
    pub fn parameterized(definition: ClassId, type_arguments: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized(Arc::new(ParameterizedType {
            definition,
            type_arguments,
        }))
    }

    /// `?`
    #[must_use]
    pub fn unbounded_wildcard() -> Self {
        TypeRef::Wildcard(Arc::new(WildcardType {
            bound: WildcardBound::Unbounded,
        }))
    }

    /// `? extends bound`
    #[must_use]
    pub fn extends_wildcard(bound: TypeRef) -> Self {
        TypeRef::Wildcard(Arc::new(WildcardType {
            bound: WildcardBound::Extends(bound),
        }))
    }

    /// `? super bound`
    #[must_use]
    pub fn super_wildcard(bound: TypeRef) -> Self {
        TypeRef::Wildcard(Arc::new(WildcardType {
            bound: WildcardBound::Super(bound),
        }))
    }

    /// A fresh captured type; see [`CapturedType::new`].
    #[must_use]
    pub fn captured(
        super_bound: Option<TypeRef>,
        extends_bound: Option<TypeRef>,
        wildcard: WildcardType,
    ) -> Self {
        TypeRef::Captured(Arc::new(CapturedType::new(
            super_bound,
            extends_bound,
            wildcard,
        )))
    }

    /// The intersection of `base` and `interfaces`.
    #[must_use]
    pub fn compound(base: Option<TypeRef>, interfaces: Vec<TypeRef>) -> Self {
        TypeRef::Compound(Arc::new(CompoundType { base, interfaces }))
    }

    /// Dispatch to the visitor method for this variant.
    pub fn accept<V, P, R>(&self, visitor: &mut V, param: P) -> R
    where
        V: TypeVisitor<P, R> + ?Sized,
    {
        match self {
            TypeRef::Primitive(kind) => visitor.visit_primitive(self, *kind, param),
            TypeRef::Class(id) => visitor.visit_class(self, *id, param),
            TypeRef::Array(array) => visitor.visit_array(self, array, param),
            TypeRef::Parameterized(parameterized) => {
                visitor.visit_parameterized(self, parameterized, param)
            }
            TypeRef::Raw(id) => visitor.visit_raw(self, *id, param),
            TypeRef::Wildcard(wildcard) => visitor.visit_wildcard(self, wildcard, param),
            TypeRef::Captured(captured) => visitor.visit_captured(self, captured, param),
            TypeRef::GenericParameter(id) => visitor.visit_generic_parameter(self, *id, param),
            TypeRef::Compound(compound) => visitor.visit_compound(self, compound, param),
            TypeRef::Bottom => visitor.visit_bottom(self, param),
            TypeRef::Null => visitor.visit_null(self, param),
        }
    }

    /// The primitive kind, for primitives and `void`.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// `true` for primitives (including `void`).
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Void))
    }

    /// `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    /// `true` for wildcards.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, TypeRef::Wildcard(_))
    }

    /// `true` for type variables.
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeRef::GenericParameter(_))
    }

    /// `true` for intersection types.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        matches!(self, TypeRef::Compound(_))
    }

    /// `true` for class, raw and parameterized references.
    #[must_use]
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            TypeRef::Class(_) | TypeRef::Raw(_) | TypeRef::Parameterized(_)
        )
    }

    /// The class a class-like reference names.
    #[must_use]
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            TypeRef::Class(id) | TypeRef::Raw(id) => Some(*id),
            TypeRef::Parameterized(parameterized) => Some(parameterized.definition),
            _ => None,
        }
    }

    /// The element type of an array.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(array) => Some(&array.element),
            _ => None,
        }
    }

    /// The type arguments of a parameterized reference; empty otherwise.
    #[must_use]
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameterized(parameterized) => &parameterized.type_arguments,
            _ => &[],
        }
    }

    /// `true` if this reference names `id` (class, raw or parameterized).
    #[must_use]
    pub fn names_class(&self, id: ClassId) -> bool {
        self.class_id() == Some(id)
    }

    /// Short display name: `String`, `int[]`, `Map$Entry`, `T`, `? extends Number`.
    ///
    /// Parameterized references use the name of their definition; type arguments are not
    /// part of the name.
    #[must_use]
    pub fn name(&self, types: &TypeRegistry) -> String {
        match self {
            TypeRef::Primitive(kind) => kind.name().to_string(),
            TypeRef::Class(id) | TypeRef::Raw(id) => types.class(*id).name().to_string(),
            TypeRef::Parameterized(parameterized) => {
                types.class(parameterized.definition).name().to_string()
            }
            TypeRef::Array(array) => format!("{}[]", array.element.name(types)),
            TypeRef::GenericParameter(id) => types.generic_parameter(*id).name().to_string(),
            TypeRef::Wildcard(wildcard) => wildcard_name(types, wildcard, false),
            TypeRef::Captured(captured) => {
                format!("capture of {}", wildcard_name(types, &captured.wildcard, false))
            }
            TypeRef::Compound(compound) => compound
                .components()
                .map(|component| component.name(types))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeRef::Bottom => BOTTOM_TYPE_NAME.to_string(),
            TypeRef::Null => NULL_TYPE_NAME.to_string(),
        }
    }

    /// Dotted, qualified display name: `java.lang.String`, `java.util.Map.Entry`, `int[][]`.
    #[must_use]
    pub fn full_name(&self, types: &TypeRegistry) -> String {
        match self {
            TypeRef::Class(id) | TypeRef::Raw(id) => types.full_name(*id),
            TypeRef::Parameterized(parameterized) => types.full_name(parameterized.definition),
            TypeRef::Array(array) => format!("{}[]", array.element.full_name(types)),
            TypeRef::Wildcard(wildcard) => wildcard_name(types, wildcard, true),
            TypeRef::Captured(captured) => {
                format!("capture of {}", wildcard_name(types, &captured.wildcard, true))
            }
            TypeRef::Compound(compound) => compound
                .components()
                .map(|component| component.full_name(types))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeRef::Primitive(_) | TypeRef::GenericParameter(_) | TypeRef::Bottom | TypeRef::Null => {
                self.name(types)
            }
        }
    }

    /// Binary-format name: `java/lang/String`, `I`, `[java/lang/String`.
    ///
    /// Arrays prefix the element's internal name with `[`. Type variables, wildcards and
    /// intersections use the internal name of their upper bound.
    #[must_use]
    pub fn internal_name(&self, types: &TypeRegistry) -> String {
        match self {
            TypeRef::Primitive(kind) => kind.descriptor().to_string(),
            TypeRef::Class(id) | TypeRef::Raw(id) => types.class(*id).internal_name().to_string(),
            TypeRef::Parameterized(parameterized) => types
                .class(parameterized.definition)
                .internal_name()
                .to_string(),
            TypeRef::Array(array) => format!("[{}", array.element.internal_name(types)),
            TypeRef::GenericParameter(id) => match types.generic_parameter(*id).extends_bound() {
                Some(bound) => bound.internal_name(types),
                None => types.class(ClassId::OBJECT).internal_name().to_string(),
            },
            TypeRef::Wildcard(wildcard) => wildcard.extends_bound().internal_name(types),
            TypeRef::Captured(captured) => captured.extends_bound.internal_name(types),
            TypeRef::Compound(compound) => match compound.components().next() {
                Some(first) => first.internal_name(types),
                None => types.class(ClassId::OBJECT).internal_name().to_string(),
            },
            TypeRef::Bottom | TypeRef::Null => self.name(types),
        }
    }

    /// Dotted package name; empty for primitives, type variables and the default package.
    #[must_use]
    pub fn package_name(&self, types: &TypeRegistry) -> String {
        match self {
            TypeRef::Class(id) | TypeRef::Raw(id) => types.class(*id).package_name().to_string(),
            TypeRef::Parameterized(parameterized) => types
                .class(parameterized.definition)
                .package_name()
                .to_string(),
            TypeRef::Array(array) => array.element.package_name(types),
            _ => String::new(),
        }
    }

    /// Generic-aware signature: `Ljava/util/List<TE;>;`, `[I`, `TT;`, `+Ljava/lang/Number;`.
    #[must_use]
    pub fn signature(&self, types: &TypeRegistry) -> String {
        let mut out = String::new();
        encoders::append_signature(types, self, &mut out);
        out
    }

    /// Erased signature (a field descriptor): `Ljava/util/List;`, `[I`, `Ljava/lang/Object;`.
    #[must_use]
    pub fn erased_signature(&self, types: &TypeRegistry) -> String {
        let mut out = String::new();
        encoders::append_erased_signature(types, self, &mut out);
        out
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        TypeRef::Class(id)
    }
}

fn wildcard_name(types: &TypeRegistry, wildcard: &WildcardType, full: bool) -> String {
    let render = |bound: &TypeRef| {
        if full {
            bound.full_name(types)
        } else {
            bound.name(types)
        }
    };

    match &wildcard.bound {
        WildcardBound::Unbounded => "?".to_string(),
        WildcardBound::Extends(bound) => format!("? extends {}", render(bound)),
        WildcardBound::Super(bound) => format!("? super {}", render(bound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_names() {
        let types = TypeRegistry::new();
        let element = TypeRef::STRING;
        let array = TypeRef::array(element.clone());
        let nested = TypeRef::array(array.clone());

        assert_eq!(array.full_name(&types), "java.lang.String[]");
        assert_eq!(array.name(&types), "String[]");
        assert_eq!(array.internal_name(&types), "[java/lang/String");
        assert_eq!(
            nested.full_name(&types),
            format!("{}[]", array.full_name(&types))
        );
        assert_eq!(
            nested.internal_name(&types),
            format!("[{}", array.internal_name(&types))
        );
        assert_eq!(TypeRef::array(TypeRef::INT).internal_name(&types), "[I");
        assert_eq!(TypeRef::array(TypeRef::INT).name(&types), "int[]");
    }

    #[test]
    fn test_structural_equality() {
        let a = TypeRef::parameterized(ClassId::CLASS, vec![TypeRef::extends_wildcard(TypeRef::STRING)]);
        let b = TypeRef::parameterized(ClassId::CLASS, vec![TypeRef::extends_wildcard(TypeRef::STRING)]);

        assert_eq!(a, b);
        assert_eq!(TypeRef::array(TypeRef::INT), TypeRef::array(TypeRef::INT));
        assert_ne!(TypeRef::Class(ClassId::CLASS), TypeRef::Raw(ClassId::CLASS));
    }

    #[test]
    fn test_captured_identity() {
        let wildcard = WildcardType {
            bound: WildcardBound::Unbounded,
        };
        let a = TypeRef::captured(None, None, wildcard.clone());
        let b = TypeRef::captured(None, None, wildcard);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_capture_defaults() {
        let captured = CapturedType::new(
            None,
            None,
            WildcardType {
                bound: WildcardBound::Unbounded,
            },
        );

        assert_eq!(captured.super_bound(), &TypeRef::Bottom);
        assert!(!captured.has_super_bound());
        assert_eq!(captured.extends_bound(), &TypeRef::OBJECT);
        assert!(!captured.has_extends_bound());

        let bounded = CapturedType::new(
            Some(TypeRef::STRING),
            Some(TypeRef::CLASS),
            WildcardType {
                bound: WildcardBound::Super(TypeRef::STRING),
            },
        );
        assert!(bounded.has_super_bound());
        assert!(bounded.has_extends_bound());
    }

    #[test]
    fn test_wildcard_names() {
        let types = TypeRegistry::new();

        assert_eq!(TypeRef::unbounded_wildcard().name(&types), "?");
        assert_eq!(
            TypeRef::extends_wildcard(TypeRef::STRING).full_name(&types),
            "? extends java.lang.String"
        );
        assert_eq!(
            TypeRef::super_wildcard(TypeRef::STRING).name(&types),
            "? super String"
        );
        assert_eq!(TypeRef::Bottom.name(&types), "__Bottom");
        assert_eq!(TypeRef::Null.full_name(&types), "__Null");
    }

    #[test]
    fn test_class_accessors() {
        let list = TypeRef::parameterized(ClassId::CLASS, vec![TypeRef::STRING]);

        assert_eq!(list.class_id(), Some(ClassId::CLASS));
        assert_eq!(list.type_arguments(), &[TypeRef::STRING]);
        assert!(list.is_class_like());
        assert!(TypeRef::OBJECT.names_class(ClassId::OBJECT));
        assert_eq!(TypeRef::array_of_rank(TypeRef::INT, 2).element_type(), Some(&TypeRef::array(TypeRef::INT)));
    }
}
