//! Type relations over the resolved model.
//!
//! [`TypeAlgebra`] answers the questions later analysis stages ask about types: is one a
//! subtype of another, what does a parameterized type look like when viewed as one of its
//! supertypes, what is its erasure, and which kind of conversion turns a value of one type
//! into another. It borrows the [`MetadataSystem`] mutably because answering may load classes
//! on demand.
//!
//! No query fails. A class that cannot be resolved behaves like a direct subclass of `Object`
//! with no interfaces, and queries that would recurse without bound give up with the
//! conservative answer.
//!
//! A bare [`TypeRef::Class`] naming a generic class is the raw view of that class (it is what
//! descriptors produce). The generic definition seen from inside is the class parameterized by
//! its own type variables.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jvmscope::metadata::{loader::ClasspathTypeLoader, resolver::MetadataSystem};
//!
//! let mut system = MetadataSystem::new(ClasspathTypeLoader::from_env());
//! let list = system.parse_type_signature("Ljava/util/ArrayList<Ljava/lang/String;>;")?;
//! let collection = system.parse_internal_name("java/util/Collection")?;
//!
//! let mut algebra = system.algebra();
//! assert!(algebra.is_sub_type(&list, &collection));
//! let view = algebra.as_super(&list, &collection).unwrap();
//! println!("{}", view.signature(algebra.types()));
//! # Ok::<(), jvmscope::Error>(())
//! ```

mod conversion;
mod erasure;
mod relations;

pub use conversion::ConversionType;
pub use erasure::{capture_wildcard, GenericMapping};

use rustc_hash::FxHashSet;

use crate::metadata::{
    resolver::MetadataSystem,
    typesystem::{ClassId, GenericParamId, PrimitiveKind, TypeRef, TypeRegistry, WildcardBound},
};

/// Nesting limit for recursive queries
const MAX_ALGEBRA_DEPTH: usize = 64;

/// Structural type queries over a [`MetadataSystem`].
pub struct TypeAlgebra<'s> {
    system: &'s mut MetadataSystem,
    /// Argument pairs whose containment is being checked, to break F-bounded cycles
    contains_in_progress: FxHashSet<(TypeRef, TypeRef)>,
    depth: usize,
}

impl MetadataSystem {
    /// Type relations over this system's registry.
    pub fn algebra(&mut self) -> TypeAlgebra<'_> {
        TypeAlgebra::new(self)
    }
}

impl<'s> TypeAlgebra<'s> {
    /// Create an algebra over `system`.
    pub fn new(system: &'s mut MetadataSystem) -> Self {
        TypeAlgebra {
            system,
            contains_in_progress: FxHashSet::default(),
            depth: 0,
        }
    }

    /// The registry the algebra reads from.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        self.system.types()
    }

    /// The underlying system, for loading or parsing in between queries.
    pub fn system(&mut self) -> &mut MetadataSystem {
        self.system
    }

    fn nested<T>(&mut self, fallback: T, query: impl FnOnce(&mut Self) -> T) -> T {
        if self.depth >= MAX_ALGEBRA_DEPTH {
            return fallback;
        }

        self.depth += 1;
        let result = query(self);
        self.depth -= 1;
        result
    }

    fn resolve_class_like(&mut self, ty: &TypeRef) -> Option<ClassId> {
        ty.class_id().and_then(|id| self.system.resolve_class(id))
    }

    fn is_interface(&mut self, ty: &TypeRef) -> bool {
        self.resolve_class_like(ty)
            .and_then(|id| self.types().definition(id))
            .is_some_and(|definition| definition.is_interface())
    }

    fn is_generic_class(&mut self, id: ClassId) -> bool {
        self.system
            .resolve_class(id)
            .and_then(|id| self.types().definition(id))
            .is_some_and(|definition| definition.is_generic_definition())
    }

    fn class_generic_parameters(&mut self, id: ClassId) -> Vec<GenericParamId> {
        self.system
            .resolve_class(id)
            .and_then(|id| self.types().definition(id))
            .map(|definition| definition.generic_parameters().as_slice().to_vec())
            .unwrap_or_default()
    }

    fn parameter_bound(&self, id: GenericParamId) -> TypeRef {
        self.types()
            .generic_parameter(id)
            .extends_bound()
            .cloned()
            .unwrap_or(TypeRef::OBJECT)
    }

    /// The declared bound of a type variable, wildcard or captured type, if it has one.
    fn declared_upper_bound(&self, ty: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::GenericParameter(id) => {
                self.types().generic_parameter(*id).extends_bound().cloned()
            }
            TypeRef::Wildcard(wildcard) => match &wildcard.bound {
                WildcardBound::Extends(bound) => Some(bound.clone()),
                _ => None,
            },
            TypeRef::Captured(captured) if captured.has_extends_bound() => {
                Some(captured.extends_bound().clone())
            }
            _ => None,
        }
    }

    /// Rewrite a member type declared on `owner`'s class into `owner`'s view: substituted for
    /// parameterized owners, erased for raw ones.
    fn member_view(&mut self, owner: &TypeRef, generic: bool, declared: TypeRef) -> TypeRef {
        if !generic {
            return declared;
        }

        match owner {
            TypeRef::Parameterized(_) => self.substitute_generic_arguments(&declared, owner),
            _ => self.erase(&declared),
        }
    }

    /// The most specific type every value of `ty` is assignable to.
    ///
    /// Wildcards and captured types yield their extends bound, type variables the bound chain
    /// of their declaration; arrays are mapped element-wise. Anything else is its own upper
    /// bound.
    #[must_use]
    pub fn upper_bound(&self, ty: &TypeRef) -> TypeRef {
        self.upper_bound_at(ty, 0)
    }

    fn upper_bound_at(&self, ty: &TypeRef, depth: usize) -> TypeRef {
        if depth >= MAX_ALGEBRA_DEPTH {
            return TypeRef::OBJECT;
        }

        match ty {
            TypeRef::Wildcard(wildcard) => match &wildcard.bound {
                WildcardBound::Extends(bound) => self.upper_bound_at(bound, depth + 1),
                _ => TypeRef::OBJECT,
            },
            TypeRef::GenericParameter(id) => {
                match self.types().generic_parameter(*id).extends_bound() {
                    Some(bound) => self.upper_bound_at(bound, depth + 1),
                    None => TypeRef::OBJECT,
                }
            }
            TypeRef::Captured(captured) => self.upper_bound_at(captured.extends_bound(), depth + 1),
            TypeRef::Array(array) => {
                let element = self.upper_bound_at(array.element(), depth + 1);
                if element == *array.element() {
                    ty.clone()
                } else {
                    TypeRef::array(element)
                }
            }
            _ => ty.clone(),
        }
    }

    /// The most general type assignable to every value of `ty`.
    ///
    /// `? super T` yields the lower bound of `T`; other wildcards yield
    /// [`TypeRef::Bottom`]. Captured types yield their super bound.
    #[must_use]
    pub fn lower_bound(&self, ty: &TypeRef) -> TypeRef {
        Self::lower_bound_at(ty, 0)
    }

    fn lower_bound_at(ty: &TypeRef, depth: usize) -> TypeRef {
        if depth >= MAX_ALGEBRA_DEPTH {
            return TypeRef::Bottom;
        }

        match ty {
            TypeRef::Wildcard(wildcard) => match &wildcard.bound {
                WildcardBound::Super(bound) => Self::lower_bound_at(bound, depth + 1),
                _ => TypeRef::Bottom,
            },
            TypeRef::Captured(captured) => captured.super_bound().clone(),
            TypeRef::Array(array) => {
                let element = Self::lower_bound_at(array.element(), depth + 1);
                if element == *array.element() {
                    ty.clone()
                } else {
                    TypeRef::array(element)
                }
            }
            _ => ty.clone(),
        }
    }

    /// Element type of an array, looking through a wildcard's upper bound.
    #[must_use]
    pub fn element_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::Array(array) => Some(array.element().clone()),
            TypeRef::Wildcard(_) => self.upper_bound(ty).element_type().cloned(),
            _ => None,
        }
    }

    /// Number of array dimensions; `0` for non-arrays.
    #[must_use]
    pub fn array_rank(ty: &TypeRef) -> usize {
        let mut rank = 0;
        let mut current = ty;
        while let Some(element) = current.element_type() {
            rank += 1;
            current = element;
        }
        rank
    }

    /// The direct supertype of `ty`.
    ///
    /// For a class this is its superclass (the first superinterface for an interface without
    /// one), viewed through `ty`'s type arguments. Arrays of primitives or of `Object` have
    /// the intersection `Cloneable & Serializable` as supertype; other arrays the array of
    /// their element's supertype. Returns `None` for `Object`, primitives, the bottom type and
    /// `? super` wildcards.
    pub fn super_type(&mut self, ty: &TypeRef) -> Option<TypeRef> {
        self.nested(None, |algebra| algebra.super_type_of(ty))
    }

    fn super_type_of(&mut self, ty: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::Array(array) => {
                let element = array.element();
                if element.is_primitive() || *element == TypeRef::OBJECT {
                    Some(array_super_type())
                } else {
                    self.super_type(element).map(TypeRef::array)
                }
            }
            TypeRef::Class(_) | TypeRef::Raw(_) | TypeRef::Parameterized(_) => {
                if ty.names_class(ClassId::OBJECT) {
                    return None;
                }

                let Some(id) = self.resolve_class_like(ty) else {
                    return Some(TypeRef::OBJECT);
                };

                let (declared, generic) = {
                    let definition = self.types().definition(id)?;
                    let declared = if definition.is_interface() {
                        definition
                            .base_type
                            .clone()
                            .or_else(|| definition.interfaces.first().cloned())
                    } else {
                        definition.base_type.clone()
                    };
                    (declared?, definition.is_generic_definition())
                };

                Some(self.member_view(ty, generic, declared))
            }
            TypeRef::GenericParameter(id) => Some(self.parameter_bound(*id)),
            TypeRef::Captured(captured) => Some(captured.extends_bound().clone()),
            TypeRef::Wildcard(wildcard) => match &wildcard.bound {
                WildcardBound::Unbounded => Some(TypeRef::OBJECT),
                WildcardBound::Extends(bound) => Some(bound.clone()),
                WildcardBound::Super(_) => None,
            },
            TypeRef::Compound(compound) => compound.components().next().cloned(),
            TypeRef::Null => Some(TypeRef::OBJECT),
            TypeRef::Primitive(_) | TypeRef::Bottom => None,
        }
    }

    /// The declared superclass of a class-like type, viewed through its type arguments.
    ///
    /// Unlike [`Self::super_type`] this does not fall back to `Object` for unresolved classes
    /// and does not substitute a superinterface for an interface.
    pub fn base_type(&mut self, ty: &TypeRef) -> Option<TypeRef> {
        let id = self.resolve_class_like(ty)?;
        let (declared, generic) = {
            let definition = self.types().definition(id)?;
            (definition.base_type.clone()?, definition.is_generic_definition())
        };

        Some(self.member_view(ty, generic, declared))
    }

    /// The direct superinterfaces of `ty`, viewed through its type arguments.
    ///
    /// Type variables, wildcards and captured types report their bound when it is an
    /// interface, or the bound's interfaces otherwise. Intersections report their interface
    /// components.
    pub fn interfaces(&mut self, ty: &TypeRef) -> Vec<TypeRef> {
        self.nested(Vec::new(), |algebra| algebra.interfaces_of(ty))
    }

    fn interfaces_of(&mut self, ty: &TypeRef) -> Vec<TypeRef> {
        match ty {
            TypeRef::Class(_) | TypeRef::Raw(_) | TypeRef::Parameterized(_) => {
                let Some(id) = self.resolve_class_like(ty) else {
                    return Vec::new();
                };
                let Some((declared, generic)) = self
                    .types()
                    .definition(id)
                    .map(|definition| (definition.interfaces.clone(), definition.is_generic_definition()))
                else {
                    return Vec::new();
                };

                declared
                    .into_iter()
                    .map(|interface| self.member_view(ty, generic, interface))
                    .collect()
            }
            TypeRef::GenericParameter(_) | TypeRef::Wildcard(_) | TypeRef::Captured(_) => {
                match self.declared_upper_bound(ty) {
                    Some(bound) if self.is_interface(&bound) => vec![bound],
                    Some(bound) => self.interfaces(&bound),
                    None => Vec::new(),
                }
            }
            TypeRef::Compound(compound) => compound.interfaces.clone(),
            _ => Vec::new(),
        }
    }

    /// View `ty` as an instance of `target`'s class.
    ///
    /// Walks superclasses, then superinterfaces when `target` is an interface, and returns the
    /// first supertype naming the same class, with type arguments substituted along the way:
    /// `ArrayList<String>` seen as `Collection` is `Collection<String>`. Arrays answer with
    /// `target` itself when they are a subtype of it.
    pub fn as_super(&mut self, ty: &TypeRef, target: &TypeRef) -> Option<TypeRef> {
        self.nested(None, |algebra| algebra.as_super_of(ty, target))
    }

    fn as_super_of(&mut self, ty: &TypeRef, target: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::Array(_) => self.is_sub_type(ty, target).then(|| target.clone()),
            TypeRef::Class(_) | TypeRef::Raw(_) | TypeRef::Parameterized(_) => {
                let target_class = target.class_id()?;
                if ty.names_class(target_class) {
                    return Some(ty.clone());
                }

                if let Some(super_type) = self.super_type(ty) {
                    if super_type.is_class_like() || super_type.is_generic_parameter() {
                        if let Some(found) = self.as_super(&super_type, target) {
                            return Some(found);
                        }
                    }
                }

                if self.is_interface(target) {
                    for interface in self.interfaces(ty) {
                        if let Some(found) = self.as_super(&interface, target) {
                            return Some(found);
                        }
                    }
                }

                None
            }
            TypeRef::GenericParameter(id) => {
                if ty == target {
                    return Some(ty.clone());
                }
                let bound = self.parameter_bound(*id);
                self.as_super(&bound, target)
            }
            TypeRef::Captured(captured) => {
                if ty == target {
                    return Some(ty.clone());
                }
                let bound = captured.extends_bound().clone();
                self.as_super(&bound, target)
            }
            TypeRef::Compound(compound) => compound
                .components()
                .find_map(|component| self.as_super(component, target)),
            _ => None,
        }
    }

    /// The most specific type both `first` and `second` convert to.
    ///
    /// Two primitives meet at their binary numeric promotion; a primitive and a reference type
    /// meet after boxing. Arrays of equal rank meet element-wise. Otherwise the supertypes of
    /// `first` are walked, interfaces before the superclass, until one accepts `second`;
    /// `Object` when none does.
    pub fn find_common_super_type(&mut self, first: &TypeRef, second: &TypeRef) -> TypeRef {
        self.nested(TypeRef::OBJECT, |algebra| algebra.common_super_type(first, second))
    }

    fn common_super_type(&mut self, first: &TypeRef, second: &TypeRef) -> TypeRef {
        if first == second {
            return first.clone();
        }

        match (first, second) {
            (TypeRef::Null, other) | (other, TypeRef::Null) if !other.is_primitive() => {
                return other.clone();
            }
            (TypeRef::Primitive(a), TypeRef::Primitive(b)) => {
                return match binary_numeric_promotion(*a, *b) {
                    Some(kind) => TypeRef::Primitive(kind),
                    None => self.find_common_super_type(
                        &boxed_type_or_self(first),
                        &boxed_type_or_self(second),
                    ),
                };
            }
            _ => {}
        }

        if first.is_primitive() || second.is_primitive() {
            return self
                .find_common_super_type(&boxed_type_or_self(first), &boxed_type_or_self(second));
        }

        let (first_rank, second_rank) = (Self::array_rank(first), Self::array_rank(second));
        if first_rank > 0 || second_rank > 0 {
            let first_element = innermost_element(first);
            let second_element = innermost_element(second);
            if first_rank == second_rank
                && !first_element.is_primitive()
                && !second_element.is_primitive()
            {
                let element = self.find_common_super_type(first_element, second_element);
                return TypeRef::array_of_rank(element, first_rank);
            }

            let shared = first_rank.min(second_rank);
            if shared == 0 {
                return TypeRef::OBJECT;
            }
            return TypeRef::array_of_rank(TypeRef::OBJECT, shared - 1);
        }

        let first = self.strip_bounds(first);
        let second = self.strip_bounds(second);

        if self.is_convertible(&second, &first, false) {
            return self.lift(&first, &second);
        }
        if self.is_convertible(&first, &second, false) {
            return self.lift(&second, &first);
        }

        let (Some(first_class), Some(second_class)) =
            (self.resolve_class_like(&first), self.resolve_class_like(&second))
        else {
            return TypeRef::OBJECT;
        };
        if self.is_interface(&TypeRef::Class(first_class))
            || self.is_interface(&TypeRef::Class(second_class))
        {
            return TypeRef::OBJECT;
        }

        let mut current = first;
        for _ in 0..MAX_ALGEBRA_DEPTH {
            for interface in self.interfaces(&current) {
                if self.is_convertible(&second, &interface, false) {
                    return interface;
                }
            }

            let Some(base) = self.base_type(&current) else {
                break;
            };
            if self.is_convertible(&second, &base, false) {
                return base;
            }
            current = base;
        }

        TypeRef::OBJECT
    }

    /// Replace bounded type variables, wildcards and captured types by their bounds.
    fn strip_bounds(&self, ty: &TypeRef) -> TypeRef {
        let mut current = ty.clone();
        for _ in 0..MAX_ALGEBRA_DEPTH {
            let next = match &current {
                TypeRef::Wildcard(wildcard) => match &wildcard.bound {
                    WildcardBound::Extends(bound) | WildcardBound::Super(bound) => bound.clone(),
                    WildcardBound::Unbounded => break,
                },
                TypeRef::GenericParameter(id) => {
                    match self.types().generic_parameter(*id).extends_bound() {
                        Some(bound) => bound.clone(),
                        None => break,
                    }
                }
                TypeRef::Captured(captured) if captured.has_super_bound() => {
                    captured.super_bound().clone()
                }
                TypeRef::Captured(captured) if captured.has_extends_bound() => {
                    captured.extends_bound().clone()
                }
                _ => break,
            };
            current = next;
        }
        current
    }

    /// `general` with type arguments recovered from `specific` when `general` is raw.
    fn lift(&mut self, general: &TypeRef, specific: &TypeRef) -> TypeRef {
        if matches!(general, TypeRef::Class(_) | TypeRef::Raw(_))
            && matches!(specific, TypeRef::Parameterized(_))
        {
            if let Some(view) = self.as_super(specific, general) {
                return view;
            }
        }
        general.clone()
    }

    /// `true` if `inner` is nested, at any depth, in `outer` or in one of `outer`'s
    /// superclasses, or if a superclass of `inner` is.
    pub fn is_enclosed_by(&mut self, inner: &TypeRef, outer: &TypeRef) -> bool {
        self.nested(false, |algebra| algebra.enclosed_by(inner, outer))
    }

    fn enclosed_by(&mut self, inner: &TypeRef, outer: &TypeRef) -> bool {
        let Some(outer_class) = outer.class_id() else {
            return false;
        };
        if outer_class == ClassId::OBJECT {
            return false;
        }
        let Some(inner_class) = self.resolve_class_like(inner) else {
            return false;
        };

        let mut current = self.enclosing_class(inner_class);
        for _ in 0..MAX_ALGEBRA_DEPTH {
            let Some(id) = current else {
                break;
            };
            if id == outer_class {
                return true;
            }
            current = self.enclosing_class(id);
        }

        let outer_base = self
            .resolve_class_like(outer)
            .and_then(|id| self.types().definition(id))
            .and_then(|definition| definition.base_type.clone());
        if let Some(base) = outer_base {
            if self.is_enclosed_by(inner, &base) {
                return true;
            }
        }

        let inner_base = self
            .types()
            .definition(inner_class)
            .and_then(|definition| definition.base_type.clone());
        inner_base.is_some_and(|base| self.is_enclosed_by(&base, outer))
    }

    /// The class `id` is nested in, directly or through a declaring method.
    fn enclosing_class(&mut self, id: ClassId) -> Option<ClassId> {
        let id = self.system.resolve_class(id)?;
        let node = self.types().class(id);
        node.declaring_type().or_else(|| {
            node.declaring_method()
                .map(|method| self.types().method(method).declaring_type)
        })
    }

    /// The top-level class `ty` is nested in; the class itself when it is not nested.
    pub fn outermost_enclosing_type(&mut self, ty: &TypeRef) -> Option<ClassId> {
        let mut current = self.resolve_class_like(ty)?;
        for _ in 0..MAX_ALGEBRA_DEPTH {
            match self.enclosing_class(current) {
                Some(outer) => current = outer,
                None => return Some(current),
            }
        }
        Some(current)
    }
}

/// `Cloneable & Serializable`, the supertype of arrays of primitives and of `Object[]`.
fn array_super_type() -> TypeRef {
    TypeRef::compound(
        None,
        vec![
            TypeRef::Class(ClassId::CLONEABLE),
            TypeRef::Class(ClassId::SERIALIZABLE),
        ],
    )
}

fn innermost_element(ty: &TypeRef) -> &TypeRef {
    let mut current = ty;
    while let Some(element) = current.element_type() {
        current = element;
    }
    current
}

fn binary_numeric_promotion(first: PrimitiveKind, second: PrimitiveKind) -> Option<PrimitiveKind> {
    if !first.is_numeric() || !second.is_numeric() {
        return None;
    }

    let promoted = [PrimitiveKind::Double, PrimitiveKind::Float, PrimitiveKind::Long]
        .into_iter()
        .find(|kind| first == *kind || second == *kind)
        .unwrap_or(PrimitiveKind::Int);
    Some(promoted)
}

/// `true` for the wrapper classes of the primitives, `java/lang/Void` included.
#[must_use]
pub fn is_primitive_box_type(ty: &TypeRef) -> bool {
    ty.class_id().and_then(ClassId::unboxed_kind).is_some()
}

/// The wrapper class of a primitive; any other type unchanged.
#[must_use]
pub fn boxed_type_or_self(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Primitive(kind) => TypeRef::Class(TypeRegistry::box_class(*kind)),
        _ => ty.clone(),
    }
}

/// The primitive a wrapper class boxes; any other type unchanged.
#[must_use]
pub fn underlying_primitive_type_or_self(ty: &TypeRef) -> TypeRef {
    match ty.class_id().and_then(ClassId::unboxed_kind) {
        Some(kind) if ty.is_class_like() => TypeRef::Primitive(kind),
        _ => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{class_loader, ClassFileBuilder};

    const INTERFACE: u16 = 0x0601;

    /// A small hierarchy: `List<E>`, `AbstractList<E> implements List<E>`,
    /// `ArrayList<E> extends AbstractList<E>`, `Integer extends Number`, plus an outer class
    /// with a nested member.
    pub(super) fn fixture_system() -> MetadataSystem {
        let loader = class_loader(vec![
            ClassFileBuilder::new("java/lang/Object").no_super().build(),
            ClassFileBuilder::new("java/lang/Cloneable").access(INTERFACE).build(),
            ClassFileBuilder::new("java/io/Serializable").access(INTERFACE).build(),
            ClassFileBuilder::new("java/lang/Comparable")
                .access(INTERFACE)
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .build(),
            ClassFileBuilder::new("java/lang/Number")
                .access(0x0421)
                .interface("java/io/Serializable")
                .build(),
            ClassFileBuilder::new("java/lang/Integer")
                .super_class("java/lang/Number")
                .interface("java/lang/Comparable")
                .signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;")
                .build(),
            ClassFileBuilder::new("java/lang/Long")
                .super_class("java/lang/Number")
                .interface("java/lang/Comparable")
                .signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Long;>;")
                .build(),
            ClassFileBuilder::new("java/lang/String")
                .interface("java/io/Serializable")
                .build(),
            ClassFileBuilder::new("java/util/Collection")
                .access(INTERFACE)
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
                .build(),
            ClassFileBuilder::new("java/util/List")
                .access(INTERFACE)
                .interface("java/util/Collection")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
                .build(),
            ClassFileBuilder::new("java/util/AbstractList")
                .access(0x0421)
                .interface("java/util/List")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
                .build(),
            ClassFileBuilder::new("java/util/ArrayList")
                .super_class("java/util/AbstractList")
                .signature("<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;")
                .build(),
            ClassFileBuilder::new("a/Outer")
                .inner_class("a/Outer$Inner", Some("a/Outer"), Some("Inner"), 0x0009)
                .build(),
            ClassFileBuilder::new("a/Outer$Inner")
                .inner_class("a/Outer$Inner", Some("a/Outer"), Some("Inner"), 0x0009)
                .build(),
            ClassFileBuilder::new("a/Derived").super_class("a/Outer").build(),
        ]);
        MetadataSystem::new(loader)
    }

    fn parse(system: &mut MetadataSystem, signature: &str) -> TypeRef {
        system.parse_type_signature(signature).unwrap()
    }

    #[test]
    fn test_super_type_substitutes_arguments() {
        let mut system = fixture_system();
        let list = parse(&mut system, "Ljava/util/ArrayList<Ljava/lang/String;>;");
        let expected = parse(&mut system, "Ljava/util/AbstractList<Ljava/lang/String;>;");

        let mut algebra = system.algebra();
        assert_eq!(algebra.super_type(&list), Some(expected));
    }

    #[test]
    fn test_super_type_of_raw_reference_is_erased() {
        let mut system = fixture_system();
        let raw = parse(&mut system, "Ljava/util/ArrayList;");

        let mut algebra = system.algebra();
        let super_type = algebra.super_type(&raw).unwrap();
        assert_eq!(super_type.internal_name(algebra.types()), "java/util/AbstractList");
        assert!(super_type.type_arguments().is_empty());
    }

    #[test]
    fn test_super_type_of_arrays() {
        let mut system = fixture_system();
        let mut algebra = system.algebra();

        let ints = TypeRef::array(TypeRef::INT);
        assert_eq!(algebra.super_type(&ints), Some(array_super_type()));

        let integers = TypeRef::array(TypeRef::Class(ClassId::INTEGER));
        assert_eq!(
            algebra.super_type(&integers),
            Some(TypeRef::array(TypeRef::Class(ClassId::NUMBER)))
        );

        assert_eq!(algebra.super_type(&TypeRef::OBJECT), None);
        assert_eq!(algebra.super_type(&TypeRef::INT), None);
        assert_eq!(algebra.super_type(&TypeRef::Null), Some(TypeRef::OBJECT));
    }

    #[test]
    fn test_unresolved_class_extends_object() {
        let mut system = fixture_system();
        let missing = parse(&mut system, "Lmissing/Type;");

        let mut algebra = system.algebra();
        assert_eq!(algebra.super_type(&missing), Some(TypeRef::OBJECT));
        assert_eq!(algebra.base_type(&missing), None);
        assert!(algebra.interfaces(&missing).is_empty());
    }

    #[test]
    fn test_as_super_walks_interfaces() {
        let mut system = fixture_system();
        let list = parse(&mut system, "Ljava/util/ArrayList<Ljava/lang/String;>;");
        let collection = parse(&mut system, "Ljava/util/Collection;");
        let expected = parse(&mut system, "Ljava/util/Collection<Ljava/lang/String;>;");

        let mut algebra = system.algebra();
        assert_eq!(algebra.as_super(&list, &collection), Some(expected));
        assert_eq!(algebra.as_super(&list, &TypeRef::STRING), None);
    }

    #[test]
    fn test_interfaces_of_bounded_variable() {
        let mut system = fixture_system();
        let comparable = parse(&mut system, "Ljava/lang/Comparable<Ljava/lang/Integer;>;");
        let bounded = TypeRef::extends_wildcard(comparable.clone());
        let number = TypeRef::extends_wildcard(TypeRef::Class(ClassId::NUMBER));

        let mut algebra = system.algebra();
        assert_eq!(algebra.interfaces(&bounded), vec![comparable]);
        assert_eq!(
            algebra.interfaces(&number),
            vec![TypeRef::Class(ClassId::SERIALIZABLE)]
        );
    }

    #[test]
    fn test_bounds() {
        let mut system = fixture_system();
        let algebra = system.algebra();
        let number = TypeRef::Class(ClassId::NUMBER);

        let extends = TypeRef::extends_wildcard(number.clone());
        let sup = TypeRef::super_wildcard(number.clone());
        let any = TypeRef::unbounded_wildcard();

        assert_eq!(algebra.upper_bound(&extends), number);
        assert_eq!(algebra.upper_bound(&sup), TypeRef::OBJECT);
        assert_eq!(algebra.upper_bound(&any), TypeRef::OBJECT);
        assert_eq!(algebra.lower_bound(&sup), number);
        assert_eq!(algebra.lower_bound(&extends), TypeRef::Bottom);
        assert_eq!(algebra.lower_bound(&number), number);

        let nested = TypeRef::array(extends);
        assert_eq!(algebra.upper_bound(&nested), TypeRef::array(number));
    }

    #[test]
    fn test_element_type_and_rank() {
        let mut system = fixture_system();
        let algebra = system.algebra();
        let matrix = TypeRef::array_of_rank(TypeRef::INT, 2);

        assert_eq!(TypeAlgebra::array_rank(&matrix), 2);
        assert_eq!(TypeAlgebra::array_rank(&TypeRef::INT), 0);
        assert_eq!(algebra.element_type(&matrix), Some(TypeRef::array(TypeRef::INT)));

        let wildcard = TypeRef::extends_wildcard(TypeRef::array(TypeRef::STRING));
        assert_eq!(algebra.element_type(&wildcard), Some(TypeRef::STRING));
        assert_eq!(algebra.element_type(&TypeRef::STRING), None);
    }

    #[test]
    fn test_common_super_type() {
        let mut system = fixture_system();
        let integer = TypeRef::Class(ClassId::INTEGER);
        let long = TypeRef::Class(ClassId::LONG);
        let number = TypeRef::Class(ClassId::NUMBER);
        let list = parse(&mut system, "Ljava/util/ArrayList<Ljava/lang/String;>;");
        let raw_list = parse(&mut system, "Ljava/util/List;");
        let string_list = parse(&mut system, "Ljava/util/List<Ljava/lang/String;>;");

        let mut algebra = system.algebra();
        assert_eq!(algebra.find_common_super_type(&TypeRef::INT, &TypeRef::LONG), TypeRef::LONG);
        assert_eq!(algebra.find_common_super_type(&TypeRef::BYTE, &TypeRef::SHORT), TypeRef::INT);
        assert_eq!(algebra.find_common_super_type(&integer, &long), number);
        assert_eq!(algebra.find_common_super_type(&TypeRef::INT, &long), number);
        assert_eq!(algebra.find_common_super_type(&TypeRef::Null, &integer), integer);
        assert_eq!(algebra.find_common_super_type(&raw_list, &list), string_list);
        assert_eq!(
            algebra.find_common_super_type(
                &TypeRef::array(integer.clone()),
                &TypeRef::array(long.clone())
            ),
            TypeRef::array(number)
        );
        assert_eq!(
            algebra.find_common_super_type(&TypeRef::array(TypeRef::INT), &TypeRef::array(long)),
            TypeRef::OBJECT
        );
    }

    #[test]
    fn test_enclosing_types() {
        let mut system = fixture_system();
        let inner = parse(&mut system, "La/Outer$Inner;");
        let outer = parse(&mut system, "La/Outer;");
        let derived = parse(&mut system, "La/Derived;");

        let mut algebra = system.algebra();
        assert!(algebra.is_enclosed_by(&inner, &outer));
        assert!(algebra.is_enclosed_by(&inner, &derived));
        assert!(!algebra.is_enclosed_by(&outer, &inner));
        assert!(!algebra.is_enclosed_by(&inner, &TypeRef::OBJECT));

        let outermost = algebra.outermost_enclosing_type(&inner);
        assert_eq!(outermost, outer.class_id());
        assert_eq!(algebra.outermost_enclosing_type(&outer), outer.class_id());
    }

    #[test]
    fn test_boxing_helpers() {
        let integer = TypeRef::Class(ClassId::INTEGER);

        assert!(is_primitive_box_type(&integer));
        assert!(!is_primitive_box_type(&TypeRef::STRING));
        assert_eq!(boxed_type_or_self(&TypeRef::INT), integer);
        assert_eq!(boxed_type_or_self(&TypeRef::STRING), TypeRef::STRING);
        assert_eq!(underlying_primitive_type_or_self(&integer), TypeRef::INT);
        assert_eq!(underlying_primitive_type_or_self(&TypeRef::STRING), TypeRef::STRING);
    }
}
