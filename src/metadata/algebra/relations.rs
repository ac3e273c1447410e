use crate::metadata::{
    algebra::{boxed_type_or_self, TypeAlgebra},
    members::MethodRef,
    typesystem::{
        ArrayType, CapturedType, ClassId, CompoundType, GenericOwner, GenericParamId,
        ParameterizedType, PrimitiveKind, TypeRef, TypeVisitor, WildcardBound, WildcardType,
    },
};

impl TypeAlgebra<'_> {
    /// `true` if every value of `ty` is a value of `base`.
    ///
    /// `ty` is capture-converted first, so `List<? extends Integer>` is a subtype of
    /// `List<? extends Number>`. Type arguments must be contained, not merely related:
    /// `List<Integer>` is not a subtype of `List<Number>`.
    pub fn is_sub_type(&mut self, ty: &TypeRef, base: &TypeRef) -> bool {
        self.is_sub_type_with(ty, base, true)
    }

    /// `true` if every value of `sub` is a value of `ty`.
    pub fn is_super_type(&mut self, ty: &TypeRef, sub: &TypeRef) -> bool {
        self.is_sub_type(sub, ty)
    }

    fn is_sub_type_with(&mut self, ty: &TypeRef, base: &TypeRef, capture: bool) -> bool {
        self.nested(false, |algebra| {
            if ty == base {
                return true;
            }

            if let TypeRef::Compound(compound) = base {
                return compound
                    .components()
                    .all(|component| algebra.is_sub_type_with(ty, component, capture));
            }

            let lower = algebra.lower_bound(base);
            if lower != *base {
                return algebra.is_sub_type_with(ty, &lower, false);
            }

            let subject = if capture { algebra.capture(ty) } else { ty.clone() };
            subject.accept(&mut SubTypeRelation { algebra }, base)
        })
    }

    fn is_sub_type_no_capture(&mut self, ty: &TypeRef, base: &TypeRef) -> bool {
        self.is_sub_type_with(ty, base, false)
    }

    /// Subtyping extended with unchecked conversion: a raw type is accepted where one of its
    /// parameterizations is expected.
    pub fn is_sub_type_unchecked(&mut self, ty: &TypeRef, base: &TypeRef) -> bool {
        self.nested(false, |algebra| {
            if let (Some(element), Some(base_element)) = (ty.element_type(), base.element_type()) {
                return if element.is_primitive() {
                    element == base_element
                } else {
                    algebra.is_sub_type_unchecked(element, base_element)
                };
            }

            if algebra.is_sub_type(ty, base) {
                return true;
            }

            if let TypeRef::GenericParameter(id) = ty {
                let bound = algebra.parameter_bound(*id);
                return algebra.is_sub_type_unchecked(&bound, base);
            }

            if !algebra.is_raw_type(base) {
                if let Some(view) = algebra.as_super(ty, base) {
                    return algebra.is_raw_type(&view);
                }
            }

            false
        })
    }

    /// `true` if a value of `source` may be assigned to a variable of `target`, allowing
    /// boxing, unboxing, widening and unchecked conversions.
    pub fn is_assignable_from(&mut self, target: &TypeRef, source: &TypeRef) -> bool {
        self.is_convertible(source, target, true)
    }

    /// `true` if a value of `source` may be assigned to a variable of `target`.
    pub fn is_assignable_to(&mut self, source: &TypeRef, target: &TypeRef) -> bool {
        self.is_convertible(source, target, true)
    }

    /// `true` if `source` converts to `target` without a cast.
    ///
    /// `null` converts to every reference type and every reference type converts to `?`.
    /// Primitives convert to primitives by widening; a reference converts to a primitive by
    /// unboxing and widening; a primitive converts to a reference after boxing.
    /// `allow_unchecked` additionally accepts raw types where parameterizations are expected.
    pub fn is_convertible(&mut self, source: &TypeRef, target: &TypeRef, allow_unchecked: bool) -> bool {
        if *source == TypeRef::Null {
            return !target.is_primitive();
        }

        if let TypeRef::Wildcard(wildcard) = target {
            if wildcard.is_unbounded() {
                return !source.is_primitive();
            }
        }

        if source.is_primitive() == target.is_primitive() {
            return if allow_unchecked {
                self.is_sub_type_unchecked(source, target)
            } else {
                self.is_sub_type(source, target)
            };
        }

        if target.is_primitive() {
            return self.numeric_conversion_type(target, source).is_implicit();
        }

        let boxed = boxed_type_or_self(source);
        if allow_unchecked {
            self.is_sub_type_unchecked(&boxed, target)
        } else {
            self.is_sub_type(&boxed, target)
        }
    }

    /// `true` if the type argument `ty` contains `other`.
    ///
    /// A wildcard contains every type within its bounds (`? extends Number` contains
    /// `Integer`); any other argument contains only types equal to it.
    pub fn contains_type(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        self.nested(false, |algebra| match ty {
            TypeRef::Wildcard(wildcard) => algebra.wildcard_contains(ty, wildcard, other),
            _ => algebra.is_same_type(ty, other),
        })
    }

    fn wildcard_contains(&mut self, ty: &TypeRef, wildcard: &WildcardType, other: &TypeRef) -> bool {
        match other {
            TypeRef::Wildcard(_) if self.is_same_wildcard(ty, other) => return true,
            TypeRef::Captured(captured) if captured.wildcard() == wildcard => return true,
            _ => {}
        }

        let lower_contained = wildcard.has_extends_bound() || {
            let lower = self.lower_bound(ty);
            let other_lower = self.lower_bound(other);
            self.is_sub_type_no_capture(&lower, &other_lower)
        };

        lower_contained
            && (wildcard.has_super_bound() || {
                let other_upper = self.upper_bound(other);
                let upper = self.upper_bound(ty);
                self.is_sub_type_no_capture(&other_upper, &upper)
            })
    }

    fn is_same_wildcard(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        let (TypeRef::Wildcard(first), TypeRef::Wildcard(second)) = (ty, other) else {
            return false;
        };

        match (&first.bound, &second.bound) {
            (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
            (WildcardBound::Extends(a), WildcardBound::Extends(b))
            | (WildcardBound::Super(a), WildcardBound::Super(b)) => self.is_same_type(a, b),
            _ => false,
        }
    }

    fn contains_types(&mut self, types: &[TypeRef], others: &[TypeRef]) -> bool {
        types.len() == others.len()
            && types
                .iter()
                .zip(others)
                .all(|(ty, other)| self.contains_type(ty, other))
    }

    /// Argument containment between two parameterizations of the same class.
    ///
    /// Re-entering the same pair (an F-bounded argument such as `Enum<E extends Enum<E>>`)
    /// compares the arguments with their contravariant parts widened instead.
    fn contains_type_recursive(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        let key = (ty.clone(), other.clone());
        if self.contains_in_progress.contains(&key) {
            let rewritten = self.rewrite_supers(ty);
            let other_rewritten = self.rewrite_supers(other);
            return self.contains_types(rewritten.type_arguments(), other_rewritten.type_arguments());
        }

        self.contains_in_progress.insert(key.clone());
        let result = self.contains_types(ty.type_arguments(), other.type_arguments());
        self.contains_in_progress.remove(&key);
        result
    }

    fn rewrite_supers(&mut self, ty: &TypeRef) -> TypeRef {
        self.nested(ty.clone(), |algebra| {
            let TypeRef::Parameterized(parameterized) = ty else {
                return ty.clone();
            };

            let arguments = parameterized
                .type_arguments
                .iter()
                .map(|argument| {
                    let rewritten = algebra.rewrite_supers(argument);
                    if has_super_bound(&rewritten) && !algebra.has_extends_bound(&rewritten) {
                        TypeRef::unbounded_wildcard()
                    } else if rewritten != *argument {
                        TypeRef::extends_wildcard(algebra.upper_bound(&rewritten))
                    } else {
                        argument.clone()
                    }
                })
                .collect();
            TypeRef::parameterized(parameterized.definition, arguments)
        })
    }

    fn has_extends_bound(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Wildcard(wildcard) => wildcard.has_extends_bound(),
            TypeRef::Captured(captured) => captured.has_extends_bound(),
            TypeRef::GenericParameter(id) => self.types().generic_parameter(*id).has_extends_bound(),
            _ => false,
        }
    }

    fn contains_type_equivalent(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        ty == other || (self.contains_type(ty, other) && self.contains_type(other, ty))
    }

    fn contains_types_equivalent(&mut self, types: &[TypeRef], others: &[TypeRef]) -> bool {
        types.len() == others.len()
            && types
                .iter()
                .zip(others)
                .all(|(ty, other)| self.contains_type_equivalent(ty, other))
    }

    /// Structural type equivalence.
    ///
    /// Type arguments are compared by mutual containment, wildcards by their effective bounds,
    /// and type variables by name, position and owner; a variable whose owner is unknown
    /// matches any variable with the same name and position. A bare class reference and the
    /// raw type of the same class are the same type.
    pub fn is_same_type(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        self.same_type(ty, other, false)
    }

    /// Like [`Self::is_same_type`], but type arguments and wildcard bounds must match as
    /// declared and type variables need known, equivalent owners.
    pub fn is_same_type_strict(&mut self, ty: &TypeRef, other: &TypeRef) -> bool {
        self.same_type(ty, other, true)
    }

    /// Pairwise [`Self::is_same_type`]; lists of different length are never the same.
    pub fn are_same_types(&mut self, types: &[TypeRef], others: &[TypeRef]) -> bool {
        self.all_same_types(types, others, false)
    }

    fn all_same_types(&mut self, types: &[TypeRef], others: &[TypeRef], strict: bool) -> bool {
        types.len() == others.len()
            && types
                .iter()
                .zip(others)
                .all(|(ty, other)| self.same_type(ty, other, strict))
    }

    fn same_type(&mut self, ty: &TypeRef, other: &TypeRef, strict: bool) -> bool {
        if ty == other {
            return true;
        }
        self.nested(false, |algebra| {
            ty.accept(&mut SameTypeRelation { algebra, strict }, other)
        })
    }

    fn same_generic_parameters(&self, first: GenericParamId, second: GenericParamId, strict: bool) -> bool {
        if first == second {
            return true;
        }

        let types = self.types();
        let (a, b) = (types.generic_parameter(first), types.generic_parameter(second));
        if a.name() != b.name() || a.position() != b.position() {
            return false;
        }

        match (a.owner(), b.owner()) {
            (Some(x), Some(y)) if x == y => true,
            (Some(GenericOwner::Method(x)), Some(GenericOwner::Method(y))) => {
                MethodRef::Definition(x).is_equivalent(&MethodRef::Definition(y), types)
            }
            (Some(_), Some(_)) => false,
            (None, None) => true,
            _ => !strict,
        }
    }
}

fn has_super_bound(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Wildcard(wildcard) => wildcard.has_super_bound(),
        TypeRef::Captured(captured) => captured.has_super_bound(),
        _ => false,
    }
}

/// `true` if a value of primitive kind `from` widens to `to` without a cast.
fn is_primitive_widening(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::{Byte, Char, Double, Float, Int, Long, Short};

    from == to
        || matches!(
            (from, to),
            (Byte, Short | Int | Long | Float | Double)
                | (Short | Char, Int | Long | Float | Double)
                | (Int, Long | Float | Double)
                | (Long, Float | Double)
                | (Float, Double)
        )
}

/// Subtyping, dispatched on the candidate subtype; the parameter is the candidate supertype.
struct SubTypeRelation<'a, 's> {
    algebra: &'a mut TypeAlgebra<'s>,
}

impl SubTypeRelation<'_, '_> {
    fn class_relation(&mut self, ty: &TypeRef, base: &TypeRef) -> bool {
        let Some(view) = self.algebra.as_super(ty, base) else {
            return false;
        };
        if view.class_id() != base.class_id() {
            return false;
        }

        match base {
            TypeRef::Parameterized(_) => self.algebra.contains_type_recursive(base, &view),
            _ => true,
        }
    }
}

impl<'t> TypeVisitor<&'t TypeRef, bool> for SubTypeRelation<'_, '_> {
    fn visit_type(&mut self, _ty: &TypeRef, _base: &'t TypeRef) -> bool {
        false
    }

    fn visit_primitive(&mut self, _ty: &TypeRef, kind: PrimitiveKind, base: &'t TypeRef) -> bool {
        base.primitive_kind()
            .is_some_and(|target| is_primitive_widening(kind, target))
    }

    fn visit_class(&mut self, ty: &TypeRef, _id: ClassId, base: &'t TypeRef) -> bool {
        self.class_relation(ty, base)
    }

    fn visit_raw(&mut self, ty: &TypeRef, _id: ClassId, base: &'t TypeRef) -> bool {
        self.class_relation(ty, base)
    }

    fn visit_parameterized(
        &mut self,
        ty: &TypeRef,
        _parameterized: &ParameterizedType,
        base: &'t TypeRef,
    ) -> bool {
        self.class_relation(ty, base)
    }

    fn visit_array(&mut self, _ty: &TypeRef, array: &ArrayType, base: &'t TypeRef) -> bool {
        let element = array.element();
        match base.element_type() {
            Some(base_element) if element.is_primitive() => element == base_element,
            Some(base_element) => self.algebra.is_sub_type_no_capture(element, base_element),
            None => {
                base.is_class_like()
                    && [ClassId::OBJECT, ClassId::CLONEABLE, ClassId::SERIALIZABLE]
                        .into_iter()
                        .any(|id| base.names_class(id))
            }
        }
    }

    fn visit_generic_parameter(&mut self, _ty: &TypeRef, id: GenericParamId, base: &'t TypeRef) -> bool {
        let bound = self.algebra.parameter_bound(id);
        self.algebra.is_sub_type_no_capture(&bound, base)
    }

    fn visit_captured(&mut self, _ty: &TypeRef, captured: &CapturedType, base: &'t TypeRef) -> bool {
        self.algebra
            .is_sub_type_no_capture(captured.extends_bound(), base)
    }

    fn visit_compound(&mut self, _ty: &TypeRef, compound: &CompoundType, base: &'t TypeRef) -> bool {
        compound
            .components()
            .any(|component| self.algebra.is_sub_type_no_capture(component, base))
    }

    fn visit_bottom(&mut self, _ty: &TypeRef, base: &'t TypeRef) -> bool {
        !base.is_primitive()
    }

    fn visit_null(&mut self, _ty: &TypeRef, base: &'t TypeRef) -> bool {
        !base.is_primitive() && *base != TypeRef::Bottom
    }
}

/// Type equivalence, dispatched on the first type; the parameter is the second.
struct SameTypeRelation<'a, 's> {
    algebra: &'a mut TypeAlgebra<'s>,
    strict: bool,
}

impl<'t> TypeVisitor<&'t TypeRef, bool> for SameTypeRelation<'_, '_> {
    fn visit_type(&mut self, _ty: &TypeRef, _other: &'t TypeRef) -> bool {
        false
    }

    fn visit_primitive(&mut self, _ty: &TypeRef, kind: PrimitiveKind, other: &'t TypeRef) -> bool {
        other.primitive_kind() == Some(kind)
    }

    fn visit_class(&mut self, _ty: &TypeRef, id: ClassId, other: &'t TypeRef) -> bool {
        matches!(other, TypeRef::Class(other_id) | TypeRef::Raw(other_id) if *other_id == id)
    }

    fn visit_raw(&mut self, _ty: &TypeRef, id: ClassId, other: &'t TypeRef) -> bool {
        matches!(other, TypeRef::Class(other_id) | TypeRef::Raw(other_id) if *other_id == id)
    }

    fn visit_parameterized(
        &mut self,
        _ty: &TypeRef,
        parameterized: &ParameterizedType,
        other: &'t TypeRef,
    ) -> bool {
        let TypeRef::Parameterized(other) = other else {
            return false;
        };
        if parameterized.definition != other.definition {
            return false;
        }

        if self.strict {
            self.algebra
                .all_same_types(&parameterized.type_arguments, &other.type_arguments, true)
        } else {
            self.algebra
                .contains_types_equivalent(&parameterized.type_arguments, &other.type_arguments)
        }
    }

    fn visit_array(&mut self, _ty: &TypeRef, array: &ArrayType, other: &'t TypeRef) -> bool {
        match other.element_type() {
            Some(other_element) if self.strict => {
                self.algebra.same_type(array.element(), other_element, true)
            }
            Some(other_element) => self
                .algebra
                .contains_type_equivalent(array.element(), other_element),
            None => false,
        }
    }

    fn visit_wildcard(&mut self, ty: &TypeRef, wildcard: &WildcardType, other: &'t TypeRef) -> bool {
        let TypeRef::Wildcard(other_wildcard) = other else {
            return false;
        };

        match (&wildcard.bound, &other_wildcard.bound) {
            (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
            (WildcardBound::Extends(a), WildcardBound::Extends(b))
            | (WildcardBound::Super(a), WildcardBound::Super(b))
                if self.strict =>
            {
                self.algebra.same_type(a, b, true)
            }
            (WildcardBound::Extends(_), WildcardBound::Extends(_)) => {
                let upper = self.algebra.upper_bound(ty);
                let other_upper = self.algebra.upper_bound(other);
                self.algebra.same_type(&upper, &other_upper, false)
            }
            (WildcardBound::Super(_), WildcardBound::Super(_)) => {
                let lower = self.algebra.lower_bound(ty);
                let other_lower = self.algebra.lower_bound(other);
                self.algebra.same_type(&lower, &other_lower, false)
            }
            _ => false,
        }
    }

    fn visit_generic_parameter(&mut self, _ty: &TypeRef, id: GenericParamId, other: &'t TypeRef) -> bool {
        match other {
            TypeRef::GenericParameter(other_id) => {
                self.algebra.same_generic_parameters(id, *other_id, self.strict)
            }
            _ => false,
        }
    }

    fn visit_compound(&mut self, _ty: &TypeRef, compound: &CompoundType, other: &'t TypeRef) -> bool {
        let TypeRef::Compound(other) = other else {
            return false;
        };

        let same_base = match (&compound.base, &other.base) {
            (Some(a), Some(b)) => self.algebra.same_type(a, b, self.strict),
            (None, None) => true,
            _ => false,
        };

        same_base
            && compound.interfaces.len() == other.interfaces.len()
            && compound.interfaces.iter().all(|interface| {
                other
                    .interfaces
                    .iter()
                    .any(|candidate| self.algebra.same_type(interface, candidate, self.strict))
            })
    }
}
