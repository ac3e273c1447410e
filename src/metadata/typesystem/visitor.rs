use crate::metadata::typesystem::{
    ArrayType, CapturedType, ClassId, CompoundType, GenericParamId, ParameterizedType,
    PrimitiveKind, TypeRef, WildcardType,
};

/// Double dispatch over [`TypeRef`] variants.
///
/// Every variant method defaults to [`TypeVisitor::visit_type`], so an implementation only
/// overrides the variants it treats specially. `P` is a per-call parameter threaded through the
/// dispatch and `R` the result type.
///
/// # Examples
///
/// ```rust
/// use jvmscope::metadata::typesystem::{ArrayType, TypeRef, TypeVisitor};
///
/// struct Rank;
///
/// impl TypeVisitor<(), usize> for Rank {
///     fn visit_type(&mut self, _ty: &TypeRef, _param: ()) -> usize {
///         0
///     }
///
///     fn visit_array(&mut self, _ty: &TypeRef, array: &ArrayType, param: ()) -> usize {
///         1 + array.element().accept(self, param)
///     }
/// }
///
/// let ty = TypeRef::array_of_rank(TypeRef::INT, 3);
/// assert_eq!(ty.accept(&mut Rank, ()), 3);
/// ```
pub trait TypeVisitor<P, R> {
    /// Fallback for every variant without a dedicated override.
    fn visit_type(&mut self, ty: &TypeRef, param: P) -> R;

    /// A primitive or `void`.
    fn visit_primitive(&mut self, ty: &TypeRef, _kind: PrimitiveKind, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// A class used without type arguments.
    fn visit_class(&mut self, ty: &TypeRef, _id: ClassId, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// An array.
    fn visit_array(&mut self, ty: &TypeRef, _array: &ArrayType, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// A generic class applied to arguments.
    fn visit_parameterized(
        &mut self,
        ty: &TypeRef,
        _parameterized: &ParameterizedType,
        param: P,
    ) -> R {
        self.visit_type(ty, param)
    }

    /// A raw generic class.
    fn visit_raw(&mut self, ty: &TypeRef, _id: ClassId, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// A wildcard.
    fn visit_wildcard(&mut self, ty: &TypeRef, _wildcard: &WildcardType, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// A captured wildcard.
    fn visit_captured(&mut self, ty: &TypeRef, _captured: &CapturedType, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// A type variable.
    fn visit_generic_parameter(&mut self, ty: &TypeRef, _id: GenericParamId, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// An intersection type.
    fn visit_compound(&mut self, ty: &TypeRef, _compound: &CompoundType, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// The universal subtype.
    fn visit_bottom(&mut self, ty: &TypeRef, param: P) -> R {
        self.visit_type(ty, param)
    }

    /// The null type.
    fn visit_null(&mut self, ty: &TypeRef, param: P) -> R {
        self.visit_type(ty, param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Kind;

    impl TypeVisitor<(), &'static str> for Kind {
        fn visit_type(&mut self, _ty: &TypeRef, _param: ()) -> &'static str {
            "other"
        }

        fn visit_primitive(&mut self, _ty: &TypeRef, _kind: PrimitiveKind, _param: ()) -> &'static str {
            "primitive"
        }

        fn visit_wildcard(&mut self, _ty: &TypeRef, wildcard: &WildcardType, _param: ()) -> &'static str {
            if wildcard.is_unbounded() {
                "unbounded"
            } else {
                "bounded"
            }
        }
    }

    #[test]
    fn test_dispatch_and_fallback() {
        assert_eq!(TypeRef::INT.accept(&mut Kind, ()), "primitive");
        assert_eq!(TypeRef::unbounded_wildcard().accept(&mut Kind, ()), "unbounded");
        assert_eq!(
            TypeRef::extends_wildcard(TypeRef::OBJECT).accept(&mut Kind, ()),
            "bounded"
        );
        assert_eq!(TypeRef::OBJECT.accept(&mut Kind, ()), "other");
        assert_eq!(TypeRef::Bottom.accept(&mut Kind, ()), "other");
    }
}
