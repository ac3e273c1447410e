use strum::{Display, IntoStaticStr};

use crate::metadata::{
    algebra::{underlying_primitive_type_or_self, TypeAlgebra},
    typesystem::{ClassId, PrimitiveKind, TypeRef},
};

/// How a value of one type becomes a value of another.
///
/// Ordered from least to most intrusive. [`ConversionType::is_implicit`] holds for the first
/// three, [`ConversionType::is_direct`] additionally for [`ConversionType::Explicit`], and
/// [`ConversionType::is_lossless`] only for the first two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
pub enum ConversionType {
    /// Same type
    Identity,
    /// Widening, boxing or subtyping
    Implicit,
    /// Widening that may lose precision, such as `long` to `float`
    ImplicitLossy,
    /// Needs a cast
    Explicit,
    /// Needs a cast to the primitive and boxing afterwards
    ExplicitToUnboxed,
    /// No conversion exists
    None,
}

impl ConversionType {
    /// Identity, implicit and implicit-lossy conversions.
    #[must_use]
    pub fn is_implicit(self) -> bool {
        matches!(
            self,
            ConversionType::Identity | ConversionType::Implicit | ConversionType::ImplicitLossy
        )
    }

    /// Implicit conversions and plain casts.
    #[must_use]
    pub fn is_direct(self) -> bool {
        self.is_implicit() || self == ConversionType::Explicit
    }

    /// Identity and non-lossy implicit conversions.
    #[must_use]
    pub fn is_lossless(self) -> bool {
        matches!(self, ConversionType::Identity | ConversionType::Implicit)
    }
}

/// Widening, narrowing and casting between two primitives.
fn primitive_conversion(target: PrimitiveKind, source: PrimitiveKind) -> ConversionType {
    if target == source {
        return ConversionType::Identity;
    }
    if source == PrimitiveKind::Boolean {
        return ConversionType::None;
    }

    match target {
        PrimitiveKind::Float | PrimitiveKind::Double => {
            if source.is_integral() {
                if source.bit_width() >= target.bit_width() {
                    ConversionType::ImplicitLossy
                } else {
                    ConversionType::Implicit
                }
            } else if source.bit_width() <= target.bit_width() {
                ConversionType::Implicit
            } else {
                ConversionType::Explicit
            }
        }
        PrimitiveKind::Byte | PrimitiveKind::Short if source == PrimitiveKind::Char => {
            ConversionType::Explicit
        }
        PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Long => {
            if source.is_integral() && source.bit_width() <= target.bit_width() {
                ConversionType::Implicit
            } else {
                ConversionType::Explicit
            }
        }
        PrimitiveKind::Char if source.is_numeric() => ConversionType::Explicit,
        _ => ConversionType::None,
    }
}

impl TypeAlgebra<'_> {
    /// Classify the conversion of a `source` value to `target` where at least one side is a
    /// primitive or a primitive wrapper.
    ///
    /// Wrapper sources are unboxed first: an implicit primitive conversion stays implicit, a
    /// narrowing one is impossible. Wrapper targets box afterwards: identity becomes implicit,
    /// widening needs [`ConversionType::ExplicitToUnboxed`] and lossy widening a cast.
    pub fn numeric_conversion_type(&mut self, target: &TypeRef, source: &TypeRef) -> ConversionType {
        if self.is_same_type(target, source) {
            return ConversionType::Identity;
        }

        if !source.is_primitive() {
            let unboxed = underlying_primitive_type_or_self(source);
            if unboxed == *source || unboxed.is_void() {
                return ConversionType::None;
            }

            return match self.numeric_conversion_type(target, &unboxed) {
                ConversionType::Identity | ConversionType::Implicit => ConversionType::Implicit,
                ConversionType::ImplicitLossy => ConversionType::ImplicitLossy,
                ConversionType::Explicit => ConversionType::None,
                other => other,
            };
        }

        if !target.is_primitive() {
            let unboxed = underlying_primitive_type_or_self(target);
            if unboxed == *target || unboxed.is_void() {
                return ConversionType::None;
            }

            return match self.numeric_conversion_type(&unboxed, source) {
                ConversionType::Identity => ConversionType::Implicit,
                ConversionType::Implicit => ConversionType::ExplicitToUnboxed,
                ConversionType::ImplicitLossy => ConversionType::Explicit,
                _ => ConversionType::None,
            };
        }

        match (target.primitive_kind(), source.primitive_kind()) {
            (Some(target), Some(source)) => primitive_conversion(target, source),
            _ => ConversionType::None,
        }
    }

    /// `true` if a `source` value widens to `target` without losing precision.
    pub fn has_implicit_numeric_conversion(&mut self, target: &TypeRef, source: &TypeRef) -> bool {
        self.numeric_conversion_type(target, source).is_lossless()
    }

    /// Classify the conversion of a `source` value to `target`.
    ///
    /// Numeric and wrapper pairs use [`Self::numeric_conversion_type`]. Otherwise every type
    /// converts implicitly to `Object` and to its supertypes; arrays of different rank only
    /// convert from `Object[]`, and anything else needs a cast.
    pub fn conversion_type(&mut self, target: &TypeRef, source: &TypeRef) -> ConversionType {
        let underlying_target = underlying_primitive_type_or_self(target);
        let underlying_source = underlying_primitive_type_or_self(source);
        let numeric = |ty: &TypeRef| ty.primitive_kind().is_some_and(|kind| !kind.is_void());
        if numeric(&underlying_target) && numeric(&underlying_source) {
            return self.numeric_conversion_type(target, source);
        }

        if target.names_class(ClassId::OBJECT) {
            return ConversionType::Implicit;
        }

        if self.is_same_type_strict(target, source) {
            return ConversionType::Identity;
        }

        if self.is_convertible(source, target, false) {
            return ConversionType::Implicit;
        }

        let target_rank = Self::array_rank(target);
        let source_rank = Self::array_rank(source);
        if target_rank != source_rank {
            let source_element = self.element_type(source);
            return if source_element.is_some_and(|element| element.names_class(ClassId::OBJECT)) {
                ConversionType::Explicit
            } else {
                ConversionType::None
            };
        }

        ConversionType::Explicit
    }
}
