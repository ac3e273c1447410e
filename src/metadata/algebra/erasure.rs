use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::metadata::{
    algebra::TypeAlgebra,
    members::{MethodRef, RawMethod},
    typesystem::{
        ArrayType, CapturedType, ClassId, CompoundType, GenericParamId, ParameterizedType,
        TypeRef, TypeVisitor, WildcardBound, WildcardType,
    },
};

/// Maps type variables to the types that replace them.
pub type GenericMapping = FxHashMap<GenericParamId, TypeRef>;

impl TypeAlgebra<'_> {
    /// The erasure of `ty`.
    ///
    /// Parameterized types and bare references to generic classes become raw types, type
    /// variables, wildcards and captured types become the erasure of their upper bound,
    /// intersections the erasure of their first component, and arrays the array of their
    /// erased element. Primitives, `String` and non-generic classes are unchanged.
    pub fn erase(&mut self, ty: &TypeRef) -> TypeRef {
        self.erase_with(ty, false)
    }

    /// Like [`Self::erase`], but intersections keep their shape with every component erased
    /// instead of collapsing to the first one.
    pub fn erase_recursive(&mut self, ty: &TypeRef) -> TypeRef {
        self.erase_with(ty, true)
    }

    fn erase_with(&mut self, ty: &TypeRef, recursive: bool) -> TypeRef {
        self.nested(TypeRef::OBJECT, |algebra| ty.accept(&mut Erasure { algebra }, recursive))
    }

    /// The erased view of `method`.
    ///
    /// The declaring type and return type are erased. Parameters are taken from the resolved
    /// definition: named ones are erased, synthetic and unnamed ones are dropped.
    pub fn erase_method(&mut self, method: &MethodRef) -> MethodRef {
        if let MethodRef::Raw(_) = method {
            return method.clone();
        }

        let generic = match method {
            MethodRef::GenericInstance(instance) => &instance.method,
            _ => method,
        };

        let (declaring_type, name, return_type) = {
            let types = self.types();
            (
                generic.declaring_type(types),
                generic.name(types).to_string(),
                generic.return_type(types),
            )
        };

        let named_parameters: Vec<TypeRef> = match self.system.resolve_method(generic) {
            Some(id) => {
                let types = self.types();
                types
                    .method(id)
                    .parameters()
                    .iter()
                    .map(|parameter| types.parameter(parameter))
                    .filter(|parameter| parameter.name.is_some() && !parameter.is_synthetic())
                    .map(|parameter| parameter.parameter_type().clone())
                    .collect()
            }
            None => Vec::new(),
        };

        let parameters = named_parameters
            .iter()
            .map(|parameter| self.erase(parameter))
            .collect();

        MethodRef::Raw(Arc::new(RawMethod {
            base: method.clone(),
            declaring_type: self.erase(&declaring_type),
            name,
            parameters,
            return_type: self.erase(&return_type),
        }))
    }

    /// `true` for raw types and for bare references to generic classes.
    pub fn is_raw_type(&mut self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Raw(_) => true,
            TypeRef::Class(id) => self.is_generic_class(*id),
            _ => false,
        }
    }

    /// Replace the type variables in `ty` that `mapping` names.
    #[must_use]
    pub fn substitute(ty: &TypeRef, mapping: &GenericMapping) -> TypeRef {
        if mapping.is_empty() {
            return ty.clone();
        }
        ty.accept(&mut Substitution { mapping }, ())
    }

    /// Bind the type parameters of `provider`'s class to `provider`'s type arguments.
    ///
    /// Empty unless `provider` is parameterized with one argument per declared parameter.
    pub fn generic_arguments_of(&mut self, provider: &TypeRef) -> GenericMapping {
        let TypeRef::Parameterized(parameterized) = provider else {
            return GenericMapping::default();
        };

        let parameters = self.class_generic_parameters(parameterized.definition);
        if parameters.len() != parameterized.type_arguments.len() {
            debug!(
                class = %provider.internal_name(self.types()),
                expected = parameters.len(),
                found = parameterized.type_arguments.len(),
                "type argument count does not match declaration"
            );
            return GenericMapping::default();
        }

        parameters
            .into_iter()
            .zip(parameterized.type_arguments.iter().cloned())
            .collect()
    }

    /// Rewrite `ty`, declared inside `provider`'s class, into `provider`'s view:
    /// `List<E>` inside `ArrayList` becomes `List<String>` for `ArrayList<String>`.
    pub fn substitute_generic_arguments(&mut self, ty: &TypeRef, provider: &TypeRef) -> TypeRef {
        let mapping = self.generic_arguments_of(provider);
        Self::substitute(ty, &mapping)
    }

    /// Rewrite `ty`, declared on the method `method` refers to, into the view of that
    /// reference: the declaring type's arguments and, for a generic method instance, the
    /// method's own type arguments are substituted.
    pub fn substitute_method_generic_arguments(&mut self, ty: &TypeRef, method: &MethodRef) -> TypeRef {
        let declaring_type = method.declaring_type(self.types());
        let mut mapping = self.generic_arguments_of(&declaring_type);

        if let MethodRef::GenericInstance(instance) = method {
            if let Some(id) = self.system.resolve_method(&instance.method) {
                let parameters = self.types().method(id).generic_parameters().as_slice().to_vec();
                if parameters.len() == instance.type_arguments.len() {
                    mapping.extend(parameters.into_iter().zip(instance.type_arguments.iter().cloned()));
                }
            }
        }

        Self::substitute(ty, &mapping)
    }

    /// Capture conversion: every wildcard argument of a parameterized type becomes a fresh
    /// captured type. Other types are returned unchanged.
    #[must_use]
    pub fn capture(&self, ty: &TypeRef) -> TypeRef {
        let TypeRef::Parameterized(parameterized) = ty else {
            return ty.clone();
        };
        if !parameterized.type_arguments.iter().any(TypeRef::is_wildcard) {
            return ty.clone();
        }

        let arguments = parameterized
            .type_arguments
            .iter()
            .map(|argument| match argument {
                TypeRef::Wildcard(wildcard) => capture_wildcard(wildcard),
                _ => argument.clone(),
            })
            .collect();
        TypeRef::parameterized(parameterized.definition, arguments)
    }
}

/// A fresh captured type for `wildcard`.
///
/// `? extends T` captures with upper bound `T`, `? super T` with lower bound `T`; the other
/// side keeps its default.
#[must_use]
pub fn capture_wildcard(wildcard: &WildcardType) -> TypeRef {
    let (super_bound, extends_bound) = match &wildcard.bound {
        WildcardBound::Unbounded => (None, None),
        WildcardBound::Extends(bound) => (None, Some(bound.clone())),
        WildcardBound::Super(bound) => (Some(bound.clone()), None),
    };
    TypeRef::captured(super_bound, extends_bound, wildcard.clone())
}

struct Erasure<'a, 's> {
    algebra: &'a mut TypeAlgebra<'s>,
}

impl Erasure<'_, '_> {
    fn erase_bound(&mut self, ty: &TypeRef, recursive: bool) -> TypeRef {
        let bound = self.algebra.upper_bound(ty);
        self.algebra.erase_with(&bound, recursive)
    }
}

impl TypeVisitor<bool, TypeRef> for Erasure<'_, '_> {
    fn visit_type(&mut self, ty: &TypeRef, _recursive: bool) -> TypeRef {
        ty.clone()
    }

    fn visit_class(&mut self, ty: &TypeRef, id: ClassId, _recursive: bool) -> TypeRef {
        if id != ClassId::STRING && self.algebra.is_generic_class(id) {
            TypeRef::Raw(id)
        } else {
            ty.clone()
        }
    }

    fn visit_parameterized(
        &mut self,
        _ty: &TypeRef,
        parameterized: &ParameterizedType,
        _recursive: bool,
    ) -> TypeRef {
        TypeRef::Raw(parameterized.definition)
    }

    fn visit_array(&mut self, ty: &TypeRef, array: &ArrayType, recursive: bool) -> TypeRef {
        let element = self.algebra.erase_with(array.element(), recursive);
        if element == *array.element() {
            ty.clone()
        } else {
            TypeRef::array(element)
        }
    }

    fn visit_wildcard(&mut self, ty: &TypeRef, _wildcard: &WildcardType, recursive: bool) -> TypeRef {
        self.erase_bound(ty, recursive)
    }

    fn visit_captured(&mut self, ty: &TypeRef, _captured: &CapturedType, recursive: bool) -> TypeRef {
        self.erase_bound(ty, recursive)
    }

    fn visit_generic_parameter(&mut self, ty: &TypeRef, _id: GenericParamId, recursive: bool) -> TypeRef {
        self.erase_bound(ty, recursive)
    }

    fn visit_compound(&mut self, _ty: &TypeRef, compound: &CompoundType, recursive: bool) -> TypeRef {
        if recursive {
            let base = compound
                .base
                .as_ref()
                .map(|base| self.algebra.erase_with(base, true));
            let interfaces = compound
                .interfaces
                .iter()
                .map(|interface| self.algebra.erase_with(interface, true))
                .collect();
            return TypeRef::compound(base, interfaces);
        }

        match compound.components().next() {
            Some(first) => self.algebra.erase(first),
            None => TypeRef::OBJECT,
        }
    }
}

struct Substitution<'m> {
    mapping: &'m GenericMapping,
}

impl Substitution<'_> {
    fn rewrite(&mut self, ty: &TypeRef) -> TypeRef {
        ty.accept(self, ())
    }
}

impl TypeVisitor<(), TypeRef> for Substitution<'_> {
    fn visit_type(&mut self, ty: &TypeRef, _param: ()) -> TypeRef {
        ty.clone()
    }

    fn visit_generic_parameter(&mut self, ty: &TypeRef, id: GenericParamId, _param: ()) -> TypeRef {
        self.mapping.get(&id).cloned().unwrap_or_else(|| ty.clone())
    }

    fn visit_array(&mut self, ty: &TypeRef, array: &ArrayType, _param: ()) -> TypeRef {
        let element = self.rewrite(array.element());
        if element == *array.element() {
            ty.clone()
        } else {
            TypeRef::array(element)
        }
    }

    fn visit_parameterized(
        &mut self,
        ty: &TypeRef,
        parameterized: &ParameterizedType,
        _param: (),
    ) -> TypeRef {
        let arguments: Vec<TypeRef> = parameterized
            .type_arguments
            .iter()
            .map(|argument| self.rewrite(argument))
            .collect();

        if arguments == parameterized.type_arguments {
            ty.clone()
        } else {
            TypeRef::parameterized(parameterized.definition, arguments)
        }
    }

    fn visit_wildcard(&mut self, ty: &TypeRef, wildcard: &WildcardType, _param: ()) -> TypeRef {
        match &wildcard.bound {
            WildcardBound::Unbounded => ty.clone(),
            WildcardBound::Extends(bound) => TypeRef::extends_wildcard(self.rewrite(bound)),
            WildcardBound::Super(bound) => TypeRef::super_wildcard(self.rewrite(bound)),
        }
    }

    fn visit_compound(&mut self, _ty: &TypeRef, compound: &CompoundType, _param: ()) -> TypeRef {
        let base = compound.base.as_ref().map(|base| self.rewrite(base));
        let interfaces = compound
            .interfaces
            .iter()
            .map(|interface| self.rewrite(interface))
            .collect();
        TypeRef::compound(base, interfaces)
    }
}
