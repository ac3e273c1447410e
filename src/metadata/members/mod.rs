//! Fields, methods, parameters and the references that point at them.
//!
//! Definitions live in the [`crate::metadata::typesystem::TypeRegistry`] arenas and are named by
//! [`FieldId`], [`MethodId`] and [`ParamId`]. Code that only knows a member symbolically (from
//! a constant-pool entry or a descriptor) holds a [`MethodRef`] or [`FieldRef`] instead, which
//! the resolver can turn into a definition id.
//!
//! # Key Types
//! - [`MethodDefinition`], [`FieldDefinition`], [`ParameterDefinition`], [`VariableDefinition`]
//! - [`MethodRef`] - a definition, a symbolic reference, a generic instance or an erased method
//! - [`FieldRef`] - a definition or a symbolic reference

mod field;
mod method;
mod parameter;

pub use field::FieldDefinition;
pub use method::{ExceptionHandler, MethodBody, MethodDefinition};
pub use parameter::{ParameterDefinition, VariableDefinition};

use std::sync::Arc;

use crate::metadata::{
    signatures::encoders,
    typesystem::{TypeRef, TypeRegistry},
};

arena_id!(
    /// Identifies a [`MethodDefinition`] in the registry
    MethodId
);
arena_id!(
    /// Identifies a [`FieldDefinition`] in the registry
    FieldId
);
arena_id!(
    /// Identifies a [`ParameterDefinition`] in the registry
    ParamId
);

/// A method known by name and shape, not (yet) tied to a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodReference {
    /// The class or array type the reference names as the owner
    pub declaring_type: TypeRef,
    /// Method name
    pub name: String,
    /// Parameter types, in order
    pub parameters: Vec<TypeRef>,
    /// Return type
    pub return_type: TypeRef,
}

/// A generic method applied to explicit type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericMethodInstance {
    /// The generic method
    pub method: MethodRef,
    /// Arguments for the method's type parameters
    pub type_arguments: Vec<TypeRef>,
    /// Parameter types after substitution
    pub parameters: Vec<TypeRef>,
    /// Return type after substitution
    pub return_type: TypeRef,
}

/// The erased view of a method.
///
/// Synthetic and unnamed parameters are dropped rather than erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawMethod {
    /// The method this was erased from
    pub base: MethodRef,
    /// The erased declaring type
    pub declaring_type: TypeRef,
    /// Method name
    pub name: String,
    /// Erased types of the named parameters
    pub parameters: Vec<TypeRef>,
    /// Erased return type
    pub return_type: TypeRef,
}

/// Any reference to a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodRef {
    /// A decoded method
    Definition(MethodId),
    /// A symbolic reference
    Reference(Arc<MethodReference>),
    /// A generic method with type arguments
    GenericInstance(Arc<GenericMethodInstance>),
    /// An erased method
    Raw(Arc<RawMethod>),
}

impl MethodRef {
    /// The method name.
    #[must_use]
    pub fn name<'a>(&'a self, types: &'a TypeRegistry) -> &'a str {
        match self {
            MethodRef::Definition(id) => &types.method(*id).name,
            MethodRef::Reference(reference) => &reference.name,
            MethodRef::GenericInstance(instance) => instance.method.name(types),
            MethodRef::Raw(raw) => &raw.name,
        }
    }

    /// The owning type.
    #[must_use]
    pub fn declaring_type(&self, types: &TypeRegistry) -> TypeRef {
        match self {
            MethodRef::Definition(id) => TypeRef::Class(types.method(*id).declaring_type),
            MethodRef::Reference(reference) => reference.declaring_type.clone(),
            MethodRef::GenericInstance(instance) => instance.method.declaring_type(types),
            MethodRef::Raw(raw) => raw.declaring_type.clone(),
        }
    }

    /// The return type.
    #[must_use]
    pub fn return_type(&self, types: &TypeRegistry) -> TypeRef {
        match self {
            MethodRef::Definition(id) => types.method(*id).return_type().clone(),
            MethodRef::Reference(reference) => reference.return_type.clone(),
            MethodRef::GenericInstance(instance) => instance.return_type.clone(),
            MethodRef::Raw(raw) => raw.return_type.clone(),
        }
    }

    /// The parameter types, in order.
    #[must_use]
    pub fn parameter_types(&self, types: &TypeRegistry) -> Vec<TypeRef> {
        match self {
            MethodRef::Definition(id) => types.parameter_types(*id),
            MethodRef::Reference(reference) => reference.parameters.clone(),
            MethodRef::GenericInstance(instance) => instance.parameters.clone(),
            MethodRef::Raw(raw) => raw.parameters.clone(),
        }
    }

    /// The definition behind this reference, if it is one or wraps one.
    #[must_use]
    pub fn definition(&self) -> Option<MethodId> {
        match self {
            MethodRef::Definition(id) => Some(*id),
            MethodRef::Reference(_) => None,
            MethodRef::GenericInstance(instance) => instance.method.definition(),
            MethodRef::Raw(raw) => raw.base.definition(),
        }
    }

    /// Generic-aware signature, e.g. `(Ljava/util/List<TT;>;)TT;`.
    #[must_use]
    pub fn signature(&self, types: &TypeRegistry) -> String {
        match self {
            MethodRef::Definition(id) => types.method_signature(*id).to_string(),
            _ => encoders::method_signature(
                types,
                &[],
                &self.parameter_types(types),
                &self.return_type(types),
            ),
        }
    }

    /// The method descriptor, e.g. `(Ljava/util/List;)Ljava/lang/Object;`.
    #[must_use]
    pub fn erased_signature(&self, types: &TypeRegistry) -> String {
        match self {
            MethodRef::Definition(id) => types.method_erased_signature(*id).to_string(),
            _ => encoders::method_descriptor(
                types,
                &self.parameter_types(types),
                &self.return_type(types),
            ),
        }
    }

    /// `true` for `<init>`.
    #[must_use]
    pub fn is_constructor(&self, types: &TypeRegistry) -> bool {
        self.name(types) == "<init>"
    }

    /// `true` for `<clinit>`.
    #[must_use]
    pub fn is_type_initializer(&self, types: &TypeRegistry) -> bool {
        self.name(types) == "<clinit>"
    }

    /// Identity, or the same name and descriptor on equivalent declaring types.
    ///
    /// Declaring types compare by erased internal name, so references built by separate
    /// resolution passes match the same definition.
    #[must_use]
    pub fn is_equivalent(&self, other: &MethodRef, types: &TypeRegistry) -> bool {
        if self == other {
            return true;
        }

        self.name(types) == other.name(types)
            && self.erased_signature(types) == other.erased_signature(types)
            && self.declaring_type(types).internal_name(types)
                == other.declaring_type(types).internal_name(types)
    }
}

/// A field known by name and type, not (yet) tied to a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldReference {
    /// The class the reference names as the owner
    pub declaring_type: TypeRef,
    /// Field name
    pub name: String,
    /// Declared type
    pub field_type: TypeRef,
}

/// Any reference to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    /// A decoded field
    Definition(FieldId),
    /// A symbolic reference
    Reference(Arc<FieldReference>),
}

impl FieldRef {
    /// The field name.
    #[must_use]
    pub fn name<'a>(&'a self, types: &'a TypeRegistry) -> &'a str {
        match self {
            FieldRef::Definition(id) => &types.field(*id).name,
            FieldRef::Reference(reference) => &reference.name,
        }
    }

    /// The owning type.
    #[must_use]
    pub fn declaring_type(&self, types: &TypeRegistry) -> TypeRef {
        match self {
            FieldRef::Definition(id) => TypeRef::Class(types.field(*id).declaring_type),
            FieldRef::Reference(reference) => reference.declaring_type.clone(),
        }
    }

    /// The declared type.
    #[must_use]
    pub fn field_type(&self, types: &TypeRegistry) -> TypeRef {
        match self {
            FieldRef::Definition(id) => types.field(*id).field_type.clone(),
            FieldRef::Reference(reference) => reference.field_type.clone(),
        }
    }

    /// The definition, if this is one.
    #[must_use]
    pub fn definition(&self) -> Option<FieldId> {
        match self {
            FieldRef::Definition(id) => Some(*id),
            FieldRef::Reference(_) => None,
        }
    }

    /// The field descriptor.
    #[must_use]
    pub fn erased_signature(&self, types: &TypeRegistry) -> String {
        self.field_type(types).erased_signature(types)
    }

    /// Identity, or the same name and descriptor on equivalent declaring types.
    #[must_use]
    pub fn is_equivalent(&self, other: &FieldRef, types: &TypeRegistry) -> bool {
        if self == other {
            return true;
        }

        self.name(types) == other.name(types)
            && self.erased_signature(types) == other.erased_signature(types)
            && self.declaring_type(types).internal_name(types)
                == other.declaring_type(types).internal_name(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{flags::Flags, typesystem::ClassId};

    #[test]
    fn test_reference_equivalence() {
        let mut types = TypeRegistry::new();
        let owner = types.intern_class("a/B");
        let method = types.add_method(owner, "run", Flags::PUBLIC, TypeRef::VOID);
        types.add_parameter(method, Some("value"), TypeRef::INT, Flags::empty());

        let definition = MethodRef::Definition(method);
        let reference = MethodRef::Reference(Arc::new(MethodReference {
            declaring_type: TypeRef::Class(owner),
            name: "run".to_string(),
            parameters: vec![TypeRef::INT],
            return_type: TypeRef::VOID,
        }));
        let other = MethodRef::Reference(Arc::new(MethodReference {
            declaring_type: TypeRef::Class(owner),
            name: "run".to_string(),
            parameters: vec![TypeRef::LONG],
            return_type: TypeRef::VOID,
        }));

        assert_eq!(reference.erased_signature(&types), "(I)V");
        assert!(definition.is_equivalent(&reference, &types));
        assert!(!definition.is_equivalent(&other, &types));
        assert_eq!(definition.definition(), Some(method));
        assert_eq!(reference.definition(), None);
    }

    #[test]
    fn test_field_reference() {
        let mut types = TypeRegistry::new();
        let owner = types.intern_class("a/B");
        let field = types.add_field(owner, "count", Flags::PRIVATE, TypeRef::LONG);

        let reference = FieldRef::Reference(Arc::new(FieldReference {
            declaring_type: TypeRef::Class(owner),
            name: "count".to_string(),
            field_type: TypeRef::LONG,
        }));

        assert!(FieldRef::Definition(field).is_equivalent(&reference, &types));
        assert_eq!(reference.erased_signature(&types), "J");
        assert_eq!(
            FieldRef::Definition(field).declaring_type(&types),
            TypeRef::Class(owner)
        );
        assert_ne!(owner, ClassId::OBJECT);
    }
}
