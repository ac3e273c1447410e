//! Rendering of type-model values back into descriptor and signature strings.
//!
//! - [`append_signature`] - generic-aware form, e.g. `Ljava/util/List<+TT;>;`
//! - [`append_erased_signature`] - descriptor form, e.g. `Ljava/util/List;`
//! - [`method_signature`] / [`method_descriptor`] - the same for method shapes
//! - [`class_signature`] - the `Signature` attribute form of a class declaration
//!
//! Erasure here is purely textual: type variables, wildcards, captures and intersections are
//! written as the erasure of their upper bound, and the synthetic bottom and null types are
//! written as `Object`.

use std::fmt::Write;

use crate::metadata::typesystem::{
    ClassId, GenericParamId, TypeRef, TypeRegistry, WildcardBound, WildcardType,
};

fn append_class_name(types: &TypeRegistry, id: ClassId, out: &mut String) {
    out.push('L');
    out.push_str(types.class(id).internal_name());
}

/// Append the generic-aware signature of `ty` to `out`.
pub fn append_signature(types: &TypeRegistry, ty: &TypeRef, out: &mut String) {
    match ty {
        TypeRef::Primitive(kind) => out.push(kind.descriptor()),
        TypeRef::Class(id) | TypeRef::Raw(id) => {
            append_class_name(types, *id, out);
            out.push(';');
        }
        TypeRef::Parameterized(parameterized) => {
            append_class_name(types, parameterized.definition, out);
            if !parameterized.type_arguments.is_empty() {
                out.push('<');
                for argument in &parameterized.type_arguments {
                    append_signature(types, argument, out);
                }
                out.push('>');
            }
            out.push(';');
        }
        TypeRef::Array(array) => {
            out.push('[');
            append_signature(types, array.element(), out);
        }
        TypeRef::GenericParameter(id) => {
            let _ = write!(out, "T{};", types.generic_parameter(*id).name());
        }
        TypeRef::Wildcard(wildcard) => append_wildcard(types, wildcard, out),
        TypeRef::Captured(captured) => append_wildcard(types, captured.wildcard(), out),
        TypeRef::Compound(compound) => {
            for (index, component) in compound.components().enumerate() {
                if index > 0 {
                    out.push(':');
                }
                append_signature(types, component, out);
            }
        }
        TypeRef::Bottom | TypeRef::Null => append_erased_signature(types, ty, out),
    }
}

fn append_wildcard(types: &TypeRegistry, wildcard: &WildcardType, out: &mut String) {
    match &wildcard.bound {
        WildcardBound::Unbounded => out.push('*'),
        WildcardBound::Extends(bound) => {
            out.push('+');
            append_signature(types, bound, out);
        }
        WildcardBound::Super(bound) => {
            out.push('-');
            append_signature(types, bound, out);
        }
    }
}

/// Append the erased signature (field descriptor) of `ty` to `out`.
pub fn append_erased_signature(types: &TypeRegistry, ty: &TypeRef, out: &mut String) {
    match ty {
        TypeRef::Primitive(kind) => out.push(kind.descriptor()),
        TypeRef::Class(id) | TypeRef::Raw(id) => {
            append_class_name(types, *id, out);
            out.push(';');
        }
        TypeRef::Parameterized(parameterized) => {
            append_class_name(types, parameterized.definition, out);
            out.push(';');
        }
        TypeRef::Array(array) => {
            out.push('[');
            append_erased_signature(types, array.element(), out);
        }
        TypeRef::GenericParameter(id) => match types.generic_parameter(*id).extends_bound() {
            Some(bound) => append_erased_signature(types, bound, out),
            None => append_erased_signature(types, &TypeRef::OBJECT, out),
        },
        TypeRef::Wildcard(wildcard) => {
            append_erased_signature(types, &wildcard.extends_bound(), out);
        }
        TypeRef::Captured(captured) => {
            append_erased_signature(types, captured.extends_bound(), out);
        }
        TypeRef::Compound(compound) => match compound.components().next() {
            Some(first) => append_erased_signature(types, first, out),
            None => append_erased_signature(types, &TypeRef::OBJECT, out),
        },
        TypeRef::Bottom | TypeRef::Null => append_erased_signature(types, &TypeRef::OBJECT, out),
    }
}

/// Append a formal type-parameter declaration, e.g. `T:Ljava/lang/Object;` or
/// `E::Ljava/lang/Comparable<TE;>;`.
pub fn append_formal_parameter(types: &TypeRegistry, id: GenericParamId, out: &mut String) {
    let parameter = types.generic_parameter(id);
    out.push_str(parameter.name());
    out.push(':');

    let bound = parameter.extends_bound().cloned().unwrap_or(TypeRef::OBJECT);
    let components: Vec<TypeRef> = match &bound {
        TypeRef::Compound(compound) => {
            if compound.base.is_none() {
                out.push(':');
            }
            compound.components().cloned().collect()
        }
        other => {
            if parameter.has_interface_bound() {
                out.push(':');
            }
            vec![other.clone()]
        }
    };

    for (index, component) in components.iter().enumerate() {
        if index > 0 {
            out.push(':');
        }
        append_signature(types, component, out);
    }
}

fn append_formal_parameters(types: &TypeRegistry, parameters: &[GenericParamId], out: &mut String) {
    if parameters.is_empty() {
        return;
    }

    out.push('<');
    for parameter in parameters {
        append_formal_parameter(types, *parameter, out);
    }
    out.push('>');
}

/// Signature of a generic definition used as a type: `Ljava/util/Map<TK;TV;>;`.
#[must_use]
pub fn generic_definition_signature(
    types: &TypeRegistry,
    internal_name: &str,
    parameters: &[GenericParamId],
) -> String {
    let mut out = format!("L{internal_name}");
    if !parameters.is_empty() {
        out.push('<');
        for parameter in parameters {
            let _ = write!(out, "T{};", types.generic_parameter(*parameter).name());
        }
        out.push('>');
    }
    out.push(';');
    out
}

/// Generic-aware method signature: `<T:Ljava/lang/Object;>(TT;I)TT;`.
#[must_use]
pub fn method_signature(
    types: &TypeRegistry,
    generic_parameters: &[GenericParamId],
    parameters: &[TypeRef],
    return_type: &TypeRef,
) -> String {
    let mut out = String::new();
    append_formal_parameters(types, generic_parameters, &mut out);

    out.push('(');
    for parameter in parameters {
        append_signature(types, parameter, &mut out);
    }
    out.push(')');
    append_signature(types, return_type, &mut out);
    out
}

/// Method descriptor: `(Ljava/lang/Object;I)Ljava/lang/Object;`.
#[must_use]
pub fn method_descriptor(types: &TypeRegistry, parameters: &[TypeRef], return_type: &TypeRef) -> String {
    let mut out = String::from("(");
    for parameter in parameters {
        append_erased_signature(types, parameter, &mut out);
    }
    out.push(')');
    append_erased_signature(types, return_type, &mut out);
    out
}

/// The `Signature` attribute form of a resolved class: formal parameters, superclass and
/// interfaces. Unresolved classes render as `Ljava/lang/Object;`.
#[must_use]
pub fn class_signature(types: &TypeRegistry, id: ClassId) -> String {
    let mut out = String::new();
    let Some(definition) = types.definition(id) else {
        append_erased_signature(types, &TypeRef::OBJECT, &mut out);
        return out;
    };

    append_formal_parameters(types, definition.generic_parameters().as_slice(), &mut out);
    let base = definition.base_type.clone().unwrap_or(TypeRef::OBJECT);
    append_signature(types, &base, &mut out);
    for interface in &definition.interfaces {
        append_signature(types, interface, &mut out);
    }
    out
}
