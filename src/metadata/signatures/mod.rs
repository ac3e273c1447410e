//! Descriptor and generic-signature parsing.
//!
//! Class files describe types with two string grammars: erased *descriptors*
//! (`(ILjava/lang/String;)V`) and generic *signatures* carried by `Signature` attributes
//! (`<T:Ljava/lang/Object;>(TT;)Ljava/util/List<TT;>;`). Both are parsed here into a small
//! syntax tree ([`TypeSignature`], [`MethodSignature`], [`ClassSignature`]); binding that tree to
//! [`crate::metadata::typesystem::TypeRef`]s, which needs the class registry and the current
//! type-variable scope, is done by [`crate::metadata::resolver::MetadataSystem`].
//!
//! The [`encoders`] module goes the other way and renders type-model values as strings.
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::metadata::signatures::{parse_method_descriptor, parse_method_signature};
//!
//! let descriptor = parse_method_descriptor("(I[Ljava/lang/String;)V")?;
//! assert_eq!(descriptor.parameters.len(), 2);
//!
//! let generic = parse_method_signature("<T:Ljava/lang/Object;>(TT;)TT;")?;
//! assert_eq!(generic.type_parameters[0].name, "T");
//! # Ok::<(), jvmscope::Error>(())
//! ```
//!
//! # References
//!
//! - The Java Virtual Machine Specification, section 4.3 - Descriptors
//! - The Java Virtual Machine Specification, section 4.7.9.1 - Signatures

pub mod encoders;
mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a field descriptor such as `[J` or `Ljava/lang/String;`.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] if the text is not exactly one field descriptor.
pub fn parse_field_descriptor(text: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::descriptor(text);
    let signature = parser.parse_type_signature()?;
    parser.finish()?;
    Ok(signature)
}

/// Parse a generic field type signature such as `Ljava/util/List<TE;>;`.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] if the text is not exactly one type signature.
pub fn parse_type_signature(text: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::new(text);
    let signature = parser.parse_type_signature()?;
    parser.finish()?;
    Ok(signature)
}

/// Parse a method descriptor such as `(IJ)V`.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] on malformed input.
pub fn parse_method_descriptor(text: &str) -> Result<MethodSignature> {
    let mut parser = SignatureParser::descriptor(text);
    let signature = parser.parse_method_signature()?;
    parser.finish()?;
    Ok(signature)
}

/// Parse a method `Signature` attribute.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] on malformed input.
pub fn parse_method_signature(text: &str) -> Result<MethodSignature> {
    let mut parser = SignatureParser::new(text);
    let signature = parser.parse_method_signature()?;
    parser.finish()?;
    Ok(signature)
}

/// Parse a class `Signature` attribute.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] on malformed input.
pub fn parse_class_signature(text: &str) -> Result<ClassSignature> {
    let mut parser = SignatureParser::new(text);
    let signature = parser.parse_class_signature()?;
    parser.finish()?;
    Ok(signature)
}

/// Parse the name stored in a `CONSTANT_Class` entry: an internal name or an array descriptor.
///
/// # Errors
/// Returns [`crate::Error::InvalidDescriptor`] on malformed input.
pub fn parse_internal_name(text: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::descriptor(text);
    let signature = parser.parse_internal_name()?;
    parser.finish()?;
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_trailing_text_rejected() {
        assert!(parse_field_descriptor("II").is_err());
        assert!(parse_method_descriptor("(I)VX").is_err());

        match parse_type_signature("TT;x") {
            Err(Error::InvalidDescriptor { position, .. }) => assert_eq!(position, 3),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_descriptor_helpers() {
        let method = parse_method_descriptor("([Ljava/lang/String;)V").unwrap();
        assert_eq!(method.parameters[0].array_rank(), 1);
        assert!(method.throws.is_empty());

        let class = parse_class_signature("Ljava/lang/Object;").unwrap();
        assert!(class.type_parameters.is_empty());
        assert!(class.interfaces.is_empty());
    }
}
