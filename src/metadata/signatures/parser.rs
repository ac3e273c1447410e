use crate::{
    metadata::{
        signatures::{
            ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodSignature,
            SimpleClassTypeSignature, TypeArgument, TypeSignature,
        },
        typesystem::PrimitiveKind,
    },
    Error::{self, RecursionLimit},
    Result,
};

/// Maximum nesting of type arguments and array dimensions
const MAX_RECURSION_DEPTH: usize = 255;

/// Parser for descriptor and generic-signature strings.
///
/// One parser instance reads one string. The same grammar serves descriptors and generic
/// signatures; in descriptor mode type variables, type arguments and type-parameter
/// declarations are rejected.
///
/// # Example
///
/// ```rust
/// use jvmscope::metadata::signatures::{SignatureParser, TypeSignature};
///
/// let mut parser = SignatureParser::new("Ljava/util/List<+Ljava/lang/Number;>;");
/// let signature = parser.parse_type_signature()?;
/// assert!(matches!(signature, TypeSignature::Class(_)));
/// assert!(parser.is_finished());
/// # Ok::<(), jvmscope::Error>(())
/// ```
pub struct SignatureParser<'a> {
    text: &'a str,
    position: usize,
    depth: usize,
    generic: bool,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser accepting generic signatures.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        SignatureParser {
            text,
            position: 0,
            depth: 0,
            generic: true,
        }
    }

    /// Create a parser accepting only erased descriptors.
    #[must_use]
    pub fn descriptor(text: &'a str) -> Self {
        SignatureParser {
            generic: false,
            ..SignatureParser::new(text)
        }
    }

    /// Current offset into the text.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` once the whole text has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.text.len()
    }

    fn error(&self) -> Error {
        Error::InvalidDescriptor {
            descriptor: self.text.to_string(),
            position: self.position,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn next(&mut self) -> Result<u8> {
        match self.peek() {
            Some(byte) => {
                self.position += 1;
                Ok(byte)
            }
            None => Err(self.error()),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }
        Ok(())
    }

    /// Fail unless the whole text was consumed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] pointing at the first unconsumed character.
    pub fn finish(&self) -> Result<()> {
        if self.is_finished() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Read an identifier up to (not including) the first character in `stops`.
    fn identifier(&mut self, stops: &[u8]) -> Result<&'a str> {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if stops.contains(&byte) {
                break;
            }
            self.position += 1;
        }

        if self.position == start {
            return Err(self.error());
        }
        Ok(&self.text[start..self.position])
    }

    /// Parse one field type: a primitive, class, type variable or array (no `void`).
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_type_signature(&mut self) -> Result<TypeSignature> {
        self.parse_java_type(false)
    }

    fn parse_java_type(&mut self, allow_void: bool) -> Result<TypeSignature> {
        let Some(tag) = self.peek() else {
            return Err(self.error());
        };

        match tag {
            b'L' => Ok(TypeSignature::Class(self.parse_class_type()?)),
            b'T' if self.generic => {
                self.position += 1;
                let name = self.identifier(b";")?;
                self.expect(b';')?;
                Ok(TypeSignature::TypeVariable(name.to_string()))
            }
            b'[' => {
                self.enter()?;
                self.position += 1;
                let element = self.parse_java_type(false)?;
                self.depth -= 1;
                Ok(TypeSignature::Array(Box::new(element)))
            }
            _ => match PrimitiveKind::from_descriptor(char::from(tag)) {
                Some(PrimitiveKind::Void) if !allow_void => Err(self.error()),
                Some(kind) => {
                    self.position += 1;
                    Ok(TypeSignature::Primitive(kind))
                }
                None => Err(self.error()),
            },
        }
    }

    fn parse_reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L' | b'T' | b'[') => self.parse_java_type(false),
            _ => Err(self.error()),
        }
    }

    fn parse_class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;
        self.enter()?;

        let mut segments = Vec::new();
        loop {
            let name = self.identifier(b";<.")?;
            let type_arguments = if self.generic && self.peek() == Some(b'<') {
                self.parse_type_arguments()?
            } else {
                Vec::new()
            };
            segments.push(SimpleClassTypeSignature {
                name: name.to_string(),
                type_arguments,
            });

            match self.next()? {
                b';' => break,
                b'.' if self.generic => continue,
                _ => {
                    self.position -= 1;
                    return Err(self.error());
                }
            }
        }

        self.depth -= 1;
        Ok(ClassTypeSignature { segments })
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        self.expect(b'<')?;
        let mut arguments = Vec::new();

        while self.peek() != Some(b'>') {
            let argument = match self.peek() {
                Some(b'*') => {
                    self.position += 1;
                    TypeArgument::Any
                }
                Some(b'+') => {
                    self.position += 1;
                    TypeArgument::Extends(self.parse_reference_type()?)
                }
                Some(b'-') => {
                    self.position += 1;
                    TypeArgument::Super(self.parse_reference_type()?)
                }
                _ => TypeArgument::Exact(self.parse_reference_type()?),
            };
            arguments.push(argument);
        }

        self.expect(b'>')?;
        if arguments.is_empty() {
            self.position -= 1;
            return Err(self.error());
        }
        Ok(arguments)
    }

    fn parse_type_parameters(&mut self) -> Result<Vec<FormalTypeParameter>> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        if !self.generic {
            return Err(self.error());
        }
        self.position += 1;

        let mut parameters = Vec::new();
        while self.peek() != Some(b'>') {
            let name = self.identifier(b":>")?.to_string();
            self.expect(b':')?;

            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.parse_reference_type()?),
                _ => None,
            };

            let mut interface_bounds = Vec::new();
            while self.peek() == Some(b':') {
                self.position += 1;
                interface_bounds.push(self.parse_reference_type()?);
            }

            parameters.push(FormalTypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }

        self.expect(b'>')?;
        Ok(parameters)
    }

    /// Parse a class `Signature` attribute.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_class_signature(&mut self) -> Result<ClassSignature> {
        let type_parameters = self.parse_type_parameters()?;
        let superclass = self.parse_class_type()?;

        let mut interfaces = Vec::new();
        while !self.is_finished() {
            interfaces.push(self.parse_class_type()?);
        }

        Ok(ClassSignature {
            type_parameters,
            superclass,
            interfaces,
        })
    }

    /// Parse a method descriptor or method `Signature` attribute.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_method_signature(&mut self) -> Result<MethodSignature> {
        let type_parameters = self.parse_type_parameters()?;

        self.expect(b'(')?;
        let mut parameters = Vec::new();
        while self.peek() != Some(b')') {
            parameters.push(self.parse_java_type(false)?);
        }
        self.expect(b')')?;

        let return_type = self.parse_java_type(true)?;

        let mut throws = Vec::new();
        while self.peek() == Some(b'^') {
            if !self.generic {
                return Err(self.error());
            }
            self.position += 1;
            throws.push(self.parse_reference_type()?);
        }

        Ok(MethodSignature {
            type_parameters,
            parameters,
            return_type,
            throws,
        })
    }

    /// Parse the name stored in a `CONSTANT_Class` entry.
    ///
    /// Array classes are stored as descriptors (`[Ljava/lang/String;`); everything else is a
    /// bare internal name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_internal_name(&mut self) -> Result<TypeSignature> {
        if self.peek() == Some(b'[') {
            return self.parse_java_type(false);
        }

        let start = self.position;
        let name = &self.text[start..];
        if name.is_empty() || name.contains([';', '[']) {
            return Err(self.error());
        }

        self.position = self.text.len();
        Ok(TypeSignature::Class(ClassTypeSignature::from_internal_name(
            name,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> TypeSignature {
        TypeSignature::Class(ClassTypeSignature::from_internal_name(name))
    }

    #[test]
    fn test_field_descriptors() {
        let mut parser = SignatureParser::descriptor("[[J");
        let parsed = parser.parse_type_signature().unwrap();
        assert_eq!(parsed.array_rank(), 2);
        assert!(parser.is_finished());

        let mut parser = SignatureParser::descriptor("Ljava/lang/String;");
        assert_eq!(parser.parse_type_signature().unwrap(), class("java/lang/String"));
    }

    #[test]
    fn test_descriptor_rejects_generics() {
        assert!(SignatureParser::descriptor("TT;")
            .parse_type_signature()
            .is_err());

        let mut parser = SignatureParser::descriptor("Ljava/util/List<TE;>;");
        assert!(parser.parse_type_signature().is_err());
    }

    #[test]
    fn test_void_only_as_return() {
        assert!(SignatureParser::new("V").parse_type_signature().is_err());

        let method = SignatureParser::new("(IV)V").parse_method_signature();
        assert!(method.is_err());

        let method = SignatureParser::descriptor("(IJ)V")
            .parse_method_signature()
            .unwrap();
        assert_eq!(
            method.parameters,
            vec![
                TypeSignature::Primitive(PrimitiveKind::Int),
                TypeSignature::Primitive(PrimitiveKind::Long)
            ]
        );
        assert_eq!(method.return_type, TypeSignature::Primitive(PrimitiveKind::Void));
    }

    #[test]
    fn test_generic_type_signature() {
        let mut parser =
            SignatureParser::new("Ljava/util/Map<TK;+Ljava/util/List<*>;>.Entry<-TV;>;");
        let TypeSignature::Class(parsed) = parser.parse_type_signature().unwrap() else {
            panic!("expected a class signature");
        };

        assert_eq!(parsed.internal_name(), "java/util/Map$Entry");
        assert_eq!(parsed.segments[0].type_arguments.len(), 2);
        assert_eq!(
            parsed.type_arguments(),
            &[TypeArgument::Super(TypeSignature::TypeVariable("V".into()))]
        );
        assert!(parsed.is_generic());
    }

    #[test]
    fn test_class_signature() {
        let signature = SignatureParser::new(
            "<T::Ljava/lang/Comparable<TT;>;U:Ljava/lang/Number;:Ljava/io/Serializable;>Ljava/lang/Object;Ljava/lang/Iterable<TT;>;",
        )
        .parse_class_signature()
        .unwrap();

        assert_eq!(signature.type_parameters.len(), 2);
        assert!(signature.type_parameters[0].class_bound.is_none());
        assert_eq!(signature.type_parameters[0].interface_bounds.len(), 1);
        assert_eq!(signature.type_parameters[1].bounds().count(), 2);
        assert_eq!(signature.superclass.internal_name(), "java/lang/Object");
        assert_eq!(signature.interfaces.len(), 1);
    }

    #[test]
    fn test_method_signature_with_throws() {
        let signature = SignatureParser::new("<X:Ljava/lang/Throwable;>(TX;[I)TX;^TX;^Ljava/io/IOException;")
            .parse_method_signature()
            .unwrap();

        assert_eq!(signature.type_parameters[0].name, "X");
        assert_eq!(signature.parameters.len(), 2);
        assert_eq!(signature.throws.len(), 2);
    }

    #[test]
    fn test_internal_names() {
        assert_eq!(
            SignatureParser::new("a/B").parse_internal_name().unwrap(),
            class("a/B")
        );
        assert_eq!(
            SignatureParser::new("[La/B;")
                .parse_internal_name()
                .unwrap()
                .array_rank(),
            1
        );
        assert!(SignatureParser::new("").parse_internal_name().is_err());
    }

    #[test]
    fn test_error_position() {
        let error = SignatureParser::new("Ljava/lang/String").parse_type_signature();
        match error {
            Err(Error::InvalidDescriptor { position, .. }) => assert_eq!(position, 17),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
