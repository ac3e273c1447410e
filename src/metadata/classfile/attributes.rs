use crate::{
    file::Parser,
    metadata::{
        constantpool::{ConstantPool, ConstantValue},
        token::Token,
    },
    Result,
};

/// One row of an `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassEntry {
    /// Internal name of the nested class
    pub inner_class: String,
    /// Internal name of the enclosing class; `None` for local and anonymous classes
    pub outer_class: Option<String>,
    /// Source-level simple name; `None` for anonymous classes
    pub inner_name: Option<String>,
    /// Access flags as declared in source
    pub access_flags: u16,
}

/// The `EnclosingMethod` attribute of a local or anonymous class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingMethodInfo {
    /// Internal name of the innermost enclosing class
    pub class_name: String,
    /// Name and descriptor of the enclosing method; `None` for initializer blocks
    pub method: Option<(String, String)>,
}

/// One row of a `MethodParameters` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameterEntry {
    /// Parameter name, if recorded
    pub name: Option<String>,
    /// `FINAL`, `SYNTHETIC` and `MANDATED` bits
    pub access_flags: u16,
}

/// One row of a `Code` attribute's exception table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    /// First covered offset
    pub start_pc: u16,
    /// Offset one past the covered range
    pub end_pc: u16,
    /// Handler offset
    pub handler_pc: u16,
    /// Internal name of the caught class; `None` catches everything
    pub catch_type: Option<String>,
}

/// One row of a `LocalVariableTable` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableEntry {
    /// First offset where the variable is live
    pub start_pc: u16,
    /// Length of the live range
    pub length: u16,
    /// Variable name
    pub name: String,
    /// Field descriptor of the variable type
    pub descriptor: String,
    /// Local-variable slot
    pub index: u16,
}

/// The `Code` attribute of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local-variable slots
    pub max_locals: u16,
    /// Raw bytecode
    pub code: Vec<u8>,
    /// Exception handlers in table order
    pub exception_table: Vec<ExceptionTableEntry>,
    /// Nested attributes (`LocalVariableTable`, `LineNumberTable`, ...)
    pub attributes: Vec<Attribute>,
}

/// One entry of a `BootstrapMethods` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    /// Token of the `MethodHandle` entry
    pub method_handle: Token,
    /// Tokens of the static arguments
    pub arguments: Vec<Token>,
}

/// A decoded attribute.
///
/// Attributes the type model needs are decoded into their own variant; everything else,
/// annotations included, is kept as an opaque [`Attribute::Blob`].
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `Signature`: a generic signature string
    Signature(String),
    /// `InnerClasses`
    InnerClasses(Vec<InnerClassEntry>),
    /// `EnclosingMethod`
    EnclosingMethod(EnclosingMethodInfo),
    /// `Exceptions`: internal names of the declared thrown classes
    Exceptions(Vec<String>),
    /// `MethodParameters`
    MethodParameters(Vec<MethodParameterEntry>),
    /// `Code`
    Code(Box<CodeAttribute>),
    /// `LocalVariableTable`
    LocalVariableTable(Vec<LocalVariableEntry>),
    /// `ConstantValue`: the raw pool literal, not yet narrowed to the field type
    ConstantValue(ConstantValue),
    /// `SourceFile`
    SourceFile(String),
    /// `Synthetic`
    Synthetic,
    /// `Deprecated`
    Deprecated,
    /// `BootstrapMethods`
    BootstrapMethods(Vec<BootstrapMethod>),
    /// Any other attribute, undecoded
    Blob {
        /// Attribute name
        name: String,
        /// Raw payload
        data: Vec<u8>,
    },
}

impl Attribute {
    /// The attribute name as it appears in the class file.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Attribute::Signature(_) => "Signature",
            Attribute::InnerClasses(_) => "InnerClasses",
            Attribute::EnclosingMethod(_) => "EnclosingMethod",
            Attribute::Exceptions(_) => "Exceptions",
            Attribute::MethodParameters(_) => "MethodParameters",
            Attribute::Code(_) => "Code",
            Attribute::LocalVariableTable(_) => "LocalVariableTable",
            Attribute::ConstantValue(_) => "ConstantValue",
            Attribute::SourceFile(_) => "SourceFile",
            Attribute::Synthetic => "Synthetic",
            Attribute::Deprecated => "Deprecated",
            Attribute::BootstrapMethods(_) => "BootstrapMethods",
            Attribute::Blob { name, .. } => name,
        }
    }

    /// `true` for attributes kept undecoded.
    #[must_use]
    pub fn is_blob(&self) -> bool {
        matches!(self, Attribute::Blob { .. })
    }

    /// Read one `attribute_info` structure.
    ///
    /// # Errors
    /// Fails on truncated data or a constant-pool reference of the wrong kind.
    pub fn read(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Attribute> {
        let name = pool.utf8(Token(parser.read_be::<u16>()?))?;
        let length = parser.read_be::<u32>()? as usize;
        let data = parser.read_bytes(length)?;
        let mut body = Parser::new(data);

        let attribute = match name {
            "Signature" => Attribute::Signature(read_utf8(&mut body, pool)?),
            "SourceFile" => Attribute::SourceFile(read_utf8(&mut body, pool)?),
            "Synthetic" => Attribute::Synthetic,
            "Deprecated" => Attribute::Deprecated,
            "ConstantValue" => {
                Attribute::ConstantValue(pool.constant(Token(body.read_be::<u16>()?))?)
            }
            "InnerClasses" => Attribute::InnerClasses(read_inner_classes(&mut body, pool)?),
            "EnclosingMethod" => {
                Attribute::EnclosingMethod(read_enclosing_method(&mut body, pool)?)
            }
            "Exceptions" => {
                let count = read_count!(body, u16);
                let mut exceptions = Vec::with_capacity(count);
                for _ in 0..count {
                    exceptions.push(read_class_name(&mut body, pool)?);
                }
                Attribute::Exceptions(exceptions)
            }
            "MethodParameters" => {
                let count = read_count!(body, u8);
                let mut parameters = Vec::with_capacity(count);
                for _ in 0..count {
                    let name = read_optional_utf8(&mut body, pool)?;
                    let access_flags = body.read_be::<u16>()?;
                    parameters.push(MethodParameterEntry { name, access_flags });
                }
                Attribute::MethodParameters(parameters)
            }
            "Code" => Attribute::Code(Box::new(read_code(&mut body, pool)?)),
            "LocalVariableTable" => {
                let count = read_count!(body, u16);
                let mut variables = Vec::with_capacity(count);
                for _ in 0..count {
                    variables.push(LocalVariableEntry {
                        start_pc: body.read_be::<u16>()?,
                        length: body.read_be::<u16>()?,
                        name: read_utf8(&mut body, pool)?,
                        descriptor: read_utf8(&mut body, pool)?,
                        index: body.read_be::<u16>()?,
                    });
                }
                Attribute::LocalVariableTable(variables)
            }
            "BootstrapMethods" => {
                let count = read_count!(body, u16);
                let mut methods = Vec::with_capacity(count);
                for _ in 0..count {
                    let method_handle = Token(body.read_be::<u16>()?);
                    let argument_count = read_count!(body, u16);
                    let mut arguments = Vec::with_capacity(argument_count);
                    for _ in 0..argument_count {
                        arguments.push(Token(body.read_be::<u16>()?));
                    }
                    methods.push(BootstrapMethod {
                        method_handle,
                        arguments,
                    });
                }
                Attribute::BootstrapMethods(methods)
            }
            _ => Attribute::Blob {
                name: name.to_string(),
                data: data.to_vec(),
            },
        };

        Ok(attribute)
    }
}

/// Read an `attributes_count` followed by that many attributes.
///
/// # Errors
/// See [`Attribute::read`].
pub fn read_attributes(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Vec<Attribute>> {
    let count = read_count!(parser, u16);
    let mut attributes = Vec::with_capacity(count);
    for _ in 0..count {
        attributes.push(Attribute::read(parser, pool)?);
    }
    Ok(attributes)
}

fn read_utf8(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<String> {
    Ok(pool.utf8(Token(parser.read_be::<u16>()?))?.to_string())
}

fn read_optional_utf8(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Option<String>> {
    let token = Token(parser.read_be::<u16>()?);
    if token.is_null() {
        return Ok(None);
    }
    Ok(Some(pool.utf8(token)?.to_string()))
}

fn read_class_name(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<String> {
    Ok(pool.class_name(Token(parser.read_be::<u16>()?))?.to_string())
}

fn read_optional_class_name(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Option<String>> {
    let token = Token(parser.read_be::<u16>()?);
    if token.is_null() {
        return Ok(None);
    }
    Ok(Some(pool.class_name(token)?.to_string()))
}

fn read_inner_classes(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Vec<InnerClassEntry>> {
    let count = read_count!(parser, u16);
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(InnerClassEntry {
            inner_class: read_class_name(parser, pool)?,
            outer_class: read_optional_class_name(parser, pool)?,
            inner_name: read_optional_utf8(parser, pool)?,
            access_flags: parser.read_be::<u16>()?,
        });
    }
    Ok(entries)
}

fn read_enclosing_method(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<EnclosingMethodInfo> {
    let class_name = read_class_name(parser, pool)?;
    let method_token = Token(parser.read_be::<u16>()?);
    let method = if method_token.is_null() {
        None
    } else {
        let (name, descriptor) = pool.name_and_type(method_token)?;
        Some((name.to_string(), descriptor.to_string()))
    };

    Ok(EnclosingMethodInfo { class_name, method })
}

fn read_code(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<CodeAttribute> {
    let max_stack = parser.read_be::<u16>()?;
    let max_locals = parser.read_be::<u16>()?;
    let code_length = parser.read_be::<u32>()? as usize;
    let code = parser.read_bytes(code_length)?.to_vec();

    let handler_count = read_count!(parser, u16);
    let mut exception_table = Vec::with_capacity(handler_count);
    for _ in 0..handler_count {
        exception_table.push(ExceptionTableEntry {
            start_pc: parser.read_be::<u16>()?,
            end_pc: parser.read_be::<u16>()?,
            handler_pc: parser.read_be::<u16>()?,
            catch_type: read_optional_class_name(parser, pool)?,
        });
    }

    let attributes = read_attributes(parser, pool)?;
    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    })
}
