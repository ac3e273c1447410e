//! Full class-file decoding.
//!
//! Decoding happens in two steps. [`ClassFile::read`] splits the bytes into their structural
//! parts (header, super class, interfaces, field and method records, attributes) with every
//! constant-pool reference needed for naming already resolved to text. The
//! [`ClassFileReader`] then turns a `ClassFile` into a [`crate::metadata::typesystem::TypeDefinition`]
//! inside a [`crate::metadata::resolver::MetadataSystem`], binding descriptors and signatures to
//! the type model and resolving related classes on demand.
//!
//! [`MetadataScope`] answers token lookups against the constant pool of a decoded class.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jvmscope::{file::Buffer, metadata::classfile::ClassFile};
//!
//! let bytes = std::fs::read("Example.class")?;
//! let class = ClassFile::read(&mut Buffer::from(bytes))?;
//!
//! println!("{} extends {:?}", class.header.name, class.super_class);
//! for method in &class.methods {
//!     println!("  {}{}", method.name, method.descriptor);
//! }
//! # Ok::<(), jvmscope::Error>(())
//! ```

mod attributes;
mod reader;
mod scope;

pub use attributes::{
    read_attributes, Attribute, BootstrapMethod, CodeAttribute, EnclosingMethodInfo,
    ExceptionTableEntry, InnerClassEntry, LocalVariableEntry, MethodParameterEntry,
};
pub use reader::ClassFileReader;
pub use scope::{MetadataScope, ScopeItem};

use crate::{
    file::{Buffer, Parser},
    metadata::{bootstrap::ClassFileHeader, token::Token},
    Result,
};

/// A field or method record before binding.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    /// Raw `access_flags`
    pub access_flags: u16,
    /// Member name
    pub name: String,
    /// Field or method descriptor
    pub descriptor: String,
    /// Decoded attributes
    pub attributes: Vec<Attribute>,
}

impl MemberInfo {
    fn read(parser: &mut Parser<'_>, header: &ClassFileHeader) -> Result<Self> {
        let pool = &header.constant_pool;
        let access_flags = parser.read_be::<u16>()?;
        let name = pool.utf8(Token(parser.read_be::<u16>()?))?.to_string();
        let descriptor = pool.utf8(Token(parser.read_be::<u16>()?))?.to_string();
        let attributes = read_attributes(parser, pool)?;

        Ok(MemberInfo {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// The `Signature` attribute, if present.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        find_signature(&self.attributes)
    }

    /// `true` if a `Synthetic` attribute is present.
    #[must_use]
    pub fn has_synthetic_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute, Attribute::Synthetic))
    }

    /// `true` if a `Deprecated` attribute is present.
    #[must_use]
    pub fn has_deprecated_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute, Attribute::Deprecated))
    }
}

/// A class file split into its parts.
#[derive(Debug, Clone)]
pub struct ClassFile {
    /// Header, constant pool and declared name
    pub header: ClassFileHeader,
    /// Internal name of the superclass; `None` only for `java/lang/Object` and modules
    pub super_class: Option<String>,
    /// Internal names of the direct superinterfaces
    pub interfaces: Vec<String>,
    /// Field records in declaration order
    pub fields: Vec<MemberInfo>,
    /// Method records in declaration order
    pub methods: Vec<MemberInfo>,
    /// Class-level attributes
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Decode the class file held by `buffer`, starting at offset 0.
    ///
    /// The cursor is left at 0 afterwards.
    ///
    /// # Errors
    /// Fails on a bad magic number, truncated data, or constant-pool references of the wrong
    /// kind.
    pub fn read(buffer: &mut Buffer) -> Result<Self> {
        buffer.rewind();
        let result = Self::read_body(buffer);
        buffer.rewind();
        result
    }

    /// Decode a class file from a byte slice.
    ///
    /// # Errors
    /// See [`ClassFile::read`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::read(&mut Buffer::from(data))
    }

    fn read_body(buffer: &mut Buffer) -> Result<Self> {
        let header = ClassFileHeader::read_prefix(buffer)?;
        let pool = &header.constant_pool;

        let mut parser = Parser::new(buffer.as_slice());
        parser.seek(buffer.position())?;

        let super_token = Token(parser.read_be::<u16>()?);
        let super_class = if super_token.is_null() {
            None
        } else {
            Some(pool.class_name(super_token)?.to_string())
        };

        let interface_count = read_count!(parser, u16);
        let mut interfaces = Vec::with_capacity(interface_count);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(Token(parser.read_be::<u16>()?))?.to_string());
        }

        let field_count = read_count!(parser, u16);
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(MemberInfo::read(&mut parser, &header)?);
        }

        let method_count = read_count!(parser, u16);
        let mut methods = Vec::with_capacity(method_count);
        for _ in 0..method_count {
            methods.push(MemberInfo::read(&mut parser, &header)?);
        }

        let attributes = read_attributes(&mut parser, pool)?;

        Ok(ClassFile {
            header,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// The class-level `Signature` attribute, if present.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        find_signature(&self.attributes)
    }

    /// Rows of the `InnerClasses` attribute; empty if absent.
    #[must_use]
    pub fn inner_classes(&self) -> &[InnerClassEntry] {
        self.attributes
            .iter()
            .find_map(|attribute| match attribute {
                Attribute::InnerClasses(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// The `EnclosingMethod` attribute, if present.
    #[must_use]
    pub fn enclosing_method(&self) -> Option<&EnclosingMethodInfo> {
        find_enclosing_method(&self.attributes)
    }

    /// The `SourceFile` attribute, if present.
    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attribute| match attribute {
            Attribute::SourceFile(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

pub(crate) fn find_signature(attributes: &[Attribute]) -> Option<&str> {
    attributes.iter().find_map(|attribute| match attribute {
        Attribute::Signature(signature) => Some(signature.as_str()),
        _ => None,
    })
}

pub(crate) fn find_enclosing_method(attributes: &[Attribute]) -> Option<&EnclosingMethodInfo> {
    attributes.iter().find_map(|attribute| match attribute {
        Attribute::EnclosingMethod(info) => Some(info),
        _ => None,
    })
}
