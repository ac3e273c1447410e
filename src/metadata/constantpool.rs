//! Constant-pool decoding and token lookups.
//!
//! Every symbolic reference in a class file points into its constant pool by a 1-based
//! [`crate::metadata::token::Token`]. [`ConstantPool::read`] decodes the pool section from a
//! [`crate::file::Buffer`], and the typed accessors resolve tokens into names, descriptors and
//! literal values, failing with [`crate::Error::InvalidToken`] or
//! [`crate::Error::UnexpectedTag`] instead of panicking on broken input.
//!
//! `Long` and `Double` entries occupy two slots; the second slot is unusable and any lookup
//! against it is an invalid token.

use strum::{Display, FromRepr, IntoStaticStr};

use crate::{file::Buffer, metadata::token::Token, Error, Result};

/// The tag byte that introduces each constant-pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum ConstantTag {
    /// `CONSTANT_Utf8`
    Utf8 = 1,
    /// `CONSTANT_Integer`
    Integer = 3,
    /// `CONSTANT_Float`
    Float = 4,
    /// `CONSTANT_Long`
    Long = 5,
    /// `CONSTANT_Double`
    Double = 6,
    /// `CONSTANT_Class`
    Class = 7,
    /// `CONSTANT_String`
    String = 8,
    /// `CONSTANT_Fieldref`
    FieldRef = 9,
    /// `CONSTANT_Methodref`
    MethodRef = 10,
    /// `CONSTANT_InterfaceMethodref`
    InterfaceMethodRef = 11,
    /// `CONSTANT_NameAndType`
    NameAndType = 12,
    /// `CONSTANT_MethodHandle`
    MethodHandle = 15,
    /// `CONSTANT_MethodType`
    MethodType = 16,
    /// `CONSTANT_Dynamic`
    Dynamic = 17,
    /// `CONSTANT_InvokeDynamic`
    InvokeDynamic = 18,
    /// `CONSTANT_Module`
    Module = 19,
    /// `CONSTANT_Package`
    Package = 20,
}

/// The `reference_kind` of a `CONSTANT_MethodHandle` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum ReferenceKind {
    /// `REF_getField`
    GetField = 1,
    /// `REF_getStatic`
    GetStatic = 2,
    /// `REF_putField`
    PutField = 3,
    /// `REF_putStatic`
    PutStatic = 4,
    /// `REF_invokeVirtual`
    InvokeVirtual = 5,
    /// `REF_invokeStatic`
    InvokeStatic = 6,
    /// `REF_invokeSpecial`
    InvokeSpecial = 7,
    /// `REF_newInvokeSpecial`
    NewInvokeSpecial = 8,
    /// `REF_invokeInterface`
    InvokeInterface = 9,
}

impl ReferenceKind {
    /// Returns `true` if the handle targets a field rather than a method.
    #[must_use]
    pub fn is_field(self) -> bool {
        matches!(
            self,
            ReferenceKind::GetField
                | ReferenceKind::GetStatic
                | ReferenceKind::PutField
                | ReferenceKind::PutStatic
        )
    }
}

/// One decoded constant-pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    /// A modified UTF-8 string
    Utf8(String),
    /// A 32-bit integer literal
    Integer(i32),
    /// A 32-bit float literal
    Float(f32),
    /// A 64-bit integer literal (occupies two slots)
    Long(i64),
    /// A 64-bit float literal (occupies two slots)
    Double(f64),
    /// A class or array type, named by a `Utf8` entry
    Class {
        /// Token of the internal name
        name_index: Token,
    },
    /// A string literal
    String {
        /// Token of the `Utf8` contents
        string_index: Token,
    },
    /// A field reference
    FieldRef {
        /// Token of the declaring `Class` entry
        class_index: Token,
        /// Token of the `NameAndType` entry
        name_and_type_index: Token,
    },
    /// A class method reference
    MethodRef {
        /// Token of the declaring `Class` entry
        class_index: Token,
        /// Token of the `NameAndType` entry
        name_and_type_index: Token,
    },
    /// An interface method reference
    InterfaceMethodRef {
        /// Token of the declaring `Class` entry
        class_index: Token,
        /// Token of the `NameAndType` entry
        name_and_type_index: Token,
    },
    /// A member name paired with its descriptor
    NameAndType {
        /// Token of the name
        name_index: Token,
        /// Token of the descriptor
        descriptor_index: Token,
    },
    /// A method handle
    MethodHandle {
        /// The kind of access the handle performs
        kind: ReferenceKind,
        /// Token of the referenced field or method
        reference_index: Token,
    },
    /// A method type, named by its descriptor
    MethodType {
        /// Token of the method descriptor
        descriptor_index: Token,
    },
    /// A dynamically computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Token of the `NameAndType` entry
        name_and_type_index: Token,
    },
    /// A dynamically computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Token of the `NameAndType` entry
        name_and_type_index: Token,
    },
    /// A module
    Module {
        /// Token of the module name
        name_index: Token,
    },
    /// A package exported or opened by a module
    Package {
        /// Token of the package name
        name_index: Token,
    },
}

impl ConstantPoolEntry {
    /// The tag this entry was decoded from.
    #[must_use]
    pub fn tag(&self) -> ConstantTag {
        match self {
            ConstantPoolEntry::Utf8(_) => ConstantTag::Utf8,
            ConstantPoolEntry::Integer(_) => ConstantTag::Integer,
            ConstantPoolEntry::Float(_) => ConstantTag::Float,
            ConstantPoolEntry::Long(_) => ConstantTag::Long,
            ConstantPoolEntry::Double(_) => ConstantTag::Double,
            ConstantPoolEntry::Class { .. } => ConstantTag::Class,
            ConstantPoolEntry::String { .. } => ConstantTag::String,
            ConstantPoolEntry::FieldRef { .. } => ConstantTag::FieldRef,
            ConstantPoolEntry::MethodRef { .. } => ConstantTag::MethodRef,
            ConstantPoolEntry::InterfaceMethodRef { .. } => ConstantTag::InterfaceMethodRef,
            ConstantPoolEntry::NameAndType { .. } => ConstantTag::NameAndType,
            ConstantPoolEntry::MethodHandle { .. } => ConstantTag::MethodHandle,
            ConstantPoolEntry::MethodType { .. } => ConstantTag::MethodType,
            ConstantPoolEntry::Dynamic { .. } => ConstantTag::Dynamic,
            ConstantPoolEntry::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
            ConstantPoolEntry::Module { .. } => ConstantTag::Module,
            ConstantPoolEntry::Package { .. } => ConstantTag::Package,
        }
    }

    /// Returns `true` for entries that take two pool slots.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_))
    }
}

/// A literal value, as found in the pool or narrowed for a `ConstantValue` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// A `boolean` field constant
    Boolean(bool),
    /// A `byte` field constant
    Byte(i8),
    /// A `char` field constant (a UTF-16 code unit)
    Char(u16),
    /// A `short` field constant
    Short(i16),
    /// An `int` literal
    Integer(i32),
    /// A `float` literal
    Float(f32),
    /// A `long` literal
    Long(i64),
    /// A `double` literal
    Double(f64),
    /// A string literal (also used for raw `Utf8` lookups)
    String(String),
}

impl ConstantValue {
    /// The value widened to `i64`, for the integral variants.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            ConstantValue::Boolean(value) => Some(i64::from(*value)),
            ConstantValue::Byte(value) => Some(i64::from(*value)),
            ConstantValue::Char(value) => Some(i64::from(*value)),
            ConstantValue::Short(value) => Some(i64::from(*value)),
            ConstantValue::Integer(value) => Some(i64::from(*value)),
            ConstantValue::Long(value) => Some(*value),
            ConstantValue::Float(_) | ConstantValue::Double(_) | ConstantValue::String(_) => None,
        }
    }
}

/// A field or method reference with every token already resolved to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberReferenceInfo<'a> {
    /// `FieldRef`, `MethodRef` or `InterfaceMethodRef`
    pub tag: ConstantTag,
    /// Internal name (or array descriptor) of the declaring type
    pub class_name: &'a str,
    /// Member name
    pub name: &'a str,
    /// Member descriptor
    pub descriptor: &'a str,
}

/// A decoded constant pool.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    // Slot 0 and the second half of wide entries are `None`.
    entries: Vec<Option<ConstantPoolEntry>>,
}

impl ConstantPool {
    /// Decode the constant-pool section at the buffer's cursor.
    ///
    /// The cursor must point at `constant_pool_count`; on success it points at the first byte
    /// after the pool.
    ///
    /// # Errors
    /// Fails on truncated input, unknown tags, invalid modified UTF-8 and unknown method-handle
    /// kinds.
    pub fn read(buffer: &mut Buffer) -> Result<Self> {
        let count = buffer.read_be::<u16>()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(None);

        let mut index: u16 = 1;
        while index < count {
            let tag = buffer.read_be::<u8>()?;
            let Some(tag) = ConstantTag::from_repr(tag) else {
                return Err(Error::UnknownTag { tag, index });
            };

            let entry = match tag {
                ConstantTag::Utf8 => ConstantPoolEntry::Utf8(buffer.read_utf8()?),
                ConstantTag::Integer => ConstantPoolEntry::Integer(buffer.read_be()?),
                ConstantTag::Float => ConstantPoolEntry::Float(buffer.read_be()?),
                ConstantTag::Long => ConstantPoolEntry::Long(buffer.read_be()?),
                ConstantTag::Double => ConstantPoolEntry::Double(buffer.read_be()?),
                ConstantTag::Class => ConstantPoolEntry::Class {
                    name_index: Token(buffer.read_be()?),
                },
                ConstantTag::String => ConstantPoolEntry::String {
                    string_index: Token(buffer.read_be()?),
                },
                ConstantTag::FieldRef => ConstantPoolEntry::FieldRef {
                    class_index: Token(buffer.read_be()?),
                    name_and_type_index: Token(buffer.read_be()?),
                },
                ConstantTag::MethodRef => ConstantPoolEntry::MethodRef {
                    class_index: Token(buffer.read_be()?),
                    name_and_type_index: Token(buffer.read_be()?),
                },
                ConstantTag::InterfaceMethodRef => ConstantPoolEntry::InterfaceMethodRef {
                    class_index: Token(buffer.read_be()?),
                    name_and_type_index: Token(buffer.read_be()?),
                },
                ConstantTag::NameAndType => ConstantPoolEntry::NameAndType {
                    name_index: Token(buffer.read_be()?),
                    descriptor_index: Token(buffer.read_be()?),
                },
                ConstantTag::MethodHandle => {
                    let raw_kind = buffer.read_be::<u8>()?;
                    let Some(kind) = ReferenceKind::from_repr(raw_kind) else {
                        return Err(malformed_error!(
                            "Unknown method handle kind {} at constant pool index {}",
                            raw_kind,
                            index
                        ));
                    };
                    ConstantPoolEntry::MethodHandle {
                        kind,
                        reference_index: Token(buffer.read_be()?),
                    }
                }
                ConstantTag::MethodType => ConstantPoolEntry::MethodType {
                    descriptor_index: Token(buffer.read_be()?),
                },
                ConstantTag::Dynamic => ConstantPoolEntry::Dynamic {
                    bootstrap_method_attr_index: buffer.read_be()?,
                    name_and_type_index: Token(buffer.read_be()?),
                },
                ConstantTag::InvokeDynamic => ConstantPoolEntry::InvokeDynamic {
                    bootstrap_method_attr_index: buffer.read_be()?,
                    name_and_type_index: Token(buffer.read_be()?),
                },
                ConstantTag::Module => ConstantPoolEntry::Module {
                    name_index: Token(buffer.read_be()?),
                },
                ConstantTag::Package => ConstantPoolEntry::Package {
                    name_index: Token(buffer.read_be()?),
                },
            };

            let wide = entry.is_wide();
            entries.push(Some(entry));
            index += 1;

            if wide {
                entries.push(None);
                index = index.saturating_add(1);
            }
        }

        Ok(ConstantPool { entries })
    }

    /// The `constant_pool_count` value: one more than the highest valid token.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Iterate over every usable entry with its token.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &ConstantPoolEntry)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            let entry = entry.as_ref()?;
            Some((Token(u16::try_from(index).ok()?), entry))
        })
    }

    /// Look up the entry at `token`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] for token 0, tokens past the end of the pool and
    /// the unusable second slot of wide entries.
    pub fn get(&self, token: Token) -> Result<&ConstantPoolEntry> {
        self.entries
            .get(token.index())
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidToken(token))
    }

    /// The tag of the entry at `token`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if `token` names no entry.
    pub fn tag(&self, token: Token) -> Result<ConstantTag> {
        Ok(self.get(token)?.tag())
    }

    pub(crate) fn mismatch(
        &self,
        token: Token,
        expected: ConstantTag,
        found: &ConstantPoolEntry,
    ) -> Error {
        Error::UnexpectedTag {
            token,
            expected: expected.into(),
            found: found.tag().into(),
        }
    }

    /// The text of a `Utf8` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `Utf8` entry.
    pub fn utf8(&self, token: Token) -> Result<&str> {
        match self.get(token)? {
            ConstantPoolEntry::Utf8(value) => Ok(value),
            other => Err(self.mismatch(token, ConstantTag::Utf8, other)),
        }
    }

    /// The internal name carried by a `Class` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `Class` entry.
    pub fn class_name(&self, token: Token) -> Result<&str> {
        match self.get(token)? {
            ConstantPoolEntry::Class { name_index } => self.utf8(*name_index),
            other => Err(self.mismatch(token, ConstantTag::Class, other)),
        }
    }

    /// The contents of a `String` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `String` entry.
    pub fn string(&self, token: Token) -> Result<&str> {
        match self.get(token)? {
            ConstantPoolEntry::String { string_index } => self.utf8(*string_index),
            other => Err(self.mismatch(token, ConstantTag::String, other)),
        }
    }

    /// The `(name, descriptor)` pair of a `NameAndType` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `NameAndType` entry.
    pub fn name_and_type(&self, token: Token) -> Result<(&str, &str)> {
        match self.get(token)? {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            other => Err(self.mismatch(token, ConstantTag::NameAndType, other)),
        }
    }

    /// Resolve a `FieldRef`, `MethodRef` or `InterfaceMethodRef` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid, names another kind of entry, or any nested token is broken.
    pub fn member_reference(&self, token: Token) -> Result<MemberReferenceInfo<'_>> {
        let entry = self.get(token)?;
        let (class_index, name_and_type_index) = match entry {
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => (*class_index, *name_and_type_index),
            other => return Err(self.mismatch(token, ConstantTag::MethodRef, other)),
        };

        let (name, descriptor) = self.name_and_type(name_and_type_index)?;
        Ok(MemberReferenceInfo {
            tag: entry.tag(),
            class_name: self.class_name(class_index)?,
            name,
            descriptor,
        })
    }

    /// Resolve a `MethodHandle` entry into its kind and target member.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `MethodHandle` entry.
    pub fn method_handle(&self, token: Token) -> Result<(ReferenceKind, MemberReferenceInfo<'_>)> {
        match self.get(token)? {
            ConstantPoolEntry::MethodHandle {
                kind,
                reference_index,
            } => Ok((*kind, self.member_reference(*reference_index)?)),
            other => Err(self.mismatch(token, ConstantTag::MethodHandle, other)),
        }
    }

    /// The descriptor of a `MethodType` entry.
    ///
    /// # Errors
    /// Fails if `token` is invalid or does not name a `MethodType` entry.
    pub fn method_type(&self, token: Token) -> Result<&str> {
        match self.get(token)? {
            ConstantPoolEntry::MethodType { descriptor_index } => self.utf8(*descriptor_index),
            other => Err(self.mismatch(token, ConstantTag::MethodType, other)),
        }
    }

    /// The literal value stored at `token`.
    ///
    /// `Utf8` and `String` entries both produce [`ConstantValue::String`].
    ///
    /// # Errors
    /// Fails if `token` is invalid or names a non-literal entry.
    pub fn constant(&self, token: Token) -> Result<ConstantValue> {
        match self.get(token)? {
            ConstantPoolEntry::Utf8(value) => Ok(ConstantValue::String(value.clone())),
            ConstantPoolEntry::Integer(value) => Ok(ConstantValue::Integer(*value)),
            ConstantPoolEntry::Float(value) => Ok(ConstantValue::Float(*value)),
            ConstantPoolEntry::Long(value) => Ok(ConstantValue::Long(*value)),
            ConstantPoolEntry::Double(value) => Ok(ConstantValue::Double(*value)),
            ConstantPoolEntry::String { string_index } => {
                Ok(ConstantValue::String(self.utf8(*string_index)?.to_string()))
            }
            other => Err(self.mismatch(token, ConstantTag::Integer, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(buffer: &mut Buffer, value: &str) {
        buffer.write_be(1u8);
        buffer.write_be(u16::try_from(value.len()).unwrap());
        buffer.write_bytes(value.as_bytes());
    }

    fn sample_pool() -> Buffer {
        let mut buffer = Buffer::new();
        buffer.write_be(12u16);
        utf8(&mut buffer, "a/B"); // 1
        buffer.write_be(7u8); // 2: Class a/B
        buffer.write_be(1u16);
        buffer.write_be(5u8); // 3-4: Long
        buffer.write_be(-9i64);
        utf8(&mut buffer, "value"); // 5
        utf8(&mut buffer, "I"); // 6
        buffer.write_be(12u8); // 7: NameAndType value:I
        buffer.write_be(5u16);
        buffer.write_be(6u16);
        buffer.write_be(9u8); // 8: FieldRef a/B.value:I
        buffer.write_be(2u16);
        buffer.write_be(7u16);
        buffer.write_be(8u8); // 9: String "value"
        buffer.write_be(5u16);
        buffer.write_be(15u8); // 10: MethodHandle getField
        buffer.write_be(1u8);
        buffer.write_be(8u16);
        buffer.write_be(3u8); // 11: Integer
        buffer.write_be(42i32);
        buffer.write_be(0xFFu8); // trailing byte after the pool
        buffer.rewind();
        buffer
    }

    #[test]
    fn test_read_pool() {
        let mut buffer = sample_pool();
        let pool = ConstantPool::read(&mut buffer).unwrap();

        assert_eq!(pool.len(), 12);
        assert_eq!(buffer.read_be::<u8>().unwrap(), 0xFF);
        assert_eq!(pool.iter().count(), 10);
    }

    #[test]
    fn test_typed_lookups() {
        let pool = ConstantPool::read(&mut sample_pool()).unwrap();

        assert_eq!(pool.utf8(Token(1)).unwrap(), "a/B");
        assert_eq!(pool.class_name(Token(2)).unwrap(), "a/B");
        assert_eq!(pool.name_and_type(Token(7)).unwrap(), ("value", "I"));
        assert_eq!(pool.string(Token(9)).unwrap(), "value");
        assert_eq!(pool.tag(Token(3)).unwrap(), ConstantTag::Long);

        let field = pool.member_reference(Token(8)).unwrap();
        assert_eq!(field.tag, ConstantTag::FieldRef);
        assert_eq!(field.class_name, "a/B");
        assert_eq!(field.name, "value");
        assert_eq!(field.descriptor, "I");

        let (kind, target) = pool.method_handle(Token(10)).unwrap();
        assert_eq!(kind, ReferenceKind::GetField);
        assert!(kind.is_field());
        assert_eq!(target, field);
    }

    #[test]
    fn test_constants() {
        let pool = ConstantPool::read(&mut sample_pool()).unwrap();

        assert_eq!(pool.constant(Token(3)).unwrap(), ConstantValue::Long(-9));
        assert_eq!(pool.constant(Token(11)).unwrap(), ConstantValue::Integer(42));
        assert_eq!(
            pool.constant(Token(9)).unwrap(),
            ConstantValue::String("value".to_string())
        );
        assert_eq!(ConstantValue::Integer(42).as_long(), Some(42));
        assert!(pool.constant(Token(2)).is_err());
    }

    #[test]
    fn test_invalid_tokens() {
        let pool = ConstantPool::read(&mut sample_pool()).unwrap();

        assert!(matches!(pool.get(Token(0)), Err(Error::InvalidToken(_))));
        assert!(matches!(pool.get(Token(4)), Err(Error::InvalidToken(_))));
        assert!(matches!(pool.get(Token(12)), Err(Error::InvalidToken(_))));
        assert!(matches!(
            pool.class_name(Token(1)),
            Err(Error::UnexpectedTag {
                expected: "Class",
                found: "Utf8",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let mut buffer = Buffer::new();
        buffer.write_be(2u16);
        buffer.write_be(2u8);
        buffer.rewind();

        assert!(matches!(
            ConstantPool::read(&mut buffer),
            Err(Error::UnknownTag { tag: 2, index: 1 })
        ));
    }

    #[test]
    fn test_truncated_pool() {
        let mut buffer = Buffer::new();
        buffer.write_be(3u16);
        buffer.write_be(1u8);
        buffer.write_be(10u16);
        buffer.write_bytes(b"abc");
        buffer.rewind();

        assert!(matches!(
            ConstantPool::read(&mut buffer),
            Err(Error::OutOfBounds { .. })
        ));
    }
}
