use crate::metadata::{
    classfile::Attribute,
    constantpool::ConstantValue,
    flags::Flags,
    typesystem::{ClassId, TypeRef},
};

/// A decoded field.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// The class declaring the field
    pub declaring_type: ClassId,
    /// Access flags and markers
    pub flags: Flags,
    /// Declared type, generic when a `Signature` attribute was present
    pub field_type: TypeRef,
    /// Initial value from `ConstantValue`, narrowed to the field's primitive kind
    pub constant_value: Option<ConstantValue>,
    /// Raw attributes kept by the decoder
    pub attributes: Vec<Attribute>,
}

impl FieldDefinition {
    /// A field without constant value or attributes.
    pub fn new(name: impl Into<String>, declaring_type: ClassId, flags: Flags, field_type: TypeRef) -> Self {
        FieldDefinition {
            name: name.into(),
            declaring_type,
            flags,
            field_type,
            constant_value: None,
            attributes: Vec::new(),
        }
    }

    /// `true` for `static` fields.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(Flags::STATIC)
    }

    /// `true` for enum constants.
    #[must_use]
    pub fn is_enum_constant(&self) -> bool {
        self.flags.contains(Flags::ENUM)
    }
}
