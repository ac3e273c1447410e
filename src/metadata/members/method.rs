use crate::metadata::{
    classfile::Attribute,
    flags::Flags,
    members::{MethodId, ParamId, VariableDefinition},
    typesystem::{
        ClassId, GenericOwner, GenericParamId, OwnedCollection, SignatureCache, TypeRef,
    },
};

/// One entry of a `Code` attribute's exception table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// First covered instruction offset
    pub start_pc: u16,
    /// Offset one past the last covered instruction
    pub end_pc: u16,
    /// Offset of the handler code
    pub handler_pc: u16,
    /// Caught type; `None` for `finally` blocks
    pub catch_type: Option<TypeRef>,
}

impl ExceptionHandler {
    /// `true` for handlers that catch everything (`finally`).
    #[must_use]
    pub fn is_finally(&self) -> bool {
        self.catch_type.is_none()
    }

    /// `true` if the handler covers the instruction at `pc`.
    #[must_use]
    pub fn covers(&self, pc: u16) -> bool {
        pc >= self.start_pc && pc < self.end_pc
    }
}

/// A decoded `Code` attribute.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local-variable slots
    pub max_locals: u16,
    /// Raw bytecode
    pub code: Vec<u8>,
    /// Exception table, in declaration order
    pub exception_handlers: Vec<ExceptionHandler>,
    /// Entries of `LocalVariableTable`
    pub variables: Vec<VariableDefinition>,
}

impl MethodBody {
    /// The variable stored in `slot` at instruction `pc`, if the table names one.
    #[must_use]
    pub fn variable_at(&self, slot: usize, pc: u16) -> Option<&VariableDefinition> {
        self.variables
            .iter()
            .find(|variable| variable.slot == slot && variable.is_live_at(pc))
    }
}

/// A decoded method, constructor or initializer.
///
/// The parameter, generic-parameter and local-type lists are owner-synchronized collections;
/// mutate them through the [`crate::metadata::typesystem::TypeRegistry`] so that back-links
/// and the cached signatures stay consistent.
#[derive(Debug, Clone)]
pub struct MethodDefinition {
    /// Method name; `<init>` for constructors and `<clinit>` for type initializers
    pub name: String,
    /// The class declaring the method
    pub declaring_type: ClassId,
    /// Access flags and markers
    pub flags: Flags,
    /// Declared exceptions
    pub thrown_types: Vec<TypeRef>,
    /// Decoded `Code` attribute
    pub body: Option<MethodBody>,
    /// Raw attributes kept by the decoder
    pub attributes: Vec<Attribute>,
    pub(crate) return_type: TypeRef,
    pub(crate) parameters: OwnedCollection<ParamId, MethodId>,
    pub(crate) generic_parameters: OwnedCollection<GenericParamId, GenericOwner>,
    pub(crate) declared_types: OwnedCollection<ClassId, MethodId>,
    pub(crate) signature: SignatureCache,
    pub(crate) discarded: bool,
}

impl MethodDefinition {
    pub(crate) fn new(
        id: MethodId,
        declaring_type: ClassId,
        name: String,
        flags: Flags,
        return_type: TypeRef,
    ) -> Self {
        MethodDefinition {
            name,
            declaring_type,
            flags,
            thrown_types: Vec::new(),
            body: None,
            attributes: Vec::new(),
            return_type,
            parameters: OwnedCollection::new(id),
            generic_parameters: OwnedCollection::new(GenericOwner::Method(id)),
            declared_types: OwnedCollection::new(id),
            signature: SignatureCache::default(),
            discarded: false,
        }
    }

    /// The declared return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Parameters in declaration order, synthetic ones included.
    #[must_use]
    pub fn parameters(&self) -> &OwnedCollection<ParamId, MethodId> {
        &self.parameters
    }

    /// Declared method type parameters.
    #[must_use]
    pub fn generic_parameters(&self) -> &OwnedCollection<GenericParamId, GenericOwner> {
        &self.generic_parameters
    }

    /// Local and anonymous classes declared in the method body.
    #[must_use]
    pub fn declared_types(&self) -> &OwnedCollection<ClassId, MethodId> {
        &self.declared_types
    }

    /// `true` for `<init>`.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    /// `true` for `<clinit>`.
    #[must_use]
    pub fn is_type_initializer(&self) -> bool {
        self.name == "<clinit>"
    }

    /// `true` for `static` methods.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(Flags::STATIC)
    }

    /// `true` for `abstract` methods.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(Flags::ABSTRACT)
    }

    /// `true` if the method belonged to a class whose decode failed.
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// `true` if the method declares type parameters.
    #[must_use]
    pub fn is_generic_method(&self) -> bool {
        !self.generic_parameters.is_empty()
    }
}
