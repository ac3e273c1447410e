use std::sync::{Arc, OnceLock};

use crate::metadata::{
    classfile::{Attribute, BootstrapMethod, EnclosingMethodInfo},
    constantpool::ConstantPool,
    flags::Flags,
    members::{FieldId, MethodId},
    typesystem::{ClassId, GenericParamId, OwnedCollection, TypeRef},
};

/// How far on-demand loading got for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Nobody asked for the definition yet
    Unresolved,
    /// The decoder is building the definition
    Loading,
    /// The definition is installed
    Resolved,
    /// No loader had the class, or its bytes failed to decode
    Failed,
}

/// Lazily computed signature strings with explicit invalidation.
///
/// Reads fill the cache through `&self`; structural changes to whatever the strings are derived
/// from must call [`SignatureCache::invalidate`], which needs `&mut self`.
#[derive(Debug, Default, Clone)]
pub struct SignatureCache {
    signature: OnceLock<String>,
    erased_signature: OnceLock<String>,
}

impl SignatureCache {
    /// The cached signature, computing it with `compute` on a miss.
    pub fn signature(&self, compute: impl FnOnce() -> String) -> &str {
        self.signature.get_or_init(compute)
    }

    /// The cached erased signature, computing it with `compute` on a miss.
    pub fn erased_signature(&self, compute: impl FnOnce() -> String) -> &str {
        self.erased_signature.get_or_init(compute)
    }

    /// Returns `true` if either string is currently cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.signature.get().is_some() || self.erased_signature.get().is_some()
    }

    /// Forget both strings.
    pub fn invalidate(&mut self) {
        self.signature.take();
        self.erased_signature.take();
    }
}

/// The declaration a generic parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    /// A generic class or interface
    Type(ClassId),
    /// A generic method
    Method(MethodId),
}

/// A declared type variable.
#[derive(Debug, Clone)]
pub struct GenericParameterNode {
    name: String,
    pub(crate) position: usize,
    pub(crate) owner: Option<GenericOwner>,
    pub(crate) extends_bound: Option<TypeRef>,
    pub(crate) interface_bound: bool,
}

impl GenericParameterNode {
    /// A fresh, unowned parameter without a bound.
    pub fn new(name: impl Into<String>) -> Self {
        GenericParameterNode {
            name: name.into(),
            position: 0,
            owner: None,
            extends_bound: None,
            interface_bound: false,
        }
    }

    /// The declared name, e.g. `T`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based index in the owner's parameter list.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The declaring type or method; `None` for unowned placeholders.
    #[must_use]
    pub fn owner(&self) -> Option<GenericOwner> {
        self.owner
    }

    /// The declared bound; `None` means `Object`.
    #[must_use]
    pub fn extends_bound(&self) -> Option<&TypeRef> {
        self.extends_bound.as_ref()
    }

    /// `true` if the single bound was declared in interface position, as in `T::Ljava/lang/Runnable;`.
    ///
    /// Intersection bounds carry this on [`crate::metadata::typesystem::CompoundType::base`].
    #[must_use]
    pub fn has_interface_bound(&self) -> bool {
        self.interface_bound
    }

    /// `true` if a bound other than `Object` was declared.
    #[must_use]
    pub fn has_extends_bound(&self) -> bool {
        self.extends_bound
            .as_ref()
            .is_some_and(|bound| *bound != TypeRef::OBJECT)
    }
}

/// A class name known to the registry, with its definition once resolved.
#[derive(Debug)]
pub struct ClassNode {
    internal_name: String,
    package_name: String,
    name: String,
    pub(crate) simple_name: Option<String>,
    pub(crate) declaring_type: Option<ClassId>,
    pub(crate) declaring_method: Option<MethodId>,
    pub(crate) definition: Option<TypeDefinition>,
    pub(crate) state: ResolutionState,
}

impl ClassNode {
    /// A node for `internal_name` with nothing resolved.
    #[must_use]
    pub fn new(internal_name: &str) -> Self {
        let (package_name, name) = match internal_name.rfind('/') {
            Some(split) => (
                internal_name[..split].replace('/', "."),
                &internal_name[split + 1..],
            ),
            None => (String::new(), internal_name),
        };

        ClassNode {
            internal_name: internal_name.to_string(),
            package_name,
            name: name.to_string(),
            simple_name: None,
            declaring_type: None,
            declaring_method: None,
            definition: None,
            state: ResolutionState::Unresolved,
        }
    }

    /// Slash-separated binary name, e.g. `java/util/Map$Entry`.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// Dotted package, e.g. `java.util`; empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The binary name without its package, e.g. `Map$Entry`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source-level name, e.g. `Entry`; empty for anonymous classes.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.simple_name.as_deref().unwrap_or(&self.name)
    }

    /// The enclosing class of a nested, local or anonymous class.
    #[must_use]
    pub fn declaring_type(&self) -> Option<ClassId> {
        self.declaring_type
    }

    /// The method a local or anonymous class is declared in.
    #[must_use]
    pub fn declaring_method(&self) -> Option<MethodId> {
        self.declaring_method
    }

    /// The decoded definition, if resolved.
    #[must_use]
    pub fn definition(&self) -> Option<&TypeDefinition> {
        self.definition.as_ref()
    }

    /// Mutable access to the decoded definition.
    pub fn definition_mut(&mut self) -> Option<&mut TypeDefinition> {
        self.definition.as_mut()
    }

    /// How far on-demand loading got.
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Returns `true` if a definition is installed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.definition.is_some()
    }
}

/// A decoded class or interface.
#[derive(Debug)]
pub struct TypeDefinition {
    /// Access flags and model markers
    pub flags: Flags,
    /// Class-file `minor_version`
    pub minor_version: u16,
    /// Class-file `major_version`
    pub major_version: u16,
    /// The superclass; `None` for `java/lang/Object` and unresolvable supertypes
    pub base_type: Option<TypeRef>,
    /// Directly implemented or extended interfaces
    pub interfaces: Vec<TypeRef>,
    /// Declared fields
    pub fields: Vec<FieldId>,
    /// Declared methods, constructors and initializers
    pub methods: Vec<MethodId>,
    /// Name of the source file, from `SourceFile`
    pub source_file: Option<String>,
    /// Raw attributes kept by the decoder
    pub attributes: Vec<Attribute>,
    /// The constant pool this definition was decoded from
    pub constant_pool: Option<Arc<ConstantPool>>,
    /// `EnclosingMethod` of a local or anonymous class, kept regardless of reader options
    pub enclosing_method: Option<EnclosingMethodInfo>,
    /// Entries of the `BootstrapMethods` attribute, for `invokedynamic` lookups
    pub bootstrap_methods: Vec<BootstrapMethod>,
    pub(crate) generic_parameters: OwnedCollection<GenericParamId, GenericOwner>,
    pub(crate) declared_types: Vec<ClassId>,
    pub(crate) signature: SignatureCache,
}

impl TypeDefinition {
    /// An empty definition for class `id`.
    #[must_use]
    pub fn new(id: ClassId, flags: Flags) -> Self {
        TypeDefinition {
            flags,
            minor_version: 0,
            major_version: 0,
            base_type: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            source_file: None,
            attributes: Vec::new(),
            constant_pool: None,
            enclosing_method: None,
            bootstrap_methods: Vec::new(),
            generic_parameters: OwnedCollection::new(GenericOwner::Type(id)),
            declared_types: Vec::new(),
            signature: SignatureCache::default(),
        }
    }

    /// Declared type parameters, in order.
    #[must_use]
    pub fn generic_parameters(&self) -> &OwnedCollection<GenericParamId, GenericOwner> {
        &self.generic_parameters
    }

    /// Nested, local and anonymous classes declared inside this type.
    #[must_use]
    pub fn declared_types(&self) -> &[ClassId] {
        &self.declared_types
    }

    /// `true` if the type declares type parameters.
    #[must_use]
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// `true` for interfaces (including annotation interfaces).
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(Flags::INTERFACE)
    }

    /// `true` for enum types.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.flags.contains(Flags::ENUM)
    }

    /// `true` for local and anonymous classes and reparented enum-constant bodies.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(Flags::ANONYMOUS)
    }

    /// `true` if the type carries the `Synthetic` marker.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(Flags::SYNTHETIC)
    }
}
