//! The resolver: on-demand loading and name binding over a [`TypeRegistry`].
//!
//! [`MetadataSystem`] is the orchestration root of the crate. It owns the registry, a
//! [`TypeLoader`] chain and the scoped lookup state used while binding descriptors and
//! signatures:
//!
//! - a LIFO stack of [`ResolverFrame`]s that shadow type and type-variable names for one
//!   resolution, pushed before and popped after
//! - a generic-context stack naming the methods and types whose type parameters are in scope
//!
//! Resolution is lazy. Interning a name never loads anything; [`MetadataSystem::resolve`] and
//! [`MetadataSystem::load_type`] ask the loader chain for bytes the first time a definition is
//! needed and run the [`ClassFileReader`] over them. A class that cannot be loaded is marked
//! [`ResolutionState::Failed`] once and reported as absent from then on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jvmscope::metadata::{
//!     loader::ClasspathTypeLoader,
//!     resolver::MetadataSystem,
//!     typesystem::TypeRef,
//! };
//!
//! let mut system = MetadataSystem::new(ClasspathTypeLoader::from_env());
//! let list = system.parse_type_signature("Ljava/util/List<+Ljava/lang/Number;>;")?;
//!
//! if let Some(id) = system.resolve(&list) {
//!     let definition = system.types().definition(id).unwrap();
//!     println!("{} declares {} methods", list.full_name(system.types()), definition.methods.len());
//! }
//! # Ok::<(), jvmscope::Error>(())
//! ```

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::{
    deobfuscation::{AnonymousEnumPass, DeobfuscationPass},
    file::Buffer,
    metadata::{
        classfile::{ClassFile, ClassFileReader},
        config::MetadataConfig,
        loader::TypeLoader,
        members::{FieldId, FieldRef, MethodId, MethodRef},
        signatures::{
            self, ClassTypeSignature, FormalTypeParameter, TypeArgument, TypeSignature,
        },
        typesystem::{ClassId, GenericOwner, GenericParamId, ResolutionState, TypeRef, TypeRegistry},
    },
    Error, Result,
};

/// Maximum nesting followed while binding signatures or walking enclosing scopes
const MAX_RECURSION_DEPTH: usize = 255;

/// A scoped set of name bindings.
///
/// Names bound here win over the registry: a type name maps to an explicit [`TypeRef`], a
/// type-variable name to a declared generic parameter.
#[derive(Debug, Default, Clone)]
pub struct ResolverFrame {
    types: FxHashMap<String, TypeRef>,
    type_variables: FxHashMap<String, GenericParamId>,
}

impl ResolverFrame {
    /// An empty frame.
    #[must_use]
    pub fn new() -> Self {
        ResolverFrame::default()
    }

    /// Bind an internal name to `ty` for the lifetime of the frame.
    pub fn add_type(&mut self, internal_name: impl Into<String>, ty: TypeRef) {
        self.types.insert(internal_name.into(), ty);
    }

    /// Bind a type-variable name.
    pub fn add_type_variable(&mut self, name: impl Into<String>, parameter: GenericParamId) {
        self.type_variables.insert(name.into(), parameter);
    }

    /// The type bound to `internal_name` in this frame.
    #[must_use]
    pub fn find_type(&self, internal_name: &str) -> Option<&TypeRef> {
        self.types.get(internal_name)
    }

    /// The type variable bound to `name` in this frame.
    #[must_use]
    pub fn find_type_variable(&self, name: &str) -> Option<GenericParamId> {
        self.type_variables.get(name).copied()
    }
}

/// The resolver.
///
/// One logical resolution is in flight at a time: frames and generic contexts are plain
/// stacks, and every push must be matched by a pop on the same instance.
pub struct MetadataSystem {
    types: TypeRegistry,
    loader: Box<dyn TypeLoader>,
    config: MetadataConfig,
    frames: Vec<ResolverFrame>,
    generic_context: Vec<GenericOwner>,
    depth: usize,
}

impl MetadataSystem {
    /// Create a resolver over `loader` with the default configuration.
    ///
    /// ## Arguments
    /// * 'loader' - Where class-file bytes come from
    pub fn new(loader: impl TypeLoader + 'static) -> Self {
        MetadataSystem::with_config(loader, MetadataConfig::default())
    }

    /// Create a resolver over `loader` with an explicit configuration.
    ///
    /// ## Arguments
    /// * 'loader' - Where class-file bytes come from
    /// * 'config' - Decoder options and resolution limits
    pub fn with_config(loader: impl TypeLoader + 'static, config: MetadataConfig) -> Self {
        MetadataSystem {
            types: TypeRegistry::new(),
            loader: Box::new(loader),
            config,
            frames: Vec::new(),
            generic_context: Vec::new(),
            depth: 0,
        }
    }

    /// The type registry.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Mutable access to the type registry.
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Push a lookup frame.
    pub fn push_frame(&mut self, frame: ResolverFrame) {
        self.frames.push(frame);
        trace!(depth = self.frames.len(), "pushed resolver frame");
    }

    /// Pop the most recently pushed frame.
    ///
    /// # Panics
    /// Panics if no frame is on the stack.
    pub fn pop_frame(&mut self) -> ResolverFrame {
        let Some(frame) = self.frames.pop() else {
            panic!("pop_frame called on an empty frame stack");
        };
        trace!(depth = self.frames.len(), "popped resolver frame");
        frame
    }

    /// Number of frames on the stack.
    #[must_use]
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Bring the type parameters of `owner` into scope for signature binding.
    pub fn push_generic_context(&mut self, owner: GenericOwner) {
        self.generic_context.push(owner);
    }

    /// Remove the most recently pushed generic context.
    ///
    /// # Panics
    /// Panics if the generic-context stack is empty.
    pub fn pop_generic_context(&mut self) -> GenericOwner {
        let Some(owner) = self.generic_context.pop() else {
            panic!("pop_generic_context called on an empty context stack");
        };
        owner
    }

    /// The type an internal name or array descriptor refers to.
    ///
    /// Frame bindings are consulted first, innermost frame first. Nothing is loaded.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] for a malformed array descriptor.
    pub fn lookup_type(&mut self, internal_name: &str) -> Result<TypeRef> {
        if let Some(ty) = self.find_frame_type(internal_name) {
            return Ok(ty.clone());
        }
        self.parse_internal_name(internal_name)
    }

    fn find_frame_type(&self, internal_name: &str) -> Option<&TypeRef> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.find_type(internal_name))
    }

    /// Find the type variable `name` visible from the current scope.
    ///
    /// Each generic context is searched from the top of the stack, following declaring methods
    /// and declaring types outwards; then the frames are searched, innermost first.
    #[must_use]
    pub fn find_type_variable(&self, name: &str) -> Option<GenericParamId> {
        for owner in self.generic_context.iter().rev() {
            if let Some(found) = self.find_in_owner(*owner, name) {
                return Some(found);
            }
        }

        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.find_type_variable(name))
    }

    fn find_in_owner(&self, owner: GenericOwner, name: &str) -> Option<GenericParamId> {
        let mut current = Some(owner);
        let mut steps = 0;

        while let Some(owner) = current {
            if steps >= MAX_RECURSION_DEPTH {
                return None;
            }
            steps += 1;

            if let Some(found) = self
                .types
                .generic_parameters_of(owner)
                .iter()
                .copied()
                .find(|id| self.types.generic_parameter(*id).name() == name)
            {
                return Some(found);
            }

            current = match owner {
                GenericOwner::Method(method) => {
                    Some(GenericOwner::Type(self.types.method(method).declaring_type))
                }
                GenericOwner::Type(class) => {
                    let node = self.types.class(class);
                    match (node.declaring_method(), node.declaring_type()) {
                        (Some(method), _) => Some(GenericOwner::Method(method)),
                        (None, Some(outer)) => Some(GenericOwner::Type(outer)),
                        (None, None) => None,
                    }
                }
            };
        }
        None
    }

    /// Bind a parsed signature to the type model.
    ///
    /// Class names are interned, not loaded. A type variable no scope declares becomes an
    /// unowned generic parameter, registered in the innermost frame so later occurrences of the
    /// same name share it.
    pub fn bind_type(&mut self, signature: &TypeSignature) -> TypeRef {
        self.bind_type_with_depth(signature, 0)
    }

    fn bind_type_with_depth(&mut self, signature: &TypeSignature, depth: usize) -> TypeRef {
        if depth >= MAX_RECURSION_DEPTH {
            return TypeRef::OBJECT;
        }

        match signature {
            TypeSignature::Primitive(kind) => TypeRef::Primitive(*kind),
            TypeSignature::Array(element) => {
                TypeRef::array(self.bind_type_with_depth(element, depth + 1))
            }
            TypeSignature::Class(class) => self.bind_class_type(class, depth),
            TypeSignature::TypeVariable(name) => {
                if let Some(parameter) = self.find_type_variable(name) {
                    return TypeRef::GenericParameter(parameter);
                }

                let parameter = self.types.new_generic_parameter(name.as_str());
                if let Some(frame) = self.frames.last_mut() {
                    frame.add_type_variable(name.as_str(), parameter);
                }
                TypeRef::GenericParameter(parameter)
            }
        }
    }

    fn bind_class_type(&mut self, class: &ClassTypeSignature, depth: usize) -> TypeRef {
        let internal_name = class.internal_name();
        let id = match self.find_frame_type(&internal_name).and_then(TypeRef::class_id) {
            Some(id) => id,
            None => self.types.intern_class(&internal_name),
        };

        let arguments = class.type_arguments();
        if arguments.is_empty() {
            return TypeRef::Class(id);
        }

        let arguments = arguments
            .iter()
            .map(|argument| self.bind_type_argument(argument, depth + 1))
            .collect();
        TypeRef::parameterized(id, arguments)
    }

    fn bind_type_argument(&mut self, argument: &TypeArgument, depth: usize) -> TypeRef {
        match argument {
            TypeArgument::Any => TypeRef::unbounded_wildcard(),
            TypeArgument::Exact(ty) => self.bind_type_with_depth(ty, depth),
            TypeArgument::Extends(bound) => {
                TypeRef::extends_wildcard(self.bind_type_with_depth(bound, depth))
            }
            TypeArgument::Super(bound) => {
                TypeRef::super_wildcard(self.bind_type_with_depth(bound, depth))
            }
        }
    }

    /// Declare `parameters` on `owner` and bind their bounds.
    ///
    /// Every parameter is declared before any bound is bound, so bounds may refer to
    /// parameters declared later in the same list. A single bound is used as is and remembers
    /// whether it was declared in interface position; several bounds form a
    /// [`TypeRef::Compound`] whose base is the class bound, if any.
    ///
    /// The caller must have `owner` on the generic-context stack.
    ///
    /// # Panics
    /// Panics if `owner` is an unresolved class or its parameter list is frozen.
    pub fn declare_generic_parameters(
        &mut self,
        owner: GenericOwner,
        parameters: &[FormalTypeParameter],
    ) -> Vec<GenericParamId> {
        let declared: Vec<GenericParamId> = parameters
            .iter()
            .map(|parameter| self.types.add_generic_parameter(owner, parameter.name.as_str()))
            .collect();

        for (id, parameter) in declared.iter().zip(parameters) {
            let mut bounds: Vec<TypeRef> =
                parameter.bounds().map(|bound| self.bind_type(bound)).collect();

            match (bounds.len(), parameter.class_bound.is_some()) {
                (0, _) => self.types.set_generic_parameter_bound(*id, None),
                (1, true) => self.types.set_generic_parameter_bound(*id, bounds.pop()),
                (1, false) => {
                    if let Some(bound) = bounds.pop() {
                        self.types.set_generic_parameter_interface_bound(*id, bound);
                    }
                }
                (_, has_class_bound) => {
                    let base = has_class_bound.then(|| bounds.remove(0));
                    let bound = TypeRef::compound(base, bounds);
                    self.types.set_generic_parameter_bound(*id, Some(bound));
                }
            }
        }

        declared
    }

    /// Parse and bind a field descriptor such as `[Ljava/lang/String;`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_type_descriptor(&mut self, descriptor: &str) -> Result<TypeRef> {
        let signature = signatures::parse_field_descriptor(descriptor)?;
        Ok(self.bind_type(&signature))
    }

    /// Parse and bind a generic type signature such as `Ljava/util/List<TE;>;`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_type_signature(&mut self, signature: &str) -> Result<TypeRef> {
        let parsed = signatures::parse_type_signature(signature)?;
        Ok(self.bind_type(&parsed))
    }

    /// Parse and bind the name held by a `CONSTANT_Class` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_internal_name(&mut self, name: &str) -> Result<TypeRef> {
        let parsed = signatures::parse_internal_name(name)?;
        Ok(self.bind_type(&parsed))
    }

    /// Parse and bind a method descriptor into its parameter and return types.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] on malformed input.
    pub fn parse_method_descriptor(&mut self, descriptor: &str) -> Result<(Vec<TypeRef>, TypeRef)> {
        let parsed = signatures::parse_method_descriptor(descriptor)?;
        let parameters = parsed
            .parameters
            .iter()
            .map(|parameter| self.bind_type(parameter))
            .collect();
        let return_type = self.bind_type(&parsed.return_type);
        Ok((parameters, return_type))
    }

    /// The class definition behind `ty`, loading it if needed.
    ///
    /// Arrays resolve through their element type; when that fails, as for `int[]`, the array
    /// resolves to `Object`, the superclass of every array. Type variables, wildcards, captured and
    /// intersection types resolve through their erased upper bound. Primitives and the bottom
    /// and null types have no definition.
    pub fn resolve(&mut self, ty: &TypeRef) -> Option<ClassId> {
        self.resolve_with_depth(ty, 0)
    }

    fn resolve_with_depth(&mut self, ty: &TypeRef, depth: usize) -> Option<ClassId> {
        if depth >= MAX_RECURSION_DEPTH {
            return None;
        }

        match ty {
            TypeRef::Primitive(_) | TypeRef::Bottom | TypeRef::Null => None,
            TypeRef::Class(id) | TypeRef::Raw(id) => self.resolve_class(*id),
            TypeRef::Parameterized(parameterized) => self.resolve_class(parameterized.definition),
            TypeRef::Array(array) => self
                .resolve_with_depth(array.element(), depth + 1)
                .or_else(|| self.resolve_class(ClassId::OBJECT)),
            TypeRef::GenericParameter(id) => {
                let bound = self
                    .types
                    .generic_parameter(*id)
                    .extends_bound()
                    .cloned()
                    .unwrap_or(TypeRef::OBJECT);
                self.resolve_with_depth(&bound, depth + 1)
            }
            TypeRef::Wildcard(wildcard) => {
                self.resolve_with_depth(&wildcard.extends_bound(), depth + 1)
            }
            TypeRef::Captured(captured) => {
                let bound = captured.extends_bound().clone();
                self.resolve_with_depth(&bound, depth + 1)
            }
            TypeRef::Compound(compound) => {
                let first = compound.components().next().cloned().unwrap_or(TypeRef::OBJECT);
                self.resolve_with_depth(&first, depth + 1)
            }
        }
    }

    /// Make sure `id` has a definition, loading it on first use.
    ///
    /// Returns `None` if no loader has the class or its bytes fail to decode; the failure is
    /// logged once and remembered.
    pub fn resolve_class(&mut self, id: ClassId) -> Option<ClassId> {
        match self.types.class(id).state() {
            ResolutionState::Resolved | ResolutionState::Loading => {
                self.types.definition(id).map(|_| id)
            }
            ResolutionState::Failed => None,
            ResolutionState::Unresolved => match self.ensure_loaded(id) {
                Ok(()) => self.types.definition(id).map(|_| id),
                Err(error) => {
                    warn!(
                        class = self.types.class(id).internal_name(),
                        %error,
                        "type could not be resolved"
                    );
                    None
                }
            },
        }
    }

    /// Load the class `internal_name`, failing instead of degrading to "unresolved".
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if no loader has the class (now or on an earlier
    /// attempt), [`Error::RecursionLimit`] if loads nest too deeply, or the decoding error.
    pub fn load_type(&mut self, internal_name: &str) -> Result<ClassId> {
        let id = self.types.intern_class(internal_name);
        self.ensure_loaded(id)?;
        Ok(id)
    }

    fn ensure_loaded(&mut self, id: ClassId) -> Result<()> {
        match self.types.class(id).state() {
            ResolutionState::Resolved | ResolutionState::Loading
                if self.types.definition(id).is_some() =>
            {
                Ok(())
            }
            ResolutionState::Failed => Err(Error::TypeNotFound(
                self.types.class(id).internal_name().to_string(),
            )),
            _ => {
                let result = self.load(id);
                if let Err(error) = &result {
                    // A nesting failure says nothing about the class itself.
                    let state = if matches!(error, Error::RecursionLimit(_)) {
                        ResolutionState::Unresolved
                    } else {
                        ResolutionState::Failed
                    };
                    self.types.discard_definition(id, state);
                }
                result
            }
        }
    }

    fn load(&mut self, id: ClassId) -> Result<()> {
        if self.depth >= self.config.max_resolution_depth {
            return Err(Error::RecursionLimit(self.config.max_resolution_depth));
        }

        let name = self.types.class(id).internal_name().to_string();
        let mut buffer = Buffer::new();
        if !self.loader.try_load(&name, &mut buffer) {
            trace!(class = name.as_str(), "no loader provided the type");
            return Err(Error::TypeNotFound(name));
        }

        let class = ClassFile::read(&mut buffer)?;
        if class.header.name != name {
            return Err(malformed_error!(
                "loader returned {} when asked for {}",
                class.header.name,
                name
            ));
        }

        self.decode(id, class)
    }

    fn decode(&mut self, id: ClassId, class: ClassFile) -> Result<()> {
        self.types.set_state(id, ResolutionState::Loading);

        // Signature binding must not see the type parameters of whatever triggered this load.
        let outer_context = std::mem::take(&mut self.generic_context);
        self.depth += 1;
        let result = ClassFileReader::new(self, id, class).read();
        self.depth -= 1;
        self.generic_context = outer_context;
        result?;

        debug!(class = self.types.class(id).internal_name(), "decoded class");

        let is_enum = self
            .types
            .definition(id)
            .is_some_and(|definition| definition.is_enum());
        if self.config.fix_anonymous_enums && is_enum {
            AnonymousEnumPass.run(self, id)?;
        }
        Ok(())
    }

    /// Decode a class file supplied directly and install its definition.
    ///
    /// If the declared class is already resolved, its existing id is returned and `data` is
    /// ignored.
    ///
    /// # Errors
    /// Returns the decoding error; the class is then marked as failed.
    pub fn define_from_bytes(&mut self, data: &[u8]) -> Result<ClassId> {
        let class = ClassFile::parse(data)?;
        let id = self.types.intern_class(&class.header.name);
        if self.types.definition(id).is_some() {
            return Ok(id);
        }

        if let Err(error) = self.decode(id, class) {
            self.types.discard_definition(id, ResolutionState::Failed);
            return Err(error);
        }
        Ok(id)
    }

    /// The method definition a reference points to.
    ///
    /// Symbolic references are matched by name and descriptor against the declaring type, then
    /// its superclasses and interfaces breadth-first. Methods named on array types are looked up
    /// on `Object`.
    pub fn resolve_method(&mut self, method: &MethodRef) -> Option<MethodId> {
        if let Some(id) = method.definition() {
            return Some(id);
        }

        let declaring_type = method.declaring_type(&self.types);
        let name = method.name(&self.types).to_string();
        let descriptor = method.erased_signature(&self.types);

        let start = if declaring_type.is_array() {
            self.resolve_class(ClassId::OBJECT)?
        } else {
            self.resolve(&declaring_type)?
        };

        self.search_hierarchy(start, |types, class| {
            types.definition(class)?.methods.iter().copied().find(|candidate| {
                types.method(*candidate).name == name
                    && types.method_erased_signature(*candidate) == descriptor
            })
        })
    }

    /// The field definition a reference points to, searched like [`Self::resolve_method`].
    pub fn resolve_field(&mut self, field: &FieldRef) -> Option<FieldId> {
        if let Some(id) = field.definition() {
            return Some(id);
        }

        let declaring_type = field.declaring_type(&self.types);
        let name = field.name(&self.types).to_string();
        let descriptor = field.erased_signature(&self.types);
        let start = self.resolve(&declaring_type)?;

        self.search_hierarchy(start, |types, class| {
            types.definition(class)?.fields.iter().copied().find(|candidate| {
                let definition = types.field(*candidate);
                definition.name == name
                    && definition.field_type.erased_signature(types) == descriptor
            })
        })
    }

    fn search_hierarchy<T>(
        &mut self,
        start: ClassId,
        mut find: impl FnMut(&TypeRegistry, ClassId) -> Option<T>,
    ) -> Option<T> {
        let mut queue = VecDeque::from([start]);
        let mut visited = FxHashSet::default();

        while let Some(class) = queue.pop_front() {
            if !visited.insert(class) || self.resolve_class(class).is_none() {
                continue;
            }
            if let Some(found) = find(&self.types, class) {
                return Some(found);
            }

            let Some(definition) = self.types.definition(class) else {
                continue;
            };
            queue.extend(
                definition
                    .base_type
                    .iter()
                    .chain(definition.interfaces.iter())
                    .filter_map(TypeRef::class_id),
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        metadata::{
            flags::Flags,
            loader::BufferTypeLoader,
            members::MethodReference,
            typesystem::{ClassId, GenericOwner},
        },
        test::{class_loader, ClassFileBuilder},
    };

    fn empty_system() -> MetadataSystem {
        MetadataSystem::new(BufferTypeLoader::new(Vec::new()))
    }

    #[test]
    fn test_lookup_binds_arrays_and_frames() {
        let mut system = empty_system();

        let array = system.lookup_type("[[I").unwrap();
        assert_eq!(array.internal_name(system.types()), "[[I");

        let plain = system.lookup_type("a/B").unwrap();
        assert_eq!(plain.internal_name(system.types()), "a/B");

        let mut frame = ResolverFrame::new();
        frame.add_type("a/B", TypeRef::STRING);
        system.push_frame(frame);
        assert_eq!(system.lookup_type("a/B").unwrap(), TypeRef::STRING);
        system.pop_frame();
        assert_eq!(system.lookup_type("a/B").unwrap(), plain);
    }

    #[test]
    #[should_panic(expected = "empty frame stack")]
    fn test_pop_empty_frame_panics() {
        empty_system().pop_frame();
    }

    #[test]
    fn test_unknown_type_variable_is_shared_within_frame() {
        let mut system = empty_system();
        system.push_frame(ResolverFrame::new());

        let first = system.parse_type_signature("TX;").unwrap();
        let second = system.parse_type_signature("Ljava/util/List<TX;>;").unwrap();
        assert_eq!(second.type_arguments(), &[first.clone()]);

        let TypeRef::GenericParameter(id) = first else {
            panic!("expected a type variable");
        };
        assert_eq!(system.types().generic_parameter(id).owner(), None);
        system.pop_frame();
    }

    #[test]
    fn test_generic_context_lookup_follows_declaring_type() {
        let mut system = empty_system();
        let outer = system.types_mut().intern_class("a/Outer");
        let inner = system.types_mut().intern_class("a/Outer$Inner");
        system.types_mut().define_class(outer, Flags::PUBLIC);
        system.types_mut().define_class(inner, Flags::PUBLIC);
        system.types_mut().add_declared_type(outer, inner);
        let variable = system
            .types_mut()
            .add_generic_parameter(GenericOwner::Type(outer), "T");

        system.push_generic_context(GenericOwner::Type(inner));
        assert_eq!(system.find_type_variable("T"), Some(variable));
        assert_eq!(system.find_type_variable("U"), None);
        system.pop_generic_context();
    }

    #[test]
    fn test_forward_referenced_bounds() {
        let mut system = empty_system();
        let owner = system.types_mut().intern_class("a/Node");
        system.types_mut().define_class(owner, Flags::PUBLIC);

        let signature =
            signatures::parse_class_signature("<A:TB;B::Ljava/lang/Comparable<TA;>;:Ljava/io/Serializable;>Ljava/lang/Object;")
                .unwrap();
        system.push_generic_context(GenericOwner::Type(owner));
        let declared =
            system.declare_generic_parameters(GenericOwner::Type(owner), &signature.type_parameters);
        system.pop_generic_context();

        let types = system.types();
        assert_eq!(
            types.generic_parameter(declared[0]).extends_bound(),
            Some(&TypeRef::GenericParameter(declared[1]))
        );
        let Some(TypeRef::Compound(bound)) = types.generic_parameter(declared[1]).extends_bound()
        else {
            panic!("expected an intersection bound");
        };
        assert!(bound.base.is_none());
        assert_eq!(bound.interfaces.len(), 2);
        assert_eq!(
            bound.interfaces[0],
            TypeRef::parameterized(ClassId::COMPARABLE, vec![TypeRef::GenericParameter(declared[0])])
        );
    }

    #[test]
    fn test_method_descriptor_binding() {
        let mut system = empty_system();
        let (parameters, return_type) = system.parse_method_descriptor("(J[Ljava/lang/String;)Z").unwrap();

        assert_eq!(parameters[0], TypeRef::LONG);
        assert_eq!(parameters[1], TypeRef::array(TypeRef::STRING));
        assert_eq!(return_type, TypeRef::BOOLEAN);
        assert!(system.parse_method_descriptor("(Q)V").is_err());
    }

    #[test]
    fn test_missing_class_is_remembered() {
        let mut system = empty_system();
        let missing = system.types_mut().intern_class("a/Missing");

        assert_eq!(system.resolve(&TypeRef::Class(missing)), None);
        assert_eq!(system.types().class(missing).state(), ResolutionState::Failed);
        assert!(matches!(system.load_type("a/Missing"), Err(Error::TypeNotFound(_))));
        assert_eq!(system.resolve(&TypeRef::INT), None);
    }

    #[test]
    fn test_load_on_demand() {
        let loader = class_loader(vec![
            ClassFileBuilder::new("a/Base")
                .method(0x0001, "run", "()V", |method| method)
                .build(),
            ClassFileBuilder::new("a/Derived").super_class("a/Base").build(),
        ]);
        let mut system = MetadataSystem::new(loader);

        let derived = system.load_type("a/Derived").unwrap();
        let definition = system.types().definition(derived).unwrap();
        let base = definition.base_type.clone().unwrap();
        assert_eq!(system.types().class(derived).state(), ResolutionState::Resolved);

        // The base class is only interned until someone asks for it.
        let base_id = base.class_id().unwrap();
        assert_eq!(system.types().class(base_id).state(), ResolutionState::Unresolved);

        let array = TypeRef::array(TypeRef::Class(derived));
        assert_eq!(system.resolve(&array), Some(derived));

        let reference = MethodRef::Reference(Arc::new(MethodReference {
            declaring_type: TypeRef::Class(derived),
            name: "run".to_string(),
            parameters: Vec::new(),
            return_type: TypeRef::VOID,
        }));
        let method = system.resolve_method(&reference).unwrap();
        assert_eq!(system.types().method(method).declaring_type, base_id);
    }

    #[test]
    fn test_recursion_limit_leaves_class_retryable() {
        let loader = class_loader(vec![ClassFileBuilder::new("a/Deep").build()]);
        let config = MetadataConfig {
            max_resolution_depth: 0,
            ..MetadataConfig::default()
        };
        let mut system = MetadataSystem::with_config(loader, config);

        assert!(matches!(system.load_type("a/Deep"), Err(Error::RecursionLimit(0))));
        let id = system.types().find_class("a/Deep").unwrap();
        assert_eq!(system.types().class(id).state(), ResolutionState::Unresolved);
    }

    #[test]
    fn test_failed_decode_unlinks_class() {
        let loader = class_loader(vec![
            ClassFileBuilder::new("a/Outer").build(),
            ClassFileBuilder::new("a/Outer$Bad")
                .inner_class("a/Outer$Bad", Some("a/Outer"), Some("Bad"), 0x0008)
                .method(0x0001, "ok", "()V", |method| method)
                .method(0x0001, "broken", "(Q)V", |method| method)
                .build(),
        ]);
        let mut system = MetadataSystem::new(loader);
        let outer = system.load_type("a/Outer").unwrap();
        let methods_before = system.types().methods().count();

        assert!(system.load_type("a/Outer$Bad").is_err());

        let types = system.types();
        let bad = types.find_class("a/Outer$Bad").unwrap();
        assert_eq!(types.class(bad).state(), ResolutionState::Failed);
        assert_eq!(types.class(bad).declaring_type(), None);
        assert!(types.definition(bad).is_none());
        assert!(types.definition(outer).unwrap().declared_types().is_empty());
        assert_eq!(types.full_name(bad), "a.Outer$Bad");
        assert_eq!(types.methods().count(), methods_before);
        assert!(types.methods().all(|(_, method)| method.declaring_type != bad));
    }

    #[test]
    fn test_failed_define_leaves_enclosing_method_clean() {
        let loader = class_loader(vec![ClassFileBuilder::new("a/Host")
            .method(0x0001, "run", "()V", |method| method)
            .build()]);
        let mut system = MetadataSystem::new(loader);
        let host = system.load_type("a/Host").unwrap();
        let run = system.types().definition(host).unwrap().methods[0];

        let local = ClassFileBuilder::new("a/Host$1Local")
            .inner_class("a/Host$1Local", None, Some("Local"), 0)
            .enclosing_method("a/Host", Some(("run", "()V")))
            .method(0x0001, "broken", "(Q)V", |method| method)
            .build();
        assert!(system.define_from_bytes(&local).is_err());

        let types = system.types();
        let local = types.find_class("a/Host$1Local").unwrap();
        assert!(types.method(run).declared_types().is_empty());
        assert_eq!(types.class(local).declaring_method(), None);
        assert!(types.definition(host).unwrap().declared_types().is_empty());
    }

    #[test]
    fn test_arrays_fall_back_to_object() {
        let loader = class_loader(vec![ClassFileBuilder::new("java/lang/Object").no_super().build()]);
        let mut system = MetadataSystem::new(loader);

        assert_eq!(system.resolve(&TypeRef::array(TypeRef::INT)), Some(ClassId::OBJECT));
        let missing = TypeRef::array_of_rank(TypeRef::Class(system.types_mut().intern_class("a/Gone")), 2);
        assert_eq!(system.resolve(&missing), Some(ClassId::OBJECT));
        assert_eq!(system.resolve(&TypeRef::INT), None);

        let mut empty = empty_system();
        assert_eq!(empty.resolve(&TypeRef::array(TypeRef::INT)), None);
    }

    #[test]
    fn test_interface_bound_round_trips() {
        let loader = class_loader(vec![ClassFileBuilder::new("a/Pool")
            .method(0x0001, "submit", "(Ljava/lang/Runnable;)V", |method| {
                method.signature("<R::Ljava/lang/Runnable;N:Ljava/lang/Number;>(TR;)V")
            })
            .build()]);
        let mut system = MetadataSystem::new(loader);

        let pool = system.load_type("a/Pool").unwrap();
        let submit = system.types().definition(pool).unwrap().methods[0];
        assert_eq!(
            system.types().method_signature(submit),
            "<R::Ljava/lang/Runnable;N:Ljava/lang/Number;>(TR;)V"
        );
    }

    #[test]
    fn test_define_from_bytes() {
        let mut system = empty_system();
        let bytes = ClassFileBuilder::new("a/Given").build();

        let id = system.define_from_bytes(&bytes).unwrap();
        assert_eq!(system.define_from_bytes(&bytes).unwrap(), id);
        assert!(system.types().class(id).is_resolved());
        assert!(system.define_from_bytes(&bytes[..12]).is_err());
    }
}
