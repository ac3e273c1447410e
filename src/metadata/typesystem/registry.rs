//! Central storage for every node of the type model.
//!
//! [`TypeRegistry`] owns the arenas for classes, generic parameters, methods, fields and
//! parameters, plus an index from internal name to [`ClassId`]. It is the only place that
//! writes back-references: every structural mutation of an owner-synchronized collection goes
//! through a registry method, which links or unlinks the affected nodes, renumbers positions
//! and invalidates the owner's cached signature.
//!
//! # Bootstrap types
//!
//! A fixed set of platform classes (`Object`, `Class`, `String`, the primitive wrappers, ...)
//! is interned by [`TypeRegistry::initialize`] in a fixed order, so their ids are the
//! constants on [`ClassId`]. `initialize` is idempotent and runs eagerly from
//! [`TypeRegistry::new`]; nothing is initialized on first access.
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::metadata::{
//!     flags::Flags,
//!     typesystem::{ClassId, GenericOwner, TypeRef, TypeRegistry},
//! };
//!
//! let mut types = TypeRegistry::new();
//! assert_eq!(types.find_class("java/lang/Object"), Some(ClassId::OBJECT));
//!
//! let list = types.intern_class("java/util/List");
//! types.define_class(list, Flags::PUBLIC | Flags::INTERFACE | Flags::ABSTRACT);
//! types.add_generic_parameter(GenericOwner::Type(list), "E");
//!
//! assert_eq!(types.type_signature(list), "Ljava/util/List<TE;>;");
//! assert_eq!(TypeRef::Class(list).signature(&types), "Ljava/util/List;");
//! ```

use rustc_hash::FxHashMap;

use crate::metadata::{
    flags::Flags,
    members::{FieldDefinition, FieldId, MethodDefinition, MethodId, ParamId, ParameterDefinition},
    signatures::encoders,
    typesystem::{
        arena::{Arena, ArenaId},
        ClassId, ClassNode, CollectionLinker, GenericOwner, GenericParamId,
        GenericParameterNode, OwnedCollection, PrimitiveKind, ResolutionState, SignatureCache,
        TypeDefinition, TypeRef,
    },
};

/// Classes interned by [`TypeRegistry::initialize`]; index `i` becomes `ClassId(i)`.
pub(crate) const BUILTIN_CLASSES: [&str; 18] = [
    "java/lang/Object",
    "java/lang/Class",
    "java/lang/String",
    "java/lang/Enum",
    "java/lang/Cloneable",
    "java/io/Serializable",
    "java/lang/Number",
    "java/lang/Comparable",
    "java/lang/Throwable",
    "java/lang/Boolean",
    "java/lang/Byte",
    "java/lang/Character",
    "java/lang/Short",
    "java/lang/Integer",
    "java/lang/Long",
    "java/lang/Float",
    "java/lang/Double",
    "java/lang/Void",
];

// Guards against cycles in malformed nesting information.
const MAX_NESTING_DEPTH: usize = 64;

struct GenericParameterLinker<'a> {
    nodes: &'a mut Arena<GenericParamId, GenericParameterNode>,
    cache: &'a mut SignatureCache,
}

impl CollectionLinker<GenericParamId> for GenericParameterLinker<'_> {
    type Owner = GenericOwner;

    fn link(&mut self, item: GenericParamId, owner: GenericOwner, position: usize) {
        let node = &mut self.nodes[item];
        node.owner = Some(owner);
        node.position = position;
    }

    fn unlink(&mut self, item: GenericParamId) {
        self.nodes[item].owner = None;
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

struct ParameterLinker<'a> {
    nodes: &'a mut Arena<ParamId, ParameterDefinition>,
    cache: &'a mut SignatureCache,
}

impl CollectionLinker<ParamId> for ParameterLinker<'_> {
    type Owner = MethodId;

    fn link(&mut self, item: ParamId, owner: MethodId, position: usize) {
        let node = &mut self.nodes[item];
        node.method = Some(owner);
        node.position = position;
    }

    fn unlink(&mut self, item: ParamId) {
        self.nodes[item].method = None;
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

struct DeclaredTypeLinker<'a> {
    classes: &'a mut Arena<ClassId, ClassNode>,
}

impl CollectionLinker<ClassId> for DeclaredTypeLinker<'_> {
    type Owner = MethodId;

    fn link(&mut self, item: ClassId, owner: MethodId, _position: usize) {
        self.classes[item].declaring_method = Some(owner);
    }

    fn unlink(&mut self, item: ClassId) {
        self.classes[item].declaring_method = None;
    }

    fn invalidate(&mut self) {}
}

/// Arena storage and name index for the whole type model.
#[derive(Debug)]
pub struct TypeRegistry {
    pub(crate) classes: Arena<ClassId, ClassNode>,
    pub(crate) generic_parameters: Arena<GenericParamId, GenericParameterNode>,
    pub(crate) methods: Arena<MethodId, MethodDefinition>,
    pub(crate) fields: Arena<FieldId, FieldDefinition>,
    pub(crate) parameters: Arena<ParamId, ParameterDefinition>,
    by_name: FxHashMap<String, ClassId>,
    initialized: bool,
}

impl TypeRegistry {
    /// Create a registry with the bootstrap classes interned.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            classes: Arena::new(),
            generic_parameters: Arena::new(),
            methods: Arena::new(),
            fields: Arena::new(),
            parameters: Arena::new(),
            by_name: FxHashMap::default(),
            initialized: false,
        };
        registry.initialize();
        registry
    }

    /// Intern the bootstrap classes. Calling it again does nothing.
    ///
    /// # Panics
    /// Panics if other classes were interned first, which would shift the builtin ids.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        for (index, name) in BUILTIN_CLASSES.iter().enumerate() {
            let id = self.intern_class(name);
            assert_eq!(id.index(), index, "builtin class {name} interned out of order");
        }
        self.initialized = true;
    }

    /// Returns `true` once [`TypeRegistry::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The id for `internal_name`, creating an unresolved node on first use.
    pub fn intern_class(&mut self, internal_name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(internal_name) {
            return *id;
        }

        let id = self.classes.alloc(ClassNode::new(internal_name));
        self.by_name.insert(internal_name.to_string(), id);
        id
    }

    /// The id for `internal_name`, if it was interned.
    #[must_use]
    pub fn find_class(&self, internal_name: &str) -> Option<ClassId> {
        self.by_name.get(internal_name).copied()
    }

    /// Number of interned classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Every interned class with its id.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassNode)> {
        self.classes.iter()
    }

    /// The node for `id`.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this registry.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.classes[id]
    }

    /// The definition of `id`, if resolved.
    #[must_use]
    pub fn definition(&self, id: ClassId) -> Option<&TypeDefinition> {
        self.classes[id].definition.as_ref()
    }

    /// Mutable access to the definition of `id`, if resolved.
    pub fn definition_mut(&mut self, id: ClassId) -> Option<&mut TypeDefinition> {
        self.classes[id].definition.as_mut()
    }

    /// Install an empty definition for `id` unless one exists, and return it.
    ///
    /// A class the decoder is still building stays [`ResolutionState::Loading`]; anything else
    /// becomes [`ResolutionState::Resolved`].
    pub fn define_class(&mut self, id: ClassId, flags: Flags) -> &mut TypeDefinition {
        let node = &mut self.classes[id];
        if node.state != ResolutionState::Loading {
            node.state = ResolutionState::Resolved;
        }
        node.definition
            .get_or_insert_with(|| TypeDefinition::new(id, flags))
    }

    pub(crate) fn set_state(&mut self, id: ClassId, state: ResolutionState) {
        self.classes[id].state = state;
    }

    /// Drop whatever a failed decode left behind.
    ///
    /// Removes the definition and every link the decode wrote into the rest of the graph: the
    /// class leaves its declaring type's and declaring method's lists, nested and local classes
    /// that pointed at it or its methods are detached, and its methods, parameters and type
    /// parameters lose their owners. Method nodes stay allocated but are marked discarded and
    /// no longer show up in [`TypeRegistry::methods`].
    pub(crate) fn discard_definition(&mut self, id: ClassId, state: ResolutionState) {
        let node = &mut self.classes[id];
        node.state = state;
        node.simple_name = None;
        let definition = node.definition.take();

        if let Some(outer) = self.classes[id].declaring_type.take() {
            self.unlist_declared_type(outer, id);
        }
        if let Some(method) = self.classes[id].declaring_method {
            if !self.remove_method_declared_type(method, id) {
                self.classes[id].declaring_method = None;
            }
        }

        let Some(definition) = definition else {
            return;
        };
        for inner in definition.declared_types {
            let node = &mut self.classes[inner];
            if node.declaring_type == Some(id) && node.definition.is_none() {
                node.declaring_type = None;
                node.simple_name = None;
            }
        }
        for parameter in definition.generic_parameters.iter() {
            self.generic_parameters[parameter].owner = None;
        }

        for method in definition.methods {
            let TypeRegistry {
                classes,
                generic_parameters,
                methods,
                parameters,
                ..
            } = self;
            let method = &mut methods[method];
            method.discarded = true;
            for parameter in method.parameters.iter() {
                parameters[parameter].method = None;
            }
            for parameter in method.generic_parameters.iter() {
                generic_parameters[parameter].owner = None;
            }
            for local in method.declared_types.iter() {
                classes[local].declaring_method = None;
                if classes[local].declaring_type == Some(id) {
                    classes[local].declaring_type = None;
                }
            }
        }
    }

    /// Set the source-level name of `id`.
    pub fn set_simple_name(&mut self, id: ClassId, simple_name: impl Into<String>) {
        self.classes[id].simple_name = Some(simple_name.into());
    }

    /// Dotted qualified name; nested classes are joined to their declaring class with `.`.
    #[must_use]
    pub fn full_name(&self, id: ClassId) -> String {
        let mut chain = vec![id];
        let mut current = id;

        while let Some(outer) = self.classes[current].declaring_type {
            if chain.contains(&outer) || chain.len() >= MAX_NESTING_DEPTH {
                break;
            }
            if self.classes[current].simple_name().is_empty() {
                break;
            }
            chain.push(outer);
            current = outer;
        }

        let outermost = &self.classes[current];
        let mut name = if outermost.package_name().is_empty() {
            outermost.name().to_string()
        } else {
            format!("{}.{}", outermost.package_name(), outermost.name())
        };

        for nested in chain.iter().rev().skip(1) {
            name.push('.');
            name.push_str(self.classes[*nested].simple_name());
        }
        name
    }

    /// Record `inner` as a nested class of `outer`.
    ///
    /// Sets the declaring type of `inner` and, if `outer` is resolved, appends `inner` to its
    /// declared types unless it is already listed. A class moved from another declaring type
    /// is removed from that type's list.
    pub fn add_declared_type(&mut self, outer: ClassId, inner: ClassId) {
        if let Some(previous) = self.classes[inner].declaring_type.replace(outer) {
            if previous != outer {
                self.unlist_declared_type(previous, inner);
            }
        }
        if let Some(definition) = self.classes[outer].definition.as_mut() {
            if !definition.declared_types.contains(&inner) {
                definition.declared_types.push(inner);
            }
        }
    }

    /// Detach `inner` from `outer`: drop it from the declared types and clear its declaring type
    /// if it points at `outer`. Returns `true` if anything changed.
    pub fn remove_declared_type(&mut self, outer: ClassId, inner: ClassId) -> bool {
        let listed = self.unlist_declared_type(outer, inner);
        let node = &mut self.classes[inner];
        if node.declaring_type == Some(outer) {
            node.declaring_type = None;
            return true;
        }
        listed
    }

    fn unlist_declared_type(&mut self, outer: ClassId, inner: ClassId) -> bool {
        let Some(definition) = self.classes[outer].definition.as_mut() else {
            return false;
        };
        let before = definition.declared_types.len();
        definition.declared_types.retain(|declared| *declared != inner);
        definition.declared_types.len() != before
    }

    /// Generic-aware signature of the class `id` used as a type.
    ///
    /// For a generic definition this lists the formal parameters, e.g. `Ljava/util/Map<TK;TV;>;`,
    /// and is cached until the parameter list changes.
    #[must_use]
    pub fn type_signature(&self, id: ClassId) -> String {
        let node = &self.classes[id];
        match node.definition.as_ref() {
            Some(definition) if definition.is_generic_definition() => definition
                .signature
                .signature(|| {
                    encoders::generic_definition_signature(
                        self,
                        node.internal_name(),
                        definition.generic_parameters.as_slice(),
                    )
                })
                .to_string(),
            _ => format!("L{};", node.internal_name()),
        }
    }

    /// The node for a generic parameter.
    #[must_use]
    pub fn generic_parameter(&self, id: GenericParamId) -> &GenericParameterNode {
        &self.generic_parameters[id]
    }

    /// Create an unowned type variable, as used for names no scope declares.
    pub fn new_generic_parameter(&mut self, name: impl Into<String>) -> GenericParamId {
        self.generic_parameters.alloc(GenericParameterNode::new(name))
    }

    /// Declared type parameters of `owner`.
    #[must_use]
    pub fn generic_parameters_of(&self, owner: GenericOwner) -> &[GenericParamId] {
        match owner {
            GenericOwner::Type(id) => self.classes[id]
                .definition
                .as_ref()
                .map_or(&[], |definition| definition.generic_parameters.as_slice()),
            GenericOwner::Method(id) => self.methods[id].generic_parameters.as_slice(),
        }
    }

    fn with_generic_parameters<R>(
        &mut self,
        owner: GenericOwner,
        mutate: impl FnOnce(
            &mut OwnedCollection<GenericParamId, GenericOwner>,
            &mut GenericParameterLinker<'_>,
        ) -> R,
    ) -> R {
        let TypeRegistry {
            classes,
            methods,
            generic_parameters,
            ..
        } = self;

        let (collection, cache) = match owner {
            GenericOwner::Type(id) => match classes[id].definition.as_mut() {
                Some(definition) => (&mut definition.generic_parameters, &mut definition.signature),
                None => panic!("cannot declare generic parameters on unresolved class {id}"),
            },
            GenericOwner::Method(id) => {
                let method = &mut methods[id];
                (&mut method.generic_parameters, &mut method.signature)
            }
        };

        let mut linker = GenericParameterLinker {
            nodes: generic_parameters,
            cache,
        };
        mutate(collection, &mut linker)
    }

    /// Declare a new type parameter at the end of `owner`'s list.
    ///
    /// # Panics
    /// Panics if `owner` is an unresolved class or its list is frozen.
    pub fn add_generic_parameter(
        &mut self,
        owner: GenericOwner,
        name: impl Into<String>,
    ) -> GenericParamId {
        let id = self.new_generic_parameter(name);
        self.with_generic_parameters(owner, |collection, linker| collection.push(linker, id));
        id
    }

    /// Insert an existing type parameter into `owner`'s list at `index`.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn insert_generic_parameter(&mut self, owner: GenericOwner, index: usize, id: GenericParamId) {
        self.with_generic_parameters(owner, |collection, linker| {
            collection.insert(linker, index, id);
        });
    }

    /// Remove the type parameter at `index` from `owner`'s list.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn remove_generic_parameter(&mut self, owner: GenericOwner, index: usize) -> GenericParamId {
        self.with_generic_parameters(owner, |collection, linker| collection.remove(linker, index))
    }

    /// Replace the type parameter at `index` in `owner`'s list, returning the old one.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn replace_generic_parameter(
        &mut self,
        owner: GenericOwner,
        index: usize,
        id: GenericParamId,
    ) -> GenericParamId {
        self.with_generic_parameters(owner, |collection, linker| {
            collection.replace(linker, index, id)
        })
    }

    /// Set the declared bound of a type parameter and invalidate its owner's signature.
    ///
    /// A single bound set here is rendered in class position (`T:Ljava/lang/Number;`).
    pub fn set_generic_parameter_bound(&mut self, id: GenericParamId, bound: Option<TypeRef>) {
        self.store_generic_parameter_bound(id, bound, false);
    }

    /// Set a single bound declared in interface position (`T::Ljava/lang/Runnable;`).
    pub fn set_generic_parameter_interface_bound(&mut self, id: GenericParamId, bound: TypeRef) {
        self.store_generic_parameter_bound(id, Some(bound), true);
    }

    fn store_generic_parameter_bound(
        &mut self,
        id: GenericParamId,
        bound: Option<TypeRef>,
        interface: bool,
    ) {
        let node = &mut self.generic_parameters[id];
        node.interface_bound = interface && bound.is_some();
        node.extends_bound = bound;

        match node.owner {
            Some(GenericOwner::Type(owner)) => {
                if let Some(definition) = self.classes[owner].definition.as_mut() {
                    definition.signature.invalidate();
                }
            }
            Some(GenericOwner::Method(owner)) => self.methods[owner].signature.invalidate(),
            None => {}
        }
    }

    /// Create a method on `declaring_type` and list it on the type's definition if resolved.
    pub fn add_method(
        &mut self,
        declaring_type: ClassId,
        name: impl Into<String>,
        flags: Flags,
        return_type: TypeRef,
    ) -> MethodId {
        let id = MethodId::from_index(self.methods.len());
        let method = MethodDefinition::new(id, declaring_type, name.into(), flags, return_type);
        let allocated = self.methods.alloc(method);
        debug_assert_eq!(allocated, id);

        if let Some(definition) = self.classes[declaring_type].definition.as_mut() {
            definition.methods.push(id);
        }
        id
    }

    /// The method definition for `id`.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodDefinition {
        &self.methods[id]
    }

    /// Mutable access to the plain fields of a method definition.
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDefinition {
        &mut self.methods[id]
    }

    /// Every method definition with its id, skipping methods of classes whose decode failed.
    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodDefinition)> {
        self.methods.iter().filter(|(_, method)| !method.discarded)
    }

    /// Change a method's return type and invalidate its signatures.
    pub fn set_return_type(&mut self, id: MethodId, return_type: TypeRef) {
        let method = &mut self.methods[id];
        method.return_type = return_type;
        method.signature.invalidate();
    }

    /// Generic-aware method signature, e.g. `<T:Ljava/lang/Object;>(TT;)TT;`. Cached.
    #[must_use]
    pub fn method_signature(&self, id: MethodId) -> &str {
        let method = &self.methods[id];
        method.signature.signature(|| {
            encoders::method_signature(
                self,
                method.generic_parameters.as_slice(),
                &self.parameter_types(id),
                &method.return_type,
            )
        })
    }

    /// Method descriptor, synthetic parameters included. Cached.
    #[must_use]
    pub fn method_erased_signature(&self, id: MethodId) -> &str {
        let method = &self.methods[id];
        method.signature.erased_signature(|| {
            encoders::method_descriptor(self, &self.parameter_types(id), &method.return_type)
        })
    }

    /// Returns `true` if the method's signature strings are currently cached.
    #[must_use]
    pub fn is_method_signature_cached(&self, id: MethodId) -> bool {
        self.methods[id].signature.is_cached()
    }

    /// Record `local` as a class declared inside method `id`.
    ///
    /// # Panics
    /// Panics if the method's declared-type list is frozen.
    pub fn add_method_declared_type(&mut self, id: MethodId, local: ClassId) {
        let TypeRegistry {
            classes, methods, ..
        } = self;
        let collection = &mut methods[id].declared_types;
        if !collection.contains(local) {
            collection.push(&mut DeclaredTypeLinker { classes }, local);
        }
    }

    /// Remove `local` from the classes declared inside method `id`.
    ///
    /// # Panics
    /// Panics if the method's declared-type list is frozen.
    pub fn remove_method_declared_type(&mut self, id: MethodId, local: ClassId) -> bool {
        let TypeRegistry {
            classes, methods, ..
        } = self;
        let collection = &mut methods[id].declared_types;
        match collection.position_of(local) {
            Some(index) => {
                collection.remove(&mut DeclaredTypeLinker { classes }, index);
                true
            }
            None => false,
        }
    }

    /// The parameter definition for `id`.
    #[must_use]
    pub fn parameter(&self, id: ParamId) -> &ParameterDefinition {
        &self.parameters[id]
    }

    /// Mutable access to the plain fields of a parameter.
    pub fn parameter_mut(&mut self, id: ParamId) -> &mut ParameterDefinition {
        &mut self.parameters[id]
    }

    /// Store an unowned parameter.
    pub fn new_parameter(&mut self, parameter: ParameterDefinition) -> ParamId {
        self.parameters.alloc(parameter)
    }

    /// Types of a method's parameters, in order.
    #[must_use]
    pub fn parameter_types(&self, id: MethodId) -> Vec<TypeRef> {
        self.methods[id]
            .parameters
            .iter()
            .map(|parameter| self.parameters[parameter].parameter_type.clone())
            .collect()
    }

    fn with_parameters<R>(
        &mut self,
        id: MethodId,
        mutate: impl FnOnce(&mut OwnedCollection<ParamId, MethodId>, &mut ParameterLinker<'_>) -> R,
    ) -> R {
        let TypeRegistry {
            methods,
            parameters,
            ..
        } = self;
        let method = &mut methods[id];
        let mut linker = ParameterLinker {
            nodes: parameters,
            cache: &mut method.signature,
        };
        mutate(&mut method.parameters, &mut linker)
    }

    /// Create a parameter and append it to method `id`.
    ///
    /// # Panics
    /// Panics if the parameter list is frozen.
    pub fn add_parameter(
        &mut self,
        id: MethodId,
        name: Option<&str>,
        parameter_type: TypeRef,
        flags: Flags,
    ) -> ParamId {
        let parameter = self.new_parameter(ParameterDefinition::new(
            name.map(str::to_string),
            parameter_type,
            flags,
        ));
        self.with_parameters(id, |collection, linker| collection.push(linker, parameter));
        parameter
    }

    /// Insert an existing parameter into method `id` at `index`.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn insert_parameter(&mut self, id: MethodId, index: usize, parameter: ParamId) {
        self.with_parameters(id, |collection, linker| {
            collection.insert(linker, index, parameter);
        });
    }

    /// Remove the parameter at `index` from method `id`.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn remove_parameter(&mut self, id: MethodId, index: usize) -> ParamId {
        self.with_parameters(id, |collection, linker| collection.remove(linker, index))
    }

    /// Replace the parameter at `index` of method `id`, returning the old one.
    ///
    /// # Panics
    /// Panics if the list is frozen or `index` is out of range.
    pub fn replace_parameter(&mut self, id: MethodId, index: usize, parameter: ParamId) -> ParamId {
        self.with_parameters(id, |collection, linker| {
            collection.replace(linker, index, parameter)
        })
    }

    /// Change a parameter's type and invalidate its method's signatures.
    pub fn set_parameter_type(&mut self, id: ParamId, parameter_type: TypeRef) {
        let parameter = &mut self.parameters[id];
        parameter.parameter_type = parameter_type;
        if let Some(method) = parameter.method {
            self.methods[method].signature.invalidate();
        }
    }

    /// Create a field on `declaring_type` and list it on the type's definition if resolved.
    pub fn add_field(
        &mut self,
        declaring_type: ClassId,
        name: impl Into<String>,
        flags: Flags,
        field_type: TypeRef,
    ) -> FieldId {
        let id = self
            .fields
            .alloc(FieldDefinition::new(name, declaring_type, flags, field_type));
        if let Some(definition) = self.classes[declaring_type].definition.as_mut() {
            definition.fields.push(id);
        }
        id
    }

    /// The field definition for `id`.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldDefinition {
        &self.fields[id]
    }

    /// Mutable access to a field definition.
    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDefinition {
        &mut self.fields[id]
    }

    /// Freeze the generic-parameter list of `id` and the parameter and generic-parameter lists
    /// of each of its methods.
    ///
    /// Classes declared inside a method are discovered as they load, so those lists stay open.
    pub fn freeze_definition(&mut self, id: ClassId) {
        let Some(definition) = self.classes[id].definition.as_mut() else {
            return;
        };
        definition.generic_parameters.freeze();

        for method in definition.methods.clone() {
            let method = &mut self.methods[method];
            method.parameters.freeze();
            method.generic_parameters.freeze();
        }
    }

    /// The wrapper class for a primitive kind.
    #[must_use]
    pub fn box_class(kind: PrimitiveKind) -> ClassId {
        match kind {
            PrimitiveKind::Boolean => ClassId::BOOLEAN,
            PrimitiveKind::Byte => ClassId::BYTE,
            PrimitiveKind::Char => ClassId::CHARACTER,
            PrimitiveKind::Short => ClassId::SHORT,
            PrimitiveKind::Int => ClassId::INTEGER,
            PrimitiveKind::Long => ClassId::LONG,
            PrimitiveKind::Float => ClassId::FLOAT,
            PrimitiveKind::Double => ClassId::DOUBLE,
            PrimitiveKind::Void => ClassId::VOID,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}
