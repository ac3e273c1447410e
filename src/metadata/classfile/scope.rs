use std::sync::Arc;

use crate::{
    metadata::{
        classfile::BootstrapMethod,
        constantpool::{ConstantPool, ConstantPoolEntry, ConstantTag, ConstantValue, ReferenceKind},
        members::{FieldRef, FieldReference, MethodRef, MethodReference},
        resolver::MetadataSystem,
        token::Token,
        typesystem::{ClassId, GenericOwner, TypeRef, TypeRegistry},
    },
    Error, Result,
};

/// Nesting allowed between dynamic constants used as bootstrap arguments of one another.
const MAX_LOOKUP_DEPTH: usize = 16;

/// The member a method handle points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleTarget {
    /// `REF_getField`, `REF_getStatic`, `REF_putField` or `REF_putStatic`
    Field(FieldRef),
    /// Any of the invoke kinds
    Method(MethodRef),
}

/// A resolved `CONSTANT_MethodHandle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHandle {
    /// The access the handle performs
    pub kind: ReferenceKind,
    /// The referenced member
    pub target: HandleTarget,
}

impl MethodHandle {
    /// The target method, if the handle performs an invocation.
    #[must_use]
    pub fn method(&self) -> Option<&MethodRef> {
        match &self.target {
            HandleTarget::Method(method) => Some(method),
            HandleTarget::Field(_) => None,
        }
    }
}

/// A method shape named by a `CONSTANT_MethodType` or a call-site descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodType {
    /// Parameter types, in order
    pub parameters: Vec<TypeRef>,
    /// Return type
    pub return_type: TypeRef,
}

/// A resolved `CONSTANT_InvokeDynamic` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicCallSite {
    /// Index into the class's `BootstrapMethods` table
    pub bootstrap_method_index: u16,
    /// The bootstrap method handle
    pub bootstrap_method: MethodHandle,
    /// Static arguments passed to the bootstrap method
    pub bootstrap_arguments: Vec<ScopeItem>,
    /// Name of the call site
    pub name: String,
    /// Type of the call site
    pub method_type: MethodType,
}

/// A resolved `CONSTANT_Dynamic` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicConstant {
    /// Index into the class's `BootstrapMethods` table
    pub bootstrap_method_index: u16,
    /// The bootstrap method handle
    pub bootstrap_method: MethodHandle,
    /// Static arguments passed to the bootstrap method
    pub bootstrap_arguments: Vec<ScopeItem>,
    /// Name of the constant
    pub name: String,
    /// Type of the computed value
    pub constant_type: TypeRef,
}

/// Whatever a constant-pool token denotes, bound to the type model.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeItem {
    /// A literal
    Constant(ConstantValue),
    /// A class or array type
    Type(TypeRef),
    /// A field reference
    Field(FieldRef),
    /// A method reference
    Method(MethodRef),
    /// A method handle
    MethodHandle(MethodHandle),
    /// A method type
    MethodType(MethodType),
    /// A dynamically computed call site
    CallSite(Box<DynamicCallSite>),
    /// A dynamically computed constant
    DynamicConstant(Box<DynamicConstant>),
    /// A module name
    Module(String),
    /// A package name
    Package(String),
}

/// Token lookups against the constant pool of one decoded class.
///
/// Signatures found in the pool are bound with the owner's type parameters in scope. Every
/// lookup returns symbolic references; pass them to
/// [`MetadataSystem::resolve_method`] or [`MetadataSystem::resolve_field`] to reach definitions.
///
/// # Examples
///
/// ```rust,no_run
/// use jvmscope::metadata::{
///     classfile::MetadataScope, loader::ClasspathTypeLoader, resolver::MetadataSystem,
///     token::Token,
/// };
///
/// let mut system = MetadataSystem::new(ClasspathTypeLoader::from_env());
/// let id = system.load_type("com/example/Main")?;
/// let scope = MetadataScope::for_type(system.types(), id).unwrap();
///
/// let item = scope.lookup(&mut system, Token(12))?;
/// println!("{item:?}");
/// # Ok::<(), jvmscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MetadataScope {
    owner: ClassId,
    pool: Arc<ConstantPool>,
    bootstrap_methods: Vec<BootstrapMethod>,
}

impl MetadataScope {
    /// Create a scope over `pool`, binding names in the context of `owner`.
    #[must_use]
    pub fn new(owner: ClassId, pool: Arc<ConstantPool>, bootstrap_methods: Vec<BootstrapMethod>) -> Self {
        MetadataScope {
            owner,
            pool,
            bootstrap_methods,
        }
    }

    /// The scope of a decoded class, or `None` if `id` has no definition with a constant pool.
    #[must_use]
    pub fn for_type(types: &TypeRegistry, id: ClassId) -> Option<Self> {
        let definition = types.definition(id)?;
        let pool = definition.constant_pool.clone()?;
        Some(Self::new(id, pool, definition.bootstrap_methods.clone()))
    }

    /// The class whose pool this scope reads.
    #[must_use]
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    /// The underlying constant pool.
    #[must_use]
    pub fn constant_pool(&self) -> &ConstantPool {
        &self.pool
    }

    fn in_context<T>(
        &self,
        system: &mut MetadataSystem,
        lookup: impl FnOnce(&mut MetadataSystem) -> Result<T>,
    ) -> Result<T> {
        system.push_generic_context(GenericOwner::Type(self.owner));
        let result = lookup(system);
        system.pop_generic_context();
        result
    }

    /// The type named by a `Class` entry, or by a `Utf8` entry holding a type signature.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, or unparsable text.
    pub fn lookup_type(&self, system: &mut MetadataSystem, token: Token) -> Result<TypeRef> {
        match self.pool.get(token)? {
            ConstantPoolEntry::Class { name_index } => {
                let name = self.pool.utf8(*name_index)?;
                self.in_context(system, |system| system.parse_internal_name(name))
            }
            ConstantPoolEntry::Utf8(signature) => {
                self.in_context(system, |system| system.parse_type_signature(signature))
            }
            other => Err(self.pool.mismatch(token, ConstantTag::Class, other)),
        }
    }

    /// The field named by a `Fieldref` entry.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, or an invalid descriptor.
    pub fn lookup_field(&self, system: &mut MetadataSystem, token: Token) -> Result<FieldRef> {
        let entry = self.pool.get(token)?;
        if entry.tag() != ConstantTag::FieldRef {
            return Err(self.pool.mismatch(token, ConstantTag::FieldRef, entry));
        }

        self.field_reference(system, token)
    }

    fn field_reference(&self, system: &mut MetadataSystem, token: Token) -> Result<FieldRef> {
        let info = self.pool.member_reference(token)?;
        let (declaring_type, field_type) = self.in_context(system, |system| {
            Ok((
                system.parse_internal_name(info.class_name)?,
                system.parse_type_descriptor(info.descriptor)?,
            ))
        })?;

        Ok(FieldRef::Reference(Arc::new(FieldReference {
            declaring_type,
            name: info.name.to_string(),
            field_type,
        })))
    }

    /// The method named by a `Methodref` or `InterfaceMethodref` entry, or targeted by a
    /// `MethodHandle` entry.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, a handle to a field, or an invalid
    /// descriptor.
    pub fn lookup_method(&self, system: &mut MetadataSystem, token: Token) -> Result<MethodRef> {
        let entry = self.pool.get(token)?;
        let reference = match entry {
            ConstantPoolEntry::MethodRef { .. } | ConstantPoolEntry::InterfaceMethodRef { .. } => {
                token
            }
            ConstantPoolEntry::MethodHandle {
                kind,
                reference_index,
            } if !kind.is_field() => *reference_index,
            other => return Err(self.pool.mismatch(token, ConstantTag::MethodRef, other)),
        };

        self.method_reference(system, reference)
    }

    fn method_reference(&self, system: &mut MetadataSystem, token: Token) -> Result<MethodRef> {
        let info = self.pool.member_reference(token)?;
        let (declaring_type, (parameters, return_type)) = self.in_context(system, |system| {
            Ok((
                system.parse_internal_name(info.class_name)?,
                system.parse_method_descriptor(info.descriptor)?,
            ))
        })?;

        Ok(MethodRef::Reference(Arc::new(MethodReference {
            declaring_type,
            name: info.name.to_string(),
            parameters,
            return_type,
        })))
    }

    /// The handle stored in a `MethodHandle` entry.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, or a handle whose reference does not
    /// match its kind.
    pub fn lookup_method_handle(&self, system: &mut MetadataSystem, token: Token) -> Result<MethodHandle> {
        let (kind, info) = self.pool.method_handle(token)?;
        let reference = match self.pool.get(token)? {
            ConstantPoolEntry::MethodHandle { reference_index, .. } => *reference_index,
            other => return Err(self.pool.mismatch(token, ConstantTag::MethodHandle, other)),
        };

        let target = if kind.is_field() {
            if info.tag != ConstantTag::FieldRef {
                return Err(malformed_error!(
                    "Method handle {} of kind {} points at a {:?} entry",
                    token,
                    kind,
                    info.tag
                ));
            }
            HandleTarget::Field(self.field_reference(system, reference)?)
        } else {
            if info.tag == ConstantTag::FieldRef {
                return Err(malformed_error!(
                    "Method handle {} of kind {} points at a field",
                    token,
                    kind
                ));
            }
            HandleTarget::Method(self.method_reference(system, reference)?)
        };

        Ok(MethodHandle { kind, target })
    }

    /// The method shape stored in a `MethodType` entry.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, or an invalid descriptor.
    pub fn lookup_method_type(&self, system: &mut MetadataSystem, token: Token) -> Result<MethodType> {
        let descriptor = self.pool.method_type(token)?;
        self.method_type(system, descriptor)
    }

    fn method_type(&self, system: &mut MetadataSystem, descriptor: &str) -> Result<MethodType> {
        let (parameters, return_type) =
            self.in_context(system, |system| system.parse_method_descriptor(descriptor))?;
        Ok(MethodType {
            parameters,
            return_type,
        })
    }

    /// The call site described by an `InvokeDynamic` entry and its `BootstrapMethods` row.
    ///
    /// # Errors
    /// Fails on a broken token, any other kind of entry, a bootstrap index past the end of the
    /// table, or a bootstrap argument that cannot be looked up.
    pub fn lookup_dynamic_call_site(
        &self,
        system: &mut MetadataSystem,
        token: Token,
    ) -> Result<DynamicCallSite> {
        self.call_site(system, token, 0)
    }

    fn call_site(&self, system: &mut MetadataSystem, token: Token, depth: usize) -> Result<DynamicCallSite> {
        let (index, name_and_type) = match self.pool.get(token)? {
            ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => (*bootstrap_method_attr_index, *name_and_type_index),
            other => return Err(self.pool.mismatch(token, ConstantTag::InvokeDynamic, other)),
        };

        let (bootstrap_method, bootstrap_arguments) = self.bootstrap(system, index, depth)?;
        let (name, descriptor) = self.pool.name_and_type(name_and_type)?;
        let method_type = self.method_type(system, descriptor)?;

        Ok(DynamicCallSite {
            bootstrap_method_index: index,
            bootstrap_method,
            bootstrap_arguments,
            name: name.to_string(),
            method_type,
        })
    }

    fn dynamic_constant(
        &self,
        system: &mut MetadataSystem,
        token: Token,
        depth: usize,
    ) -> Result<DynamicConstant> {
        let (index, name_and_type) = match self.pool.get(token)? {
            ConstantPoolEntry::Dynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => (*bootstrap_method_attr_index, *name_and_type_index),
            other => return Err(self.pool.mismatch(token, ConstantTag::Dynamic, other)),
        };

        let (bootstrap_method, bootstrap_arguments) = self.bootstrap(system, index, depth)?;
        let (name, descriptor) = self.pool.name_and_type(name_and_type)?;
        let constant_type =
            self.in_context(system, |system| system.parse_type_descriptor(descriptor))?;

        Ok(DynamicConstant {
            bootstrap_method_index: index,
            bootstrap_method,
            bootstrap_arguments,
            name: name.to_string(),
            constant_type,
        })
    }

    fn bootstrap(
        &self,
        system: &mut MetadataSystem,
        index: u16,
        depth: usize,
    ) -> Result<(MethodHandle, Vec<ScopeItem>)> {
        if depth >= MAX_LOOKUP_DEPTH {
            return Err(Error::RecursionLimit(MAX_LOOKUP_DEPTH));
        }

        let Some(row) = self.bootstrap_methods.get(usize::from(index)) else {
            return Err(malformed_error!(
                "Bootstrap method index {} is out of range ({} entries)",
                index,
                self.bootstrap_methods.len()
            ));
        };

        let handle = self.lookup_method_handle(system, row.method_handle)?;
        let mut arguments = Vec::with_capacity(row.arguments.len());
        for argument in &row.arguments {
            let item = self.lookup_at_depth(system, *argument, depth + 1)?;
            arguments.push(item.ok_or_else(|| {
                malformed_error!("Bootstrap argument {} is not a loadable constant", argument)
            })?);
        }

        Ok((handle, arguments))
    }

    /// The loadable constant at `token`: a literal, or the type named by a `Class` entry.
    ///
    /// # Errors
    /// Fails on a broken token or an entry that is neither a literal nor a class.
    pub fn lookup_constant(&self, system: &mut MetadataSystem, token: Token) -> Result<ScopeItem> {
        if self.pool.tag(token)? == ConstantTag::Class {
            return Ok(ScopeItem::Type(self.lookup_type(system, token)?));
        }
        Ok(ScopeItem::Constant(self.pool.constant(token)?))
    }

    /// Whatever `token` denotes; `None` for `NameAndType` entries, which stand for nothing on
    /// their own.
    ///
    /// # Errors
    /// Fails on a broken token or any nested lookup failure.
    pub fn lookup(&self, system: &mut MetadataSystem, token: Token) -> Result<Option<ScopeItem>> {
        self.lookup_at_depth(system, token, 0)
    }

    fn lookup_at_depth(
        &self,
        system: &mut MetadataSystem,
        token: Token,
        depth: usize,
    ) -> Result<Option<ScopeItem>> {
        let item = match self.pool.get(token)? {
            ConstantPoolEntry::Utf8(_)
            | ConstantPoolEntry::Integer(_)
            | ConstantPoolEntry::Float(_)
            | ConstantPoolEntry::Long(_)
            | ConstantPoolEntry::Double(_)
            | ConstantPoolEntry::String { .. } => ScopeItem::Constant(self.pool.constant(token)?),
            ConstantPoolEntry::Class { .. } => ScopeItem::Type(self.lookup_type(system, token)?),
            ConstantPoolEntry::FieldRef { .. } => {
                ScopeItem::Field(self.field_reference(system, token)?)
            }
            ConstantPoolEntry::MethodRef { .. } | ConstantPoolEntry::InterfaceMethodRef { .. } => {
                ScopeItem::Method(self.method_reference(system, token)?)
            }
            ConstantPoolEntry::MethodHandle { .. } => {
                ScopeItem::MethodHandle(self.lookup_method_handle(system, token)?)
            }
            ConstantPoolEntry::MethodType { .. } => {
                ScopeItem::MethodType(self.lookup_method_type(system, token)?)
            }
            ConstantPoolEntry::InvokeDynamic { .. } => {
                ScopeItem::CallSite(Box::new(self.call_site(system, token, depth)?))
            }
            ConstantPoolEntry::Dynamic { .. } => {
                ScopeItem::DynamicConstant(Box::new(self.dynamic_constant(system, token, depth)?))
            }
            ConstantPoolEntry::Module { name_index } => {
                ScopeItem::Module(self.pool.utf8(*name_index)?.to_string())
            }
            ConstantPoolEntry::Package { name_index } => {
                ScopeItem::Package(self.pool.utf8(*name_index)?.to_string())
            }
            ConstantPoolEntry::NameAndType { .. } => return Ok(None),
        };

        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::typesystem::PrimitiveKind,
        test::{class_loader, ClassFileBuilder},
    };

    fn scoped(build: impl FnOnce(&mut ClassFileBuilder) -> Vec<u16>) -> (MetadataSystem, MetadataScope, Vec<u16>) {
        let mut builder = ClassFileBuilder::new("a/Host")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;");
        let tokens = build(&mut builder);
        let mut system = MetadataSystem::new(class_loader(vec![builder.build()]));
        let id = system.load_type("a/Host").unwrap();
        let scope = MetadataScope::for_type(system.types(), id).unwrap();
        (system, scope, tokens)
    }

    #[test]
    fn test_lookup_type_and_signature() {
        let (mut system, scope, tokens) = scoped(|builder| {
            let pool = builder.pool();
            vec![pool.class("[Ljava/lang/String;"), pool.utf8("Ljava/util/List<TT;>;")]
        });

        let array = scope.lookup_type(&mut system, Token(tokens[0])).unwrap();
        assert_eq!(array.signature(system.types()), "[Ljava/lang/String;");

        let list = scope.lookup_type(&mut system, Token(tokens[1])).unwrap();
        let argument = &list.type_arguments()[0];
        let TypeRef::GenericParameter(variable) = argument else {
            panic!("expected the owner's type variable, got {argument:?}");
        };
        let owner_parameters = system
            .types()
            .definition(scope.owner())
            .unwrap()
            .generic_parameters()
            .as_slice()[0];
        assert_eq!(*variable, owner_parameters);
    }

    #[test]
    fn test_lookup_members() {
        let (mut system, scope, tokens) = scoped(|builder| {
            let pool = builder.pool();
            vec![
                pool.field_ref("a/Host", "count", "I"),
                pool.method_ref("java/lang/Object", "equals", "(Ljava/lang/Object;)Z"),
                pool.interface_method_ref("java/lang/Runnable", "run", "()V"),
            ]
        });

        let field = scope.lookup_field(&mut system, Token(tokens[0])).unwrap();
        assert_eq!(field.name(system.types()), "count");
        assert_eq!(field.field_type(system.types()).primitive_kind(), Some(PrimitiveKind::Int));

        let method = scope.lookup_method(&mut system, Token(tokens[1])).unwrap();
        assert_eq!(method.erased_signature(system.types()), "(Ljava/lang/Object;)Z");
        assert!(scope.lookup_method(&mut system, Token(tokens[2])).is_ok());

        assert!(matches!(
            scope.lookup_field(&mut system, Token(tokens[1])),
            Err(Error::UnexpectedTag { .. })
        ));
    }

    #[test]
    fn test_lookup_method_handles() {
        let (mut system, scope, tokens) = scoped(|builder| {
            let pool = builder.pool();
            let field = pool.field_ref("a/Host", "count", "I");
            let method = pool.method_ref("a/Host", "make", "()La/Host;");
            vec![pool.method_handle(1, field), pool.method_handle(6, method), pool.method_handle(6, field)]
        });

        let getter = scope.lookup_method_handle(&mut system, Token(tokens[0])).unwrap();
        assert_eq!(getter.kind, ReferenceKind::GetField);
        assert!(matches!(getter.target, HandleTarget::Field(_)));
        assert!(getter.method().is_none());

        let invoke = scope.lookup_method_handle(&mut system, Token(tokens[1])).unwrap();
        assert_eq!(invoke.kind, ReferenceKind::InvokeStatic);
        let through_handle = scope.lookup_method(&mut system, Token(tokens[1])).unwrap();
        assert_eq!(invoke.method(), Some(&through_handle));

        assert!(scope.lookup_method_handle(&mut system, Token(tokens[2])).is_err());
        assert!(scope.lookup_method(&mut system, Token(tokens[0])).is_err());
    }

    #[test]
    fn test_lookup_dynamic_call_site() {
        let mut builder = ClassFileBuilder::new("a/Indy");
        let pool = builder.pool();
        let factory = pool.method_ref(
            "java/lang/invoke/LambdaMetafactory",
            "metafactory",
            "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;",
        );
        let handle = pool.method_handle(6, factory);
        let erased = pool.method_type("()V");
        let body = pool.method_ref("a/Indy", "lambda$run$0", "()V");
        let body_handle = pool.method_handle(6, body);
        let site = pool.invoke_dynamic(0, "run", "()Ljava/lang/Runnable;");
        let name_and_type = pool.name_and_type("run", "()V");
        let bytes = builder
            .bootstrap_method(handle, &[erased, body_handle, erased])
            .build();

        let mut system = MetadataSystem::new(class_loader(vec![bytes]));
        let id = system.load_type("a/Indy").unwrap();
        let scope = MetadataScope::for_type(system.types(), id).unwrap();

        let call_site = scope.lookup_dynamic_call_site(&mut system, Token(site)).unwrap();
        assert_eq!(call_site.name, "run");
        assert_eq!(call_site.bootstrap_method_index, 0);
        assert_eq!(call_site.bootstrap_arguments.len(), 3);
        assert!(matches!(call_site.bootstrap_arguments[1], ScopeItem::MethodHandle(_)));
        assert!(call_site.method_type.parameters.is_empty());
        assert_eq!(
            call_site.method_type.return_type.internal_name(system.types()),
            "java/lang/Runnable"
        );

        assert!(matches!(
            scope.lookup(&mut system, Token(site)).unwrap(),
            Some(ScopeItem::CallSite(_))
        ));
        assert_eq!(scope.lookup(&mut system, Token(name_and_type)).unwrap(), None);
    }

    #[test]
    fn test_bootstrap_index_out_of_range() {
        let (mut system, scope, tokens) = scoped(|builder| {
            vec![builder.pool().invoke_dynamic(3, "run", "()V")]
        });

        assert!(matches!(
            scope.lookup_dynamic_call_site(&mut system, Token(tokens[0])),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_lookup_constants() {
        let (mut system, scope, tokens) = scoped(|builder| {
            let pool = builder.pool();
            vec![pool.integer(5), pool.string("text"), pool.class("a/Host"), pool.long(-1)]
        });

        assert_eq!(
            scope.lookup_constant(&mut system, Token(tokens[0])).unwrap(),
            ScopeItem::Constant(ConstantValue::Integer(5))
        );
        assert_eq!(
            scope.lookup(&mut system, Token(tokens[1])).unwrap(),
            Some(ScopeItem::Constant(ConstantValue::String("text".to_string())))
        );
        assert_eq!(
            scope.lookup_constant(&mut system, Token(tokens[2])).unwrap(),
            ScopeItem::Type(TypeRef::Class(scope.owner()))
        );
        assert!(scope.lookup(&mut system, Token(tokens[3] + 1)).is_err());
    }
}
