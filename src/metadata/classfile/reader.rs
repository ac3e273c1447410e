use std::sync::Arc;

use tracing::warn;

use crate::{
    metadata::{
        classfile::{
            Attribute, ClassFile, CodeAttribute, InnerClassEntry, MemberInfo, MethodParameterEntry,
        },
        config::ReaderOptions,
        flags::Flags,
        members::{ExceptionHandler, MethodBody, MethodId, VariableDefinition},
        resolver::{MetadataSystem, ResolverFrame},
        signatures::{self, TypeSignature},
        typesystem::{ClassId, GenericOwner, ResolutionState, TypeRef},
    },
    Result,
};

/// Builds a [`crate::metadata::typesystem::TypeDefinition`] from a split [`ClassFile`].
///
/// The reader works in a fixed order so every step can rely on the previous ones:
///
/// 1. `EnclosingMethod` links a local or anonymous class to the method declaring it
/// 2. the `InnerClasses` row naming this class supplies its declaring type, simple name and
///    source-level access flags
/// 3. base types come from the class `Signature`, or from the descriptors without one
/// 4. fields, then methods, with generic signatures preferred over descriptors
/// 5. named nested classes, then anonymous ones, are resolved and linked
/// 6. local classes that name one of this class's methods are linked back to it
///
/// Finally the definition's parameter lists are frozen and the class is marked resolved.
pub struct ClassFileReader<'s> {
    system: &'s mut MetadataSystem,
    id: ClassId,
    class: ClassFile,
    options: ReaderOptions,
}

impl<'s> ClassFileReader<'s> {
    /// Prepare to decode `class` as the definition of `id`.
    ///
    /// ## Arguments
    /// * 'system' - The resolver that owns the registry and loads related classes
    /// * 'id'     - The class being defined; its name must match the class file
    /// * 'class'  - The split class file
    pub fn new(system: &'s mut MetadataSystem, id: ClassId, class: ClassFile) -> Self {
        let options = system.config().options;
        ClassFileReader {
            system,
            id,
            class,
            options,
        }
    }

    /// Decode the class into the registry.
    ///
    /// # Errors
    /// Fails on malformed descriptors. Malformed generic signatures fall back to the erased
    /// descriptors with a warning.
    pub fn read(mut self) -> Result<()> {
        self.define();

        self.system.push_generic_context(GenericOwner::Type(self.id));
        self.system.push_frame(ResolverFrame::new());
        let result = self.read_body();
        self.system.pop_frame();
        self.system.pop_generic_context();
        result?;

        let types = self.system.types_mut();
        types.freeze_definition(self.id);
        types.set_state(self.id, ResolutionState::Resolved);
        Ok(())
    }

    fn define(&mut self) {
        let retain = self.options.contains(ReaderOptions::RETAIN_ATTRIBUTES);
        let constant_pool = std::mem::take(&mut self.class.header.constant_pool);
        let class = &self.class;

        let mut flags = class.header.access_flags;
        if has_attribute(&class.attributes, "Synthetic") {
            flags |= Flags::SYNTHETIC;
        }
        if has_attribute(&class.attributes, "Deprecated") {
            flags |= Flags::DEPRECATED;
        }

        let definition = self.system.types_mut().define_class(self.id, flags);
        definition.minor_version = class.header.minor_version;
        definition.major_version = class.header.major_version;
        definition.source_file = class.source_file().map(str::to_string);
        definition.enclosing_method = class.enclosing_method().cloned();
        definition.constant_pool = Some(Arc::new(constant_pool));
        definition.bootstrap_methods = class
            .attributes
            .iter()
            .find_map(|attribute| match attribute {
                Attribute::BootstrapMethods(methods) => Some(methods.clone()),
                _ => None,
            })
            .unwrap_or_default();
        if retain {
            definition.attributes = class.attributes.clone();
        }
    }

    fn read_body(&mut self) -> Result<()> {
        self.read_enclosing_method();
        self.read_declaring_type();
        self.read_base_types()?;
        self.read_fields()?;
        self.read_methods()?;
        self.read_inner_classes();
        Ok(())
    }

    fn read_enclosing_method(&mut self) {
        let Some(info) = self.class.enclosing_method() else {
            return;
        };
        let Some((name, descriptor)) = &info.method else {
            return;
        };

        let outer = self.system.types_mut().intern_class(&info.class_name);
        if self.system.resolve_class(outer).is_none() {
            return;
        }
        if let Some(method) = find_method(self.system, outer, name, descriptor) {
            self.system.types_mut().add_method_declared_type(method, self.id);
        }
    }

    fn read_declaring_type(&mut self) {
        let name = self.class.header.name.as_str();
        let Some(entry) = self
            .class
            .inner_classes()
            .iter()
            .find(|entry| entry.inner_class == name)
        else {
            return;
        };

        let outer_name = match &entry.outer_class {
            Some(outer) => Some(outer.as_str()),
            None => name.rfind('$').map(|split| &name[..split]),
        };
        let simple_name = entry.inner_name.as_deref().unwrap_or_default();

        let types = self.system.types_mut();
        if let Some(definition) = types.definition_mut(self.id) {
            definition.flags = definition.flags.with_access(entry.access_flags);
            if simple_name.is_empty() {
                definition.flags |= Flags::ANONYMOUS;
            }
        }
        types.set_simple_name(self.id, simple_name);

        if types.class(self.id).declaring_type().is_none() {
            if let Some(outer_name) = outer_name {
                let outer = types.intern_class(outer_name);
                types.add_declared_type(outer, self.id);
            }
        }
    }

    fn read_base_types(&mut self) -> Result<()> {
        if let Some(text) = self.class.signature() {
            match signatures::parse_class_signature(text) {
                Ok(signature) => {
                    self.system.declare_generic_parameters(
                        GenericOwner::Type(self.id),
                        &signature.type_parameters,
                    );

                    let base_type = match self.class.super_class {
                        Some(_) => Some(
                            self.system
                                .bind_type(&TypeSignature::Class(signature.superclass)),
                        ),
                        None => None,
                    };
                    let interfaces = signature
                        .interfaces
                        .into_iter()
                        .map(|interface| self.system.bind_type(&TypeSignature::Class(interface)))
                        .collect();

                    self.set_base_types(base_type, interfaces);
                    return Ok(());
                }
                Err(error) => warn!(
                    class = self.class.header.name.as_str(),
                    %error,
                    "ignoring malformed class signature"
                ),
            }
        }

        let base_type = match &self.class.super_class {
            Some(name) => Some(self.system.lookup_type(name)?),
            None => None,
        };
        let mut interfaces = Vec::with_capacity(self.class.interfaces.len());
        for name in &self.class.interfaces {
            interfaces.push(self.system.lookup_type(name)?);
        }

        self.set_base_types(base_type, interfaces);
        Ok(())
    }

    fn set_base_types(&mut self, base_type: Option<TypeRef>, interfaces: Vec<TypeRef>) {
        if let Some(definition) = self.system.types_mut().definition_mut(self.id) {
            definition.base_type = base_type;
            definition.interfaces = interfaces;
        }
    }

    fn read_fields(&mut self) -> Result<()> {
        let retain = self.options.contains(ReaderOptions::RETAIN_ATTRIBUTES);

        for field in &self.class.fields {
            let field_type = member_type(self.system, field.signature(), &field.descriptor)?;

            let mut flags = Flags::from_access(field.access_flags);
            if field.has_synthetic_attribute() {
                flags |= Flags::SYNTHETIC;
            }
            if field.has_deprecated_attribute() {
                flags |= Flags::DEPRECATED;
            }

            let constant_value = field.attributes.iter().find_map(|attribute| match attribute {
                Attribute::ConstantValue(value) => match field_type.primitive_kind() {
                    Some(kind) => kind.narrow(value),
                    None => Some(value.clone()),
                },
                _ => None,
            });

            let types = self.system.types_mut();
            let id = types.add_field(self.id, field.name.as_str(), flags, field_type);
            let definition = types.field_mut(id);
            definition.constant_value = constant_value;
            if retain {
                definition.attributes = field.attributes.clone();
            }
        }
        Ok(())
    }

    fn read_methods(&mut self) -> Result<()> {
        let methods = std::mem::take(&mut self.class.methods);
        let result = methods.iter().try_for_each(|method| self.read_method(method));
        self.class.methods = methods;
        result
    }

    fn read_method(&mut self, info: &MemberInfo) -> Result<()> {
        let (is_interface, is_anonymous) = self
            .system
            .types()
            .definition(self.id)
            .map_or((false, false), |definition| {
                (definition.is_interface(), definition.is_anonymous())
            });

        let mut flags = Flags::from_access(info.access_flags);
        if is_interface && !flags.contains(Flags::ABSTRACT) {
            flags |= Flags::DEFAULT;
        }
        if info.has_synthetic_attribute() {
            flags |= Flags::SYNTHETIC;
        }
        if info.has_deprecated_attribute() {
            flags |= Flags::DEPRECATED;
        }
        if info.name == "<init>" {
            if is_anonymous {
                flags |= Flags::ANONCONSTR | Flags::SYNTHETIC;
            }
            if flags.contains(Flags::STRICT) {
                if let Some(definition) = self.system.types_mut().definition_mut(self.id) {
                    definition.flags |= Flags::STRICT;
                }
            }
        }

        let (descriptor_parameters, descriptor_return) =
            self.system.parse_method_descriptor(&info.descriptor)?;
        let method = self.system.types_mut().add_method(
            self.id,
            info.name.as_str(),
            flags,
            descriptor_return.clone(),
        );

        self.system.push_generic_context(GenericOwner::Method(method));
        let result = self.read_method_shape(
            method,
            info,
            descriptor_parameters,
            descriptor_return,
            flags.contains(Flags::STATIC),
        );
        self.system.pop_generic_context();
        result
    }

    fn read_method_shape(
        &mut self,
        method: MethodId,
        info: &MemberInfo,
        descriptor_parameters: Vec<TypeRef>,
        descriptor_return: TypeRef,
        is_static: bool,
    ) -> Result<()> {
        let mut parameter_types = descriptor_parameters;
        let mut return_type = descriptor_return;
        let mut thrown_types = Vec::new();
        let mut synthetic_count = 0;

        if let Some(text) = info.signature() {
            match signatures::parse_method_signature(text) {
                Ok(signature) => {
                    self.system.declare_generic_parameters(
                        GenericOwner::Method(method),
                        &signature.type_parameters,
                    );

                    let generic_parameters: Vec<TypeRef> = signature
                        .parameters
                        .iter()
                        .map(|parameter| self.system.bind_type(parameter))
                        .collect();
                    return_type = self.system.bind_type(&signature.return_type);
                    thrown_types = signature
                        .throws
                        .iter()
                        .map(|thrown| self.system.bind_type(thrown))
                        .collect();

                    // Outer instances, enum names and ordinals appear only in the descriptor.
                    synthetic_count = parameter_types.len().saturating_sub(generic_parameters.len());
                    parameter_types.truncate(synthetic_count);
                    parameter_types.extend(generic_parameters);
                }
                Err(error) => warn!(
                    class = self.class.header.name.as_str(),
                    method = info.name.as_str(),
                    %error,
                    "ignoring malformed method signature"
                ),
            }
        }

        for attribute in &info.attributes {
            if let Attribute::Exceptions(names) = attribute {
                for name in names {
                    let thrown = self.system.lookup_type(name)?;
                    let descriptor = thrown.erased_signature(self.system.types());
                    if !thrown_types
                        .iter()
                        .any(|known| known.erased_signature(self.system.types()) == descriptor)
                    {
                        thrown_types.push(thrown);
                    }
                }
            }
        }

        let parameter_entries = info.attributes.iter().find_map(|attribute| match attribute {
            Attribute::MethodParameters(entries) if entries.len() == parameter_types.len() => {
                Some(entries.as_slice())
            }
            _ => None,
        });

        let types = self.system.types_mut();
        types.set_return_type(method, return_type);

        let mut slot = usize::from(!is_static);
        for (index, parameter_type) in parameter_types.into_iter().enumerate() {
            let mut parameter_flags = if index < synthetic_count {
                Flags::SYNTHETIC
            } else {
                Flags::empty()
            };
            let mut name = None;
            if let Some(MethodParameterEntry { name: entry_name, access_flags }) =
                parameter_entries.and_then(|entries| entries.get(index))
            {
                parameter_flags |= Flags::from_access(*access_flags);
                name = entry_name.as_deref().filter(|name| !name.trim().is_empty());
            }

            let parameter = types.add_parameter(method, name, parameter_type, parameter_flags);
            let definition = types.parameter_mut(parameter);
            definition.slot = slot;
            slot += definition.size();
        }

        let definition = types.method_mut(method);
        definition.thrown_types = thrown_types;
        if self.options.contains(ReaderOptions::RETAIN_ATTRIBUTES) {
            definition.attributes = info.attributes.clone();
        }

        if self.options.contains(ReaderOptions::PROCESS_CODE) {
            let code = info.attributes.iter().find_map(|attribute| match attribute {
                Attribute::Code(code) => Some(code),
                _ => None,
            });
            if let Some(code) = code {
                let body = self.read_body_of(code)?;
                self.name_parameters_from_locals(method, &body);
                self.system.types_mut().method_mut(method).body = Some(body);
            }
        }
        Ok(())
    }

    fn read_body_of(&mut self, code: &CodeAttribute) -> Result<MethodBody> {
        let mut exception_handlers = Vec::with_capacity(code.exception_table.len());
        for entry in &code.exception_table {
            let catch_type = match &entry.catch_type {
                Some(name) => Some(self.system.lookup_type(name)?),
                None => None,
            };
            exception_handlers.push(ExceptionHandler {
                start_pc: entry.start_pc,
                end_pc: entry.end_pc,
                handler_pc: entry.handler_pc,
                catch_type,
            });
        }

        let mut variables = Vec::new();
        for attribute in &code.attributes {
            let Attribute::LocalVariableTable(entries) = attribute else {
                continue;
            };
            for entry in entries {
                variables.push(VariableDefinition {
                    name: entry.name.clone(),
                    slot: usize::from(entry.index),
                    variable_type: self.system.parse_type_descriptor(&entry.descriptor)?,
                    start_pc: entry.start_pc,
                    length: entry.length,
                });
            }
        }

        Ok(MethodBody {
            max_stack: code.max_stack,
            max_locals: code.max_locals,
            code: code.code.clone(),
            exception_handlers,
            variables,
        })
    }

    fn name_parameters_from_locals(&mut self, method: MethodId, body: &MethodBody) {
        let types = self.system.types_mut();
        let parameters: Vec<_> = types.method(method).parameters().iter().collect();

        for parameter in parameters {
            let definition = types.parameter_mut(parameter);
            if definition.name.is_some() {
                continue;
            }
            if let Some(variable) = body.variable_at(definition.slot, 0) {
                definition.name = Some(variable.name.clone());
            }
        }
    }

    fn read_inner_classes(&mut self) {
        let name = self.class.header.name.clone();
        let local_prefix = format!("{name}$");
        let entries: Vec<InnerClassEntry> = self
            .class
            .inner_classes()
            .iter()
            .filter(|entry| entry.inner_class != name)
            .cloned()
            .collect();

        for entry in entries
            .iter()
            .filter(|entry| entry.outer_class.as_deref() == Some(name.as_str()))
        {
            let types = self.system.types_mut();
            let inner = types.intern_class(&entry.inner_class);
            types.add_declared_type(self.id, inner);

            let simple_name = entry.inner_name.as_deref().unwrap_or_default();
            types.set_simple_name(inner, simple_name);
            if simple_name.is_empty() {
                self.mark_anonymous(inner, entry.access_flags);
            } else {
                if self.system.resolve_class(inner).is_some() {
                    if let Some(definition) = self.system.types_mut().definition_mut(inner) {
                        definition.flags |= Flags::from_access(entry.access_flags);
                    }
                }
            }
        }

        for entry in entries.iter().filter(|entry| {
            entry.outer_class.is_none() && entry.inner_class.starts_with(&local_prefix)
        }) {
            let inner = self.system.types_mut().intern_class(&entry.inner_class);
            if self.system.resolve_class(inner).is_none() {
                continue;
            }
            self.link_local_class(inner);
        }
    }

    fn mark_anonymous(&mut self, inner: ClassId, access_flags: u16) {
        if self.system.resolve_class(inner).is_none() {
            return;
        }
        if let Some(definition) = self.system.types_mut().definition_mut(inner) {
            definition.flags |= Flags::from_access(access_flags) | Flags::ANONYMOUS;
        }
    }

    fn link_local_class(&mut self, inner: ClassId) {
        let types = self.system.types();
        if types.class(inner).declaring_method().is_some() {
            return;
        }
        let Some(info) = types
            .definition(inner)
            .and_then(|definition| definition.enclosing_method.clone())
        else {
            return;
        };
        if info.class_name != self.class.header.name {
            return;
        }
        let Some((name, descriptor)) = &info.method else {
            return;
        };

        if let Some(method) = find_method(self.system, self.id, name, descriptor) {
            let types = self.system.types_mut();
            types.add_method_declared_type(method, inner);
            if types.class(inner).declaring_type().is_none() {
                types.add_declared_type(self.id, inner);
            }
        }
    }
}

fn has_attribute(attributes: &[Attribute], name: &str) -> bool {
    attributes.iter().any(|attribute| attribute.name() == name)
}

fn member_type(system: &mut MetadataSystem, signature: Option<&str>, descriptor: &str) -> Result<TypeRef> {
    if let Some(signature) = signature {
        match system.parse_type_signature(signature) {
            Ok(ty) => return Ok(ty),
            Err(error) => warn!(%error, "ignoring malformed field signature"),
        }
    }
    system.parse_type_descriptor(descriptor)
}

fn find_method(system: &MetadataSystem, class: ClassId, name: &str, descriptor: &str) -> Option<MethodId> {
    let types = system.types();
    types.definition(class)?.methods.iter().copied().find(|method| {
        types.method(*method).name == name && types.method_erased_signature(*method) == descriptor
    })
}
