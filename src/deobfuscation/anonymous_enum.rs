use tracing::{debug, warn};

use crate::{
    deobfuscation::DeobfuscationPass,
    disassembler::{instructions, NEW},
    metadata::{
        flags::Flags,
        resolver::MetadataSystem,
        token::Token,
        typesystem::{ClassId, TypeRef},
    },
    Result,
};

/// Reattaches enum-constant bodies to the enum that declares them.
///
/// A constant with a body, such as `RED { ... }`, compiles to an anonymous subclass of the
/// enum that is instantiated from the enum's static initializer. Obfuscators that strip
/// `InnerClasses` leave that subclass as an unrelated top-level type. The pass scans every
/// `<clinit>` of an enum for `new` instructions whose class directly extends the enum, then
/// records the class as a nested type of the enum and flags it [`Flags::ANONYMOUS`].
///
/// Processed enums are marked [`Flags::DEOBFUSCATED`]; later runs on them do nothing. An enum
/// that extends another enum has the base processed first.
///
/// # Examples
///
/// ```rust,no_run
/// use jvmscope::deobfuscation::{AnonymousEnumPass, DeobfuscationPass};
/// use jvmscope::metadata::{loader::ClasspathTypeLoader, resolver::MetadataSystem};
///
/// let mut system = MetadataSystem::new(ClasspathTypeLoader::new(["app.jar"]));
/// let color = system.load_type("com/example/Color")?;
/// if AnonymousEnumPass.run(&mut system, color)? {
///     println!("{:?}", system.types().definition(color).map(|d| d.declared_types()));
/// }
/// # Ok::<(), jvmscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousEnumPass;

impl AnonymousEnumPass {
    /// Classes instantiated by the type initializers of `id`, in encounter order.
    fn constructed_classes(system: &mut MetadataSystem, id: ClassId) -> Vec<ClassId> {
        let Some(definition) = system.types().definition(id) else {
            return Vec::new();
        };
        let Some(pool) = definition.constant_pool.clone() else {
            return Vec::new();
        };

        let types = system.types();
        let bodies: Vec<Vec<u8>> = definition
            .methods
            .iter()
            .map(|method| types.method(*method))
            .filter(|method| method.is_type_initializer())
            .filter_map(|method| method.body.as_ref().map(|body| body.code.clone()))
            .collect();

        let mut names = Vec::new();
        for code in &bodies {
            for instruction in instructions(code) {
                let instruction = match instruction {
                    Ok(instruction) => instruction,
                    Err(error) => {
                        warn!(
                            class = system.types().class(id).internal_name(),
                            %error,
                            "stopped scanning undecodable static initializer"
                        );
                        break;
                    }
                };
                if instruction.opcode != NEW {
                    continue;
                }

                let Some(index) = instruction.u16_operand() else {
                    continue;
                };
                match pool.class_name(Token::new(index)) {
                    Ok(name) if !names.iter().any(|known: &String| known == name) => {
                        names.push(name.to_string());
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(
                            class = system.types().class(id).internal_name(),
                            index,
                            %error,
                            "new refers to an invalid class constant"
                        );
                    }
                }
            }
        }

        // Array descriptors cannot be the operand of `new`.
        names
            .iter()
            .filter(|name| !name.starts_with('['))
            .map(|name| system.types_mut().intern_class(name))
            .collect()
    }

    /// `true` if the erased base type of `candidate` is the enum `id`.
    fn extends_enum(system: &mut MetadataSystem, candidate: ClassId, id: ClassId) -> bool {
        if candidate == id || system.resolve_class(candidate).is_none() {
            return false;
        }

        let Some(base) = system
            .types()
            .definition(candidate)
            .and_then(|definition| definition.base_type.clone())
        else {
            return false;
        };

        let mut algebra = system.algebra();
        let erased = algebra.erase(&base);
        algebra.is_same_type(&erased, &TypeRef::Class(id))
    }

    fn reparent(system: &mut MetadataSystem, id: ClassId, inner: ClassId) -> bool {
        let types = system.types_mut();
        let already_nested = types.class(inner).declaring_type() == Some(id)
            && types.class(inner).simple_name().is_empty()
            && types
                .definition(inner)
                .is_some_and(|definition| definition.flags.contains(Flags::ANONYMOUS))
            && types
                .definition(id)
                .is_some_and(|definition| definition.declared_types().contains(&inner));
        if already_nested {
            return false;
        }

        types.add_declared_type(id, inner);
        types.set_simple_name(inner, "");
        if let Some(definition) = types.definition_mut(inner) {
            definition.flags |= Flags::ANONYMOUS;
        }

        debug!(
            enum_type = types.class(id).internal_name(),
            constant_body = types.class(inner).internal_name(),
            "reattached enum constant body"
        );
        true
    }
}

impl DeobfuscationPass for AnonymousEnumPass {
    fn name(&self) -> &'static str {
        "anonymous-enum"
    }

    fn run(&self, system: &mut MetadataSystem, id: ClassId) -> Result<bool> {
        let Some(definition) = system.types_mut().definition_mut(id) else {
            return Ok(false);
        };
        if definition.flags.contains(Flags::DEOBFUSCATED) || !definition.is_enum() {
            return Ok(false);
        }
        definition.flags |= Flags::DEOBFUSCATED;
        let base = definition.base_type.clone();

        let mut changed = false;
        if let Some(base) = base.filter(|base| !base.names_class(ClassId::ENUM)) {
            if let Some(base_id) = system.resolve(&base) {
                changed |= self.run(system, base_id)?;
            }
        }

        for candidate in Self::constructed_classes(system, id) {
            if Self::extends_enum(system, candidate, id) {
                changed |= Self::reparent(system, id, candidate);
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::config::MetadataConfig,
        test::{class_loader, ClassFileBuilder, CodeBuilder},
    };

    const ENUM_ACCESS: u16 = 0x4000 | 0x0010 | 0x0001;
    const CONSTANT_BODY_ACCESS: u16 = 0x4000 | 0x0010;

    fn enum_class(name: &str, base: &str, constructed: &[&str]) -> Vec<u8> {
        let mut code = CodeBuilder::new(4, 0);
        for class in constructed {
            code = code.new_object(class).bytes(&[0x59, 0x57]);
        }
        let code = code.bytes(&[0xB1]);

        ClassFileBuilder::new(name)
            .access(ENUM_ACCESS)
            .super_class(base)
            .method(0x0008, "<clinit>", "()V", |m| m.code(code))
            .build()
    }

    fn constant_body(name: &str, base: &str) -> Vec<u8> {
        ClassFileBuilder::new(name)
            .access(CONSTANT_BODY_ACCESS)
            .super_class(base)
            .build()
    }

    fn system_with(classes: Vec<Vec<u8>>, config: MetadataConfig) -> MetadataSystem {
        let mut all = vec![
            ClassFileBuilder::new("java/lang/Object").no_super().build(),
            ClassFileBuilder::new("java/lang/Enum")
                .access(0x0421)
                .signature("<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;")
                .build(),
            ClassFileBuilder::new("a/Helper").build(),
        ];
        all.extend(classes);
        MetadataSystem::with_config(class_loader(all), config)
    }

    fn color_system(config: MetadataConfig) -> MetadataSystem {
        system_with(
            vec![
                enum_class("a/Color", "java/lang/Enum", &["a/Color$1", "a/Helper", "a/Color$2"]),
                constant_body("a/Color$1", "a/Color"),
                constant_body("a/Color$2", "a/Color"),
            ],
            config,
        )
    }

    #[test]
    fn test_reattaches_constant_bodies() {
        let mut system = color_system(MetadataConfig::default());
        let color = system.load_type("a/Color").unwrap();

        assert!(AnonymousEnumPass.run(&mut system, color).unwrap());

        let types = system.types();
        let first = types.find_class("a/Color$1").unwrap();
        let second = types.find_class("a/Color$2").unwrap();
        let helper = types.find_class("a/Helper").unwrap();
        assert_eq!(types.definition(color).unwrap().declared_types(), &[first, second]);
        assert_eq!(types.class(first).declaring_type(), Some(color));
        assert!(types.definition(first).unwrap().is_anonymous());
        assert_eq!(types.class(helper).declaring_type(), None);
        assert!(!types.definition(helper).unwrap().flags.contains(Flags::ANONYMOUS));
        assert!(types.definition(color).unwrap().flags.contains(Flags::DEOBFUSCATED));
    }

    #[test]
    fn test_reattached_bodies_use_binary_names() {
        let mut system = color_system(MetadataConfig::default());
        let color = system.load_type("a/Color").unwrap();
        AnonymousEnumPass.run(&mut system, color).unwrap();

        let types = system.types();
        let first = types.find_class("a/Color$1").unwrap();
        assert_eq!(types.class(first).simple_name(), "");
        assert_eq!(types.full_name(first), "a.Color$1");
    }

    #[test]
    fn test_moves_body_away_from_stale_outer() {
        let mut system = system_with(
            vec![
                enum_class("a/Color", "java/lang/Enum", &["a/Color$1"]),
                ClassFileBuilder::new("a/Color$1")
                    .access(CONSTANT_BODY_ACCESS)
                    .super_class("a/Color")
                    .inner_class("a/Color$1", Some("a/Helper"), Some("Stray"), 0)
                    .build(),
            ],
            MetadataConfig::default(),
        );
        let helper = system.load_type("a/Helper").unwrap();
        let body = system.load_type("a/Color$1").unwrap();
        assert_eq!(system.types().definition(helper).unwrap().declared_types(), &[body]);

        let color = system.load_type("a/Color").unwrap();
        assert!(AnonymousEnumPass.run(&mut system, color).unwrap());

        let types = system.types();
        assert!(types.definition(helper).unwrap().declared_types().is_empty());
        assert_eq!(types.definition(color).unwrap().declared_types(), &[body]);
        assert_eq!(types.class(body).declaring_type(), Some(color));
        assert_eq!(types.full_name(body), "a.Color$1");
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let mut system = color_system(MetadataConfig::default());
        let color = system.load_type("a/Color").unwrap();

        assert!(AnonymousEnumPass.run(&mut system, color).unwrap());
        let nested = system.types().definition(color).unwrap().declared_types().to_vec();

        assert!(!AnonymousEnumPass.run(&mut system, color).unwrap());
        assert_eq!(system.types().definition(color).unwrap().declared_types(), nested.as_slice());
    }

    #[test]
    fn test_ignores_non_enums() {
        let mut system = color_system(MetadataConfig::default());
        let helper = system.load_type("a/Helper").unwrap();

        assert!(!AnonymousEnumPass.run(&mut system, helper).unwrap());
        assert!(!system
            .types()
            .definition(helper)
            .unwrap()
            .flags
            .contains(Flags::DEOBFUSCATED));
    }

    #[test]
    fn test_processes_base_enum_first() {
        let mut system = system_with(
            vec![
                enum_class("a/Base", "java/lang/Enum", &["a/Base$1"]),
                constant_body("a/Base$1", "a/Base"),
                enum_class("a/Sub", "a/Base", &["a/Sub$1"]),
                constant_body("a/Sub$1", "a/Sub"),
            ],
            MetadataConfig::default(),
        );
        let sub = system.load_type("a/Sub").unwrap();

        assert!(AnonymousEnumPass.run(&mut system, sub).unwrap());

        let types = system.types();
        let base = types.find_class("a/Base").unwrap();
        let base_body = types.find_class("a/Base$1").unwrap();
        let sub_body = types.find_class("a/Sub$1").unwrap();
        assert!(types.definition(base).unwrap().flags.contains(Flags::DEOBFUSCATED));
        assert_eq!(types.class(base_body).declaring_type(), Some(base));
        assert_eq!(types.class(sub_body).declaring_type(), Some(sub));
        assert!(!types.definition(base).unwrap().declared_types().contains(&sub_body));
    }

    #[test]
    fn test_runs_on_load_when_configured() {
        let config = MetadataConfig {
            fix_anonymous_enums: true,
            ..MetadataConfig::default()
        };
        let mut system = color_system(config);
        let color = system.load_type("a/Color").unwrap();

        let definition = system.types().definition(color).unwrap();
        assert!(definition.flags.contains(Flags::DEOBFUSCATED));
        assert_eq!(definition.declared_types().len(), 2);
        assert!(!AnonymousEnumPass.run(&mut system, color).unwrap());
    }

    #[test]
    fn test_undecodable_initializer_is_skipped() {
        let mut system = system_with(
            vec![ClassFileBuilder::new("a/Broken")
                .access(ENUM_ACCESS)
                .super_class("java/lang/Enum")
                .method(0x0008, "<clinit>", "()V", |m| {
                    m.code(CodeBuilder::new(1, 0).bytes(&[0xCB]))
                })
                .build()],
            MetadataConfig::default(),
        );
        let broken = system.load_type("a/Broken").unwrap();

        assert!(!AnonymousEnumPass.run(&mut system, broken).unwrap());
        assert!(system
            .types()
            .definition(broken)
            .unwrap()
            .flags
            .contains(Flags::DEOBFUSCATED));
    }

    #[test]
    fn test_pass_name() {
        assert_eq!(AnonymousEnumPass.name(), "anonymous-enum");
    }
}
