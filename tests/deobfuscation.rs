//! Integration tests for repairing enums whose constant bodies lost their nesting information.

mod common;

use common::{loader, runtime_classes, ClassWriter};
use jvmscope::prelude::*;

const ENUM: u16 = 0x4000 | 0x0010 | 0x0001;
const CONSTANT_BODY: u16 = 0x4000 | 0x0010;

fn obfuscated_enum() -> Vec<Vec<u8>> {
    let mut classes = runtime_classes();
    classes.push(
        ClassWriter::new("x/a")
            .access(ENUM)
            .super_class("java/lang/Enum")
            .signature("Ljava/lang/Enum<Lx/a;>;")
            .static_initializer(&["x/b", "x/c", "java/lang/Object"])
            .build(),
    );
    classes.push(ClassWriter::new("x/b").access(CONSTANT_BODY).super_class("x/a").build());
    classes.push(ClassWriter::new("x/c").access(CONSTANT_BODY).super_class("x/a").build());
    classes
}

#[test]
fn test_manual_pass() -> Result<()> {
    let mut system = MetadataSystem::new(loader(obfuscated_enum()));
    let color = system.load_type("x/a")?;
    assert!(system.types().definition(color).unwrap().declared_types().is_empty());

    assert!(AnonymousEnumPass.run(&mut system, color)?);

    let types = system.types();
    let first = types.find_class("x/b").unwrap();
    let second = types.find_class("x/c").unwrap();
    assert_eq!(types.definition(color).unwrap().declared_types(), &[first, second]);
    assert!(types.definition(first).unwrap().is_anonymous());
    assert_eq!(types.class(second).declaring_type(), Some(color));
    assert_eq!(types.class(ClassId::OBJECT).declaring_type(), None);
    Ok(())
}

#[test]
fn test_pass_is_idempotent() -> Result<()> {
    let mut system = MetadataSystem::new(loader(obfuscated_enum()));
    let color = system.load_type("x/a")?;

    AnonymousEnumPass.run(&mut system, color)?;
    let nested = system.types().definition(color).unwrap().declared_types().to_vec();
    let flags = system.types().definition(nested[0]).unwrap().flags;

    assert!(!AnonymousEnumPass.run(&mut system, color)?);
    assert_eq!(system.types().definition(color).unwrap().declared_types(), nested.as_slice());
    assert_eq!(system.types().definition(nested[0]).unwrap().flags, flags);
    Ok(())
}

#[test]
fn test_configured_resolver_repairs_on_load() -> Result<()> {
    let config = MetadataConfig {
        fix_anonymous_enums: true,
        ..MetadataConfig::default()
    };
    let mut system = MetadataSystem::with_config(loader(obfuscated_enum()), config);
    let color = system.load_type("x/a")?;

    let definition = system.types().definition(color).unwrap();
    assert!(definition.flags.contains(Flags::DEOBFUSCATED));
    assert_eq!(definition.declared_types().len(), 2);
    Ok(())
}

#[test]
fn test_without_code_nothing_changes() -> Result<()> {
    let config = MetadataConfig {
        options: ReaderOptions::empty(),
        ..MetadataConfig::default()
    };
    let mut system = MetadataSystem::with_config(loader(obfuscated_enum()), config);
    let color = system.load_type("x/a")?;

    assert!(!AnonymousEnumPass.run(&mut system, color)?);
    assert!(system.types().definition(color).unwrap().declared_types().is_empty());
    Ok(())
}
