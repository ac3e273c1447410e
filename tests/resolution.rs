//! Integration tests for loading classes from classpaths and resolving them on demand.

mod common;

use std::{fs, io::Write, path::Path};

use common::{loader, runtime_classes, ClassWriter};
use jvmscope::{
    metadata::{loader::ClasspathTypeLoader, typesystem::ResolutionState},
    prelude::*,
};
use zip::{write::FileOptions, ZipWriter};

fn write_class(root: &Path, name: &str, bytes: &[u8]) {
    let path = root.join(format!("{name}.class"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn write_jar(path: &Path, classes: &[(&str, Vec<u8>)]) {
    let mut jar = ZipWriter::new(fs::File::create(path).unwrap());
    for (name, bytes) in classes {
        jar.start_file(format!("{name}.class"), FileOptions::default())
            .unwrap();
        jar.write_all(bytes).unwrap();
    }
    jar.finish().unwrap();
}

#[test]
fn test_directory_classpath() -> Result<()> {
    let root = tempfile::tempdir().unwrap();
    write_class(
        root.path(),
        "java/lang/Object",
        &ClassWriter::new("java/lang/Object").no_super().build(),
    );
    write_class(root.path(), "a/Base", &ClassWriter::new("a/Base").build());
    write_class(
        root.path(),
        "a/Derived",
        &ClassWriter::new("a/Derived")
            .super_class("a/Base")
            .method(0x0001, "run", "(I)V")
            .build(),
    );

    let mut system = MetadataSystem::new(ClasspathTypeLoader::new([root.path()]));
    let derived = system.load_type("a/Derived")?;

    let base_type = system.types().definition(derived).unwrap().base_type.clone().unwrap();
    let base = system.resolve(&base_type).unwrap();
    assert_eq!(system.types().class(base).internal_name(), "a/Base");
    assert_eq!(system.types().class(base).state(), ResolutionState::Resolved);

    let methods = &system.types().definition(derived).unwrap().methods;
    assert_eq!(methods.len(), 1);
    assert_eq!(system.types().method(methods[0]).name, "run");
    Ok(())
}

#[test]
fn test_jar_classpath_after_directory() -> Result<()> {
    let root = tempfile::tempdir().unwrap();
    let classes = root.path().join("classes");
    write_class(
        &classes,
        "java/lang/Object",
        &ClassWriter::new("java/lang/Object").no_super().build(),
    );

    let jar = root.path().join("lib.jar");
    write_jar(
        &jar,
        &[
            ("lib/Service", ClassWriter::new("lib/Service").access(0x0601).build()),
            (
                "lib/Impl",
                ClassWriter::new("lib/Impl").interface("lib/Service").build(),
            ),
        ],
    );

    let mut system = MetadataSystem::new(ClasspathTypeLoader::new([classes, jar]));
    let implementation = system.load_type("lib/Impl")?;
    let service = system.load_type("lib/Service")?;

    assert!(system.types().definition(service).unwrap().is_interface());
    let mut algebra = system.algebra();
    assert!(algebra.is_sub_type(&TypeRef::Class(implementation), &TypeRef::Class(service)));
    assert!(algebra.is_sub_type(&TypeRef::Class(service), &TypeRef::OBJECT));
    Ok(())
}

#[test]
fn test_missing_class() {
    let mut system = MetadataSystem::new(loader(runtime_classes()));

    match system.load_type("a/Missing") {
        Err(Error::TypeNotFound(name)) => assert_eq!(name, "a/Missing"),
        other => panic!("expected TypeNotFound, got {other:?}"),
    }
    let missing = system.types().find_class("a/Missing").unwrap();
    assert_eq!(system.resolve_class(missing), None);
    assert!(matches!(system.load_type("a/Missing"), Err(Error::TypeNotFound(_))));
}

#[test]
fn test_unresolved_super_type_degrades() -> Result<()> {
    let mut classes = runtime_classes();
    classes.push(ClassWriter::new("a/Orphan").super_class("a/Gone").build());
    let mut system = MetadataSystem::new(loader(classes));

    let orphan = system.load_type("a/Orphan")?;
    let orphan = TypeRef::Class(orphan);
    let mut algebra = system.algebra();
    assert!(algebra.is_sub_type(&orphan, &TypeRef::OBJECT));
    assert!(!algebra.is_sub_type(&orphan, &TypeRef::STRING));
    Ok(())
}

#[test]
fn test_define_from_bytes() -> Result<()> {
    let mut system = MetadataSystem::new(loader(runtime_classes()));
    let id = system.define_from_bytes(&ClassWriter::new("a/Supplied").build())?;
    assert_eq!(system.types().full_name(id), "a.Supplied");
    assert_eq!(system.define_from_bytes(&ClassWriter::new("a/Supplied").build())?, id);

    assert!(matches!(
        system.define_from_bytes(&[0xCA, 0xFE, 0xBA, 0xBF]),
        Err(Error::InvalidMagic(0xCAFE_BABF))
    ));
    Ok(())
}
