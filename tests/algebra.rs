//! Integration tests for the type algebra over decoded generic class files.

mod common;

use common::{loader, runtime_classes, ClassWriter};
use jvmscope::prelude::*;

fn system() -> MetadataSystem {
    let mut classes = runtime_classes();
    classes.push(
        ClassWriter::new("a/Box")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .build(),
    );
    classes.push(
        ClassWriter::new("a/StringBox")
            .super_class("a/Box")
            .signature("La/Box<Ljava/lang/String;>;")
            .build(),
    );
    classes.push(
        ClassWriter::new("a/Util")
            .generic_method(
                0x0009,
                "max",
                "(Ljava/util/Collection;)Ljava/lang/Comparable;",
                "<T::Ljava/lang/Comparable<-TT;>;>(Ljava/util/Collection<+TT;>;)TT;",
            )
            .build(),
    );
    MetadataSystem::new(loader(classes))
}

#[test]
fn test_parameterized_subtyping() -> Result<()> {
    let mut system = system();
    let strings = system.parse_type_signature("Ljava/util/ArrayList<Ljava/lang/String;>;")?;
    let any_list = system.parse_type_signature("Ljava/util/List<+Ljava/lang/Object;>;")?;
    let object_list = system.parse_type_signature("Ljava/util/List<Ljava/lang/Object;>;")?;
    let raw_list = system.parse_internal_name("java/util/List")?;

    let mut algebra = system.algebra();
    assert!(algebra.is_sub_type(&strings, &any_list));
    assert!(!algebra.is_sub_type(&strings, &object_list));
    assert!(algebra.is_sub_type(&strings, &raw_list));
    assert!(algebra.is_assignable_to(&strings, &TypeRef::OBJECT));
    assert!(algebra.contains_type(&any_list.type_arguments()[0], &TypeRef::STRING));
    Ok(())
}

#[test]
fn test_as_super_substitutes_arguments() -> Result<()> {
    let mut system = system();
    let strings = system.parse_type_signature("Ljava/util/ArrayList<Ljava/lang/String;>;")?;
    let collection = system.parse_internal_name("java/util/Collection")?;
    let string_box = system.parse_internal_name("a/StringBox")?;
    let box_type = system.parse_internal_name("a/Box")?;

    let mut algebra = system.algebra();
    let view = algebra.as_super(&strings, &collection).unwrap();
    assert_eq!(
        view.signature(algebra.types()),
        "Ljava/util/Collection<Ljava/lang/String;>;"
    );

    let base = algebra.base_type(&string_box).unwrap();
    assert_eq!(base.signature(algebra.types()), "La/Box<Ljava/lang/String;>;");
    assert!(algebra.is_sub_type(&string_box, &box_type));
    Ok(())
}

#[test]
fn test_erasure() -> Result<()> {
    let mut system = system();
    let strings = system.parse_type_signature("Ljava/util/ArrayList<Ljava/lang/String;>;")?;
    let matrix = system.parse_type_signature("[[Ljava/util/List<Ljava/lang/String;>;")?;

    let mut algebra = system.algebra();
    let erased = algebra.erase(&strings);
    assert_eq!(erased.signature(algebra.types()), "Ljava/util/ArrayList;");
    assert!(algebra.is_raw_type(&erased));

    let erased_matrix = algebra.erase_recursive(&matrix);
    assert_eq!(erased_matrix.signature(algebra.types()), "[[Ljava/util/List;");
    assert_eq!(TypeAlgebra::array_rank(&erased_matrix), 2);
    Ok(())
}

#[test]
fn test_generic_method_binding() -> Result<()> {
    let mut system = system();
    let util = system.load_type("a/Util")?;

    let types = system.types();
    let max = types
        .definition(util)
        .unwrap()
        .methods
        .iter()
        .copied()
        .find(|id| types.method(*id).name == "max")
        .unwrap();
    let method = types.method(max);
    assert_eq!(method.generic_parameters().len(), 1);

    let parameter = method.generic_parameters().get(0).unwrap();
    assert_eq!(types.generic_parameter(parameter).name(), "T");
    assert_eq!(method.return_type(), &TypeRef::GenericParameter(parameter));
    assert_eq!(
        types
            .generic_parameter(parameter)
            .extends_bound()
            .map(|bound| bound.signature(types)),
        Some("Ljava/lang/Comparable<-TT;>;".to_string())
    );
    Ok(())
}

#[test]
fn test_conversions_and_common_super_type() {
    let mut system = system();
    let integer = TypeRef::Class(ClassId::INTEGER);
    let number = TypeRef::Class(ClassId::NUMBER);

    let mut algebra = system.algebra();
    assert_eq!(algebra.conversion_type(&integer, &TypeRef::INT), ConversionType::Implicit);
    assert_eq!(algebra.conversion_type(&TypeRef::INT, &TypeRef::LONG), ConversionType::Explicit);
    assert_eq!(
        algebra.conversion_type(&TypeRef::FLOAT, &TypeRef::LONG),
        ConversionType::ImplicitLossy
    );
    assert_eq!(algebra.find_common_super_type(&integer, &number), number);
    assert_eq!(
        algebra.find_common_super_type(&TypeRef::INT, &TypeRef::LONG),
        TypeRef::LONG
    );
}
