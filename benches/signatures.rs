//! Benchmarks for signature parsing and binding.
//!
//! Covers the grammar on its own (descriptors, field, class and method signatures), the
//! path through [`MetadataSystem`] that binds parsed signatures to type references, and the
//! header sniffing loaders use to name a class file.

extern crate jvmscope;

use criterion::{criterion_group, criterion_main, Criterion};
use jvmscope::{
    metadata::{bootstrap::ClassFileHeader, loader::BufferTypeLoader, signatures::SignatureParser},
    Buffer, MetadataSystem,
};
use std::hint::black_box;

const NESTED_FIELD: &str =
    "Ljava/util/Map<Ljava/lang/String;Ljava/util/List<+Ljava/lang/Comparable<-TT;>;>;>;";
const CLASS_SIGNATURE: &str = "<K::Ljava/lang/Comparable<-TK;>;V:Ljava/lang/Object;>\
Ljava/util/AbstractMap<TK;TV;>;Ljava/util/NavigableMap<TK;TV;>;Ljava/io/Serializable;";
const METHOD_SIGNATURE: &str = "<T:Ljava/lang/Object;R:Ljava/lang/Object;>\
(Ljava/util/function/Function<-TT;+TR;>;[[TT;I)Ljava/util/stream/Stream<TR;>;^Ljava/io/IOException;";

/// Benchmark parsing an erased method descriptor.
/// Descriptor: (ILjava/lang/String;[J)V
fn bench_method_descriptor(c: &mut Criterion) {
    c.bench_function("sig_method_descriptor", |b| {
        b.iter(|| {
            let mut parser = SignatureParser::descriptor(black_box("(ILjava/lang/String;[J)V"));
            black_box(parser.parse_method_signature().unwrap())
        });
    });
}

/// Benchmark parsing a field signature with nested wildcards.
fn bench_nested_field_signature(c: &mut Criterion) {
    c.bench_function("sig_field_nested_wildcards", |b| {
        b.iter(|| {
            let mut parser = SignatureParser::new(black_box(NESTED_FIELD));
            black_box(parser.parse_type_signature().unwrap())
        });
    });
}

/// Benchmark parsing a class signature with bounded type parameters and interfaces.
fn bench_class_signature(c: &mut Criterion) {
    c.bench_function("sig_class_bounded_parameters", |b| {
        b.iter(|| {
            let mut parser = SignatureParser::new(black_box(CLASS_SIGNATURE));
            black_box(parser.parse_class_signature().unwrap())
        });
    });
}

/// Benchmark parsing a generic method signature with a throws clause.
fn bench_generic_method_signature(c: &mut Criterion) {
    c.bench_function("sig_method_generic_throws", |b| {
        b.iter(|| {
            let mut parser = SignatureParser::new(black_box(METHOD_SIGNATURE));
            black_box(parser.parse_method_signature().unwrap())
        });
    });
}

/// Benchmark binding a parameterized signature to type references.
///
/// No loader serves any class, so this measures parsing, interning and construction of the
/// parameterized references without decoding.
fn bench_bind_parameterized(c: &mut Criterion) {
    let mut system = MetadataSystem::new(BufferTypeLoader::new(Vec::new()));

    c.bench_function("sig_bind_parameterized", |b| {
        b.iter(|| {
            let ty = system
                .parse_type_signature(black_box(
                    "Ljava/util/Map<Ljava/lang/String;Ljava/util/List<+Ljava/lang/Number;>;>;",
                ))
                .unwrap();
            black_box(ty)
        });
    });
}

/// Benchmark binding and then erasing a nested array signature.
fn bench_bind_and_erase(c: &mut Criterion) {
    let mut system = MetadataSystem::new(BufferTypeLoader::new(Vec::new()));

    c.bench_function("sig_bind_and_erase", |b| {
        b.iter(|| {
            let ty = system
                .parse_type_signature(black_box("[[Ljava/util/List<Ljava/lang/String;>;"))
                .unwrap();
            black_box(system.algebra().erase_recursive(&ty))
        });
    });
}

/// Benchmark naming a class file from its header.
/// Class: `public class com/example/Service` with a three-entry pool.
fn bench_header_sniff(c: &mut Criterion) {
    let name = b"com/example/Service";
    let mut buffer = Buffer::new();
    buffer.write_be(0xCAFE_BABEu32);
    buffer.write_be(0u16);
    buffer.write_be(52u16);
    buffer.write_be(3u16);
    buffer.write_be(1u8);
    buffer.write_be(name.len() as u16);
    buffer.write_bytes(name);
    buffer.write_be(7u8);
    buffer.write_be(1u16);
    buffer.write_be(0x0021u16);
    buffer.write_be(2u16);
    let data = buffer.into_inner();

    c.bench_function("header_sniff", |b| {
        b.iter(|| {
            let header = ClassFileHeader::parse(black_box(&data)).unwrap();
            black_box(header.name)
        });
    });
}

criterion_group!(
    benches,
    bench_method_descriptor,
    bench_nested_field_signature,
    bench_class_signature,
    bench_generic_method_signature,
    bench_bind_parameterized,
    bench_bind_and_erase,
    bench_header_sniff,
);
criterion_main!(benches);
