//! # jvmscope Prelude
//!
//! The types most programs touch when loading classes and asking questions about them.
//! Import it with `use jvmscope::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jvmscope operations
pub use crate::Error;

/// The result type used throughout jvmscope
pub use crate::Result;

/// Low-level binary input
pub use crate::{Buffer, Parser};

// ================================================================================================
// Loading and Resolution
// ================================================================================================

/// The owner of the type graph and its configuration
pub use crate::metadata::{
    config::{MetadataConfig, ReaderOptions},
    resolver::{MetadataSystem, ResolverFrame},
};

/// Sources of class-file bytes
pub use crate::metadata::loader::{
    BufferTypeLoader, ClasspathEntry, ClasspathTypeLoader, CompositeTypeLoader, TypeLoader,
};

/// Decoded class files and constant pools
pub use crate::metadata::{
    classfile::{ClassFile, ClassFileReader, MetadataScope, ScopeItem},
    constantpool::{ConstantPool, ConstantPoolEntry},
    token::Token,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Type references, definitions and their registry
pub use crate::metadata::typesystem::{
    ClassId, GenericOwner, GenericParamId, PrimitiveKind, ResolutionState, TypeDefinition, TypeRef,
    TypeRegistry, TypeVisitor, WildcardBound,
};

/// Members and references to them
pub use crate::metadata::members::{
    FieldDefinition, FieldRef, MethodBody, MethodDefinition, MethodRef, ParameterDefinition,
};

/// Access flags and model markers
pub use crate::metadata::flags::Flags;

// ================================================================================================
// Type Algebra
// ================================================================================================

/// Subtyping, erasure and conversions
pub use crate::metadata::algebra::{ConversionType, GenericMapping, TypeAlgebra};

// ================================================================================================
// Bytecode and Deobfuscation
// ================================================================================================

/// Instruction walking
pub use crate::disassembler::{decode_stream, Instruction};

/// Type-graph repair passes
pub use crate::deobfuscation::{AnonymousEnumPass, DeobfuscationPass};
