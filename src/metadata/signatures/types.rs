use crate::metadata::typesystem::PrimitiveKind;

/// A parsed field descriptor or generic type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// A primitive or `void` (`V` is only legal as a return type)
    Primitive(PrimitiveKind),
    /// `Lpkg/Outer<...>.Inner<...>;`
    Class(ClassTypeSignature),
    /// `TName;`
    TypeVariable(String),
    /// `[` followed by the element signature
    Array(Box<TypeSignature>),
}

impl TypeSignature {
    /// The number of array dimensions wrapped around the element type.
    #[must_use]
    pub fn array_rank(&self) -> usize {
        let mut rank = 0;
        let mut current = self;
        while let TypeSignature::Array(element) = current {
            rank += 1;
            current = element;
        }
        rank
    }
}

/// One `Name<args>` segment of a class type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    /// The segment name; the first segment carries the package prefix
    pub name: String,
    /// Type arguments applied to this segment
    pub type_arguments: Vec<TypeArgument>,
}

/// A possibly nested class type: `Ljava/util/Map<TK;TV;>.Entry;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Outermost segment first
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// A non-generic class named by its internal name.
    #[must_use]
    pub fn from_internal_name(internal_name: &str) -> Self {
        ClassTypeSignature {
            segments: vec![SimpleClassTypeSignature {
                name: internal_name.to_string(),
                type_arguments: Vec::new(),
            }],
        }
    }

    /// The binary name, nested segments joined with `$`.
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.name.as_str())
            .collect::<Vec<_>>()
            .join("$")
    }

    /// Type arguments of the innermost segment.
    #[must_use]
    pub fn type_arguments(&self) -> &[TypeArgument] {
        self.segments
            .last()
            .map_or(&[], |segment| segment.type_arguments.as_slice())
    }

    /// `true` if any segment carries type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| !segment.type_arguments.is_empty())
    }
}

/// A type argument inside `<...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    /// A concrete argument
    Exact(TypeSignature),
    /// `+bound`
    Extends(TypeSignature),
    /// `-bound`
    Super(TypeSignature),
}

/// `Name:ClassBound:InterfaceBound...` in a type-parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalTypeParameter {
    /// Type variable name
    pub name: String,
    /// The class bound; absent for `T::Ljava/lang/Comparable;`
    pub class_bound: Option<TypeSignature>,
    /// Interface bounds, in declaration order
    pub interface_bounds: Vec<TypeSignature>,
}

impl FormalTypeParameter {
    /// Every declared bound, class bound first.
    pub fn bounds(&self) -> impl Iterator<Item = &TypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

/// The `Signature` attribute of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    /// Declared type parameters
    pub type_parameters: Vec<FormalTypeParameter>,
    /// The superclass
    pub superclass: ClassTypeSignature,
    /// Implemented interfaces
    pub interfaces: Vec<ClassTypeSignature>,
}

/// A method descriptor or the `Signature` attribute of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Declared method type parameters; always empty for descriptors
    pub type_parameters: Vec<FormalTypeParameter>,
    /// Parameter types
    pub parameters: Vec<TypeSignature>,
    /// Return type, `V` included
    pub return_type: TypeSignature,
    /// `^`-prefixed thrown types
    pub throws: Vec<TypeSignature>,
}
