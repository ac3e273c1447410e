use std::fmt;

use strum::{EnumIter, IntoStaticStr};

use crate::metadata::constantpool::ConstantValue;

/// The fixed set of primitive types, plus `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr)]
pub enum PrimitiveKind {
    /// `boolean` (`Z`)
    #[strum(serialize = "boolean")]
    Boolean,
    /// `byte` (`B`)
    #[strum(serialize = "byte")]
    Byte,
    /// `char` (`C`)
    #[strum(serialize = "char")]
    Char,
    /// `short` (`S`)
    #[strum(serialize = "short")]
    Short,
    /// `int` (`I`)
    #[strum(serialize = "int")]
    Int,
    /// `long` (`J`)
    #[strum(serialize = "long")]
    Long,
    /// `float` (`F`)
    #[strum(serialize = "float")]
    Float,
    /// `double` (`D`)
    #[strum(serialize = "double")]
    Double,
    /// `void` (`V`), valid only as a return type
    #[strum(serialize = "void")]
    Void,
}

impl PrimitiveKind {
    /// Map a descriptor letter to its kind.
    #[must_use]
    pub fn from_descriptor(descriptor: char) -> Option<Self> {
        match descriptor {
            'Z' => Some(PrimitiveKind::Boolean),
            'B' => Some(PrimitiveKind::Byte),
            'C' => Some(PrimitiveKind::Char),
            'S' => Some(PrimitiveKind::Short),
            'I' => Some(PrimitiveKind::Int),
            'J' => Some(PrimitiveKind::Long),
            'F' => Some(PrimitiveKind::Float),
            'D' => Some(PrimitiveKind::Double),
            'V' => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    /// The descriptor letter of this kind.
    #[must_use]
    pub fn descriptor(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Void => 'V',
        }
    }

    /// The source-level keyword, e.g. `int`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Width of the value in bits; `void` is 0.
    #[must_use]
    pub fn bit_width(self) -> u32 {
        match self {
            PrimitiveKind::Boolean => 1,
            PrimitiveKind::Byte => 8,
            PrimitiveKind::Char | PrimitiveKind::Short => 16,
            PrimitiveKind::Int | PrimitiveKind::Float => 32,
            PrimitiveKind::Long | PrimitiveKind::Double => 64,
            PrimitiveKind::Void => 0,
        }
    }

    /// `byte`, `char`, `short`, `int` and `long`.
    #[must_use]
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::Char
                | PrimitiveKind::Short
                | PrimitiveKind::Int
                | PrimitiveKind::Long
        )
    }

    /// Integral kinds plus `float` and `double`.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integral() || matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// `void`, the only kind that has no values.
    #[must_use]
    pub fn is_void(self) -> bool {
        self == PrimitiveKind::Void
    }

    /// `long` and `double`, which take two local-variable slots.
    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(self, PrimitiveKind::Long | PrimitiveKind::Double)
    }

    /// Number of stack words a value of this kind occupies.
    #[must_use]
    pub fn stack_size(self) -> usize {
        match self {
            PrimitiveKind::Void => 0,
            PrimitiveKind::Long | PrimitiveKind::Double => 2,
            _ => 1,
        }
    }

    /// Internal name of the wrapper class, e.g. `java/lang/Integer`.
    #[must_use]
    pub fn box_internal_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java/lang/Boolean",
            PrimitiveKind::Byte => "java/lang/Byte",
            PrimitiveKind::Char => "java/lang/Character",
            PrimitiveKind::Short => "java/lang/Short",
            PrimitiveKind::Int => "java/lang/Integer",
            PrimitiveKind::Long => "java/lang/Long",
            PrimitiveKind::Float => "java/lang/Float",
            PrimitiveKind::Double => "java/lang/Double",
            PrimitiveKind::Void => "java/lang/Void",
        }
    }

    /// The kind whose wrapper class has internal name `internal_name`.
    #[must_use]
    pub fn from_box_internal_name(internal_name: &str) -> Option<Self> {
        match internal_name {
            "java/lang/Boolean" => Some(PrimitiveKind::Boolean),
            "java/lang/Byte" => Some(PrimitiveKind::Byte),
            "java/lang/Character" => Some(PrimitiveKind::Char),
            "java/lang/Short" => Some(PrimitiveKind::Short),
            "java/lang/Integer" => Some(PrimitiveKind::Int),
            "java/lang/Long" => Some(PrimitiveKind::Long),
            "java/lang/Float" => Some(PrimitiveKind::Float),
            "java/lang/Double" => Some(PrimitiveKind::Double),
            "java/lang/Void" => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    /// Narrow a `ConstantValue` attribute literal to this field kind.
    ///
    /// The format stores `boolean`, `byte`, `char` and `short` constants as `int` entries. Values
    /// that do not fit the kind, or kinds that cannot hold a literal, yield `None`.
    #[must_use]
    pub fn narrow(self, value: &ConstantValue) -> Option<ConstantValue> {
        match (self, value) {
            (PrimitiveKind::Boolean, ConstantValue::Integer(value)) => {
                Some(ConstantValue::Boolean(*value != 0))
            }
            #[allow(clippy::cast_possible_truncation)]
            (PrimitiveKind::Byte, ConstantValue::Integer(value)) => {
                Some(ConstantValue::Byte(*value as i8))
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            (PrimitiveKind::Char, ConstantValue::Integer(value)) => {
                Some(ConstantValue::Char(*value as u16))
            }
            #[allow(clippy::cast_possible_truncation)]
            (PrimitiveKind::Short, ConstantValue::Integer(value)) => {
                Some(ConstantValue::Short(*value as i16))
            }
            (PrimitiveKind::Int, ConstantValue::Integer(_))
            | (PrimitiveKind::Long, ConstantValue::Long(_))
            | (PrimitiveKind::Float, ConstantValue::Float(_))
            | (PrimitiveKind::Double, ConstantValue::Double(_)) => Some(value.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
