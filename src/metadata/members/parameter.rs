use crate::metadata::{flags::Flags, members::MethodId, typesystem::TypeRef};

fn slot_size(ty: &TypeRef) -> usize {
    match ty.primitive_kind() {
        Some(kind) if kind.is_wide() => 2,
        _ => 1,
    }
}

/// A method parameter.
///
/// `position` and `method` are maintained by the owning method's parameter collection; `slot`
/// is the local-variable index assigned by the decoder.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    /// Name from `MethodParameters` or `LocalVariableTable`, if any
    pub name: Option<String>,
    /// `FINAL`, `SYNTHETIC` and `MANDATED` markers
    pub flags: Flags,
    /// First local-variable slot occupied by the parameter
    pub slot: usize,
    pub(crate) parameter_type: TypeRef,
    pub(crate) position: usize,
    pub(crate) method: Option<MethodId>,
}

impl ParameterDefinition {
    /// An unowned parameter.
    #[must_use]
    pub fn new(name: Option<String>, parameter_type: TypeRef, flags: Flags) -> Self {
        ParameterDefinition {
            name,
            flags,
            slot: 0,
            parameter_type,
            position: 0,
            method: None,
        }
    }

    /// The declared type.
    #[must_use]
    pub fn parameter_type(&self) -> &TypeRef {
        &self.parameter_type
    }

    /// Zero-based index in the owning method's parameter list.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The owning method, `None` once removed.
    #[must_use]
    pub fn method(&self) -> Option<MethodId> {
        self.method
    }

    /// Slots occupied: 2 for `long` and `double`, 1 otherwise.
    #[must_use]
    pub fn size(&self) -> usize {
        slot_size(&self.parameter_type)
    }

    /// `true` for compiler-inserted parameters.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.flags.intersects(Flags::SYNTHETIC | Flags::MANDATED)
    }
}

/// A local variable from `LocalVariableTable`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    /// Source-level name
    pub name: String,
    /// Local-variable slot
    pub slot: usize,
    /// Declared type
    pub variable_type: TypeRef,
    /// First instruction offset where the variable is live
    pub start_pc: u16,
    /// Number of code bytes the variable is live for
    pub length: u16,
}

impl VariableDefinition {
    /// Slots occupied: 2 for `long` and `double`, 1 otherwise.
    #[must_use]
    pub fn size(&self) -> usize {
        slot_size(&self.variable_type)
    }

    /// `true` if the variable is live at `pc`.
    #[must_use]
    pub fn is_live_at(&self, pc: u16) -> bool {
        pc >= self.start_pc && u32::from(pc) < u32::from(self.start_pc) + u32::from(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let long = ParameterDefinition::new(None, TypeRef::LONG, Flags::empty());
        let object = ParameterDefinition::new(Some("o".into()), TypeRef::OBJECT, Flags::FINAL);

        assert_eq!(long.size(), 2);
        assert_eq!(object.size(), 1);
        assert!(long.method().is_none());
        assert!(!object.is_synthetic());
    }

    #[test]
    fn test_variable_liveness() {
        let variable = VariableDefinition {
            name: "d".to_string(),
            slot: 2,
            variable_type: TypeRef::DOUBLE,
            start_pc: 4,
            length: 10,
        };

        assert_eq!(variable.size(), 2);
        assert!(!variable.is_live_at(3));
        assert!(variable.is_live_at(4));
        assert!(variable.is_live_at(13));
        assert!(!variable.is_live_at(14));
    }
}
