//! Opcode table for JVM bytecode.
//!
//! Every one of the 256 byte values maps to an [`OpcodeInfo`]. Unassigned values carry an
//! empty mnemonic and are rejected by the decoder.

/// `nop`
pub const NOP: u8 = 0x00;
/// `ldc`
pub const LDC: u8 = 0x12;
/// `iinc`
pub const IINC: u8 = 0x84;
/// `goto`
pub const GOTO: u8 = 0xA7;
/// `tableswitch`
pub const TABLESWITCH: u8 = 0xAA;
/// `lookupswitch`
pub const LOOKUPSWITCH: u8 = 0xAB;
/// `return`
pub const RETURN: u8 = 0xB1;
/// `invokevirtual`
pub const INVOKEVIRTUAL: u8 = 0xB6;
/// `invokespecial`
pub const INVOKESPECIAL: u8 = 0xB7;
/// `invokestatic`
pub const INVOKESTATIC: u8 = 0xB8;
/// `invokeinterface`
pub const INVOKEINTERFACE: u8 = 0xB9;
/// `invokedynamic`
pub const INVOKEDYNAMIC: u8 = 0xBA;
/// `new`
pub const NEW: u8 = 0xBB;
/// `anewarray`
pub const ANEWARRAY: u8 = 0xBD;
/// `checkcast`
pub const CHECKCAST: u8 = 0xC0;
/// `wide`
pub const WIDE: u8 = 0xC4;

/// How many operand bytes follow an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLayout {
    /// No operands
    None,
    /// A fixed number of operand bytes
    Fixed(u8),
    /// `tableswitch`: padding, default, low, high and `high - low + 1` offsets
    TableSwitch,
    /// `lookupswitch`: padding, default, pair count and the match/offset pairs
    LookupSwitch,
    /// `wide`: a modified opcode followed by a 16-bit index (and a 16-bit constant for `iinc`)
    Wide,
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Assembler mnemonic, empty for unassigned opcodes
    pub mnemonic: &'static str,
    /// Operand shape
    pub layout: OperandLayout,
}

impl OpcodeInfo {
    const RESERVED: OpcodeInfo = OpcodeInfo::new("", OperandLayout::None);

    const fn new(mnemonic: &'static str, layout: OperandLayout) -> Self {
        OpcodeInfo { mnemonic, layout }
    }

    /// `false` for byte values the JVM leaves unassigned.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !self.mnemonic.is_empty()
    }
}

/// Look up the static description of `opcode`.
#[must_use]
pub fn opcode_info(opcode: u8) -> &'static OpcodeInfo {
    &OPCODES[usize::from(opcode)]
}

static OPCODES: [OpcodeInfo; 256] = [
    OpcodeInfo::new("nop", OperandLayout::None), // 0x00
    OpcodeInfo::new("aconst_null", OperandLayout::None), // 0x01
    OpcodeInfo::new("iconst_m1", OperandLayout::None), // 0x02
    OpcodeInfo::new("iconst_0", OperandLayout::None), // 0x03
    OpcodeInfo::new("iconst_1", OperandLayout::None), // 0x04
    OpcodeInfo::new("iconst_2", OperandLayout::None), // 0x05
    OpcodeInfo::new("iconst_3", OperandLayout::None), // 0x06
    OpcodeInfo::new("iconst_4", OperandLayout::None), // 0x07
    OpcodeInfo::new("iconst_5", OperandLayout::None), // 0x08
    OpcodeInfo::new("lconst_0", OperandLayout::None), // 0x09
    OpcodeInfo::new("lconst_1", OperandLayout::None), // 0x0A
    OpcodeInfo::new("fconst_0", OperandLayout::None), // 0x0B
    OpcodeInfo::new("fconst_1", OperandLayout::None), // 0x0C
    OpcodeInfo::new("fconst_2", OperandLayout::None), // 0x0D
    OpcodeInfo::new("dconst_0", OperandLayout::None), // 0x0E
    OpcodeInfo::new("dconst_1", OperandLayout::None), // 0x0F
    OpcodeInfo::new("bipush", OperandLayout::Fixed(1)), // 0x10
    OpcodeInfo::new("sipush", OperandLayout::Fixed(2)), // 0x11
    OpcodeInfo::new("ldc", OperandLayout::Fixed(1)), // 0x12
    OpcodeInfo::new("ldc_w", OperandLayout::Fixed(2)), // 0x13
    OpcodeInfo::new("ldc2_w", OperandLayout::Fixed(2)), // 0x14
    OpcodeInfo::new("iload", OperandLayout::Fixed(1)), // 0x15
    OpcodeInfo::new("lload", OperandLayout::Fixed(1)), // 0x16
    OpcodeInfo::new("fload", OperandLayout::Fixed(1)), // 0x17
    OpcodeInfo::new("dload", OperandLayout::Fixed(1)), // 0x18
    OpcodeInfo::new("aload", OperandLayout::Fixed(1)), // 0x19
    OpcodeInfo::new("iload_0", OperandLayout::None), // 0x1A
    OpcodeInfo::new("iload_1", OperandLayout::None), // 0x1B
    OpcodeInfo::new("iload_2", OperandLayout::None), // 0x1C
    OpcodeInfo::new("iload_3", OperandLayout::None), // 0x1D
    OpcodeInfo::new("lload_0", OperandLayout::None), // 0x1E
    OpcodeInfo::new("lload_1", OperandLayout::None), // 0x1F
    OpcodeInfo::new("lload_2", OperandLayout::None), // 0x20
    OpcodeInfo::new("lload_3", OperandLayout::None), // 0x21
    OpcodeInfo::new("fload_0", OperandLayout::None), // 0x22
    OpcodeInfo::new("fload_1", OperandLayout::None), // 0x23
    OpcodeInfo::new("fload_2", OperandLayout::None), // 0x24
    OpcodeInfo::new("fload_3", OperandLayout::None), // 0x25
    OpcodeInfo::new("dload_0", OperandLayout::None), // 0x26
    OpcodeInfo::new("dload_1", OperandLayout::None), // 0x27
    OpcodeInfo::new("dload_2", OperandLayout::None), // 0x28
    OpcodeInfo::new("dload_3", OperandLayout::None), // 0x29
    OpcodeInfo::new("aload_0", OperandLayout::None), // 0x2A
    OpcodeInfo::new("aload_1", OperandLayout::None), // 0x2B
    OpcodeInfo::new("aload_2", OperandLayout::None), // 0x2C
    OpcodeInfo::new("aload_3", OperandLayout::None), // 0x2D
    OpcodeInfo::new("iaload", OperandLayout::None), // 0x2E
    OpcodeInfo::new("laload", OperandLayout::None), // 0x2F
    OpcodeInfo::new("faload", OperandLayout::None), // 0x30
    OpcodeInfo::new("daload", OperandLayout::None), // 0x31
    OpcodeInfo::new("aaload", OperandLayout::None), // 0x32
    OpcodeInfo::new("baload", OperandLayout::None), // 0x33
    OpcodeInfo::new("caload", OperandLayout::None), // 0x34
    OpcodeInfo::new("saload", OperandLayout::None), // 0x35
    OpcodeInfo::new("istore", OperandLayout::Fixed(1)), // 0x36
    OpcodeInfo::new("lstore", OperandLayout::Fixed(1)), // 0x37
    OpcodeInfo::new("fstore", OperandLayout::Fixed(1)), // 0x38
    OpcodeInfo::new("dstore", OperandLayout::Fixed(1)), // 0x39
    OpcodeInfo::new("astore", OperandLayout::Fixed(1)), // 0x3A
    OpcodeInfo::new("istore_0", OperandLayout::None), // 0x3B
    OpcodeInfo::new("istore_1", OperandLayout::None), // 0x3C
    OpcodeInfo::new("istore_2", OperandLayout::None), // 0x3D
    OpcodeInfo::new("istore_3", OperandLayout::None), // 0x3E
    OpcodeInfo::new("lstore_0", OperandLayout::None), // 0x3F
    OpcodeInfo::new("lstore_1", OperandLayout::None), // 0x40
    OpcodeInfo::new("lstore_2", OperandLayout::None), // 0x41
    OpcodeInfo::new("lstore_3", OperandLayout::None), // 0x42
    OpcodeInfo::new("fstore_0", OperandLayout::None), // 0x43
    OpcodeInfo::new("fstore_1", OperandLayout::None), // 0x44
    OpcodeInfo::new("fstore_2", OperandLayout::None), // 0x45
    OpcodeInfo::new("fstore_3", OperandLayout::None), // 0x46
    OpcodeInfo::new("dstore_0", OperandLayout::None), // 0x47
    OpcodeInfo::new("dstore_1", OperandLayout::None), // 0x48
    OpcodeInfo::new("dstore_2", OperandLayout::None), // 0x49
    OpcodeInfo::new("dstore_3", OperandLayout::None), // 0x4A
    OpcodeInfo::new("astore_0", OperandLayout::None), // 0x4B
    OpcodeInfo::new("astore_1", OperandLayout::None), // 0x4C
    OpcodeInfo::new("astore_2", OperandLayout::None), // 0x4D
    OpcodeInfo::new("astore_3", OperandLayout::None), // 0x4E
    OpcodeInfo::new("iastore", OperandLayout::None), // 0x4F
    OpcodeInfo::new("lastore", OperandLayout::None), // 0x50
    OpcodeInfo::new("fastore", OperandLayout::None), // 0x51
    OpcodeInfo::new("dastore", OperandLayout::None), // 0x52
    OpcodeInfo::new("aastore", OperandLayout::None), // 0x53
    OpcodeInfo::new("bastore", OperandLayout::None), // 0x54
    OpcodeInfo::new("castore", OperandLayout::None), // 0x55
    OpcodeInfo::new("sastore", OperandLayout::None), // 0x56
    OpcodeInfo::new("pop", OperandLayout::None), // 0x57
    OpcodeInfo::new("pop2", OperandLayout::None), // 0x58
    OpcodeInfo::new("dup", OperandLayout::None), // 0x59
    OpcodeInfo::new("dup_x1", OperandLayout::None), // 0x5A
    OpcodeInfo::new("dup_x2", OperandLayout::None), // 0x5B
    OpcodeInfo::new("dup2", OperandLayout::None), // 0x5C
    OpcodeInfo::new("dup2_x1", OperandLayout::None), // 0x5D
    OpcodeInfo::new("dup2_x2", OperandLayout::None), // 0x5E
    OpcodeInfo::new("swap", OperandLayout::None), // 0x5F
    OpcodeInfo::new("iadd", OperandLayout::None), // 0x60
    OpcodeInfo::new("ladd", OperandLayout::None), // 0x61
    OpcodeInfo::new("fadd", OperandLayout::None), // 0x62
    OpcodeInfo::new("dadd", OperandLayout::None), // 0x63
    OpcodeInfo::new("isub", OperandLayout::None), // 0x64
    OpcodeInfo::new("lsub", OperandLayout::None), // 0x65
    OpcodeInfo::new("fsub", OperandLayout::None), // 0x66
    OpcodeInfo::new("dsub", OperandLayout::None), // 0x67
    OpcodeInfo::new("imul", OperandLayout::None), // 0x68
    OpcodeInfo::new("lmul", OperandLayout::None), // 0x69
    OpcodeInfo::new("fmul", OperandLayout::None), // 0x6A
    OpcodeInfo::new("dmul", OperandLayout::None), // 0x6B
    OpcodeInfo::new("idiv", OperandLayout::None), // 0x6C
    OpcodeInfo::new("ldiv", OperandLayout::None), // 0x6D
    OpcodeInfo::new("fdiv", OperandLayout::None), // 0x6E
    OpcodeInfo::new("ddiv", OperandLayout::None), // 0x6F
    OpcodeInfo::new("irem", OperandLayout::None), // 0x70
    OpcodeInfo::new("lrem", OperandLayout::None), // 0x71
    OpcodeInfo::new("frem", OperandLayout::None), // 0x72
    OpcodeInfo::new("drem", OperandLayout::None), // 0x73
    OpcodeInfo::new("ineg", OperandLayout::None), // 0x74
    OpcodeInfo::new("lneg", OperandLayout::None), // 0x75
    OpcodeInfo::new("fneg", OperandLayout::None), // 0x76
    OpcodeInfo::new("dneg", OperandLayout::None), // 0x77
    OpcodeInfo::new("ishl", OperandLayout::None), // 0x78
    OpcodeInfo::new("lshl", OperandLayout::None), // 0x79
    OpcodeInfo::new("ishr", OperandLayout::None), // 0x7A
    OpcodeInfo::new("lshr", OperandLayout::None), // 0x7B
    OpcodeInfo::new("iushr", OperandLayout::None), // 0x7C
    OpcodeInfo::new("lushr", OperandLayout::None), // 0x7D
    OpcodeInfo::new("iand", OperandLayout::None), // 0x7E
    OpcodeInfo::new("land", OperandLayout::None), // 0x7F
    OpcodeInfo::new("ior", OperandLayout::None), // 0x80
    OpcodeInfo::new("lor", OperandLayout::None), // 0x81
    OpcodeInfo::new("ixor", OperandLayout::None), // 0x82
    OpcodeInfo::new("lxor", OperandLayout::None), // 0x83
    OpcodeInfo::new("iinc", OperandLayout::Fixed(2)), // 0x84
    OpcodeInfo::new("i2l", OperandLayout::None), // 0x85
    OpcodeInfo::new("i2f", OperandLayout::None), // 0x86
    OpcodeInfo::new("i2d", OperandLayout::None), // 0x87
    OpcodeInfo::new("l2i", OperandLayout::None), // 0x88
    OpcodeInfo::new("l2f", OperandLayout::None), // 0x89
    OpcodeInfo::new("l2d", OperandLayout::None), // 0x8A
    OpcodeInfo::new("f2i", OperandLayout::None), // 0x8B
    OpcodeInfo::new("f2l", OperandLayout::None), // 0x8C
    OpcodeInfo::new("f2d", OperandLayout::None), // 0x8D
    OpcodeInfo::new("d2i", OperandLayout::None), // 0x8E
    OpcodeInfo::new("d2l", OperandLayout::None), // 0x8F
    OpcodeInfo::new("d2f", OperandLayout::None), // 0x90
    OpcodeInfo::new("i2b", OperandLayout::None), // 0x91
    OpcodeInfo::new("i2c", OperandLayout::None), // 0x92
    OpcodeInfo::new("i2s", OperandLayout::None), // 0x93
    OpcodeInfo::new("lcmp", OperandLayout::None), // 0x94
    OpcodeInfo::new("fcmpl", OperandLayout::None), // 0x95
    OpcodeInfo::new("fcmpg", OperandLayout::None), // 0x96
    OpcodeInfo::new("dcmpl", OperandLayout::None), // 0x97
    OpcodeInfo::new("dcmpg", OperandLayout::None), // 0x98
    OpcodeInfo::new("ifeq", OperandLayout::Fixed(2)), // 0x99
    OpcodeInfo::new("ifne", OperandLayout::Fixed(2)), // 0x9A
    OpcodeInfo::new("iflt", OperandLayout::Fixed(2)), // 0x9B
    OpcodeInfo::new("ifge", OperandLayout::Fixed(2)), // 0x9C
    OpcodeInfo::new("ifgt", OperandLayout::Fixed(2)), // 0x9D
    OpcodeInfo::new("ifle", OperandLayout::Fixed(2)), // 0x9E
    OpcodeInfo::new("if_icmpeq", OperandLayout::Fixed(2)), // 0x9F
    OpcodeInfo::new("if_icmpne", OperandLayout::Fixed(2)), // 0xA0
    OpcodeInfo::new("if_icmplt", OperandLayout::Fixed(2)), // 0xA1
    OpcodeInfo::new("if_icmpge", OperandLayout::Fixed(2)), // 0xA2
    OpcodeInfo::new("if_icmpgt", OperandLayout::Fixed(2)), // 0xA3
    OpcodeInfo::new("if_icmple", OperandLayout::Fixed(2)), // 0xA4
    OpcodeInfo::new("if_acmpeq", OperandLayout::Fixed(2)), // 0xA5
    OpcodeInfo::new("if_acmpne", OperandLayout::Fixed(2)), // 0xA6
    OpcodeInfo::new("goto", OperandLayout::Fixed(2)), // 0xA7
    OpcodeInfo::new("jsr", OperandLayout::Fixed(2)), // 0xA8
    OpcodeInfo::new("ret", OperandLayout::Fixed(1)), // 0xA9
    OpcodeInfo::new("tableswitch", OperandLayout::TableSwitch), // 0xAA
    OpcodeInfo::new("lookupswitch", OperandLayout::LookupSwitch), // 0xAB
    OpcodeInfo::new("ireturn", OperandLayout::None), // 0xAC
    OpcodeInfo::new("lreturn", OperandLayout::None), // 0xAD
    OpcodeInfo::new("freturn", OperandLayout::None), // 0xAE
    OpcodeInfo::new("dreturn", OperandLayout::None), // 0xAF
    OpcodeInfo::new("areturn", OperandLayout::None), // 0xB0
    OpcodeInfo::new("return", OperandLayout::None), // 0xB1
    OpcodeInfo::new("getstatic", OperandLayout::Fixed(2)), // 0xB2
    OpcodeInfo::new("putstatic", OperandLayout::Fixed(2)), // 0xB3
    OpcodeInfo::new("getfield", OperandLayout::Fixed(2)), // 0xB4
    OpcodeInfo::new("putfield", OperandLayout::Fixed(2)), // 0xB5
    OpcodeInfo::new("invokevirtual", OperandLayout::Fixed(2)), // 0xB6
    OpcodeInfo::new("invokespecial", OperandLayout::Fixed(2)), // 0xB7
    OpcodeInfo::new("invokestatic", OperandLayout::Fixed(2)), // 0xB8
    OpcodeInfo::new("invokeinterface", OperandLayout::Fixed(4)), // 0xB9
    OpcodeInfo::new("invokedynamic", OperandLayout::Fixed(4)), // 0xBA
    OpcodeInfo::new("new", OperandLayout::Fixed(2)), // 0xBB
    OpcodeInfo::new("newarray", OperandLayout::Fixed(1)), // 0xBC
    OpcodeInfo::new("anewarray", OperandLayout::Fixed(2)), // 0xBD
    OpcodeInfo::new("arraylength", OperandLayout::None), // 0xBE
    OpcodeInfo::new("athrow", OperandLayout::None), // 0xBF
    OpcodeInfo::new("checkcast", OperandLayout::Fixed(2)), // 0xC0
    OpcodeInfo::new("instanceof", OperandLayout::Fixed(2)), // 0xC1
    OpcodeInfo::new("monitorenter", OperandLayout::None), // 0xC2
    OpcodeInfo::new("monitorexit", OperandLayout::None), // 0xC3
    OpcodeInfo::new("wide", OperandLayout::Wide), // 0xC4
    OpcodeInfo::new("multianewarray", OperandLayout::Fixed(3)), // 0xC5
    OpcodeInfo::new("ifnull", OperandLayout::Fixed(2)), // 0xC6
    OpcodeInfo::new("ifnonnull", OperandLayout::Fixed(2)), // 0xC7
    OpcodeInfo::new("goto_w", OperandLayout::Fixed(4)), // 0xC8
    OpcodeInfo::new("jsr_w", OperandLayout::Fixed(4)), // 0xC9
    OpcodeInfo::new("breakpoint", OperandLayout::None), // 0xCA
    OpcodeInfo::RESERVED, // 0xCB
    OpcodeInfo::RESERVED, // 0xCC
    OpcodeInfo::RESERVED, // 0xCD
    OpcodeInfo::RESERVED, // 0xCE
    OpcodeInfo::RESERVED, // 0xCF
    OpcodeInfo::RESERVED, // 0xD0
    OpcodeInfo::RESERVED, // 0xD1
    OpcodeInfo::RESERVED, // 0xD2
    OpcodeInfo::RESERVED, // 0xD3
    OpcodeInfo::RESERVED, // 0xD4
    OpcodeInfo::RESERVED, // 0xD5
    OpcodeInfo::RESERVED, // 0xD6
    OpcodeInfo::RESERVED, // 0xD7
    OpcodeInfo::RESERVED, // 0xD8
    OpcodeInfo::RESERVED, // 0xD9
    OpcodeInfo::RESERVED, // 0xDA
    OpcodeInfo::RESERVED, // 0xDB
    OpcodeInfo::RESERVED, // 0xDC
    OpcodeInfo::RESERVED, // 0xDD
    OpcodeInfo::RESERVED, // 0xDE
    OpcodeInfo::RESERVED, // 0xDF
    OpcodeInfo::RESERVED, // 0xE0
    OpcodeInfo::RESERVED, // 0xE1
    OpcodeInfo::RESERVED, // 0xE2
    OpcodeInfo::RESERVED, // 0xE3
    OpcodeInfo::RESERVED, // 0xE4
    OpcodeInfo::RESERVED, // 0xE5
    OpcodeInfo::RESERVED, // 0xE6
    OpcodeInfo::RESERVED, // 0xE7
    OpcodeInfo::RESERVED, // 0xE8
    OpcodeInfo::RESERVED, // 0xE9
    OpcodeInfo::RESERVED, // 0xEA
    OpcodeInfo::RESERVED, // 0xEB
    OpcodeInfo::RESERVED, // 0xEC
    OpcodeInfo::RESERVED, // 0xED
    OpcodeInfo::RESERVED, // 0xEE
    OpcodeInfo::RESERVED, // 0xEF
    OpcodeInfo::RESERVED, // 0xF0
    OpcodeInfo::RESERVED, // 0xF1
    OpcodeInfo::RESERVED, // 0xF2
    OpcodeInfo::RESERVED, // 0xF3
    OpcodeInfo::RESERVED, // 0xF4
    OpcodeInfo::RESERVED, // 0xF5
    OpcodeInfo::RESERVED, // 0xF6
    OpcodeInfo::RESERVED, // 0xF7
    OpcodeInfo::RESERVED, // 0xF8
    OpcodeInfo::RESERVED, // 0xF9
    OpcodeInfo::RESERVED, // 0xFA
    OpcodeInfo::RESERVED, // 0xFB
    OpcodeInfo::RESERVED, // 0xFC
    OpcodeInfo::RESERVED, // 0xFD
    OpcodeInfo::new("impdep1", OperandLayout::None), // 0xFE
    OpcodeInfo::new("impdep2", OperandLayout::None), // 0xFF
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_table() {
        assert_eq!(opcode_info(NEW).mnemonic, "new");
        assert_eq!(opcode_info(NEW).layout, OperandLayout::Fixed(2));
        assert_eq!(opcode_info(0x2A).mnemonic, "aload_0");
        assert_eq!(opcode_info(0x60).mnemonic, "iadd");
        assert_eq!(opcode_info(0x83).mnemonic, "lxor");
        assert_eq!(opcode_info(INVOKEINTERFACE).layout, OperandLayout::Fixed(4));
        assert_eq!(opcode_info(WIDE).layout, OperandLayout::Wide);
        assert!(!opcode_info(0xCB).is_defined());
        assert!(opcode_info(0xFF).is_defined());
    }

    #[test]
    fn test_defined_opcode_count() {
        let defined = (0..=u8::MAX).filter(|op| opcode_info(*op).is_defined()).count();
        assert_eq!(defined, 205);
    }
}
