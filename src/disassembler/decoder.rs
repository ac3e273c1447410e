use crate::{
    disassembler::opcodes::{opcode_info, OperandLayout, IINC, LOOKUPSWITCH, TABLESWITCH},
    file::parser::Parser,
    Result,
};

/// One instruction located in a method body.
///
/// `operands` borrows every byte after the opcode, including the alignment padding of the
/// switch instructions and, for `wide`, the modified opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Offset of the opcode from the start of the code array
    pub offset: usize,
    /// The opcode byte
    pub opcode: u8,
    /// Assembler mnemonic
    pub mnemonic: &'static str,
    /// Raw operand bytes
    pub operands: &'a [u8],
}

impl Instruction<'_> {
    /// Encoded size of the instruction in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.operands.len()
    }

    /// Instructions always occupy at least the opcode byte.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Offset of the instruction that follows this one.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.offset + self.len()
    }

    /// The first two operand bytes as a big-endian index, as used by `new`, `checkcast`,
    /// field and invoke instructions.
    #[must_use]
    pub fn u16_operand(&self) -> Option<u16> {
        match self.operands {
            [high, low, ..] => Some(u16::from_be_bytes([*high, *low])),
            _ => None,
        }
    }
}

/// Decode the instruction at the parser's current position.
///
/// The parser must be positioned over a method's code array with offset 0 at the array
/// start; switch padding is computed from that origin.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for unassigned opcodes, invalid `wide` targets and
/// negative switch sizes, and [`crate::Error::OutOfBounds`] for truncated operands.
pub fn decode_instruction<'a>(parser: &mut Parser<'a>) -> Result<Instruction<'a>> {
    let offset = parser.pos();
    let opcode = parser.read_be::<u8>()?;
    let info = opcode_info(opcode);
    if !info.is_defined() {
        return Err(malformed_error!(
            "Unassigned opcode 0x{:02X} at offset {}",
            opcode,
            offset
        ));
    }

    let operand_start = parser.pos();
    match info.layout {
        OperandLayout::None => {}
        OperandLayout::Fixed(size) => parser.advance_by(usize::from(size))?,
        OperandLayout::TableSwitch | OperandLayout::LookupSwitch => {
            skip_switch(parser, opcode, offset)?;
        }
        OperandLayout::Wide => {
            let modified = parser.read_be::<u8>()?;
            let width = wide_operand_width(modified).ok_or_else(|| {
                malformed_error!(
                    "Opcode 0x{:02X} cannot follow wide at offset {}",
                    modified,
                    offset
                )
            })?;
            parser.advance_by(width)?;
        }
    }

    let operands = &parser.data()[operand_start..parser.pos()];
    Ok(Instruction {
        offset,
        opcode,
        mnemonic: info.mnemonic,
        operands,
    })
}

fn wide_operand_width(modified: u8) -> Option<usize> {
    match modified {
        IINC => Some(4),
        0x15..=0x19 | 0x36..=0x3A | 0xA9 => Some(2),
        _ => None,
    }
}

fn skip_switch(parser: &mut Parser<'_>, opcode: u8, offset: usize) -> Result<()> {
    let padding = (4 - (offset + 1) % 4) % 4;
    parser.advance_by(padding)?;
    let _default = parser.read_be::<i32>()?;

    let entries = if opcode == TABLESWITCH {
        let low = parser.read_be::<i32>()?;
        let high = parser.read_be::<i32>()?;
        if high < low {
            return Err(malformed_error!(
                "tableswitch at offset {} has high {} below low {}",
                offset,
                high,
                low
            ));
        }
        (i64::from(high) - i64::from(low) + 1) * 4
    } else {
        debug_assert_eq!(opcode, LOOKUPSWITCH);
        let pairs = parser.read_be::<i32>()?;
        if pairs < 0 {
            return Err(malformed_error!(
                "lookupswitch at offset {} has negative pair count {}",
                offset,
                pairs
            ));
        }
        i64::from(pairs) * 8
    };

    let entries = usize::try_from(entries)
        .map_err(|_| malformed_error!("Switch at offset {} is too large", offset))?;
    parser.advance_by(entries)
}

/// Iterator over the instructions of a code array.
///
/// Stops after the first error.
pub struct Instructions<'a> {
    parser: Parser<'a>,
    failed: bool,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.parser.has_more_data() {
            return None;
        }

        let result = decode_instruction(&mut self.parser);
        self.failed = result.is_err();
        Some(result)
    }
}

/// Walk the instructions of `code` lazily.
#[must_use]
pub fn instructions(code: &[u8]) -> Instructions<'_> {
    Instructions {
        parser: Parser::new(code),
        failed: false,
    }
}

/// Decode every instruction of `code`.
///
/// # Errors
/// Returns the first decoding error, see [`decode_instruction`].
pub fn decode_stream(code: &[u8]) -> Result<Vec<Instruction<'_>>> {
    instructions(code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        disassembler::opcodes::{NEW, WIDE},
        Error,
    };

    #[test]
    fn test_fixed_width_instructions() {
        // aload_0, invokespecial #1, new #7, dup, bipush 5, return
        let code = [0x2A, 0xB7, 0x00, 0x01, 0xBB, 0x00, 0x07, 0x59, 0x10, 0x05, 0xB1];
        let decoded = decode_stream(&code).unwrap();

        let offsets: Vec<usize> = decoded.iter().map(|i| i.offset).collect();
        assert_eq!(offsets, vec![0, 1, 4, 7, 8, 10]);
        assert_eq!(decoded[1].mnemonic, "invokespecial");
        assert_eq!(decoded[2].opcode, NEW);
        assert_eq!(decoded[2].u16_operand(), Some(7));
        assert_eq!(decoded[4].operands, &[0x05u8]);
        assert_eq!(decoded[5].u16_operand(), None);
        assert_eq!(decoded[5].next_offset(), code.len());
    }

    #[test]
    fn test_tableswitch_padding() {
        // nop, tableswitch at offset 1 -> 2 padding bytes, default 0, low 0, high 1, two offsets
        let mut code = vec![0x00, 0xAA, 0x00, 0x00];
        code.extend_from_slice(&0i32.to_be_bytes());
        code.extend_from_slice(&0i32.to_be_bytes());
        code.extend_from_slice(&1i32.to_be_bytes());
        code.extend_from_slice(&20i32.to_be_bytes());
        code.extend_from_slice(&24i32.to_be_bytes());
        code.push(0xB1);

        let decoded = decode_stream(&code).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[1].operands.len(), 2 + 12 + 8);
        assert_eq!(decoded[2].offset, code.len() - 1);
        assert_eq!(decoded[2].mnemonic, "return");
    }

    #[test]
    fn test_lookupswitch_aligned() {
        // iconst_0, nop, nop, lookupswitch at offset 3 -> no padding, one pair
        let mut code = vec![0x03, 0x00, 0x00, 0xAB];
        code.extend_from_slice(&16i32.to_be_bytes());
        code.extend_from_slice(&1i32.to_be_bytes());
        code.extend_from_slice(&42i32.to_be_bytes());
        code.extend_from_slice(&16i32.to_be_bytes());
        code.push(0xB1);

        let decoded = decode_stream(&code).unwrap();
        assert_eq!(decoded[3].opcode, LOOKUPSWITCH);
        assert_eq!(decoded[3].operands.len(), 16);
        assert_eq!(decoded[4].offset, 20);
    }

    #[test]
    fn test_wide_forms() {
        // wide iload 0x0100, wide iinc 0x0100 by 0x0200, return
        let code = [
            WIDE, 0x15, 0x01, 0x00, WIDE, 0x84, 0x01, 0x00, 0x02, 0x00, 0xB1,
        ];
        let decoded = decode_stream(&code).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].len(), 4);
        assert_eq!(decoded[1].len(), 6);
        assert_eq!(decoded[1].operands[0], IINC);
    }

    #[test]
    fn test_invalid_code() {
        assert!(matches!(decode_stream(&[0xCB]), Err(Error::Malformed { .. })));
        assert!(matches!(decode_stream(&[WIDE, 0x60]), Err(Error::Malformed { .. })));
        assert!(matches!(decode_stream(&[0xBB, 0x00]), Err(Error::OutOfBounds { .. })));

        let mut inverted = vec![0xAA, 0x00, 0x00, 0x00];
        inverted.extend_from_slice(&0i32.to_be_bytes());
        inverted.extend_from_slice(&5i32.to_be_bytes());
        inverted.extend_from_slice(&1i32.to_be_bytes());
        assert!(matches!(decode_stream(&inverted), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let results: Vec<_> = instructions(&[0x00, 0xCB, 0x00]).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
