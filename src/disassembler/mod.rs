//! Length-correct walking of JVM bytecode.
//!
//! The walker knows the operand width of every opcode, including the padded `tableswitch` and
//! `lookupswitch` forms and the `wide` prefix, and yields each instruction's offset, opcode and
//! raw operand bytes. Operands are not interpreted; callers pick out what they need, such as
//! the constant pool index of a `new`.
//!
//! # Example
//! ```rust
//! use jvmscope::disassembler::{decode_stream, NEW};
//!
//! // new #2, dup, return
//! let code = [0xBB, 0x00, 0x02, 0x59, 0xB1];
//! let created: Vec<u16> = decode_stream(&code)?
//!     .iter()
//!     .filter(|instruction| instruction.opcode == NEW)
//!     .filter_map(|instruction| instruction.u16_operand())
//!     .collect();
//! assert_eq!(created, vec![2]);
//! # Ok::<(), jvmscope::Error>(())
//! ```

mod decoder;
mod opcodes;

pub use decoder::{decode_instruction, decode_stream, instructions, Instruction, Instructions};
pub use opcodes::*;
