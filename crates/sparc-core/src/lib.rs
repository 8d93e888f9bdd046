//! SPARC V8 instruction-set emulator core.
//!
//! The crate decomposes into the bit utilities, the instruction codec,
//! the architectural state (special registers and the windowed register
//! file), a flat big-endian memory, the ALU, the execution engine with
//! its delayed-control-transfer state machine, and a disassembler.

/// Bit-field and two's-complement helpers.
pub mod bits;
pub use bits::{compl32, compl64, is_neg, sign_ext32, sign_ext64, sub};

/// Instruction word codec: formats, fields and named opcode constants.
pub mod encoding;
pub use encoding::{cond, op, op2, op3, Instruction, Operand2};

/// Architectural register state.
pub mod state;
pub use state::{fsr, psr, tbr, Field, SpecialRegister, WindowedRegisters};

/// Flat byte-addressable memory with big-endian accessors.
pub mod memory;
pub use memory::{Memory, MemoryError, DEFAULT_MEMORY_SIZE};

/// The arithmetic-logic unit.
pub mod alu;
pub use alu::{alu_op, calc, is_alu_op};

/// The execution engine.
pub mod engine;
pub use engine::{Engine, EngineConfig, EngineError, Step};

/// The disassembler.
pub mod disasm;
pub use disasm::{disassemble, register_name};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
