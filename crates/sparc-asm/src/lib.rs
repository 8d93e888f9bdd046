//! Two-pass assembler for the SPARC V8 emulator core.
//!
//! Pass 1 collects label definitions; pass 2 translates mnemonics into
//! instruction words, accumulating errors and warnings instead of
//! stopping at the first problem.

/// Diagnostic taxonomy.
pub mod errors;
pub use errors::{AsmError, AsmErrorKind, AsmWarning, AsmWarningKind};

/// The static mnemonic table.
pub mod opcodes;
pub use opcodes::{lookup, nominal_size, OpcodeKind, OpcodeSpec, OPCODES};

/// Token-level parsing helpers.
pub mod parser;
pub use parser::{parse_address, parse_number, parse_register, split_line, SourceLine};

/// The two-pass assembler driver.
pub mod assembler;
pub use assembler::{encode_words, Assembler};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tempfile as _;
