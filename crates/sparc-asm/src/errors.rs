//! Diagnostic taxonomy for the assembler.
//!
//! Errors and warnings are accumulated as plain data while both passes
//! keep running, so one invocation reports every problem in the source.
//! Each diagnostic carries the 1-based source line it was found on.

use std::fmt;

use crate::opcodes::OpcodeSpec;

/// An assembly error bound to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    /// What went wrong.
    pub kind: AsmErrorKind,
    /// 1-based source line.
    pub line: usize,
}

/// Classification of assembly errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmErrorKind {
    /// Unknown mnemonic.
    UnexpectedOpcode(String),
    /// Known mnemonic marked not-implemented (FPU/coprocessor forms).
    UnimplementedOpcode(String),
    /// Token where a number was expected.
    WrongNumberFormat(String),
    /// `[…]` operand not matching `reg+reg` or `reg+constant`.
    WrongAddressFormat(String),
    /// Register index out of range for its prefix letter.
    InvalidRegisterNumber {
        /// Register prefix (`g`, `o`, `l`, `i` or `r`).
        prefix: char,
        /// The out-of-range index.
        number: u32,
    },
    /// Register prefix letter not one of `g o l i r`.
    InvalidRegisterName(String),
    /// Special register name not one of `%y %psr %wim %tbr`.
    InvalidSpecialRegisterName(String),
    /// Label defined twice; carries the first definition's instruction
    /// index.
    LabelAlreadyDefined {
        /// The label.
        label: String,
        /// Instruction index of the first definition.
        first_index: u32,
    },
    /// Referenced label has no definition.
    LabelNotFound(String),
    /// Too few arguments; carries the opcode description so the message
    /// can list the accepted shape.
    InvalidParamNumber(&'static OpcodeSpec),
}

impl fmt::Display for AsmErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedOpcode(name) => write!(f, "unknown opcode '{name}'"),
            Self::UnimplementedOpcode(name) => {
                write!(f, "opcode '{name}' is not implemented")
            }
            Self::WrongNumberFormat(token) => write!(f, "'{token}' is not a valid number"),
            Self::WrongAddressFormat(token) => write!(
                f,
                "'{token}' is not a valid address; expected [reg+reg] or [reg+constant]"
            ),
            Self::InvalidRegisterNumber { prefix, number } => {
                write!(f, "register number {number} is out of range for '%{prefix}'")
            }
            Self::InvalidRegisterName(name) => write!(f, "invalid register name '{name}'"),
            Self::InvalidSpecialRegisterName(name) => {
                write!(f, "invalid special register name '%{name}'")
            }
            Self::LabelAlreadyDefined { label, first_index } => write!(
                f,
                "label '{label}' already defined at instruction {first_index}"
            ),
            Self::LabelNotFound(label) => write!(f, "label '{label}' not found"),
            Self::InvalidParamNumber(spec) => {
                write!(f, "wrong number of parameters; usage: {}", spec.usage())
            }
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for AsmError {}

/// A non-fatal diagnostic bound to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmWarning {
    /// What looked suspicious.
    pub kind: AsmWarningKind,
    /// 1-based source line.
    pub line: usize,
}

/// Classification of warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmWarningKind {
    /// More arguments than the opcode accepts; the extras are ignored.
    TooManyParameters(&'static OpcodeSpec),
}

impl fmt::Display for AsmWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyParameters(spec) => {
                write!(f, "too many parameters; usage: {}", spec.usage())
            }
        }
    }
}

impl fmt::Display for AsmWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
