//! The two-pass assembler.
//!
//! Pass 1 walks the source collecting `label:` definitions against a
//! running instruction index (every mnemonic occupies one word except
//! `set`, which expands to two). Pass 2 re-walks the source and
//! translates each line into instruction words, resolving label
//! references against the table built in pass 1.
//!
//! Diagnostics never abort a pass: every line is attempted so one run
//! reports everything, and the output is only meant to be used when
//! [`Assembler::has_errors`] is false.

use std::collections::HashMap;

use log::debug;
use sparc_core::encoding::{op, op3, Instruction, Operand2};

use crate::errors::{AsmError, AsmErrorKind, AsmWarning, AsmWarningKind};
use crate::opcodes::{lookup, nominal_size, OpcodeKind, OpcodeSpec};
use crate::parser::{is_register, parse_address, parse_number, parse_register, split_line};

/// ALU opcodes the synthetic expansions lean on.
mod alu {
    pub const ADD: u32 = 0x00;
    pub const OR: u32 = 0x02;
    pub const SUB: u32 = 0x04;
    pub const XNOR: u32 = 0x07;
    pub const ADDCC: u32 = 0x10;
    pub const ORCC: u32 = 0x12;
    pub const SUBCC: u32 = 0x14;
}

const O7: u32 = 15;
const I7: u32 = 31;

/// The assembler state: label table and accumulated diagnostics.
#[derive(Debug, Default)]
pub struct Assembler {
    labels: HashMap<String, u32>,
    errors: Vec<AsmError>,
    warnings: Vec<AsmWarning>,
    line: usize,
    instruction_index: u32,
}

impl Assembler {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a complete source text into instruction words.
    ///
    /// Diagnostics are accumulated on the assembler; callers must check
    /// [`Assembler::has_errors`] before using the output.
    pub fn assemble(&mut self, source: &str) -> Vec<Instruction> {
        let lines: Vec<&str> = source.lines().collect();
        self.collect_labels(&lines);
        self.emit(&lines)
    }

    /// True when any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The recorded errors, in source order.
    #[must_use]
    pub fn errors(&self) -> &[AsmError] {
        &self.errors
    }

    /// The recorded warnings, in source order.
    #[must_use]
    pub fn warnings(&self) -> &[AsmWarning] {
        &self.warnings
    }

    /// The label table built by pass 1 (label to instruction index).
    #[must_use]
    pub const fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// Pass 1: record label definitions and count instruction words.
    fn collect_labels(&mut self, lines: &[&str]) {
        self.line = 1;
        self.instruction_index = 0;
        for raw in lines {
            let parsed = split_line(raw);
            if let Some(label) = parsed.label {
                self.define_label(label);
            }
            if let Some(opcode) = parsed.opcode {
                self.instruction_index += nominal_size(&opcode);
            }
            self.line += 1;
        }
    }

    fn define_label(&mut self, label: String) {
        if let Some(&first_index) = self.labels.get(&label) {
            self.error(AsmErrorKind::LabelAlreadyDefined { label, first_index });
            return;
        }
        debug!("label '{label}' at instruction {}", self.instruction_index);
        self.labels.insert(label, self.instruction_index);
    }

    /// Pass 2: translate every line.
    fn emit(&mut self, lines: &[&str]) -> Vec<Instruction> {
        self.line = 1;
        self.instruction_index = 0;
        let mut output = Vec::new();
        for raw in lines {
            let parsed = split_line(raw);
            if let Some(opcode) = parsed.opcode {
                let words = self.read_instruction(&opcode, &parsed.args);
                output.extend(words);
                // Advance by the nominal size even when a diagnostic
                // suppressed emission, so later labels stay aligned.
                self.instruction_index += nominal_size(&opcode);
            }
            self.line += 1;
        }
        output
    }

    /// Translates one mnemonic with its arguments.
    fn read_instruction(&mut self, opcode: &str, args: &[String]) -> Vec<Instruction> {
        let Some(spec) = lookup(opcode) else {
            self.error(AsmErrorKind::UnexpectedOpcode(opcode.to_string()));
            return Vec::new();
        };

        if !spec.implemented {
            self.error(AsmErrorKind::UnimplementedOpcode(opcode.to_string()));
            return Vec::new();
        }

        if args.len() < spec.min_params {
            self.error(AsmErrorKind::InvalidParamNumber(spec));
            return Vec::new();
        }
        if args.len() > spec.params.len() {
            self.warnings.push(AsmWarning {
                kind: AsmWarningKind::TooManyParameters(spec),
                line: self.line,
            });
        }

        match spec.kind {
            OpcodeKind::Nop => vec![Instruction::make_sethi(0, 0)],
            OpcodeKind::Call => match self.label_displacement(&args[0]) {
                Some(displacement) => vec![Instruction::make_call(displacement)],
                None => Vec::new(),
            },
            OpcodeKind::Sethi => {
                let immediate = self.number(&args[0]);
                let rd = self.register(&args[1]);
                vec![Instruction::make_sethi(rd, immediate)]
            }
            OpcodeKind::Branch { op2, annul } => {
                let displacement = self.label_displacement(&args[0]).unwrap_or(0);
                vec![Instruction::make_branch(annul, spec.code, op2, displacement)]
            }
            OpcodeKind::Load => {
                let (rs1, operand) = self.address(&args[0]);
                let rd = self.register(&args[1]);
                vec![Instruction::make_format3(op::MEMORY, rd, spec.code, rs1, operand)]
            }
            OpcodeKind::Store => {
                let rd = self.register(&args[0]);
                let (rs1, operand) = self.address(&args[1]);
                vec![Instruction::make_format3(op::MEMORY, rd, spec.code, rs1, operand)]
            }
            OpcodeKind::ReadSpecial => {
                let op3 = self.special_register(&args[0], true);
                let rd = self.register(&args[1]);
                vec![Instruction::make_format3(
                    op::OTHER,
                    rd,
                    op3,
                    0,
                    Operand2::Immediate(0),
                )]
            }
            OpcodeKind::WriteSpecial => {
                let op3 = self.special_register(&args[2], false);
                let rs1 = self.register(&args[0]);
                let operand = self.register_or_number(&args[1]);
                vec![Instruction::make_format3(op::OTHER, 0, op3, rs1, operand)]
            }
            OpcodeKind::Jmpl => {
                let (rs1, operand) = self.address(&format!("[{}]", args[0]));
                let rd = self.register(&args[1]);
                vec![Instruction::make_format3(op::OTHER, rd, op3::JMPL, rs1, operand)]
            }
            OpcodeKind::Save | OpcodeKind::Restore => {
                let (rd, rs1, operand) = if args.is_empty() {
                    (0, 0, Operand2::Immediate(0))
                } else if args.len() >= 3 {
                    (
                        self.register(&args[2]),
                        self.register(&args[0]),
                        self.register_or_number(&args[1]),
                    )
                } else {
                    self.error(AsmErrorKind::InvalidParamNumber(spec));
                    return Vec::new();
                };
                vec![Instruction::make_format3(op::OTHER, rd, spec.code, rs1, operand)]
            }
            OpcodeKind::Alu => {
                let rs1 = self.register(&args[0]);
                let operand = self.register_or_number(&args[1]);
                let rd = self.register(&args[2]);
                vec![Instruction::make_format3(op::OTHER, rd, spec.code, rs1, operand)]
            }
            OpcodeKind::Synthetic => self.expand_synthetic(spec, args),
        }
    }

    /// Expands one synthetic mnemonic into real instructions.
    fn expand_synthetic(&mut self, spec: &'static OpcodeSpec, args: &[String]) -> Vec<Instruction> {
        match spec.name {
            "cmp" => {
                let rs1 = self.register(&args[0]);
                let operand = self.register_or_number(&args[1]);
                vec![Instruction::make_format3(op::OTHER, 0, alu::SUBCC, rs1, operand)]
            }
            "jmp" => {
                let (rs1, operand) = self.address(&format!("[{}]", args[0]));
                vec![Instruction::make_format3(op::OTHER, 0, op3::JMPL, rs1, operand)]
            }
            "tst" => {
                let rs1 = self.register(&args[0]);
                vec![Instruction::make_format3(
                    op::OTHER,
                    0,
                    alu::ORCC,
                    rs1,
                    Operand2::Immediate(0),
                )]
            }
            // Return addresses are word indices, so the conventional
            // "+8 bytes past the delay slot" is +2 here.
            "ret" => vec![Instruction::make_format3(
                op::OTHER,
                0,
                op3::JMPL,
                I7,
                Operand2::Immediate(2),
            )],
            "retl" => vec![Instruction::make_format3(
                op::OTHER,
                0,
                op3::JMPL,
                O7,
                Operand2::Immediate(2),
            )],
            "set" => {
                let value = self.number(&args[0]);
                let rd = self.register(&args[1]);
                vec![
                    Instruction::make_sethi(rd, value >> 10),
                    Instruction::make_format3(
                        op::OTHER,
                        rd,
                        alu::OR,
                        rd,
                        Operand2::Immediate(value & 0x3FF),
                    ),
                ]
            }
            "not" => {
                let rs1 = self.register(&args[0]);
                let rd = args.get(1).map_or(rs1, |arg| self.register(arg));
                vec![Instruction::make_format3(
                    op::OTHER,
                    rd,
                    alu::XNOR,
                    rs1,
                    Operand2::Immediate(0),
                )]
            }
            "neg" => {
                let rs = self.register(&args[0]);
                let rd = args.get(1).map_or(rs, |arg| self.register(arg));
                vec![Instruction::make_format3(
                    op::OTHER,
                    rd,
                    alu::SUB,
                    0,
                    Operand2::Register(rs),
                )]
            }
            "inc" | "inccc" | "dec" | "deccc" => {
                let rd = self.register(&args[0]);
                let amount = args.get(1).map_or(1, |arg| self.number(arg));
                let code = match spec.name {
                    "inc" => alu::ADD,
                    "inccc" => alu::ADDCC,
                    "dec" => alu::SUB,
                    _ => alu::SUBCC,
                };
                vec![Instruction::make_format3(
                    op::OTHER,
                    rd,
                    code,
                    rd,
                    Operand2::Immediate(amount),
                )]
            }
            "clrr" => {
                let rd = self.register(&args[0]);
                vec![Instruction::make_format3(
                    op::OTHER,
                    rd,
                    alu::OR,
                    0,
                    Operand2::Immediate(0),
                )]
            }
            "clrb" | "clrh" | "clr" => {
                let (rs1, operand) = self.address(&args[0]);
                let code = match spec.name {
                    "clrb" => op3::STB,
                    "clrh" => op3::STH,
                    _ => op3::ST,
                };
                vec![Instruction::make_format3(op::MEMORY, 0, code, rs1, operand)]
            }
            "mov" => {
                let operand = self.register_or_number(&args[0]);
                let rd = self.register(&args[1]);
                vec![Instruction::make_format3(op::OTHER, rd, alu::OR, 0, operand)]
            }
            _ => unreachable!("synthetic '{}' has no expansion", spec.name),
        }
    }

    /// Looks up a label and returns its displacement from the current
    /// instruction; records [`AsmErrorKind::LabelNotFound`] otherwise.
    fn label_displacement(&mut self, label: &str) -> Option<u32> {
        match self.labels.get(label) {
            Some(&target) => Some(target.wrapping_sub(self.instruction_index)),
            None => {
                self.error(AsmErrorKind::LabelNotFound(label.to_string()));
                None
            }
        }
    }

    /// Parses a register token, recording any diagnostic and substituting
    /// `%g0` so the pass can continue.
    fn register(&mut self, token: &str) -> u32 {
        match parse_register(token) {
            Ok(number) => number,
            Err(kind) => {
                self.error(kind);
                0
            }
        }
    }

    fn number(&mut self, token: &str) -> u32 {
        match parse_number(token) {
            Ok(value) => value,
            Err(kind) => {
                self.error(kind);
                0
            }
        }
    }

    fn address(&mut self, token: &str) -> (u32, Operand2) {
        match parse_address(token) {
            Ok(parts) => parts,
            Err(kind) => {
                self.error(kind);
                (0, Operand2::Immediate(0))
            }
        }
    }

    fn register_or_number(&mut self, token: &str) -> Operand2 {
        if is_register(token) {
            Operand2::Register(self.register(token))
        } else {
            Operand2::Immediate(self.number(token))
        }
    }

    /// Maps `%y`/`%psr`/`%wim`/`%tbr` to the read or write `op3`.
    fn special_register(&mut self, token: &str, read: bool) -> u32 {
        let name = token.strip_prefix('%').unwrap_or(token);
        let codes = if read {
            [op3::RDY, op3::RDPSR, op3::RDWIM, op3::RDTBR]
        } else {
            [op3::WRY, op3::WRPSR, op3::WRWIM, op3::WRTBR]
        };
        match name {
            "y" => codes[0],
            "psr" => codes[1],
            "wim" => codes[2],
            "tbr" => codes[3],
            _ => {
                self.error(AsmErrorKind::InvalidSpecialRegisterName(name.to_string()));
                0
            }
        }
    }

    fn error(&mut self, kind: AsmErrorKind) {
        self.errors.push(AsmError {
            kind,
            line: self.line,
        });
    }
}

/// Serializes instruction words to the flat big-endian binary format.
#[must_use]
pub fn encode_words(instructions: &[Instruction]) -> Vec<u8> {
    instructions
        .iter()
        .flat_map(|instruction| instruction.word().to_be_bytes())
        .collect()
}
