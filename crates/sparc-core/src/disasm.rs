//! Textual disassembly of instruction words.
//!
//! [`disassemble`] is a pure function of the word and the address it was
//! fetched from; the address only matters for branch and call targets,
//! which are rendered as synthetic `inst<hex>` labels (word indices).
//! Register-addressed operands are printed in the same argument order the
//! assembler accepts, so label-free disassembly re-assembles to the same
//! word.

use crate::bits::{compl32, is_neg, sign_ext32};
use crate::encoding::{op, op2, op3, Instruction, Operand2};

const BRANCH_NAMES: [&str; 16] = [
    "n", "e", "le", "lt", "leu", "cs", "neg", "vs", "a", "ne", "g", "ge", "gu", "cc", "pos", "vc",
];

const FBRANCH_NAMES: [&str; 16] = [
    "n", "ne", "lg", "ul", "l", "ug", "g", "u", "a", "e", "ue", "ge", "uge", "le", "ule", "o",
];

const CBRANCH_NAMES: [&str; 16] = [
    "n", "123", "12", "13", "1", "23", "2", "3", "a", "0", "03", "02", "023", "01", "013", "012",
];

/// Name of an ALU operation by its `op3` code, `None` for holes.
const fn alu_name(op3: u32) -> Option<&'static str> {
    Some(match op3 {
        0x00 => "add",
        0x01 => "and",
        0x02 => "or",
        0x03 => "xor",
        0x04 => "sub",
        0x05 => "andn",
        0x06 => "orn",
        0x07 => "xnor",
        0x08 => "addx",
        0x0A => "umul",
        0x0B => "smul",
        0x0C => "subx",
        0x0E => "udiv",
        0x0F => "sdiv",
        0x10 => "addcc",
        0x11 => "andcc",
        0x12 => "orcc",
        0x13 => "xorcc",
        0x14 => "subcc",
        0x15 => "andncc",
        0x16 => "orncc",
        0x17 => "xnorcc",
        0x18 => "addxcc",
        0x1A => "umulcc",
        0x1B => "smulcc",
        0x1C => "subxcc",
        0x1E => "udivcc",
        0x1F => "sdivcc",
        0x25 => "sll",
        0x26 => "srl",
        0x27 => "sra",
        _ => return None,
    })
}

const fn memory_name(op3: u32) -> Option<&'static str> {
    Some(match op3 {
        op3::LD => "ld",
        op3::LDUB => "ldub",
        op3::LDUH => "lduh",
        op3::LDD => "ldd",
        op3::LDSB => "ldsb",
        op3::LDSH => "ldsh",
        op3::LDF => "ldf",
        op3::LDFSR => "ldfsr",
        op3::LDDF => "lddf",
        op3::LDC => "ldc",
        op3::LDCSR => "ldcsr",
        op3::LDDC => "lddc",
        op3::ST => "st",
        op3::STB => "stb",
        op3::STH => "sth",
        op3::STD => "std",
        op3::STF => "stf",
        op3::STFSR => "stfsr",
        op3::STDF => "stdf",
        op3::STC => "stc",
        op3::STCSR => "stcsr",
        op3::STDC => "stdc",
        _ => return None,
    })
}

const fn is_store(op3: u32) -> bool {
    matches!(
        op3,
        op3::ST
            | op3::STB
            | op3::STH
            | op3::STD
            | op3::STF
            | op3::STFSR
            | op3::STDF
            | op3::STC
            | op3::STCSR
            | op3::STDC
    )
}

/// Renders a logical register number as `%g`/`%o`/`%l`/`%i` plus index.
#[must_use]
pub fn register_name(number: u32) -> String {
    let prefix = match number {
        0..8 => "%g",
        8..16 => "%o",
        16..24 => "%l",
        _ => "%i",
    };
    format!("{prefix}{}", number % 8)
}

/// Formats a 13-bit immediate the way the assembler reads it back.
fn immediate(simm13: u32) -> String {
    let value = sign_ext32(simm13, 13);
    if is_neg(value) {
        format!("-0x{:04x}", compl32(value))
    } else {
        format!("0x{value:04x}")
    }
}

/// The second operand of a format-3 instruction, as register or literal.
fn operand2(inst: Instruction) -> String {
    match inst.operand2() {
        Operand2::Register(rs2) => register_name(rs2),
        Operand2::Immediate(simm13) => immediate(simm13),
    }
}

/// `[%rs1+%rs2]` / `[%rs1+0xNNNN]` / `[%rs1-0xNNNN]` without brackets.
fn address(inst: Instruction) -> String {
    match inst.operand2() {
        Operand2::Register(rs2) => {
            format!("{}+{}", register_name(inst.rs1()), register_name(rs2))
        }
        Operand2::Immediate(simm13) => {
            let value = sign_ext32(simm13, 13);
            if is_neg(value) {
                format!("{}-0x{:04x}", register_name(inst.rs1()), compl32(value))
            } else {
                format!("{}+0x{value:04x}", register_name(inst.rs1()))
            }
        }
    }
}

/// Branch/call target as a symbolic word-index label.
fn target_label(address: u32, displacement: u32, width: u32) -> String {
    let target = address.wrapping_add(sign_ext32(displacement, width).wrapping_mul(4)) / 4;
    format!("inst{target:x}")
}

fn branch_text(family: &str, names: &[&str; 16], inst: Instruction, address: u32) -> String {
    let annul = if inst.annul() { "a" } else { "" };
    let label = target_label(address, inst.disp22(), 22);
    format!(
        "{family}{}{annul} {label}",
        names[inst.cond() as usize]
    )
}

/// Disassembles one instruction word fetched from `address`.
///
/// The all-zero word renders as the filler `.`; encodings the engine does
/// not know render as a `.word` literal.
#[must_use]
pub fn disassemble(inst: Instruction, address: u32) -> String {
    if inst.word() == 0 {
        return ".".to_string();
    }

    match inst.op() {
        op::CALL => format!("call {}", target_label(address, inst.disp30(), 30)),
        op::BRANCH => disassemble_format2(inst, address),
        op::OTHER => disassemble_other(inst),
        _ => disassemble_memory(inst),
    }
}

fn disassemble_format2(inst: Instruction, address: u32) -> String {
    match inst.op2() {
        op2::SETHI => {
            if inst.imm22() == 0 && inst.rd() == 0 {
                "nop".to_string()
            } else {
                format!(
                    "sethi 0x{:08x}, {}",
                    inst.imm22(),
                    register_name(inst.rd())
                )
            }
        }
        op2::BICC => branch_text("b", &BRANCH_NAMES, inst, address),
        op2::FBFCC => branch_text("fb", &FBRANCH_NAMES, inst, address),
        op2::CBCCC => branch_text("cb", &CBRANCH_NAMES, inst, address),
        _ => format!(".word 0x{:08x}", inst.word()),
    }
}

fn disassemble_other(inst: Instruction) -> String {
    let rd = register_name(inst.rd());
    let rs1 = register_name(inst.rs1());

    if let Some(name) = alu_name(inst.op3()) {
        return format!("{name} {rs1}, {}, {rd}", operand2(inst));
    }

    match inst.op3() {
        op3::RDY => format!("rd %y, {rd}"),
        op3::RDPSR => format!("rd %psr, {rd}"),
        op3::RDWIM => format!("rd %wim, {rd}"),
        op3::RDTBR => format!("rd %tbr, {rd}"),
        op3::WRY => format!("wr {rs1}, {}, %y", operand2(inst)),
        op3::WRPSR => format!("wr {rs1}, {}, %psr", operand2(inst)),
        op3::WRWIM => format!("wr {rs1}, {}, %wim", operand2(inst)),
        op3::WRTBR => format!("wr {rs1}, {}, %tbr", operand2(inst)),
        op3::JMPL => format!("jmpl {}, {rd}", address(inst)),
        op3::SAVE => format!("save {rs1}, {}, {rd}", operand2(inst)),
        op3::RESTORE => format!("restore {rs1}, {}, {rd}", operand2(inst)),
        op3::RETT => format!("rett {rs1}, {}", operand2(inst)),
        op3::FLUSH => format!("flush {rs1}, {}", operand2(inst)),
        op3::TICC => "ticc #".to_string(),
        op3::FPOP1 | op3::FPOP2 | op3::CPOP1 | op3::CPOP2 => {
            let family = match inst.op3() {
                op3::FPOP1 => "fpop1",
                op3::FPOP2 => "fpop2",
                op3::CPOP1 => "cpop1",
                _ => "cpop2",
            };
            format!(
                "{family} {:x}, {rs1}, {}, {rd}",
                inst.opf(),
                register_name(inst.rs2())
            )
        }
        _ => format!(".word 0x{:08x}", inst.word()),
    }
}

fn disassemble_memory(inst: Instruction) -> String {
    let Some(name) = memory_name(inst.op3()) else {
        return format!(".word 0x{:08x}", inst.word());
    };
    let rd = register_name(inst.rd());
    if is_store(inst.op3()) {
        format!("{name} {rd}, [{}]", address(inst))
    } else {
        format!("{name} [{}], {rd}", address(inst))
    }
}
