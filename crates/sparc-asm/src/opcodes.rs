//! The static opcode table.
//!
//! Every mnemonic the assembler understands has one entry recording its
//! numeric code (branch condition, ALU opcode or memory `op3`), the
//! translation family it belongs to, its argument shape, and whether the
//! engine actually implements it. Synthetic mnemonics expand to one or
//! two real instructions during emission.

use sparc_core::encoding::{cond, op2, op3};

/// Translation family of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    /// `nop`: SETHI 0 to `%g0`.
    Nop,
    /// Format-1 call to a label.
    Call,
    /// Format-2 SETHI.
    Sethi,
    /// Format-2 branch; `code` is the condition, `op2` picks the family,
    /// `annul` is encoded in the mnemonic suffix.
    Branch {
        /// BICC / FBFCC / CBCCC selector.
        op2: u32,
        /// Annul bit.
        annul: bool,
    },
    /// Memory load; `code` is the `op3`.
    Load,
    /// Memory store; `code` is the `op3`.
    Store,
    /// `rd %special, reg`.
    ReadSpecial,
    /// `wr reg, operand, %special`.
    WriteSpecial,
    /// `jmpl address, reg`.
    Jmpl,
    /// `save [rs1, operand2, rd]`.
    Save,
    /// `restore [rs1, operand2, rd]`.
    Restore,
    /// Format-3 ALU operation; `code` is the `op3`.
    Alu,
    /// Expanded during emission by name.
    Synthetic,
}

/// One table entry.
#[derive(Debug, PartialEq, Eq)]
pub struct OpcodeSpec {
    /// Mnemonic, lower case.
    pub name: &'static str,
    /// Condition code, ALU opcode or memory `op3`, depending on `kind`.
    pub code: u32,
    /// Translation family.
    pub kind: OpcodeKind,
    /// Argument descriptions, used in diagnostics.
    pub params: &'static [&'static str],
    /// Minimum accepted argument count.
    pub min_params: usize,
    /// False for recognized-but-unimplemented forms (FPU/coprocessor).
    pub implemented: bool,
}

impl OpcodeSpec {
    /// Renders `name arg1, arg2, …` for diagnostics.
    #[must_use]
    pub fn usage(&self) -> String {
        if self.params.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.params.join(", "))
        }
    }
}

const ALU_PARAMS: &[&str] = &[
    "source register 1",
    "source register 2 or constant",
    "destination register",
];
const LOAD_PARAMS: &[&str] = &["[address]", "destination register"];
const STORE_PARAMS: &[&str] = &["source register", "[address]"];
const LABEL_PARAM: &[&str] = &["label"];

const fn entry(
    name: &'static str,
    code: u32,
    kind: OpcodeKind,
    params: &'static [&'static str],
    min_params: usize,
) -> OpcodeSpec {
    OpcodeSpec {
        name,
        code,
        kind,
        params,
        min_params,
        implemented: true,
    }
}

const fn branch(name: &'static str, code: u32, op2: u32, annul: bool) -> OpcodeSpec {
    entry(name, code, OpcodeKind::Branch { op2, annul }, LABEL_PARAM, 1)
}

const fn load(name: &'static str, code: u32) -> OpcodeSpec {
    entry(name, code, OpcodeKind::Load, LOAD_PARAMS, 2)
}

const fn unimplemented_load(name: &'static str, code: u32) -> OpcodeSpec {
    OpcodeSpec {
        name,
        code,
        kind: OpcodeKind::Load,
        params: LOAD_PARAMS,
        min_params: 2,
        implemented: false,
    }
}

const fn store(name: &'static str, code: u32) -> OpcodeSpec {
    entry(name, code, OpcodeKind::Store, STORE_PARAMS, 2)
}

const fn unimplemented_store(name: &'static str, code: u32) -> OpcodeSpec {
    OpcodeSpec {
        name,
        code,
        kind: OpcodeKind::Store,
        params: STORE_PARAMS,
        min_params: 2,
        implemented: false,
    }
}

const fn alu(name: &'static str, code: u32) -> OpcodeSpec {
    entry(name, code, OpcodeKind::Alu, ALU_PARAMS, 3)
}

const fn synthetic(
    name: &'static str,
    params: &'static [&'static str],
    min_params: usize,
) -> OpcodeSpec {
    entry(name, 0, OpcodeKind::Synthetic, params, min_params)
}

/// Every mnemonic known to the assembler.
pub static OPCODES: &[OpcodeSpec] = &[
    entry("nop", 0, OpcodeKind::Nop, &[], 0),
    entry("call", 0, OpcodeKind::Call, LABEL_PARAM, 1),
    entry(
        "sethi",
        0,
        OpcodeKind::Sethi,
        &["22-bit constant", "destination register"],
        2,
    ),
    // Integer branches.
    branch("ba", cond::ALWAYS, op2::BICC, false),
    branch("bn", cond::NEVER, op2::BICC, false),
    branch("bne", cond::NE, op2::BICC, false),
    branch("be", cond::EQ, op2::BICC, false),
    branch("bg", cond::GT, op2::BICC, false),
    branch("ble", cond::LE, op2::BICC, false),
    branch("bge", cond::GE, op2::BICC, false),
    branch("blt", cond::LT, op2::BICC, false),
    branch("bgu", cond::GU, op2::BICC, false),
    branch("bleu", cond::LEU, op2::BICC, false),
    branch("bcc", cond::CC, op2::BICC, false),
    branch("bcs", cond::CS, op2::BICC, false),
    branch("bpos", cond::POS, op2::BICC, false),
    branch("bneg", cond::NEG, op2::BICC, false),
    branch("bvc", cond::VC, op2::BICC, false),
    branch("bvs", cond::VS, op2::BICC, false),
    branch("baa", cond::ALWAYS, op2::BICC, true),
    branch("bna", cond::NEVER, op2::BICC, true),
    branch("bnea", cond::NE, op2::BICC, true),
    branch("bea", cond::EQ, op2::BICC, true),
    branch("bga", cond::GT, op2::BICC, true),
    branch("blea", cond::LE, op2::BICC, true),
    branch("bgea", cond::GE, op2::BICC, true),
    branch("blta", cond::LT, op2::BICC, true),
    branch("bgua", cond::GU, op2::BICC, true),
    branch("bleua", cond::LEU, op2::BICC, true),
    branch("bcca", cond::CC, op2::BICC, true),
    branch("bcsa", cond::CS, op2::BICC, true),
    branch("bposa", cond::POS, op2::BICC, true),
    branch("bnega", cond::NEG, op2::BICC, true),
    branch("bvca", cond::VC, op2::BICC, true),
    branch("bvsa", cond::VS, op2::BICC, true),
    // FPU branches (the engine recognizes them and falls through).
    branch("fba", 0x8, op2::FBFCC, false),
    branch("fbn", 0x0, op2::FBFCC, false),
    branch("fbu", 0x7, op2::FBFCC, false),
    branch("fbg", 0x6, op2::FBFCC, false),
    branch("fbug", 0x5, op2::FBFCC, false),
    branch("fbl", 0x4, op2::FBFCC, false),
    branch("fbul", 0x3, op2::FBFCC, false),
    branch("fblg", 0x2, op2::FBFCC, false),
    branch("fbne", 0x1, op2::FBFCC, false),
    branch("fbe", 0x9, op2::FBFCC, false),
    branch("fbue", 0xA, op2::FBFCC, false),
    branch("fbge", 0xB, op2::FBFCC, false),
    branch("fbuge", 0xC, op2::FBFCC, false),
    branch("fble", 0xD, op2::FBFCC, false),
    branch("fbule", 0xE, op2::FBFCC, false),
    branch("fbo", 0xF, op2::FBFCC, false),
    branch("fbaa", 0x8, op2::FBFCC, true),
    branch("fbna", 0x0, op2::FBFCC, true),
    branch("fbua", 0x7, op2::FBFCC, true),
    branch("fbga", 0x6, op2::FBFCC, true),
    branch("fbuga", 0x5, op2::FBFCC, true),
    branch("fbla", 0x4, op2::FBFCC, true),
    branch("fbula", 0x3, op2::FBFCC, true),
    branch("fblga", 0x2, op2::FBFCC, true),
    branch("fbnea", 0x1, op2::FBFCC, true),
    branch("fbea", 0x9, op2::FBFCC, true),
    branch("fbuea", 0xA, op2::FBFCC, true),
    branch("fbgea", 0xB, op2::FBFCC, true),
    branch("fbugea", 0xC, op2::FBFCC, true),
    branch("fblea", 0xD, op2::FBFCC, true),
    branch("fbulea", 0xE, op2::FBFCC, true),
    branch("fboa", 0xF, op2::FBFCC, true),
    // Coprocessor branches.
    branch("cba", 0x8, op2::CBCCC, false),
    branch("cbn", 0x0, op2::CBCCC, false),
    branch("cb3", 0x7, op2::CBCCC, false),
    branch("cb2", 0x6, op2::CBCCC, false),
    branch("cb23", 0x5, op2::CBCCC, false),
    branch("cb1", 0x4, op2::CBCCC, false),
    branch("cb13", 0x3, op2::CBCCC, false),
    branch("cb12", 0x2, op2::CBCCC, false),
    branch("cb123", 0x1, op2::CBCCC, false),
    branch("cb0", 0x9, op2::CBCCC, false),
    branch("cb03", 0xA, op2::CBCCC, false),
    branch("cb02", 0xB, op2::CBCCC, false),
    branch("cb023", 0xC, op2::CBCCC, false),
    branch("cb01", 0xD, op2::CBCCC, false),
    branch("cb013", 0xE, op2::CBCCC, false),
    branch("cb012", 0xF, op2::CBCCC, false),
    branch("cbaa", 0x8, op2::CBCCC, true),
    branch("cbna", 0x0, op2::CBCCC, true),
    branch("cb3a", 0x7, op2::CBCCC, true),
    branch("cb2a", 0x6, op2::CBCCC, true),
    branch("cb23a", 0x5, op2::CBCCC, true),
    branch("cb1a", 0x4, op2::CBCCC, true),
    branch("cb13a", 0x3, op2::CBCCC, true),
    branch("cb12a", 0x2, op2::CBCCC, true),
    branch("cb123a", 0x1, op2::CBCCC, true),
    branch("cb0a", 0x9, op2::CBCCC, true),
    branch("cb03a", 0xA, op2::CBCCC, true),
    branch("cb02a", 0xB, op2::CBCCC, true),
    branch("cb023a", 0xC, op2::CBCCC, true),
    branch("cb01a", 0xD, op2::CBCCC, true),
    branch("cb013a", 0xE, op2::CBCCC, true),
    branch("cb012a", 0xF, op2::CBCCC, true),
    // Loads.
    load("ldsb", op3::LDSB),
    load("ldsh", op3::LDSH),
    load("ldub", op3::LDUB),
    load("lduh", op3::LDUH),
    load("ld", op3::LD),
    load("ldd", op3::LDD),
    unimplemented_load("ldf", op3::LDF),
    unimplemented_load("lddf", op3::LDDF),
    unimplemented_load("ldfsr", op3::LDFSR),
    unimplemented_load("ldc", op3::LDC),
    unimplemented_load("lddc", op3::LDDC),
    unimplemented_load("ldcsr", op3::LDCSR),
    // Stores.
    store("stb", op3::STB),
    store("sth", op3::STH),
    store("st", op3::ST),
    store("std", op3::STD),
    unimplemented_store("stf", op3::STF),
    unimplemented_store("stdf", op3::STDF),
    unimplemented_store("stfsr", op3::STFSR),
    unimplemented_store("stc", op3::STC),
    unimplemented_store("stdc", op3::STDC),
    unimplemented_store("stcsr", op3::STCSR),
    // Special register transfers.
    entry(
        "rd",
        0,
        OpcodeKind::ReadSpecial,
        &["source special register", "destination register"],
        2,
    ),
    entry(
        "wr",
        0,
        OpcodeKind::WriteSpecial,
        &[
            "source register 1",
            "source register 2 or constant",
            "destination special register",
        ],
        3,
    ),
    entry(
        "jmpl",
        op3::JMPL,
        OpcodeKind::Jmpl,
        &["address", "destination register"],
        2,
    ),
    entry("save", op3::SAVE, OpcodeKind::Save, ALU_PARAMS, 0),
    entry("restore", op3::RESTORE, OpcodeKind::Restore, ALU_PARAMS, 0),
    // ALU operations.
    alu("add", 0x00),
    alu("and", 0x01),
    alu("or", 0x02),
    alu("xor", 0x03),
    alu("sub", 0x04),
    alu("andn", 0x05),
    alu("orn", 0x06),
    alu("xnor", 0x07),
    alu("addx", 0x08),
    alu("umul", 0x0A),
    alu("smul", 0x0B),
    alu("subx", 0x0C),
    alu("udiv", 0x0E),
    alu("sdiv", 0x0F),
    alu("addcc", 0x10),
    alu("andcc", 0x11),
    alu("orcc", 0x12),
    alu("xorcc", 0x13),
    alu("subcc", 0x14),
    alu("andncc", 0x15),
    alu("orncc", 0x16),
    alu("xnorcc", 0x17),
    alu("addxcc", 0x18),
    alu("umulcc", 0x1A),
    alu("smulcc", 0x1B),
    alu("subxcc", 0x1C),
    alu("udivcc", 0x1E),
    alu("sdivcc", 0x1F),
    alu("sll", 0x25),
    alu("srl", 0x26),
    alu("sra", 0x27),
    // Synthetic mnemonics.
    synthetic(
        "cmp",
        &["source register 1", "source register 2 or constant"],
        2,
    ),
    synthetic("jmp", &["address"], 1),
    synthetic("tst", &["source/destination register"], 1),
    synthetic("ret", &[], 0),
    synthetic("retl", &[], 0),
    synthetic("set", &["32-bit constant", "destination register"], 2),
    synthetic("not", &["source register", "destination register"], 1),
    synthetic("neg", &["source register", "destination register"], 1),
    synthetic("inc", &["source/destination register", "constant"], 1),
    synthetic("inccc", &["source/destination register", "constant"], 1),
    synthetic("dec", &["source/destination register", "constant"], 1),
    synthetic("deccc", &["source/destination register", "constant"], 1),
    synthetic("clrr", &["destination register"], 1),
    synthetic("clrb", &["[address]"], 1),
    synthetic("clrh", &["[address]"], 1),
    synthetic("clr", &["[address]"], 1),
    synthetic(
        "mov",
        &["source register or constant", "destination register"],
        2,
    ),
];

/// Finds the table entry for `name`, if any. Mnemonics are
/// case-sensitive and lower case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static OpcodeSpec> {
    OPCODES.iter().find(|spec| spec.name == name)
}

/// Number of instruction words a mnemonic contributes: 2 for `set`,
/// otherwise 1.
#[must_use]
pub fn nominal_size(name: &str) -> u32 {
    if name == "set" {
        2
    } else {
        1
    }
}
