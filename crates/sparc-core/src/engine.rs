//! The execution engine: fetch, decode, execute, writeback.
//!
//! [`Engine::step`] executes exactly one instruction. Control transfers
//! go through three latches (`branch_pending`, `execute_delay_slot`,
//! `branch_target`): a taken branch first lets the instruction in its
//! delay slot run, then redirects `nPC` to the recorded target. A
//! non-taken conditional branch with the annul bit set skips its delay
//! slot instead.

use log::{debug, trace};
use thiserror::Error;

use crate::alu;
use crate::bits::sign_ext32;
use crate::encoding::{op, op2, op3, Instruction, Operand2};
use crate::memory::{Memory, MemoryError, DEFAULT_MEMORY_SIZE};
use crate::state::special::{psr, SpecialRegister};
use crate::state::windows::{WindowedRegisters, DEFAULT_WINDOW_COUNT};

/// Implementation identifier reported in `PSR.IMPL`.
pub const ENGINE_IMPL: u32 = 0x1;
/// Version identifier reported in `PSR.VERS`.
pub const ENGINE_VERS: u32 = 0x1;
/// Reset value of the trap base register.
pub const TRAP_BASE_ADDRESS: u32 = 0x0000_0000;

/// Construction-time parameters of an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Memory size in bytes.
    pub memory_size: u32,
    /// Number of register windows.
    pub window_count: u32,
    /// When set, reading `%y`/`%psr`/`%wim`/`%tbr` from user mode yields
    /// zero instead of the register contents.
    pub read_privilege: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            window_count: DEFAULT_WINDOW_COUNT,
            read_privilege: false,
        }
    }
}

/// Liveness signal returned by [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An instruction was executed and the program counters advanced.
    Executed,
    /// The fetched word was the all-zero filler: nothing was executed and
    /// the counters did not move. Drivers normally stop here.
    Filler,
}

/// Runtime failures of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A fetch, load or store left the memory.
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// A complete SPARC V8 integer unit: memory, windowed registers, special
/// registers and the branch latches.
#[derive(Debug)]
pub struct Engine {
    memory: Memory,
    registers: WindowedRegisters,
    psr: SpecialRegister,
    wim: SpecialRegister,
    tbr: SpecialRegister,
    y: SpecialRegister,
    fsr: SpecialRegister,
    pc: SpecialRegister,
    npc: SpecialRegister,
    branch_pending: bool,
    execute_delay_slot: bool,
    branch_target: u32,
    read_privilege: bool,
}

impl Engine {
    /// Builds an engine from `config` and runs [`Engine::init`] on it.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let mut engine = Self {
            memory: Memory::new(config.memory_size),
            registers: WindowedRegisters::new(config.window_count),
            psr: SpecialRegister::default(),
            wim: SpecialRegister::default(),
            tbr: SpecialRegister::default(),
            y: SpecialRegister::default(),
            fsr: SpecialRegister::default(),
            pc: SpecialRegister::default(),
            npc: SpecialRegister::default(),
            branch_pending: false,
            execute_delay_slot: false,
            branch_target: 0,
            read_privilege: config.read_privilege,
        };
        engine.init();
        engine
    }

    /// Resets the control registers and branch latches to their defined
    /// power-on values. Memory and the register file keep their contents.
    pub fn init(&mut self) {
        self.psr.write(0);
        self.psr.set_field(psr::IMPL, ENGINE_IMPL);
        self.psr.set_field(psr::VERS, ENGINE_VERS);
        self.wim.write(0);
        self.tbr.write(TRAP_BASE_ADDRESS);
        self.pc.write(0xFFFF_FFFF);
        self.npc.write(0);
        self.registers.set_cwp(0);
        self.branch_pending = false;
        self.execute_delay_slot = false;
        self.branch_target = 0;
    }

    /// Copies a big-endian program image into memory at `base`.
    ///
    /// # Errors
    ///
    /// Fails when the image does not fit in memory.
    pub fn load_program(&mut self, base: u32, image: &[u8]) -> Result<(), EngineError> {
        self.memory.load(base, image)?;
        Ok(())
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Fails when the fetch or a load/store leaves memory; the engine
    /// state is left as of the failing access.
    pub fn step(&mut self) -> Result<Step, EngineError> {
        let pc = self.npc.read();
        self.pc.write(pc);

        let inst = self.memory.read_instruction(pc)?;
        if inst.word() == 0 {
            trace!("filler word at 0x{pc:08X}");
            return Ok(Step::Filler);
        }

        // Set by a non-taken conditional branch with the annul bit.
        let mut annul_delay_slot = false;

        match inst.op() {
            op::CALL => self.execute_call(inst, pc),
            op::BRANCH => annul_delay_slot = self.execute_format2(inst, pc),
            op::OTHER => self.execute_other(inst, pc),
            _ => self.execute_memory(inst)?,
        }

        if annul_delay_slot {
            self.npc.write(pc.wrapping_add(8));
        } else if self.branch_pending {
            if self.execute_delay_slot {
                debug!("executing delay slot at 0x{:08X}", pc.wrapping_add(4));
                self.npc.write(pc.wrapping_add(4));
                self.execute_delay_slot = false;
            } else {
                debug!("taking branch to 0x{:08X}", self.branch_target);
                self.npc.write(self.branch_target);
                self.branch_pending = false;
            }
        } else {
            self.npc.write(pc.wrapping_add(4));
        }

        Ok(Step::Executed)
    }

    fn execute_call(&mut self, inst: Instruction, pc: u32) {
        let target = pc.wrapping_add(sign_ext32(inst.disp30(), 30) << 2);
        self.registers.write(15, pc >> 2);
        self.branch_pending = true;
        self.execute_delay_slot = true;
        self.branch_target = target;
        debug!("call: target 0x{target:08X}");
    }

    /// Executes a format-2 instruction. Returns `true` when the following
    /// instruction must be annulled.
    fn execute_format2(&mut self, inst: Instruction, pc: u32) -> bool {
        match inst.op2() {
            op2::SETHI => {
                self.registers.write(inst.rd(), inst.imm22() << 10);
                false
            }
            op2::BICC => {
                let taken = self.condition(inst.cond());
                let target = pc.wrapping_add(sign_ext32(inst.disp22(), 22) << 2);
                debug!(
                    "bicc: cond {:#x} taken={taken} annul={} target 0x{target:08X}",
                    inst.cond(),
                    inst.annul()
                );
                if taken {
                    // A taken branch always runs its delay slot, annul or
                    // not; the annul bit only affects the non-taken case.
                    self.branch_pending = true;
                    self.execute_delay_slot = true;
                    self.branch_target = target;
                    false
                } else {
                    inst.annul()
                }
            }
            // FPU and coprocessor branches are recognized, never taken.
            _ => false,
        }
    }

    fn execute_other(&mut self, inst: Instruction, pc: u32) {
        let rd = inst.rd();
        let rs1_value = self.registers.read(inst.rs1());
        let operand2 = self.operand2_value(inst);

        match inst.op3() {
            op3::RDY => self.read_special(rd, self.y),
            op3::RDPSR => self.read_special(rd, self.psr),
            op3::RDWIM => self.read_special(rd, self.wim),
            op3::RDTBR => self.read_special(rd, self.tbr),
            op3::WRY => {
                if self.is_supervisor() {
                    self.y.write(rs1_value ^ operand2);
                }
            }
            op3::WRPSR => {
                if self.is_supervisor() {
                    self.psr.write(rs1_value ^ operand2);
                    self.registers.set_cwp(self.psr.field(psr::CWP));
                }
            }
            op3::WRWIM => {
                if self.is_supervisor() {
                    self.wim.write(rs1_value ^ operand2);
                }
            }
            op3::WRTBR => {
                if self.is_supervisor() {
                    self.tbr.write(rs1_value ^ operand2);
                }
            }
            op3::JMPL => {
                let target = rs1_value.wrapping_add(operand2) << 2;
                self.registers.write(rd, pc >> 2);
                self.branch_pending = true;
                self.execute_delay_slot = false;
                self.branch_target = target;
                debug!("jmpl: target 0x{target:08X}");
            }
            op3::SAVE => {
                self.registers.save(&mut self.wim);
                self.psr.set_field(psr::CWP, self.registers.cwp());
                self.registers.write(rd, rs1_value.wrapping_add(operand2));
            }
            op3::RESTORE => {
                self.registers.restore(&mut self.wim);
                self.psr.set_field(psr::CWP, self.registers.cwp());
                self.registers.write(rd, rs1_value.wrapping_add(operand2));
            }
            // Trap return, conditional traps, flushes and FPU/coprocessor
            // operates are recognized encodings only.
            op3::RETT | op3::TICC | op3::FLUSH | op3::FPOP1 | op3::FPOP2 | op3::CPOP1
            | op3::CPOP2 => {
                trace!("unimplemented op3 {:#04x} ignored", inst.op3());
            }
            other if alu::is_alu_op(other) => {
                let result = alu::calc(other, rs1_value, operand2, &mut self.psr, &mut self.y);
                self.registers.write(rd, result);
            }
            other => trace!("unknown op3 {other:#04x} ignored"),
        }
    }

    fn execute_memory(&mut self, inst: Instruction) -> Result<(), EngineError> {
        let rd = inst.rd();
        let address = self
            .registers
            .read(inst.rs1())
            .wrapping_add(self.operand2_value(inst));

        match inst.op3() {
            op3::LDSB => {
                let value = sign_ext32(u32::from(self.memory.read_byte(address)?), 8);
                self.registers.write(rd, value);
            }
            op3::LDSH => {
                let value = sign_ext32(u32::from(self.memory.read_halfword(address)?), 16);
                self.registers.write(rd, value);
            }
            op3::LDUB => {
                let value = u32::from(self.memory.read_byte(address)?);
                self.registers.write(rd, value);
            }
            op3::LDUH => {
                let value = u32::from(self.memory.read_halfword(address)?);
                self.registers.write(rd, value);
            }
            op3::LD => {
                let value = self.memory.read_word(address)?;
                self.registers.write(rd, value);
            }
            op3::LDD => {
                if rd % 2 == 0 {
                    let high = self.memory.read_word(address)?;
                    let low = self.memory.read_word(address.wrapping_add(4))?;
                    self.registers.write(rd, high);
                    self.registers.write(rd + 1, low);
                } else {
                    // An odd pair register cannot hold a doubleword.
                    self.registers.write(rd, 0);
                }
            }
            #[allow(clippy::cast_possible_truncation)]
            op3::STB => self
                .memory
                .write_byte(address, self.registers.read(rd) as u8)?,
            #[allow(clippy::cast_possible_truncation)]
            op3::STH => self
                .memory
                .write_halfword(address, self.registers.read(rd) as u16)?,
            op3::ST => self.memory.write_word(address, self.registers.read(rd))?,
            op3::STD => {
                if rd % 2 == 0 {
                    self.memory.write_word(address, self.registers.read(rd))?;
                    self.memory
                        .write_word(address.wrapping_add(4), self.registers.read(rd + 1))?;
                }
            }
            // FPU/coprocessor and alternate-space accesses are recognized
            // encodings only.
            other => trace!("unimplemented memory op3 {other:#04x} ignored"),
        }
        Ok(())
    }

    fn operand2_value(&self, inst: Instruction) -> u32 {
        match inst.operand2() {
            Operand2::Register(rs2) => self.registers.read(rs2),
            Operand2::Immediate(simm13) => sign_ext32(simm13, 13),
        }
    }

    fn read_special(&mut self, rd: u32, source: SpecialRegister) {
        let value = if self.read_privilege && !self.is_supervisor() {
            0
        } else {
            source.read()
        };
        self.registers.write(rd, value);
    }

    /// Evaluates the 4-bit branch condition against `PSR.ICC`.
    #[must_use]
    pub fn condition(&self, cond: u32) -> bool {
        let negate = cond >> 3 == 1;
        let n = self.psr.flag(psr::ICC_N);
        let z = self.psr.flag(psr::ICC_Z);
        let v = self.psr.flag(psr::ICC_V);
        let c = self.psr.flag(psr::ICC_C);
        let base = match cond & 0x7 {
            1 => z,
            2 => z || (n ^ v),
            3 => n ^ v,
            4 => c || z,
            5 => c,
            6 => n,
            7 => v,
            _ => false,
        };
        base ^ negate
    }

    fn is_supervisor(&self) -> bool {
        self.psr.flag(psr::S)
    }

    /// The memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable access to the memory, for loaders and test harnesses.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// The windowed register file.
    #[must_use]
    pub const fn registers(&self) -> &WindowedRegisters {
        &self.registers
    }

    /// Mutable access to the register file.
    pub const fn registers_mut(&mut self) -> &mut WindowedRegisters {
        &mut self.registers
    }

    /// The processor state register.
    #[must_use]
    pub const fn psr(&self) -> SpecialRegister {
        self.psr
    }

    /// Mutable access to the PSR, for test harnesses.
    pub const fn psr_mut(&mut self) -> &mut SpecialRegister {
        &mut self.psr
    }

    /// The window invalid mask.
    #[must_use]
    pub const fn wim(&self) -> SpecialRegister {
        self.wim
    }

    /// The trap base register.
    #[must_use]
    pub const fn tbr(&self) -> SpecialRegister {
        self.tbr
    }

    /// The multiply/divide extension register.
    #[must_use]
    pub const fn y(&self) -> SpecialRegister {
        self.y
    }

    /// The FPU state register (informational only).
    #[must_use]
    pub const fn fsr(&self) -> SpecialRegister {
        self.fsr
    }

    /// The program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc.read()
    }

    /// The next program counter.
    #[must_use]
    pub const fn npc(&self) -> u32 {
        self.npc.read()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, EngineConfig, Step};
    use crate::encoding::{cond, op, op2, op3, Instruction, Operand2};
    use crate::state::special::psr;

    fn engine_with(words: &[u32]) -> Engine {
        let mut engine = Engine::new(&EngineConfig {
            memory_size: 4096,
            ..EngineConfig::default()
        });
        for (index, word) in words.iter().enumerate() {
            engine
                .memory_mut()
                .write_word(4 * index as u32, *word)
                .unwrap();
        }
        engine
    }

    fn add_imm(rd: u32, rs1: u32, imm: u32) -> u32 {
        Instruction::make_format3(op::OTHER, rd, 0x00, rs1, Operand2::Immediate(imm)).word()
    }

    #[test]
    fn init_presets_the_counters() {
        let engine = Engine::default();
        assert_eq!(engine.pc(), 0xFFFF_FFFF);
        assert_eq!(engine.npc(), 0);
        assert_eq!(engine.psr().field(psr::IMPL), 0x1);
        assert_eq!(engine.psr().field(psr::VERS), 0x1);
        assert_eq!(engine.psr().field(psr::CWP), 0);
    }

    #[test]
    fn straight_line_execution_advances_by_words() {
        let mut engine = engine_with(&[add_imm(16, 0, 5), add_imm(17, 16, 2)]);
        assert_eq!(engine.step().unwrap(), Step::Executed);
        assert_eq!(engine.pc(), 0);
        assert_eq!(engine.registers().read(16), 5);
        assert_eq!(engine.step().unwrap(), Step::Executed);
        assert_eq!(engine.pc(), 4);
        assert_eq!(engine.registers().read(17), 7);
    }

    #[test]
    fn filler_word_freezes_the_engine() {
        let mut engine = engine_with(&[add_imm(16, 0, 1)]);
        engine.step().unwrap();
        assert_eq!(engine.step().unwrap(), Step::Filler);
        let pc = engine.pc();
        assert_eq!(engine.step().unwrap(), Step::Filler);
        assert_eq!(engine.pc(), pc);
    }

    #[test]
    fn sethi_places_the_immediate_high() {
        let mut engine = engine_with(&[Instruction::make_sethi(16, 0x0003_F000).word()]);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 0xFC00_0000);
    }

    #[test]
    fn taken_branch_executes_delay_slot_then_jumps() {
        // 0: ba +3 ; 1: delay add ; 2: (skipped) ; 3: target add
        let program = [
            Instruction::make_branch(false, cond::ALWAYS, op2::BICC, 3).word(),
            add_imm(16, 16, 1),
            add_imm(16, 16, 100),
            add_imm(17, 0, 9),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap(); // ba
        engine.step().unwrap(); // delay slot
        assert_eq!(engine.registers().read(16), 1);
        engine.step().unwrap(); // target
        assert_eq!(engine.pc(), 12);
        assert_eq!(engine.registers().read(17), 9);
        assert_eq!(engine.registers().read(16), 1, "skipped instruction ran");
    }

    #[test]
    fn annulled_taken_unconditional_branch_keeps_delay_slot() {
        let program = [
            Instruction::make_branch(true, cond::ALWAYS, op2::BICC, 3).word(),
            add_imm(16, 16, 1),
            0,
            add_imm(17, 0, 9),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 1, "delay slot must execute");
        engine.step().unwrap();
        assert_eq!(engine.pc(), 12);
    }

    #[test]
    fn annulled_untaken_branch_skips_delay_slot() {
        // Z is clear, so `be` does not branch; with annul the delay slot
        // instruction must not run.
        let program = [
            Instruction::make_branch(true, cond::EQ, op2::BICC, 3).word(),
            add_imm(16, 16, 1),
            add_imm(17, 0, 9),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.pc(), 8, "delay slot must be skipped");
        assert_eq!(engine.registers().read(16), 0);
        assert_eq!(engine.registers().read(17), 9);
    }

    #[test]
    fn untaken_branch_without_annul_falls_through() {
        let program = [
            Instruction::make_branch(false, cond::EQ, op2::BICC, 3).word(),
            add_imm(16, 16, 1),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.pc(), 4);
        assert_eq!(engine.registers().read(16), 1);
    }

    #[test]
    fn call_links_the_return_word_index() {
        let program = [
            0x0100_0000, // placeholder nop (sethi 0, %g0) keeps slot 0 busy
            Instruction::make_call(3).word(),
            0x0100_0000,
            0,
            add_imm(16, 0, 1),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap(); // nop
        engine.step().unwrap(); // call at pc=4
        assert_eq!(engine.registers().read(15), 1, "%o7 holds PC >> 2");
        engine.step().unwrap(); // delay slot
        engine.step().unwrap(); // target
        assert_eq!(engine.pc(), 16);
    }

    #[test]
    fn jmpl_transfers_without_delay_slot() {
        let program = [
            Instruction::make_format3(op::OTHER, 16, op3::JMPL, 0, Operand2::Immediate(3)).word(),
            add_imm(17, 17, 1),
            0,
            add_imm(18, 0, 7),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 0, "link is PC >> 2");
        engine.step().unwrap();
        assert_eq!(engine.pc(), 12, "jmpl must not execute a delay slot");
        assert_eq!(engine.registers().read(17), 0);
        assert_eq!(engine.registers().read(18), 7);
    }

    #[test]
    fn save_computes_with_the_old_window() {
        let program = [
            add_imm(16, 0, 40), // %l0 = 40 in window 0
            Instruction::make_format3(op::OTHER, 16, op3::SAVE, 16, Operand2::Immediate(2)).word(),
        ];
        let mut engine = engine_with(&program);
        engine.step().unwrap();
        engine.step().unwrap();
        // The sum of the old window's %l0 + 2 lands in the new window's %l0.
        assert_eq!(engine.registers().read(16), 42);
        assert_eq!(engine.psr().field(psr::CWP), 3);
        // The old value is hidden until restore.
        let restore =
            Instruction::make_format3(op::OTHER, 0, op3::RESTORE, 0, Operand2::Immediate(0));
        engine.memory_mut().write_word(8, restore.word()).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 40);
        assert_eq!(engine.psr().field(psr::CWP), 0);
    }

    #[test]
    fn loads_sign_and_zero_extend() {
        let mut engine = engine_with(&[
            Instruction::make_format3(op::MEMORY, 16, op3::LDSB, 0, Operand2::Immediate(256))
                .word(),
            Instruction::make_format3(op::MEMORY, 17, op3::LDUB, 0, Operand2::Immediate(256))
                .word(),
            Instruction::make_format3(op::MEMORY, 18, op3::LDSH, 0, Operand2::Immediate(256))
                .word(),
            Instruction::make_format3(op::MEMORY, 19, op3::LDUH, 0, Operand2::Immediate(256))
                .word(),
        ]);
        engine.memory_mut().write_halfword(256, 0x8001).unwrap();
        for _ in 0..4 {
            engine.step().unwrap();
        }
        assert_eq!(engine.registers().read(16), 0xFFFF_FF80);
        assert_eq!(engine.registers().read(17), 0x0000_0080);
        assert_eq!(engine.registers().read(18), 0xFFFF_8001);
        assert_eq!(engine.registers().read(19), 0x0000_8001);
    }

    #[test]
    fn doubleword_load_needs_an_even_register() {
        let mut engine = engine_with(&[
            Instruction::make_format3(op::MEMORY, 16, op3::LDD, 0, Operand2::Immediate(256))
                .word(),
            Instruction::make_format3(op::MEMORY, 19, op3::LDD, 0, Operand2::Immediate(256))
                .word(),
        ]);
        engine
            .memory_mut()
            .write_doubleword(256, 0x1111_2222_3333_4444)
            .unwrap();
        engine.registers_mut().write(19, 0x55);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 0x1111_2222);
        assert_eq!(engine.registers().read(17), 0x3333_4444);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(19), 0, "odd rd is rejected");
    }

    #[test]
    fn stores_write_the_low_bytes() {
        let mut engine = engine_with(&[
            Instruction::make_format3(op::MEMORY, 16, op3::STB, 0, Operand2::Immediate(256))
                .word(),
            Instruction::make_format3(op::MEMORY, 16, op3::STH, 0, Operand2::Immediate(260))
                .word(),
            Instruction::make_format3(op::MEMORY, 16, op3::ST, 0, Operand2::Immediate(264))
                .word(),
        ]);
        engine.registers_mut().write(16, 0x1234_5678);
        for _ in 0..3 {
            engine.step().unwrap();
        }
        assert_eq!(engine.memory().read_byte(256).unwrap(), 0x78);
        assert_eq!(engine.memory().read_halfword(260).unwrap(), 0x5678);
        assert_eq!(engine.memory().read_word(264).unwrap(), 0x1234_5678);
    }

    #[test]
    fn fetch_outside_memory_is_an_error() {
        let mut engine = engine_with(&[Instruction::make_format3(
            op::OTHER,
            0,
            op3::JMPL,
            0,
            Operand2::Immediate(0x7FF),
        )
        .word()]);
        engine.step().unwrap();
        assert!(engine.step().is_err());
    }

    #[test]
    fn rd_y_copies_without_privilege_by_default() {
        // umul %l0, %l0, %l1 leaves the high product half in Y, then
        // rd %y, %l2 copies it out from user mode.
        let program = [
            Instruction::make_format3(op::OTHER, 17, 0x0A, 16, Operand2::Register(16)).word(),
            Instruction::make_format3(op::OTHER, 18, op3::RDY, 0, Operand2::Immediate(0)).word(),
        ];
        let mut engine = engine_with(&program);
        engine.registers_mut().write(16, 0x0001_0000);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(17), 0);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(18), 1);
    }

    #[test]
    fn wr_y_requires_supervisor() {
        let program = [Instruction::make_format3(
            op::OTHER,
            0,
            op3::WRY,
            16,
            Operand2::Immediate(0),
        )
        .word()];
        let mut engine = engine_with(&program);
        engine.registers_mut().write(16, 0x1234);
        engine.step().unwrap();
        assert_eq!(engine.y().read(), 0, "user mode write must be ignored");

        let mut engine = engine_with(&program);
        engine.registers_mut().write(16, 0x1234);
        engine.psr_mut().set_flag(psr::S, true);
        engine.step().unwrap();
        assert_eq!(engine.y().read(), 0x1234);
    }

    #[test]
    fn rd_y_gated_when_read_privilege_is_configured() {
        let mut engine = Engine::new(&EngineConfig {
            memory_size: 4096,
            read_privilege: true,
            ..EngineConfig::default()
        });
        let word =
            Instruction::make_format3(op::OTHER, 16, op3::RDY, 0, Operand2::Immediate(0)).word();
        engine.memory_mut().write_word(0, word).unwrap();
        engine.registers_mut().write(16, 0xFFFF);
        engine.step().unwrap();
        assert_eq!(engine.registers().read(16), 0);
    }

    #[test]
    fn condition_predicates_follow_the_icc() {
        let mut engine = Engine::default();
        engine.psr_mut().set_flag(psr::ICC_Z, true);
        assert!(engine.condition(cond::EQ));
        assert!(!engine.condition(cond::NE));
        assert!(engine.condition(cond::ALWAYS));
        assert!(!engine.condition(cond::NEVER));
        assert!(engine.condition(cond::LE));
        assert!(engine.condition(cond::LEU));

        engine.psr_mut().set_field(psr::ICC, 0);
        engine.psr_mut().set_flag(psr::ICC_N, true);
        assert!(engine.condition(cond::LT));
        assert!(!engine.condition(cond::GE));
        assert!(engine.condition(cond::NEG));
        engine.psr_mut().set_flag(psr::ICC_V, true);
        assert!(!engine.condition(cond::LT), "N and V cancel");
    }
}
