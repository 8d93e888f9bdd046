//! End-to-end scenarios: assemble a source program, load it at address
//! zero and step the engine.

use sparc_asm::{encode_words, Assembler};
use sparc_core::{psr, Engine, EngineConfig, Step};

fn load(source: &str) -> Engine {
    let mut assembler = Assembler::new();
    let words = assembler.assemble(source);
    assert!(
        !assembler.has_errors(),
        "assembly failed: {:?}",
        assembler.errors()
    );
    let mut engine = Engine::new(&EngineConfig {
        memory_size: 4096,
        ..EngineConfig::default()
    });
    engine.load_program(0, &encode_words(&words)).unwrap();
    engine
}

fn step_times(engine: &mut Engine, steps: usize) {
    for _ in 0..steps {
        assert_eq!(engine.step().unwrap(), Step::Executed);
    }
}

#[test]
fn sum_of_two_constants() {
    let mut engine = load(
        "set 0x5, %l0\n\
         set 0x7, %l1\n\
         add %l0, %l1, %l2\n",
    );
    step_times(&mut engine, 5);
    assert_eq!(engine.registers().read(18), 0x0000_000C);
    // The program runs off into filler afterwards.
    assert_eq!(engine.step().unwrap(), Step::Filler);
}

#[test]
fn subroutine_via_call_and_retl() {
    let mut engine = load(
        "call incr\n\
         nop\n\
         stop: ba stop\n\
         nop\n\
         incr: add %o0, 1, %o0\n\
         retl\n\
         nop\n",
    );
    engine.registers_mut().write(8, 0x10); // %o0
    step_times(&mut engine, 8);
    assert_eq!(engine.registers().read(8), 0x11, "increment ran exactly once");
    // Control sits in the stop loop: the delay-slot nop at word 3, about
    // to re-take the branch at word 2.
    assert_eq!(engine.pc(), 12);
    assert_eq!(engine.npc(), 8);
}

#[test]
fn signed_multiply_of_negatives() {
    let mut engine = load(
        "set -4, %l0\n\
         set -3, %l1\n\
         smulcc %l0, %l1, %l2\n",
    );
    step_times(&mut engine, 5);
    assert_eq!(engine.registers().read(16), 0xFFFF_FFFC);
    assert_eq!(engine.registers().read(17), 0xFFFF_FFFD);
    assert_eq!(engine.registers().read(18), 12);
    assert_eq!(engine.y().read(), 0);
    assert!(!engine.psr().flag(psr::ICC_N));
    assert!(!engine.psr().flag(psr::ICC_Z));
}

#[test]
fn window_excursion_hides_and_restores_values() {
    let mut engine = load(
        "set 0xAA, %o0\n\
         save\n\
         set 0xBB, %l0\n\
         restore\n",
    );
    step_times(&mut engine, 3); // set + save
    assert_eq!(
        engine.registers().read(24),
        0xAA,
        "caller outputs alias callee inputs"
    );
    step_times(&mut engine, 3); // set %l0 + restore
    assert_eq!(engine.registers().read(8), 0xAA);
    for n in 1..32 {
        assert_ne!(engine.registers().read(n), 0xBB, "register {n} leaked");
    }
}

#[test]
fn compare_and_branch_loop_counts_down() {
    // Count %l0 down from 5; %l1 tallies the iterations.
    let mut engine = load(
        "set 5, %l0\n\
         loop: dec %l0\n\
         inc %l1\n\
         cmp %l0, %g0\n\
         bne loop\n\
         nop\n\
         clrr %l2\n",
    );
    // 2 (set) + 5 iterations x 5 (dec/inc/cmp/bne/nop) + 1 (clrr)
    step_times(&mut engine, 28);
    assert_eq!(engine.registers().read(16), 0);
    assert_eq!(engine.registers().read(17), 5);
    assert_eq!(engine.step().unwrap(), Step::Filler);
}

#[test]
fn memory_round_trip_through_loads_and_stores() {
    let mut engine = load(
        "set 0x100, %l0\n\
         set 0x12345678, %l1\n\
         st %l1, [%l0+0]\n\
         ldub [%l0+3], %l2\n\
         ldsh [%l0+0], %l3\n\
         ld [%l0+0], %l4\n",
    );
    step_times(&mut engine, 8);
    assert_eq!(engine.memory().read_word(0x100).unwrap(), 0x1234_5678);
    assert_eq!(engine.registers().read(18), 0x78);
    assert_eq!(engine.registers().read(19), 0x1234);
    assert_eq!(engine.registers().read(20), 0x1234_5678);
}

#[test]
fn doubleword_store_and_load_pair() {
    let mut engine = load(
        "set 0x200, %l0\n\
         set 0x11112222, %o0\n\
         set 0x33334444, %o1\n\
         std %o0, [%l0+0]\n\
         ldd [%l0+0], %l2\n",
    );
    step_times(&mut engine, 8);
    assert_eq!(
        engine.memory().read_doubleword(0x200).unwrap(),
        0x1111_2222_3333_4444
    );
    assert_eq!(engine.registers().read(18), 0x1111_2222);
    assert_eq!(engine.registers().read(19), 0x3333_4444);
}

#[test]
fn annulled_branch_program_skips_its_delay_slot() {
    // %l0 stays clear because the bne,a delay slot is annulled when the
    // comparison succeeds (branch not taken).
    let mut engine = load(
        "cmp %g0, %g0\n\
         bnea nowhere\n\
         inc %l0\n\
         inc %l1\n\
         nowhere: nop\n",
    );
    step_times(&mut engine, 3);
    assert_eq!(engine.registers().read(16), 0, "annulled slot executed");
    assert_eq!(engine.registers().read(17), 1);
}

#[test]
fn division_leaves_quotient_and_remainder() {
    let mut engine = load(
        "set 100, %l0\n\
         set 7, %l1\n\
         udiv %l0, %l1, %l2\n\
         rd %y, %l3\n",
    );
    step_times(&mut engine, 6);
    assert_eq!(engine.registers().read(18), 14);
    assert_eq!(engine.registers().read(19), 2);
}
