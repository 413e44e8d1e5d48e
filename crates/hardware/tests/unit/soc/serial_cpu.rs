//! Serial-Loaded CPU Device Tests.
//!
//! Programs are shifted in over the serial line at a short baud interval; the
//! core executes each word as soon as it lands in program memory.

use pretty_assertions::assert_eq;

use uartbench_core::core::cpu::HaltReason;
use uartbench_core::sim::{InstructionLoader, Program, Testbench};
use uartbench_core::soc::devices::SerialCpu;
use uartbench_core::soc::traits::Device;

use crate::common::harness::{FAST_BAUD, cpu_bench, timing};

/// Loads `program` with FIFO pointer checks and runs 200 idle cycles.
fn load_and_run(program: &Program) -> (Testbench<SerialCpu>, InstructionLoader) {
    let timing = timing(FAST_BAUD);
    let mut bench = cpu_bench(FAST_BAUD);
    let mut loader = InstructionLoader::new(&timing);
    let budget = timing.budget_for_frames(program.to_matrix().len());
    loader.load(&mut bench, program, Some(8), budget).unwrap();
    loader.run_program(&mut bench, 200).unwrap();
    (bench, loader)
}

fn reply_budget() -> u64 {
    4 * timing(FAST_BAUD).frame_ticks()
}

// ══════════════════════════════════════════════════════════
// 1. Loading
// ══════════════════════════════════════════════════════════

#[test]
fn reset_state() {
    let bench = cpu_bench(FAST_BAUD);
    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(bench.device().name(), "cpu");
    assert_eq!(cpu.program_counter(), 0);
    assert!(!cpu.is_running());
    assert_eq!(cpu.loaded_words(), 0);
    assert_eq!(cpu.memory_word(0), Some(0));
    assert_eq!(cpu.register(16), None);
}

#[test]
fn words_are_assembled_little_endian() {
    let program = Program::new([0x1122_3344, 0xE3A0_0000]);
    // The first word is not an instruction: it still lands intact and the core halts on it.
    let (bench, _) = load_and_run(&program);
    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(cpu.memory_word(0), Some(0x1122_3344));
    assert_eq!(cpu.memory_word(1), Some(0xE3A0_0000));
    assert_eq!(cpu.loaded_words(), 2);
    assert_eq!(
        bench.device().core().halt_reason(),
        Some(HaltReason::Undefined(0x1122_3344))
    );
}

// ══════════════════════════════════════════════════════════
// 2. Execution
// ══════════════════════════════════════════════════════════

#[test]
fn bootstrap_program_replies() {
    let program = Program::new([0xE3A0_0000, 0xE3A0_1041, 0xE580_1000]);
    let (mut bench, mut loader) = load_and_run(&program);
    assert_eq!(loader.receive_reply(&mut bench, reply_budget()).unwrap(), 0x41);

    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(cpu.register(0), Some(0));
    assert_eq!(cpu.register(1), Some(0x41));
    assert_eq!(cpu.program_counter(), 12);
    assert!(!cpu.is_running());
    assert_eq!(bench.device().core().retired(), 3);
}

#[test]
fn loop_waits_for_words_still_in_flight() {
    let program = Program::from_source(
        "    mov r0, #0
             mov r1, #3
         loop:
             subs r1, r1, #1
             bne loop
             mov r2, #0x5a
             str r2, [r0]",
    )
    .unwrap();
    let (mut bench, mut loader) = load_and_run(&program);
    assert_eq!(loader.receive_reply(&mut bench, reply_budget()).unwrap(), 0x5A);

    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(cpu.register(1), Some(0));
    assert_eq!(cpu.register(2), Some(0x5A));
    assert_eq!(cpu.program_counter(), 24);
}

#[test]
fn uart_register_load_returns_last_received_byte() {
    // The final byte on the wire is the top byte of `ldr r1, [r0]`.
    let program = Program::from_source("mov r0, #0\nldr r1, [r0]").unwrap();
    let (bench, _) = load_and_run(&program);
    assert_eq!(bench.device().core().regs.read(1), 0xE5);
}

#[test]
fn data_ram_is_separate_from_program_memory() {
    let program = Program::from_source(
        "mov r3, #8
         mov r4, #0x7f
         str r4, [r3]
         ldr r5, [r3]",
    )
    .unwrap();
    let (mut bench, mut loader) = load_and_run(&program);
    assert_eq!(bench.device().data_word(2), Some(0x7F));
    assert_eq!(bench.device().core().regs.read(5), 0x7F);

    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(cpu.memory_word(2), Some(program.words()[2]));
    assert!(loader.receive_reply(&mut bench, reply_budget()).is_err());
}

#[test]
fn undefined_instruction_halts_core() {
    let program = Program::new([0xE3A0_0000, 0xEF00_0000, 0xE3A0_1001]);
    let (bench, _) = load_and_run(&program);
    let cpu = bench.device().cpu_state().unwrap();
    assert!(!cpu.is_running());
    assert_eq!(cpu.program_counter(), 4);
    assert_eq!(cpu.register(1), Some(0));
    assert_eq!(cpu.loaded_words(), 3);
}

#[test]
fn reset_clears_program_memory() {
    let program = Program::new([0xE3A0_1041]);
    let (mut bench, _) = load_and_run(&program);
    bench.reset(2);
    let cpu = bench.device().cpu_state().unwrap();
    assert_eq!(cpu.memory_word(0), Some(0));
    assert_eq!(cpu.loaded_words(), 0);
    assert_eq!(cpu.register(1), Some(0));
}
