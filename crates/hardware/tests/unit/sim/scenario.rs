//! Scenario Tests.
//!
//! The named scenarios at the default configuration (868 ticks per bit), plus
//! custom programs and configuration variants.

use pretty_assertions::assert_eq;
use rstest::rstest;

use uartbench_core::common::error::Fault;
use uartbench_core::config::HarnessConfig;
use uartbench_core::sim::Program;
use uartbench_core::sim::scenario::{self, ScenarioKind};

use crate::common::harness::{config_with_baud, init_tracing};

#[rstest]
#[case(ScenarioKind::Uart)]
#[case(ScenarioKind::UartFifo)]
#[case(ScenarioKind::TxFifo)]
#[case(ScenarioKind::Cpu)]
fn scenario_passes_at_default_config(#[case] kind: ScenarioKind) {
    init_tracing();
    let report = scenario::run(kind, &HarnessConfig::default(), None);
    assert!(report.passed(), "{kind}: {:?}", report.failures);
    assert_eq!(report.kind, kind);
    assert!(report.stats.cycles > 0);
}

#[test]
fn tx_fifo_counts_every_pointer_check() {
    let report = scenario::run(ScenarioKind::TxFifo, &HarnessConfig::default(), None);
    assert_eq!(report.stats.pointer_checks, 120);
    assert_eq!(report.stats.frames_sent, 12);
    assert_eq!(report.stats.frames_received, 12);
}

#[test]
fn cpu_scenario_reports_retired_instructions() {
    let report = scenario::run(ScenarioKind::Cpu, &HarnessConfig::default(), None);
    assert_eq!(report.stats.instructions_retired, 3);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(16)]
fn scenarios_pass_at_short_baud(#[case] baud: u32) {
    let config = config_with_baud(baud);
    for kind in ScenarioKind::ALL {
        let report = scenario::run(kind, &config, None);
        assert!(report.passed(), "{kind} at baud {baud}: {:?}", report.failures);
    }
}

#[test]
fn scenarios_pass_without_idle_gap() {
    let mut config = config_with_baud(16);
    config.timing.idle_gap_bits = 0;
    for kind in ScenarioKind::ALL {
        let report = scenario::run(kind, &config, None);
        assert!(report.passed(), "{kind}: {:?}", report.failures);
    }
}

#[test]
fn deep_fifo_does_not_wrap() {
    let mut config = config_with_baud(16);
    config.fifo.depth = 16;
    let report = scenario::run(ScenarioKind::TxFifo, &config, None);
    assert!(report.passed(), "{:?}", report.failures);
}

#[test]
fn custom_program_checks_only_memory() {
    let program = Program::from_source("mov r0, #0x42\nbx lr").unwrap();
    let report = scenario::run(ScenarioKind::Cpu, &config_with_baud(16), Some(&program));
    assert!(report.passed(), "{:?}", report.failures);
}

#[test]
fn load_timeout_is_reported() {
    let mut config = config_with_baud(16);
    config.timing.slack_frames = 0;
    config.timing.idle_gap_bits = 0;
    // Twelve frames need thirteen frame periods including the settle frame.
    let report = scenario::run(ScenarioKind::Cpu, &config, None);
    assert!(
        matches!(report.failures.as_slice(), [Fault::Timeout { .. }]),
        "{:?}",
        report.failures
    );
}

#[test]
fn kinds_parse_and_display() {
    for kind in ScenarioKind::ALL {
        assert_eq!(kind.to_string().parse::<ScenarioKind>(), Ok(kind));
    }
    assert_eq!(ScenarioKind::UartFifo.to_string(), "uart-fifo");
    assert!("fifo".parse::<ScenarioKind>().is_err());
}
