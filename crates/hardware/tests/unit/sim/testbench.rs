//! Step Clock Unit Tests.
//!
//! Uses a `mockall` device that records every signal change, to pin the exact
//! order of a tick and of reset.

use std::sync::{Arc, Mutex};

use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use uartbench_core::sim::Testbench;

use crate::common::mocks::device::{MockSignalDevice, idle_device};

type Log = Arc<Mutex<Vec<String>>>;

/// A mock whose inputs and evals append to the returned log.
fn recording_device() -> (MockSignalDevice, Log) {
    let log: Log = Arc::default();
    let mut mock = MockSignalDevice::new();
    let _ = mock.expect_name().return_const("mock");
    let l = Arc::clone(&log);
    let _ = mock
        .expect_set_clock()
        .returning(move |level| l.lock().unwrap().push(format!("clock={}", u8::from(level))));
    let l = Arc::clone(&log);
    let _ = mock
        .expect_set_reset()
        .returning(move |level| l.lock().unwrap().push(format!("reset={}", u8::from(level))));
    let l = Arc::clone(&log);
    let _ = mock
        .expect_set_serial_in()
        .returning(move |level| l.lock().unwrap().push(format!("rx={}", u8::from(level))));
    let l = Arc::clone(&log);
    let _ = mock
        .expect_eval()
        .returning(move || l.lock().unwrap().push("eval".to_string()));
    (mock, log)
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn tick_is_clock_high_eval_clock_low_eval() {
    let (mock, log) = recording_device();
    let mut bench = Testbench::new(mock);
    bench.tick();
    assert_eq!(entries(&log), ["clock=1", "eval", "clock=0", "eval"]);
    assert_eq!(bench.cycle(), 1);
}

#[test]
fn reset_holds_for_at_least_two_cycles_then_idles_line() {
    let (mock, log) = recording_device();
    let mut bench = Testbench::new(mock);
    bench.reset(0);
    let tick = ["clock=1", "eval", "clock=0", "eval"];
    let mut want = vec!["reset=1"];
    want.extend(tick);
    want.extend(tick);
    want.extend(["reset=0", "rx=1"]);
    assert_eq!(entries(&log), want);
    assert_eq!(bench.cycle(), 2);
}

#[test]
fn reset_honours_longer_hold() {
    let mut bench = Testbench::new(idle_device());
    bench.reset(5);
    assert_eq!(bench.cycle(), 5);
}

#[test]
fn drive_and_sample_pass_through() {
    let mut mock = MockSignalDevice::new();
    let _ = mock
        .expect_set_serial_in()
        .with(eq(false))
        .times(1)
        .return_const(());
    let _ = mock.expect_serial_out().times(1).return_const(false);

    let mut bench = Testbench::new(mock);
    bench.drive(false);
    assert!(!bench.sample());
    assert_eq!(bench.cycle(), 0);
}
