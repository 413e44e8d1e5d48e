//! Test harness helpers.
//!
//! Most tests run the line at a short baud interval so that multi-frame
//! sequences stay fast; the named scenarios keep the default 868.

use tracing_subscriber::EnvFilter;

use uartbench_core::config::{HarnessConfig, TimingConfig};
use uartbench_core::sim::Testbench;
use uartbench_core::soc::devices::{SerialCpu, UartEcho, UartFifo};
use uartbench_core::soc::traits::Device;

/// Baud interval used by the fast tests.
pub const FAST_BAUD: u32 = 16;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration with the baud interval replaced.
pub fn config_with_baud(baud: u32) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.timing.baud_interval = baud;
    config
}

/// Default timing with the baud interval replaced.
pub fn timing(baud: u32) -> TimingConfig {
    config_with_baud(baud).timing
}

/// Wraps `device` in a testbench and holds reset for the default cycle count.
pub fn reset_bench<D: Device>(device: D) -> Testbench<D> {
    init_tracing();
    let mut bench = Testbench::new(device);
    bench.reset(HarnessConfig::default().timing.reset_cycles);
    bench
}

/// UART echo out of reset.
pub fn echo_bench(baud: u32) -> Testbench<UartEcho> {
    reset_bench(UartEcho::new(baud))
}

/// UART+FIFO of `depth` entries out of reset.
pub fn fifo_bench(baud: u32, depth: usize) -> Testbench<UartFifo> {
    reset_bench(UartFifo::new(baud, depth))
}

/// Serial CPU with the default FIFO depth and memory sizes.
pub fn cpu_bench(baud: u32) -> Testbench<SerialCpu> {
    let config = HarnessConfig::default();
    reset_bench(SerialCpu::new(
        baud,
        config.fifo.depth,
        config.cpu.program_words,
        config.cpu.data_words,
    ))
}
