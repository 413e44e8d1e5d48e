use mockall::mock;
use uartbench_core::soc::traits::{Device, FifoStatus};

mock! {
    pub SignalDevice {}
    impl Device for SignalDevice {
        fn name(&self) -> &'static str;
        fn set_clock(&mut self, level: bool);
        fn set_reset(&mut self, level: bool);
        fn set_serial_in(&mut self, level: bool);
        fn eval(&mut self);
        fn serial_out(&self) -> bool;
        fn fifo_status(&self) -> Option<FifoStatus>;
    }
}

/// A mock that accepts any input, keeps its line idle and has no FIFO.
pub fn idle_device() -> MockSignalDevice {
    let mut mock = MockSignalDevice::new();
    let _ = mock.expect_name().return_const("mock");
    let _ = mock.expect_set_clock().return_const(());
    let _ = mock.expect_set_reset().return_const(());
    let _ = mock.expect_set_serial_in().return_const(());
    let _ = mock.expect_eval().return_const(());
    let _ = mock.expect_serial_out().return_const(true);
    let _ = mock.expect_fifo_status().return_const(None);
    mock
}
