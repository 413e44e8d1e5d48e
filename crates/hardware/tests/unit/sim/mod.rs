//! # Harness Orchestration Tests


/// Named end-to-end scenarios at the default baud interval.
pub mod scenario;


/// Step clock signal ordering.
pub mod testbench;
