//! CPU whose program memory is loaded over the serial line.
//!
//! This module implements the third device top. It performs the following:
//! 1. **Receive:** UART RX pushes every received byte into a FIFO.
//! 2. **Boot Loader:** Pops one byte per cycle and assembles little-endian words into
//!    consecutive program memory slots.
//! 3. **Execution:** The core retires one instruction per cycle while the word at
//!    `pc / 4` has been loaded.
//! 4. **Transmit:** Stores to data address 0 queue bytes for UART TX.
//!
//! Memory is Harvard. Program memory is only written by the loader. Data space maps
//! word 0 to the UART register (stores transmit, loads return the last received
//! byte) and the remaining words to a separate RAM.

use std::collections::VecDeque;

use tracing::debug;

use crate::common::constants::WORD_BYTES;
use crate::core::Cpu;
use crate::core::cpu::DataBus;
use crate::soc::devices::fifo::Fifo;
use crate::soc::devices::pins::Pins;
use crate::soc::devices::uart::{UartRx, UartTx};
use crate::soc::traits::{CpuState, Device, FifoStatus};

/// Data-space address of the UART transmit/receive register.
pub const UART_DATA_ADDR: u32 = 0x0000_0000;

/// Data-space view lent to the core for one step.
struct DataSpace<'a> {
    ram: &'a mut [u32],
    tx_queue: &'a mut VecDeque<u8>,
    last_rx: u8,
}

impl DataSpace<'_> {
    fn ram_slot(&mut self, addr: u32) -> Option<&mut u32> {
        self.ram.get_mut(usize::try_from(addr / 4).ok()?)
    }
}

impl DataBus for DataSpace<'_> {
    fn load_word(&mut self, addr: u32) -> Option<u32> {
        if addr == UART_DATA_ADDR {
            return Some(u32::from(self.last_rx));
        }
        self.ram_slot(addr).map(|w| *w)
    }

    fn load_byte(&mut self, addr: u32) -> Option<u8> {
        match addr {
            UART_DATA_ADDR => Some(self.last_rx),
            1..=3 => Some(0),
            _ => {
                let lane = (addr % 4) as usize;
                self.ram_slot(addr).map(|w| w.to_le_bytes()[lane])
            }
        }
    }

    fn store_word(&mut self, addr: u32, value: u32) -> Option<()> {
        if addr == UART_DATA_ADDR {
            self.tx_queue.push_back(value.to_le_bytes()[0]);
            return Some(());
        }
        *self.ram_slot(addr)? = value;
        Some(())
    }

    fn store_byte(&mut self, addr: u32, value: u8) -> Option<()> {
        match addr {
            UART_DATA_ADDR => {
                self.tx_queue.push_back(value);
                Some(())
            }
            1..=3 => Some(()),
            _ => {
                let lane = (addr % 4) as usize;
                let slot = self.ram_slot(addr)?;
                let mut bytes = slot.to_le_bytes();
                bytes[lane] = value;
                *slot = u32::from_le_bytes(bytes);
                Some(())
            }
        }
    }
}

/// Serial-loaded CPU device.
#[derive(Debug, Clone)]
pub struct SerialCpu {
    pins: Pins,
    rx: UartRx,
    fifo: Fifo,
    tx: UartTx,
    tx_queue: VecDeque<u8>,
    /// Word being assembled by the boot loader.
    partial: u32,
    /// Bytes of `partial` received so far.
    partial_bytes: usize,
    program: Vec<u32>,
    loaded_words: usize,
    data: Vec<u32>,
    last_rx: u8,
    core: Cpu,
}

impl SerialCpu {
    /// Creates the device.
    ///
    /// # Arguments
    ///
    /// * `baud` - Device cycles per bit.
    /// * `fifo_depth` - Receive FIFO slots.
    /// * `program_words` - Program memory size in words.
    /// * `data_words` - Data RAM size in words (word 0 is shadowed by the UART register).
    pub fn new(baud: u32, fifo_depth: usize, program_words: usize, data_words: usize) -> Self {
        Self {
            pins: Pins::new(),
            rx: UartRx::new(baud),
            fifo: Fifo::new(fifo_depth),
            tx: UartTx::new(baud),
            tx_queue: VecDeque::new(),
            partial: 0,
            partial_bytes: 0,
            program: vec![0; program_words],
            loaded_words: 0,
            data: vec![0; data_words],
            last_rx: 0,
            core: Cpu::new(),
        }
    }

    fn reset_all(&mut self) {
        self.rx.reset();
        self.fifo.reset();
        self.tx.reset();
        self.tx_queue.clear();
        self.partial = 0;
        self.partial_bytes = 0;
        self.program.fill(0);
        self.loaded_words = 0;
        self.data.fill(0);
        self.last_rx = 0;
        self.core.reset();
    }

    fn cycle(&mut self) {
        if self.pins.reset {
            self.reset_all();
            return;
        }
        if let Some(byte) = self.rx.clock(self.pins.serial_in) {
            self.last_rx = byte;
            let _ = self.fifo.push(byte);
        }
        if let Some(byte) = self.fifo.pop() {
            self.load_byte(byte);
        }
        self.execute();
        self.tx.clock();
        if !self.tx.is_busy() {
            if let Some(byte) = self.tx_queue.pop_front() {
                let _ = self.tx.load(byte);
            }
        }
    }

    fn load_byte(&mut self, byte: u8) {
        self.partial |= u32::from(byte) << (8 * self.partial_bytes);
        self.partial_bytes += 1;
        if self.partial_bytes < WORD_BYTES {
            return;
        }
        if let Some(slot) = self.program.get_mut(self.loaded_words) {
            *slot = self.partial;
            debug!(index = self.loaded_words, word = self.partial, "program word loaded");
            self.loaded_words += 1;
        }
        self.partial = 0;
        self.partial_bytes = 0;
    }

    fn execute(&mut self) {
        if !self.is_running() {
            return;
        }
        let word = self.program[self.core.fetch_index()];
        let mut bus = DataSpace {
            ram: &mut self.data,
            tx_queue: &mut self.tx_queue,
            last_rx: self.last_rx,
        };
        let _ = self.core.step(word, &mut bus);
    }

    /// Returns `true` while the word at `pc / 4` is loaded and the core has not halted.
    pub const fn is_running(&self) -> bool {
        !self.core.is_halted() && self.core.fetch_index() < self.loaded_words
    }

    /// The processor core.
    pub const fn core(&self) -> &Cpu {
        &self.core
    }

    /// Data RAM word at `index`.
    pub fn data_word(&self, index: usize) -> Option<u32> {
        self.data.get(index).copied()
    }
}

impl Device for SerialCpu {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn set_clock(&mut self, level: bool) {
        self.pins.clock = level;
    }

    fn set_reset(&mut self, level: bool) {
        self.pins.reset = level;
    }

    fn set_serial_in(&mut self, level: bool) {
        self.pins.serial_in = level;
    }

    fn eval(&mut self) {
        if self.pins.take_rising_edge() {
            self.cycle();
        }
    }

    fn serial_out(&self) -> bool {
        self.tx.line()
    }

    fn fifo_status(&self) -> Option<FifoStatus> {
        Some(self.fifo.status())
    }

    fn cpu_state(&self) -> Option<CpuState<'_>> {
        Some(CpuState::new(
            &self.program,
            self.core.regs.as_array(),
            self.core.pc,
            self.is_running(),
            self.loaded_words,
        ))
    }
}
