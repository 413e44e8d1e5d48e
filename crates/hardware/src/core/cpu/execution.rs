//! Main Execution Step.
//!
//! This module implements the single-cycle execute of the core. It performs the following:
//! 1. **Condition Check:** Skips the instruction when its condition fails.
//! 2. **Dispatch:** Routes data processing through the ALU, transfers through the bus,
//!    and branches to the program counter.
//! 3. **Halting:** Converts undefined encodings and unmapped accesses into a sticky halt.
//! 4. **Observability:** Traces every retired instruction with its disassembly.

use tracing::{trace, warn};

use super::{Cpu, DataBus, HaltReason};
use crate::core::arch::gpr::{LR, PC};
use crate::core::units::alu::{Alu, shifts};
use crate::isa::disasm::disassemble;
use crate::isa::instruction::{DataProc, Instruction, Transfer, decode};

impl Cpu {
    /// Executes `word` as the instruction at `pc`.
    ///
    /// # Arguments
    ///
    /// * `word` - Instruction fetched from `pc`.
    /// * `bus`  - Data space for loads and stores.
    ///
    /// # Errors
    ///
    /// Returns the halt reason if the core is, or becomes, halted. A halted core
    /// does not change state.
    pub fn step(&mut self, word: u32, bus: &mut dyn DataBus) -> Result<(), HaltReason> {
        if let Some(reason) = self.halt {
            return Err(reason);
        }
        let inst = decode(word);
        trace!(pc = self.pc, word, inst = %disassemble(word), "execute");

        let passes = inst.condition().is_none_or(|c| c.passes(self.flags));
        let outcome = if passes {
            match inst {
                Instruction::DataProc(dp) => {
                    self.data_proc(&dp);
                    Ok(())
                }
                Instruction::Transfer(t) => self.transfer(&t, bus),
                Instruction::Branch { link, offset, .. } => {
                    if link {
                        self.regs.write(LR, self.pc.wrapping_add(4));
                    }
                    let target = self
                        .pc
                        .wrapping_add(8)
                        .wrapping_add_signed(offset.wrapping_mul(4));
                    self.jump(target);
                    Ok(())
                }
                Instruction::BranchExchange { rm, .. } => {
                    self.jump(self.operand(rm));
                    Ok(())
                }
                Instruction::Undefined(w) => Err(HaltReason::Undefined(w)),
            }
        } else {
            self.advance();
            Ok(())
        };

        if let Err(reason) = outcome {
            warn!(pc = self.pc, %reason, "core halted");
            self.halt = Some(reason);
            return Err(reason);
        }
        self.retired += 1;
        Ok(())
    }

    fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(4);
        self.sync_pc();
    }

    fn jump(&mut self, target: u32) {
        self.pc = target & !3;
        self.sync_pc();
    }

    /// Writes a result register; `r15` as destination is a jump.
    fn write_result(&mut self, rd: u8, value: u32) -> bool {
        if usize::from(rd) == PC {
            self.jump(value);
            true
        } else {
            self.regs.write(usize::from(rd), value);
            false
        }
    }

    fn data_proc(&mut self, dp: &DataProc) {
        let (b, shifter_carry) =
            shifts::operand2(dp.operand, self.flags.c, |r| self.operand(r));
        let a = self.operand(dp.rn);
        let result = Alu::execute(dp.op, a, b, shifter_carry, self.flags);

        if dp.set_flags || dp.op.is_compare() {
            self.flags = result.flags;
        }
        let jumped = !dp.op.is_compare() && self.write_result(dp.rd, result.value);
        if !jumped {
            self.advance();
        }
    }

    fn transfer(&mut self, t: &Transfer, bus: &mut dyn DataBus) -> Result<(), HaltReason> {
        let base = self.operand(t.rn);
        let offset = u32::from(t.offset);
        let offset_addr = if t.up {
            base.wrapping_add(offset)
        } else {
            base.wrapping_sub(offset)
        };
        let addr = if t.pre_index { offset_addr } else { base };
        let abort = || HaltReason::DataAbort(addr);

        let loaded = if t.load {
            let value = if t.byte {
                bus.load_byte(addr).map(u32::from)
            } else if addr & 3 == 0 {
                bus.load_word(addr)
            } else {
                None
            };
            Some(value.ok_or_else(abort)?)
        } else {
            let value = self.operand(t.rd);
            let stored = if t.byte {
                bus.store_byte(addr, value.to_le_bytes()[0])
            } else if addr & 3 == 0 {
                bus.store_word(addr, value)
            } else {
                None
            };
            stored.ok_or_else(abort)?;
            None
        };

        if (t.writeback || !t.pre_index) && usize::from(t.rn) != PC {
            self.regs.write(usize::from(t.rn), offset_addr);
        }
        let jumped = match loaded {
            Some(value) => self.write_result(t.rd, value),
            None => false,
        };
        if !jumped {
            self.advance();
        }
        Ok(())
    }
}
