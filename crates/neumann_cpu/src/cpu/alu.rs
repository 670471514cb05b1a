use crate::{Bus, CpuError, Instruction, Opcode, Register, Word};

use super::{Cpu, Status};

impl<B: Bus> Cpu<B> {
    /// Execute a decoded instruction: memory stage, then write-back.
    ///
    /// Control transfers run after the fetch already advanced PC, so a taken
    /// jump simply overwrites the sequential successor.
    pub fn execute(&mut self, instruction: Instruction) -> Result<Status, CpuError> {
        let Instruction {
            opcode,
            register: target,
            data,
        } = instruction;

        match opcode {
            Opcode::Halt => return Ok(Status::Halted),
            Opcode::Nop => {}
            Opcode::LoadImmediate1 => {
                self.regs[target] = (self.regs[target] & 0xFFFF_0000) | Word::from(data);
            }
            Opcode::LoadImmediate2 => {
                self.regs[target] = (self.regs[target] & 0x0000_FFFF) | (Word::from(data) << 16);
            }
            Opcode::LoadDirect => {
                let value = self.load_word(Word::from(data))?;
                self.regs[target] = value;
            }
            Opcode::StoreDirect => {
                let value = self.regs[target];
                self.store_word(Word::from(data), value)?;
            }
            Opcode::LoadIndirect => {
                let pointer = self.load_word(Word::from(data))?;
                let value = self.load_word(pointer)?;
                self.regs[target] = value;
            }
            Opcode::StoreIndirect => {
                let pointer = self.load_word(Word::from(data))?;
                let value = self.regs[target];
                self.store_word(pointer, value)?;
            }
            Opcode::Mov => self.regs[target] = self.regs[instruction.source()],
            Opcode::Add => self.alu_op(target, instruction.source(), Word::wrapping_add),
            Opcode::Sub => self.alu_op(target, instruction.source(), Word::wrapping_sub),
            Opcode::Mul => self.alu_op(target, instruction.source(), Word::wrapping_mul),
            Opcode::Jmp => self.jump(data),
            Opcode::Jnz => {
                // Flags are never computed, so the branch tests the register.
                if self.regs[target] != 0 {
                    self.jump(data);
                }
            }
        }

        Ok(Status::Running)
    }

    /// `target = op(target, source)`. Flags are left untouched.
    #[inline]
    fn alu_op(&mut self, target: Register, source: Register, op: fn(Word, Word) -> Word) {
        self.regs[target] = op(self.regs[target], self.regs[source]);
    }

    #[inline]
    fn jump(&mut self, target: u16) {
        log::debug!(
            "jump 0x{:08X} -> 0x{target:04X}",
            self.cu.program_counter.wrapping_sub(crate::INSTRUCTION_LENGTH)
        );
        self.cu.program_counter = Word::from(target);
    }
}
