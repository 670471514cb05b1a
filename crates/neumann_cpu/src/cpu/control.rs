use crate::isa::Opcode;
use crate::{Bus, Byte, CpuError, Instruction, Word, INSTRUCTION_LENGTH};

use super::Cpu;

/// Control unit state: program counter, the memory interface latches and the
/// fields of the most recently fetched instruction.
///
/// Everything here stays observable after a cycle so tests and debuggers can
/// see what the last fetch and memory access did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct ControlUnit {
    pub program_counter: Word,
    pub memory_address_register: Word,
    pub memory_buffer_register: Word,
    pub instruction_register: Word,
    pub register_operand: u8,
    pub data_operand: u16,
}

impl<B: Bus> Cpu<B> {
    /// Fetch the instruction at PC, advance PC by one instruction and decode.
    ///
    /// On any fault PC is put back on the faulting instruction, while IR and
    /// the raw operand fields still show the offending word.
    pub fn fetch(&mut self) -> Result<Instruction, CpuError> {
        let pc = self.cu.program_counter;
        let word = self.load_word(pc).map_err(|err| self.fault(pc, err))?;
        self.cu.instruction_register = word;
        self.cu.register_operand = ((word >> 8) & 0xFF) as u8;
        self.cu.data_operand = (word >> 16) as u16;

        pc.checked_add(INSTRUCTION_LENGTH)
            .ok_or(CpuError::AddressOverflow { address: pc })
            .and_then(|next| {
                self.cu.program_counter = next;
                Instruction::decode(word)
            })
            .map_err(|err| self.fault(pc, err))
    }

    /// Abandon the current cycle: PC goes back to `pc` and the fault is
    /// logged with the machine state.
    pub(super) fn fault(&mut self, pc: Word, err: CpuError) -> CpuError {
        self.cu.program_counter = pc;
        log::error!(
            "CPU fault: {err} at PC=0x{pc:08X} (IR=0x{ir:08X} MAR=0x{mar:08X} {regs})",
            ir = self.cu.instruction_register,
            mar = self.cu.memory_address_register,
            regs = self.regs,
        );
        err
    }

    /// Whether the instruction at PC is HALT.
    ///
    /// Peeks the opcode byte directly, so MAR/MBR are left alone.
    pub fn at_halt(&self) -> bool {
        self.memory.load_byte(self.cu.program_counter) == Opcode::Halt as u8
    }

    // Memory accesses below go through MAR/MBR the way the hardware would.

    pub fn load_byte(&mut self, address: Word) -> Byte {
        self.cu.memory_address_register = address;
        let value = self.memory.load_byte(address);
        self.cu.memory_buffer_register = Word::from(value);
        value
    }

    pub fn store_byte(&mut self, address: Word, value: Byte) {
        self.cu.memory_address_register = address;
        self.cu.memory_buffer_register = Word::from(value);
        self.memory.store_byte(address, value);
    }

    pub fn load_word(&mut self, address: Word) -> Result<Word, CpuError> {
        self.cu.memory_address_register = address;
        let value = self.memory.load_word(address)?;
        self.cu.memory_buffer_register = value;
        Ok(value)
    }

    pub fn store_word(&mut self, address: Word, value: Word) -> Result<(), CpuError> {
        self.cu.memory_address_register = address;
        self.cu.memory_buffer_register = value;
        self.memory.store_word(address, value)
    }
}
