mod alu;
mod control;
mod regs;

pub use regs::{Flags, RegisterFile};

use control::ControlUnit;

use crate::{Bus, CpuError, Memory, Word};

/// Outcome of a single [`Cpu::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    /// The instruction just executed was HALT. The CPU does not stop by
    /// itself; the driver is expected to stop calling `step`.
    Halted,
}

impl Status {
    #[inline]
    pub fn is_halted(self) -> bool {
        self == Status::Halted
    }
}

/// Processor core.
///
/// Owns its memory bus and register file for its whole lifetime. Each call to
/// [`step`](Cpu::step) runs one complete fetch-decode-execute cycle:
/// the control unit (`control.rs`) fetches and decodes, the ALU (`alu.rs`)
/// executes and writes back. There is no embedded run loop.
#[derive(Clone, Debug)]
pub struct Cpu<B: Bus = Memory> {
    pub regs: RegisterFile,
    pub flags: Flags,
    cu: ControlUnit,
    memory: B,
}

impl<B: Bus> Cpu<B> {
    /// Bind a CPU to `memory` with zeroed registers, flags and PC.
    pub fn new(memory: B) -> Self {
        Self {
            regs: RegisterFile::default(),
            flags: Flags::default(),
            cu: ControlUnit::default(),
            memory,
        }
    }

    /// Reset registers, flags and control state; memory is left untouched.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::default();
        self.flags = Flags::default();
        self.cu = ControlUnit::default();
    }

    /// Execute exactly one instruction.
    ///
    /// On error the cycle is abandoned before write-back, so registers and
    /// memory are unchanged and PC points at the faulting instruction,
    /// whether the fault came from fetch or from execute.
    pub fn step(&mut self) -> Result<Status, CpuError> {
        let pc = self.cu.program_counter;
        let instruction = self.fetch()?;
        log::trace!("0x{pc:08X}: {instruction}");
        self.execute(instruction).map_err(|err| self.fault(pc, err))
    }

    #[inline]
    pub fn program_counter(&self) -> Word {
        self.cu.program_counter
    }

    #[inline]
    pub fn set_program_counter(&mut self, address: Word) {
        self.cu.program_counter = address;
    }

    #[inline]
    pub fn instruction_register(&self) -> Word {
        self.cu.instruction_register
    }

    #[inline]
    pub fn memory_address_register(&self) -> Word {
        self.cu.memory_address_register
    }

    #[inline]
    pub fn memory_buffer_register(&self) -> Word {
        self.cu.memory_buffer_register
    }

    /// Raw register operand of the last fetched instruction.
    #[inline]
    pub fn register_operand(&self) -> u8 {
        self.cu.register_operand
    }

    /// Raw data operand of the last fetched instruction.
    #[inline]
    pub fn data_operand(&self) -> u16 {
        self.cu.data_operand
    }

    #[inline]
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub fn memory(&self) -> &B {
        &self.memory
    }

    pub fn into_memory(self) -> B {
        self.memory
    }
}
