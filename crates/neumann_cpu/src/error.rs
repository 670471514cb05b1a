use thiserror::Error;

use crate::Word;

/// Faults raised by a single fetch-decode-execute cycle.
///
/// None of these are transient: they describe a malformed instruction stream
/// or an impossible memory access in the emulated program, so the CPU never
/// retries and leaves the decision to the driver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// A register operand selected something other than R0..R7.
    #[error("register index {index} out of range (expected 0-7)")]
    OutOfRangeRegister { index: u8 },

    /// The opcode byte has no entry in the dispatch table.
    #[error("unknown opcode 0x{opcode:02X}")]
    UnknownOpcode { opcode: u8 },

    /// A word access or program counter advance ran past 0xFFFF_FFFF.
    #[error("access at 0x{address:08X} runs past the end of the 32-bit address space")]
    AddressOverflow { address: Word },
}
