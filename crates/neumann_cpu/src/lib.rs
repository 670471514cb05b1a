pub mod cpu;
pub mod error;
pub mod isa;
pub mod memory;

pub use cpu::{Cpu, Flags, RegisterFile, Status};
pub use error::CpuError;
pub use isa::{encode_program, Instruction, Opcode, Register};
pub use memory::{Bus, Memory};

/// Unsigned 8-bit memory cell.
pub type Byte = u8;
/// Unsigned 32-bit machine word. All arithmetic on it wraps modulo 2^32.
pub type Word = u32;

/// Every instruction is exactly one little-endian word wide.
pub const INSTRUCTION_LENGTH: Word = 4;
/// Number of general-purpose registers (R0..R7).
pub const NUM_REGS: usize = 8;
