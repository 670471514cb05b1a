use std::fmt;

use crate::{Byte, CpuError, Word};

/// Operation selected by bits 0-7 of an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Halt = 0x00,
    Nop = 0x01,
    /// Replace the low half of the target register.
    LoadImmediate1 = 0x02,
    /// Replace the high half of the target register.
    LoadImmediate2 = 0x03,
    LoadDirect = 0x04,
    StoreDirect = 0x05,
    /// The data operand names a cell holding the address to load from.
    LoadIndirect = 0x06,
    /// The data operand names a cell holding the address to store to.
    StoreIndirect = 0x07,
    Mov = 0x08,
    Add = 0x09,
    Sub = 0x0A,
    Mul = 0x0B,
    Jmp = 0x0C,
    Jnz = 0x0D,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Nop => "NOP",
            Opcode::LoadImmediate1 => "LOAD_IMMEDIATE_1",
            Opcode::LoadImmediate2 => "LOAD_IMMEDIATE_2",
            Opcode::LoadDirect => "LOAD_DIRECT",
            Opcode::StoreDirect => "STORE_DIRECT",
            Opcode::LoadIndirect => "LOAD_INDIRECT",
            Opcode::StoreIndirect => "STORE_INDIRECT",
            Opcode::Mov => "MOV",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Jmp => "JMP",
            Opcode::Jnz => "JNZ",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = CpuError;

    fn try_from(opcode: u8) -> Result<Self, Self::Error> {
        Ok(match opcode {
            0x00 => Opcode::Halt,
            0x01 => Opcode::Nop,
            0x02 => Opcode::LoadImmediate1,
            0x03 => Opcode::LoadImmediate2,
            0x04 => Opcode::LoadDirect,
            0x05 => Opcode::StoreDirect,
            0x06 => Opcode::LoadIndirect,
            0x07 => Opcode::StoreIndirect,
            0x08 => Opcode::Mov,
            0x09 => Opcode::Add,
            0x0A => Opcode::Sub,
            0x0B => Opcode::Mul,
            0x0C => Opcode::Jmp,
            0x0D => Opcode::Jnz,
            _ => return Err(CpuError::UnknownOpcode { opcode }),
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// General-purpose register name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    pub const ALL: [Register; 8] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Register selected by the low three bits of a data operand.
    #[inline]
    pub fn from_low_bits(data: u16) -> Self {
        Self::ALL[usize::from(data & 0x07)]
    }
}

impl TryFrom<u8> for Register {
    type Error = CpuError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(CpuError::OutOfRangeRegister { index })
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.index())
    }
}

/// A decoded instruction word.
///
/// Encoding, as four bytes in memory order:
/// `[opcode][register operand][data operand lo][data operand hi]`, which is
/// the same as reading the word little-endian and taking bits 0-7, 8-15 and
/// 16-31.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Target register; ignored by HALT, NOP and JMP.
    pub register: Register,
    /// 16-bit immediate, address, or source register selector.
    pub data: u16,
}

impl Instruction {
    pub const fn new(opcode: Opcode, register: Register, data: u16) -> Self {
        Self {
            opcode,
            register,
            data,
        }
    }

    /// Split a fetched word into its fields and validate them.
    ///
    /// The opcode is checked before the register operand, so a word that is
    /// wrong in both places reports `UnknownOpcode`.
    pub fn decode(word: Word) -> Result<Self, CpuError> {
        let opcode = Opcode::try_from((word & 0xFF) as u8)?;
        let register = Register::try_from(((word >> 8) & 0xFF) as u8)?;
        Ok(Self::new(opcode, register, (word >> 16) as u16))
    }

    pub fn encode(self) -> [Byte; 4] {
        let [lo, hi] = self.data.to_le_bytes();
        [self.opcode as u8, self.register as u8, lo, hi]
    }

    pub fn to_word(self) -> Word {
        Word::from_le_bytes(self.encode())
    }

    /// Source register for the register-to-register group (MOV/ADD/SUB/MUL).
    #[inline]
    pub fn source(self) -> Register {
        Register::from_low_bits(self.data)
    }

    pub const fn halt() -> Self {
        Self::new(Opcode::Halt, Register::R0, 0)
    }

    pub const fn nop() -> Self {
        Self::new(Opcode::Nop, Register::R0, 0)
    }

    pub const fn load_immediate_1(target: Register, low: u16) -> Self {
        Self::new(Opcode::LoadImmediate1, target, low)
    }

    pub const fn load_immediate_2(target: Register, high: u16) -> Self {
        Self::new(Opcode::LoadImmediate2, target, high)
    }

    pub const fn load_direct(target: Register, address: u16) -> Self {
        Self::new(Opcode::LoadDirect, target, address)
    }

    pub const fn store_direct(source: Register, address: u16) -> Self {
        Self::new(Opcode::StoreDirect, source, address)
    }

    pub const fn load_indirect(target: Register, pointer_cell: u16) -> Self {
        Self::new(Opcode::LoadIndirect, target, pointer_cell)
    }

    pub const fn store_indirect(source: Register, pointer_cell: u16) -> Self {
        Self::new(Opcode::StoreIndirect, source, pointer_cell)
    }

    pub const fn mov(target: Register, source: Register) -> Self {
        Self::new(Opcode::Mov, target, source as u16)
    }

    pub const fn add(target: Register, source: Register) -> Self {
        Self::new(Opcode::Add, target, source as u16)
    }

    pub const fn sub(target: Register, source: Register) -> Self {
        Self::new(Opcode::Sub, target, source as u16)
    }

    pub const fn mul(target: Register, source: Register) -> Self {
        Self::new(Opcode::Mul, target, source as u16)
    }

    pub const fn jmp(target: u16) -> Self {
        Self::new(Opcode::Jmp, Register::R0, target)
    }

    pub const fn jnz(condition: Register, target: u16) -> Self {
        Self::new(Opcode::Jnz, condition, target)
    }
}

/// Disassembly form, e.g. `LOAD_INDIRECT R0, [[0x0100]]`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Instruction {
            opcode,
            register,
            data,
        } = *self;
        match opcode {
            Opcode::Halt | Opcode::Nop => write!(f, "{opcode}"),
            Opcode::LoadImmediate1 | Opcode::LoadImmediate2 => {
                write!(f, "{opcode} {register}, #0x{data:04X}")
            }
            Opcode::LoadDirect | Opcode::StoreDirect => {
                write!(f, "{opcode} {register}, [0x{data:04X}]")
            }
            Opcode::LoadIndirect | Opcode::StoreIndirect => {
                write!(f, "{opcode} {register}, [[0x{data:04X}]]")
            }
            Opcode::Mov | Opcode::Add | Opcode::Sub | Opcode::Mul => {
                write!(f, "{opcode} {register}, {}", self.source())
            }
            Opcode::Jmp => write!(f, "{opcode} 0x{data:04X}"),
            Opcode::Jnz => write!(f, "{opcode} {register}, 0x{data:04X}"),
        }
    }
}

/// Lay out a sequence of instructions as consecutive little-endian words.
pub fn encode_program(program: &[Instruction]) -> Vec<Byte> {
    program.iter().flat_map(|instruction| instruction.encode()).collect()
}
