use std::fmt;
use std::ops::{Index, IndexMut};

use bitflags::bitflags;

use crate::{CpuError, Register, Word, NUM_REGS};

/// General-purpose register file plus the stack and base pointers.
///
/// Registers are addressed either by the typed [`Register`] name, which can
/// never be out of range, or by a raw operand index through [`get`] and
/// [`set`], which reject anything above 7.
///
/// [`get`]: RegisterFile::get
/// [`set`]: RegisterFile::set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    general: [Word; NUM_REGS],
    /// Not driven by any opcode yet.
    pub stack_pointer: Word,
    /// Not driven by any opcode yet.
    pub base_register: Word,
}

impl RegisterFile {
    pub fn get(&self, index: u8) -> Result<Word, CpuError> {
        let register = Register::try_from(index)?;
        Ok(self[register])
    }

    pub fn set(&mut self, index: u8, value: Word) -> Result<(), CpuError> {
        let register = Register::try_from(index)?;
        self[register] = value;
        Ok(())
    }

    pub fn general(&self) -> &[Word; NUM_REGS] {
        &self.general
    }

    pub fn iter(&self) -> impl Iterator<Item = (Register, Word)> + '_ {
        Register::ALL.into_iter().zip(self.general.iter().copied())
    }
}

impl Index<Register> for RegisterFile {
    type Output = Word;

    #[inline]
    fn index(&self, register: Register) -> &Word {
        &self.general[register.index()]
    }
}

impl IndexMut<Register> for RegisterFile {
    #[inline]
    fn index_mut(&mut self, register: Register) -> &mut Word {
        &mut self.general[register.index()]
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (register, value) in self.iter() {
            write!(f, "{register}=0x{value:08X} ")?;
        }
        write!(
            f,
            "SP=0x{:08X} BP=0x{:08X}",
            self.stack_pointer, self.base_register
        )
    }
}

bitflags! {
    /// Status flags.
    ///
    /// Part of the machine state but not computed by any instruction; every
    /// bit stays clear unless a caller sets it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const SIGN = 1 << 0;
        const ZERO = 1 << 1;
        const CARRY = 1 << 2;
        const OVERFLOW = 1 << 3;
        const INTERRUPT = 1 << 4;
        const SUPERVISOR = 1 << 5;
    }
}

impl Flags {
    #[inline]
    pub fn sign(self) -> bool {
        self.contains(Flags::SIGN)
    }

    #[inline]
    pub fn zero(self) -> bool {
        self.contains(Flags::ZERO)
    }

    #[inline]
    pub fn carry(self) -> bool {
        self.contains(Flags::CARRY)
    }

    #[inline]
    pub fn overflow(self) -> bool {
        self.contains(Flags::OVERFLOW)
    }

    #[inline]
    pub fn interrupt(self) -> bool {
        self.contains(Flags::INTERRUPT)
    }

    #[inline]
    pub fn supervisor(self) -> bool {
        self.contains(Flags::SUPERVISOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_start_zeroed() {
        let regs = RegisterFile::default();
        assert!(regs.general().iter().all(|&value| value == 0));
        assert_eq!(regs.stack_pointer, 0);
        assert_eq!(regs.base_register, 0);
    }

    #[test]
    fn raw_index_access_matches_typed_access() {
        let mut regs = RegisterFile::default();
        regs.set(5, 0xCAFE_F00D).unwrap();
        assert_eq!(regs[Register::R5], 0xCAFE_F00D);
        regs[Register::R7] = 42;
        assert_eq!(regs.get(7), Ok(42));
    }

    #[test]
    fn raw_index_out_of_range_fails() {
        let mut regs = RegisterFile::default();
        assert_eq!(regs.get(8), Err(CpuError::OutOfRangeRegister { index: 8 }));
        assert_eq!(
            regs.set(0xFF, 1),
            Err(CpuError::OutOfRangeRegister { index: 0xFF })
        );
        assert_eq!(regs, RegisterFile::default());
    }

    #[test]
    fn flags_default_clear() {
        let flags = Flags::default();
        assert!(!flags.sign());
        assert!(!flags.zero());
        assert!(!flags.carry());
        assert!(!flags.overflow());
        assert!(!flags.interrupt());
        assert!(!flags.supervisor());

        let flags = Flags::ZERO | Flags::SUPERVISOR;
        assert!(flags.zero() && flags.supervisor() && !flags.carry());
    }
}
