use std::collections::HashMap;

use crate::{Byte, CpuError, Word};

const WORD_BYTES: Word = 4;

/// Abstraction over the memory the CPU is wired to.
///
/// Implementors only provide byte access; word access is layered on top and
/// is always little-endian (byte 0 holds bits 0-7). Reads take `&self` since
/// nothing on this bus has read side effects.
pub trait Bus {
    fn load_byte(&self, address: Word) -> Byte;
    fn store_byte(&mut self, address: Word, value: Byte);

    /// Read the four bytes at `address..address + 4` as one word.
    fn load_word(&self, address: Word) -> Result<Word, CpuError> {
        check_word_span(address)?;
        let mut bytes = [0; WORD_BYTES as usize];
        for (offset, byte) in (0..).zip(bytes.iter_mut()) {
            *byte = self.load_byte(address + offset);
        }
        Ok(Word::from_le_bytes(bytes))
    }

    /// Split `value` into four bytes and write them starting at `address`.
    fn store_word(&mut self, address: Word, value: Word) -> Result<(), CpuError> {
        check_word_span(address)?;
        for (offset, byte) in (0..).zip(value.to_le_bytes()) {
            self.store_byte(address + offset, byte);
        }
        Ok(())
    }
}

/// A word must fit entirely below the top of the address space; it never
/// wraps around to address 0.
fn check_word_span(address: Word) -> Result<(), CpuError> {
    match address.checked_add(WORD_BYTES - 1) {
        Some(_) => Ok(()),
        None => Err(CpuError::AddressOverflow { address }),
    }
}

/// Sparse byte-addressable memory covering the full 32-bit address space.
///
/// Only bytes that have been written are materialised, so programs are free
/// to touch addresses such as `0x7654_3210` without allocating gigabytes.
/// Unwritten addresses read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    bytes: HashMap<Word, Byte>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into memory starting at `address`.
    ///
    /// Fails without writing anything if the slice would run past the top of
    /// the address space.
    pub fn store_bytes(&mut self, address: Word, bytes: &[Byte]) -> Result<(), CpuError> {
        let end = u64::from(address) + bytes.len() as u64;
        if end > u64::from(Word::MAX) + 1 {
            return Err(CpuError::AddressOverflow { address });
        }
        for (offset, &byte) in (0..).zip(bytes) {
            self.store_byte(address + offset, byte);
        }
        Ok(())
    }

    /// Number of bytes that have been written at least once.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Bus for Memory {
    #[inline]
    fn load_byte(&self, address: Word) -> Byte {
        self.bytes.get(&address).copied().unwrap_or(0)
    }

    #[inline]
    fn store_byte(&mut self, address: Word, value: Byte) {
        self.bytes.insert(address, value);
    }
}

impl FromIterator<(Word, Byte)> for Memory {
    fn from_iter<I: IntoIterator<Item = (Word, Byte)>>(iter: I) -> Self {
        Self {
            bytes: iter.into_iter().collect(),
        }
    }
}
