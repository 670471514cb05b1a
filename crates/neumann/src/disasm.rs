use std::fmt;

use neumann_cpu::{Bus, Instruction, Word, INSTRUCTION_LENGTH};

/// One instruction slot of a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisassembledLine {
    pub address: Word,
    pub word: Word,
    /// `None` when the word does not decode (unknown opcode or register).
    pub instruction: Option<Instruction>,
}

impl fmt::Display for DisassembledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b0, b1, b2, b3] = self.word.to_le_bytes();
        write!(
            f,
            "0x{:08X}  {b0:02X} {b1:02X} {b2:02X} {b3:02X}  ",
            self.address
        )?;
        match self.instruction {
            Some(instruction) => write!(f, "{instruction}"),
            None => write!(f, ".word 0x{:08X}", self.word),
        }
    }
}

/// Decode `count` consecutive instruction slots starting at `start`.
///
/// Stops early at the top of the address space.
pub fn disassemble<B: Bus>(bus: &B, start: Word, count: usize) -> Vec<DisassembledLine> {
    let mut lines = Vec::with_capacity(count);
    let mut address = start;
    for _ in 0..count {
        let Ok(word) = bus.load_word(address) else {
            break;
        };
        lines.push(DisassembledLine {
            address,
            word,
            instruction: Instruction::decode(word).ok(),
        });
        match address.checked_add(INSTRUCTION_LENGTH) {
            Some(next) => address = next,
            None => break,
        }
    }
    lines
}
