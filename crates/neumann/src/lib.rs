mod disasm;

pub use disasm::{disassemble, DisassembledLine};

use anyhow::{bail, Context, Result};
use neumann_cpu::{Bus, Byte, Cpu, Instruction, Memory, RegisterFile, Word};
use typed_builder::TypedBuilder;

/// Step bound applied when the caller does not pick one.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// How a program is placed in memory and how long it may run.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    /// Address the program image is copied to.
    #[builder(default = 0)]
    pub load_address: Word,
    /// First instruction to execute; defaults to `load_address`.
    #[builder(default)]
    pub entry_point: Option<Word>,
    /// Abort with an error after this many steps. `None` runs until HALT.
    #[builder(default = Some(DEFAULT_MAX_STEPS))]
    pub max_steps: Option<u64>,
    /// Log every executed instruction at info level.
    #[builder(default = false)]
    pub trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RunConfig {
    pub fn entry(&self) -> Word {
        self.entry_point.unwrap_or(self.load_address)
    }
}

/// Final machine state after a program reached HALT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub steps: u64,
    /// Address of the HALT instruction the run stopped on.
    pub program_counter: Word,
    pub registers: RegisterFile,
}

/// Copy a raw program image into memory.
pub fn load_program(memory: &mut Memory, address: Word, program: &[Byte]) -> Result<()> {
    memory.store_bytes(address, program).with_context(|| {
        format!(
            "program of {} bytes does not fit at 0x{address:08X}",
            program.len()
        )
    })
}

/// Build a CPU with `program` loaded and PC on the configured entry point.
pub fn boot(config: &RunConfig, program: &[Byte]) -> Result<Cpu> {
    let mut memory = Memory::new();
    load_program(&mut memory, config.load_address, program)?;
    let mut cpu = Cpu::new(memory);
    cpu.set_program_counter(config.entry());
    log::info!(
        "loaded {} bytes at 0x{:08X}, entry 0x{:08X}",
        program.len(),
        config.load_address,
        config.entry()
    );
    Ok(cpu)
}

/// Step `cpu` until the instruction at PC is HALT.
///
/// The HALT itself is never executed, so the report's program counter points
/// at it.
pub fn run_cpu<B: Bus>(cpu: &mut Cpu<B>, config: &RunConfig) -> Result<RunReport> {
    let mut steps = 0u64;
    while !cpu.at_halt() {
        let pc = cpu.program_counter();
        if let Some(limit) = config.max_steps {
            if steps >= limit {
                bail!("step limit of {limit} reached at PC=0x{pc:08X} without HALT");
            }
        }

        cpu.step()
            .with_context(|| format!("CPU fault at PC=0x{pc:08X} after {steps} steps"))?;
        steps += 1;

        if config.trace {
            if let Ok(instruction) = Instruction::decode(cpu.instruction_register()) {
                let text = instruction.to_string();
                log::info!("0x{pc:08X}: {text:<32} {}", cpu.registers());
            }
        }
    }

    log::info!(
        "halted at PC=0x{:08X} after {steps} steps",
        cpu.program_counter()
    );
    Ok(RunReport {
        steps,
        program_counter: cpu.program_counter(),
        registers: *cpu.registers(),
    })
}

/// Load and run a program from scratch, returning the CPU for inspection.
pub fn run(config: &RunConfig, program: &[Byte]) -> Result<(Cpu, RunReport)> {
    let mut cpu = boot(config, program)?;
    let report = run_cpu(&mut cpu, config)?;
    Ok((cpu, report))
}
