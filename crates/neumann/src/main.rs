use anyhow::{bail, Context, Result};
use neumann::{RunConfig, DEFAULT_MAX_STEPS};
use neumann_cpu::Word;

const USAGE: &str = "Usage: neumann <program.bin> [--load <addr>] [--entry <addr>] \
                     [--max-steps <n>] [--trace] [--disasm]\n\
                     Numbers may be decimal or 0x-prefixed hex; --max-steps 0 disables the limit.";

struct Args {
    program_path: String,
    config: RunConfig,
    disasm: bool,
}

fn parse_number(text: &str) -> Result<u64> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid number '{text}'"))
}

fn parse_address(text: &str) -> Result<Word> {
    let value = parse_number(text)?;
    Word::try_from(value).with_context(|| format!("address '{text}' does not fit in 32 bits"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut program_path = None;
    let mut load_address = 0;
    let mut entry_point = None;
    let mut max_steps = Some(DEFAULT_MAX_STEPS);
    let mut trace = false;
    let mut disasm = false;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--load" => load_address = parse_address(&value("--load")?)?,
            "--entry" => entry_point = Some(parse_address(&value("--entry")?)?),
            "--max-steps" => {
                max_steps = match parse_number(&value("--max-steps")?)? {
                    0 => None,
                    n => Some(n),
                }
            }
            "--trace" => trace = true,
            "--disasm" => disasm = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            path => {
                if program_path.replace(path.to_string()).is_some() {
                    bail!("more than one program path given\n{USAGE}");
                }
            }
        }
    }

    let Some(program_path) = program_path else {
        bail!("no program path provided\n{USAGE}");
    };
    let config = RunConfig::builder()
        .load_address(load_address)
        .entry_point(entry_point)
        .max_steps(max_steps)
        .trace(trace)
        .build();
    Ok(Args {
        program_path,
        config,
        disasm,
    })
}

fn try_main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    log::info!("Running program: '{}'", args.program_path);
    let program = std::fs::read(&args.program_path)
        .with_context(|| format!("failed to read program file '{}'", args.program_path))?;

    if args.disasm {
        let cpu = neumann::boot(&args.config, &program)?;
        let slots = program.len().div_ceil(neumann_cpu::INSTRUCTION_LENGTH as usize);
        for line in neumann::disassemble(cpu.memory(), args.config.load_address, slots) {
            println!("{line}");
        }
        return Ok(());
    }

    let (_cpu, report) = neumann::run(&args.config, &program)?;
    println!(
        "halted at PC=0x{:08X} after {} steps",
        report.program_counter, report.steps
    );
    for (register, value) in report.registers.iter() {
        println!("{register} = 0x{value:08X} ({value})");
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
