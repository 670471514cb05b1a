use neumann::{boot, load_program, run, run_cpu, RunConfig};
use neumann_cpu::Register::*;
use neumann_cpu::{encode_program, Bus, CpuError, Instruction, Memory};

#[test]
fn runs_immediate_mov_store_program() {
    let program = encode_program(&[
        Instruction::load_immediate_1(R0, 0x0201),
        Instruction::load_immediate_2(R0, 0x0403),
        Instruction::mov(R1, R0),
        Instruction::store_direct(R1, 0x0100),
    ]);
    let (cpu, report) = run(&RunConfig::default(), &program).unwrap();

    assert_eq!(cpu.memory().load_word(0x0100), Ok(0x0403_0201));
    assert_eq!(report.steps, 4);
    assert_eq!(report.program_counter, 0x10);
    assert_eq!(report.registers[R1], 0x0403_0201);
}

#[test]
fn loads_at_configured_address_and_entry_point() {
    let program = encode_program(&[
        Instruction::load_immediate_1(R0, 0xAAAA),
        Instruction::load_immediate_1(R1, 0xBBBB),
        Instruction::halt(),
    ]);
    let config = RunConfig::builder()
        .load_address(0x1000)
        .entry_point(Some(0x1004))
        .build();
    let (_, report) = run(&config, &program).unwrap();

    assert_eq!(report.registers[R0], 0);
    assert_eq!(report.registers[R1], 0xBBBB);
    assert_eq!(report.program_counter, 0x1008);
}

#[test]
fn step_limit_stops_runaway_program() {
    let program = encode_program(&[Instruction::nop(), Instruction::jmp(0x0000)]);
    let config = RunConfig::builder().max_steps(Some(50)).build();
    let err = run(&config, &program).unwrap_err();

    assert!(err.to_string().contains("step limit of 50"), "{err:#}");
}

#[test]
fn cpu_fault_is_reported_with_address() {
    let mut program = encode_program(&[Instruction::nop()]);
    program.extend_from_slice(&[0x7F, 0x00, 0x00, 0x00]);
    let err = run(&RunConfig::default(), &program).unwrap_err();

    assert!(err.to_string().contains("PC=0x00000004"), "{err:#}");
    assert_eq!(
        err.downcast_ref::<CpuError>(),
        Some(&CpuError::UnknownOpcode { opcode: 0x7F })
    );
}

#[test]
fn program_that_does_not_fit_is_rejected() {
    let mut memory = Memory::new();
    let err = load_program(&mut memory, 0xFFFF_FFFE, &[0; 8]).unwrap_err();
    assert!(err.to_string().contains("does not fit"), "{err:#}");
    assert!(memory.is_empty());
}

#[test]
fn run_cpu_resumes_after_driver_skips_a_halt() {
    let program = encode_program(&[
        Instruction::load_immediate_1(R0, 1),
        Instruction::halt(),
        Instruction::load_immediate_1(R0, 2),
    ]);
    let config = RunConfig::default();
    let mut cpu = boot(&config, &program).unwrap();

    let first = run_cpu(&mut cpu, &config).unwrap();
    assert_eq!(first.registers[R0], 1);
    assert_eq!(first.program_counter, 4);

    cpu.set_program_counter(first.program_counter + 4);
    let second = run_cpu(&mut cpu, &config).unwrap();
    assert_eq!(second.registers[R0], 2);
    assert_eq!(second.steps, 1);
}

#[test]
fn countdown_loop_runs_to_completion() {
    let program = encode_program(&[
        Instruction::load_immediate_1(R0, 10),
        Instruction::load_immediate_1(R1, 1),
        Instruction::load_immediate_1(R2, 1),
        Instruction::load_immediate_1(R3, 2),
        Instruction::mul(R2, R3), // 0x0010
        Instruction::sub(R0, R1),
        Instruction::jnz(R0, 0x0010),
        Instruction::store_direct(R2, 0x0200),
    ]);
    let (cpu, report) = run(&RunConfig::default(), &program).unwrap();

    assert_eq!(cpu.memory().load_word(0x0200), Ok(1024));
    assert_eq!(report.steps, 4 + 3 * 10 + 1);
}

#[test]
fn execute_fault_leaves_pc_on_faulting_instruction() {
    let mut program = encode_program(&[
        Instruction::nop(),
        Instruction::load_indirect(R0, 0x0100),
    ]);
    program.resize(0x0100, 0);
    program.extend_from_slice(&0xFFFF_FFFDu32.to_le_bytes());
    let config = RunConfig::default();
    let mut cpu = boot(&config, &program).unwrap();

    let err = run_cpu(&mut cpu, &config).unwrap_err();
    assert!(err.to_string().contains("PC=0x00000004"), "{err:#}");
    assert_eq!(cpu.program_counter(), 4);
    assert_eq!(
        err.downcast_ref::<CpuError>(),
        Some(&CpuError::AddressOverflow {
            address: 0xFFFF_FFFD
        })
    );
}
