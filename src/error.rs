use thiserror::Error;

/// Reasons a program image can be rejected by `Machine::load_program`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("program image is {size} bytes but only {capacity} bytes are available")]
    CapacityExceeded { size: usize, capacity: usize },

    #[error("program image is empty")]
    EmptyProgram,
}

/// Machine-state violations. Every variant ends the run; the machine is left
/// as it was before the failing cycle.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("program counter {pc:#06X} is outside addressable memory")]
    OutOfBoundsFetch { pc: u16 },

    #[error("stack overflow: subroutine call at {pc:#06X} with a full stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },
}

/// An instruction word that decodes to no known instruction.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unknown opcode {0:#06X}")]
pub struct UnknownOpcode(pub u16);
