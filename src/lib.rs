//! A CHIP-8 interpreter core.
//!
//! [`Machine`] owns the whole architectural state and advances one instruction
//! per [`Machine::step`]. Loading files, presenting frames, playing sound and
//! reading the host keyboard are left to the caller.

pub use error::{LoadError, MachineError, UnknownOpcode};
pub use instruction::Instruction;
pub use machine::{Cycle, Machine};
pub use state::FrameBuffer;

pub mod constants;
mod error;
mod instruction;
mod machine;
mod opcode;
mod operations;
mod state;
