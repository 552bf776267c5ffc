use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_ORIGIN, REGISTER_COUNT};
use crate::error::{LoadError, MachineError};
use crate::instruction::Instruction;
use crate::operations::{self, Advance, Outcome};
use crate::state::{FrameBuffer, State};

/// What a single `step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// The instruction ran to completion
    Executed(Instruction),
    /// A key wait found no pressed key; the same instruction runs again next step
    AwaitingKey,
    /// The word decoded to nothing and was skipped
    Unknown(u16),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns its whole architectural `state` plus the random source used by `Cxkk`.
///
/// Supplies interfaces for:
/// - loading programs
/// - advancing by one instruction
/// - pressing and releasing keys
/// - inspecting the frame buffer, timers and registers from outside
#[derive(Clone)]
pub struct Machine {
    state: State,
    rng: StdRng,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            state: State::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A machine whose random instruction yields a reproducible sequence
    pub fn with_seed(seed: u64) -> Self {
        Machine {
            state: State::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Puts every register, timer, pixel and byte of memory back to its
    /// freshly constructed value. The random source carries on.
    pub fn reset(&mut self) {
        self.state = State::new();
    }

    /// Copies a program image into memory at the program origin.
    ///
    /// Memory is untouched when the image is rejected.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.is_empty() {
            return Err(LoadError::EmptyProgram);
        }
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::CapacityExceeded {
                size: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }
        let origin = usize::from(PROGRAM_ORIGIN);
        self.state.memory[origin..origin + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), origin);
        Ok(())
    }

    /// Advances the machine by a single cycle
    /// - fetches, decodes and executes the word at the pc
    /// - decrements each non-zero timer once, whatever ran
    ///
    /// A fatal error leaves the machine as it was before the call.
    pub fn step(&mut self) -> Result<Cycle, MachineError> {
        let op = self.next_opcode()?;
        let cycle = match Instruction::decode(op) {
            Ok(instruction) => {
                trace!(
                    "{:04X} {} v{:02X?} i{:04X} pc{:04X}",
                    op,
                    instruction,
                    self.state.v,
                    self.state.i,
                    self.state.pc
                );
                match self.execute(instruction)? {
                    Advance::Next => self.state.pc += 0x2,
                    Advance::Skip => self.state.pc += 0x4,
                    Advance::Jump(addr) => self.state.pc = addr,
                    Advance::Hold => {
                        self.tick_timers();
                        return Ok(Cycle::AwaitingKey);
                    }
                }
                Cycle::Executed(instruction)
            }
            Err(unknown) => {
                warn!("{} at {:#06X}, skipping", unknown, self.state.pc);
                self.state.pc += 0x2;
                Cycle::Unknown(op)
            }
        };
        self.tick_timers();
        Ok(cycle)
    }

    fn execute(&mut self, instruction: Instruction) -> Outcome {
        let state = &mut self.state;
        match instruction {
            Instruction::Clear => operations::clr(state),
            Instruction::Return => operations::rts(state),
            Instruction::Jump { addr } => operations::jump(addr),
            Instruction::Call { addr } => operations::call(state, addr),
            Instruction::SkipEqImm { x, kk } => operations::ske(state, x, kk),
            Instruction::SkipNeImm { x, kk } => operations::skne(state, x, kk),
            Instruction::SkipEqReg { x, y } => operations::skre(state, x, y),
            Instruction::LoadImm { x, kk } => operations::load(state, x, kk),
            Instruction::AddImm { x, kk } => operations::add(state, x, kk),
            Instruction::Move { x, y } => operations::mv(state, x, y),
            Instruction::Or { x, y } => operations::or(state, x, y),
            Instruction::And { x, y } => operations::and(state, x, y),
            Instruction::Xor { x, y } => operations::xor(state, x, y),
            Instruction::AddReg { x, y } => operations::addr(state, x, y),
            Instruction::Sub { x, y } => operations::sub(state, x, y),
            Instruction::ShiftRight { x, .. } => operations::shr(state, x),
            Instruction::SubN { x, y } => operations::subn(state, x, y),
            Instruction::ShiftLeft { x, .. } => operations::shl(state, x),
            Instruction::SkipNeReg { x, y } => operations::skrne(state, x, y),
            Instruction::LoadIndex { addr } => operations::loadi(state, addr),
            Instruction::JumpOffset { addr } => operations::jumpi(state, addr),
            Instruction::Random { x, kk } => operations::rand(state, x, kk, self.rng.gen()),
            Instruction::Draw { x, y, n } => operations::draw(state, x, y, n),
            Instruction::SkipKeyPressed { x } => operations::skpr(state, x),
            Instruction::SkipKeyReleased { x } => operations::skup(state, x),
            Instruction::ReadDelay { x } => operations::moved(state, x),
            Instruction::WaitKey { x } => operations::keyd(state, x),
            Instruction::SetDelay { x } => operations::loads(state, x),
            Instruction::SetSound { x } => operations::ld(state, x),
            Instruction::AddIndex { x } => operations::addi(state, x),
            Instruction::LoadGlyph { x } => operations::ldspr(state, x),
            Instruction::StoreBcd { x } => operations::bcd(state, x),
            Instruction::StoreRegisters { x } => operations::stor(state, x),
            Instruction::LoadRegisters { x } => operations::read(state, x),
        }
    }

    fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// The word the pc points at.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn next_opcode(&self) -> Result<u16, MachineError> {
        let pc = usize::from(self.state.pc);
        if pc + 1 >= MEMORY_SIZE {
            return Err(MachineError::OutOfBoundsFetch { pc: self.state.pc });
        }
        Ok(u16::from_be_bytes([
            self.state.memory[pc],
            self.state.memory[pc + 1],
        ]))
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the frame buffer changed since it was last taken; clears the flag
    pub fn take_redraw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.state.redraw_pending, false)
    }

    pub fn redraw_pending(&self) -> bool {
        self.state.redraw_pending
    }

    pub fn clear_redraw_flag(&mut self) {
        self.state.redraw_pending = false;
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the keypad index, 0x0..=0xF
    /// * `pressed` whether the key is held down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.keys.get_mut(usize::from(key)) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {:#X}, keypad has {} keys", key, KEY_COUNT),
        }
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.state.keys
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.state.v
    }

    pub fn index_register(&self) -> u16 {
        self.state.i
    }

    pub fn program_counter(&self) -> u16 {
        self.state.pc
    }

    /// The pushed return addresses, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.state.stack[..usize::from(self.state.sp)]
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
