use std::ops::Range;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_SET, KEY_COUNT, MEMORY_SIZE, PROGRAM_ORIGIN,
    REGISTER_COUNT, STACK_SIZE,
};
use crate::error::MachineError;

/// The architectural state of the machine
///
/// ## CPU
/// Registers
/// - (v) 16 8-bit registers (V0..VF)
///     - V0..VE are general purpose
///     - VF is the carry/borrow/collision flag
/// - (i) a 16-bit index register used for memory-indexed operations
///
/// Counter
/// - (pc) a 16-bit program counter, starting at the program origin
///
/// Stack
/// - (stack) 16 return addresses
/// - (sp) the number of addresses currently pushed
///
/// Timers
/// - 2 8-bit timers (delay & sound), each decremented once per cycle while non-zero
///
/// ## Memory
/// - 4096 bytes of addressable memory, the font occupying the first 80
/// - a 64x32 frame buffer of binary pixels
///
/// ## Input
/// - the pressed status of keys 0..F
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub redraw_pending: bool,
    pub keys: [bool; KEY_COUNT],
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..FONT_SET.len()].copy_from_slice(&FONT_SET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_ORIGIN,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            redraw_pending: false,
            keys: [false; KEY_COUNT],
        }
    }

    /// The addresses `start..start + len`, provided they all lie in memory.
    pub fn span(&self, start: u16, len: usize) -> Result<Range<usize>, MachineError> {
        let start = usize::from(start);
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(MachineError::MemoryOutOfBounds {
                address: MEMORY_SIZE.max(start),
            });
        }
        Ok(start..end)
    }

    pub fn push(&mut self, address: u16) -> Result<(), MachineError> {
        let slot = usize::from(self.sp);
        if slot >= STACK_SIZE {
            return Err(MachineError::StackOverflow { pc: self.pc });
        }
        self.stack[slot] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, MachineError> {
        if self.sp == 0 {
            return Err(MachineError::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[usize::from(self.sp)])
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The FrameBuffer is indexed as [y][x]; every pixel is 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
