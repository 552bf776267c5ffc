use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, GLYPH_SIZE, KEY_COUNT};
use crate::error::MachineError;
use crate::state::State;

/// Where the program counter goes once an operation has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = addr
    Jump(u16),
    /// pc is left alone and the same word is fetched next cycle
    Hold,
}

pub type Outcome = Result<Advance, MachineError>;

fn skip_if(condition: bool) -> Outcome {
    Ok(if condition { Advance::Skip } else { Advance::Next })
}

fn key_pressed(state: &State, x: u8) -> bool {
    state.keys[usize::from(state.v[usize::from(x)]) % KEY_COUNT]
}

/// clear
pub fn clr(state: &mut State) -> Outcome {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.redraw_pending = true;
    Ok(Advance::Next)
}

/// PC = STACK.pop() + 2
pub fn rts(state: &mut State) -> Outcome {
    let call_site = state.pop()?;
    Ok(Advance::Jump(call_site + 0x2))
}

/// PC = addr
pub fn jump(addr: u16) -> Outcome {
    Ok(Advance::Jump(addr))
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Outcome {
    state.push(state.pc)?;
    Ok(Advance::Jump(addr))
}

/// if Vx == kk then skip
pub fn ske(state: &State, x: u8, kk: u8) -> Outcome {
    skip_if(state.v[usize::from(x)] == kk)
}

/// if Vx != kk then skip
pub fn skne(state: &State, x: u8, kk: u8) -> Outcome {
    skip_if(state.v[usize::from(x)] != kk)
}

/// if Vx == Vy then skip
pub fn skre(state: &State, x: u8, y: u8) -> Outcome {
    skip_if(state.v[usize::from(x)] == state.v[usize::from(y)])
}

/// if Vx != Vy then skip
pub fn skrne(state: &State, x: u8, y: u8) -> Outcome {
    skip_if(state.v[usize::from(x)] != state.v[usize::from(y)])
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, kk: u8) -> Outcome {
    state.v[usize::from(x)] = kk;
    Ok(Advance::Next)
}

/// Vx += kk
/// Overflow wraps and VF is left alone
pub fn add(state: &mut State, x: u8, kk: u8) -> Outcome {
    let vx = &mut state.v[usize::from(x)];
    *vx = vx.wrapping_add(kk);
    Ok(Advance::Next)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Outcome {
    state.v[usize::from(x)] = state.v[usize::from(y)];
    Ok(Advance::Next)
}

/// Vx |= Vy; VF = 0
pub fn or(state: &mut State, x: u8, y: u8) -> Outcome {
    logical(state, x, y, |a, b| a | b)
}

/// Vx &= Vy; VF = 0
pub fn and(state: &mut State, x: u8, y: u8) -> Outcome {
    logical(state, x, y, |a, b| a & b)
}

/// Vx ^= Vy; VF = 0
pub fn xor(state: &mut State, x: u8, y: u8) -> Outcome {
    logical(state, x, y, |a, b| a ^ b)
}

fn logical(state: &mut State, x: u8, y: u8, op: fn(u8, u8) -> u8) -> Outcome {
    let res = op(state.v[usize::from(x)], state.v[usize::from(y)]);
    state.v[usize::from(x)] = res;
    state.v[FLAG_REGISTER] = 0x0;
    Ok(Advance::Next)
}

/// Writes an ALU result to Vx and then the flag to VF, so the flag survives
/// when x is VF.
fn set_with_flag(state: &mut State, x: u8, res: u8, flag: bool) -> Outcome {
    state.v[usize::from(x)] = res;
    state.v[FLAG_REGISTER] = u8::from(flag);
    Ok(Advance::Next)
}

/// Vx += Vy; VF = carry
pub fn addr(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, carry) = state.v[usize::from(x)].overflowing_add(state.v[usize::from(y)]);
    set_with_flag(state, x, res, carry)
}

/// Vx -= Vy; VF = !borrow
pub fn sub(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, borrow) = state.v[usize::from(x)].overflowing_sub(state.v[usize::from(y)]);
    set_with_flag(state, x, res, !borrow)
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, borrow) = state.v[usize::from(y)].overflowing_sub(state.v[usize::from(x)]);
    set_with_flag(state, x, res, !borrow)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: u8) -> Outcome {
    let vx = state.v[usize::from(x)];
    set_with_flag(state, x, vx >> 1, vx & 0x1 == 0x1)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: u8) -> Outcome {
    let vx = state.v[usize::from(x)];
    set_with_flag(state, x, vx << 1, vx & 0x80 == 0x80)
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Outcome {
    state.i = addr;
    Ok(Advance::Next)
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> Outcome {
    Ok(Advance::Jump(addr + u16::from(state.v[0x0])))
}

/// Vx = random_byte & kk
pub fn rand(state: &mut State, x: u8, kk: u8, random_byte: u8) -> Outcome {
    state.v[usize::from(x)] = random_byte & kk;
    Ok(Advance::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite in memory I..I+n onto the FrameBuffer at (Vx, Vy).
/// Both coordinates wrap around the edges of the screen.
/// VF is set if any lit pixel was erased anywhere in the sprite.
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Outcome {
    let rows = state.span(state.i, usize::from(n))?;
    let origin_x = usize::from(state.v[usize::from(x)]);
    let origin_y = usize::from(state.v[usize::from(y)]);
    let mut collision = false;

    for (row, address) in rows.enumerate() {
        let sprite_row = state.memory[address];
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite_row & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel == 1;
            *pixel ^= 1;
        }
    }

    state.v[FLAG_REGISTER] = u8::from(collision);
    state.redraw_pending = true;
    Ok(Advance::Next)
}

/// if Vx.pressed then skip
pub fn skpr(state: &State, x: u8) -> Outcome {
    skip_if(key_pressed(state, x))
}

/// if !Vx.pressed then skip
pub fn skup(state: &State, x: u8) -> Outcome {
    skip_if(!key_pressed(state, x))
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) -> Outcome {
    state.v[usize::from(x)] = state.delay_timer;
    Ok(Advance::Next)
}

/// Vx = highest pressed key, or hold until one is pressed
pub fn keyd(state: &mut State, x: u8) -> Outcome {
    match state.keys.iter().rposition(|&pressed| pressed) {
        Some(key) => {
            state.v[usize::from(x)] = key as u8;
            Ok(Advance::Next)
        }
        None => Ok(Advance::Hold),
    }
}

/// DT = Vx
pub fn loads(state: &mut State, x: u8) -> Outcome {
    state.delay_timer = state.v[usize::from(x)];
    Ok(Advance::Next)
}

/// ST = Vx
pub fn ld(state: &mut State, x: u8) -> Outcome {
    state.sound_timer = state.v[usize::from(x)];
    Ok(Advance::Next)
}

/// I += Vx
/// VF is left alone
pub fn addi(state: &mut State, x: u8) -> Outcome {
    state.i = state.i.wrapping_add(u16::from(state.v[usize::from(x)]));
    Ok(Advance::Next)
}

/// I = (Vx & 0xF) * 5
/// Point I at the font glyph for the low nibble of Vx
pub fn ldspr(state: &mut State, x: u8) -> Outcome {
    state.i = u16::from(state.v[usize::from(x)] & 0xF) * GLYPH_SIZE;
    Ok(Advance::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Hundreds, tens and ones digits of Vx
pub fn bcd(state: &mut State, x: u8) -> Outcome {
    let target = state.span(state.i, 3)?;
    let vx = state.v[usize::from(x)];
    state.memory[target].copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(Advance::Next)
}

/// mem[I..=I+x] = V0..=Vx
/// I is left unchanged
pub fn stor(state: &mut State, x: u8) -> Outcome {
    let count = usize::from(x) + 1;
    let target = state.span(state.i, count)?;
    state.memory[target].copy_from_slice(&state.v[..count]);
    Ok(Advance::Next)
}

/// V0..=Vx = mem[I..=I+x]
/// I is left unchanged
pub fn read(state: &mut State, x: u8) -> Outcome {
    let count = usize::from(x) + 1;
    let source = state.span(state.i, count)?;
    state.v[..count].copy_from_slice(&state.memory[source]);
    Ok(Advance::Next)
}
