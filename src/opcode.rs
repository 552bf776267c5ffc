/// # Opcodes
///
/// Instruction words are 16 bits, fetched big-endian from two consecutive bytes.
///
/// The top nibble picks one of sixteen families. Families `0x0`, `0x8`, `0xE`
/// and `0xF` narrow further on the low nibble or the low byte.
///
/// Operand fields sit at fixed positions:
/// - `[_x__]` target register Vx, or the last register of a range V0..=Vx
/// - `[__y_]` source register Vy
/// - `[___n]` a 4-bit immediate (sprite height)
/// - `[__kk]` an 8-bit immediate
/// - `[_nnn]` a 12-bit address
pub trait Opcode {
    /// The word split into its four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[f___]`
    fn family(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn family(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0xF) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
