use std::io::{self, BufRead, Write};

use vm8::constants::KEY_COUNT;
use vm8::{Instruction, Machine};

const MEMORY_ROW: usize = 32;

/// What the run loop should do once the console closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Run one cycle, then open the console again
    Continue,
    /// Leave debug mode and run freely
    Detach,
}

/// # Debugger
/// An interactive console over the machine's inspection surface.
///
/// It is only ever entered between cycles. Apart from pressing a key it
/// reads state and never changes it.
pub struct Debugger<R, W> {
    input: R,
    output: W,
}

impl Debugger<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Debugger::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Debugger<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Debugger { input, output }
    }

    /// Prints a summary of the machine and serves the menu until the user
    /// continues or leaves debug mode. End of input leaves debug mode.
    pub fn inspect(&mut self, machine: &mut Machine) -> io::Result<Resume> {
        self.summary(machine)?;
        loop {
            writeln!(
                self.output,
                "1 - Memory, 2 - Registers, 3 - Screen, 4 - Stack, 5 - Keys, \
                 6 - Press Key, 7 - Continue, 8 - Exit Debug"
            )?;
            let choice = match self.prompt("Input the number of what you would like to view: ")? {
                Some(choice) => choice,
                None => return Ok(Resume::Detach),
            };
            match choice.as_str() {
                "1" => self.memory(machine)?,
                "2" => self.registers(machine)?,
                "3" => self.screen(machine)?,
                "4" => self.stack(machine)?,
                "5" => self.keys(machine)?,
                "6" => {
                    if !self.press_key(machine)? {
                        return Ok(Resume::Detach);
                    }
                }
                "7" => return Ok(Resume::Continue),
                "8" => return Ok(Resume::Detach),
                _ => writeln!(self.output, "Invalid input!")?,
            }
        }
    }

    /// Writes `message` and reads a trimmed line, `None` at end of input
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn summary(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "{}", "-".repeat(58))?;
        match machine.next_opcode() {
            Ok(op) => match Instruction::decode(op) {
                Ok(instruction) => writeln!(self.output, "Next Opcode: {:#06X} {}", op, instruction)?,
                Err(unknown) => writeln!(self.output, "Next Opcode: {}", unknown)?,
            },
            Err(e) => writeln!(self.output, "Next Opcode: {}", e)?,
        }
        writeln!(self.output, "I = {:#05X}", machine.index_register())?;
        writeln!(self.output, "PC = {:#05X}", machine.program_counter())?;
        writeln!(self.output, "SP = {}", machine.stack().len())?;
        writeln!(self.output, "Delay Timer = {}", machine.delay_timer())?;
        writeln!(self.output, "Sound Timer = {}", machine.sound_timer())?;
        writeln!(self.output)
    }

    fn memory(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "Memory:")?;
        for (row, bytes) in machine.memory().chunks(MEMORY_ROW).enumerate() {
            write!(self.output, "{:03X}:", row * MEMORY_ROW)?;
            for byte in bytes {
                write!(self.output, " {:02X}", byte)?;
            }
            writeln!(self.output)?;
        }
        writeln!(self.output)
    }

    fn registers(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "Registers:")?;
        for (index, value) in machine.registers().iter().enumerate() {
            writeln!(self.output, "V{:X} = {:#04X}", index, value)?;
        }
        writeln!(self.output)
    }

    fn screen(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "Screen:")?;
        for row in machine.frame_buffer().iter() {
            let line: String = row
                .iter()
                .map(|&pixel| if pixel == 1 { '#' } else { '.' })
                .collect();
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output)
    }

    fn stack(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "Stack:")?;
        for (depth, address) in machine.stack().iter().enumerate() {
            writeln!(self.output, "Stack {} = {:#05X}", depth, address)?;
        }
        writeln!(self.output)
    }

    fn keys(&mut self, machine: &Machine) -> io::Result<()> {
        writeln!(self.output, "Keys:")?;
        for (index, &pressed) in machine.keys().iter().enumerate() {
            let status = if pressed { "pressed" } else { "released" };
            writeln!(self.output, "Key {:X} = {}", index, status)?;
        }
        writeln!(self.output)
    }

    /// Returns false at end of input
    fn press_key(&mut self, machine: &mut Machine) -> io::Result<bool> {
        let answer = match self.prompt("Which key to press? (0 - F) ")? {
            Some(answer) => answer,
            None => return Ok(false),
        };
        match u8::from_str_radix(&answer, 16) {
            Ok(key) if usize::from(key) < KEY_COUNT => {
                machine.set_key(key, true);
                writeln!(self.output, "Key {:X} pressed!", key)?;
            }
            _ => writeln!(self.output, "Invalid input!")?,
        }
        Ok(true)
    }
}
