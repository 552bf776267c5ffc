use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Parser};

/// Cycles per second when none is given
pub const CLOCK_HZ: u32 = 500;

/// Window pixels per Chip-8 pixel when none is given
pub const SCALE: u32 = 10;

#[derive(Parser, Debug)]
#[command(name = "chip8", about = "Runs a CHIP-8 program in an SDL2 window.")]
pub struct Config {
    /// Program image, loaded verbatim at 0x200.
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// Cycles per second. The delay and sound timers tick once per cycle.
    #[arg(long, default_value_t = CLOCK_HZ, value_parser = value_parser!(u32).range(1..))]
    pub hz: u32,

    /// Window pixels per Chip-8 pixel.
    #[arg(long, default_value_t = SCALE, value_parser = value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Seed for the random instruction, for reproducible runs.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Open the inspection console before the first cycle.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Wall-clock time one cycle should take
    pub fn cycle_time(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["chip8", "pong.ch8"]).unwrap();
        assert_eq!(config.rom, PathBuf::from("pong.ch8"));
        assert_eq!(config.hz, CLOCK_HZ);
        assert_eq!(config.scale, SCALE);
        assert_eq!(config.seed, None);
        assert!(!config.debug);
        assert_eq!(config.cycle_time(), Duration::from_millis(2));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "chip8", "--hz", "60", "--scale", "4", "--seed", "9", "--debug", "maze.ch8",
        ])
        .unwrap();
        assert_eq!(config.hz, 60);
        assert_eq!(config.scale, 4);
        assert_eq!(config.seed, Some(9));
        assert!(config.debug);
    }

    #[test]
    fn test_rejects_zero_hz() {
        assert!(Config::try_parse_from(["chip8", "--hz", "0", "pong.ch8"]).is_err());
    }

    #[test]
    fn test_requires_rom() {
        assert!(Config::try_parse_from(["chip8"]).is_err());
    }
}
