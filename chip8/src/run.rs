use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use vm8::Machine;

use crate::audio::Beeper;
use crate::config::Config;
use crate::debugger::{Debugger, Resume};
use crate::keymap::keypad_index;

const TITLE: &str = "Emu-8";

/// Reads a program image from disk into the machine
fn load_rom(machine: &mut Machine, rom: &Path) -> Result<()> {
    let program = fs::read(rom).with_context(|| format!("unable to read {}", rom.display()))?;
    machine
        .load_program(&program)
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!("loaded {} ({} bytes)", rom.display(), program.len());
    Ok(())
}

pub fn run(config: &Config) -> Result<()> {
    let mut machine = match config.seed {
        Some(seed) => Machine::with_seed(seed),
        None => Machine::new(),
    };
    load_rom(&mut machine, &config.rom)?;

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = Display::new(&sdl, TITLE, config.scale).map_err(anyhow::Error::msg)?;
    let mut beeper = Beeper::new(&sdl).map_err(anyhow::Error::msg)?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    let mut debugger = Debugger::stdio();
    let mut debugging = config.debug;

    // Set initial timing
    let cycle_time = config.cycle_time();
    let mut last_cycle = Instant::now();

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keypad_index(key)) {
                    (_, Some(index)) => machine.set_key(index, true),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::F1, _) => debugging = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keypad_index(key)) {
                    (_, Some(index)) => machine.set_key(index, false),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        if debugging && debugger.inspect(&mut machine)? == Resume::Detach {
            info!("leaving debug mode");
            debugging = false;
        }

        // Update state
        if let Err(e) = machine.step() {
            error!("machine halted: {}", e);
            return Err(e).context("machine halted");
        }

        // If the draw flag is set, take it and render the current frame
        if machine.take_redraw_flag() {
            display
                .render(machine.frame_buffer())
                .map_err(anyhow::Error::msg)?;
        }
        beeper.update(machine.sound_timer());

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    Ok(())
}
