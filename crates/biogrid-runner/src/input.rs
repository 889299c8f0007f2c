//! Keyboard commands read line by line from stdin.

use biogrid_world::ControlHandle;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Step,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Command::TogglePause),
        "s" | "step" => Some(Command::Step),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub fn apply(controls: &ControlHandle, command: Command) {
    match command {
        Command::TogglePause => {
            let paused = controls.toggle_pause();
            info!(paused, "Pause toggled");
        }
        Command::Step => {
            controls.step_once();
            debug!("Single step armed");
        }
        Command::Quit => {
            info!("Quit requested");
            controls.stop();
        }
    }
}

/// Poll stdin on a dedicated thread; a blocking read must not hold up runtime shutdown.
pub fn spawn_input_thread(controls: ControlHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            };

            match parse_command(&line) {
                Some(command) => apply(&controls, command),
                None if line.trim().is_empty() => {}
                None => warn!("Unknown command {:?} (p = pause, s = step, q = quit)", line.trim()),
            }

            if !controls.is_running() {
                break;
            }
        }
        debug!("Input thread finished");
    })
}
