//! Pause/step/stop flags shared between the input side and the tick loop.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct ControlState {
    running: bool,
    paused: bool,
    step_armed: bool,
}

/// Cloneable handle over the run-loop flags
#[derive(Debug, Clone)]
pub struct ControlHandle {
    state: Arc<Mutex<ControlState>>,
}

impl ControlHandle {
    pub fn new() -> Self {
        Self::with_paused(false)
    }

    pub fn with_paused(paused: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControlState {
                running: true,
                paused,
                step_armed: false,
            })),
        }
    }

    /// Flip the pause flag; returns the new value
    pub fn toggle_pause(&self) -> bool {
        let mut state = self.state.lock();
        state.paused = !state.paused;
        state.paused
    }

    /// Arm a single tick, honoured even while paused
    pub fn step_once(&self) {
        self.state.lock().step_armed = true;
    }

    pub fn stop(&self) {
        self.state.lock().running = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Whether the next tick may run. Consumes an armed step.
    pub fn take_tick_permit(&self) -> bool {
        let mut state = self.state.lock();
        if !state.running {
            return false;
        }
        let permitted = !state.paused || state.step_armed;
        state.step_armed = false;
        permitted
    }
}

impl Default for ControlHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_unpaused_always_permits() {
        let controls = ControlHandle::new();
        assert!(controls.take_tick_permit());
        assert!(controls.take_tick_permit());
    }

    #[test]
    fn test_pause_blocks_until_step() {
        let controls = ControlHandle::new();
        assert!(controls.toggle_pause());
        assert!(!controls.take_tick_permit());

        controls.step_once();
        assert!(controls.take_tick_permit());
        // One-shot
        assert!(!controls.take_tick_permit());

        assert!(!controls.toggle_pause());
        assert!(controls.take_tick_permit());
    }

    #[test]
    fn test_step_while_running_is_consumed() {
        let controls = ControlHandle::new();
        controls.step_once();
        assert!(controls.take_tick_permit());
        controls.toggle_pause();
        assert!(!controls.take_tick_permit());
    }

    #[test]
    fn test_stop_overrides_everything() {
        let controls = ControlHandle::with_paused(true);
        let remote = controls.clone();
        controls.step_once();
        remote.stop();

        assert!(!controls.is_running());
        assert!(!controls.take_tick_permit());
    }

    #[test]
    fn test_handle_is_shared_across_threads() {
        let controls = ControlHandle::new();
        let remote = controls.clone();
        std::thread::spawn(move || {
            remote.toggle_pause();
        })
        .join()
        .unwrap();

        assert!(controls.is_paused());
    }
}
