//! Drones and their per-tick control intent.

use serde::{Deserialize, Serialize};

/// Controller inputs a drone should hold until told otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlIntent {
    pub throttle: f32,
    pub steer: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
    pub handbrake: bool,
}

impl ControlIntent {
    pub fn boosting() -> Self {
        Self {
            boost: true,
            ..Default::default()
        }
    }
    pub fn with_throttle(mut self, throttle: f32) -> Self {
        self.throttle = throttle.clamp(-1.0, 1.0);
        self
    }
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch.clamp(-1.0, 1.0);
        self
    }
    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }
}

/// One controllable agent, addressed by its stable roster slot.
///
/// Drones are created once per agent when the roster becomes known and live
/// for the whole session. Whatever step currently governs a drone overwrites
/// `ctrl` each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub index: usize,
    pub ctrl: ControlIntent,
}

impl Drone {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ctrl: ControlIntent::default(),
        }
    }

    pub fn reset_ctrl(&mut self) {
        self.ctrl = ControlIntent::default();
    }
}

/// Build drones for the slots `0..count`.
pub fn roster(count: usize) -> Vec<Drone> {
    (0..count).map(Drone::new).collect()
}
