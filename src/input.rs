//! Input adapter
//!
//! Pointer/touch listeners write this adapter; the simulation reads exactly
//! one immutable snapshot per frame. Press events also queue a discrete shot
//! so a quick click fires immediately regardless of the auto-fire timer.

use crate::config::GameConfig;
use crate::sim::FrameInput;

#[derive(Debug, Clone)]
pub struct InputAdapter {
    target_x: f32,
    firing: bool,
    queued_shots: u32,
}

impl InputAdapter {
    /// Aim starts at the horizontal canvas center.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            target_x: config.width / 2.0,
            firing: false,
            queued_shots: 0,
        }
    }

    /// Pointer moved; `x` is relative to the canvas.
    pub fn pointer_moved(&mut self, x: f32) {
        self.target_x = x;
    }

    /// Press (mouse down / touch start): hold fire and queue one shot.
    pub fn press(&mut self) {
        self.firing = true;
        self.queued_shots += 1;
    }

    /// Touch drag aims and holds fire at the same time.
    pub fn touch_moved(&mut self, x: f32) {
        self.target_x = x;
        self.firing = true;
    }

    /// Release (mouse up / touch end).
    pub fn release(&mut self) {
        self.firing = false;
    }

    /// Produce this frame's snapshot, draining at most one queued shot.
    pub fn snapshot(&mut self) -> FrameInput {
        let fire = self.queued_shots > 0;
        if fire {
            self.queued_shots -= 1;
        }
        FrameInput {
            target_x: self.target_x,
            firing: self.firing,
            fire,
        }
    }

    /// Drop held state and queued shots (on session restart).
    pub fn clear(&mut self) {
        self.firing = false;
        self.queued_shots = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_queues_exactly_one_shot() {
        let config = GameConfig::default();
        let mut adapter = InputAdapter::new(&config);
        adapter.press();

        let first = adapter.snapshot();
        assert!(first.fire);
        assert!(first.firing);

        let second = adapter.snapshot();
        assert!(!second.fire);
        assert!(second.firing); // still held until release

        adapter.release();
        assert!(!adapter.snapshot().firing);
    }

    #[test]
    fn rapid_clicks_each_fire_once() {
        let config = GameConfig::default();
        let mut adapter = InputAdapter::new(&config);
        adapter.press();
        adapter.release();
        adapter.press();
        adapter.release();

        assert!(adapter.snapshot().fire);
        assert!(adapter.snapshot().fire);
        assert!(!adapter.snapshot().fire);
    }

    #[test]
    fn touch_move_aims_and_holds() {
        let config = GameConfig::default();
        let mut adapter = InputAdapter::new(&config);
        adapter.touch_moved(123.0);

        let snap = adapter.snapshot();
        assert!((snap.target_x - 123.0).abs() < f32::EPSILON);
        assert!(snap.firing);
        assert!(!snap.fire);
    }
}
