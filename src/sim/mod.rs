//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per animation frame, frame-counter timers only
//! - Seeded RNG only (invader fire target, explosion cosmetics)
//! - Stable iteration order over entity collections
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{aabb_overlap, bullet_hits};
pub use state::{Bullet, Explosion, GameState, Invader, Particle, Phase, Shooter};
pub use tick::{FrameInput, GameEvent, GameOverReason, tick};
