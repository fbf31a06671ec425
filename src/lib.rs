//! Invaders Overlay - an embeddable Space Invaders arcade widget
//!
//! Core modules:
//! - `config`: parameter parsing, difficulty tiers, badge definitions
//! - `sim`: deterministic simulation (entities, per-frame step, collisions)
//! - `input`: pointer/touch normalization into per-frame snapshots
//! - `license`: entitlement check (watermark decision only, fail-open)
//! - `renderer`: Canvas2D paint pass (wasm)
//! - `shell`: overlay DOM layers - prompt, HUD, game over (wasm)

pub mod config;
pub mod input;
pub mod license;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod shell;

pub use config::{Difficulty, GameConfig};
pub use input::InputAdapter;
pub use sim::{FrameInput, GameEvent, GameState, Phase, tick};

/// Reported in logs and sent with the entitlement check.
pub const PLUGIN_VERSION: &str = "1.0.0";

/// Gameplay constants
pub mod consts {
    /// Shooter glyph box (square, pixels)
    pub const SHOOTER_SIZE: f32 = 28.0;
    /// Distance of the shooter row above the canvas bottom
    pub const SHOOTER_BOTTOM_MARGIN: f32 = 36.0;
    /// Fraction of the gap to the pointer target closed each frame
    pub const SHOOTER_TRACK_FACTOR: f32 = 0.2;

    /// Invader glyph box (square, pixels)
    pub const INVADER_SIZE: f32 = 28.0;
    /// Top of the first invader row
    pub const WAVE_TOP_MARGIN: f32 = 60.0;
    /// Vertical distance between invader rows
    pub const WAVE_ROW_SPACING: f32 = 50.0;
    /// Formation drop when any living invader touches a horizontal edge
    pub const DESCEND_STEP: f32 = 18.0;
    /// Linear speed gain per cleared wave
    pub const WAVE_SPEED_STEP: f32 = 0.05;
    /// Invaders this close to the shooter row end the session
    pub const INVASION_MARGIN: f32 = 10.0;

    /// Frames between shots while fire is held
    pub const AUTO_FIRE_INTERVAL: u64 = 18;
    /// Rendered bullet radius; also the AABB tolerance around entity boxes
    pub const BULLET_RADIUS: f32 = 3.0;

    /// Particles per explosion
    pub const EXPLOSION_PARTICLES: usize = 12;
    /// Explosion lifetime in frames
    pub const EXPLOSION_LIFE: u32 = 30;

    /// Canvas size caps
    pub const MAX_CANVAS_WIDTH: f32 = 900.0;
    pub const MAX_CANVAS_HEIGHT: f32 = 600.0;
    /// Portion of the viewport height the canvas may occupy
    pub const CANVAS_HEIGHT_FRACTION: f32 = 0.85;
}

/// Resolve the canvas dimensions for a host viewport.
#[inline]
pub fn canvas_size(viewport_w: f32, viewport_h: f32) -> (f32, f32) {
    (
        viewport_w.min(consts::MAX_CANVAS_WIDTH),
        (viewport_h * consts::CANVAS_HEIGHT_FRACTION).min(consts::MAX_CANVAS_HEIGHT),
    )
}
