//! Game state and entity types
//!
//! Plain mutable records scoped to one session. Invaders are marked dead in
//! place rather than removed so iteration order stays stable within a wave.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::consts::*;

/// Coarse game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Prompt screen visible, loop not running
    Prompt,
    /// Active gameplay
    Playing,
    /// All invaders destroyed; presented as a win
    WaveCleared,
    /// Invasion reached the shooter row or the shooter was hit
    GameOver,
    /// Dismissed by the user; terminal, loop not running
    Closed,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Shooter {
    pub pos: Vec2,
    pub size: f32,
}

/// One wave slot
#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    pub pos: Vec2,
    pub size: f32,
    pub alive: bool,
}

/// A bullet; positive velocity moves down (invader fire), negative up.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel_y: f32,
}

/// One cosmetic explosion particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fades from 1.0 to 0.0 over the explosion lifetime
    pub alpha: f32,
    /// Palette index resolved by the renderer
    pub color: usize,
}

/// Short-lived particle burst. Purely cosmetic, no gameplay effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub particles: Vec<Particle>,
    pub life: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; the only source of nondeterminism-looking behavior
    pub rng: Pcg32,
    pub phase: Phase,
    /// Frame counter driving the modulo fire timers
    pub frame: u64,
    /// Current wave, starts at 1
    pub wave: u32,
    /// Monotonically non-decreasing, +1 per invader destroyed
    pub score: u32,
    /// Unlocked badge names in unlock order, no duplicates
    pub unlocked: Vec<String>,
    /// Shared formation direction: 1.0 right, -1.0 left
    pub invader_dir: f32,
    pub shooter: Shooter,
    pub invaders: Vec<Invader>,
    pub player_bullets: Vec<Bullet>,
    pub invader_bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
}

impl GameState {
    /// Create a fresh session in the prompt phase with a wave-1 layout.
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Prompt,
            frame: 0,
            wave: 1,
            score: 0,
            unlocked: Vec::new(),
            invader_dir: 1.0,
            shooter: Shooter {
                pos: Vec2::new(
                    config.width / 2.0,
                    config.height - SHOOTER_BOTTOM_MARGIN,
                ),
                size: SHOOTER_SIZE,
            },
            invaders: Vec::new(),
            player_bullets: Vec::new(),
            invader_bullets: Vec::new(),
            explosions: Vec::new(),
        };
        state.spawn_wave(1, config);
        state
    }

    /// Lay out wave `wave` in a roughly square grid below the HUD, capped at
    /// the configured wave size. A zero-size wave leaves the field empty.
    pub fn spawn_wave(&mut self, wave: u32, config: &GameConfig) {
        self.wave = wave;
        self.invaders.clear();
        self.invader_dir = 1.0;

        let count = config.difficulty.tuning().wave_size;
        if count == 0 {
            return;
        }

        let cols = (count as f32).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        let spacing_x = config.width / (cols as f32 + 1.0);

        'grid: for row in 0..rows {
            for col in 0..cols {
                if self.invaders.len() >= count {
                    break 'grid;
                }
                self.invaders.push(Invader {
                    pos: Vec2::new(
                        spacing_x * (col as f32 + 1.0),
                        WAVE_TOP_MARGIN + row as f32 * WAVE_ROW_SPACING,
                    ),
                    size: INVADER_SIZE,
                    alive: true,
                });
            }
        }
    }

    /// Full reset: score, badges, and transient collections cleared, shooter
    /// re-centered, wave-1 layout spawned. Does not touch the phase.
    pub fn reset(&mut self, config: &GameConfig) {
        self.score = 0;
        self.unlocked.clear();
        self.frame = 0;
        self.player_bullets.clear();
        self.invader_bullets.clear();
        self.explosions.clear();
        self.shooter.pos = Vec2::new(
            config.width / 2.0,
            config.height - SHOOTER_BOTTOM_MARGIN,
        );
        self.spawn_wave(1, config);
    }

    /// Start action: fresh session, straight into gameplay.
    pub fn start(&mut self, config: &GameConfig) {
        self.reset(config);
        self.phase = Phase::Playing;
    }

    /// Replay action. From a cleared wave this advances to the next wave and
    /// keeps score and badges; from game over it is a full reset to wave 1.
    pub fn replay(&mut self, config: &GameConfig) {
        match self.phase {
            Phase::WaveCleared => {
                self.player_bullets.clear();
                self.invader_bullets.clear();
                self.explosions.clear();
                self.spawn_wave(self.wave + 1, config);
                self.phase = Phase::Playing;
            }
            Phase::GameOver => {
                self.start(config);
            }
            _ => {}
        }
    }

    /// Skip/close action; terminal for the session.
    pub fn skip(&mut self) {
        self.phase = Phase::Closed;
    }

    pub fn add_player_bullet(&mut self, x: f32, y: f32, speed: f32) {
        self.player_bullets.push(Bullet {
            pos: Vec2::new(x, y),
            vel_y: -speed,
        });
    }

    pub fn add_invader_bullet(&mut self, x: f32, y: f32, speed: f32) {
        self.invader_bullets.push(Bullet {
            pos: Vec2::new(x, y),
            vel_y: speed,
        });
    }

    /// Spawn a particle burst: even angular spread, randomized speed, radius
    /// and palette color.
    pub fn add_explosion(&mut self, x: f32, y: f32) {
        let mut particles = Vec::with_capacity(EXPLOSION_PARTICLES);
        for i in 0..EXPLOSION_PARTICLES {
            let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLES as f32;
            let speed = 1.5 + self.rng.random::<f32>() * 2.0;
            particles.push(Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius: 2.0 + self.rng.random::<f32>() * 2.0,
                alpha: 1.0,
                color: self.rng.random_range(0..4),
            });
        }
        self.explosions.push(Explosion {
            particles,
            life: EXPLOSION_LIFE,
        });
    }

    pub fn alive_invaders(&self) -> usize {
        self.invaders.iter().filter(|inv| inv.alive).count()
    }

    pub fn is_wave_cleared(&self) -> bool {
        self.invaders.iter().all(|inv| !inv.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    #[test]
    fn wave_layout_is_roughly_square_and_capped() {
        let config = GameConfig::default(); // medium: 18 invaders
        let state = GameState::new(7, &config);

        assert_eq!(state.invaders.len(), 18);
        assert!(state.invaders.iter().all(|inv| inv.alive));

        // cols = ceil(sqrt(18)) = 5, rows = ceil(18/5) = 4
        let xs: Vec<f32> = state.invaders.iter().map(|inv| inv.pos.x).collect();
        let spacing = config.width / 6.0;
        assert!((xs[0] - spacing).abs() < 0.001);
        assert!((xs[4] - spacing * 5.0).abs() < 0.001);
        // Fifth invader wraps to the second row
        assert!((state.invaders[5].pos.y - (WAVE_TOP_MARGIN + WAVE_ROW_SPACING)).abs() < 0.001);
        // Last (partial) row holds the remaining 3
        let last_row_y = WAVE_TOP_MARGIN + 3.0 * WAVE_ROW_SPACING;
        let last_row = state
            .invaders
            .iter()
            .filter(|inv| (inv.pos.y - last_row_y).abs() < 0.001)
            .count();
        assert_eq!(last_row, 3);
    }

    #[test]
    fn wave_sizes_follow_difficulty() {
        for (difficulty, expected) in [
            (Difficulty::Easy, 12),
            (Difficulty::Medium, 18),
            (Difficulty::Hard, 24),
        ] {
            let config = GameConfig {
                difficulty,
                ..GameConfig::default()
            };
            let state = GameState::new(1, &config);
            assert_eq!(state.invaders.len(), expected);
        }
    }

    #[test]
    fn reset_restores_session_state() {
        let config = GameConfig::default();
        let mut state = GameState::new(42, &config);
        state.start(&config);
        state.score = 25;
        state.unlocked.push("React".to_string());
        state.add_player_bullet(10.0, 10.0, 6.0);
        state.add_invader_bullet(10.0, 10.0, 3.0);
        state.add_explosion(10.0, 10.0);
        state.shooter.pos.x = 13.0;
        state.invaders.iter_mut().for_each(|inv| inv.alive = false);

        state.reset(&config);

        assert_eq!(state.score, 0);
        assert!(state.unlocked.is_empty());
        assert_eq!(state.wave, 1);
        assert!(state.player_bullets.is_empty());
        assert!(state.invader_bullets.is_empty());
        assert!(state.explosions.is_empty());
        assert_eq!(state.invaders.len(), 18);
        assert!((state.shooter.pos.x - config.width / 2.0).abs() < 0.001);
    }

    #[test]
    fn explosions_use_fixed_particle_count() {
        let config = GameConfig::default();
        let mut state = GameState::new(3, &config);
        state.add_explosion(100.0, 100.0);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(state.explosions[0].life, EXPLOSION_LIFE);
    }
}
