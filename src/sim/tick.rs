//! Per-frame simulation step
//!
//! Advances the session by exactly one animation frame. Fire rates are
//! frame-counter timers (`frame % interval`), so a fixed seed and input
//! sequence reproduce the same session exactly.

use super::collision::bullet_hits;
use super::state::{GameState, Phase};
use crate::config::{BadgeDef, GameConfig};
use crate::consts::*;
use rand::Rng;

/// Immutable input snapshot for one frame, produced by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Horizontal aim target in canvas coordinates
    pub target_x: f32,
    /// Fire button/touch currently held (auto-fire)
    pub firing: bool,
    /// One discrete shot this frame, independent of the auto-fire timer
    pub fire: bool,
}

impl FrameInput {
    /// No input: aim stays at the canvas center, nothing fires.
    pub fn idle(config: &GameConfig) -> Self {
        Self {
            target_x: config.width / 2.0,
            firing: false,
            fire: false,
        }
    }
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// A living invader reached the shooter row
    Invasion,
    /// An invader bullet hit the shooter
    ShooterHit,
}

/// Side effects emitted by one frame, consumed by the presentation shell.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    InvaderDestroyed { x: f32, y: f32 },
    BadgeUnlocked(String),
    WaveCleared,
    GameOver(GameOverReason),
}

/// Advance the session by one frame. No-op unless the phase is `Playing`.
pub fn tick(state: &mut GameState, config: &GameConfig, input: &FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != Phase::Playing {
        return events;
    }

    state.frame += 1;
    let tuning = config.difficulty.tuning();

    // 1. Shooter eases toward the aim target
    let half = state.shooter.size / 2.0;
    let target = input.target_x.clamp(half, config.width - half);
    state.shooter.pos.x += (target - state.shooter.pos.x) * SHOOTER_TRACK_FACTOR;

    // 2. Bullets advance; off-canvas bullets are dropped
    for bullet in &mut state.player_bullets {
        bullet.pos.y += bullet.vel_y;
    }
    state.player_bullets.retain(|b| b.pos.y > 0.0);
    for bullet in &mut state.invader_bullets {
        bullet.pos.y += bullet.vel_y;
    }
    let height = config.height;
    state.invader_bullets.retain(|b| b.pos.y < height);

    // 3. Formation movement: shared direction, collective descend on edge
    let step = tuning.invader_speed
        * state.invader_dir
        * (1.0 + WAVE_SPEED_STEP * state.wave.saturating_sub(1) as f32);
    let mut hit_edge = false;
    for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
        inv.pos.x += step;
        if inv.pos.x >= config.width - inv.size / 2.0 || inv.pos.x <= inv.size / 2.0 {
            hit_edge = true;
        }
    }
    if hit_edge {
        state.invader_dir = -state.invader_dir;
        for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
            inv.pos.y += DESCEND_STEP;
        }
    }

    // 4. Invasion: any living invader at the shooter row loses the session
    let invasion_y = config.height - state.shooter.size - INVASION_MARGIN;
    if state
        .invaders
        .iter()
        .any(|inv| inv.alive && inv.pos.y >= invasion_y)
    {
        state.phase = Phase::GameOver;
        events.push(GameEvent::GameOver(GameOverReason::Invasion));
        return events;
    }

    // 5. Wave clear (a zero-size wave clears immediately)
    if state.is_wave_cleared() {
        state.phase = Phase::WaveCleared;
        events.push(GameEvent::WaveCleared);
        return events;
    }

    // 6. Player fire: discrete shot plus rate-limited auto-fire while held
    if input.fire || (input.firing && state.frame % AUTO_FIRE_INTERVAL == 0) {
        let muzzle_y = state.shooter.pos.y - state.shooter.size / 2.0;
        let x = state.shooter.pos.x;
        state.add_player_bullet(x, muzzle_y, tuning.bullet_speed);
    }

    // 7. Invader fire: uniformly random living invader on a fixed interval
    if state.frame % tuning.fire_interval == 0 {
        let alive: Vec<usize> = state
            .invaders
            .iter()
            .enumerate()
            .filter(|(_, inv)| inv.alive)
            .map(|(i, _)| i)
            .collect();
        if !alive.is_empty() {
            let pick = alive[state.rng.random_range(0..alive.len())];
            let inv = &state.invaders[pick];
            let (x, y) = (inv.pos.x, inv.pos.y + inv.size / 2.0);
            state.add_invader_bullet(x, y, tuning.invader_bullet_speed);
        }
    }

    // 8. Player bullets vs invaders: one kill per bullet, first overlap wins
    let mut consumed = vec![false; state.player_bullets.len()];
    let mut destroyed: Vec<(f32, f32)> = Vec::new();
    for (bi, bullet) in state.player_bullets.iter().enumerate() {
        for inv in state.invaders.iter_mut() {
            if inv.alive && bullet_hits(bullet.pos, inv.pos, inv.size) {
                inv.alive = false;
                consumed[bi] = true;
                destroyed.push((inv.pos.x, inv.pos.y));
                break;
            }
        }
    }
    let mut index = 0;
    state.player_bullets.retain(|_| {
        let keep = !consumed[index];
        index += 1;
        keep
    });
    for (x, y) in destroyed {
        state.score += 1;
        state.add_explosion(x, y);
        events.push(GameEvent::InvaderDestroyed { x, y });
    }

    // 9. Invader bullets vs shooter: any hit ends the session
    let shooter_pos = state.shooter.pos;
    let shooter_size = state.shooter.size;
    if state
        .invader_bullets
        .iter()
        .any(|b| bullet_hits(b.pos, shooter_pos, shooter_size))
    {
        state.add_explosion(shooter_pos.x, shooter_pos.y);
        state.phase = Phase::GameOver;
        events.push(GameEvent::GameOver(GameOverReason::ShooterHit));
        check_badges(state, &config.badges, &mut events);
        return events;
    }

    // 10. Badge evaluation
    check_badges(state, &config.badges, &mut events);

    // 11. Explosion aging
    for explosion in &mut state.explosions {
        explosion.life = explosion.life.saturating_sub(1);
        for particle in &mut explosion.particles {
            particle.pos += particle.vel;
            particle.alpha -= 1.0 / EXPLOSION_LIFE as f32;
        }
    }
    state.explosions.retain(|e| e.life > 0);

    events
}

/// Unlock every badge whose threshold the score has reached. Idempotent: a
/// name already in the unlocked set is never added twice.
fn check_badges(state: &mut GameState, badges: &[BadgeDef], events: &mut Vec<GameEvent>) {
    for badge in badges {
        if state.score >= badge.points_needed
            && !state.unlocked.iter().any(|name| name == &badge.name)
        {
            state.unlocked.push(badge.name.clone());
            log::info!("badge unlocked: {} {}", badge.icon, badge.name);
            events.push(GameEvent::BadgeUnlocked(badge.name.clone()));
        }
    }
}
