//! Canvas2D paint pass
//!
//! Stateless read of the entity store: the canvas is fully cleared and
//! repainted every frame. No gameplay logic lives here.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::GameConfig;
use crate::consts::BULLET_RADIUS;
use crate::sim::GameState;

const INVADER_GLYPH: &str = "👾";
const INVADER_BULLET_COLOR: &str = "#ff4444";

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    /// Optional invader sprite; the glyph is drawn until it has loaded
    invader_sprite: Option<HtmlImageElement>,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement, config: &GameConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let invader_sprite = config.invader_image.as_ref().and_then(|url| {
            HtmlImageElement::new().ok().map(|img| {
                img.set_src(url);
                img
            })
        });

        Ok(Self {
            ctx,
            invader_sprite,
        })
    }

    /// Paint the current store to the canvas.
    pub fn render(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, config.width as f64, config.height as f64);

        self.draw_shooter(state, config);
        self.draw_invaders(state, config);
        self.draw_bullets(state, config);
        self.draw_explosions(state, config);
        self.draw_hud(state, config);
    }

    fn draw_shooter(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&config.font_color);
        ctx.set_font(&format!("{}px monospace", state.shooter.size));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(
            &config.shooter_icon,
            state.shooter.pos.x as f64,
            state.shooter.pos.y as f64,
        );
    }

    fn draw_invaders(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        let sprite = self
            .invader_sprite
            .as_ref()
            .filter(|img| img.complete() && img.natural_width() > 0);

        for inv in state.invaders.iter().filter(|inv| inv.alive) {
            if let Some(img) = sprite {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    (inv.pos.x - inv.size / 2.0) as f64,
                    (inv.pos.y - inv.size / 2.0) as f64,
                    inv.size as f64,
                    inv.size as f64,
                );
            } else {
                ctx.set_fill_style_str(&config.font_color);
                ctx.set_font(&format!("{}px monospace", inv.size));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(INVADER_GLYPH, inv.pos.x as f64, inv.pos.y as f64);
            }
        }
    }

    fn draw_bullets(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&config.font_color);
        for bullet in &state.player_bullets {
            ctx.begin_path();
            let _ = ctx.arc(
                bullet.pos.x as f64,
                bullet.pos.y as f64,
                BULLET_RADIUS as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        ctx.set_fill_style_str(INVADER_BULLET_COLOR);
        for bullet in &state.invader_bullets {
            ctx.begin_path();
            let _ = ctx.arc(
                bullet.pos.x as f64,
                bullet.pos.y as f64,
                BULLET_RADIUS as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }

    fn draw_explosions(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        for explosion in &state.explosions {
            for particle in &explosion.particles {
                ctx.set_global_alpha(particle.alpha.clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(particle_color(particle.color, config));
                ctx.begin_path();
                let _ = ctx.arc(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    particle.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_hud(&self, state: &GameState, config: &GameConfig) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&config.font_color);
        ctx.set_font("14px monospace");
        ctx.set_text_baseline("top");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("Score: {}", state.score), 12.0, 10.0);
        ctx.set_text_align("right");
        let _ = ctx.fill_text(
            &format!("Wave: {}", state.wave),
            config.width as f64 - 12.0,
            10.0,
        );
    }
}

/// Explosion palette: index 0 is the configured foreground color.
fn particle_color(index: usize, config: &GameConfig) -> &str {
    match index {
        0 => &config.font_color,
        1 => "#ff6600",
        2 => "#ffcc00",
        _ => "#ff4444",
    }
}
