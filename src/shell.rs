//! Presentation shell
//!
//! Owns the injected overlay DOM: prompt screen, in-game HUD + canvas, and
//! game-over screen are mutually exclusive layers swapped by phase. Badge
//! chips and the unlicensed watermark also live here. Button wiring is done
//! by the entry point; this module only builds and swaps DOM.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlCanvasElement};

use crate::config::GameConfig;
use crate::sim::GameState;

pub const OVERLAY_ID: &str = "anavo-space-invaders-overlay";
pub const STYLES_ID: &str = "anavo-space-invaders-styles";
pub const CLOSE_ID: &str = "anavo-si-close";
pub const CANVAS_ID: &str = "anavo-si-canvas";
pub const HUD_ID: &str = "anavo-si-hud";
pub const PROMPT_START_ID: &str = "anavo-si-prompt-start";
pub const PROMPT_SKIP_ID: &str = "anavo-si-prompt-skip";
pub const REPLAY_ID: &str = "anavo-si-replay";
pub const GAMEOVER_CLOSE_ID: &str = "anavo-si-gameover-close";

const STYLE_TEMPLATE: &str = "
#anavo-space-invaders-overlay {
  position: fixed; top: 0; left: 0; width: 100%; height: 100%;
  z-index: 999990; display: flex; flex-direction: column;
  align-items: center; justify-content: center;
  font-family: 'Syne Mono', 'Courier New', monospace;
  background: @bg; color: @fg; overflow: hidden;
}
#anavo-space-invaders-overlay * { box-sizing: border-box; }
#anavo-si-canvas { display: block; cursor: none; touch-action: none; max-width: 100%; }
#anavo-si-hud {
  position: absolute; top: 12px; left: 0; width: 100%;
  display: flex; justify-content: center; font-size: 14px;
  color: @fg; pointer-events: none; z-index: 1;
}
#anavo-si-close {
  position: absolute; top: 10px; right: 16px; background: none;
  border: 1px solid @fg; color: @fg; font-size: 18px;
  width: 32px; height: 32px; cursor: pointer; z-index: 2;
  display: flex; align-items: center; justify-content: center; opacity: 0.7;
}
#anavo-si-close:hover { opacity: 1; }
#anavo-si-prompt, #anavo-si-gameover { text-align: center; padding: 40px 20px; }
#anavo-si-prompt h2, #anavo-si-gameover h2 {
  font-size: clamp(22px, 4vw, 36px); margin-bottom: 12px; color: @fg;
}
#anavo-si-prompt p, #anavo-si-gameover p {
  font-size: clamp(13px, 2vw, 16px); opacity: 0.8; margin-bottom: 24px; color: @fg;
}
#anavo-si-prompt-start, .anavo-si-btn-primary {
  background: @fg; color: #000; border: none; padding: 14px 36px;
  font-size: 16px; font-family: inherit; cursor: pointer; margin-right: 12px;
}
#anavo-si-prompt-skip, .anavo-si-btn-secondary {
  background: none; color: @fg; border: 1px solid @fg; padding: 14px 36px;
  font-size: 16px; font-family: inherit; cursor: pointer; opacity: 0.6;
}
#anavo-si-tech-table { margin-top: 28px; width: 100%; max-width: 480px; }
#anavo-si-tech-table h3 {
  font-size: 13px; margin-bottom: 10px; opacity: 0.7;
  text-transform: uppercase; letter-spacing: 1px; color: @fg;
}
.anavo-si-badges { display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; }
.anavo-si-badge {
  display: inline-flex; align-items: center; gap: 6px; padding: 5px 12px;
  border: 1px solid @fg; font-size: 12px; color: @fg; opacity: 0.3;
  transition: opacity 0.3s, background 0.3s; border-radius: 3px;
}
.anavo-si-badge.unlocked { opacity: 1; background: rgba(255,255,255,0.1); }
@media (max-width: 600px) {
  #anavo-si-hud { font-size: 12px; }
  .anavo-si-badge { font-size: 11px; padding: 4px 8px; }
}
";

pub struct Shell {
    document: Document,
    overlay: Element,
}

impl Shell {
    /// Build the overlay container (with its persistent close button) and
    /// attach it to the host page. Fails if the page has no `<body>`.
    pub fn mount(document: &Document, config: &GameConfig) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no <body> mount point"))?;

        inject_styles(document, config)?;

        let overlay = document.create_element("div")?;
        overlay.set_id(OVERLAY_ID);
        overlay.set_attribute("role", "dialog")?;
        overlay.set_attribute("aria-label", "Space Invaders Game")?;
        overlay.set_attribute("aria-modal", "true")?;

        let close = document.create_element("button")?;
        close.set_id(CLOSE_ID);
        close.set_text_content(Some("✕"));
        close.set_attribute("aria-label", "Close game")?;
        overlay.append_child(&close)?;

        body.append_child(&overlay)?;

        Ok(Self {
            document: document.clone(),
            overlay,
        })
    }

    /// Swap in the prompt layer. Button listeners are attached by the caller.
    pub fn show_prompt(&self, config: &GameConfig) -> Result<(), JsValue> {
        self.clear_layers();

        let prompt = self.document.create_element("div")?;
        prompt.set_id("anavo-si-prompt");

        let title = self.document.create_element("h2")?;
        title.set_text_content(Some("🎮 Space Invaders"));
        prompt.append_child(&title)?;

        let hint = self.document.create_element("p")?;
        hint.set_text_content(Some(
            "Move your mouse to aim · Click to shoot · Unlock tech badges!",
        ));
        prompt.append_child(&hint)?;

        let buttons = self.document.create_element("div")?;
        let start = self.document.create_element("button")?;
        start.set_id(PROMPT_START_ID);
        start.set_text_content(Some("🚀 Play Now"));
        buttons.append_child(&start)?;
        let skip = self.document.create_element("button")?;
        skip.set_id(PROMPT_SKIP_ID);
        skip.set_text_content(Some("Skip"));
        buttons.append_child(&skip)?;
        prompt.append_child(&buttons)?;

        if config.show_tech_table {
            let table = self.document.create_element("div")?;
            table.set_id("anavo-si-tech-table");
            let heading = self.document.create_element("h3")?;
            heading.set_text_content(Some("Tech Badges"));
            table.append_child(&heading)?;
            table.append_child(&self.build_badge_chips(config, &[])?)?;
            prompt.append_child(&table)?;
        }

        self.overlay.append_child(&prompt)?;
        self.show();
        Ok(())
    }

    /// Swap in the gameplay layer and return its canvas.
    pub fn show_game(&self, config: &GameConfig) -> Result<HtmlCanvasElement, JsValue> {
        self.clear_layers();

        let hud = self.document.create_element("div")?;
        hud.set_id(HUD_ID);
        self.overlay.append_child(&hud)?;

        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_id(CANVAS_ID);
        canvas.set_attribute("aria-hidden", "true")?;
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);
        self.overlay.append_child(&canvas)?;

        self.show();
        Ok(canvas)
    }

    /// Swap in the end-of-session layer (win or loss framing).
    pub fn show_game_over(
        &self,
        state: &GameState,
        config: &GameConfig,
        cleared: bool,
    ) -> Result<(), JsValue> {
        self.clear_layers();

        let container = self.document.create_element("div")?;
        container.set_id("anavo-si-gameover");

        let title = self.document.create_element("h2")?;
        title.set_text_content(Some(if cleared {
            "🏆 Wave Cleared!"
        } else {
            "💀 Game Over"
        }));
        container.append_child(&title)?;

        let score = self.document.create_element("p")?;
        score.set_text_content(Some(&format!("Score: {}", state.score)));
        container.append_child(&score)?;

        let badges = self.document.create_element("p")?;
        badges.set_text_content(Some(&format!(
            "Badges unlocked: {} / {}",
            state.unlocked.len(),
            config.badges.len()
        )));
        container.append_child(&badges)?;

        if !state.unlocked.is_empty() {
            container.append_child(&self.build_badge_chips(config, &state.unlocked)?)?;
        }

        let buttons = self.document.create_element("div")?;
        let replay = self.document.create_element("button")?;
        replay.set_id(REPLAY_ID);
        replay.set_class_name("anavo-si-btn-primary");
        replay.set_text_content(Some("🔄 Play Again"));
        buttons.append_child(&replay)?;
        let close = self.document.create_element("button")?;
        close.set_id(GAMEOVER_CLOSE_ID);
        close.set_class_name("anavo-si-btn-secondary");
        close.set_text_content(Some("Close"));
        buttons.append_child(&close)?;
        container.append_child(&buttons)?;

        self.overlay.append_child(&container)?;
        self.show();
        Ok(())
    }

    /// Flash an unlock notification in the HUD and mark the chip if the
    /// badge table is currently in the DOM.
    pub fn flash_badge_unlock(&self, name: &str, icon: &str) {
        if let Some(hud) = self.document.get_element_by_id(HUD_ID) {
            hud.set_text_content(Some(&format!("🏆 {icon} {name} unlocked!")));
        }
        if let Some(chip) = self.document.get_element_by_id(&badge_dom_id(name)) {
            let _ = chip.class_list().add_1("unlocked");
        }
    }

    /// Non-blocking unlicensed watermark, outside the overlay.
    pub fn show_watermark(&self) -> Result<(), JsValue> {
        let Some(body) = self.document.body() else {
            return Ok(());
        };
        let watermark = self.document.create_element("div")?;
        watermark.set_class_name("anavo-watermark-game");
        watermark.set_inner_html(
            "⚠️ Unlicensed Version • <a href=\"https://anavotech.com/plugins/space-invaders\" \
             target=\"_blank\" rel=\"noopener noreferrer\">Get License</a>",
        );
        watermark.set_attribute(
            "style",
            "position: fixed; bottom: 20px; right: 20px; \
             background: rgba(255, 255, 255, 0.9); padding: 10px 20px; \
             border: 2px solid black; font-family: monospace; font-size: 12px; \
             z-index: 999999; pointer-events: auto;",
        )?;
        body.append_child(&watermark)?;
        Ok(())
    }

    pub fn show(&self) {
        let _ = self.overlay.set_attribute("style", "display: flex;");
    }

    /// Hide the overlay without tearing it down (skip action).
    pub fn hide(&self) {
        let _ = self.overlay.set_attribute("style", "display: none;");
    }

    /// Remove all injected DOM (cleanup action).
    pub fn remove(&self) {
        self.overlay.remove();
        if let Some(styles) = self.document.get_element_by_id(STYLES_ID) {
            styles.remove();
        }
    }

    fn build_badge_chips(&self, config: &GameConfig, unlocked: &[String]) -> Result<Element, JsValue> {
        let chips = self.document.create_element("div")?;
        chips.set_class_name("anavo-si-badges");
        for badge in &config.badges {
            let chip = self.document.create_element("span")?;
            let is_unlocked = unlocked.iter().any(|name| name == &badge.name);
            chip.set_class_name(if is_unlocked {
                "anavo-si-badge unlocked"
            } else {
                "anavo-si-badge"
            });
            chip.set_id(&badge_dom_id(&badge.name));
            chip.set_attribute(
                "aria-label",
                &format!("{} badge - {} points needed", badge.name, badge.points_needed),
            )?;
            chip.set_text_content(Some(&format!("{} {}", badge.icon, badge.name)));
            chips.append_child(&chip)?;
        }
        Ok(chips)
    }

    /// Remove every layer except the persistent close button.
    fn clear_layers(&self) {
        let mut child = self.overlay.first_element_child();
        while let Some(el) = child {
            child = el.next_element_sibling();
            if el.id() != CLOSE_ID {
                el.remove();
            }
        }
    }
}

fn inject_styles(document: &Document, config: &GameConfig) -> Result<(), JsValue> {
    if document.get_element_by_id(STYLES_ID).is_some() {
        return Ok(());
    }
    let bg = if config.bg_color == "transparent" {
        "rgba(0,0,0,0.85)".to_string()
    } else {
        format!("#{}", config.bg_color.trim_start_matches('#'))
    };
    let css = STYLE_TEMPLATE
        .replace("@bg", &bg)
        .replace("@fg", &config.font_color);

    let style = document.create_element("style")?;
    style.set_id(STYLES_ID);
    style.set_text_content(Some(&css));
    document
        .head()
        .ok_or_else(|| JsValue::from_str("no <head>"))?
        .append_child(&style)?;
    Ok(())
}

/// DOM id for a badge chip; non-alphanumeric characters become underscores.
fn badge_dom_id(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("anavo-si-badge-{safe}")
}
