//! Widget configuration
//!
//! Resolved once at startup from the embedding script's query parameters.
//! Every field has a documented default; malformed values fall back with a
//! warning instead of failing, since the widget must never break the host
//! page.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CANVAS_HEIGHT, MAX_CANVAS_WIDTH};

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Per-tier gameplay tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTuning {
    /// Horizontal invader speed, pixels per frame (before wave scaling)
    pub invader_speed: f32,
    /// Player bullet speed, pixels per frame
    pub bullet_speed: f32,
    /// Invader bullet speed, pixels per frame
    pub invader_bullet_speed: f32,
    /// Frames between invader shots
    pub fire_interval: u64,
    /// Invaders spawned per wave
    pub wave_size: usize,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Gameplay tuning for this tier. Harder tiers move faster, fire more
    /// often (shorter interval), and spawn larger waves.
    pub fn tuning(&self) -> DifficultyTuning {
        match self {
            Difficulty::Easy => DifficultyTuning {
                invader_speed: 0.4,
                bullet_speed: 7.0,
                invader_bullet_speed: 2.0,
                fire_interval: 120,
                wave_size: 12,
            },
            Difficulty::Medium => DifficultyTuning {
                invader_speed: 0.7,
                bullet_speed: 6.0,
                invader_bullet_speed: 3.0,
                fire_interval: 80,
                wave_size: 18,
            },
            Difficulty::Hard => DifficultyTuning {
                invader_speed: 1.1,
                bullet_speed: 5.0,
                invader_bullet_speed: 4.0,
                fire_interval: 50,
                wave_size: 24,
            },
        }
    }
}

/// One unlockable badge: earned permanently for the session once the score
/// crosses its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDef {
    pub name: String,
    pub icon: String,
    #[serde(rename = "pointsNeeded")]
    pub points_needed: u32,
}

impl BadgeDef {
    fn new(name: &str, icon: &str, points_needed: u32) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            points_needed,
        }
    }
}

/// Built-in badge list, used unless `customTechs` supplies a replacement.
pub fn default_badges() -> Vec<BadgeDef> {
    vec![
        BadgeDef::new("React", "⚛️", 5),
        BadgeDef::new("Node.js", "🟢", 10),
        BadgeDef::new("Python", "🐍", 15),
        BadgeDef::new("Vue", "💚", 20),
        BadgeDef::new("TypeScript", "🔷", 25),
        BadgeDef::new("AI/ML", "🤖", 30),
        BadgeDef::new("PostgreSQL", "🐘", 35),
        BadgeDef::new("AWS", "☁️", 40),
    ]
}

/// Immutable widget configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Canvas dimensions, pixels
    pub width: f32,
    pub height: f32,
    /// Start playing without showing the prompt screen
    pub auto_start: bool,
    /// Glyph drawn for the player's shooter
    pub shooter_icon: String,
    /// Optional sprite URL for invaders (glyph fallback while loading)
    pub invader_image: Option<String>,
    /// Overlay background ("transparent" or a hex color)
    pub bg_color: String,
    /// Foreground/draw color
    pub font_color: String,
    pub difficulty: Difficulty,
    /// Show the badge table on the prompt screen
    pub show_tech_table: bool,
    /// Show the prompt screen when not auto-starting
    pub show_prompt: bool,
    /// Ordered badge definitions
    pub badges: Vec<BadgeDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: MAX_CANVAS_WIDTH,
            height: MAX_CANVAS_HEIGHT,
            auto_start: false,
            shooter_icon: "▲".to_string(),
            invader_image: None,
            bg_color: "transparent".to_string(),
            font_color: "white".to_string(),
            difficulty: Difficulty::Medium,
            show_tech_table: true,
            show_prompt: true,
            badges: default_badges(),
        }
    }
}

impl GameConfig {
    /// Resolve a configuration from raw key/value parameters.
    ///
    /// Unknown keys are ignored; malformed values revert to the defaults
    /// above with a warning.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();

        for (key, value) in params {
            match key {
                "autoStart" => config.auto_start = value == "true",
                "shooterIcon" => {
                    if !value.is_empty() {
                        config.shooter_icon = value.to_string();
                    }
                }
                "invaderImage" => {
                    if !value.is_empty() {
                        config.invader_image = Some(value.to_string());
                    }
                }
                "bgColor" => {
                    if !value.is_empty() {
                        config.bg_color = value.to_string();
                    }
                }
                "fontColor" => {
                    if !value.is_empty() {
                        config.font_color = value.to_string();
                    }
                }
                "difficulty" => {
                    config.difficulty = Difficulty::from_str(value).unwrap_or_else(|| {
                        log::warn!("unrecognized difficulty {value:?}, using medium");
                        Difficulty::Medium
                    });
                }
                "showTechTable" => config.show_tech_table = value != "false",
                "showPrompt" => config.show_prompt = value != "false",
                "customTechs" => match serde_json::from_str::<Vec<BadgeDef>>(value) {
                    // Wholesale replacement, no merging with the defaults
                    Ok(list) => config.badges = list,
                    Err(e) => {
                        log::warn!("invalid customTechs JSON ({e}), using default badges");
                    }
                },
                _ => {}
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tiers_are_strictly_ordered() {
        let easy = Difficulty::Easy.tuning();
        let medium = Difficulty::Medium.tuning();
        let hard = Difficulty::Hard.tuning();

        assert!(easy.invader_speed < medium.invader_speed);
        assert!(medium.invader_speed < hard.invader_speed);
        assert!(easy.wave_size < medium.wave_size);
        assert!(medium.wave_size < hard.wave_size);
        // Fire interval shortens with difficulty
        assert!(easy.fire_interval > medium.fire_interval);
        assert!(medium.fire_interval > hard.fire_interval);
        assert!(easy.invader_bullet_speed < medium.invader_bullet_speed);
        assert!(medium.invader_bullet_speed < hard.invader_bullet_speed);
    }

    #[test]
    fn defaults_match_documentation() {
        let config = GameConfig::default();
        assert!(!config.auto_start);
        assert_eq!(config.shooter_icon, "▲");
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert!(config.show_prompt);
        assert!(config.show_tech_table);
        assert_eq!(config.badges.len(), 8);
    }

    #[test]
    fn params_override_defaults() {
        let config = GameConfig::from_params([
            ("autoStart", "true"),
            ("difficulty", "hard"),
            ("fontColor", "#00ff88"),
            ("showPrompt", "false"),
        ]);
        assert!(config.auto_start);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.font_color, "#00ff88");
        assert!(!config.show_prompt);
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        let config = GameConfig::from_params([("difficulty", "nightmare")]);
        assert_eq!(config.difficulty, Difficulty::Medium);
    }

    #[test]
    fn custom_badges_replace_wholesale() {
        let json = r#"[{"name":"X","icon":"★","pointsNeeded":1}]"#;
        let config = GameConfig::from_params([("customTechs", json)]);
        assert_eq!(config.badges.len(), 1);
        assert_eq!(config.badges[0].name, "X");
        assert_eq!(config.badges[0].points_needed, 1);
    }

    #[test]
    fn malformed_badge_json_keeps_defaults() {
        let config = GameConfig::from_params([("customTechs", "{not json")]);
        assert_eq!(config.badges, default_badges());
    }

    proptest! {
        // Arbitrary parameter strings must never panic the resolver, and
        // unrecognized difficulty text always resolves to medium.
        #[test]
        fn resolver_never_panics(key in "[a-zA-Z]{0,16}", value in ".{0,64}") {
            let config = GameConfig::from_params([(key.as_str(), value.as_str())]);
            if key == "difficulty" && Difficulty::from_str(&value).is_none() {
                prop_assert_eq!(config.difficulty, Difficulty::Medium);
            }
        }
    }
}
