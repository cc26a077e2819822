//! Scene configuration
//!
//! Every animation constant of the scene lives here: envelope geometry,
//! durations, easings, distances, angles and the scroll range that drives the
//! folding card. The configuration is read from an optional `invita.toml`;
//! every field falls back to its default, so a partial file is fine:
//!
//! ```toml
//! [open]
//! flap_duration_ms = 1200
//! flap_easing = "ease-in-out-quad"
//!
//! [card]
//! scroll_end = 900.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use invita_animation::{Easing, ScrollRange};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::viewport::Size;

/// File name looked up by [`SceneConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "invita.toml";

/// Complete scene configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub envelope: EnvelopeConfig,
    pub open: OpenConfig,
    pub extract: ExtractConfig,
    pub close: CloseConfig,
    pub card: CardConfig,
    pub intro: IntroConfig,
}

/// Envelope geometry at scale 1
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    pub width: f32,
    pub height: f32,
    /// Space kept free on every side of the viewport
    pub margin: f32,
    /// Stacking order of the closed flap
    pub flap_z_index: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 620.0,
            margin: 16.0,
            flap_z_index: 10.0,
        }
    }
}

/// Flap opening and the first lift of the inner card
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenConfig {
    pub flap_angle: f32,
    pub flap_duration_ms: u32,
    pub flap_easing: Easing,
    /// Stacking order of the open flap, behind the inner card
    pub flap_z_index: f32,
    /// Vertical lift at scale 1 (negative is up)
    pub lift_y: f32,
    pub lift_duration_ms: u32,
    pub lift_easing: Easing,
    /// How far the lift starts before the flap finishes
    pub lift_overlap_ms: u32,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            flap_angle: 180.0,
            flap_duration_ms: 1500,
            flap_easing: Easing::EaseInOutCubic,
            flap_z_index: -10.0,
            lift_y: -75.0,
            lift_duration_ms: 400,
            lift_easing: Easing::EaseOutCubic,
            lift_overlap_ms: 200,
        }
    }
}

/// Pulling the inner card out and handing over to the folding card
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub card_y: f32,
    pub card_scale: f32,
    pub card_opacity: f32,
    pub card_duration_ms: u32,
    pub card_easing: Easing,
    pub envelope_opacity: f32,
    pub envelope_scale: f32,
    pub envelope_duration_ms: u32,
    pub envelope_easing: Easing,
    /// How far the envelope fade starts before the card extraction finishes
    pub envelope_overlap_ms: u32,
    pub reveal_duration_ms: u32,
    pub reveal_easing: Easing,
    /// How far the folding card reveal starts before the envelope fade finishes
    pub reveal_overlap_ms: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            card_y: -400.0,
            card_scale: 1.1,
            card_opacity: 0.0,
            card_duration_ms: 800,
            card_easing: Easing::EaseOutCubic,
            envelope_opacity: 0.0,
            envelope_scale: 0.9,
            envelope_duration_ms: 500,
            envelope_easing: Easing::EaseOutCubic,
            envelope_overlap_ms: 500,
            reveal_duration_ms: 600,
            reveal_easing: Easing::EaseOutCubic,
            reveal_overlap_ms: 300,
        }
    }
}

/// Putting everything back into the closed envelope
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CloseConfig {
    pub fade_duration_ms: u32,
    pub fade_easing: Easing,
    pub restore_duration_ms: u32,
    pub restore_easing: Easing,
    pub lower_duration_ms: u32,
    pub lower_easing: Easing,
    pub flap_duration_ms: u32,
    pub flap_easing: Easing,
    /// How far the flap starts closing before the card is lowered
    pub flap_overlap_ms: u32,
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: 400,
            fade_easing: Easing::EaseInCubic,
            restore_duration_ms: 300,
            restore_easing: Easing::EaseOutCubic,
            lower_duration_ms: 300,
            lower_easing: Easing::EaseInCubic,
            flap_duration_ms: 500,
            flap_easing: Easing::EaseInOutCubic,
            flap_overlap_ms: 100,
        }
    }
}

/// The folding card and its scroll-driven leaves
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CardConfig {
    pub width: f32,
    pub height: f32,
    /// Scale of the folding card while hidden
    pub hidden_scale: f32,
    /// Leaf rotation at full scroll progress
    pub leaf_angle: f32,
    pub scroll_start: f32,
    pub scroll_end: f32,
    pub scrub_easing: Easing,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 448.0,
            height: 572.0,
            hidden_scale: 0.9,
            leaf_angle: 180.0,
            scroll_start: 0.0,
            scroll_end: 600.0,
            scrub_easing: Easing::Linear,
        }
    }
}

impl CardConfig {
    /// Folding card size at scale 1
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn scroll_range(&self) -> ScrollRange {
        ScrollRange::new(self.scroll_start, self.scroll_end)
    }
}

/// Entrance animation of the envelope
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntroConfig {
    pub enabled: bool,
    pub duration_ms: u32,
    pub easing: Easing,
    pub scale_from: f32,
    pub rotation_from: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 800,
            easing: Easing::BackOut,
            scale_from: 0.0,
            rotation_from: -10.0,
        }
    }
}

impl SceneConfig {
    /// Load `invita.toml` from a directory, or the defaults if there is none
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(path),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations that cannot describe a scene
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("envelope.width", self.envelope.width),
            ("envelope.height", self.envelope.height),
            ("envelope.margin", self.envelope.margin),
            ("open.flap_angle", self.open.flap_angle),
            ("open.lift_y", self.open.lift_y),
            ("extract.card_y", self.extract.card_y),
            ("extract.card_scale", self.extract.card_scale),
            ("extract.envelope_scale", self.extract.envelope_scale),
            ("card.leaf_angle", self.card.leaf_angle),
            ("card.scroll_start", self.card.scroll_start),
            ("card.scroll_end", self.card.scroll_end),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be a finite number")));
        }

        if self.envelope.width <= 0.0 || self.envelope.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "envelope size must be positive, got {}x{}",
                self.envelope.width, self.envelope.height
            )));
        }
        if self.card.width <= 0.0 || self.card.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "card size must be positive, got {}x{}",
                self.card.width, self.card.height
            )));
        }
        if self.envelope.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "envelope.margin must not be negative, got {}",
                self.envelope.margin
            )));
        }
        if self.card.scroll_end <= self.card.scroll_start {
            return Err(ConfigError::Invalid(format!(
                "card scroll range is empty ({}..{})",
                self.card.scroll_start, self.card.scroll_end
            )));
        }
        if self.card.leaf_angle <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "card.leaf_angle must be positive, got {}",
                self.card.leaf_angle
            )));
        }
        for (name, opacity) in [
            ("extract.card_opacity", self.extract.card_opacity),
            ("extract.envelope_opacity", self.extract.envelope_opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {opacity}"
                )));
            }
        }
        Ok(())
    }
}
