//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives next
//! to the content document and overrides stock defaults key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content = "content.yaml"  # Content document, relative to the config directory
//! title = "Home"            # <title> fallback when brand.name is missing
//!
//! [gallery]
//! interval_ms = 5000        # Auto-rotation period of the about gallery
//!
//! [loading]
//! text = "Loading..."       # Placeholder text when ui.loading is absent
//!
//! [colors.light]
//! background = "#f6fbf7"
//! surface = "#ffffff"
//! text = "#1f2a22"
//! text_muted = "#5b6b60"
//! accent = "#5fae7e"
//! accent_soft = "#d4ecdc"
//!
//! [colors.dark]
//! background = "#0f1511"
//! surface = "#18211b"
//! text = "#e8f1ea"
//! text_muted = "#9fb3a5"
//! accent = "#8fd0a8"
//! accent_soft = "#2a3d30"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [gallery]
//! interval_ms = 4000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content document file name, relative to the config directory.
    pub content: String,
    /// Page title used when the content document has no `brand.name`.
    pub title: String,
    /// Image gallery settings.
    pub gallery: GalleryConfig,
    /// Placeholder settings.
    pub loading: LoadingConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: "content.yaml".to_string(),
            title: "Home".to_string(),
            gallery: GalleryConfig::default(),
            loading: LoadingConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "gallery.interval_ms must be greater than 0".into(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(ConfigError::Validation("content must not be empty".into()));
        }
        Ok(())
    }
}

/// Image gallery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Milliseconds between automatic advances.
    pub interval_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

/// Placeholder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Shown in section placeholders when the document has no `ui.loading`.
    pub text: String,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            text: "Loading...".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Card and header background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (subtitles, descriptions, footer links).
    pub text_muted: String,
    /// Buttons, headings and active indicators.
    pub accent: String,
    /// Soft accent for badges, placeholders and outlines.
    pub accent_soft: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f6fbf7".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f2a22".to_string(),
            text_muted: "#5b6b60".to_string(),
            accent: "#5fae7e".to_string(),
            accent_soft: "#d4ecdc".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0f1511".to_string(),
            surface: "#18211b".to_string(),
            text: "#e8f1ea".to_string(),
            text_muted: "#9fb3a5".to_string(),
            accent: "#8fd0a8".to_string(),
            accent_soft: "#2a3d30".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Stock defaults as a TOML table: the layer every `config.toml` is laid over.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base` in place. Tables merge key by key, any other
/// value replaces what was there.
pub fn merge_into(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(table), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match table.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// The parsed `config.toml` in `dir`, or `None` when there is no such file.
pub fn read_overlay(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let text = match fs::read_to_string(dir.join("config.toml")) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Stock defaults, overlaid with `overlay` when present, deserialized and
/// validated.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(overlay) = overlay {
        merge_into(&mut merged, overlay);
    }
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for the site rooted at `dir`.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config = resolve_config(read_overlay(dir)?)?;
    tracing::debug!(dir = %dir.display(), content = %config.content, "config loaded");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Landing Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to the content document.
# Unknown keys will cause an error.

# Content document, relative to this directory (.yaml, .yml, .json or .toml).
content = "content.yaml"

# Page <title> used when the content document has no brand.name.
title = "Home"

# ---------------------------------------------------------------------------
# Image gallery (about section)
# ---------------------------------------------------------------------------
[gallery]
# Milliseconds between automatic advances. Picking an image by hand does not
# restart this period.
interval_ms = 5000

# ---------------------------------------------------------------------------
# Placeholders
# ---------------------------------------------------------------------------
[loading]
# Shown while a section is loading, unless the document sets ui.loading.
text = "Loading..."

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f6fbf7"
surface = "#ffffff"
text = "#1f2a22"
text_muted = "#5b6b60"
accent = "#5fae7e"
accent_soft = "#d4ecdc"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0f1511"
surface = "#18211b"
text = "#e8f1ea"
text_muted = "#9fb3a5"
accent = "#8fd0a8"
accent_soft = "#2a3d30"
"##
}

// =============================================================================
// CSS
// =============================================================================

impl ColorScheme {
    /// `(custom property, value)` pairs in stylesheet order.
    pub fn custom_properties(&self) -> [(&'static str, &str); 6] {
        [
            ("--color-bg", self.background.as_str()),
            ("--color-surface", self.surface.as_str()),
            ("--color-text", self.text.as_str()),
            ("--color-text-muted", self.text_muted.as_str()),
            ("--color-accent", self.accent.as_str()),
            ("--color-accent-soft", self.accent_soft.as_str()),
        ]
    }
}

fn root_block(scheme: &ColorScheme, depth: usize) -> String {
    let pad = "    ".repeat(depth);
    let mut css = format!("{pad}:root {{\n");
    for (name, value) in scheme.custom_properties() {
        css.push_str(&format!("{pad}    {name}: {value};\n"));
    }
    css.push_str(&format!("{pad}}}"));
    css
}

/// `:root` custom properties for the light scheme, overridden inside a
/// `prefers-color-scheme: dark` media query.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        "{}\n\n@media (prefers-color-scheme: dark) {{\n{}\n}}",
        root_block(&colors.light, 0),
        root_block(&colors.dark, 1)
    )
}
