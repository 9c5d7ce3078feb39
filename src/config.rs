//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is sparse: stock defaults are serialized to a TOML
//! table and the user's values are merged over it key by key before the
//! result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! author = ""               # Footer credit; falls back to profile name
//! lang = "en"
//!
//! [colors]
//! primary = "#1a1a2e"       # Page background
//! secondary = "#16213e"     # Alternate section / card background
//! accent = "#0f3460"        # Borders, chips
//! highlight = "#e94560"     # Links, buttons, headings accent
//! text = "#ffffff"
//! text_muted = "#9ca3af"
//!
//! [navigation]
//! scroll_threshold = 50     # px scrolled before the bar switches style
//! mobile_breakpoint = 768   # px width above which the mobile panel closes
//!
//! [relay]
//! endpoint = "https://api.emailjs.com/api/v1.0/email/send"
//! service_id = ""
//! template_id = ""
//! public_key = ""           # or FOLIO_RELAY_PUBLIC_KEY
//! recipient = ""
//! timeout_secs = 10
//! reset_delay_secs = 5
//!
//! [simulation]
//! viewport_height = 800
//! step = 100
//!
//! [simulation.heights]
//! home = 900
//! about = 800
//! skills = 1400
//! projects = 1300
//! experience = 1500
//! contact = 1200
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SectionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `relay.public_key`.
pub const PUBLIC_KEY_ENV: &str = "FOLIO_RELAY_PUBLIC_KEY";

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
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page title and footer credit.
    pub site: SiteMeta,
    /// Palette injected as CSS custom properties.
    pub colors: ColorConfig,
    /// Navigation shell thresholds.
    pub navigation: NavigationConfig,
    /// Email relay used by the contact form.
    pub relay: RelayConfig,
    /// Virtual viewport used by `folio simulate`.
    pub simulation: SimulationConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relay.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "relay.timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.relay.endpoint.starts_with("http://") && !self.relay.endpoint.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "relay.endpoint must be an http(s) URL".into(),
            ));
        }
        if self.navigation.mobile_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "navigation.mobile_breakpoint must be greater than 0".into(),
            ));
        }
        if self.navigation.scroll_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "navigation.scroll_threshold must not be negative".into(),
            ));
        }
        if self.simulation.viewport_height <= 0.0 || self.simulation.step <= 0.0 {
            return Err(ConfigError::Validation(
                "simulation.viewport_height and simulation.step must be positive".into(),
            ));
        }
        if SectionId::ALL
            .iter()
            .any(|s| self.simulation.heights.get(*s) < 0.0)
        {
            return Err(ConfigError::Validation(
                "simulation.heights must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// `<title>` and nav logo text.
    pub title: String,
    /// Footer credit. Empty means "use the profile name".
    pub author: String,
    /// `<html lang>` attribute.
    pub lang: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: String::new(),
            lang: "en".to_string(),
        }
    }
}

/// Page palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub highlight: String,
    pub text: String,
    pub text_muted: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#1a1a2e".to_string(),
            secondary: "#16213e".to_string(),
            accent: "#0f3460".to_string(),
            highlight: "#e94560".to_string(),
            text: "#ffffff".to_string(),
            text_muted: "#9ca3af".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Scroll offset in px past which the bar takes its "scrolled" style.
    pub scroll_threshold: f64,
    /// Window width in px above which a resize closes the mobile panel.
    pub mobile_breakpoint: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            mobile_breakpoint: 768,
        }
    }
}

/// Email relay settings.
///
/// The shipped relay speaks the EmailJS REST API. The public key is a
/// publishable key (it ends up in the page), but it is still kept out of the
/// content tree where possible via [`PUBLIC_KEY_ENV`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Private access token, only used by the CLI `send` command. Never
    /// written to the manifest.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Address the messages are delivered to.
    pub recipient: String,
    /// Upper bound on one relay call.
    pub timeout_secs: u64,
    /// Delay before a sent form reverts to idle.
    pub reset_delay_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            access_token: None,
            recipient: String::new(),
            timeout_secs: 10,
            reset_delay_secs: 5,
        }
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }

    /// Whether enough is set to actually reach the relay.
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty()
            && !self.template_id.is_empty()
            && !self.public_key.is_empty()
            && !self.recipient.is_empty()
    }

    /// Replace the public key when an override is present and non-empty.
    pub fn with_public_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.public_key = key;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub viewport_height: f64,
    /// Scroll distance between two simulated frames.
    pub step: f64,
    /// Estimated rendered height of each section.
    pub heights: SectionHeights,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            step: 100.0,
            heights: SectionHeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionHeights {
    pub home: f64,
    pub about: f64,
    pub skills: f64,
    pub projects: f64,
    pub experience: f64,
    pub contact: f64,
}

impl Default for SectionHeights {
    fn default() -> Self {
        Self {
            home: 900.0,
            about: 800.0,
            skills: 1400.0,
            projects: 1300.0,
            experience: 1500.0,
            contact: 1200.0,
        }
    }
}

impl SectionHeights {
    pub fn get(&self, section: SectionId) -> f64 {
        match section {
            SectionId::Home => self.home,
            SectionId::About => self.about,
            SectionId::Skills => self.skills,
            SectionId::Projects => self.projects,
            SectionId::Experience => self.experience,
            SectionId::Contact => self.contact,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// validates, then applies the [`PUBLIC_KEY_ENV`] override.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let mut config = resolve_config(base, overlay)?;
    config.relay = config
        .relay
        .with_public_key_override(std::env::var(PUBLIC_KEY_ENV).ok());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Page <title> and navigation logo text.
title = "Portfolio"

# Footer credit. Leave empty to use the name from profile.toml.
author = ""

# <html lang> attribute.
lang = "en"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
primary = "#1a1a2e"       # Page background
secondary = "#16213e"     # Alternate sections, cards
accent = "#0f3460"        # Borders, technology chips
highlight = "#e94560"     # Links, buttons, heading accents
text = "#ffffff"
text_muted = "#9ca3af"

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# Pixels scrolled before the navigation bar switches to its solid style.
scroll_threshold = 50.0

# Window width in pixels above which resizing closes the mobile menu.
mobile_breakpoint = 768

# ---------------------------------------------------------------------------
# Contact form email relay (EmailJS REST API)
# ---------------------------------------------------------------------------
[relay]
endpoint = "https://api.emailjs.com/api/v1.0/email/send"
service_id = ""
template_id = ""

# Publishable key. Can be supplied through FOLIO_RELAY_PUBLIC_KEY instead.
public_key = ""

# Private access token for `folio send`. Never rendered into the page.
# access_token = ""

# Address that receives contact form messages.
recipient = ""

# Seconds before a relay call is abandoned and reported as a failure.
timeout_secs = 10

# Seconds the thank-you panel stays up before the form resets.
reset_delay_secs = 5

# ---------------------------------------------------------------------------
# Scroll simulation (folio simulate)
# ---------------------------------------------------------------------------
[simulation]
viewport_height = 800.0
step = 100.0

# Estimated rendered height of each section in pixels.
[simulation.heights]
home = 900.0
about = 800.0
skills = 1400.0
projects = 1300.0
experience = 1500.0
contact = 1200.0
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-secondary: {secondary};
    --color-accent: {accent};
    --color-highlight: {highlight};
    --color-text: {text};
    --color-text-muted: {text_muted};
}}"#,
        primary = colors.primary,
        secondary = colors.secondary,
        accent = colors.accent,
        highlight = colors.highlight,
        text = colors.text,
        text_muted = colors.text_muted,
    )
}
