//! Theme management and terminal color resolution.
//!
//! This module defines the color scheme system for the application,
//! supporting both built-in themes (Catppuccin variants) and custom themes
//! loaded from TOML files. Hex colors resolve to 24-bit
//! [`ratatui::style::Color`] values at render time.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! focus_border = "#f5c2e7"
//! accent = "#f9e2af"
//! status_fg = "#f38ba8"
//! empty_state_fg = "#89b4fa"
//! ```
//!
//! # Example
//!
//! ```rust
//! use teisearch::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! let normal = Theme::color(&theme.colors.text_normal);
//! ```

use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::domain::{Result, TeiSearchError};

/// Color scheme configuration for UI rendering.
///
/// Contains theme metadata and color definitions. Can be loaded from
/// built-in themes or custom TOML files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements.
///
/// All colors are specified as hex strings (e.g., "#cdd6f4"). Optional
/// fields default to `None`, allowing themes to opt out of certain styling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Cursor row foreground color.
    pub selection_fg: String,
    /// Cursor row background color.
    pub selection_bg: String,

    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (hints, secondary info, footer).
    pub text_dim: String,

    /// Border color of unfocused panels.
    pub border: String,
    /// Border color of the focused panel and the date picker.
    pub focus_border: String,

    /// Accent color (counter label, confirmed program marker).
    pub accent: String,

    /// Status line color for failure messages.
    pub status_fg: String,

    /// Empty state message color.
    pub empty_state_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Supported names: `catppuccin-mocha`, `catppuccin-latte`,
    /// `catppuccin-frappe`, `catppuccin-macchiato`.
    ///
    /// # Returns
    ///
    /// - `Some(Theme)` if the theme name is recognized
    /// - `None` if the theme name is unknown
    ///
    /// # Example
    ///
    /// ```rust
    /// use teisearch::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Parameters
    ///
    /// * `path` - Path to the TOML file
    ///
    /// # Errors
    ///
    /// Returns [`TeiSearchError::Theme`] if:
    /// - The file cannot be read (file not found, permission denied, etc.)
    /// - The TOML content cannot be parsed (invalid syntax, missing fields,
    ///   type mismatches)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use teisearch::ui::theme::Theme;
    ///
    /// let theme = Theme::from_file("/path/to/theme.toml")?;
    /// # Ok::<(), teisearch::domain::TeiSearchError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TeiSearchError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| TeiSearchError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Resolves a theme from optional configuration.
    ///
    /// A theme file takes precedence over a built-in name; with neither set
    /// the default applies.
    ///
    /// # Errors
    ///
    /// Returns [`TeiSearchError::Theme`] when the file fails to load or the
    /// name matches no built-in theme.
    pub fn resolve(name: Option<&str>, file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            return Self::from_file(path);
        }
        match name {
            Some(name) => Self::from_name(name).ok_or_else(|| {
                TeiSearchError::Theme(format!(
                    "unknown theme '{name}'; built-ins are catppuccin-mocha, \
                     catppuccin-latte, catppuccin-frappe, catppuccin-macchiato"
                ))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Strips `#` prefix if present, validates length, and parses hex
    /// digits. Returns `(255, 255, 255)` (white) on parse errors.
    ///
    /// # Parameters
    ///
    /// * `hex` - Hex color string (e.g., "#cdd6f4" or "cdd6f4")
    ///
    /// # Returns
    ///
    /// An `(r, g, b)` tuple with values 0-255.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Resolves a hex color string to a 24-bit terminal color.
    ///
    /// # Parameters
    ///
    /// * `hex` - Hex color string (e.g., "#cdd6f4")
    ///
    /// # Example
    ///
    /// ```rust
    /// use ratatui::style::Color;
    /// use teisearch::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::color("#000000"), Color::Rgb(0, 0, 0));
    /// ```
    #[must_use]
    pub fn color(hex: &str) -> Color {
        let (r, g, b) = Self::hex_to_rgb(hex);
        Color::Rgb(r, g, b)
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse (should never occur).
    ///
    /// # Example
    ///
    /// ```rust
    /// use teisearch::ui::theme::Theme;
    ///
    /// let theme = Theme::default();
    /// assert_eq!(theme.name, "catppuccin-mocha");
    /// ```
    fn default() -> Self {
        Self::from_name("catppuccin-mocha")
            .expect("Built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_theme_parses() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn resolve_prefers_file_then_name_then_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let custom = toml::to_string(&Theme {
            name: "custom".to_string(),
            ..Theme::default()
        })
        .unwrap();
        std::fs::write(&path, custom).unwrap();

        let theme = Theme::resolve(Some("catppuccin-latte"), Some(&path)).unwrap();
        assert_eq!(theme.name, "custom");

        let theme = Theme::resolve(Some("catppuccin-latte"), None).unwrap();
        assert_eq!(theme.name, "catppuccin-latte");

        let theme = Theme::resolve(None, None).unwrap();
        assert_eq!(theme.name, "catppuccin-mocha");

        assert!(Theme::resolve(Some("solarized"), None).is_err());
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(Theme::color("nope"), Color::Rgb(255, 255, 255));
        assert_eq!(Theme::color("#f5c2e7"), Color::Rgb(0xf5, 0xc2, 0xe7));
    }
}
