use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThemeValueError {
    #[error("unknown font family {0:?} (expected Cinzel, Lato, Serif or Monospace)")]
    Font(String),
    #[error("unknown layout {0:?} (expected grid, list or compact)")]
    Layout(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Cinzel,
    Lato,
    Serif,
    Monospace,
}

impl FontFamily {
    /// Value suitable for a CSS `font-family` declaration.
    #[must_use]
    pub fn css_value(self) -> &'static str {
        match self {
            FontFamily::Cinzel => "Cinzel",
            FontFamily::Lato => "Lato",
            FontFamily::Serif => "Serif",
            FontFamily::Monospace => "monospace",
        }
    }
}

impl FromStr for FontFamily {
    type Err = ThemeValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cinzel" => Ok(FontFamily::Cinzel),
            "lato" => Ok(FontFamily::Lato),
            "serif" => Ok(FontFamily::Serif),
            "monospace" | "mono" => Ok(FontFamily::Monospace),
            _ => Err(ThemeValueError::Font(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Grid,
    List,
    Compact,
}

impl FromStr for LayoutType {
    type Err = ThemeValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(LayoutType::Grid),
            "list" => Ok(LayoutType::List),
            "compact" => Ok(LayoutType::Compact),
            _ => Err(ThemeValueError::Layout(s.to_string())),
        }
    }
}

/// Visual configuration of a storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub card_color: String,
    pub parchment_color: String,
    pub ink_color: String,
    pub border_radius: String,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub show_banner: bool,
    #[serde(default)]
    pub banner_image: String,
    #[serde(default)]
    pub logo_image: String,
    #[serde(default)]
    pub glassmorphism: bool,
}

impl Default for StoreTheme {
    fn default() -> Self {
        Self {
            primary_color: "#d4af37".to_string(),
            secondary_color: "#1c1917".to_string(),
            accent_color: "#facc15".to_string(),
            background_color: "#0c0a09".to_string(),
            card_color: "#1c1917".to_string(),
            parchment_color: "#f5e6c8".to_string(),
            ink_color: "#3a2a1d".to_string(),
            border_radius: "12px".to_string(),
            font_family: FontFamily::Cinzel,
            layout_type: LayoutType::Grid,
            show_banner: true,
            banner_image: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?auto=format&fit=crop&q=80&w=1200".to_string(),
            logo_image: String::new(),
            glassmorphism: true,
        }
    }
}

/// Partial theme edit, merged over the current theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeUpdate {
    pub primary_color: Option<String>,
    pub font_family: Option<FontFamily>,
    pub layout_type: Option<LayoutType>,
    pub banner_image: Option<String>,
}

impl ThemeUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, theme: &mut StoreTheme) {
        if let Some(color) = self.primary_color {
            theme.primary_color = color;
        }
        if let Some(font) = self.font_family {
            theme.font_family = font;
        }
        if let Some(layout) = self.layout_type {
            theme.layout_type = layout;
        }
        if let Some(image) = self.banner_image {
            theme.banner_image = image;
        }
    }
}
