//! Categorical colour palette
//!
//! Nodes whose fill is bound to a data value receive palette colours in the
//! order their values are first seen. The palette can be replaced from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default palette: blue, red, green, yellow, purple, fuchsia
const DEFAULT_COLORS: [&str; 6] = [
    "#3b82f6", "#ef4444", "#22c55e", "#eab308", "#a855f7", "#d946ef",
];

/// Colour used when a palette is empty
const FALLBACK_COLOR: &str = "#333333";

/// An ordered list of categorical colours
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Optional name for the palette
    pub name: Option<String>,
    /// Colours in assignment order
    pub colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            name: None,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// TOML layout of a standalone palette file
#[derive(Deserialize)]
struct TomlPalette {
    palette: Palette,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { name: None, colors }
    }

    /// Load a palette from a TOML file with a `[palette]` table
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a palette from a TOML string with a `[palette]` table
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlPalette = toml::from_str(content)?;
        Ok(parsed.palette)
    }

    /// Colour for the `index`-th registered value, cycling through the palette
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_has_six_colors() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.color(0), "#3b82f6");
        assert_eq!(palette.color(6), palette.color(0));
    }

    #[test]
    fn test_parse_palette() {
        let toml = r##"
[palette]
name = "mono"
colors = ["#000000", "#777777"]
"##;
        let palette = Palette::from_toml_str(toml).unwrap();
        assert_eq!(palette.name.as_deref(), Some("mono"));
        assert_eq!(palette.color(3), "#777777");
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let palette = Palette::new(vec![]);
        assert_eq!(palette.color(2), FALLBACK_COLOR);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Palette::from_toml_str("[palette\ncolors = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Palette::from_file(Path::new("/nonexistent/palette.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
