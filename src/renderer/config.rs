//! SVG output options

use serde::Deserialize;

/// How the scene is written out as an SVG document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Space left around the scene bounds in the viewBox
    pub margin: f64,
    /// Emit an `<?xml ...?>` line before the `<svg>` element
    pub xml_declaration: bool,
    /// One element per line, nested groups indented
    pub indent: bool,
    /// Prepended to every class name; empty for bare names
    pub class_prefix: String,
    /// Scene y grows upward; the document wraps the body in a mirroring group
    pub flip_y: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            margin: 60.0,
            xml_declaration: true,
            indent: true,
            class_prefix: "gf-".to_string(),
            flip_y: true,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Whether the output starts with an XML declaration, for writing to a file
    pub fn with_xml_declaration(mut self, declare: bool) -> Self {
        self.xml_declaration = declare;
        self
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_flip_y(mut self, flip: bool) -> Self {
        self.flip_y = flip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_flip_and_prefix() {
        let config = SvgConfig::default();
        assert!(config.flip_y);
        assert_eq!(config.class_prefix, "gf-");
        assert_eq!(config.margin, 60.0);
    }

    #[test]
    fn test_inline_fragment() {
        let config = SvgConfig::new()
            .with_xml_declaration(false)
            .with_indent(false)
            .with_class_prefix("")
            .with_margin(0.0);
        assert_eq!(
            config,
            SvgConfig {
                margin: 0.0,
                xml_declaration: false,
                indent: false,
                class_prefix: String::new(),
                flip_y: true,
            }
        );
    }

    #[test]
    fn test_toml_keeps_unset_options() {
        let config: SvgConfig = toml::from_str("flip_y = false\nclass_prefix = \"chart-\"").unwrap();
        assert!(!config.flip_y);
        assert_eq!(config.class_prefix, "chart-");
        assert!(config.indent);
        assert!(config.xml_declaration);
    }
}
