//! SVG output backend

use crate::layout::types::{BoundingBox, Point, Size};
use crate::path::Path;

use super::{Backend, Style, SvgConfig};

/// Renders placed nodes as SVG markup.
///
/// Each rendered node is a list of lines; groups indent their children's
/// lines so the final document nests the way the scene does.
pub struct SvgBackend {
    config: SvgConfig,
    needs_arrow: bool,
}

impl SvgBackend {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            needs_arrow: false,
        }
    }

    fn prefix(&self) -> &str {
        &self.config.class_prefix
    }

    fn indent(&self, line: &str) -> String {
        if self.config.indent {
            format!("  {line}")
        } else {
            line.to_string()
        }
    }

    fn newline(&self) -> &str {
        if self.config.indent {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, kind: &str, style: &Style) -> String {
        let prefix = self.prefix();
        let mut classes = vec![format!("{prefix}{kind}")];
        if let Some(class) = style.class {
            classes.push(format!("{prefix}{class}"));
        }
        classes.join(" ")
    }

    fn arrow_marker(&self) -> String {
        let prefix = self.prefix();
        // Arrow head points along +x; orient="auto" turns it with the path
        format!(
            r#"<marker id="{prefix}arrow" viewBox="0 0 10 10" refX="8" refY="5" markerWidth="4" markerHeight="4" markerUnits="strokeWidth" orient="auto"><path d="M0,0 L10,5 L0,10 Z" fill="context-stroke"/></marker>"#
        )
    }

    /// Assemble the document around the rendered root
    pub fn finish(self, root: Vec<String>, viewbox: BoundingBox) -> String {
        let margin = self.config.margin;
        let vb_x = viewbox.x - margin;
        let vb_y = if self.config.flip_y {
            -(viewbox.y + viewbox.height) - margin
        } else {
            viewbox.y - margin
        };
        let vb_w = viewbox.width + 2.0 * margin;
        let vb_h = viewbox.height + 2.0 * margin;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.xml_declaration {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            fmt_num(vb_x),
            fmt_num(vb_y),
            fmt_num(vb_w),
            fmt_num(vb_h)
        ));
        svg.push_str(nl);

        if self.needs_arrow {
            svg.push_str(&self.indent("<defs>"));
            svg.push_str(nl);
            svg.push_str(&self.indent(&self.indent(&self.arrow_marker())));
            svg.push_str(nl);
            svg.push_str(&self.indent("</defs>"));
            svg.push_str(nl);
        }

        let body = if self.config.flip_y {
            let mut flipped = vec![r#"<g transform="scale(1, -1)">"#.to_string()];
            flipped.extend(root.iter().map(|line| self.indent(line)));
            flipped.push("</g>".to_string());
            flipped
        } else {
            root
        };
        for line in &body {
            svg.push_str(&self.indent(line));
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

impl Backend for SvgBackend {
    type Output = Vec<String>;

    fn group(&mut self, translate: Point, scale: Size<f64>, children: Vec<Vec<String>>) -> Vec<String> {
        let mut transform = format!("translate({}, {})", fmt_num(translate.x), fmt_num(translate.y));
        if scale != [1.0, 1.0] {
            transform.push_str(&format!(" scale({}, {})", fmt_num(scale[0]), fmt_num(scale[1])));
        }
        let mut lines = vec![format!(r#"<g transform="{transform}">"#)];
        for child in children {
            lines.extend(child.iter().map(|line| self.indent(line)));
        }
        lines.push("</g>".to_string());
        lines
    }

    fn rect(&mut self, bounds: BoundingBox, style: &Style) -> Vec<String> {
        vec![format!(
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.class_list("shape", style),
            fmt_num(bounds.x),
            fmt_num(bounds.y),
            fmt_num(bounds.width),
            fmt_num(bounds.height),
            format_styles(style)
        )]
    }

    fn path(&mut self, path: &Path, style: &Style) -> Vec<String> {
        if path.is_empty() {
            return Vec::new();
        }
        let marker = if style.marker_end {
            self.needs_arrow = true;
            format!(r#" marker-end="url(#{}arrow)""#, self.prefix())
        } else {
            String::new()
        };
        vec![format!(
            r#"<path class="{}" d="{}"{}{}/>"#,
            self.class_list("path", style),
            path.to_svg_d(),
            format_styles(style),
            marker
        )]
    }

    fn empty(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Shortest decimal form with at most two fractional digits
pub fn fmt_num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Format a style as SVG attributes
fn format_styles(style: &Style) -> String {
    let mut parts = vec![];
    if let Some(fill) = &style.fill {
        parts.push(format!(r#" fill="{}""#, escape_xml(fill)));
    }
    if let Some(stroke) = &style.stroke {
        parts.push(format!(r#" stroke="{}""#, escape_xml(stroke)));
    }
    if let Some(sw) = style.stroke_width {
        parts.push(format!(r#" stroke-width="{}""#, fmt_num(sw)));
    }
    if let Some(op) = style.opacity {
        if op < 1.0 {
            parts.push(format!(r#" opacity="{}""#, fmt_num(op)));
        }
    }
    parts.join("")
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn backend() -> SvgBackend {
        SvgBackend::new(SvgConfig::new().with_xml_declaration(false).with_margin(0.0))
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#""quoted""#), "&quot;quoted&quot;");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.33");
        assert_eq!(fmt_num(-0.001), "0");
    }

    #[test]
    fn test_format_styles() {
        let style = Style {
            fill: Some("red".to_string()),
            stroke: Some("blue".to_string()),
            stroke_width: Some(2.0),
            opacity: Some(0.5),
            ..Style::default()
        };
        assert_eq!(
            format_styles(&style),
            r#" fill="red" stroke="blue" stroke-width="2" opacity="0.5""#
        );

        let opaque = Style {
            opacity: Some(1.0),
            ..Style::default()
        };
        assert_eq!(format_styles(&opaque), "");
    }

    #[test]
    fn test_group_nests_children() {
        let mut svg = backend();
        let style = Style {
            fill: Some("#4e79a7".to_string()),
            class: Some("rect"),
            ..Style::default()
        };
        let rect = svg.rect(BoundingBox::new(0.0, 0.0, 10.0, 25.6), &style);
        let group = svg.group(Point::new(5.0, 0.0), [1.0, 1.0], vec![rect]);
        let doc = svg.finish(group, BoundingBox::new(0.0, 0.0, 15.0, 25.6));
        assert_snapshot!(doc, @r###"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 -25.6 15 25.6">
          <g transform="scale(1, -1)">
            <g transform="translate(5, 0)">
              <rect class="gf-shape gf-rect" x="0" y="0" width="10" height="25.6" fill="#4e79a7"/>
            </g>
          </g>
        </svg>
        "###);
    }

    #[test]
    fn test_marker_defs_only_when_used() {
        let mut svg = SvgBackend::new(SvgConfig::new().with_flip_y(false));
        let plain = svg.path(&Path::line(Point::new(0.0, 0.0), Point::new(1.0, 1.0)), &Style::default());
        assert!(!svg.needs_arrow);

        let arrow = Style {
            marker_end: true,
            ..Style::default()
        };
        let head = svg.path(&Path::line(Point::new(0.0, 0.0), Point::new(5.0, 0.0)), &arrow);
        let doc = svg.finish(vec![plain, head].concat(), BoundingBox::new(0.0, 0.0, 5.0, 1.0));
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<defs>"));
        assert!(doc.contains(r#"marker-end="url(#gf-arrow)""#));
        assert!(doc.contains(r#"viewBox="-60 -60 125 121""#));
        assert!(!doc.contains("scale(1, -1)"));
    }

    #[test]
    fn test_compact_output() {
        let mut svg = SvgBackend::new(
            SvgConfig::new()
                .with_indent(false)
                .with_xml_declaration(false)
                .with_class_prefix(""),
        );
        let rect = svg.rect(BoundingBox::new(1.0, 2.0, 3.0, 4.0), &Style::default());
        let group = svg.group(Point::new(0.0, 0.0), [2.0, 1.0], vec![rect]);
        assert_eq!(
            group,
            vec![
                r#"<g transform="translate(0, 0) scale(2, 1)">"#.to_string(),
                r#"<rect class="shape" x="1" y="2" width="3" height="4"/>"#.to_string(),
                "</g>".to_string(),
            ]
        );
        assert!(svg.empty().is_empty());
    }
}
