//! Minimal SVG document builder used as the drawing surface for charts.
//!
//! Coordinates are written with two decimals so identical drawings produce
//! identical markup (and therefore identical raster snapshots).

use std::fmt::Write as _;

use crate::radar::geometry::Point;

pub const FONT_FAMILY: &str = "Inter, sans-serif";
pub const NEUTRAL_TEXT: &str = "#374151";
pub const MUTED_TEXT: &str = "#6b7280";
pub const BACKGROUND: &str = "#ffffff";

pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    /// Starts a document with an opaque white background.
    pub fn new(width: u32, height: u32) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        let _ = writeln!(
            doc.body,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{BACKGROUND}"/>"#
        );
        doc
    }

    pub fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: Option<(&str, f64)>) {
        let stroke = stroke_attrs(stroke);
        let _ = writeln!(
            self.body,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{fill}"{stroke}/>"#,
            center.x, center.y, radius
        );
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: &str, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{width}"/>"#,
            from.x, from.y, to.x, to.y
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{fill}"/>"#
        );
    }

    /// Closed polygon, filled at `fill_opacity` and stroked at full opacity.
    pub fn polygon(&mut self, points: &[Point], color: &str, fill_opacity: f64, stroke_width: f64) {
        let mut coords = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                coords.push(' ');
            }
            let _ = write!(coords, "{:.2},{:.2}", p.x, p.y);
        }
        let _ = writeln!(
            self.body,
            r#"<polygon points="{coords}" fill="{color}" fill-opacity="{fill_opacity}" stroke="{color}" stroke-width="{stroke_width}" stroke-linejoin="round"/>"#
        );
    }

    pub fn text(&mut self, at: Point, content: &str, size: u32, fill: &str, anchor: &str) {
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{size}" fill="{fill}" text-anchor="{anchor}">{}</text>"#,
            at.x,
            at.y,
            escape_xml(content)
        );
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn stroke_attrs(stroke: Option<(&str, f64)>) -> String {
    match stroke {
        Some((color, width)) => format!(r#" stroke="{color}" stroke-width="{width}""#),
        None => String::new(),
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Accepts `#rgb`/`#rrggbb`/`#rrggbbaa` hex colors and plain color names;
/// anything else falls back to `fallback`.
pub fn sanitize_color<'a>(color: &'a str, fallback: &'a str) -> &'a str {
    let color = color.trim();
    let is_hex = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    let is_name = !color.is_empty() && color.len() <= 32 && color.chars().all(|c| c.is_ascii_alphabetic());
    if is_hex || is_name {
        color
    } else {
        fallback
    }
}
