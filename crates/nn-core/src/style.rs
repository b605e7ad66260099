//! Presentation properties for page labels.
//!
//! Values are kept as CSS-like strings (`"14px"`, `"#ff0000"`, `"bold"`) so
//! page files written by any version of the authoring tools read back
//! unchanged. Numeric JSON values are accepted and treated as pixels.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ─── Defaults ─────────────────────────────────────────────────────────────

pub const DEFAULT_COLOR: &str = "white";
pub const DEFAULT_FONT_SIZE: &str = "12px";
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_FONT_WEIGHT: &str = "normal";
pub const DEFAULT_FONT_STYLE: &str = "normal";
pub const DEFAULT_TEXT_DECORATION: &str = "none";
pub const DEFAULT_PADDING: &str = "2px";
pub const DEFAULT_BORDER_WIDTH: &str = "0px";
pub const DEFAULT_BORDER_STYLE: &str = "none";
pub const DEFAULT_BORDER_COLOR: &str = "white";
pub const DEFAULT_BORDER_RADIUS: &str = "0px";
pub const DEFAULT_BACKGROUND_COLOR: &str = "transparent";

// ─── PageStyle ────────────────────────────────────────────────────────────

/// Visual style of a page label. Every field has a documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStyle {
    #[serde(deserialize_with = "css_value")]
    pub color: String,
    #[serde(deserialize_with = "css_value")]
    pub font_size: String,
    #[serde(deserialize_with = "css_value")]
    pub font_family: String,
    #[serde(deserialize_with = "css_value")]
    pub font_weight: String,
    #[serde(deserialize_with = "css_value")]
    pub font_style: String,
    #[serde(deserialize_with = "css_value")]
    pub text_decoration: String,
    #[serde(deserialize_with = "css_value")]
    pub padding: String,
    #[serde(deserialize_with = "css_value")]
    pub border_width: String,
    #[serde(deserialize_with = "css_value")]
    pub border_style: String,
    #[serde(deserialize_with = "css_value")]
    pub border_color: String,
    #[serde(deserialize_with = "css_value")]
    pub border_radius: String,
    #[serde(deserialize_with = "css_value")]
    pub background_color: String,

    /// Keys this version does not know about, preserved on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            font_family: DEFAULT_FONT_FAMILY.into(),
            font_weight: DEFAULT_FONT_WEIGHT.into(),
            font_style: DEFAULT_FONT_STYLE.into(),
            text_decoration: DEFAULT_TEXT_DECORATION.into(),
            padding: DEFAULT_PADDING.into(),
            border_width: DEFAULT_BORDER_WIDTH.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
            border_color: DEFAULT_BORDER_COLOR.into(),
            border_radius: DEFAULT_BORDER_RADIUS.into(),
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl PageStyle {
    /// Font size in pixels, falling back to the default when unparseable.
    pub fn font_size_px(&self) -> f64 {
        px(&self.font_size).unwrap_or(12.0)
    }

    /// Padding in pixels (first value of a shorthand).
    pub fn padding_px(&self) -> f64 {
        px(&self.padding).unwrap_or(2.0)
    }

    /// Border width in pixels; zero when the border style is `none`.
    pub fn border_width_px(&self) -> f64 {
        if self.border_style.trim() == "none" {
            return 0.0;
        }
        px(&self.border_width).unwrap_or(0.0)
    }

    /// Render as a CSS declaration list, e.g. `color: white; font-size: 12px`.
    /// Underscores in keys become hyphens. Extra keys follow the known ones.
    pub fn to_css(&self) -> String {
        let known = [
            ("color", &self.color),
            ("font_size", &self.font_size),
            ("font_family", &self.font_family),
            ("font_weight", &self.font_weight),
            ("font_style", &self.font_style),
            ("text_decoration", &self.text_decoration),
            ("padding", &self.padding),
            ("border_width", &self.border_width),
            ("border_style", &self.border_style),
            ("border_color", &self.border_color),
            ("border_radius", &self.border_radius),
            ("background_color", &self.background_color),
        ];
        let mut decls: Vec<String> = known
            .iter()
            .map(|(k, v)| format!("{}: {}", k.replace('_', "-"), v))
            .collect();
        for (k, v) in &self.extra {
            let value = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            decls.push(format!("{}: {}", k.replace('_', "-"), value));
        }
        decls.join("; ")
    }
}

/// Parse the leading length of a CSS value in pixels: `"14px"`, `"14"`, `"1.5px 3px"`.
pub fn px(value: &str) -> Option<f64> {
    let first = value.split_whitespace().next()?;
    let number = first.strip_suffix("px").unwrap_or(first);
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accept a string or a bare number (read as pixels) for a style value.
fn css_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => format!("{n}px"),
        Raw::Float(n) => format!("{n}px"),
    })
}
