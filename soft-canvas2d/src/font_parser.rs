//! CSS font string parsing.
//!
//! Turns strings like `"12px Arial"` or `"bold italic 14pt 'Times New Roman'"`
//! into a [`FontRequest`] handed to the glyph provider.

use crate::error::{Canvas2dError, Canvas2dResult};
use std::fmt;

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Numeric font weight, 100 to 900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

/// A font as requested by the `font` property.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub style: FontStyle,
    pub weight: FontWeight,
    /// Font size in pixels.
    pub size_px: f64,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for FontRequest {
    fn default() -> Self {
        Self {
            style: FontStyle::Normal,
            weight: FontWeight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl fmt::Display for FontRequest {
    /// Serialize back to a CSS font shorthand.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => f.write_str("italic ")?,
            FontStyle::Oblique => f.write_str("oblique ")?,
        }
        match self.weight {
            FontWeight::NORMAL => {}
            FontWeight::BOLD => f.write_str("bold ")?,
            FontWeight(w) => write!(f, "{} ", w)?,
        }
        write!(f, "{}px ", self.size_px)?;
        let families: Vec<String> = self
            .families
            .iter()
            .map(|family| {
                if family.contains(' ') {
                    format!("\"{}\"", family)
                } else {
                    family.clone()
                }
            })
            .collect();
        f.write_str(&families.join(", "))
    }
}

impl std::str::FromStr for FontRequest {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_font(s)
    }
}

/// Parse a CSS font string.
///
/// Format: `[style] [variant] [weight] size[/line-height] family[, family]*`
///
/// Examples:
/// - "12px Arial"
/// - "bold 14px sans-serif"
/// - "italic bold 12pt 'Times New Roman', serif"
/// - "700 16px/20px Helvetica"
pub fn parse_font(font_str: &str) -> Canvas2dResult<FontRequest> {
    let font_str = font_str.trim();
    if font_str.is_empty() {
        return Ok(FontRequest::default());
    }

    let mut result = FontRequest::default();
    let mut remaining = font_str;

    // Style, variant and weight in any order.
    loop {
        let trimmed = remaining.trim_start();
        if let Some(rest) = strip_keyword(trimmed, "italic") {
            result.style = FontStyle::Italic;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "oblique") {
            result.style = FontStyle::Oblique;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "normal")
            .or_else(|| strip_keyword(trimmed, "small-caps"))
        {
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "bold") {
            result.weight = FontWeight::BOLD;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "bolder") {
            result.weight = FontWeight::EXTRA_BOLD;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "lighter") {
            result.weight = FontWeight::LIGHT;
            remaining = rest;
        } else if let Some((weight, rest)) = parse_numeric_weight(trimmed) {
            result.weight = weight;
            remaining = rest;
        } else {
            break;
        }
    }

    remaining = remaining.trim_start();
    let (size, rest) = parse_font_size(remaining)?;
    result.size_px = size;
    remaining = rest;

    remaining = remaining.trim_start();
    if let Some(rest) = remaining.strip_prefix('/') {
        remaining = skip_line_height(rest);
    }

    remaining = remaining.trim_start();
    if !remaining.is_empty() {
        result.families = parse_font_families(remaining);
    }

    Ok(result)
}

/// Strip `keyword` when it is a whole word at the start of `s`.
fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(keyword)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Numeric weight (100-900, multiples of 100) at the start of the string.
fn parse_numeric_weight(s: &str) -> Option<(FontWeight, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let weight: u16 = s[..len].parse().ok()?;
    if !(100..=900).contains(&weight) || weight % 100 != 0 {
        return None;
    }
    let rest = &s[len..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((FontWeight(weight), rest))
}

/// Font size in pixels and the rest of the string.
fn parse_font_size(s: &str) -> Canvas2dResult<(f64, &str)> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if num_end == 0 {
        return Err(Canvas2dError::FontParseError(format!(
            "Expected font size, got: {}",
            s
        )));
    }

    let (num_str, rest) = s.split_at(num_end);
    let size: f64 = num_str.parse().map_err(|_| {
        Canvas2dError::FontParseError(format!("Invalid font size number: {}", num_str))
    })?;

    const UNITS: [(&str, f64); 5] = [
        ("px", 1.0),
        ("pt", 4.0 / 3.0),
        ("rem", 16.0),
        ("em", 16.0),
        ("%", 0.16),
    ];
    for (unit, multiplier) in UNITS {
        if let Some(rest) = rest.strip_prefix(unit) {
            return Ok((size * multiplier, rest));
        }
    }
    Ok((size, rest))
}

fn skip_line_height(s: &str) -> &str {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    &s[end..]
}

fn parse_font_families(s: &str) -> Vec<String> {
    let families: Vec<String> = s
        .split(',')
        .map(|family| {
            family
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
        .filter(|family| !family.is_empty())
        .collect();

    if families.is_empty() {
        vec!["sans-serif".to_string()]
    } else {
        families
    }
}
