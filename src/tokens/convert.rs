//! Value conversion from Figma's raw variable values

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TokenValue, VariableType};

/// A Figma color: linear channels in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigmaColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// 8-bit channels plus a 0..=1 alpha, as parsed back out of a stored literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// `#rrggbb` for opaque colors, `rgba(r, g, b, a)` otherwise.
pub fn color_to_string(color: &FigmaColor) -> String {
    let (r, g, b) = (channel(color.r), channel(color.g), channel(color.b));
    if color.a >= 1.0 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("rgba({}, {}, {}, {})", r, g, b, color.a)
    }
}

/// Convert a raw `valuesByMode` entry by its declared type.
///
/// Aliases and values that do not match the declared type give `None`.
pub fn convert_value(variable_type: VariableType, raw: &Value) -> Option<TokenValue> {
    if is_alias(raw) {
        return None;
    }
    match variable_type {
        VariableType::Color => serde_json::from_value::<FigmaColor>(raw.clone())
            .ok()
            .map(|c| TokenValue::Text(color_to_string(&c))),
        VariableType::Float => match raw {
            Value::Number(n) => n.as_f64().map(TokenValue::Number),
            Value::String(s) => s.trim().parse().ok().map(TokenValue::Number),
            _ => None,
        },
        VariableType::String => raw.as_str().map(|s| TokenValue::Text(s.to_string())),
        VariableType::Boolean => raw.as_bool().map(TokenValue::Bool),
    }
}

pub fn is_alias(raw: &Value) -> bool {
    raw.get("type").and_then(Value::as_str) == Some("VARIABLE_ALIAS")
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` or `rgba(...)`.
pub fn parse_color_literal(literal: &str) -> Option<Rgba> {
    let literal = literal.trim();
    if let Some(hex) = literal.strip_prefix('#') {
        return parse_hex(hex);
    }
    let inner = literal
        .strip_prefix("rgba(")
        .or_else(|| literal.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let byte = |s: &str| s.parse::<f64>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8);
    match parts.as_slice() {
        [r, g, b] => Some(Rgba {
            r: byte(r)?,
            g: byte(g)?,
            b: byte(b)?,
            a: 1.0,
        }),
        [r, g, b, a] => Some(Rgba {
            r: byte(r)?,
            g: byte(g)?,
            b: byte(b)?,
            a: a.parse().ok()?,
        }),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgba {
                r: nib(0)?,
                g: nib(1)?,
                b: nib(2)?,
                a: 1.0,
            })
        }
        6 => Some(Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: 1.0,
        }),
        8 => Some(Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: f64::from(pair(6)?) / 255.0,
        }),
        _ => None,
    }
}
