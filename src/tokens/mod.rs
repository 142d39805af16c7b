//! Canonical token model
//!
//! Every adapter produces a [`TokenStore`]; every renderer consumes one.
//! Categories are a closed set so dispatch over them is exhaustive.

pub mod classify;
pub mod convert;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use classify::{classify, sanitize_name};
pub use convert::{color_to_string, convert_value, parse_color_literal, FigmaColor, Rgba};
pub use store::{StoreIssue, StoreMetadata, TokenStore};

/// The six fixed token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Color,
    Typography,
    Spacing,
    BorderRadius,
    Shadow,
    Opacity,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Color,
        Category::Typography,
        Category::Spacing,
        Category::BorderRadius,
        Category::Shadow,
        Category::Opacity,
    ];

    /// Key used for this category in the token store JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Color => "color",
            Category::Typography => "typography",
            Category::Spacing => "spacing",
            Category::BorderRadius => "borderRadius",
            Category::Shadow => "shadow",
            Category::Opacity => "opacity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown token category '{}'", s))
    }
}

/// Declared type of a Figma variable (`resolvedType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
}

impl VariableType {
    /// Lower-case tag written into a token's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Color => "color",
            VariableType::Float => "float",
            VariableType::String => "string",
            VariableType::Boolean => "boolean",
        }
    }
}

/// Font weight as Figma or a hand-written store may carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontValue {
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowValue {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(rename = "colorHex", alias = "color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A token value: scalar or structured.
///
/// Variant order matters for the untagged decode; `Raw` keeps anything
/// else so the renderer can fall back instead of failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Font(FontValue),
    Shadow(ShadowValue),
    Raw(serde_json::Value),
}

impl TokenValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            TokenValue::Text(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for TokenValue {
    fn from(n: f64) -> Self {
        TokenValue::Number(n)
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// The atomic unit of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub value: TokenValue,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl Token {
    pub fn new(value: impl Into<TokenValue>) -> Self {
        Self {
            value: value.into(),
            kind: None,
            description: None,
            metadata: None,
        }
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
