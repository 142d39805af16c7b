//! Swift value formatting and the hand-written Swift renderer
//!
//! `declarations` is the single place where token values become Swift
//! literals; both renderers go through it.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use tracing::warn;

use super::{GeneratedFile, Renderer};
use crate::error::Result;
use crate::tokens::{
    parse_color_literal, store::TokenMap, Category, FontValue, FontWeight, ShadowValue, TokenStore,
    TokenValue,
};

pub const SUPPORT_FILE_NAME: &str = "DesignTokens.swift";

const SWIFT_KEYWORDS: &[&str] = &[
    "as", "break", "case", "catch", "class", "continue", "default", "defer", "deinit", "do",
    "else", "enum", "extension", "fallthrough", "false", "fileprivate", "for", "func", "guard",
    "if", "import", "in", "init", "inout", "internal", "is", "let", "nil", "open", "operator",
    "private", "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct",
    "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias", "var",
    "where", "while",
];

/// Swift names for one category: the generated file and its nested enum.
pub fn category_names(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Color => ("DesignTokens+Colors.swift", "Colors"),
        Category::Typography => ("DesignTokens+Typography.swift", "Typography"),
        Category::Spacing => ("DesignTokens+Spacing.swift", "Spacing"),
        Category::BorderRadius => ("DesignTokens+BorderRadius.swift", "BorderRadius"),
        Category::Shadow => ("DesignTokens+Shadows.swift", "Shadows"),
        Category::Opacity => ("DesignTokens+Opacity.swift", "Opacity"),
    }
}

/// One `static let` line, before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub type_annotation: Option<&'static str>,
    pub literal: String,
    pub description: Option<String>,
}

impl Declaration {
    pub fn line(&self) -> String {
        match self.type_annotation {
            Some(ty) => format!("static let {}: {} = {}", self.name, ty, self.literal),
            None => format!("static let {} = {}", self.name, self.literal),
        }
    }

    /// Description split into `///` comment lines.
    pub fn doc_lines(&self) -> Vec<String> {
        self.description
            .as_deref()
            .map(|d| d.lines().map(|l| l.trim_end().to_string()).collect())
            .unwrap_or_default()
    }
}

// =============================================================================
// LITERALS
// =============================================================================

/// `8` rather than `8.0`; non-finite values become `0`.
pub fn swift_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn swift_identifier(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", name);
    }
    if SWIFT_KEYWORDS.contains(&name) {
        return format!("`{}`", name);
    }
    name.to_string()
}

fn swift_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn color_literal(value: &str) -> Option<String> {
    let value = value.trim();
    let rgba = parse_color_literal(value)?;
    if value.starts_with('#') && rgba.a >= 1.0 {
        return Some(format!("Color(hex: {})", swift_string(value)));
    }
    Some(format!(
        "Color(.sRGB, red: {} / 255, green: {} / 255, blue: {} / 255, opacity: {})",
        rgba.r,
        rgba.g,
        rgba.b,
        swift_number(rgba.a)
    ))
}

fn font_weight(weight: &FontWeight) -> Option<&'static str> {
    match weight {
        FontWeight::Numeric(n) => Some(match (n / 100.0).round() as i64 {
            i64::MIN..=1 => ".ultraLight",
            2 => ".thin",
            3 => ".light",
            4 => ".regular",
            5 => ".medium",
            6 => ".semibold",
            7 => ".bold",
            8 => ".heavy",
            _ => ".black",
        }),
        FontWeight::Named(name) => {
            let name: String = name
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            match name.as_str() {
                "ultralight" | "extralight" | "hairline" => Some(".ultraLight"),
                "thin" => Some(".thin"),
                "light" => Some(".light"),
                "regular" | "normal" | "book" => Some(".regular"),
                "medium" => Some(".medium"),
                "semibold" | "demibold" => Some(".semibold"),
                "bold" => Some(".bold"),
                "heavy" | "extrabold" => Some(".heavy"),
                "black" => Some(".black"),
                _ => None,
            }
        }
    }
}

fn font_literal(font: &FontValue) -> String {
    let mut args = Vec::new();
    if let Some(family) = &font.family {
        args.push(format!("family: {}", swift_string(family)));
    }
    args.push(format!("size: {}", swift_number(font.size)));
    if let Some(weight) = font.weight.as_ref().and_then(font_weight) {
        args.push(format!("weight: {}", weight));
    }
    if let Some(line_height) = font.line_height {
        args.push(format!("lineSpacing: {}", swift_number(line_height - font.size)));
    }
    format!("DesignFont({})", args.join(", "))
}

fn shadow_literal(shadow: &ShadowValue) -> String {
    let color = color_literal(&shadow.color).unwrap_or_else(|| "Color.black".to_string());
    format!(
        "DesignShadow(color: {}, opacity: {}, radius: {}, x: {}, y: {})",
        color,
        swift_number(shadow.opacity.unwrap_or(1.0)),
        swift_number(shadow.blur),
        swift_number(shadow.offset_x),
        swift_number(shadow.offset_y)
    )
}

/// Format one value for its category, `None` when it does not fit the shape.
pub fn format_value(category: Category, value: &TokenValue) -> Option<String> {
    match category {
        Category::Color => value.as_str().and_then(color_literal),
        Category::Typography => match value {
            TokenValue::Font(font) => Some(font_literal(font)),
            other => other.as_f64().map(|size| {
                font_literal(&FontValue {
                    size,
                    weight: None,
                    line_height: None,
                    family: None,
                })
            }),
        },
        Category::Spacing | Category::BorderRadius | Category::Opacity => {
            value.as_f64().map(swift_number)
        }
        Category::Shadow => match value {
            TokenValue::Shadow(shadow) => Some(shadow_literal(shadow)),
            _ => None,
        },
    }
}

fn fallback_literal(category: Category) -> &'static str {
    match category {
        Category::Color => "Color.clear",
        Category::Typography => "DesignFont(size: 16)",
        Category::Spacing | Category::BorderRadius => "0",
        Category::Shadow => "DesignShadow.none",
        Category::Opacity => "1",
    }
}

fn type_annotation(category: Category) -> Option<&'static str> {
    match category {
        Category::Spacing | Category::BorderRadius => Some("CGFloat"),
        Category::Opacity => Some("Double"),
        Category::Color | Category::Typography | Category::Shadow => None,
    }
}

/// Declarations for one category, in store order.
pub fn declarations(category: Category, tokens: &TokenMap) -> Vec<Declaration> {
    tokens
        .iter()
        .map(|(name, token)| {
            let literal = format_value(category, &token.value).unwrap_or_else(|| {
                warn!(%category, name = %name, "Token value does not fit its category, using fallback");
                fallback_literal(category).to_string()
            });
            Declaration {
                name: swift_identifier(name),
                type_annotation: type_annotation(category),
                literal,
                description: token.description.clone(),
            }
        })
        .collect()
}

// =============================================================================
// FILES
// =============================================================================

pub fn header(file_name: &str, store: &TokenStore, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "//");
    let _ = writeln!(out, "//  {}", file_name);
    let _ = writeln!(out, "//  Auto-generated by figma-tokens. Do not edit.");
    if !store.metadata.method.is_empty() {
        let _ = writeln!(
            out,
            "//  Source: {} ({})",
            store.metadata.source, store.metadata.method
        );
    }
    let _ = writeln!(out, "//  Generated: {}", generated_at.to_rfc3339());
    let _ = writeln!(out, "//");
    out
}

pub fn support_file(store: &TokenStore, generated_at: DateTime<Utc>) -> GeneratedFile {
    let mut contents = header(SUPPORT_FILE_NAME, store, generated_at);
    contents.push_str(SUPPORT_SOURCE);
    GeneratedFile {
        category: None,
        file_name: SUPPORT_FILE_NAME.to_string(),
        contents,
    }
}

const SUPPORT_SOURCE: &str = r#"
import SwiftUI

public enum DesignTokens {}

public struct DesignFont {
    public let family: String?
    public let size: CGFloat
    public let weight: Font.Weight
    public let lineSpacing: CGFloat

    public init(family: String? = nil, size: CGFloat, weight: Font.Weight = .regular, lineSpacing: CGFloat = 0) {
        self.family = family
        self.size = size
        self.weight = weight
        self.lineSpacing = lineSpacing
    }

    public var font: Font {
        if let family = family {
            return Font.custom(family, size: size).weight(weight)
        }
        return Font.system(size: size, weight: weight)
    }
}

public struct DesignShadow {
    public let color: Color
    public let opacity: Double
    public let radius: CGFloat
    public let x: CGFloat
    public let y: CGFloat

    public init(color: Color, opacity: Double, radius: CGFloat, x: CGFloat, y: CGFloat) {
        self.color = color
        self.opacity = opacity
        self.radius = radius
        self.x = x
        self.y = y
    }

    public static let none = DesignShadow(color: .clear, opacity: 0, radius: 0, x: 0, y: 0)
}

public extension View {
    func designFont(_ token: DesignFont) -> some View {
        self.font(token.font).lineSpacing(token.lineSpacing)
    }

    func designShadow(_ token: DesignShadow) -> some View {
        self.shadow(color: token.color.opacity(token.opacity), radius: token.radius, x: token.x, y: token.y)
    }
}

public extension Color {
    init(hex: String) {
        let digits = hex.trimmingCharacters(in: CharacterSet.alphanumerics.inverted)
        var value: UInt64 = 0
        Scanner(string: digits).scanHexInt64(&value)
        let r, g, b, a: UInt64
        switch digits.count {
        case 3:
            (r, g, b, a) = ((value >> 8) * 17, (value >> 4 & 0xF) * 17, (value & 0xF) * 17, 255)
        case 8:
            (r, g, b, a) = (value >> 24, value >> 16 & 0xFF, value >> 8 & 0xFF, value & 0xFF)
        default:
            (r, g, b, a) = (value >> 16, value >> 8 & 0xFF, value & 0xFF, 255)
        }
        self.init(
            .sRGB,
            red: Double(r) / 255,
            green: Double(g) / 255,
            blue: Double(b) / 255,
            opacity: Double(a) / 255
        )
    }
}
"#;

/// Hand-written string templating.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftRenderer;

impl SwiftRenderer {
    pub fn render_category(
        &self,
        category: Category,
        store: &TokenStore,
        generated_at: DateTime<Utc>,
    ) -> GeneratedFile {
        let (file_name, enum_name) = category_names(category);
        let mut contents = header(file_name, store, generated_at);
        let _ = writeln!(contents);
        let _ = writeln!(contents, "import SwiftUI");
        let _ = writeln!(contents);
        let _ = writeln!(contents, "public extension DesignTokens {{");
        let _ = writeln!(contents, "    enum {} {{", enum_name);
        for decl in declarations(category, store.category(category)) {
            for line in decl.doc_lines() {
                let _ = writeln!(contents, "        /// {}", line);
            }
            let _ = writeln!(contents, "        {}", decl.line());
        }
        let _ = writeln!(contents, "    }}");
        let _ = writeln!(contents, "}}");

        GeneratedFile {
            category: Some(category),
            file_name: file_name.to_string(),
            contents,
        }
    }
}

impl Renderer for SwiftRenderer {
    fn name(&self) -> &'static str {
        "swift"
    }

    fn render(&self, store: &TokenStore, generated_at: DateTime<Utc>) -> Result<Vec<GeneratedFile>> {
        let mut files = vec![support_file(store, generated_at)];
        files.extend(
            Category::ALL
                .iter()
                .map(|c| self.render_category(*c, store, generated_at)),
        );
        Ok(files)
    }
}
