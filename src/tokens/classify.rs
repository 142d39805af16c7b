//! Category classification and name sanitization
//!
//! Both functions are pure: the category depends only on (name, type) and
//! sanitizing an already sanitized name is a no-op.

use regex::Regex;
use std::sync::LazyLock;

use super::{Category, VariableType};

// =============================================================================
// CLASSIFICATION PATTERNS
// =============================================================================

static TYPOGRAPHY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)font|text|typography").unwrap());

static RADIUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)radius|corner").unwrap());

static SHADOW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)shadow").unwrap());

static OPACITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)opacity|alpha").unwrap());

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)color|background|foreground").unwrap());

static BORDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)border").unwrap());

/// Leading name segments dropped from token names.
const CATEGORY_WORDS: &[&str] = &[
    "color",
    "colors",
    "typography",
    "font",
    "fonts",
    "text",
    "spacing",
    "space",
    "borderradius",
    "radius",
    "radii",
    "shadow",
    "shadows",
    "opacity",
];

/// Classify a variable into a token category.
///
/// COLOR-typed variables are always colors. Everything else is matched by
/// name, first match wins: color words, then typography, radius, shadow and
/// opacity, with spacing last. `border` counts as a color word except on
/// FLOAT variables, where it names a dimension (`border-width`).
pub fn classify(name: &str, variable_type: VariableType) -> Category {
    if variable_type == VariableType::Color {
        return Category::Color;
    }
    let border_color = variable_type != VariableType::Float && BORDER_RE.is_match(name);
    if COLOR_RE.is_match(name) || border_color {
        Category::Color
    } else if TYPOGRAPHY_RE.is_match(name) {
        Category::Typography
    } else if RADIUS_RE.is_match(name) {
        Category::BorderRadius
    } else if SHADOW_RE.is_match(name) {
        Category::Shadow
    } else if OPACITY_RE.is_match(name) {
        Category::Opacity
    } else {
        Category::Spacing
    }
}

/// Turn a Figma display name into a token name.
///
/// Splits on anything that is not ASCII alphanumeric, drops leading segments
/// that are category words while at least one segment remains, then joins the
/// rest lower-cased. The output is a single segment, so a second pass is a no-op.
pub fn sanitize_name(raw: &str) -> String {
    let segments: Vec<String> = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let skip = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .take_while(|s| CATEGORY_WORDS.contains(&s.as_str()))
        .count();

    segments[skip..].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_type_wins_over_name() {
        assert_eq!(classify("space-lg", VariableType::Color), Category::Color);
        assert_eq!(classify("font/heading", VariableType::Color), Category::Color);
    }

    #[test]
    fn float_names_classify_by_pattern() {
        assert_eq!(
            classify("corner-radius-lg", VariableType::Float),
            Category::BorderRadius
        );
        assert_eq!(classify("space-lg", VariableType::Float), Category::Spacing);
        assert_eq!(classify("Font/Size/Body", VariableType::Float), Category::Typography);
        assert_eq!(classify("elevation/shadow-md", VariableType::Float), Category::Shadow);
        assert_eq!(classify("disabled-opacity", VariableType::Float), Category::Opacity);
        assert_eq!(classify("border-width", VariableType::Float), Category::Spacing);
    }

    #[test]
    fn string_color_names_classify_as_color() {
        assert_eq!(
            classify("background/primary", VariableType::String),
            Category::Color
        );
        assert_eq!(classify("border/subtle", VariableType::String), Category::Color);
    }

    #[test]
    fn color_words_are_checked_before_typography() {
        assert_eq!(classify("text-color", VariableType::String), Category::Color);
        assert_eq!(classify("Text/Foreground", VariableType::String), Category::Color);
        assert_eq!(classify("font-color", VariableType::Float), Category::Color);
    }

    #[test]
    fn float_border_names_are_dimensions() {
        assert_eq!(classify("border-width", VariableType::Float), Category::Spacing);
        assert_eq!(
            classify("border-radius-md", VariableType::Float),
            Category::BorderRadius
        );
        assert_eq!(classify("border-width", VariableType::String), Category::Color);
    }

    #[test]
    fn sanitize_strips_punctuation_and_prefix() {
        assert_eq!(sanitize_name("Colors/Primary/500"), "primary500");
        assert_eq!(sanitize_name("space-lg"), "lg");
        assert_eq!(sanitize_name("Brand Blue"), "brandblue");
        assert_eq!(sanitize_name("Ünïcode Name"), "ncodename");
        assert_eq!(sanitize_name("color-color-primary"), "primary");
    }

    #[test]
    fn sanitize_keeps_bare_category_word() {
        assert_eq!(sanitize_name("Color"), "color");
        assert_eq!(sanitize_name("color/color"), "color");
        assert_eq!(sanitize_name("Shadow/Shadow"), "shadow");
        assert_eq!(sanitize_name("colorPrimary"), "colorprimary");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in [
            "Colors/Primary/500",
            "color-color-primary",
            "Typography/Heading XL",
            "spacing",
            "Shadow/Shadow",
            "fonttext/body",
            "__",
            "Ünïcode Name",
        ] {
            let once = sanitize_name(raw);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {raw:?}");
        }
    }
}
