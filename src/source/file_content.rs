//! File-content heuristic adapter
//!
//! Reads the file document instead of the variables API. Colors come from
//! FILL styles matched against named nodes with solid fills; text and effect
//! styles come from the nodes that reference them. This is approximate by
//! nature: styles nobody references and nodes with unrelated names are
//! missed or mismatched.
//!
//! Categories that end up empty are filled from [`default_tokens`] unless
//! `use_defaults` is off; the store note lists which ones were defaulted.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{SourceFilters, SourceMethod, TokenSource, SOURCE_TAG};
use crate::config::FigmaConfig;
use crate::error::Result;
use crate::figma::{FigmaClient, FileResponse, Node, StyleMeta, StyleType};
use crate::tokens::{
    color_to_string, sanitize_name, Category, FigmaColor, FontValue, FontWeight, ShadowValue,
    Token, TokenStore, TokenValue,
};

pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct FileExtractOptions {
    pub max_depth: usize,
    pub use_defaults: bool,
}

impl Default for FileExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            use_defaults: true,
        }
    }
}

pub struct FileContentSource {
    client: FigmaClient,
    file_key: String,
    options: FileExtractOptions,
}

impl FileContentSource {
    pub fn new(client: FigmaClient, file_key: impl Into<String>, options: FileExtractOptions) -> Self {
        Self {
            client,
            file_key: file_key.into(),
            options,
        }
    }

    pub fn from_config(config: &FigmaConfig, options: FileExtractOptions) -> Result<Self> {
        let client = FigmaClient::with_base_url(&config.access_token, config.api_base.clone())?;
        Ok(Self::new(client, &config.file_key, options))
    }
}

#[async_trait]
impl TokenSource for FileContentSource {
    fn method(&self) -> SourceMethod {
        SourceMethod::FileContent
    }

    /// Collection and mode filters do not apply to file content.
    async fn fetch(&self, _filters: &SourceFilters) -> Result<TokenStore> {
        let file = self.client.get_file(&self.file_key, None).await?;
        info!(
            file_key = %self.file_key,
            file = %file.name,
            styles = file.styles.len(),
            components = file.components.len(),
            "Fetched Figma file"
        );
        Ok(extract_file_tokens(&file, self.options))
    }
}

// =============================================================================
// DOCUMENT WALK
// =============================================================================

#[derive(Default)]
struct NodeIndex {
    /// Node name -> solid fill color, first node wins.
    fills_by_name: IndexMap<String, String>,
    fill_by_style: HashMap<String, String>,
    text_by_style: HashMap<String, FontValue>,
    effect_by_style: HashMap<String, ShadowValue>,
}

fn solid_fill(node: &Node) -> Option<String> {
    node.fills
        .iter()
        .find(|p| p.visible && p.paint_type == "SOLID" && p.color.is_some())
        .and_then(|p| {
            let mut color = p.color?;
            color.a *= p.opacity.unwrap_or(1.0) * node.opacity.unwrap_or(1.0);
            Some(color_to_string(&color))
        })
}

fn drop_shadow(node: &Node) -> Option<ShadowValue> {
    let effect = node
        .effects
        .iter()
        .find(|e| e.visible && e.effect_type == "DROP_SHADOW")?;
    let color = effect.color.unwrap_or(FigmaColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    });
    let offset = effect.offset;
    Some(ShadowValue {
        offset_x: offset.map_or(0.0, |o| o.x),
        offset_y: offset.map_or(0.0, |o| o.y),
        blur: effect.radius,
        spread: effect.spread,
        color: color_to_string(&FigmaColor { a: 1.0, ..color }),
        opacity: Some(color.a),
    })
}

fn walk(node: &Node, depth: usize, max_depth: usize, index: &mut NodeIndex) {
    if let Some(color) = solid_fill(node) {
        if !node.name.is_empty() && !index.fills_by_name.contains_key(&node.name) {
            index.fills_by_name.insert(node.name.clone(), color.clone());
        }
        if let Some(style_id) = node.styles.get("fill") {
            index.fill_by_style.entry(style_id.clone()).or_insert(color);
        }
    }
    if let (Some(style_id), Some(style)) = (node.styles.get("text"), node.style.as_ref()) {
        index
            .text_by_style
            .entry(style_id.clone())
            .or_insert_with(|| FontValue {
                size: style.font_size,
                weight: style.font_weight.map(FontWeight::Numeric),
                line_height: style.line_height_px,
                family: style.font_family.clone(),
            });
    }
    if let Some(style_id) = node.styles.get("effect") {
        if let Some(shadow) = drop_shadow(node) {
            index
                .effect_by_style
                .entry(style_id.clone())
                .or_insert(shadow);
        }
    }

    if depth < max_depth {
        for child in &node.children {
            walk(child, depth + 1, max_depth, index);
        }
    }
}

/// Style id link first, then exact name, then substring containment either way.
fn match_fill(style_id: &str, style: &StyleMeta, index: &NodeIndex) -> Option<String> {
    if let Some(color) = index.fill_by_style.get(style_id) {
        return Some(color.clone());
    }
    if let Some(color) = index.fills_by_name.get(&style.name) {
        return Some(color.clone());
    }
    let wanted = style.name.to_lowercase();
    index
        .fills_by_name
        .iter()
        .find(|(name, _)| {
            let name = name.to_lowercase();
            name.contains(&wanted) || wanted.contains(&name)
        })
        .map(|(_, color)| color.clone())
}

fn style_token(value: TokenValue, kind: &str, style: &StyleMeta) -> Token {
    let mut token = Token::new(value).with_kind(kind);
    token.description = style.description.clone().filter(|d| !d.is_empty());
    token.metadata = Some(crate::tokens::TokenMetadata {
        original_name: Some(style.name.clone()),
        ..Default::default()
    });
    token
}

/// Extract a token store from a file document.
pub fn extract_file_tokens(file: &FileResponse, options: FileExtractOptions) -> TokenStore {
    let mut index = NodeIndex::default();
    walk(&file.document, 0, options.max_depth, &mut index);

    let mut styles: Vec<(&String, &StyleMeta)> = file.styles.iter().collect();
    styles.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));

    let mut store = TokenStore::new(SOURCE_TAG, SourceMethod::FileContent.tag(), "");
    for (style_id, style) in styles {
        let name = sanitize_name(&style.name);
        if name.is_empty() {
            continue;
        }
        match style.style_type {
            StyleType::Fill => match match_fill(style_id, style, &index) {
                Some(color) => {
                    store.insert(
                        Category::Color,
                        name,
                        style_token(TokenValue::Text(color), "color", style),
                    );
                }
                None => debug!(style = %style.name, "No node matches fill style"),
            },
            StyleType::Text => {
                if let Some(font) = index.text_by_style.get(style_id) {
                    store.insert(
                        Category::Typography,
                        name,
                        style_token(TokenValue::Font(font.clone()), "typography", style),
                    );
                }
            }
            StyleType::Effect => {
                if let Some(shadow) = index.effect_by_style.get(style_id) {
                    store.insert(
                        Category::Shadow,
                        name,
                        style_token(TokenValue::Shadow(shadow.clone()), "shadow", style),
                    );
                }
            }
            StyleType::Grid => {}
        }
    }

    let mut defaulted = Vec::new();
    if options.use_defaults {
        for category in Category::ALL {
            if store.category(category).is_empty() {
                for (name, token) in default_tokens(category) {
                    store.insert(category, name, token);
                }
                defaulted.push(category.key());
            }
        }
    }

    store.metadata.note = if defaulted.is_empty() {
        "Extracted from Figma file styles".to_string()
    } else {
        warn!(categories = ?defaulted, "No data extracted, using default tokens");
        format!(
            "Extracted from Figma file styles; defaults used for: {}",
            defaulted.join(", ")
        )
    };
    info!(
        nodes_with_fills = index.fills_by_name.len(),
        tokens = store.len(),
        "Extracted tokens from file content"
    );
    store
}

fn font(size: f64, weight: f64, line_height: f64) -> TokenValue {
    TokenValue::Font(FontValue {
        size,
        weight: Some(FontWeight::Numeric(weight)),
        line_height: Some(line_height),
        family: None,
    })
}

fn shadow(offset_y: f64, blur: f64, opacity: f64) -> TokenValue {
    TokenValue::Shadow(ShadowValue {
        offset_x: 0.0,
        offset_y,
        blur,
        spread: None,
        color: "#000000".to_string(),
        opacity: Some(opacity),
    })
}

/// Fixed fallback set used when a category could not be extracted.
pub fn default_tokens(category: Category) -> Vec<(&'static str, Token)> {
    let entries: Vec<(&'static str, TokenValue)> = match category {
        Category::Color => vec![
            ("primary", "#007aff".into()),
            ("secondary", "#5856d6".into()),
            ("background", "#ffffff".into()),
            ("text", "#000000".into()),
        ],
        Category::Typography => vec![
            ("largetitle", font(34.0, 700.0, 41.0)),
            ("title", font(28.0, 700.0, 34.0)),
            ("headline", font(17.0, 600.0, 22.0)),
            ("body", font(17.0, 400.0, 22.0)),
            ("caption", font(12.0, 400.0, 16.0)),
        ],
        Category::Spacing => vec![
            ("xs", 4.0.into()),
            ("sm", 8.0.into()),
            ("md", 16.0.into()),
            ("lg", 24.0.into()),
            ("xl", 32.0.into()),
        ],
        Category::BorderRadius => vec![
            ("sm", 4.0.into()),
            ("md", 8.0.into()),
            ("lg", 16.0.into()),
        ],
        Category::Shadow => vec![("sm", shadow(1.0, 2.0, 0.1)), ("md", shadow(4.0, 8.0, 0.15))],
        Category::Opacity => vec![("disabled", 0.4.into()), ("overlay", 0.6.into())],
    };
    entries
        .into_iter()
        .map(|(name, value)| (name, Token::new(value).with_kind("default")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_file() -> FileResponse {
        serde_json::from_value(json!({
            "name": "Design System",
            "styles": {
                "S:1": {"name": "Colors/Primary", "styleType": "FILL"},
                "S:2": {"name": "Surface", "styleType": "FILL"},
                "S:3": {"name": "Accent", "styleType": "FILL"},
                "S:4": {"name": "Heading/Large", "styleType": "TEXT"},
                "S:5": {"name": "Elevation/Card", "styleType": "EFFECT"},
                "S:6": {"name": "Unmatched", "styleType": "FILL"}
            },
            "document": {
                "id": "0:0", "name": "Document", "type": "DOCUMENT",
                "children": [{
                    "id": "1:0", "name": "Page", "type": "CANVAS",
                    "children": [
                        {"id": "1:1", "name": "swatch", "type": "RECTANGLE",
                         "styles": {"fill": "S:1"},
                         "fills": [{"type": "SOLID", "color": {"r": 0, "g": 0.478, "b": 1, "a": 1}}]},
                        {"id": "1:2", "name": "Surface", "type": "RECTANGLE",
                         "fills": [{"type": "SOLID", "opacity": 0.5, "color": {"r": 1, "g": 1, "b": 1, "a": 1}}]},
                        {"id": "1:3", "name": "Accent Swatch", "type": "RECTANGLE",
                         "fills": [{"type": "SOLID", "visible": false, "color": {"r": 0, "g": 1, "b": 0, "a": 1}},
                                   {"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0, "a": 1}}]},
                        {"id": "1:4", "name": "Title", "type": "TEXT",
                         "styles": {"text": "S:4"},
                         "style": {"fontFamily": "Inter", "fontWeight": 700, "fontSize": 28, "lineHeightPx": 34}},
                        {"id": "1:5", "name": "Card", "type": "FRAME",
                         "styles": {"effect": "S:5"},
                         "effects": [{"type": "DROP_SHADOW", "radius": 8,
                                      "color": {"r": 0, "g": 0, "b": 0, "a": 0.25},
                                      "offset": {"x": 0, "y": 4}}]}
                    ]
                }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn matches_fill_styles_by_link_name_and_substring() {
        let store = extract_file_tokens(&sample_file(), FileExtractOptions::default());
        let colors = store.category(Category::Color);
        assert_eq!(colors["primary"].value, TokenValue::Text("#007aff".into()));
        assert_eq!(
            colors["surface"].value,
            TokenValue::Text("rgba(255, 255, 255, 0.5)".into())
        );
        assert_eq!(colors["accent"].value, TokenValue::Text("#ff0000".into()));
        assert!(!colors.contains_key("unmatched"));
    }

    #[test]
    fn node_opacity_multiplies_into_fill_alpha() {
        let file: FileResponse = serde_json::from_value(json!({
            "name": "Faded",
            "styles": {
                "S:1": {"name": "Overlay", "styleType": "FILL"},
                "S:2": {"name": "Scrim", "styleType": "FILL"}
            },
            "document": {
                "id": "0:0", "name": "Document", "type": "DOCUMENT",
                "children": [
                    {"id": "1:1", "name": "Overlay", "type": "RECTANGLE", "opacity": 0.5,
                     "styles": {"fill": "S:1"},
                     "fills": [{"type": "SOLID", "color": {"r": 0, "g": 0, "b": 0, "a": 1}}]},
                    {"id": "1:2", "name": "Scrim", "type": "RECTANGLE", "opacity": 0.5,
                     "styles": {"fill": "S:2"},
                     "fills": [{"type": "SOLID", "opacity": 0.5, "color": {"r": 0, "g": 0, "b": 0, "a": 1}}]}
                ]
            }
        }))
        .unwrap();
        let options = FileExtractOptions {
            use_defaults: false,
            ..Default::default()
        };
        let store = extract_file_tokens(&file, options);
        let colors = store.category(Category::Color);
        assert_eq!(colors["overlay"].value, TokenValue::Text("rgba(0, 0, 0, 0.5)".into()));
        assert_eq!(colors["scrim"].value, TokenValue::Text("rgba(0, 0, 0, 0.25)".into()));
    }

    #[test]
    fn extracts_text_and_effect_styles() {
        let store = extract_file_tokens(&sample_file(), FileExtractOptions::default());
        match &store.category(Category::Typography)["headinglarge"].value {
            TokenValue::Font(f) => {
                assert_eq!(f.size, 28.0);
                assert_eq!(f.line_height, Some(34.0));
                assert_eq!(f.family.as_deref(), Some("Inter"));
            }
            other => panic!("expected font, got {other:?}"),
        }
        match &store.category(Category::Shadow)["elevationcard"].value {
            TokenValue::Shadow(s) => {
                assert_eq!((s.offset_y, s.blur), (4.0, 8.0));
                assert_eq!(s.color, "#000000");
                assert_eq!(s.opacity, Some(0.25));
            }
            other => panic!("expected shadow, got {other:?}"),
        }
    }

    #[test]
    fn empty_categories_fall_back_to_defaults() {
        let store = extract_file_tokens(&sample_file(), FileExtractOptions::default());
        assert_eq!(store.category(Category::Spacing).len(), 5);
        assert_eq!(store.category(Category::Opacity).len(), 2);
        // Extracted categories are not topped up
        assert!(!store.category(Category::Color).contains_key("secondary"));
        assert!(store.metadata.note.contains("spacing"));
        assert!(!store.metadata.note.contains("color"));
    }

    #[test]
    fn defaults_can_be_disabled() {
        let options = FileExtractOptions {
            use_defaults: false,
            ..Default::default()
        };
        let store = extract_file_tokens(&sample_file(), options);
        assert!(store.category(Category::Spacing).is_empty());
        assert_eq!(store.metadata.note, "Extracted from Figma file styles");
    }

    #[test]
    fn depth_bound_stops_the_walk() {
        let options = FileExtractOptions {
            max_depth: 1,
            use_defaults: false,
        };
        let store = extract_file_tokens(&sample_file(), options);
        assert!(store.is_empty());
    }
}
