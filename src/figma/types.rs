//! Figma REST API response types
//!
//! Only the fields the adapters read are modelled; everything else is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tokens::{FigmaColor, VariableType};

// =============================================================================
// VARIABLES ENDPOINT
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct VariablesResponse {
    #[serde(default)]
    pub meta: VariablesMeta,
    /// Older payloads put the variables here instead of under `meta`.
    #[serde(default)]
    pub values: HashMap<String, Variable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesMeta {
    #[serde(default)]
    pub variable_collections: HashMap<String, VariableCollection>,
    #[serde(default)]
    pub variables: HashMap<String, Variable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modes: Vec<VariableMode>,
    #[serde(default)]
    pub default_mode_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMode {
    pub mode_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub resolved_type: VariableType,
    #[serde(default)]
    pub values_by_mode: HashMap<String, Value>,
    #[serde(default, alias = "collectionId")]
    pub variable_collection_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// FILE ENDPOINT
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct FileResponse {
    #[serde(default)]
    pub name: String,
    pub document: Node,
    #[serde(default)]
    pub styles: HashMap<String, StyleMeta>,
    #[serde(default)]
    pub components: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StyleType {
    Fill,
    Text,
    Effect,
    Grid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMeta {
    pub name: String,
    pub style_type: StyleType,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Style references by slot (`fill`, `text`, `effect`, ...).
    #[serde(default)]
    pub styles: HashMap<String, String>,
    #[serde(default)]
    pub style: Option<TypeStyle>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub children: Vec<Node>,
}

fn visible() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub color: Option<FigmaColor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub color: Option<FigmaColor>,
    #[serde(default)]
    pub offset: Option<Vector>,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub spread: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    pub font_size: f64,
    #[serde(default)]
    pub line_height_px: Option<f64>,
}
