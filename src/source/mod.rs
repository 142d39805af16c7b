//! Token source adapters
//!
//! Three ways of getting tokens out of Figma, one interface:
//! - `VariablesApiSource`: the REST variables endpoint
//! - `FileContentSource`: heuristic extraction from the file document tree
//! - `PluginExportSource`: the JSON a Figma plugin exports from the host's
//!   local variables API
//!
//! The variables and plugin adapters share [`build_store`], so classification,
//! conversion and naming cannot drift between them.

pub mod file_content;
pub mod plugin;
pub mod variables;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::figma::{Variable, VariableCollection, VariableMode, VariablesResponse};
use crate::tokens::{classify, convert_value, sanitize_name, Token, TokenMetadata, TokenStore};

pub use file_content::{default_tokens, extract_file_tokens, FileContentSource, FileExtractOptions};
pub use plugin::{PluginExport, PluginExportSource};
pub use variables::VariablesApiSource;

/// `source` tag written into every store's metadata.
pub const SOURCE_TAG: &str = "Figma";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceMethod {
    Variables,
    FileContent,
    PluginExport,
}

impl SourceMethod {
    pub fn tag(&self) -> &'static str {
        match self {
            SourceMethod::Variables => "variables-api",
            SourceMethod::FileContent => "file-content",
            SourceMethod::PluginExport => "plugin-export",
        }
    }
}

impl fmt::Display for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SourceMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "variables" | "variables-api" => Ok(SourceMethod::Variables),
            "file" | "file-content" => Ok(SourceMethod::FileContent),
            "plugin" | "plugin-export" => Ok(SourceMethod::PluginExport),
            other => Err(format!("unknown source method '{}'", other)),
        }
    }
}

/// Collection and mode name filters. Empty lists keep everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFilters {
    pub collections: Vec<String>,
    pub modes: Vec<String>,
}

impl SourceFilters {
    pub fn keeps_collection(&self, name: &str) -> bool {
        keeps(&self.collections, name)
    }

    pub fn keeps_mode(&self, name: &str) -> bool {
        keeps(&self.modes, name)
    }
}

fn keeps(filter: &[String], name: &str) -> bool {
    filter.is_empty() || filter.iter().any(|f| f.eq_ignore_ascii_case(name))
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn method(&self) -> SourceMethod;

    /// Produce a complete store, or fail without producing anything.
    async fn fetch(&self, filters: &SourceFilters) -> Result<TokenStore>;
}

/// Fetch from `source` and replace the store at `tokens_file`.
///
/// Nothing is written when the fetch fails, so a failed sync leaves the
/// previous store in place.
pub async fn sync_to_file(
    source: &dyn TokenSource,
    filters: &SourceFilters,
    tokens_file: &Path,
) -> Result<TokenStore> {
    let store = source.fetch(filters).await?;
    if store.is_empty() {
        warn!(method = %source.method(), "Sync produced an empty token store");
    }
    store.save(tokens_file)?;
    info!(
        method = %source.method(),
        path = %tokens_file.display(),
        tokens = store.len(),
        "Token store written"
    );
    Ok(store)
}

// =============================================================================
// SHARED VARIABLE NORMALISATION
// =============================================================================

/// Collections and variables in a stable order, whatever the origin.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    pub collections: Vec<VariableCollection>,
    pub variables: Vec<Variable>,
}

impl VariableSet {
    pub fn new(mut collections: Vec<VariableCollection>, mut variables: Vec<Variable>) -> Self {
        collections.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        variables.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Self {
            collections,
            variables,
        }
    }

    /// Map keys are the authoritative ids; payload `id` fields may be absent.
    pub fn from_response(response: VariablesResponse) -> Self {
        let collections = response
            .meta
            .variable_collections
            .into_iter()
            .map(|(id, mut c)| {
                c.id = id;
                c
            })
            .collect();
        let variables = if response.meta.variables.is_empty() {
            response.values
        } else {
            response.meta.variables
        };
        let variables = variables
            .into_iter()
            .map(|(id, mut v)| {
                v.id = id;
                v
            })
            .collect();
        Self::new(collections, variables)
    }
}

/// Classify, convert and name every selected (variable, mode) pair.
///
/// The primary mode (the collection default when selected, else the first
/// selected mode) keeps the plain name; other modes append the mode name.
/// Values whose conversion yields nothing are skipped.
pub fn build_store(set: &VariableSet, filters: &SourceFilters, method: SourceMethod) -> TokenStore {
    let collections: HashMap<&str, &VariableCollection> =
        set.collections.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut store = TokenStore::new(
        SOURCE_TAG,
        method.tag(),
        format!("Generated from Figma variables via {}", method),
    );
    let mut skipped = 0usize;

    for variable in &set.variables {
        let Some(collection) = collections.get(variable.variable_collection_id.as_str()) else {
            debug!(variable = %variable.name, "Variable has no known collection, skipping");
            skipped += 1;
            continue;
        };
        if !filters.keeps_collection(&collection.name) {
            continue;
        }

        let modes: Vec<&VariableMode> = collection
            .modes
            .iter()
            .filter(|m| filters.keeps_mode(&m.name))
            .collect();
        let primary = modes
            .iter()
            .find(|m| Some(&m.mode_id) == collection.default_mode_id.as_ref())
            .or_else(|| modes.first())
            .map(|m| m.mode_id.clone());

        let base = sanitize_name(&variable.name);
        if base.is_empty() {
            debug!(variable = %variable.name, "Variable name sanitizes to nothing, skipping");
            skipped += 1;
            continue;
        }
        let category = classify(&variable.name, variable.resolved_type);

        for mode in modes {
            let Some(raw) = variable.values_by_mode.get(&mode.mode_id) else {
                continue;
            };
            let Some(value) = convert_value(variable.resolved_type, raw) else {
                debug!(variable = %variable.name, mode = %mode.name, "Value did not convert, skipping");
                skipped += 1;
                continue;
            };

            let name = if primary.as_ref() == Some(&mode.mode_id) {
                base.clone()
            } else {
                format!("{}{}", base, sanitize_name(&mode.name))
            };
            let token = Token {
                value,
                kind: Some(variable.resolved_type.as_str().to_string()),
                description: variable.description.clone().filter(|d| !d.is_empty()),
                metadata: Some(TokenMetadata {
                    variable_id: Some(variable.id.clone()),
                    original_name: Some(variable.name.clone()),
                    collection: Some(collection.name.clone()),
                    mode: Some(mode.name.clone()),
                }),
            };
            store.insert(category, name, token);
        }
    }

    info!(
        method = %method,
        tokens = store.len(),
        skipped,
        "Built token store from variables"
    );
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Category, TokenValue, VariableType};
    use serde_json::json;

    fn collection(id: &str, name: &str, modes: &[(&str, &str)], default: &str) -> VariableCollection {
        VariableCollection {
            id: id.into(),
            name: name.into(),
            modes: modes
                .iter()
                .map(|(id, name)| VariableMode {
                    mode_id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            default_mode_id: Some(default.into()),
        }
    }

    fn variable(
        id: &str,
        name: &str,
        ty: VariableType,
        collection: &str,
        values: serde_json::Value,
    ) -> Variable {
        Variable {
            id: id.into(),
            name: name.into(),
            resolved_type: ty,
            values_by_mode: serde_json::from_value(values).unwrap(),
            variable_collection_id: collection.into(),
            description: None,
        }
    }

    fn sample_set() -> VariableSet {
        VariableSet::new(
            vec![
                collection("c1", "Primitives", &[("m1", "Value")], "m1"),
                collection("c2", "Theme", &[("l", "Light"), ("d", "Dark")], "l"),
            ],
            vec![
                variable(
                    "v1",
                    "color/primary",
                    VariableType::Color,
                    "c1",
                    json!({"m1": {"r": 0, "g": 0.478, "b": 1, "a": 1}}),
                ),
                variable("v2", "space-lg", VariableType::Float, "c1", json!({"m1": 24})),
                variable(
                    "v3",
                    "corner-radius-lg",
                    VariableType::Float,
                    "c1",
                    json!({"m1": 16}),
                ),
                variable(
                    "v4",
                    "color/surface",
                    VariableType::Color,
                    "c2",
                    json!({"l": {"r": 1, "g": 1, "b": 1, "a": 1}, "d": {"r": 0, "g": 0, "b": 0, "a": 0.9}}),
                ),
                variable(
                    "v5",
                    "color/link",
                    VariableType::Color,
                    "c1",
                    json!({"m1": {"type": "VARIABLE_ALIAS", "id": "v1"}}),
                ),
            ],
        )
    }

    #[test]
    fn builds_categories_from_variables() {
        let store = build_store(&sample_set(), &SourceFilters::default(), SourceMethod::Variables);

        let colors = store.category(Category::Color);
        assert_eq!(colors["primary"].value, TokenValue::Text("#007aff".into()));
        assert_eq!(colors["surface"].value, TokenValue::Text("#ffffff".into()));
        assert_eq!(
            colors["surfacedark"].value,
            TokenValue::Text("rgba(0, 0, 0, 0.9)".into())
        );
        assert!(!colors.contains_key("link"), "alias should be skipped");

        assert_eq!(
            store.category(Category::Spacing)["lg"].value,
            TokenValue::Number(24.0)
        );
        assert_eq!(
            store.category(Category::BorderRadius)["cornerradiuslg"].value,
            TokenValue::Number(16.0)
        );
        assert_eq!(store.metadata.method, "variables-api");
        assert_eq!(store.metadata.source, SOURCE_TAG);
    }

    #[test]
    fn records_variable_metadata() {
        let store = build_store(&sample_set(), &SourceFilters::default(), SourceMethod::Variables);
        let token = &store.category(Category::Color)["surfacedark"];
        let meta = token.metadata.as_ref().unwrap();
        assert_eq!(meta.variable_id.as_deref(), Some("v4"));
        assert_eq!(meta.original_name.as_deref(), Some("color/surface"));
        assert_eq!(meta.mode.as_deref(), Some("Dark"));
        assert_eq!(token.kind.as_deref(), Some("color"));
    }

    #[test]
    fn filters_collections_and_modes() {
        let filters = SourceFilters {
            collections: vec!["theme".into()],
            modes: vec!["Dark".into()],
        };
        let store = build_store(&sample_set(), &filters, SourceMethod::Variables);
        assert_eq!(store.len(), 1);
        // The only selected mode becomes the primary one and keeps the plain name
        assert_eq!(
            store.category(Category::Color)["surface"].value,
            TokenValue::Text("rgba(0, 0, 0, 0.9)".into())
        );
    }

    #[test]
    fn from_response_falls_back_to_top_level_values() {
        let response: VariablesResponse = serde_json::from_value(json!({
            "meta": {
                "variableCollections": {
                    "c1": {"name": "Primitives", "modes": [{"modeId": "m1", "name": "Value"}], "defaultModeId": "m1"}
                }
            },
            "values": {
                "v1": {"name": "space-sm", "resolvedType": "FLOAT", "valuesByMode": {"m1": 8}, "collectionId": "c1"}
            }
        }))
        .unwrap();
        let set = VariableSet::from_response(response);
        assert_eq!(set.variables.len(), 1);
        assert_eq!(set.variables[0].id, "v1");
        assert_eq!(set.collections[0].id, "c1");

        let store = build_store(&set, &SourceFilters::default(), SourceMethod::Variables);
        assert_eq!(
            store.category(Category::Spacing)["sm"].value,
            TokenValue::Number(8.0)
        );
    }

    #[test]
    fn method_tags_parse() {
        assert_eq!("variables".parse::<SourceMethod>().unwrap(), SourceMethod::Variables);
        assert_eq!("file-content".parse::<SourceMethod>().unwrap(), SourceMethod::FileContent);
        assert_eq!("plugin".parse::<SourceMethod>().unwrap(), SourceMethod::PluginExport);
        assert!("scrape".parse::<SourceMethod>().is_err());
    }

    struct FixedSource(Option<TokenStore>);

    #[async_trait]
    impl TokenSource for FixedSource {
        fn method(&self) -> SourceMethod {
            SourceMethod::PluginExport
        }

        async fn fetch(&self, _filters: &SourceFilters) -> Result<TokenStore> {
            self.0
                .clone()
                .ok_or_else(|| crate::error::TokenError::MissingConfig("FIGMA_FILE_KEY".into()))
        }
    }

    #[tokio::test]
    async fn failed_sync_keeps_previous_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens/design-tokens.json");

        let mut store = TokenStore::new(SOURCE_TAG, "plugin-export", "");
        store.insert(Category::Spacing, "small", Token::new(8.0));
        sync_to_file(&FixedSource(Some(store)), &SourceFilters::default(), &path)
            .await
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = sync_to_file(&FixedSource(None), &SourceFilters::default(), &path)
            .await
            .unwrap_err();
        assert!(err.is_config());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
