//! Plugin export adapter
//!
//! A Figma plugin reads local variables in-process and exports them as
//! `{collections: [...], variables: [...]}`, mirroring the host API objects.
//! No network call is needed to read it; the rules are the same as for the
//! variables endpoint.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{build_store, SourceFilters, SourceMethod, TokenSource, VariableSet};
use crate::error::{Result, TokenError};
use crate::figma::{Variable, VariableCollection};
use crate::tokens::TokenStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginExport {
    #[serde(default)]
    pub collections: Vec<VariableCollection>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl PluginExport {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|source| TokenError::MalformedExport {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_variable_set(self) -> VariableSet {
        VariableSet::new(self.collections, self.variables)
    }
}

pub struct PluginExportSource {
    path: PathBuf,
}

impl PluginExportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenSource for PluginExportSource {
    fn method(&self) -> SourceMethod {
        SourceMethod::PluginExport
    }

    async fn fetch(&self, filters: &SourceFilters) -> Result<TokenStore> {
        let export = PluginExport::load(&self.path)?;
        info!(
            path = %self.path.display(),
            collections = export.collections.len(),
            variables = export.variables.len(),
            "Loaded plugin export"
        );
        Ok(build_store(
            &export.into_variable_set(),
            filters,
            self.method(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Category, TokenValue};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_export_with_same_rules_as_variables_api() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.json");
        fs::write(
            &path,
            json!({
                "collections": [
                    {"id": "c1", "name": "Tokens", "modes": [{"modeId": "m1", "name": "Default"}], "defaultModeId": "m1"}
                ],
                "variables": [
                    {"id": "v1", "name": "Colors/Primary", "resolvedType": "COLOR",
                     "valuesByMode": {"m1": {"r": 0, "g": 0, "b": 0, "a": 1}}, "variableCollectionId": "c1"},
                    {"id": "v2", "name": "radius/md", "resolvedType": "FLOAT",
                     "valuesByMode": {"m1": 8}, "variableCollectionId": "c1"},
                    {"id": "v3", "name": "flags/beta", "resolvedType": "BOOLEAN",
                     "valuesByMode": {"m1": true}, "variableCollectionId": "c1"}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let store = PluginExportSource::new(&path)
            .fetch(&SourceFilters::default())
            .await
            .unwrap();
        assert_eq!(store.metadata.method, "plugin-export");
        assert_eq!(
            store.category(Category::Color)["primary"].value,
            TokenValue::Text("#000000".into())
        );
        assert_eq!(
            store.category(Category::BorderRadius)["md"].value,
            TokenValue::Number(8.0)
        );
        assert_eq!(
            store.category(Category::Spacing)["flagsbeta"].value,
            TokenValue::Bool(true)
        );
    }

    #[test]
    fn malformed_export_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, r#"{"variables": 3}"#).unwrap();
        let err = PluginExport::load(&path).unwrap_err();
        assert!(matches!(err, TokenError::MalformedExport { .. }));
    }
}
