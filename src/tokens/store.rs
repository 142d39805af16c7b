//! Token store: the canonical JSON snapshot of one sync run
//!
//! Created fresh on every sync and overwritten in full. Writes go through a
//! temp file in the target directory so readers never see half a store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{sanitize_name, Category, Token};
use crate::error::{Result, TokenError};

pub type TokenMap = IndexMap<String, Token>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStore {
    #[serde(rename = "$metadata", default)]
    pub metadata: StoreMetadata,
    #[serde(default)]
    color: TokenMap,
    #[serde(default)]
    typography: TokenMap,
    #[serde(default)]
    spacing: TokenMap,
    #[serde(default, rename = "borderRadius")]
    border_radius: TokenMap,
    #[serde(default)]
    shadow: TokenMap,
    #[serde(default)]
    opacity: TokenMap,
}

/// A shape problem found by [`TokenStore::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreIssue {
    EmptyName { category: Category },
    UnsanitizedName { category: Category, name: String },
}

impl std::fmt::Display for StoreIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreIssue::EmptyName { category } => write!(f, "{}: empty token name", category),
            StoreIssue::UnsanitizedName { category, name } => write!(
                f,
                "{}: token name '{}' is not sanitized (expected '{}')",
                category,
                name,
                sanitize_name(name)
            ),
        }
    }
}

impl TokenStore {
    pub fn new(source: &str, method: &str, note: impl Into<String>) -> Self {
        Self {
            metadata: StoreMetadata {
                generated_at: Some(Utc::now()),
                source: source.to_string(),
                method: method.to_string(),
                note: note.into(),
            },
            ..Default::default()
        }
    }

    pub fn category(&self, category: Category) -> &TokenMap {
        match category {
            Category::Color => &self.color,
            Category::Typography => &self.typography,
            Category::Spacing => &self.spacing,
            Category::BorderRadius => &self.border_radius,
            Category::Shadow => &self.shadow,
            Category::Opacity => &self.opacity,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut TokenMap {
        match category {
            Category::Color => &mut self.color,
            Category::Typography => &mut self.typography,
            Category::Spacing => &mut self.spacing,
            Category::BorderRadius => &mut self.border_radius,
            Category::Shadow => &mut self.shadow,
            Category::Opacity => &mut self.opacity,
        }
    }

    /// Insert a token. Names are unique per category: the first insert wins.
    pub fn insert(&mut self, category: Category, name: impl Into<String>, token: Token) -> bool {
        let name = name.into();
        let map = self.category_mut(category);
        if map.contains_key(&name) {
            warn!(%category, name = %name, "Duplicate token name, keeping the first value");
            return false;
        }
        map.insert(name, token);
        true
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.category(*c).len()))
            .collect()
    }

    /// Shape checks on token names. Values are not validated.
    pub fn validate(&self) -> Vec<StoreIssue> {
        let mut issues = Vec::new();
        for category in Category::ALL {
            for name in self.category(category).keys() {
                if name.is_empty() {
                    issues.push(StoreIssue::EmptyName { category });
                } else if sanitize_name(name) != *name {
                    issues.push(StoreIssue::UnsanitizedName {
                        category,
                        name: name.clone(),
                    });
                }
            }
        }
        issues
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| TokenError::MalformedStore {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TokenError::StoreNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let store = Self::from_json(path, &json)?;
        debug!(path = %path.display(), tokens = store.len(), "Loaded token store");
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the whole store or nothing.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let json = format!("{}\n", self.to_json()?);
        write_atomic(path, json.as_bytes())?;
        debug!(path = %path.display(), tokens = self.len(), "Wrote token store");
        Ok(path.to_path_buf())
    }
}

/// Replace `path` through a temp file in the same directory.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenValue;
    use tempfile::tempdir;

    #[test]
    fn first_insert_wins() {
        let mut store = TokenStore::new("Figma", "variables-api", "");
        assert!(store.insert(Category::Color, "primary", Token::new("#007aff")));
        assert!(!store.insert(Category::Color, "primary", Token::new("#ff0000")));
        assert_eq!(
            store.category(Category::Color)["primary"].value,
            TokenValue::Text("#007aff".into())
        );
        // Same name in another category is fine
        assert!(store.insert(Category::Spacing, "primary", Token::new(8.0)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut store = TokenStore::default();
        for name in ["zeta", "alpha", "mid"] {
            store.insert(Category::Spacing, name, Token::new(1.0));
        }
        let names: Vec<_> = store.category(Category::Spacing).keys().cloned().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn serializes_metadata_and_category_keys() {
        let mut store = TokenStore::new("Figma", "variables-api", "note");
        store.insert(Category::BorderRadius, "lg", Token::new(12.0).with_kind("float"));
        let json: serde_json::Value = serde_json::to_value(&store).unwrap();
        assert_eq!(json["$metadata"]["method"], "variables-api");
        assert!(json["$metadata"]["generatedAt"].is_string());
        assert_eq!(json["borderRadius"]["lg"]["value"], 12.0);
        assert_eq!(json["borderRadius"]["lg"]["type"], "float");
    }

    #[test]
    fn validate_flags_unsanitized_names() {
        let mut store = TokenStore::default();
        store.insert(Category::Color, "primary", Token::new("#000000"));
        store.insert(Category::Color, "Brand-Blue", Token::new("#0000ff"));
        store.insert(Category::Spacing, "", Token::new(4.0));
        let issues = store.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&StoreIssue::EmptyName {
            category: Category::Spacing
        }));
    }

    #[test]
    fn load_missing_file_is_store_not_found() {
        let dir = tempdir().unwrap();
        let err = TokenStore::load(dir.path().join("design-tokens.json")).unwrap_err();
        assert!(matches!(err, TokenError::StoreNotFound(_)));
    }

    #[test]
    fn load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("design-tokens.json");
        fs::write(&path, "{ not json").unwrap();
        let err = TokenStore::load(&path).unwrap_err();
        assert!(matches!(err, TokenError::MalformedStore { .. }));
    }

    #[test]
    fn save_creates_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens").join("design-tokens.json");

        let mut first = TokenStore::new("Figma", "variables-api", "");
        first.insert(Category::Color, "primary", Token::new("#007aff"));
        first.save(&path).unwrap();

        let mut second = TokenStore::new("Figma", "file-content", "");
        second.insert(Category::Spacing, "small", Token::new(8.0));
        second.save(&path).unwrap();

        let loaded = TokenStore::load(&path).unwrap();
        assert_eq!(loaded.metadata.method, "file-content");
        assert!(loaded.category(Category::Color).is_empty());
        assert_eq!(loaded.category(Category::Spacing).len(), 1);
    }
}
