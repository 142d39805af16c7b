//! Swift code generation
//!
//! A renderer turns a [`TokenStore`] into a set of in-memory files; writing
//! them is a separate step so nothing touches disk until every file rendered.

pub mod swift;
pub mod template;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::Result;
use crate::tokens::{Category, TokenStore};

pub use swift::{SwiftRenderer, SUPPORT_FILE_NAME};
pub use template::TemplateRenderer;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// `None` for the shared support file.
    pub category: Option<Category>,
    pub file_name: String,
    pub contents: String,
}

pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, store: &TokenStore, generated_at: DateTime<Utc>) -> Result<Vec<GeneratedFile>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Swift,
    Template,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Swift => f.write_str("swift"),
            RendererKind::Template => f.write_str("template"),
        }
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swift" => Ok(RendererKind::Swift),
            "template" | "handlebars" => Ok(RendererKind::Template),
            other => Err(format!("unknown renderer '{}'", other)),
        }
    }
}

/// Build the renderer for `kind`; `templates` only applies to the template renderer.
pub fn renderer_for(kind: RendererKind, templates: Option<&Path>) -> Result<Box<dyn Renderer>> {
    Ok(match kind {
        RendererKind::Swift => Box::new(SwiftRenderer),
        RendererKind::Template => Box::new(TemplateRenderer::new(templates)?),
    })
}

/// Overwrite every file under `dir`, creating it when needed.
///
/// All contents are staged in temp files next to their targets first; the
/// renames only start once every file has been written, so a failed write
/// leaves the previous set untouched.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.file_name);
        let tmp = stage(&path, file.contents.as_bytes())?;
        staged.push((tmp, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        tmp.persist(&path).map_err(|e| e.error)?;
        written.push(path);
    }
    Ok(written)
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    Ok(tmp)
}

/// Render `store` with `renderer` and write the result into `dir`.
pub fn generate(store: &TokenStore, renderer: &dyn Renderer, dir: &Path) -> Result<Vec<PathBuf>> {
    let files = renderer.render(store, Utc::now())?;
    let written = write_files(dir, &files)?;
    info!(
        renderer = renderer.name(),
        dir = %dir.display(),
        files = written.len(),
        tokens = store.len(),
        "Generated Swift sources"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;
    use tempfile::tempdir;

    #[test]
    fn renderer_kind_parses() {
        assert_eq!("Swift".parse::<RendererKind>(), Ok(RendererKind::Swift));
        assert_eq!("handlebars".parse::<RendererKind>(), Ok(RendererKind::Template));
        assert!("kotlin".parse::<RendererKind>().is_err());
    }

    #[test]
    fn generate_writes_one_file_per_category_plus_support() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ios/Generated");
        let mut store = TokenStore::new("Figma", "variables-api", "");
        store.insert(Category::Color, "primary", Token::new("#007AFF"));
        store.insert(Category::Spacing, "small", Token::new(8.0));

        let written = generate(&store, &SwiftRenderer, &out).unwrap();
        assert_eq!(written.len(), 7);

        let colors = std::fs::read_to_string(out.join("DesignTokens+Colors.swift")).unwrap();
        assert!(colors.contains(r##"static let primary = Color(hex: "#007AFF")"##));
        let spacing = std::fs::read_to_string(out.join("DesignTokens+Spacing.swift")).unwrap();
        assert!(spacing.contains("static let small: CGFloat = 8\n"));
        assert!(out.join(SUPPORT_FILE_NAME).exists());
    }

    #[test]
    fn write_files_overwrites_existing() {
        let dir = tempdir().unwrap();
        let file = GeneratedFile {
            category: None,
            file_name: "A.swift".into(),
            contents: "new".into(),
        };
        std::fs::write(dir.path().join("A.swift"), "old").unwrap();
        write_files(dir.path(), &[file]).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("A.swift")).unwrap(), "new");
    }

    #[test]
    fn failed_write_leaves_previous_files_untouched() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("A.swift"), "old").unwrap();
        let files = [
            GeneratedFile {
                category: None,
                file_name: "A.swift".into(),
                contents: "new".into(),
            },
            GeneratedFile {
                category: None,
                file_name: "missing/B.swift".into(),
                contents: "new".into(),
            },
        ];

        assert!(write_files(dir.path(), &files).is_err());
        assert_eq!(std::fs::read_to_string(dir.path().join("A.swift")).unwrap(), "old");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "staged temp files are cleaned up");
    }
}
