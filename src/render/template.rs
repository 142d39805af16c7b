//! Handlebars-driven Swift renderer
//!
//! Each category renders through the template registered under its store
//! key (`color`, `typography`, ...). Built-in templates cover all six; a
//! directory holding `<key>.hbs` or `support.hbs` overrides them one by one.
//! Literals come from [`super::swift::declarations`], so templates only
//! control layout.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::swift::{category_names, declarations, header, support_file, SUPPORT_FILE_NAME};
use super::{GeneratedFile, Renderer};
use crate::error::Result;
use crate::tokens::{Category, TokenStore};

const SUPPORT_TEMPLATE: &str = "support";

const CATEGORY_TEMPLATE: &str = r#"{{header}}
import SwiftUI

public extension DesignTokens {
    enum {{enum_name}} {
{{#each tokens}}
{{#each description_lines}}
        /// {{this}}
{{/each}}
        {{line}}
{{/each}}
    }
}
"#;

#[derive(Serialize)]
struct TemplateToken {
    name: String,
    #[serde(rename = "type")]
    type_annotation: Option<&'static str>,
    literal: String,
    line: String,
    description: Option<String>,
    description_lines: Vec<String>,
}

#[derive(Serialize)]
struct CategoryContext<'a> {
    header: String,
    file_name: &'a str,
    enum_name: &'a str,
    category: &'a str,
    generated_at: String,
    source: &'a str,
    method: &'a str,
    tokens: Vec<TemplateToken>,
}

#[derive(Serialize)]
struct SupportContext<'a> {
    header: String,
    file_name: &'a str,
    generated_at: String,
}

pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    custom_support: bool,
}

impl TemplateRenderer {
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        for category in Category::ALL {
            let custom = template_dir
                .map(|dir| dir.join(format!("{}.hbs", category.key())))
                .filter(|path| path.is_file());
            match custom {
                Some(path) => {
                    debug!(%category, path = %path.display(), "Using custom template");
                    handlebars.register_template_string(category.key(), fs::read_to_string(&path)?)?;
                }
                None => handlebars.register_template_string(category.key(), CATEGORY_TEMPLATE)?,
            }
        }

        let mut custom_support = false;
        if let Some(path) = template_dir
            .map(|dir| dir.join(format!("{}.hbs", SUPPORT_TEMPLATE)))
            .filter(|path| path.is_file())
        {
            handlebars.register_template_string(SUPPORT_TEMPLATE, fs::read_to_string(&path)?)?;
            custom_support = true;
        }

        Ok(Self {
            handlebars,
            custom_support,
        })
    }

    fn render_category(
        &self,
        category: Category,
        store: &TokenStore,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedFile> {
        let (file_name, enum_name) = category_names(category);
        let tokens = declarations(category, store.category(category))
            .into_iter()
            .map(|decl| TemplateToken {
                line: decl.line(),
                description_lines: decl.doc_lines(),
                name: decl.name,
                type_annotation: decl.type_annotation,
                literal: decl.literal,
                description: decl.description,
            })
            .collect();
        let context = CategoryContext {
            header: header(file_name, store, generated_at),
            file_name,
            enum_name,
            category: category.key(),
            generated_at: generated_at.to_rfc3339(),
            source: &store.metadata.source,
            method: &store.metadata.method,
            tokens,
        };
        let contents = self.handlebars.render(category.key(), &context)?;
        Ok(GeneratedFile {
            category: Some(category),
            file_name: file_name.to_string(),
            contents,
        })
    }
}

impl Renderer for TemplateRenderer {
    fn name(&self) -> &'static str {
        "template"
    }

    fn render(&self, store: &TokenStore, generated_at: DateTime<Utc>) -> Result<Vec<GeneratedFile>> {
        let support = if self.custom_support {
            let context = SupportContext {
                header: header(SUPPORT_FILE_NAME, store, generated_at),
                file_name: SUPPORT_FILE_NAME,
                generated_at: generated_at.to_rfc3339(),
            };
            GeneratedFile {
                category: None,
                file_name: SUPPORT_FILE_NAME.to_string(),
                contents: self.handlebars.render(SUPPORT_TEMPLATE, &context)?,
            }
        } else {
            support_file(store, generated_at)
        };

        let mut files = vec![support];
        for category in Category::ALL {
            files.push(self.render_category(category, store, generated_at)?);
        }
        Ok(files)
    }
}
