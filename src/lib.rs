//! figma-tokens - Figma design tokens to Swift
//!
//! Pulls design tokens out of a Figma file, normalises them into one
//! canonical JSON store, and generates Swift sources from that store.
//!
//! ## Pipeline
//! Source adapter -> TokenStore (JSON on disk) -> Renderer -> `*.swift`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figma_tokens::render::{generate, SwiftRenderer};
//! use figma_tokens::TokenStore;
//!
//! let store = TokenStore::load("tokens/design-tokens.json")?;
//! generate(&store, &SwiftRenderer, "ios/DesignTokens/Generated".as_ref())?;
//! # Ok::<(), figma_tokens::TokenError>(())
//! ```

// Core error handling
pub mod error;

// Canonical token model and store
pub mod tokens;

// Figma REST client and wire types
pub mod figma;

// Environment configuration
pub mod config;

// Source adapters: variables API, file content, plugin export
pub mod source;

// GitHub contents API publishing
pub mod github;

// Swift renderers
pub mod render;

pub use error::{Result, TokenError};
pub use render::{GeneratedFile, Renderer, RendererKind, SwiftRenderer, TemplateRenderer};
pub use source::{
    sync_to_file, FileContentSource, PluginExportSource, SourceFilters, SourceMethod, TokenSource,
    VariablesApiSource,
};
pub use tokens::{Category, Token, TokenStore, TokenValue};
