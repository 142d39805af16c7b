//! Figma integration
//!
//! - API types for the variables and file endpoints
//! - Client for fetching them

pub mod client;
pub mod types;

pub use client::{FigmaClient, FIGMA_API_BASE};
pub use types::*;
