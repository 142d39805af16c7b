//! Variables REST API adapter

use async_trait::async_trait;
use tracing::info;

use super::{build_store, SourceFilters, SourceMethod, TokenSource, VariableSet};
use crate::config::FigmaConfig;
use crate::error::Result;
use crate::figma::FigmaClient;
use crate::tokens::TokenStore;

pub struct VariablesApiSource {
    client: FigmaClient,
    file_key: String,
}

impl VariablesApiSource {
    pub fn new(client: FigmaClient, file_key: impl Into<String>) -> Self {
        Self {
            client,
            file_key: file_key.into(),
        }
    }

    pub fn from_config(config: &FigmaConfig) -> Result<Self> {
        let client = FigmaClient::with_base_url(&config.access_token, config.api_base.clone())?;
        Ok(Self::new(client, &config.file_key))
    }
}

#[async_trait]
impl TokenSource for VariablesApiSource {
    fn method(&self) -> SourceMethod {
        SourceMethod::Variables
    }

    async fn fetch(&self, filters: &SourceFilters) -> Result<TokenStore> {
        let response = self.client.get_local_variables(&self.file_key).await?;
        let set = VariableSet::from_response(response);
        info!(
            file_key = %self.file_key,
            collections = set.collections.len(),
            variables = set.variables.len(),
            "Fetched Figma variables"
        );
        Ok(build_store(&set, filters, self.method()))
    }
}
