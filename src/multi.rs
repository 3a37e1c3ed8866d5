use std::collections::HashMap;

use crate::{ApiClient, InvokeArgs, Outcome, Result};

/// Several independent [`ApiClient`]s behind one dispatch entry point.
///
/// Calls that omit the API key go to the default API.
#[derive(Clone, Debug)]
pub struct MultiApiClient {
    apis: HashMap<String, ApiClient>,
    default_api: String,
}

impl MultiApiClient {
    /// Creates a registry whose default API is `client` under `key`.
    pub fn new(key: impl Into<String>, client: ApiClient) -> Self {
        let key = key.into();
        let mut apis = HashMap::new();
        apis.insert(key.clone(), client);
        Self {
            apis,
            default_api: key,
        }
    }

    /// Adds or replaces the API under `key`.
    pub fn with_api(mut self, key: impl Into<String>, client: ApiClient) -> Self {
        self.apis.insert(key.into(), client);
        self
    }

    pub fn default_api(&self) -> &str {
        &self.default_api
    }

    pub fn api(&self, key: &str) -> Option<&ApiClient> {
        self.apis.get(key)
    }

    /// Invokes `endpoint` on the API under `api`, or on the default API.
    pub async fn invoke(
        &self,
        api: Option<&str>,
        endpoint: &str,
        args: InvokeArgs,
    ) -> Result<Outcome> {
        let key = api.unwrap_or(self.default_api.as_str());
        match self.apis.get(key) {
            Some(client) => client.invoke(endpoint, args).await,
            None => Ok(Outcome::UnknownApi {
                name: key.to_owned(),
            }),
        }
    }
}
