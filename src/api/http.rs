use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

use super::{sales_array, ClientLookup, SalesSource};
use crate::config::Config;
use crate::error::{DebtorsError, Result};

/// Blocking client for the sales backend.
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
    sales_path: String,
    clients_path: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn from_config(config: &Config) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.api.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            sales_path: config.api.sales_path.trim_matches('/').to_string(),
            clients_path: config.api.clients_path.trim_matches('/').to_string(),
            token: config.api_token(),
        }
    }

    pub fn sales_url(&self) -> String {
        format!("{}/{}", self.base_url, self.sales_path)
    }

    pub fn clients_url(&self) -> String {
        format!("{}/{}", self.base_url, self.clients_path)
    }

    pub fn client_url(&self, client_id: i64) -> String {
        format!("{}/{}", self.clients_url(), client_id)
    }

    fn get(&self, url: &str) -> Result<String> {
        let mut request = self.agent.get(url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let http_err = |reason: String| DebtorsError::Http {
            url: url.to_string(),
            reason,
        };

        tracing::debug!(url, "GET");
        request
            .call()
            .map_err(|e| http_err(e.to_string()))?
            .body_mut()
            .read_to_string()
            .map_err(|e| http_err(e.to_string()))
    }
}

impl SalesSource for HttpBackend {
    fn fetch_sales(&self) -> Result<Vec<Value>> {
        let url = self.sales_url();
        let body = self.get(&url)?;
        sales_array(&body, &url)
    }

    fn describe(&self) -> String {
        self.sales_url()
    }
}

impl ClientLookup for HttpBackend {
    fn fetch_client(&self, client_id: i64) -> Result<Value> {
        let url = self.client_url(client_id);
        let body = self.get(&url)?;
        serde_json::from_str(&body).map_err(|e| DebtorsError::Json {
            origin: url,
            source: e,
        })
    }
}
