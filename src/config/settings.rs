use serde::{Deserialize, Serialize};

use crate::debt::DebtPolicy;

pub const TOKEN_ENV: &str = "DEBTORS_API_TOKEN";

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Config {
    pub fn policy(&self) -> DebtPolicy {
        DebtPolicy::new(self.report.epsilon)
    }

    /// Token from the environment wins over the config file.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.token.clone())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_sales_path")]
    pub sales_path: String,
    #[serde(default = "default_clients_path")]
    pub clients_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sales_path: default_sales_path(),
            clients_path: default_clients_path(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            epsilon: default_epsilon(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_sales_path() -> String {
    "ventas".to_string()
}

fn default_clients_path() -> String {
    "clientes".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_epsilon() -> f64 {
    DebtPolicy::DEFAULT_EPSILON
}
