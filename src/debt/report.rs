use chrono::Local;
use serde::Serialize;

use super::ClientDebtSummary;

/// Complete data handed to renderers (terminal table, JSON, exporters)
#[derive(Debug, Serialize)]
pub struct DebtReport {
    pub generated_at: String,
    pub currency_symbol: String,
    pub client_count: usize,
    pub sale_count: usize,
    pub total_debt: f64,
    pub clients: Vec<ClientDebtSummary>,
}

impl DebtReport {
    pub fn build(clients: Vec<ClientDebtSummary>, currency_symbol: &str) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            currency_symbol: currency_symbol.to_string(),
            client_count: clients.len(),
            sale_count: clients.iter().map(|c| c.sales.len()).sum(),
            total_debt: clients.iter().map(|c| c.total_debt).sum(),
            clients,
        }
    }
}
