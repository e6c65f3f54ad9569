pub mod api;
pub mod config;
pub mod debt;
pub mod error;
pub mod money;
pub mod sales;

pub use api::{pending_debts, FileSalesSource, HttpBackend, SalesSource};
pub use config::Config;
pub use debt::{aggregate_debts, ClientDebtSummary, DebtPolicy, DebtReport, SaleDebt};
pub use error::{DebtorsError, Result};
pub use sales::{decode_sales, InstallmentPlan, Payment, PlanStatus, Sale};
