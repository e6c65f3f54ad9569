mod directory;
mod file;
mod http;

pub use directory::{fill_placeholder_names, ClientDirectory, ClientLookup};
pub use file::FileSalesSource;
pub use http::HttpBackend;

use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

use crate::debt::{aggregate_debts, ClientDebtSummary, DebtPolicy};
use crate::error::{DebtorsError, Result};
use crate::sales::{decode_sales, Sale};

/// Where the raw sales list comes from.
pub trait SalesSource {
    fn fetch_sales(&self) -> Result<Vec<Value>>;

    /// Turn the fetched records into sales. Runs inside the aggregation guard.
    fn decode(&self, values: &[Value]) -> Vec<Sale> {
        decode_sales(values)
    }

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// Parse a sales payload. Accepts a bare array or an envelope holding the
/// array under `data`, `ventas` or `items`.
pub fn sales_array(body: &str, origin: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(body).map_err(|e| DebtorsError::Json {
        origin: origin.to_string(),
        source: e,
    })?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => ["data", "ventas", "items"]
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| DebtorsError::UnexpectedPayload(origin.to_string())),
        _ => Err(DebtorsError::UnexpectedPayload(origin.to_string())),
    }
}

/// Fetch and aggregate, surfacing failures.
pub fn try_pending_debts<S>(source: &S, policy: &DebtPolicy) -> Result<Vec<ClientDebtSummary>>
where
    S: SalesSource + ?Sized,
{
    let values = source.fetch_sales()?;
    tracing::info!(origin = %source.describe(), records = values.len(), "fetched sales");

    panic::catch_unwind(AssertUnwindSafe(|| {
        let sales = source.decode(&values);
        tracing::debug!(decoded = sales.len(), "decoded sales");
        aggregate_debts(&sales, policy)
    }))
    .map_err(|payload| DebtorsError::Aggregation(panic_message(payload.as_ref())))
}

/// Clients with outstanding installment balances, largest debt first.
///
/// Never fails: a failed fetch or an aborted aggregation is logged and
/// yields an empty list, so callers render "no debts" instead of erroring.
pub fn pending_debts<S>(source: &S, policy: &DebtPolicy) -> Vec<ClientDebtSummary>
where
    S: SalesSource + ?Sized,
{
    match try_pending_debts(source, policy) {
        Ok(summaries) => summaries,
        Err(e) => {
            tracing::error!(origin = %source.describe(), error = %e, "could not load pending debts");
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
