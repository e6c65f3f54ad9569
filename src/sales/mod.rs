mod plan;
mod sale;

pub use plan::{InstallmentPlan, Payment, PlanStatus};
pub use sale::{ClientRef, PaymentMethod, Person, Sale};

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Decode the raw sales list, skipping records that are not objects.
pub fn decode_sales(values: &[Value]) -> Vec<Sale> {
    values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            let sale = Sale::from_json(value);
            if sale.is_none() {
                tracing::debug!(index = idx, "skipping sale record that is not an object");
            }
            sale
        })
        .collect()
}

/// First present, non-null value among `keys`. Backend payloads are not
/// consistent about Spanish vs English field names.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

pub(crate) fn field_object<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Map<String, Value>> {
    field(obj, keys).and_then(Value::as_object)
}

pub(crate) fn field_date(obj: &Map<String, Value>, keys: &[&str]) -> Option<NaiveDate> {
    field(obj, keys)
        .and_then(Value::as_str)
        .and_then(parse_date)
}

/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}
