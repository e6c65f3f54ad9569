use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{field, field_date};
use crate::money::{to_id, to_number, to_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Paid,
    Cancelled,
}

impl PlanStatus {
    /// Unknown or missing statuses count as active.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("PAGADO" | "PAID") => PlanStatus::Paid,
            Some("CANCELADO" | "CANCELLED" | "CANCELED") => PlanStatus::Cancelled,
            _ => PlanStatus::Active,
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Active => write!(f, "ACTIVE"),
            PlanStatus::Paid => write!(f, "PAID"),
            PlanStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl Payment {
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            amount: field(obj, &["monto", "amount"]).map_or(0.0, to_number),
            date: field_date(obj, &["fecha_pago", "fecha", "date"]),
            note: field(obj, &["observacion", "nota", "note"]).and_then(to_text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentPlan {
    pub id: Option<i64>,
    pub total: f64,
    pub status: PlanStatus,
    pub payments: Vec<Payment>,
}

impl InstallmentPlan {
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let status = field(obj, &["estado", "status"]).and_then(to_text);
        let payments = field(obj, &["pagos", "payments"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Payment::from_json).collect())
            .unwrap_or_default();

        Some(Self {
            id: field(obj, &["id_plan", "id"]).and_then(to_id),
            total: field(obj, &["monto_total", "total"]).map_or(0.0, to_number),
            status: PlanStatus::parse(status.as_deref()),
            payments,
        })
    }

    /// Sum of recorded payments.
    pub fn paid_amount(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.payments.iter().filter_map(|p| p.date).max()
    }
}
