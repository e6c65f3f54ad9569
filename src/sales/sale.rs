use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{field, field_date, field_object, InstallmentPlan};
use crate::money::{to_id, to_number, to_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Installments,
    Other(String),
}

impl PaymentMethod {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EFECTIVO" | "CASH" => PaymentMethod::Cash,
            "TRANSFERENCIA" | "TRANSFER" => PaymentMethod::Transfer,
            "CUOTAS" | "INSTALLMENTS" | "INSTALLMENT" => PaymentMethod::Installments,
            _ => PaymentMethod::Other(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub name: Option<String>,
    pub surname: Option<String>,
}

impl Person {
    /// "name surname", trimmed. `None` when both are blank.
    pub fn full_name(&self) -> Option<String> {
        let full = format!(
            "{} {}",
            self.name.as_deref().unwrap_or(""),
            self.surname.as_deref().unwrap_or("")
        );
        let full = full.trim();
        (!full.is_empty()).then(|| full.to_string())
    }
}

/// Client object embedded in a sale (or returned by the clients endpoint).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub person: Option<Person>,
}

impl ClientRef {
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let person = field_object(obj, &["persona", "person"]).map(|p| Person {
            name: field(p, &["nombre", "name"]).and_then(to_text),
            surname: field(p, &["apellido", "surname"]).and_then(to_text),
        });

        Some(Self {
            id: field(obj, &["id_cliente", "client_id", "id"]).and_then(to_id),
            name: field(obj, &["nombre", "name"]).and_then(to_text),
            person,
        })
    }

    /// Person name first, then the client's own name.
    pub fn display_name(&self) -> Option<String> {
        self.person.as_ref().and_then(Person::full_name).or_else(|| {
            self.name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub id: Option<i64>,
    pub client_id: Option<i64>,
    pub client: Option<ClientRef>,
    pub date: Option<NaiveDate>,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<String>,
    pub plan: Option<InstallmentPlan>,
}

impl Sale {
    /// Read a sale from the backend's JSON. Only fails when the record is
    /// not an object; every field is optional or coerced.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let client = field(obj, &["cliente", "client"]).and_then(ClientRef::from_json);
        // only the sale's own reference counts; an embedded client id does not
        let client_id = field(obj, &["id_cliente", "client_id"]).and_then(to_id);

        Some(Self {
            id: field(obj, &["id_venta", "id"]).and_then(to_id),
            client_id,
            client,
            date: field_date(obj, &["fecha", "date"]),
            subtotal: field(obj, &["subtotal"]).map_or(0.0, to_number),
            discount: field(obj, &["descuento", "discount"]).map_or(0.0, to_number),
            total: field(obj, &["total"]).map_or(0.0, to_number),
            payment_method: field(obj, &["metodo_pago", "payment_method"])
                .and_then(Value::as_str)
                .map(PaymentMethod::parse),
            status: field(obj, &["estado", "status"]).and_then(to_text),
            plan: field(obj, &["plan_pago", "installment_plan", "plan"])
                .and_then(InstallmentPlan::from_json),
        })
    }
}
