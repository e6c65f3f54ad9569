mod report;

pub use report::DebtReport;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::sales::{ClientRef, InstallmentPlan, PlanStatus, Sale};

/// Balances at or below `epsilon` count as settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebtPolicy {
    pub epsilon: f64,
}

impl DebtPolicy {
    pub const DEFAULT_EPSILON: f64 = 0.01;

    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: if epsilon.is_finite() { epsilon.max(0.0) } else { 0.0 },
        }
    }

    /// Plain floating-point comparison, no tolerance.
    pub fn exact() -> Self {
        Self { epsilon: 0.0 }
    }
}

impl Default for DebtPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPSILON)
    }
}

/// One sale's outstanding installment balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleDebt {
    pub sale_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub plan_total: f64,
    pub paid: f64,
    pub pending: f64,
    pub payment_count: usize,
    pub last_payment: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDebtSummary {
    pub client_id: i64,
    pub name: String,
    pub sales: Vec<SaleDebt>,
    pub total_debt: f64,
}

impl ClientDebtSummary {
    fn new(client_id: i64, name: String) -> Self {
        Self {
            client_id,
            name,
            sales: Vec::new(),
            total_debt: 0.0,
        }
    }

    fn push(&mut self, debt: SaleDebt) {
        self.total_debt += debt.pending;
        self.sales.push(debt);
    }

    pub fn has_placeholder_name(&self) -> bool {
        self.name == placeholder_name(self.client_id)
    }
}

/// Plan total minus recorded payments, floored at zero.
pub fn pending_balance(plan: &InstallmentPlan) -> f64 {
    (plan.total - plan.paid_amount()).max(0.0)
}

/// A plan still owes money when it is neither paid nor cancelled and its
/// payments fall short of the total by more than the policy tolerance.
pub fn is_debt_eligible(plan: &InstallmentPlan, policy: &DebtPolicy) -> bool {
    match plan.status {
        PlanStatus::Paid | PlanStatus::Cancelled => false,
        PlanStatus::Active => plan.total - plan.paid_amount() > policy.epsilon,
    }
}

pub fn placeholder_name(client_id: i64) -> String {
    format!("Client {client_id}")
}

pub fn resolve_client_name(client_id: i64, client: Option<&ClientRef>) -> String {
    client
        .and_then(ClientRef::display_name)
        .unwrap_or_else(|| placeholder_name(client_id))
}

/// Group the outstanding installment balances of `sales` by client.
///
/// Sales without a usable client id or without an open plan are skipped.
/// The result is sorted by total debt, largest first; clients with equal
/// debt stay in the order their first indebted sale appeared.
pub fn aggregate_debts(sales: &[Sale], policy: &DebtPolicy) -> Vec<ClientDebtSummary> {
    let mut summaries: Vec<ClientDebtSummary> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for sale in sales {
        let Some(client_id) = sale.client_id else {
            tracing::debug!(sale_id = ?sale.id, "skipping sale without client id");
            continue;
        };
        let Some(plan) = sale.plan.as_ref() else {
            continue;
        };
        if !is_debt_eligible(plan, policy) {
            continue;
        }

        let pending = pending_balance(plan);
        if pending <= policy.epsilon || pending <= 0.0 {
            continue;
        }

        let slot = *slots.entry(client_id).or_insert_with(|| {
            let name = resolve_client_name(client_id, sale.client.as_ref());
            summaries.push(ClientDebtSummary::new(client_id, name));
            summaries.len() - 1
        });

        summaries[slot].push(SaleDebt {
            sale_id: sale.id,
            date: sale.date,
            plan_total: plan.total,
            paid: plan.paid_amount(),
            pending,
            payment_count: plan.payments.len(),
            last_payment: plan.last_payment_date(),
        });
    }

    summaries.retain(|s| !s.sales.is_empty() && s.total_debt > 0.0);
    // sort_by is stable, so ties keep encounter order
    summaries.sort_by(|a, b| b.total_debt.total_cmp(&a.total_debt));
    summaries
}

pub fn client_debt(summaries: &[ClientDebtSummary], client_id: i64) -> Option<&ClientDebtSummary> {
    summaries.iter().find(|s| s.client_id == client_id)
}
