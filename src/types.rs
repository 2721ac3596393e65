use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a tenant
pub type TenantId = Uuid;

/// unique identifier for a lease agreement
pub type LeaseId = Uuid;

/// stable address of one obligation period within a lease
///
/// periods are generated lazily from the lease calendar, so the zero-based
/// month offset is the identity; nothing has to be stored to reference one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodId {
    pub lease_id: LeaseId,
    pub offset: u32,
}

impl PeriodId {
    pub fn new(lease_id: LeaseId, offset: u32) -> Self {
        Self { lease_id, offset }
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.lease_id, self.offset)
    }
}

/// settlement state of one obligation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// not yet settled, due date not passed
    Unpaid,
    /// fully settled
    Paid,
    /// due date passed without full settlement
    Overdue,
}

/// the single classified state governing which payment options are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentAction {
    /// nothing has settled the first obligation yet; rent plus deposit is due
    FirstTimePayment,
    /// past periods are overdue and the current one is unsettled as well
    CurrentMonthOverdue,
    /// rent is already settled through the advance limit, nothing payable
    PaymentLimitReached,
    /// current period settled, the next cycle may be paid in advance
    CanPayNextMonth,
    /// current period open, no arrears
    RegularPayment,
}

/// kind of a selectable payment option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOptionKind {
    /// the current period's outstanding amount
    Current,
    /// all overdue balances together
    Overdue,
    /// current plus overdue in one charge
    Combined,
    /// the upcoming cycle paid in advance
    NextMonth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_id_display() {
        let lease_id = Uuid::nil();
        let id = PeriodId::new(lease_id, 3);
        assert_eq!(id.to_string(), format!("{lease_id}#3"));
    }

    #[test]
    fn test_action_wire_format() {
        let s = serde_json::to_string(&PaymentAction::FirstTimePayment).unwrap();
        assert_eq!(s, "\"FIRST_TIME_PAYMENT\"");
        let s = serde_json::to_string(&PaymentAction::CurrentMonthOverdue).unwrap();
        assert_eq!(s, "\"CURRENT_MONTH_OVERDUE\"");
        let s = serde_json::to_string(&PaymentOptionKind::NextMonth).unwrap();
        assert_eq!(s, "\"NEXT_MONTH\"");
    }
}
