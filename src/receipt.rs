use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::CycleCalculator;
use crate::decimal::Money;
use crate::errors::Result;
use crate::lease::LeaseAgreement;
use crate::ledger::PaymentRecord;

/// display fields resolved by the caller, not by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptContext {
    pub tenant_name: String,
    pub property_name: String,
    pub spot_label: String,
}

/// a confirmed payment enriched for display
///
/// read-only projection over an executed payment record; nothing here is
/// recomputed by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: Uuid,
    pub external_reference: Option<String>,
    pub amount: Money,
    pub late_fee_amount: Money,
    pub net_amount: Money,
    pub paid_date: DateTime<Utc>,
    /// month labels of the periods this payment settled, oldest first
    pub settled_periods: Vec<String>,
    pub tenant_name: String,
    pub property_name: String,
    pub spot_label: String,
}

impl PaymentReceipt {
    pub fn project(
        record: &PaymentRecord,
        lease: &LeaseAgreement,
        context: &ReceiptContext,
    ) -> Result<Self> {
        let calc = CycleCalculator::new(lease.lease_start);

        let mut references = record.applies_to_periods.clone();
        references.sort_by_key(|id| id.offset);

        let mut settled_periods = Vec::with_capacity(references.len());
        for reference in references {
            settled_periods.push(calc.cycle_for(reference.offset)?.month_label());
        }

        Ok(Self {
            payment_id: record.payment_id,
            external_reference: record.external_reference.clone(),
            amount: record.amount,
            late_fee_amount: record.late_fee_amount,
            net_amount: record.net_amount(),
            paid_date: record.paid_date,
            settled_periods,
            tenant_name: context.tenant_name.clone(),
            property_name: context.property_name.clone(),
            spot_label: context.spot_label.clone(),
        })
    }
}
