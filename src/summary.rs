use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::actions::{classify, OptionBuilder, PaymentOption};
use crate::calendar::CycleCalculator;
use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::lease::LeaseAgreement;
use crate::ledger::{LedgerAggregator, PaymentRecord};
use crate::types::PaymentAction;

/// one overdue period as surfaced to the payer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverduePaymentDetail {
    pub description: String,
    pub due_date: NaiveDate,
    pub days_overdue: u32,
    pub amount: Money,
}

/// the billing snapshot for one tenant at one evaluation date
///
/// a pure function of (lease, ledger, evaluation date); computed on demand
/// and never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentSummary {
    pub payment_action: PaymentAction,
    pub total_due: Money,
    pub current_month_amount: Money,
    pub rent_amount: Money,
    pub deposit_amount: Money,

    pub is_pro_rated: bool,
    pub pro_rated_days: u32,
    pub pro_rated_rent_amount: Money,

    pub has_overdue_payments: bool,
    pub overdue_count: usize,
    pub total_overdue_amount: Money,
    pub overdue_payments_details: Vec<OverduePaymentDetail>,

    pub payment_options: Vec<PaymentOption>,
    pub can_pay_current_and_overdue: bool,
    pub can_pay_next_month: bool,

    pub is_lease_expiring_soon: bool,
    pub has_active_lease: bool,
    pub warning_message: Option<String>,
}

impl RentSummary {
    /// snapshot for a tenant with no lease, or one whose lease has ended:
    /// every monetary field zero, nothing payable
    pub fn inactive() -> Self {
        Self {
            payment_action: PaymentAction::RegularPayment,
            total_due: Money::ZERO,
            current_month_amount: Money::ZERO,
            rent_amount: Money::ZERO,
            deposit_amount: Money::ZERO,
            is_pro_rated: false,
            pro_rated_days: 0,
            pro_rated_rent_amount: Money::ZERO,
            has_overdue_payments: false,
            overdue_count: 0,
            total_overdue_amount: Money::ZERO,
            overdue_payments_details: Vec::new(),
            payment_options: Vec::new(),
            can_pay_current_and_overdue: false,
            can_pay_next_month: false,
            is_lease_expiring_soon: false,
            has_active_lease: false,
            warning_message: None,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// parse from json string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// composes calendar, ledger, classifier and option builder into one snapshot
pub struct SummaryAssembler {
    config: BillingConfig,
}

impl SummaryAssembler {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    pub fn standard() -> Self {
        Self::new(BillingConfig::standard())
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// resolve the billing snapshot at an explicit evaluation date
    pub fn assemble(
        &self,
        lease: Option<&LeaseAgreement>,
        payments: &[PaymentRecord],
        evaluation_date: NaiveDate,
        events: &mut EventStore,
    ) -> Result<RentSummary> {
        self.config.validate()?;

        let lease = match lease {
            Some(lease) => lease,
            None => return Ok(RentSummary::inactive()),
        };
        lease.validate()?;

        if !lease.is_active(evaluation_date) {
            return Ok(RentSummary::inactive());
        }

        let view = LedgerAggregator::new(lease, &self.config).aggregate(
            payments,
            evaluation_date,
            events,
        )?;
        let action = classify(&view);
        let plan = OptionBuilder::new(lease, &self.config).build(&view, action);

        let proration = CycleCalculator::new(lease.lease_start).proration();
        let (is_pro_rated, pro_rated_days, pro_rated_rent_amount) = if proration.applies() {
            (
                true,
                proration.days,
                proration.prorated_amount(lease.monthly_rent_amount),
            )
        } else {
            (false, 0, Money::ZERO)
        };

        let overdue_payments_details: Vec<OverduePaymentDetail> = view
            .overdue_periods()
            .map(|p| OverduePaymentDetail {
                description: format!("Rent for {}", p.cycle.month_label()),
                due_date: p.cycle.due_date,
                days_overdue: (evaluation_date - p.cycle.due_date).num_days() as u32,
                amount: p.outstanding(),
            })
            .collect();

        events.emit(Event::SummaryComputed {
            tenant_id: lease.tenant_id,
            lease_id: lease.lease_id,
            action,
            total_due: plan.total_due,
            evaluation_date,
        });

        Ok(RentSummary {
            payment_action: action,
            total_due: plan.total_due,
            current_month_amount: plan.current_month_amount,
            rent_amount: lease.monthly_rent_amount,
            deposit_amount: lease.deposit_amount,
            is_pro_rated,
            pro_rated_days,
            pro_rated_rent_amount,
            has_overdue_payments: !overdue_payments_details.is_empty(),
            overdue_count: view.overdue_count(),
            total_overdue_amount: view.total_overdue_amount(),
            overdue_payments_details,
            payment_options: plan.options,
            can_pay_current_and_overdue: plan.can_pay_current_and_overdue,
            can_pay_next_month: plan.can_pay_next_month,
            is_lease_expiring_soon: lease
                .is_expiring_soon(evaluation_date, self.config.expiry_warning_days),
            has_active_lease: true,
            warning_message: plan.warning_message,
        })
    }

    /// resolve the snapshot "now", with the clock injected at the boundary
    /// so the core stays deterministic
    pub fn assemble_now(
        &self,
        lease: Option<&LeaseAgreement>,
        payments: &[PaymentRecord],
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<RentSummary> {
        self.assemble(lease, payments, time_provider.now().date_naive(), events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentOptionKind, PeriodId};
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lease_starting(start: NaiveDate, rent: i64, deposit: i64) -> LeaseAgreement {
        LeaseAgreement::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            None,
            Money::from_major(rent),
            Money::from_major(deposit),
        )
    }

    fn payment(lease: &LeaseAgreement, amount: i64, offsets: &[u32]) -> PaymentRecord {
        PaymentRecord {
            payment_id: Uuid::new_v4(),
            tenant_id: lease.tenant_id,
            amount: Money::from_major(amount),
            late_fee_amount: Money::ZERO,
            paid_date: Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap(),
            applies_to_periods: offsets
                .iter()
                .map(|&o| PeriodId::new(lease.lease_id, o))
                .collect(),
            external_reference: None,
        }
    }

    #[test]
    fn test_missing_lease_short_circuits() {
        let assembler = SummaryAssembler::standard();
        let summary = assembler
            .assemble(None, &[], date(2024, 2, 10), &mut EventStore::new())
            .unwrap();

        assert!(!summary.has_active_lease);
        assert_eq!(summary.total_due, Money::ZERO);
        assert!(summary.payment_options.is_empty());
    }

    #[test]
    fn test_ended_lease_short_circuits() {
        let mut lease = lease_starting(date(2023, 1, 1), 500, 0);
        lease.lease_end = Some(date(2023, 12, 31));
        let assembler = SummaryAssembler::standard();

        let summary = assembler
            .assemble(Some(&lease), &[], date(2024, 2, 10), &mut EventStore::new())
            .unwrap();

        assert!(!summary.has_active_lease);
        assert_eq!(summary.overdue_count, 0);
    }

    #[test]
    fn test_evaluation_before_start_fails() {
        let lease = lease_starting(date(2024, 3, 15), 900, 0);
        let assembler = SummaryAssembler::standard();

        let result = assembler.assemble(
            Some(&lease),
            &[],
            date(2024, 3, 1),
            &mut EventStore::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_first_payment_snapshot_with_proration() {
        let lease = lease_starting(date(2024, 3, 15), 900, 500);
        let assembler = SummaryAssembler::standard();

        let summary = assembler
            .assemble(Some(&lease), &[], date(2024, 3, 20), &mut EventStore::new())
            .unwrap();

        assert_eq!(summary.payment_action, PaymentAction::FirstTimePayment);
        assert!(summary.is_pro_rated);
        assert_eq!(summary.pro_rated_days, 17);
        assert_eq!(
            summary.pro_rated_rent_amount,
            Money::from_str_exact("493.55").unwrap()
        );
        assert_eq!(
            summary.total_due,
            Money::from_str_exact("993.55").unwrap()
        );
        assert_eq!(summary.rent_amount, Money::from_major(900));
        assert_eq!(summary.deposit_amount, Money::from_major(500));
    }

    #[test]
    fn test_overdue_snapshot_details() {
        let lease = lease_starting(date(2024, 1, 5), 500, 0);
        let payments = vec![payment(&lease, 500, &[0])];
        let assembler = SummaryAssembler::standard();

        let summary = assembler
            .assemble(
                Some(&lease),
                &payments,
                date(2024, 3, 10),
                &mut EventStore::new(),
            )
            .unwrap();

        assert_eq!(summary.payment_action, PaymentAction::CurrentMonthOverdue);
        assert!(summary.has_overdue_payments);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.total_overdue_amount, Money::from_major(500));

        let detail = &summary.overdue_payments_details[0];
        assert_eq!(detail.description, "Rent for February 2024");
        assert_eq!(detail.due_date, date(2024, 2, 5));
        assert_eq!(detail.days_overdue, 34);
        assert_eq!(detail.amount, Money::from_major(500));
    }

    #[test]
    fn test_limit_reached_snapshot() {
        let lease = lease_starting(date(2024, 1, 5), 500, 0);
        let payments = vec![payment(&lease, 1500, &[0, 1, 2])];
        let assembler = SummaryAssembler::standard();

        let summary = assembler
            .assemble(
                Some(&lease),
                &payments,
                date(2024, 2, 10),
                &mut EventStore::new(),
            )
            .unwrap();

        assert_eq!(summary.payment_action, PaymentAction::PaymentLimitReached);
        assert_eq!(summary.total_due, Money::ZERO);
        assert!(summary.payment_options.is_empty());
        assert!(summary.warning_message.is_some());
    }

    #[test]
    fn test_expiry_warning_window() {
        let mut lease = lease_starting(date(2024, 1, 5), 500, 0);
        lease.lease_end = Some(date(2024, 3, 1));
        let payments = vec![payment(&lease, 500, &[0])];
        let assembler = SummaryAssembler::standard();

        let summary = assembler
            .assemble(
                Some(&lease),
                &payments,
                date(2024, 2, 10),
                &mut EventStore::new(),
            )
            .unwrap();
        assert!(summary.is_lease_expiring_soon);
        assert!(summary.has_active_lease);
    }

    #[test]
    fn test_assemble_now_uses_injected_clock() {
        let lease = lease_starting(date(2024, 1, 5), 500, 0);
        let assembler = SummaryAssembler::standard();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        ));

        let summary = assembler
            .assemble_now(Some(&lease), &[], &time, &mut EventStore::new())
            .unwrap();

        assert_eq!(summary.payment_action, PaymentAction::FirstTimePayment);
        // the opening cycle runs from the 5th: 500 * 27/31
        assert_eq!(
            summary.current_month_amount,
            Money::from_str_exact("435.48").unwrap()
        );
    }

    #[test]
    fn test_summary_json_round_trip() {
        let lease = lease_starting(date(2024, 3, 15), 900, 500);
        let assembler = SummaryAssembler::standard();
        let summary = assembler
            .assemble(Some(&lease), &[], date(2024, 3, 20), &mut EventStore::new())
            .unwrap();

        let json = summary.to_json_pretty().unwrap();
        assert!(json.contains("FIRST_TIME_PAYMENT"));
        let parsed = RentSummary::from_json(&json).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_summary_emits_computed_event() {
        let lease = lease_starting(date(2024, 1, 5), 500, 0);
        let mut events = EventStore::new();
        SummaryAssembler::standard()
            .assemble(Some(&lease), &[], date(2024, 1, 10), &mut events)
            .unwrap();

        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e, Event::SummaryComputed { .. })));
    }
}
