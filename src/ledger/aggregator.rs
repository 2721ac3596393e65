use chrono::NaiveDate;

use crate::calendar::CycleCalculator;
use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::events::{Event, EventStore};
use crate::lease::LeaseAgreement;
use crate::ledger::{ObligationPeriod, PaymentRecord};
use crate::types::{PeriodId, PeriodStatus};

/// classifies every obligation period of a lease against its payment ledger
///
/// pure with respect to its inputs: no wall clock, no storage; running it
/// twice over the same lease, ledger and evaluation date yields the same view
pub struct LedgerAggregator<'a> {
    lease: &'a LeaseAgreement,
    config: &'a BillingConfig,
}

impl<'a> LedgerAggregator<'a> {
    pub fn new(lease: &'a LeaseAgreement, config: &'a BillingConfig) -> Self {
        Self { lease, config }
    }

    /// generate periods through the advance-limit horizon, settle payments
    /// oldest-period-first, and classify each period
    pub fn aggregate(
        &self,
        payments: &[PaymentRecord],
        evaluation_date: NaiveDate,
        events: &mut EventStore,
    ) -> Result<LedgerView> {
        self.lease.validate()?;

        let calc = CycleCalculator::new(self.lease.lease_start);
        let current_offset = calc.offset_containing(evaluation_date)?;
        let horizon = current_offset + self.config.advance_limit_months;
        let proration = calc.proration();

        let mut periods = Vec::with_capacity(horizon as usize + 1);
        for offset in 0..=horizon {
            let cycle = calc.cycle_for(offset)?;
            let amount_due = if offset == 0 && proration.applies() {
                proration.prorated_amount(self.lease.monthly_rent_amount)
            } else {
                self.lease.monthly_rent_amount
            };
            periods.push(ObligationPeriod::new(
                PeriodId::new(self.lease.lease_id, offset),
                cycle,
                amount_due,
            ));
        }

        self.settle(&mut periods, payments, events);

        for period in &mut periods {
            period.status = if period.is_settled() {
                PeriodStatus::Paid
            } else if period.cycle.due_date < evaluation_date {
                PeriodStatus::Overdue
            } else {
                PeriodStatus::Unpaid
            };
        }

        Ok(LedgerView {
            periods,
            current_offset,
        })
    }

    fn settle(
        &self,
        periods: &mut [ObligationPeriod],
        payments: &[PaymentRecord],
        events: &mut EventStore,
    ) {
        let mut ordered: Vec<&PaymentRecord> = payments.iter().collect();
        ordered.sort_by_key(|p| p.paid_date);

        for record in ordered {
            if record.tenant_id != self.lease.tenant_id {
                tracing::warn!(
                    payment_id = %record.payment_id,
                    payment_tenant = %record.tenant_id,
                    lease_tenant = %self.lease.tenant_id,
                    "payment belongs to a different tenant, skipping"
                );
                continue;
            }

            let mut remaining = record.net_amount();

            // settlement invariant: the oldest referenced period fills first,
            // so overdue count can only shrink as payments land
            let mut references = record.applies_to_periods.clone();
            references.sort_by_key(|id| id.offset);

            for reference in references {
                if remaining.is_zero() {
                    break;
                }

                let period = match periods.iter_mut().find(|p| p.id == reference) {
                    Some(p) => p,
                    None => {
                        // fail safe toward charging correctness: the unknown
                        // reference is dropped, nothing is marked settled
                        let inconsistency = BillingError::LedgerInconsistency {
                            payment_id: record.payment_id,
                            period: reference,
                        };
                        tracing::warn!(error = %inconsistency, "treating referenced period as unpaid");
                        events.emit(Event::LedgerInconsistencyDetected {
                            payment_id: record.payment_id,
                            period: reference,
                        });
                        continue;
                    }
                };

                let applied = remaining.min(period.outstanding());
                if applied.is_zero() {
                    continue;
                }
                period.settled_amount += applied;
                remaining -= applied;

                if period.is_settled() {
                    events.emit(Event::PeriodSettled {
                        period: period.id,
                        payment_id: record.payment_id,
                        amount_applied: applied,
                    });
                }
            }

            if !remaining.is_zero() {
                tracing::debug!(
                    payment_id = %record.payment_id,
                    surplus = %remaining,
                    "payment exceeds its referenced obligations"
                );
            }
        }
    }
}

/// aggregated ledger state at one evaluation date
#[derive(Debug, Clone)]
pub struct LedgerView {
    periods: Vec<ObligationPeriod>,
    current_offset: u32,
}

impl LedgerView {
    /// all periods from lease start through the advance-limit horizon
    pub fn periods(&self) -> &[ObligationPeriod] {
        &self.periods
    }

    pub fn current_offset(&self) -> u32 {
        self.current_offset
    }

    /// the period whose cycle contains the evaluation date
    pub fn current_period(&self) -> &ObligationPeriod {
        &self.periods[self.current_offset as usize]
    }

    pub fn period_at(&self, offset: u32) -> Option<&ObligationPeriod> {
        self.periods.get(offset as usize)
    }

    /// the advance-limit lookahead beyond the current period
    pub fn future_periods(&self) -> &[ObligationPeriod] {
        &self.periods[self.current_offset as usize + 1..]
    }

    /// overdue periods strictly before the current one, oldest first
    ///
    /// the current period may carry `Overdue` status once its due day passes,
    /// but arrears aggregation counts only elapsed cycles; the current cycle
    /// surfaces separately as the current-month amount
    pub fn overdue_periods(&self) -> impl Iterator<Item = &ObligationPeriod> {
        self.periods[..self.current_offset as usize]
            .iter()
            .filter(|p| p.status == PeriodStatus::Overdue)
    }

    pub fn overdue_count(&self) -> usize {
        self.overdue_periods().count()
    }

    pub fn total_overdue_amount(&self) -> Money {
        self.overdue_periods()
            .fold(Money::ZERO, |sum, p| sum + p.outstanding())
    }

    /// true until the first obligation of the lease is fully paid
    pub fn is_first_payment(&self) -> bool {
        self.periods[0].status != PeriodStatus::Paid
    }

    pub fn all_future_paid(&self) -> bool {
        self.future_periods()
            .iter()
            .all(|p| p.status == PeriodStatus::Paid)
    }
}
