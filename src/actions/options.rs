use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::lease::LeaseAgreement;
use crate::ledger::LedgerView;
use crate::types::{PaymentAction, PaymentOptionKind, PeriodStatus};

/// one selectable amount a payer may choose to pay
///
/// computed fresh on every summary request, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOption {
    pub kind: PaymentOptionKind,
    pub amount: Money,
    pub description: String,
    pub due_date: NaiveDate,
}

/// the ordered option list plus the headline amounts derived with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub options: Vec<PaymentOption>,
    pub total_due: Money,
    pub current_month_amount: Money,
    pub can_pay_current_and_overdue: bool,
    pub can_pay_next_month: bool,
    pub warning_message: Option<String>,
}

/// builds the selectable payment options for a classified action
pub struct OptionBuilder<'a> {
    lease: &'a LeaseAgreement,
    config: &'a BillingConfig,
}

impl<'a> OptionBuilder<'a> {
    pub fn new(lease: &'a LeaseAgreement, config: &'a BillingConfig) -> Self {
        Self { lease, config }
    }

    pub fn build(&self, view: &LedgerView, action: PaymentAction) -> PaymentPlan {
        let current = view.current_period();
        let current_month_amount = current.outstanding();

        match action {
            PaymentAction::FirstTimePayment => self.first_time(view, current_month_amount),
            PaymentAction::CurrentMonthOverdue => self.current_and_overdue(view, current_month_amount),
            PaymentAction::PaymentLimitReached => self.limit_reached(current_month_amount),
            PaymentAction::CanPayNextMonth => self.next_month(view, current_month_amount),
            PaymentAction::RegularPayment => self.regular(view, current_month_amount),
        }
    }

    fn first_time(&self, view: &LedgerView, current_month_amount: Money) -> PaymentPlan {
        // the first settlement covers the opening cycle (prorated when the
        // lease starts mid-month) together with the deposit
        let first = &view.periods()[0];
        let amount = first.outstanding() + self.lease.deposit_amount;

        let label = first.cycle.month_label();
        let prorated = first.amount_due < self.lease.monthly_rent_amount;
        let mut description = if prorated {
            format!("First payment: prorated rent for {label}")
        } else {
            format!("First payment: rent for {label}")
        };
        if self.lease.deposit_amount.is_positive() {
            description.push_str(" plus deposit");
        }

        PaymentPlan {
            options: vec![PaymentOption {
                kind: PaymentOptionKind::Current,
                amount,
                description,
                due_date: first.cycle.due_date,
            }],
            total_due: amount,
            current_month_amount,
            can_pay_current_and_overdue: false,
            can_pay_next_month: false,
            warning_message: None,
        }
    }

    fn current_and_overdue(&self, view: &LedgerView, current_month_amount: Money) -> PaymentPlan {
        let overdue_amount = view.total_overdue_amount();
        let combined = current_month_amount + overdue_amount;
        let current = view.current_period();

        let oldest_overdue_due = view
            .overdue_periods()
            .next()
            .map(|p| p.cycle.due_date)
            .unwrap_or(current.cycle.due_date);

        let mut options = Vec::new();
        if current_month_amount.is_positive() {
            options.push(PaymentOption {
                kind: PaymentOptionKind::Current,
                amount: current_month_amount,
                description: format!("Rent for {}", current.cycle.month_label()),
                due_date: current.cycle.due_date,
            });
        }
        if overdue_amount.is_positive() {
            let count = view.overdue_count();
            let description = if count == 1 {
                "Overdue balance (1 period)".to_string()
            } else {
                format!("Overdue balance ({count} periods)")
            };
            options.push(PaymentOption {
                kind: PaymentOptionKind::Overdue,
                amount: overdue_amount,
                description,
                due_date: oldest_overdue_due,
            });
        }
        let both = current_month_amount.is_positive() && overdue_amount.is_positive();
        if both {
            options.push(PaymentOption {
                kind: PaymentOptionKind::Combined,
                amount: combined,
                description: "Current and overdue balance".to_string(),
                due_date: oldest_overdue_due,
            });
        }

        PaymentPlan {
            options,
            total_due: combined,
            current_month_amount,
            can_pay_current_and_overdue: both,
            can_pay_next_month: false,
            warning_message: None,
        }
    }

    fn limit_reached(&self, current_month_amount: Money) -> PaymentPlan {
        let limit = self.config.advance_limit_months;
        let warning = if limit == 1 {
            "Rent is already paid one month in advance; further advance payments are not accepted yet.".to_string()
        } else {
            format!("Rent is already paid {limit} months in advance; further advance payments are not accepted yet.")
        };

        PaymentPlan {
            options: Vec::new(),
            total_due: Money::ZERO,
            current_month_amount,
            can_pay_current_and_overdue: false,
            can_pay_next_month: false,
            warning_message: Some(warning),
        }
    }

    fn next_month(&self, view: &LedgerView, current_month_amount: Money) -> PaymentPlan {
        let next_open = view
            .future_periods()
            .iter()
            .find(|p| p.status != PeriodStatus::Paid);

        let (options, total_due) = match next_open {
            Some(period) => {
                // only the opening cycle is ever prorated, so an advance
                // cycle is always the full monthly rent
                let amount = period.outstanding();
                (
                    vec![PaymentOption {
                        kind: PaymentOptionKind::NextMonth,
                        amount,
                        description: format!("Advance rent for {}", period.cycle.month_label()),
                        due_date: period.cycle.due_date,
                    }],
                    amount,
                )
            }
            None => (Vec::new(), Money::ZERO),
        };

        PaymentPlan {
            options,
            total_due,
            current_month_amount,
            can_pay_current_and_overdue: false,
            can_pay_next_month: true,
            warning_message: None,
        }
    }

    fn regular(&self, view: &LedgerView, current_month_amount: Money) -> PaymentPlan {
        let current = view.current_period();
        let mut options = Vec::new();
        if current_month_amount.is_positive() {
            options.push(PaymentOption {
                kind: PaymentOptionKind::Current,
                amount: current_month_amount,
                description: format!("Rent for {}", current.cycle.month_label()),
                due_date: current.cycle.due_date,
            });
        }

        PaymentPlan {
            options,
            total_due: current_month_amount,
            current_month_amount,
            can_pay_current_and_overdue: false,
            can_pay_next_month: false,
            warning_message: None,
        }
    }
}
