use crate::ledger::LedgerView;
use crate::types::{PaymentAction, PeriodStatus};

/// map an aggregated ledger view to the single payment action
///
/// a fixed-precedence decision table, first match wins. there is no stored
/// state: the action is recomputed from the ledger on every evaluation, so
/// repeated calls with the same view are free of side effects and agree.
pub fn classify(view: &LedgerView) -> PaymentAction {
    if view.is_first_payment() {
        return PaymentAction::FirstTimePayment;
    }

    let current = view.current_period();
    let current_paid = current.status == PeriodStatus::Paid;
    let has_overdue = view.overdue_count() > 0;

    if has_overdue && !current_paid {
        return PaymentAction::CurrentMonthOverdue;
    }

    // arrears block advance payment outright, so a fully pre-paid lookahead
    // only counts as the limit when nothing is owed behind it
    if current_paid && !has_overdue && view.all_future_paid() {
        return PaymentAction::PaymentLimitReached;
    }

    if current_paid && !has_overdue {
        return PaymentAction::CanPayNextMonth;
    }

    PaymentAction::RegularPayment
}
