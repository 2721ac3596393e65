use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{BillingError, Result};

/// one billing cycle: a calendar month of liability with its due date
///
/// cycle 0 starts on the lease start date and runs to the end of that month;
/// every later cycle spans the whole calendar month. the due day within each
/// month is the lease anniversary day, clamped to shorter months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCycle {
    pub offset: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
}

impl BillingCycle {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// month label used in option and receipt descriptions, e.g. "March 2024"
    pub fn month_label(&self) -> String {
        self.period_start.format("%B %Y").to_string()
    }
}

/// first-cycle proration: occupied days over days in the start month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proration {
    pub days: u32,
    pub days_in_month: u32,
    pub fraction: Rate,
}

impl Proration {
    /// proration only applies when the lease does not start on the 1st
    pub fn applies(&self) -> bool {
        self.days < self.days_in_month
    }

    pub fn prorated_amount(&self, monthly_rent: Money) -> Money {
        monthly_rent * self.fraction.as_decimal()
    }
}

/// pure cycle arithmetic anchored on a lease start date, no I/O
#[derive(Debug, Clone, Copy)]
pub struct CycleCalculator {
    lease_start: NaiveDate,
}

impl CycleCalculator {
    pub fn new(lease_start: NaiveDate) -> Self {
        Self { lease_start }
    }

    /// cycle boundaries and due date for the given month offset
    pub fn cycle_for(&self, offset: u32) -> Result<BillingCycle> {
        let (year, month) = self.month_at(offset)?;
        let month_days = days_in_month(year, month);

        let period_start = if offset == 0 {
            self.lease_start
        } else {
            ymd(year, month, 1)?
        };
        let period_end = ymd(year, month, month_days)?;
        let due_day = self.lease_start.day().min(month_days);
        let due_date = ymd(year, month, due_day)?;

        Ok(BillingCycle {
            offset,
            period_start,
            period_end,
            due_date,
        })
    }

    /// zero-based offset of the cycle containing `date`
    pub fn offset_containing(&self, date: NaiveDate) -> Result<u32> {
        if date < self.lease_start {
            return Err(BillingError::InvalidLeaseState {
                message: format!(
                    "cannot evaluate at {} before the lease starts {}",
                    date, self.lease_start
                ),
            });
        }
        let months = (date.year() as i64 * 12 + date.month() as i64)
            - (self.lease_start.year() as i64 * 12 + self.lease_start.month() as i64);
        Ok(months as u32)
    }

    pub fn cycle_containing(&self, date: NaiveDate) -> Result<BillingCycle> {
        self.cycle_for(self.offset_containing(date)?)
    }

    /// first-cycle proration fraction for this lease
    pub fn proration(&self) -> Proration {
        let month_days = days_in_month(self.lease_start.year(), self.lease_start.month());
        let days = month_days - self.lease_start.day() + 1;
        Proration {
            days,
            days_in_month: month_days,
            fraction: Rate::from_fraction(days, month_days),
        }
    }

    fn month_at(&self, offset: u32) -> Result<(i32, u32)> {
        let total = self.lease_start.year() as i64 * 12
            + (self.lease_start.month() as i64 - 1)
            + offset as i64;
        let year = i32::try_from(total.div_euclid(12)).map_err(|_| BillingError::InvalidDate {
            message: format!("month offset {offset} leaves the supported calendar"),
        })?;
        let month = (total.rem_euclid(12) + 1) as u32;
        Ok((year, month))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| BillingError::InvalidDate {
        message: format!("{year:04}-{month:02}-{day:02} is not a valid date"),
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_cycle_starts_mid_month() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        let cycle = calc.cycle_for(0).unwrap();
        assert_eq!(cycle.period_start, date(2024, 3, 15));
        assert_eq!(cycle.period_end, date(2024, 3, 31));
        assert_eq!(cycle.due_date, date(2024, 3, 15));
    }

    #[test]
    fn test_later_cycles_span_whole_months() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        let cycle = calc.cycle_for(1).unwrap();
        assert_eq!(cycle.period_start, date(2024, 4, 1));
        assert_eq!(cycle.period_end, date(2024, 4, 30));
        assert_eq!(cycle.due_date, date(2024, 4, 15));
    }

    #[test]
    fn test_due_day_clamps_to_short_months() {
        let calc = CycleCalculator::new(date(2024, 1, 31));
        // february 2024 is a leap month
        let feb = calc.cycle_for(1).unwrap();
        assert_eq!(feb.due_date, date(2024, 2, 29));
        let feb_2025 = calc.cycle_for(13).unwrap();
        assert_eq!(feb_2025.due_date, date(2025, 2, 28));
        let apr = calc.cycle_for(3).unwrap();
        assert_eq!(apr.due_date, date(2024, 4, 30));
    }

    #[test]
    fn test_cycles_are_contiguous_across_year_end() {
        let calc = CycleCalculator::new(date(2024, 11, 10));
        let nov = calc.cycle_for(0).unwrap();
        let dec = calc.cycle_for(1).unwrap();
        let jan = calc.cycle_for(2).unwrap();
        assert_eq!(nov.period_end.succ_opt().unwrap(), dec.period_start);
        assert_eq!(dec.period_end.succ_opt().unwrap(), jan.period_start);
        assert_eq!(jan.period_start, date(2025, 1, 1));
    }

    #[test]
    fn test_offset_containing() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        assert_eq!(calc.offset_containing(date(2024, 3, 15)).unwrap(), 0);
        assert_eq!(calc.offset_containing(date(2024, 3, 31)).unwrap(), 0);
        assert_eq!(calc.offset_containing(date(2024, 4, 1)).unwrap(), 1);
        assert_eq!(calc.offset_containing(date(2025, 2, 10)).unwrap(), 11);
    }

    #[test]
    fn test_evaluation_before_start_is_an_error() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        assert!(calc.offset_containing(date(2024, 3, 14)).is_err());
    }

    #[test]
    fn test_cycle_containing_matches_contains() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        let cycle = calc.cycle_containing(date(2024, 5, 20)).unwrap();
        assert!(cycle.contains(date(2024, 5, 20)));
        assert_eq!(cycle.offset, 2);
    }

    #[test]
    fn test_proration_mid_month() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        let p = calc.proration();
        assert_eq!(p.days, 17);
        assert_eq!(p.days_in_month, 31);
        assert!(p.applies());
        assert_eq!(
            p.prorated_amount(Money::from_major(900)),
            Money::from_str_exact("493.55").unwrap()
        );
    }

    #[test]
    fn test_no_proration_on_the_first() {
        let calc = CycleCalculator::new(date(2024, 4, 1));
        let p = calc.proration();
        assert_eq!(p.days, 30);
        assert!(!p.applies());
        assert_eq!(p.fraction, Rate::ONE);
        assert_eq!(
            p.prorated_amount(Money::from_major(900)),
            Money::from_major(900)
        );
    }

    #[test]
    fn test_proration_february() {
        let calc = CycleCalculator::new(date(2023, 2, 28));
        let p = calc.proration();
        assert_eq!(p.days, 1);
        assert_eq!(p.days_in_month, 28);
    }

    #[test]
    fn test_month_label() {
        let calc = CycleCalculator::new(date(2024, 3, 15));
        assert_eq!(calc.cycle_for(0).unwrap().month_label(), "March 2024");
        assert_eq!(calc.cycle_for(10).unwrap().month_label(), "January 2025");
    }
}
