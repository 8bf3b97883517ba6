use serde::{Deserialize, Serialize};

use crate::bill::Accumulator;
use crate::config::ContractTerms;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{BillingPeriod, ContractKind};

use super::MinuteSplit;

/// fixed-term contract with a deposit and a monthly pool of free minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    end: BillingPeriod,
    current: BillingPeriod,
    /// free minutes used in `current`; reset on every month opening
    free_minutes_used: u32,
}

impl Term {
    pub fn new(start: BillingPeriod, end: BillingPeriod) -> Self {
        Self {
            end,
            current: start,
            free_minutes_used: 0,
        }
    }

    pub fn end(&self) -> BillingPeriod {
        self.end
    }

    pub fn current(&self) -> BillingPeriod {
        self.current
    }

    pub fn free_minutes_used(&self) -> u32 {
        self.free_minutes_used
    }

    /// the cursor must not move backwards
    pub(crate) fn check_period(&self, period: BillingPeriod) -> Result<()> {
        if period < self.current {
            return Err(BillingError::PeriodRegression {
                current: self.current,
                requested: period,
            });
        }
        Ok(())
    }

    pub(crate) fn open_month(
        &mut self,
        start: BillingPeriod,
        period: BillingPeriod,
        bill: &mut impl Accumulator,
        terms: &ContractTerms,
    ) {
        bill.set_rate(ContractKind::Term.label(), terms.term_minute_rate);

        if period == start {
            bill.add_fixed_cost(terms.term_deposit);
        }
        bill.add_fixed_cost(terms.term_monthly_fee);

        self.free_minutes_used = 0;
        self.current = period;
    }

    /// the part of a call that fits in the remaining pool is free, the rest is billed
    pub(crate) fn bill_minutes(
        &mut self,
        minutes: u32,
        bill: &mut impl Accumulator,
        terms: &ContractTerms,
    ) -> MinuteSplit {
        let remaining = terms
            .term_included_minutes
            .saturating_sub(self.free_minutes_used);
        let free = minutes.min(remaining);
        let billed = minutes - free;

        self.free_minutes_used += free;
        bill.add_free_minutes(free);
        bill.add_billed_minutes(billed);

        MinuteSplit { free, billed }
    }

    /// deposit is forfeited up to and including the end month, refunded after it
    pub(crate) fn settle(&self, bill: &impl Accumulator, terms: &ContractTerms) -> Money {
        if self.current <= self.end {
            bill.total_cost()
        } else {
            bill.total_cost() - terms.term_deposit
        }
    }
}
