use serde::{Deserialize, Serialize};

use crate::bill::Accumulator;
use crate::config::ContractTerms;
use crate::decimal::Money;
use crate::types::{BillingPeriod, ContractKind};

use super::MinuteSplit;

/// balance-funded contract
///
/// `balance` is the amount owed: positive means the customer owes money,
/// negative means the customer is in credit. A top-up of `t` lowers it by `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prepaid {
    balance: Money,
    last_top_up: Option<BillingPeriod>,
    /// balance right after the latest month was opened, restored when that month is reopened
    opened_balance: Option<(BillingPeriod, Money)>,
}

impl Prepaid {
    /// start with `initial_credit` already paid in
    pub fn new(initial_credit: Money) -> Self {
        Self {
            balance: -initial_credit,
            last_top_up: None,
            opened_balance: None,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// remaining credit, zero when the customer owes money
    pub fn credit(&self) -> Money {
        (-self.balance).max(Money::ZERO)
    }

    /// charges the carried balance, then tops up once per month when credit runs low
    pub(crate) fn open_month(
        &mut self,
        period: BillingPeriod,
        bill: &mut impl Accumulator,
        terms: &ContractTerms,
    ) -> Option<Money> {
        // calls billed on a replaced bill of the same month are discarded with it
        if let Some((opened, balance)) = self.opened_balance {
            if opened == period {
                self.balance = balance;
            }
        }

        bill.set_rate(ContractKind::Prepaid.label(), terms.prepaid_minute_rate);

        let mut top_up = None;
        if self.balance > terms.prepaid_low_balance && self.last_top_up != Some(period) {
            self.balance -= terms.prepaid_top_up;
            self.last_top_up = Some(period);
            top_up = Some(terms.prepaid_top_up);
        }

        bill.add_fixed_cost(self.balance);
        self.opened_balance = Some((period, self.balance));
        top_up
    }

    pub(crate) fn bill_minutes(
        &mut self,
        minutes: u32,
        bill: &mut impl Accumulator,
        terms: &ContractTerms,
    ) -> MinuteSplit {
        bill.add_billed_minutes(minutes);
        self.balance += terms.prepaid_minute_rate.per_minute(minutes);
        MinuteSplit::billed(minutes)
    }

    /// owed balance is paid, remaining credit is forfeited
    pub(crate) fn settle(&self, bill: &impl Accumulator) -> Money {
        if self.balance.is_positive() {
            bill.total_cost()
        } else {
            Money::ZERO
        }
    }
}
