use serde::{Deserialize, Serialize};

use crate::bill::Accumulator;
use crate::config::ContractTerms;
use crate::decimal::Money;
use crate::types::{BillingPeriod, ContractKind};

use super::MinuteSplit;

/// flat monthly fee, every minute billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthToMonth;

impl MonthToMonth {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn open_month(
        &mut self,
        _period: BillingPeriod,
        bill: &mut impl Accumulator,
        terms: &ContractTerms,
    ) {
        bill.set_rate(ContractKind::MonthToMonth.label(), terms.mtm_minute_rate);
        bill.add_fixed_cost(terms.mtm_monthly_fee);
    }

    pub(crate) fn bill_minutes(&mut self, minutes: u32, bill: &mut impl Accumulator) -> MinuteSplit {
        bill.add_billed_minutes(minutes);
        MinuteSplit::billed(minutes)
    }

    /// outstanding cost, no adjustment
    pub(crate) fn settle(&self, bill: &impl Accumulator) -> Money {
        bill.total_cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::Bill;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_fee_and_rate() {
        let terms = ContractTerms::default();
        let mut policy = MonthToMonth::new();
        let mut bill = Bill::new();

        policy.open_month(BillingPeriod::new(1, 2018).unwrap(), &mut bill, &terms);
        assert_eq!(bill.label(), Some("MTM"));
        assert_eq!(bill.total_cost(), Money::from_major(50));

        let split = policy.bill_minutes(20, &mut bill);
        assert_eq!(split, MinuteSplit { free: 0, billed: 20 });
        assert_eq!(policy.settle(&bill), Money::from_decimal(dec!(51)));
    }
}
