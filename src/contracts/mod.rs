pub mod month_to_month;
pub mod prepaid;
pub mod term;

pub use month_to_month::MonthToMonth;
pub use prepaid::Prepaid;
pub use term::Term;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bill::{Accumulator, Bill};
use crate::call::Call;
use crate::config::ContractTerms;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::events::{BillingEvent, EventStore};
use crate::types::{BillingPeriod, ContractKind, ContractStatus};

/// how the minutes of one call were recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinuteSplit {
    pub free: u32,
    pub billed: u32,
}

impl MinuteSplit {
    pub fn billed(minutes: u32) -> Self {
        Self { free: 0, billed: minutes }
    }

    pub fn total(&self) -> u32 {
        self.free + self.billed
    }
}

/// billing rules of a contract variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractPolicy {
    MonthToMonth(MonthToMonth),
    Term(Term),
    Prepaid(Prepaid),
}

impl ContractPolicy {
    pub fn kind(&self) -> ContractKind {
        match self {
            ContractPolicy::MonthToMonth(_) => ContractKind::MonthToMonth,
            ContractPolicy::Term(_) => ContractKind::Term,
            ContractPolicy::Prepaid(_) => ContractKind::Prepaid,
        }
    }
}

/// a month that was closed when the next one was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedMonth {
    pub period: BillingPeriod,
    pub bill: Bill,
}

#[derive(Debug, Clone)]
struct OpenMonth {
    period: BillingPeriod,
    bill: Bill,
}

/// contract for a phone line
#[derive(Debug, Clone)]
pub struct Contract {
    /// cleared on cancellation
    start: Option<BillingPeriod>,
    first_month: BillingPeriod,
    policy: ContractPolicy,
    terms: ContractTerms,
    open: Option<OpenMonth>,
    events: EventStore,
}

impl Contract {
    fn new(start: NaiveDate, policy: ContractPolicy) -> Self {
        let first_month = BillingPeriod::from_date(start);
        Self {
            start: Some(first_month),
            first_month,
            policy,
            terms: ContractTerms::default(),
            open: None,
            events: EventStore::new(),
        }
    }

    /// month-to-month contract starting on `start`
    pub fn month_to_month(start: NaiveDate) -> Self {
        Self::new(start, ContractPolicy::MonthToMonth(MonthToMonth::new()))
    }

    /// term contract running from `start` to `end`
    pub fn term(start: NaiveDate, end: NaiveDate) -> Self {
        let policy = Term::new(BillingPeriod::from_date(start), BillingPeriod::from_date(end));
        Self::new(start, ContractPolicy::Term(policy))
    }

    /// prepaid contract with `initial_credit` already paid in
    pub fn prepaid(start: NaiveDate, initial_credit: Money) -> Result<Self> {
        if initial_credit.is_negative() {
            return Err(BillingError::InvalidAmount { amount: initial_credit });
        }
        Ok(Self::new(start, ContractPolicy::Prepaid(Prepaid::new(initial_credit))))
    }

    /// replace the default tariff
    pub fn with_terms(mut self, terms: ContractTerms) -> Self {
        self.terms = terms;
        self
    }

    pub fn kind(&self) -> ContractKind {
        self.policy.kind()
    }

    pub fn policy(&self) -> &ContractPolicy {
        &self.policy
    }

    pub fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// start month, `None` once cancelled
    pub fn start(&self) -> Option<BillingPeriod> {
        self.start
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn status(&self) -> ContractStatus {
        if self.is_active() {
            ContractStatus::Active { month_open: self.open.is_some() }
        } else {
            ContractStatus::Cancelled
        }
    }

    pub fn open_period(&self) -> Option<BillingPeriod> {
        self.open.as_ref().map(|m| m.period)
    }

    /// bill of the open month; kept after cancellation
    pub fn bill(&self) -> Option<&Bill> {
        self.open.as_ref().map(|m| &m.bill)
    }

    pub fn events(&self) -> &[BillingEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<BillingEvent> {
        self.events.take_events()
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            tracing::warn!(kind = %self.kind(), "operation on cancelled contract");
            Err(BillingError::ContractCancelled { kind: self.kind() })
        }
    }

    /// checks that `new_month(period, ..)` would succeed, without changing anything
    pub fn can_open(&self, period: BillingPeriod) -> Result<()> {
        self.ensure_active()?;
        match &self.policy {
            ContractPolicy::Term(term) => term.check_period(period),
            ContractPolicy::MonthToMonth(_) | ContractPolicy::Prepaid(_) => Ok(()),
        }
    }

    /// open `period`, binding `bill` for it and charging this month's fixed costs
    ///
    /// Returns the previously open month, which `bill` supersedes.
    pub fn new_month(&mut self, period: BillingPeriod, mut bill: Bill) -> Result<Option<ClosedMonth>> {
        self.can_open(period)?;

        let kind = self.kind();
        let mut top_up = None;
        match &mut self.policy {
            ContractPolicy::MonthToMonth(policy) => policy.open_month(period, &mut bill, &self.terms),
            ContractPolicy::Term(policy) => {
                policy.open_month(self.first_month, period, &mut bill, &self.terms)
            }
            ContractPolicy::Prepaid(policy) => {
                top_up = policy
                    .open_month(period, &mut bill, &self.terms)
                    .map(|amount| (amount, policy.balance()));
            }
        }

        if let Some((amount, new_balance)) = top_up {
            self.events.emit(BillingEvent::TopUpApplied { period, amount, new_balance });
        }

        let fixed_cost = bill.fixed_cost();
        tracing::debug!(kind = %kind, period = %period, fixed_cost = %fixed_cost, "opened billing month");
        self.events.emit(BillingEvent::MonthOpened { kind, period, fixed_cost });

        let closed = self
            .open
            .replace(OpenMonth { period, bill })
            .map(|previous| ClosedMonth { period: previous.period, bill: previous.bill });

        if let Some(closed) = &closed {
            self.events.emit(BillingEvent::MonthSuperseded {
                kind,
                period: closed.period,
                total_cost: closed.bill.total_cost(),
            });
        }

        Ok(closed)
    }

    /// record `call` on the open month's bill
    pub fn bill_call(&mut self, call: &Call) -> Result<MinuteSplit> {
        self.ensure_active()?;
        let open = self.open.as_mut().ok_or(BillingError::NoOpenMonth)?;
        if call.period() != open.period {
            return Err(BillingError::PeriodMismatch {
                open: open.period,
                call: call.period(),
            });
        }

        let minutes = call.billable_minutes();
        let split = match &mut self.policy {
            ContractPolicy::MonthToMonth(policy) => policy.bill_minutes(minutes, &mut open.bill),
            ContractPolicy::Term(policy) => policy.bill_minutes(minutes, &mut open.bill, &self.terms),
            ContractPolicy::Prepaid(policy) => {
                policy.bill_minutes(minutes, &mut open.bill, &self.terms)
            }
        };

        let kind = self.policy.kind();
        tracing::debug!(
            kind = %kind,
            duration = call.duration(),
            free = split.free,
            billed = split.billed,
            "billed call"
        );
        self.events.emit(BillingEvent::CallBilled {
            kind,
            period: open.period,
            duration_seconds: call.duration(),
            free_minutes: split.free,
            billed_minutes: split.billed,
        });

        Ok(split)
    }

    /// amount owed to close the line; the contract is terminal afterwards
    pub fn cancel_contract(&mut self) -> Result<Money> {
        self.ensure_active()?;
        let open = self.open.as_ref().ok_or(BillingError::NoOpenMonth)?;

        let settlement = match &self.policy {
            ContractPolicy::MonthToMonth(policy) => policy.settle(&open.bill),
            ContractPolicy::Term(policy) => policy.settle(&open.bill, &self.terms),
            ContractPolicy::Prepaid(policy) => policy.settle(&open.bill),
        };
        let period = open.period;
        let kind = self.kind();

        self.start = None;

        tracing::info!(kind = %kind, period = %period, settlement = %settlement, "contract cancelled");
        self.events.emit(BillingEvent::ContractCancelled { kind, period, settlement });

        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::fixtures::call_in;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn period(month: u32, year: i32) -> BillingPeriod {
        BillingPeriod::new(month, year).unwrap()
    }

    fn term_contract() -> Contract {
        Contract::term(date(2017, 12, 25), date(2019, 6, 25))
    }

    #[test]
    fn test_bill_call_requires_open_month() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        let result = contract.bill_call(&call_in("a", "b", 60, 2018, 1));
        assert_eq!(result, Err(BillingError::NoOpenMonth));
        assert_eq!(contract.status(), ContractStatus::Active { month_open: false });
    }

    #[test]
    fn test_bill_call_rejects_other_period() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        contract.new_month(period(1, 2018), Bill::new()).unwrap();

        let result = contract.bill_call(&call_in("a", "b", 60, 2018, 2));
        assert_eq!(
            result,
            Err(BillingError::PeriodMismatch { open: period(1, 2018), call: period(2, 2018) })
        );
        assert_eq!(contract.bill().unwrap().billed_minutes(), 0);
    }

    #[test]
    fn test_month_to_month_bills_every_minute() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        contract.new_month(period(1, 2018), Bill::new()).unwrap();

        contract.bill_call(&call_in("a", "b", 61, 2018, 1)).unwrap();
        contract.bill_call(&call_in("a", "b", 30, 2018, 1)).unwrap();

        let bill = contract.bill().unwrap();
        assert_eq!(bill.billed_minutes(), 3);
        assert_eq!(bill.total_cost(), Money::from_decimal(dec!(50.15)));
        assert_eq!(contract.cancel_contract().unwrap(), Money::from_decimal(dec!(50.15)));
    }

    #[test]
    fn test_new_month_supersedes_previous_bill() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        assert!(contract.new_month(period(12, 2017), Bill::new()).unwrap().is_none());
        contract.bill_call(&call_in("a", "b", 600, 2017, 12)).unwrap();

        let closed = contract.new_month(period(1, 2018), Bill::new()).unwrap().unwrap();
        assert_eq!(closed.period, period(12, 2017));
        assert_eq!(closed.bill.billed_minutes(), 10);
        assert_eq!(contract.bill().unwrap().billed_minutes(), 0);
        assert_eq!(contract.open_period(), Some(period(1, 2018)));
    }

    #[test]
    fn test_term_hundred_minutes_free_then_billed() {
        let mut contract = term_contract();
        contract.new_month(period(1, 2018), Bill::new()).unwrap();

        contract.bill_call(&call_in("a", "b", 3000, 2018, 1)).unwrap();
        contract.bill_call(&call_in("a", "b", 3000, 2018, 1)).unwrap();
        assert_eq!(contract.bill().unwrap().billed_minutes(), 0);

        let split = contract.bill_call(&call_in("a", "b", 45, 2018, 1)).unwrap();
        assert_eq!(split, MinuteSplit { free: 0, billed: 1 });
        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_decimal(dec!(20.1)));
    }

    #[test]
    fn test_term_cancel_within_term_forfeits_deposit() {
        let mut contract = term_contract();
        contract.new_month(period(12, 2017), Bill::new()).unwrap();

        assert_eq!(contract.cancel_contract().unwrap(), Money::from_major(320));
        assert_eq!(contract.status(), ContractStatus::Cancelled);
        assert_eq!(contract.start(), None);
    }

    #[test]
    fn test_term_cancel_after_end_refunds_deposit() {
        let mut contract = term_contract();
        contract.new_month(period(7, 2019), Bill::new()).unwrap();

        assert_eq!(contract.cancel_contract().unwrap(), Money::from_major(-280));
    }

    #[test]
    fn test_term_month_cursor_cannot_regress() {
        let mut contract = term_contract();
        contract.new_month(period(2, 2018), Bill::new()).unwrap();

        let result = contract.new_month(period(1, 2018), Bill::new());
        assert!(matches!(result, Err(BillingError::PeriodRegression { .. })));
        assert_eq!(contract.open_period(), Some(period(2, 2018)));
    }

    #[test]
    fn test_can_open_leaves_contract_untouched() {
        let mut contract = term_contract();
        contract.new_month(period(2, 2018), Bill::new()).unwrap();

        assert!(contract.can_open(period(2, 2018)).is_ok());
        assert!(contract.can_open(period(3, 2018)).is_ok());
        assert!(matches!(
            contract.can_open(period(1, 2018)),
            Err(BillingError::PeriodRegression { .. })
        ));
        assert_eq!(contract.open_period(), Some(period(2, 2018)));

        let mut mtm = Contract::month_to_month(date(2017, 12, 25));
        assert!(mtm.can_open(period(1, 2018)).is_ok());
        mtm.new_month(period(1, 2018), Bill::new()).unwrap();
        mtm.cancel_contract().unwrap();
        assert_eq!(
            mtm.can_open(period(2, 2018)),
            Err(BillingError::ContractCancelled { kind: ContractKind::MonthToMonth })
        );
    }

    #[test]
    fn test_prepaid_reopen_discards_replaced_bill_calls() {
        let mut contract = Contract::prepaid(date(2017, 12, 25), Money::from_major(100)).unwrap();
        contract.new_month(period(1, 2018), Bill::new()).unwrap();
        contract.bill_call(&call_in("a", "b", 2400, 2018, 1)).unwrap();
        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_major(-99));

        let closed = contract.new_month(period(1, 2018), Bill::new()).unwrap().unwrap();
        assert_eq!(closed.bill.total_cost(), Money::from_major(-99));
        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_major(-100));
    }

    #[test]
    fn test_prepaid_cancel_in_credit_owes_nothing() {
        let mut contract = Contract::prepaid(date(2017, 12, 25), Money::from_major(100)).unwrap();
        contract.new_month(period(12, 2017), Bill::new()).unwrap();
        contract.bill_call(&call_in("a", "b", 600, 2017, 12)).unwrap();

        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_decimal(dec!(-99.75)));
        assert_eq!(contract.cancel_contract().unwrap(), Money::ZERO);
    }

    #[test]
    fn test_prepaid_rejects_negative_credit() {
        let result = Contract::prepaid(date(2017, 12, 25), Money::from_major(-5));
        assert!(matches!(result, Err(BillingError::InvalidAmount { .. })));
    }

    #[test]
    fn test_cancelled_contract_is_terminal() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        contract.new_month(period(12, 2017), Bill::new()).unwrap();
        contract.cancel_contract().unwrap();

        let cancelled = BillingError::ContractCancelled { kind: ContractKind::MonthToMonth };
        assert_eq!(contract.cancel_contract(), Err(cancelled.clone()));
        assert_eq!(contract.bill_call(&call_in("a", "b", 60, 2017, 12)), Err(cancelled.clone()));
        assert_eq!(contract.new_month(period(1, 2018), Bill::new()), Err(cancelled));
        // the final bill stays readable
        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_major(50));
    }

    #[test]
    fn test_cancel_requires_open_month() {
        let mut contract = Contract::month_to_month(date(2017, 12, 25));
        assert_eq!(contract.cancel_contract(), Err(BillingError::NoOpenMonth));
        assert!(contract.is_active());
    }

    #[test]
    fn test_custom_terms() {
        let terms = ContractTerms {
            mtm_monthly_fee: Money::from_major(40),
            ..ContractTerms::default()
        };
        let mut contract = Contract::month_to_month(date(2017, 12, 25)).with_terms(terms);
        contract.new_month(period(12, 2017), Bill::new()).unwrap();
        assert_eq!(contract.bill().unwrap().total_cost(), Money::from_major(40));
    }

    #[test]
    fn test_events_emitted() {
        let mut contract = Contract::prepaid(date(2017, 12, 25), Money::from_major(5)).unwrap();
        contract.new_month(period(12, 2017), Bill::new()).unwrap();
        contract.bill_call(&call_in("a", "b", 120, 2017, 12)).unwrap();
        contract.cancel_contract().unwrap();

        let events = contract.take_events();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            BillingEvent::TopUpApplied { amount, .. } if amount == Money::from_major(25)
        ));
        assert!(matches!(events[1], BillingEvent::MonthOpened { kind: ContractKind::Prepaid, .. }));
        assert!(matches!(events[2], BillingEvent::CallBilled { billed_minutes: 2, .. }));
        assert!(matches!(
            events[3],
            BillingEvent::ContractCancelled { settlement, .. } if settlement == Money::ZERO
        ));
        assert!(contract.events().is_empty());
    }
}
