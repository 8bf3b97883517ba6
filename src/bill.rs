use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// per-month cost accumulator consumed by contracts
pub trait Accumulator {
    fn add_fixed_cost(&mut self, amount: Money);

    fn add_billed_minutes(&mut self, minutes: u32);

    fn add_free_minutes(&mut self, minutes: u32);

    fn set_rate(&mut self, label: &str, per_minute: Money);

    /// fixed costs plus billed minutes at the current rate, rounded to cents
    fn total_cost(&self) -> Money;

    /// free minutes recorded so far this month
    fn free_minutes(&self) -> u32;
}

/// a phone line's bill for one month
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bill {
    label: Option<String>,
    minute_rate: Money,
    fixed_cost: Money,
    free_minutes: u32,
    billed_minutes: u32,
}

impl Bill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn minute_rate(&self) -> Money {
        self.minute_rate
    }

    pub fn fixed_cost(&self) -> Money {
        self.fixed_cost
    }

    pub fn billed_minutes(&self) -> u32 {
        self.billed_minutes
    }

    /// snapshot for reporting
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            contract: self.label.clone().unwrap_or_default(),
            minute_rate: self.minute_rate,
            fixed_cost: self.fixed_cost,
            free_minutes: self.free_minutes,
            billed_minutes: self.billed_minutes,
            total: self.total_cost(),
        }
    }
}

impl Accumulator for Bill {
    fn add_fixed_cost(&mut self, amount: Money) {
        self.fixed_cost += amount;
    }

    fn add_billed_minutes(&mut self, minutes: u32) {
        self.billed_minutes += minutes;
    }

    fn add_free_minutes(&mut self, minutes: u32) {
        self.free_minutes += minutes;
    }

    fn set_rate(&mut self, label: &str, per_minute: Money) {
        self.label = Some(label.to_string());
        self.minute_rate = per_minute;
    }

    fn total_cost(&self) -> Money {
        (self.minute_rate.per_minute(self.billed_minutes) + self.fixed_cost).to_cents()
    }

    fn free_minutes(&self) -> u32 {
        self.free_minutes
    }
}

/// serializable view of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub contract: String,
    pub minute_rate: Money,
    pub fixed_cost: Money,
    pub free_minutes: u32,
    pub billed_minutes: u32,
    pub total: Money,
}
