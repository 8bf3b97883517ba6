use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{BillingError, Result};

/// unique identifier for a customer
pub type CustomerId = u32;

/// a billing month; orders by year, then month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// create from month (1-12) and year
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(BillingError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// the month containing a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// the month containing a timestamp
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self::from_date(time.date())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// contract variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    MonthToMonth,
    Term,
    Prepaid,
}

impl ContractKind {
    /// rate label written onto bills
    pub fn label(&self) -> &'static str {
        match self {
            ContractKind::MonthToMonth => "MTM",
            ContractKind::Term => "TERM",
            ContractKind::Prepaid => "PREPAID",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// contract lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    /// activated, possibly with a billing month open
    Active { month_open: bool },
    /// terminal
    Cancelled,
}

/// longitude / latitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}
