use thiserror::Error;

use crate::decimal::Money;
use crate::types::{BillingPeriod, ContractKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("no billing month is open for this contract")]
    NoOpenMonth,

    #[error("call made in {call} but the open billing month is {open}")]
    PeriodMismatch {
        open: BillingPeriod,
        call: BillingPeriod,
    },

    #[error("{kind} contract has been cancelled")]
    ContractCancelled {
        kind: ContractKind,
    },

    #[error("month cursor cannot move backwards: current {current}, requested {requested}")]
    PeriodRegression {
        current: BillingPeriod,
        requested: BillingPeriod,
    },

    #[error("invalid month: {month}")]
    InvalidMonth {
        month: u32,
    },

    #[error("phone line not found: {number}")]
    UnknownPhoneLine {
        number: String,
    },

    #[error("duplicate phone line: {number}")]
    DuplicatePhoneLine {
        number: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
