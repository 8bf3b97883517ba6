use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{BillingPeriod, ContractKind};

/// all events that can be emitted by a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BillingEvent {
    MonthOpened {
        kind: ContractKind,
        period: BillingPeriod,
        fixed_cost: Money,
    },
    /// a previously open month was closed by the next `new_month`
    MonthSuperseded {
        kind: ContractKind,
        period: BillingPeriod,
        total_cost: Money,
    },
    CallBilled {
        kind: ContractKind,
        period: BillingPeriod,
        duration_seconds: u32,
        free_minutes: u32,
        billed_minutes: u32,
    },
    TopUpApplied {
        period: BillingPeriod,
        amount: Money,
        new_balance: Money,
    },
    ContractCancelled {
        kind: ContractKind,
        period: BillingPeriod,
        settlement: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<BillingEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: BillingEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<BillingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[BillingEvent] {
        &self.events
    }
}
