use std::collections::BTreeMap;

use crate::bill::Bill;
use crate::call::Call;
use crate::contracts::{Contract, MinuteSplit};
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::serialization::{CustomerStatement, LineStatement};
use crate::types::{BillingPeriod, CustomerId};

/// a phone number with its contract, bills and call history
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: String,
    contract: Contract,
    closed_bills: BTreeMap<BillingPeriod, Bill>,
    outgoing: Vec<Call>,
    incoming: Vec<Call>,
}

impl PhoneLine {
    pub fn new(number: impl Into<String>, contract: Contract) -> Self {
        Self {
            number: number.into(),
            contract,
            closed_bills: BTreeMap::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn contract_mut(&mut self) -> &mut Contract {
        &mut self.contract
    }

    /// open a fresh bill for `period`; cancelled lines are skipped
    pub fn new_month(&mut self, period: BillingPeriod) -> Result<()> {
        if !self.contract.is_active() {
            tracing::debug!(number = %self.number, period = %period, "skipping cancelled line");
            return Ok(());
        }

        if let Some(closed) = self.contract.new_month(period, Bill::new())? {
            if closed.period != period {
                self.closed_bills.insert(closed.period, closed.bill);
            }
        }
        Ok(())
    }

    /// bill and record an outgoing call
    pub fn make_call(&mut self, call: Call) -> Result<MinuteSplit> {
        let split = self.contract.bill_call(&call)?;
        self.outgoing.push(call);
        Ok(split)
    }

    /// record an incoming call, incoming calls are not billed
    pub fn receive_call(&mut self, call: Call) {
        self.incoming.push(call);
    }

    pub fn outgoing_calls(&self) -> &[Call] {
        &self.outgoing
    }

    pub fn incoming_calls(&self) -> &[Call] {
        &self.incoming
    }

    /// open or archived bill for `period`
    pub fn bill_for(&self, period: BillingPeriod) -> Option<&Bill> {
        if self.contract.open_period() == Some(period) {
            self.contract.bill()
        } else {
            self.closed_bills.get(&period)
        }
    }

    /// settle and terminate the contract
    pub fn cancel(&mut self) -> Result<Money> {
        self.contract.cancel_contract()
    }
}

/// a customer and their phone lines
#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    lines: Vec<PhoneLine>,
}

impl Customer {
    pub fn new(id: CustomerId) -> Self {
        Self { id, lines: Vec::new() }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn lines(&self) -> &[PhoneLine] {
        &self.lines
    }

    pub fn add_phone_line(&mut self, line: PhoneLine) -> Result<()> {
        if self.owns(line.number()) {
            return Err(BillingError::DuplicatePhoneLine {
                number: line.number().to_string(),
            });
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn phone_numbers(&self) -> Vec<&str> {
        self.lines.iter().map(PhoneLine::number).collect()
    }

    pub fn owns(&self, number: &str) -> bool {
        self.lines.iter().any(|line| line.number() == number)
    }

    fn line_mut(&mut self, number: &str) -> Result<&mut PhoneLine> {
        self.lines
            .iter_mut()
            .find(|line| line.number() == number)
            .ok_or_else(|| BillingError::UnknownPhoneLine {
                number: number.to_string(),
            })
    }

    /// open `period` on every active line; if any line refuses, no line changes
    pub fn new_month(&mut self, month: u32, year: i32) -> Result<()> {
        let period = BillingPeriod::new(month, year)?;
        for line in self.lines.iter().filter(|line| line.contract().is_active()) {
            line.contract().can_open(period)?;
        }
        for line in &mut self.lines {
            line.new_month(period)?;
        }
        Ok(())
    }

    /// bill an outgoing call on the line it was made from
    pub fn make_call(&mut self, call: Call) -> Result<MinuteSplit> {
        let number = call.src_number().to_string();
        self.line_mut(&number)?.make_call(call)
    }

    /// record an incoming call on the line it was made to
    pub fn receive_call(&mut self, call: Call) -> Result<()> {
        let number = call.dst_number().to_string();
        self.line_mut(&number)?.receive_call(call);
        Ok(())
    }

    /// (outgoing, incoming) calls across all lines, in line order
    pub fn history(&self) -> (Vec<Call>, Vec<Call>) {
        let outgoing = self
            .lines
            .iter()
            .flat_map(|line| line.outgoing_calls().iter().cloned())
            .collect();
        let incoming = self
            .lines
            .iter()
            .flat_map(|line| line.incoming_calls().iter().cloned())
            .collect();
        (outgoing, incoming)
    }

    /// statement for every line with a bill in the given month
    pub fn generate_bill(&self, month: u32, year: i32) -> Result<CustomerStatement> {
        let period = BillingPeriod::new(month, year)?;
        let lines: Vec<LineStatement> = self
            .lines
            .iter()
            .filter_map(|line| {
                line.bill_for(period)
                    .map(|bill| LineStatement::new(line.number(), bill))
            })
            .collect();

        Ok(CustomerStatement::new(self.id, period, lines))
    }

    /// settlement owed to close `number`
    pub fn cancel_phone_line(&mut self, number: &str) -> Result<Money> {
        self.line_mut(number)?.cancel()
    }
}
