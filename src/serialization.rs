use serde::{Deserialize, Serialize};

use crate::bill::{Bill, BillSummary};
use crate::decimal::Money;
use crate::types::{BillingPeriod, CustomerId};

/// serializable view of one line's bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStatement {
    pub number: String,
    pub bill: BillSummary,
}

impl LineStatement {
    pub fn new(number: &str, bill: &Bill) -> Self {
        Self {
            number: number.to_string(),
            bill: bill.summary(),
        }
    }
}

/// serializable view of a customer's bill for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerStatement {
    pub customer_id: CustomerId,
    pub period: BillingPeriod,
    pub total: Money,
    pub lines: Vec<LineStatement>,
}

impl CustomerStatement {
    pub fn new(customer_id: CustomerId, period: BillingPeriod, lines: Vec<LineStatement>) -> Self {
        let total = lines.iter().map(|line| line.bill.total).sum();
        Self {
            customer_id,
            period,
            total,
            lines,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::Accumulator;

    #[test]
    fn test_statement_json() {
        let mut bill = Bill::new();
        bill.set_rate("MTM", Money::from_cents(5));
        bill.add_fixed_cost(Money::from_major(50));

        let statement = CustomerStatement::new(
            5555,
            BillingPeriod::new(1, 2018).unwrap(),
            vec![LineStatement::new("273-8255", &bill)],
        );
        assert_eq!(statement.total, Money::from_major(50));

        let json = statement.to_json_pretty().unwrap();
        assert!(json.contains("\"customer_id\": 5555"));
        assert!(json.contains("273-8255"));

        let parsed: CustomerStatement = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, statement);
    }
}
