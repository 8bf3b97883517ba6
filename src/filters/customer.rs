use crate::call::Call;
use crate::customer::Customer;
use crate::types::CustomerId;

use super::FilterError;

/// calls made or received by one customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerCriterion {
    pub id: CustomerId,
}

impl CustomerCriterion {
    /// a decimal customer id without leading zeros
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        if input.is_empty() {
            return Err(FilterError::Empty);
        }
        let leading_zero = input.len() > 1 && input.starts_with('0');
        if leading_zero || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FilterError::MalformedCustomerId {
                input: input.to_string(),
            });
        }
        input
            .parse()
            .map(|id| Self { id })
            .map_err(|_| FilterError::MalformedCustomerId {
                input: input.to_string(),
            })
    }

    /// calls touching any of the customer's numbers, each kept once, in input order
    pub fn select(&self, customers: &[Customer], calls: &[Call]) -> Result<Vec<Call>, FilterError> {
        let customer = customers
            .iter()
            .find(|customer| customer.id() == self.id)
            .ok_or(FilterError::UnknownCustomer { id: self.id })?;

        let numbers = customer.phone_numbers();
        let matched: Vec<Call> = calls
            .iter()
            .filter(|call| numbers.iter().any(|number| call.involves(number)))
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(FilterError::NoMatches { id: self.id });
        }
        Ok(matched)
    }
}
