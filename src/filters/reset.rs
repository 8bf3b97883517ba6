use crate::call::Call;
use crate::customer::Customer;

/// every customer's outgoing calls, in registry order
///
/// Only outgoing calls are taken so a call between two known lines appears once.
pub fn all_outgoing(customers: &[Customer]) -> Vec<Call> {
    customers
        .iter()
        .flat_map(|customer| customer.history().0)
        .collect()
}
