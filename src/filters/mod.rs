pub mod customer;
pub mod duration;
pub mod location;
pub mod reset;

pub use customer::CustomerCriterion;
pub use duration::DurationCriterion;
pub use location::LocationCriterion;

use std::fmt;

use thiserror::Error;

use crate::call::Call;
use crate::config::MapBounds;
use crate::customer::Customer;

/// why a filter string was not applied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("empty filter string")]
    Empty,

    #[error("expected 'L' or 'G' followed by up to three digits, got {input:?}")]
    MalformedDuration { input: String },

    #[error("not a customer id: {input:?}")]
    MalformedCustomerId { input: String },

    #[error("no customer with id {id}")]
    UnknownCustomer { id: u32 },

    #[error("customer {id} has no matching calls")]
    NoMatches { id: u32 },

    #[error("expected four comma-separated coordinates, got {input:?}")]
    MalformedCoordinates { input: String },

    #[error("rectangle is degenerate or outside the map")]
    OutOfBounds,
}

/// result of evaluating a filter against a call list
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// the filter string was valid; calls kept in input order
    Applied(Vec<Call>),
    /// the filter string was rejected; the input is returned as is
    Rejected { calls: Vec<Call>, reason: FilterError },
}

impl FilterOutcome {
    pub fn calls(&self) -> &[Call] {
        match self {
            FilterOutcome::Applied(calls) => calls,
            FilterOutcome::Rejected { calls, .. } => calls,
        }
    }

    pub fn into_calls(self) -> Vec<Call> {
        match self {
            FilterOutcome::Applied(calls) => calls,
            FilterOutcome::Rejected { calls, .. } => calls,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, FilterOutcome::Applied(_))
    }
}

/// filters selectable by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Reset,
    Customer,
    Duration,
    Location(MapBounds),
}

impl Filter {
    /// location filter over the default service area
    pub fn location() -> Self {
        Filter::Location(MapBounds::default())
    }

    /// all filters, in menu order
    pub fn all() -> [Filter; 4] {
        [Filter::Duration, Filter::Customer, Filter::location(), Filter::Reset]
    }

    /// validate `filter_string` and apply it to `calls`
    pub fn evaluate(&self, customers: &[Customer], calls: &[Call], filter_string: &str) -> FilterOutcome {
        let result = match self {
            Filter::Reset => Ok(reset::all_outgoing(customers)),
            Filter::Customer => CustomerCriterion::parse(filter_string)
                .and_then(|criterion| criterion.select(customers, calls)),
            Filter::Duration => {
                DurationCriterion::parse(filter_string).map(|criterion| criterion.select(calls))
            }
            Filter::Location(bounds) => LocationCriterion::parse(filter_string, bounds)
                .map(|criterion| criterion.select(calls)),
        };

        match result {
            Ok(filtered) => FilterOutcome::Applied(filtered),
            Err(reason) => {
                tracing::debug!(filter = ?self, input = filter_string, %reason, "filter rejected");
                FilterOutcome::Rejected {
                    calls: calls.to_vec(),
                    reason,
                }
            }
        }
    }

    /// filtered calls, or `calls` unchanged if `filter_string` is invalid
    pub fn apply(&self, customers: &[Customer], calls: &[Call], filter_string: &str) -> Vec<Call> {
        self.evaluate(customers, calls, filter_string).into_calls()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Reset => f.write_str("Reset all of the filters applied so far, if any"),
            Filter::Customer => f.write_str("Filter events based on customer ID"),
            Filter::Duration => f.write_str(
                "Filter calls based on duration; L### returns calls less than specified length, G### for greater",
            ),
            Filter::Location(_) => f.write_str(
                "Filter calls made or received in a given rectangular area. \
                 Format: \"lowerLong, lowerLat, upperLong, upperLat\" (e.g., -79.6, 43.6, -79.3, 43.7)",
            ),
        }
    }
}
