pub mod bill;
pub mod call;
pub mod config;
pub mod contracts;
pub mod customer;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod filters;
pub mod serialization;
pub mod types;

// re-export key types
pub use bill::{Accumulator, Bill, BillSummary};
pub use call::Call;
pub use config::{BillingConfig, ContractTerms, MapBounds};
pub use contracts::{ClosedMonth, Contract, ContractPolicy, MinuteSplit, MonthToMonth, Prepaid, Term};
pub use customer::{Customer, PhoneLine};
pub use decimal::Money;
pub use errors::{BillingError, Result};
pub use events::{BillingEvent, EventStore};
pub use filters::{Filter, FilterError, FilterOutcome};
pub use serialization::{CustomerStatement, LineStatement};
pub use types::{BillingPeriod, ContractKind, ContractStatus, Coordinates, CustomerId};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
