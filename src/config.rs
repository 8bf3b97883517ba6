use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};

/// billing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BillingConfig {
    pub terms: ContractTerms,
    pub map_bounds: MapBounds,
}

/// tariff applied by the contract variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub mtm_monthly_fee: Money,
    pub mtm_minute_rate: Money,
    pub term_monthly_fee: Money,
    pub term_deposit: Money,
    pub term_minute_rate: Money,
    /// minutes included free each month on a term contract
    pub term_included_minutes: u32,
    pub prepaid_minute_rate: Money,
    pub prepaid_top_up: Money,
    /// top up when the owed balance is above this (i.e. credit below its magnitude)
    pub prepaid_low_balance: Money,
}

impl Default for ContractTerms {
    fn default() -> Self {
        Self {
            mtm_monthly_fee: Money::from_major(50),
            mtm_minute_rate: Money::from_decimal(dec!(0.05)),
            term_monthly_fee: Money::from_major(20),
            term_deposit: Money::from_major(300),
            term_minute_rate: Money::from_decimal(dec!(0.1)),
            term_included_minutes: 100,
            prepaid_minute_rate: Money::from_decimal(dec!(0.025)),
            prepaid_top_up: Money::from_major(25),
            prepaid_low_balance: Money::from_major(-10),
        }
    }
}

impl ContractTerms {
    /// reject negative fees and rates
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("mtm_monthly_fee", self.mtm_monthly_fee),
            ("mtm_minute_rate", self.mtm_minute_rate),
            ("term_monthly_fee", self.term_monthly_fee),
            ("term_deposit", self.term_deposit),
            ("term_minute_rate", self.term_minute_rate),
            ("prepaid_minute_rate", self.prepaid_minute_rate),
            ("prepaid_top_up", self.prepaid_top_up),
        ];

        for (name, amount) in non_negative {
            if amount.is_negative() {
                return Err(BillingError::InvalidConfiguration {
                    message: format!("{} must not be negative, got {}", name, amount),
                });
            }
        }

        Ok(())
    }
}

/// rectangle of the service area, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            min_longitude: -79.697878,
            max_longitude: -79.196382,
            min_latitude: 43.576959,
            max_latitude: 43.799568,
        }
    }
}

impl MapBounds {
    pub fn validate(&self) -> Result<()> {
        let ordered = self.min_longitude < self.max_longitude
            && self.min_latitude < self.max_latitude;
        if !ordered {
            return Err(BillingError::InvalidConfiguration {
                message: "map bounds must satisfy min < max on both axes".to_string(),
            });
        }
        Ok(())
    }
}

impl BillingConfig {
    pub fn new(terms: ContractTerms, map_bounds: MapBounds) -> Result<Self> {
        let config = Self { terms, map_bounds };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.terms.validate()?;
        self.map_bounds.validate()
    }

    /// load and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BillingConfig =
            serde_json::from_str(json).map_err(|e| BillingError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
