use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{BillingPeriod, Coordinates};

/// an immutable call record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    src_number: String,
    dst_number: String,
    time: NaiveDateTime,
    /// seconds
    duration: u32,
    src_loc: Coordinates,
    dst_loc: Coordinates,
}

impl Call {
    pub fn new(
        src_number: impl Into<String>,
        dst_number: impl Into<String>,
        time: NaiveDateTime,
        duration: u32,
        src_loc: Coordinates,
        dst_loc: Coordinates,
    ) -> Self {
        Self {
            src_number: src_number.into(),
            dst_number: dst_number.into(),
            time,
            duration,
            src_loc,
            dst_loc,
        }
    }

    pub fn src_number(&self) -> &str {
        &self.src_number
    }

    pub fn dst_number(&self) -> &str {
        &self.dst_number
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn src_loc(&self) -> Coordinates {
        self.src_loc
    }

    pub fn dst_loc(&self) -> Coordinates {
        self.dst_loc
    }

    /// billing month the call belongs to
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::from_datetime(self.time)
    }

    /// duration in whole minutes, a partial minute counts as a full one
    pub fn billable_minutes(&self) -> u32 {
        self.duration.div_ceil(60)
    }

    /// true if either endpoint is `number`
    pub fn involves(&self, number: &str) -> bool {
        self.src_number == number || self.dst_number == number
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::*;

    pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(1, 1, 1)
            .unwrap()
    }

    pub fn downtown() -> Coordinates {
        Coordinates::new(-79.42848154284123, 43.641401675960374)
    }

    pub fn north_york() -> Coordinates {
        Coordinates::new(-79.52745693913239, 43.750338501653374)
    }

    /// call between two numbers in january 2018
    pub fn call(src: &str, dst: &str, duration: u32) -> Call {
        Call::new(src, dst, at(2018, 1, 1), duration, downtown(), north_york())
    }

    pub fn call_in(src: &str, dst: &str, duration: u32, year: i32, month: u32) -> Call {
        Call::new(src, dst, at(year, month, 1), duration, downtown(), north_york())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_minutes_round_up() {
        assert_eq!(call("a", "b", 0).billable_minutes(), 0);
        assert_eq!(call("a", "b", 1).billable_minutes(), 1);
        assert_eq!(call("a", "b", 60).billable_minutes(), 1);
        assert_eq!(call("a", "b", 61).billable_minutes(), 2);
        assert_eq!(call("a", "b", 120).billable_minutes(), 2);
    }

    #[test]
    fn test_period_from_timestamp() {
        let c = call_in("a", "b", 10, 2017, 12);
        assert_eq!(c.period(), BillingPeriod::new(12, 2017).unwrap());
    }

    #[test]
    fn test_involves() {
        let c = call("867-5309", "273-8255", 10);
        assert!(c.involves("867-5309"));
        assert!(c.involves("273-8255"));
        assert!(!c.involves("649-2568"));
    }

    proptest! {
        #[test]
        fn test_billable_minutes_cover_duration(duration in 0u32..1_000_000u32) {
            let minutes = call("a", "b", duration).billable_minutes();
            prop_assert!(minutes * 60 >= duration);
            prop_assert!(minutes * 60 < duration + 60);
        }
    }
}
