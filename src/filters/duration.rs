use crate::call::Call;

use super::FilterError;

/// keep calls strictly shorter or longer than a number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationCriterion {
    LessThan(u32),
    GreaterThan(u32),
}

impl DurationCriterion {
    /// `L` or `G` followed by one to three digits; anything past those is ignored
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        if input.trim().is_empty() {
            return Err(FilterError::Empty);
        }

        let malformed = || FilterError::MalformedDuration {
            input: input.to_string(),
        };

        let mut chars = input.chars();
        let direction = chars.next().ok_or_else(malformed)?;
        let digits: String = chars.take(3).collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        let seconds: u32 = digits.parse().map_err(|_| malformed())?;

        match direction {
            'L' => Ok(DurationCriterion::LessThan(seconds)),
            'G' => Ok(DurationCriterion::GreaterThan(seconds)),
            _ => Err(malformed()),
        }
    }

    pub fn matches(&self, call: &Call) -> bool {
        match *self {
            DurationCriterion::LessThan(seconds) => call.duration() < seconds,
            DurationCriterion::GreaterThan(seconds) => call.duration() > seconds,
        }
    }

    pub fn select(&self, calls: &[Call]) -> Vec<Call> {
        calls.iter().filter(|call| self.matches(call)).cloned().collect()
    }
}
