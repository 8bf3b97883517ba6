use crate::call::Call;
use crate::config::MapBounds;
use crate::types::Coordinates;

use super::FilterError;

/// rectangle given by its lower-left and upper-right corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationCriterion {
    pub lower: Coordinates,
    pub upper: Coordinates,
}

impl LocationCriterion {
    /// "lowerLong, lowerLat, upperLong, upperLat", inside `bounds`, lower < upper on both axes
    pub fn parse(input: &str, bounds: &MapBounds) -> Result<Self, FilterError> {
        if input.is_empty() {
            return Err(FilterError::Empty);
        }

        let malformed = || FilterError::MalformedCoordinates {
            input: input.to_string(),
        };

        let values = input
            .split(", ")
            .map(|part| part.parse::<f64>().map_err(|_| malformed()))
            .collect::<Result<Vec<f64>, FilterError>>()?;
        let &[lower_long, lower_lat, upper_long, upper_lat] = values.as_slice() else {
            return Err(malformed());
        };

        let longitude_ok = bounds.min_longitude <= lower_long
            && lower_long < upper_long
            && upper_long <= bounds.max_longitude;
        let latitude_ok = bounds.min_latitude <= lower_lat
            && lower_lat < upper_lat
            && upper_lat <= bounds.max_latitude;
        if !(longitude_ok && latitude_ok) {
            return Err(FilterError::OutOfBounds);
        }

        Ok(Self {
            lower: Coordinates::new(lower_long, lower_lat),
            upper: Coordinates::new(upper_long, upper_lat),
        })
    }

    /// boundary inclusive
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.lower.longitude..=self.upper.longitude).contains(&point.longitude)
            && (self.lower.latitude..=self.upper.latitude).contains(&point.latitude)
    }

    pub fn matches(&self, call: &Call) -> bool {
        self.contains(call.src_loc()) || self.contains(call.dst_loc())
    }

    pub fn select(&self, calls: &[Call]) -> Vec<Call> {
        calls.iter().filter(|call| self.matches(call)).cloned().collect()
    }
}
