use crate::error::{Result, TrackerError};

/// Inclusive range a rating must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    pub min: f32,
    pub max: f32,
}

impl Default for RatingRange {
    fn default() -> Self {
        RatingRange {
            min: 0.0,
            max: 10.0,
        }
    }
}

impl RatingRange {
    pub fn new(min: f32, max: f32) -> Result<RatingRange> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(TrackerError::Config(format!(
                "rating range {}..={} is empty",
                min, max
            )));
        }
        Ok(RatingRange { min, max })
    }

    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn validate(&self, value: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(TrackerError::Validation(format!(
                "rating {} is not a number",
                value
            )));
        }
        if !self.contains(value) {
            return Err(TrackerError::Validation(format!(
                "rating {} is outside {}..={}",
                value, self.min, self.max
            )));
        }
        Ok(value)
    }

    /// Parses a rating typed by the user.
    pub fn parse_input(&self, input: &str) -> Result<f32> {
        let value = input.trim().parse::<f32>().map_err(|_| {
            TrackerError::Validation(format!("rating '{}' is not a number", input.trim()))
        })?;
        self.validate(value)
    }
}
