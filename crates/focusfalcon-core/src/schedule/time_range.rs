use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A daily blocking window, both ends inclusive.
///
/// Times are kept as zero-padded 24-hour `HH:MM` strings and compared
/// lexically. The fixed width is what makes lexical order match clock order,
/// so every constructor pads or rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    /// Build a range from two `HH:MM` values, padding single-digit hours.
    pub fn new(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            start: normalize_hhmm(start)?,
            end: normalize_hhmm(end)?,
        })
    }

    /// True if `hhmm` (already zero-padded) falls inside the range.
    ///
    /// A range whose start sorts after its end never contains anything.
    pub fn contains(&self, hhmm: &str) -> bool {
        self.start.as_str() <= hhmm && hhmm <= self.end.as_str()
    }

    pub fn spans_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Check that both ends are already in canonical form.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for value in [&self.start, &self.end] {
            if normalize_hhmm(value)? != *value {
                return Err(ValidationError::InvalidTime(value.clone()));
            }
        }
        Ok(())
    }
}

/// Parse `H:MM` or `HH:MM` and return the zero-padded `HH:MM` form.
pub fn normalize_hhmm(value: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidTime(value.to_string());

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let h: u8 = hours.parse().map_err(|_| invalid())?;
    let m: u8 = minutes.parse().map_err(|_| invalid())?;
    if h > 23 || m > 59 {
        return Err(invalid());
    }
    Ok(format!("{h:02}:{m:02}"))
}
