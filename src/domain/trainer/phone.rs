//! Brazilian phone number value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Phone number kept as digits: two-digit area code plus an 8-digit
/// landline or 9-digit mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub const MIN_DIGITS: usize = 10;
    pub const MAX_DIGITS: usize = 11;

    /// Parses a phone number, ignoring mask characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::invalid_format(
                "phone",
                format!(
                    "expected {} or {} digits, got {}",
                    Self::MIN_DIGITS,
                    Self::MAX_DIGITS,
                    digits.len()
                ),
            ));
        }
        Ok(Self(digits))
    }

    pub fn from_digits(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form `(11) 98765-4321` or `(11) 3456-7890`.
    pub fn formatted(&self) -> String {
        match self.0.len() {
            11 => format!("({}) {}-{}", &self.0[0..2], &self.0[2..7], &self.0[7..11]),
            10 => format!("({}) {}-{}", &self.0[0..2], &self.0[2..6], &self.0[6..10]),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}
