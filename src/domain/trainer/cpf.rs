//! CPF (Brazilian taxpayer number) value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Number of digits in a CPF.
pub const CPF_DIGITS: usize = 11;

/// A CPF stored as its 11 digits, without punctuation.
///
/// Input may carry the usual mask (`123.456.789-00`) or any other
/// separators; only the digits are kept. Check digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Parses a CPF from user input, keeping only ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("cpf"));
        }
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != CPF_DIGITS {
            return Err(ValidationError::invalid_format(
                "cpf",
                format!("expected {} digits, got {}", CPF_DIGITS, digits.len()),
            ));
        }
        Ok(Self(digits))
    }

    /// Rebuilds a CPF from the digits already held by the store.
    pub fn from_digits(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    /// The bare digits, as stored.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form `000.000.000-00`.
    pub fn formatted(&self) -> String {
        if self.0.len() != CPF_DIGITS {
            return self.0.clone();
        }
        format!(
            "{}.{}.{}-{}",
            &self.0[0..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..11]
        )
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}
