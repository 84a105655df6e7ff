//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a personal trainer.
    TrainerId
);

uuid_id!(
    /// Unique identifier for a catalog subscription plan.
    PlanId
);

uuid_id!(
    /// Unique identifier for a trainer's subscription record.
    SubscriptionId
);

uuid_id!(
    /// Unique identifier for a student.
    StudentId
);

uuid_id!(
    /// Unique identifier for a payment history entry.
    PaymentId
);

/// Account identifier issued by the hosted identity provider.
///
/// Opaque to us: the provider decides the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates a new IdentityId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("identity_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trainer_id_generates_unique_values() {
        let a = TrainerId::new();
        let b = TrainerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn plan_id_parses_from_string() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id: PlanId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn subscription_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SubscriptionId>().is_err());
    }

    #[test]
    fn student_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let id = StudentId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn identity_id_accepts_non_empty() {
        let id = IdentityId::new("auth-user-1").unwrap();
        assert_eq!(id.as_str(), "auth-user-1");
    }

    #[test]
    fn identity_id_rejects_blank() {
        match IdentityId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "identity_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }
}
