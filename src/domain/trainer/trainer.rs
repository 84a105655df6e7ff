//! Trainer entity and registration input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IdentityId, Timestamp, TrainerId, ValidationError};

use super::{Cpf, Phone};

/// A personal trainer account.
///
/// # Invariants
///
/// - `cpf` holds exactly 11 digits and is unique across trainers
/// - `identity_id` references a live identity-provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub identity_id: IdentityId,
    pub name: String,
    pub cpf: Cpf,
    pub email: String,
    pub phone: Option<Phone>,
    pub birth_date: Option<NaiveDate>,
    /// Professional registration with the physical education council.
    pub cref: Option<String>,
    pub specializations: Vec<String>,
    pub is_active: bool,
    /// Set on accounts created with the temporary password.
    pub must_reset_password: bool,
    pub created_at: Timestamp,
}

impl Trainer {
    /// Builds a freshly registered trainer bound to a new identity account.
    ///
    /// The account starts with the shared temporary password, so the
    /// trainer must choose a new one on first sign-in.
    pub fn register(identity_id: IdentityId, details: NewTrainer) -> Self {
        Self {
            id: TrainerId::new(),
            identity_id,
            name: details.name,
            cpf: details.cpf,
            email: details.email,
            phone: details.phone,
            birth_date: details.birth_date,
            cref: details.cref,
            specializations: details.specializations,
            is_active: true,
            must_reset_password: true,
            created_at: Timestamp::now(),
        }
    }
}

/// Raw registration form as submitted by the administrator.
#[derive(Debug, Clone, Default)]
pub struct TrainerRegistration {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cref: Option<String>,
    pub specializations: Vec<String>,
}

/// Validated registration data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainer {
    pub name: String,
    pub cpf: Cpf,
    pub email: String,
    pub phone: Option<Phone>,
    pub birth_date: Option<NaiveDate>,
    pub cref: Option<String>,
    pub specializations: Vec<String>,
}

impl TrainerRegistration {
    /// Checks required fields and normalizes the optional ones.
    ///
    /// Blank optional fields are treated as absent.
    pub fn validate(self) -> Result<NewTrainer, ValidationError> {
        let name = required(self.name, "name")?;
        let cpf = Cpf::parse(&required(self.cpf, "cpf")?)?;
        let email = required(self.email, "email")?;
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }

        let phone = optional(self.phone).map(|p| Phone::parse(&p)).transpose()?;
        let birth_date = optional(self.birth_date)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
                    ValidationError::invalid_format("birth_date", "expected YYYY-MM-DD")
                })
            })
            .transpose()?;

        let specializations = self
            .specializations
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(NewTrainer {
            name,
            cpf,
            email,
            phone,
            birth_date,
            cref: optional(self.cref),
            specializations,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    optional(value).ok_or_else(|| ValidationError::empty_field(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> TrainerRegistration {
        TrainerRegistration {
            name: Some("Ana Souza".to_string()),
            cpf: Some("123.456.789-00".to_string()),
            email: Some("a@b.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_minimal_form() {
        let new = registration().validate().unwrap();
        assert_eq!(new.name, "Ana Souza");
        assert_eq!(new.cpf.digits(), "12345678900");
        assert_eq!(new.email, "a@b.com");
        assert!(new.phone.is_none());
        assert!(new.birth_date.is_none());
    }

    #[test]
    fn validate_rejects_missing_name() {
        let form = TrainerRegistration {
            name: None,
            ..registration()
        };
        assert_eq!(form.validate(), Err(ValidationError::empty_field("name")));
    }

    #[test]
    fn validate_rejects_blank_email() {
        let form = TrainerRegistration {
            email: Some("   ".to_string()),
            ..registration()
        };
        assert_eq!(form.validate(), Err(ValidationError::empty_field("email")));
    }

    #[test]
    fn validate_rejects_email_without_at() {
        let form = TrainerRegistration {
            email: Some("ana.example.com".to_string()),
            ..registration()
        };
        assert_eq!(form.validate().unwrap_err().field(), "email");
    }

    #[test]
    fn validate_parses_optional_fields() {
        let form = TrainerRegistration {
            phone: Some("(21) 99876-5432".to_string()),
            birth_date: Some("1990-04-12".to_string()),
            cref: Some(" 012345-G/SP ".to_string()),
            specializations: vec!["Pilates".to_string(), " ".to_string()],
            ..registration()
        };
        let new = form.validate().unwrap();
        assert_eq!(new.phone.unwrap().digits(), "21998765432");
        assert_eq!(new.birth_date, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(new.cref.as_deref(), Some("012345-G/SP"));
        assert_eq!(new.specializations, vec!["Pilates".to_string()]);
    }

    #[test]
    fn validate_rejects_bad_birth_date() {
        let form = TrainerRegistration {
            birth_date: Some("12/04/1990".to_string()),
            ..registration()
        };
        assert_eq!(form.validate().unwrap_err().field(), "birth_date");
    }

    #[test]
    fn validate_treats_blank_phone_as_absent() {
        let form = TrainerRegistration {
            phone: Some("".to_string()),
            ..registration()
        };
        assert!(form.validate().unwrap().phone.is_none());
    }

    #[test]
    fn register_requires_password_reset() {
        let identity = IdentityId::new("auth-42").unwrap();
        let trainer = Trainer::register(identity.clone(), registration().validate().unwrap());
        assert_eq!(trainer.identity_id, identity);
        assert!(trainer.is_active);
        assert!(trainer.must_reset_password);
    }
}
