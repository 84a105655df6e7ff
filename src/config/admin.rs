//! Administrator and provisioning configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Who may provision trainers and what password they start with
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Email of the only account allowed to create trainers and assign plans
    pub super_admin_email: String,

    /// Password new trainer accounts start with; they must reset it on first sign-in
    #[serde(default = "default_temporary_password")]
    pub temporary_password: SecretString,
}

impl AdminConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = self.super_admin_email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingRequired("ADMIN__SUPER_ADMIN_EMAIL"));
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidSuperAdminEmail);
        }
        if self.temporary_password.expose_secret().len() < 6 {
            return Err(ValidationError::TemporaryPasswordTooShort);
        }
        Ok(())
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            super_admin_email: String::new(),
            temporary_password: default_temporary_password(),
        }
    }
}

fn default_temporary_password() -> SecretString {
    SecretString::new("temp123456".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_temporary_password() {
        let config = AdminConfig::default();
        assert_eq!(config.temporary_password.expose_secret(), "temp123456");
    }

    #[test]
    fn test_validation_missing_email() {
        assert!(AdminConfig::default().validate().is_err());
    }

    #[test]
    fn test_validation_malformed_email() {
        let config = AdminConfig {
            super_admin_email: "admin".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSuperAdminEmail)
        ));
    }

    #[test]
    fn test_validation_short_password() {
        let config = AdminConfig {
            super_admin_email: "admin@trainerhub.com".to_string(),
            temporary_password: SecretString::new("123".to_string()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AdminConfig {
            super_admin_email: "admin@trainerhub.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
