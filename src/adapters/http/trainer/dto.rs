//! HTTP DTOs for trainer provisioning.

use serde::{Deserialize, Serialize};

use crate::domain::trainer::TrainerRegistration;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Registration form submitted by the super-admin.
///
/// Every field is optional at the wire level so a missing field becomes a
/// validation error naming it rather than a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTrainerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub cref: Option<String>,
    #[serde(default)]
    pub specializations: Option<Vec<String>>,
}

impl From<CreateTrainerRequest> for TrainerRegistration {
    fn from(req: CreateTrainerRequest) -> Self {
        TrainerRegistration {
            name: req.name,
            cpf: req.cpf,
            email: req.email,
            phone: req.phone,
            birth_date: req.birth_date,
            cref: req.cref,
            specializations: req.specializations.unwrap_or_default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerResponse {
    pub success: bool,
    pub message: String,
    /// Password the trainer signs in with the first time.
    pub temp_password: String,
}
