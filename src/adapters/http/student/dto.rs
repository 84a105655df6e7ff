//! HTTP DTOs for the student roster.

use serde::{Deserialize, Serialize};

use crate::domain::trainer::Student;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    /// Formatted for display.
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.name,
            email: student.email,
            phone: student.phone.map(|p| p.formatted()),
            is_active: student.is_active,
            created_at: student.created_at.as_datetime().to_rfc3339(),
        }
    }
}
