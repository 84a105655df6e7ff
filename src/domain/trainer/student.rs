//! Students managed by a trainer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StudentId, Timestamp, TrainerId, ValidationError};

use super::Phone;

/// A student on a trainer's roster. Removal is a soft delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub trainer_id: TrainerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<Phone>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl Student {
    pub fn new(
        trainer_id: TrainerId,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if let Some(email) = email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format("email", "missing @ symbol"));
            }
        }
        let phone = phone
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Phone::parse)
            .transpose()?;

        Ok(Self {
            id: StudentId::new(),
            trainer_id,
            name: name.to_string(),
            email: email.map(str::to_string),
            phone,
            is_active: true,
            created_at: Timestamp::now(),
        })
    }

    /// Soft-deletes the student. Returns false if already inactive.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.is_active;
        self.is_active = false;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_student_is_active() {
        let student = Student::new(TrainerId::new(), " Bruno ", Some("b@x.com"), None).unwrap();
        assert_eq!(student.name, "Bruno");
        assert!(student.is_active);
    }

    #[test]
    fn new_student_requires_name() {
        assert_eq!(
            Student::new(TrainerId::new(), "", None, None),
            Err(ValidationError::empty_field("name"))
        );
    }

    #[test]
    fn new_student_validates_phone() {
        assert!(Student::new(TrainerId::new(), "Bruno", None, Some("123")).is_err());
    }

    #[test]
    fn deactivate_reports_first_change_only() {
        let mut student = Student::new(TrainerId::new(), "Bruno", None, None).unwrap();
        assert!(student.deactivate());
        assert!(!student.deactivate());
    }
}
