//! Student handlers.
//!
//! Roster changes keep the current subscription's student counter in step.

mod create_student;
mod deactivate_student;

pub use create_student::{CreateStudentCommand, CreateStudentHandler};
pub use deactivate_student::{DeactivateStudentCommand, DeactivateStudentHandler};
