//! Trainer domain module.
//!
//! Trainer accounts, their identity documents, registration validation and
//! the students they manage.

mod cpf;
mod errors;
mod phone;
mod student;
mod trainer;

pub use cpf::{Cpf, CPF_DIGITS};
pub use errors::{TrainerError, DUPLICATE_CPF_MESSAGE};
pub use phone::Phone;
pub use student::Student;
pub use trainer::{NewTrainer, Trainer, TrainerRegistration};
