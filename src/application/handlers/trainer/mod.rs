//! Trainer handlers.

mod create_trainer;

pub use create_trainer::{
    CreateTrainerCommand, CreateTrainerHandler, CreateTrainerResult, TrainerProvisioning,
};
