//! Trainer Hub - personal trainer management backend
//!
//! This crate owns the billing side of the product: which plan a trainer is
//! on, whether they may add another student, how plan assignments supersede
//! each other, and how billing-provider webhooks are reconciled into local
//! subscription and payment records. Trainer accounts are provisioned here
//! against a hosted identity service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
