//! Route handlers.
//!
//! Handlers decode the request, call one inbound port and map the result;
//! every error goes through [`crate::domain::ApiError`].

pub mod auth;
pub mod claims;
pub mod health;
pub mod intake_form;

pub use intake_form::{read_intake_form, IntakeForm};
