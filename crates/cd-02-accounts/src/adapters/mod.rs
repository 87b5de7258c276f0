//! # Adapters Module
//!
//! - `memory`: `InMemoryAccountRepository`

pub mod memory;

pub use memory::InMemoryAccountRepository;
