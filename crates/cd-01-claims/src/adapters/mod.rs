//! # Adapters Module
//!
//! In-memory and default implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `memory`: `InMemoryClaimRepository`
//! - `blob`: `InMemoryBlobStore`
//! - `notifier`: `LogNotifier`, `RecordingNotifier`
//! - `infra`: clocks and tracking-code sources

pub mod blob;
pub mod infra;
pub mod memory;
pub mod notifier;

pub use blob::{InMemoryBlobStore, StoredBlob};
pub use infra::{ManualClock, RandomTrackingCodeSource, ScriptedTrackingCodeSource, SystemTimeSource};
pub use memory::InMemoryClaimRepository;
pub use notifier::{LogNotifier, RecordingNotifier};
