//! # ClaimDesk Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Test instance on the production adapters, request builders
//! └── integration/      # End-to-end flows through the HTTP router
//!     ├── intake_flow.rs
//!     ├── backoffice_flow.rs
//!     ├── documents_flow.rs
//!     └── persistence_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p claimdesk-tests
//! cargo test -p claimdesk-tests integration::documents_flow
//! ```

pub mod harness;
pub mod integration;
