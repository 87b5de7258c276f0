//! End-to-end flows. Each test runs a full instance in a temp directory.

mod backoffice_flow;
mod documents_flow;
mod intake_flow;
mod persistence_flow;
