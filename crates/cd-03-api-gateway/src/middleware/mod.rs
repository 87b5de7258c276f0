//! HTTP middleware stack.
//!
//! Order, outermost first: path normalization, request tracing, CORS,
//! timeout, body limit, authorization (matched routes only).

pub mod auth;
pub mod cors;
pub mod normalize;
pub mod tracing;

pub use auth::{AuthLayer, AuthService};
pub use cors::create_cors_layer;
pub use normalize::{NormalizePath, NormalizePathLayer};
pub use self::tracing::{TracingLayer, TracingService, REQUEST_ID_HEADER};
