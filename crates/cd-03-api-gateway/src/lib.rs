//! # CD-03 API Gateway
//!
//! HTTP surface of ClaimDesk and its authorization boundary.
//!
//! ## Routes
//!
//! | Route | Tier |
//! |---|---|
//! | `POST /claims` | Public |
//! | `GET /claims/track/:code` | Public |
//! | `POST /auth/login` | Public |
//! | `GET /health` | Public |
//! | `GET /files/*key` (merged in by the runtime) | Public, signature-gated |
//! | `GET /claims`, `GET/PATCH/DELETE /claims/:id`, `GET /claims/:id/download/:kind` | Protected |
//!
//! ## Middleware Stack
//!
//! ```text
//! NormalizePath → Tracing → CORS → Timeout → BodyLimit → Router → Auth (matched routes)
//! ```
//!
//! Static path segments are matched case-insensitively; protected routes
//! need `Authorization: Bearer <token>` resolving to an active account.
//! Every error is rendered as `{"statusCode","error","message"}`.
//!
//! # Usage
//!
//! ```ignore
//! use cd_03_api_gateway::{ApiGatewayService, AppState, GatewayConfig};
//!
//! let state = AppState::new(claim_service, account_service);
//! let service = ApiGatewayService::new(GatewayConfig::default(), state, files_router)?;
//! let listener = service.bind().await?;
//! service.serve(listener, shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use domain::{ApiError, ConfigError, CorsConfig, GatewayConfig, GatewayError, RouteTier};
pub use router::{build_router, AppState, GatewayApp};
pub use service::{ApiGatewayService, RunningGateway};
