//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - UDP ingress (datagram parsing and validation)
//! - HTTP publishing (summary routes, auth, CORS)
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod http;
pub mod ingress;
pub mod mocks;
