//! # pulsegram
//!
//! Sliding-window aggregation of request-completion beacons.
//!
//! Services emit fire-and-forget UDP datagrams describing finished requests
//! (endpoint name, outcome, duration). This crate ingests that stream,
//! keeps each event inside a trailing time window, and serves aggregate
//! summaries over HTTP for downstream consumers such as dashboards or
//! sonification clients.
//!
//! ```text
//! datagram -> ingress (parse/validate) -> multiplexer -> windowed counters
//!                                                             ^
//!                                     HTTP summary routes ----+
//! ```
//!
//! The interesting part is the windowed core: a continuously-mutated,
//! time-bounded buffer that supports concurrent append from an unordered
//! best-effort feed and on-demand summarization under a pluggable
//! transform policy. The window self-expires lazily: every public operation
//! prunes aged-out entries first, so there is no background sweep to
//! schedule or race against.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsegram::{
//!     PointSink, RedactingPolicy, RequestPoint, SystemClock, UncensoredPolicy, WindowedCounter,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(SystemClock::new());
//!
//! // Raw counts for internal visibility.
//! let staging = WindowedCounter::new(
//!     Duration::from_secs(300),
//!     Box::new(UncensoredPolicy::new()),
//!     clock.clone(),
//! )
//! .unwrap();
//!
//! // Redacted, magnitude-compressed counts for public exposure.
//! let public = WindowedCounter::new(
//!     Duration::from_secs(5),
//!     Box::new(RedactingPolicy::new(["processJob", "play"])),
//!     clock,
//! )
//! .unwrap();
//!
//! staging.accept(RequestPoint::new("processJob", true, 50.0));
//! public.accept(RequestPoint::new("internalEndpoint", true, 100.0));
//!
//! assert_eq!(staging.summary()[0].count, 1);
//! // Unknown endpoint collapses to "stuff"; count is round(sqrt(100)).
//! assert_eq!(public.summary()[0].endpoint, "stuff");
//! assert_eq!(public.summary()[0].count, 10);
//! ```
//!
//! ## Transform Policies
//!
//! A policy is a strategy pair bound to each counter at construction: a
//! per-event mapping to a weighted reporting bucket, and a reduction from
//! accumulated weight to the reported count.
//!
//! - [`UncensoredPolicy`]: verbatim endpoint and outcome, unit weight,
//!   identity reduction. Exact names and counts.
//! - [`RedactingPolicy`]: failures collapse into one `("error", false)`
//!   bucket and non-allow-listed endpoints into a `("stuff", true)` bucket,
//!   both weighted by request duration; the reduction `round(sqrt(w))`
//!   compresses magnitude so exact traffic volume cannot be reverse
//!   engineered from public summaries.
//!
//! ## Fan-out
//!
//! A [`Multiplexer`] broadcasts one ingress stream to several counters so
//! different policies run concurrently over the same feed. Counters and
//! multiplexers both implement [`PointSink`], so the topology composes.
//!
//! ## Delivery Semantics
//!
//! The ingress transport is fire-and-forget UDP: packet loss is expected
//! and untracked, malformed datagrams are dropped with a log line, and
//! nothing survives a process restart. This is a best-effort observability
//! pipe, not a billing system.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    point::{RequestPoint, SummaryEntry},
    transform::{RedactingPolicy, TransformPolicy, UncensoredPolicy, WeightedBucket},
    window::{Window, WindowError},
};

pub use application::{
    counter::WindowedCounter,
    metrics::{IngressMetrics, IngressSnapshot},
    multiplexer::Multiplexer,
    ports::{Clock, PointSink},
};

pub use infrastructure::{
    clock::SystemClock,
    config::{Config, ConfigError, DEFAULT_ALLOWED_ENDPOINTS},
    http::{Credentials, PublishState},
    ingress::{bind_ingress, run_ingress, spawn_ingress, MAX_DATAGRAM_BYTES},
};
