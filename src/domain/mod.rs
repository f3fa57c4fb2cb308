//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the windowed
//! aggregation system:
//! - Request points and summary entries
//! - Transform/redaction policies
//! - The self-pruning sliding window
//!
//! All types in this layer are pure and easily testable; time is passed in
//! as an argument rather than read from a clock.

pub mod point;
pub mod transform;
pub mod window;
