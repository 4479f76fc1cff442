//! Core types shared across HubShift crates
//!
//! Foundational types used by the error facility, the logging facility and
//! the HTTP surface:
//!
//! - **Correlation types**: RequestId and the request id header
//! - **Sensitive data**: Sensitive<T> marker for session tokens and credentials
//! - **Schema constants**: Canonical log event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
