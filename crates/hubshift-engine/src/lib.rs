//! HubShift Engine - Orchestration layer
//!
//! Provides the command handlers the HTTP surface calls. Each coordinates
//! core domain rules with the repository and owns the operation's
//! start/end/error log events.

pub mod commands;
pub mod identity;

pub use identity::{DisabledVerifier, GoogleTokenVerifier, IdentityVerifier, VerifiedIdentity};
