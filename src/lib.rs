//! ReLoop Server Library
//!
//! Role-gated field-collection service for plastic-waste recovery
//! operations: field officers report collection batches against geographic
//! zones, admins moderate them, partners read system-wide data for
//! logistics.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (actors, zones, submissions, reports)
//! - [`lifecycle`] - The submission moderation state machine and operations
//! - [`auth`] - Authentication (bearer tokens) and the policy gate
//! - [`infra`] - Storage traits and their PostgreSQL/SQLite implementations
//! - [`api`] - REST API routes
//! - [`server`] - Configuration and HTTP bootstrap

pub mod api;
pub mod auth;
pub mod domain;
pub mod infra;
pub mod lifecycle;
pub mod migrations;
pub mod server;

// Re-export commonly used types
pub use auth::policy::{authorize, Decision, Operation, Scope};
pub use auth::ActorContext;
pub use domain::{
    Actor, Role, Submission, SubmissionItem, SubmissionStatus, Zone, ZoneRef, ZoneStatus,
};
pub use infra::{CoreError, Result, SubmissionStore};
pub use lifecycle::{StatusChange, SubmissionLifecycle};
