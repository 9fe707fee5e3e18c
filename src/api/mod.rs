//! REST API layer: routes, handlers, DTOs, and structured errors.

pub mod error;
pub mod handlers;
pub mod rest;
pub mod types;
