/// DTOs for the admin management API.
pub mod admin;
/// Health check response payloads.
pub mod health;
/// DTOs for the public team-facing API.
pub mod public;
/// Server-sent event payloads.
pub mod sse;
/// Validation helpers for DTOs.
pub mod validation;
