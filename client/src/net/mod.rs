//! Networking modules for the gateway REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls against the same-origin `/api/**` surface and
//! `types` defines the shared wire schema.

pub mod api;
pub mod types;
