//! Domain services behind the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Services own credential checks and abuse limits so route handlers can
//! stay focused on protocol translation and envelope shaping.

pub mod accounts;
pub mod throttle;
