//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration: fetching through `net::api`,
//! reading the session context, and redirect guards.

pub mod login;
pub mod members;
pub mod mypage;
