//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! The session is the only state this app owns. It lives here behind pure
//! functions over the storage seam so the both-or-neither invariant is
//! testable without a browser.

pub mod session;
