//! # client
//!
//! Leptos + WASM frontend for the BITAmin member portal. Talks to the
//! gateway's same-origin `/api/**` surface and owns exactly one piece of
//! state: the session (token + profile in browser storage).

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: runs on module load and mounts the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(crate::app::App);
}
