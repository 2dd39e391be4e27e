//! Platform glue
//!
//! Handles browser wiring for:
//! - Animation frame loop and timestamps
//! - Pointer, touch and keyboard input
//! - Visibility (auto-pause when the tab is hidden)
//! - Storage, audio and vibration backends
//!
//! Native builds run headless from `main.rs` and need nothing here.

#[cfg(target_arch = "wasm32")]
pub mod web;
