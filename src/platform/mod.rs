//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to per-tick input)
//! - The wasm-bindgen facade driven by `requestAnimationFrame`

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputLatch, trick_for_key};
