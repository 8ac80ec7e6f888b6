//! Platform abstraction layer
//!
//! Browser event translation lives here so the wasm glue stays thin.

pub mod input;

pub use input::{InputAction, action_for_key, action_for_pointer};
