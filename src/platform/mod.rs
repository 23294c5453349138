//! Platform layer
//!
//! Browser bindings: the DOM-backed ball surface and page helpers. Native
//! builds use `render::HeadlessSurface` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;
