//! Rendering backends and the windowing interface they depend on

pub mod vulkan;
pub mod window;
