//! Foundation module - Core utilities shared by the engine
//!
//! Currently only logging lives here; everything else builds on it.

pub mod logging;
