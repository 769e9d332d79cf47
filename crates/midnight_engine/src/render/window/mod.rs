//! Windowing collaborator interface
//!
//! Vulkan setup needs exactly two things from the windowing system: a
//! drawable native surface and the instance extensions that surface requires.
//! The traits in [`backend`] describe that contract; the GLFW implementation
//! lives with the Vulkan initialization code.

pub mod backend;

pub use backend::{DrawableSurface, WindowSystem};

use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library could not be initialized
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// The native window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// Any other windowing library failure
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;
