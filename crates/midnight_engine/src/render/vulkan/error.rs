//! Vulkan bootstrap error types

use ash::vk;
use thiserror::Error;

use crate::render::vulkan::selection::negotiation::AdapterRejection;
use crate::render::window::WindowError;

/// Errors that abort connection setup or adapter negotiation
///
/// Every variant is fatal for the connection being built. Callers may retry
/// with a different selection policy.
#[derive(Error, Debug)]
pub enum NegotiationError {
    /// The windowing system could not create a drawable surface
    #[error("Drawable surface creation failed: {0}")]
    SurfaceCreationFailed(#[source] WindowError),

    /// The windowing system could not report required instance extensions
    #[error("Required extension query failed: {0}")]
    ExtensionQueryFailed(#[source] WindowError),

    /// The Vulkan loader or `vkCreateInstance` refused the connection
    #[error("Vulkan connection creation failed: {0}")]
    ConnectionCreationFailed(String),

    /// The drawable surface could not be bound to the connection
    #[error("Surface binding failed: {0}")]
    SurfaceBindingFailed(String),

    /// Physical devices could not be listed
    #[error("Adapter enumeration failed: {0:?}")]
    AdapterEnumerationFailed(vk::Result),

    /// Every enumerated adapter was disqualified
    #[error("No suitable GPU found ({} adapter(s) rejected)", .rejections.len())]
    NoSuitableAdapter {
        /// Why each adapter was turned down, in enumeration order
        rejections: Vec<AdapterRejection>,
    },
}

/// Result type for connection setup and negotiation
pub type NegotiationResult<T> = Result<T, NegotiationError>;
