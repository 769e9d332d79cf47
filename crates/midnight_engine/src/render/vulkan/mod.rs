//! Vulkan backend
//!
//! Connection setup and adapter negotiation. Logical devices, swapchains and
//! command recording build on the [`VulkanContext`] produced here.

/// Vulkan initialization types (instance, surface, window, context)
pub mod initialization;

/// Adapter enumeration and selection
pub mod selection;

/// Error types
pub mod error;

// Re-export core initialization types
pub use initialization::context::VulkanContext;
pub use initialization::instance::VulkanInstance;
pub use initialization::surface::Surface;
pub use initialization::window::{GlfwSystem, Window};

pub use error::{NegotiationError, NegotiationResult};
