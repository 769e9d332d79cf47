// Vulkan initialization components

pub mod context;
pub mod instance;
pub mod surface;
pub mod window;

pub use context::*;
pub use instance::*;
pub use surface::*;
pub use window::*;
