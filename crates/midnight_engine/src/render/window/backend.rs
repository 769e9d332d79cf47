//! Traits implemented by windowing backends
//!
//! The Vulkan context only needs two things from a window system: a native
//! window it can draw onto, and that window's cooperation in binding a
//! `VkSurfaceKHR` to an instance. Keeping both behind traits lets the
//! context be driven by GLFW in the application and by in-memory fakes in
//! tests.

use ash::vk;

use super::WindowResult;

/// Creates drawable surfaces
pub trait WindowSystem {
    /// Surface type produced by this system
    type Surface: DrawableSurface;

    /// Create a native window suitable for Vulkan rendering
    ///
    /// This is the first step of context construction. The window must not
    /// own a client API context (OpenGL or similar), since Vulkan will bind
    /// its own surface to it.
    fn create_drawable_surface(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
    ) -> WindowResult<Self::Surface>;
}

/// A native surface Vulkan can draw onto
pub trait DrawableSurface {
    /// Instance extension names needed to present to this surface
    ///
    /// These are enabled verbatim on the instance. A failure here aborts
    /// construction before any instance exists.
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Bind the surface to `instance`
    ///
    /// The returned handle is owned by the caller, which must destroy it
    /// before the instance.
    fn create_vulkan_surface(&mut self, instance: vk::Instance) -> WindowResult<vk::SurfaceKHR>;
}
