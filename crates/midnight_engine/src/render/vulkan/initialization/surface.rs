//! Vulkan surface binding
//!
//! Owns the `VkSurfaceKHR` that ties the drawable window to the instance and
//! answers presentation-support queries against it.

use ash::prelude::VkResult;
use ash::{extensions::khr, vk};

/// Surface binding with RAII cleanup
///
/// Must be dropped before the instance it was created from.
pub struct Surface {
    surface_loader: khr::Surface,
    surface: vk::SurfaceKHR,
}

impl Surface {
    /// Take ownership of a surface created for `instance`
    pub fn new(entry: &ash::Entry, instance: &ash::Instance, surface: vk::SurfaceKHR) -> Self {
        Self {
            surface_loader: khr::Surface::new(entry, instance),
            surface,
        }
    }

    /// Get the underlying surface handle
    pub const fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Check if a queue family supports presentation to this surface
    pub fn supports_present(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<bool> {
        unsafe {
            self.surface_loader.get_physical_device_surface_support(
                physical_device,
                queue_family_index,
                self.surface,
            )
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::debug!("Destroying surface {:?}", self.surface);
        unsafe {
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}
