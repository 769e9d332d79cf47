//! Adapter enumeration seam
//!
//! [`AdapterSource`] is the narrow set of instance-level queries negotiation
//! needs. [`VulkanAdapterSource`] answers them from a live instance and
//! surface binding; tests answer them from memory.

use ash::prelude::VkResult;
use ash::vk;

use super::capabilities::AdapterProperties;
use crate::render::vulkan::initialization::surface::Surface;

/// Instance-level queries used to enumerate and inspect adapters
///
/// Every query is answered fresh; implementations must not cache results
/// between negotiation runs, since renegotiation relies on seeing the
/// current state of the system.
///
/// Handles returned by [`enumerate_adapters`](Self::enumerate_adapters) are
/// only valid for the other queries of the same source.
pub trait AdapterSource {
    /// List every physical device, in the backend's native order
    ///
    /// An empty list is a valid answer. An `Err` means the list itself could
    /// not be obtained.
    fn enumerate_adapters(&self) -> VkResult<Vec<vk::PhysicalDevice>>;

    /// Adapter-level properties
    fn adapter_properties(&self, adapter: vk::PhysicalDevice) -> AdapterProperties;

    /// Raw queue family properties, in native order
    ///
    /// A family's position in the list is its index.
    fn queue_family_properties(
        &self,
        adapter: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>>;

    /// Whether `queue_family_index` can present to the active surface
    fn supports_present(
        &self,
        adapter: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<bool>;
}

/// [`AdapterSource`] backed by a Vulkan instance and surface binding
pub struct VulkanAdapterSource<'a> {
    instance: &'a ash::Instance,
    surface: &'a Surface,
}

impl<'a> VulkanAdapterSource<'a> {
    /// Borrow the instance and surface for one negotiation run
    pub const fn new(instance: &'a ash::Instance, surface: &'a Surface) -> Self {
        Self { instance, surface }
    }
}

impl AdapterSource for VulkanAdapterSource<'_> {
    fn enumerate_adapters(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    fn adapter_properties(&self, adapter: vk::PhysicalDevice) -> AdapterProperties {
        let properties = unsafe { self.instance.get_physical_device_properties(adapter) };
        AdapterProperties::from(&properties)
    }

    fn queue_family_properties(
        &self,
        adapter: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>> {
        Ok(unsafe { self.instance.get_physical_device_queue_family_properties(adapter) })
    }

    fn supports_present(
        &self,
        adapter: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<bool> {
        self.surface.supports_present(adapter, queue_family_index)
    }
}
