//! Capability records for adapters and their queue families
//!
//! Plain data produced by enumeration and classification. Nothing here owns a
//! Vulkan object; handles are copied views valid for one negotiation run.

use ash::vk;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::ffi::CStr;
use std::fmt;

/// Vulkan API version decoded from its packed form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    /// Variant number (0 for core Vulkan)
    pub variant: u32,
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl ApiVersion {
    /// Vulkan 1.0
    pub const V1_0: Self = Self::new(1, 0, 0);
    /// Vulkan 1.1
    pub const V1_1: Self = Self::new(1, 1, 0);

    /// Create a core (variant 0) version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { variant: 0, major, minor, patch }
    }

    /// Decode a packed `VK_MAKE_API_VERSION` value
    pub const fn from_packed(version: u32) -> Self {
        Self {
            variant: vk::api_version_variant(version),
            major: vk::api_version_major(version),
            minor: vk::api_version_minor(version),
            patch: vk::api_version_patch(version),
        }
    }

    /// Pack back into the `VK_MAKE_API_VERSION` layout
    pub const fn to_packed(self) -> u32 {
        vk::make_api_version(self.variant, self.major, self.minor, self.patch)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Kind of physical device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    /// Dedicated GPU
    Discrete,
    /// GPU sharing memory with the host CPU
    Integrated,
    /// Virtualised GPU (e.g. inside a VM)
    Virtual,
    /// Software rasteriser running on the CPU
    Cpu,
    /// Anything the driver does not classify
    #[default]
    Other,
}

impl From<vk::PhysicalDeviceType> for AdapterType {
    fn from(device_type: vk::PhysicalDeviceType) -> Self {
        match device_type {
            vk::PhysicalDeviceType::DISCRETE_GPU => Self::Discrete,
            vk::PhysicalDeviceType::INTEGRATED_GPU => Self::Integrated,
            vk::PhysicalDeviceType::VIRTUAL_GPU => Self::Virtual,
            vk::PhysicalDeviceType::CPU => Self::Cpu,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AdapterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discrete => "discrete",
            Self::Integrated => "integrated",
            Self::Virtual => "virtual",
            Self::Cpu => "cpu",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Per-dimension image size limits reported by an adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageLimits {
    /// `maxImageDimension1D`
    pub max_image_dimension_1d: u32,
    /// `maxImageDimension2D`
    pub max_image_dimension_2d: u32,
    /// `maxImageDimension3D`
    pub max_image_dimension_3d: u32,
}

/// Adapter-level properties, the only data a selection policy ever sees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterProperties {
    /// Driver-reported device name
    pub name: String,
    /// Kind of device
    pub adapter_type: AdapterType,
    /// Highest Vulkan version the device supports
    pub api_version: ApiVersion,
    /// Vendor-specific driver version
    pub driver_version: u32,
    /// PCI vendor id
    pub vendor_id: u32,
    /// Vendor-specific device id
    pub device_id: u32,
    /// Resource limits
    pub limits: ImageLimits,
}

impl From<&vk::PhysicalDeviceProperties> for AdapterProperties {
    fn from(properties: &vk::PhysicalDeviceProperties) -> Self {
        // device_name is a fixed array; the driver always NUL-terminates it
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        Self {
            name,
            adapter_type: properties.device_type.into(),
            api_version: ApiVersion::from_packed(properties.api_version),
            driver_version: properties.driver_version,
            vendor_id: properties.vendor_id,
            device_id: properties.device_id,
            limits: ImageLimits {
                max_image_dimension_1d: properties.limits.max_image_dimension1_d,
                max_image_dimension_2d: properties.limits.max_image_dimension2_d,
                max_image_dimension_3d: properties.limits.max_image_dimension3_d,
            },
        }
    }
}

bitflags! {
    /// Capabilities of one queue family
    ///
    /// `PRESENT` is never derived from queue flags. It is relative to one
    /// surface and comes from an explicit support query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QueueCapabilities: u8 {
        /// Graphics commands
        const GRAPHICS = 1 << 0;
        /// Compute dispatches
        const COMPUTE = 1 << 1;
        /// Transfer operations
        const TRANSFER = 1 << 2;
        /// Sparse memory binding
        const SPARSE_BINDING = 1 << 3;
        /// Presentation to the active surface
        const PRESENT = 1 << 4;
    }
}

impl QueueCapabilities {
    /// Translate the intrinsic Vulkan queue flags, ignoring presentation
    pub fn from_queue_flags(flags: vk::QueueFlags) -> Self {
        let mut capabilities = Self::empty();
        capabilities.set(Self::GRAPHICS, flags.contains(vk::QueueFlags::GRAPHICS));
        capabilities.set(Self::COMPUTE, flags.contains(vk::QueueFlags::COMPUTE));
        capabilities.set(Self::TRANSFER, flags.contains(vk::QueueFlags::TRANSFER));
        capabilities.set(Self::SPARSE_BINDING, flags.contains(vk::QueueFlags::SPARSE_BINDING));
        capabilities
    }
}

impl fmt::Display for QueueCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TAGS: [(QueueCapabilities, &str); 5] = [
            (QueueCapabilities::GRAPHICS, "gfx"),
            (QueueCapabilities::COMPUTE, "compute"),
            (QueueCapabilities::TRANSFER, "xfer"),
            (QueueCapabilities::SPARSE_BINDING, "sparse"),
            (QueueCapabilities::PRESENT, "present"),
        ];

        let tags: Vec<&str> = TAGS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, tag)| *tag)
            .collect();

        if tags.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&tags.join(" "))
        }
    }
}

/// One queue family of one adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamily {
    /// Index in the adapter's native enumeration order
    pub index: u32,
    /// Number of queues that can be created from this family
    pub queue_count: u32,
    /// What the family can do
    pub capabilities: QueueCapabilities,
}

impl QueueFamily {
    /// Whether graphics commands can be submitted
    pub const fn supports_graphics(&self) -> bool {
        self.capabilities.contains(QueueCapabilities::GRAPHICS)
    }

    /// Whether work from this family can be presented to the active surface
    pub const fn supports_presentation(&self) -> bool {
        self.capabilities.contains(QueueCapabilities::PRESENT)
    }

    /// Whether compute dispatches are supported
    pub const fn supports_compute(&self) -> bool {
        self.capabilities.contains(QueueCapabilities::COMPUTE)
    }

    /// Whether transfer operations are supported
    pub const fn supports_transfer(&self) -> bool {
        self.capabilities.contains(QueueCapabilities::TRANSFER)
    }
}

/// The adapter and queue families chosen by negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAdapter {
    adapter: vk::PhysicalDevice,
    adapter_index: usize,
    properties: AdapterProperties,
    graphics_family: u32,
    present_family: u32,
}

impl SelectedAdapter {
    /// Build an outcome, checking that both indices name existing families
    ///
    /// Returns `None` when either index is not present in `families`.
    pub fn new(
        adapter: vk::PhysicalDevice,
        adapter_index: usize,
        properties: AdapterProperties,
        families: &[QueueFamily],
        graphics_family: u32,
        present_family: u32,
    ) -> Option<Self> {
        let exists = |index: u32| families.iter().any(|family| family.index == index);
        if !exists(graphics_family) || !exists(present_family) {
            return None;
        }

        Some(Self::from_assignment(
            adapter,
            adapter_index,
            properties,
            graphics_family,
            present_family,
        ))
    }

    /// Build an outcome from indices already taken out of the adapter's
    /// family list
    pub(crate) const fn from_assignment(
        adapter: vk::PhysicalDevice,
        adapter_index: usize,
        properties: AdapterProperties,
        graphics_family: u32,
        present_family: u32,
    ) -> Self {
        Self {
            adapter,
            adapter_index,
            properties,
            graphics_family,
            present_family,
        }
    }

    /// Physical device handle (non-owning)
    pub const fn adapter(&self) -> vk::PhysicalDevice {
        self.adapter
    }

    /// Position of the adapter in enumeration order
    pub const fn adapter_index(&self) -> usize {
        self.adapter_index
    }

    /// Properties of the chosen adapter
    pub const fn properties(&self) -> &AdapterProperties {
        &self.properties
    }

    /// Queue family used for graphics
    pub const fn graphics_family(&self) -> u32 {
        self.graphics_family
    }

    /// Queue family used for presentation
    pub const fn present_family(&self) -> u32 {
        self.present_family
    }

    /// True when one family serves both graphics and presentation
    pub const fn shares_queue_family(&self) -> bool {
        self.graphics_family == self.present_family
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn family(index: u32, capabilities: QueueCapabilities) -> QueueFamily {
        QueueFamily { index, queue_count: 1, capabilities }
    }

    #[test]
    fn test_api_version_unpacks() {
        let version = ApiVersion::from_packed(vk::make_api_version(0, 1, 3, 250));
        assert_eq!(version, ApiVersion::new(1, 3, 250));
        assert_eq!(version.to_string(), "1.3.250");
        assert!(version > ApiVersion::V1_1);
    }

    #[test]
    fn test_queue_flags_never_imply_present() {
        let all = vk::QueueFlags::GRAPHICS
            | vk::QueueFlags::COMPUTE
            | vk::QueueFlags::TRANSFER
            | vk::QueueFlags::SPARSE_BINDING;
        let capabilities = QueueCapabilities::from_queue_flags(all);

        assert!(capabilities
            .contains(QueueCapabilities::GRAPHICS | QueueCapabilities::SPARSE_BINDING));
        assert!(!capabilities.contains(QueueCapabilities::PRESENT));
    }

    #[test]
    fn test_capability_tags() {
        let capabilities = QueueCapabilities::GRAPHICS
            | QueueCapabilities::TRANSFER
            | QueueCapabilities::PRESENT;
        assert_eq!(capabilities.to_string(), "gfx xfer present");
        assert_eq!(QueueCapabilities::empty().to_string(), "none");
    }

    #[test]
    fn test_properties_from_vulkan() {
        let mut raw = vk::PhysicalDeviceProperties {
            api_version: vk::make_api_version(0, 1, 2, 0),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            vendor_id: 0x10de,
            ..Default::default()
        };
        raw.limits.max_image_dimension2_d = 16384;
        for (slot, byte) in raw.device_name.iter_mut().zip(b"Test GPU".iter()) {
            *slot = *byte as std::os::raw::c_char;
        }

        let properties = AdapterProperties::from(&raw);
        assert_eq!(properties.name, "Test GPU");
        assert_eq!(properties.adapter_type, AdapterType::Discrete);
        assert_eq!(properties.api_version, ApiVersion::new(1, 2, 0));
        assert_eq!(properties.limits.max_image_dimension_2d, 16384);
    }

    #[test]
    fn test_selected_adapter_rejects_missing_family() {
        let families = [family(0, QueueCapabilities::GRAPHICS | QueueCapabilities::PRESENT)];
        let adapter = vk::PhysicalDevice::from_raw(1);

        let properties = AdapterProperties::default;

        assert!(SelectedAdapter::new(adapter, 0, properties(), &families, 0, 1).is_none());
        assert!(SelectedAdapter::new(adapter, 0, properties(), &[], 0, 0).is_none());

        let selected = SelectedAdapter::new(adapter, 0, properties(), &families, 0, 0)
            .expect("family 0 exists");
        assert!(selected.shares_queue_family());
    }
}
