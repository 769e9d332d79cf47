//! Vulkan instance creation
//!
//! Loads the Vulkan entry points and creates the instance with the
//! extensions the window surface needs. In debug builds with validation on,
//! validation messages are routed into `log`.

use ash::{Entry, Instance};
#[cfg(debug_assertions)]
use ash::extensions::ext::DebugUtils;
use ash::vk;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::config::BootstrapConfig;
use crate::render::vulkan::error::{NegotiationError, NegotiationResult};

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";
const ENGINE_NAME: &str = "Midnight";

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    /// Vulkan entry point
    pub entry: Entry,
    /// Vulkan instance handle
    pub instance: Instance,
    /// Instance extensions that were enabled
    enabled_extensions: Vec<String>,
    /// Debug utilities extension (debug builds)
    #[cfg(debug_assertions)]
    debug_utils: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Create an instance enabling `required_extensions`
    pub fn new(
        config: &BootstrapConfig,
        required_extensions: &[String],
    ) -> NegotiationResult<Self> {
        let entry = unsafe { Entry::load() }.map_err(|e| {
            NegotiationError::ConnectionCreationFailed(format!("Failed to load Vulkan: {}", e))
        })?;

        let app_name_cstr = to_cstring(&config.application_name)?;
        let engine_name_cstr = to_cstring(ENGINE_NAME)?;
        let (major, minor, patch) = config.application_version;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name_cstr)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(&engine_name_cstr)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(config.requested_api_version().to_packed());

        #[allow(unused_mut)] // Debug builds append the debug-utils extension
        let mut enabled_extensions = required_extensions.to_vec();
        let validation = config.validation_enabled() && Self::validation_layer_available(&entry);

        #[cfg(debug_assertions)]
        if validation {
            enabled_extensions.push(DebugUtils::name().to_string_lossy().into_owned());
        }

        let cstr_extensions = enabled_extensions
            .iter()
            .map(|ext| to_cstring(ext))
            .collect::<NegotiationResult<Vec<CString>>>()?;
        let extension_ptrs: Vec<*const c_char> =
            cstr_extensions.iter().map(|ext| ext.as_ptr()).collect();

        let layer_names = if validation {
            vec![to_cstring(VALIDATION_LAYER)?]
        } else {
            Vec::new()
        };
        let layer_ptrs: Vec<*const c_char> = layer_names.iter().map(|name| name.as_ptr()).collect();

        for ext in &enabled_extensions {
            log::info!("Requesting instance extension {}", ext);
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None) }.map_err(|e| {
            let reason = match e {
                vk::Result::ERROR_INCOMPATIBLE_DRIVER => {
                    "cannot find a compatible Vulkan ICD".to_string()
                }
                vk::Result::ERROR_EXTENSION_NOT_PRESENT => {
                    "a required extension is not present".to_string()
                }
                other => format!("vkCreateInstance() failed: {:?}", other),
            };
            NegotiationError::ConnectionCreationFailed(reason)
        })?;

        log::info!("Vulkan instance created (API {})", config.requested_api_version());

        #[cfg(debug_assertions)]
        let debug_utils = if validation {
            let debug_utils = DebugUtils::new(&entry, &instance);
            match Self::setup_debug_messenger(&debug_utils) {
                Ok(messenger) => Some((debug_utils, messenger)),
                Err(e) => {
                    log::warn!("Debug messenger unavailable: {:?}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            entry,
            instance,
            enabled_extensions,
            #[cfg(debug_assertions)]
            debug_utils,
        })
    }

    /// Raw instance handle
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }

    /// Extensions enabled on this instance
    pub fn enabled_extensions(&self) -> &[String] {
        &self.enabled_extensions
    }

    fn validation_layer_available(entry: &Entry) -> bool {
        #[allow(unused_unsafe)]
        let layers = match unsafe { entry.enumerate_instance_layer_properties() } {
            Ok(layers) => layers,
            Err(e) => {
                log::warn!("Could not list instance layers: {:?}", e);
                return false;
            }
        };

        let available = layers.iter().any(|layer| {
            let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
            name.to_str() == Ok(VALIDATION_LAYER)
        });

        if !available {
            log::warn!(
                "{} requested but not installed; continuing without validation",
                VALIDATION_LAYER
            );
        }
        available
    }

    #[cfg(debug_assertions)]
    fn setup_debug_messenger(
        debug_utils: &DebugUtils,
    ) -> ash::prelude::VkResult<vk::DebugUtilsMessengerEXT> {
        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(debug_callback));

        unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            #[cfg(debug_assertions)]
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
        log::debug!("Vulkan instance destroyed");
    }
}

fn to_cstring(value: &str) -> NegotiationResult<CString> {
    CString::new(value).map_err(|_| {
        NegotiationError::ConnectionCreationFailed(format!(
            "String contains an interior NUL byte: {:?}",
            value
        ))
    })
}

/// Debug callback for validation layers
#[cfg(debug_assertions)]
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let callback_data = *callback_data;
    let message = CStr::from_ptr(callback_data.p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}
