//! Vulkan context management
//!
//! [`VulkanContext`] opens the drawable window, creates the instance with the
//! extensions that window needs, binds the surface and negotiates the adapter
//! and queue families used for the rest of the process.
//!
//! Each step either succeeds or aborts construction. Resources are owned by
//! locals until the context is assembled, so a failure part way through only
//! releases what was actually created.

use ash::vk;

use crate::config::BootstrapConfig;
use crate::render::vulkan::error::{NegotiationError, NegotiationResult};
use crate::render::vulkan::initialization::instance::VulkanInstance;
use crate::render::vulkan::initialization::surface::Surface;
use crate::render::vulkan::selection::{
    AdapterSource, DiagnosticSink, LogSink, NegotiationEngine, PresentSearch, SelectedAdapter,
    SelectionPolicy, VulkanAdapterSource,
};
use crate::render::window::{DrawableSurface, WindowSystem};

/// Owns the Vulkan connection, the surface binding and the window
///
/// Fields drop in declaration order: surface binding, then instance, then
/// the window the surface was created from.
pub struct VulkanContext<S: DrawableSurface> {
    selected: SelectedAdapter,
    present_search: PresentSearch,
    surface: Surface,
    instance: VulkanInstance,
    window: S,
}

impl<S: DrawableSurface> VulkanContext<S> {
    /// Create a context using the policy described by `config`
    pub fn new<W>(windows: &mut W, config: &BootstrapConfig) -> NegotiationResult<Self>
    where
        W: WindowSystem<Surface = S>,
    {
        Self::with_policy(windows, config, config.policy.build())
    }

    /// Create a context with an explicit selection policy
    pub fn with_policy<W>(
        windows: &mut W,
        config: &BootstrapConfig,
        policy: impl SelectionPolicy + 'static,
    ) -> NegotiationResult<Self>
    where
        W: WindowSystem<Surface = S>,
    {
        Self::with_policy_and_sink(windows, config, policy, &mut LogSink)
    }

    /// Create a context, sending negotiation diagnostics to `sink`
    ///
    /// Construction runs five steps in a fixed order, and the first failure
    /// aborts it:
    ///
    /// 1. `windows` creates the drawable window
    ///    ([`NegotiationError::SurfaceCreationFailed`])
    /// 2. the window reports its required instance extensions
    ///    ([`NegotiationError::ExtensionQueryFailed`])
    /// 3. the Vulkan entry is loaded and the instance created with those
    ///    extensions, plus debug utilities when validation is on
    ///    ([`NegotiationError::ConnectionCreationFailed`])
    /// 4. the window is bound to the instance as a `VkSurfaceKHR`
    ///    ([`NegotiationError::SurfaceBindingFailed`])
    /// 5. adapters are enumerated and negotiated against `policy`
    ///    ([`NegotiationError::AdapterEnumerationFailed`] or
    ///    [`NegotiationError::NoSuitableAdapter`])
    ///
    /// Until the context is assembled each resource lives in a local, so an
    /// error only releases what earlier steps created, in reverse order.
    pub fn with_policy_and_sink<W>(
        windows: &mut W,
        config: &BootstrapConfig,
        policy: impl SelectionPolicy + 'static,
        sink: &mut dyn DiagnosticSink,
    ) -> NegotiationResult<Self>
    where
        W: WindowSystem<Surface = S>,
    {
        let window_config = &config.window;
        let mut window = windows
            .create_drawable_surface(
                &window_config.title,
                window_config.width,
                window_config.height,
            )
            .map_err(NegotiationError::SurfaceCreationFailed)?;

        let required_extensions = window
            .required_instance_extensions()
            .map_err(NegotiationError::ExtensionQueryFailed)?;

        let instance = VulkanInstance::new(config, &required_extensions)?;

        let raw_surface = window
            .create_vulkan_surface(instance.handle())
            .map_err(|e| NegotiationError::SurfaceBindingFailed(e.to_string()))?;
        let surface = Surface::new(&instance.entry, &instance.instance, raw_surface);
        log::info!("Vulkan surface created");

        let engine = NegotiationEngine::new(policy).with_present_search(config.present_search);
        let source = VulkanAdapterSource::new(&instance.instance, &surface);
        let selected = engine.negotiate(&source, sink)?;

        log::info!(
            "Selected GPU: {} (graphics family #{}, present family #{})",
            selected.properties().name,
            selected.graphics_family(),
            selected.present_family()
        );

        Ok(Self {
            selected,
            present_search: config.present_search,
            surface,
            instance,
            window,
        })
    }

    /// Enumerate and negotiate again against the current surface
    ///
    /// Nothing from the previous run is reused. The stored selection is only
    /// replaced when the new run succeeds.
    pub fn renegotiate(
        &mut self,
        policy: impl SelectionPolicy + 'static,
    ) -> NegotiationResult<&SelectedAdapter> {
        let engine = NegotiationEngine::new(policy).with_present_search(self.present_search);
        let source = VulkanAdapterSource::new(&self.instance.instance, &self.surface);
        replace_selection(&mut self.selected, &engine, &source, &mut LogSink)?;
        Ok(&self.selected)
    }

    /// The negotiated adapter and queue families
    pub const fn selected_adapter(&self) -> &SelectedAdapter {
        &self.selected
    }

    /// Selected physical device handle
    pub const fn physical_device(&self) -> vk::PhysicalDevice {
        self.selected.adapter()
    }

    /// Get the graphics queue family index
    pub const fn graphics_family(&self) -> u32 {
        self.selected.graphics_family()
    }

    /// Get the present queue family index
    pub const fn present_family(&self) -> u32 {
        self.selected.present_family()
    }

    /// Get a reference to the Vulkan instance
    pub const fn instance(&self) -> &ash::Instance {
        &self.instance.instance
    }

    /// Extensions the instance was created with
    pub fn enabled_extensions(&self) -> &[String] {
        self.instance.enabled_extensions()
    }

    /// Get the surface binding
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The window the surface belongs to
    pub const fn window(&self) -> &S {
        &self.window
    }

    /// Mutable access to the window, for event handling
    pub fn window_mut(&mut self) -> &mut S {
        &mut self.window
    }
}

/// Negotiate against `source` and overwrite `selected` only on success
fn replace_selection<A>(
    selected: &mut SelectedAdapter,
    engine: &NegotiationEngine,
    source: &A,
    sink: &mut dyn DiagnosticSink,
) -> NegotiationResult<()>
where
    A: AdapterSource + ?Sized,
{
    *selected = engine.negotiate(source, sink)?;
    Ok(())
}
