//! Context construction failures that happen before any Vulkan object exists

use ash::vk;
use midnight_engine::config::BootstrapConfig;
use midnight_engine::render::vulkan::{NegotiationError, VulkanContext};
use midnight_engine::render::window::{DrawableSurface, WindowError, WindowResult, WindowSystem};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Counters {
    windows_created: Cell<u32>,
    windows_dropped: Cell<u32>,
    surfaces_bound: Cell<u32>,
}

struct FakeWindow {
    counters: Rc<Counters>,
    extensions: Option<Vec<String>>,
}

impl DrawableSurface for FakeWindow {
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.extensions
            .clone()
            .ok_or_else(|| WindowError::GlfwError("no extension list".to_string()))
    }

    fn create_vulkan_surface(&mut self, _instance: vk::Instance) -> WindowResult<vk::SurfaceKHR> {
        self.counters.surfaces_bound.set(self.counters.surfaces_bound.get() + 1);
        Err(WindowError::GlfwError("not a real window".to_string()))
    }
}

impl Drop for FakeWindow {
    fn drop(&mut self) {
        self.counters.windows_dropped.set(self.counters.windows_dropped.get() + 1);
    }
}

struct FakeWindows {
    counters: Rc<Counters>,
    can_create: bool,
    extensions: Option<Vec<String>>,
}

impl FakeWindows {
    fn new(can_create: bool, extensions: Option<Vec<String>>) -> Self {
        Self {
            counters: Rc::new(Counters::default()),
            can_create,
            extensions,
        }
    }
}

impl WindowSystem for FakeWindows {
    type Surface = FakeWindow;

    fn create_drawable_surface(
        &mut self,
        _title: &str,
        _width: u32,
        _height: u32,
    ) -> WindowResult<FakeWindow> {
        if !self.can_create {
            return Err(WindowError::CreationFailed);
        }
        self.counters.windows_created.set(self.counters.windows_created.get() + 1);
        Ok(FakeWindow {
            counters: Rc::clone(&self.counters),
            extensions: self.extensions.clone(),
        })
    }
}

#[test]
fn window_creation_failure_is_reported_first() {
    let mut windows = FakeWindows::new(false, Some(Vec::new()));

    let result = VulkanContext::new(&mut windows, &BootstrapConfig::default());

    assert!(matches!(
        result,
        Err(NegotiationError::SurfaceCreationFailed(WindowError::CreationFailed))
    ));
    assert_eq!(windows.counters.windows_created.get(), 0);
}

#[test]
fn extension_query_failure_releases_only_the_window() {
    let mut windows = FakeWindows::new(true, None);

    let result = VulkanContext::new(&mut windows, &BootstrapConfig::default());

    assert!(matches!(result, Err(NegotiationError::ExtensionQueryFailed(_))));
    // The window was created and released once; no instance existed, so no
    // surface was ever bound to one.
    assert_eq!(windows.counters.windows_created.get(), 1);
    assert_eq!(windows.counters.windows_dropped.get(), 1);
    assert_eq!(windows.counters.surfaces_bound.get(), 0);
}

#[test]
fn error_messages_name_the_failed_step() {
    let mut windows = FakeWindows::new(true, None);
    let err = VulkanContext::new(&mut windows, &BootstrapConfig::default())
        .err()
        .expect("construction must fail");

    assert_eq!(err.to_string(), "Required extension query failed: GLFW error: no extension list");
}
