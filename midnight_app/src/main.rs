//! Midnight Jewels startup
//!
//! Opens the main window, negotiates a GPU and then waits for the window to
//! be closed (or Escape to be pressed).
//!
//! Usage: `midnight [config.toml|config.ron]`

use glfw::{Action, Key, WindowEvent};
use midnight_engine::foundation::logging;
use midnight_engine::prelude::*;

fn load_config() -> Result<BootstrapConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            BootstrapConfig::load_from_file(&path)?
        }
        None => BootstrapConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = load_config()?;
    let mut windows = GlfwSystem::init()?;

    let mut context = match VulkanContext::new(&mut windows, &config) {
        Ok(context) => context,
        Err(NegotiationError::NoSuitableAdapter { rejections }) => {
            for rejection in &rejections {
                log::error!("{}", rejection);
            }
            return Err(NegotiationError::NoSuitableAdapter { rejections }.into());
        }
        Err(e) => return Err(e.into()),
    };

    let selected = context.selected_adapter();
    log::info!(
        "Using {} ({}, API {}) with queue family #{} for graphics and #{} for presentation",
        selected.properties().name,
        selected.properties().adapter_type,
        selected.properties().api_version,
        selected.graphics_family(),
        selected.present_family()
    );

    let (width, height) = context.window().framebuffer_size();
    log::info!("Framebuffer is {}x{} pixels", width, height);

    while !context.window().should_close() {
        context.window_mut().wait_events();

        let mut escape_pressed = false;
        for (_, event) in context.window().flush_events() {
            match event {
                WindowEvent::Key(Key::Escape, _, Action::Press, _) => escape_pressed = true,
                WindowEvent::FramebufferSize(..) => {
                    let (width, height) = context.window().framebuffer_size();
                    log::debug!("Framebuffer resized to {}x{}", width, height);
                }
                _ => {}
            }
        }

        if escape_pressed {
            context.window_mut().set_should_close(true);
        }
    }

    log::info!("Shutting down");
    Ok(())
}
