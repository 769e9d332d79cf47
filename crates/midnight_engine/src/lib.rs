//! # Midnight Engine
//!
//! Vulkan bootstrap for the Midnight renderer: opens a window, creates the
//! Vulkan instance it needs, and negotiates which GPU and queue families the
//! renderer will use.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use midnight_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     midnight_engine::foundation::logging::init();
//!
//!     let config = BootstrapConfig::new("My App");
//!     let mut windows = GlfwSystem::init()?;
//!     let context = VulkanContext::new(&mut windows, &config)?;
//!
//!     println!("rendering on {}", context.selected_adapter().properties().name);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{BootstrapConfig, Config, ConfigError, PolicyConfig, WindowConfig},
        render::{
            vulkan::{
                selection::{
                    AcceptAny, AdapterProperties, AdapterType, ApiVersion, MinimumApiVersion,
                    NameContains, PresentSearch, RequireAdapterType, SelectedAdapter,
                    SelectionPolicy,
                },
                GlfwSystem, NegotiationError, NegotiationResult, VulkanContext, Window,
            },
            window::{DrawableSurface, WindowError, WindowSystem},
        },
    };
}
