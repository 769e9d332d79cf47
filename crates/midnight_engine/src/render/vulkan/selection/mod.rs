//! Adapter and queue family selection
//!
//! Enumeration, queue family classification, selection policies and the
//! negotiation engine that ties them together. Everything here works against
//! the [`AdapterSource`] trait, so it runs without a GPU in tests.

pub mod adapter_source;
pub mod capabilities;
pub mod classifier;
pub mod diagnostics;
pub mod negotiation;
pub mod policy;

pub use adapter_source::{AdapterSource, VulkanAdapterSource};
pub use capabilities::{
    AdapterProperties, AdapterType, ApiVersion, ImageLimits, QueueCapabilities, QueueFamily,
    SelectedAdapter,
};
pub use classifier::classify_queue_families;
pub use diagnostics::{DiagnosticSink, LogSink, NegotiationEvent, RecordingSink};
pub use negotiation::{
    find_queue_assignment, AdapterRejection, NegotiationEngine, PresentSearch, QueueAssignment,
    RejectionReason,
};
pub use policy::{
    AcceptAny, AllOf, MinimumApiVersion, NameContains, RequireAdapterType, SelectionPolicy,
};
