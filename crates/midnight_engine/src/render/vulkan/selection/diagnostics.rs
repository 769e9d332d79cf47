//! Negotiation diagnostics
//!
//! The engine reports what it sees and decides through a [`DiagnosticSink`].
//! Records are advisory; nothing reads them back to make decisions.

use std::fmt;

use super::capabilities::{AdapterProperties, QueueFamily};
use super::negotiation::AdapterRejection;

/// One diagnostic record emitted during negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationEvent {
    /// Enumeration finished and the scan is about to start
    NegotiationStarted {
        /// Description of the active policy
        policy: String,
        /// Number of adapters enumerated
        adapter_count: usize,
    },
    /// An adapter's properties were queried
    AdapterDetected {
        /// Position in enumeration order
        adapter_index: usize,
        /// Queried properties
        properties: AdapterProperties,
    },
    /// A queue family was classified
    QueueFamilyDetected {
        /// Owning adapter
        adapter_index: usize,
        /// Classified family
        family: QueueFamily,
    },
    /// An adapter was disqualified
    AdapterRejected(AdapterRejection),
    /// An adapter won
    AdapterSelected {
        /// Position in enumeration order
        adapter_index: usize,
        /// Graphics queue family
        graphics_family: u32,
        /// Presentation queue family
        present_family: u32,
    },
}

impl fmt::Display for NegotiationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegotiationStarted { policy, adapter_count } => write!(
                f,
                "choosing GPU device ({}) among {} physical device(s)",
                policy, adapter_count
            ),
            Self::AdapterDetected { adapter_index, properties } => write!(
                f,
                "device #{}: {} ({}), API {}, max image dimensions (1D, 2D, 3D): {}, {}, {}",
                adapter_index,
                properties.name,
                properties.adapter_type,
                properties.api_version,
                properties.limits.max_image_dimension_1d,
                properties.limits.max_image_dimension_2d,
                properties.limits.max_image_dimension_3d,
            ),
            Self::QueueFamilyDetected { adapter_index, family } => write!(
                f,
                "device #{} queue family #{} ({} queues available): {}",
                adapter_index, family.index, family.queue_count, family.capabilities
            ),
            Self::AdapterRejected(rejection) => write!(f, "{}", rejection),
            Self::AdapterSelected { adapter_index, graphics_family, present_family } => write!(
                f,
                "device #{} selected: queue family #{} for graphics, #{} for presentation",
                adapter_index, graphics_family, present_family
            ),
        }
    }
}

/// Receiver for negotiation diagnostics
pub trait DiagnosticSink {
    /// Record one event
    fn record(&mut self, event: NegotiationEvent);
}

const LOG_TARGET: &str = "midnight::negotiation";

/// Forwards every event to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&mut self, event: NegotiationEvent) {
        match event {
            NegotiationEvent::QueueFamilyDetected { .. } => {
                log::debug!(target: LOG_TARGET, "{}", event);
            }
            NegotiationEvent::AdapterRejected(_) => log::warn!(target: LOG_TARGET, "{}", event),
            _ => log::info!(target: LOG_TARGET, "{}", event),
        }
    }
}

/// Keeps events in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<NegotiationEvent>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn events(&self) -> &[NegotiationEvent] {
        &self.events
    }

    /// Recorded events rendered as text lines
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, event: NegotiationEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::vulkan::selection::capabilities::{
        ApiVersion, ImageLimits, QueueCapabilities,
    };

    #[test]
    fn test_adapter_line() {
        let event = NegotiationEvent::AdapterDetected {
            adapter_index: 1,
            properties: AdapterProperties {
                name: "Radeon".to_string(),
                api_version: ApiVersion::new(1, 2, 170),
                limits: ImageLimits {
                    max_image_dimension_1d: 16384,
                    max_image_dimension_2d: 16384,
                    max_image_dimension_3d: 2048,
                },
                ..Default::default()
            },
        };

        assert_eq!(
            event.to_string(),
            concat!(
                "device #1: Radeon (other), API 1.2.170, ",
                "max image dimensions (1D, 2D, 3D): 16384, 16384, 2048"
            )
        );
    }

    #[test]
    fn test_queue_family_line() {
        let event = NegotiationEvent::QueueFamilyDetected {
            adapter_index: 0,
            family: QueueFamily {
                index: 2,
                queue_count: 4,
                capabilities: QueueCapabilities::COMPUTE | QueueCapabilities::PRESENT,
            },
        };

        assert_eq!(
            event.to_string(),
            "device #0 queue family #2 (4 queues available): compute present"
        );
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.record(NegotiationEvent::NegotiationStarted {
            policy: "p".to_string(),
            adapter_count: 0,
        });
        sink.record(NegotiationEvent::AdapterSelected {
            adapter_index: 0,
            graphics_family: 0,
            present_family: 1,
        });

        assert_eq!(sink.events().len(), 2);
        assert_eq!(
            sink.lines()[1],
            "device #0 selected: queue family #0 for graphics, #1 for presentation"
        );
    }
}
