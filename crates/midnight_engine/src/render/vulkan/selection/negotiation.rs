//! Adapter negotiation
//!
//! Single pass over the adapters in native enumeration order. The first
//! adapter that has a graphics queue family, a presentation queue family and
//! the policy's approval wins. There is no scoring: a later adapter is never
//! preferred over an earlier acceptable one.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::adapter_source::AdapterSource;
use super::capabilities::{QueueFamily, SelectedAdapter};
use super::classifier::classify_queue_families;
use super::diagnostics::{DiagnosticSink, NegotiationEvent};
use super::policy::{AcceptAny, SelectionPolicy};
use crate::render::vulkan::error::{NegotiationError, NegotiationResult};

/// Where a presentation queue family may be looked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentSearch {
    /// Only graphics-capable families are considered for presentation
    #[default]
    GraphicsFamiliesOnly,
    /// Prefer a graphics family that presents, else accept any family that
    /// presents, even one without graphics
    AnyFamily,
}

/// Why an adapter was disqualified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// No queue family supports graphics
    NoGraphicsQueue,
    /// No eligible queue family can present to the surface
    NoPresentationQueue,
    /// The selection policy turned the adapter down
    PolicyRejected {
        /// Description of the policy that rejected it
        policy: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGraphicsQueue => f.write_str("no gfx queues found"),
            Self::NoPresentationQueue => f.write_str("no presentation queues found"),
            Self::PolicyRejected { policy } => {
                write!(f, "rejected by selection policy ({})", policy)
            }
        }
    }
}

/// Disqualification record for one adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRejection {
    /// Position in enumeration order
    pub adapter_index: usize,
    /// Driver-reported device name
    pub adapter_name: String,
    /// What was missing
    pub reason: RejectionReason,
}

impl fmt::Display for AdapterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device #{} ({}) not usable: {}",
            self.adapter_index, self.adapter_name, self.reason
        )
    }
}

/// Graphics and presentation family chosen on one adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAssignment {
    /// Graphics queue family index
    pub graphics_family: u32,
    /// Presentation queue family index
    pub present_family: u32,
}

/// Pick the graphics and presentation families of one adapter
///
/// The graphics family is the first family with graphics support. If it can
/// also present it is reused for presentation; otherwise the next graphics
/// family that presents is used. `PresentSearch::AnyFamily` additionally
/// falls back to the first presenting family of any kind.
///
/// Both returned indices are always taken from `families`.
pub fn find_queue_assignment(
    families: &[QueueFamily],
    present_search: PresentSearch,
) -> Result<QueueAssignment, RejectionReason> {
    let mut graphics_family = None;
    let mut present_family = None;

    for family in families.iter().filter(|family| family.supports_graphics()) {
        if graphics_family.is_none() {
            graphics_family = Some(family.index);
        }
        if present_family.is_none() && family.supports_presentation() {
            present_family = Some(family.index);
        }
        if graphics_family.is_some() && present_family.is_some() {
            break;
        }
    }

    let graphics_family = graphics_family.ok_or(RejectionReason::NoGraphicsQueue)?;

    let present_family = match (present_family, present_search) {
        (Some(index), _) => index,
        (None, PresentSearch::GraphicsFamiliesOnly) => {
            return Err(RejectionReason::NoPresentationQueue)
        }
        (None, PresentSearch::AnyFamily) => families
            .iter()
            .find(|family| family.supports_presentation())
            .map(|family| family.index)
            .ok_or(RejectionReason::NoPresentationQueue)?,
    };

    Ok(QueueAssignment { graphics_family, present_family })
}

/// Chooses one adapter and its queue families
///
/// The engine owns the selection policy and the presentation search mode.
/// It holds no state between runs: every call to
/// [`negotiate`](Self::negotiate) enumerates and classifies from scratch.
pub struct NegotiationEngine {
    policy: Box<dyn SelectionPolicy>,
    present_search: PresentSearch,
}

impl Default for NegotiationEngine {
    fn default() -> Self {
        Self::new(AcceptAny)
    }
}

impl NegotiationEngine {
    /// Create an engine using `policy`
    pub fn new(policy: impl SelectionPolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
            present_search: PresentSearch::default(),
        }
    }

    /// Change where presentation families may be found
    #[must_use]
    pub const fn with_present_search(mut self, present_search: PresentSearch) -> Self {
        self.present_search = present_search;
        self
    }

    /// Active policy
    pub fn policy(&self) -> &dyn SelectionPolicy {
        self.policy.as_ref()
    }

    /// Active presentation search mode
    pub const fn present_search(&self) -> PresentSearch {
        self.present_search
    }

    /// Enumerate adapters from `source` and select one
    ///
    /// Adapters are visited in the order `source` lists them. For each one
    /// the queue families are classified and reported to `sink`, then:
    ///
    /// 1. no graphics family rejects it with "no gfx queues found"
    /// 2. no usable presentation family rejects it with "no presentation
    ///    queues found"
    /// 3. the policy may still reject it
    /// 4. otherwise it is selected and the remaining adapters are not
    ///    inspected
    ///
    /// # Errors
    /// - [`NegotiationError::AdapterEnumerationFailed`] when the adapter list
    ///   itself cannot be read; nothing is sent to `sink` in that case
    /// - [`NegotiationError::NoSuitableAdapter`] when every adapter was
    ///   rejected, carrying one rejection per adapter in enumeration order.
    ///   Zero adapters ends here too, with an empty list.
    ///
    /// The sink only observes; it never changes the outcome.
    pub fn negotiate<A>(
        &self,
        source: &A,
        sink: &mut dyn DiagnosticSink,
    ) -> NegotiationResult<SelectedAdapter>
    where
        A: AdapterSource + ?Sized,
    {
        let adapters = source
            .enumerate_adapters()
            .map_err(NegotiationError::AdapterEnumerationFailed)?;

        sink.record(NegotiationEvent::NegotiationStarted {
            policy: self.policy.describe(),
            adapter_count: adapters.len(),
        });

        let mut rejections = Vec::new();

        for (adapter_index, &adapter) in adapters.iter().enumerate() {
            let properties = source.adapter_properties(adapter);
            sink.record(NegotiationEvent::AdapterDetected {
                adapter_index,
                properties: properties.clone(),
            });

            let families = classify_queue_families(source, adapter);
            for family in &families {
                sink.record(NegotiationEvent::QueueFamilyDetected {
                    adapter_index,
                    family: *family,
                });
            }

            let verdict = find_queue_assignment(&families, self.present_search)
                .and_then(|assignment| {
                    if self.policy.is_suitable(&properties) {
                        Ok(assignment)
                    } else {
                        Err(RejectionReason::PolicyRejected {
                            policy: self.policy.describe(),
                        })
                    }
                });

            match verdict {
                Ok(assignment) => {
                    sink.record(NegotiationEvent::AdapterSelected {
                        adapter_index,
                        graphics_family: assignment.graphics_family,
                        present_family: assignment.present_family,
                    });
                    return Ok(SelectedAdapter::from_assignment(
                        adapter,
                        adapter_index,
                        properties,
                        assignment.graphics_family,
                        assignment.present_family,
                    ));
                }
                Err(reason) => {
                    let rejection = AdapterRejection {
                        adapter_index,
                        adapter_name: properties.name,
                        reason,
                    };
                    sink.record(NegotiationEvent::AdapterRejected(rejection.clone()));
                    rejections.push(rejection);
                }
            }
        }

        Err(NegotiationError::NoSuitableAdapter { rejections })
    }
}
