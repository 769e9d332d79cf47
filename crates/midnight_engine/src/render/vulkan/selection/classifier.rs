//! Queue family classification

use ash::vk;

use super::adapter_source::AdapterSource;
use super::capabilities::{QueueCapabilities, QueueFamily};

/// Describe every queue family of `adapter`, in native order
///
/// Intrinsic capabilities come from the queue flags. Presentation comes from a
/// separate surface-support query per family; if that query fails the family
/// is treated as unable to present. If the backend will not report queue
/// families at all the adapter gets an empty list and is disqualified by the
/// caller.
pub fn classify_queue_families<A>(source: &A, adapter: vk::PhysicalDevice) -> Vec<QueueFamily>
where
    A: AdapterSource + ?Sized,
{
    let raw_families = match source.queue_family_properties(adapter) {
        Ok(families) => families,
        Err(e) => {
            log::warn!("Could not query queue families of {:?}: {:?}", adapter, e);
            return Vec::new();
        }
    };

    raw_families
        .iter()
        .zip(0u32..)
        .map(|(raw, index)| {
            let mut capabilities = QueueCapabilities::from_queue_flags(raw.queue_flags);

            match source.supports_present(adapter, index) {
                Ok(true) => capabilities.insert(QueueCapabilities::PRESENT),
                Ok(false) => {}
                Err(e) => log::warn!(
                    "Present support query failed for queue family #{}: {:?}",
                    index,
                    e
                ),
            }

            QueueFamily {
                index,
                queue_count: raw.queue_count,
                capabilities,
            }
        })
        .collect()
}
