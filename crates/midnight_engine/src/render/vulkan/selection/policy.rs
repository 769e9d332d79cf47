//! Adapter selection policies
//!
//! A policy judges one adapter from its [`AdapterProperties`] alone. It is
//! consulted only after the adapter has shown usable graphics and
//! presentation queue families, so device preference stays independent of
//! queue topology.

use super::capabilities::{AdapterProperties, AdapterType, ApiVersion};

/// Pluggable adapter-acceptance predicate
///
/// The negotiation engine asks the policy about one adapter at a time, in
/// enumeration order, and stops at the first one it accepts. A policy only
/// expresses preference about the device itself; queue topology has already
/// been checked by the time it is consulted.
///
/// # Contract
/// - **Pure**: the same properties must always give the same answer, so
///   negotiation stays deterministic
/// - **Properties only**: no queue family data is passed in
/// - **Describable**: `describe` is shown in rejection diagnostics and
///   should read as a short phrase
///
/// # Example
/// ```
/// use midnight_engine::render::vulkan::selection::{
///     AdapterProperties, AdapterType, SelectionPolicy,
/// };
///
/// struct NoSoftware;
///
/// impl SelectionPolicy for NoSoftware {
///     fn describe(&self) -> String {
///         "not a CPU rasterizer".to_string()
///     }
///
///     fn is_suitable(&self, properties: &AdapterProperties) -> bool {
///         properties.adapter_type != AdapterType::Cpu
///     }
/// }
/// ```
pub trait SelectionPolicy {
    /// Human-readable description for diagnostics
    ///
    /// Appears as `rejected by selection policy (<description>)` when the
    /// policy turns an adapter down.
    fn describe(&self) -> String;

    /// Whether the adapter is acceptable
    ///
    /// Only called for adapters that already have a graphics family and a
    /// presentation family.
    fn is_suitable(&self, properties: &AdapterProperties) -> bool;
}

impl<P: SelectionPolicy + ?Sized> SelectionPolicy for Box<P> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn is_suitable(&self, properties: &AdapterProperties) -> bool {
        (**self).is_suitable(properties)
    }
}

/// Accepts every adapter, so the first usable one wins
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAny;

impl SelectionPolicy for AcceptAny {
    fn describe(&self) -> String {
        "anything is fine".to_string()
    }

    fn is_suitable(&self, _properties: &AdapterProperties) -> bool {
        true
    }
}

/// Accepts only adapters of the listed kinds
#[derive(Debug, Clone)]
pub struct RequireAdapterType {
    allowed: Vec<AdapterType>,
}

impl RequireAdapterType {
    /// Create a policy accepting any of `allowed`
    pub fn new(allowed: impl Into<Vec<AdapterType>>) -> Self {
        Self { allowed: allowed.into() }
    }

    /// Only dedicated GPUs
    pub fn discrete() -> Self {
        Self::new([AdapterType::Discrete])
    }
}

impl SelectionPolicy for RequireAdapterType {
    fn describe(&self) -> String {
        let kinds: Vec<String> = self.allowed.iter().map(ToString::to_string).collect();
        format!("adapter type is one of [{}]", kinds.join(", "))
    }

    fn is_suitable(&self, properties: &AdapterProperties) -> bool {
        self.allowed.contains(&properties.adapter_type)
    }
}

/// Rejects adapters reporting an API version below the minimum
#[derive(Debug, Clone, Copy)]
pub struct MinimumApiVersion(pub ApiVersion);

impl SelectionPolicy for MinimumApiVersion {
    fn describe(&self) -> String {
        format!("API version at least {}", self.0)
    }

    fn is_suitable(&self, properties: &AdapterProperties) -> bool {
        // Variant and patch level are not meaningful for this comparison
        (properties.api_version.major, properties.api_version.minor) >= (self.0.major, self.0.minor)
    }
}

/// Case-insensitive substring match on the adapter name
///
/// The pattern is reported as configured; only the comparison ignores case.
#[derive(Debug, Clone)]
pub struct NameContains {
    pattern: String,
    folded: String,
}

impl NameContains {
    /// Create a name filter
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let folded = pattern.to_lowercase();
        Self { pattern, folded }
    }

    /// The pattern as given
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl SelectionPolicy for NameContains {
    fn describe(&self) -> String {
        format!("name contains \"{}\"", self.pattern)
    }

    fn is_suitable(&self, properties: &AdapterProperties) -> bool {
        properties.name.to_lowercase().contains(&self.folded)
    }
}

/// Accepts an adapter only if every inner policy does
///
/// An empty list accepts everything.
#[derive(Default)]
pub struct AllOf {
    policies: Vec<Box<dyn SelectionPolicy>>,
}

impl AllOf {
    /// Combine policies
    pub fn new(policies: Vec<Box<dyn SelectionPolicy>>) -> Self {
        Self { policies }
    }

    /// Add one more requirement
    #[must_use]
    pub fn and(mut self, policy: impl SelectionPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }
}

impl SelectionPolicy for AllOf {
    fn describe(&self) -> String {
        if self.policies.is_empty() {
            return AcceptAny.describe();
        }
        let parts: Vec<String> = self.policies.iter().map(|policy| policy.describe()).collect();
        parts.join(" and ")
    }

    fn is_suitable(&self, properties: &AdapterProperties) -> bool {
        self.policies.iter().all(|policy| policy.is_suitable(properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(
        name: &str,
        adapter_type: AdapterType,
        api_version: ApiVersion,
    ) -> AdapterProperties {
        AdapterProperties {
            name: name.to_string(),
            adapter_type,
            api_version,
            ..Default::default()
        }
    }

    #[test]
    fn test_accept_any() {
        let policy = AcceptAny;
        assert_eq!(policy.describe(), "anything is fine");
        assert!(policy.is_suitable(&AdapterProperties::default()));
    }

    #[test]
    fn test_require_adapter_type() {
        let policy = RequireAdapterType::discrete();
        assert!(policy.is_suitable(&adapter("A", AdapterType::Discrete, ApiVersion::V1_0)));
        assert!(!policy.is_suitable(&adapter("B", AdapterType::Integrated, ApiVersion::V1_0)));
        assert_eq!(policy.describe(), "adapter type is one of [discrete]");
    }

    #[test]
    fn test_minimum_api_version_ignores_patch() {
        let policy = MinimumApiVersion(ApiVersion::new(1, 1, 100));
        assert!(policy.is_suitable(&adapter("A", AdapterType::Other, ApiVersion::new(1, 1, 0))));
        assert!(policy.is_suitable(&adapter("A", AdapterType::Other, ApiVersion::new(1, 3, 0))));
        assert!(!policy.is_suitable(&adapter("A", AdapterType::Other, ApiVersion::new(1, 0, 300))));
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let policy = NameContains::new("GeForce");
        let geforce = adapter("NVIDIA GEFORCE RTX", AdapterType::Discrete, ApiVersion::V1_1);
        assert!(policy.is_suitable(&geforce));
        assert!(!policy.is_suitable(&adapter("llvmpipe", AdapterType::Cpu, ApiVersion::V1_1)));
    }

    #[test]
    fn test_name_contains_describes_pattern_as_given() {
        let policy = NameContains::new("GeForce");
        assert_eq!(policy.pattern(), "GeForce");
        assert_eq!(policy.describe(), "name contains \"GeForce\"");
    }

    #[test]
    fn test_all_of_requires_every_policy() {
        let policy = AllOf::default()
            .and(RequireAdapterType::discrete())
            .and(MinimumApiVersion(ApiVersion::V1_1));

        assert!(policy.is_suitable(&adapter("A", AdapterType::Discrete, ApiVersion::new(1, 2, 0))));
        assert!(!policy.is_suitable(&adapter("A", AdapterType::Discrete, ApiVersion::V1_0)));
        let integrated = adapter("A", AdapterType::Integrated, ApiVersion::new(1, 2, 0));
        assert!(!policy.is_suitable(&integrated));
        assert_eq!(
            policy.describe(),
            "adapter type is one of [discrete] and API version at least 1.1.0"
        );
        assert_eq!(AllOf::default().describe(), "anything is fine");
    }
}
