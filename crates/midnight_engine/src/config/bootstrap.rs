//! Vulkan bootstrap configuration
//!
//! Everything the context needs before it can negotiate an adapter: names
//! and versions for the instance, the startup window, validation, and which
//! selection policy to apply.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::vulkan::selection::{
    AcceptAny, AdapterType, AllOf, ApiVersion, MinimumApiVersion, NameContains, PresentSearch,
    RequireAdapterType, SelectionPolicy,
};

/// Startup window parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in screen coordinates
    pub width: u32,
    /// Height in screen coordinates
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Midnight Jewels".to_string(),
            width: 1024,
            height: 1024,
        }
    }
}

/// Serializable description of a [`SelectionPolicy`]
///
/// Externally tagged, so the same shape reads back from both formats:
///
/// ```toml
/// [policy.all_of]
/// policies = [
///     { adapter_type = { allowed = ["discrete"] } },
///     { minimum_api_version = { major = 1, minor = 2 } },
/// ]
/// ```
///
/// ```ron
/// policy: all_of(policies: [adapter_type(allowed: [discrete])])
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Accept the first usable adapter
    #[default]
    AcceptAny,
    /// Accept only the listed adapter kinds
    AdapterType {
        /// Allowed kinds
        allowed: Vec<AdapterType>,
    },
    /// Require at least this API version
    MinimumApiVersion {
        /// Major version
        major: u32,
        /// Minor version
        minor: u32,
    },
    /// Case-insensitive adapter name filter
    NameContains {
        /// Substring to look for
        pattern: String,
    },
    /// Every listed policy must accept
    AllOf {
        /// Combined policies
        policies: Vec<PolicyConfig>,
    },
}

impl PolicyConfig {
    /// Build the policy this entry describes
    pub fn build(&self) -> Box<dyn SelectionPolicy> {
        match self {
            Self::AcceptAny => Box::new(AcceptAny),
            Self::AdapterType { allowed } => Box::new(RequireAdapterType::new(allowed.clone())),
            Self::MinimumApiVersion { major, minor } => {
                Box::new(MinimumApiVersion(ApiVersion::new(*major, *minor, 0)))
            }
            Self::NameContains { pattern } => Box::new(NameContains::new(pattern.clone())),
            Self::AllOf { policies } => {
                Box::new(AllOf::new(policies.iter().map(Self::build).collect()))
            }
        }
    }
}

/// Configuration for creating the Vulkan context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Vulkan API version requested from the instance (major, minor)
    pub api_version: (u32, u32),
    /// Startup window
    pub window: WindowConfig,
    /// Whether to enable validation layers (auto-detected when unset)
    pub enable_validation: Option<bool>,
    /// Where presentation queue families may be found
    pub present_search: PresentSearch,
    /// Adapter selection policy
    pub policy: PolicyConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            application_name: "Midnight Jewels".to_string(),
            application_version: (1, 0, 0),
            api_version: (1, 1),
            window: WindowConfig::default(),
            enable_validation: None,
            present_search: PresentSearch::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl Config for BootstrapConfig {}

impl BootstrapConfig {
    /// Create a configuration with the given application name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Set the selection policy
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable validation layers
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Set the startup window
    #[must_use]
    pub fn with_window(mut self, title: impl Into<String>, width: u32, height: u32) -> Self {
        self.window = WindowConfig {
            title: title.into(),
            width,
            height,
        };
        self
    }

    /// Whether validation is on, defaulting to debug builds only
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }

    /// Requested API version
    pub const fn requested_api_version(&self) -> ApiVersion {
        ApiVersion::new(self.api_version.0, self.api_version.1, 0)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid(
                "Application name cannot be empty".to_string(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.api_version.0 == 0 {
            return Err(ConfigError::Invalid("API version must be at least 1.0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::vulkan::selection::AdapterProperties;

    #[test]
    fn test_default_config_is_valid() {
        let config = BootstrapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.requested_api_version(), ApiVersion::V1_1);
        assert_eq!(config.policy.build().describe(), "anything is fine");
    }

    #[test]
    fn test_partial_toml() {
        let config = BootstrapConfig::from_toml_str(
            r#"
            application_name = "Jewels"
            present_search = "any_family"

            [window]
            width = 640

            [policy.adapter_type]
            allowed = ["discrete", "integrated"]
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.application_name, "Jewels");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 1024);
        assert_eq!(config.present_search, PresentSearch::AnyFamily);
        assert_eq!(
            config.policy,
            PolicyConfig::AdapterType {
                allowed: vec![AdapterType::Discrete, AdapterType::Integrated]
            }
        );
    }

    #[test]
    fn test_nested_policy_from_toml() {
        let config = BootstrapConfig::from_toml_str(
            r#"
            [policy.all_of]
            policies = [
                { minimum_api_version = { major = 1, minor = 2 } },
                { name_contains = { pattern = "radeon" } },
            ]
            "#,
        )
        .expect("valid toml");

        let policy = config.policy.build();
        let mut properties = AdapterProperties {
            name: "AMD Radeon Pro".to_string(),
            api_version: ApiVersion::new(1, 3, 0),
            ..Default::default()
        };
        assert!(policy.is_suitable(&properties));

        properties.api_version = ApiVersion::new(1, 1, 0);
        assert!(!policy.is_suitable(&properties));
    }

    #[test]
    fn test_window_from_ron() {
        let config = BootstrapConfig::from_ron_str(
            r#"(
                application_name: "Jewels",
                present_search: any_family,
                window: (title: "Jewels", width: 800, height: 600),
            )"#,
        )
        .expect("valid ron");

        assert_eq!(
            config.window,
            WindowConfig {
                title: "Jewels".to_string(),
                width: 800,
                height: 600
            }
        );
        assert_eq!(config.present_search, PresentSearch::AnyFamily);
        assert_eq!(config.policy, PolicyConfig::AcceptAny);
    }

    #[test]
    fn test_adapter_type_policy_from_ron() {
        let config = BootstrapConfig::from_ron_str(
            r#"(
                policy: all_of(policies: [
                    adapter_type(allowed: [discrete, integrated]),
                    name_contains(pattern: "GeForce"),
                ]),
            )"#,
        )
        .expect("valid ron");

        assert_eq!(
            config.policy,
            PolicyConfig::AllOf {
                policies: vec![
                    PolicyConfig::AdapterType {
                        allowed: vec![AdapterType::Discrete, AdapterType::Integrated]
                    },
                    PolicyConfig::NameContains {
                        pattern: "GeForce".to_string()
                    },
                ]
            }
        );
    }

    fn customized_config() -> BootstrapConfig {
        BootstrapConfig::new("Jewels Test")
            .with_window("Jewels", 800, 600)
            .with_validation(true)
            .with_policy(PolicyConfig::AllOf {
                policies: vec![
                    PolicyConfig::AdapterType {
                        allowed: vec![AdapterType::Discrete],
                    },
                    PolicyConfig::MinimumApiVersion { major: 1, minor: 2 },
                ],
            })
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bootstrap.toml");
        let path = path.to_str().expect("utf-8 temp path");

        let mut config = customized_config();
        config.present_search = PresentSearch::AnyFamily;
        config.save_to_file(path).expect("saved");

        assert_eq!(BootstrapConfig::load_from_file(path).expect("loaded"), config);
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bootstrap.ron");
        let path = path.to_str().expect("utf-8 temp path");

        let config = customized_config();
        config.save_to_file(path).expect("saved");

        let loaded = BootstrapConfig::load_from_file(path).expect("loaded");
        assert_eq!(loaded, config);
        assert!(loaded.policy.build().describe().starts_with("adapter type is one of [discrete]"));
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bootstrap.yaml");
        let result = customized_config().save_to_file(path.to_str().expect("utf-8 temp path"));

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(BootstrapConfig::new("").validate().is_err());
        assert!(BootstrapConfig::new("app").with_window("t", 0, 10).validate().is_err());
        assert!(BootstrapConfig::new("app").with_validation(false).validate().is_ok());
        assert!(!BootstrapConfig::new("app").with_validation(false).validation_enabled());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = BootstrapConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
