use serde::{Deserialize, Serialize};

/// Display and feature flags for one Data Commons deployment.
///
/// Built once at startup by layering a deployment's overrides (and the local
/// overlay, when running locally) on top of [`DeploymentConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub custom: bool,
    pub show_topic: bool,
    pub name: String,
    pub logo_path: Option<String>,
    pub override_css_path: Option<String>,
    pub show_disaster: bool,
    pub use_palm: bool,
    pub local: bool,
    pub scheme: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            custom: false,
            show_topic: false,
            name: "Data Commons".to_string(),
            logo_path: None,
            override_css_path: None,
            show_disaster: true,
            use_palm: false,
            local: false,
            scheme: "https".to_string(),
        }
    }
}

/// Partial set of flags; only the fields that are `Some` override a lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_topic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_css_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_disaster: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_palm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl DeploymentOverrides {
    /// UN SDG custom instance.
    pub fn unsdg() -> Self {
        Self {
            custom: Some(true),
            show_topic: Some(true),
            name: Some("Data Commons".to_string()),
            logo_path: Some("/custom_dc/unsdg/logo.png".to_string()),
            override_css_path: Some("/custom_dc/unsdg/overrides.css".to_string()),
            show_disaster: Some(false),
            use_palm: Some(true),
            ..Self::default()
        }
    }

    /// Overlay applied on top of any deployment when serving from a dev machine.
    pub fn local() -> Self {
        Self {
            local: Some(true),
            scheme: Some("http".to_string()),
            ..Self::default()
        }
    }

    pub fn for_deployment(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "base" => Some(Self::default()),
            "unsdg" => Some(Self::unsdg()),
            _ => None,
        }
    }
}
