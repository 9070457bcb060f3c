//! Service configuration, layered with figment:
//! built-in defaults, then an optional TOML file, then `DC_NL_*` env vars.

use crate::domain::deployment::{DeploymentConfig, DeploymentOverrides};
use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use validator::Validate;

pub const CONFIG_FILE: &str = "datacommons-nl.toml";
pub const CONFIG_PATH_ENV: &str = "DC_NL_CONFIG";
pub const ENV_PREFIX: &str = "DC_NL_";

pub const DEFAULT_BUILDS: [&str; 4] = [
    "demographics300",
    "uncurated3000",
    "demographics300-withpalmalternatives",
    "combined_all",
];
pub const DEFAULT_BUILD: &str = "combined_all";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobSourceKind {
    Gcs,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmbeddingsConfig {
    pub source: BlobSourceKind,
    #[validate(length(min = 1))]
    pub bucket: String,
    pub prefix: String,
    /// Bucket mirror used when `source = "local"`.
    pub local_dir: Option<PathBuf>,
    pub scratch_dir: PathBuf,
    #[validate(length(min = 1))]
    pub builds: Vec<String>,
    pub default_build: String,
    #[validate(length(min = 1))]
    pub model_name: String,
    #[validate(range(min = 1, max = 100))]
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NerConfig {
    #[validate(url)]
    pub endpoint: String,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSelection {
    pub name: String,
    pub local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub embeddings: EmbeddingsConfig,
    #[validate(nested)]
    pub ner: NerConfig,
    pub deployment: DeploymentSelection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 6060,
            },
            embeddings: EmbeddingsConfig {
                source: BlobSourceKind::Gcs,
                bucket: "datcom-csv".to_string(),
                prefix: "embeddings/".to_string(),
                local_dir: None,
                scratch_dir: std::env::temp_dir(),
                builds: DEFAULT_BUILDS.iter().map(|b| b.to_string()).collect(),
                default_build: DEFAULT_BUILD.to_string(),
                model_name: crate::infrastructure::embedder::DEFAULT_MODEL_NAME.to_string(),
                top_k: 10,
            },
            ner: NerConfig {
                endpoint: "http://127.0.0.1:6070/ner".to_string(),
                timeout_secs: 10,
            },
            deployment: DeploymentSelection {
                name: "unsdg".to_string(),
                local: false,
            },
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the config file and the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        let config = Self::from_figment(Self::figment(&path))?;
        info!(
            config_file = %path,
            deployment = %config.deployment.name,
            local = config.deployment.local,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        if !config.embeddings.builds.contains(&config.embeddings.default_build) {
            return Err(AppError::ConfigError(format!(
                "Default build '{}' is not in the configured builds",
                config.embeddings.default_build
            )));
        }
        if config.embeddings.source == BlobSourceKind::Local && config.embeddings.local_dir.is_none() {
            return Err(AppError::ConfigError(
                "embeddings.local_dir is required when embeddings.source = \"local\"".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn deployment_flags(&self) -> Result<DeploymentConfig> {
        resolve_deployment(&self.deployment.name, self.deployment.local)
    }
}

/// Layers a deployment's overrides (and the local overlay) over the base flags.
pub fn resolve_deployment(name: &str, local: bool) -> Result<DeploymentConfig> {
    let overrides = DeploymentOverrides::for_deployment(name)
        .ok_or_else(|| AppError::ConfigError(format!("Unknown deployment: {}", name)))?;

    let mut figment = Figment::from(Serialized::defaults(DeploymentConfig::default()))
        .merge(Serialized::defaults(overrides));
    if local {
        figment = figment.merge(Serialized::defaults(DeploymentOverrides::local()));
    }
    Ok(figment.extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_deployment_is_default() {
        let flags = resolve_deployment("base", false).unwrap();
        assert_eq!(flags, DeploymentConfig::default());
    }

    #[test]
    fn test_unsdg_overrides_only_named_flags() {
        let flags = resolve_deployment("unsdg", false).unwrap();
        assert!(flags.custom);
        assert!(flags.show_topic);
        assert!(flags.use_palm);
        assert!(!flags.show_disaster);
        assert_eq!(flags.name, "Data Commons");
        assert_eq!(flags.logo_path.as_deref(), Some("/custom_dc/unsdg/logo.png"));
        assert_eq!(
            flags.override_css_path.as_deref(),
            Some("/custom_dc/unsdg/overrides.css")
        );
        assert!(!flags.local);
        assert_eq!(flags.scheme, "https");
    }

    #[test]
    fn test_local_overlay_keeps_deployment_flags() {
        let flags = resolve_deployment("unsdg", true).unwrap();
        assert!(flags.local);
        assert_eq!(flags.scheme, "http");
        assert!(flags.custom);
        assert!(flags.use_palm);
    }

    #[test]
    fn test_unknown_deployment() {
        let err = resolve_deployment("atlantis", false).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::from_figment(Figment::from(Serialized::defaults(
            AppConfig::default(),
        )))
        .unwrap();
        assert_eq!(config.embeddings.builds.len(), 4);
        assert_eq!(config.embeddings.top_k, 10);
        assert_eq!(config.embeddings.prefix, "embeddings/");
    }

    #[test]
    fn test_toml_and_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "nl.toml",
                r#"
                [server]
                port = 7000

                [embeddings]
                default_build = "demographics300"
                "#,
            )?;
            jail.set_env("DC_NL_SERVER__HOST", "0.0.0.0");

            let config = AppConfig::from_figment(AppConfig::figment("nl.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 7000);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.embeddings.default_build, "demographics300");
            Ok(())
        });
    }

    #[test]
    fn test_default_build_must_be_loaded() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(("embeddings.default_build", "nope"));
        let err = AppConfig::from_figment(figment).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_local_source_requires_dir() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(("embeddings.source", "local"));
        assert!(AppConfig::from_figment(figment).is_err());
    }
}
