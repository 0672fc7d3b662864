use crate::error::{invalid_argument, BuilderResult};
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`BuilderConfig::from_env`]
pub const ENV_PREFIX: &str = "CONFIGURED_BUILDER";

pub const DEFAULT_BUILDER_NAME: &str = "configured-builder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Identifies the builder in logs and stats
    pub name: String,
    /// Emit a trace event for every configurer callback
    pub trace_callbacks: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BUILDER_NAME.to_string(),
            trace_callbacks: false,
        }
    }
}

impl BuilderConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load from `CONFIGURED_BUILDER_*` environment variables over the defaults
    pub fn from_env() -> BuilderResult<Self> {
        Self::load(Config::builder())
    }

    /// Load from a TOML document, with environment variables taking precedence
    pub fn from_toml_str(toml: &str) -> BuilderResult<Self> {
        Self::load(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    pub fn validate(&self) -> BuilderResult<()> {
        if self.name.trim().is_empty() {
            return Err(invalid_argument("name", "builder name cannot be empty"));
        }
        Ok(())
    }

    fn load(builder: ConfigBuilder<::config::builder::DefaultState>) -> BuilderResult<Self> {
        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}
