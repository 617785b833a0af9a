use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use ecschedule_rules::schema::{DEFAULT_ENVIRONMENT, DEFAULT_OUTPUT, DEFAULT_REGION};
use ecschedule_rules::{BuildParams, BuildRequest};

use crate::cli::CliArgs;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "build-ecschedule.toml";

/// Build settings loaded from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub rules: Option<PathBuf>,
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl FileConfig {
    /// Load config from the given path, or the default file if it exists.
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No config file found, using flags and defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))
    }

    /// Merge with command-line arguments into a build request.
    /// Priority: flag / env var > config file > built-in default.
    pub fn resolve(self, args: CliArgs) -> Result<BuildRequest> {
        let Some(rules_path) = args.rules.or(self.rules) else {
            bail!("missing rules file: pass --rules or set `rules` in the config file");
        };
        let Some(template_path) = args.template.or(self.template) else {
            bail!("missing template file: pass --template or set `template` in the config file");
        };
        let Some(cluster) = args.cluster.or(self.cluster) else {
            bail!("missing cluster: pass --cluster or set `cluster` in the config file");
        };

        let params = BuildParams::new(cluster)
            .with_region(
                args.region
                    .or(self.region)
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            )
            .with_environment(
                args.environment
                    .or(self.environment)
                    .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            );

        Ok(BuildRequest {
            rules_path,
            template_path,
            output_path: args
                .output
                .or(self.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            params,
            dry_run: args.check,
        })
    }
}
