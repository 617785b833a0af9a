//! Per-build parameters.

pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const DEFAULT_ENVIRONMENT: &str = "sandbox";
pub const DEFAULT_OUTPUT: &str = "ecschedule.yaml";

/// Settings that apply to a whole build rather than to one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildParams {
    /// AWS region written into the header.
    pub region: String,
    /// ECS cluster name written into the header.
    pub cluster: String,
    /// Target environment used to filter rules.
    pub environment: String,
}

impl BuildParams {
    /// Parameters for `cluster` with the default region and environment.
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            cluster: cluster.into(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}
