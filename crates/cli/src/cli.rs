use std::path::PathBuf;

use clap::Parser;

/// Build ecschedule.yaml (https://github.com/Songmu/ecschedule) from a rules
/// YAML file and a per-rule template.
///
/// Values not given as flags fall back to environment variables, then to the
/// config file, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "build-ecschedule", version, about)]
pub struct CliArgs {
    /// ECS cluster name (required)
    #[arg(long, env = "ECSCHEDULE_CLUSTER")]
    pub cluster: Option<String>,

    /// Path to a TOML config file (default: ./build-ecschedule.toml if present)
    #[arg(long, env = "ECSCHEDULE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the build without writing the output file
    #[arg(long)]
    pub check: bool,

    /// Target environment used to filter rules [default: sandbox]
    #[arg(long, env = "ECSCHEDULE_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Output file [default: ecschedule.yaml]
    #[arg(long, env = "ECSCHEDULE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// AWS region [default: ap-northeast-1]
    #[arg(long, env = "ECSCHEDULE_REGION")]
    pub region: Option<String>,

    /// Rules YAML file (required)
    #[arg(long, env = "ECSCHEDULE_RULES")]
    pub rules: Option<PathBuf>,

    /// Rule template file (required)
    #[arg(long, env = "ECSCHEDULE_TEMPLATE")]
    pub template: Option<PathBuf>,
}
