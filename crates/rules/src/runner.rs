//! File-to-file build: read inputs, run the pipeline, write the document.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::loader::{load_rules, read_template, write_atomic};
use crate::pipeline::Build;
use crate::schema::BuildParams;

/// Everything one `build-ecschedule` invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub rules_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub params: BuildParams,
    /// Run the pipeline without writing the output file.
    pub dry_run: bool,
}

/// Outcome of a successful [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output_path: PathBuf,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
    pub bytes: usize,
    /// False for dry runs.
    pub written: bool,
}

/// Run one build end to end.
///
/// The output file is only touched once the full document has been rendered,
/// so a failing build leaves any existing output in place.
pub fn execute(request: &BuildRequest) -> Result<BuildSummary> {
    let mut build = Build::new(request.params.clone());

    let rules = load_rules(&request.rules_path)?;
    build.load_rule_list(rules)?;

    let template = read_template(&request.template_path)?;
    build.load_template(&template)?;

    let schedule = build.render()?;

    if request.dry_run {
        info!(path = %request.output_path.display(), "dry run, output not written");
    } else {
        write_atomic(&request.output_path, schedule.document.as_bytes())?;
    }

    Ok(BuildSummary {
        output_path: request.output_path.clone(),
        bytes: schedule.document.len(),
        rendered: schedule.rendered,
        skipped: schedule.skipped,
        written: !request.dry_run,
    })
}
