//! Reading and decoding build inputs.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{BuildError, Result};
use crate::schema::Rule;

/// Decode a YAML sequence of rule records.
///
/// A blank document decodes to an empty list.
pub fn decode_rules(yaml: &str) -> Result<Vec<Rule>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and decode the rule list at `path`.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    let contents = read(path)?;
    let rules = decode_rules(&contents)?;
    debug!(path = %path.display(), count = rules.len(), "loaded rule list");
    Ok(rules)
}

/// Read the rule template at `path` verbatim.
pub fn read_template(path: &Path) -> Result<String> {
    let template = read(path)?;
    debug!(path = %path.display(), bytes = template.len(), "loaded rule template");
    Ok(template)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| BuildError::io(path, e))
}
