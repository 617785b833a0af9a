//! Environment filtering and duplicate-name detection.
//!
//! Rules not targeted at the build's environment are skipped and reported.
//! A duplicate name among the remaining rules aborts the build. Skipped rules
//! never enter the seen-name set, so they cannot cause a duplicate.

use std::collections::HashMap;

use tracing::info;

use crate::error::{BuildError, Result, RuleRef};
use crate::schema::Rule;

/// Rules accepted for one build, plus the names of those skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Accepted rules, in input order, with unique names.
    pub accepted: Vec<Rule>,
    /// Names of rules excluded by environment, in input order.
    pub skipped: Vec<String>,
}

/// Select the rules that take part in a build targeting `environment`.
///
/// `rules` must already be validated (names trimmed).
pub fn select_rules(rules: Vec<Rule>, environment: &str) -> Result<Selection> {
    let mut selection = Selection::default();
    // name -> input index of the accepted rule
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(rules.len());

    for (index, rule) in rules.into_iter().enumerate() {
        if !rule.targets(environment) {
            info!(
                rule = %rule.name,
                environment = %environment,
                targets = ?rule.environment,
                "skipped rule not targeted at this environment"
            );
            selection.skipped.push(rule.name);
            continue;
        }

        if let Some(&first_index) = seen.get(&rule.name) {
            return Err(BuildError::DuplicateName {
                rule: RuleRef::new(index, rule.name),
                first_index,
            });
        }

        seen.insert(rule.name.clone(), index);
        selection.accepted.push(rule);
    }

    Ok(selection)
}
