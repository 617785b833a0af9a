//! Field-level rule validation and normalization.
//!
//! Fields are trimmed and checked in the order name → description →
//! scheduleExpression → command. The first failing field is reported; errors
//! are not accumulated.

mod field_checks;

use tracing::debug;

use crate::error::{Result, RuleRef};
use crate::schema::{Rule, RuleField};

pub use field_checks::{is_valid_command, is_valid_schedule_expression};

/// Trim the string fields of `rule` and check them.
///
/// `index` is the rule's position in the input list, used only for error
/// context. `environment` and `disabled` are returned untouched.
pub fn validate_rule(index: usize, mut rule: Rule) -> Result<Rule> {
    rule.name = field_checks::trimmed(&rule.name);
    field_checks::require_non_empty(&rule.name, RuleField::Name, || RuleRef::new(index, ""))?;

    let rule_ref = || RuleRef::new(index, rule.name.clone());

    rule.description = field_checks::trimmed(&rule.description);
    field_checks::require_non_empty(&rule.description, RuleField::Description, rule_ref)?;

    rule.schedule_expression = field_checks::trimmed(&rule.schedule_expression);
    field_checks::require_schedule_expression(&rule.schedule_expression, rule_ref)?;

    rule.command = field_checks::trimmed(&rule.command);
    field_checks::require_command(&rule.command, rule_ref)?;

    Ok(rule)
}

/// Validate every rule in input order, stopping at the first failure.
pub fn validate_all(rules: Vec<Rule>) -> Result<Vec<Rule>> {
    let validated = rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| validate_rule(index, rule))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = validated.len(), "validated rules");
    Ok(validated)
}
