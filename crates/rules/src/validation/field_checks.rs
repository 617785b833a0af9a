//! Literal-pattern checks for individual rule fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BuildError, Result, RuleRef};
use crate::schema::RuleField;

/// `cron(...)` with only digits, `,` `?` `*` `/` `L` `-` and spaces inside.
static SCHEDULE_EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\Acron\([0-9,?*/L -]+\)\z").expect("Invalid scheduleExpression regex")
});

/// A bracketed list literal with non-empty content on a single line.
static COMMAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\[(.+)\]\z").expect("Invalid command regex"));

const SCHEDULE_EXPRESSION_SHAPE: &str = "cron(<digits , ? * / L - space>)";
const COMMAND_SHAPE: &str = "[<non-empty list>]";

pub fn is_valid_schedule_expression(value: &str) -> bool {
    SCHEDULE_EXPRESSION_REGEX.is_match(value)
}

pub fn is_valid_command(value: &str) -> bool {
    COMMAND_REGEX.is_match(value)
}

pub(super) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

pub(super) fn require_non_empty(
    value: &str,
    field: RuleField,
    rule: impl FnOnce() -> RuleRef,
) -> Result<()> {
    if value.is_empty() {
        return Err(BuildError::EmptyField {
            rule: rule(),
            field,
        });
    }
    Ok(())
}

pub(super) fn require_schedule_expression(
    value: &str,
    rule: impl FnOnce() -> RuleRef,
) -> Result<()> {
    if !is_valid_schedule_expression(value) {
        return Err(invalid(rule(), RuleField::ScheduleExpression, value, SCHEDULE_EXPRESSION_SHAPE));
    }
    Ok(())
}

pub(super) fn require_command(value: &str, rule: impl FnOnce() -> RuleRef) -> Result<()> {
    if !is_valid_command(value) {
        return Err(invalid(rule(), RuleField::Command, value, COMMAND_SHAPE));
    }
    Ok(())
}

fn invalid(rule: RuleRef, field: RuleField, value: &str, expected: &'static str) -> BuildError {
    BuildError::InvalidFormat {
        rule,
        field,
        value: value.to_string(),
        expected,
    }
}
