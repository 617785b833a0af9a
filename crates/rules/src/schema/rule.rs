//! The scheduled-job rule record.

use std::fmt;

use serde::Deserialize;

/// One scheduled job definition.
///
/// Every key is optional at decode time: a missing string decodes as empty
/// and is rejected later by validation rather than by the YAML decoder.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub name: String,
    pub description: String,
    /// `cron(...)` expression in the EventBridge dialect.
    pub schedule_expression: String,
    /// Bracketed list literal, e.g. `["bin/task", "--flag"]`.
    pub command: String,
    /// Environments this rule is active in. Empty means all of them.
    pub environment: Vec<String>,
    /// Passed through to the rendered output.
    pub disabled: bool,
}

impl Rule {
    /// Whether this rule takes part in a build targeting `environment`.
    pub fn targets(&self, environment: &str) -> bool {
        self.environment.is_empty() || self.environment.iter().any(|e| e == environment)
    }
}

/// The validated string fields of a [`Rule`], named by their YAML keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleField {
    Name,
    Description,
    ScheduleExpression,
    Command,
}

impl RuleField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ScheduleExpression => "scheduleExpression",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
