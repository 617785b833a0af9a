//! Template contexts and template identifiers.

use std::fmt;

use serde::Serialize;

use crate::schema::{BuildParams, Rule};

/// Which of the two templates in a build an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Fixed document prologue (region, cluster, role, `rules:` key).
    Header,
    /// User-supplied per-rule fragment.
    Rule,
}

impl TemplateKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Rule => "rule",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values visible to the header template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderContext<'a> {
    pub region: &'a str,
    pub cluster: &'a str,
}

impl<'a> From<&'a BuildParams> for HeaderContext<'a> {
    fn from(params: &'a BuildParams) -> Self {
        Self {
            region: &params.region,
            cluster: &params.cluster,
        }
    }
}

/// Values visible to the rule template: exactly one rule's fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleContext<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule_expression: &'a str,
    pub command: &'a str,
    pub environment: &'a [String],
    pub disabled: bool,
}

impl<'a> From<&'a Rule> for RuleContext<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self {
            name: &rule.name,
            description: &rule.description,
            schedule_expression: &rule.schedule_expression,
            command: &rule.command,
            environment: &rule.environment,
            disabled: rule.disabled,
        }
    }
}
