//! Minijinja rendering of the schedule document.
//!
//! Both templates are compiled once per build. Go-style actions are
//! translated first (see [`compat`]), so `{{ .Name }}` and `{{ Name }}` are
//! equivalent. Each rule fragment is rendered from that rule's context alone.

mod compat;
mod types;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::schema::{BuildParams, Rule};

pub use types::{HeaderContext, RuleContext, TemplateKind};

/// Fixed document prologue. Rule fragments append list items under `rules:`.
pub const HEADER_TEMPLATE: &str = "region: {{ .Region }}
cluster: {{ .Cluster }}
role: ecs-events
rules:
";

/// Renders the header and rule fragments of one schedule document.
#[derive(Debug)]
pub struct ScheduleRenderer {
    env: Environment<'static>,
    rule_template_len: usize,
}

impl ScheduleRenderer {
    /// Compile the header template and the given rule template.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::TemplateParse`] if either template is malformed.
    pub fn new(rule_template: &str) -> Result<Self> {
        let mut env = Self::build_env();
        compile(&mut env, TemplateKind::Header, HEADER_TEMPLATE)?;
        compile(&mut env, TemplateKind::Rule, rule_template)?;
        Ok(Self {
            env,
            rule_template_len: rule_template.len(),
        })
    }

    /// Strict lookups, no escaping, trailing newlines kept verbatim.
    fn build_env() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env
    }

    /// Render the header block for `params`.
    pub fn render_header(&self, params: &BuildParams) -> Result<String> {
        self.render(TemplateKind::Header, "header", HeaderContext::from(params))
    }

    /// Render one rule's fragment.
    pub fn render_rule(&self, rule: &Rule) -> Result<String> {
        let fragment = self.render(
            TemplateKind::Rule,
            &format!("rule `{}`", rule.name),
            RuleContext::from(rule),
        )?;
        debug!(rule = %rule.name, bytes = fragment.len(), "rendered rule fragment");
        Ok(fragment)
    }

    /// Render the header followed by one fragment per rule, in order.
    pub fn render_document(&self, params: &BuildParams, rules: &[Rule]) -> Result<String> {
        let mut out =
            String::with_capacity(HEADER_TEMPLATE.len() + self.rule_template_len * rules.len());
        out.push_str(&self.render_header(params)?);
        for rule in rules {
            out.push_str(&self.render_rule(rule)?);
        }
        Ok(out)
    }

    fn render<S: serde::Serialize>(&self, kind: TemplateKind, subject: &str, ctx: S) -> Result<String> {
        let exec_error = |e: minijinja::Error| BuildError::TemplateExec {
            template: kind,
            subject: subject.to_string(),
            detail: e.to_string(),
        };
        let template = self.env.get_template(kind.name()).map_err(exec_error)?;
        template.render(ctx).map_err(exec_error)
    }
}

fn compile(env: &mut Environment<'static>, kind: TemplateKind, source: &str) -> Result<()> {
    let parse_error = |detail: String| BuildError::TemplateParse {
        template: kind,
        detail,
    };
    let translated = compat::translate(source).map_err(parse_error)?;
    env.add_template_owned(kind.name(), translated)
        .map_err(|e| parse_error(e.to_string()))
}
