//! Build orchestration: parse → validate → filter → dedupe → render.
//!
//! A [`Build`] moves through `Start → RulesLoaded → TemplateLoaded →
//! Rendering → Done`. Any failing step moves it to `Failed`, after which every
//! further step is rejected. Nothing is retried.

use std::fmt;

use tracing::info;

use crate::error::{BuildError, Result};
use crate::filter::{select_rules, Selection};
use crate::loader::decode_rules;
use crate::schema::{BuildParams, Rule};
use crate::templates::ScheduleRenderer;
use crate::validation::validate_all;

/// Lifecycle state of a [`Build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Start,
    RulesLoaded,
    TemplateLoaded,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::RulesLoaded => "rules-loaded",
            Self::TemplateLoaded => "template-loaded",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The rendered document and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSchedule {
    pub document: String,
    /// Names of the rules rendered, in output order.
    pub rendered: Vec<String>,
    /// Names of the rules skipped for the target environment.
    pub skipped: Vec<String>,
}

/// One build invocation. Holds no state beyond this build.
#[derive(Debug)]
pub struct Build {
    params: BuildParams,
    state: BuildState,
    rules: Vec<Rule>,
    renderer: Option<ScheduleRenderer>,
}

impl Build {
    pub fn new(params: BuildParams) -> Self {
        Self {
            params,
            state: BuildState::Start,
            rules: Vec::new(),
            renderer: None,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn params(&self) -> &BuildParams {
        &self.params
    }

    /// Decode the rule list YAML and validate every rule in it.
    pub fn load_rules(&mut self, yaml: &str) -> Result<()> {
        self.expect_state(BuildState::Start, "load rules")?;
        let result = decode_rules(yaml).and_then(validate_all);
        self.load_validated(result)
    }

    /// Validate already-decoded rules.
    pub fn load_rule_list(&mut self, rules: Vec<Rule>) -> Result<()> {
        self.expect_state(BuildState::Start, "load rules")?;
        let result = validate_all(rules);
        self.load_validated(result)
    }

    fn load_validated(&mut self, result: Result<Vec<Rule>>) -> Result<()> {
        self.rules = self.track(result)?;
        self.state = BuildState::RulesLoaded;
        Ok(())
    }

    /// Compile the header and the user-supplied rule template.
    pub fn load_template(&mut self, rule_template: &str) -> Result<()> {
        self.expect_state(BuildState::RulesLoaded, "load template")?;
        let renderer = self.track(ScheduleRenderer::new(rule_template))?;
        self.renderer = Some(renderer);
        self.state = BuildState::TemplateLoaded;
        Ok(())
    }

    /// Filter, dedupe and render. Consumes the loaded rules.
    pub fn render(&mut self) -> Result<RenderedSchedule> {
        self.expect_state(BuildState::TemplateLoaded, "render")?;
        self.state = BuildState::Rendering;

        let rules = std::mem::take(&mut self.rules);
        let result = self.render_rules(rules);
        let schedule = self.track(result)?;

        self.state = BuildState::Done;
        info!(
            environment = %self.params.environment,
            rendered = schedule.rendered.len(),
            skipped = schedule.skipped.len(),
            "rendered schedule"
        );
        Ok(schedule)
    }

    fn render_rules(&self, rules: Vec<Rule>) -> Result<RenderedSchedule> {
        let renderer = self.renderer.as_ref().ok_or(BuildError::OutOfOrder {
            step: "render",
            state: self.state,
        })?;
        let Selection { accepted, skipped } = select_rules(rules, &self.params.environment)?;
        let document = renderer.render_document(&self.params, &accepted)?;
        Ok(RenderedSchedule {
            document,
            rendered: accepted.into_iter().map(|r| r.name).collect(),
            skipped,
        })
    }

    fn expect_state(&mut self, expected: BuildState, step: &'static str) -> Result<()> {
        if self.state != expected {
            let state = self.state;
            self.state = BuildState::Failed;
            return Err(BuildError::OutOfOrder { step, state });
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = BuildState::Failed;
        }
        result
    }
}

/// Run a whole build from in-memory inputs.
pub fn build_schedule(
    params: BuildParams,
    rules_yaml: &str,
    rule_template: &str,
) -> Result<RenderedSchedule> {
    let mut build = Build::new(params);
    build.load_rules(rules_yaml)?;
    build.load_template(rule_template)?;
    build.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TEMPLATE: &str = "- name: {{ .Name }}\n";

    fn params() -> BuildParams {
        BuildParams::new("main").with_environment("prod")
    }

    fn rules_yaml(entries: &[(&str, &str)]) -> String {
        entries
            .iter()
            .map(|(name, env)| {
                format!(
                    "- name: {name}\n  description: d\n  scheduleExpression: cron(0 0 * * ? *)\n  command: '[\"run\"]'\n  environment: {env}\n"
                )
            })
            .collect()
    }

    #[test]
    fn states_advance_in_order() {
        let mut build = Build::new(params());
        assert_eq!(build.state(), BuildState::Start);

        build.load_rules(&rules_yaml(&[("a", "[]")])).unwrap();
        assert_eq!(build.state(), BuildState::RulesLoaded);

        build.load_template(TEMPLATE).unwrap();
        assert_eq!(build.state(), BuildState::TemplateLoaded);

        let schedule = build.render().unwrap();
        assert_eq!(build.state(), BuildState::Done);
        assert_eq!(schedule.rendered, vec!["a"]);
        assert!(schedule.document.ends_with("rules:\n- name: a\n"));
    }

    #[test]
    fn invalid_rule_fails_build() {
        let mut build = Build::new(params());
        let err = build
            .load_rules("- name: a\n  description: d\n  scheduleExpression: 0 0 * * *\n  command: '[\"x\"]'\n")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(build.state(), BuildState::Failed);

        let err = build.load_template(TEMPLATE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfOrder);
    }

    #[test]
    fn invalid_rule_aborts_even_when_excluded_by_environment() {
        let yaml = "- name: a\n  description: ''\n  scheduleExpression: cron(0 0 * * ? *)\n  command: '[\"x\"]'\n  environment: [staging]\n";
        let err = build_schedule(params(), yaml, TEMPLATE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyField);
    }

    #[test]
    fn out_of_order_step_is_rejected() {
        let mut build = Build::new(params());
        let err = build.render().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfOrder);
        assert_eq!(err.to_string(), "cannot render while build is start");
        assert_eq!(build.state(), BuildState::Failed);
    }

    #[test]
    fn duplicate_fails_during_render() {
        let mut build = Build::new(params());
        build
            .load_rules(&rules_yaml(&[("a", "[]"), ("a", "[prod]")]))
            .unwrap();
        build.load_template(TEMPLATE).unwrap();
        let err = build.render().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(build.state(), BuildState::Failed);
    }

    #[test]
    fn template_parse_error_fails_build() {
        let mut build = Build::new(params());
        build.load_rules(&rules_yaml(&[("a", "[]")])).unwrap();
        let err = build.load_template("{{ if .Disabled }}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemplateParse);
        assert_eq!(build.state(), BuildState::Failed);
    }

    #[test]
    fn load_rule_list_validates_decoded_rules() {
        let mut build = Build::new(params());
        let err = build.load_rule_list(vec![Rule::default()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyField);
    }

    #[test]
    fn same_inputs_render_identically() {
        let yaml = rules_yaml(&[("a", "[]"), ("b", "[staging]"), ("c", "[prod]")]);
        let first = build_schedule(params(), &yaml, TEMPLATE).unwrap();
        let second = build_schedule(params(), &yaml, TEMPLATE).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rendered, vec!["a", "c"]);
        assert_eq!(first.skipped, vec!["b"]);
    }
}
