//! Error taxonomy for a schedule build.
//!
//! Every variant is fatal to the current build. Rule-level variants carry a
//! [`RuleRef`] so a failure can be located in the rule list without re-running.

use std::fmt;
use std::path::PathBuf;

use crate::schema::RuleField;
use crate::templates::TemplateKind;

/// Position (and trimmed name, when known) of a rule in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    /// 0-based index into the decoded rule list.
    pub index: usize,
    /// Trimmed rule name; empty when the name itself is the problem.
    pub name: String,
}

impl RuleRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "rules[{}]", self.index)
        } else {
            write!(f, "rules[{}] `{}`", self.index, self.name)
        }
    }
}

/// Errors that abort a schedule build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A required string field is blank after trimming.
    #[error("{rule}: {field} is empty")]
    EmptyField { rule: RuleRef, field: RuleField },

    /// `scheduleExpression` or `command` does not match its literal pattern.
    #[error("{rule}: {field} is not valid: {value:?} (expected {expected})")]
    InvalidFormat {
        rule: RuleRef,
        field: RuleField,
        value: String,
        expected: &'static str,
    },

    /// Two rules accepted into the same build share a name.
    #[error("duplicate rule name: {rule} (first defined at rules[{first_index}])")]
    DuplicateName { rule: RuleRef, first_index: usize },

    /// Header or rule template text is not syntactically valid.
    #[error("failed to parse {template} template: {detail}")]
    TemplateParse {
        template: TemplateKind,
        detail: String,
    },

    /// A compiled template failed against its context.
    #[error("failed to render {template} template for {subject}: {detail}")]
    TemplateExec {
        template: TemplateKind,
        subject: String,
        detail: String,
    },

    /// The rule list is not a YAML sequence of rule records.
    #[error("failed to decode rule list: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// Reading an input or writing the output failed.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline step was invoked from a state that does not allow it.
    #[error("cannot {step} while build is {state}")]
    OutOfOrder {
        step: &'static str,
        state: crate::pipeline::BuildState,
    },
}

/// Machine-readable classification of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyField,
    InvalidFormat,
    DuplicateName,
    TemplateParse,
    TemplateExec,
    Decode,
    Io,
    OutOfOrder,
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyField { .. } => ErrorKind::EmptyField,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::TemplateParse { .. } => ErrorKind::TemplateParse,
            Self::TemplateExec { .. } => ErrorKind::TemplateExec,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Io { .. } => ErrorKind::Io,
            Self::OutOfOrder { .. } => ErrorKind::OutOfOrder,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
