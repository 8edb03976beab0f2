//! Engine construction and the built-in default configuration.
//!
//! Missing pieces are substituted rather than rejected: an empty parameter
//! list gets the default name/weight parameters, an empty rule list gets the
//! weight rule, and a missing criterion becomes [`Criterion::no_failures`].

use crate::criterion::Criterion;
use crate::engine::Engine;
use crate::grade::Grade;
use crate::parameter::{AnyParameter, ParamType, ParameterHandle, ParameterSet};
use crate::rule::Rule;
use crate::EngineError;

const DEFAULT_SUBJECT_LABEL: &str = "Subject";

/// Fluent builder for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    parameters: Vec<AnyParameter>,
    rules: Vec<Rule>,
    criterion: Option<Criterion>,
    identity: Option<String>,
    subject_label: Option<String>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(mut self, parameter: impl Into<AnyParameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = AnyParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = Some(criterion);
        self
    }

    /// Text parameter whose value names the subject in result messages.
    ///
    /// Defaults to the first text parameter by order.
    pub fn identity(mut self, name: impl Into<String>) -> Self {
        self.identity = Some(name.into());
        self
    }

    /// Word placed before the subject's name, e.g. "Candidate".
    pub fn subject_label(mut self, label: impl Into<String>) -> Self {
        self.subject_label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        let parameters = if self.parameters.is_empty() {
            tracing::warn!("No parameters configured, using defaults");
            default_parameters()
        } else {
            self.parameters
        };

        let mut rules = if self.rules.is_empty() {
            tracing::warn!("No rules configured, using defaults");
            default_rules()
        } else {
            self.rules
        };
        rules.sort_by_key(|r| r.order());

        let criterion = self.criterion.unwrap_or_default();
        let parameters = ParameterSet::new(parameters)?;

        let identity = match self.identity {
            Some(name) => {
                // Must exist and hold text
                parameters.text(&name)?;
                name
            }
            None => parameters
                .first_of_type(ParamType::Text)
                .map(|p| p.name().to_string())
                .ok_or(EngineError::NoIdentityParameter)?,
        };

        tracing::debug!(
            parameters = parameters.len(),
            rules = rules.len(),
            criterion = criterion.description(),
            identity = %identity,
            "Engine built"
        );

        Ok(Engine::from_parts(
            parameters,
            rules,
            criterion,
            identity,
            self.subject_label
                .unwrap_or_else(|| DEFAULT_SUBJECT_LABEL.to_string()),
        ))
    }
}

/// Build an engine from explicit parts, substituting defaults where empty.
pub fn build(
    parameters: Vec<AnyParameter>,
    rules: Vec<Rule>,
    criterion: Option<Criterion>,
) -> Result<Engine, EngineError> {
    let builder = EngineBuilder::new().parameters(parameters).rules(rules);
    match criterion {
        Some(criterion) => builder.criterion(criterion).build(),
        None => builder.build(),
    }
}

/// A non-empty "Name" and a positive integer "Weight".
pub fn default_parameters() -> Vec<AnyParameter> {
    vec![
        AnyParameter::text(
            "Name",
            "Name as text",
            0,
            |s: &String| !s.is_empty(),
            "Non-empty text",
        ),
        AnyParameter::integer(
            "Weight",
            "Integer greater than zero",
            1,
            |w: &i32| *w > 0,
            "Integer greater than zero",
        ),
    ]
}

/// A single rule grading "Weight" with [`weight_grade`].
pub fn default_rules() -> Vec<Rule> {
    vec![Rule::new("Weight", "", 0, |p| {
        Ok(weight_grade(p.integer("Weight")?))
    })]
}

/// Pass for 75..=90, Conditional for 70..=74 or 91..=100, Fail otherwise.
pub fn weight_grade(weight: i32) -> Grade {
    match weight {
        75..=90 => Grade::Pass,
        70..=74 | 91..=100 => Grade::Conditional,
        _ => Grade::Fail,
    }
}
