//! The evaluation engine.
//!
//! The engine owns parameters, rules and the success criterion, and moves a
//! session through its states:
//!
//! ```text
//! Configured -> AwaitingInput -> Ready -> Evaluated --reset--> AwaitingInput
//! ```
//!
//! Raw operator text enters only through [`Engine::set_and_validate`].
//! [`Engine::run_rules`] replaces the whole grade distribution in one step,
//! and [`Engine::evaluate_outcome`] applies the criterion to it.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::builder::EngineBuilder;
use crate::criterion::Criterion;
use crate::grade::{Grade, GradeCounts};
use crate::parameter::{
    AnyParameter, ParamKind, Parameter, ParameterHandle, ParameterSet, ParameterSpec,
};
use crate::rule::{Rule, RuleFinding};
use crate::EngineError;

/// Result of applying the success criterion to the latest run.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Value of the identity parameter
    pub subject: String,

    pub success: bool,

    /// Human-readable verdict; lists problem rules on failure
    pub message: String,

    /// Every rule whose last grade is not Pass, in rule order
    pub findings: Vec<RuleFinding>,

    pub counts: GradeCounts,

    pub evaluated_at: DateTime<Utc>,
}

/// Orchestrates validation, rule execution and the pass/fail decision.
#[derive(Debug)]
pub struct Engine {
    parameters: ParameterSet,
    rules: Vec<Rule>,
    criterion: Criterion,
    identity: String,
    subject_label: String,
    counts: Option<GradeCounts>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// An engine with the built-in name/weight configuration.
    pub fn with_defaults() -> Result<Self, EngineError> {
        EngineBuilder::new().build()
    }

    /// Rules must already be sorted by order.
    pub(crate) fn from_parts(
        parameters: ParameterSet,
        rules: Vec<Rule>,
        criterion: Criterion,
        identity: String,
        subject_label: String,
    ) -> Self {
        Self {
            parameters,
            rules,
            criterion,
            identity,
            subject_label,
            counts: None,
        }
    }

    /// Parameters in ascending `order`.
    pub fn parameters(&self) -> impl Iterator<Item = &AnyParameter> {
        self.parameters.iter()
    }

    /// Owned metadata for every parameter, in order.
    pub fn parameter_specs(&self) -> Vec<ParameterSpec> {
        self.parameters.iter().map(|p| p.spec()).collect()
    }

    pub fn parameter_set(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Rules in ascending `order`, with their last grades.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    /// Name of the text parameter that identifies the subject.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Distribution from the latest run, if any.
    pub fn last_counts(&self) -> Option<&GradeCounts> {
        self.counts.as_ref()
    }

    /// Convert, validate and store raw input for the parameter `name`.
    ///
    /// Returns `Ok(true)` iff a value was stored. On `Ok(false)` the
    /// parameter keeps its previous value. Text is validated verbatim;
    /// integer and decimal input is trimmed, parsed strictly, then validated.
    /// An unknown `name` is a configuration error.
    pub fn set_and_validate(&mut self, name: &str, raw: &str) -> Result<bool, EngineError> {
        let param = self.parameters.find_mut(name)?;

        let stored = match param {
            AnyParameter::Text(p) => store_if_valid(p, Some(raw.to_string()), raw),
            AnyParameter::Integer(p) => store_if_valid(p, raw.trim().parse::<i32>().ok(), raw),
            AnyParameter::Decimal(p) => store_if_valid(p, parse_decimal(raw.trim()), raw),
        };

        Ok(stored)
    }

    /// Reset every parameter to its default. Rule grades are kept.
    pub fn reset_all_parameters(&mut self) {
        self.parameters.reset_all();
        tracing::info!(parameters = self.parameters.len(), "Parameters reset");
    }

    /// Run every rule in order and rebuild the grade distribution.
    ///
    /// All rules are graded before any result is recorded, so a
    /// configuration error leaves rule grades and the previous
    /// distribution untouched.
    pub fn run_rules(&mut self) -> Result<GradeCounts, EngineError> {
        let grades = self
            .rules
            .iter()
            .map(|rule| -> Result<Grade, EngineError> {
                let grade = rule.evaluate(&self.parameters)?;
                tracing::debug!(rule = rule.name(), grade = %grade, "Rule graded");
                Ok(grade)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        for (rule, grade) in self.rules.iter_mut().zip(&grades) {
            rule.record(*grade);
        }

        let counts: GradeCounts = grades.into_iter().collect();
        tracing::info!(rules = counts.total(), counts = %counts, "Rules run");
        self.counts = Some(counts.clone());
        Ok(counts)
    }

    /// Apply the success criterion to the latest distribution.
    pub fn evaluate_outcome(&self) -> Result<Outcome, EngineError> {
        let counts = self.counts.clone().ok_or(EngineError::NotEvaluated)?;
        let subject = self.parameters.text(&self.identity)?.to_string();
        let success = self.criterion.is_met(&counts);

        let problems: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| !r.last_result().is_pass())
            .collect();

        let message = if success {
            format!("{} {} is suitable", self.subject_label, subject)
        } else {
            let mut message = format!(
                "{} {} did not pass the evaluation. Problems:",
                self.subject_label, subject
            );
            for rule in &problems {
                message.push('\n');
                message.push_str(&rule.to_string());
            }
            message
        };

        tracing::debug!(success, problems = counts.non_passing(), "Outcome evaluated");

        Ok(Outcome {
            subject,
            success,
            message,
            findings: problems.iter().map(|r| r.finding()).collect(),
            counts,
            evaluated_at: Utc::now(),
        })
    }
}

/// Optional sign, digits and at most one `.`; exponents and digit separators are rejected.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let plain = unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && unsigned.chars().any(|c| c.is_ascii_digit())
        && unsigned.matches('.').count() <= 1;
    if !plain {
        return None;
    }
    Decimal::from_str(raw).ok()
}

/// Store `parsed` if it exists and passes the validator.
fn store_if_valid<T: ParamKind>(param: &mut Parameter<T>, parsed: Option<T>, raw: &str) -> bool {
    let Some(value) = parsed else {
        tracing::debug!(parameter = param.name(), raw, kind = %T::TYPE, "Input did not parse");
        return false;
    };

    if !param.validate_value(&value) {
        tracing::debug!(parameter = param.name(), raw, "Input rejected by validator");
        return false;
    }

    param.set_value(value);
    true
}
