//! Grading rules.

use std::fmt;

use serde::Serialize;

use crate::grade::Grade;
use crate::parameter::ParameterSet;
use crate::EngineError;

type RuleFn = Box<dyn Fn(&ParameterSet) -> Result<Grade, EngineError> + Send + Sync>;

/// A named unit of grading logic.
///
/// The closure reads parameter values through the [`ParameterSet`] it is
/// given; a lookup of an unknown or mistyped name surfaces as an
/// [`EngineError`] and aborts the run.
pub struct Rule {
    name: String,
    description: String,
    order: i32,
    evaluate: RuleFn,
    last_result: Grade,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        evaluate: impl Fn(&ParameterSet) -> Result<Grade, EngineError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            order,
            evaluate: Box::new(evaluate),
            last_result: Grade::Unevaluated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Grade from the most recent run, `Unevaluated` before the first.
    pub fn last_result(&self) -> Grade {
        self.last_result
    }

    /// Grade the current parameter values without recording the result.
    pub fn evaluate(&self, params: &ParameterSet) -> Result<Grade, EngineError> {
        (self.evaluate)(params)
    }

    pub(crate) fn record(&mut self, grade: Grade) {
        self.last_result = grade;
    }

    pub fn finding(&self) -> RuleFinding {
        RuleFinding {
            name: self.name.clone(),
            description: self.description.clone(),
            order: self.order,
            grade: self.last_result,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_result {
            Grade::Unevaluated => write!(f, "Rule {} was not evaluated", self.name),
            grade => write!(f, " * Rule '{}' ({})", self.name, grade),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("last_result", &self.last_result)
            .finish_non_exhaustive()
    }
}

/// A rule's name and last grade, detached from the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFinding {
    pub name: String,
    pub description: String,
    pub order: i32,
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::AnyParameter;

    fn params() -> ParameterSet {
        ParameterSet::new(vec![AnyParameter::integer("Age", "", 0, |a: &i32| *a > 0, "")]).unwrap()
    }

    #[test]
    fn test_new_rule_is_unevaluated() {
        let rule = Rule::new("Age", "", 0, |_| Ok(Grade::Pass));
        assert_eq!(rule.last_result(), Grade::Unevaluated);
        assert_eq!(rule.to_string(), "Rule Age was not evaluated");
    }

    #[test]
    fn test_evaluate_does_not_record() {
        let rule = Rule::new("Age", "", 0, |p| {
            Ok(if p.integer("Age")? == 0 { Grade::Fail } else { Grade::Pass })
        });
        assert_eq!(rule.evaluate(&params()).unwrap(), Grade::Fail);
        assert_eq!(rule.last_result(), Grade::Unevaluated);
    }

    #[test]
    fn test_record_and_display() {
        let mut rule = Rule::new("Age", "Age band", 2, |_| Ok(Grade::Conditional));
        let grade = rule.evaluate(&params()).unwrap();
        rule.record(grade);
        assert_eq!(rule.to_string(), " * Rule 'Age' (Conditional)");

        let finding = rule.finding();
        assert_eq!(finding.name, "Age");
        assert_eq!(finding.description, "Age band");
        assert_eq!(finding.order, 2);
        assert_eq!(finding.grade, Grade::Conditional);
    }

    #[test]
    fn test_unknown_parameter_is_an_error() {
        let rule = Rule::new("Height", "", 0, |p| {
            p.integer("Height")?;
            Ok(Grade::Pass)
        });
        assert!(matches!(
            rule.evaluate(&params()),
            Err(EngineError::ParameterNotFound { .. })
        ));
    }
}
