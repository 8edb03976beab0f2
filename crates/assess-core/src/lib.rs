//! # assess-core
//!
//! Data-driven parameter validation and rule grading engine.
//!
//! This crate answers one question for a set of operator-supplied inputs:
//! - Do these values satisfy the configured rules well enough to pass?
//!
//! ## Key Guarantees
//!
//! 1. **Validated storage**: a parameter only ever holds its default or a value that passed its validator
//! 2. **Deterministic**: identical values and rules always produce identical grades and result text
//! 3. **Complete distribution**: every run reports a count for every [`Grade`], summing to the rule count
//! 4. **No hidden state**: rules read parameters through the [`ParameterSet`] handed to them
//!
//! ## Example
//!
//! ```rust,ignore
//! use assess_core::{AnyParameter, Engine, Grade, Rule};
//!
//! let mut engine = Engine::builder()
//!     .parameter(AnyParameter::text("Name", "Full name", 0, |s: &String| !s.is_empty(), "Non-empty text"))
//!     .parameter(AnyParameter::integer("Weight", "Kilograms", 1, |w: &i32| *w > 0, "Positive integer"))
//!     .rule(Rule::new("Weight", "", 0, |p| Ok(assess_core::weight_grade(p.integer("Weight")?))))
//!     .build()?;
//!
//! engine.set_and_validate("name", "Peter")?;
//! engine.set_and_validate("weight", "80")?;
//! engine.run_rules()?;
//!
//! let outcome = engine.evaluate_outcome()?;
//! println!("{} ({})", outcome.message, outcome.success);
//! ```

pub mod builder;
pub mod criterion;
pub mod engine;
pub mod grade;
pub mod matching;
pub mod parameter;
pub mod rule;

// Re-export main types at crate root
pub use builder::{build, default_parameters, default_rules, weight_grade, EngineBuilder};
pub use criterion::Criterion;
pub use engine::{Engine, Outcome};
pub use grade::{Grade, GradeCounts};
pub use matching::{contains_token, count_matches};
pub use parameter::{
    AnyParameter, ParamKind, ParamType, ParamValue, Parameter, ParameterHandle, ParameterSet,
    ParameterSpec,
};
pub use rule::{Rule, RuleFinding};

/// Re-exported so integrators can declare decimal parameters without a direct dependency.
pub use rust_decimal::Decimal;

use thiserror::Error;

/// Configuration errors raised by the engine.
///
/// None of these can be caused by operator input: they indicate that
/// parameters, rules and the builder were wired together incorrectly.
/// Rejected input is reported through the `bool` returned by
/// [`Engine::set_and_validate`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("No parameter named '{name}' is configured")]
    ParameterNotFound { name: String },

    #[error("Parameter '{name}' holds {actual} values, not {expected}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        actual: ParamType,
    },

    #[error("Duplicate parameter name: {name}")]
    DuplicateParameter { name: String },

    #[error("No text parameter is available to identify the subject")]
    NoIdentityParameter,

    #[error("Rules have not been run yet")]
    NotEvaluated,
}
