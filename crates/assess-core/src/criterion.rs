//! Success criteria over grade distributions.

use std::fmt;

use crate::grade::{Grade, GradeCounts};

type CriterionFn = Box<dyn Fn(&GradeCounts) -> bool + Send + Sync>;

/// Decides pass or fail from a [`GradeCounts`] distribution.
pub struct Criterion {
    description: String,
    check: CriterionFn,
}

impl Criterion {
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&GradeCounts) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Box::new(check),
        }
    }

    /// Zero Conditional and zero Fail grades.
    pub fn no_failures() -> Self {
        Self::limits(&[(Grade::Conditional, 0), (Grade::Fail, 0)])
    }

    /// Each listed grade may occur at most the given number of times.
    pub fn limits(limits: &[(Grade, usize)]) -> Self {
        let limits = limits.to_vec();
        let description = limits
            .iter()
            .map(|(grade, max)| format!("{} <= {}", grade, max))
            .collect::<Vec<_>>()
            .join(", ");

        Self::new(description, move |counts| {
            limits.iter().all(|(grade, max)| counts.get(*grade) <= *max)
        })
    }

    pub fn is_met(&self, counts: &GradeCounts) -> bool {
        (self.check)(counts)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Default for Criterion {
    fn default() -> Self {
        Self::no_failures()
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
