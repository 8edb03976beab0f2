//! Grades and grade distributions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single rule.
///
/// Ordered `Unevaluated < Fail < Conditional < Pass`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// The rule has not been run
    #[default]
    Unevaluated,
    Fail,
    Conditional,
    Pass,
}

impl Grade {
    /// Every grade, in ascending order.
    pub const ALL: [Grade; 4] = [
        Grade::Unevaluated,
        Grade::Fail,
        Grade::Conditional,
        Grade::Pass,
    ];

    pub fn is_pass(self) -> bool {
        self == Grade::Pass
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Unevaluated => "Unevaluated",
            Grade::Fail => "Fail",
            Grade::Conditional => "Conditional",
            Grade::Pass => "Pass",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How many rules produced each grade.
///
/// Always carries an entry for every [`Grade`], zero included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GradeCounts(BTreeMap<Grade, usize>);

impl GradeCounts {
    pub fn new() -> Self {
        Self(Grade::ALL.iter().map(|g| (*g, 0)).collect())
    }

    pub fn record(&mut self, grade: Grade) {
        *self.0.entry(grade).or_insert(0) += 1;
    }

    pub fn get(&self, grade: Grade) -> usize {
        self.0.get(&grade).copied().unwrap_or(0)
    }

    /// Sum over all grades, equal to the number of rules counted.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Count of every grade other than Pass.
    pub fn non_passing(&self) -> usize {
        self.total() - self.get(Grade::Pass)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        self.0.iter().map(|(g, n)| (*g, *n))
    }
}

impl Default for GradeCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Grade> for GradeCounts {
    fn from_iter<I: IntoIterator<Item = Grade>>(iter: I) -> Self {
        let mut counts = Self::new();
        for grade in iter {
            counts.record(grade);
        }
        counts
    }
}

impl fmt::Display for GradeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(g, n)| format!("{}: {}", g, n)).collect();
        write!(f, "{}", parts.join(", "))
    }
}
