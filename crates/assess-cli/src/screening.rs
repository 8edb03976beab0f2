//! Candidate screening configuration.
//!
//! Six parameters, ten rules and a threshold criterion describing a
//! physical and medical questionnaire.

use assess_core::{weight_grade, AnyParameter, Criterion, Decimal, Engine, Grade, ParameterSet, Rule};

pub const NAME: &str = "Name";
pub const WEIGHT: &str = "Weight";
pub const HEIGHT: &str = "Height";
pub const AGE: &str = "Age";
pub const VISION: &str = "Vision";
pub const CONDITIONS: &str = "Conditions";

/// Conditions a therapist screens for.
pub const THERAPIST_LIST: &[&str] = &[
    "RunnyNose",
    "Bronchitis",
    "Viruses",
    "Allergy",
    "Tonsillitis",
    "Insomnia",
];

/// Conditions a psychiatrist screens for.
pub const PSYCHIATRIST_LIST: &[&str] = &["Alcoholism", "Insomnia", "DrugAddiction", "Injuries"];

/// Criterion thresholds, overridable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub max_conditional: usize,
    pub max_fail: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_conditional: 2,
            max_fail: 0,
        }
    }
}

pub fn engine(thresholds: Thresholds) -> Result<Engine, assess_core::EngineError> {
    Engine::builder()
        .parameters(parameters())
        .rules(rules())
        .criterion(criterion(thresholds))
        .identity(NAME)
        .subject_label("Candidate")
        .build()
}

pub fn parameters() -> Vec<AnyParameter> {
    let positive = "Integer greater than zero";
    vec![
        AnyParameter::text(NAME, "Name as text", 0, |s: &String| !s.is_empty(), "Non-empty text"),
        AnyParameter::integer(WEIGHT, positive, 1, |v: &i32| *v > 0, positive),
        AnyParameter::integer(HEIGHT, positive, 2, |v: &i32| *v > 0, positive),
        AnyParameter::integer(AGE, positive, 3, |v: &i32| *v > 0, positive),
        AnyParameter::decimal(
            VISION,
            "Decimal from 0 to 1",
            4,
            |v: &Decimal| *v >= Decimal::ZERO && *v <= Decimal::ONE,
            "Decimal from 0 to 1",
        ),
        AnyParameter::text(
            CONDITIONS,
            "Illnesses and habits, separated by spaces",
            5,
            |_: &String| true,
            "",
        ),
    ]
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("Weight", "", 0, |p| Ok(weight_grade(p.integer(WEIGHT)?))),
        Rule::new("Height", "", 1, |p| Ok(height_grade(p.integer(HEIGHT)?))),
        Rule::new("Age", "", 2, |p| Ok(age_grade(p.integer(AGE)?))),
        Rule::new("Vision", "", 3, |p| {
            Ok(if p.decimal(VISION)? == Decimal::ONE { Grade::Pass } else { Grade::Fail })
        }),
        Rule::new("Smoking", "", 4, |p| {
            Ok(if p.contains_token(CONDITIONS, "Smoking")? { Grade::Fail } else { Grade::Pass })
        }),
        Rule::new("Therapist", "", 5, |p| {
            Ok(match p.count_matches(CONDITIONS, THERAPIST_LIST)? {
                0..=2 => Grade::Pass,
                3 => Grade::Conditional,
                _ => Grade::Fail,
            })
        }),
        Rule::new("Psychiatrist", "", 6, |p| {
            Ok(match p.count_matches(CONDITIONS, PSYCHIATRIST_LIST)? {
                0 => Grade::Pass,
                1 => Grade::Conditional,
                _ => Grade::Fail,
            })
        }),
        Rule::new("Weight and habits", "", 7, weight_and_habits),
        Rule::new("Odd", "", 8, |p| {
            Ok(if p.text(NAME)?.to_lowercase().starts_with('p') {
                Grade::Pass
            } else if p.integer(AGE)? > 68 {
                Grade::Conditional
            } else {
                Grade::Fail
            })
        }),
        Rule::new("Arithmetic", "", 9, |p| {
            let height = p.integer(HEIGHT)?;
            Ok(if height % 3 == 0 && p.contains_token(CONDITIONS, "RunnyNose")? {
                Grade::Fail
            } else if height % 2 == 0 {
                Grade::Pass
            } else {
                Grade::Conditional
            })
        }),
    ]
}

/// Fewer than `max_conditional + 1` Conditional and at most `max_fail` Fail grades.
pub fn criterion(thresholds: Thresholds) -> Criterion {
    Criterion::limits(&[
        (Grade::Conditional, thresholds.max_conditional),
        (Grade::Fail, thresholds.max_fail),
    ])
}

fn height_grade(height: i32) -> Grade {
    match height {
        170..=185 => Grade::Pass,
        160..=169 | 186..=190 => Grade::Conditional,
        _ => Grade::Fail,
    }
}

fn age_grade(age: i32) -> Grade {
    match age {
        25..=35 => Grade::Pass,
        23..=24 | 36..=37 => Grade::Conditional,
        _ => Grade::Fail,
    }
}

fn weight_and_habits(p: &ParameterSet) -> Result<Grade, assess_core::EngineError> {
    let weight = p.integer(WEIGHT)?;
    let infected = p.contains_token(CONDITIONS, "Cold")? || p.contains_token(CONDITIONS, "Viruses")?;

    if p.contains_token(CONDITIONS, "Smoking")? && infected && extreme_weight(weight) {
        Ok(Grade::Fail)
    } else if infected && weight > 110 {
        Ok(Grade::Conditional)
    } else {
        Ok(Grade::Pass)
    }
}

/// Never true: the questionnaire defines the band as above 120 and below 60 at once.
#[allow(clippy::impossible_comparisons)]
fn extreme_weight(weight: i32) -> bool {
    weight > 120 && weight < 60
}
