//! Console session driving the engine.
//!
//! Reads one raw line per parameter, re-prompting with the parameter's
//! validation text until the engine accepts it, then runs the rules and
//! prints the verdict. Answers can also come from a YAML or JSON file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use assess_core::{Engine, Outcome};
use owo_colors::OwoColorize;
use serde::Deserialize;

const YES: &[&str] = &["y", "yes"];
const NO: &[&str] = &["n", "no"];

/// How the verdict is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Output settings for a session.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    pub format: Format,
    pub color: bool,
}

impl Presenter {
    fn error(&self, out: &mut impl Write, text: &str) -> Result<()> {
        if self.color {
            writeln!(out, "{}", text.red())?;
        } else {
            writeln!(out, "{}", text)?;
        }
        Ok(())
    }

    pub fn outcome(&self, out: &mut impl Write, outcome: &Outcome) -> Result<()> {
        match self.format {
            Format::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
            }
            Format::Text if self.color && outcome.success => {
                writeln!(out, "\n{}", outcome.message.green())?
            }
            Format::Text if self.color => writeln!(out, "\n{}", outcome.message.red())?,
            Format::Text => writeln!(out, "\n{}", outcome.message)?,
        }
        Ok(())
    }
}

/// Prompt for every parameter, evaluate, and optionally repeat.
///
/// Returns the outcome of the last completed session.
pub fn run_interactive<R: BufRead, W: Write>(
    engine: &mut Engine,
    input: &mut R,
    out: &mut W,
    presenter: Presenter,
    once: bool,
) -> Result<Outcome> {
    loop {
        for spec in engine.parameter_specs() {
            write!(out, "{} ({}): ", spec.name, spec.description)?;
            out.flush()?;

            loop {
                let raw = read_line(input)?;
                if engine.set_and_validate(&spec.name, &raw)? {
                    break;
                }
                presenter.error(out, &spec.validation_error_text)?;
            }
        }

        engine.run_rules()?;
        let outcome = engine.evaluate_outcome()?;
        presenter.outcome(out, &outcome)?;

        if once || !ask_repeat(input, out, presenter)? {
            return Ok(outcome);
        }

        engine.reset_all_parameters();
    }
}

fn ask_repeat<R: BufRead, W: Write>(input: &mut R, out: &mut W, presenter: Presenter) -> Result<bool> {
    write!(out, "\nEvaluate another candidate? (y/n) ")?;
    out.flush()?;

    loop {
        let answer = read_line(input)?.trim().to_lowercase();
        if YES.contains(&answer.as_str()) {
            return Ok(true);
        }
        if NO.contains(&answer.as_str()) {
            return Ok(false);
        }
        presenter.error(out, "Answer not understood, please repeat.")?;
    }
}

/// One line without its terminator; closed input is an error.
fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read input")? == 0 {
        bail!("Input closed before the session finished");
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// A scalar answer as written in an answers file.
///
/// A key with no value (`Conditions:` in YAML, `null` in JSON) is an empty answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Integer(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAnswer::Integer(i) => write!(f, "{}", i),
            RawAnswer::Float(x) => write!(f, "{}", x),
            RawAnswer::Text(s) => f.write_str(s),
            RawAnswer::Empty => Ok(()),
        }
    }
}

pub type Answers = BTreeMap<String, RawAnswer>;

/// Load answers from a `.json` file, or YAML otherwise.
pub fn load_answers(path: &Path) -> Result<Answers> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let answers = if is_json {
        serde_json::from_str(&contents).context("Failed to parse answers JSON")?
    } else {
        serde_yaml::from_str(&contents).context("Failed to parse answers YAML")?
    };
    Ok(answers)
}

/// Feed every parameter from `answers` and evaluate once.
pub fn run_answers(engine: &mut Engine, answers: &Answers) -> Result<Outcome> {
    for spec in engine.parameter_specs() {
        let raw = answers
            .iter()
            .find(|(name, _)| name.to_lowercase() == spec.name.to_lowercase())
            .map(|(_, answer)| answer.to_string())
            .with_context(|| format!("No answer for parameter '{}'", spec.name))?;

        if !engine.set_and_validate(&spec.name, &raw)? {
            bail!(
                "Answer '{}' for '{}' was rejected: {}",
                raw,
                spec.name,
                spec.validation_error_text
            );
        }
    }

    engine.run_rules()?;
    Ok(engine.evaluate_outcome()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::{self, Thresholds};
    use std::io::Cursor;

    const PLAIN: Presenter = Presenter {
        format: Format::Text,
        color: false,
    };

    fn engine() -> Engine {
        screening::engine(Thresholds::default()).unwrap()
    }

    #[test]
    fn test_interactive_reprompts_on_rejection() {
        let mut engine = engine();
        let mut input = Cursor::new("\nPeter\nabc\n80\n180\n30\n2\n1\n\n");
        let mut out = Vec::new();

        let outcome = run_interactive(&mut engine, &mut input, &mut out, PLAIN, true).unwrap();
        assert!(outcome.success);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Name (Name as text): "));
        assert!(printed.contains("Non-empty text\n"));
        assert!(printed.contains("Integer greater than zero\n"));
        assert!(printed.contains("Decimal from 0 to 1\n"));
        assert!(printed.ends_with("Candidate Peter is suitable\n"));
    }

    #[test]
    fn test_interactive_repeat_resets_parameters() {
        let mut engine = engine();
        let first = "Peter\n80\n180\n30\n1\n\n";
        let second = "Ivan\n50\n180\n30\n1\nSmoking\n";
        let script = format!("{}maybe\nY\n{}n\n", first, second);
        let mut input = Cursor::new(script);
        let mut out = Vec::new();

        let outcome = run_interactive(&mut engine, &mut input, &mut out, PLAIN, false).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.subject, "Ivan");

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Answer not understood, please repeat."));
        assert!(printed.contains("Candidate Peter is suitable"));
        assert!(printed.contains(" * Rule 'Smoking' (Fail)"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut engine = engine();
        let mut input = Cursor::new("Peter\n");
        let mut out = Vec::new();
        assert!(run_interactive(&mut engine, &mut input, &mut out, PLAIN, true).is_err());
    }

    #[test]
    fn test_answers_from_yaml() {
        let answers: Answers = serde_yaml::from_str(
            "name: Peter\nweight: 80\nheight: 180\nage: 30\nvision: 1.0\nconditions: ''\n",
        )
        .unwrap();
        let mut engine = engine();
        let outcome = run_answers(&mut engine, &answers).unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn test_answers_from_json() {
        let answers: Answers = serde_json::from_str(
            r#"{"Name": "Olga", "Weight": 72, "Height": 165, "Age": 36, "Vision": 0.5, "Conditions": "Cough"}"#,
        )
        .unwrap();
        let mut engine = engine();
        let outcome = run_answers(&mut engine, &answers).unwrap();
        assert!(!outcome.success);
        assert!(outcome.findings.iter().any(|f| f.name == "Vision"));
    }

    #[test]
    fn test_blank_answer_is_empty_text() {
        let answers: Answers = serde_yaml::from_str(
            "Name: Peter\nWeight: 80\nHeight: 180\nAge: 30\nVision: 1\nConditions:\n",
        )
        .unwrap();
        assert_eq!(answers["Conditions"].to_string(), "");

        let mut engine = engine();
        let outcome = run_answers(&mut engine, &answers).unwrap();
        assert!(outcome.success);

        let answers: Answers = serde_json::from_str(r#"{"Conditions": null}"#).unwrap();
        assert!(matches!(answers["Conditions"], RawAnswer::Empty));
    }

    #[test]
    fn test_rejected_answer_reports_validation_text() {
        let answers: Answers = serde_yaml::from_str(
            "Name: Peter\nWeight: -3\nHeight: 180\nAge: 30\nVision: 1\nConditions: ''\n",
        )
        .unwrap();
        let mut engine = engine();
        let err = run_answers(&mut engine, &answers).unwrap_err();
        assert!(err.to_string().contains("Integer greater than zero"));
    }

    #[test]
    fn test_missing_answer() {
        let answers: Answers = serde_yaml::from_str("Name: Peter\n").unwrap();
        let mut engine = engine();
        let err = run_answers(&mut engine, &answers).unwrap_err();
        assert!(err.to_string().contains("Weight"));
    }

    #[test]
    fn test_json_display() {
        let answers: Answers =
            serde_yaml::from_str("Name: Peter\nWeight: 80\nHeight: 180\nAge: 30\nVision: 1\nConditions: ''\n")
                .unwrap();
        let mut engine = engine();
        let outcome = run_answers(&mut engine, &answers).unwrap();

        let mut out = Vec::new();
        let presenter = Presenter {
            format: Format::Json,
            color: false,
        };
        presenter.outcome(&mut out, &outcome).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["subject"], "Peter");
    }
}
