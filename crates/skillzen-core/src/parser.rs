//! TOML question-bank parser.
//!
//! Loads question banks from TOML files and directories, and lints them for
//! non-fatal content problems.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    default_duration_secs, BankMeta, JudgeCase, Question, QuestionBank, QuestionKind,
    WorkedExample,
};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    category: String,
    #[serde(default = "default_duration_secs")]
    duration_secs: u64,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    pass_percentage: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    category: String,
    prompt: String,
    kind: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default = "default_points")]
    points: u32,
    // single_choice
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_option: Option<usize>,
    // code
    #[serde(default)]
    constraints: Vec<String>,
    #[serde(default)]
    examples: Vec<TomlExample>,
    #[serde(default)]
    test_cases: Vec<TomlJudgeCase>,
    #[serde(default)]
    reference_solution: Option<String>,
    // descriptive
    #[serde(default)]
    sample_answer: Option<String>,
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    follow_up: Vec<String>,
}

fn default_points() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct TomlExample {
    input: String,
    output: String,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlJudgeCase {
    input: String,
    expected_output: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let header = parsed.bank;
    let meta = BankMeta {
        id: header.id,
        name: header.name,
        description: header.description,
        category: header
            .category
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{e}"))?,
        duration_secs: header.duration_secs,
        difficulty: header
            .difficulty
            .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
            .transpose()?,
        company: header.company,
        year: header.year,
        role: header.role,
        pass_percentage: header.pass_percentage,
    };

    let questions = parsed
        .questions
        .into_iter()
        .map(convert_question)
        .collect::<Result<Vec<_>>>()?;

    let bank = QuestionBank::new(meta, questions)
        .with_context(|| format!("invalid bank: {}", source_path.display()))?;

    Ok(bank)
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    let kind = match q.kind.to_lowercase().as_str() {
        "single_choice" | "mcq" => QuestionKind::SingleChoice {
            options: q.options,
            correct_option: q.correct_option,
        },
        "code" | "coding" => QuestionKind::Code {
            constraints: q.constraints,
            examples: q
                .examples
                .into_iter()
                .map(|e| WorkedExample {
                    input: e.input,
                    output: e.output,
                    explanation: e.explanation,
                })
                .collect(),
            test_cases: q
                .test_cases
                .into_iter()
                .map(|c| JudgeCase {
                    input: c.input,
                    expected_output: c.expected_output,
                })
                .collect(),
            reference_solution: q.reference_solution,
        },
        "descriptive" => QuestionKind::Descriptive {
            sample_answer: q.sample_answer,
            tips: q.tips,
            follow_up: q.follow_up,
        },
        other => anyhow::bail!("question '{}': unknown kind '{other}'", q.id),
    };

    Ok(Question {
        id: q.id,
        category: q.category,
        prompt: q.prompt,
        kind,
        explanation: q.explanation,
        difficulty: q
            .difficulty
            .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
            .transpose()?,
        points: q.points,
    })
}

/// Load every `.toml` bank in a directory, sorted by file name.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read bank directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    anyhow::ensure!(
        !paths.is_empty(),
        "no .toml bank files found in {}",
        dir.display()
    );

    paths.iter().map(|p| parse_bank(p)).collect()
}

/// A non-fatal content problem in a bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending question, or `None` for bank-level problems.
    pub question_id: Option<String>,
    pub message: String,
}

/// Lint a bank for content problems that don't prevent loading.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.meta().duration_secs == 0 {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "duration_secs is 0; timed mode will submit immediately".into(),
        });
    }
    if let Some(pct) = bank.meta().pass_percentage {
        if pct > 100 {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("pass_percentage {pct} exceeds 100"),
            });
        }
    }

    for q in bank.all() {
        match &q.kind {
            QuestionKind::SingleChoice {
                options,
                correct_option,
            } => {
                if options.len() < 2 {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: format!("only {} option(s); expected at least 2", options.len()),
                    });
                }
                if correct_option.is_none() {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: "single-choice question without a key; it will not be graded"
                            .into(),
                    });
                } else if q.explanation.is_none() {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: "graded question has no explanation".into(),
                    });
                }
            }
            QuestionKind::Code { test_cases, .. } => {
                if test_cases.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: "code question has no test cases; the judge cannot run it".into(),
                    });
                }
            }
            QuestionKind::Descriptive { .. } => {}
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BankCategory;

    const SAMPLE: &str = r#"
[bank]
id = "aptitude-basics"
name = "Aptitude Basics"
description = "Warm-up aptitude questions"
category = "aptitude"
duration_secs = 1800

[[questions]]
id = "speed"
category = "Quantitative"
prompt = "If a train travels 120 km in 2 hours, what is its speed in km/h?"
kind = "single_choice"
options = ["50 km/h", "60 km/h", "70 km/h", "80 km/h"]
correct_option = 1
explanation = "Speed = Distance / Time = 120 / 2 = 60 km/h"
difficulty = "easy"

[[questions]]
id = "series"
category = "Logical Reasoning"
prompt = "Complete the series: 2, 6, 12, 20, 30, ?"
kind = "mcq"
options = ["40", "42", "44", "46"]
correct_option = 1
explanation = "Differences grow by 2: 30 + 12 = 42"
difficulty = "medium"
"#;

    #[test]
    fn parse_sample_bank() {
        let bank = parse_bank_str(SAMPLE, Path::new("sample.toml")).unwrap();
        assert_eq!(bank.meta().id, "aptitude-basics");
        assert_eq!(bank.meta().category, BankCategory::Aptitude);
        assert_eq!(bank.count(), 2);
        assert_eq!(bank.by_id("speed").unwrap().correct_option(), Some(1));
        assert_eq!(bank.scorable_count(), 2);
    }

    #[test]
    fn parse_code_question() {
        let content = r#"
[bank]
id = "coding"
name = "Coding"
category = "coding"

[[questions]]
id = "two-sum"
category = "DSA"
prompt = "Return indices of two numbers adding to target."
kind = "code"
constraints = ["2 <= nums.length <= 10^4"]
points = 10

[[questions.examples]]
input = "nums = [2,7,11,15], target = 9"
output = "[0,1]"

[[questions.test_cases]]
input = "[2,7,11,15], 9"
expected_output = "[0,1]"
"#;
        let bank = parse_bank_str(content, Path::new("coding.toml")).unwrap();
        let q = bank.by_id("two-sum").unwrap();
        assert_eq!(q.points, 10);
        assert!(!q.is_scorable());
        match &q.kind {
            QuestionKind::Code { test_cases, .. } => assert_eq!(test_cases.len(), 1),
            other => panic!("expected code question, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let content = r#"
[bank]
id = "b"
name = "B"
category = "aptitude"

[[questions]]
id = "q1"
prompt = "?"
kind = "jeopardy"
"#;
        let err = parse_bank_str(content, Path::new("b.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown kind 'jeopardy'"));
    }

    #[test]
    fn duplicate_ids_surface_as_invalid_bank() {
        let content = r#"
[bank]
id = "b"
name = "B"
category = "aptitude"

[[questions]]
id = "q1"
prompt = "?"
kind = "single_choice"
options = ["a", "b"]
correct_option = 0

[[questions]]
id = "q1"
prompt = "again?"
kind = "single_choice"
options = ["a", "b"]
correct_option = 1
"#;
        let err = parse_bank_str(content, Path::new("b.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate question id"));
    }

    #[test]
    fn load_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), SAMPLE.replace("aptitude-basics", "second"))
            .unwrap();
        std::fs::write(dir.path().join("a.toml"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 2);
        assert_eq!(banks[0].meta().id, "aptitude-basics");
        assert_eq!(banks[1].meta().id, "second");
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_bank_directory(dir.path()).is_err());
    }

    #[test]
    fn validation_flags_keyless_and_short_option_questions() {
        let content = r#"
[bank]
id = "b"
name = "B"
category = "technical"
duration_secs = 0

[[questions]]
id = "keyless"
prompt = "?"
kind = "single_choice"
options = ["only one"]

[[questions]]
id = "no-cases"
prompt = "write code"
kind = "code"
"#;
        let bank = parse_bank_str(content, Path::new("b.toml")).unwrap();
        let warnings = validate_bank(&bank);
        let messages: Vec<_> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("duration_secs is 0")));
        assert!(messages.iter().any(|m| m.contains("without a key")));
        assert!(messages.iter().any(|m| m.contains("at least 2")));
        assert!(messages.iter().any(|m| m.contains("no test cases")));
    }
}
