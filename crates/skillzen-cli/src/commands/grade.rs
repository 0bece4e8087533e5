//! The `skillzen grade` command.
//!
//! Replays recorded answer sets through an assessment session and writes
//! result reports. A directory of answer sets is graded concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use tokio::sync::Semaphore;

use skillzen_analysis::config::{create_judge, load_config_from};
use skillzen_core::model::{Answer, QuestionBank, QuestionKind};
use skillzen_core::parser;
use skillzen_core::report::{BankSummary, SessionReport};
use skillzen_core::session::{AssessmentController, Mode};
use skillzen_core::traits::{CodeJudge, CodeRunOutcome, CodeRunRequest, SubmissionLanguage};
use skillzen_report::html::write_html_report;
use skillzen_report::markdown::write_markdown_report;

/// A recorded answer set, keyed by question id.
#[derive(Debug, Clone, Deserialize)]
struct AnswerSet {
    /// Label for the person or run the answers belong to.
    #[serde(default)]
    candidate: Option<String>,
    answers: std::collections::HashMap<String, Answer>,
}

fn load_answer_set(path: &Path) -> Result<AnswerSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer set: {}", path.display()))?;
    let mut set: AnswerSet = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answer set: {}", path.display()))?;
    if set.candidate.is_none() {
        set.candidate = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    Ok(set)
}

/// Replay one answer set through a fresh session and score it.
async fn grade_one(
    bank: QuestionBank,
    set: AnswerSet,
    mode: Mode,
    judge: Option<Arc<dyn CodeJudge>>,
    language: SubmissionLanguage,
) -> Result<SessionReport> {
    for id in set.answers.keys() {
        anyhow::ensure!(
            bank.by_id(id).is_some(),
            "answer set refers to unknown question '{id}'"
        );
    }

    let mut session = AssessmentController::new(bank);
    session.start(mode)?;

    // Replay in bank order so errors surface deterministically.
    let ids: Vec<String> = session.bank().all().iter().map(|q| q.id.clone()).collect();
    for id in &ids {
        if let Some(answer) = set.answers.get(id) {
            session
                .select_answer(id, answer.clone())
                .with_context(|| format!("invalid answer for question '{id}'"))?;
        }
    }

    let code_runs = match judge {
        Some(judge) => judge_code_answers(&session, judge.as_ref(), language).await?,
        None => Vec::new(),
    };

    let score = session.submit()?;

    Ok(SessionReport {
        id: uuid::Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        bank: BankSummary::of(session.bank()),
        mode,
        candidate: set.candidate,
        score,
        answered: session.answered_count(),
        elapsed_secs: 0,
        code_runs,
    })
}

/// Run every answered code question through the judge.
async fn judge_code_answers(
    session: &AssessmentController,
    judge: &dyn CodeJudge,
    language: SubmissionLanguage,
) -> Result<Vec<CodeRunOutcome>> {
    let mut requests = Vec::new();
    for q in session.bank().all() {
        let (test_cases, reference_solution) = match &q.kind {
            QuestionKind::Code {
                test_cases,
                reference_solution,
                ..
            } if !test_cases.is_empty() => (test_cases, reference_solution),
            _ => continue,
        };
        if let Some(Answer::Text(code)) = session.ledger().get(&q.id) {
            requests.push(CodeRunRequest {
                question_id: q.id.clone(),
                language,
                code: code.clone(),
                test_cases: test_cases.clone(),
                reference_solution: reference_solution.clone(),
            });
        }
    }

    let mut outcomes = Vec::with_capacity(requests.len());
    for request in &requests {
        let outcome = judge
            .run(request)
            .await
            .with_context(|| format!("judge failed on question '{}'", request.question_id))?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    mode_str: String,
    duration: Option<u64>,
    use_judge: bool,
    language_str: String,
    parallelism: usize,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let language: SubmissionLanguage = language_str
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let config = load_config_from(config_path.as_deref())?;
    let bank = parser::parse_bank(&bank_path)?;

    let mode = match mode_str.as_str() {
        "practice" => Mode::Practice,
        "timed" => Mode::Timed {
            duration_secs: duration.unwrap_or(bank.meta().duration_secs),
        },
        other => anyhow::bail!("unknown mode '{other}' (available: timed, practice)"),
    };

    let judge: Option<Arc<dyn CodeJudge>> = if use_judge {
        Some(create_judge(&config)?)
    } else {
        None
    };

    // Collect answer set files.
    let mut answer_files: Vec<PathBuf> = if answers_path.is_dir() {
        std::fs::read_dir(&answers_path)
            .with_context(|| format!("failed to read directory: {}", answers_path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect()
    } else {
        vec![answers_path.clone()]
    };
    answer_files.sort();
    anyhow::ensure!(
        !answer_files.is_empty(),
        "no .json answer sets found in {}",
        answers_path.display()
    );

    tracing::debug!(
        bank = %bank.meta().id,
        sets = answer_files.len(),
        parallelism,
        "starting grading"
    );
    eprintln!(
        "Grading {} answer set(s) against '{}' ({} questions, {})",
        answer_files.len(),
        bank.meta().name,
        bank.count(),
        match mode {
            Mode::Practice => "practice".to_string(),
            Mode::Timed { duration_secs } => format!("timed, {duration_secs}s"),
        }
    );

    let semaphore = Arc::new(Semaphore::new(parallelism));
    let mut tasks = FuturesUnordered::new();

    for path in answer_files {
        let bank = bank.clone();
        let judge = judge.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.push(tokio::spawn(async move {
            // Semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire_owned().await;
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let result = async {
                let set = load_answer_set(&path)?;
                grade_one(bank, set, mode, judge, language).await
            }
            .await;
            (label, result)
        }));
    }

    let mut reports = Vec::new();
    let mut failed = 0usize;
    while let Some(joined) = tasks.next().await {
        let (label, result) = joined.context("grading task panicked")?;
        match result {
            Ok(report) => {
                eprintln!(
                    "  Done: {} scored {}/{} ({}%)",
                    label, report.score.correct, report.score.scorable, report.score.percentage
                );
                reports.push(report);
            }
            Err(e) => {
                eprintln!("  ERROR: {label}: {e:#}");
                failed += 1;
            }
        }
    }

    anyhow::ensure!(
        !reports.is_empty(),
        "all {failed} answer set(s) failed to grade"
    );
    reports.sort_by(|a, b| a.candidate.cmp(&b.candidate));

    print_summary(&reports);

    // Save outputs
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "html"]
    } else {
        format.split(',').collect()
    };

    for report in &reports {
        let stem = match &report.candidate {
            Some(candidate) => format!("report-{candidate}-{timestamp}"),
            None => format!("report-{timestamp}"),
        };
        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("{stem}.md"));
                    write_markdown_report(report, &path)?;
                    eprintln!("Markdown report: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    if failed > 0 {
        eprintln!("\n{failed} answer set(s) failed to grade.");
    }

    Ok(())
}

fn print_summary(reports: &[SessionReport]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Answer set",
        "Score",
        "Percentage",
        "Answered",
        "Code passed",
    ]);

    for report in reports {
        let code = if report.code_runs.is_empty() {
            "-".to_string()
        } else {
            let passed: u32 = report.code_runs.iter().map(|r| r.passed).sum();
            let total: u32 = report.code_runs.iter().map(|r| r.total).sum();
            format!("{passed}/{total}")
        };
        table.add_row(vec![
            Cell::new(report.candidate.as_deref().unwrap_or("-")),
            Cell::new(format!(
                "{}/{}",
                report.score.correct, report.score.scorable
            )),
            Cell::new(format!("{}%", report.score.percentage)),
            Cell::new(format!(
                "{}/{}",
                report.answered, report.bank.question_count
            )),
            Cell::new(code),
        ]);
    }

    eprintln!("\n{table}");
}
