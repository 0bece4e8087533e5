//! Markdown report generator.

use std::path::Path;

use anyhow::Result;

use skillzen_core::model::Answer;
use skillzen_core::report::SessionReport;
use skillzen_core::scoring::Outcome;
use skillzen_core::session::Mode;

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "correct",
        Outcome::Incorrect => "incorrect",
        Outcome::Unanswered => "unanswered",
        Outcome::Ungraded => "ungraded",
    }
}

fn answer_label(answer: &Option<Answer>) -> String {
    match answer {
        Some(Answer::Choice(i)) => format!("option {i}"),
        Some(Answer::Text(t)) => {
            // Keep long free text out of the table.
            if t.chars().count() > 40 {
                let prefix: String = t.chars().take(40).collect();
                format!("\"{prefix}...\"")
            } else {
                format!("\"{t}\"")
            }
        }
        None => "-".into(),
    }
}

/// Render a session report as markdown.
pub fn generate_markdown(report: &SessionReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} - Results\n\n", report.bank.name));
    md.push_str(&format!(
        "- Bank: `{}` ({} questions, {})\n",
        report.bank.id, report.bank.question_count, report.bank.category
    ));
    let mode = match report.mode {
        Mode::Practice => "practice".to_string(),
        Mode::Timed { duration_secs } => format!("timed ({duration_secs}s)"),
    };
    md.push_str(&format!("- Mode: {mode}\n"));
    if let Some(candidate) = &report.candidate {
        md.push_str(&format!("- Answer set: {candidate}\n"));
    }
    md.push_str(&format!(
        "- Taken: {}\n\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str(&format!(
        "**Score: {}/{} ({}%)**, {} of {} questions answered\n\n",
        report.score.correct,
        report.score.scorable,
        report.score.percentage,
        report.answered,
        report.bank.question_count
    ));
    if report.score.points_total > 0 {
        md.push_str(&format!(
            "Marks: {}/{}\n\n",
            report.score.points_earned, report.score.points_total
        ));
    }

    md.push_str("## Breakdown\n\n");
    md.push_str("| Question | Category | Outcome | Your answer | Key |\n");
    md.push_str("|----------|----------|---------|-------------|-----|\n");
    for q in &report.score.breakdown {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            q.question_id,
            q.category,
            outcome_label(q.outcome),
            answer_label(&q.chosen),
            q.correct_option
                .map(|i| format!("option {i}"))
                .unwrap_or_else(|| "-".into())
        ));
    }
    md.push('\n');

    if !report.code_runs.is_empty() {
        md.push_str("## Code results\n\n");
        md.push_str("| Question | Passed | Total |\n");
        md.push_str("|----------|--------|-------|\n");
        for run in &report.code_runs {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                run.question_id, run.passed, run.total
            ));
        }
        md.push('\n');
    }

    md
}

/// Write the markdown rendering to a file, creating parent directories.
pub fn write_markdown_report(report: &SessionReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_markdown(report))?;
    Ok(())
}
