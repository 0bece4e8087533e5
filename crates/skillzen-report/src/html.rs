//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use skillzen_core::model::Answer;
use skillzen_core::report::SessionReport;
use skillzen_core::scoring::Outcome;
use skillzen_core::session::Mode;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>SkillZen results | {}</title>\n",
        html_escape(&report.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    let mode = match report.mode {
        Mode::Practice => "practice".to_string(),
        Mode::Timed { duration_secs } => format!("timed, {duration_secs}s limit"),
    };
    html.push_str("<header>\n");
    html.push_str("<h1>SkillZen results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} questions | {} | {}</p>\n",
        html_escape(&report.bank.name),
        report.bank.question_count,
        mode,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(candidate) = &report.candidate {
        html.push_str(&format!(
            "<p class=\"meta\">Answer set: {}</p>\n",
            html_escape(candidate)
        ));
    }
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Percentage</th><th>Answered</th><th>Marks</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{}/{}</td><td>{}%</td><td>{}/{}</td><td>{}/{}</td></tr>\n",
        report.score.correct,
        report.score.scorable,
        report.score.percentage,
        report.answered,
        report.bank.question_count,
        report.score.points_earned,
        report.score.points_total,
    ));
    html.push_str("</tbody></table>\n");

    let categories = category_accuracy(report);
    if !categories.is_empty() {
        html.push_str(&generate_bar_chart(&categories));
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>Question</th><th>Category</th><th>Outcome</th><th>Your answer</th><th>Key</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");

    for q in &report.score.breakdown {
        let (class, label) = match q.outcome {
            Outcome::Correct => ("pass", "correct"),
            Outcome::Incorrect => ("fail", "incorrect"),
            Outcome::Unanswered => ("fail", "unanswered"),
            Outcome::Ungraded => ("", "ungraded"),
        };
        let chosen = match &q.chosen {
            Some(Answer::Choice(i)) => format!("option {i}"),
            Some(Answer::Text(_)) => "free text".to_string(),
            None => "-".to_string(),
        };
        let key = q
            .correct_option
            .map(|i| format!("option {i}"))
            .unwrap_or_else(|| "-".to_string());

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            html_escape(&q.question_id),
            html_escape(&q.category),
            class,
            label,
            html_escape(&chosen),
            key
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Code runs
    if !report.code_runs.is_empty() {
        html.push_str("<section class=\"results\">\n");
        html.push_str("<h2>Code results</h2>\n");
        html.push_str("<table class=\"results-table\">\n");
        html.push_str(
            "<thead><tr><th>Question</th><th>Passed</th><th>Total</th><th>Duration</th></tr></thead>\n",
        );
        html.push_str("<tbody>\n");
        for run in &report.code_runs {
            let class = if run.all_passed() { "pass" } else { "fail" };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}ms</td></tr>\n",
                class,
                html_escape(&run.question_id),
                run.passed,
                run.total,
                run.duration_ms
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Per-category accuracy over graded questions, in bank order.
fn category_accuracy(report: &SessionReport) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut correct: std::collections::HashMap<&str, (u32, u32)> =
        std::collections::HashMap::new();

    for q in &report.score.breakdown {
        if q.outcome == Outcome::Ungraded {
            continue;
        }
        if !order.iter().any(|c| c == &q.category) {
            order.push(q.category.clone());
        }
        let entry = correct.entry(q.category.as_str()).or_insert((0, 0));
        entry.1 += 1;
        if q.outcome == Outcome::Correct {
            entry.0 += 1;
        }
    }

    order
        .into_iter()
        .map(|category| {
            let (hits, total) = correct[category.as_str()];
            let accuracy = if total == 0 {
                0.0
            } else {
                f64::from(hits) / f64::from(total)
            };
            (category, accuracy)
        })
        .collect()
}

fn generate_bar_chart(categories: &[(String, f64)]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = categories.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (category, accuracy)) in categories.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (*accuracy * max_width as f64) as usize;

        let color = if *accuracy >= 0.8 {
            "#22c55e"
        } else if *accuracy >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(category)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            accuracy * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
