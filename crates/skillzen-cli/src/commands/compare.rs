//! The `skillzen compare` command.

use std::path::PathBuf;

use anyhow::Result;

use skillzen_core::report::SessionReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = SessionReport::load_json(&baseline_path)?;
    let current = SessionReport::load_json(&current_path)?;

    if baseline.bank.id != current.bank.id {
        eprintln!(
            "Warning: comparing attempts at different banks ('{}' vs '{}')",
            baseline.bank.id, current.bank.id
        );
    }

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            // text format
            println!(
                "Overall: {}% -> {}%",
                progress.baseline_percentage, progress.current_percentage
            );
            println!(
                "Categories: {} improved, {} declined, {} steady",
                progress.improved.len(),
                progress.declined.len(),
                progress.steady
            );

            if !progress.improved.is_empty() {
                println!("\nImproved:");
                for d in &progress.improved {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        d.category, d.baseline_pct, d.current_pct, d.delta
                    );
                }
            }

            if !progress.declined.is_empty() {
                println!("\nDeclined:");
                for d in &progress.declined {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        d.category, d.baseline_pct, d.current_pct, d.delta
                    );
                }
            }

            if progress.new_categories > 0 {
                println!("\n{} new categor(ies)", progress.new_categories);
            }
        }
    }

    if fail_on_decline && progress.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
