//! The `skillzen list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillzen_analysis::config::load_config_from;
use skillzen_core::model::BankCategory;

pub fn execute(
    banks_dir: Option<PathBuf>,
    category_filter: Option<String>,
    company_filter: Option<String>,
    year_filter: Option<u32>,
    search: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dir = banks_dir.unwrap_or(config.banks_dir);

    if !dir.is_dir() {
        println!(
            "No bank directory at {}. Run `skillzen init` to create one.",
            dir.display()
        );
        return Ok(());
    }

    let category_filter: Option<BankCategory> = category_filter
        .map(|c| c.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let mut banks = skillzen_core::parser::load_bank_directory(&dir)?;
    banks.retain(|b| {
        category_filter.map_or(true, |c| b.meta().category == c)
            && company_filter.as_ref().map_or(true, |wanted| {
                b.meta()
                    .company
                    .as_ref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
            })
            && year_filter.map_or(true, |y| b.meta().year == Some(y))
            && search.as_ref().map_or(true, |term| {
                let term = term.to_lowercase();
                let meta = b.meta();
                meta.name.to_lowercase().contains(&term)
                    || meta
                        .company
                        .as_ref()
                        .is_some_and(|c| c.to_lowercase().contains(&term))
                    || meta
                        .role
                        .as_ref()
                        .is_some_and(|r| r.to_lowercase().contains(&term))
            })
    });

    if banks.is_empty() {
        println!("No banks match the given filters.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Category",
        "Questions",
        "Duration",
        "Company",
        "Year",
    ]);

    for bank in &banks {
        let meta = bank.meta();
        table.add_row(vec![
            Cell::new(&meta.id),
            Cell::new(&meta.name),
            Cell::new(meta.category),
            Cell::new(bank.count()),
            Cell::new(format!("{}s", meta.duration_secs)),
            Cell::new(meta.company.as_deref().unwrap_or("-")),
            Cell::new(
                meta.year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }

    println!("{table}");
    println!("\n{} bank(s)", banks.len());

    Ok(())
}
