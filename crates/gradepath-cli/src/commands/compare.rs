//! The `gradepath compare` command.

use std::path::PathBuf;

use anyhow::Result;

use gradepath_core::grades::format_gpa;
use gradepath_core::report::ProgressReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = ProgressReport::load_json(&baseline_path)?;
    let current = ProgressReport::load_json(&current_path)?;

    let change = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", change.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&change)?);
        }
        _ => {
            // text format
            println!(
                "Overall GPA: {} -> {}",
                format_gpa(change.baseline_overall_gpa),
                format_gpa(change.current_overall_gpa)
            );

            for y in &change.years {
                let state = match (y.was_proceeding, y.now_proceeding) {
                    (false, true) => " (now proceeding)",
                    (true, false) => " (no longer proceeding)",
                    _ => "",
                };
                println!(
                    "  {}: {} -> {}{state}",
                    y.year.label(),
                    y.baseline_gpa,
                    y.current_gpa
                );
            }

            match (change.was_eligible, change.now_eligible) {
                (false, true) => println!("\nNow eligible for the degree."),
                (true, false) => println!("\nNo longer eligible for the degree."),
                _ => {}
            }

            if !change.cleared_repeats.is_empty() {
                println!("\nRepeats cleared:");
                for subject in &change.cleared_repeats {
                    println!("  {subject}");
                }
            }

            if !change.new_repeats.is_empty() {
                println!("\nNew repeats:");
                for subject in &change.new_repeats {
                    println!("  {subject}");
                }
            }
        }
    }

    if fail_on_regression && change.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
