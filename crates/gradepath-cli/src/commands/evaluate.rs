//! The `gradepath evaluate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradepath_core::config::load_config_from;
use gradepath_core::engine::GradeEngine;
use gradepath_core::grades::format_gpa;
use gradepath_core::parser::parse_grade_sheet;
use gradepath_core::report::ProgressReport;
use gradepath_core::year::YearStatus;
use gradepath_report::write_html_report;

use super::parse_year;

pub fn execute(
    grades_path: PathBuf,
    year: Option<String>,
    format: String,
    output: Option<PathBuf>,
    fail_if_blocked: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = GradeEngine::bit().with_policy(config.rules.clone());
    let sheet = parse_grade_sheet(engine.catalog(), &grades_path)?;
    tracing::debug!(
        "loaded {} grade(s) from {}",
        sheet.len(),
        grades_path.display()
    );

    if let Some(year) = year {
        let year = parse_year(&year)?;
        let status = engine.evaluate_year(year, &sheet)?;

        let rendered = match format.as_str() {
            "json" => serde_json::to_string_pretty(&status)?,
            "text" => render_year(&status),
            other => anyhow::bail!("format {other:?} is not supported with --year; use text or json"),
        };
        emit(&rendered, output.as_deref())?;

        if fail_if_blocked && !status.can_proceed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let report = ProgressReport::build(&engine, &sheet)?;

    match format.as_str() {
        "text" => emit(&render_report(&report), output.as_deref())?,
        "json" => match &output {
            Some(path) => {
                report.save_json(path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&report)?),
        },
        "markdown" | "md" => emit(&report.to_markdown(), output.as_deref())?,
        "html" => {
            let path = output.unwrap_or_else(|| {
                config.report_dir.join(format!(
                    "progress-{}.html",
                    report.generated_at.format("%Y-%m-%dT%H%M%S")
                ))
            });
            write_html_report(&report, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
        other => anyhow::bail!("unknown format: {other}"),
    }

    if fail_if_blocked && !report.degree.eligible {
        std::process::exit(1);
    }

    Ok(())
}

/// Print to stdout, or write to `output` when given.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            eprintln!("Output written to: {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn render_year(status: &YearStatus) -> String {
    let mut out = format!(
        "{}: GPA {}, {} credits earned\n",
        status.year.label(),
        status.gpa,
        status.earned_credits
    );

    if status.can_proceed {
        match status.year.next() {
            Some(next) => out.push_str(&format!("Can proceed to {}.", next.label())),
            None => out.push_str("All progression rules met."),
        }
    } else if status.warning_message.is_empty() {
        out.push_str("No grades entered yet.");
    } else {
        out.push_str(&status.warning_message);
    }
    out
}

fn render_report(report: &ProgressReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Year", "GPA", "Credits", "Status"]);

    for status in &report.years {
        let state = if status.can_proceed {
            "can proceed".to_string()
        } else if status.warning_message.is_empty() {
            "not started".to_string()
        } else {
            "blocked".to_string()
        };
        table.add_row(vec![
            Cell::new(status.year.label()),
            Cell::new(&status.gpa),
            Cell::new(status.earned_credits),
            Cell::new(state),
        ]);
    }

    let degree = &report.degree;
    let mut out = String::new();
    if let Some(student) = &report.student {
        out.push_str(&format!("Student: {student}\n"));
    }
    out.push_str(&format!("{table}\n\n"));

    let mut warnings = report.year_warnings().peekable();
    if warnings.peek().is_some() {
        out.push_str("Year warnings:\n");
        for status in warnings {
            out.push_str(&format!(
                "  {}: {}\n",
                status.year.label(),
                status.warning_message
            ));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Overall GPA: {} ({} GPA credits)\n",
        format_gpa(report.overall_gpa),
        degree.total_gpa_credits
    ));

    if degree.eligible {
        out.push_str("Degree: eligible");
        return out;
    }

    out.push_str("Degree: not eligible\n");
    for reason in &degree.failed_reasons {
        out.push_str(&format!("  - {reason}\n"));
    }
    if !degree.repeat_subjects.is_empty() {
        out.push_str("\nSubjects to repeat:\n");
        for subject in &degree.repeat_subjects {
            out.push_str(&format!("  - {subject}\n"));
        }
    }
    out.trim_end().to_string()
}
