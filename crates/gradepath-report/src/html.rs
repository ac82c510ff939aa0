//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use gradepath_core::grades::format_gpa;
use gradepath_core::report::ProgressReport;
use gradepath_core::year::YearStatus;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from a progress report.
pub fn generate_html(report: &ProgressReport) -> String {
    let student = report.student.as_deref().unwrap_or("Unnamed student");
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradepath report: {}</title>\n",
        html_escape(student)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gradepath report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Student: <strong>{}</strong> | overall GPA {} | {}</p>\n",
        html_escape(student),
        format_gpa(report.overall_gpa),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Year progression
    html.push_str("<section class=\"years\">\n");
    html.push_str("<h2>Progression</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Year</th><th>GPA</th><th>Credits</th><th>Status</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for status in &report.years {
        let (class, text) = if status.can_proceed {
            ("pass", "Can proceed".to_string())
        } else if status.warning_message.is_empty() {
            ("idle", "Not started".to_string())
        } else {
            ("fail", "Blocked".to_string())
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            status.year.label(),
            html_escape(&status.gpa),
            status.earned_credits,
            text
        ));
    }
    html.push_str("</tbody></table>\n");

    let mut warnings = report.year_warnings().peekable();
    if warnings.peek().is_some() {
        html.push_str("<ul class=\"warnings\">\n");
        for status in warnings {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                status.year.label(),
                html_escape(&status.warning_message)
            ));
        }
        html.push_str("</ul>\n");
    }

    if !report.years.is_empty() {
        html.push_str(&generate_gpa_chart(&report.years));
    }
    html.push_str("</section>\n");

    // Degree
    let degree = &report.degree;
    html.push_str("<section class=\"degree\">\n");
    html.push_str("<h2>Degree</h2>\n");
    html.push_str(&format!(
        "<p class=\"verdict {}\">{}</p>\n",
        if degree.eligible { "pass" } else { "fail" },
        if degree.eligible {
            "Eligible for the degree"
        } else {
            "Not yet eligible for the degree"
        }
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} GPA credits | Level I {} / Level II {} / Level III {} | C or better: {} / {} / {}</p>\n",
        degree.total_gpa_credits,
        degree.level_credits.year1,
        degree.level_credits.year2,
        degree.level_credits.year3,
        degree.level_c_credits.year1,
        degree.level_c_credits.year2,
        degree.level_c_credits.year3,
    ));

    if !degree.eligible {
        html.push_str("<h3>Unmet requirements</h3>\n<ul class=\"reasons\">\n");
        for reason in &degree.failed_reasons {
            html.push_str(&format!("<li>{}</li>\n", html_escape(reason)));
        }
        html.push_str("</ul>\n");

        if !degree.repeat_subjects.is_empty() {
            html.push_str("<h3>Subjects to repeat</h3>\n<ul class=\"repeats\">\n");
            for subject in &degree.repeat_subjects {
                html.push_str(&format!("<li>{}</li>\n", html_escape(subject)));
            }
            html.push_str("</ul>\n");
        }
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ProgressReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of each year's GPA on the 4.0 scale.
fn generate_gpa_chart(years: &[YearStatus]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = years.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, status) in years.iter().enumerate() {
        let gpa: f64 = status.gpa.parse().unwrap_or(0.0);
        let y = i * (bar_height + padding) + padding;
        let width = (gpa / 4.0 * max_width as f64).clamp(0.0, max_width as f64) as usize;

        let color = if status.can_proceed {
            "#22c55e"
        } else if gpa >= 2.0 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            status.year.label()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            html_escape(&status.gpa)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --idle: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --idle: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.idle { background: var(--idle); }
.warnings li { margin: 0.25rem 0; }
.verdict { padding: 0.75rem 1rem; border-radius: 8px; font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
