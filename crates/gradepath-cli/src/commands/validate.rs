//! The `gradepath validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradepath_core::catalog::Catalog;
use gradepath_core::parser::{load_grade_directory, parse_grade_sheet, validate_grade_sheet};

pub fn execute(grades_path: PathBuf) -> Result<()> {
    let catalog = Catalog::bit();

    let sheets = if grades_path.is_dir() {
        load_grade_directory(&catalog, &grades_path)?
    } else {
        let sheet = parse_grade_sheet(&catalog, &grades_path)?;
        vec![(grades_path, sheet)]
    };

    let mut total_warnings = 0;

    for (path, sheet) in &sheets {
        println!(
            "Grade sheet: {} ({} grade(s){})",
            path.display(),
            sheet.len(),
            sheet
                .student
                .as_ref()
                .map(|s| format!(", {s}"))
                .unwrap_or_default()
        );

        let warnings = validate_grade_sheet(&catalog, sheet);
        for w in &warnings {
            let prefix = w
                .code
                .as_ref()
                .map(|code| format!("  [{code}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All grade sheets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
