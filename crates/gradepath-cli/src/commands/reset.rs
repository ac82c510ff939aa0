//! The `gradepath reset` command.

use std::path::PathBuf;

use anyhow::Result;

use gradepath_core::engine::GradeEngine;
use gradepath_core::parser::{parse_grade_sheet, write_grade_sheet};

use super::parse_year;

pub fn execute(grades_path: PathBuf, year: String) -> Result<()> {
    let year = parse_year(&year)?;
    let engine = GradeEngine::bit();

    let mut sheet = parse_grade_sheet(engine.catalog(), &grades_path)?;
    let patch = engine.reset_year(year)?;
    sheet.apply(&patch);
    write_grade_sheet(&sheet, &grades_path)?;

    println!(
        "Cleared {} subject(s) in {} of {}",
        patch.len(),
        year.label(),
        grades_path.display()
    );

    Ok(())
}
