//! The `gradepath set` command.

use std::path::PathBuf;

use anyhow::Result;

use gradepath_core::catalog::Catalog;
use gradepath_core::error::GradeError;
use gradepath_core::grades::{Grade, GradeEntry, GradeSheet};
use gradepath_core::parser::{parse_grade_sheet, write_grade_sheet};

pub fn execute(grades_path: PathBuf, subject_code: String, grade: String) -> Result<()> {
    let catalog = Catalog::bit();
    let mut sheet = if grades_path.exists() {
        parse_grade_sheet(&catalog, &grades_path)?
    } else {
        GradeSheet::new()
    };

    let (_, _, subject) = catalog
        .locate(&subject_code)
        .ok_or_else(|| GradeError::SubjectNotInCatalog(subject_code.clone()))?;

    let entry = GradeEntry::parse(&grade)?;
    if let Some(g) = entry.grade() {
        let options = Grade::options_for(subject);
        if !options.contains(&g) {
            let allowed: Vec<&str> = options.iter().map(|o| o.as_str()).collect();
            anyhow::bail!(
                "{g} is not offered for {} ({}); choose one of: {}",
                subject.name,
                subject.code,
                allowed.join(", ")
            );
        }
    }

    sheet.assign(&catalog, &subject_code, entry)?;
    write_grade_sheet(&sheet, &grades_path)?;

    match entry.grade() {
        Some(g) => println!("{} ({}) set to {g}", subject.name, subject.code),
        None => println!("{} ({}) cleared", subject.name, subject.code),
    }

    Ok(())
}
