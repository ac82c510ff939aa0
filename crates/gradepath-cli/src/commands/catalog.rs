//! The `gradepath catalog` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradepath_core::catalog::Catalog;
use gradepath_core::error::GradeError;

use super::parse_year;

pub fn execute(year: Option<String>) -> Result<()> {
    let catalog = Catalog::bit();
    let filter = year.as_deref().map(parse_year).transpose()?;

    let plans: Vec<_> = match filter {
        Some(year) => vec![catalog
            .year(year)
            .ok_or(GradeError::YearNotInCatalog(year))?],
        None => catalog.years().iter().collect(),
    };

    for plan in plans {
        let mut table = Table::new();
        table.set_header(vec!["Semester", "Code", "Subject", "Credits", "GPA credits", "Type"]);

        for (semester, subject) in plan.subjects() {
            let kind = match (subject.is_non_gpa, subject.is_optional) {
                (true, _) => "enhancement",
                (false, true) => "GPA (optional)",
                (false, false) => "GPA",
            };
            table.add_row(vec![
                Cell::new(semester.number()),
                Cell::new(&subject.code),
                Cell::new(&subject.name),
                Cell::new(subject.credits),
                Cell::new(subject.gpa_credits),
                Cell::new(kind),
            ]);
        }

        println!(
            "{} ({}, {} GPA credits)",
            plan.year.label(),
            plan.year.level_label(),
            plan.total_gpa_credits()
        );
        println!("{table}\n");
    }

    Ok(())
}
