//! The `gradepath init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create gradepath.toml
    if std::path::Path::new("gradepath.toml").exists() {
        println!("gradepath.toml already exists, skipping.");
    } else {
        std::fs::write("gradepath.toml", SAMPLE_CONFIG)?;
        println!("Created gradepath.toml");
    }

    // Create example grade sheet
    std::fs::create_dir_all("grade-sheets")?;
    let example_path = std::path::Path::new("grade-sheets/example.toml");
    if example_path.exists() {
        println!("grade-sheets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SHEET)?;
        println!("Created grade-sheets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Enter your grades: gradepath set --grades grade-sheets/example.toml --subject IT1106 --grade A");
    println!("  2. Run: gradepath validate --grades grade-sheets/example.toml");
    println!("  3. Run: gradepath evaluate --grades grade-sheets/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradepath configuration

report_dir = "./gradepath-reports"

[year]
min_gpa = 2.0
min_c_credits = 20
# Hide a year's warning until at least one of its GPA subjects has a grade.
suppress_untouched_warning = true

# Uncomment to block progression once a year has too many grades of C or below.
# [year.repeat_limit]
# max_grades = 3
# count_not_sit = true

[degree]
min_total_credits = 90
min_level_credits = 30
min_overall_gpa = 2.0
min_level_c_credits = 20
project_code_prefix = "IT5106"
# Subjects below C (or never graded) must be repeated before the degree is awarded.
repeat_subjects_veto = true
"#;

const EXAMPLE_SHEET: &str = r#"# Grades: A+ A A- B+ B B- C+ C C- D+ D E, "Not Sit"; enhancement (EN) subjects take Pass or Fail.
# An empty string marks a subject as cleared.

[sheet]
student = "Example Student"

[year1.semester1]
IT1106 = "A"
IT1206 = "B+"
IT1306 = "A-"
IT1406 = "B"
IT1506 = "C+"

[year1.semester2]
EN2106 = "Pass"
IT2106 = "B-"
IT2206 = "A"
IT2306 = "B+"
IT2406 = "C"
"#;
