//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gradepath() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradepath").unwrap();
    cmd.env("HOME", "/nonexistent-gradepath-home")
        .env_remove("GRADEPATH_REPEAT_VETO");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../grade-sheets")
        .join(name)
}

/// Copy a fixture into `dir`, applying `replace` to its text.
fn fixture_copy(dir: &TempDir, name: &str, replace: &[(&str, &str)]) -> PathBuf {
    let mut content = std::fs::read_to_string(fixture(name)).unwrap();
    for (from, to) in replace {
        content = content.replace(from, to);
    }
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn evaluate_graduate_text() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Student: Amaya Jayasinghe"))
        .stdout(predicate::str::contains("3.62"))
        .stdout(predicate::str::contains("3.23"))
        .stdout(predicate::str::contains("3.45"))
        .stdout(predicate::str::contains("Overall GPA: 3.44 (94 GPA credits)"))
        .stdout(predicate::str::contains("Degree: eligible"));
}

#[test]
fn evaluate_struggling_text() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("struggling.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You have a course with grade point less than 1.00 (E, F, Not Sit, or empty).",
        ))
        .stdout(predicate::str::contains(
            "All GPA subjects must have a grade selected.",
        ))
        .stdout(predicate::str::contains("not started"))
        .stdout(predicate::str::contains("Year warnings:"))
        .stdout(predicate::str::contains(
            "  Year 2: ❗All GPA subjects must have a grade selected.",
        ))
        .stdout(predicate::str::contains("Year 3:").not())
        .stdout(predicate::str::contains("Degree: not eligible"))
        .stdout(predicate::str::contains("  - Minimum 90 GPA credits not earned."))
        .stdout(predicate::str::contains(
            "  - Level I - Fundamentals of Mathematics (IT1506) [E]",
        ))
        .stdout(predicate::str::contains(
            "  - Level II - User Experience Design (IT4106) [Not Selected]",
        ));
}

#[test]
fn evaluate_single_year() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("struggling.toml"))
        .arg("--year")
        .arg("year1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Year 1: GPA 2.26, 33 credits earned"))
        .stdout(predicate::str::contains("❗You have a course with grade point"));

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--year")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("All progression rules met."));
}

#[test]
fn evaluate_json_to_stdout() {
    let output = gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["degree"]["eligible"], true);
    assert_eq!(report["years"].as_array().unwrap().len(), 3);
    assert_eq!(report["years"][0]["gpa"], "3.62");
    assert_eq!(report["student"], "Amaya Jayasinghe");
}

#[test]
fn evaluate_writes_markdown_and_html() {
    let dir = TempDir::new().unwrap();
    let md = dir.path().join("out").join("progress.md");
    let html = dir.path().join("progress.html");

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("struggling.toml"))
        .arg("--format")
        .arg("markdown")
        .arg("--output")
        .arg(&md)
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(&md).unwrap();
    assert!(content.contains("# Progress report: Dilan Wickramasinghe"));
    assert!(content.contains("### Subjects to repeat"));

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg(&html)
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML report"));

    let content = std::fs::read_to_string(&html).unwrap();
    assert!(content.contains("<html"));
    assert!(content.contains("Eligible for the degree"));
}

#[test]
fn evaluate_fail_if_blocked() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("struggling.toml"))
        .arg("--fail-if-blocked")
        .assert()
        .failure()
        .code(1);

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--fail-if-blocked")
        .assert()
        .success();
}

#[test]
fn evaluate_unknown_format() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn repeat_veto_follows_config_and_env() {
    let dir = TempDir::new().unwrap();
    let sheet = fixture_copy(&dir, "graduate.toml", &[("IT4506 = \"C\"", "IT4506 = \"C-\"")]);

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&sheet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Degree: not eligible"))
        .stdout(predicate::str::contains("You must repeat and pass that subject"));

    let config = dir.path().join("rules.toml");
    std::fs::write(&config, "[degree]\nrepeat_subjects_veto = false\n").unwrap();
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&sheet)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Degree: eligible"));

    gradepath()
        .env("GRADEPATH_REPEAT_VETO", "false")
        .arg("evaluate")
        .arg("--grades")
        .arg(&sheet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Degree: eligible"));
}

#[test]
fn evaluate_missing_config() {
    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .arg("--config")
        .arg("no_such_config.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn validate_clean_sheet() {
    gradepath()
        .arg("validate")
        .arg("--grades")
        .arg(fixture("graduate.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("31 grade(s), Amaya Jayasinghe"))
        .stdout(predicate::str::contains("All grade sheets valid."));
}

#[test]
fn validate_reports_missing_grades() {
    gradepath()
        .arg("validate")
        .arg("--grades")
        .arg(fixture("struggling.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: no grades entered for Year 3"))
        .stdout(predicate::str::contains("[IT4206] WARNING: no grade entered"))
        .stdout(predicate::str::contains("5 warning(s) found."));
}

#[test]
fn validate_directory() {
    gradepath()
        .arg("validate")
        .arg("--grades")
        .arg(fixture(""))
        .assert()
        .success()
        .stdout(predicate::str::contains("graduate.toml"))
        .stdout(predicate::str::contains("struggling.toml"));
}

#[test]
fn validate_rejects_unknown_grade() {
    let dir = TempDir::new().unwrap();
    let sheet = fixture_copy(&dir, "graduate.toml", &[("IT1106 = \"A\"", "IT1106 = \"Z\"")]);

    gradepath()
        .arg("validate")
        .arg("--grades")
        .arg(&sheet)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grade for IT1106"));
}

#[test]
fn evaluate_rejects_grade_not_offered_for_subject() {
    let dir = TempDir::new().unwrap();
    let sheet = fixture_copy(&dir, "graduate.toml", &[("IT1106 = \"A\"", "IT1106 = \"Pass\"")]);

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&sheet)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pass is not offered for IT1106"));
}

#[test]
fn validate_nonexistent_file() {
    gradepath()
        .arg("validate")
        .arg("--grades")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn catalog_lists_all_years() {
    gradepath()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Information Systems"))
        .stdout(predicate::str::contains("Year 1 (Level I, 31 GPA credits)"))
        .stdout(predicate::str::contains("Year 3 (Level III, 33 GPA credits)"))
        .stdout(predicate::str::contains("GPA (optional)"))
        .stdout(predicate::str::contains("enhancement"));
}

#[test]
fn catalog_single_year() {
    gradepath()
        .arg("catalog")
        .arg("--year")
        .arg("year2")
        .assert()
        .success()
        .stdout(predicate::str::contains("IT4506"))
        .stdout(predicate::str::contains("IT1106").not());

    gradepath()
        .arg("catalog")
        .arg("--year")
        .arg("year9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown year"));
}

#[test]
fn reset_clears_one_year() {
    let dir = TempDir::new().unwrap();
    let sheet = fixture_copy(&dir, "struggling.toml", &[]);

    gradepath()
        .arg("reset")
        .arg("--grades")
        .arg(&sheet)
        .arg("--year")
        .arg("year1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 10 subject(s) in Year 1"));

    let content = std::fs::read_to_string(&sheet).unwrap();
    assert!(content.contains("IT1106 = \"\""));
    assert!(content.contains("IT3306 = \"B\""));

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&sheet)
        .arg("--year")
        .arg("year1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Year 1: GPA 0.00, 0 credits earned"))
        .stdout(predicate::str::contains("No grades entered yet."));
}

#[test]
fn set_creates_and_updates_sheet() {
    let dir = TempDir::new().unwrap();
    let sheet = dir.path().join("me.toml");

    gradepath()
        .arg("set")
        .arg("--grades")
        .arg(&sheet)
        .arg("--subject")
        .arg("IT1106")
        .arg("--grade")
        .arg("a-")
        .assert()
        .success()
        .stdout(predicate::str::contains("Information Systems (IT1106) set to A-"));
    assert!(std::fs::read_to_string(&sheet)
        .unwrap()
        .contains("IT1106 = \"A-\""));

    gradepath()
        .arg("set")
        .arg("--grades")
        .arg(&sheet)
        .arg("--subject")
        .arg("IT1106")
        .arg("--grade")
        .arg("")
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));
    assert!(std::fs::read_to_string(&sheet)
        .unwrap()
        .contains("IT1106 = \"\""));
}

#[test]
fn set_rejects_options_not_offered() {
    let dir = TempDir::new().unwrap();
    let sheet = dir.path().join("me.toml");

    gradepath()
        .arg("set")
        .arg("--grades")
        .arg(&sheet)
        .arg("--subject")
        .arg("EN2106")
        .arg("--grade")
        .arg("B")
        .assert()
        .failure()
        .stderr(predicate::str::contains("choose one of: Pass, Fail"));

    gradepath()
        .arg("set")
        .arg("--grades")
        .arg(&sheet)
        .arg("--subject")
        .arg("IT9999")
        .arg("--grade")
        .arg("A")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IT9999"));

    assert!(!sheet.exists());
}

#[test]
fn compare_progress_snapshots() {
    let dir = TempDir::new().unwrap();
    let before = fixture_copy(&dir, "struggling.toml", &[]);
    let baseline = dir.path().join("baseline.json");
    let current = dir.path().join("current.json");

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&before)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&baseline)
        .assert()
        .success();

    gradepath()
        .arg("set")
        .arg("--grades")
        .arg(&before)
        .arg("--subject")
        .arg("IT1506")
        .arg("--grade")
        .arg("C")
        .assert()
        .success();

    gradepath()
        .arg("evaluate")
        .arg("--grades")
        .arg(&before)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&current)
        .assert()
        .success();

    gradepath()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("Year 1: 2.26 -> 2.33 (now proceeding)"))
        .stdout(predicate::str::contains("Repeats cleared:"))
        .stdout(predicate::str::contains(
            "Level I - Fundamentals of Mathematics (IT1506)",
        ));

    // swapped snapshots lose progression
    gradepath()
        .arg("compare")
        .arg("--baseline")
        .arg(&current)
        .arg("--current")
        .arg(&baseline)
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_report() {
    gradepath()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradepath()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradepath.toml"))
        .stdout(predicate::str::contains("Created grade-sheets/example.toml"));

    assert!(dir.path().join("gradepath.toml").exists());
    assert!(dir.path().join("grade-sheets/example.toml").exists());

    gradepath()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--grades")
        .arg("grade-sheets/example.toml")
        .arg("--year")
        .arg("year1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Can proceed to Year 2."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    gradepath()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    gradepath()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    gradepath()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "GPA progression and degree eligibility checker",
        ));
}

#[test]
fn version_output() {
    gradepath()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradepath"));
}
