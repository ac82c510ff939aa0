//! Progress report types with JSON persistence and snapshot comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::YearKey;
use crate::degree::DegreeEligibility;
use crate::engine::GradeEngine;
use crate::error::GradeError;
use crate::grades::{format_gpa, GradeSheet};
use crate::year::YearStatus;

/// Every year status and the degree verdict for one grade sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// When the report was created.
    pub generated_at: DateTime<Utc>,
    /// Student name from the grade sheet, if any.
    pub student: Option<String>,
    /// One status per year, in curriculum order.
    pub years: Vec<YearStatus>,
    pub overall_gpa: f64,
    pub degree: DegreeEligibility,
}

impl ProgressReport {
    /// Evaluate every year and the degree for `sheet`.
    pub fn build(engine: &GradeEngine, sheet: &GradeSheet) -> Result<Self, GradeError> {
        let years = engine.evaluate_years(sheet)?;
        let degree = engine.evaluate_degree(sheet);

        Ok(Self {
            generated_at: Utc::now(),
            student: sheet.student.clone(),
            years,
            overall_gpa: degree.overall_gpa,
            degree,
        })
    }

    pub fn year(&self, year: YearKey) -> Option<&YearStatus> {
        self.years.iter().find(|s| s.year == year)
    }

    /// Years that currently show a warning.
    pub fn year_warnings(&self) -> impl Iterator<Item = &YearStatus> {
        self.years.iter().filter(|s| !s.warning_message.is_empty())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ProgressReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "# Progress report: {}\n\n",
            self.student.as_deref().unwrap_or("Unnamed student")
        ));
        md.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        md.push_str("| Year | GPA | Credits | Status |\n");
        md.push_str("|------|-----|---------|--------|\n");
        for status in &self.years {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                status.year.label(),
                status.gpa,
                status.earned_credits,
                status_text(status)
            ));
        }
        md.push('\n');

        let mut warnings = self.year_warnings().peekable();
        if warnings.peek().is_some() {
            md.push_str("## Year warnings\n\n");
            for status in warnings {
                md.push_str(&format!(
                    "- **{}:** {}\n",
                    status.year.label(),
                    status.warning_message.trim_start_matches('❗')
                ));
            }
            md.push('\n');
        }

        md.push_str("## Degree\n\n");
        md.push_str(&format!(
            "**Overall GPA:** {}  \n**GPA credits:** {}  \n**Eligible:** {}\n\n",
            format_gpa(self.overall_gpa),
            self.degree.total_gpa_credits,
            if self.degree.eligible { "yes" } else { "no" }
        ));

        if !self.degree.eligible {
            md.push_str("### Unmet requirements\n\n");
            for reason in &self.degree.failed_reasons {
                md.push_str(&format!("- {reason}\n"));
            }
            md.push('\n');

            if !self.degree.repeat_subjects.is_empty() {
                md.push_str("### Subjects to repeat\n\n");
                for subject in &self.degree.repeat_subjects {
                    md.push_str(&format!("- {subject}\n"));
                }
                md.push('\n');
            }
        }

        md
    }

    /// Compare this report against an earlier snapshot of the same student.
    pub fn compare(&self, baseline: &ProgressReport) -> ProgressChange {
        let years = self
            .years
            .iter()
            .filter_map(|current| {
                let before = baseline.year(current.year)?;
                Some(YearChange {
                    year: current.year,
                    baseline_gpa: before.gpa.clone(),
                    current_gpa: current.gpa.clone(),
                    was_proceeding: before.can_proceed,
                    now_proceeding: current.can_proceed,
                })
            })
            .collect();

        let current_repeats: Vec<&str> =
            self.degree.repeat_subjects.iter().map(|s| repeat_key(s)).collect();
        let baseline_repeats: Vec<&str> = baseline
            .degree
            .repeat_subjects
            .iter()
            .map(|s| repeat_key(s))
            .collect();

        let cleared_repeats = baseline_repeats
            .iter()
            .filter(|k| !current_repeats.contains(k))
            .map(|k| k.to_string())
            .collect();
        let new_repeats = current_repeats
            .iter()
            .filter(|k| !baseline_repeats.contains(k))
            .map(|k| k.to_string())
            .collect();

        ProgressChange {
            years,
            baseline_overall_gpa: baseline.overall_gpa,
            current_overall_gpa: self.overall_gpa,
            was_eligible: baseline.degree.eligible,
            now_eligible: self.degree.eligible,
            cleared_repeats,
            new_repeats,
        }
    }
}

fn status_text(status: &YearStatus) -> String {
    if status.can_proceed {
        "can proceed".to_string()
    } else if status.warning_message.is_empty() {
        "not started".to_string()
    } else {
        "blocked".to_string()
    }
}

/// Repeat entry without its trailing grade, so a subject still awaiting a
/// repeat matches across snapshots even after its grade changed.
fn repeat_key(entry: &str) -> &str {
    entry.rsplit_once(" [").map_or(entry, |(key, _)| key)
}

/// Result of comparing two progress reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressChange {
    pub years: Vec<YearChange>,
    pub baseline_overall_gpa: f64,
    pub current_overall_gpa: f64,
    pub was_eligible: bool,
    pub now_eligible: bool,
    /// Subjects no longer awaiting a repeat.
    pub cleared_repeats: Vec<String>,
    /// Subjects that started awaiting a repeat.
    pub new_repeats: Vec<String>,
}

/// Progression of one year across two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearChange {
    pub year: YearKey,
    pub baseline_gpa: String,
    pub current_gpa: String,
    pub was_proceeding: bool,
    pub now_proceeding: bool,
}

impl ProgressChange {
    /// Returns true if eligibility or any year's progression was lost, or the
    /// overall GPA went down.
    pub fn has_regressions(&self) -> bool {
        (self.was_eligible && !self.now_eligible)
            || self
                .years
                .iter()
                .any(|y| y.was_proceeding && !y.now_proceeding)
            || self.current_overall_gpa < self.baseline_overall_gpa
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall GPA:** {} → {}\n\n",
            format_gpa(self.baseline_overall_gpa),
            format_gpa(self.current_overall_gpa)
        ));

        md.push_str("| Year | Baseline GPA | Current GPA | Baseline | Current |\n");
        md.push_str("|------|--------------|-------------|----------|---------|\n");
        for y in &self.years {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                y.year.label(),
                y.baseline_gpa,
                y.current_gpa,
                proceed_text(y.was_proceeding),
                proceed_text(y.now_proceeding)
            ));
        }
        md.push('\n');

        if self.was_eligible != self.now_eligible {
            md.push_str(if self.now_eligible {
                "Now eligible for the degree.\n\n"
            } else {
                "No longer eligible for the degree.\n\n"
            });
        }

        if !self.cleared_repeats.is_empty() {
            md.push_str("### Repeats cleared\n\n");
            for subject in &self.cleared_repeats {
                md.push_str(&format!("- {subject}\n"));
            }
            md.push('\n');
        }

        if !self.new_repeats.is_empty() {
            md.push_str("### New repeats\n\n");
            for subject in &self.new_repeats {
                md.push_str(&format!("- {subject}\n"));
            }
        }

        md
    }
}

fn proceed_text(proceeding: bool) -> &'static str {
    if proceeding {
        "proceed"
    } else {
        "blocked"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::{Grade, GradeEntry};

    fn passing_sheet(engine: &GradeEngine) -> GradeSheet {
        let mut sheet = GradeSheet::new();
        sheet.student = Some("Kamala Silva".into());
        for (year, semester, subject) in engine.catalog().subjects() {
            let g = if subject.is_non_gpa { Grade::Pass } else { Grade::BPlus };
            sheet.set(year, semester, &subject.code, g);
        }
        sheet
    }

    #[test]
    fn build_evaluates_everything() {
        let engine = GradeEngine::bit();
        let report = ProgressReport::build(&engine, &passing_sheet(&engine)).unwrap();

        assert_eq!(report.years.len(), 3);
        assert_eq!(report.student.as_deref(), Some("Kamala Silva"));
        assert_eq!(report.overall_gpa, 3.3);
        assert!(report.degree.eligible);
        assert_eq!(report.year_warnings().count(), 0);
    }

    #[test]
    fn year_warnings_skip_suppressed_years() {
        let engine = GradeEngine::bit();
        let mut sheet = GradeSheet::new();
        sheet.assign(engine.catalog(), "IT1106", Grade::E).unwrap();

        let report = ProgressReport::build(&engine, &sheet).unwrap();
        let warned: Vec<YearKey> = report.year_warnings().map(|s| s.year).collect();
        assert_eq!(warned, vec![YearKey::Year1]);
    }

    #[test]
    fn json_roundtrip() {
        let engine = GradeEngine::bit();
        let report = ProgressReport::build(&engine, &passing_sheet(&engine)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("progress.json");

        report.save_json(&path).unwrap();
        let loaded = ProgressReport::load_json(&path).unwrap();

        assert_eq!(loaded.years, report.years);
        assert_eq!(loaded.degree, report.degree);
        assert_eq!(loaded.generated_at, report.generated_at);
    }

    #[test]
    fn markdown_lists_repeats_only_when_not_eligible() {
        let engine = GradeEngine::bit();
        let mut sheet = passing_sheet(&engine);
        let eligible = ProgressReport::build(&engine, &sheet).unwrap().to_markdown();
        assert!(eligible.contains("**Eligible:** yes"));
        assert!(!eligible.contains("Year warnings"));
        assert!(!eligible.contains("Subjects to repeat"));

        sheet.assign(engine.catalog(), "IT1106", Grade::D).unwrap();
        let md = ProgressReport::build(&engine, &sheet).unwrap().to_markdown();
        assert!(md.contains("# Progress report: Kamala Silva"));
        assert!(md.contains("**Eligible:** no"));
        assert!(md.contains("### Subjects to repeat"));
        assert!(md.contains("- Level I - Information Systems (IT1106) [D]"));
    }

    #[test]
    fn markdown_status_column() {
        let engine = GradeEngine::bit();
        let mut sheet = GradeSheet::new();
        sheet.assign(engine.catalog(), "IT1506", Grade::E).unwrap();
        let md = ProgressReport::build(&engine, &sheet).unwrap().to_markdown();

        assert!(md.contains("| Year 1 | 0.00 | 1 | blocked |"));
        assert!(md.contains("| Year 2 | 0.00 | 0 | not started |"));
        assert!(md.contains("## Year warnings"));
        assert!(md.contains("- **Year 1:** All GPA subjects must have a grade selected.\n"));
        assert!(!md.contains("**Year 2:**"));
    }

    #[test]
    fn compare_detects_cleared_repeat() {
        let engine = GradeEngine::bit();
        let mut sheet = passing_sheet(&engine);
        sheet.assign(engine.catalog(), "IT3306", Grade::D).unwrap();
        let baseline = ProgressReport::build(&engine, &sheet).unwrap();

        sheet.assign(engine.catalog(), "IT3306", Grade::B).unwrap();
        let current = ProgressReport::build(&engine, &sheet).unwrap();

        let change = current.compare(&baseline);
        assert!(!change.was_eligible);
        assert!(change.now_eligible);
        assert_eq!(
            change.cleared_repeats,
            vec!["Level II - Data Management Systems (IT3306)".to_string()]
        );
        assert!(change.new_repeats.is_empty());
        assert!(!change.has_regressions());
        assert!(change.to_markdown().contains("Now eligible for the degree."));
    }

    #[test]
    fn compare_flags_lost_progression() {
        let engine = GradeEngine::bit();
        let mut sheet = passing_sheet(&engine);
        let baseline = ProgressReport::build(&engine, &sheet).unwrap();

        sheet.assign(engine.catalog(), "IT4206", GradeEntry::Cleared).unwrap();
        let current = ProgressReport::build(&engine, &sheet).unwrap();

        let change = current.compare(&baseline);
        assert!(change.has_regressions());
        let year2 = &change.years[1];
        assert!(year2.was_proceeding);
        assert!(!year2.now_proceeding);
        assert_eq!(change.new_repeats.len(), 1);
        assert!(change.to_markdown().contains("### New repeats"));
    }

    #[test]
    fn repeat_key_strips_grade() {
        assert_eq!(
            repeat_key("Level I - Computer Systems (IT1206) [Not Selected]"),
            "Level I - Computer Systems (IT1206)"
        );
        assert_eq!(repeat_key("no grade suffix"), "no grade suffix");
    }
}
