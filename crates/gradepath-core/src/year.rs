//! Per-year GPA and progression verdict.
//!
//! The progression rules are checked in a fixed priority order and the first
//! failing rule alone produces the warning shown to the student.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, YearKey};
use crate::error::GradeError;
use crate::grades::{format_gpa, weighted_gpa, Grade, GradeEntry, GradePointTable, GradeSheet};
use crate::policy::{RulePolicy, YearPolicy};

/// A progression rule, in the order the rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionRule {
    MissingGrade,
    MinimumGpa,
    MinimumCCredits,
    EnhancementPass,
    GradeBelowOne,
    RepeatLimit,
}

/// Outcome of evaluating one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStatus {
    pub year: YearKey,
    /// Year GPA with two decimals, "0.00" when nothing is graded.
    pub gpa: String,
    pub can_proceed: bool,
    /// Warning for the first failing rule; empty when the student may
    /// proceed or when the warning is suppressed for an untouched year.
    pub warning_message: String,
    /// First failing rule, kept even when its warning is suppressed.
    pub blocked_by: Option<ProgressionRule>,
    /// Full credits of subjects holding any grade other than Not Sit.
    pub earned_credits: u32,
}

/// Running sums collected over one year's subjects.
#[derive(Debug, Default)]
struct YearTally {
    points: f64,
    gpa_credits: u32,
    c_credits: u32,
    all_enhancement_pass: bool,
    has_grade_below_one: bool,
    missing_grade: bool,
    all_gpa_ungraded: bool,
    weak_grades: u32,
    earned_credits: u32,
}

impl YearTally {
    fn gpa(&self) -> f64 {
        weighted_gpa(self.points, self.gpa_credits)
    }
}

fn tally_year(
    year: YearKey,
    catalog: &Catalog,
    grades: &GradeSheet,
    table: &GradePointTable,
    policy: &YearPolicy,
) -> Result<YearTally, GradeError> {
    let plan = catalog
        .year(year)
        .ok_or(GradeError::YearNotInCatalog(year))?;

    let count_not_sit = policy
        .repeat_limit
        .as_ref()
        .map(|limit| limit.count_not_sit)
        .unwrap_or(true);

    let mut tally = YearTally {
        all_enhancement_pass: true,
        all_gpa_ungraded: true,
        ..Default::default()
    };

    for (semester, subject) in plan.subjects() {
        let entry = grades.entry(year, semester, &subject.code);

        if matches!(entry, GradeEntry::Graded(grade) if grade != Grade::NotSit) {
            tally.earned_credits += subject.credits;
        }

        if subject.is_non_gpa {
            if !entry.is(Grade::Pass) {
                tally.all_enhancement_pass = false;
            }
            continue;
        }

        let point = table.resolve(entry);
        if let Some(point) = point {
            tally.points += point * subject.gpa_credits as f64;
            tally.gpa_credits += subject.gpa_credits;
            if point >= 2.0 {
                tally.c_credits += subject.gpa_credits;
            }
        }

        match entry.grade() {
            None => {
                tally.missing_grade = true;
                tally.has_grade_below_one = true;
            }
            Some(grade) => {
                tally.all_gpa_ungraded = false;
                if matches!(grade, Grade::E | Grade::F | Grade::NotSit)
                    || point.is_some_and(|p| p < 1.0)
                {
                    tally.has_grade_below_one = true;
                }
                let weak = matches!(
                    grade,
                    Grade::C | Grade::CMinus | Grade::DPlus | Grade::D | Grade::E
                ) || (count_not_sit && grade == Grade::NotSit);
                if weak {
                    tally.weak_grades += 1;
                }
            }
        }
    }

    Ok(tally)
}

/// Short-circuit chain: the first failing rule wins.
fn first_failure(tally: &YearTally, policy: &YearPolicy) -> Option<(ProgressionRule, String)> {
    if tally.missing_grade {
        return Some((
            ProgressionRule::MissingGrade,
            "❗All GPA subjects must have a grade selected.".to_string(),
        ));
    }

    if tally.gpa() < policy.min_gpa {
        return Some((
            ProgressionRule::MinimumGpa,
            format!("❗GPA must be at least {:.2}.", policy.min_gpa),
        ));
    }

    if tally.c_credits < policy.min_c_credits {
        return Some((
            ProgressionRule::MinimumCCredits,
            format!(
                "❗You need at least {} GPA credits with grade point 2.00 or above.",
                policy.min_c_credits
            ),
        ));
    }

    if !tally.all_enhancement_pass {
        return Some((
            ProgressionRule::EnhancementPass,
            "❗All enhancement (non-GPA) courses must be PASS.".to_string(),
        ));
    }

    if tally.has_grade_below_one {
        return Some((
            ProgressionRule::GradeBelowOne,
            "❗You have a course with grade point less than 1.00 (E, F, Not Sit, or empty)."
                .to_string(),
        ));
    }

    if let Some(limit) = &policy.repeat_limit {
        if tally.weak_grades >= limit.max_grades {
            return Some((
                ProgressionRule::RepeatLimit,
                format!(
                    "❗You have {} subjects graded C or below; fewer than {} are allowed.",
                    tally.weak_grades, limit.max_grades
                ),
            ));
        }
    }

    None
}

/// Compute a year's GPA and whether the student may proceed.
pub fn evaluate_year(
    year: YearKey,
    catalog: &Catalog,
    grades: &GradeSheet,
    table: &GradePointTable,
    policy: &RulePolicy,
) -> Result<YearStatus, GradeError> {
    let tally = tally_year(year, catalog, grades, table, &policy.year)?;
    let gpa = format_gpa(tally.gpa());

    let status = match first_failure(&tally, &policy.year) {
        Some((rule, message)) => {
            let suppress = policy.year.suppress_untouched_warning && tally.all_gpa_ungraded;
            YearStatus {
                year,
                gpa,
                can_proceed: false,
                warning_message: if suppress { String::new() } else { message },
                blocked_by: Some(rule),
                earned_credits: tally.earned_credits,
            }
        }
        None => YearStatus {
            year,
            gpa,
            can_proceed: true,
            warning_message: String::new(),
            blocked_by: None,
            earned_credits: tally.earned_credits,
        },
    };

    tracing::debug!(
        %year,
        gpa = %status.gpa,
        can_proceed = status.can_proceed,
        blocked_by = ?status.blocked_by,
        "evaluated year"
    );

    Ok(status)
}
