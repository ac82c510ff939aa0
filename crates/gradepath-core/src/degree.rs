//! Overall degree eligibility.
//!
//! Unlike the year evaluator, every requirement is checked independently
//! and all unmet requirements are reported together.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, YearKey};
use crate::grades::{weighted_gpa, Grade, GradePointTable, GradeSheet};
use crate::policy::{DegreePolicy, RulePolicy};

/// One value per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerLevel<T> {
    pub year1: T,
    pub year2: T,
    pub year3: T,
}

impl<T> Index<YearKey> for PerLevel<T> {
    type Output = T;

    fn index(&self, year: YearKey) -> &T {
        match year {
            YearKey::Year1 => &self.year1,
            YearKey::Year2 => &self.year2,
            YearKey::Year3 => &self.year3,
        }
    }
}

impl<T> IndexMut<YearKey> for PerLevel<T> {
    fn index_mut(&mut self, year: YearKey) -> &mut T {
        match year {
            YearKey::Year1 => &mut self.year1,
            YearKey::Year2 => &mut self.year2,
            YearKey::Year3 => &mut self.year3,
        }
    }
}

/// A graduation requirement, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeRequirement {
    TotalCredits,
    LevelCredits { level: YearKey },
    OverallGpa,
    LevelCCredits { level: YearKey },
    SoftwareProject,
    EnhancementPass,
    NoGradeBelowD,
    NoSubjectBelowC,
}

impl DegreeRequirement {
    /// Sentence shown to the student when the requirement is not met.
    pub fn message(&self, policy: &DegreePolicy) -> String {
        match self {
            DegreeRequirement::TotalCredits => format!(
                "Minimum {} GPA credits not earned.",
                policy.min_total_credits
            ),
            DegreeRequirement::LevelCredits { level } => format!(
                "Less than {} GPA credits in {}.",
                policy.min_level_credits,
                level.level_label()
            ),
            DegreeRequirement::OverallGpa => {
                format!("Overall GPA is less than {:.2}.", policy.min_overall_gpa)
            }
            DegreeRequirement::LevelCCredits { level } => format!(
                "Less than {} credits with grade C or better in {}.",
                policy.min_level_c_credits,
                level.level_label()
            ),
            DegreeRequirement::SoftwareProject => {
                "Software Development Project in Level III is not at least a C grade.".to_string()
            }
            DegreeRequirement::EnhancementPass => {
                "Not all enhancement (non-GPA) courses are PASS.".to_string()
            }
            DegreeRequirement::NoGradeBelowD => {
                "There is a grade below D in at least one course.".to_string()
            }
            DegreeRequirement::NoSubjectBelowC => "You have at least one subject with a grade \
                below C (C-, D+, D, E, F, Not Sit, or not selected). You must repeat and pass \
                that subject with at least a C grade to be eligible for the degree."
                .to_string(),
        }
    }
}

/// Outcome of the degree check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeEligibility {
    pub eligible: bool,
    /// One sentence per unmet requirement, in fixed order.
    pub failed_reasons: Vec<String>,
    pub unmet: Vec<DegreeRequirement>,
    pub total_gpa_credits: u32,
    pub level_credits: PerLevel<u32>,
    /// Credits with grade point 2.00 or above, per level.
    pub level_c_credits: PerLevel<u32>,
    pub overall_gpa: f64,
    /// "{Level} - {name} ({code}) [{grade}]" for every GPA subject below C.
    pub repeat_subjects: Vec<String>,
}

/// Credit-weighted GPA across every GPA subject with a countable grade.
pub fn compute_overall_gpa(catalog: &Catalog, grades: &GradeSheet, table: &GradePointTable) -> f64 {
    let mut points = 0.0;
    let mut credits = 0;

    for (year, semester, subject) in catalog.subjects() {
        if subject.is_non_gpa {
            continue;
        }
        if let Some(point) = table.resolve(grades.entry(year, semester, &subject.code)) {
            points += point * subject.gpa_credits as f64;
            credits += subject.gpa_credits;
        }
    }

    weighted_gpa(points, credits)
}

/// Check every graduation requirement against the sheet.
pub fn evaluate_degree(
    catalog: &Catalog,
    grades: &GradeSheet,
    table: &GradePointTable,
    overall_gpa: f64,
    policy: &RulePolicy,
) -> DegreeEligibility {
    let policy = &policy.degree;

    let mut total_gpa_credits = 0;
    let mut level_credits = PerLevel::<u32>::default();
    let mut level_c_credits = PerLevel::<u32>::default();
    let mut all_enhancement_pass = true;
    let mut no_grade_below_d = true;
    let mut software_project_c = false;
    let mut repeat_subjects = Vec::new();

    for level in YearKey::ALL {
        let Some(plan) = catalog.year(level) else {
            continue;
        };

        for (semester, subject) in plan.subjects() {
            let entry = grades.entry(level, semester, &subject.code);

            if subject.is_non_gpa {
                if !entry.is(Grade::Pass) {
                    all_enhancement_pass = false;
                }
                if entry.is(Grade::Fail) {
                    no_grade_below_d = false;
                }
                continue;
            }

            if let Some(point) = table.resolve(entry) {
                total_gpa_credits += subject.gpa_credits;
                level_credits[level] += subject.gpa_credits;
                if point >= 2.0 {
                    level_c_credits[level] += subject.gpa_credits;
                    if level == YearKey::Year3
                        && subject.code.starts_with(&policy.project_code_prefix)
                    {
                        software_project_c = true;
                    }
                }
                if point < 1.0 {
                    no_grade_below_d = false;
                }
            }

            let needs_repeat = entry.grade().is_none_or(Grade::is_below_c);
            if needs_repeat {
                repeat_subjects.push(format!(
                    "{} - {} ({}) [{}]",
                    level.level_label(),
                    subject.name,
                    subject.code,
                    entry.grade().map_or("Not Selected", Grade::as_str)
                ));
            }
        }
    }

    let mut unmet = Vec::new();
    if total_gpa_credits < policy.min_total_credits {
        unmet.push(DegreeRequirement::TotalCredits);
    }
    for level in YearKey::ALL {
        if level_credits[level] < policy.min_level_credits {
            unmet.push(DegreeRequirement::LevelCredits { level });
        }
    }
    if overall_gpa < policy.min_overall_gpa {
        unmet.push(DegreeRequirement::OverallGpa);
    }
    for level in YearKey::ALL {
        if level_c_credits[level] < policy.min_level_c_credits {
            unmet.push(DegreeRequirement::LevelCCredits { level });
        }
    }
    if !software_project_c {
        unmet.push(DegreeRequirement::SoftwareProject);
    }
    if !all_enhancement_pass {
        unmet.push(DegreeRequirement::EnhancementPass);
    }
    if !no_grade_below_d {
        unmet.push(DegreeRequirement::NoGradeBelowD);
    }
    if policy.repeat_subjects_veto && !repeat_subjects.is_empty() {
        unmet.push(DegreeRequirement::NoSubjectBelowC);
    }

    let failed_reasons = unmet.iter().map(|r| r.message(policy)).collect();

    tracing::debug!(
        eligible = unmet.is_empty(),
        total_gpa_credits,
        overall_gpa,
        unmet = unmet.len(),
        repeats = repeat_subjects.len(),
        "evaluated degree"
    );

    DegreeEligibility {
        eligible: unmet.is_empty(),
        failed_reasons,
        unmet,
        total_gpa_credits,
        level_credits,
        level_c_credits,
        overall_gpa,
        repeat_subjects,
    }
}
