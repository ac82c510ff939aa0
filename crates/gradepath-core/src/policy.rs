//! Progression and graduation thresholds.
//!
//! A [`RulePolicy`] is injected into every evaluator call. The defaults are
//! the published BIT rules; every field can be overridden from `gradepath.toml`.

use serde::{Deserialize, Serialize};

/// All thresholds used by the year and degree evaluators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulePolicy {
    #[serde(default)]
    pub year: YearPolicy,
    #[serde(default)]
    pub degree: DegreePolicy,
}

/// Rules for proceeding from one year to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPolicy {
    /// Minimum year GPA.
    #[serde(default = "default_min_gpa")]
    pub min_gpa: f64,
    /// Minimum GPA credits earned with grade point 2.00 or above.
    #[serde(default = "default_min_year_c_credits")]
    pub min_c_credits: u32,
    /// Hide the warning while no GPA subject of the year has a grade.
    #[serde(default = "default_true")]
    pub suppress_untouched_warning: bool,
    /// Optional cap on subjects graded C or below.
    #[serde(default)]
    pub repeat_limit: Option<RepeatLimit>,
}

impl Default for YearPolicy {
    fn default() -> Self {
        Self {
            min_gpa: default_min_gpa(),
            min_c_credits: default_min_year_c_credits(),
            suppress_untouched_warning: true,
            repeat_limit: None,
        }
    }
}

/// Per-year limit on weak grades (C, C-, D+, D, E).
///
/// Progression is blocked once the count reaches `max_grades`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatLimit {
    #[serde(default = "default_max_grades")]
    pub max_grades: u32,
    /// Whether `Not Sit` counts toward the limit.
    #[serde(default = "default_true")]
    pub count_not_sit: bool,
}

impl Default for RepeatLimit {
    fn default() -> Self {
        Self {
            max_grades: default_max_grades(),
            count_not_sit: true,
        }
    }
}

/// Rules for the award of the degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreePolicy {
    #[serde(default = "default_min_total_credits")]
    pub min_total_credits: u32,
    #[serde(default = "default_min_level_credits")]
    pub min_level_credits: u32,
    #[serde(default = "default_min_gpa")]
    pub min_overall_gpa: f64,
    /// Minimum credits with grade C or better in each level.
    #[serde(default = "default_min_level_c_credits")]
    pub min_level_c_credits: u32,
    /// Code prefix identifying the Level III software project.
    #[serde(default = "default_project_code_prefix")]
    pub project_code_prefix: String,
    /// Any subject awaiting a repeat blocks the award.
    #[serde(default = "default_true")]
    pub repeat_subjects_veto: bool,
}

impl Default for DegreePolicy {
    fn default() -> Self {
        Self {
            min_total_credits: default_min_total_credits(),
            min_level_credits: default_min_level_credits(),
            min_overall_gpa: default_min_gpa(),
            min_level_c_credits: default_min_level_c_credits(),
            project_code_prefix: default_project_code_prefix(),
            repeat_subjects_veto: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_min_gpa() -> f64 {
    2.0
}
fn default_min_year_c_credits() -> u32 {
    20
}
fn default_max_grades() -> u32 {
    3
}
fn default_min_total_credits() -> u32 {
    90
}
fn default_min_level_credits() -> u32 {
    30
}
fn default_min_level_c_credits() -> u32 {
    20
}
fn default_project_code_prefix() -> String {
    "IT5106".to_string()
}
