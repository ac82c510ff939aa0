//! Grades, grade-point lookup and the sparse grade sheet.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SemesterKey, Subject, YearKey};
use crate::error::GradeError;

/// A selectable grade.
///
/// `F` is not offered by the grade picker but is recognised because the
/// progression rules name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    E,
    F,
    Pass,
    Fail,
    NotSit,
}

impl Grade {
    /// Options offered for GPA subjects, best first.
    pub const GPA_OPTIONS: [Grade; 13] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::E,
        Grade::NotSit,
    ];

    /// Options offered for enhancement (non-GPA) subjects.
    pub const NON_GPA_OPTIONS: [Grade; 2] = [Grade::Pass, Grade::Fail];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
            Grade::Pass => "Pass",
            Grade::Fail => "Fail",
            Grade::NotSit => "Not Sit",
        }
    }

    /// The grades offered for a subject: Pass/Fail for enhancement subjects,
    /// letters and Not Sit otherwise.
    pub fn options_for(subject: &Subject) -> &'static [Grade] {
        if subject.is_non_gpa {
            &Self::NON_GPA_OPTIONS
        } else {
            &Self::GPA_OPTIONS
        }
    }

    /// Whether a grade sheet may record this grade for `subject`.
    ///
    /// Wider than [`Grade::options_for`]: `F` is accepted on GPA subjects even
    /// though it is never offered for selection.
    pub fn accepted_for(self, subject: &Subject) -> bool {
        Self::options_for(subject).contains(&self) || (!subject.is_non_gpa && self == Grade::F)
    }

    /// Grades strictly below C that force a GPA subject to be repeated.
    pub fn is_below_c(self) -> bool {
        matches!(
            self,
            Grade::CMinus | Grade::DPlus | Grade::D | Grade::E | Grade::F | Grade::NotSit
        )
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "pass" => return Ok(Grade::Pass),
            "fail" => return Ok(Grade::Fail),
            "not sit" | "notsit" | "not_sit" => return Ok(Grade::NotSit),
            _ => {}
        }
        match trimmed.to_uppercase().as_str() {
            "A+" => Ok(Grade::APlus),
            "A" => Ok(Grade::A),
            "A-" => Ok(Grade::AMinus),
            "B+" => Ok(Grade::BPlus),
            "B" => Ok(Grade::B),
            "B-" => Ok(Grade::BMinus),
            "C+" => Ok(Grade::CPlus),
            "C" => Ok(Grade::C),
            "C-" => Ok(Grade::CMinus),
            "D+" => Ok(Grade::DPlus),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            "F" => Ok(Grade::F),
            _ => Err(GradeError::UnknownGrade(s.to_string())),
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = GradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(value: Grade) -> Self {
        value.as_str().to_string()
    }
}

/// The state of one grade slot.
///
/// `Unset` (never touched) and `Cleared` (emptied by a reset) are both
/// "no grade" for every rule; they are kept apart so a sheet round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeEntry {
    #[default]
    Unset,
    Cleared,
    Graded(Grade),
}

impl GradeEntry {
    /// Parse the value stored in a grade sheet; `""` means cleared.
    pub fn parse(value: &str) -> Result<Self, GradeError> {
        if value.trim().is_empty() {
            Ok(GradeEntry::Cleared)
        } else {
            value.parse().map(GradeEntry::Graded)
        }
    }

    pub fn grade(self) -> Option<Grade> {
        match self {
            GradeEntry::Graded(grade) => Some(grade),
            GradeEntry::Unset | GradeEntry::Cleared => None,
        }
    }

    /// No grade selected, either never touched or cleared.
    pub fn is_ungraded(self) -> bool {
        self.grade().is_none()
    }

    pub fn is(self, grade: Grade) -> bool {
        self.grade() == Some(grade)
    }

    /// Value written back to a grade sheet.
    pub fn as_sheet_value(self) -> &'static str {
        self.grade().map(Grade::as_str).unwrap_or("")
    }
}

impl From<Grade> for GradeEntry {
    fn from(value: Grade) -> Self {
        GradeEntry::Graded(value)
    }
}

/// Letter grade to grade-point value.
#[derive(Debug, Clone, PartialEq)]
pub struct GradePointTable {
    points: BTreeMap<Grade, f64>,
}

impl GradePointTable {
    pub fn new(points: impl IntoIterator<Item = (Grade, f64)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// The standard 4.0 scale.
    pub fn standard() -> Self {
        Self::new([
            (Grade::APlus, 4.0),
            (Grade::A, 4.0),
            (Grade::AMinus, 3.7),
            (Grade::BPlus, 3.3),
            (Grade::B, 3.0),
            (Grade::BMinus, 2.7),
            (Grade::CPlus, 2.3),
            (Grade::C, 2.0),
            (Grade::CMinus, 1.7),
            (Grade::DPlus, 1.3),
            (Grade::D, 1.0),
            (Grade::E, 0.0),
        ])
    }

    /// Grade point for a grade, `None` when the table has no entry.
    pub fn grade_point(&self, grade: Grade) -> Option<f64> {
        self.points.get(&grade).copied()
    }

    /// Grade point of a slot that holds a real, countable grade.
    ///
    /// Ungraded slots, `Not Sit`, and grades without a table entry all
    /// resolve to `None`; none of them contribute to sums.
    pub fn resolve(&self, entry: GradeEntry) -> Option<f64> {
        match entry {
            GradeEntry::Graded(Grade::NotSit) => None,
            GradeEntry::Graded(grade) => self.grade_point(grade),
            GradeEntry::Unset | GradeEntry::Cleared => None,
        }
    }
}

impl Default for GradePointTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Address of one grade in a sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradeSlot {
    pub year: YearKey,
    pub semester: SemesterKey,
    pub code: String,
}

impl GradeSlot {
    pub fn new(year: YearKey, semester: SemesterKey, code: impl Into<String>) -> Self {
        Self {
            year,
            semester,
            code: code.into(),
        }
    }
}

/// An ordered batch of slot assignments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradePatch {
    assignments: Vec<(GradeSlot, GradeEntry)>,
}

impl GradePatch {
    pub fn push(&mut self, slot: GradeSlot, entry: GradeEntry) {
        self.assignments.push((slot, entry));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(GradeSlot, GradeEntry)> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// A student's sparse grade assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeSheet {
    /// Optional student name shown in reports.
    pub student: Option<String>,
    entries: BTreeMap<GradeSlot, GradeEntry>,
}

impl GradeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry at a slot; absent slots are `Unset`.
    pub fn entry(&self, year: YearKey, semester: SemesterKey, code: &str) -> GradeEntry {
        self.entries
            .get(&GradeSlot::new(year, semester, code))
            .copied()
            .unwrap_or_default()
    }

    /// Store an entry. Storing `Unset` removes the slot.
    pub fn insert(&mut self, slot: GradeSlot, entry: GradeEntry) {
        match entry {
            GradeEntry::Unset => {
                self.entries.remove(&slot);
            }
            other => {
                self.entries.insert(slot, other);
            }
        }
    }

    pub fn set(&mut self, year: YearKey, semester: SemesterKey, code: &str, grade: Grade) {
        self.insert(GradeSlot::new(year, semester, code), GradeEntry::Graded(grade));
    }

    /// Store an entry for a subject located by code alone.
    pub fn assign(
        &mut self,
        catalog: &Catalog,
        code: &str,
        entry: impl Into<GradeEntry>,
    ) -> Result<(), GradeError> {
        let (year, semester, _) = catalog
            .locate(code)
            .ok_or_else(|| GradeError::SubjectNotInCatalog(code.to_string()))?;
        self.insert(GradeSlot::new(year, semester, code), entry.into());
        Ok(())
    }

    /// Apply every assignment of a patch in order.
    pub fn apply(&mut self, patch: &GradePatch) {
        for (slot, entry) in patch.iter() {
            self.insert(slot.clone(), *entry);
        }
    }

    /// Stored (non-`Unset`) entries in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (&GradeSlot, GradeEntry)> {
        self.entries.iter().map(|(slot, entry)| (slot, *entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Credit-weighted mean rounded half-up to two decimals; 0.0 without credits.
///
/// Rules compare against this rounded value, so a raw 1.996 passes a 2.00
/// threshold exactly as the displayed "2.00" suggests.
pub fn weighted_gpa(points: f64, credits: u32) -> f64 {
    if credits == 0 {
        return 0.0;
    }
    (points / credits as f64 * 100.0).round() / 100.0
}

/// Two-decimal display form of a GPA.
pub fn format_gpa(gpa: f64) -> String {
    format!("{gpa:.2}")
}

/// Build a patch that clears every subject of `year`.
///
/// Subjects are set to `Cleared`, never removed, so the sheet still records
/// that the year was reset.
pub fn reset_year(catalog: &Catalog, year: YearKey) -> Result<GradePatch, GradeError> {
    let plan = catalog
        .year(year)
        .ok_or(GradeError::YearNotInCatalog(year))?;

    let mut patch = GradePatch::default();
    for (semester, subject) in plan.subjects() {
        patch.push(
            GradeSlot::new(year, semester, subject.code.as_str()),
            GradeEntry::Cleared,
        );
    }
    tracing::debug!(%year, slots = patch.len(), "built year reset patch");
    Ok(patch)
}
