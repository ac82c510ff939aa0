//! Curriculum catalog: years, semesters and subjects.
//!
//! The catalog is immutable data handed to the evaluators by reference.
//! [`Catalog::bit`] builds the reference three-year curriculum; tests and
//! embedders may construct smaller catalogs with [`Catalog::new`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// One of the three academic years (levels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearKey {
    Year1,
    Year2,
    Year3,
}

impl YearKey {
    /// All years in curriculum order.
    pub const ALL: [YearKey; 3] = [YearKey::Year1, YearKey::Year2, YearKey::Year3];

    /// 1-based year number.
    pub fn number(self) -> u8 {
        match self {
            YearKey::Year1 => 1,
            YearKey::Year2 => 2,
            YearKey::Year3 => 3,
        }
    }

    /// Human-readable label, e.g. "Year 2".
    pub fn label(self) -> String {
        format!("Year {}", self.number())
    }

    /// Level label used in degree reports, e.g. "Level II".
    pub fn level_label(self) -> &'static str {
        match self {
            YearKey::Year1 => "Level I",
            YearKey::Year2 => "Level II",
            YearKey::Year3 => "Level III",
        }
    }

    /// The two semesters taught in this year.
    pub fn semesters(self) -> [SemesterKey; 2] {
        let first = self.number() * 2 - 1;
        [SemesterKey(first), SemesterKey(first + 1)]
    }

    /// The year that follows this one, if any.
    pub fn next(self) -> Option<YearKey> {
        match self {
            YearKey::Year1 => Some(YearKey::Year2),
            YearKey::Year2 => Some(YearKey::Year3),
            YearKey::Year3 => None,
        }
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year{}", self.number())
    }
}

impl FromStr for YearKey {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year1" | "1" => Ok(YearKey::Year1),
            "year2" | "2" => Ok(YearKey::Year2),
            "year3" | "3" => Ok(YearKey::Year3),
            other => Err(GradeError::UnknownYear(other.to_string())),
        }
    }
}

/// A semester identifier, `semester1` through `semester6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterKey(u8);

impl SemesterKey {
    /// Build a semester key from its 1-based number.
    pub fn new(number: u8) -> Option<Self> {
        (1..=6).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// The year this semester belongs to.
    pub fn year(self) -> YearKey {
        match self.0 {
            1 | 2 => YearKey::Year1,
            3 | 4 => YearKey::Year2,
            _ => YearKey::Year3,
        }
    }
}

impl fmt::Display for SemesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "semester{}", self.0)
    }
}

impl FromStr for SemesterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix("semester")
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(SemesterKey::new)
            .ok_or_else(|| format!("unknown semester: {s}"))
    }
}

impl TryFrom<String> for SemesterKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemesterKey> for String {
    fn from(value: SemesterKey) -> Self {
        value.to_string()
    }
}

/// A single subject offered in a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject code (e.g. "IT1106").
    pub code: String,
    /// Human-readable subject name.
    pub name: String,
    /// Total credit weight.
    pub credits: u32,
    /// Credits that count toward the GPA (0 for enhancement subjects).
    pub gpa_credits: u32,
    /// Graded Pass/Fail instead of with a letter grade.
    pub is_non_gpa: bool,
    /// Elective subject.
    #[serde(default)]
    pub is_optional: bool,
}

impl Subject {
    /// A letter-graded subject whose full credit weight counts toward the GPA.
    pub fn gpa(code: &str, name: &str, credits: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            credits,
            gpa_credits: credits,
            is_non_gpa: false,
            is_optional: false,
        }
    }

    /// A Pass/Fail enhancement subject.
    pub fn enhancement(code: &str, name: &str, credits: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            credits,
            gpa_credits: 0,
            is_non_gpa: true,
            is_optional: false,
        }
    }

    /// Mark the subject as an elective.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Ordered subjects of one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterPlan {
    pub key: SemesterKey,
    pub subjects: Vec<Subject>,
}

/// The two semesters of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPlan {
    pub year: YearKey,
    pub semesters: Vec<SemesterPlan>,
}

impl YearPlan {
    /// Iterate every subject of the year together with its semester.
    pub fn subjects(&self) -> impl Iterator<Item = (SemesterKey, &Subject)> {
        self.semesters
            .iter()
            .flat_map(|sem| sem.subjects.iter().map(move |s| (sem.key, s)))
    }

    pub fn semester(&self, key: SemesterKey) -> Option<&SemesterPlan> {
        self.semesters.iter().find(|s| s.key == key)
    }

    /// Sum of GPA credits offered in the year.
    pub fn total_gpa_credits(&self) -> u32 {
        self.subjects().map(|(_, s)| s.gpa_credits).sum()
    }
}

/// A full curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    years: Vec<YearPlan>,
}

impl Catalog {
    pub fn new(years: Vec<YearPlan>) -> Self {
        Self { years }
    }

    pub fn years(&self) -> &[YearPlan] {
        &self.years
    }

    pub fn year(&self, year: YearKey) -> Option<&YearPlan> {
        self.years.iter().find(|y| y.year == year)
    }

    /// Look up a subject by its position in the catalog.
    pub fn subject(&self, year: YearKey, semester: SemesterKey, code: &str) -> Option<&Subject> {
        self.year(year)?
            .semester(semester)?
            .subjects
            .iter()
            .find(|s| s.code == code)
    }

    /// Find a subject by code alone, with the year and semester offering it.
    pub fn locate(&self, code: &str) -> Option<(YearKey, SemesterKey, &Subject)> {
        self.subjects().find(|(_, _, s)| s.code == code)
    }

    /// Iterate every subject in curriculum order.
    pub fn subjects(&self) -> impl Iterator<Item = (YearKey, SemesterKey, &Subject)> {
        self.years
            .iter()
            .flat_map(|y| y.subjects().map(move |(sem, s)| (y.year, sem, s)))
    }

    /// The reference Colombo BIT curriculum.
    pub fn bit() -> Self {
        let sem = |n: u8, subjects: Vec<Subject>| SemesterPlan {
            key: SemesterKey(n),
            subjects,
        };

        Self::new(vec![
            YearPlan {
                year: YearKey::Year1,
                semesters: vec![
                    sem(
                        1,
                        vec![
                            Subject::gpa("IT1106", "Information Systems", 4),
                            Subject::gpa("IT1206", "Computer Systems", 4),
                            Subject::gpa(
                                "IT1306",
                                "Free and Open Source Software for Personal Computing",
                                3,
                            ),
                            Subject::gpa("IT1406", "Introduction to Programming", 4),
                            Subject::gpa("IT1506", "Fundamentals of Mathematics", 1),
                        ],
                    ),
                    sem(
                        2,
                        vec![
                            Subject::enhancement("EN2106", "Communication Skills I (EN)", 2),
                            Subject::gpa("IT2106", "Mathematics for Computing I", 3),
                            Subject::gpa("IT2206", "Fundamentals of Software Engineering", 4),
                            Subject::gpa("IT2306", "Database Systems", 4),
                            Subject::gpa("IT2406", "Web Application Development I", 4),
                        ],
                    ),
                ],
            },
            YearPlan {
                year: YearKey::Year2,
                semesters: vec![
                    sem(
                        3,
                        vec![
                            Subject::enhancement("EN3106", "Communication Skills II (EN)", 2),
                            Subject::gpa("IT3106", "Object Oriented Analysis & Design", 3),
                            Subject::gpa("IT3206", "Data Structures and Algorithms", 3),
                            Subject::gpa("IT3306", "Data Management Systems", 3),
                            Subject::gpa("IT3406", "Web Application Development II", 4),
                        ],
                    ),
                    sem(
                        4,
                        vec![
                            Subject::gpa("IT4106", "User Experience Design", 3),
                            Subject::gpa("IT4206", "Enterprise Application Development", 4),
                            Subject::gpa("IT4306", "Information Technology Project Management", 3),
                            Subject::gpa("IT4406", "Agile Software Development", 4),
                            Subject::gpa("IT4506", "Computer Networks", 3),
                        ],
                    ),
                ],
            },
            YearPlan {
                year: YearKey::Year3,
                semesters: vec![
                    sem(
                        5,
                        vec![
                            Subject::enhancement(
                                "EN5106",
                                "Fundamentals of Management & Entrepreneurship (EN)",
                                2,
                            ),
                            Subject::gpa("IT5206", "Professional Practice", 3),
                            Subject::gpa("IT5306", "Principles of Information Security", 3),
                            Subject::gpa("IT5406", "Systems & Network Administration", 3),
                            Subject::gpa("IT5506", "Mathematics for Computing II", 3).optional(),
                        ],
                    ),
                    sem(
                        6,
                        vec![
                            Subject::enhancement(
                                "EN6106",
                                "Emerging Topics in Information Technology (EN)",
                                2,
                            ),
                            Subject::gpa("IT6206", "Software Quality Assurance", 3),
                            Subject::gpa("IT6306", "Mobile Application Development", 4),
                            Subject::gpa("IT6406", "Network Security and Audit", 3),
                            Subject::gpa("IT6506", "e-Business Technologies", 3).optional(),
                            Subject::gpa("IT5106*", "Final Year Project", 8),
                        ],
                    ),
                ],
            },
        ])
    }
}
