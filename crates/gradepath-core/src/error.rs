//! Grade model error types.
//!
//! Domain failures (a student not meeting a rule) are never errors; these
//! variants cover malformed input that refers to grades, years, semesters or
//! subjects the catalog does not know about.

use thiserror::Error;

use crate::catalog::YearKey;

/// Errors raised when input does not fit the grade model or the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// The grade string is not one of the selectable options.
    #[error("unknown grade: {0:?}")]
    UnknownGrade(String),

    /// The year key is not `year1`, `year2` or `year3`.
    #[error("unknown year: {0:?}")]
    UnknownYear(String),

    /// The semester key does not belong to the given year.
    #[error("unknown semester {semester:?} for {year}")]
    UnknownSemester { year: YearKey, semester: String },

    /// The subject code is not offered in the given semester.
    #[error("unknown subject {code:?} in {year}/{semester}")]
    UnknownSubject {
        year: YearKey,
        semester: String,
        code: String,
    },

    /// The grade exists but is not offered for this subject.
    #[error("{grade} is not offered for {code}")]
    GradeNotOffered { code: String, grade: String },

    /// No semester of the catalog offers this subject code.
    #[error("subject {0:?} is not part of the catalog")]
    SubjectNotInCatalog(String),

    /// The catalog in use has no entry for this year.
    #[error("{0} is not part of the catalog")]
    YearNotInCatalog(YearKey),
}
