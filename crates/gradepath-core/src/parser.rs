//! TOML grade-sheet parser.
//!
//! Loads grade sheets from TOML files and directories, writes them back, and
//! validates them against the catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SemesterKey, YearKey};
use crate::error::GradeError;
use crate::grades::{Grade, GradeEntry, GradeSheet, GradeSlot};

/// Intermediate TOML structure for grade-sheet files.
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlGradeSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sheet: Option<TomlSheetHeader>,
    /// year → semester → subject code → grade.
    #[serde(flatten)]
    years: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlSheetHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student: Option<String>,
}

/// Parse a single grade-sheet file.
pub fn parse_grade_sheet(catalog: &Catalog, path: &Path) -> Result<GradeSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grade sheet: {}", path.display()))?;

    parse_grade_sheet_str(catalog, &content, path)
}

/// Parse grade-sheet TOML from a string (useful for testing).
pub fn parse_grade_sheet_str(
    catalog: &Catalog,
    content: &str,
    source_path: &Path,
) -> Result<GradeSheet> {
    let parsed: TomlGradeSheet = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut sheet = GradeSheet::new();
    sheet.student = parsed.sheet.and_then(|h| h.student);

    for (year_key, semesters) in parsed.years {
        let year: YearKey = year_key.parse()?;
        let plan = catalog
            .year(year)
            .ok_or(GradeError::YearNotInCatalog(year))?;

        for (semester_key, subjects) in semesters {
            let semester = semester_key
                .parse::<SemesterKey>()
                .ok()
                .filter(|s| plan.semester(*s).is_some())
                .ok_or_else(|| GradeError::UnknownSemester {
                    year,
                    semester: semester_key.clone(),
                })?;

            for (code, value) in subjects {
                let Some(subject) = catalog.subject(year, semester, &code) else {
                    return Err(GradeError::UnknownSubject {
                        year,
                        semester: semester.to_string(),
                        code,
                    }
                    .into());
                };
                let entry = GradeEntry::parse(&value)
                    .with_context(|| format!("invalid grade for {code} in {year}/{semester}"))?;
                if let Some(grade) = entry.grade().filter(|g| !g.accepted_for(subject)) {
                    return Err(anyhow::Error::new(GradeError::GradeNotOffered {
                        code: code.clone(),
                        grade: grade.to_string(),
                    })
                    .context(format!("invalid grade for {code} in {year}/{semester}")));
                }
                sheet.insert(GradeSlot::new(year, semester, code), entry);
            }
        }
    }

    Ok(sheet)
}

/// Render a grade sheet as TOML. Cleared slots are written as `""`.
pub fn grade_sheet_to_toml(sheet: &GradeSheet) -> Result<String> {
    let mut file = TomlGradeSheet {
        sheet: sheet.student.clone().map(|student| TomlSheetHeader {
            student: Some(student),
        }),
        ..Default::default()
    };

    for (slot, entry) in sheet.entries() {
        file.years
            .entry(slot.year.to_string())
            .or_default()
            .entry(slot.semester.to_string())
            .or_default()
            .insert(slot.code.clone(), entry.as_sheet_value().to_string());
    }

    toml::to_string_pretty(&file).context("failed to serialize grade sheet")
}

/// Write a grade sheet to disk, creating parent directories as needed.
pub fn write_grade_sheet(sheet: &GradeSheet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    let content = grade_sheet_to_toml(sheet)?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write grade sheet: {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` grade sheets from a directory.
pub fn load_grade_directory(catalog: &Catalog, dir: &Path) -> Result<Vec<(PathBuf, GradeSheet)>> {
    let mut sheets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sheets.extend(load_grade_directory(catalog, &path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_grade_sheet(catalog, &path) {
                Ok(sheet) => sheets.push((path, sheet)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sheets)
}

/// A warning from grade-sheet validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The subject code (if applicable).
    pub code: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a parsed sheet for grades that are accepted but probably wrong.
pub fn validate_grade_sheet(catalog: &Catalog, sheet: &GradeSheet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for plan in catalog.years() {
        let untouched: Vec<&str> = plan
            .subjects()
            .filter(|(sem, s)| {
                !s.is_non_gpa && sheet.entry(plan.year, *sem, &s.code) == GradeEntry::Unset
            })
            .map(|(_, s)| s.code.as_str())
            .collect();
        let gpa_subjects = plan.subjects().filter(|(_, s)| !s.is_non_gpa).count();

        if !untouched.is_empty() && untouched.len() == gpa_subjects {
            warnings.push(ValidationWarning {
                code: None,
                message: format!("no grades entered for {}", plan.year.label()),
            });
        } else {
            for code in untouched {
                warnings.push(ValidationWarning {
                    code: Some(code.to_string()),
                    message: "no grade entered".into(),
                });
            }
        }

        for (semester, subject) in plan.subjects() {
            let Some(grade) = sheet.entry(plan.year, semester, &subject.code).grade() else {
                continue;
            };

            if subject.is_non_gpa && grade != Grade::Pass && grade != Grade::Fail {
                warnings.push(ValidationWarning {
                    code: Some(subject.code.clone()),
                    message: format!(
                        "enhancement subject graded {grade}; only Pass or Fail count"
                    ),
                });
            } else if !subject.is_non_gpa && matches!(grade, Grade::Pass | Grade::Fail) {
                warnings.push(ValidationWarning {
                    code: Some(subject.code.clone()),
                    message: format!("GPA subject graded {grade}; it will be ignored in the GPA"),
                });
            } else if !subject.is_non_gpa && grade == Grade::F {
                warnings.push(ValidationWarning {
                    code: Some(subject.code.clone()),
                    message: "F has no grade point and is ignored in the GPA".into(),
                });
            }
        }
    }

    warnings
}
