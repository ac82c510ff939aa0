//! Evaluation engine.
//!
//! Bundles a catalog, a grade-point table and a rule policy so callers do not
//! have to thread all three through every evaluation.

use crate::catalog::{Catalog, YearKey};
use crate::degree::{self, DegreeEligibility};
use crate::error::GradeError;
use crate::grades::{self, GradePatch, GradePointTable, GradeSheet};
use crate::policy::RulePolicy;
use crate::year::{self, YearStatus};

/// Catalog, grade-point table and policy used for every evaluation.
#[derive(Debug, Clone)]
pub struct GradeEngine {
    catalog: Catalog,
    table: GradePointTable,
    policy: RulePolicy,
}

impl GradeEngine {
    pub fn new(catalog: Catalog, table: GradePointTable, policy: RulePolicy) -> Self {
        Self {
            catalog,
            table,
            policy,
        }
    }

    /// Reference BIT curriculum, standard table and default policy.
    pub fn bit() -> Self {
        Self::new(Catalog::bit(), GradePointTable::standard(), RulePolicy::default())
    }

    pub fn with_policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn table(&self) -> &GradePointTable {
        &self.table
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    pub fn evaluate_year(&self, year: YearKey, grades: &GradeSheet) -> Result<YearStatus, GradeError> {
        year::evaluate_year(year, &self.catalog, grades, &self.table, &self.policy)
    }

    /// Status of every year present in the catalog, in curriculum order.
    pub fn evaluate_years(&self, grades: &GradeSheet) -> Result<Vec<YearStatus>, GradeError> {
        self.catalog
            .years()
            .iter()
            .map(|plan| self.evaluate_year(plan.year, grades))
            .collect()
    }

    pub fn overall_gpa(&self, grades: &GradeSheet) -> f64 {
        degree::compute_overall_gpa(&self.catalog, grades, &self.table)
    }

    /// Degree verdict using the overall GPA computed from the same sheet.
    pub fn evaluate_degree(&self, grades: &GradeSheet) -> DegreeEligibility {
        let overall = self.overall_gpa(grades);
        degree::evaluate_degree(&self.catalog, grades, &self.table, overall, &self.policy)
    }

    pub fn reset_year(&self, year: YearKey) -> Result<GradePatch, GradeError> {
        grades::reset_year(&self.catalog, year)
    }
}

impl Default for GradeEngine {
    fn default() -> Self {
        Self::bit()
    }
}
