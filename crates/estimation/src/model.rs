//! Input records consumed by the engine.
//!
//! These are supplied by the caller (phase templates) or by the data feeds
//! (statistics, historical projects). The engine never mutates them.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use trainplan_core::{DomainError, DomainResult, Entity, ProjectId, ValueObject};

/// One requested production phase, as supplied by engineering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub name: String,
    /// Position in the plan; strictly increasing across a request.
    pub sequence_order: u32,
    pub department: String,
    /// Caller's own estimate, used when no history backs this phase.
    pub baseline_hours: f64,
    /// Names of phases that must complete before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PhaseTemplate {
    pub fn new(
        name: impl Into<String>,
        sequence_order: u32,
        department: impl Into<String>,
        baseline_hours: f64,
    ) -> Self {
        Self {
            name: name.into(),
            sequence_order,
            department: department.into(),
            baseline_hours,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

impl ValueObject for PhaseTemplate {}

/// Aggregated history for one phase name across completed projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStatistic {
    pub phase_name: String,
    pub avg_duration_hours: f64,
    /// `None` when the history carries no cost data for this phase.
    #[serde(default)]
    pub avg_cost: Option<f64>,
    /// Share of occurrences completed on time, in \[0, 1\].
    pub success_rate: f64,
    /// Number of historical data points behind this statistic.
    pub occurrences: u32,
    #[serde(default)]
    pub common_issues: Vec<String>,
}

impl PhaseStatistic {
    pub fn new(
        phase_name: impl Into<String>,
        avg_duration_hours: f64,
        success_rate: f64,
        occurrences: u32,
    ) -> Self {
        Self {
            phase_name: phase_name.into(),
            avg_duration_hours,
            avg_cost: None,
            success_rate,
            occurrences,
            common_issues: Vec::new(),
        }
    }

    pub fn with_avg_cost(mut self, avg_cost: f64) -> Self {
        self.avg_cost = Some(avg_cost);
        self
    }

    pub fn with_common_issues<I, S>(mut self, issues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_issues = issues.into_iter().map(Into::into).collect();
        self
    }

    /// A statistic with zero occurrences carries no data at all.
    pub fn has_data(&self) -> bool {
        self.occurrences > 0
    }

    /// Check the record invariants a statistic must satisfy before it can be
    /// used for scaling.
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.avg_duration_hours.is_finite() && self.avg_duration_hours > 0.0) {
            return Err(DomainError::invariant(format!(
                "avg_duration_hours must be a finite positive number (got {})",
                self.avg_duration_hours
            )));
        }
        if let Some(cost) = self.avg_cost {
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(DomainError::invariant(format!(
                    "avg_cost must be a finite non-negative number (got {cost})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(DomainError::invariant(format!(
                "success_rate must be within [0, 1] (got {})",
                self.success_rate
            )));
        }
        Ok(())
    }
}

impl ValueObject for PhaseStatistic {}

/// A completed past project, as returned by the project feed.
///
/// `matching_phase_count` and `similarity_score` are annotations filled in by
/// the similarity matcher; feeds may leave them at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalProject {
    pub project_id: ProjectId,
    pub train_model: String,
    pub num_trains: u32,
    #[serde(default)]
    pub phases: BTreeSet<String>,
    #[serde(default)]
    pub matching_phase_count: usize,
    #[serde(default)]
    pub similarity_score: f64,
    pub completion_date: NaiveDate,
}

impl HistoricalProject {
    pub fn new(
        project_id: ProjectId,
        train_model: impl Into<String>,
        num_trains: u32,
        completion_date: NaiveDate,
    ) -> Self {
        Self {
            project_id,
            train_model: train_model.into(),
            num_trains,
            phases: BTreeSet::new(),
            matching_phase_count: 0,
            similarity_score: 0.0,
            completion_date,
        }
    }

    pub fn with_phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phases = phases.into_iter().map(Into::into).collect();
        self
    }

    pub fn contains_phase(&self, name: &str) -> bool {
        self.phases.contains(name)
    }
}

impl Entity for HistoricalProject {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.project_id
    }
}

/// Validate a skeleton request before any data is fetched.
///
/// Rules:
/// - train model must be non-blank, train count positive;
/// - phase names non-blank and unique, departments non-blank;
/// - `sequence_order` positive and strictly increasing;
/// - baseline hours finite and positive;
/// - dependencies must name a phase that appears earlier in the request.
pub fn validate_request(
    train_model: &str,
    train_count: u32,
    phases: &[PhaseTemplate],
) -> DomainResult<()> {
    if train_model.trim().is_empty() {
        return Err(DomainError::validation("train_model cannot be empty"));
    }
    if train_count == 0 {
        return Err(DomainError::validation("train_count must be positive"));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(phases.len());
    let mut previous_order: Option<u32> = None;

    for phase in phases {
        if phase.name.trim().is_empty() {
            return Err(DomainError::validation("phase name cannot be empty"));
        }
        if phase.department.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "phase '{}' has an empty department",
                phase.name
            )));
        }
        if phase.sequence_order == 0 {
            return Err(DomainError::validation(format!(
                "phase '{}' has sequence_order 0 (must be positive)",
                phase.name
            )));
        }
        if let Some(prev) = previous_order {
            if phase.sequence_order <= prev {
                return Err(DomainError::validation(format!(
                    "phase '{}' has sequence_order {} which does not follow {}",
                    phase.name, phase.sequence_order, prev
                )));
            }
        }
        if !(phase.baseline_hours.is_finite() && phase.baseline_hours > 0.0) {
            return Err(DomainError::validation(format!(
                "phase '{}' baseline_hours must be a finite positive number",
                phase.name
            )));
        }
        for dep in &phase.dependencies {
            if !seen.contains(dep.as_str()) {
                return Err(DomainError::validation(format!(
                    "phase '{}' depends on '{}', which is not an earlier phase in the request",
                    phase.name, dep
                )));
            }
        }
        if !seen.insert(phase.name.as_str()) {
            return Err(DomainError::validation(format!(
                "duplicate phase name '{}'",
                phase.name
            )));
        }
        previous_order = Some(phase.sequence_order);
    }

    Ok(())
}
