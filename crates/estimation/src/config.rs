//! Engine configuration.
//!
//! Defaults mirror the thresholds the production skeleton builder has always
//! used; deployments may override them through `TRAINPLAN_*` environment
//! variables or a deserialized config document.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EstimationError, EstimationResult};

/// Similarity-matching knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum fraction of requested phases a candidate must cover. Zero
    /// (the default) keeps every candidate sharing at least one phase.
    pub min_similarity: f64,
    /// Maximum number of ranked projects returned.
    pub limit: usize,
    pub coverage_weight: f64,
    pub recency_weight: f64,
    /// Age (relative to the newest candidate) at which recency reaches zero.
    pub recency_horizon_days: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.0,
            limit: 5,
            coverage_weight: 0.8,
            recency_weight: 0.2,
            recency_horizon_days: 3650,
        }
    }
}

/// Department headcount heuristic.
///
/// Headcount for a department is `ceil(hours / capacity)`, where capacity is
/// the department override if present, else `hours_per_headcount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingPolicy {
    pub hours_per_headcount: f64,
    pub department_capacity: BTreeMap<String, f64>,
}

impl Default for StaffingPolicy {
    fn default() -> Self {
        Self {
            hours_per_headcount: 160.0,
            department_capacity: BTreeMap::new(),
        }
    }
}

impl StaffingPolicy {
    pub fn capacity_for(&self, department: &str) -> f64 {
        self.department_capacity
            .get(department)
            .copied()
            .unwrap_or(self.hours_per_headcount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub staffing: StaffingPolicy,
}

impl EngineConfig {
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.matcher.min_similarity = min_similarity;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.matcher.limit = limit;
        self
    }

    pub fn with_weights(mut self, coverage_weight: f64, recency_weight: f64) -> Self {
        self.matcher.coverage_weight = coverage_weight;
        self.matcher.recency_weight = recency_weight;
        self
    }

    pub fn with_recency_horizon_days(mut self, days: u32) -> Self {
        self.matcher.recency_horizon_days = days;
        self
    }

    pub fn with_hours_per_headcount(mut self, hours: f64) -> Self {
        self.staffing.hours_per_headcount = hours;
        self
    }

    pub fn with_department_capacity(mut self, department: impl Into<String>, hours: f64) -> Self {
        self.staffing.department_capacity.insert(department.into(), hours);
        self
    }

    /// Build a config from `TRAINPLAN_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable ones are logged and
    /// ignored. Call [`EngineConfig::validate`] on the result.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let m = &mut config.matcher;

        override_from(&lookup, "TRAINPLAN_MIN_SIMILARITY", &mut m.min_similarity);
        override_from(&lookup, "TRAINPLAN_MATCH_LIMIT", &mut m.limit);
        override_from(&lookup, "TRAINPLAN_COVERAGE_WEIGHT", &mut m.coverage_weight);
        override_from(&lookup, "TRAINPLAN_RECENCY_WEIGHT", &mut m.recency_weight);
        override_from(&lookup, "TRAINPLAN_RECENCY_HORIZON_DAYS", &mut m.recency_horizon_days);
        override_from(
            &lookup,
            "TRAINPLAN_HOURS_PER_HEADCOUNT",
            &mut config.staffing.hours_per_headcount,
        );

        config
    }

    pub fn validate(&self) -> EstimationResult<()> {
        let m = &self.matcher;
        if !(0.0..=1.0).contains(&m.min_similarity) {
            return Err(EstimationError::config("min_similarity must be within [0, 1]"));
        }
        if m.limit == 0 {
            return Err(EstimationError::config("limit must be at least 1"));
        }
        for (name, w) in [("coverage_weight", m.coverage_weight), ("recency_weight", m.recency_weight)] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(EstimationError::config(format!(
                    "{name} must be a finite non-negative number"
                )));
            }
        }
        if m.coverage_weight + m.recency_weight <= 0.0 {
            return Err(EstimationError::config(
                "coverage_weight and recency_weight cannot both be zero",
            ));
        }
        if m.recency_horizon_days == 0 {
            return Err(EstimationError::config("recency_horizon_days must be positive"));
        }

        let s = &self.staffing;
        if !(s.hours_per_headcount.is_finite() && s.hours_per_headcount > 0.0) {
            return Err(EstimationError::config(
                "hours_per_headcount must be a finite positive number",
            ));
        }
        for (department, hours) in &s.department_capacity {
            if !(hours.is_finite() && *hours > 0.0) {
                return Err(EstimationError::config(format!(
                    "capacity for department '{department}' must be a finite positive number"
                )));
            }
        }
        Ok(())
    }
}

fn override_from<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => warn!(key, value = %raw, "ignoring unparsable config override"),
    }
}
