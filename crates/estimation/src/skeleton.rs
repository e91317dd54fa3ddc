//! Output aggregate returned to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use trainplan_core::{ProjectId, ValueObject};

use crate::estimator::{ConfidenceTier, Provenance};

/// One estimated phase of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonPhase {
    pub name: String,
    pub sequence_order: u32,
    pub department: String,
    pub dependencies: Vec<String>,
    pub estimated_hours: f64,
    /// `None` when no cost history exists for this phase.
    pub estimated_cost: Option<f64>,
    pub confidence_tier: ConfidenceTier,
    pub scaled_from: Option<Provenance>,
    /// Issues historically reported for this phase.
    pub known_issues: Vec<String>,
}

impl ValueObject for SkeletonPhase {}

/// Role label -> recommended headcount.
pub type StaffingPlan = BTreeMap<String, u32>;

/// The estimated production plan for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub train_model: String,
    pub train_count: u32,
    /// Same order as the request.
    pub phases: Vec<SkeletonPhase>,
    pub total_estimated_hours: f64,
    /// Sum over phases whose cost is available.
    pub total_estimated_cost: f64,
    /// Set when at least one phase cost is unavailable.
    pub cost_is_partial: bool,
    pub overall_confidence: ConfidenceTier,
    pub recommended_staffing: StaffingPlan,
    /// Matched projects, most similar first.
    pub based_on_projects: Vec<ProjectId>,
    /// Statistics that were supplied but could not be used.
    pub warnings: Vec<String>,
}

impl ValueObject for Skeleton {}

impl Skeleton {
    pub fn phase(&self, name: &str) -> Option<&SkeletonPhase> {
        self.phases.iter().find(|p| p.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
