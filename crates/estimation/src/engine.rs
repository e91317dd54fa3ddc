use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use trainplan_core::ProjectId;

use crate::aggregator::aggregate;
use crate::assembler::assemble;
use crate::config::EngineConfig;
use crate::error::EstimationResult;
use crate::feed::HistoryFeed;
use crate::matcher::match_projects;
use crate::model::{PhaseTemplate, validate_request};
use crate::skeleton::Skeleton;

/// A full skeleton request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonRequest {
    pub train_model: String,
    pub train_count: u32,
    pub phases: Vec<PhaseTemplate>,
    /// When non-empty, only these projects are considered as scaling sources.
    #[serde(default)]
    pub reference_project_ids: Vec<ProjectId>,
}

impl SkeletonRequest {
    pub fn new(train_model: impl Into<String>, train_count: u32, phases: Vec<PhaseTemplate>) -> Self {
        Self {
            train_model: train_model.into(),
            train_count,
            phases,
            reference_project_ids: Vec::new(),
        }
    }

    pub fn with_reference_projects(mut self, ids: Vec<ProjectId>) -> Self {
        self.reference_project_ids = ids;
        self
    }
}

/// Skeleton estimation engine.
///
/// Runs Matcher -> Aggregator -> Estimator -> Assembler over data pulled from
/// a [`HistoryFeed`]. Holds no mutable state; a shared engine can serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SkeletonEngine<F> {
    feed: F,
    config: EngineConfig,
}

impl<F: HistoryFeed> SkeletonEngine<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            config: EngineConfig::default(),
        }
    }

    /// Replace the configuration; rejects invalid values.
    pub fn with_config(mut self, config: EngineConfig) -> EstimationResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Estimate a skeleton for `train_count` trains of `train_model`.
    pub fn build_skeleton(
        &self,
        train_model: &str,
        train_count: u32,
        requested_phases: &[PhaseTemplate],
    ) -> EstimationResult<Skeleton> {
        self.run(train_model, train_count, requested_phases, &[])
    }

    /// Like [`SkeletonEngine::build_skeleton`], honouring reference projects.
    pub fn build(&self, request: &SkeletonRequest) -> EstimationResult<Skeleton> {
        self.run(
            &request.train_model,
            request.train_count,
            &request.phases,
            &request.reference_project_ids,
        )
    }

    fn run(
        &self,
        train_model: &str,
        train_count: u32,
        requested: &[PhaseTemplate],
        reference_ids: &[ProjectId],
    ) -> EstimationResult<Skeleton> {
        let span = info_span!("build_skeleton", train_model, train_count, phases = requested.len());
        let _guard = span.enter();

        validate_request(train_model, train_count, requested)?;

        let pool = self.feed.list_historical_projects(train_model)?;
        let similar = match_projects(
            &self.config.matcher,
            train_model,
            train_count,
            requested,
            &pool,
            reference_ids,
        );

        let names: BTreeSet<String> = requested.iter().map(|p| p.name.clone()).collect();
        let feed_stats = if names.is_empty() {
            Default::default()
        } else {
            self.feed.lookup_phase_statistics(&names)?
        };
        debug!(returned = feed_stats.len(), "fetched phase statistics");

        let statistics = aggregate(names.iter().map(String::as_str), &feed_stats);

        let skeleton = assemble(
            &self.config.staffing,
            train_model,
            train_count,
            requested,
            &statistics,
            &similar,
        );

        info!(
            phases = skeleton.phases.len(),
            total_estimated_hours = skeleton.total_estimated_hours,
            total_estimated_cost = skeleton.total_estimated_cost,
            cost_is_partial = skeleton.cost_is_partial,
            overall_confidence = %skeleton.overall_confidence,
            similar_projects = skeleton.based_on_projects.len(),
            "built production skeleton"
        );

        Ok(skeleton)
    }
}
