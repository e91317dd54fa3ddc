use std::collections::BTreeSet;

use tracing::{debug, warn};

use trainplan_core::ProjectId;

use crate::config::MatcherConfig;
use crate::model::{HistoricalProject, PhaseTemplate};

/// Rank historical projects against a request, most similar first.
///
/// Model:
/// - Keep only projects of exactly `train_model` (and, when given, only the
///   `reference_ids`).
/// - coverage = requested phases present in the project / requested phases.
/// - recency = 1 at the newest candidate's completion date, decaying linearly
///   to 0 over `recency_horizon_days`.
/// - score = weighted mean of coverage and recency, in \[0, 1\].
/// - Order by score, then by closeness of `num_trains` to `train_count`, then
///   by project id.
///
/// Projects covering none of the requested phases are dropped. Without
/// explicit references, so are projects whose coverage is below
/// `min_similarity`. An empty result is a valid cold start.
pub fn match_projects(
    config: &MatcherConfig,
    train_model: &str,
    train_count: u32,
    requested: &[PhaseTemplate],
    pool: &[HistoricalProject],
    reference_ids: &[ProjectId],
) -> Vec<HistoricalProject> {
    if requested.is_empty() {
        return Vec::new();
    }

    let requested_names: BTreeSet<&str> = requested.iter().map(|p| p.name.as_str()).collect();

    let candidates: Vec<&HistoricalProject> = pool
        .iter()
        .filter(|p| p.train_model == train_model)
        .filter(|p| reference_ids.is_empty() || reference_ids.contains(&p.project_id))
        .filter(|p| {
            if p.num_trains == 0 {
                warn!(project_id = %p.project_id, "skipping historical project with zero trains");
                return false;
            }
            true
        })
        .collect();

    let Some(newest) = candidates.iter().map(|p| p.completion_date).max() else {
        debug!(train_model, "no same-model history; cold start");
        return Vec::new();
    };

    let total_weight = config.coverage_weight + config.recency_weight;
    let horizon = f64::from(config.recency_horizon_days.max(1));

    let mut ranked: Vec<HistoricalProject> = Vec::with_capacity(candidates.len());
    for project in candidates {
        let matching = requested_names
            .iter()
            .filter(|name| project.contains_phase(name))
            .count();
        if matching == 0 {
            continue;
        }

        let coverage = matching as f64 / requested_names.len() as f64;
        if reference_ids.is_empty() && coverage < config.min_similarity {
            continue;
        }

        let age_days = (newest - project.completion_date).num_days().max(0) as f64;
        let recency = (1.0 - age_days / horizon).clamp(0.0, 1.0);

        let score = if total_weight > 0.0 {
            (config.coverage_weight * coverage + config.recency_weight * recency) / total_weight
        } else {
            coverage
        };

        let mut scored = project.clone();
        scored.matching_phase_count = matching;
        scored.similarity_score = score.clamp(0.0, 1.0);
        ranked.push(scored);
    }

    ranked.sort_by(|a, b| {
        b.similarity_score
            .total_cmp(&a.similarity_score)
            .then_with(|| {
                a.num_trains
                    .abs_diff(train_count)
                    .cmp(&b.num_trains.abs_diff(train_count))
            })
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    ranked.truncate(config.limit);

    debug!(
        train_model,
        pool = pool.len(),
        matched = ranked.len(),
        "ranked similar projects"
    );

    ranked
}
