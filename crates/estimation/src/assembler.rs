use tracing::debug;

use trainplan_core::Entity;

use crate::aggregator::{AggregatedStatistics, StatisticSlot};
use crate::config::StaffingPolicy;
use crate::estimator::{ConfidenceTier, estimate};
use crate::model::{HistoricalProject, PhaseTemplate};
use crate::skeleton::{Skeleton, SkeletonPhase};
use crate::staffing::recommend_staffing;

/// Combine matched projects and statistics into a costed, ordered skeleton.
///
/// Per phase, the scaling source is the highest-scoring project in
/// `similar_projects` that contains the phase; without one the plain
/// statistic is used, and without a statistic the caller's baseline.
/// Phase order is taken from `requested` verbatim.
pub fn assemble(
    policy: &StaffingPolicy,
    train_model: &str,
    train_count: u32,
    requested: &[PhaseTemplate],
    statistics: &AggregatedStatistics,
    similar_projects: &[HistoricalProject],
) -> Skeleton {
    let mut phases = Vec::with_capacity(requested.len());
    let mut warnings = Vec::new();

    for template in requested {
        let slot = statistics.get(&template.name);
        if let Some(StatisticSlot::Rejected { reason }) = slot {
            warnings.push(format!(
                "statistic for '{}' ignored: {reason}",
                template.name
            ));
        }
        let statistic = slot.and_then(StatisticSlot::statistic);
        let source = best_source(similar_projects, &template.name);

        let est = estimate(template, statistic, train_count, source);

        phases.push(SkeletonPhase {
            name: template.name.clone(),
            sequence_order: template.sequence_order,
            department: template.department.clone(),
            dependencies: template.dependencies.clone(),
            estimated_hours: est.hours,
            estimated_cost: est.cost,
            confidence_tier: est.tier,
            scaled_from: est.scaled_from,
            known_issues: statistic.map(|s| s.common_issues.clone()).unwrap_or_default(),
        });
    }

    let total_estimated_hours = phases.iter().fold(0.0, |acc, p| acc + p.estimated_hours);
    let total_estimated_cost = phases
        .iter()
        .filter_map(|p| p.estimated_cost)
        .fold(0.0, |acc, c| acc + c);
    let cost_is_partial = phases.iter().any(|p| p.estimated_cost.is_none());

    // An empty plan has nothing to be confident about.
    let overall_confidence = phases
        .iter()
        .map(|p| p.confidence_tier)
        .min()
        .unwrap_or(ConfidenceTier::Low);

    let recommended_staffing = recommend_staffing(policy, &phases);

    debug!(
        phases = phases.len(),
        total_estimated_hours,
        %overall_confidence,
        "assembled skeleton"
    );

    Skeleton {
        train_model: train_model.to_string(),
        train_count,
        phases,
        total_estimated_hours,
        total_estimated_cost,
        cost_is_partial,
        overall_confidence,
        recommended_staffing,
        based_on_projects: similar_projects.iter().map(|p| p.id().clone()).collect(),
        warnings,
    }
}

/// Highest similarity wins; on equal scores the earlier (better-ranked) entry.
fn best_source<'a>(projects: &'a [HistoricalProject], phase: &str) -> Option<&'a HistoricalProject> {
    projects
        .iter()
        .filter(|p| p.contains_phase(phase))
        .fold(None, |best: Option<&HistoricalProject>, p| match best {
            Some(b) if b.similarity_score >= p.similarity_score => Some(b),
            _ => Some(p),
        })
}
