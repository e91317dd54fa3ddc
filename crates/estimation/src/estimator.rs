use serde::{Deserialize, Serialize};

use trainplan_core::ProjectId;

use crate::model::{HistoricalProject, PhaseStatistic, PhaseTemplate};

/// Minimum occurrences for a `High` tier.
pub const HIGH_CONFIDENCE_MIN_OCCURRENCES: u32 = 20;
/// Minimum success rate for a `High` tier.
pub const HIGH_CONFIDENCE_MIN_SUCCESS_RATE: f64 = 0.90;

/// Scaled estimates never drop below one hour.
const MIN_SCALED_HOURS: f64 = 1.0;

/// Coarse trust label on an estimate.
///
/// Ordered `Low < Medium < High`, so the weakest tier of a set is its `min()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// - `High`: `occurrences >= 20` and `success_rate >= 0.90`
    /// - `Medium`: any other statistic
    /// - `Low`: no statistic
    pub fn for_statistic(statistic: Option<&PhaseStatistic>) -> Self {
        match statistic {
            Some(s)
                if s.occurrences >= HIGH_CONFIDENCE_MIN_OCCURRENCES
                    && s.success_rate >= HIGH_CONFIDENCE_MIN_SUCCESS_RATE =>
            {
                ConfidenceTier::High
            }
            Some(_) => ConfidenceTier::Medium,
            None => ConfidenceTier::Low,
        }
    }
}

impl core::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        })
    }
}

/// Where an estimate came from, for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Statistic average scaled by the train-count ratio of a matched project.
    ScaledFromProject {
        project_id: ProjectId,
        source_hours: f64,
        source_train_count: u32,
    },
    /// Statistic average used as-is.
    HistoricalAverage { occurrences: u32 },
}

impl core::fmt::Display for Provenance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Provenance::ScaledFromProject {
                project_id,
                source_hours,
                source_train_count,
            } => write!(
                f,
                "scaled from project {project_id} ({source_hours:.1}h for {source_train_count} trains)"
            ),
            Provenance::HistoricalAverage { occurrences } => {
                write!(f, "historical average of {occurrences} projects")
            }
        }
    }
}

/// Output of the scaling estimator for a single phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    pub hours: f64,
    /// `None` means no cost history: unavailable, not zero.
    pub cost: Option<f64>,
    pub tier: ConfidenceTier,
    pub scaled_from: Option<Provenance>,
}

/// Estimate one phase.
///
/// 1. Statistic and source project: scale average hours/cost by
///    `baseline_train_count / source.num_trains` (hours >= 1, cost >= 0).
/// 2. Statistic only: use the averages unscaled.
/// 3. No statistic: the caller's `baseline_hours`, cost unavailable.
///
/// `statistic` is expected to have passed the aggregator's checks.
pub fn estimate(
    phase: &PhaseTemplate,
    statistic: Option<&PhaseStatistic>,
    baseline_train_count: u32,
    source: Option<&HistoricalProject>,
) -> PhaseEstimate {
    let tier = ConfidenceTier::for_statistic(statistic);

    let Some(stat) = statistic else {
        return PhaseEstimate {
            hours: phase.baseline_hours,
            cost: None,
            tier,
            scaled_from: None,
        };
    };

    match source.filter(|p| p.num_trains > 0) {
        Some(project) => {
            let target = f64::from(baseline_train_count);
            let historical = f64::from(project.num_trains);
            // Multiply before dividing so whole-number inputs stay exact.
            let hours = (stat.avg_duration_hours * target / historical).max(MIN_SCALED_HOURS);
            let cost = stat.avg_cost.map(|c| (c * target / historical).max(0.0));

            PhaseEstimate {
                hours,
                cost,
                tier,
                scaled_from: Some(Provenance::ScaledFromProject {
                    project_id: project.project_id.clone(),
                    source_hours: stat.avg_duration_hours,
                    source_train_count: project.num_trains,
                }),
            }
        }
        None => PhaseEstimate {
            hours: stat.avg_duration_hours,
            cost: stat.avg_cost,
            tier,
            scaled_from: Some(Provenance::HistoricalAverage {
                occurrences: stat.occurrences,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn bogie() -> PhaseTemplate {
        PhaseTemplate::new("Bogie Assembly", 1, "Mechanical", 320.0)
    }

    fn ten_train_project() -> HistoricalProject {
        HistoricalProject::new(
            ProjectId::new("MTR-2022-010").unwrap(),
            "Metro Series 3000",
            10,
            NaiveDate::from_ymd_opt(2022, 11, 30).unwrap(),
        )
        .with_phases(["Bogie Assembly"])
    }

    #[test]
    fn scales_linearly_by_train_ratio() {
        let stat = PhaseStatistic::new("Bogie Assembly", 305.0, 0.92, 25).with_avg_cost(43_500.0);
        let project = ten_train_project();

        let est = estimate(&bogie(), Some(&stat), 8, Some(&project));

        assert_eq!(est.hours, 244.0);
        assert_eq!(est.cost, Some(34_800.0));
        assert_eq!(est.tier, ConfidenceTier::High);
        assert_eq!(
            est.scaled_from,
            Some(Provenance::ScaledFromProject {
                project_id: project.project_id.clone(),
                source_hours: 305.0,
                source_train_count: 10,
            })
        );
    }

    #[test]
    fn scaled_hours_are_clamped_to_one() {
        let stat = PhaseStatistic::new("Bogie Assembly", 5.0, 0.92, 25);
        let mut project = ten_train_project();
        project.num_trains = 100;

        let est = estimate(&bogie(), Some(&stat), 1, Some(&project));
        assert_eq!(est.hours, 1.0);
        assert_eq!(est.cost, None);
    }

    #[test]
    fn average_used_unscaled_without_source() {
        let stat = PhaseStatistic::new("HVAC Installation", 155.0, 0.95, 22);
        let phase = PhaseTemplate::new("HVAC Installation", 2, "Electrical", 160.0);

        let est = estimate(&phase, Some(&stat), 8, None);

        assert_eq!(est.hours, 155.0);
        assert_eq!(est.cost, None);
        assert_eq!(est.tier, ConfidenceTier::High);
        let label = est.scaled_from.map(|p| p.to_string());
        assert_eq!(label.as_deref(), Some("historical average of 22 projects"));
    }

    #[test]
    fn no_statistic_falls_back_to_baseline() {
        let phase = PhaseTemplate::new("Testing and Commissioning", 6, "Quality", 240.0);
        let est = estimate(&phase, None, 8, Some(&ten_train_project()));

        assert_eq!(est.hours, 240.0);
        assert_eq!(est.cost, None);
        assert_eq!(est.tier, ConfidenceTier::Low);
        assert_eq!(est.scaled_from, None);
    }

    #[test]
    fn tier_policy() {
        let tier = |occ, rate| ConfidenceTier::for_statistic(Some(&PhaseStatistic::new("X", 10.0, rate, occ)));

        assert_eq!(tier(20, 0.90), ConfidenceTier::High);
        assert_eq!(tier(19, 0.99), ConfidenceTier::Medium);
        assert_eq!(tier(50, 0.89), ConfidenceTier::Medium);
        assert_eq!(tier(5, 0.5), ConfidenceTier::Medium);
        assert_eq!(tier(4, 1.0), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_statistic(None), ConfidenceTier::Low);
    }

    #[test]
    fn tiers_order_low_to_high() {
        assert!(ConfidenceTier::Low < ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium < ConfidenceTier::High);
        assert_eq!(
            [ConfidenceTier::High, ConfidenceTier::Low, ConfidenceTier::Medium]
                .into_iter()
                .min(),
            Some(ConfidenceTier::Low)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: raising occurrences never lowers the tier while the success
        /// rate stays at or above the High threshold.
        #[test]
        fn tier_is_monotonic_in_occurrences(
            low in 0u32..100,
            extra in 0u32..100,
            rate in 0.90f64..=1.0,
        ) {
            let before = PhaseStatistic::new("X", 10.0, rate, low);
            let after = PhaseStatistic::new("X", 10.0, rate, low + extra);
            prop_assert!(
                ConfidenceTier::for_statistic(Some(&after)) >= ConfidenceTier::for_statistic(Some(&before))
            );
        }

        /// Property: scaled estimates are finite, at least one hour, and never
        /// report a negative cost.
        #[test]
        fn scaled_estimates_stay_in_range(
            hours in 0.01f64..10_000.0,
            cost in 0.0f64..1_000_000.0,
            target in 1u32..200,
            historical in 1u32..200,
        ) {
            let stat = PhaseStatistic::new("Bogie Assembly", hours, 0.95, 30).with_avg_cost(cost);
            let mut project = ten_train_project();
            project.num_trains = historical;

            let est = estimate(&bogie(), Some(&stat), target, Some(&project));
            prop_assert!(est.hours.is_finite() && est.hours >= 1.0);
            prop_assert!(est.cost.map(|c| c >= 0.0).unwrap_or(false));
        }
    }
}
