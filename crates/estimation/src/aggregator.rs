use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::PhaseStatistic;

/// What the history says about one requested phase.
///
/// `Missing` and `Rejected` both mean "no usable data"; neither is ever
/// turned into a zero-valued statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatisticSlot {
    Present(PhaseStatistic),
    /// Unknown phase, or a statistic with zero occurrences.
    Missing,
    /// A statistic was supplied but broke a record invariant.
    Rejected { reason: String },
}

impl StatisticSlot {
    pub fn statistic(&self) -> Option<&PhaseStatistic> {
        match self {
            StatisticSlot::Present(stat) => Some(stat),
            StatisticSlot::Missing | StatisticSlot::Rejected { .. } => None,
        }
    }
}

/// Per-phase statistics for one request, keyed by phase name.
pub type AggregatedStatistics = BTreeMap<String, StatisticSlot>;

/// Select the statistics for `phase_names` out of what the feed returned.
///
/// The result does not depend on the order of `phase_names`.
pub fn aggregate<'a, I>(phase_names: I, statistics: &BTreeMap<String, PhaseStatistic>) -> AggregatedStatistics
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = AggregatedStatistics::new();

    for name in phase_names {
        let slot = match statistics.get(name) {
            None => StatisticSlot::Missing,
            Some(stat) if !stat.has_data() => StatisticSlot::Missing,
            Some(stat) if stat.phase_name != name => StatisticSlot::Rejected {
                reason: format!("statistic is labelled '{}'", stat.phase_name),
            },
            Some(stat) => match stat.validate() {
                Ok(()) => StatisticSlot::Present(stat.clone()),
                Err(e) => {
                    warn!(phase = name, error = %e, "rejecting phase statistic; falling back to baseline");
                    StatisticSlot::Rejected {
                        reason: e.to_string(),
                    }
                }
            },
        };
        out.insert(name.to_string(), slot);
    }

    debug!(
        phases = out.len(),
        with_data = out.values().filter(|s| s.statistic().is_some()).count(),
        "aggregated phase statistics"
    );

    out
}
