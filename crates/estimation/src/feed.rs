use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::EstimationResult;
use crate::model::{HistoricalProject, PhaseStatistic};

/// Read-only source of historical data.
///
/// This is the boundary to storage: a database-backed implementation runs its
/// queries here and maps failures to [`crate::EstimationError::Feed`]. The
/// engine performs no I/O of its own.
pub trait HistoryFeed: Send + Sync {
    /// Completed projects for a train model. May return projects of other
    /// models; the matcher filters them out.
    fn list_historical_projects(&self, train_model: &str)
    -> EstimationResult<Vec<HistoricalProject>>;

    /// Statistics for the given phase names, keyed by phase name. Unknown
    /// names are simply left out of the map.
    fn lookup_phase_statistics(
        &self,
        phase_names: &BTreeSet<String>,
    ) -> EstimationResult<BTreeMap<String, PhaseStatistic>>;
}

impl<F: HistoryFeed + ?Sized> HistoryFeed for &F {
    fn list_historical_projects(
        &self,
        train_model: &str,
    ) -> EstimationResult<Vec<HistoricalProject>> {
        (**self).list_historical_projects(train_model)
    }

    fn lookup_phase_statistics(
        &self,
        phase_names: &BTreeSet<String>,
    ) -> EstimationResult<BTreeMap<String, PhaseStatistic>> {
        (**self).lookup_phase_statistics(phase_names)
    }
}

impl<F: HistoryFeed + ?Sized> HistoryFeed for Arc<F> {
    fn list_historical_projects(
        &self,
        train_model: &str,
    ) -> EstimationResult<Vec<HistoricalProject>> {
        (**self).list_historical_projects(train_model)
    }

    fn lookup_phase_statistics(
        &self,
        phase_names: &BTreeSet<String>,
    ) -> EstimationResult<BTreeMap<String, PhaseStatistic>> {
        (**self).lookup_phase_statistics(phase_names)
    }
}

/// In-memory history feed.
///
/// Starts empty; callers (or tests) load it with records fetched elsewhere.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    projects: Vec<HistoricalProject>,
    statistics: BTreeMap<String, PhaseStatistic>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: HistoricalProject) -> Self {
        self.projects.push(project);
        self
    }

    /// Later statistics for the same phase name replace earlier ones.
    pub fn with_statistic(mut self, statistic: PhaseStatistic) -> Self {
        self.statistics
            .insert(statistic.phase_name.clone(), statistic);
        self
    }
}

impl HistoryFeed for InMemoryHistory {
    fn list_historical_projects(
        &self,
        train_model: &str,
    ) -> EstimationResult<Vec<HistoricalProject>> {
        Ok(self
            .projects
            .iter()
            .filter(|p| p.train_model == train_model)
            .cloned()
            .collect())
    }

    fn lookup_phase_statistics(
        &self,
        phase_names: &BTreeSet<String>,
    ) -> EstimationResult<BTreeMap<String, PhaseStatistic>> {
        Ok(phase_names
            .iter()
            .filter_map(|name| self.statistics.get(name).map(|s| (name.clone(), s.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trainplan_core::ProjectId;

    fn project(id: &str, model: &str) -> HistoricalProject {
        HistoricalProject::new(
            ProjectId::new(id).unwrap(),
            model,
            10,
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        )
    }

    #[test]
    fn lists_only_the_requested_model() {
        let feed = InMemoryHistory::new()
            .with_project(project("P-1", "Metro Series 3000"))
            .with_project(project("P-2", "Regional Express"));

        let projects = feed.list_historical_projects("Metro Series 3000").unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id.as_str(), "P-1");
        assert!(feed.list_historical_projects("Tram 100").unwrap().is_empty());
    }

    #[test]
    fn lookup_omits_unknown_phases() {
        let feed = InMemoryHistory::new()
            .with_statistic(PhaseStatistic::new("Bogie Assembly", 305.0, 0.92, 25));

        let names: BTreeSet<String> = ["Bogie Assembly", "Painting"]
            .into_iter()
            .map(String::from)
            .collect();
        let stats = feed.lookup_phase_statistics(&names).unwrap();

        assert_eq!(stats.len(), 1);
        assert!(stats.contains_key("Bogie Assembly"));
    }

    #[test]
    fn shared_feed_is_usable_through_arc() {
        let feed = Arc::new(
            InMemoryHistory::new().with_project(project("P-1", "Metro Series 3000")),
        );
        let projects = HistoryFeed::list_historical_projects(&feed, "Metro Series 3000").unwrap();
        assert_eq!(projects.len(), 1);
    }
}
