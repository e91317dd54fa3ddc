//! `trainplan-estimation`
//!
//! **Responsibility:** production skeleton estimation.
//!
//! Given a train model, a train count and the phases engineering asked for,
//! produce a scaled, costed and confidence-rated phase plan with staffing
//! recommendations, learned from historical projects and phase statistics.
//!
//! This crate is storage-agnostic:
//! - Historical data arrives through a [`HistoryFeed`] supplied by the caller.
//! - Every stage (match, aggregate, estimate, assemble) is a pure function and
//!   can be called on its own.
//! - Sparse history degrades confidence; it is never an error.

pub mod aggregator;
pub mod assembler;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod feed;
pub mod matcher;
pub mod model;
pub mod skeleton;
pub mod staffing;

pub use aggregator::{AggregatedStatistics, StatisticSlot, aggregate};
pub use assembler::assemble;
pub use config::{EngineConfig, MatcherConfig, StaffingPolicy};
pub use engine::{SkeletonEngine, SkeletonRequest};
pub use error::{EstimationError, EstimationResult};
pub use estimator::{ConfidenceTier, PhaseEstimate, Provenance, estimate};
pub use feed::{HistoryFeed, InMemoryHistory};
pub use matcher::match_projects;
pub use model::{HistoricalProject, PhaseStatistic, PhaseTemplate, validate_request};
pub use skeleton::{Skeleton, SkeletonPhase, StaffingPlan};
pub use staffing::recommend_staffing;
