use std::collections::BTreeMap;

use crate::config::StaffingPolicy;
use crate::skeleton::{SkeletonPhase, StaffingPlan};

/// Recommend headcount per department from estimated hours.
///
/// `ceil(department_hours / capacity)`: integer, monotonic in hours, and zero
/// for a department with no hours.
pub fn recommend_staffing(policy: &StaffingPolicy, phases: &[SkeletonPhase]) -> StaffingPlan {
    let mut hours_by_department: BTreeMap<&str, f64> = BTreeMap::new();
    for phase in phases {
        *hours_by_department.entry(phase.department.as_str()).or_insert(0.0) += phase.estimated_hours;
    }

    hours_by_department
        .into_iter()
        .map(|(department, hours)| {
            (department.to_string(), headcount(hours, policy.capacity_for(department)))
        })
        .collect()
}

fn headcount(hours: f64, capacity: f64) -> u32 {
    if !(hours > 0.0 && capacity > 0.0) {
        return 0;
    }
    // Saturating cast.
    (hours / capacity).ceil() as u32
}
