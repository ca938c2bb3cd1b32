//! Worklist ordering and tier analytics.

use crate::patient::PatientRecord;
use crate::priority::PriorityTier;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Sorts records most urgent first: by tier (Deceased, Critical, High, Medium, Low), then newest
/// admission first within a tier.
pub fn sort_worklist(records: &mut [PatientRecord]) {
    records.sort_by_key(|r| (r.priority, Reverse(r.id)));
}

/// Counts records per tier. Tiers with no records are absent from the map.
pub fn priority_counts(records: &[PatientRecord]) -> BTreeMap<PriorityTier, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.priority).or_insert(0) += 1;
    }
    counts
}
