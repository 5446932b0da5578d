//! # Merge Engine
//!
//! Pure reconciliation functions that fold fetched records into the local
//! collections. None of them mutate their inputs; each returns the new full
//! collection.
//!
//! ## Algorithms
//!
//! - [`merge_updates`]: replace-by-id for incremental update batches, then a
//!   stable re-sort by send time
//! - [`merge_by_id`]: the same replace-by-id without ordering, for participants
//! - [`prepend_older`]: backward pagination, older slice goes in front
//! - [`append_sent`]: a server-confirmed outbound message joins the timeline
//!
//! ## Trust model
//!
//! Incoming records always win, even when their `updated_at` is older than the
//! copy already held. The remote source only ever sends the latest version of a
//! record, so arrival order is version order. [`stale_ids`] lets callers log
//! the cases where that assumption is violated.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::shared::messaging::{Chronological, Entity};

/// Insert-or-replace every incoming record by ID.
///
/// Records already present keep their position; new IDs are appended in
/// arrival order. Duplicate IDs inside `incoming` resolve to the last one.
pub fn merge_by_id<T: Entity + Clone>(existing: &[T], incoming: &[T]) -> Vec<T> {
    if incoming.is_empty() {
        return existing.to_vec();
    }

    let mut by_id: IndexMap<&str, &T> = IndexMap::with_capacity(existing.len() + incoming.len());
    for record in existing.iter().chain(incoming) {
        by_id.insert(record.entity_id(), record);
    }
    by_id.into_values().cloned().collect()
}

/// Incremental merge for timeline records.
///
/// Replace-by-id (see [`merge_by_id`]) followed by a stable sort on
/// `sent_at`, so records with equal send time keep their relative order.
pub fn merge_updates<T: Chronological + Clone>(existing: &[T], incoming: &[T]) -> Vec<T> {
    let mut merged = merge_by_id(existing, incoming);
    merged.sort_by_key(Chronological::sent_at);
    merged
}

/// Backward pagination merge.
///
/// The batch is sorted ascending and placed in front of `existing`. Records
/// whose ID is already held are dropped. A timeline with nothing in it has no
/// anchor to page from, so it is returned unchanged.
pub fn prepend_older<T: Chronological + Clone>(existing: &[T], older: &[T]) -> Vec<T> {
    if existing.is_empty() || older.is_empty() {
        return existing.to_vec();
    }

    let mut seen: HashSet<&str> = existing.iter().map(Entity::entity_id).collect();
    let mut batch: Vec<T> = older
        .iter()
        .filter(|record| seen.insert(record.entity_id()))
        .cloned()
        .collect();
    batch.sort_by_key(Chronological::sent_at);

    let mut timeline = batch;
    timeline.extend_from_slice(existing);
    // No-op for a well-formed older slice; restores order if the server
    // returned something newer than the anchor.
    timeline.sort_by_key(Chronological::sent_at);
    timeline
}

/// Add a server-confirmed sent record to the timeline.
///
/// If an update pull already delivered the same ID, the confirmed copy
/// replaces it instead of duplicating it.
pub fn append_sent<T: Chronological + Clone>(existing: &[T], sent: &T) -> Vec<T> {
    merge_updates(existing, std::slice::from_ref(sent))
}

/// IDs of incoming records that are older than the copy already held.
pub fn stale_ids<'a, T: Entity>(existing: &[T], incoming: &'a [T]) -> Vec<&'a str> {
    if incoming.is_empty() {
        return Vec::new();
    }
    let held: std::collections::HashMap<&str, i64> = existing
        .iter()
        .map(|record| (record.entity_id(), record.updated_at()))
        .collect();
    incoming
        .iter()
        .filter(|record| {
            held.get(record.entity_id())
                .is_some_and(|&updated_at| record.updated_at() < updated_at)
        })
        .map(Entity::entity_id)
        .collect()
}

/// Whether `records` is strictly unique by ID and non-decreasing by `sent_at`.
pub fn is_timeline<T: Chronological>(records: &[T]) -> bool {
    let ordered = records.windows(2).all(|pair| pair[0].sent_at() <= pair[1].sent_at());
    let mut seen = HashSet::with_capacity(records.len());
    ordered && records.iter().all(|record| seen.insert(record.entity_id()))
}
