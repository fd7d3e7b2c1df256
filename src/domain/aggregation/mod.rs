pub mod bundles;
pub mod interpreters;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::entities::process::{Aggregation, LogicalEntity, ProcessSample};

/// Key of the synthetic entity summing every matched sample.
pub const TOTAL_KEY: &str = "TOTAL";

/// Groups the samples accepted by `group_predicate` under `group_key_extractor`.
///
/// Entities are ranked by `total_rss_mb` descending, ties broken by
/// `group_key` ascending; members keep their input order. The synthetic
/// `TOTAL` entity is returned separately. Returns `None` when no sample
/// matches.
pub fn aggregate<P, K>(
    samples: &[ProcessSample],
    group_predicate: P,
    group_key_extractor: K,
) -> Option<Aggregation>
where
    P: Fn(&ProcessSample) -> bool,
    K: Fn(&ProcessSample) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ProcessSample>> = HashMap::new();
    let mut matched: Vec<ProcessSample> = Vec::new();

    for sample in samples.iter().filter(|s| group_predicate(s)) {
        let key = group_key_extractor(sample);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(sample.clone());
        matched.push(sample.clone());
    }

    if matched.is_empty() {
        return None;
    }

    let mut entities: Vec<LogicalEntity> = order
        .into_iter()
        .filter_map(|key| {
            let members = groups.remove(&key)?;
            Some(LogicalEntity::from_members(key, members))
        })
        .collect();
    entities.sort_by(rank_by_memory);

    Some(Aggregation {
        entities,
        total: LogicalEntity::from_members(TOTAL_KEY, matched),
    })
}

fn rank_by_memory(a: &LogicalEntity, b: &LogicalEntity) -> Ordering {
    descending(a.total_rss_mb, b.total_rss_mb).then_with(|| a.group_key.cmp(&b.group_key))
}

/// Total descending order on `f64`; NaN ranks below every number.
fn descending(a: f64, b: f64) -> Ordering {
    let rank = |x: f64| if x.is_nan() { f64::NEG_INFINITY } else { x };
    rank(b).total_cmp(&rank(a))
}

/// Top `k` items by `key`, highest first.
///
/// Ties keep their original relative order.
pub fn top_k<T, F>(items: &[T], k: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    // sort_by is stable, so equal keys stay in input order
    ranked.sort_by(|a, b| descending(key(a), key(b)));
    ranked.truncate(k);
    ranked
}

/// Each sample as its own entity, for the top CPU / memory views.
#[must_use]
pub fn singleton(sample: &ProcessSample) -> LogicalEntity {
    LogicalEntity::from_members(sample.executable_name(), vec![sample.clone()])
}
