// 🧺 Grouping Engine - partition entities by a derived key
//
// Buckets appear in first-seen key order. Keys are compared case-sensitively.
// Membership is a set, so a repeated (member, key) leaves the count alone,
// but its metric values are still summed.

use crate::attributes::{AttributeSource, EntityId};
use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

// ============================================================================
// GROUP BUCKET
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GroupBucket {
    key: String,
    members: IndexSet<EntityId>,
    metrics: IndexMap<String, f64>,
}

impl Serialize for GroupBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut bucket = serializer.serialize_struct("GroupBucket", 4)?;
        bucket.serialize_field("key", &self.key)?;
        bucket.serialize_field("count", &self.count())?;
        bucket.serialize_field("member_ids", &self.members)?;
        bucket.serialize_field("metrics", &self.metrics)?;
        bucket.end()
    }
}

impl GroupBucket {
    fn new(key: String) -> Self {
        GroupBucket {
            key,
            members: IndexSet::new(),
            metrics: IndexMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of distinct members
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Members in insertion order
    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, member: EntityId) -> bool {
        self.members.contains(&member)
    }

    /// Accumulated total for a metric, 0.0 if never observed
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    pub fn metrics(&self) -> &IndexMap<String, f64> {
        &self.metrics
    }

    /// Sum `metrics` into the bucket; `true` if `member` is new to it
    fn add<'m>(
        &mut self,
        member: EntityId,
        metrics: impl IntoIterator<Item = (&'m str, f64)>,
    ) -> bool {
        for (name, value) in metrics {
            *self.metrics.entry(name.to_string()).or_insert(0.0) += value;
        }
        self.members.insert(member)
    }
}

// ============================================================================
// METRICS
// ============================================================================

pub type MetricFn<'a, E> = Box<dyn Fn(&E) -> f64 + 'a>;

/// Ordered set of named metric functions
pub struct MetricSet<'a, E: ?Sized> {
    metrics: Vec<(String, MetricFn<'a, E>)>,
}

impl<'a, E: ?Sized> MetricSet<'a, E> {
    pub fn new() -> Self {
        MetricSet {
            metrics: Vec::new(),
        }
    }

    /// Builder: add a metric; a repeated name replaces the earlier function
    pub fn with(mut self, name: impl Into<String>, f: impl Fn(&E) -> f64 + 'a) -> Self {
        self.add(name, f);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, f: impl Fn(&E) -> f64 + 'a) {
        let name = name.into();
        let f: MetricFn<'a, E> = Box::new(f);
        match self.metrics.iter().position(|(existing, _)| *existing == name) {
            Some(index) => self.metrics[index].1 = f,
            None => self.metrics.push((name, f)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Evaluate every metric against one entity
    pub fn evaluate<'s>(&'s self, entity: &'s E) -> impl Iterator<Item = (&'s str, f64)> + 's {
        self.metrics
            .iter()
            .map(move |(name, f)| (name.as_str(), f(entity)))
    }
}

impl<'a, E: ?Sized> Default for MetricSet<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct GroupingAccumulator {
    buckets: IndexMap<String, GroupBucket>,
    excluded: usize,
}

impl GroupingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `member` under `key`
    ///
    /// Metrics are always summed. Returns `false` when the member was already
    /// in that bucket, whose count then stays put. The bucket is created on
    /// first sight of the key.
    pub fn observe<'m>(
        &mut self,
        key: impl Into<String>,
        member: EntityId,
        metrics: impl IntoIterator<Item = (&'m str, f64)>,
    ) -> bool {
        let key = key.into();
        self.buckets
            .entry(key)
            .or_insert_with_key(|key| GroupBucket::new(key.clone()))
            .add(member, metrics)
    }

    /// Count an entity that produced no key
    pub fn exclude(&mut self) {
        self.excluded += 1;
    }

    /// Add one entity: keyed and measured, or excluded when the key is `None`
    pub fn push<E, K>(&mut self, entity: &E, key_fn: K, metrics: &MetricSet<'_, E>) -> bool
    where
        E: AttributeSource + ?Sized,
        K: Fn(&E) -> Option<String>,
    {
        match key_fn(entity) {
            Some(key) => self.observe(key, entity.entity_id(), metrics.evaluate(entity)),
            None => {
                self.exclude();
                false
            }
        }
    }

    pub fn finish(self) -> Grouping {
        Grouping {
            buckets: self.buckets.into_values().collect(),
            excluded: self.excluded,
        }
    }
}

// ============================================================================
// GROUPING RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping {
    buckets: Vec<GroupBucket>,
    excluded: usize,
}

impl Grouping {
    pub fn buckets(&self) -> &[GroupBucket] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<GroupBucket> {
        self.buckets
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> Vec<&str> {
        self.buckets.iter().map(GroupBucket::key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&GroupBucket> {
        self.buckets.iter().find(|b| b.key == key)
    }

    /// Sum of bucket counts
    pub fn total_count(&self) -> usize {
        self.buckets.iter().map(GroupBucket::count).sum()
    }

    /// Sum of one metric across all buckets
    pub fn total_metric(&self, name: &str) -> f64 {
        self.buckets.iter().map(|b| b.metric(name)).sum()
    }

    /// Entities left out because their key was `None`
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupBucket> {
        self.buckets.iter()
    }
}

/// Group entities by `key_fn`, accumulating every metric in `metrics`
pub fn group<'e, E, I, K>(entities: I, key_fn: K, metrics: &MetricSet<'_, E>) -> Grouping
where
    E: AttributeSource + 'e,
    I: IntoIterator<Item = &'e E>,
    K: Fn(&E) -> Option<String>,
{
    let mut accumulator = GroupingAccumulator::new();
    for entity in entities {
        accumulator.push(entity, &key_fn, metrics);
    }
    accumulator.finish()
}

// ============================================================================
// TESTS
// ============================================================================
