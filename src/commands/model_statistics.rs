// 📊 Model Statistics - counts by category, family type and level

use crate::attributes::{names, AttributeSource};
use crate::grouping::{group, MetricSet};
use crate::units::feet_to_mm;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category name the loader uses for level entities
pub const LEVEL_CATEGORY: &str = "Levels";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    pub elevation_ft: f64,
}

impl LevelInfo {
    /// Levels found among `entities`: category "Levels" with a name
    pub fn from_entities<E: AttributeSource>(entities: &[E]) -> Vec<LevelInfo> {
        entities
            .iter()
            .filter(|e| e.category().as_deref() == Some(LEVEL_CATEGORY))
            .filter_map(|e| {
                Some(LevelInfo {
                    name: e.text(names::NAME).filter(|n| !n.is_empty())?,
                    elevation_ft: e.number(names::ELEVATION).unwrap_or(0.0),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    /// `family:type`
    pub key: String,
    pub family: Option<String>,
    pub type_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub name: String,
    pub elevation_ft: f64,
    pub elevation_mm: f64,
    pub element_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatistics {
    pub total_elements: usize,
    pub categorized_elements: usize,
    pub categories: Vec<CategoryCount>,
    pub types: Vec<TypeCount>,
    pub families: Vec<String>,
    pub levels: Vec<LevelSummary>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn type_key<E: AttributeSource>(e: &E) -> Option<String> {
    let type_name = non_empty(e.text(names::TYPE))?;
    let family = non_empty(e.text(names::FAMILY)).unwrap_or_default();
    Some(format!("{family}:{type_name}"))
}

pub fn model_statistics<E: AttributeSource>(entities: &[E], levels: &[LevelInfo]) -> ModelStatistics {
    let no_metrics = MetricSet::new();

    let by_category = group(entities, |e: &E| e.category(), &no_metrics);
    let categories = by_category
        .iter()
        .map(|b| CategoryCount {
            category: b.key().to_string(),
            count: b.count(),
        })
        .collect();

    let by_type = group(entities, type_key::<E>, &no_metrics);
    let mut type_parts: HashMap<String, (Option<String>, String)> = HashMap::new();
    for e in entities {
        if let (Some(key), Some(type_name)) = (type_key(e), non_empty(e.text(names::TYPE))) {
            type_parts
                .entry(key)
                .or_insert_with(|| (non_empty(e.text(names::FAMILY)), type_name));
        }
    }
    let types = by_type
        .iter()
        .filter_map(|b| {
            let (family, type_name) = type_parts.get(b.key())?.clone();
            Some(TypeCount {
                key: b.key().to_string(),
                family,
                type_name,
                count: b.count(),
            })
        })
        .collect();

    let families: IndexSet<String> = entities
        .iter()
        .filter_map(|e| non_empty(e.text(names::FAMILY)))
        .collect();

    let by_level = group(entities, |e: &E| non_empty(e.text(names::LEVEL)), &no_metrics);
    let mut ordered = levels.to_vec();
    ordered.sort_by(|a, b| a.elevation_ft.total_cmp(&b.elevation_ft));
    let levels = ordered
        .into_iter()
        .map(|level| LevelSummary {
            element_count: by_level.get(&level.name).map_or(0, |b| b.count()),
            elevation_mm: feet_to_mm(level.elevation_ft),
            elevation_ft: level.elevation_ft,
            name: level.name,
        })
        .collect();

    ModelStatistics {
        total_elements: entities.len(),
        categorized_elements: by_category.total_count(),
        categories,
        types,
        families: families.into_iter().collect(),
        levels,
    }
}

// ============================================================================
// TESTS
// ============================================================================
