// 🧱 Material Quantities - area/volume roll-up per material
//
// An element is observed once per material it carries, so one wall with
// concrete and gypsum layers counts toward both materials.

use crate::attributes::{AttributeSource, MaterialLayer};
use crate::grouping::GroupingAccumulator;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

pub const AREA_METRIC: &str = "area";
pub const VOLUME_METRIC: &str = "volume";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialQuantity {
    pub material: String,
    pub class: Option<String>,
    pub area: f64,
    pub volume: f64,
    pub element_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialReport {
    pub materials: Vec<MaterialQuantity>,
    pub total_area: f64,
    pub total_volume: f64,
    pub elements_scanned: usize,
}

impl MaterialReport {
    pub fn get(&self, material: &str) -> Option<&MaterialQuantity> {
        self.materials.iter().find(|m| m.material == material)
    }
}

/// Roll up material layers, optionally restricted to some categories
pub fn material_quantities<E, L>(
    elements: &[E],
    layers_of: L,
    categories: Option<&[String]>,
) -> MaterialReport
where
    E: AttributeSource,
    L: Fn(&E) -> Vec<MaterialLayer>,
{
    let mut accumulator = GroupingAccumulator::new();
    let mut classes: IndexMap<String, Option<String>> = IndexMap::new();
    let mut scanned = 0;

    for element in elements {
        if let Some(allowed) = categories {
            let in_filter = element
                .category()
                .map_or(false, |c| allowed.iter().any(|a| *a == c));
            if !in_filter {
                continue;
            }
        }
        scanned += 1;

        for layer in layers_of(element) {
            let class = classes.entry(layer.material.clone()).or_insert(None);
            if class.is_none() {
                *class = layer.class.clone();
            }

            let fresh = accumulator.observe(
                layer.material.clone(),
                element.entity_id(),
                [(AREA_METRIC, layer.area), (VOLUME_METRIC, layer.volume)],
            );
            if !fresh {
                debug!(element = %element.entity_id(), material = %layer.material, "repeated material on one element, quantities summed");
            }
        }
    }

    let grouping = accumulator.finish();
    let materials = grouping
        .iter()
        .map(|bucket| MaterialQuantity {
            material: bucket.key().to_string(),
            class: classes.get(bucket.key()).cloned().flatten(),
            area: bucket.metric(AREA_METRIC),
            volume: bucket.metric(VOLUME_METRIC),
            element_count: bucket.count(),
        })
        .collect();

    MaterialReport {
        materials,
        total_area: grouping.total_metric(AREA_METRIC),
        total_volume: grouping.total_metric(VOLUME_METRIC),
        elements_scanned: scanned,
    }
}

// ============================================================================
// TESTS
// ============================================================================
