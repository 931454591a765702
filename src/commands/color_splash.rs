// 🎨 Color Splash - group elements by a parameter value and color each group

use crate::attributes::{AttributeSource, EntityId};
use crate::color::{ColorScheme, Rgb};
use crate::grouping::{group, MetricSet};
use serde::Serialize;
use tracing::{info, warn};

/// Group key for elements whose parameter is missing or empty
pub const UNSET_VALUE: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplashGroup {
    pub value: String,
    pub color: Option<Rgb>,
    pub element_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSplashPlan {
    pub parameter: String,
    pub groups: Vec<SplashGroup>,

    /// Values the scheme could not color (palette too short)
    pub uncolored: Vec<String>,
}

impl ColorSplashPlan {
    /// Color to apply to one element, if its group got one
    pub fn color_of(&self, id: EntityId) -> Option<Rgb> {
        self.groups
            .iter()
            .find(|g| g.element_ids.contains(&id))
            .and_then(|g| g.color)
    }

    pub fn element_count(&self) -> usize {
        self.groups.iter().map(|g| g.element_ids.len()).sum()
    }
}

/// Parameter value used as group key
pub fn parameter_value<E: AttributeSource + ?Sized>(element: &E, parameter: &str) -> String {
    element
        .text(parameter)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNSET_VALUE.to_string())
}

pub fn plan_color_splash<E: AttributeSource>(
    elements: &[E],
    parameter: &str,
    scheme: &ColorScheme,
) -> ColorSplashPlan {
    let grouping = group(
        elements,
        |e: &E| Some(parameter_value(e, parameter)),
        &MetricSet::new(),
    );

    let keys = grouping.keys();
    let colors = scheme.assign(&keys);
    let uncolored = colors.missing(&keys);

    if !uncolored.is_empty() {
        warn!(parameter, count = uncolored.len(), "values left without a color");
    }

    let groups = grouping
        .iter()
        .map(|bucket| SplashGroup {
            value: bucket.key().to_string(),
            color: colors.get(bucket.key()),
            element_ids: bucket.members().collect(),
        })
        .collect::<Vec<_>>();

    info!(parameter, groups = groups.len(), "color splash planned");

    ColorSplashPlan {
        parameter: parameter.to_string(),
        groups,
        uncolored,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{names, Element};

    fn walls() -> Vec<Element> {
        vec![
            Element::new(1).with_text(names::COMMENTS, "Group A"),
            Element::new(2).with_text(names::COMMENTS, "Group A"),
            Element::new(3).with_text(names::COMMENTS, "Group B"),
            Element::new(4).with_text(names::COMMENTS, ""),
            Element::new(5),
        ]
    }

    #[test]
    fn test_groups_by_parameter_with_unset_bucket() {
        let plan = plan_color_splash(&walls(), names::COMMENTS, &ColorScheme::default());

        let values: Vec<&str> = plan.groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["Group A", "Group B", UNSET_VALUE]);
        assert_eq!(plan.groups[0].element_ids, vec![EntityId(1), EntityId(2)]);
        assert_eq!(plan.groups[2].element_ids, vec![EntityId(4), EntityId(5)]);
        assert_eq!(plan.element_count(), 5);
    }

    #[test]
    fn test_gradient_colors_follow_group_order() {
        let plan = plan_color_splash(&walls(), names::COMMENTS, &ColorScheme::default());

        assert_eq!(plan.groups[0].color, Some(Rgb::new(0, 0, 180)));
        assert_eq!(plan.groups[1].color, Some(Rgb::new(90, 0, 90)));
        assert_eq!(plan.groups[2].color, Some(Rgb::new(180, 0, 0)));
        assert_eq!(plan.color_of(EntityId(3)), Some(Rgb::new(90, 0, 90)));
        assert!(plan.uncolored.is_empty());
    }

    #[test]
    fn test_short_palette_reports_uncolored() {
        let scheme = ColorScheme::Palette {
            colors: vec![Rgb::new(255, 0, 0)],
        };
        let plan = plan_color_splash(&walls(), names::COMMENTS, &scheme);

        assert_eq!(plan.groups[0].color, Some(Rgb::new(255, 0, 0)));
        assert_eq!(plan.groups[1].color, None);
        assert_eq!(plan.uncolored, vec!["Group B", UNSET_VALUE]);
        assert_eq!(plan.color_of(EntityId(5)), None);
    }

    #[test]
    fn test_numeric_parameter_values_group_as_text() {
        let rooms = vec![
            Element::new(1).with_number(names::AREA, 12.0),
            Element::new(2).with_number(names::AREA, 12.0),
            Element::new(3).with_number(names::AREA, 7.5),
        ];
        let plan = plan_color_splash(&rooms, names::AREA, &ColorScheme::default());

        let values: Vec<&str> = plan.groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["12", "7.5"]);
    }

    #[test]
    fn test_empty_selection() {
        let plan = plan_color_splash::<Element>(&[], names::COMMENTS, &ColorScheme::default());
        assert!(plan.groups.is_empty());
        assert!(plan.uncolored.is_empty());
    }
}
