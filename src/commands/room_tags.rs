// 🏷️ Room Tags - decide which rooms get a new tag

use crate::attributes::{AttributeSource, EntityId};
use crate::commands::room_export::is_placed;
use serde::Serialize;
use std::collections::HashSet;

/// Category name the loader uses for room tag entities
pub const ROOM_TAG_CATEGORY: &str = "Room Tags";

/// Attribute on a tag entity naming the room it labels
pub const TAGGED_ROOM: &str = "room";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagPlan {
    pub to_tag: Vec<EntityId>,
    pub already_tagged: Vec<EntityId>,
    pub unplaced: Vec<EntityId>,
    pub not_selected: usize,
}

/// Rooms already labelled by the tag entities among `entities`
pub fn tagged_rooms<E: AttributeSource>(entities: &[E]) -> HashSet<EntityId> {
    entities
        .iter()
        .filter(|e| e.category().as_deref() == Some(ROOM_TAG_CATEGORY))
        .filter_map(|e| e.text(TAGGED_ROOM)?.parse::<EntityId>().ok())
        .collect()
}

/// Plan tags for `rooms`, recording every planned room in `tagged`
pub fn plan_room_tags<E: AttributeSource>(
    rooms: &[E],
    tagged: &mut HashSet<EntityId>,
    selection: Option<&HashSet<EntityId>>,
) -> TagPlan {
    let mut plan = TagPlan::default();

    for room in rooms {
        let id = room.entity_id();

        if selection.map_or(false, |selected| !selected.contains(&id)) {
            plan.not_selected += 1;
            continue;
        }
        if !is_placed(room) {
            plan.unplaced.push(id);
            continue;
        }
        if !tagged.insert(id) {
            plan.already_tagged.push(id);
            continue;
        }
        plan.to_tag.push(id);
    }

    plan
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{names, Element};

    fn rooms() -> Vec<Element> {
        vec![
            Element::new(1).with_number(names::AREA, 100.0),
            Element::new(2).with_number(names::AREA, 80.0),
            Element::new(3).with_number(names::AREA, 0.0),
        ]
    }

    #[test]
    fn test_tags_every_placed_room() {
        let mut tagged = HashSet::new();
        let plan = plan_room_tags(&rooms(), &mut tagged, None);

        assert_eq!(plan.to_tag, vec![EntityId(1), EntityId(2)]);
        assert_eq!(plan.unplaced, vec![EntityId(3)]);
        assert_eq!(tagged.len(), 2);
    }

    #[test]
    fn test_skips_already_tagged() {
        let mut tagged: HashSet<EntityId> = [EntityId(1)].into_iter().collect();
        let plan = plan_room_tags(&rooms(), &mut tagged, None);

        assert_eq!(plan.to_tag, vec![EntityId(2)]);
        assert_eq!(plan.already_tagged, vec![EntityId(1)]);
    }

    #[test]
    fn test_second_pass_tags_nothing() {
        let mut tagged = HashSet::new();
        plan_room_tags(&rooms(), &mut tagged, None);
        let plan = plan_room_tags(&rooms(), &mut tagged, None);

        assert!(plan.to_tag.is_empty());
        assert_eq!(plan.already_tagged.len(), 2);
    }

    #[test]
    fn test_selection_limits_rooms() {
        let mut tagged = HashSet::new();
        let selection: HashSet<EntityId> = [EntityId(2)].into_iter().collect();
        let plan = plan_room_tags(&rooms(), &mut tagged, Some(&selection));

        assert_eq!(plan.to_tag, vec![EntityId(2)]);
        assert_eq!(plan.not_selected, 2);
    }

    #[test]
    fn test_tagged_rooms_from_tag_entities() {
        let entities = vec![
            Element::new(50)
                .with_text(names::CATEGORY, ROOM_TAG_CATEGORY)
                .with_number(TAGGED_ROOM, 1.0),
            Element::new(51).with_number(TAGGED_ROOM, 2.0),
        ];

        let tagged = tagged_rooms(&entities);
        assert!(tagged.contains(&EntityId(1)));
        assert!(!tagged.contains(&EntityId(2)));
    }

    #[test]
    fn test_tagged_rooms_keep_large_ids_exact() {
        let entities = vec![Element::new(60)
            .with_text(names::CATEGORY, ROOM_TAG_CATEGORY)
            .with_text(TAGGED_ROOM, "9007199254740993")];

        let tagged = tagged_rooms(&entities);
        assert!(tagged.contains(&EntityId(9_007_199_254_740_993)));
        assert!(!tagged.contains(&EntityId(9_007_199_254_740_992)));
    }
}
