// 🔁 Command Flows - CSV export → kernel → command results

use element_kernel::attributes::AttributeSource;
use element_kernel::commands::room_export::is_room;
use element_kernel::commands::room_numbering::{requests_from, taken_from};
use element_kernel::commands::room_tags::tagged_rooms;
use element_kernel::{
    assign_room_numbers, export_rooms, load_elements_from_reader, material_quantities,
    model_statistics, plan_color_splash, plan_room_tags, ColorScheme, Element, EntityId,
    IdentifierAllocator, KernelConfig, LevelInfo, Report, Rgb, TakenSet,
};
use std::collections::HashSet;

const MODEL: &str = "\
id,category,name,number,level,department,area,elevation,family,type,Comments,room,materials
1,Levels,Level 1,,,,,0,,,,,
2,Levels,Level 2,,,,,10,,,,,
10,Rooms,Lobby,101,Level 1,Public,120,,,,,,
11,Rooms,Office,101,Level 1,Admin,40,,,,,,
12,Rooms,Store,007,Level 2,,15,,,,,,
13,Rooms,Void,,Level 2,,0,,,,,,
14,Rooms,Closet,,,,6,,,,,,
20,Walls,,,Level 1,,,,Basic Wall,Generic 200,Group A,,Concrete:30:6:Masonry;Gypsum:30:0.4
21,Walls,,,Level 1,,,,Basic Wall,Generic 200,Group B,,Concrete:12:2.4
22,Doors,,,Level 2,,,,Single Flush,0915 x 2134,,,
23,,,,,,,,,,Group A,,
30,Room Tags,,,,,,,,,,10,
";

fn model() -> Vec<Element> {
    load_elements_from_reader(MODEL.as_bytes()).unwrap()
}

fn rooms(elements: &[Element]) -> Vec<&Element> {
    elements.iter().filter(|e| is_room(*e)).collect()
}

#[test]
fn test_room_numbering_resolves_duplicates_and_fills_gaps() {
    let elements = model();
    let rooms = rooms(&elements);
    let mut taken = TakenSet::new();

    let assignments = assign_room_numbers(
        &requests_from(&rooms),
        &mut taken,
        &IdentifierAllocator::new(),
    );

    let assigned: Vec<&str> = assignments.iter().map(|a| a.assigned.as_str()).collect();
    assert_eq!(assigned, vec!["101", "102", "007", "103", "104"]);
    assert!(!assignments[0].renumbered);
    assert!(assignments[1].renumbered);
    assert!(!assignments[2].renumbered);
    assert_eq!(taken.len(), 5);
}

#[test]
fn test_next_number_follows_highest_room() {
    let elements = model();
    let taken = taken_from(&rooms(&elements));

    let allocator = IdentifierAllocator::new();
    assert_eq!(allocator.next_available(&taken), "102");
}

#[test]
fn test_color_splash_on_comments() {
    let elements = model();
    let scheme = ColorScheme::Palette {
        colors: vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)],
    };

    let plan = plan_color_splash(&elements, "Comments", &scheme);

    let values: Vec<&str> = plan.groups.iter().map(|g| g.value.as_str()).collect();
    assert_eq!(values, vec!["None", "Group A", "Group B"]);
    assert_eq!(plan.element_count(), elements.len());
    assert_eq!(plan.uncolored, vec!["Group B".to_string()]);
    assert_eq!(plan.color_of(EntityId(23)), Some(Rgb::new(0, 255, 0)));
    assert_eq!(plan.color_of(EntityId(21)), None);
}

#[test]
fn test_material_roll_up_for_walls() {
    let elements = model();
    let walls = vec!["Walls".to_string()];

    let report = material_quantities(&elements, |e: &Element| e.layers().to_vec(), Some(&walls));

    assert_eq!(report.elements_scanned, 2);
    let concrete = report.get("Concrete").unwrap();
    assert_eq!(concrete.element_count, 2);
    assert!((concrete.area - 42.0).abs() < 1e-9);
    assert!((concrete.volume - 8.4).abs() < 1e-9);
    assert_eq!(concrete.class.as_deref(), Some("Masonry"));
    assert_eq!(report.get("Gypsum").unwrap().element_count, 1);
    assert!((report.total_area - 72.0).abs() < 1e-9);
}

#[test]
fn test_model_statistics() {
    let elements = model();
    let levels = LevelInfo::from_entities(&elements);
    let stats = model_statistics(&elements, &levels);

    assert_eq!(stats.total_elements, elements.len());
    let category_sum: usize = stats.categories.iter().map(|c| c.count).sum();
    assert_eq!(category_sum, stats.categorized_elements);
    assert_eq!(stats.categorized_elements, elements.len() - 1);

    let wall_type = stats
        .types
        .iter()
        .find(|t| t.key == "Basic Wall:Generic 200")
        .unwrap();
    assert_eq!(wall_type.count, 2);
    assert_eq!(stats.families, vec!["Basic Wall", "Single Flush"]);

    let level_names: Vec<&str> = stats.levels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(level_names, vec!["Level 1", "Level 2"]);
    assert_eq!(stats.levels[0].element_count, 4);
    assert!((stats.levels[1].elevation_mm - 3048.0).abs() < 1e-9);
}

#[test]
fn test_room_export_skips_unplaced_by_default() {
    let elements = model();
    let rooms = rooms(&elements);

    let export = export_rooms(&rooms, false);
    assert_eq!(export.rooms.len(), 4);
    assert_eq!(export.skipped_unplaced, 1);
    assert!((export.total_area - 181.0).abs() < 1e-9);

    let closet = export.rooms.iter().find(|r| r.id == EntityId(14)).unwrap();
    assert_eq!(closet.level, "No Level");
    assert_eq!(export.rooms[2].number, "007");

    let everything = export_rooms(&rooms, true);
    assert_eq!(everything.rooms.len(), 5);
}

#[test]
fn test_room_tags_skip_existing_tags() {
    let elements = model();
    let rooms = rooms(&elements);
    let mut tagged = tagged_rooms(&elements);

    let plan = plan_room_tags(&rooms, &mut tagged, None);
    assert_eq!(plan.already_tagged, vec![EntityId(10)]);
    assert_eq!(plan.unplaced, vec![EntityId(13)]);
    assert_eq!(plan.to_tag, vec![EntityId(11), EntityId(12), EntityId(14)]);

    let selection: HashSet<EntityId> = [EntityId(12)].into_iter().collect();
    let mut fresh = tagged_rooms(&elements);
    let plan = plan_room_tags(&rooms, &mut fresh, Some(&selection));
    assert_eq!(plan.to_tag, vec![EntityId(12)]);
    assert_eq!(plan.not_selected, 4);
}

#[test]
fn test_config_drives_splash_and_export() {
    let config = KernelConfig::from_json(
        r#"{"splash_parameter": "department", "include_unplaced_rooms": true}"#,
    )
    .unwrap();
    let elements = model();
    let rooms = rooms(&elements);

    let plan = plan_color_splash(&rooms, &config.splash_parameter, &config.color);
    assert_eq!(plan.groups.len(), 3);
    assert!(plan.uncolored.is_empty());

    let export = export_rooms(&rooms, config.include_unplaced_rooms);
    assert_eq!(export.skipped_unplaced, 0);
}

#[test]
fn test_report_wraps_command_output() {
    let elements = model();
    let export = export_rooms(&rooms(&elements), false);

    let json = Report::new("rooms", &export).to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["command"], "rooms");
    assert_eq!(value["data"]["rooms"].as_array().unwrap().len(), 4);
    assert_eq!(value["data"]["rooms"][0]["id"], 10);
}

#[test]
fn test_room_numbers_keep_their_text_form() {
    let elements = model();
    let store = elements.iter().find(|e| e.id == EntityId(12)).unwrap();
    assert_eq!(store.text("number"), Some("007".to_string()));
}

#[test]
fn test_same_material_twice_on_one_element_sums_both_layers() {
    let elements = load_elements_from_reader("id,materials\n1,Concrete:10:2;Concrete:5:1\n".as_bytes()).unwrap();

    let report = material_quantities(&elements, |e: &Element| e.layers().to_vec(), None);
    let concrete = report.get("Concrete").unwrap();

    assert_eq!(concrete.element_count, 1);
    assert!((concrete.area - 15.0).abs() < 1e-9);
    assert!((concrete.volume - 3.0).abs() < 1e-9);
}

#[test]
fn test_tag_pointing_at_large_room_id_is_matched_exactly() {
    let csv = "\
id,category,area,room
9007199254740993,Rooms,20,
40,Room Tags,,9007199254740993
";
    let elements = load_elements_from_reader(csv.as_bytes()).unwrap();
    let mut tagged = tagged_rooms(&elements);

    let plan = plan_room_tags(&rooms(&elements), &mut tagged, None);
    assert_eq!(plan.already_tagged, vec![EntityId(9_007_199_254_740_993)]);
    assert!(plan.to_tag.is_empty());
}
