// 🏠 Room Export - flat room records plus total area
//
// A room with no positive area is unplaced and is skipped unless the caller
// asks for unplaced rooms.

use crate::attributes::{names, AttributeSource, EntityId};
use serde::Serialize;
use tracing::debug;

pub const NO_LEVEL: &str = "No Level";

/// Category name the loader uses for rooms
pub const ROOM_CATEGORY: &str = "Rooms";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRecord {
    pub id: EntityId,
    pub name: String,
    pub number: String,
    pub level: String,
    pub department: Option<String>,
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomExport {
    pub rooms: Vec<RoomRecord>,
    pub total_area: f64,
    pub skipped_unplaced: usize,
}

pub fn is_room<E: AttributeSource + ?Sized>(entity: &E) -> bool {
    entity.category().as_deref() == Some(ROOM_CATEGORY)
}

pub fn is_placed<E: AttributeSource + ?Sized>(room: &E) -> bool {
    room.number(names::AREA).map_or(false, |area| area > 0.0)
}

fn record<E: AttributeSource>(room: &E) -> RoomRecord {
    RoomRecord {
        id: room.entity_id(),
        name: room.text(names::NAME).unwrap_or_default(),
        number: room.text(names::NUMBER).unwrap_or_default(),
        level: room
            .text(names::LEVEL)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| NO_LEVEL.to_string()),
        department: room.text(names::DEPARTMENT).filter(|d| !d.is_empty()),
        area: room.number(names::AREA).unwrap_or(0.0),
    }
}

pub fn export_rooms<E: AttributeSource>(rooms: &[E], include_unplaced: bool) -> RoomExport {
    let mut records = Vec::with_capacity(rooms.len());
    let mut skipped = 0;

    for room in rooms {
        if !include_unplaced && !is_placed(room) {
            skipped += 1;
            continue;
        }
        records.push(record(room));
    }

    let total_area = records.iter().map(|r| r.area).sum();
    debug!(exported = records.len(), skipped, "rooms exported");

    RoomExport {
        rooms: records,
        total_area,
        skipped_unplaced: skipped,
    }
}

// ============================================================================
// TESTS
// ============================================================================
