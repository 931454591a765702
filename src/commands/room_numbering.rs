// 🔢 Room Numbering - batch allocation against a running taken set
//
// Each allocation is claimed before the next one starts, so a batch never
// hands out the same number twice.

use crate::attributes::{names, AttributeSource, EntityId};
use crate::identifier::{IdentifierAllocator, TakenSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberRequest {
    pub entity: EntityId,

    /// Number the caller asked for; `None` means "next available"
    pub requested: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberAssignment {
    pub entity: EntityId,
    pub requested: Option<String>,
    pub assigned: String,

    /// True when a requested number had to be changed
    pub renumbered: bool,
}

/// Build requests from each room's current `number` attribute
pub fn requests_from<E: AttributeSource>(rooms: &[E]) -> Vec<NumberRequest> {
    rooms
        .iter()
        .map(|room| NumberRequest {
            entity: room.entity_id(),
            requested: room
                .text(names::NUMBER)
                .filter(|n| !n.trim().is_empty()),
        })
        .collect()
}

/// Numbers already carried by `entities`, for seeding a taken set
pub fn taken_from<E: AttributeSource>(entities: &[E]) -> TakenSet {
    entities
        .iter()
        .filter_map(|e| e.text(names::NUMBER))
        .filter(|n| !n.trim().is_empty())
        .collect()
}

pub fn assign_room_numbers(
    requests: &[NumberRequest],
    taken: &mut TakenSet,
    allocator: &IdentifierAllocator,
) -> Vec<NumberAssignment> {
    let mut assignments = Vec::with_capacity(requests.len());

    for request in requests {
        let assigned = match &request.requested {
            Some(candidate) => allocator.allocate(candidate, taken),
            None => allocator.next_available(taken),
        };
        taken.insert(assigned.clone());

        let renumbered = request
            .requested
            .as_deref()
            .map_or(false, |requested| requested != assigned);

        if renumbered {
            debug!(entity = %request.entity, assigned = %assigned, "room renumbered");
        }

        assignments.push(NumberAssignment {
            entity: request.entity,
            requested: request.requested.clone(),
            assigned,
            renumbered,
        });
    }

    assignments
}

// ============================================================================
// TESTS
// ============================================================================
