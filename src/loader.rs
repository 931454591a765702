// 📂 CSV Loader - element exports → in-memory elements
//
// Header row names the columns. `id` is required; `materials` holds
// `name:area:volume[:class]` entries separated by `;`; every other non-empty
// cell becomes an attribute (numeric when it parses as a number).

use crate::attributes::{AttributeValue, Element, EntityId, MaterialLayer};
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

pub const ID_COLUMN: &str = "id";
pub const MATERIALS_COLUMN: &str = "materials";

pub fn load_elements(csv_path: &Path) -> Result<Vec<Element>> {
    let rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let elements = read_elements(rdr)?;
    info!(path = ?csv_path, count = elements.len(), "elements loaded");
    Ok(elements)
}

pub fn load_elements_from_reader<R: Read>(reader: R) -> Result<Vec<Element>> {
    read_elements(csv::Reader::from_reader(reader))
}

fn read_elements<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Element>> {
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let id_index = headers
        .iter()
        .position(|h| h.trim() == ID_COLUMN)
        .ok_or_else(|| anyhow!("CSV header has no '{}' column", ID_COLUMN))?;

    let mut elements = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", row + 1))?;

        let id: EntityId = record
            .get(id_index)
            .unwrap_or_default()
            .parse()
            .with_context(|| format!("Row {}: bad element id", row + 1))?;
        let mut element = Element::new(id);

        for (column, cell) in headers.iter().zip(record.iter()) {
            let column = column.trim();
            if column == ID_COLUMN || cell.trim().is_empty() {
                continue;
            }
            if column == MATERIALS_COLUMN {
                element.layers = MaterialLayer::parse_list(cell)
                    .with_context(|| format!("Row {}: bad materials cell", row + 1))?;
                continue;
            }
            element.set(column, AttributeValue::infer(cell));
        }

        elements.push(element);
    }

    Ok(elements)
}

// ============================================================================
// TESTS
// ============================================================================
