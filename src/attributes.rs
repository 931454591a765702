// 🏛️ Attribute Access - the only window the kernel has onto host objects
// Host entities stay opaque: the kernel reads attributes, never writes them.

use crate::error::{KernelError, KernelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Well-known attribute names used by the command families
pub mod names {
    pub const CATEGORY: &str = "category";
    pub const FAMILY: &str = "family";
    pub const TYPE: &str = "type";
    pub const LEVEL: &str = "level";
    pub const NAME: &str = "name";
    pub const NUMBER: &str = "number";
    pub const DEPARTMENT: &str = "department";
    pub const AREA: &str = "area";
    pub const VOLUME: &str = "volume";
    pub const ELEVATION: &str = "elevation";
    pub const COMMENTS: &str = "Comments";
}

// ============================================================================
// ENTITY IDENTITY
// ============================================================================

/// Opaque handle to a host-owned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

impl FromStr for EntityId {
    type Err = KernelError;

    fn from_str(s: &str) -> KernelResult<Self> {
        s.trim()
            .parse::<i64>()
            .map(EntityId)
            .map_err(|_| KernelError::InvalidElementId(s.to_string()))
    }
}

// ============================================================================
// ATTRIBUTE SOURCE
// ============================================================================

/// Read-only attribute access supplied by the caller
///
/// Accessors never fail: an attribute the entity does not carry is `None`.
/// Concrete host adapters implement this per entity category; the kernel
/// never inspects the concrete type.
pub trait AttributeSource {
    /// Stable identity of the entity
    fn entity_id(&self) -> EntityId;

    /// String view of an attribute
    fn text(&self, name: &str) -> Option<String>;

    /// Numeric view of an attribute
    fn number(&self, name: &str) -> Option<f64>;

    /// Category name, `None` for uncategorized entities
    fn category(&self) -> Option<String> {
        self.text(names::CATEGORY)
    }
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn entity_id(&self) -> EntityId {
        (**self).entity_id()
    }

    fn text(&self, name: &str) -> Option<String> {
        (**self).text(name)
    }

    fn number(&self, name: &str) -> Option<f64> {
        (**self).number(name)
    }

    fn category(&self) -> Option<String> {
        (**self).category()
    }
}

// ============================================================================
// ATTRIBUTE VALUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric when the raw cell parses as a finite number that prints back
    /// unchanged, text otherwise ("007" and "12.50" stay text)
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && n.to_string() == trimmed => AttributeValue::Number(n),
            _ => AttributeValue::Text(raw.to_string()),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            AttributeValue::Number(n) => n.to_string(),
            AttributeValue::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

// ============================================================================
// MATERIAL LAYERS
// ============================================================================

/// One material carried by an element, with the quantities it contributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    pub material: String,
    pub class: Option<String>,
    pub area: f64,
    pub volume: f64,
}

impl MaterialLayer {
    pub fn new(material: impl Into<String>, area: f64, volume: f64) -> Self {
        MaterialLayer {
            material: material.into(),
            class: None,
            area,
            volume,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Parse a `;`-separated list of `name:area:volume[:class]` entries
    pub fn parse_list(cell: &str) -> KernelResult<Vec<MaterialLayer>> {
        cell.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(MaterialLayer::from_str)
            .collect()
    }
}

impl FromStr for MaterialLayer {
    type Err = KernelError;

    fn from_str(s: &str) -> KernelResult<Self> {
        let invalid = || KernelError::InvalidLayer(s.to_string());
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();

        if parts.len() < 3 || parts.len() > 4 || parts[0].is_empty() {
            return Err(invalid());
        }

        let area = parts[1].parse::<f64>().map_err(|_| invalid())?;
        let volume = parts[2].parse::<f64>().map_err(|_| invalid())?;
        let class = parts
            .get(3)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());

        Ok(MaterialLayer {
            material: parts[0].to_string(),
            class,
            area,
            volume,
        })
    }
}

// ============================================================================
// ELEMENT (in-memory adapter)
// ============================================================================

/// Plain in-memory entity, used by the CSV loader and by tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: EntityId,
    pub attributes: HashMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<MaterialLayer>,
}

impl Element {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Element {
            id: id.into(),
            attributes: HashMap::new(),
            layers: Vec::new(),
        }
    }

    /// Builder: set a text attribute
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Text(value.into()));
        self
    }

    /// Builder: set a numeric attribute
    pub fn with_number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Number(value));
        self
    }

    /// Builder: add a material layer
    pub fn with_layer(mut self, layer: MaterialLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    pub fn layers(&self) -> &[MaterialLayer] {
        &self.layers
    }
}

impl AttributeSource for Element {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn text(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(AttributeValue::as_text)
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttributeValue::as_number)
    }
}

// ============================================================================
// TESTS
// ============================================================================
