// ⚙️ Kernel Config - caller-level options, loaded from JSON
//
// Kernel functions never read this on their own; callers pick values out of
// it and pass them in. Every field has a default, so a partial file is fine.

use crate::attributes::names;
use crate::color::ColorScheme;
use crate::identifier::AllocationPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub allocation: AllocationPolicy,
    pub color: ColorScheme,

    /// Parameter grouped on by color splash
    pub splash_parameter: String,

    /// Export rooms with no area too
    pub include_unplaced_rooms: bool,

    /// Restrict material roll-ups to these categories
    pub material_categories: Option<Vec<String>>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            allocation: AllocationPolicy::default(),
            color: ColorScheme::default(),
            splash_parameter: names::COMMENTS.to_string(),
            include_unplaced_rooms: false,
            material_categories: None,
        }
    }
}

impl KernelConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config JSON")
    }
}

// ============================================================================
// TESTS
// ============================================================================
