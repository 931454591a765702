// 🎨 Color Mapping - one color per group key
//
// Discrete mode pairs keys with a palette by position (no wrap-around).
// Gradient mode interpolates linearly between two endpoints, truncating
// each channel toward zero; first key gets `start`, last key gets `end`.

use crate::error::{KernelError, KernelResult};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

// ============================================================================
// RGB
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `#RRGGBB`, upper-case
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear interpolation, each channel truncated toward zero
    pub fn interpolate(start: Rgb, end: Rgb, ratio: f64) -> Rgb {
        fn channel(a: u8, b: u8, ratio: f64) -> u8 {
            let value = f64::from(a) + (f64::from(b) - f64::from(a)) * ratio;
            value.trunc().clamp(0.0, 255.0) as u8
        }

        Rgb {
            r: channel(start.r, end.r, ratio),
            g: channel(start.g, end.g, ratio),
            b: channel(start.b, end.b, ratio),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

impl FromStr for Rgb {
    type Err = KernelError;

    fn from_str(s: &str) -> KernelResult<Self> {
        let invalid = || KernelError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Accepted spellings in config files: "#RRGGBB" or [r, g, b]
#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Triple([u8; 3]),
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = KernelError;

    fn try_from(repr: RgbRepr) -> KernelResult<Self> {
        match repr {
            RgbRepr::Hex(s) => s.parse(),
            RgbRepr::Triple(channels) => Ok(Rgb::from(channels)),
        }
    }
}

// ============================================================================
// COLOR ASSIGNMENT
// ============================================================================

/// Key -> color table in key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColorAssignment {
    colors: IndexMap<String, Rgb>,
}

impl ColorAssignment {
    pub fn get(&self, key: &str) -> Option<Rgb> {
        self.colors.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.colors.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Keys from `keys` that received no color
    pub fn missing<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        keys.iter()
            .map(|k| k.as_ref())
            .filter(|k| !self.colors.contains_key(*k))
            .map(str::to_string)
            .collect()
    }

    fn insert(&mut self, key: &str, color: Rgb) {
        self.colors.insert(key.to_string(), color);
    }
}

/// Keys with repeats dropped, first occurrence kept
fn distinct_keys<S: AsRef<str>>(keys: &[S]) -> IndexSet<&str> {
    keys.iter().map(|k| k.as_ref()).collect()
}

/// Pair the i-th key with the i-th palette color
///
/// Repeated keys take no slot. Keys beyond the palette length get no entry.
pub fn assign_discrete<S: AsRef<str>>(keys: &[S], palette: &[Rgb]) -> ColorAssignment {
    let keys = distinct_keys(keys);
    let mut assignment = ColorAssignment::default();
    for (key, color) in keys.iter().zip(palette) {
        assignment.insert(key, *color);
    }

    if keys.len() > palette.len() {
        warn!(
            keys = keys.len(),
            palette = palette.len(),
            "palette shorter than key list, trailing keys left uncolored"
        );
    }
    assignment
}

/// Interpolate from `start` (first key) to `end` (last key)
pub fn assign_gradient<S: AsRef<str>>(keys: &[S], start: Rgb, end: Rgb) -> ColorAssignment {
    let keys = distinct_keys(keys);
    let mut assignment = ColorAssignment::default();
    let n = keys.len();

    for (i, key) in keys.iter().enumerate() {
        let ratio = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        assignment.insert(key, Rgb::interpolate(start, end, ratio));
    }
    assignment
}

// ============================================================================
// COLOR SCHEME
// ============================================================================

/// Caller-level choice between discrete and gradient assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorScheme {
    Palette { colors: Vec<Rgb> },
    Gradient { start: Rgb, end: Rgb },
}

impl ColorScheme {
    pub fn assign<S: AsRef<str>>(&self, keys: &[S]) -> ColorAssignment {
        match self {
            ColorScheme::Palette { colors } => assign_discrete(keys, colors),
            ColorScheme::Gradient { start, end } => assign_gradient(keys, *start, *end),
        }
    }
}

impl Default for ColorScheme {
    /// Blue to red
    fn default() -> Self {
        ColorScheme::Gradient {
            start: Rgb::new(0, 0, 180),
            end: Rgb::new(180, 0, 0),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
