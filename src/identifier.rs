// 🔢 Identifier Allocation - collision-free identifiers against a taken set
//
// Fallback ladder, first success wins:
// 1. candidate itself (empty candidate becomes "1")
// 2. increment the last run of digits, keeping its zero-padded width
// 3. candidate + 'A'..'Z'
// 4. candidate + "-" + random token (non-deterministic, last resort)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

// ============================================================================
// KEY EXTRACTION
// ============================================================================

/// A candidate identifier split around its last run of decimal digits
///
/// `prefix + numeric_span + suffix` always reproduces the original string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCandidate {
    pub prefix: String,
    pub numeric_span: String,
    pub suffix: String,
}

impl IdentifierCandidate {
    /// Split `candidate` around its last maximal run of ASCII digits
    ///
    /// With no digits at all the whole string is the prefix.
    pub fn split(candidate: &str) -> Self {
        let bytes = candidate.as_bytes();

        let end = match bytes.iter().rposition(|b| b.is_ascii_digit()) {
            Some(end) => end,
            None => {
                return IdentifierCandidate {
                    prefix: candidate.to_string(),
                    numeric_span: String::new(),
                    suffix: String::new(),
                }
            }
        };

        let start = bytes[..end]
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map_or(0, |i| i + 1);

        // Digits are single-byte, so both cut points are char boundaries
        IdentifierCandidate {
            prefix: candidate[..start].to_string(),
            numeric_span: candidate[start..=end].to_string(),
            suffix: candidate[end + 1..].to_string(),
        }
    }

    pub fn has_numeric_span(&self) -> bool {
        !self.numeric_span.is_empty()
    }

    /// Integer value of the numeric span, `None` when absent or too large
    pub fn numeric_value(&self) -> Option<u64> {
        if self.numeric_span.is_empty() {
            return None;
        }
        self.numeric_span.parse::<u64>().ok()
    }

    /// Rebuild the identifier with `n` in place of the numeric span,
    /// zero-padded to the span's original width
    pub fn with_number(&self, n: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            n,
            self.suffix,
            width = self.numeric_span.len()
        )
    }
}

impl fmt::Display for IdentifierCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.numeric_span, self.suffix)
    }
}

// ============================================================================
// TAKEN SET
// ============================================================================

/// Identifiers currently in use, compared case-insensitively
///
/// Owned and threaded by the caller; the allocator only reads it.
#[derive(Debug, Clone, Default)]
pub struct TakenSet {
    /// folded form -> identifier as first inserted
    entries: IndexMap<String, String>,
}

impl TakenSet {
    pub fn new() -> Self {
        TakenSet {
            entries: IndexMap::new(),
        }
    }

    /// Per-char simple upper-casing; chars whose upper case is several
    /// chars ("ß" -> "SS") are kept as they are
    fn fold(identifier: &str) -> String {
        identifier
            .chars()
            .map(|c| {
                let mut upper = c.to_uppercase();
                match (upper.next(), upper.next()) {
                    (Some(u), None) => u,
                    _ => c,
                }
            })
            .collect()
    }

    /// Insert an identifier; `false` if an equal one (ignoring case) was present
    pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
        let identifier = identifier.into();
        let key = Self::fold(&identifier);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, identifier);
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(&Self::fold(identifier))
    }

    pub fn remove(&mut self, identifier: &str) -> bool {
        self.entries.shift_remove(&Self::fold(identifier)).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in insertion order, original casing
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Largest member that parses as a non-negative integer
    pub fn max_numeric(&self) -> Option<u64> {
        self.entries
            .values()
            .filter_map(|id| id.trim().parse::<u64>().ok())
            .max()
    }
}

impl<S: Into<String>> FromIterator<S> for TakenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TakenSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for TakenSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for identifier in iter {
            self.insert(identifier);
        }
    }
}

// ============================================================================
// ALLOCATION POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Numeric increments tried before falling back to letters
    pub max_numeric_probes: u64,

    /// Length of the random token used by the last-resort fallback
    pub random_token_len: usize,

    /// Substituted for an empty candidate
    pub empty_substitute: String,

    /// Probes tried by `next_available` above the largest numeric member
    pub next_available_window: u64,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        AllocationPolicy {
            max_numeric_probes: 1000,
            random_token_len: 4,
            empty_substitute: "1".to_string(),
            next_available_window: 10_000,
        }
    }
}

// ============================================================================
// ALLOCATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct IdentifierAllocator {
    policy: AllocationPolicy,
}

impl IdentifierAllocator {
    /// Create allocator with default policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AllocationPolicy) -> Self {
        IdentifierAllocator { policy }
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Return an identifier not present in `taken`
    ///
    /// Deterministic unless every numeric and letter probe is taken, in
    /// which case a random token is appended. Never fails.
    pub fn allocate(&self, candidate: &str, taken: &TakenSet) -> String {
        let base = if candidate.is_empty() {
            self.policy.empty_substitute.clone()
        } else {
            candidate.to_string()
        };

        if !taken.contains(&base) {
            return base;
        }

        let split = IdentifierCandidate::split(&base);
        if let Some(n) = split.numeric_value() {
            for i in 1..=self.policy.max_numeric_probes {
                let Some(next) = n.checked_add(i) else { break };
                let probe = split.with_number(next);
                if !taken.contains(&probe) {
                    debug!(candidate = %base, allocated = %probe, step = i, "numeric increment");
                    return probe;
                }
            }
            debug!(candidate = %base, "numeric probes exhausted");
        }

        for letter in 'A'..='Z' {
            let probe = format!("{base}{letter}");
            if !taken.contains(&probe) {
                debug!(candidate = %base, allocated = %probe, "letter suffix");
                return probe;
            }
        }

        let probe = format!("{base}-{}", random_token(self.policy.random_token_len));
        warn!(candidate = %base, allocated = %probe, "deterministic probes exhausted, using random suffix");
        probe
    }

    /// Allocate and record the result in `taken`
    pub fn allocate_and_claim(&self, candidate: &str, taken: &mut TakenSet) -> String {
        let identifier = self.allocate(candidate, taken);
        taken.insert(identifier.clone());
        identifier
    }

    /// Next integer identifier above the largest numeric member of `taken`
    pub fn next_available(&self, taken: &TakenSet) -> String {
        let max = taken.max_numeric().unwrap_or(0);

        for offset in 1..self.policy.next_available_window {
            let Some(next) = max.checked_add(offset) else { break };
            let probe = next.to_string();
            if !taken.contains(&probe) {
                return probe;
            }
        }

        self.allocate(&max.to_string(), taken)
    }
}

/// Allocate with the default policy
pub fn allocate(candidate: &str, taken: &TakenSet) -> String {
    IdentifierAllocator::new().allocate(candidate, taken)
}

/// `next_available` with the default policy
pub fn next_available(taken: &TakenSet) -> String {
    IdentifierAllocator::new().next_available(taken)
}

fn random_token(len: usize) -> String {
    let mut token = String::with_capacity(len);
    while token.len() < len {
        token.push_str(&uuid::Uuid::new_v4().simple().to_string());
    }
    token.truncate(len);
    token
}

// ============================================================================
// TESTS
// ============================================================================
