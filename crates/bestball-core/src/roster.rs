// Starting-slot layout of a league.

use serde::{Deserialize, Serialize};

use crate::eligibility::EligibilityRules;
use crate::error::Result;

/// Label used for bench slots in a league's position list.
pub const BENCH: &str = "BN";

/// A starting slot label and how many of it the roster has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCount {
    pub label: String,
    pub count: usize,
}

/// The multiset of starting slots, plus the bench size.
///
/// Labels are kept in order of first appearance in the league's position
/// list so anything derived from them is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlotSpec {
    slots: Vec<SlotCount>,
    bench: usize,
}

impl RosterSlotSpec {
    /// Build from a league's ordered roster positions, e.g.
    /// `["QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "K", "DEF", "BN", "BN"]`.
    ///
    /// Fails if any non-bench label is outside `rules`' vocabulary.
    pub fn from_positions<S: AsRef<str>>(positions: &[S], rules: &EligibilityRules) -> Result<Self> {
        let mut slots: Vec<SlotCount> = Vec::new();
        let mut bench = 0;

        for label in positions.iter().map(|p| p.as_ref()) {
            if label == BENCH {
                bench += 1;
                continue;
            }
            match slots.iter_mut().find(|s| s.label == label) {
                Some(slot) => slot.count += 1,
                None => slots.push(SlotCount {
                    label: label.to_string(),
                    count: 1,
                }),
            }
        }

        let spec = Self { slots, bench };
        rules.check_labels(&spec.labels())?;
        Ok(spec)
    }

    /// Distinct starting labels in first-appearance order.
    pub fn labels(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn slots(&self) -> &[SlotCount] {
        &self.slots
    }

    /// Capacity of `label`, zero if the roster has none.
    #[cfg(test)]
    pub(crate) fn capacity(&self, label: &str) -> usize {
        self.slots
            .iter()
            .find(|s| s.label == label)
            .map_or(0, |s| s.count)
    }

    pub fn bench(&self) -> usize {
        self.bench
    }

    /// Total number of starting slots (bench excluded).
    pub fn starters(&self) -> usize {
        self.slots.iter().map(|s| s.count).sum()
    }

    /// Copy of this spec with one more slot of `label`.
    #[cfg(test)]
    pub(crate) fn with_extra_slot(&self, label: &str) -> Self {
        let mut spec = self.clone();
        match spec.slots.iter_mut().find(|s| s.label == label) {
            Some(slot) => slot.count += 1,
            None => spec.slots.push(SlotCount {
                label: label.to_string(),
                count: 1,
            }),
        }
        spec
    }
}
