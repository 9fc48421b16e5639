// Position eligibility: which starting slots a player may fill.

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// A flex slot label and the natural positions it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlexSlot {
    pub label: String,
    pub accepts: Vec<String>,
}

/// The slot vocabulary a league may use.
///
/// Standard labels are filled only by players holding that exact position.
/// Flex labels accept any player holding at least one of their positions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EligibilityRules {
    pub standard: Vec<String>,
    pub flex: Vec<FlexSlot>,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            standard: strings(&["QB", "RB", "WR", "TE", "K", "DEF"]),
            flex: vec![
                FlexSlot {
                    label: "FLEX".into(),
                    accepts: strings(&["RB", "WR", "TE"]),
                },
                FlexSlot {
                    label: "WRRB_FLEX".into(),
                    accepts: strings(&["RB", "WR"]),
                },
                FlexSlot {
                    label: "REC_FLEX".into(),
                    accepts: strings(&["WR", "TE"]),
                },
            ],
        }
    }
}

impl EligibilityRules {
    /// Whether `label` is part of the standard or flex vocabulary.
    pub fn is_known(&self, label: &str) -> bool {
        self.standard.iter().any(|s| s == label) || self.flex_slot(label).is_some()
    }

    fn flex_slot(&self, label: &str) -> Option<&FlexSlot> {
        self.flex.iter().find(|f| f.label == label)
    }

    /// Fail with `UnsupportedSlot` on the first label outside the vocabulary.
    pub fn check_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<()> {
        match labels.iter().find(|l| !self.is_known(l.as_ref())) {
            Some(label) => Err(CoreError::UnsupportedSlot {
                label: label.as_ref().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Whether a player with `positions` may start in `label`.
    ///
    /// Unknown labels never qualify; callers validate the roster first.
    pub fn qualifies<S: AsRef<str>>(&self, label: &str, positions: &[S]) -> bool {
        if let Some(flex) = self.flex_slot(label) {
            return positions
                .iter()
                .any(|p| flex.accepts.iter().any(|a| a == p.as_ref()));
        }
        self.standard.iter().any(|s| s == label) && positions.iter().any(|p| p.as_ref() == label)
    }

    /// The subset of `roster_labels` a player with `positions` may fill,
    /// in the same relative order as `roster_labels`.
    ///
    /// Errors if any roster label is outside the vocabulary, even one the
    /// player would not qualify for.
    pub fn allowed_slots<S, P>(&self, roster_labels: &[S], positions: &[P]) -> Result<Vec<String>>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        self.check_labels(roster_labels)?;
        Ok(roster_labels
            .iter()
            .map(|l| l.as_ref())
            .filter(|label| self.qualifies(label, positions))
            .map(str::to_string)
            .collect())
    }
}
