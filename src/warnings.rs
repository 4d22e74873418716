//! Ordered collector for non-fatal diagnostics
//!
//! Warnings raised while normalizing, ranking and rating are threaded through
//! the calls as an explicit value so that the caller can display them in a
//! generated report.

use crate::types::CompetitionId;
use serde::{Deserialize, Serialize};

/// Category of a non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    MissingRound,
    MissingScore,
    IgnoredHole,
    SumMismatch,
    InsufficientPropagators,
    DegenerateFit,
    UnexpectedSlope,
    MissingOpenCategory,
    UnrecognizedCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub competition_id: Option<CompetitionId>,
    pub kind: WarningKind,
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.competition_id {
            Some(id) => write!(f, "[{}] {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Warnings {
    entries: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        competition_id: Option<CompetitionId>,
        kind: WarningKind,
        message: impl Into<String>,
    ) {
        self.entries.push(Warning {
            competition_id,
            kind,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Warnings) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formatted messages in the order they were raised
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|w| w.to_string()).collect()
    }

    pub fn of_kind(&self, kind: WarningKind) -> Vec<&Warning> {
        self.entries.iter().filter(|w| w.kind == kind).collect()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_order() {
        let mut warnings = Warnings::new();
        warnings.push(Some(3), WarningKind::MissingScore, "first");
        warnings.push(None, WarningKind::MissingOpenCategory, "second");
        warnings.push(Some(1), WarningKind::MissingScore, "third");

        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings.messages(),
            vec!["[3] first", "second", "[1] third"]
        );
        assert_eq!(warnings.of_kind(WarningKind::MissingScore).len(), 2);
    }

    #[test]
    fn test_extend() {
        let mut a = Warnings::new();
        a.push(None, WarningKind::SumMismatch, "a");
        let mut b = Warnings::new();
        b.push(None, WarningKind::IgnoredHole, "b");
        a.extend(b);
        assert_eq!(a.into_vec().len(), 2);
    }
}
