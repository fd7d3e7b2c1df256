use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A queued remediation. The registry never runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAction {
    pub label: String,
    pub command: String,
    pub index: usize,
}

/// Which queued actions an operator picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Indices(BTreeSet<usize>),
    Skip,
}

impl Selection {
    /// Parses operator input.
    ///
    /// `all`/`a` selects everything; empty input, `skip` or `none` selects
    /// nothing; anything else is read as comma or space separated indices,
    /// dropping tokens that are not numbers.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" | "a" => Self::All,
            "" | "skip" | "none" | "n" => Self::Skip,
            _ => Self::Indices(
                trimmed
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter_map(|tok| tok.parse::<usize>().ok())
                    .collect(),
            ),
        }
    }
}

/// Ordered, append-only list of fix actions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRegistry {
    actions: Vec<FixAction>,
}

impl FixRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Appends an action and returns its index.
    pub fn enqueue(&mut self, label: impl Into<String>, command: impl Into<String>) -> usize {
        let index = self.actions.len();
        self.actions.push(FixAction {
            label: label.into(),
            command: command.into(),
            index,
        });
        index
    }

    #[must_use]
    pub fn list(&self) -> &[FixAction] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Returns the selected actions in enqueue order. Unknown indices are ignored.
    #[must_use]
    pub fn resolve(&self, selection: &Selection) -> Vec<&FixAction> {
        match selection {
            Selection::All => self.actions.iter().collect(),
            Selection::Skip => Vec::new(),
            Selection::Indices(indices) => indices
                .iter()
                .filter_map(|&i| self.actions.get(i))
                .collect(),
        }
    }
}
