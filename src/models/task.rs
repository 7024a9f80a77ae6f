use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque task identifier, e.g. `P3-12345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a line-delimited task list.
    ///
    /// Surrounding whitespace and blank lines are dropped; a repeated id keeps
    /// its first position only.
    pub fn parse_list(content: &str) -> Vec<TaskId> {
        let mut seen = HashSet::new();
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| seen.insert(*line))
            .map(TaskId::new)
            .collect()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
