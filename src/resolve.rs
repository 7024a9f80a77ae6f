//! Task-to-branch resolution
//!
//! Pure computation: callers fetch the remote branch list and one snapshot
//! of merged branches, and [`resolve`] never touches git itself. Identical
//! inputs always give identical results.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{BranchName, TaskId};

/// Task id → branches that still need merging, in task input order.
///
/// Every input task has an entry; an empty list means "nothing to merge",
/// which callers can tell apart from a task that was never asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskBranchMap {
    entries: Vec<(TaskId, Vec<BranchName>)>,
}

impl TaskBranchMap {
    pub fn get(&self, task: &TaskId) -> Option<&[BranchName]> {
        self.entries
            .iter()
            .find(|(id, _)| id == task)
            .map(|(_, branches)| branches.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &[BranchName])> {
        self.entries
            .iter()
            .map(|(id, branches)| (id, branches.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tasks no unmerged branch mentions
    pub fn unmatched(&self) -> impl Iterator<Item = &TaskId> {
        self.entries
            .iter()
            .filter(|(_, branches)| branches.is_empty())
            .map(|(id, _)| id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Unique branches to merge, sorted for stable persistence
    pub required: BTreeSet<BranchName>,
    pub task_map: TaskBranchMap,
}

/// Map task ids to the remote branches that mention them.
///
/// `remote_branches` are remote-tracking names (`origin/feat-P3-100`); a
/// branch matches a task when the id occurs anywhere in its name after the
/// remote prefix (case-sensitive). Matches already in `merged_branches` are left out of
/// both the required set and the map.
pub fn resolve(
    task_ids: &[TaskId],
    remote_branches: &[String],
    merged_branches: &BTreeSet<BranchName>,
    remote: &str,
) -> Resolution {
    let mut resolution = Resolution::default();

    for task in task_ids {
        let mut matches = Vec::new();
        for raw in remote_branches {
            let Some(branch) = BranchName::normalize(raw, remote) else {
                continue;
            };
            // Only the branch name counts, never the `<remote>/` prefix
            if !branch.as_str().contains(task.as_str()) {
                continue;
            }
            if merged_branches.contains(&branch) {
                continue;
            }
            resolution.required.insert(branch.clone());
            matches.push(branch);
        }
        resolution.task_map.entries.push((task.clone(), matches));
    }

    resolution
}
