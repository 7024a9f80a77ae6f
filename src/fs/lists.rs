//! Line-delimited task and branch lists

use std::path::Path;

use super::{locked_read, locked_write, StoreError};
use crate::models::{BranchName, TaskId};

/// Read the extracted task ids (one per line, blank lines ignored).
pub fn read_task_ids(path: &Path) -> Result<Vec<TaskId>, StoreError> {
    Ok(TaskId::parse_list(&locked_read(path)?))
}

/// Read the required-branch list in file order.
///
/// The file may have been edited by hand, so entries are trimmed and
/// duplicates keep their first position. A missing file reads as empty.
pub fn read_required_branches(path: &Path) -> Result<Vec<BranchName>, StoreError> {
    let content = match locked_read(path) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut branches: Vec<BranchName> = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let branch = BranchName::new(line);
        if !branches.contains(&branch) {
            branches.push(branch);
        }
    }
    Ok(branches)
}

pub fn write_branch_list<'a>(
    path: &Path,
    branches: impl IntoIterator<Item = &'a BranchName>,
) -> Result<(), StoreError> {
    let content: String = branches
        .into_iter()
        .map(|b| format!("{b}\n"))
        .collect();
    locked_write(path, &content)
}
