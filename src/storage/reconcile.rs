//! Reconciliation of a tablespace's datafile set against its declared state.
//!
//! Matching is by path. A matched file can need a resize and an autoextend
//! change independently in the same pass; an unmatched target is an addition
//! and an existing file absent from the target set is a removal. The plan
//! keeps a deterministic order: targets in declaration order (resize before
//! autoextend change), then removals in catalog order.

use serde::Serialize;

use crate::storage::datafile::Datafile;
use crate::storage::tablespace::ContentType;

/// One change to apply to a single datafile.
#[derive(Debug, Clone)]
pub enum DatafileAction {
    Resize(Datafile),
    ChangeAutoextend(Datafile),
    Add(Datafile),
    Remove(Datafile),
}

impl DatafileAction {
    pub fn datafile(&self) -> &Datafile {
        match self {
            DatafileAction::Resize(df)
            | DatafileAction::ChangeAutoextend(df)
            | DatafileAction::Add(df)
            | DatafileAction::Remove(df) => df,
        }
    }

    /// Renders the statement for this action against the owning tablespace.
    pub fn ddl(&self, tablespace: &str, content: ContentType) -> String {
        match self {
            DatafileAction::Resize(df) => {
                format!("alter database datafile '{}' resize {}", df.path(), df.size())
            }
            DatafileAction::ChangeAutoextend(df) => format!(
                "alter database {} '{}' {}",
                content.datafile_keyword(),
                df.path(),
                df.autoextend_clause()
            ),
            DatafileAction::Add(df) => format!(
                "alter tablespace {} add {} {}",
                tablespace,
                content.datafile_keyword(),
                df.data_file_clause()
            ),
            DatafileAction::Remove(df) => format!(
                "alter tablespace {} drop {} '{}'",
                tablespace,
                content.datafile_keyword(),
                df.path()
            ),
        }
    }
}

/// Change counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub resized: usize,
    pub autoextend_changed: usize,
    pub added: usize,
    pub removed: usize,
}

/// Ordered set of datafile changes for one tablespace.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub actions: Vec<DatafileAction>,
}

impl ReconcilePlan {
    /// Compares the catalog state against the declared target set.
    pub fn compute(existing: &[Datafile], target: &[Datafile]) -> ReconcilePlan {
        let mut actions = Vec::new();

        for wanted in target {
            match existing.iter().find(|d| d.path() == wanted.path()) {
                Some(prev) => {
                    if wanted.needs_resize(prev) {
                        actions.push(DatafileAction::Resize(wanted.clone()));
                    }
                    if wanted.needs_autoextend_change(prev) {
                        actions.push(DatafileAction::ChangeAutoextend(wanted.clone()));
                    }
                }
                None => actions.push(DatafileAction::Add(wanted.clone())),
            }
        }

        for current in existing {
            if !target.iter().any(|d| d.path() == current.path()) {
                actions.push(DatafileAction::Remove(current.clone()));
            }
        }

        ReconcilePlan { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Statements in plan order, ready for `Session::execute_ddl`.
    pub fn ddl(&self, tablespace: &str, content: ContentType) -> Vec<String> {
        self.actions
            .iter()
            .map(|action| action.ddl(tablespace, content))
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for action in &self.actions {
            match action {
                DatafileAction::Resize(_) => summary.resized += 1,
                DatafileAction::ChangeAutoextend(_) => summary.autoextend_changed += 1,
                DatafileAction::Add(_) => summary.added += 1,
                DatafileAction::Remove(_) => summary.removed += 1,
            }
        }
        summary
    }
}
