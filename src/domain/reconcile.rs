//! Change detection between a loaded snapshot and the user's edited copy.
//!
//! Rows are matched by ticket identity rather than by position, so a grid
//! that reorders rows still produces the right change set. Every changed row
//! is emitted whole: the store replaces all columns of that row.
//!
//! Text comparison is exact. Trailing or inner whitespace added to a title or
//! a note counts as an edit.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::domain::entities::change::{ChangeEntry, ChangeSet};
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::TicketId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSide {
    Baseline,
    Edited,
}

impl fmt::Display for SnapshotSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSide::Baseline => f.write_str("baseline"),
            SnapshotSide::Edited => f.write_str("edited"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("snapshot length mismatch: baseline has {baseline} rows, edited has {edited}")]
    LengthMismatch { baseline: usize, edited: usize },
    #[error("ticket {id} appears more than once in the {side} snapshot")]
    DuplicateIdentity { id: TicketId, side: SnapshotSide },
    #[error("edited ticket {0} has no row in the baseline snapshot")]
    UnknownIdentity(TicketId),
}

pub fn compute_changes(baseline: &Snapshot, edited: &Snapshot) -> Result<ChangeSet, ReconcileError> {
    if baseline.len() != edited.len() {
        return Err(ReconcileError::LengthMismatch {
            baseline: baseline.len(),
            edited: edited.len(),
        });
    }

    let mut by_id = HashMap::with_capacity(baseline.len());
    for ticket in baseline {
        if by_id.insert(ticket.id, &ticket.fields).is_some() {
            return Err(ReconcileError::DuplicateIdentity {
                id: ticket.id,
                side: SnapshotSide::Baseline,
            });
        }
    }

    let mut seen = HashSet::with_capacity(edited.len());
    let mut changes = ChangeSet::default();
    for ticket in edited {
        if !seen.insert(ticket.id) {
            return Err(ReconcileError::DuplicateIdentity {
                id: ticket.id,
                side: SnapshotSide::Edited,
            });
        }
        let original = by_id
            .get(&ticket.id)
            .ok_or(ReconcileError::UnknownIdentity(ticket.id))?;

        let before = (*original).clone().normalized();
        let after = ticket.fields.clone().normalized();
        if before != after {
            changes.push(ChangeEntry {
                id: ticket.id,
                fields: after,
            });
        }
    }

    Ok(changes)
}
