use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{NewTicketDraft, TicketId, ValidationError};
use crate::domain::reconcile::{compute_changes, ReconcileError};
use crate::usecase::ports::repo::{RepoError, TicketRepository};
use crate::usecase::services::query_service::QueryService;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateTicketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Erro ao cadastrar: {0}")]
    Repo(#[from] RepoError),
}

/// Outcome of persisting one change set. Rows are written one by one with no
/// surrounding transaction, so a failure never undoes rows already saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveReport {
    pub attempted: usize,
    pub saved: Vec<TicketId>,
    pub failed: Vec<(TicketId, String)>,
}

impl SaveReport {
    pub fn is_noop(&self) -> bool {
        self.attempted == 0
    }

    pub fn message(&self) -> String {
        if self.is_noop() {
            return "Nenhuma alteração detectada para salvar.".to_string();
        }
        if self.failed.is_empty() {
            return format!("{} alteração(ões) salva(s) com sucesso!", self.saved.len());
        }
        let failed_ids = self
            .failed
            .iter()
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} de {} alteração(ões) salva(s); falharam os chamados: {failed_ids}",
            self.saved.len(),
            self.attempted
        )
    }
}

pub struct EditService {
    repo: Arc<dyn TicketRepository>,
    query: Arc<QueryService>,
}

impl EditService {
    pub fn new(repo: Arc<dyn TicketRepository>, query: Arc<QueryService>) -> Self {
        Self { repo, query }
    }

    /// Diffs `edited` against `baseline` and writes every changed row.
    pub fn save_changes(
        &self,
        dataset: DatasetKind,
        baseline: &Snapshot,
        edited: &Snapshot,
    ) -> Result<SaveReport, ReconcileError> {
        let changes = compute_changes(baseline, edited)?;
        let mut report = SaveReport {
            attempted: changes.len(),
            ..SaveReport::default()
        };
        if changes.is_empty() {
            tracing::info!(?dataset, "no changes detected");
            return Ok(report);
        }

        for entry in changes {
            if let Err(err) = entry.fields.check_required() {
                tracing::warn!(?dataset, id = entry.id.0, error = %err, "ticket update rejected");
                report.failed.push((entry.id, err.to_string()));
                continue;
            }
            match self.repo.update_ticket(dataset, entry.id, &entry.fields) {
                Ok(()) => report.saved.push(entry.id),
                Err(err) => {
                    tracing::warn!(?dataset, id = entry.id.0, error = %err, "ticket update failed");
                    report.failed.push((entry.id, err.to_string()));
                }
            }
        }

        if !report.saved.is_empty() {
            self.query.invalidate(dataset);
        }
        tracing::info!(
            ?dataset,
            attempted = report.attempted,
            saved = report.saved.len(),
            failed = report.failed.len(),
            "change set persisted"
        );
        Ok(report)
    }

    pub fn create_ticket(
        &self,
        dataset: DatasetKind,
        draft: &NewTicketDraft,
    ) -> Result<TicketId, CreateTicketError> {
        let fields = draft.validate(dataset.config())?;
        let id = self.repo.insert_ticket(dataset, &fields)?;
        self.query.invalidate(dataset);
        tracing::info!(?dataset, id = id.0, "ticket created");
        Ok(id)
    }
}
