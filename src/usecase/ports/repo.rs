use thiserror::Error;

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{TicketFields, TicketId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
    #[error("ticket {0} not found")]
    NotFound(TicketId),
    #[error("user already exists: {0}")]
    DuplicateUser(String),
}

impl From<anyhow::Error> for RepoError {
    fn from(err: anyhow::Error) -> Self {
        RepoError::Message(format!("{err:#}"))
    }
}

pub trait TicketRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    /// All tickets of `dataset`, ordered by open date then id.
    fn load_snapshot(&self, dataset: DatasetKind) -> Result<Snapshot, RepoError>;
    fn insert_ticket(
        &self,
        dataset: DatasetKind,
        fields: &TicketFields,
    ) -> Result<TicketId, RepoError>;
    /// Replaces every column of one existing row.
    fn update_ticket(
        &self,
        dataset: DatasetKind,
        id: TicketId,
        fields: &TicketFields,
    ) -> Result<(), RepoError>;
}

pub trait UserRepository: Send + Sync {
    fn find_user(&self, email: &str) -> Result<Option<StoredUser>, RepoError>;
    fn create_user(&self, email: &str, password_hash: &str) -> Result<i64, RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}
