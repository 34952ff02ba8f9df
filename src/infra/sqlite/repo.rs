use std::path::PathBuf;

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{TicketFields, TicketId};
use crate::infra::sqlite::queries::{
    find_user_by_email, insert_ticket, insert_user, load_tickets, update_ticket,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, StoredUser, TicketRepository, UserRepository};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl TicketRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(RepoError::from)
    }

    fn load_snapshot(&self, dataset: DatasetKind) -> Result<Snapshot, RepoError> {
        let tickets = load_tickets(&self.db_path, dataset.config())?;
        Ok(Snapshot::ordered(tickets))
    }

    fn insert_ticket(
        &self,
        dataset: DatasetKind,
        fields: &TicketFields,
    ) -> Result<TicketId, RepoError> {
        let id = insert_ticket(&self.db_path, dataset.config(), fields)?;
        Ok(TicketId(id))
    }

    fn update_ticket(
        &self,
        dataset: DatasetKind,
        id: TicketId,
        fields: &TicketFields,
    ) -> Result<(), RepoError> {
        match update_ticket(&self.db_path, dataset.config(), id.0, fields)? {
            0 => Err(RepoError::NotFound(id)),
            _ => Ok(()),
        }
    }
}

impl UserRepository for SqliteRepo {
    fn find_user(&self, email: &str) -> Result<Option<StoredUser>, RepoError> {
        find_user_by_email(&self.db_path, email).map_err(RepoError::from)
    }

    fn create_user(&self, email: &str, password_hash: &str) -> Result<i64, RepoError> {
        insert_user(&self.db_path, email, password_hash)?
            .ok_or_else(|| RepoError::DuplicateUser(email.to_string()))
    }
}
