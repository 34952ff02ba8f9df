use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{params, Connection};
use tempfile::TempDir;

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::edit::{CellKey, StagedEdits, TicketField};
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{NewTicketDraft, TicketFields, TicketId, TicketStatus, ValidationError};
use crate::domain::normalize::{DateValue, RefValue};
use crate::infra::export::csv::write_tickets_csv;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, TicketRepository};
use crate::usecase::services::auth_service::{AuthError, AuthService};
use crate::usecase::services::edit_service::{CreateTicketError, EditService, SaveReport};
use crate::usecase::services::query_service::QueryService;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let db_path = dir.path().join("chamados.sqlite");
    init_db(&db_path).expect("init_db should succeed");
    (dir, db_path)
}

fn fields(title: &str, date: &str, status: TicketStatus) -> TicketFields {
    TicketFields {
        numeric_ref: RefValue::Value(100),
        text_ref: RefValue::Unset,
        title: title.to_string(),
        open_date: DateValue::parse(date),
        pendency: "Pixeon".to_string(),
        owner: "ana".to_string(),
        status,
        notes: RefValue::Unset,
    }
}

fn services(db_path: PathBuf) -> (Arc<SqliteRepo>, Arc<QueryService>, EditService) {
    let repo = Arc::new(SqliteRepo { db_path });
    let query = Arc::new(QueryService::new(repo.clone(), Duration::from_secs(300)));
    let edit = EditService::new(repo.clone(), query.clone());
    (repo, query, edit)
}

#[test]
fn init_db_creates_required_tables() {
    let (_dir, db_path) = temp_db();

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('chamados','chamados_fc','app_user')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 3, "required tables should exist");
}

#[test]
fn init_db_is_idempotent() {
    let (_dir, db_path) = temp_db();
    assert!(init_db(&db_path).is_ok());
}

#[test]
fn load_orders_by_date_with_undated_last() {
    let (_dir, db_path) = temp_db();
    let conn = Connection::open(&db_path).expect("should open sqlite db");
    for (title, date) in [
        ("sem data", None),
        ("março", Some("2024-03-01")),
        ("janeiro", Some("2024-01-10")),
    ] {
        conn.execute(
            "INSERT INTO chamados(chamados_sh, titulo, data_abertura, pendencia_retorno, usuario_resp, status)
             VALUES (0, ?1, ?2, 'SH', 'bia', 'Aberto')",
            params![title, date],
        )
        .expect("seed insert should succeed");
    }

    let repo = SqliteRepo { db_path };
    let snapshot = repo
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");

    let titles: Vec<&str> = snapshot.iter().map(|t| t.fields.title.as_str()).collect();
    assert_eq!(titles, vec!["janeiro", "março", "sem data"]);
    assert_eq!(snapshot.rows()[2].fields.open_date, DateValue::NoDate);
    assert!(snapshot.rows()[0].fields.numeric_ref.is_unset(), "zero reads as unset");
}

#[test]
fn insert_then_update_replaces_whole_row() {
    let (_dir, db_path) = temp_db();
    let repo = SqliteRepo { db_path };

    let id = repo
        .insert_ticket(DatasetKind::Facil, &fields("Impressora", "2024-02-02", TicketStatus::Open))
        .expect("insert should succeed");

    let mut changed = fields("Impressora travada", "2024-02-03", TicketStatus::Completed);
    changed.notes = RefValue::Value("trocado toner".to_string());
    repo.update_ticket(DatasetKind::Facil, id, &changed)
        .expect("update should succeed");

    let snapshot = repo
        .load_snapshot(DatasetKind::Facil)
        .expect("snapshot should load");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.rows()[0].id, id);
    assert_eq!(snapshot.rows()[0].fields, changed);

    let other = repo
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    assert!(other.is_empty(), "datasets live in separate tables");
}

#[test]
fn update_of_missing_row_reports_not_found() {
    let (_dir, db_path) = temp_db();
    let repo = SqliteRepo { db_path };

    let result = repo.update_ticket(
        DatasetKind::Pixeon,
        TicketId(42),
        &fields("x", "2024-01-01", TicketStatus::Open),
    );

    assert_eq!(result, Err(RepoError::NotFound(TicketId(42))));
}

#[test]
fn save_changes_persists_only_changed_rows() {
    let (_dir, db_path) = temp_db();
    let (repo, query, edit) = services(db_path);
    let first = repo
        .insert_ticket(DatasetKind::Pixeon, &fields("A", "2024-01-01", TicketStatus::Open))
        .expect("insert should succeed");
    repo.insert_ticket(DatasetKind::Pixeon, &fields("B", "2024-01-02", TicketStatus::Open))
        .expect("insert should succeed");

    let baseline = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    let mut rows = baseline.clone().into_rows();
    rows[0].fields.status = TicketStatus::Completed;
    let edited = Snapshot::new(rows);

    let report = edit
        .save_changes(DatasetKind::Pixeon, &baseline, &edited)
        .expect("reconciliation should succeed");

    assert_eq!(report.attempted, 1);
    assert_eq!(report.saved, vec![first]);
    assert!(report.failed.is_empty());

    let reloaded = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    assert_eq!(
        reloaded.find(first).map(|t| t.fields.status),
        Some(TicketStatus::Completed),
        "cache should be invalidated after a save"
    );
}

#[test]
fn save_changes_without_edits_is_a_noop() {
    let (_dir, db_path) = temp_db();
    let (repo, query, edit) = services(db_path);
    repo.insert_ticket(DatasetKind::Pixeon, &fields("A", "2024-01-01", TicketStatus::Open))
        .expect("insert should succeed");
    let baseline = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");

    let report = edit
        .save_changes(DatasetKind::Pixeon, &baseline, &baseline.clone())
        .expect("reconciliation should succeed");

    assert!(report.is_noop());
    assert_eq!(report.message(), "Nenhuma alteração detectada para salvar.");
}

#[test]
fn save_changes_rejects_blank_title_and_owner_but_saves_the_rest() {
    let (_dir, db_path) = temp_db();
    let (repo, query, edit) = services(db_path);
    let blank_title = repo
        .insert_ticket(DatasetKind::Pixeon, &fields("Original", "2024-01-01", TicketStatus::Open))
        .expect("insert should succeed");
    let blank_owner = repo
        .insert_ticket(DatasetKind::Pixeon, &fields("Outro", "2024-01-02", TicketStatus::Open))
        .expect("insert should succeed");
    let valid = repo
        .insert_ticket(DatasetKind::Pixeon, &fields("Terceiro", "2024-01-03", TicketStatus::Open))
        .expect("insert should succeed");

    let baseline = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    let mut staged = StagedEdits::default();
    staged.stage(
        CellKey {
            id: blank_title,
            field: TicketField::Title,
        },
        String::new(),
    );
    staged.stage(
        CellKey {
            id: blank_owner,
            field: TicketField::Owner,
        },
        "   ".to_string(),
    );
    staged.stage(
        CellKey {
            id: valid,
            field: TicketField::Status,
        },
        "Concluído".to_string(),
    );
    let edited = staged.apply_to(&baseline);

    let report = edit
        .save_changes(DatasetKind::Pixeon, &baseline, &edited)
        .expect("reconciliation should succeed");

    assert_eq!(report.saved, vec![valid]);
    assert_eq!(
        report.failed,
        vec![
            (blank_title, "Preencha os campos obrigatórios (*)".to_string()),
            (blank_owner, "Preencha os campos obrigatórios (*)".to_string()),
        ]
    );

    query.invalidate(DatasetKind::Pixeon);
    let stored = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    assert_eq!(
        stored.find(blank_title).map(|t| t.fields.title.as_str()),
        Some("Original")
    );
    assert_eq!(
        stored.find(blank_owner).map(|t| t.fields.owner.as_str()),
        Some("ana")
    );
    assert_eq!(
        stored.find(valid).map(|t| t.fields.status),
        Some(TicketStatus::Completed)
    );
}

/// Store that refuses updates for one id and records the rest.
struct FlakyRepo {
    fail_id: TicketId,
    updated: Mutex<Vec<TicketId>>,
}

impl TicketRepository for FlakyRepo {
    fn init(&self) -> Result<(), RepoError> {
        Ok(())
    }

    fn load_snapshot(&self, _dataset: DatasetKind) -> Result<Snapshot, RepoError> {
        Ok(Snapshot::default())
    }

    fn insert_ticket(&self, _dataset: DatasetKind, _fields: &TicketFields) -> Result<TicketId, RepoError> {
        Err(RepoError::Message("read-only".to_string()))
    }

    fn update_ticket(
        &self,
        _dataset: DatasetKind,
        id: TicketId,
        _fields: &TicketFields,
    ) -> Result<(), RepoError> {
        if id == self.fail_id {
            return Err(RepoError::Message("database is locked".to_string()));
        }
        self.updated.lock().expect("lock should not be poisoned").push(id);
        Ok(())
    }
}

#[test]
fn save_changes_keeps_going_after_a_failed_row() {
    let repo = Arc::new(FlakyRepo {
        fail_id: TicketId(2),
        updated: Mutex::new(Vec::new()),
    });
    let query = Arc::new(QueryService::new(repo.clone(), Duration::from_secs(300)));
    let edit = EditService::new(repo.clone(), query);

    let baseline = Snapshot::new(
        (1..=3)
            .map(|id| crate::domain::entities::ticket::Ticket {
                id: TicketId(id),
                fields: fields("t", "2024-01-01", TicketStatus::Open),
            })
            .collect(),
    );
    let mut rows = baseline.clone().into_rows();
    for row in &mut rows {
        row.fields.owner = "novo".to_string();
    }
    let edited = Snapshot::new(rows);

    let report = edit
        .save_changes(DatasetKind::Pixeon, &baseline, &edited)
        .expect("reconciliation should succeed");

    assert_eq!(report.attempted, 3);
    assert_eq!(report.saved, vec![TicketId(1), TicketId(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, TicketId(2));
    assert_eq!(
        *repo.updated.lock().expect("lock should not be poisoned"),
        vec![TicketId(1), TicketId(3)]
    );
    assert_eq!(
        report.message(),
        "2 de 3 alteração(ões) salva(s); falharam os chamados: 2"
    );
}

#[test]
fn save_report_message_counts_successes() {
    let report = SaveReport {
        attempted: 2,
        saved: vec![TicketId(4), TicketId(5)],
        failed: Vec::new(),
    };
    assert_eq!(report.message(), "2 alteração(ões) salva(s) com sucesso!");
}

#[test]
fn create_ticket_validates_before_writing() {
    let (_dir, db_path) = temp_db();
    let (_repo, query, edit) = services(db_path);

    let mut draft = NewTicketDraft::for_dataset(DatasetKind::Pixeon.config());
    draft.title = "Sem responsável".to_string();
    draft.open_date = "2024-05-01".to_string();

    assert_eq!(
        edit.create_ticket(DatasetKind::Pixeon, &draft),
        Err(CreateTicketError::Validation(ValidationError::MissingRequired))
    );

    draft.owner = "caio".to_string();
    draft.pendency = "Fácil".to_string();
    assert_eq!(
        edit.create_ticket(DatasetKind::Pixeon, &draft),
        Err(CreateTicketError::Validation(ValidationError::InvalidPendency(
            "Fácil".to_string()
        )))
    );

    draft.pendency = "SH".to_string();
    let id = edit
        .create_ticket(DatasetKind::Pixeon, &draft)
        .expect("valid draft should be stored");

    let snapshot = query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load");
    let stored = snapshot.find(id).expect("new ticket should be listed");
    assert_eq!(stored.fields.owner, "caio");
    assert_eq!(stored.fields.status, TicketStatus::Open);
    assert!(stored.fields.numeric_ref.is_unset());
}

#[test]
fn query_service_serves_cached_snapshot_until_invalidated() {
    let (_dir, db_path) = temp_db();
    let (repo, query, _edit) = services(db_path);

    assert!(query
        .load_snapshot(DatasetKind::Pixeon)
        .expect("snapshot should load")
        .is_empty());

    repo.insert_ticket(DatasetKind::Pixeon, &fields("A", "2024-01-01", TicketStatus::Open))
        .expect("insert should succeed");
    assert!(
        query
            .load_snapshot(DatasetKind::Pixeon)
            .expect("snapshot should load")
            .is_empty(),
        "direct writes are not seen until the cache expires"
    );

    query.invalidate(DatasetKind::Pixeon);
    assert_eq!(
        query
            .load_snapshot(DatasetKind::Pixeon)
            .expect("snapshot should load")
            .len(),
        1
    );
}

#[test]
fn auth_login_accepts_registered_password_only() {
    let (_dir, db_path) = temp_db();
    let auth = AuthService::new(Arc::new(SqliteRepo { db_path }));

    let user = auth
        .register("suporte@hospital.com", "s3nha")
        .expect("register should succeed");

    let signed_in = auth
        .login(" suporte@hospital.com ", "s3nha")
        .expect("login should succeed");
    assert_eq!(signed_in, user);

    assert_eq!(
        auth.login("suporte@hospital.com", "errada"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        auth.login("ninguem@hospital.com", "s3nha"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(auth.login("", ""), Err(AuthError::MissingCredentials));
}

#[test]
fn auth_rejects_duplicate_registration() {
    let (_dir, db_path) = temp_db();
    let auth = AuthService::new(Arc::new(SqliteRepo { db_path }));

    auth.register("ti@hospital.com", "a")
        .expect("first register should succeed");

    assert_eq!(
        auth.register("ti@hospital.com", "b"),
        Err(AuthError::Repo(RepoError::DuplicateUser(
            "ti@hospital.com".to_string()
        )))
    );
}

#[test]
fn ensure_user_creates_account_once() {
    let (_dir, db_path) = temp_db();
    let auth = AuthService::new(Arc::new(SqliteRepo { db_path }));

    assert_eq!(auth.ensure_user("admin@hospital.com", "root"), Ok(true));
    assert_eq!(auth.ensure_user("admin@hospital.com", "outra"), Ok(false));
    assert!(auth.login("admin@hospital.com", "root").is_ok());
}

#[test]
fn csv_export_writes_headers_and_visible_rows() {
    let snapshot = Snapshot::new(vec![crate::domain::entities::ticket::Ticket {
        id: TicketId(9),
        fields: TicketFields {
            numeric_ref: RefValue::Value(321),
            text_ref: RefValue::Value("FC-1".to_string()),
            title: "Sistema lento, urgente".to_string(),
            open_date: DateValue::parse("2024-04-30"),
            pendency: "Nordeste".to_string(),
            owner: "rui".to_string(),
            status: TicketStatus::Completed,
            notes: RefValue::Unset,
        },
    }]);

    let mut buffer = Vec::new();
    let written = write_tickets_csv(&mut buffer, DatasetKind::Facil.config(), &snapshot)
        .expect("csv export should succeed");
    let text = String::from_utf8(buffer).expect("csv should be utf-8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(written, 1);
    assert_eq!(
        lines[0],
        "Nº,Chamado Nordeste,Chamado Fácil,Título,Data,Pendência,Responsável,Status,Observação"
    );
    assert_eq!(
        lines[1],
        "1,321,FC-1,\"Sistema lento, urgente\",2024-04-30,Nordeste,rui,Concluído,"
    );
}
