use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::edit::{CellKey, StagedEdits};
use crate::domain::entities::session::Session;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::NewTicketDraft;
use crate::domain::filter::StatusFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Tickets(DatasetKind),
    Dashboard(DatasetKind),
}

impl Page {
    pub fn dataset(self) -> DatasetKind {
        match self {
            Page::Tickets(dataset) | Page::Dashboard(dataset) => dataset,
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub session: Signal<Session>,
    pub login_email: Signal<String>,
    pub login_password: Signal<String>,
    pub page: Signal<Page>,
    pub snapshot: Signal<Snapshot>,
    pub status_filter: Signal<StatusFilter>,
    pub pendency_filter: Signal<Option<String>>,
    pub search: Signal<String>,
    pub staged: Signal<StagedEdits>,
    pub editing_cell: Signal<Option<CellKey>>,
    pub editing_value: Signal<String>,
    pub show_add_form: Signal<bool>,
    pub new_ticket: Signal<NewTicketDraft>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new(default_dataset: DatasetKind) -> Self {
        Self {
            session: use_signal(Session::default),
            login_email: use_signal(String::new),
            login_password: use_signal(String::new),
            page: use_signal(|| Page::Tickets(default_dataset)),
            snapshot: use_signal(Snapshot::default),
            status_filter: use_signal(StatusFilter::default),
            pendency_filter: use_signal(|| None::<String>),
            search: use_signal(String::new),
            staged: use_signal(StagedEdits::default),
            editing_cell: use_signal(|| None::<CellKey>),
            editing_value: use_signal(String::new),
            show_add_form: use_signal(|| false),
            new_ticket: use_signal(|| NewTicketDraft::for_dataset(default_dataset.config())),
            busy: use_signal(|| false),
            status: use_signal(|| "Pronto".to_string()),
        }
    }
}
