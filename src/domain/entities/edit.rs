use std::collections::BTreeMap;

use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{Ticket, TicketFields, TicketId, TicketStatus};
use crate::domain::normalize::{DateValue, RefValue};

/// Grid columns a user may edit. Identity is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TicketField {
    NumericRef,
    TextRef,
    Title,
    OpenDate,
    Pendency,
    Owner,
    Status,
    Notes,
}

impl TicketField {
    pub const EDITABLE: [TicketField; 8] = [
        TicketField::NumericRef,
        TicketField::TextRef,
        TicketField::Title,
        TicketField::OpenDate,
        TicketField::Pendency,
        TicketField::Owner,
        TicketField::Status,
        TicketField::Notes,
    ];

    pub fn header(self, config: &DatasetConfig) -> &'static str {
        match self {
            TicketField::NumericRef => config.numeric_ref.label,
            TicketField::TextRef => config.text_ref.label,
            TicketField::Title => "Título",
            TicketField::OpenDate => "Data",
            TicketField::Pendency => "Pendência",
            TicketField::Owner => "Responsável",
            TicketField::Status => "Status",
            TicketField::Notes => "Observação",
        }
    }

    /// Value as the grid's input widget expects it.
    pub fn read(self, fields: &TicketFields) -> String {
        match self {
            TicketField::NumericRef => fields.numeric_ref.to_string(),
            TicketField::TextRef => fields.text_ref.to_string(),
            TicketField::Title => fields.title.clone(),
            TicketField::OpenDate => fields.open_date.to_string(),
            TicketField::Pendency => fields.pendency.clone(),
            TicketField::Owner => fields.owner.clone(),
            TicketField::Status => fields.status.as_str().to_string(),
            TicketField::Notes => fields.notes.to_string(),
        }
    }

    /// Value as the read-only cell shows it.
    pub fn display(self, fields: &TicketFields) -> String {
        match self {
            TicketField::OpenDate => fields.open_date.display_br(),
            _ => self.read(fields),
        }
    }

    /// Writes raw grid input into `fields`, normalizing on the way in.
    /// An unknown status leaves the current one in place.
    pub fn apply(self, fields: &mut TicketFields, raw: &str) {
        match self {
            TicketField::NumericRef => fields.numeric_ref = RefValue::<i64>::parse(raw),
            TicketField::TextRef => fields.text_ref = RefValue::<String>::parse(raw),
            TicketField::Title => fields.title = raw.to_string(),
            TicketField::OpenDate => fields.open_date = DateValue::parse(raw),
            TicketField::Pendency => fields.pendency = raw.to_string(),
            TicketField::Owner => fields.owner = raw.to_string(),
            TicketField::Status => {
                if let Some(status) = TicketStatus::parse(raw) {
                    fields.status = status;
                }
            }
            TicketField::Notes => fields.notes = RefValue::<String>::parse(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub id: TicketId,
    pub field: TicketField,
}

/// Cell values typed into the grid but not saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedEdits {
    pub staged_cells: BTreeMap<CellKey, String>,
}

impl StagedEdits {
    pub fn stage(&mut self, key: CellKey, value: String) {
        self.staged_cells.insert(key, value);
    }

    pub fn unstage(&mut self, key: &CellKey) {
        self.staged_cells.remove(key);
    }

    pub fn value_for(&self, key: &CellKey) -> Option<&str> {
        self.staged_cells.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.staged_cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.staged_cells.len()
    }

    pub fn clear(&mut self) {
        self.staged_cells.clear();
    }

    /// Drops staged cells whose ticket is not in `keep`.
    pub fn retain_tickets(&mut self, keep: &Snapshot) {
        self.staged_cells
            .retain(|key, _| keep.find(key.id).is_some());
    }

    /// Copy of `baseline` with every staged cell written over it. Row order
    /// and identities are untouched.
    pub fn apply_to(&self, baseline: &Snapshot) -> Snapshot {
        let rows = baseline
            .iter()
            .map(|ticket| {
                let mut fields = ticket.fields.clone();
                for field in TicketField::EDITABLE {
                    let key = CellKey {
                        id: ticket.id,
                        field,
                    };
                    if let Some(raw) = self.value_for(&key) {
                        field.apply(&mut fields, raw);
                    }
                }
                Ticket {
                    id: ticket.id,
                    fields,
                }
            })
            .collect();
        Snapshot::new(rows)
    }
}
