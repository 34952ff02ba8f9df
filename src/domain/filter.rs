use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{Ticket, TicketStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Open,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Open, StatusFilter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Open => TicketStatus::Open.as_str(),
            StatusFilter::Completed => TicketStatus::Completed.as_str(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match TicketStatus::parse(label) {
            Some(TicketStatus::Open) => StatusFilter::Open,
            Some(TicketStatus::Completed) => StatusFilter::Completed,
            None => StatusFilter::All,
        }
    }

    fn accepts(self, status: TicketStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => status == TicketStatus::Open,
            StatusFilter::Completed => status == TicketStatus::Completed,
        }
    }
}

/// Sidebar filters. `pendency: None` means "Todos".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketFilter {
    pub status: StatusFilter,
    pub pendency: Option<String>,
    pub search: String,
}

impl TicketFilter {
    pub fn matches(&self, config: &DatasetConfig, ticket: &Ticket) -> bool {
        if !self.status.accepts(ticket.fields.status) {
            return false;
        }
        if let Some(pendency) = &self.pendency {
            if &ticket.fields.pendency != pendency {
                return false;
            }
        }
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        searchable_values(config, ticket)
            .iter()
            .any(|value| value.to_lowercase().contains(&term))
    }

    /// Matching tickets, re-sorted in display order.
    pub fn apply(&self, config: &DatasetConfig, snapshot: &Snapshot) -> Snapshot {
        Snapshot::ordered(
            snapshot
                .iter()
                .filter(|ticket| self.matches(config, ticket))
                .cloned()
                .collect(),
        )
    }
}

fn searchable_values(config: &DatasetConfig, ticket: &Ticket) -> Vec<String> {
    let fields = &ticket.fields;
    // Missing reference numbers read as 0, same as the grid shows them.
    let numeric = fields
        .numeric_ref
        .as_option()
        .copied()
        .unwrap_or(0)
        .to_string();
    let mut values = vec![
        numeric,
        fields.text_ref.to_string(),
        fields.title.clone(),
        fields.owner.clone(),
    ];
    if config.search_notes {
        values.push(fields.notes.to_string());
    }
    values
}
