use std::collections::BTreeMap;

use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::TicketStatus;

/// Figures for the counter boxes above the ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCounters {
    pub open: usize,
    pub completed: usize,
    pub pendency: Vec<(String, usize)>,
}

/// Status totals always cover the whole dataset. Pendency totals follow the
/// active filters only when the dataset asks for it.
pub fn counters(config: &DatasetConfig, complete: &Snapshot, filtered: &Snapshot) -> TicketCounters {
    let pendency_source = if config.pendency_counts_filtered {
        filtered
    } else {
        complete
    };
    let count_status = |status: TicketStatus| {
        complete
            .iter()
            .filter(|ticket| ticket.fields.status == status)
            .count()
    };
    let pendency = config
        .pendency
        .iter()
        .map(|partner| {
            let total = pendency_source
                .iter()
                .filter(|ticket| ticket.fields.pendency == partner.name)
                .count();
            (partner.counter_label.to_string(), total)
        })
        .collect();

    TicketCounters {
        open: count_status(TicketStatus::Open),
        completed: count_status(TicketStatus::Completed),
        pendency,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardData {
    pub by_status: Vec<Distribution>,
    pub by_pendency: Vec<Distribution>,
    pub by_owner: Vec<Distribution>,
}

pub fn dashboard(snapshot: &Snapshot) -> DashboardData {
    let by_status = tally(snapshot.iter().map(|t| t.fields.status.as_str().to_string()));
    let by_pendency = tally(snapshot.iter().map(|t| t.fields.pendency.clone()));
    let mut by_owner = tally(snapshot.iter().map(|t| t.fields.owner.clone()));
    by_owner.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.label.cmp(&b.label)));

    DashboardData {
        by_status,
        by_pendency,
        by_owner,
    }
}

/// Counts per label, largest first, ties by label.
fn tally(labels: impl Iterator<Item = String>) -> Vec<Distribution> {
    let mut counts = BTreeMap::<String, usize>::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut rows: Vec<Distribution> = counts
        .into_iter()
        .map(|(label, count)| Distribution { label, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}
