use crate::domain::entities::ticket::{TicketFields, TicketId};

/// One row to persist: the full edited field set of an existing ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub id: TicketId,
    pub fields: TicketFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<TicketId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeEntry;
    type IntoIter = std::vec::IntoIter<ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
