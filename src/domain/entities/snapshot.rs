use std::cmp::Ordering;

use crate::domain::entities::ticket::{Ticket, TicketId};
use crate::domain::normalize::DateValue;

/// Point-in-time list of tickets in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    rows: Vec<Ticket>,
}

impl Snapshot {
    /// Keeps the rows exactly as given.
    pub fn new(rows: Vec<Ticket>) -> Self {
        Self { rows }
    }

    /// Sorts by open date then identity; undated tickets go last.
    pub fn ordered(mut rows: Vec<Ticket>) -> Self {
        rows.sort_by(display_order);
        Self { rows }
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Ticket] {
        &self.rows
    }

    #[cfg(test)]
    pub fn into_rows(self) -> Vec<Ticket> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticket> {
        self.rows.iter()
    }

    pub fn find(&self, id: TicketId) -> Option<&Ticket> {
        self.rows.iter().find(|ticket| ticket.id == id)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Ticket;
    type IntoIter = std::slice::Iter<'a, Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

pub fn display_order(a: &Ticket, b: &Ticket) -> Ordering {
    date_order(&a.fields.open_date, &b.fields.open_date).then(a.id.cmp(&b.id))
}

fn date_order(a: &DateValue, b: &DateValue) -> Ordering {
    match (a.as_date(), b.as_date()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
