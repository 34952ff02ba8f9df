use std::fmt;

use thiserror::Error;

use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::normalize::{DateValue, RefValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub i64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    Completed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 2] = [TicketStatus::Open, TicketStatus::Completed];

    /// Value stored in the `status` column and shown in the grid.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "Aberto",
            TicketStatus::Completed => "Concluído",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Aberto" | "Open" => Some(TicketStatus::Open),
            "Concluído" | "Completed" => Some(TicketStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every editable attribute of a ticket. Identity lives on [`Ticket`] so it
/// can never be touched by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    pub numeric_ref: RefValue<i64>,
    pub text_ref: RefValue<String>,
    pub title: String,
    pub open_date: DateValue,
    pub pendency: String,
    pub owner: String,
    pub status: TicketStatus,
    pub notes: RefValue<String>,
}

impl TicketFields {
    /// Title and owner may never be blank, whichever path wrote them.
    pub fn check_required(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() || self.owner.trim().is_empty() {
            return Err(ValidationError::MissingRequired);
        }
        Ok(())
    }

    pub fn normalized(self) -> Self {
        Self {
            numeric_ref: self.numeric_ref.normalized(),
            text_ref: self.text_ref.normalized(),
            notes: self.notes.normalized(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub fields: TicketFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Preencha os campos obrigatórios (*)")]
    MissingRequired,
    #[error("pendência inválida para este conjunto: {0}")]
    InvalidPendency(String),
    #[error("status inválido: {0}")]
    InvalidStatus(String),
}

/// Raw input of the "new ticket" form, one string per widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTicketDraft {
    pub numeric_ref: String,
    pub text_ref: String,
    pub title: String,
    pub open_date: String,
    pub pendency: String,
    pub owner: String,
    pub status: String,
    pub notes: String,
}

impl NewTicketDraft {
    pub fn for_dataset(config: &DatasetConfig) -> Self {
        Self {
            pendency: config.pendency[0].name.to_string(),
            status: TicketStatus::Open.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self, config: &DatasetConfig) -> Result<TicketFields, ValidationError> {
        let open_date = DateValue::parse(&self.open_date);
        if self.title.trim().is_empty()
            || self.owner.trim().is_empty()
            || open_date == DateValue::NoDate
        {
            return Err(ValidationError::MissingRequired);
        }
        if !config.accepts_pendency(&self.pendency) {
            return Err(ValidationError::InvalidPendency(self.pendency.clone()));
        }
        let status = TicketStatus::parse(&self.status)
            .ok_or_else(|| ValidationError::InvalidStatus(self.status.clone()))?;

        Ok(TicketFields {
            numeric_ref: RefValue::<i64>::parse(&self.numeric_ref),
            text_ref: RefValue::<String>::parse(&self.text_ref),
            title: self.title.clone(),
            open_date,
            pendency: self.pendency.clone(),
            owner: self.owner.clone(),
            status,
            notes: RefValue::<String>::parse(&self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::dataset::DatasetKind;

    fn draft() -> NewTicketDraft {
        NewTicketDraft {
            numeric_ref: "0".to_string(),
            text_ref: String::new(),
            title: "Impressora sem rede".to_string(),
            open_date: "2024-03-02".to_string(),
            pendency: "Pixeon".to_string(),
            owner: "ana".to_string(),
            status: "Aberto".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn validate_maps_empty_optional_inputs_to_unset() {
        let fields = draft()
            .validate(DatasetKind::Pixeon.config())
            .expect("draft should be valid");

        assert_eq!(fields.numeric_ref, RefValue::Unset);
        assert_eq!(fields.text_ref, RefValue::Unset);
        assert_eq!(fields.notes, RefValue::Unset);
        assert_eq!(
            fields.open_date,
            DateValue::Date(NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date"))
        );
        assert_eq!(fields.status, TicketStatus::Open);
    }

    #[test]
    fn validate_requires_title_owner_and_date() {
        let config = DatasetKind::Pixeon.config();
        for broken in [
            NewTicketDraft {
                title: "  ".to_string(),
                ..draft()
            },
            NewTicketDraft {
                owner: String::new(),
                ..draft()
            },
            NewTicketDraft {
                open_date: String::new(),
                ..draft()
            },
        ] {
            assert_eq!(broken.validate(config), Err(ValidationError::MissingRequired));
        }
    }

    #[test]
    fn check_required_allows_cleared_date_but_not_blank_title_or_owner() {
        let fields = draft()
            .validate(DatasetKind::Pixeon.config())
            .expect("draft should be valid");

        let undated = TicketFields {
            open_date: DateValue::NoDate,
            ..fields.clone()
        };
        assert_eq!(undated.check_required(), Ok(()));

        let untitled = TicketFields {
            title: String::new(),
            ..fields.clone()
        };
        assert_eq!(untitled.check_required(), Err(ValidationError::MissingRequired));

        let unowned = TicketFields {
            owner: "   ".to_string(),
            ..fields
        };
        assert_eq!(unowned.check_required(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn validate_rejects_pendency_from_other_dataset() {
        let err = draft()
            .validate(DatasetKind::Facil.config())
            .expect_err("Pixeon is not a Fácil partner");
        assert_eq!(err, ValidationError::InvalidPendency("Pixeon".to_string()));
    }

    #[test]
    fn status_parse_accepts_store_and_english_names() {
        assert_eq!(TicketStatus::parse("Concluído"), Some(TicketStatus::Completed));
        assert_eq!(TicketStatus::parse("Open"), Some(TicketStatus::Open));
        assert_eq!(TicketStatus::parse("fechado"), None);
    }
}
