//! Field normalization shared by the grid, the reconciler and the store.
//!
//! Free-form input never fails here: anything that cannot be read as a date
//! or a reference number collapses to the explicit "no value" marker.

use std::fmt;

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateValue {
    #[default]
    NoDate,
    Date(NaiveDate),
}

impl DateValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return DateValue::NoDate;
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return DateValue::Date(date);
            }
        }

        // Timestamps such as "2024-01-05T00:00:00" or "2024-01-05 00:00:00".
        if trimmed.len() > 10 {
            if let Some(prefix) = trimmed.get(..10) {
                if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                    return DateValue::Date(date);
                }
            }
        }

        DateValue::NoDate
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::NoDate => None,
            DateValue::Date(date) => Some(*date),
        }
    }

    /// `YYYY-MM-DD`, or `None` for the no-date marker.
    pub fn canonical(&self) -> Option<String> {
        self.as_date().map(|date| date.format("%Y-%m-%d").to_string())
    }

    pub fn display_br(&self) -> String {
        self.as_date()
            .map(|date| date.format("%d-%m-%Y").to_string())
            .unwrap_or_default()
    }
}

impl From<Option<NaiveDate>> for DateValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(DateValue::Date).unwrap_or(DateValue::NoDate)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::NoDate => Ok(()),
            DateValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Optional partner reference or note. `Unset` is what the store persists as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefValue<T> {
    Unset,
    Value(T),
}

impl<T> Default for RefValue<T> {
    fn default() -> Self {
        RefValue::Unset
    }
}

impl<T> RefValue<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            RefValue::Unset => None,
            RefValue::Value(value) => Some(value),
        }
    }

    #[cfg(test)]
    pub fn is_unset(&self) -> bool {
        matches!(self, RefValue::Unset)
    }
}

impl<T> From<Option<T>> for RefValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map(RefValue::Value).unwrap_or(RefValue::Unset)
    }
}

impl RefValue<i64> {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = trimmed.parse::<i64>().ok().or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| {
                    value.is_finite()
                        && value.fract() == 0.0
                        && *value >= i64::MIN as f64
                        && *value < i64::MAX as f64
                })
                .map(|value| value as i64)
        });
        Self::from(parsed).normalized()
    }

    /// Zero and negative numbers are treated as "no reference".
    pub fn normalized(self) -> Self {
        match self {
            RefValue::Value(value) if value > 0 => RefValue::Value(value),
            _ => RefValue::Unset,
        }
    }
}

impl RefValue<String> {
    pub fn parse(raw: &str) -> Self {
        RefValue::Value(raw.to_string()).normalized()
    }

    pub fn normalized(self) -> Self {
        match self {
            RefValue::Value(value) if !value.is_empty() => RefValue::Value(value),
            _ => RefValue::Unset,
        }
    }
}

impl<T: fmt::Display> fmt::Display for RefValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefValue::Unset => Ok(()),
            RefValue::Value(value) => write!(f, "{value}"),
        }
    }
}
