use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Transaction, TxnKind};
use crate::error::ValidationError;
use crate::schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Lenient parse for stored values: anything unrecognized (including the
    /// reserved `daily` and `custom-days`) schedules monthly.
    pub fn parse(s: &str) -> Self {
        Self::parse_strict(s).unwrap_or(Self::Monthly)
    }

    /// Parse used when a rule is created; rejects values we cannot schedule.
    pub fn parse_strict(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(ValidationError::UnsupportedFrequency(other.to_string())),
        }
    }

    pub fn all() -> &'static [Frequency] {
        &[Self::Weekly, Self::Monthly, Self::Yearly]
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The next due date of a rule as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDate {
    On(NaiveDate),
    /// Stored text that is not an ISO date. Rebased on today at catch-up.
    Unreadable(String),
}

impl DueDate {
    pub fn parse(raw: &str) -> Self {
        match schedule::parse_date(raw) {
            Ok(date) => Self::On(date),
            Err(_) => Self::Unreadable(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::On(date) => Some(*date),
            Self::Unreadable(_) => None,
        }
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On(date) => write!(f, "{}", schedule::format_date(*date)),
            Self::Unreadable(raw) => write!(f, "{raw:?} (unreadable)"),
        }
    }
}

/// Template that spawns a transaction every `interval` periods of `every`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRule {
    pub id: Option<i64>,
    pub kind: TxnKind,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub payment_method: String,
    pub tags: String,
    pub note: String,
    pub every: Frequency,
    pub interval: u32,
    pub next_date: DueDate,
}

impl RecurringRule {
    pub fn new(kind: TxnKind, amount: Decimal, every: Frequency, next_date: NaiveDate) -> Self {
        Self {
            id: None,
            kind,
            amount,
            category_id: None,
            payment_method: String::new(),
            tags: String::new(),
            note: String::new(),
            every,
            interval: 1,
            next_date: DueDate::On(next_date),
        }
    }

    /// The transaction this rule produces for a single due date.
    pub fn occurrence(&self, date: NaiveDate) -> Transaction {
        Transaction {
            id: None,
            date,
            amount: self.amount,
            kind: self.kind,
            category_id: self.category_id,
            payment_method: self.payment_method.clone(),
            tags: self.tags.clone(),
            note: self.note.clone(),
            recurring_id: self.id,
        }
    }
}
