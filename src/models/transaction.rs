use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Whether money came in or went out. Amounts are stored unsigned and the
/// direction lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [TxnKind] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category_id: Option<i64>,
    pub payment_method: String,
    pub tags: String,
    pub note: String,
    /// Rule that generated this transaction, if any.
    pub recurring_id: Option<i64>,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Decimal, kind: TxnKind) -> Self {
        Self {
            id: None,
            date,
            amount,
            kind,
            category_id: None,
            payment_method: String::new(),
            tags: String::new(),
            note: String::new(),
            recurring_id: None,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TxnKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxnKind::Expense
    }

    /// Amount with the direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxnKind::Income => self.amount,
            TxnKind::Expense => -self.amount,
        }
    }
}
