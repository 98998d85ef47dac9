use crate::parse::DateFormat;

/// One-off transaction (variable expense or income). Amounts are stored as
/// absolute values; the sign lives in `txn_type`.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub txn_type: String,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Recurring monthly income.
#[derive(Debug, Clone)]
pub struct Income {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub notes: Option<String>,
    pub is_active: bool,
}

/// Recurring fixed expense with a budgeted amount alongside the actual one.
#[derive(Debug, Clone)]
pub struct FixedExpense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub budget: f64,
    pub due_day: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

/// Recurring saving. `saving_type` is 'short', 'long' or 'risk'.
#[derive(Debug, Clone)]
pub struct Saving {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub saving_type: String,
    pub notes: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Bank,
    CreditCard,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::CreditCard => "creditcard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bank" => Some(Self::Bank),
            "creditcard" => Some(Self::CreditCard),
            _ => None,
        }
    }
}

/// Persisted column-mapping profile. `header_row` lives in the `skip_rows`
/// column for compatibility with earlier exports of the same schema.
#[derive(Debug, Clone)]
pub struct ImportProfile {
    pub id: i64,
    pub name: String,
    pub source_type: SourceType,
    pub date_column: String,
    pub description_column: String,
    pub amount_column: String,
    pub date_format: DateFormat,
    pub invert_amount: bool,
    pub header_row: usize,
}

/// Working column mapping for one import run. May come from a saved profile
/// or be assembled ad hoc from CLI flags.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub name: String,
    pub source_type: SourceType,
    pub date_column: String,
    pub description_column: String,
    pub amount_column: String,
    pub date_format: DateFormat,
    pub invert_amount: bool,
    pub header_row: usize,
}

impl ColumnMapping {
    pub fn from_profile(p: &ImportProfile) -> Self {
        Self {
            name: p.name.clone(),
            source_type: p.source_type,
            date_column: p.date_column.clone(),
            description_column: p.description_column.clone(),
            amount_column: p.amount_column.clone(),
            date_format: p.date_format,
            invert_amount: p.invert_amount,
            header_row: p.header_row,
        }
    }

    /// Whether amounts from this source should be sign-flipped. Credit card
    /// exports list charges as positive numbers.
    pub fn should_invert(&self) -> bool {
        self.source_type == SourceType::CreditCard || self.invert_amount
    }
}
