use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::matcher::{self, Corpus, DuplicateHit, DuplicateKind};
use crate::models::{ColumnMapping, FixedExpense, Income, Saving};
use crate::parse;
use crate::sheet::{Cell, RawRow};

/// Destination a row will be written to, or Skip to leave it out entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Variable,
    Income,
    Fixed,
    Saving,
    Skip,
}

impl Default for TargetKind {
    fn default() -> Self {
        Self::Variable
    }
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Income => "income",
            Self::Fixed => "fixed",
            Self::Saving => "saving",
            Self::Skip => "skip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "variable" => Some(Self::Variable),
            "income" => Some(Self::Income),
            "fixed" => Some(Self::Fixed),
            "saving" | "savings" => Some(Self::Saving),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// Disposition against a fuzzy-matched existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Create,
    Update,
    Skip,
}

impl MatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Skip => "skip",
        }
    }
}

/// One spreadsheet row after parsing, validation, duplicate detection and
/// target assignment. Transient — lives only for the preview session.
#[derive(Debug, Clone, Default)]
pub struct ParsedRow {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Option<f64>,
    pub errors: Vec<String>,
    pub duplicate: Option<DuplicateKind>,
    pub target: TargetKind,
    pub income_match: Option<Income>,
    pub income_action: Option<MatchAction>,
    pub fixed_match: Option<FixedExpense>,
    pub fixed_action: Option<MatchAction>,
    pub saving_match: Option<Saving>,
    pub saving_action: Option<MatchAction>,
}

impl ParsedRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate.is_some()
    }

    /// Valid, not a duplicate, and headed somewhere.
    pub fn importable(&self) -> bool {
        self.is_valid() && !self.is_duplicate() && self.target != TargetKind::Skip
    }

    /// The match action slot for the row's current target kind.
    pub fn action(&self) -> Option<MatchAction> {
        match self.target {
            TargetKind::Income => self.income_action,
            TargetKind::Fixed => self.fixed_action,
            TargetKind::Saving => self.saving_action,
            _ => None,
        }
    }

    fn clear_matches(&mut self) {
        self.income_match = None;
        self.income_action = None;
        self.fixed_match = None;
        self.fixed_action = None;
        self.saving_match = None;
        self.saving_action = None;
    }
}

/// Parse, validate and classify every raw row against the existing corpus.
pub fn classify_rows(rows: &[RawRow], mapping: &ColumnMapping, corpus: &Corpus) -> Vec<ParsedRow> {
    rows.iter().map(|raw| classify_row(raw, mapping, corpus)).collect()
}

fn classify_row(raw: &RawRow, mapping: &ColumnMapping, corpus: &Corpus) -> ParsedRow {
    let mut errors = Vec::new();

    let date_raw = cell(raw, &mapping.date_column).to_text();
    let date = parse::parse_date_any(&date_raw, mapping.date_format);
    if date.is_none() {
        errors.push(format!("invalid date: {}", date_raw.trim()));
    }

    let description = cell(raw, &mapping.description_column).to_text().trim().to_string();
    if description.is_empty() {
        errors.push("missing description".to_string());
    }

    let amount_cell = cell(raw, &mapping.amount_column);
    let amount = parse::parse_amount(&amount_cell, mapping.should_invert());
    if amount.is_none() {
        errors.push(format!("invalid amount: {}", amount_cell.to_text().trim()));
    }

    let mut row = ParsedRow {
        date,
        description,
        amount,
        errors,
        ..Default::default()
    };

    // Zero-amount rows never count as duplicates.
    let dup = match (date, amount) {
        (Some(d), Some(a)) if a != 0.0 => matcher::find_duplicate(d, a, &row.description, corpus),
        _ => None,
    };

    match dup {
        Some(DuplicateHit::Transaction) => {
            row.duplicate = Some(DuplicateKind::Transaction);
            row.target = TargetKind::Variable;
        }
        Some(DuplicateHit::Income(inc)) => {
            row.duplicate = Some(DuplicateKind::Income);
            row.target = TargetKind::Income;
            row.income_match = Some(inc);
            row.income_action = Some(MatchAction::Skip);
        }
        Some(DuplicateHit::Fixed(fe)) => {
            row.duplicate = Some(DuplicateKind::Fixed);
            row.target = TargetKind::Fixed;
            row.fixed_match = Some(fe);
            row.fixed_action = Some(MatchAction::Skip);
        }
        Some(DuplicateHit::Saving(s)) => {
            row.duplicate = Some(DuplicateKind::Saving);
            row.target = TargetKind::Saving;
            row.saving_match = Some(s);
            row.saving_action = Some(MatchAction::Skip);
        }
        None => {
            // Positive amounts suggest income, everything else a variable
            // transaction. Fixed and saving are only ever user-assigned.
            if matches!(amount, Some(a) if a > 0.0) {
                row.target = TargetKind::Income;
                row.income_match =
                    matcher::match_income(&row.description, amount.unwrap_or(0.0), &corpus.incomes);
                row.income_action = Some(if row.income_match.is_some() {
                    MatchAction::Skip
                } else {
                    MatchAction::Create
                });
            } else {
                row.target = TargetKind::Variable;
            }
        }
    }

    row
}

fn cell(raw: &RawRow, column: &str) -> Cell {
    raw.get(column).cloned().unwrap_or(Cell::Empty)
}

/// State transition for a user-chosen target kind: all prior match state is
/// cleared before recomputing, so no stale cross-kind match survives.
pub fn reclassify(row: &ParsedRow, target: TargetKind, corpus: &Corpus) -> ParsedRow {
    let mut next = row.clone();
    next.clear_matches();
    next.target = target;
    let amount = row.amount.unwrap_or(0.0);

    match target {
        TargetKind::Fixed => {
            next.fixed_match = matcher::match_fixed_expense(&row.description, &corpus.fixed_expenses);
            // A matched bill usually means the amount changed; default to
            // updating it.
            next.fixed_action = Some(if next.fixed_match.is_some() {
                MatchAction::Update
            } else {
                MatchAction::Create
            });
        }
        TargetKind::Income => {
            next.income_match = matcher::match_income(&row.description, amount, &corpus.incomes);
            // A matched income usually means "already recorded this month".
            next.income_action = Some(if next.income_match.is_some() {
                MatchAction::Skip
            } else {
                MatchAction::Create
            });
        }
        TargetKind::Saving => {
            next.saving_match = matcher::match_saving(&row.description, amount, &corpus.savings);
            next.saving_action = Some(if next.saving_match.is_some() {
                MatchAction::Skip
            } else {
                MatchAction::Create
            });
        }
        TargetKind::Variable | TargetKind::Skip => {}
    }

    next
}

/// User override of the match action for the row's current target kind.
pub fn set_match_action(row: &mut ParsedRow, action: MatchAction) {
    match row.target {
        TargetKind::Income => row.income_action = Some(action),
        TargetKind::Fixed => row.fixed_action = Some(action),
        TargetKind::Saving => row.saving_action = Some(action),
        _ => {}
    }
}

/// Reassign every selected, valid, non-duplicate row. Choosing Skip empties
/// the selection.
pub fn bulk_reclassify(
    rows: &mut [ParsedRow],
    selection: &mut BTreeSet<usize>,
    target: TargetKind,
    corpus: &Corpus,
) {
    let indices: Vec<usize> = selection.iter().copied().collect();
    for i in indices {
        let Some(row) = rows.get(i) else { continue };
        if row.is_valid() && !row.is_duplicate() {
            let next = reclassify(row, target, corpus);
            rows[i] = next;
        }
    }
    if target == TargetKind::Skip {
        selection.clear();
    }
}

/// Default selection: every valid, non-duplicate row headed somewhere.
pub fn default_selection(rows: &[ParsedRow]) -> BTreeSet<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.importable())
        .map(|(i, _)| i)
        .collect()
}
