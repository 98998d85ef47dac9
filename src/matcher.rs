use chrono::NaiveDate;

use crate::models::{FixedExpense, Income, Saving, Transaction};

// User-visible heuristics. Kept as named constants so threshold changes are
// deliberate and testable.
pub const AMOUNT_TOLERANCE: f64 = 0.01;
pub const SUBSTRING_RATIO: f64 = 0.8;
pub const AMOUNT_PROXIMITY: f64 = 0.2;
pub const MIN_TOKEN_RECURRING: usize = 3;
pub const MIN_TOKEN_FIXED: usize = 4;

/// Read-only snapshot of the user's existing records, the comparison data
/// for duplicate detection and fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub transactions: Vec<Transaction>,
    pub incomes: Vec<Income>,
    pub fixed_expenses: Vec<FixedExpense>,
    pub savings: Vec<Saving>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Transaction,
    Income,
    Fixed,
    Saving,
}

impl DuplicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Income => "income",
            Self::Fixed => "fixed",
            Self::Saving => "saving",
        }
    }
}

/// A duplicate hit carries the matched recurring record so the classifier
/// can pre-fill the row's match slot.
#[derive(Debug, Clone)]
pub enum DuplicateHit {
    Transaction,
    Income(Income),
    Fixed(FixedExpense),
    Saving(Saving),
}

impl DuplicateHit {
    pub fn kind(&self) -> DuplicateKind {
        match self {
            Self::Transaction => DuplicateKind::Transaction,
            Self::Income(_) => DuplicateKind::Income,
            Self::Fixed(_) => DuplicateKind::Fixed,
            Self::Saving(_) => DuplicateKind::Saving,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// First token of a normalized name. A leading separator yields an empty
/// token, which disables first-token matching for that string.
fn first_token(s: &str) -> &str {
    s.split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '-'))
        .next()
        .unwrap_or("")
}

fn tokens_align(a: &str, b: &str) -> bool {
    a == b || a.starts_with(b) || b.starts_with(a)
}

fn amounts_equalish(a: f64, b: f64) -> bool {
    (a.abs() - b.abs()).abs() <= AMOUNT_TOLERANCE
}

fn amounts_proximate(a: f64, b: f64) -> bool {
    let (a, b) = (a.abs(), b.abs());
    (a - b).abs() / a.max(b) < AMOUNT_PROXIMITY
}

/// Equal, or one contains the other. Inputs must already be normalized.
fn names_overlap(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

/// Exact-duplicate check against one-off transactions: identical date, same
/// absolute amount within tolerance, and a description that matches exactly
/// or by containment with a length ratio strictly above the threshold.
pub fn is_transaction_duplicate(
    date: NaiveDate,
    amount: f64,
    description: &str,
    existing: &[Transaction],
) -> bool {
    let iso = date.format("%Y-%m-%d").to_string();
    let desc = normalize(description);
    existing.iter().any(|t| {
        if t.date != iso || !amounts_equalish(t.amount, amount) {
            return false;
        }
        let theirs = normalize(&t.description);
        if theirs == desc {
            return true;
        }
        if theirs.contains(&desc) || desc.contains(&theirs) {
            let longer = theirs.len().max(desc.len());
            let shorter = theirs.len().min(desc.len());
            return shorter as f64 / longer as f64 > SUBSTRING_RATIO;
        }
        false
    })
}

fn duplicate_recurring<'a, T>(
    records: &'a [T],
    name: impl Fn(&T) -> &str,
    record_amount: impl Fn(&T) -> f64,
    amount: f64,
    desc: &str,
) -> Option<&'a T> {
    records.iter().find(|r| {
        amounts_equalish(record_amount(r), amount) && names_overlap(&normalize(name(r)), desc)
    })
}

/// Whether a parsed row already exists anywhere in the user's data. Checks
/// run in fixed precedence order — transaction, income, fixed expense,
/// saving — and the first hit wins.
pub fn find_duplicate(
    date: NaiveDate,
    amount: f64,
    description: &str,
    corpus: &Corpus,
) -> Option<DuplicateHit> {
    let desc = normalize(description);

    let checks: [&dyn Fn() -> Option<DuplicateHit>; 4] = [
        &|| {
            is_transaction_duplicate(date, amount, description, &corpus.transactions)
                .then_some(DuplicateHit::Transaction)
        },
        &|| {
            duplicate_recurring(&corpus.incomes, |i| &i.name, |i| i.amount, amount, &desc)
                .map(|i| DuplicateHit::Income(i.clone()))
        },
        &|| {
            duplicate_recurring(&corpus.fixed_expenses, |f| &f.name, |f| f.amount, amount, &desc)
                .map(|f| DuplicateHit::Fixed(f.clone()))
        },
        &|| {
            duplicate_recurring(&corpus.savings, |s| &s.name, |s| s.amount, amount, &desc)
                .map(|s| DuplicateHit::Saving(s.clone()))
        },
    ];
    checks.iter().find_map(|check| check())
}

/// Evaluate ordered match tiers against a candidate list; the first tier
/// with a hit decides.
fn first_hit<'a, T>(candidates: &'a [T], tiers: &[&dyn Fn(&T) -> bool]) -> Option<&'a T> {
    tiers
        .iter()
        .find_map(|tier| candidates.iter().find(|c| tier(c)))
}

/// Fuzzy income match: exact name, then containment, then first token with
/// the amount within 20%.
pub fn match_income(description: &str, amount: f64, incomes: &[Income]) -> Option<Income> {
    let desc = normalize(description);
    if desc.is_empty() {
        return None;
    }
    let token = first_token(&desc).to_string();
    let tiers: [&dyn Fn(&Income) -> bool; 3] = [
        &|inc| normalize(&inc.name) == desc,
        &|inc| {
            let name = normalize(&inc.name);
            name.contains(&desc) || desc.contains(&name)
        },
        &|inc| {
            token.chars().count() >= MIN_TOKEN_RECURRING
                && tokens_align(first_token(&normalize(&inc.name)), &token)
                && amounts_proximate(inc.amount, amount)
        },
    ];
    first_hit(incomes, &tiers).cloned()
}

/// Fuzzy fixed-expense match: bills are identified by payee name alone, so
/// the first-token tier has no amount constraint but a longer token minimum.
pub fn match_fixed_expense(description: &str, fixed: &[FixedExpense]) -> Option<FixedExpense> {
    let desc = normalize(description);
    if desc.is_empty() {
        return None;
    }
    let token = first_token(&desc).to_string();
    let tiers: [&dyn Fn(&FixedExpense) -> bool; 3] = [
        &|fe| normalize(&fe.name) == desc,
        &|fe| {
            let name = normalize(&fe.name);
            name.contains(&desc) || desc.contains(&name)
        },
        &|fe| {
            token.chars().count() >= MIN_TOKEN_FIXED
                && tokens_align(first_token(&normalize(&fe.name)), &token)
        },
    ];
    first_hit(fixed, &tiers).cloned()
}

/// Fuzzy saving match; same rules as incomes.
pub fn match_saving(description: &str, amount: f64, savings: &[Saving]) -> Option<Saving> {
    let desc = normalize(description);
    if desc.is_empty() {
        return None;
    }
    let token = first_token(&desc).to_string();
    let tiers: [&dyn Fn(&Saving) -> bool; 3] = [
        &|s| normalize(&s.name) == desc,
        &|s| {
            let name = normalize(&s.name);
            name.contains(&desc) || desc.contains(&name)
        },
        &|s| {
            token.chars().count() >= MIN_TOKEN_RECURRING
                && tokens_align(first_token(&normalize(&s.name)), &token)
                && amounts_proximate(s.amount, amount)
        },
    ];
    first_hit(savings, &tiers).cloned()
}
