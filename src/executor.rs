use std::collections::BTreeSet;

use rusqlite::Connection;
use thiserror::Error;

use crate::classifier::{MatchAction, ParsedRow, TargetKind};
use crate::store;

/// Records written per destination during one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub variable: usize,
    pub income: usize,
    pub fixed: usize,
    pub savings: usize,
}

impl ImportCounts {
    pub fn total(&self) -> usize {
        self.variable + self.income + self.fixed + self.savings
    }
}

/// A write failed partway through. Everything before `row` is already
/// committed; `counts` says what landed.
#[derive(Error, Debug)]
#[error("import stopped at row {row}: {source} ({} records were written before the failure)", counts.total())]
pub struct ImportAborted {
    pub row: usize,
    pub counts: ImportCounts,
    #[source]
    pub source: rusqlite::Error,
}

/// Label recorded in notes of imported records. A saved profile name wins,
/// then the working mapping name, then the file stem.
pub fn source_label(profile: Option<&str>, mapping_name: &str, file_name: &str) -> String {
    if let Some(name) = profile {
        if !name.trim().is_empty() {
            return name.trim().to_string();
        }
    }
    if !mapping_name.trim().is_empty() {
        return mapping_name.trim().to_string();
    }
    std::path::Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

fn amount_text(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount:.2}")
    }
}

/// Write every selected, importable row to the database, in sheet order.
/// Writes are sequential; a failure stops the run and reports what was
/// already committed.
pub fn execute_import(
    conn: &Connection,
    rows: &[ParsedRow],
    selection: &BTreeSet<usize>,
    label: &str,
) -> Result<ImportCounts, ImportAborted> {
    let mut counts = ImportCounts::default();

    for (i, row) in rows.iter().enumerate() {
        if !selection.contains(&i) || !row.importable() {
            continue;
        }
        let (Some(date), Some(amount)) = (row.date, row.amount) else {
            continue;
        };
        write_row(conn, row, date, amount, label, &mut counts)
            .map_err(|source| ImportAborted { row: i + 1, counts, source })?;
    }

    Ok(counts)
}

fn write_row(
    conn: &Connection,
    row: &ParsedRow,
    date: chrono::NaiveDate,
    amount: f64,
    label: &str,
    counts: &mut ImportCounts,
) -> rusqlite::Result<()> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let abs = amount.abs();
    let created_note = format!("Imported from {label} ({date_str})");
    let updated_note = format!("Updated {date_str}: {} kr", amount_text(abs));
    let action = row.action().unwrap_or(MatchAction::Create);

    match row.target {
        TargetKind::Variable => {
            let txn_type = if amount < 0.0 { "expense" } else { "income" };
            store::create_transaction(
                conn,
                &date_str,
                &row.description,
                abs,
                txn_type,
                &format!("Imported from {label}"),
            )?;
            counts.variable += 1;
        }
        TargetKind::Income => match (action, &row.income_match) {
            (MatchAction::Skip, _) => {}
            (MatchAction::Update, Some(existing)) => {
                store::update_income_amount(conn, existing.id, abs, &updated_note)?;
                counts.income += 1;
            }
            _ => {
                store::create_income(conn, &row.description, abs, &created_note)?;
                counts.income += 1;
            }
        },
        TargetKind::Fixed => match (action, &row.fixed_match) {
            (MatchAction::Skip, _) => {}
            (MatchAction::Update, Some(existing)) => {
                store::update_fixed_expense_amount(conn, existing.id, abs, &updated_note)?;
                counts.fixed += 1;
            }
            _ => {
                store::create_fixed_expense(conn, &row.description, abs, abs, &created_note)?;
                counts.fixed += 1;
            }
        },
        TargetKind::Saving => match (action, &row.saving_match) {
            (MatchAction::Skip, _) => {}
            (MatchAction::Update, Some(existing)) => {
                store::update_saving_amount(conn, existing.id, abs, &updated_note)?;
                counts.savings += 1;
            }
            _ => {
                // New savings from an import default to the short-term kind.
                store::create_saving(conn, &row.description, abs, "short", &created_note)?;
                counts.savings += 1;
            }
        },
        TargetKind::Skip => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::matcher::Corpus;
    use crate::models::Income;
    use chrono::NaiveDate;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn row(date: &str, description: &str, amount: f64, target: TargetKind) -> ParsedRow {
        ParsedRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            description: description.to_string(),
            amount: Some(amount),
            target,
            ..Default::default()
        }
    }

    fn all(rows: &[ParsedRow]) -> BTreeSet<usize> {
        (0..rows.len()).collect()
    }

    #[test]
    fn test_source_label_priority() {
        assert_eq!(source_label(Some("Nordea"), "Ad hoc", "export.xlsx"), "Nordea");
        assert_eq!(source_label(None, "Ad hoc", "export.xlsx"), "Ad hoc");
        assert_eq!(source_label(None, "  ", "jan-export.xlsx"), "jan-export");
    }

    #[test]
    fn test_execute_writes_each_kind() {
        let (_dir, conn) = test_db();
        let mut fixed = row("2024-01-27", "Hyra", -9500.0, TargetKind::Fixed);
        fixed.fixed_action = Some(MatchAction::Create);
        let mut saving = row("2024-01-25", "Buffert", -1000.0, TargetKind::Saving);
        saving.saving_action = Some(MatchAction::Create);
        let mut income = row("2024-01-25", "Lön", 28000.0, TargetKind::Income);
        income.income_action = Some(MatchAction::Create);
        let rows = vec![
            row("2024-01-05", "ICA", -250.0, TargetKind::Variable),
            income,
            fixed,
            saving,
        ];

        let counts = execute_import(&conn, &rows, &all(&rows), "Testbank").unwrap();
        assert_eq!(counts, ImportCounts { variable: 1, income: 1, fixed: 1, savings: 1 });
        assert_eq!(counts.total(), 4);

        let txns = store::list_transactions(&conn).unwrap();
        assert_eq!(txns[0].amount, 250.0);
        assert_eq!(txns[0].txn_type, "expense");
        assert_eq!(txns[0].notes.as_deref(), Some("Imported from Testbank"));

        let fixed = store::list_fixed_expenses(&conn).unwrap();
        assert_eq!(fixed[0].budget, 9500.0);
        assert_eq!(fixed[0].notes.as_deref(), Some("Imported from Testbank (2024-01-27)"));

        let savings = store::list_savings(&conn).unwrap();
        assert_eq!(savings[0].saving_type, "short");
    }

    #[test]
    fn test_execute_honors_selection_and_skip() {
        let (_dir, conn) = test_db();
        let mut skipped_income = row("2024-01-25", "Lön", 28000.0, TargetKind::Income);
        skipped_income.income_action = Some(MatchAction::Skip);
        let rows = vec![
            row("2024-01-05", "ICA", -250.0, TargetKind::Variable),
            row("2024-01-06", "Coop", -120.0, TargetKind::Variable),
            skipped_income,
            row("2024-01-07", "Swish", -50.0, TargetKind::Skip),
        ];
        let selection: BTreeSet<usize> = [0, 2, 3].into_iter().collect();

        let counts = execute_import(&conn, &rows, &selection, "Testbank").unwrap();
        assert_eq!(counts.total(), 1);
        assert_eq!(store::list_transactions(&conn).unwrap().len(), 1);
        assert!(store::list_incomes(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_execute_update_appends_dated_note() {
        let (_dir, conn) = test_db();
        store::create_income(&conn, "Lön", 28000.0, "").unwrap();
        let id = conn.last_insert_rowid();

        let mut r = row("2024-02-25", "LÖN UTBETALNING", 28500.0, TargetKind::Income);
        r.income_match = Some(Income {
            id,
            name: "Lön".to_string(),
            amount: 28000.0,
            notes: None,
            is_active: true,
        });
        r.income_action = Some(MatchAction::Update);
        let rows = vec![r];

        let counts = execute_import(&conn, &rows, &all(&rows), "Testbank").unwrap();
        assert_eq!(counts.income, 1);
        let incomes = store::list_incomes(&conn).unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].amount, 28500.0);
        assert_eq!(incomes[0].notes.as_deref(), Some("Updated 2024-02-25: 28500 kr"));
    }

    #[test]
    fn test_execute_abort_reports_partial_counts() {
        let (_dir, conn) = test_db();
        let mut saving = row("2024-01-25", "Buffert", -1000.0, TargetKind::Saving);
        saving.saving_action = Some(MatchAction::Create);
        let rows = vec![
            row("2024-01-05", "ICA", -250.0, TargetKind::Variable),
            saving,
        ];
        conn.execute("DROP TABLE savings", []).unwrap();

        let err = execute_import(&conn, &rows, &all(&rows), "Testbank").unwrap_err();
        assert_eq!(err.row, 2);
        assert_eq!(err.counts.variable, 1);
        assert_eq!(err.counts.savings, 0);
        // The transaction before the failure stays committed.
        assert_eq!(store::list_transactions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_second_run_finds_only_duplicates() {
        let (_dir, conn) = test_db();
        let raw = vec![row("2024-01-05", "ICA", -250.0, TargetKind::Variable)];
        execute_import(&conn, &raw, &all(&raw), "Testbank").unwrap();

        let corpus: Corpus = store::load_corpus(&conn).unwrap();
        assert!(crate::matcher::find_duplicate(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            -250.0,
            "ICA",
            &corpus,
        )
        .is_some());
    }
}
