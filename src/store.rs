use rusqlite::Connection;

use crate::matcher::Corpus;
use crate::models::{FixedExpense, Income, Saving, Transaction};

type SqlResult<T> = rusqlite::Result<T>;

/// Load all four record kinds as the comparison corpus for one import run.
pub fn load_corpus(conn: &Connection) -> SqlResult<Corpus> {
    Ok(Corpus {
        transactions: list_transactions(conn)?,
        incomes: list_incomes(conn)?,
        fixed_expenses: list_fixed_expenses(conn)?,
        savings: list_savings(conn)?,
    })
}

pub fn list_transactions(conn: &Connection) -> SqlResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, type, category, notes FROM transactions ORDER BY date, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                date: row.get(1)?,
                description: row.get(2)?,
                amount: row.get(3)?,
                txn_type: row.get(4)?,
                category: row.get(5)?,
                notes: row.get(6)?,
            })
        })?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn list_incomes(conn: &Connection) -> SqlResult<Vec<Income>> {
    let mut stmt =
        conn.prepare("SELECT id, name, amount, notes, is_active FROM incomes ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Income {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                notes: row.get(3)?,
                is_active: row.get(4)?,
            })
        })?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn list_fixed_expenses(conn: &Connection) -> SqlResult<Vec<FixedExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, budget, due_day, category, notes, is_active FROM fixed_expenses ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FixedExpense {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                budget: row.get(3)?,
                due_day: row.get(4)?,
                category: row.get(5)?,
                notes: row.get(6)?,
                is_active: row.get(7)?,
            })
        })?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn list_savings(conn: &Connection) -> SqlResult<Vec<Saving>> {
    let mut stmt =
        conn.prepare("SELECT id, name, amount, type, notes, is_active FROM savings ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Saving {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                saving_type: row.get(3)?,
                notes: row.get(4)?,
                is_active: row.get(5)?,
            })
        })?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn create_transaction(
    conn: &Connection,
    date: &str,
    description: &str,
    amount: f64,
    txn_type: &str,
    notes: &str,
) -> SqlResult<()> {
    conn.execute(
        "INSERT INTO transactions (date, description, amount, type, category, notes) \
         VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        rusqlite::params![date, description, amount, txn_type, notes],
    )?;
    Ok(())
}

pub fn create_income(conn: &Connection, name: &str, amount: f64, notes: &str) -> SqlResult<()> {
    conn.execute(
        "INSERT INTO incomes (name, amount, notes, is_active) VALUES (?1, ?2, ?3, 1)",
        rusqlite::params![name, amount, notes],
    )?;
    Ok(())
}

pub fn create_fixed_expense(
    conn: &Connection,
    name: &str,
    amount: f64,
    budget: f64,
    notes: &str,
) -> SqlResult<()> {
    conn.execute(
        "INSERT INTO fixed_expenses (name, amount, budget, notes, is_active) VALUES (?1, ?2, ?3, ?4, 1)",
        rusqlite::params![name, amount, budget, notes],
    )?;
    Ok(())
}

pub fn create_saving(
    conn: &Connection,
    name: &str,
    amount: f64,
    saving_type: &str,
    notes: &str,
) -> SqlResult<()> {
    conn.execute(
        "INSERT INTO savings (name, amount, type, notes, is_active) VALUES (?1, ?2, ?3, ?4, 1)",
        rusqlite::params![name, amount, saving_type, notes],
    )?;
    Ok(())
}

fn appended(existing: Option<String>, line: &str) -> String {
    let mut notes = existing.unwrap_or_default();
    if !notes.is_empty() {
        notes.push('\n');
    }
    notes.push_str(line);
    notes.trim().to_string()
}

/// Set a new amount and append a dated note line, preserving note history.
pub fn update_income_amount(
    conn: &Connection,
    id: i64,
    amount: f64,
    note_line: &str,
) -> SqlResult<()> {
    let existing: Option<String> =
        conn.query_row("SELECT notes FROM incomes WHERE id = ?1", [id], |r| r.get(0))?;
    conn.execute(
        "UPDATE incomes SET amount = ?1, notes = ?2 WHERE id = ?3",
        rusqlite::params![amount, appended(existing, note_line), id],
    )?;
    Ok(())
}

pub fn update_fixed_expense_amount(
    conn: &Connection,
    id: i64,
    amount: f64,
    note_line: &str,
) -> SqlResult<()> {
    let existing: Option<String> =
        conn.query_row("SELECT notes FROM fixed_expenses WHERE id = ?1", [id], |r| r.get(0))?;
    conn.execute(
        "UPDATE fixed_expenses SET amount = ?1, notes = ?2 WHERE id = ?3",
        rusqlite::params![amount, appended(existing, note_line), id],
    )?;
    Ok(())
}

pub fn update_saving_amount(
    conn: &Connection,
    id: i64,
    amount: f64,
    note_line: &str,
) -> SqlResult<()> {
    let existing: Option<String> =
        conn.query_row("SELECT notes FROM savings WHERE id = ?1", [id], |r| r.get(0))?;
    conn.execute(
        "UPDATE savings SET amount = ?1, notes = ?2 WHERE id = ?3",
        rusqlite::params![amount, appended(existing, note_line), id],
    )?;
    Ok(())
}
