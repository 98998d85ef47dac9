use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;
use crate::store;

pub fn transactions() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = store::list_transactions(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount", "Type", "Notes"]);
    for t in rows {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.date),
            Cell::new(&t.description),
            Cell::new(money(t.amount)),
            Cell::new(&t.txn_type),
            Cell::new(t.notes.unwrap_or_default()),
        ]);
    }
    println!("Transactions\n{table}");
    Ok(())
}

pub fn incomes() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = store::list_incomes(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Active", "Notes"]);
    for i in rows {
        table.add_row(vec![
            Cell::new(i.id),
            Cell::new(&i.name),
            Cell::new(money(i.amount)),
            Cell::new(if i.is_active { "yes" } else { "no" }),
            Cell::new(i.notes.unwrap_or_default()),
        ]);
    }
    println!("Incomes\n{table}");
    Ok(())
}

pub fn fixed() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = store::list_fixed_expenses(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Budget", "Active", "Notes"]);
    for f in rows {
        table.add_row(vec![
            Cell::new(f.id),
            Cell::new(&f.name),
            Cell::new(money(f.amount)),
            Cell::new(money(f.budget)),
            Cell::new(if f.is_active { "yes" } else { "no" }),
            Cell::new(f.notes.unwrap_or_default()),
        ]);
    }
    println!("Fixed expenses\n{table}");
    Ok(())
}

pub fn savings() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = store::list_savings(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Type", "Active", "Notes"]);
    for s in rows {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(&s.name),
            Cell::new(money(s.amount)),
            Cell::new(&s.saving_type),
            Cell::new(if s.is_active { "yes" } else { "no" }),
            Cell::new(s.notes.unwrap_or_default()),
        ]);
    }
    println!("Savings\n{table}");
    Ok(())
}
