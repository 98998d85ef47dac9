use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{KassaError, Result};
use crate::models::SourceType;
use crate::parse::DateFormat;
use crate::profiles::{self, ProfileSpec};
use crate::settings::db_path;

fn parse_source(s: &str) -> Result<SourceType> {
    SourceType::parse(s)
        .ok_or_else(|| KassaError::Other(format!("unknown source type '{s}' (bank, creditcard)")))
}

fn parse_format(s: &str) -> Result<DateFormat> {
    DateFormat::parse(s).ok_or_else(|| {
        KassaError::Other(format!(
            "unknown date format '{s}' (YYYY-MM-DD, DD/MM/YYYY, DD.MM.YYYY, MM/DD/YYYY)"
        ))
    })
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    name: &str,
    source: &str,
    date_col: &str,
    description_col: &str,
    amount_col: &str,
    date_format: &str,
    invert: bool,
    header_row: usize,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let spec = ProfileSpec {
        name: name.to_string(),
        source_type: parse_source(source)?,
        date_column: date_col.to_string(),
        description_column: description_col.to_string(),
        amount_column: amount_col.to_string(),
        date_format: parse_format(date_format)?,
        invert_amount: invert,
        header_row,
    };
    profiles::create_profile(&conn, &spec)?;
    println!("Added profile: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let all = profiles::list_profiles(&conn)?;
    if all.is_empty() {
        println!("No profiles yet. Add one with `kassa profile add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Name", "Source", "Date", "Description", "Amount", "Format", "Invert", "Header row",
    ]);
    for p in all {
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(p.source_type.as_str()),
            Cell::new(&p.date_column),
            Cell::new(&p.description_column),
            Cell::new(&p.amount_column),
            Cell::new(p.date_format.as_str()),
            Cell::new(if p.invert_amount { "yes" } else { "no" }),
            Cell::new(p.header_row),
        ]);
    }
    println!("Profiles\n{table}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    name: &str,
    rename: Option<&str>,
    source: Option<&str>,
    date_col: Option<&str>,
    description_col: Option<&str>,
    amount_col: Option<&str>,
    date_format: Option<&str>,
    invert: Option<bool>,
    header_row: Option<usize>,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut profile = profiles::get_profile(&conn, name)?
        .ok_or_else(|| KassaError::UnknownProfile(name.to_string()))?;

    if let Some(new_name) = rename {
        profile.name = new_name.to_string();
    }
    if let Some(s) = source {
        profile.source_type = parse_source(s)?;
    }
    if let Some(c) = date_col {
        profile.date_column = c.to_string();
    }
    if let Some(c) = description_col {
        profile.description_column = c.to_string();
    }
    if let Some(c) = amount_col {
        profile.amount_column = c.to_string();
    }
    if let Some(f) = date_format {
        profile.date_format = parse_format(f)?;
    }
    if let Some(i) = invert {
        profile.invert_amount = i;
    }
    if let Some(h) = header_row {
        profile.header_row = h;
    }

    profiles::save_profile(&conn, &profile)?;
    println!("Updated profile: {}", profile.name);
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    profiles::delete_profile(&conn, name)?;
    println!("Deleted profile: {name}");
    Ok(())
}
