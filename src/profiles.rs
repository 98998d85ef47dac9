use rusqlite::{Connection, OptionalExtension};

use crate::error::{KassaError, Result};
use crate::models::{ImportProfile, SourceType};
use crate::parse::DateFormat;

/// Fields for a profile about to be created. Updates go through
/// `save_profile` with a loaded `ImportProfile`.
#[derive(Debug, Clone)]
pub struct ProfileSpec {
    pub name: String,
    pub source_type: SourceType,
    pub date_column: String,
    pub description_column: String,
    pub amount_column: String,
    pub date_format: DateFormat,
    pub invert_amount: bool,
    pub header_row: usize,
}

fn name_taken(conn: &Connection, name: &str, exclude_id: Option<i64>) -> Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM import_profiles WHERE name = ?1 COLLATE NOCASE",
            [name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(match (existing, exclude_id) {
        (Some(id), Some(own)) => id != own,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

pub fn create_profile(conn: &Connection, spec: &ProfileSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(KassaError::Other("profile name must not be empty".to_string()));
    }
    if name_taken(conn, &spec.name, None)? {
        return Err(KassaError::ProfileNameConflict(spec.name.clone()));
    }
    conn.execute(
        "INSERT INTO import_profiles \
         (name, source_type, date_column, description_column, amount_column, date_format, invert_amount, skip_rows) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            spec.name,
            spec.source_type.as_str(),
            spec.date_column,
            spec.description_column,
            spec.amount_column,
            spec.date_format.as_str(),
            spec.invert_amount,
            spec.header_row as i64,
        ],
    )?;
    Ok(())
}

/// Persist changes to a loaded profile, including renames. The conflict
/// check ignores the profile's own row.
pub fn save_profile(conn: &Connection, profile: &ImportProfile) -> Result<()> {
    if name_taken(conn, &profile.name, Some(profile.id))? {
        return Err(KassaError::ProfileNameConflict(profile.name.clone()));
    }
    conn.execute(
        "UPDATE import_profiles SET name = ?1, source_type = ?2, date_column = ?3, \
         description_column = ?4, amount_column = ?5, date_format = ?6, invert_amount = ?7, skip_rows = ?8 \
         WHERE id = ?9",
        rusqlite::params![
            profile.name,
            profile.source_type.as_str(),
            profile.date_column,
            profile.description_column,
            profile.amount_column,
            profile.date_format.as_str(),
            profile.invert_amount,
            profile.header_row as i64,
            profile.id,
        ],
    )?;
    Ok(())
}

pub fn delete_profile(conn: &Connection, name: &str) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM import_profiles WHERE name = ?1 COLLATE NOCASE",
        [name],
    )?;
    if affected == 0 {
        return Err(KassaError::UnknownProfile(name.to_string()));
    }
    Ok(())
}

pub fn get_profile(conn: &Connection, name: &str) -> Result<Option<ImportProfile>> {
    let profile = conn
        .query_row(
            "SELECT id, name, source_type, date_column, description_column, amount_column, \
             date_format, invert_amount, skip_rows \
             FROM import_profiles WHERE name = ?1 COLLATE NOCASE",
            [name],
            profile_from_row,
        )
        .optional()?;
    Ok(profile)
}

pub fn list_profiles(conn: &Connection) -> Result<Vec<ImportProfile>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, source_type, date_column, description_column, amount_column, \
         date_format, invert_amount, skip_rows \
         FROM import_profiles ORDER BY name",
    )?;
    let profiles = stmt
        .query_map([], profile_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(profiles)
}

fn profile_from_row(row: &rusqlite::Row) -> rusqlite::Result<ImportProfile> {
    let source: String = row.get(2)?;
    let format: String = row.get(6)?;
    let header_row: i64 = row.get(8)?;
    Ok(ImportProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        source_type: SourceType::parse(&source).unwrap_or(SourceType::Bank),
        date_column: row.get(3)?,
        description_column: row.get(4)?,
        amount_column: row.get(5)?,
        date_format: DateFormat::parse(&format).unwrap_or(DateFormat::Ymd),
        invert_amount: row.get(7)?,
        header_row: header_row.max(0) as usize,
    })
}
