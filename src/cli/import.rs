use std::collections::BTreeSet;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::classifier::{self, ParsedRow, TargetKind};
use crate::db::get_connection;
use crate::error::{KassaError, Result};
use crate::executor::{self, ImportCounts};
use crate::fmt::money;
use crate::models::{ColumnMapping, SourceType};
use crate::parse::DateFormat;
use crate::profiles;
use crate::settings::{db_path, load_settings};
use crate::sheet;
use crate::store;

pub struct ImportOpts {
    pub profile: Option<String>,
    pub source: Option<String>,
    pub date_col: Option<String>,
    pub description_col: Option<String>,
    pub amount_col: Option<String>,
    pub date_format: Option<String>,
    pub invert: bool,
    pub header_row: Option<usize>,
    pub as_kind: Option<String>,
    pub dry_run: bool,
    pub yes: bool,
}

pub fn run(file: &str, opts: ImportOpts) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = get_connection(&db_path())?;

    let (mapping, profile_name) = resolve_mapping(&conn, &opts)?;

    let grid = sheet::read_grid(&file_path)?;
    let header_row = match opts.header_row {
        Some(h) => h,
        None if profile_name.is_some() => mapping.header_row,
        None => sheet::detect_header_row(&grid),
    };
    let data = sheet::project(&grid, header_row);

    for col in [&mapping.date_column, &mapping.description_column, &mapping.amount_column] {
        if !data.columns.iter().any(|c| c == col) {
            return Err(KassaError::MissingColumn(col.clone()));
        }
    }

    let corpus = store::load_corpus(&conn)?;
    let mut rows = classifier::classify_rows(&data.rows, &mapping, &corpus);
    let mut selection = classifier::default_selection(&rows);

    if let Some(kind_str) = &opts.as_kind {
        let kind = TargetKind::parse(kind_str).ok_or_else(|| {
            KassaError::Other(format!(
                "unknown target '{kind_str}' (variable, income, fixed, saving, skip)"
            ))
        })?;
        classifier::bulk_reclassify(&mut rows, &mut selection, kind, &corpus);
    }

    print_preview(&rows, &selection, header_row);

    let selected = selection.len();
    if selected == 0 {
        println!("Nothing to import.");
        return Ok(());
    }
    if opts.dry_run {
        println!("Dry run, nothing written.");
        return Ok(());
    }
    if !opts.yes && !confirm(selected) {
        println!("Aborted.");
        return Ok(());
    }

    let label = executor::source_label(profile_name.as_deref(), &mapping.name, file);
    match executor::execute_import(&conn, &rows, &selection, &label) {
        Ok(counts) => {
            print_counts(&counts);
            Ok(())
        }
        Err(aborted) => {
            print_counts(&aborted.counts);
            Err(aborted.into())
        }
    }
}

/// Mapping priority: explicit --profile, then ad hoc column flags, then the
/// default profile from settings.
fn resolve_mapping(
    conn: &rusqlite::Connection,
    opts: &ImportOpts,
) -> Result<(ColumnMapping, Option<String>)> {
    if let Some(name) = &opts.profile {
        let profile = profiles::get_profile(conn, name)?
            .ok_or_else(|| KassaError::UnknownProfile(name.clone()))?;
        return Ok((ColumnMapping::from_profile(&profile), Some(profile.name.clone())));
    }

    if let (Some(date), Some(desc), Some(amount)) =
        (&opts.date_col, &opts.description_col, &opts.amount_col)
    {
        let source_type = match &opts.source {
            Some(s) => SourceType::parse(s).ok_or_else(|| {
                KassaError::Other(format!("unknown source type '{s}' (bank, creditcard)"))
            })?,
            None => SourceType::Bank,
        };
        let date_format = match &opts.date_format {
            Some(f) => DateFormat::parse(f).ok_or_else(|| {
                KassaError::Other(format!(
                    "unknown date format '{f}' (YYYY-MM-DD, DD/MM/YYYY, DD.MM.YYYY, MM/DD/YYYY)"
                ))
            })?,
            None => DateFormat::Ymd,
        };
        return Ok((
            ColumnMapping {
                name: String::new(),
                source_type,
                date_column: date.clone(),
                description_column: desc.clone(),
                amount_column: amount.clone(),
                date_format,
                invert_amount: opts.invert,
                header_row: 0,
            },
            None,
        ));
    }

    let settings = load_settings();
    if !settings.default_profile.is_empty() {
        let name = settings.default_profile;
        let profile = profiles::get_profile(conn, &name)?
            .ok_or_else(|| KassaError::UnknownProfile(name.clone()))?;
        return Ok((ColumnMapping::from_profile(&profile), Some(profile.name.clone())));
    }

    Err(KassaError::Other(
        "no mapping: pass --profile NAME or --date-col/--description-col/--amount-col".to_string(),
    ))
}

fn print_preview(rows: &[ParsedRow], selection: &BTreeSet<usize>, header_row: usize) {
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Date", "Description", "Amount", "Target", "Match", "Action", "Status",
    ]);

    let mut duplicates = 0;
    let mut invalid = 0;
    for (i, row) in rows.iter().enumerate() {
        let date = row.date.map(|d| d.to_string()).unwrap_or_default();
        let amount = row.amount.map(money).unwrap_or_default();
        let matched = match row.target {
            TargetKind::Income => row.income_match.as_ref().map(|m| m.name.clone()),
            TargetKind::Fixed => row.fixed_match.as_ref().map(|m| m.name.clone()),
            TargetKind::Saving => row.saving_match.as_ref().map(|m| m.name.clone()),
            _ => None,
        }
        .unwrap_or_default();
        let action = row.action().map(|a| a.as_str()).unwrap_or("").to_string();

        let status = if !row.is_valid() {
            invalid += 1;
            row.errors.join("; ").red().to_string()
        } else if let Some(kind) = &row.duplicate {
            duplicates += 1;
            format!("duplicate ({})", kind.as_str()).yellow().to_string()
        } else if selection.contains(&i) {
            "import".green().to_string()
        } else {
            "skip".to_string()
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(date),
            Cell::new(&row.description),
            Cell::new(amount),
            Cell::new(row.target.as_str()),
            Cell::new(matched),
            Cell::new(action),
            Cell::new(status),
        ]);
    }

    println!("{table}");
    println!(
        "{} rows (header row {}), {} selected, {} duplicates, {} invalid",
        rows.len(),
        header_row,
        selection.len(),
        duplicates,
        invalid
    );
}

fn confirm(selected: usize) -> bool {
    println!("Write {selected} rows? [y/N]: ");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok();
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_counts(counts: &ImportCounts) {
    println!(
        "Imported {}: {} transactions, {} incomes, {} fixed expenses, {} savings",
        counts.total().to_string().green(),
        counts.variable,
        counts.income,
        counts.fixed,
        counts.savings
    );
}
