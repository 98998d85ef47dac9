pub mod import;
pub mod init;
pub mod profile;
pub mod records;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kassa", about = "Household budgeting CLI with spreadsheet import.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up kassa: choose a data directory and initialize the database.
    Init {
        /// Path for kassa data (default: ~/Documents/kassa)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage column-mapping profiles for bank and card exports.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Import a CSV/XLSX export: preview, classify and write rows.
    Import {
        /// Path to CSV or XLSX file to import
        file: String,
        /// Saved profile name (falls back to the default profile)
        #[arg(long)]
        profile: Option<String>,
        /// Source type for an ad hoc mapping: bank, creditcard
        #[arg(long)]
        source: Option<String>,
        /// Date column header for an ad hoc mapping
        #[arg(long = "date-col")]
        date_col: Option<String>,
        /// Description column header for an ad hoc mapping
        #[arg(long = "description-col")]
        description_col: Option<String>,
        /// Amount column header for an ad hoc mapping
        #[arg(long = "amount-col")]
        amount_col: Option<String>,
        /// Date format: YYYY-MM-DD, DD/MM/YYYY, DD.MM.YYYY, MM/DD/YYYY
        #[arg(long = "date-format")]
        date_format: Option<String>,
        /// Flip the sign of every amount
        #[arg(long)]
        invert: bool,
        /// Header row index (0-based); overrides profile and auto-detection
        #[arg(long = "header-row")]
        header_row: Option<usize>,
        /// Reassign every selected row: variable, income, fixed, saving, skip
        #[arg(long = "as")]
        as_kind: Option<String>,
        /// Stop after the preview, write nothing
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List stored records.
    Records {
        #[command(subcommand)]
        command: RecordsCommands,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Add a column-mapping profile.
    Add {
        /// Profile name, e.g. 'Nordea Privatkonto'
        name: String,
        /// Source type: bank, creditcard
        #[arg(long, default_value = "bank")]
        source: String,
        /// Date column header
        #[arg(long = "date-col")]
        date_col: String,
        /// Description column header
        #[arg(long = "description-col")]
        description_col: String,
        /// Amount column header
        #[arg(long = "amount-col")]
        amount_col: String,
        /// Date format: YYYY-MM-DD, DD/MM/YYYY, DD.MM.YYYY, MM/DD/YYYY
        #[arg(long = "date-format", default_value = "YYYY-MM-DD")]
        date_format: String,
        /// Flip the sign of every amount
        #[arg(long)]
        invert: bool,
        /// Header row index (0-based)
        #[arg(long = "header-row", default_value = "0")]
        header_row: usize,
    },
    /// List all profiles.
    List,
    /// Update an existing profile.
    Edit {
        /// Profile name (shown in `kassa profile list`)
        name: String,
        /// New profile name
        #[arg(long)]
        rename: Option<String>,
        /// New source type: bank, creditcard
        #[arg(long)]
        source: Option<String>,
        /// New date column header
        #[arg(long = "date-col")]
        date_col: Option<String>,
        /// New description column header
        #[arg(long = "description-col")]
        description_col: Option<String>,
        /// New amount column header
        #[arg(long = "amount-col")]
        amount_col: Option<String>,
        /// New date format
        #[arg(long = "date-format")]
        date_format: Option<String>,
        /// New invert flag: true, false
        #[arg(long)]
        invert: Option<bool>,
        /// New header row index (0-based)
        #[arg(long = "header-row")]
        header_row: Option<usize>,
    },
    /// Delete a profile by name.
    Delete {
        /// Profile name (shown in `kassa profile list`)
        name: String,
    },
}

#[derive(Subcommand)]
pub enum RecordsCommands {
    /// One-off transactions.
    Transactions,
    /// Recurring incomes.
    Incomes,
    /// Fixed expenses.
    Fixed,
    /// Savings.
    Savings,
}
