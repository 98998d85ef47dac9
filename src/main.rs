mod classifier;
mod cli;
mod db;
mod error;
mod executor;
mod fmt;
mod matcher;
mod models;
mod parse;
mod profiles;
mod settings;
mod sheet;
mod store;

use clap::Parser;

use cli::{Cli, Commands, ProfileCommands, RecordsCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Profile { command } => match command {
            ProfileCommands::Add {
                name,
                source,
                date_col,
                description_col,
                amount_col,
                date_format,
                invert,
                header_row,
            } => cli::profile::add(
                &name,
                &source,
                &date_col,
                &description_col,
                &amount_col,
                &date_format,
                invert,
                header_row,
            ),
            ProfileCommands::List => cli::profile::list(),
            ProfileCommands::Edit {
                name,
                rename,
                source,
                date_col,
                description_col,
                amount_col,
                date_format,
                invert,
                header_row,
            } => cli::profile::edit(
                &name,
                rename.as_deref(),
                source.as_deref(),
                date_col.as_deref(),
                description_col.as_deref(),
                amount_col.as_deref(),
                date_format.as_deref(),
                invert,
                header_row,
            ),
            ProfileCommands::Delete { name } => cli::profile::delete(&name),
        },
        Commands::Import {
            file,
            profile,
            source,
            date_col,
            description_col,
            amount_col,
            date_format,
            invert,
            header_row,
            as_kind,
            dry_run,
            yes,
        } => cli::import::run(
            &file,
            cli::import::ImportOpts {
                profile,
                source,
                date_col,
                description_col,
                amount_col,
                date_format,
                invert,
                header_row,
                as_kind,
                dry_run,
                yes,
            },
        ),
        Commands::Records { command } => match command {
            RecordsCommands::Transactions => cli::records::transactions(),
            RecordsCommands::Incomes => cli::records::incomes(),
            RecordsCommands::Fixed => cli::records::fixed(),
            RecordsCommands::Savings => cli::records::savings(),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
