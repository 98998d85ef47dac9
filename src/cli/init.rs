use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    save_settings(&settings)?;

    // KASSA_DATA_DIR wins here too, so init and later commands agree on
    // where the database lives.
    let resolved = crate::settings::get_data_dir();
    std::fs::create_dir_all(&resolved)?;

    let conn = get_connection(&resolved.join("kassa.db"))?;
    init_db(&conn)?;

    println!("Initialized kassa at {}", resolved.display());
    Ok(())
}

fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
