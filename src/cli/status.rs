use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let db_path = data_dir.join("kassa.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!(
        "Profile:    {}",
        if settings.default_profile.is_empty() {
            "(no default)"
        } else {
            &settings.default_profile
        }
    );

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let incomes: i64 = conn.query_row("SELECT count(*) FROM incomes", [], |r| r.get(0))?;
        let fixed: i64 = conn.query_row("SELECT count(*) FROM fixed_expenses", [], |r| r.get(0))?;
        let savings: i64 = conn.query_row("SELECT count(*) FROM savings", [], |r| r.get(0))?;
        let profiles: i64 =
            conn.query_row("SELECT count(*) FROM import_profiles", [], |r| r.get(0))?;

        println!();
        println!("Transactions:    {transactions}");
        println!("Incomes:         {incomes}");
        println!("Fixed expenses:  {fixed}");
        println!("Savings:         {savings}");
        println!("Profiles:        {profiles}");
    } else {
        println!();
        println!("Database not found. Run `kassa init` to set up.");
    }

    Ok(())
}
