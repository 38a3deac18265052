//! Seed script: loads the support catalog into a fresh database.
//!
//! Usage: `cargo run --bin seed`
//!
//! Reads the same configuration as the server (`config/default.toml`,
//! `BARAKA__*`, `DATABASE_URL`). Existing catalogs are left untouched.

use baraka_finder::config::Settings;
use baraka_finder::services::{default_catalog, PostgresClient, ResultsStore, StoreError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let settings = Settings::load()?;

    let client = PostgresClient::from_settings(
        &settings.database.url,
        Some(2),
        Some(1),
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await?;

    println!("=== Business Baraka Finder Seed ===");

    seed_catalog(&client).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_catalog(store: &dyn ResultsStore) -> Result<(), StoreError> {
    let catalog = default_catalog();
    let inserted = store.seed_resources(&catalog).await?;

    if inserted == 0 {
        println!("[skip] Support resources already present");
    } else {
        println!("[done] Inserted {} of {} support resources", inserted, catalog.len());
    }
    Ok(())
}
