use sea_orm_migration::prelude::*;

/// Standalone migration runner; reads `DATABASE_URL` from the environment or `.env`.
#[tokio::main]
async fn main() {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using process environment");
    }
    cli::run_cli(migration::Migrator).await;
}
