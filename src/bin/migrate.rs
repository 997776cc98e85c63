use secrecy::ExposeSecret;
use tech_events_api::{
    config::{AppConfig, load_env_files},
    db::PoolManager,
    logging,
    migration::{reset, run_migrations},
    schema::ddl,
};

const USAGE: &str = "usage: migrate [up | down | print]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    // `print` needs neither configuration nor a database.
    if command == "print" {
        print!("{}", ddl::render_script(&ddl::create_statements()));
        return Ok(());
    }
    if command != "up" && command != "down" {
        anyhow::bail!("unknown command '{command}'\n{USAGE}");
    }

    load_env_files();
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config)?;

    let db = PoolManager::connect_url(
        config.database.url.expose_secret(),
        config.database.pool,
    )?;
    db.verify().await?;
    let result = if command == "down" {
        reset(&db).await
    } else {
        run_migrations(&db).await
    };
    db.shutdown().await;
    result?;

    println!("Migrations {}", if command == "down" { "rolled back" } else { "applied" });
    Ok(())
}
