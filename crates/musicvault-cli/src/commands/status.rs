use anyhow::Result;
use musicvault_core::{Config, Session, SqliteGateway, Table};

pub async fn show_status(
    config: &Config,
    gateway: &SqliteGateway,
    session: Option<&Session>,
) -> Result<()> {
    println!("\n📿 Musicvault Status\n");
    println!("  Database: {}", config.database_path.display());
    if let Some(session) = session {
        println!(
            "  Logged in since: {}",
            session.authenticated_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();

    for table in Table::ALL {
        let count = gateway.count(table).await?;
        println!("  {:<16} {}", table.as_str(), count);
    }

    Ok(())
}
