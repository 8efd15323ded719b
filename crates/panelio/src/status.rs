// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `panelio status` command implementation.

use panelio_config::PanelioConfig;
use panelio_core::PanelioError;
use panelio_storage::Database;

/// Print configuration highlights and storage health.
pub async fn run_status(config: PanelioConfig) -> Result<(), PanelioError> {
    println!("panelio {}", env!("CARGO_PKG_VERSION"));
    println!("agent.name        {}", config.agent.name);
    println!("agent.log_level   {}", config.agent.log_level);
    println!("storage.path      {}", config.storage.database_path);
    println!(
        "transport         {}",
        if config.transport.token.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    let db = Database::open(&config.storage.database_path).await?;
    let (messages, info_rows, options, counters): (i64, i64, i64, i64) = db
        .connection()
        .call(|conn| -> Result<(i64, i64, i64, i64), rusqlite::Error> {
            let count = |conn: &rusqlite::Connection, table: &str| {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
            };
            Ok((
                count(conn, "message")?,
                count(conn, "message_info")?,
                count(conn, "guild_option_info")?,
                count(conn, "user_counter")?,
            ))
        })
        .await
        .map_err(|e| PanelioError::Storage { source: Box::new(e) })?;
    db.close().await?;

    println!("message records   {messages}");
    println!("info rows         {info_rows}");
    println!("guild options     {options}");
    println!("user counters     {counters}");
    Ok(())
}
