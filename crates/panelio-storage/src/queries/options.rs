// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-guild named option CRUD operations.

use rusqlite::params;

use panelio_core::types::GuildId;
use panelio_core::PanelioError;

use crate::database::{map_tr_err, Database};

/// Values of a named option; empty when unset.
pub async fn get_option(
    db: &Database,
    guild: &GuildId,
    name: &str,
) -> Result<Vec<String>, PanelioError> {
    let guild = guild.0.clone();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT info FROM guild_option_info
                 WHERE guild_id = ?1 AND name = ?2 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![guild, name], |row| row.get::<_, String>(0))?;
            let mut values = Vec::new();
            for row in rows {
                values.push(row?);
            }
            Ok(values)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a named option with the given values.
pub async fn set_option(
    db: &Database,
    guild: &GuildId,
    name: &str,
    values: &[String],
) -> Result<(), PanelioError> {
    let guild = guild.0.clone();
    let name = name.to_string();
    let values = values.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM guild_option WHERE guild_id = ?1 AND name = ?2",
                params![guild, name],
            )?;
            tx.execute(
                "INSERT INTO guild_option (guild_id, name) VALUES (?1, ?2)",
                params![guild, name],
            )?;
            for value in &values {
                tx.execute(
                    "INSERT INTO guild_option_info (guild_id, name, info) VALUES (?1, ?2, ?3)",
                    params![guild, name, value],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a named option entirely. Values cascade with the option row.
pub async fn delete_option(db: &Database, guild: &GuildId, name: &str) -> Result<(), PanelioError> {
    let guild = guild.0.clone();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM guild_option WHERE guild_id = ?1 AND name = ?2",
                params![guild, name],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn unset_option_is_empty() {
        let (db, _dir) = setup_db().await;
        let values = get_option(&db, &GuildId("g".into()), "Poll").await.unwrap();
        assert!(values.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_replaces_previous_values_in_order() {
        let (db, _dir) = setup_db().await;
        let guild = GuildId("g".into());

        set_option(&db, &guild, "Poll", &["mods".into(), "polls".into()])
            .await
            .unwrap();
        assert_eq!(
            get_option(&db, &guild, "Poll").await.unwrap(),
            vec!["mods".to_string(), "polls".to_string()]
        );

        set_option(&db, &guild, "Poll", &["admins".into()]).await.unwrap();
        assert_eq!(
            get_option(&db, &guild, "Poll").await.unwrap(),
            vec!["admins".to_string()]
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_cascades_option_values() {
        let (db, _dir) = setup_db().await;
        let guild = GuildId("g".into());
        set_option(&db, &guild, "Poll_deletion", &["48".into()]).await.unwrap();

        delete_option(&db, &guild, "Poll_deletion").await.unwrap();
        assert!(get_option(&db, &guild, "Poll_deletion").await.unwrap().is_empty());

        let orphans: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM guild_option_info", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn options_are_scoped_per_guild() {
        let (db, _dir) = setup_db().await;
        set_option(&db, &GuildId("g1".into()), "Poll", &["a".into()]).await.unwrap();
        set_option(&db, &GuildId("g2".into()), "Poll", &["b".into()]).await.unwrap();

        assert_eq!(get_option(&db, &GuildId("g1".into()), "Poll").await.unwrap(), vec!["a"]);
        assert_eq!(get_option(&db, &GuildId("g2".into()), "Poll").await.unwrap(), vec!["b"]);

        db.close().await.unwrap();
    }
}
