// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user per-guild counter operations (game wins and similar tallies).

use rusqlite::params;

use panelio_core::types::{GuildId, UserId};
use panelio_core::PanelioError;

use crate::database::{map_tr_err, Database};

/// Current value, or `None` when the counter does not exist.
pub async fn get_counter(
    db: &Database,
    user: &UserId,
    guild: &GuildId,
    name: &str,
) -> Result<Option<i64>, PanelioError> {
    let user = user.0.clone();
    let guild = guild.0.clone();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT value FROM user_counter
                 WHERE user_id = ?1 AND guild_id = ?2 AND name = ?3",
                params![user, guild, name],
                |row| row.get::<_, i64>(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Create or overwrite a counter.
pub async fn put_counter(
    db: &Database,
    user: &UserId,
    guild: &GuildId,
    name: &str,
    value: i64,
) -> Result<(), PanelioError> {
    let user = user.0.clone();
    let guild = guild.0.clone();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO user_counter (user_id, guild_id, name, value)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, guild_id, name) DO UPDATE SET value = excluded.value",
                params![user, guild, name, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All counters with the given name in a guild, highest value first.
pub async fn counters_named(
    db: &Database,
    guild: &GuildId,
    name: &str,
) -> Result<Vec<(UserId, i64)>, PanelioError> {
    let guild = guild.0.clone();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, value FROM user_counter
                 WHERE guild_id = ?1 AND name = ?2 ORDER BY value DESC",
            )?;
            let rows = stmt.query_map(params![guild, name], |row| {
                Ok((UserId(row.get(0)?), row.get::<_, i64>(1)?))
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
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
    async fn missing_counter_is_none() {
        let (db, _dir) = setup_db().await;
        let value = get_counter(
            &db,
            &UserId("u".into()),
            &GuildId("g".into()),
            "ConnectFour_wins",
        )
        .await
        .unwrap();
        assert_eq!(value, None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn put_overwrites_and_get_reads_back() {
        let (db, _dir) = setup_db().await;
        let user = UserId("u".into());
        let guild = GuildId("g".into());

        put_counter(&db, &user, &guild, "ConnectFour_wins", 1).await.unwrap();
        put_counter(&db, &user, &guild, "ConnectFour_wins", 5).await.unwrap();

        assert_eq!(
            get_counter(&db, &user, &guild, "ConnectFour_wins").await.unwrap(),
            Some(5)
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn counters_named_sorts_highest_first() {
        let (db, _dir) = setup_db().await;
        let guild = GuildId("g".into());
        put_counter(&db, &UserId("a".into()), &guild, "Hangman_wins", 2).await.unwrap();
        put_counter(&db, &UserId("b".into()), &guild, "Hangman_wins", 7).await.unwrap();
        put_counter(&db, &UserId("c".into()), &guild, "Hangman_wins", 4).await.unwrap();

        let board = counters_named(&db, &guild, "Hangman_wins").await.unwrap();
        let users: Vec<&str> = board.iter().map(|(u, _)| u.0.as_str()).collect();
        assert_eq!(users, vec!["b", "c", "a"]);

        db.close().await.unwrap();
    }
}
