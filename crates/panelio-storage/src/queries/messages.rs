// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message record and info-row CRUD operations.

use rusqlite::params;

use panelio_core::types::{ChannelId, DocumentId, InfoRow, MessageRecord, UserId};
use panelio_core::PanelioError;

use crate::database::{map_tr_err, Database};

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MessageRecord, rusqlite::Error> {
    Ok(MessageRecord {
        id: DocumentId(row.get(0)?),
        channel_id: ChannelId(row.get(1)?),
        author_id: row.get::<_, Option<String>>(2)?.map(UserId),
        kind: row.get(3)?,
        info: Vec::new(),
    })
}

fn row_to_info(row: &rusqlite::Row<'_>) -> Result<InfoRow, rusqlite::Error> {
    Ok(InfoRow {
        name: row.get(0)?,
        info: row.get(1)?,
        user_id: row.get::<_, Option<String>>(2)?.map(UserId),
    })
}

/// Fetch a message record without its info rows.
pub async fn get_message(
    db: &Database,
    id: &DocumentId,
) -> Result<Option<MessageRecord>, PanelioError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, channel_id, author_id, kind FROM message WHERE id = ?1")?;
            match stmt.query_row(params![id], row_to_record) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a message record together with all of its info rows.
pub async fn get_message_with_info(
    db: &Database,
    id: &DocumentId,
) -> Result<Option<MessageRecord>, PanelioError> {
    let Some(mut record) = get_message(db, id).await? else {
        return Ok(None);
    };
    record.info = get_info(db, id, None, None).await?;
    Ok(Some(record))
}

/// Info rows for a message, optionally filtered by name and/or user.
pub async fn get_info(
    db: &Database,
    id: &DocumentId,
    name: Option<&str>,
    user: Option<&UserId>,
) -> Result<Vec<InfoRow>, PanelioError> {
    let id = id.0.clone();
    let name = name.map(str::to_string);
    let user = user.map(|u| u.0.clone());
    db.connection()
        .call(move |conn| {
            let mut sql =
                String::from("SELECT name, info, user_id FROM message_info WHERE message_id = ?1");
            let mut args: Vec<String> = vec![id];
            if let Some(name) = name {
                sql.push_str(" AND name = ?2");
                args.push(name);
            }
            if let Some(user) = user {
                sql.push_str(&format!(" AND user_id = ?{}", args.len() + 1));
                args.push(user);
            }
            sql.push_str(" ORDER BY id ASC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(args), row_to_info)?;
            let mut info = Vec::new();
            for row in rows {
                info.push(row?);
            }
            Ok(info)
        })
        .await
        .map_err(map_tr_err)
}

/// All messages carrying an info row with the given name, paired with it.
pub async fn messages_with_info_named(
    db: &Database,
    name: &str,
) -> Result<Vec<(MessageRecord, InfoRow)>, PanelioError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.channel_id, m.author_id, m.kind, i.name, i.info, i.user_id
                 FROM message m JOIN message_info i ON m.id = i.message_id
                 WHERE i.name = ?1 ORDER BY m.id ASC",
            )?;
            let rows = stmt.query_map(params![name], |row| {
                let record = MessageRecord {
                    id: DocumentId(row.get(0)?),
                    channel_id: ChannelId(row.get(1)?),
                    author_id: row.get::<_, Option<String>>(2)?.map(UserId),
                    kind: row.get(3)?,
                    info: Vec::new(),
                };
                let info = InfoRow {
                    name: row.get(4)?,
                    info: row.get(5)?,
                    user_id: row.get::<_, Option<String>>(6)?.map(UserId),
                };
                Ok((record, info))
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

/// Create a message record together with any initial info rows.
pub async fn add_message(db: &Database, record: &MessageRecord) -> Result<(), PanelioError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO message (id, channel_id, author_id, kind) VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id.0,
                    record.channel_id.0,
                    record.author_id.as_ref().map(|u| u.0.clone()),
                    record.kind,
                ],
            )?;
            for row in &record.info {
                tx.execute(
                    "INSERT INTO message_info (message_id, name, info, user_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        record.id.0,
                        row.name,
                        row.info,
                        row.user_id.as_ref().map(|u| u.0.clone()),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the recorded author of a message.
pub async fn update_author(
    db: &Database,
    id: &DocumentId,
    author: Option<&UserId>,
) -> Result<(), PanelioError> {
    let id = id.0.clone();
    let author = author.map(|u| u.0.clone());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE message SET author_id = ?1 WHERE id = ?2",
                params![author, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a message record. `message_info` rows cascade with it.
pub async fn delete_message(db: &Database, id: &DocumentId) -> Result<(), PanelioError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM message WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Attach one info row to an existing message record.
pub async fn add_info(db: &Database, id: &DocumentId, row: &InfoRow) -> Result<(), PanelioError> {
    let id = id.0.clone();
    let row = row.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO message_info (message_id, name, info, user_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, row.name, row.info, row.user_id.as_ref().map(|u| u.0.clone())],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove info rows by name, optionally restricted to one user.
pub async fn delete_info(
    db: &Database,
    id: &DocumentId,
    name: &str,
    user: Option<&UserId>,
) -> Result<(), PanelioError> {
    let id = id.0.clone();
    let name = name.to_string();
    let user = user.map(|u| u.0.clone());
    db.connection()
        .call(move |conn| {
            match user {
                Some(user) => conn.execute(
                    "DELETE FROM message_info WHERE message_id = ?1 AND name = ?2 AND user_id = ?3",
                    params![id, name, user],
                )?,
                None => conn.execute(
                    "DELETE FROM message_info WHERE message_id = ?1 AND name = ?2",
                    params![id, name],
                )?,
            };
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
