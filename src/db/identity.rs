//! Identity store: `name`, `user_id` and `work_mode` as key/value rows.

use crate::errors::AppResult;
use crate::models::identity::Identity;
use rusqlite::{Connection, params};
use std::collections::HashMap;

const KEYS: [&str; 3] = ["name", "user_id", "work_mode"];

/// Load the stored identity. Returns `None` unless all three keys exist.
pub fn load_identity(conn: &Connection) -> AppResult<Option<Identity>> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM user_info")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut map = HashMap::new();
    for r in rows {
        let (k, v) = r?;
        map.insert(k, v);
    }

    match (map.remove("name"), map.remove("user_id"), map.remove("work_mode")) {
        (Some(name), Some(user_id), Some(work_mode)) => Ok(Some(Identity {
            name,
            user_id,
            work_mode,
        })),
        _ => Ok(None),
    }
}

pub fn save_identity(conn: &Connection, identity: &Identity) -> AppResult<()> {
    let values = [&identity.name, &identity.user_id, &identity.work_mode];

    let mut stmt = conn.prepare_cached(
        "INSERT INTO user_info (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )?;

    for (key, value) in KEYS.iter().zip(values) {
        stmt.execute(params![key, value])?;
    }

    Ok(())
}
