//! Facility operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewNursingHome, NursingHome};

impl Database {
    /// Insert a nursing home, returning its new id
    pub fn insert_nursing_home(&self, home: &NewNursingHome) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO nursing_homes (name, city, state, capacity) VALUES (?1, ?2, ?3, ?4)",
            params![home.name, home.city, home.state, home.capacity],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a nursing home by id
    pub fn get_nursing_home(&self, id: i64) -> Result<NursingHome> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, city, state, capacity, created_at FROM nursing_homes WHERE id = ?1",
            params![id],
            map_nursing_home,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Nursing home not found: {}", id)))
    }

    /// List all nursing homes, ordered by name
    pub fn list_nursing_homes(&self) -> Result<Vec<NursingHome>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, city, state, capacity, created_at FROM nursing_homes ORDER BY name, id",
        )?;

        let rows = stmt.query_map([], map_nursing_home)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Delete a nursing home
    pub fn delete_nursing_home(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM nursing_homes WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Nursing home not found: {}", id)));
        }
        Ok(())
    }
}

fn map_nursing_home(row: &rusqlite::Row<'_>) -> rusqlite::Result<NursingHome> {
    let created_at_str: String = row.get(5)?;
    Ok(NursingHome {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        capacity: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}
