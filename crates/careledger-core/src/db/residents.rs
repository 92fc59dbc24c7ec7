//! Resident operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, parse_income_types, Database};
use crate::error::{Error, Result};
use crate::models::{NewResident, Resident};

impl Database {
    /// Insert a resident, returning its new id
    pub fn insert_resident(&self, resident: &NewResident) -> Result<i64> {
        let conn = self.conn()?;
        let income_types = serde_json::to_string(&resident.income_types)?;
        conn.execute(
            r#"
            INSERT INTO residents (first_name, last_name, nursing_home_id, income_types)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                resident.first_name,
                resident.last_name,
                resident.nursing_home_id,
                income_types,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a resident by id
    pub fn get_resident(&self, id: i64) -> Result<Resident> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT id, first_name, last_name, nursing_home_id, income_types, created_at
            FROM residents WHERE id = ?1
            "#,
            params![id],
            map_resident,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Resident not found: {}", id)))
    }

    /// List residents, optionally scoped to one facility, ordered by name
    pub fn list_residents(&self, nursing_home_id: Option<i64>) -> Result<Vec<Resident>> {
        let conn = self.conn()?;
        let mut sql = String::from(
            r#"
            SELECT id, first_name, last_name, nursing_home_id, income_types, created_at
            FROM residents
            "#,
        );
        if nursing_home_id.is_some() {
            sql.push_str(" WHERE nursing_home_id = ?1");
        }
        sql.push_str(" ORDER BY last_name, first_name, id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = if let Some(home_id) = nursing_home_id {
            stmt.query_map(params![home_id], map_resident)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], map_resident)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    /// Delete a resident
    pub fn delete_resident(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM residents WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Resident not found: {}", id)));
        }
        Ok(())
    }
}

fn map_resident(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resident> {
    let income_types: Option<String> = row.get(4)?;
    let created_at_str: String = row.get(5)?;
    Ok(Resident {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        nursing_home_id: row.get(3)?,
        income_types: parse_income_types(income_types),
        created_at: parse_datetime(&created_at_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewNursingHome;

    fn facility(db: &Database, name: &str) -> i64 {
        db.insert_nursing_home(&NewNursingHome {
            name: name.to_string(),
            city: "Eugene".to_string(),
            state: "OR".to_string(),
            capacity: 40,
        })
        .unwrap()
    }

    #[test]
    fn test_resident_crud_with_income_types() {
        let db = Database::in_memory().unwrap();
        let home_id = facility(&db, "Cedar Ridge");

        let id = db
            .insert_resident(&NewResident {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                nursing_home_id: Some(home_id),
                income_types: vec!["SSI".to_string(), "Private Pay".to_string()],
            })
            .unwrap();

        let resident = db.get_resident(id).unwrap();
        assert_eq!(resident.full_name(), "Jane Doe");
        assert_eq!(resident.income_types, vec!["SSI", "Private Pay"]);
        assert_eq!(resident.nursing_home_id, Some(home_id));
    }

    #[test]
    fn test_list_residents_scoped_to_facility() {
        let db = Database::in_memory().unwrap();
        let a = facility(&db, "Cedar Ridge");
        let b = facility(&db, "Birch Hollow");

        for (first, home) in [("Ada", a), ("Ben", b), ("Cal", a)] {
            db.insert_resident(&NewResident {
                first_name: first.to_string(),
                last_name: "Smith".to_string(),
                nursing_home_id: Some(home),
                income_types: vec![],
            })
            .unwrap();
        }

        assert_eq!(db.list_residents(None).unwrap().len(), 3);
        let scoped = db.list_residents(Some(a)).unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|r| r.nursing_home_id == Some(a)));
    }

    #[test]
    fn test_resident_without_income_types_column() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO residents (first_name, last_name) VALUES ('No', 'Types')",
            [],
        )
        .unwrap();

        let residents = db.list_residents(None).unwrap();
        assert_eq!(residents.len(), 1);
        assert!(residents[0].income_types.is_empty());
        assert!(residents[0].nursing_home_id.is_none());
    }
}
