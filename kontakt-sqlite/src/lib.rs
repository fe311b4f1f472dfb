#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

use diesel::migration::RunMigrationsError;
use diesel::prelude::*;
use kontakt_storage_interface::KeyValueStore;
use thiserror::Error;

pub mod entry;

mod schema;

embed_migrations!();

type DieselError = diesel::result::Error;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to open database: {0}")]
    Connection(#[from] ConnectionError),
    #[error("failed to migrate database: {0}")]
    Migration(#[from] RunMigrationsError),
}

/// Key-value store kept in a single SQLite table.
pub struct KontaktConnection {
    conn: SqliteConnection,
}

impl KontaktConnection {
    /// Opens (or creates) the database at `url` and brings its schema up to
    /// date.
    pub fn connect(url: &str) -> Result<KontaktConnection, ConnectError> {
        let conn = SqliteConnection::establish(url)?;
        embedded_migrations::run(&conn)?;
        log::debug!("connected to {}", url);
        Ok(KontaktConnection { conn })
    }

    pub fn entry(&self, needle: &str) -> Result<Option<entry::Entry>, DieselError> {
        use schema::entries::dsl::*;

        entries
            .find(needle)
            .first::<entry::Entry>(&self.conn)
            .optional()
    }

    pub fn list_keys(&self) -> Result<Vec<String>, DieselError> {
        use schema::entries::dsl;

        dsl::entries
            .select(dsl::key)
            .order_by(dsl::key.asc())
            .load::<String>(&self.conn)
    }
}

impl KeyValueStore for KontaktConnection {
    type ReadError = DieselError;
    type WriteError = DieselError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        use schema::entries::dsl;

        dsl::entries
            .find(key)
            .select(dsl::value)
            .first::<String>(&self.conn)
            .optional()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        // key is the primary key, so this replaces the row and refreshes
        // updated_at through the column default.
        diesel::replace_into(schema::entries::table)
            .values(&entry::NewEntry { key, value })
            .execute(&self.conn)?;
        log::debug!("stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        use schema::entries::dsl;

        let removed = diesel::delete(dsl::entries.find(key)).execute(&self.conn)?;
        log::debug!("removed {} ({} rows)", key, removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let conn = KontaktConnection::connect(":memory:").unwrap();
        assert_eq!(conn.get("contactsData").unwrap(), None);
        assert!(conn.entry("contactsData").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let conn = KontaktConnection::connect(":memory:").unwrap();
        conn.set("contactsData", "[]").unwrap();
        conn.set("contactsData", r#"[{"id":1}]"#).unwrap();
        conn.set("other", "x").unwrap();

        assert_eq!(
            conn.get("contactsData").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert_eq!(conn.list_keys().unwrap(), vec!["contactsData", "other"]);

        let entry = conn.entry("other").unwrap().unwrap();
        assert_eq!(entry.key, "other");
        assert_eq!(entry.value, "x");

        conn.remove("contactsData").unwrap();
        conn.remove("contactsData").unwrap();
        assert_eq!(conn.get("contactsData").unwrap(), None);
        assert_eq!(conn.list_keys().unwrap(), vec!["other"]);
    }

    #[test]
    fn values_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kontakt.sqlite");
        let url = path.to_str().unwrap();

        KontaktConnection::connect(url)
            .unwrap()
            .set("contactsData", "[]")
            .unwrap();

        let conn = KontaktConnection::connect(url).unwrap();
        assert_eq!(conn.get("contactsData").unwrap().as_deref(), Some("[]"));
    }
}
