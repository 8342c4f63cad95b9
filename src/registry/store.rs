//! SQLite entity store

use crate::domain::{CollectedEntity, EntityRecord, Result, VeilError};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashSet;
use std::path::Path;

/// Rows touched by one bulk write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Entities seen for the first time
    pub inserted: usize,
    /// Existing entities whose `last_seen` advanced
    pub refreshed: usize,
}

/// Membership and update statements are chunked to stay under SQLite's
/// bound-parameter ceiling.
const IN_CHUNK: usize = 500;

/// Handle to the on-disk entity registry
pub struct EntityRegistry {
    conn: Connection,
}

impl EntityRegistry {
    /// Open (creating if needed) the registry at `path`
    ///
    /// Parent directories are created. The database runs in WAL mode with
    /// relaxed synchronous writes.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open an in-memory registry, for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entities (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_type   TEXT NOT NULL,
                original_name TEXT NOT NULL,
                slug_name     TEXT NOT NULL,
                full_hash     TEXT NOT NULL UNIQUE,
                first_seen    TEXT NOT NULL,
                last_seen     TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_entities_full_hash ON entities(full_hash);
            CREATE INDEX IF NOT EXISTS idx_entities_slug_name ON entities(slug_name);",
        )?;
        Ok(Self { conn })
    }

    /// Persist a batch of collected entities in one transaction
    ///
    /// Duplicate full hashes within the batch collapse to one row (first
    /// occurrence wins). Hashes already present keep their `original_name`,
    /// `slug_name` and `first_seen`; only `last_seen` advances. The whole
    /// write commits or rolls back atomically.
    pub fn bulk_upsert(&mut self, entities: &[CollectedEntity]) -> Result<UpsertOutcome> {
        if entities.is_empty() {
            return Ok(UpsertOutcome::default());
        }

        let mut seen = HashSet::new();
        let unique: Vec<&CollectedEntity> = entities
            .iter()
            .filter(|e| seen.insert(e.full_hash.as_str()))
            .collect();

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut outcome = UpsertOutcome::default();

        {
            let mut existing = HashSet::new();
            for chunk in unique.chunks(IN_CHUNK) {
                let placeholders = vec!["?"; chunk.len()].join(",");
                let sql = format!(
                    "SELECT full_hash FROM entities WHERE full_hash IN ({placeholders})"
                );
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt.query_map(
                    params_from_iter(chunk.iter().map(|e| e.full_hash.as_str())),
                    |row| row.get::<_, String>(0),
                )?;
                for hash in rows {
                    existing.insert(hash?);
                }
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO entities
                 (entity_type, original_name, slug_name, full_hash, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let fresh: Vec<&&CollectedEntity> = unique
                .iter()
                .filter(|e| !existing.contains(&e.full_hash))
                .collect();
            for entity in &fresh {
                insert.execute(params![
                    entity.entity_type.as_str(),
                    entity.normalized_text,
                    entity.display_hash,
                    entity.full_hash,
                    now,
                    now,
                ])?;
            }
            outcome.inserted = fresh.len();

            let stale: Vec<&str> = unique
                .iter()
                .filter(|e| existing.contains(&e.full_hash))
                .map(|e| e.full_hash.as_str())
                .collect();
            for chunk in stale.chunks(IN_CHUNK) {
                let placeholders = vec!["?"; chunk.len()].join(",");
                let sql = format!(
                    "UPDATE entities SET last_seen = ? WHERE full_hash IN ({placeholders})"
                );
                let mut stmt = tx.prepare(&sql)?;
                stmt.execute(params_from_iter(
                    std::iter::once(now.as_str()).chain(chunk.iter().copied()),
                ))?;
            }
            outcome.refreshed = stale.len();
        }

        tx.commit()?;
        tracing::debug!(
            inserted = outcome.inserted,
            refreshed = outcome.refreshed,
            "Registry write committed"
        );
        Ok(outcome)
    }

    /// Find the record whose stored display hash matches `display_hash`
    ///
    /// The match is a literal string comparison, never a prefix scan of full
    /// hashes. With truncated slug lengths several records can share a
    /// display hash; the lowest-id row wins.
    pub fn find_by_display_hash(&self, display_hash: &str) -> Result<Option<EntityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT entity_type, original_name, slug_name, full_hash, first_seen, last_seen
             FROM entities WHERE slug_name = ?1 ORDER BY id LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![display_hash], |row| {
            Ok(EntityRecord {
                entity_type: row.get(0)?,
                original_text: row.get(1)?,
                display_hash: row.get(2)?,
                full_hash: row.get(3)?,
                first_seen: row.get(4)?,
                last_seen: row.get(5)?,
            })
        })?;
        match rows.next() {
            Some(record) => Ok(Some(record?)),
            None => Ok(None),
        }
    }

    /// Find the record for a canonical full hash
    pub fn find_by_full_hash(&self, full_hash: &str) -> Result<Option<EntityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT entity_type, original_name, slug_name, full_hash, first_seen, last_seen
             FROM entities WHERE full_hash = ?1",
        )?;
        let mut rows = stmt.query_map(params![full_hash], |row| {
            Ok(EntityRecord {
                entity_type: row.get(0)?,
                original_text: row.get(1)?,
                display_hash: row.get(2)?,
                full_hash: row.get(3)?,
                first_seen: row.get(4)?,
                last_seen: row.get(5)?,
            })
        })?;
        match rows.next() {
            Some(record) => Ok(Some(record?)),
            None => Ok(None),
        }
    }

    /// Total rows in the registry
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entities", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|e| VeilError::Registry(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;

    fn entity(text: &str, hash: &str) -> CollectedEntity {
        CollectedEntity {
            entity_type: EntityType::Person,
            normalized_text: text.to_string(),
            display_hash: hash.to_string(),
            full_hash: hash.to_string(),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut reg = EntityRegistry::open_in_memory().unwrap();
        let outcome = reg.bulk_upsert(&[entity("John Doe", "abc123")]).unwrap();
        assert_eq!(outcome, UpsertOutcome { inserted: 1, refreshed: 0 });

        let record = reg.find_by_display_hash("abc123").unwrap().unwrap();
        assert_eq!(record.original_text, "John Doe");
        assert_eq!(record.entity_type, "PERSON");
        assert_eq!(record.first_seen, record.last_seen);
    }

    #[test]
    fn test_repeat_write_is_idempotent() {
        let mut reg = EntityRegistry::open_in_memory().unwrap();
        reg.bulk_upsert(&[entity("John Doe", "abc123")]).unwrap();
        let first = reg.find_by_display_hash("abc123").unwrap().unwrap();

        let outcome = reg.bulk_upsert(&[entity("John Doe", "abc123")]).unwrap();
        assert_eq!(outcome, UpsertOutcome { inserted: 0, refreshed: 1 });
        assert_eq!(reg.count().unwrap(), 1);

        let second = reg.find_by_display_hash("abc123").unwrap().unwrap();
        assert_eq!(second.first_seen, first.first_seen);
        assert_eq!(second.original_text, first.original_text);
    }

    #[test]
    fn test_in_batch_dedup_first_wins() {
        let mut reg = EntityRegistry::open_in_memory().unwrap();
        let outcome = reg
            .bulk_upsert(&[entity("first", "dup"), entity("second", "dup")])
            .unwrap();
        assert_eq!(outcome, UpsertOutcome { inserted: 1, refreshed: 0 });
        assert_eq!(reg.count().unwrap(), 1);

        let record = reg.find_by_display_hash("dup").unwrap().unwrap();
        assert_eq!(record.original_text, "first");
    }

    #[test]
    fn test_missing_display_hash() {
        let reg = EntityRegistry::open_in_memory().unwrap();
        assert!(reg.find_by_display_hash("nope").unwrap().is_none());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut reg = EntityRegistry::open_in_memory().unwrap();
        assert_eq!(reg.bulk_upsert(&[]).unwrap(), UpsertOutcome::default());
        assert_eq!(reg.count().unwrap(), 0);
    }

    #[test]
    fn test_on_disk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db").join("entities.db");
        {
            let mut reg = EntityRegistry::open(&db_path).unwrap();
            reg.bulk_upsert(&[entity("persisted", "ff00")]).unwrap();
        }
        let reg = EntityRegistry::open(&db_path).unwrap();
        assert_eq!(reg.count().unwrap(), 1);
        assert!(reg.find_by_full_hash("ff00").unwrap().is_some());
    }
}
