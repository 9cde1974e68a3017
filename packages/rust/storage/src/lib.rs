//! libSQL-backed lookup table (`docSet.dsidx`).
//!
//! The [`SearchIndex`] struct wraps the single `searchIndex` table that
//! Dash-compatible viewers query by name. Rows are unique over
//! `(name, type, path)`; re-inserting an existing triple is a silent no-op.

use std::path::Path;

use docsetgen_shared::{DocsetError, EntryType, IndexRecord, Result};
use libsql::{Connection, Database, params};
use tracing::debug;

/// File name of the lookup table inside `Contents/Resources`.
pub const INDEX_FILE_NAME: &str = "docSet.dsidx";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS searchIndex(id INTEGER PRIMARY KEY, name TEXT, type TEXT, path TEXT);
CREATE UNIQUE INDEX IF NOT EXISTS anchor ON searchIndex (name, type, path);
"#;

/// Handle to a docset lookup table.
pub struct SearchIndex {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl SearchIndex {
    /// Create a fresh lookup table at `path`, replacing any existing file.
    pub async fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| DocsetError::io(path, e))?;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
        }

        let index = Self::connect(path).await?;
        index
            .conn
            .execute_batch(SCHEMA)
            .await
            .map_err(|e| DocsetError::Storage(format!("creating searchIndex failed: {e}")))?;

        debug!(path = %path.display(), "created lookup table");
        Ok(index)
    }

    /// Open an existing lookup table.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DocsetError::validation(format!(
                "lookup table not found at {}",
                path.display()
            )));
        }
        Self::connect(path).await
    }

    async fn connect(path: &Path) -> Result<Self> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        Ok(Self { db, conn })
    }

    /// Insert one record. Returns `false` when the triple already existed.
    pub async fn insert(&self, record: &IndexRecord) -> Result<bool> {
        insert_row(&self.conn, record).await
    }

    /// Insert all records in one transaction. Returns how many were new.
    pub async fn insert_all(&self, records: &[IndexRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let mut inserted = 0;
        for record in records {
            if insert_row(&tx, record).await? {
                inserted += 1;
            } else {
                debug!(name = %record.name, path = %record.path, "duplicate lookup entry skipped");
            }
        }

        tx.commit()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        Ok(inserted)
    }

    /// All rows, ordered by path, type and name.
    pub async fn records(&self) -> Result<Vec<IndexRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT name, type, path FROM searchIndex ORDER BY path, type, name",
                params![],
            )
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?
        {
            let entry_type: String = row
                .get(1)
                .map_err(|e| DocsetError::Storage(e.to_string()))?;
            results.push(IndexRecord {
                name: row
                    .get::<String>(0)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?,
                entry_type: entry_type.parse::<EntryType>().map_err(DocsetError::Storage)?,
                path: row
                    .get::<String>(2)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?,
            });
        }
        Ok(results)
    }

    /// Number of rows in the table.
    pub async fn count(&self) -> Result<usize> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM searchIndex", params![])
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let n = row
                    .get::<i64>(0)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?;
                Ok(usize::try_from(n).unwrap_or_default())
            }
            Ok(None) => Ok(0),
            Err(e) => Err(DocsetError::Storage(e.to_string())),
        }
    }
}

async fn insert_row(conn: &Connection, record: &IndexRecord) -> Result<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)",
            params![
                record.name.as_str(),
                record.entry_type.as_str(),
                record.path.as_str()
            ],
        )
        .await
        .map_err(|e| DocsetError::Storage(e.to_string()))?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_db() -> PathBuf {
        std::env::temp_dir()
            .join(format!("docsetgen-index-test-{}", Uuid::now_v7()))
            .join(INDEX_FILE_NAME)
    }

    fn record(name: &str, entry_type: EntryType, path: &str) -> IndexRecord {
        IndexRecord {
            name: name.into(),
            entry_type,
            path: path.into(),
        }
    }

    #[tokio::test]
    async fn create_and_insert() {
        let path = temp_db();
        let index = SearchIndex::create(&path).await.expect("create");

        let inserted = index
            .insert(&record("The ls command", EntryType::Command, "commands/commands_ls.html"))
            .await
            .expect("insert");
        assert!(inserted);
        assert_eq!(index.count().await.unwrap(), 1);

        let rows = index.records().await.unwrap();
        assert_eq!(
            rows,
            vec![record("The ls command", EntryType::Command, "commands/commands_ls.html")]
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn duplicate_triple_is_ignored() {
        let path = temp_db();
        let index = SearchIndex::create(&path).await.unwrap();
        let row = record("Intro", EntryType::Guide, "book/book_intro.html");

        assert!(index.insert(&row).await.unwrap());
        assert!(!index.insert(&row).await.unwrap());
        assert_eq!(index.count().await.unwrap(), 1);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn same_title_different_path_is_kept() {
        let path = temp_db();
        let index = SearchIndex::create(&path).await.unwrap();

        let rows = vec![
            record("Overview", EntryType::Guide, "book/book_overview.html"),
            record("Overview", EntryType::Guide, "cookbook/cookbook_overview.html"),
            record("Overview", EntryType::Command, "book/book_overview.html"),
            record("Overview", EntryType::Guide, "book/book_overview.html"),
        ];
        let inserted = index.insert_all(&rows).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(index.count().await.unwrap(), 3);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn create_replaces_existing_table() {
        let path = temp_db();
        {
            let index = SearchIndex::create(&path).await.unwrap();
            index
                .insert(&record("Old", EntryType::Guide, "book/book_old.html"))
                .await
                .unwrap();
        }

        let index = SearchIndex::create(&path).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn reopen_reads_committed_rows() {
        let path = temp_db();
        {
            let index = SearchIndex::create(&path).await.unwrap();
            index
                .insert_all(&[
                    record("b", EntryType::Guide, "book/book_b.html"),
                    record("a", EntryType::Guide, "book/book_a.html"),
                ])
                .await
                .unwrap();
        }

        let index = SearchIndex::open(&path).await.expect("open");
        let paths: Vec<_> = index
            .records()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["book/book_a.html", "book/book_b.html"]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn open_missing_table_fails() {
        let path = temp_db();
        let err = SearchIndex::open(&path).await.err().expect("missing file");
        assert!(err.to_string().contains("lookup table not found"));
    }
}
