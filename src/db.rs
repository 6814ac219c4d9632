use crate::error::StorageError;
use crate::model::{Bookmark, BookmarkDraft, BookmarkUpdate};
use chrono::{SecondsFormat, Utc};
use libsql::{Builder, Connection};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] = &[(
    "system/000_migrations_table.sql",
    include_str!("migrations/system/000_migrations_table.sql"),
)];

const MIGRATIONS: &[(&str, &str)] = &[("001_schema.sql", include_str!("migrations/001_schema.sql"))];

pub struct Database {
    conn: Connection,
}

impl Database {
    pub async fn new(db_path: &Path) -> Result<Self, StorageError> {
        let db = Builder::new_local(db_path).build().await?;
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        for (filename, sql) in MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool, StorageError> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                // The bootstrap migration runs before _migrations exists.
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<(), StorageError> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<(), StorageError> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql).await?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    fn now_rfc3339() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn join_tags(tags: &[String]) -> String {
        tags.join(",")
    }

    // Inverse of join_tags, and just as lossy: a tag containing a comma comes
    // back as two tags, and an untagged bookmark comes back as [""].
    fn split_tags(tags: &str) -> Vec<String> {
        tags.split(',').map(|t| t.to_string()).collect()
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark, StorageError> {
        let tags: String = row.get(4)?;
        Ok(Bookmark {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            tags: Self::split_tags(&tags),
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    pub async fn save_bookmark(&self, draft: &BookmarkDraft) -> Result<(), StorageError> {
        let query = r#"
            INSERT INTO bookmarks (url, title, description, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let now = Self::now_rfc3339();
        self.conn
            .execute(
                query,
                libsql::params![
                    draft.url.as_str(),
                    draft.title.as_str(),
                    draft.description.as_str(),
                    Self::join_tags(&draft.tags),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;

        Ok(())
    }

    pub async fn get_bookmark_by_url(&self, url: &str) -> Result<Option<Bookmark>, StorageError> {
        let query = r#"
            SELECT id, url, title, description, tags, created_at, updated_at
            FROM bookmarks
            WHERE url = ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![url]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_all_bookmarks(&self) -> Result<Vec<Bookmark>, StorageError> {
        let query = r#"
            SELECT id, url, title, description, tags, created_at, updated_at
            FROM bookmarks
            ORDER BY created_at DESC
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    /// Overwrites every mutable field of the row matching `update.id` and
    /// refreshes updated_at. No existence check: updating an absent id is a
    /// silent no-op, which callers must account for.
    pub async fn update_bookmark(&self, update: &BookmarkUpdate) -> Result<(), StorageError> {
        let query = r#"
            UPDATE bookmarks
            SET url = ?, title = ?, description = ?, tags = ?, updated_at = ?
            WHERE id = ?
        "#;

        self.conn
            .execute(
                query,
                libsql::params![
                    update.url.as_str(),
                    update.title.as_str(),
                    update.description.as_str(),
                    Self::join_tags(&update.tags),
                    Self::now_rfc3339(),
                    update.id
                ],
            )
            .await?;

        Ok(())
    }

    /// Deleting an absent id is likewise a silent no-op.
    pub async fn delete_bookmark(&self, id: i64) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;

        Ok(())
    }
}
