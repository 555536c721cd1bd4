use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{
    HexColor, Note, NoteDraft, NoteId, Notebook, NotebookDraft, NotebookId, RecordStore,
    StoreError, StoreResult,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

mod migrations;

use migrations::MIGRATIONS;

pub const CURRENT_DB_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}",
            path.as_ref().to_string_lossy()
        ))?
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let storage = Self { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let storage = Self { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    async fn migrate(&self) -> Result<()> {
        for sql in MIGRATIONS {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed migration sql: {sql}"))?;
        }

        sqlx::query(
            r#"
            INSERT INTO metadata(key, value)
            VALUES ('schema_version', ?1)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(CURRENT_DB_SCHEMA_VERSION.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn schema_version(&self) -> Result<u32> {
        let row = sqlx::query("SELECT value FROM metadata WHERE key = 'schema_version'")
            .fetch_one(&self.pool)
            .await?;
        let version = row.get::<String, _>("value").parse::<u32>()?;
        Ok(version)
    }
}

#[async_trait]
impl RecordStore for SqliteStorage {
    async fn create_notebook(&self, draft: NotebookDraft) -> StoreResult<Notebook> {
        draft.validate()?;
        let notebook = Notebook::from_draft(draft);

        sqlx::query(
            r#"
            INSERT INTO notebooks(id, name, description, password, image, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(notebook.id.to_string())
        .bind(&notebook.name)
        .bind(&notebook.description)
        .bind(notebook.password.as_deref())
        .bind(notebook.image.as_deref())
        .bind(notebook.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        Ok(notebook)
    }

    async fn update_notebook(&self, id: NotebookId, draft: NotebookDraft) -> StoreResult<Notebook> {
        draft.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE notebooks
            SET name = ?2, description = ?3, password = ?4, image = ?5, created_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.password.as_deref())
        .bind(draft.image.as_deref())
        .bind(draft.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(id));
        }

        Ok(Notebook {
            id,
            name: draft.name,
            description: draft.description,
            password: draft.password,
            image: draft.image,
            created_at: draft.created_at,
        })
    }

    async fn delete_notebook(&self, id: NotebookId) -> StoreResult<()> {
        // notes are removed in the same transaction as the notebook row; the
        // FK cascade is not relied on
        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        sqlx::query("DELETE FROM notes WHERE notebook_id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        sqlx::query("DELETE FROM notebooks WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        tx.commit().await.map_err(StoreError::storage)?;
        Ok(())
    }

    async fn get_notebook(&self, id: NotebookId) -> StoreResult<Option<Notebook>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, password, image, created_at
            FROM notebooks WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        row.map(map_notebook_row)
            .transpose()
            .map_err(StoreError::storage)
    }

    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, password, image, created_at
            FROM notebooks ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        rows.into_iter()
            .map(map_notebook_row)
            .collect::<Result<Vec<_>>>()
            .map_err(StoreError::storage)
    }

    async fn create_note(&self, notebook_id: NotebookId, draft: NoteDraft) -> StoreResult<Note> {
        draft.validate()?;

        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        let owner = sqlx::query("SELECT id FROM notebooks WHERE id = ?1")
            .bind(notebook_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::storage)?;
        if owner.is_none() {
            return Err(StoreError::not_found(notebook_id));
        }

        let note = Note::from_draft(notebook_id, draft);
        sqlx::query(
            r#"
            INSERT INTO notes(id, notebook_id, name, description, color, happiness, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(note.id.to_string())
        .bind(note.notebook_id.to_string())
        .bind(&note.name)
        .bind(&note.description)
        .bind(note.color.map(|color| color.encode()))
        .bind(i64::from(note.happiness))
        .bind(note.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::storage)?;

        tx.commit().await.map_err(StoreError::storage)?;
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, draft: NoteDraft) -> StoreResult<Note> {
        draft.validate()?;

        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        let row = sqlx::query("SELECT notebook_id FROM notes WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::storage)?;
        let Some(row) = row else {
            return Err(StoreError::not_found(id));
        };
        let notebook_id = Uuid::parse_str(row.get::<String, _>("notebook_id").as_str())
            .context("invalid notebook id in database")
            .map_err(StoreError::storage)?;

        sqlx::query(
            r#"
            UPDATE notes
            SET name = ?2, description = ?3, color = ?4, happiness = ?5, created_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.color.map(|color| color.encode()))
        .bind(i64::from(draft.happiness))
        .bind(draft.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::storage)?;

        tx.commit().await.map_err(StoreError::storage)?;

        Ok(Note {
            id,
            notebook_id,
            name: draft.name,
            description: draft.description,
            color: draft.color,
            happiness: draft.happiness,
            created_at: draft.created_at,
        })
    }

    async fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StoreError::storage)?;
        Ok(())
    }

    async fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let row = sqlx::query(
            r#"
            SELECT id, notebook_id, name, description, color, happiness, created_at
            FROM notes WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        row.map(map_note_row).transpose().map_err(StoreError::storage)
    }

    async fn list_notes(&self, notebook_id: NotebookId) -> StoreResult<Vec<Note>> {
        let rows = sqlx::query(
            r#"
            SELECT id, notebook_id, name, description, color, happiness, created_at
            FROM notes WHERE notebook_id = ?1 ORDER BY created_at DESC
            "#,
        )
        .bind(notebook_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        rows.into_iter()
            .map(map_note_row)
            .collect::<Result<Vec<_>>>()
            .map_err(StoreError::storage)
    }
}

fn map_notebook_row(row: SqliteRow) -> Result<Notebook> {
    Ok(Notebook {
        id: Uuid::parse_str(row.get::<String, _>("id").as_str())?,
        name: row.get("name"),
        description: row.get("description"),
        password: row.get("password"),
        image: row.get("image"),
        created_at: parse_rfc3339(row.get::<String, _>("created_at"))?,
    })
}

fn map_note_row(row: SqliteRow) -> Result<Note> {
    let color = row
        .get::<Option<String>, _>("color")
        .map(|value| value.parse::<HexColor>())
        .transpose()
        .context("invalid color in database")?;
    let happiness = u8::try_from(row.get::<i64, _>("happiness"))
        .context("happiness out of range in database")?;

    Ok(Note {
        id: Uuid::parse_str(row.get::<String, _>("id").as_str())?,
        notebook_id: Uuid::parse_str(row.get::<String, _>("notebook_id").as_str())?,
        name: row.get("name"),
        description: row.get("description"),
        color,
        happiness,
        created_at: parse_rfc3339(row.get::<String, _>("created_at"))?,
    })
}

fn parse_rfc3339(value: String) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(&value)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn creates_and_reads_back_a_notebook() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let schema_version = storage.schema_version().await.expect("schema version");
        assert_eq!(schema_version, CURRENT_DB_SCHEMA_VERSION);

        let draft = NotebookDraft::new("Trip", "2024 trip", Utc::now())
            .with_password("abcd")
            .with_image(vec![0xFF, 0xD8, 0xFF]);
        let created = storage.create_notebook(draft.clone()).await.expect("create");

        assert_eq!(created.name, draft.name);
        assert_eq!(created.description, draft.description);
        assert_eq!(created.password, draft.password);
        assert_eq!(created.image, draft.image);
        assert_eq!(created.created_at, draft.created_at);

        let fetched = storage.get_notebook(created.id).await.expect("get");
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn rejects_invalid_drafts_with_the_offending_field() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let now = Utc::now();

        let err = storage
            .create_notebook(NotebookDraft::new("", "x", now))
            .await
            .expect_err("empty name");
        assert!(matches!(err, StoreError::Validation(inner) if inner.field == "name"));

        let err = storage
            .create_notebook(NotebookDraft::new("Trip", "x", now + Duration::days(1)))
            .await
            .expect_err("future date");
        assert!(matches!(err, StoreError::Validation(inner) if inner.field == "created_at"));

        let notebook = storage
            .create_notebook(NotebookDraft::new("Trip", "2024 trip", now))
            .await
            .expect("create notebook");
        let err = storage
            .create_note(notebook.id, NoteDraft::new("Day1", "Beach", 6, now))
            .await
            .expect_err("happiness out of range");
        assert!(matches!(err, StoreError::Validation(inner) if inner.field == "happiness"));
    }

    #[tokio::test]
    async fn note_creation_requires_an_existing_notebook() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let dangling = Uuid::new_v4();
        let err = storage
            .create_note(dangling, NoteDraft::new("Day1", "Beach", 3, Utc::now()))
            .await
            .expect_err("dangling notebook id");
        assert!(matches!(err, StoreError::NotFound { id } if id == dangling));
    }

    #[tokio::test]
    async fn notes_round_trip_color_and_happiness() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let notebook = storage
            .create_notebook(NotebookDraft::new("Trip", "2024 trip", Utc::now()))
            .await
            .expect("create notebook");

        let draft = NoteDraft::new("Day1", "Beach", 5, Utc::now())
            .with_color(HexColor::new(0x1A, 0x2B, 0x3C));
        let created = storage.create_note(notebook.id, draft).await.expect("create note");

        let fetched = storage
            .get_note(created.id)
            .await
            .expect("get note")
            .expect("note exists");
        assert_eq!(fetched, created);
        assert_eq!(fetched.color.expect("color").encode(), "#1A2B3C");
    }

    #[tokio::test]
    async fn listings_are_ordered_by_creation_date() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let now = Utc::now();

        let older = storage
            .create_notebook(NotebookDraft::new("Older", "first", now - Duration::hours(2)))
            .await
            .expect("create older");
        let newer = storage
            .create_notebook(NotebookDraft::new("Newer", "second", now - Duration::hours(1)))
            .await
            .expect("create newer");

        let notebooks = storage.list_notebooks().await.expect("list notebooks");
        assert_eq!(
            notebooks.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![older.id, newer.id]
        );

        let first = storage
            .create_note(older.id, NoteDraft::new("T1", "x", 1, now - Duration::minutes(30)))
            .await
            .expect("create first note");
        let second = storage
            .create_note(older.id, NoteDraft::new("T2", "x", 1, now - Duration::minutes(10)))
            .await
            .expect("create second note");

        let notes = storage.list_notes(older.id).await.expect("list notes");
        assert_eq!(
            notes.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        // the other notebook's listing stays empty
        assert!(storage.list_notes(newer.id).await.expect("list other").is_empty());
    }

    #[tokio::test]
    async fn deleting_a_notebook_cascades_to_its_notes() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let now = Utc::now();

        let notebook = storage
            .create_notebook(NotebookDraft::new("Trip", "2024 trip", now))
            .await
            .expect("create notebook");
        for name in ["Day1", "Day2"] {
            storage
                .create_note(notebook.id, NoteDraft::new(name, "entry", 3, now))
                .await
                .expect("create note");
        }

        storage.delete_notebook(notebook.id).await.expect("delete");
        assert_eq!(storage.get_notebook(notebook.id).await.expect("get"), None);
        assert!(storage.list_notes(notebook.id).await.expect("list").is_empty());

        // idempotent: deleting again is a no-op
        storage.delete_notebook(notebook.id).await.expect("re-delete");
    }

    #[tokio::test]
    async fn updates_replace_fields_wholesale() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let now = Utc::now();

        let notebook = storage
            .create_notebook(
                NotebookDraft::new("Trip", "2024 trip", now).with_password("abcd"),
            )
            .await
            .expect("create notebook");

        let updated = storage
            .update_notebook(notebook.id, NotebookDraft::new("Trip 2", "2025 trip", now))
            .await
            .expect("update notebook");
        assert_eq!(updated.name, "Trip 2");
        // the draft carried no password, so the stored record has none now
        assert_eq!(updated.password, None);
        assert_eq!(
            storage.get_notebook(notebook.id).await.expect("get"),
            Some(updated)
        );

        let note = storage
            .create_note(notebook.id, NoteDraft::new("Day1", "Beach", 3, now))
            .await
            .expect("create note");
        let updated = storage
            .update_note(note.id, NoteDraft::new("Day1b", "Harbor", 4, now))
            .await
            .expect("update note");
        assert_eq!(updated.notebook_id, notebook.id);
        assert_eq!(updated.happiness, 4);
        assert_eq!(
            storage.get_note(note.id).await.expect("get note"),
            Some(updated)
        );

        let missing = Uuid::new_v4();
        let err = storage
            .update_note(missing, NoteDraft::new("x", "y", 1, now))
            .await
            .expect_err("absent note");
        assert!(matches!(err, StoreError::NotFound { id } if id == missing));
    }

    #[tokio::test]
    async fn deleting_a_single_note_is_idempotent() {
        let storage = SqliteStorage::in_memory().await.expect("storage");
        let now = Utc::now();
        let notebook = storage
            .create_notebook(NotebookDraft::new("Trip", "2024 trip", now))
            .await
            .expect("create notebook");
        let note = storage
            .create_note(notebook.id, NoteDraft::new("Day1", "Beach", 3, now))
            .await
            .expect("create note");

        storage.delete_note(note.id).await.expect("delete");
        assert_eq!(storage.get_note(note.id).await.expect("get"), None);
        storage.delete_note(note.id).await.expect("re-delete");

        // the owning notebook is untouched
        assert!(storage.get_notebook(notebook.id).await.expect("get").is_some());
    }
}
