use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use core_types::{
    Note, NoteDraft, NoteId, Notebook, NotebookDraft, NotebookId, RecordStore, StoreError,
    StoreResult,
};
use storage_sqlite::SqliteStorage;
use thiserror::Error;
use tracing::{debug, info};

use crate::session::NotebookSession;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("notebook {0} is locked")]
    Locked(NotebookId),
}

/// Outcome of a password-gated settings edit. A wrong candidate is a retry
/// prompt for the caller, not a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsOutcome {
    Applied(Notebook),
    PasswordRejected,
}

pub struct AppServicesBuilder {
    pub db_path: PathBuf,
}

impl AppServicesBuilder {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_default_location() -> Result<Self> {
        let mut data_dir = dirs::data_local_dir().context("failed to resolve data_local_dir")?;
        data_dir.push("jotbook");
        let config = config::ConfigStore::from_default_location()?.load_or_init()?;
        Ok(Self::new(data_dir.join(config.database_filename)))
    }

    pub async fn build(self) -> Result<AppServices> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir {}", parent.display()))?;
        }

        let store = SqliteStorage::connect(&self.db_path).await?;
        info!(path = %self.db_path.display(), "record store opened");
        Ok(AppServices::with_store(Arc::new(store)))
    }
}

/// The handle the presentation layer owns for the process lifetime: opened
/// at startup, passed to whoever needs it, dropped at shutdown.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn RecordStore>,
}

impl AppServices {
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        self.store.list_notebooks().await
    }

    pub async fn create_notebook(&self, draft: NotebookDraft) -> StoreResult<Notebook> {
        self.store.create_notebook(draft).await
    }

    pub async fn update_notebook(
        &self,
        id: NotebookId,
        draft: NotebookDraft,
    ) -> StoreResult<Notebook> {
        self.store.update_notebook(id, draft).await
    }

    pub async fn delete_notebook(&self, id: NotebookId) -> StoreResult<()> {
        self.store.delete_notebook(id).await
    }

    pub async fn get_notebook(&self, id: NotebookId) -> StoreResult<Option<Notebook>> {
        self.store.get_notebook(id).await
    }

    pub async fn create_note(&self, notebook_id: NotebookId, draft: NoteDraft) -> StoreResult<Note> {
        self.store.create_note(notebook_id, draft).await
    }

    pub async fn update_note(&self, id: NoteId, draft: NoteDraft) -> StoreResult<Note> {
        self.store.update_note(id, draft).await
    }

    pub async fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        self.store.delete_note(id).await
    }

    pub async fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.store.get_note(id).await
    }

    pub async fn list_notes(&self, notebook_id: NotebookId) -> StoreResult<Vec<Note>> {
        self.store.list_notes(notebook_id).await
    }

    pub async fn open_notebook(&self, id: NotebookId) -> Result<NotebookSession, ServiceError> {
        let notebook = self
            .store
            .get_notebook(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id))?;
        Ok(NotebookSession::begin(notebook))
    }

    /// The notebook's notes, newest first, once the session has been
    /// unlocked. Listing a locked notebook surfaces as `ServiceError::Locked`.
    pub async fn visible_notes(&self, session: &NotebookSession) -> Result<Vec<Note>, ServiceError> {
        if !session.is_unlocked() {
            return Err(ServiceError::Locked(session.notebook_id()));
        }
        Ok(self.store.list_notes(session.notebook_id()).await?)
    }

    /// Applies a settings edit after re-checking the current password, the
    /// way the notebook settings form does: the caller supplies whatever
    /// the user typed, and a mismatch leaves the record untouched.
    pub async fn update_notebook_settings(
        &self,
        id: NotebookId,
        candidate_password: &str,
        draft: NotebookDraft,
    ) -> Result<SettingsOutcome, ServiceError> {
        let Some(current) = self.store.get_notebook(id).await? else {
            return Err(StoreError::not_found(id).into());
        };

        if !access_gate::check_password(&current, candidate_password) {
            debug!(notebook_id = %id, "settings update rejected: wrong password");
            return Ok(SettingsOutcome::PasswordRejected);
        }

        let updated = self.store.update_notebook(id, draft).await?;
        Ok(SettingsOutcome::Applied(updated))
    }
}
