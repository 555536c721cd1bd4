use async_trait::async_trait;

use crate::error::StoreResult;
use crate::note::{Note, NoteDraft, NoteId};
use crate::notebook::{Notebook, NotebookDraft, NotebookId};

/// Durable CRUD over notebook and note records. Implementations re-validate
/// drafts themselves; they never trust the caller's validation. Every
/// mutation is persisted before the call returns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_notebook(&self, draft: NotebookDraft) -> StoreResult<Notebook>;
    async fn update_notebook(&self, id: NotebookId, draft: NotebookDraft) -> StoreResult<Notebook>;
    /// Removes the notebook and every note it owns, atomically. Deleting an
    /// absent id is a no-op.
    async fn delete_notebook(&self, id: NotebookId) -> StoreResult<()>;
    async fn get_notebook(&self, id: NotebookId) -> StoreResult<Option<Notebook>>;
    /// Ordered by creation date, oldest first.
    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>>;

    async fn create_note(&self, notebook_id: NotebookId, draft: NoteDraft) -> StoreResult<Note>;
    /// Wholesale field replacement; the owning notebook never changes.
    async fn update_note(&self, id: NoteId, draft: NoteDraft) -> StoreResult<Note>;
    async fn delete_note(&self, id: NoteId) -> StoreResult<()>;
    async fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// Ordered by creation date, newest first.
    async fn list_notes(&self, notebook_id: NotebookId) -> StoreResult<Vec<Note>>;
}
