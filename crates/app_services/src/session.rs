use access_gate::{AccessSession, AccessState};
use core_types::{Notebook, NotebookId};

/// One view of one notebook: the record snapshot plus its access session.
/// Dropping the session is how a caller "leaves" the notebook; the next
/// `open_notebook` starts the access flow over.
#[derive(Debug, Clone)]
pub struct NotebookSession {
    notebook: Notebook,
    access: AccessSession,
}

impl NotebookSession {
    pub(crate) fn begin(notebook: Notebook) -> Self {
        let access = AccessSession::begin(&notebook);
        Self { notebook, access }
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn notebook_id(&self) -> NotebookId {
        self.notebook.id
    }

    pub fn requires_password(&self) -> bool {
        access_gate::requires_password(&self.notebook)
    }

    pub fn state(&self) -> AccessState {
        self.access.state()
    }

    pub fn is_unlocked(&self) -> bool {
        self.access.can_view()
    }

    pub fn unlock(&mut self, candidate: &str) -> bool {
        self.access.submit(&self.notebook, candidate)
    }
}
