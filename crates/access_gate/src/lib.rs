use core_types::{Notebook, NotebookId};
use tracing::debug;

pub fn requires_password(notebook: &Notebook) -> bool {
    notebook
        .password
        .as_deref()
        .is_some_and(|password| !password.is_empty())
}

/// True when the notebook is unprotected, or when the candidate equals the
/// stored plaintext exactly.
pub fn check_password(notebook: &Notebook, candidate: &str) -> bool {
    !requires_password(notebook) || notebook.password.as_deref() == Some(candidate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// No password on the notebook; contents are viewable immediately.
    Open,
    Locked,
    Unlocked,
}

/// Access decision for one notebook within one view of it. Sessions are
/// values owned by the caller: leaving the notebook drops the session, and
/// the next visit starts over at `Locked` or `Open`.
#[derive(Debug, Clone)]
pub struct AccessSession {
    notebook_id: NotebookId,
    state: AccessState,
}

impl AccessSession {
    pub fn begin(notebook: &Notebook) -> Self {
        let state = if requires_password(notebook) {
            AccessState::Locked
        } else {
            AccessState::Open
        };
        Self {
            notebook_id: notebook.id,
            state,
        }
    }

    pub fn notebook_id(&self) -> NotebookId {
        self.notebook_id
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn can_view(&self) -> bool {
        matches!(self.state, AccessState::Open | AccessState::Unlocked)
    }

    /// Submits a candidate password. Returns whether the session may now
    /// view the notebook's notes. An incorrect candidate keeps the session
    /// `Locked`; it is a retry prompt for the caller, not a fault.
    pub fn submit(&mut self, notebook: &Notebook, candidate: &str) -> bool {
        if notebook.id != self.notebook_id {
            // a password entered for one notebook never opens another
            return false;
        }

        match self.state {
            AccessState::Open | AccessState::Unlocked => true,
            AccessState::Locked => {
                if check_password(notebook, candidate) {
                    self.state = AccessState::Unlocked;
                    true
                } else {
                    debug!(notebook_id = %self.notebook_id, "rejected password candidate");
                    false
                }
            }
        }
    }
}
