use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::HexColor;
use crate::error::ValidationError;
use crate::notebook::NotebookId;
use crate::validate::{require_non_empty, require_not_future};

pub type NoteId = Uuid;

pub const HAPPINESS_MIN: u8 = 1;
pub const HAPPINESS_MAX: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub notebook_id: NotebookId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    pub happiness: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub color: Option<HexColor>,
    pub happiness: u8,
    pub created_at: DateTime<Utc>,
}

impl NoteDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        happiness: u8,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: None,
            happiness,
            created_at,
        }
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)?;
        require_not_future("created_at", self.created_at)?;
        if !(HAPPINESS_MIN..=HAPPINESS_MAX).contains(&self.happiness) {
            return Err(ValidationError::new(
                "happiness",
                format!("must be between {HAPPINESS_MIN} and {HAPPINESS_MAX}"),
            ));
        }
        Ok(())
    }
}

impl Note {
    pub fn from_draft(notebook_id: NotebookId, draft: NoteDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            notebook_id,
            name: draft.name,
            description: draft.description,
            color: draft.color,
            happiness: draft.happiness,
            created_at: draft.created_at,
        }
    }
}
