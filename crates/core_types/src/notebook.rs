use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validate::{require_non_empty, require_not_future};

pub type NotebookId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: NotebookId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, with = "blob_b64", skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

/// The full caller-supplied state for a notebook save. Updates replace the
/// stored record wholesale; there are no partial-field semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, with = "blob_b64")]
    pub image: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

impl NotebookDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            password: None,
            image: None,
            created_at,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)?;
        require_not_future("created_at", self.created_at)?;
        Ok(())
    }
}

impl Notebook {
    pub fn from_draft(draft: NotebookDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            password: draft.password,
            image: draft.image,
            created_at: draft.created_at,
        }
    }
}

mod blob_b64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&BASE64.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|text| BASE64.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
