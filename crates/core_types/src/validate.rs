use chrono::{DateTime, Utc};

use crate::error::ValidationError;

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_not_future(
    field: &'static str,
    value: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if value > Utc::now() {
        return Err(ValidationError::new(field, "must not be in the future"));
    }
    Ok(())
}
