use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A complaint as persisted in the complaint store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// Milliseconds since the Unix epoch at submission time.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An unvalidated complaint submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required fields are empty: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl NewComplaint {
    /// Trim every field and turn the submission into a stored [`Complaint`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] listing every field that is
    /// blank after trimming.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Complaint, ValidationError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let description = self.description.trim().to_string();

        let missing: Vec<&'static str> = [
            ("name", name.is_empty()),
            ("email", email.is_empty()),
            ("description", description.is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, blank)| blank.then_some(field))
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(Complaint {
            id: now.timestamp_millis(),
            name,
            email,
            description,
            created_at: now,
        })
    }
}

#[cfg(test)]
#[path = "complaints_test.rs"]
mod tests;
