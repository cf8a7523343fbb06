//! Result types delivered back to the caller of a lookup.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Outcome status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Ok,
    Error,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Ok => "OK",
            ResultStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ResultStatus::Ok),
            "ERROR" => Ok(ResultStatus::Error),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Profile fields extracted for a contact.
///
/// Every field is empty when the collaborator could not read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(rename = "contact_title")]
    pub title: String,
    #[serde(rename = "contact_subtitle")]
    pub subtitle: String,
    #[serde(rename = "contact_status")]
    pub status: String,
    #[serde(rename = "contact_status_info")]
    pub status_info: String,
    /// Base64-encoded PNG of the profile picture.
    #[serde(rename = "contact_image")]
    pub image: String,
}

impl ContactFields {
    /// Whether at least one field carries data.
    pub fn has_any(&self) -> bool {
        [
            &self.title,
            &self.subtitle,
            &self.status,
            &self.status_info,
            &self.image,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }
}

/// Immutable result of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    status: ResultStatus,
    #[serde(rename = "details")]
    detail: String,
    #[serde(rename = "responsetime")]
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    fields: ContactFields,
}

impl JobResult {
    pub fn new(status: ResultStatus, detail: impl Into<String>, fields: ContactFields) -> Self {
        Self {
            status,
            detail: detail.into(),
            timestamp: Utc::now(),
            fields,
        }
    }

    pub fn ok(detail: impl Into<String>, fields: ContactFields) -> Self {
        Self::new(ResultStatus::Ok, detail, fields)
    }

    /// An error result with no contact fields.
    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(ResultStatus::Error, detail, ContactFields::default())
    }

    /// Build a result from a raw status string.
    pub fn parse(
        status: &str,
        detail: impl Into<String>,
        fields: ContactFields,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(status.parse()?, detail, fields))
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_rejects_unknown_values() {
        assert_eq!("OK".parse::<ResultStatus>(), Ok(ResultStatus::Ok));
        assert_eq!("ERROR".parse::<ResultStatus>(), Ok(ResultStatus::Error));
        assert_eq!(
            "ok".parse::<ResultStatus>(),
            Err(ValidationError::UnknownStatus("ok".into()))
        );

        let err = JobResult::parse("DONE", "x", ContactFields::default()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownStatus(s) if s == "DONE"));
    }

    #[test]
    fn has_any_checks_every_field() {
        assert!(!ContactFields::default().has_any());
        let only_image = ContactFields {
            image: "iVBORw0KGgo=".into(),
            ..Default::default()
        };
        assert!(only_image.has_any());
    }

    #[test]
    fn serializes_with_wire_names() {
        let result = JobResult::ok(
            "Ok with any info",
            ContactFields {
                title: "Alice".into(),
                status: "Hey there".into(),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "OK");
        assert_eq!(value["details"], "Ok with any info");
        assert_eq!(value["contact_title"], "Alice");
        assert_eq!(value["contact_status"], "Hey there");
        assert_eq!(value["contact_subtitle"], "");
        assert!(value["responsetime"].is_string());

        let back: JobResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }
}
