//! Contact-form persistence
//!
//! Messages append to a flat JSON array file. A missing or corrupt existing
//! file starts a fresh array instead of failing the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use genrescope_common::{Error, Result};

/// One stored contact message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(name: String, email: String, message: String) -> Self {
        Self {
            name,
            email,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Append a message to the contact log file
pub async fn append_message(log_path: &Path, message: ContactMessage) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut messages: Vec<ContactMessage> = match tokio::fs::read_to_string(log_path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %log_path.display(), error = %e, "Contact log unreadable, starting fresh");
            Vec::new()
        }),
        Err(_) => Vec::new(),
    };
    messages.push(message);

    let serialized = serde_json::to_string_pretty(&messages)
        .map_err(|e| Error::Internal(format!("serialize contact log: {}", e)))?;
    tokio::fs::write(log_path, serialized).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_to_missing_and_existing_logs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        append_message(&path, ContactMessage::new("Ada".into(), "ada@example.com".into(), "hi".into()))
            .await
            .unwrap();
        append_message(&path, ContactMessage::new("Lin".into(), "lin@example.com".into(), "yo".into()))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let messages: Vec<ContactMessage> = serde_json::from_str(&content).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].name, "Ada");
        assert_eq!(messages[1].name, "Lin");
    }

    #[tokio::test]
    async fn corrupt_log_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "{{ definitely not json").unwrap();

        append_message(&path, ContactMessage::new("Ada".into(), "a@b.c".into(), "hi".into()))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let messages: Vec<ContactMessage> = serde_json::from_str(&content).unwrap();
        assert_eq!(messages.len(), 1);
    }
}
