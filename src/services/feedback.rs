use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};

/// A single feedback event, appended as one JSON line
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackEvent {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub program_id: String,
    pub feedback_type: String,
    pub session_id: String,
}

impl FeedbackEvent {
    pub fn new(
        user_id: Option<String>,
        program_id: String,
        feedback_type: String,
        session_id: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id: user_id.unwrap_or_else(|| "anonymous".to_string()),
            program_id,
            feedback_type,
            session_id: session_id.unwrap_or_default(),
        }
    }
}

/// One-way append sink for user feedback on recommendations
///
/// The scoring core never reads events back; they feed the offline training
/// pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, event: FeedbackEvent) -> AppResult<()>;
}

/// File-backed sink appending JSON Lines
pub struct JsonlFeedbackLog {
    path: PathBuf,
}

impl JsonlFeedbackLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl FeedbackSink for JsonlFeedbackLog {
    async fn record(&self, event: FeedbackEvent) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(&event)
            .map_err(|e| AppError::Internal(format!("feedback serialization failed: {}", e)))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;

        tracing::debug!(
            program_id = %event.program_id,
            feedback_type = %event.feedback_type,
            "feedback recorded"
        );
        Ok(())
    }
}
