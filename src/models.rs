use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::state::Mode;

/// Flexible count deserializer: the backend is loose about numeric fields and
/// has been observed sending ints, floats and strings for the same key.
fn deserialize_flexible_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleCount {
        Int(u32),
        Float(f64),
        String(String),
    }

    let value = FlexibleCount::deserialize(deserializer)?;
    match value {
        FlexibleCount::Int(i) => Ok(i),
        FlexibleCount::Float(f) => Ok(f as u32),
        FlexibleCount::String(s) => s.parse::<u32>().map_err(serde::de::Error::custom),
    }
}

/// Same, for optional fields (e.g. task progress).
fn deserialize_flexible_count_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleCount {
        Int(u32),
        Float(f64),
        String(String),
    }

    let value = Option::<FlexibleCount>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(FlexibleCount::Int(i)) => Ok(Some(i)),
        Some(FlexibleCount::Float(f)) => Ok(Some(f as u32)),
        Some(FlexibleCount::String(s)) => {
            s.parse::<u32>().map(Some).map_err(serde::de::Error::custom)
        }
    }
}

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One message in a conversation history. Reconstructed from the server on
/// every conversation load, never cached beyond the current view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Summary row in the paginated conversation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub session_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// One page of `GET /api/conversations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationPage {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
    #[serde(deserialize_with = "deserialize_flexible_count")]
    pub total_count: u32,
}

/// `GET /api/conversations/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// `POST /api/conversations/delete_oldest/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /api/process_request/`. `image_data` is serialized as an
/// explicit null when absent; the backend distinguishes null from missing.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub user_message: String,
    pub conversation_id: String,
    pub current_mode: Mode,
    pub image_data: Option<String>,
}

/// Response of the processing endpoint. The backend answers with one of two
/// shapes (`processing` with a task id, or `success` with the reply inline);
/// anything else is treated as an error by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Lifecycle states of a chat processing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Other,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// `GET /api/tasks/{id}/status/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub status: TaskState,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_flexible_count_opt")]
    pub progress: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// `POST /api/generate-image/` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateAccepted {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub task_id: String,
}

/// States of an image generation task. The image pipeline reports a different
/// vocabulary than the chat task queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageTaskState {
    Success,
    Failed,
    #[serde(other)]
    Other,
}

/// `GET /api/task-status/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageTaskStatus {
    pub status: ImageTaskState,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_flexible_count_opt")]
    pub progress: Option<u32>,
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
    pub name: String,
}

/// One archive entry from `GET /api/images/`.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image_file: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
}

/// A museum/gallery venue from the preloaded directory document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Museum {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_date: Option<String>,
}
