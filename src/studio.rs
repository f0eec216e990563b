use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{CuratorError, Result};
use crate::models::{GeneratedImage, ImageTaskState};
use crate::state::ImageAttachment;
use crate::transport::Backend;

/// A generation request for the standalone image studio page: prompt,
/// optional negative prompt, optional reference image (multipart upload).
#[derive(Debug, Clone)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub input_image: Option<ImageAttachment>,
}

/// Image-generation surface. Submits a request, then polls the task status
/// endpoint on a fixed cadence until the backend reports a terminal state,
/// reporting intermediate progress through the callback.
pub struct ImageStudio {
    backend: Arc<dyn Backend>,
    poll_interval: Duration,
}

impl ImageStudio {
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
        }
    }

    /// Run one generation to completion. A transport error during the status
    /// poll ends the poll immediately; the caller decides whether to resubmit.
    pub async fn generate(
        &self,
        request: GenerateImageRequest,
        mut on_progress: impl FnMut(&str, Option<u32>),
    ) -> Result<Vec<GeneratedImage>> {
        if request.prompt.trim().is_empty() {
            return Err(CuratorError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }

        let accepted = self.backend.generate_image(&request).await?;
        tracing::info!("Image generation accepted, task {}", accepted.task_id);
        on_progress(&accepted.message, None);

        loop {
            sleep(self.poll_interval).await;
            let status = self.backend.image_task_status(&accepted.task_id).await?;
            match status.status {
                ImageTaskState::Success => {
                    tracing::info!(
                        "Image generation finished with {} image(s)",
                        status.images.len()
                    );
                    return Ok(status.images);
                }
                ImageTaskState::Failed => {
                    tracing::error!(
                        "Image generation failed: {} {:?}",
                        status.message,
                        status.details
                    );
                    return Err(CuratorError::TaskFailed(status.message));
                }
                ImageTaskState::Other => on_progress(&status.message, status.progress),
            }
        }
    }
}
