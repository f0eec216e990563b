use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use super::ConversationPanel;
use crate::models::{ProcessRequest, ProcessResponse, TaskState};
use crate::poll::{PollStep, Poller};

/// Fallback bubble for any error path; the exchange itself is never retried.
const REPLY_ERROR: &str = "Something went wrong while handling your request. Please try again.";

impl ConversationPanel {
    /// Run one exchange to terminal resolution: IDLE → SENDING →
    /// {IMMEDIATE_DONE | POLLING} → IDLE. A no-op when there is nothing to
    /// send, and while a previous exchange is still unresolved.
    pub async fn send_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() && self.state.selected_image.is_none() {
            return;
        }
        if self.busy {
            tracing::debug!("Send ignored: an exchange is already in flight");
            return;
        }
        self.busy = true;
        self.transcript.loading = true;
        self.transcript.push_user(text);

        // Taking the attachment clears the preview, as on the page.
        let attachment = self.state.selected_image.take();
        let request = ProcessRequest {
            user_message: text.to_string(),
            conversation_id: self.state.current_conversation_id.clone(),
            current_mode: self.state.mode,
            image_data: attachment.map(|image| BASE64_STANDARD.encode(image.bytes)),
        };

        match self.backend.process_request(&request).await {
            Ok(response) => self.dispatch_response(response).await,
            Err(err) => {
                tracing::error!("Processing request failed: {err}");
                self.transcript.push_ai(REPLY_ERROR, None);
            }
        }

        self.transcript.loading = false;
        self.busy = false;
    }

    async fn dispatch_response(&mut self, response: ProcessResponse) {
        match response.status.as_str() {
            "processing" => {
                if let Some(conversation_id) = response.conversation_id.clone() {
                    self.state.current_conversation_id = conversation_id;
                }
                match response.task_id {
                    Some(task_id) => self.poll_task(task_id).await,
                    None => {
                        tracing::error!("Processing response carried no task id");
                        self.transcript.push_ai(REPLY_ERROR, None);
                    }
                }
            }
            "success" => self.finish_immediate(response).await,
            other => {
                tracing::error!("Unexpected processing status {other:?}");
                self.transcript.push_ai(REPLY_ERROR, None);
            }
        }
    }

    /// The backend answered inline: render the reply, adopt a
    /// server-allocated conversation id, and when that id is brand new,
    /// refresh the list so the new conversation shows up selected.
    async fn finish_immediate(&mut self, response: ProcessResponse) {
        let reply = response.response.unwrap_or_else(|| REPLY_ERROR.to_string());
        self.transcript.push_ai(&reply, response.image_url);
        if let Some(conversation_id) = response.conversation_id {
            let created = self.state.is_new_chat();
            self.state.current_conversation_id = conversation_id;
            if created {
                self.load_conversations(false).await;
            }
        }
    }

    /// POLLING: query task status on the fixed cadence until a terminal
    /// state. Non-terminal ticks keep the loop alive; a transport error ends
    /// it immediately.
    async fn poll_task(&mut self, task_id: String) {
        tracing::debug!("Polling task {task_id}");
        let poller = Poller::new(self.poll_interval);
        let backend = Arc::clone(&self.backend);
        let outcome = poller
            .run(move || {
                let backend = Arc::clone(&backend);
                let task_id = task_id.clone();
                async move {
                    let status = backend.task_status(&task_id).await?;
                    if status.status.is_terminal() {
                        Ok(PollStep::Done(status))
                    } else {
                        Ok(PollStep::Continue)
                    }
                }
            })
            .await;

        match outcome {
            Ok(Some(status)) if status.status == TaskState::Completed => {
                self.transcript.push_ai(&status.message, status.image_url);
                self.refresh_after_completion().await;
            }
            Ok(Some(status)) => {
                tracing::error!("Task ended in failure: {}", status.message);
                let text = if status.message.is_empty() {
                    REPLY_ERROR.to_string()
                } else {
                    format!("Request failed: {}", status.message)
                };
                self.transcript.push_ai(&text, None);
            }
            // Cancelled from outside; nothing left to render.
            Ok(None) => {}
            Err(err) => {
                tracing::error!("Status poll aborted: {err}");
                self.transcript.push_ai(REPLY_ERROR, None);
            }
        }
    }

    /// COMPLETED epilogue: reconcile the transcript and the list with the
    /// server, then let auto-prune do its housekeeping.
    async fn refresh_after_completion(&mut self) {
        if !self.state.is_new_chat() {
            let conversation_id = self.state.current_conversation_id.clone();
            self.load_messages(&conversation_id).await;
        }
        self.load_conversations(false).await;
        self.auto_prune().await;
    }
}
