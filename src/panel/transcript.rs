use super::ConversationPanel;
use crate::state::NEW_CHAT;

impl ConversationPanel {
    /// Make a conversation active and load its history. Selecting the
    /// conversation that is already active is a no-op: no request, no state
    /// change.
    pub async fn select_conversation(&mut self, conversation_id: &str) {
        if conversation_id == self.state.current_conversation_id {
            return;
        }
        self.state.current_conversation_id = conversation_id.to_string();
        self.load_messages(conversation_id).await;
    }

    /// Rebuild the transcript from server history: the fixed welcome line
    /// first, then every message in server order. On failure the transcript
    /// shows a single inline error entry.
    pub async fn load_messages(&mut self, conversation_id: &str) {
        self.transcript.begin_loading();
        match self.backend.conversation_history(conversation_id).await {
            Ok(response) => {
                self.transcript.reset_with_welcome(&self.welcome_message);
                for message in response.history {
                    self.transcript.push_history(message);
                }
            }
            Err(err) => {
                tracing::warn!("Failed to load conversation {conversation_id}: {err}");
                self.transcript
                    .reset_with_error("Could not load this conversation. Please try again.");
            }
        }
    }

    /// Start a fresh, not-yet-persisted conversation.
    pub fn create_new_chat(&mut self) {
        self.state.current_conversation_id = NEW_CHAT.to_string();
        self.state.reset_pagination();
        self.transcript.reset_with_welcome(&self.welcome_message);
    }
}
