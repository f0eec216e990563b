use super::ConversationPanel;

impl ConversationPanel {
    /// Fetch one page of conversation summaries. A replace load (`append ==
    /// false`) restarts from offset 0; an append load continues from the
    /// current offset. On failure the list and counters stay untouched and a
    /// transient notice is raised.
    pub async fn load_conversations(&mut self, append: bool) {
        let fetch_offset = if append { self.state.global_offset } else { 0 };
        match self
            .backend
            .list_conversations(fetch_offset as u32, self.page_size as u32)
            .await
        {
            Ok(page) => {
                let returned = page.conversations.len();
                if append {
                    self.conversations.extend(page.conversations);
                } else {
                    self.conversations = page.conversations;
                }
                self.state
                    .apply_page(fetch_offset, returned, page.total_count, append);
                tracing::debug!(
                    "Conversation list: {} of {} loaded, offset {}",
                    self.state.loaded_count,
                    self.state.total_available,
                    self.state.global_offset
                );
            }
            Err(err) => {
                tracing::warn!("Failed to load conversations: {err}");
                self.notices
                    .push(format!("Could not load conversations: {err}"));
            }
        }
    }

    /// Collapse the list back to the first page.
    pub async fn show_less_conversations(&mut self) {
        self.state.reset_pagination();
        self.load_conversations(false).await;
    }

    /// Best-effort housekeeping after a completed exchange: when the server
    /// holds more conversations than the retention limit, ask it to drop the
    /// oldest surplus, then reload the first page. Failures are logged and
    /// never surfaced into the conversation flow.
    pub(crate) async fn auto_prune(&mut self) {
        let total = match self.backend.list_conversations(0, 1).await {
            Ok(page) => page.total_count as usize,
            Err(err) => {
                tracing::warn!("Auto-prune count query failed: {err}");
                return;
            }
        };
        if total <= self.retention_limit {
            return;
        }

        let excess = total - self.retention_limit;
        match self.backend.delete_oldest(excess).await {
            Ok(ack) => {
                tracing::info!("Pruned {excess} old conversation(s): {}", ack.message);
                self.state.reset_pagination();
                self.load_conversations(false).await;
            }
            Err(err) => {
                tracing::warn!("Auto-prune delete failed: {err}");
            }
        }
    }
}
