//! The conversation panel controller: conversation list pager, conversation
//! selector, send/poll state machine, auto-prune housekeeping and the mode
//! toggle. Owns the single mutable client state and the view-model.

mod pager;
mod send;
mod transcript;

#[cfg(test)]
mod test_panel;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::models::ConversationSummary;
use crate::state::{ImageAttachment, Mode, PanelState};
use crate::transport::Backend;
use crate::view::{NoticeBoard, PagerButton, Transcript};

pub struct ConversationPanel {
    backend: Arc<dyn Backend>,
    page_size: usize,
    retention_limit: usize,
    poll_interval: Duration,
    welcome_message: String,
    state: PanelState,
    transcript: Transcript,
    conversations: Vec<ConversationSummary>,
    notices: NoticeBoard,
    busy: bool,
}

impl ConversationPanel {
    pub fn new(backend: Arc<dyn Backend>, cfg: &Config) -> Self {
        let mut transcript = Transcript::default();
        transcript.reset_with_welcome(&cfg.chat.welcome_message);
        Self {
            backend,
            page_size: cfg.chat.page_size,
            retention_limit: cfg.chat.retention_limit,
            poll_interval: cfg.chat_poll_interval(),
            welcome_message: cfg.chat.welcome_message.clone(),
            state: PanelState::default(),
            transcript,
            conversations: Vec::new(),
            notices: NoticeBoard::new(cfg.notice_ttl()),
            busy: false,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Mutable access so the front-end can purge expired notices on its tick.
    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// Whether an exchange is unresolved (the send control is disabled).
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Pager control state: "more" while the list can grow, "less" once
    /// everything is shown and spans more than one page, hidden otherwise.
    pub fn pager_button(&self) -> PagerButton {
        if self.state.loaded_count < self.state.total_available {
            PagerButton::More
        } else if self.state.loaded_count == self.state.total_available
            && self.state.total_available > self.page_size
        {
            PagerButton::Less
        } else {
            PagerButton::Hidden
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Switch interaction mode. Leaving image generation drops a pending
    /// attachment; the attachment control itself stays live in both modes.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == Mode::ImageGeneration && mode != Mode::ImageGeneration {
            self.state.selected_image = None;
        }
        self.state.mode = mode;
    }

    pub fn input_placeholder(&self) -> &'static str {
        self.state.mode.placeholder()
    }

    /// Stage an image for the next message. Deliberately not guarded against
    /// an in-flight send; the attachment can be swapped mid-exchange.
    pub fn attach_image(&mut self, attachment: ImageAttachment) {
        self.state.selected_image = Some(attachment);
    }

    pub fn clear_image(&mut self) {
        self.state.selected_image = None;
    }
}
