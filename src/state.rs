use serde::{Deserialize, Serialize};

/// Sentinel conversation id for a chat that has no persisted history yet.
pub const NEW_CHAT: &str = "new-chat";

/// Interaction mode sent as request metadata with every message. Mode does
/// not gate which controls are available; the image attachment stays usable
/// in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Curator,
    ImageGeneration,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Curator => "curator",
            Mode::ImageGeneration => "image_generation",
        }
    }

    /// Input placeholder shown for the mode.
    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Curator => "Ask the curator about the collection...",
            Mode::ImageGeneration => "Describe the image you want to create...",
        }
    }
}

/// An image the user attached but has not sent yet.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The single mutable client state of the conversation panel. Lives for the
/// duration of the session and is only touched from the controller.
///
/// Invariants:
/// - `loaded_count <= total_available` after any successful list fetch.
/// - `current_conversation_id == NEW_CHAT` implies no history has been
///   persisted for the in-progress conversation.
/// - `global_offset` only advances forward except through
///   [`PanelState::reset_pagination`].
#[derive(Debug, Clone)]
pub struct PanelState {
    pub current_conversation_id: String,
    pub selected_image: Option<ImageAttachment>,
    pub mode: Mode,
    pub global_offset: usize,
    pub loaded_count: usize,
    pub total_available: usize,
    pub showing_all: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            current_conversation_id: NEW_CHAT.to_string(),
            selected_image: None,
            mode: Mode::Curator,
            global_offset: 0,
            loaded_count: 0,
            total_available: 0,
            showing_all: false,
        }
    }
}

impl PanelState {
    /// Fold one successfully fetched page into the counters. `fetch_offset`
    /// is the offset the page was requested at (0 for a replace load).
    pub fn apply_page(&mut self, fetch_offset: usize, returned: usize, total: u32, append: bool) {
        self.total_available = total as usize;
        self.global_offset = fetch_offset + returned;
        self.loaded_count = if append {
            self.loaded_count + returned
        } else {
            returned
        };
        self.showing_all =
            self.loaded_count >= self.total_available && self.total_available > 0;
    }

    /// Reset the paging cursor. Used on new chat, "show less" and after a
    /// prune deleted rows out from under the current offset.
    pub fn reset_pagination(&mut self) {
        self.global_offset = 0;
        self.showing_all = false;
    }

    pub fn is_new_chat(&self) -> bool {
        self.current_conversation_id == NEW_CHAT
    }
}
