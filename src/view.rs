use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::models::{Message, Sender};

/// State of the pager control under the conversation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerButton {
    More,
    Less,
    Hidden,
}

/// One rendered bubble in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
    pub image_url: Option<String>,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn ai(text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            image_url,
        }
    }
}

/// The visible transcript. Rebuilt from server history on conversation load;
/// appended to optimistically while an exchange is in flight.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    pub loading: bool,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Clear everything and show the loading indicator.
    pub fn begin_loading(&mut self) {
        self.entries.clear();
        self.loading = true;
    }

    /// Replace the transcript with the fixed welcome line.
    pub fn reset_with_welcome(&mut self, welcome: &str) {
        self.entries.clear();
        self.entries.push(TranscriptEntry::ai(welcome, None));
        self.loading = false;
    }

    /// Replace the transcript with a single inline error entry.
    pub fn reset_with_error(&mut self, text: &str) {
        self.entries.clear();
        self.entries.push(TranscriptEntry::ai(text, None));
        self.loading = false;
    }

    pub fn push_user(&mut self, text: &str) {
        self.entries.push(TranscriptEntry::user(text));
    }

    pub fn push_ai(&mut self, text: &str, image_url: Option<String>) {
        self.entries.push(TranscriptEntry::ai(text, image_url));
    }

    pub fn push_history(&mut self, message: Message) {
        self.entries.push(TranscriptEntry {
            sender: message.sender,
            text: message.text,
            image_url: message.image_url,
        });
    }
}

/// A transient notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub text: String,
    expires_at: Instant,
}

/// Holds transient notices and drops them once their TTL has passed. Expiry
/// uses tokio's clock so paused-time tests see deterministic behavior.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    items: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.items.push(Notice {
            id: Uuid::new_v4(),
            text: text.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Drop notices whose TTL has elapsed.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        self.items.retain(|notice| notice.expires_at > now);
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Plain-text rendering of the transcript, one line per bubble. The terminal
/// front-end colorizes separately; this form exists for snapshot assertions.
pub fn render_transcript(transcript: &Transcript) -> String {
    let mut out = String::new();
    for entry in transcript.entries() {
        let who = match entry.sender {
            Sender::User => "you",
            Sender::Ai => "curator",
        };
        out.push_str(who);
        out.push_str("> ");
        out.push_str(&entry.text);
        if let Some(url) = &entry.image_url {
            out.push_str(" [image: ");
            out.push_str(url);
            out.push(']');
        }
        out.push('\n');
    }
    if transcript.loading {
        out.push_str("...\n");
    }
    out
}
