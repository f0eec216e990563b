use colored::Colorize;

use crate::models::{ConversationSummary, GalleryImage, Sender};
use crate::view::{Notice, PagerButton, TranscriptEntry};

/// Terminal rendering for the interactive front-end. Chat output goes to
/// stdout; diagnostics stay on stderr with the tracing subscriber.
pub struct VisualOutput;

impl VisualOutput {
    pub fn new() -> Self {
        Self
    }

    pub fn transcript_entry(&self, entry: &TranscriptEntry) {
        let who = match entry.sender {
            Sender::User => "you".bold().blue(),
            Sender::Ai => "curator".bold().green(),
        };
        println!("{who}> {}", entry.text);
        if let Some(url) = &entry.image_url {
            println!("        {} {}", "image:".dimmed(), url.underline());
        }
    }

    pub fn transcript(&self, entries: &[TranscriptEntry]) {
        for entry in entries {
            self.transcript_entry(entry);
        }
    }

    pub fn notice(&self, notice: &Notice) {
        println!("{} {}", "!".bold().yellow(), notice.text.yellow());
    }

    pub fn conversation_list(
        &self,
        conversations: &[ConversationSummary],
        active_id: &str,
        button: PagerButton,
    ) {
        if conversations.is_empty() {
            println!("{}", "No conversations yet.".dimmed());
            return;
        }
        for (index, summary) in conversations.iter().enumerate() {
            let marker = if summary.session_id == active_id {
                "*".bold().green()
            } else {
                " ".normal()
            };
            println!(
                "{marker} {:>2}. {} {}",
                index + 1,
                summary.title,
                summary.created_at.format("(%Y-%m-%d)").to_string().dimmed()
            );
        }
        match button {
            PagerButton::More => println!("{}", "(/more to load older conversations)".dimmed()),
            PagerButton::Less => println!("{}", "(/less to collapse the list)".dimmed()),
            PagerButton::Hidden => {}
        }
    }

    pub fn progress(&self, message: &str, progress: Option<u32>) {
        match progress {
            Some(pct) => println!("{} {message} ({pct}%)", "...".dimmed()),
            None => println!("{} {message}", "...".dimmed()),
        }
    }

    pub fn gallery(&self, images: &[GalleryImage]) {
        if images.is_empty() {
            println!("{}", "No images matched.".dimmed());
            return;
        }
        for image in images {
            let counts = format!(
                "views {} likes {}",
                image.views.unwrap_or(0),
                image.likes.unwrap_or(0)
            );
            println!("- {} {}", image.title.bold(), counts.dimmed());
            if let Some(url) = &image.image_file {
                println!("  {}", url.underline());
            }
        }
    }

    pub fn error(&self, message: &str) {
        println!("{} {}", "error:".bold().red(), message);
    }
}

impl Default for VisualOutput {
    fn default() -> Self {
        Self::new()
    }
}
