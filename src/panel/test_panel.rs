use super::*;
use crate::config::Config;
use crate::error::CuratorError;
use crate::models::{
    ConversationPage, ConversationSummary, DeleteAck, HistoryResponse, Message, ProcessResponse,
    Sender, TaskState, TaskStatus,
};
use crate::state::{ImageAttachment, Mode, NEW_CHAT};
use crate::transport::MockBackend;
use crate::view::PagerButton;

use chrono::Utc;
use mockall::predicate::eq;
use std::sync::Arc;
use std::time::Duration;

fn summaries(start: usize, count: usize) -> Vec<ConversationSummary> {
    (start..start + count)
        .map(|n| ConversationSummary {
            session_id: format!("conv-{n}"),
            title: format!("Conversation {n}"),
            created_at: Utc::now(),
        })
        .collect()
}

fn page(start: usize, count: usize, total: u32) -> ConversationPage {
    ConversationPage {
        conversations: summaries(start, count),
        total_count: total,
    }
}

fn panel_with(backend: MockBackend) -> ConversationPanel {
    ConversationPanel::new(Arc::new(backend), &Config::default())
}

#[tokio::test]
async fn list_fetches_keep_loaded_within_total() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(0, 5, 12)));
    backend
        .expect_list_conversations()
        .with(eq(5u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(5, 5, 12)));
    backend
        .expect_list_conversations()
        .with(eq(10u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(10, 2, 12)));

    let mut panel = panel_with(backend);
    panel.load_conversations(false).await;
    assert_eq!(panel.state().loaded_count, 5);
    assert_eq!(panel.state().total_available, 12);
    assert!(panel.state().loaded_count <= panel.state().total_available);
    assert_eq!(panel.pager_button(), PagerButton::More);

    panel.load_conversations(true).await;
    panel.load_conversations(true).await;
    assert_eq!(panel.state().loaded_count, 12);
    assert!(panel.state().loaded_count <= panel.state().total_available);
    assert_eq!(panel.conversations().len(), 12);
    // Everything shown and more than one page exists: offer to collapse.
    assert_eq!(panel.pager_button(), PagerButton::Less);
    assert!(panel.state().showing_all);
}

#[tokio::test]
async fn show_less_collapses_back_to_the_first_page() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(0, 5, 12)));

    let mut panel = panel_with(backend);
    // Simulate a fully expanded list before collapsing.
    panel.state.global_offset = 12;
    panel.state.loaded_count = 12;
    panel.state.total_available = 12;

    panel.show_less_conversations().await;
    assert_eq!(panel.state().global_offset, 5);
    assert_eq!(panel.state().loaded_count, 5);
    assert_eq!(panel.conversations().len(), 5);
    assert_eq!(panel.pager_button(), PagerButton::More);
}

#[tokio::test]
async fn selecting_the_active_conversation_is_idempotent() {
    let mut backend = MockBackend::new();
    backend
        .expect_conversation_history()
        .withf(|id| id == "conv-1")
        .times(1)
        .returning(|_| {
            Ok(HistoryResponse {
                status: "ok".to_string(),
                history: vec![Message {
                    sender: Sender::User,
                    text: "earlier question".to_string(),
                    image_url: None,
                }],
            })
        });

    let mut panel = panel_with(backend);
    panel.select_conversation("conv-1").await;
    assert_eq!(panel.state().current_conversation_id, "conv-1");
    assert_eq!(panel.transcript().entries().len(), 2);

    // Second select of the same id: no request (the mock would panic on a
    // second call), no state change.
    panel.select_conversation("conv-1").await;
    assert_eq!(panel.state().current_conversation_id, "conv-1");
    assert_eq!(panel.transcript().entries().len(), 2);
}

#[tokio::test]
async fn history_failure_renders_an_inline_error_entry() {
    let mut backend = MockBackend::new();
    backend
        .expect_conversation_history()
        .times(1)
        .returning(|_| {
            Err(CuratorError::HttpStatus {
                status: 502,
                body: "bad gateway".to_string(),
            })
        });

    let mut panel = panel_with(backend);
    panel.select_conversation("conv-9").await;
    let entries = panel.transcript().entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].text.contains("Could not load this conversation"));
    assert!(!panel.transcript().loading);
}

#[tokio::test]
async fn new_chat_resets_id_and_transcript_to_the_welcome_line() {
    let mut backend = MockBackend::new();
    backend
        .expect_conversation_history()
        .times(1)
        .returning(|_| {
            Ok(HistoryResponse {
                status: "ok".to_string(),
                history: vec![
                    Message {
                        sender: Sender::User,
                        text: "hi".to_string(),
                        image_url: None,
                    },
                    Message {
                        sender: Sender::Ai,
                        text: "hello".to_string(),
                        image_url: None,
                    },
                ],
            })
        });

    let mut panel = panel_with(backend);
    panel.select_conversation("conv-2").await;
    assert_eq!(panel.transcript().entries().len(), 3);

    panel.create_new_chat();
    assert_eq!(panel.state().current_conversation_id, NEW_CHAT);
    assert_eq!(panel.state().global_offset, 0);
    let entries = panel.transcript().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, Config::default().chat.welcome_message);
}

#[tokio::test]
async fn auto_prune_deletes_exactly_the_surplus() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(1u32))
        .times(1)
        .returning(|_, _| Ok(page(0, 1, 12)));
    backend
        .expect_delete_oldest()
        .with(eq(2usize))
        .times(1)
        .returning(|_| {
            Ok(DeleteAck {
                message: "2 conversations deleted".to_string(),
            })
        });
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(0, 5, 10)));

    let mut panel = panel_with(backend);
    panel.state.global_offset = 12;
    panel.auto_prune().await;

    // Offset was reset before the reload, then advanced by the first page.
    assert_eq!(panel.state().global_offset, 5);
    assert_eq!(panel.state().total_available, 10);
}

#[tokio::test]
async fn auto_prune_is_a_no_op_below_the_retention_limit() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(1u32))
        .times(1)
        .returning(|_, _| Ok(page(0, 1, 10)));

    let mut panel = panel_with(backend);
    panel.auto_prune().await;
    // No delete, no reload: the mock verifies nothing else was called.
}

#[tokio::test]
async fn curator_text_send_resolves_immediately_without_polling() {
    let mut backend = MockBackend::new();
    backend
        .expect_process_request()
        .withf(|request| {
            request.user_message == "hello"
                && request.conversation_id == NEW_CHAT
                && request.current_mode == Mode::Curator
                && request.image_data.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(ProcessResponse {
                status: "success".to_string(),
                response: Some("hi".to_string()),
                ..ProcessResponse::default()
            })
        });

    let mut panel = panel_with(backend);
    panel.send_message("hello").await;

    // Welcome, user bubble, AI bubble - and no task_status expectation means
    // any poll attempt would have panicked the mock.
    let entries = panel.transcript().entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].sender, Sender::User);
    assert_eq!(entries[1].text, "hello");
    assert_eq!(entries[2].sender, Sender::Ai);
    assert_eq!(entries[2].text, "hi");
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn immediate_reply_on_a_new_chat_adopts_the_allocated_conversation() {
    let mut backend = MockBackend::new();
    backend.expect_process_request().times(1).returning(|_| {
        Ok(ProcessResponse {
            status: "success".to_string(),
            response: Some("noted".to_string()),
            conversation_id: Some("conv-7".to_string()),
            ..ProcessResponse::default()
        })
    });
    backend
        .expect_list_conversations()
        .with(eq(0u32), eq(5u32))
        .times(1)
        .returning(|_, _| Ok(page(7, 1, 1)));

    let mut panel = panel_with(backend);
    panel.send_message("remember this").await;
    assert_eq!(panel.state().current_conversation_id, "conv-7");
    assert_eq!(panel.conversations().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn processing_response_polls_until_completed_and_renders_once() {
    let mut backend = MockBackend::new();
    backend.expect_process_request().times(1).returning(|_| {
        Ok(ProcessResponse {
            status: "processing".to_string(),
            task_id: Some("T1".to_string()),
            ..ProcessResponse::default()
        })
    });
    // First tick is non-terminal and must not clear the loop; the second is
    // terminal and must clear it exactly once (times(2) pins the count).
    let mut tick = 0;
    backend
        .expect_task_status()
        .withf(|task_id| task_id == "T1")
        .times(2)
        .returning(move |_| {
            tick += 1;
            if tick == 1 {
                Ok(TaskStatus {
                    status: TaskState::Processing,
                    message: "still working".to_string(),
                    progress: Some(40),
                    image_url: None,
                })
            } else {
                Ok(TaskStatus {
                    status: TaskState::Completed,
                    message: "done".to_string(),
                    progress: Some(100),
                    image_url: None,
                })
            }
        });
    // Completion epilogue: list refresh (limit 5) and prune count (limit 1).
    backend
        .expect_list_conversations()
        .times(2)
        .returning(|_, _| Ok(page(0, 1, 1)));

    let mut panel = panel_with(backend);
    panel.send_message("draw a harbor").await;

    let entries = panel.transcript().entries();
    assert_eq!(entries.last().expect("transcript should have entries").text, "done");
    assert!(!panel.is_busy());
}

#[tokio::test(start_paused = true)]
async fn failed_task_renders_the_failure_and_returns_to_idle() {
    let mut backend = MockBackend::new();
    backend.expect_process_request().times(1).returning(|_| {
        Ok(ProcessResponse {
            status: "processing".to_string(),
            task_id: Some("T2".to_string()),
            ..ProcessResponse::default()
        })
    });
    backend.expect_task_status().times(1).returning(|_| {
        Ok(TaskStatus {
            status: TaskState::Failed,
            message: "the model is unavailable".to_string(),
            progress: None,
            image_url: None,
        })
    });

    let mut panel = panel_with(backend);
    panel.send_message("draw a harbor").await;

    let entries = panel.transcript().entries();
    let last = entries.last().expect("transcript should have entries");
    assert!(last.text.contains("the model is unavailable"));
    assert!(!panel.is_busy());
}

#[tokio::test(start_paused = true)]
async fn poll_transport_error_stops_polling_and_surfaces_an_error() {
    let mut backend = MockBackend::new();
    backend.expect_process_request().times(1).returning(|_| {
        Ok(ProcessResponse {
            status: "processing".to_string(),
            task_id: Some("T3".to_string()),
            ..ProcessResponse::default()
        })
    });
    backend.expect_task_status().times(1).returning(|_| {
        Err(CuratorError::UnexpectedResponse(
            "status: expected an object".to_string(),
        ))
    });

    let mut panel = panel_with(backend);
    panel.send_message("draw a harbor").await;

    let last = panel
        .transcript()
        .entries()
        .last()
        .expect("transcript should have entries")
        .clone();
    assert!(last.text.contains("Something went wrong"));
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn send_with_no_text_and_no_image_is_a_no_op() {
    let backend = MockBackend::new();
    let mut panel = panel_with(backend);
    panel.send_message("   ").await;
    assert_eq!(panel.transcript().entries().len(), 1);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn sending_consumes_the_staged_attachment() {
    let mut backend = MockBackend::new();
    backend
        .expect_process_request()
        .withf(|request| {
            request.image_data.as_deref() == Some("AQID")
                && request.current_mode == Mode::ImageGeneration
        })
        .times(1)
        .returning(|_| {
            Ok(ProcessResponse {
                status: "success".to_string(),
                response: Some("generated".to_string()),
                image_url: Some("/media/out.png".to_string()),
                ..ProcessResponse::default()
            })
        });

    let mut panel = panel_with(backend);
    panel.set_mode(Mode::ImageGeneration);
    panel.attach_image(ImageAttachment {
        file_name: "ref.png".to_string(),
        bytes: vec![1, 2, 3],
    });
    panel.send_message("in this style").await;

    assert!(panel.state().selected_image.is_none());
    let last = panel
        .transcript()
        .entries()
        .last()
        .expect("transcript should have entries")
        .clone();
    assert_eq!(last.image_url.as_deref(), Some("/media/out.png"));
}

#[tokio::test]
async fn leaving_image_mode_clears_the_pending_attachment() {
    let backend = MockBackend::new();
    let mut panel = panel_with(backend);
    panel.set_mode(Mode::ImageGeneration);
    panel.attach_image(ImageAttachment {
        file_name: "ref.png".to_string(),
        bytes: vec![0xff],
    });
    panel.set_mode(Mode::Curator);
    assert!(panel.state().selected_image.is_none());
    assert_eq!(panel.input_placeholder(), Mode::Curator.placeholder());
}

#[tokio::test(start_paused = true)]
async fn list_failure_leaves_state_untouched_and_raises_a_transient_notice() {
    let mut backend = MockBackend::new();
    let mut seq = mockall::Sequence::new();
    backend
        .expect_list_conversations()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(page(0, 2, 2)));
    backend
        .expect_list_conversations()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Err(CuratorError::HttpStatus {
                status: 500,
                body: "server error".to_string(),
            })
        });

    let mut panel = panel_with(backend);
    panel.load_conversations(false).await;
    assert_eq!(panel.conversations().len(), 2);
    let offset_before = panel.state().global_offset;

    panel.load_conversations(false).await;
    assert_eq!(panel.conversations().len(), 2);
    assert_eq!(panel.state().global_offset, offset_before);
    assert_eq!(panel.notices().items().len(), 1);

    // The notice auto-expires after the fixed delay.
    tokio::time::advance(Duration::from_millis(3001)).await;
    panel.notices_mut().purge_expired();
    assert!(panel.notices().is_empty());
}
