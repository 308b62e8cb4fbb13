use std::time::Duration;

use log::{debug, error, info, warn};

use crate::compose::ReplyMutation;
use crate::error::ReplyError;
use crate::models::PostId;
use crate::render::render_replies;
use crate::tree::ReplySnapshot;

use super::state::{Notice, ReplyListState};
use super::ReplyBoardApp;

pub enum AppMessage {
    RepliesLoaded {
        post_id: PostId,
        epoch: u64,
        result: Result<ReplySnapshot, ReplyError>,
    },
    MutationFinished {
        mutation: ReplyMutation,
        result: Result<(), ReplyError>,
    },
    PostDeleted {
        post_id: PostId,
        result: Result<String, ReplyError>,
    },
}

pub(super) fn process_messages(app: &mut ReplyBoardApp) {
    while let Ok(message) = app.rx.try_recv() {
        handle_message(app, message);
    }
}

/// Blocks up to `timeout` for the next completion, then drains the queue.
pub(super) fn wait_for_message(app: &mut ReplyBoardApp, timeout: Duration) -> bool {
    match app.rx.recv_timeout(timeout) {
        Ok(message) => {
            handle_message(app, message);
            process_messages(app);
            true
        }
        Err(_) => false,
    }
}

fn handle_message(app: &mut ReplyBoardApp, message: AppMessage) {
    match message {
        AppMessage::RepliesLoaded {
            post_id,
            epoch,
            result,
        } => {
            if post_id != app.post_id || epoch != app.replies.latest_epoch {
                debug!(
                    "dropping stale reply list for post {post_id} (epoch {epoch}, latest {})",
                    app.replies.latest_epoch
                );
                return;
            }
            app.replies.is_loading = false;
            match result {
                Ok(snapshot) => {
                    if let Err(violation) = snapshot.check_structure() {
                        warn!("post {post_id}: reply order is inconsistent: {violation}");
                    }
                    app.replies.rendered = render_replies(&snapshot.replies, &app.viewer);
                    app.replies.snapshot = Some(snapshot);
                    app.replies.error = None;
                }
                Err(err) => {
                    error!("failed to load replies for post {post_id}: {err}");
                    app.replies.error = Some(format!("Could not load the replies: {err}"));
                }
            }
        }
        AppMessage::MutationFinished { mutation, result } => {
            app.in_flight = app.in_flight.saturating_sub(1);
            if matches!(
                mutation,
                ReplyMutation::Create { .. } | ReplyMutation::Modify { .. }
            ) {
                app.compose_sending = false;
            }
            match result {
                Ok(()) => {
                    info!("completed: {}", mutation.describe());
                    app.compose.cancel();
                    app.compose_error = None;
                    app.spawn_load_replies();
                }
                Err(err) => {
                    error!("failed to {}: {err}", mutation.describe());
                    app.notice = Some(Notice::mutation_failed(&mutation, &err));
                }
            }
        }
        AppMessage::PostDeleted { post_id, result } => {
            app.in_flight = app.in_flight.saturating_sub(1);
            match result {
                Ok(location) => {
                    info!("post {post_id} deleted, server redirected to {location}");
                    app.compose.cancel();
                    app.replies = ReplyListState {
                        latest_epoch: app.replies.latest_epoch,
                        ..ReplyListState::default()
                    };
                    app.post_deleted = Some(location);
                }
                Err(err) => {
                    error!("failed to delete post {post_id}: {err}");
                    app.notice = Some(Notice::action_failed("delete the post", &err));
                }
            }
        }
    }
}
