use log::{debug, warn};

use crate::compose::ReplyMutation;
use crate::error::ReplyError;
use crate::models::ReplyId;
use crate::permissions::{ReplyAction, Viewer};
use crate::render::render_replies;

use super::state::{Confirmation, Notice};
use super::tasks;
use super::ReplyBoardApp;

impl ReplyBoardApp {
    /// Issues a full reload under a fresh epoch.
    pub fn spawn_load_replies(&mut self) {
        if self.post_deleted.is_some() {
            return;
        }
        self.replies.latest_epoch += 1;
        self.replies.is_loading = true;
        debug!(
            "loading replies for post {} (epoch {})",
            self.post_id, self.replies.latest_epoch
        );
        tasks::load_replies(
            self.service.clone(),
            self.tx.clone(),
            self.post_id,
            self.replies.latest_epoch,
        );
    }

    pub fn on_row_action(&mut self, reply_id: ReplyId, action: ReplyAction) {
        match action {
            ReplyAction::Modify => self.start_edit(reply_id),
            ReplyAction::Delete => self.request_delete_reply(reply_id),
            ReplyAction::Reply => self.start_reply_to(reply_id),
            ReplyAction::Recommend => self.spawn_recommend(reply_id),
        }
    }

    pub fn start_edit(&mut self, reply_id: ReplyId) {
        let Some(reply) = self.replies.snapshot.as_ref().and_then(|s| s.find(reply_id)) else {
            warn!("edit requested for unknown reply {reply_id}");
            return;
        };
        if let Err(err) = self.compose.start_edit(reply, &self.viewer) {
            warn!("refusing to edit reply {reply_id}: {err}");
            self.notice = Some(Notice::action_failed("edit the reply", &err));
        } else {
            self.compose_error = None;
        }
    }

    pub fn start_reply_to(&mut self, reply_id: ReplyId) {
        let Some(reply) = self.replies.snapshot.as_ref().and_then(|s| s.find(reply_id)) else {
            warn!("reply requested for unknown reply {reply_id}");
            return;
        };
        self.compose.start_reply_to(reply);
        self.compose_error = None;
    }

    pub fn cancel_compose(&mut self) {
        self.compose.cancel();
        self.compose_error = None;
    }

    /// Sends the compose box's current request; blank drafts never leave.
    pub fn submit_compose(&mut self) {
        if self.compose_sending {
            return;
        }
        match self.compose.current_request(self.post_id) {
            Ok(mutation) => {
                self.compose_error = None;
                self.compose_sending = true;
                self.dispatch(mutation);
            }
            Err(ReplyError::Validation) => {
                self.compose_error = Some("Reply cannot be empty".into());
            }
            Err(err) => {
                self.notice = Some(Notice::action_failed("send the reply", &err));
            }
        }
    }

    /// Asks for confirmation; nothing is sent until it is accepted.
    pub fn request_delete_reply(&mut self, reply_id: ReplyId) {
        self.confirmation = Some(Confirmation::DeleteReply(reply_id));
    }

    pub fn request_delete_post(&mut self) {
        self.confirmation = Some(Confirmation::DeletePost);
    }

    pub fn resolve_confirmation(&mut self, accepted: bool) {
        let Some(confirmation) = self.confirmation.take() else {
            return;
        };
        if !accepted {
            debug!("{} cancelled", confirmation.title());
            return;
        }
        match confirmation {
            Confirmation::DeleteReply(reply_id) => {
                self.dispatch(ReplyMutation::Delete { reply_id })
            }
            Confirmation::DeletePost => {
                self.in_flight += 1;
                tasks::delete_post(self.service.clone(), self.tx.clone(), self.post_id);
            }
        }
    }

    pub fn spawn_recommend(&mut self, reply_id: ReplyId) {
        self.dispatch(ReplyMutation::Recommend { reply_id });
    }

    /// Switches the signed-in member and re-renders the current snapshot.
    pub fn set_viewer(&mut self, viewer: Viewer) {
        self.viewer = viewer;
        if let Some(snapshot) = &self.replies.snapshot {
            self.replies.rendered = render_replies(&snapshot.replies, &self.viewer);
        }
    }

    fn dispatch(&mut self, mutation: ReplyMutation) {
        debug!("dispatching: {}", mutation.describe());
        self.in_flight += 1;
        tasks::run_mutation(self.service.clone(), self.tx.clone(), mutation);
    }
}
