use crate::compose::ReplyMutation;
use crate::error::ReplyError;
use crate::models::ReplyId;
use crate::render::RenderedReplies;
use crate::tree::ReplySnapshot;

#[derive(Default)]
pub struct ReplyListState {
    pub snapshot: Option<ReplySnapshot>,
    pub rendered: RenderedReplies,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Epoch of the most recently issued fetch; older responses are dropped.
    pub latest_epoch: u64,
}

impl ReplyListState {
    pub fn count(&self) -> usize {
        self.snapshot.as_ref().map(|s| s.count).unwrap_or(0)
    }
}

/// A yes/no question that must be answered before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    DeleteReply(ReplyId),
    DeletePost,
}

impl Confirmation {
    pub fn title(&self) -> &'static str {
        match self {
            Confirmation::DeleteReply(_) => "Delete reply",
            Confirmation::DeletePost => "Delete post",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            Confirmation::DeleteReply(_) => "Do you really want to delete this reply?",
            Confirmation::DeletePost => {
                "Do you really want to delete this post?\nDeleted posts cannot be restored."
            }
        }
    }
}

/// Blocking notice shown when something the user asked for did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn action_failed(action: &str, err: &ReplyError) -> Self {
        let detail = match err {
            ReplyError::Validation => "The reply is empty.".to_string(),
            ReplyError::PermissionDenied(_) => "You are not allowed to do that.".to_string(),
            ReplyError::NotFound(_) => "It no longer exists.".to_string(),
            ReplyError::Network(reason) => format!("The forum could not be reached ({reason})."),
            ReplyError::OperationFailed => "The forum refused the request.".to_string(),
            ReplyError::UnexpectedResponse(_) => {
                "The forum sent a response we could not read.".to_string()
            }
        };
        let retry = if err.is_retryable() {
            " Please try again in a moment."
        } else {
            " Please reload the replies and try again."
        };
        Self {
            title: "Action not completed".to_string(),
            message: format!("Could not {action}. {detail}{retry}"),
        }
    }

    pub fn mutation_failed(mutation: &ReplyMutation, err: &ReplyError) -> Self {
        Self::action_failed(mutation.describe(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_names_the_action_and_invites_retry() {
        let notice = Notice::mutation_failed(
            &ReplyMutation::Recommend {
                reply_id: ReplyId(1),
            },
            &ReplyError::OperationFailed,
        );
        assert_eq!(
            notice.message,
            "Could not recommend the reply. The forum refused the request. Please try again in a moment."
        );
        let notice = Notice::action_failed("delete the reply", &ReplyError::NotFound("/x".into()));
        assert!(notice.message.contains("no longer exists"));
        assert!(notice.message.contains("try again"));
    }
}
