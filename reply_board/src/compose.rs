use crate::error::ReplyError;
use crate::models::{PostId, Reply, ReplyId};
use crate::permissions::Viewer;

/// What the shared compose box will do on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    #[default]
    Idle,
    Editing(ReplyId),
    ReplyingTo(ReplyId),
}

/// A request the page can hand to the reply service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMutation {
    Create {
        post_id: PostId,
        content: String,
        parent_id: Option<ReplyId>,
    },
    Modify {
        reply_id: ReplyId,
        content: String,
    },
    Delete {
        reply_id: ReplyId,
    },
    Recommend {
        reply_id: ReplyId,
    },
}

impl ReplyMutation {
    /// Short verb phrase for notices and logs.
    pub fn describe(&self) -> &'static str {
        match self {
            ReplyMutation::Create {
                parent_id: Some(_), ..
            } => "post your answer",
            ReplyMutation::Create { .. } => "post your reply",
            ReplyMutation::Modify { .. } => "save your changes",
            ReplyMutation::Delete { .. } => "delete the reply",
            ReplyMutation::Recommend { .. } => "recommend the reply",
        }
    }
}

/// State of the single compose box shared by every reply row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    pub mode: ComposeMode,
    pub draft: String,
    /// Set when a row action wants keyboard focus in the box; the UI clears it.
    pub focus_requested: bool,
}

impl ComposeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to editing `reply`, replacing the draft with its content.
    pub fn start_edit(&mut self, reply: &Reply, viewer: &Viewer) -> Result<(), ReplyError> {
        if !viewer.owns(reply) {
            return Err(ReplyError::PermissionDenied(format!(
                "reply {} belongs to another member",
                reply.id
            )));
        }
        if reply.is_hidden() {
            return Err(ReplyError::PermissionDenied(format!(
                "reply {} has been deleted",
                reply.id
            )));
        }
        self.mode = ComposeMode::Editing(reply.id);
        self.draft = reply.content.clone();
        self.focus_requested = true;
        Ok(())
    }

    /// Switches to answering `reply`. The draft is left as it is.
    pub fn start_reply_to(&mut self, reply: &Reply) {
        self.mode = ComposeMode::ReplyingTo(reply.id);
        self.focus_requested = true;
    }

    pub fn cancel(&mut self) {
        self.mode = ComposeMode::Idle;
        self.draft.clear();
        self.focus_requested = false;
    }

    /// The mutation a submit would send right now.
    pub fn current_request(&self, post_id: PostId) -> Result<ReplyMutation, ReplyError> {
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(ReplyError::Validation);
        }
        let content = content.to_string();
        Ok(match self.mode {
            ComposeMode::Idle => ReplyMutation::Create {
                post_id,
                content,
                parent_id: None,
            },
            ComposeMode::ReplyingTo(parent) => ReplyMutation::Create {
                post_id,
                content,
                parent_id: Some(parent),
            },
            ComposeMode::Editing(reply_id) => ReplyMutation::Modify { reply_id, content },
        })
    }

    /// Reply the box is currently bound to, if any.
    pub fn target(&self) -> Option<ReplyId> {
        match self.mode {
            ComposeMode::Idle => None,
            ComposeMode::Editing(id) | ComposeMode::ReplyingTo(id) => Some(id),
        }
    }
}
