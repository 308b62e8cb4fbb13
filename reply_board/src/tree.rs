use std::fmt;

use crate::models::{Reply, ReplyId, ReplyListResponse};

/// The last reply list read from the server. Replaced wholesale on every
/// successful fetch and never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplySnapshot {
    pub count: usize,
    pub replies: Vec<Reply>,
}

impl From<ReplyListResponse> for ReplySnapshot {
    fn from(list: ReplyListResponse) -> Self {
        Self {
            count: list.count,
            replies: list.replies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeViolation {
    /// A top-level reply whose level is not 1.
    RootLevel { reply: ReplyId, level: u32 },
    /// A reply whose parent is not an open ancestor at its position.
    ParentOutOfOrder { reply: ReplyId, parent: ReplyId },
    /// A reply whose level is not one deeper than its parent's.
    LevelMismatch {
        reply: ReplyId,
        level: u32,
        parent_level: u32,
    },
}

impl fmt::Display for TreeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeViolation::RootLevel { reply, level } => {
                write!(f, "top-level reply {reply} has level {level}")
            }
            TreeViolation::ParentOutOfOrder { reply, parent } => {
                write!(f, "reply {reply} does not follow its parent {parent} in pre-order")
            }
            TreeViolation::LevelMismatch {
                reply,
                level,
                parent_level,
            } => write!(
                f,
                "reply {reply} has level {level} under a parent at level {parent_level}"
            ),
        }
    }
}

impl ReplySnapshot {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            count: replies.len(),
            replies,
        }
    }

    pub fn find(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|reply| reply.id == id)
    }

    /// Checks that the sequence is a pre-order walk with consistent levels.
    ///
    /// Keeps the chain of open ancestors; a reply's parent must be on that
    /// chain when the reply appears, otherwise the parent's subtree was
    /// already closed.
    pub fn check_structure(&self) -> Result<(), TreeViolation> {
        let mut ancestors: Vec<(ReplyId, u32)> = Vec::new();
        for reply in &self.replies {
            match reply.parent_id {
                None => {
                    if reply.level != 1 {
                        return Err(TreeViolation::RootLevel {
                            reply: reply.id,
                            level: reply.level,
                        });
                    }
                    ancestors.clear();
                }
                Some(parent) => {
                    while ancestors.last().is_some_and(|(id, _)| *id != parent) {
                        ancestors.pop();
                    }
                    let Some(&(_, parent_level)) = ancestors.last() else {
                        return Err(TreeViolation::ParentOutOfOrder {
                            reply: reply.id,
                            parent,
                        });
                    };
                    if reply.level != parent_level + 1 {
                        return Err(TreeViolation::LevelMismatch {
                            reply: reply.id,
                            level: reply.level,
                            parent_level,
                        });
                    }
                }
            }
            ancestors.push((reply.id, reply.level));
        }
        Ok(())
    }
}
