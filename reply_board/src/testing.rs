//! In-memory forum used by the app tests.

use std::sync::Mutex;

use crate::api::ReplyService;
use crate::error::ReplyError;
use crate::models::{Author, CreateReplyInput, ModifyReplyInput, PostId, Reply, ReplyId};
use crate::tree::ReplySnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(PostId),
    Create(PostId, CreateReplyInput),
    Modify(ReplyId, ModifyReplyInput),
    Delete(ReplyId),
    Recommend(ReplyId),
    DeletePost(PostId),
}

#[derive(Default)]
struct Forum {
    replies: Vec<Reply>,
    next_id: i64,
    calls: Vec<Call>,
    failures: Vec<ReplyError>,
}

/// Acts as a forum for `author_email`, storing replies in pre-order.
pub struct FakeForum {
    author_email: String,
    inner: Mutex<Forum>,
}

impl FakeForum {
    pub fn new(author_email: &str, replies: Vec<Reply>) -> Self {
        let next_id = replies.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        Self {
            author_email: author_email.to_string(),
            inner: Mutex::new(Forum {
                replies,
                next_id,
                ..Forum::default()
            }),
        }
    }

    /// Makes the next mutation or fetch fail with `err`.
    pub fn fail_next(&self, err: ReplyError) {
        self.inner.lock().unwrap().failures.push(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Forum>, ReplyError> {
        let mut forum = self.inner.lock().unwrap();
        forum.calls.push(call);
        if !forum.failures.is_empty() {
            return Err(forum.failures.remove(0));
        }
        Ok(forum)
    }
}

impl ReplyService for FakeForum {
    fn fetch_replies(&self, post_id: PostId) -> Result<ReplySnapshot, ReplyError> {
        let forum = self.record(Call::Fetch(post_id))?;
        Ok(ReplySnapshot::new(forum.replies.clone()))
    }

    fn create_reply(&self, post_id: PostId, input: &CreateReplyInput) -> Result<(), ReplyError> {
        let mut forum = self.record(Call::Create(post_id, input.clone()))?;
        let id = ReplyId(forum.next_id);
        forum.next_id += 1;
        let (position, level) = match input.parent_reply_id {
            None => (forum.replies.len(), 1),
            Some(parent) => {
                let index = forum
                    .replies
                    .iter()
                    .position(|r| r.id == parent)
                    .ok_or_else(|| ReplyError::NotFound(format!("reply {parent}")))?;
                let parent_level = forum.replies[index].level;
                let end = forum.replies[index + 1..]
                    .iter()
                    .position(|r| r.level <= parent_level)
                    .map(|offset| index + 1 + offset)
                    .unwrap_or(forum.replies.len());
                (end, parent_level + 1)
            }
        };
        let reply = Reply {
            id,
            parent_id: input.parent_reply_id,
            level,
            author_email: self.author_email.clone(),
            content: input.content.clone(),
            created_at: "2024-03-01 12:00:00".into(),
            modified_at: "2024-03-01 12:00:00".into(),
            recommend_count: 0,
            deleted: false,
            author: Author {
                name: "Tester".into(),
                email: self.author_email.clone(),
                account_deleted: false,
            },
        };
        forum.replies.insert(position, reply);
        Ok(())
    }

    fn modify_reply(&self, reply_id: ReplyId, input: &ModifyReplyInput) -> Result<(), ReplyError> {
        let mut forum = self.record(Call::Modify(reply_id, input.clone()))?;
        let reply = forum
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id)
            .ok_or_else(|| ReplyError::NotFound(format!("reply {reply_id}")))?;
        reply.content = input.content.clone();
        reply.modified_at = "2024-03-01 13:00:00".into();
        Ok(())
    }

    fn delete_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError> {
        let mut forum = self.record(Call::Delete(reply_id))?;
        let reply = forum
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id)
            .ok_or_else(|| ReplyError::NotFound(format!("reply {reply_id}")))?;
        reply.deleted = true;
        Ok(())
    }

    fn recommend_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError> {
        let mut forum = self.record(Call::Recommend(reply_id))?;
        let reply = forum
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id)
            .ok_or_else(|| ReplyError::NotFound(format!("reply {reply_id}")))?;
        reply.recommend_count += 1;
        Ok(())
    }

    fn delete_post(&self, post_id: PostId) -> Result<String, ReplyError> {
        let mut forum = self.record(Call::DeletePost(post_id))?;
        forum.replies.clear();
        Ok("/board/list".to_string())
    }
}
