use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reply as the forum serves it: a flat record whose place in the tree
/// is given by `parent_id` and `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "replyId")]
    pub id: ReplyId,
    #[serde(
        rename = "parentReplyId",
        default,
        deserialize_with = "parent_from_wire",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<ReplyId>,
    pub level: u32,
    #[serde(rename = "email")]
    pub author_email: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "crtDt")]
    pub created_at: String,
    #[serde(rename = "mdfyDt", default)]
    pub modified_at: String,
    #[serde(rename = "recommendCnt", default)]
    pub recommend_count: u32,
    #[serde(rename = "delYn", default, with = "yes_no")]
    pub deleted: bool,
    #[serde(rename = "memberVO")]
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "delYn", default, with = "yes_no")]
    pub account_deleted: bool,
}

impl Reply {
    pub fn author_name(&self) -> &str {
        &self.author.name
    }

    pub fn author_account_deleted(&self) -> bool {
        self.author.account_deleted
    }

    /// Soft-deleted for display purposes, for either cause.
    pub fn is_hidden(&self) -> bool {
        self.deleted || self.author.account_deleted
    }

    pub fn is_edited(&self) -> bool {
        !self.modified_at.is_empty() && self.modified_at != self.created_at
    }
}

/// Envelope every `/ajax` endpoint wraps its payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AjaxResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyListResponse {
    pub count: usize,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationAck {
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReplyInput {
    pub content: String,
    #[serde(rename = "parentReplyId", skip_serializing_if = "Option::is_none")]
    pub parent_reply_id: Option<ReplyId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyReplyInput {
    pub content: String,
}

/// The forum sends `null`, omits the field, or uses `0` for top-level replies.
fn parent_from_wire<'de, D>(deserializer: D) -> Result<Option<ReplyId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.filter(|id| *id > 0).map(ReplyId))
}

/// `"Y"` / `"N"` flags, tolerating plain booleans.
mod yes_no {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Text(String),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "Y" } else { "N" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Text(text)) => Ok(text.trim().eq_ignore_ascii_case("y")),
            Some(Flag::Bool(flag)) => Ok(flag),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_forum_reply_record() {
        let raw = r#"{
            "replyId": 7,
            "boardId": 42,
            "parentReplyId": 3,
            "level": 2,
            "email": "kim@example.com",
            "content": "line one\n  line two",
            "crtDt": "2024-03-01 10:00:00",
            "mdfyDt": "2024-03-01 11:30:00",
            "recommendCnt": 4,
            "delYn": "N",
            "memberVO": { "name": "Kim", "email": "kim@example.com", "delYn": "N" }
        }"#;
        let reply: Reply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.id, ReplyId(7));
        assert_eq!(reply.parent_id, Some(ReplyId(3)));
        assert_eq!(reply.level, 2);
        assert_eq!(reply.author_name(), "Kim");
        assert_eq!(reply.content, "line one\n  line two");
        assert_eq!(reply.recommend_count, 4);
        assert!(!reply.deleted);
        assert!(!reply.author_account_deleted());
        assert!(reply.is_edited());
    }

    #[test]
    fn zero_or_null_parent_means_top_level() {
        for parent in ["0", "null"] {
            let raw = format!(
                r#"{{"replyId":1,"parentReplyId":{parent},"level":1,"email":"a@b.c",
                    "content":"x","crtDt":"t","mdfyDt":"t","delYn":"N",
                    "memberVO":{{"name":"A","delYn":"N"}}}}"#
            );
            let reply: Reply = serde_json::from_str(&raw).unwrap();
            assert_eq!(reply.parent_id, None);
            assert!(!reply.is_edited());
        }
    }

    #[test]
    fn deletion_flags_accept_yn_and_booleans() {
        let raw = r#"{"replyId":1,"level":1,"email":"a@b.c","crtDt":"t",
            "delYn":"y","memberVO":{"name":"A","delYn":true}}"#;
        let reply: Reply = serde_json::from_str(raw).unwrap();
        assert!(reply.deleted);
        assert!(reply.author_account_deleted());
        assert!(reply.is_hidden());
    }

    #[test]
    fn create_input_omits_missing_parent() {
        let top = CreateReplyInput {
            content: "hi".into(),
            parent_reply_id: None,
        };
        assert_eq!(serde_json::to_string(&top).unwrap(), r#"{"content":"hi"}"#);
        let nested = CreateReplyInput {
            content: "hi".into(),
            parent_reply_id: Some(ReplyId(1)),
        };
        assert_eq!(
            serde_json::to_string(&nested).unwrap(),
            r#"{"content":"hi","parentReplyId":1}"#
        );
    }
}
