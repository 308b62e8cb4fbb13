//! Projection of a fetched reply sequence into display rows.
//!
//! The output depends only on the replies and the viewer, so the list is
//! rebuilt from scratch after every fetch instead of being patched.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::{Reply, ReplyId};
use crate::permissions::{visible_actions, ActionSet, Viewer};

/// Horizontal offset added per nesting level, in logical pixels.
pub const INDENT_PER_LEVEL: f32 = 40.0;

/// Background used for both kinds of placeholder rows (RGBA).
pub const PLACEHOLDER_TINT: [u8; 4] = [0xFF, 0x00, 0x00, 0x33];

pub const DELETED_MESSAGE: &str = "This reply has been deleted.";
pub const WITHDRAWN_MESSAGE: &str = "This reply was written by a member who has left.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Deleted,
    AuthorWithdrawn,
}

impl Placeholder {
    pub fn message(self) -> &'static str {
        match self {
            Placeholder::Deleted => DELETED_MESSAGE,
            Placeholder::AuthorWithdrawn => WITHDRAWN_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleReply {
    pub author_line: String,
    pub recommend_line: String,
    pub created_line: String,
    pub edited_fragment: Option<String>,
    /// Verbatim reply text.
    pub content: String,
    pub actions: ActionSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowBody {
    Placeholder(Placeholder),
    Visible(VisibleReply),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRow {
    pub reply_id: ReplyId,
    pub level: u32,
    pub indent: f32,
    pub body: RowBody,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedReplies {
    pub rows: Vec<ReplyRow>,
}

pub fn indent_for_level(level: u32) -> f32 {
    level.saturating_sub(1) as f32 * INDENT_PER_LEVEL
}

pub fn render_replies(replies: &[Reply], viewer: &Viewer) -> RenderedReplies {
    RenderedReplies {
        rows: replies.iter().map(|reply| render_row(reply, viewer)).collect(),
    }
}

fn render_row(reply: &Reply, viewer: &Viewer) -> ReplyRow {
    let body = if reply.deleted {
        RowBody::Placeholder(Placeholder::Deleted)
    } else if reply.author_account_deleted() {
        RowBody::Placeholder(Placeholder::AuthorWithdrawn)
    } else {
        RowBody::Visible(VisibleReply {
            author_line: format!("{} ({})", reply.author_name(), reply.author_email),
            recommend_line: format!("Recommended: {}", reply.recommend_count),
            created_line: format!("Posted: {}", format_timestamp(&reply.created_at)),
            edited_fragment: reply
                .is_edited()
                .then(|| format!("(edited: {})", format_timestamp(&reply.modified_at))),
            content: reply.content.clone(),
            actions: visible_actions(reply, viewer),
        })
    };
    ReplyRow {
        reply_id: reply.id,
        level: reply.level,
        indent: indent_for_level(reply.level),
        body,
    }
}

/// Shows forum timestamps (`2024-03-01 10:00:00` or RFC 3339) uniformly,
/// falling back to the raw text.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string();
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

impl RenderedReplies {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Markup in the shape of the forum's own reply list. All reply text is
    /// escaped, so content never turns into markup.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<div class=\"reply-items\">\n");
        for row in &self.rows {
            let _ = write!(
                out,
                "  <div class=\"reply\" data-reply-id=\"{}\" style=\"padding-left: {}px",
                row.reply_id, row.indent
            );
            match &row.body {
                RowBody::Placeholder(placeholder) => {
                    let [r, g, b, a] = PLACEHOLDER_TINT;
                    let _ = writeln!(
                        out,
                        "; background-color: rgba({r}, {g}, {b}, {:.1})\">{}</div>",
                        f32::from(a) / 255.0,
                        html_escape::encode_text(placeholder.message())
                    );
                }
                RowBody::Visible(visible) => {
                    out.push_str("\">\n");
                    let _ = writeln!(
                        out,
                        "    <div class=\"author\">{}</div>",
                        html_escape::encode_text(&visible.author_line)
                    );
                    let _ = writeln!(
                        out,
                        "    <div class=\"recommend-count\">{}</div>",
                        html_escape::encode_text(&visible.recommend_line)
                    );
                    let _ = write!(
                        out,
                        "    <div class=\"datetime\"><span class=\"crtdt\">{}</span>",
                        html_escape::encode_text(&visible.created_line)
                    );
                    if let Some(edited) = &visible.edited_fragment {
                        let _ = write!(
                            out,
                            "<span class=\"mdfydt\">{}</span>",
                            html_escape::encode_text(edited)
                        );
                    }
                    out.push_str("</div>\n");
                    let _ = writeln!(
                        out,
                        "    <pre class=\"content\">{}</pre>",
                        html_escape::encode_text(&visible.content)
                    );
                    out.push_str("    <div>");
                    for action in visible.actions.iter() {
                        let _ = write!(
                            out,
                            "<span class=\"{}\">{}</span>",
                            action.css_class(),
                            action.label()
                        );
                    }
                    out.push_str("</div>\n  </div>\n");
                }
            }
        }
        out.push_str("</div>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::ReplyAction;
    use crate::tree::fixtures::reply;
    use pretty_assertions::assert_eq;

    fn visible(row: &ReplyRow) -> &VisibleReply {
        match &row.body {
            RowBody::Visible(v) => v,
            RowBody::Placeholder(p) => panic!("expected visible row, got {p:?}"),
        }
    }

    #[test]
    fn indents_by_level() {
        let replies = vec![
            reply(1, None, 1, "a@x.io"),
            reply(2, Some(1), 2, "b@x.io"),
            reply(3, Some(2), 3, "a@x.io"),
        ];
        let rendered = render_replies(&replies, &Viewer::anonymous());
        let indents: Vec<f32> = rendered.rows.iter().map(|r| r.indent).collect();
        assert_eq!(indents, vec![0.0, 40.0, 80.0]);
    }

    #[test]
    fn visible_row_lines_and_actions() {
        let mut r = reply(1, None, 1, "kim@x.io");
        r.author.name = "Kim".into();
        r.recommend_count = 3;
        r.content = "first\n   indented <b>not bold</b>".into();
        let rendered = render_replies(&[r], &Viewer::from_email("kim@x.io"));
        let row = visible(&rendered.rows[0]);
        assert_eq!(row.author_line, "Kim (kim@x.io)");
        assert_eq!(row.recommend_line, "Recommended: 3");
        assert_eq!(row.created_line, "Posted: 2024-03-01 10:00");
        assert_eq!(row.edited_fragment, None);
        assert_eq!(row.content, "first\n   indented <b>not bold</b>");
        assert!(row.actions.contains(ReplyAction::Modify));
    }

    #[test]
    fn edited_fragment_only_when_timestamps_differ() {
        let mut r = reply(1, None, 1, "a@x.io");
        r.modified_at = "2024-03-02 08:15:00".into();
        let rendered = render_replies(&[r], &Viewer::anonymous());
        assert_eq!(
            visible(&rendered.rows[0]).edited_fragment.as_deref(),
            Some("(edited: 2024-03-02 08:15)")
        );
    }

    #[test]
    fn placeholders_hide_everything_but_keep_position() {
        let mut deleted = reply(2, Some(1), 2, "me@x.io");
        deleted.deleted = true;
        deleted.content = "secret".into();
        let mut withdrawn = reply(3, Some(2), 3, "gone@x.io");
        withdrawn.author.account_deleted = true;
        withdrawn.content = "also secret".into();
        let replies = vec![reply(1, None, 1, "a@x.io"), deleted, withdrawn];

        let rendered = render_replies(&replies, &Viewer::from_email("me@x.io"));
        assert_eq!(rendered.rows[1].body, RowBody::Placeholder(Placeholder::Deleted));
        assert_eq!(rendered.rows[1].indent, 40.0);
        assert_eq!(
            rendered.rows[2].body,
            RowBody::Placeholder(Placeholder::AuthorWithdrawn)
        );
        assert_eq!(rendered.rows[2].indent, 80.0);

        let html = rendered.to_html();
        assert!(!html.contains("secret"));
        assert!(!html.contains("gone@x.io"));
        assert!(html.contains(DELETED_MESSAGE));
        assert!(html.contains(WITHDRAWN_MESSAGE));
        assert_ne!(DELETED_MESSAGE, WITHDRAWN_MESSAGE);
    }

    #[test]
    fn reply_deletion_wins_over_withdrawn_author() {
        let mut r = reply(1, None, 1, "a@x.io");
        r.deleted = true;
        r.author.account_deleted = true;
        let rendered = render_replies(&[r], &Viewer::anonymous());
        assert_eq!(rendered.rows[0].body, RowBody::Placeholder(Placeholder::Deleted));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut replies = vec![
            reply(1, None, 1, "a@x.io"),
            reply(2, Some(1), 2, "b@x.io"),
            reply(3, None, 1, "c@x.io"),
        ];
        replies[1].deleted = true;
        let viewer = Viewer::from_email("a@x.io");
        let first = render_replies(&replies, &viewer);
        let second = render_replies(&replies, &viewer);
        assert_eq!(first, second);
        assert_eq!(first.to_html(), second.to_html());
    }

    #[test]
    fn html_escapes_content_and_keeps_whitespace() {
        let mut r = reply(5, None, 1, "a@x.io");
        r.content = "<script>alert(1)</script>\n  two".into();
        let html = render_replies(&[r], &Viewer::anonymous()).to_html();
        assert!(html.contains(
            "<pre class=\"content\">&lt;script&gt;alert(1)&lt;/script&gt;\n  two</pre>"
        ));
        assert!(html.contains("data-reply-id=\"5\" style=\"padding-left: 0px\""));
        assert!(html.contains("<span class=\"recommend-reply\">Recommend</span>"));
    }

    #[test]
    fn unparseable_timestamp_is_shown_verbatim() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(
            format_timestamp("2024-03-01T10:00:00+09:00"),
            "2024-03-01 01:00 UTC"
        );
    }
}
