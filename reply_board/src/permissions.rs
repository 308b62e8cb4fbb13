use crate::models::Reply;

/// The signed-in member looking at the page. A blank email is anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    email: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { email: None }
    }

    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            Self::anonymous()
        } else {
            Self { email: Some(email) }
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.email.is_none()
    }

    /// Anonymous viewers never own anything.
    pub fn owns(&self, reply: &Reply) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| email == reply.author_email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyAction {
    Modify,
    Delete,
    Reply,
    Recommend,
}

impl ReplyAction {
    pub fn label(self) -> &'static str {
        match self {
            ReplyAction::Modify => "Modify",
            ReplyAction::Delete => "Delete",
            ReplyAction::Reply => "Reply",
            ReplyAction::Recommend => "Recommend",
        }
    }

    /// CSS class used by the forum's markup for this control.
    pub fn css_class(self) -> &'static str {
        match self {
            ReplyAction::Modify => "modify-reply",
            ReplyAction::Delete => "delete-reply",
            ReplyAction::Reply => "re-reply",
            ReplyAction::Recommend => "recommend-reply",
        }
    }
}

/// Ordered set of controls shown under one reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionSet(Vec<ReplyAction>);

impl ActionSet {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn owner() -> Self {
        Self(vec![ReplyAction::Modify, ReplyAction::Delete, ReplyAction::Reply])
    }

    pub fn visitor() -> Self {
        Self(vec![ReplyAction::Recommend, ReplyAction::Reply])
    }

    pub fn contains(&self, action: ReplyAction) -> bool {
        self.0.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ReplyAction> + '_ {
        self.0.iter().copied()
    }
}

pub fn visible_actions(reply: &Reply, viewer: &Viewer) -> ActionSet {
    if reply.is_hidden() {
        ActionSet::none()
    } else if viewer.owns(reply) {
        ActionSet::owner()
    } else {
        ActionSet::visitor()
    }
}
