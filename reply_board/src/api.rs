use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::compose::ReplyMutation;
use crate::error::ReplyError;
use crate::models::{
    AjaxResponse, CreateReplyInput, ModifyReplyInput, MutationAck, PostId, ReplyId,
    ReplyListResponse,
};
use crate::tree::ReplySnapshot;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the forum sends the browser after a post is really gone.
const BOARD_LIST_PATH: &str = "/board/list";
const LOGIN_PATH: &str = "/member/login";

/// HTTP verb used for reply deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMethod {
    #[default]
    Post,
    /// For servers that only route the delete endpoint as a GET.
    LegacyGet,
}

/// Everything the reply page needs from the forum.
pub trait ReplyService: Send + Sync {
    fn fetch_replies(&self, post_id: PostId) -> Result<ReplySnapshot, ReplyError>;
    fn create_reply(&self, post_id: PostId, input: &CreateReplyInput) -> Result<(), ReplyError>;
    fn modify_reply(&self, reply_id: ReplyId, input: &ModifyReplyInput) -> Result<(), ReplyError>;
    fn delete_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError>;
    fn recommend_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError>;
    /// Deletes the whole post and returns where the server sent us afterwards.
    fn delete_post(&self, post_id: PostId) -> Result<String, ReplyError>;

    fn apply(&self, mutation: &ReplyMutation) -> Result<(), ReplyError> {
        match mutation {
            ReplyMutation::Create {
                post_id,
                content,
                parent_id,
            } => self.create_reply(
                *post_id,
                &CreateReplyInput {
                    content: content.clone(),
                    parent_reply_id: *parent_id,
                },
            ),
            ReplyMutation::Modify { reply_id, content } => self.modify_reply(
                *reply_id,
                &ModifyReplyInput {
                    content: content.clone(),
                },
            ),
            ReplyMutation::Delete { reply_id } => self.delete_reply(*reply_id),
            ReplyMutation::Recommend { reply_id } => self.recommend_reply(*reply_id),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    delete_method: DeleteMethod,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, DEFAULT_TIMEOUT, DeleteMethod::default(), None)
    }

    /// `auth_token` is sent as a bearer token on every request.
    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        delete_method: DeleteMethod,
        auth_token: Option<&str>,
    ) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("auth token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
            delete_method,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ReplyError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ReplyError::Network(format!("invalid base URL: {err}")))?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ReplyError> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReplyError::from_status(status, response.url().path()));
        }
        // The forum answers unauthenticated calls by redirecting to its login form.
        if response.url().path() == LOGIN_PATH {
            return Err(ReplyError::PermissionDenied(
                "the forum asked to sign in; check the auth token".into(),
            ));
        }
        Ok(response)
    }

    fn ajax<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ReplyError> {
        let envelope: AjaxResponse<T> = self.send(request)?.json()?;
        Ok(envelope.data)
    }

    fn acknowledged(&self, request: RequestBuilder) -> Result<(), ReplyError> {
        let ack: MutationAck = self.ajax(request)?;
        if ack.result {
            Ok(())
        } else {
            Err(ReplyError::OperationFailed)
        }
    }
}

impl ReplyService for ApiClient {
    fn fetch_replies(&self, post_id: PostId) -> Result<ReplySnapshot, ReplyError> {
        let url = self.url(&format!("/ajax/board/reply/{post_id}"))?;
        let list: ReplyListResponse = self.ajax(self.client.get(url))?;
        if list.count != list.replies.len() {
            warn!(
                "post {post_id}: server reported {} replies but sent {}",
                list.count,
                list.replies.len()
            );
        }
        Ok(list.into())
    }

    fn create_reply(&self, post_id: PostId, input: &CreateReplyInput) -> Result<(), ReplyError> {
        let url = self.url(&format!("/ajax/board/reply/{post_id}"))?;
        debug!("creating reply on post {post_id} (parent {:?})", input.parent_reply_id);
        self.acknowledged(self.client.post(url).form(input))
    }

    fn modify_reply(&self, reply_id: ReplyId, input: &ModifyReplyInput) -> Result<(), ReplyError> {
        let url = self.url(&format!("/ajax/board/reply/modify/{reply_id}"))?;
        self.acknowledged(self.client.post(url).form(input))
    }

    fn delete_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError> {
        let url = self.url(&format!("/ajax/board/reply/delete/{reply_id}"))?;
        let request = match self.delete_method {
            DeleteMethod::Post => self.client.post(url),
            DeleteMethod::LegacyGet => self.client.get(url),
        };
        self.acknowledged(request)
    }

    fn recommend_reply(&self, reply_id: ReplyId) -> Result<(), ReplyError> {
        let url = self.url(&format!("/ajax/board/reply/recommend/{reply_id}"))?;
        self.acknowledged(self.client.get(url))
    }

    fn delete_post(&self, post_id: PostId) -> Result<String, ReplyError> {
        let url = self.url(&format!("/board/delete/{post_id}"))?;
        let response = self.send(self.client.get(url))?;
        let location = response.url().path().to_string();
        if location != BOARD_LIST_PATH {
            warn!("post {post_id}: delete ended at {location} instead of the board list");
            return Err(ReplyError::OperationFailed);
        }
        Ok(location)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slashes() {
        let client = ApiClient::new("forum.local:8080//").unwrap();
        assert_eq!(client.base_url(), "http://forum.local:8080");
        let client = ApiClient::new("https://forum.example.com/").unwrap();
        assert_eq!(client.base_url(), "https://forum.example.com");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(ApiClient::new("http://exa mple.com").is_err());
    }

    #[test]
    fn rejects_token_that_cannot_be_a_header() {
        let result = ApiClient::with_options(
            "http://127.0.0.1:8080",
            DEFAULT_TIMEOUT,
            DeleteMethod::Post,
            Some("bad\ntoken"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_paths_replace_base_path() {
        let client = ApiClient::new("http://127.0.0.1:8080").unwrap();
        let url = client.url("/ajax/board/reply/modify/9").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/ajax/board/reply/modify/9");
    }
}
