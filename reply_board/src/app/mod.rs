use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, Context};
use log::info;

use crate::api::{ApiClient, ReplyService};
use crate::compose::ComposeState;
use crate::config::ClientConfig;
use crate::models::PostId;
use crate::permissions::Viewer;

mod messages;
mod spawners;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
pub use state::{Confirmation, Notice, ReplyListState};

/// Reply page for one post: the reply list, the shared compose box and the
/// dialogs that gate mutations.
pub struct ReplyBoardApp {
    service: Arc<dyn ReplyService>,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    post_id: PostId,
    viewer: Viewer,
    viewer_input: String,
    replies: ReplyListState,
    compose: ComposeState,
    compose_error: Option<String>,
    compose_sending: bool,
    /// Mutations and post deletes still waiting for the server.
    in_flight: usize,
    confirmation: Option<Confirmation>,
    notice: Option<Notice>,
    /// Set once the post itself is gone; holds the server's redirect target.
    post_deleted: Option<String>,
}

impl ReplyBoardApp {
    pub fn new(service: Arc<dyn ReplyService>, post_id: PostId, viewer: Viewer) -> Self {
        let (tx, rx) = mpsc::channel();
        let viewer_input = viewer.email().unwrap_or_default().to_string();
        let mut app = Self {
            service,
            tx,
            rx,
            post_id,
            viewer,
            viewer_input,
            replies: ReplyListState::default(),
            compose: ComposeState::new(),
            compose_error: None,
            compose_sending: false,
            in_flight: 0,
            confirmation: None,
            notice: None,
            post_deleted: None,
        };
        app.spawn_load_replies();
        app
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let post_id = config.post_id()?;
        let api = ApiClient::with_options(
            config.api_url.clone(),
            config.request_timeout(),
            config.delete_method(),
            config.auth_token.as_deref(),
        )?;
        info!("showing replies of post {post_id} from {}", api.base_url());
        Ok(Self::new(Arc::new(api), post_id, config.viewer()))
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn replies(&self) -> &ReplyListState {
        &self.replies
    }

    pub fn compose(&self) -> &ComposeState {
        &self.compose
    }

    pub fn compose_mut(&mut self) -> &mut ComposeState {
        &mut self.compose
    }

    pub fn compose_error(&self) -> Option<&str> {
        self.compose_error.as_deref()
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn post_deleted(&self) -> Option<&str> {
        self.post_deleted.as_deref()
    }

    /// False while a create or modify from the compose box is in flight.
    pub fn compose_editable(&self) -> bool {
        !self.compose_sending
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.replies.is_loading
    }

    pub fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    /// Waits up to `timeout` for a pending request to finish and applies it.
    pub fn wait_for_update(&mut self, timeout: Duration) -> bool {
        messages::wait_for_message(self, timeout)
    }
}

impl eframe::App for ReplyBoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        if self.post_deleted.is_none() {
            egui::TopBottomPanel::bottom("compose_box").show(ctx, |ui| {
                self.render_compose_box(ui);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_reply_list(ui);
        });

        self.render_confirmation_dialog(ctx);
        self.render_notice_dialog(ctx);

        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
