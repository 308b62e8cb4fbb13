use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::error;

use crate::api::ReplyService;
use crate::compose::ReplyMutation;
use crate::models::PostId;

use super::messages::AppMessage;

pub fn load_replies(
    service: Arc<dyn ReplyService>,
    tx: Sender<AppMessage>,
    post_id: PostId,
    epoch: u64,
) {
    thread::spawn(move || {
        let result = service.fetch_replies(post_id);
        let message = AppMessage::RepliesLoaded {
            post_id,
            epoch,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send RepliesLoaded message");
        }
    });
}

pub fn run_mutation(
    service: Arc<dyn ReplyService>,
    tx: Sender<AppMessage>,
    mutation: ReplyMutation,
) {
    thread::spawn(move || {
        let result = service.apply(&mutation);
        if tx
            .send(AppMessage::MutationFinished { mutation, result })
            .is_err()
        {
            error!("failed to send MutationFinished message");
        }
    });
}

pub fn delete_post(service: Arc<dyn ReplyService>, tx: Sender<AppMessage>, post_id: PostId) {
    thread::spawn(move || {
        let result = service.delete_post(post_id);
        if tx.send(AppMessage::PostDeleted { post_id, result }).is_err() {
            error!("failed to send PostDeleted message");
        }
    });
}
