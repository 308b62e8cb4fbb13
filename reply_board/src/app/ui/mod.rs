mod dialogs;
mod input;
mod replies;
mod top_bar;
