use anyhow::Result;
use reply_board::ClientConfig;

fn main() -> Result<()> {
    reply_board::init_logging();
    let mut config = ClientConfig::load()?;
    if let Some(post_id) = std::env::args().nth(1) {
        config.set_post_id(&post_id)?;
    }
    reply_board::run_frontend(config)
}
