use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newslens_bot::{Bot, TelegramClient};
use newslens_common::{env_or, required_env};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let token = required_env("TELEGRAM_TOKEN");
    let application_url = env_or("APPLICATION_URL", "http://localhost:8010");
    let web_url = env_or("WEB_URL", "http://localhost:3000");

    info!("NewsLens Telegram bot starting");

    let bot = Bot::new(TelegramClient::new(&token), &application_url, &web_url);
    bot.run().await;

    Ok(())
}
