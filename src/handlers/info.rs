// Handler for the /info command.

use crate::config::AppConfig;
use teloxide::prelude::*;

pub fn describe_settings(cfg: &AppConfig) -> String {
    let greeting = if cfg.greeting_enabled {
        format!("deleted after {}s", cfg.delete_delay.as_secs())
    } else {
        "off".to_string()
    };

    format!(
        "{} v{}\nJoin requests are approved automatically.\nRepeat requests are ignored for {}s.\nWelcome message: {greeting}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        cfg.debounce_window.as_secs(),
    )
}

pub async fn show_info(
    bot: Bot,
    msg: Message,
    cfg: &AppConfig,
) -> Result<(), teloxide::RequestError> {
    bot.send_message(msg.chat.id, describe_settings(cfg)).await?;
    Ok(())
}
