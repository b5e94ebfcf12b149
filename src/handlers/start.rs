// Program entry for handling the /start command

use crate::handlers::utils::display_name;
use teloxide::prelude::*;
use tracing::error;

pub async fn start(bot: Bot, msg: Message) -> Result<(), teloxide::RequestError> {
    let name = display_name(msg.from.as_ref());
    let message = format!("Hello, {name}! Welcome to the bot.");

    if let Err(e) = bot.send_message(msg.chat.id, message).await {
        error!("Error sending message: {e}");
        return Err(e);
    }

    Ok(())
}
