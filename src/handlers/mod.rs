mod info;
mod join_request;
mod start;
pub mod utils;

pub use join_request::{handle_join_request, join_request_from_update};

use crate::commands::Command;
use crate::config::AppConfig;
use info::show_info;
use start::start;
use teloxide::{
    dispatching::UpdateHandler, dptree, prelude::*, types::Update,
    utils::command::BotCommands,
};
use tracing::info;

// NOTE: use `Bot` (not `AutoSend<Bot>`) so the code works without enabling
// teloxide's `auto-send` feature in Cargo.toml.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    cfg: AppConfig,
) -> ResponseResult<()> {
    info!("Update received: chat_id = {}, command = {:?}", msg.chat.id, cmd);
    match cmd {
        Command::Start => start(bot, msg).await?,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Ping => {
            bot.send_message(msg.chat.id, "pong").await?;
        }
        Command::Info => show_info(bot, msg, &cfg).await?,
    }
    Ok(())
}

pub fn get_update_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_chat_join_request().endpoint(handle_join_request))
}
