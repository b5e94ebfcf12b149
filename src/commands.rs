use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start using the bot")]
    Start,

    #[command(description = "display this text.")]
    Help,

    #[command(description = "check that the bot is alive")]
    Ping,

    #[command(description = "show the join-request settings")]
    Info,
}
