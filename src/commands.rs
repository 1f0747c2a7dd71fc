use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "подписаться на рассылку.")]
    Start,
    #[command(description = "справка по боту.")]
    Help,
    #[command(description = "отписаться от рассылки.")]
    Unsubscribe,
    #[command(description = "панель администратора.")]
    Admin,
}
