use teloxide::{prelude::*, types::ParseMode};

pub const HELP_TEXT: &str = "<b>TwitterX Bot</b> 🐦

<b>Direct Messages &amp; Groups</b>
Just send any Twitter/X link and I'll fetch the content for you.

<b>Inline Mode</b>
Use me in any chat by typing:
<code>@twitter_x_bot &lt;link&gt;</code>

Example:
<code>@twitter_x_bot https://x.com/user/status/123</code>

<b>Commands</b>
/start - Start the bot
/help - Show this message
";

pub async fn handle_start(bot: Bot, msg: Message) -> ResponseResult<()> {
    tracing::info!(chat_id = msg.chat.id.0, "start command received");
    if let Err(e) = bot
        .send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_to_message_id(msg.id)
        .await
    {
        tracing::error!(chat_id = msg.chat.id.0, error = %e, "send start reply failed");
    }
    Ok(())
}
