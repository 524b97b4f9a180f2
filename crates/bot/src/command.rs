//! Command and free-text parsing.

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` - greeting and quick orientation.
    Start,
    /// `/help` - command list.
    Help,
    /// `/spend <amount>` - record an expense.
    Spend(Option<String>),
    /// `/earn <amount>` - record an income.
    Earn(Option<String>),
    /// `/balance` - current figures.
    Balance,
    /// `/yesterday` - yesterday's income and expense totals.
    Yesterday,
    /// `/clear` - wipe the ledger.
    Clear,
    /// Any other slash command; never answered.
    Unknown(String),
}

/// Parses `text` as a slash command, `None` when it is not one.
///
/// A `@botname` suffix is accepted so `/spend@tally_bot 5` works in
/// groups. Commands suffixed with a different bot's name yield `None`:
/// they belong to that bot.
#[must_use]
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let mut parts = text.trim().split_whitespace();
    let head = parts.next()?;
    if !head.starts_with('/') {
        return None;
    }
    let name = match head.split_once('@') {
        Some((name, mention)) => {
            if !mention.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            name
        }
        None => head,
    };
    let argument = parts.next().map(ToString::to_string);
    Some(match name {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/spend" => Command::Spend(argument),
        "/earn" => Command::Earn(argument),
        "/balance" => Command::Balance,
        "/yesterday" => Command::Yesterday,
        "/clear" => Command::Clear,
        other => Command::Unknown(other.to_string()),
    })
}

/// Canned reply for non-command chatter.
#[must_use]
pub fn chitchat_reply(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    if lowered.contains("hello") {
        "Hello! How can I help you?"
    } else if lowered.contains("bye") {
        "Goodbye! Have a great day!"
    } else {
        "I am not sure how to respond to that."
    }
}

/// Removes the first `@botname` mention from free text.
///
/// Returns `None` when the text does not mention the bot, which in
/// group chats means the message is not for us.
#[must_use]
pub fn strip_mention(text: &str, bot_username: &str) -> Option<String> {
    let mention = format!("@{bot_username}");
    if !text.contains(&mention) {
        return None;
    }
    Some(text.replacen(&mention, "", 1).trim().to_string())
}
