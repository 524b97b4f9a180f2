//! Routes incoming updates onto the ledger and renders replies.

use tally_core::ledger::{Ledger, LedgerError, parse_amount};
use tally_shared::{ChatId, DateKey};

use crate::AppState;
use crate::client::{ClientError, Update};
use crate::command::{Command, chitchat_reply, parse_command, strip_mention};

/// Handles one update end to end; only transport failures propagate.
pub async fn handle_update(state: &AppState, update: Update) -> Result<(), ClientError> {
    let Some(message) = update.message else {
        return Ok(());
    };
    let Some(text) = message.text else {
        return Ok(());
    };
    let chat = message.chat;

    if let Some(command) = parse_command(&text, &state.bot_username) {
        if let Some(reply) = run_command(&state.ledger, chat.id, &command).await {
            state.client.send_message(chat.id, &reply).await?;
        }
        return Ok(());
    }

    match free_text_reply(chat.is_private(), &text, &state.bot_username) {
        Some(reply) => state.client.send_message(chat.id, reply).await,
        None => {
            tracing::debug!(chat = %chat.id, "group message without mention, staying quiet");
            Ok(())
        }
    }
}

/// Executes `command` against the ledger and renders the reply.
///
/// Returns `None` for commands the bot deliberately does not answer.
/// Ledger errors never escape; they are turned into chat text here.
pub async fn run_command(ledger: &Ledger, chat: ChatId, command: &Command) -> Option<String> {
    match command {
        Command::Start => Some(
            "Hello! I track income, expenses and balance for this chat. \
             Send /help to see what I understand."
                .to_string(),
        ),
        Command::Help => Some(help_text()),
        Command::Spend(argument) => {
            Some(record(ledger, chat, argument.as_deref(), Kind::Expense).await)
        }
        Command::Earn(argument) => {
            Some(record(ledger, chat, argument.as_deref(), Kind::Income).await)
        }
        Command::Balance => Some(match ledger.balance(chat, ledger.now()).await {
            Ok(snapshot) => format!(
                "Current balance: {}\nSpent this month: {}",
                snapshot.balance, snapshot.monthly_spending
            ),
            Err(error) => storage_trouble(&error),
        }),
        Command::Yesterday => {
            let yesterday = DateKey::from_datetime(&ledger.now()).previous();
            let totals = ledger.day_totals(yesterday).await;
            Some(format!(
                "Yesterday ({yesterday}):\nIncome: {}\nExpenses: {}",
                totals.income, totals.expense
            ))
        }
        Command::Clear => Some(match ledger.clear(ledger.now()).await {
            Ok(()) => "All records have been cleared.".to_string(),
            Err(error) => storage_trouble(&error),
        }),
        Command::Unknown(name) => {
            tracing::debug!(command = %name, "unrecognized command, staying quiet");
            None
        }
    }
}

/// Decides the free-text reply, honoring the group mention gate.
fn free_text_reply(is_private: bool, text: &str, bot_username: &str) -> Option<&'static str> {
    if is_private {
        Some(chitchat_reply(text))
    } else {
        strip_mention(text, bot_username).map(|stripped| chitchat_reply(&stripped))
    }
}

enum Kind {
    Expense,
    Income,
}

async fn record(ledger: &Ledger, chat: ChatId, argument: Option<&str>, kind: Kind) -> String {
    let Some(raw) = argument else {
        return match kind {
            Kind::Expense => "Please provide an amount. Usage: /spend <amount>",
            Kind::Income => "Please provide an amount. Usage: /earn <amount>",
        }
        .to_string();
    };
    let amount = match parse_amount(raw) {
        Ok(amount) => amount,
        Err(_) => return "Please provide a valid positive number.".to_string(),
    };
    let now = ledger.now();
    let result = match kind {
        Kind::Expense => ledger.record_expense(chat, amount, now).await,
        Kind::Income => ledger.record_income(chat, amount, now).await,
    };
    match result {
        Ok(snapshot) => {
            let noun = match kind {
                Kind::Expense => "expense",
                Kind::Income => "income",
            };
            format!(
                "Recorded {noun}: {amount}\nCurrent balance: {}\nSpent this month: {}",
                snapshot.balance, snapshot.monthly_spending
            )
        }
        Err(LedgerError::InvalidAmount(_)) => "Please provide a valid positive number.".to_string(),
        Err(error) => {
            tracing::error!(error = %error, "recording failed to persist");
            "Recorded, but saving failed. The entry is kept and will be written with the next successful save."
                .to_string()
        }
    }
}

fn storage_trouble(error: &LedgerError) -> String {
    tracing::error!(error = %error, "ledger operation failed");
    "Something went wrong while accessing storage. Please try again later.".to_string()
}

fn help_text() -> String {
    "Commands:\n\
     /spend <amount> - record an expense\n\
     /earn <amount> - record an income\n\
     /balance - current balance and monthly spending\n\
     /yesterday - yesterday's income and expenses\n\
     /clear - delete all records\n\
     /help - this message"
        .to_string()
}
