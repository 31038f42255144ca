use reqwest::StatusCode;
use teloxide::{
    prelude::*,
    types::{ChatId, User},
    utils::command::BotCommands,
};

use api_types::line_item::{ExpenseNew, LineItemPatch, ServiceLogNew, SessionNew};

use crate::{
    ConfigParameters,
    api::{ApiError, CategoryPath},
    commands::Command,
    ui,
};

pub(crate) async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }

    let Some(from) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, "Could not identify the sender.")
            .await?;
        return Ok(());
    };
    let user_id = from.id.0;
    let chat_id = msg.chat.id;

    let reply = match cmd {
        Command::Help => Command::descriptions().to_string(),
        Command::Pc { pc, amount, notes } => match parse_amount(&amount) {
            Ok(amount) => {
                let payload = SessionNew {
                    pc: pc.clone(),
                    amount,
                    notes: (!notes.is_empty()).then_some(notes),
                };
                match cfg.api.create_session(user_id, &payload).await {
                    Ok(created) => ui::session_logged(&pc, amount, &created),
                    Err(err) => user_message_for_api_error(err),
                }
            }
            Err(reply) => reply,
        },
        Command::Service { service, amount } => {
            let amount = if amount.is_empty() {
                Ok(None)
            } else {
                parse_amount(&amount).map(Some)
            };
            match amount {
                Ok(amount) => {
                    let payload = ServiceLogNew {
                        service: service.clone(),
                        amount,
                    };
                    match cfg.api.create_service_log(user_id, &payload).await {
                        Ok(created) => ui::service_logged(&service, &created),
                        Err(err) => user_message_for_api_error(err),
                    }
                }
                Err(reply) => reply,
            }
        }
        Command::Expense { name, amount } => match parse_amount(&amount) {
            Ok(amount) => {
                let payload = ExpenseNew {
                    name: name.clone(),
                    amount,
                };
                match cfg.api.create_expense(user_id, &payload).await {
                    Ok(created) => ui::expense_logged(&name, amount, &created),
                    Err(err) => user_message_for_api_error(err),
                }
            }
            Err(reply) => reply,
        },
        Command::Summary => match cfg.api.summary(user_id).await {
            Ok(summary) => ui::render_summary(&summary),
            Err(err) => user_message_for_api_error(err),
        },
        Command::List { category } => {
            let category = if category.is_empty() {
                Ok(CategoryPath::Sessions)
            } else {
                parse_category(&category)
            };
            match category {
                Ok(category) => match cfg.api.list(user_id, category).await {
                    Ok(listed) => ui::render_items(category.noun(), &listed.items),
                    Err(err) => user_message_for_api_error(err),
                },
                Err(reply) => reply,
            }
        }
        Command::Search { query } => {
            if query.trim().is_empty() {
                "usage: /search <text>".to_string()
            } else {
                match cfg.api.search(user_id, query.trim()).await {
                    Ok(results) => ui::render_search(&results),
                    Err(err) => user_message_for_api_error(err),
                }
            }
        }
        Command::Edit {
            category,
            id,
            field,
            value,
        } => match parse_category(&category).and_then(|category| {
            build_patch(&field, &value).map(|patch| (category, patch))
        }) {
            Ok((category, patch)) => match cfg.api.edit(user_id, category, &id, &patch).await {
                Ok(()) => format!("✏ Updated {} {id}.", category.noun()),
                Err(err) => user_message_for_api_error(err),
            },
            Err(reply) => reply,
        },
        Command::Delete { category, id } => match parse_category(&category) {
            Ok(category) => match cfg.api.delete(user_id, category, &id).await {
                Ok(()) => format!("🗑 Deleted {} {id}.", category.noun()),
                Err(err) => user_message_for_api_error(err),
            },
            Err(reply) => reply,
        },
        Command::Close => {
            handle_close(&bot, chat_id, user_id, &cfg).await?;
            return Ok(());
        }
        Command::Bind => match cfg.api.set_log_channel(user_id, Some(chat_id.0)).await {
            Ok(_) => "📌 Close-out reports will be sent to this chat.".to_string(),
            Err(err) => user_message_for_api_error(err),
        },
        Command::Services => match cfg.api.services(user_id).await {
            Ok(catalog) => ui::render_services(&catalog),
            Err(err) => user_message_for_api_error(err),
        },
    };

    bot.send_message(chat_id, reply).await?;
    Ok(())
}

async fn handle_close(
    bot: &Bot,
    chat_id: ChatId,
    user_id: u64,
    cfg: &ConfigParameters,
) -> ResponseResult<()> {
    let closed = match cfg.api.close_day(user_id).await {
        Ok(closed) => closed,
        Err(err) => {
            bot.send_message(chat_id, user_message_for_api_error(err))
                .await?;
            return Ok(());
        }
    };

    let text = ui::day_closed(&closed);

    // Mirror the close-out into the bound report channel, if any.
    match cfg.api.log_channel(user_id).await {
        Ok(channel) => {
            if let Some(channel_id) = channel.channel_id
                && channel_id != chat_id.0
                && let Err(err) = bot.send_message(ChatId(channel_id), &text).await
            {
                tracing::warn!("failed to report close-out to channel {channel_id}: {err}");
            }
        }
        Err(err) => tracing::warn!("failed to read report channel: {err}"),
    }

    bot.send_message(chat_id, text).await?;
    Ok(())
}

fn parse_amount(input: &str) -> Result<i64, String> {
    input
        .parse::<i64>()
        .map_err(|_| format!("\"{input}\" is not a valid amount."))
}

fn parse_category(input: &str) -> Result<CategoryPath, String> {
    CategoryPath::parse(input)
        .ok_or_else(|| format!("Unknown category \"{input}\". Use pc, service or expense."))
}

fn build_patch(field: &str, value: &str) -> Result<LineItemPatch, String> {
    match field.to_lowercase().as_str() {
        "amount" => Ok(LineItemPatch {
            amount: Some(parse_amount(value)?),
            ..Default::default()
        }),
        "notes" => Ok(LineItemPatch {
            notes: Some(value.to_string()),
            ..Default::default()
        }),
        "pc" | "service" | "name" | "label" => Ok(LineItemPatch {
            label: Some(value.to_string()),
            ..Default::default()
        }),
        other => Err(format!(
            "Unknown field \"{other}\". Use pc/service/name, amount or notes."
        )),
    }
}

fn is_allowed(cfg: &ConfigParameters, user: Option<&User>) -> bool {
    match (&cfg.allowed_users, user) {
        (Some(allowed), Some(user)) => allowed.contains(&user.id),
        (Some(_), None) => false,
        (None, _) => true,
    }
}

fn user_message_for_api_error(err: ApiError) -> String {
    match err {
        ApiError::Network(err) => {
            tracing::warn!("api network error: {err}");
            "The server is unreachable right now.".to_string()
        }
        ApiError::Server { status, message } => match status {
            StatusCode::UNAUTHORIZED => {
                "This telegram account is not linked to a staff user.".to_string()
            }
            StatusCode::FORBIDDEN => "You are not allowed to do that.".to_string(),
            _ => message,
        },
    }
}
