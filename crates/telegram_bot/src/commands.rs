//! Command structs

use teloxide::utils::command::{BotCommands, ParseError};

pub fn split_pc(input: String) -> Result<(String, String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    if args.len() < 2 {
        Err(ParseError::Custom("usage: /pc <pc> <amount> [notes]".into()))
    } else {
        Ok((
            args[0].to_string(),
            args[1].to_string(),
            args[2..].join(" "),
        ))
    }
}

/// `/service <name...> [amount]` - a trailing number is the custom cost.
pub fn split_service(input: String) -> Result<(String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    match args.as_slice() {
        [] => Err(ParseError::Custom("usage: /service <name> [amount]".into())),
        [name] => Ok((name.to_string(), String::new())),
        [name @ .., last] if last.parse::<i64>().is_ok() => {
            Ok((name.join(" "), last.to_string()))
        }
        _ => Ok((args.join(" "), String::new())),
    }
}

/// `/expense <name...> <amount>` - the last token is the amount.
pub fn split_expense(input: String) -> Result<(String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    if args.len() < 2 {
        Err(ParseError::Custom("usage: /expense <name> <amount>".into()))
    } else {
        Ok((
            args[..args.len() - 1].join(" "),
            args[args.len() - 1].to_string(),
        ))
    }
}

pub fn split_edit(input: String) -> Result<(String, String, String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    if args.len() < 4 {
        Err(ParseError::Custom(
            "usage: /edit <pc|service|expense> <id> <field> <value>".into(),
        ))
    } else {
        Ok((
            args[0].to_string(),
            args[1].to_string(),
            args[2].to_string(),
            args[3..].join(" "),
        ))
    }
}

/// `/list [category]` - the category is optional and defaults elsewhere.
pub fn split_list(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

pub fn split_delete(input: String) -> Result<(String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    if args.len() < 2 {
        Err(ParseError::Custom(
            "usage: /delete <pc|service|expense> <id>".into(),
        ))
    } else {
        Ok((args[0].to_string(), args[1].to_string()))
    }
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Daybook commands:")]
pub enum Command {
    #[command(description = "show this message.")]
    Help,
    #[command(
        description = "log a PC session: /pc <pc> <amount> [notes]",
        parse_with = split_pc
    )]
    Pc {
        pc: String,
        amount: String,
        notes: String,
    },
    #[command(
        description = "log a service sale: /service <name> [amount]",
        parse_with = split_service
    )]
    Service { service: String, amount: String },
    #[command(
        description = "log an expense: /expense <name> <amount>",
        parse_with = split_expense
    )]
    Expense { name: String, amount: String },
    #[command(description = "today's totals and records.")]
    Summary,
    #[command(
        description = "list records: /list [pc|service|expense]",
        parse_with = split_list
    )]
    List { category: String },
    #[command(description = "search records: /search <text>", parse_with = split_list)]
    Search { query: String },
    #[command(
        description = "edit a record: /edit <pc|service|expense> <id> <field> <value>",
        parse_with = split_edit
    )]
    Edit {
        category: String,
        id: String,
        field: String,
        value: String,
    },
    #[command(
        description = "delete a record: /delete <pc|service|expense> <id>",
        parse_with = split_delete
    )]
    Delete { category: String, id: String },
    #[command(description = "close the day and archive it.")]
    Close,
    #[command(description = "send close-out reports to this chat.")]
    Bind,
    #[command(description = "list the service catalog.")]
    Services,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pc_splits_pc_amount_and_notes() {
        let (pc, amount, notes) = split_pc("PC1 50 vip room".to_string()).unwrap();
        assert_eq!(pc, "PC1");
        assert_eq!(amount, "50");
        assert_eq!(notes, "vip room");

        let (_, _, notes) = split_pc("PC1 50".to_string()).unwrap();
        assert!(notes.is_empty());

        assert!(split_pc("PC1".to_string()).is_err());
    }

    #[test]
    fn service_takes_trailing_number_as_custom_cost() {
        let (name, amount) = split_service("Printing".to_string()).unwrap();
        assert_eq!(name, "Printing");
        assert!(amount.is_empty());

        let (name, amount) = split_service("Game Top Up 120".to_string()).unwrap();
        assert_eq!(name, "Game Top Up");
        assert_eq!(amount, "120");

        assert!(split_service(String::new()).is_err());
    }

    #[test]
    fn expense_takes_last_token_as_amount() {
        let (name, amount) = split_expense("printer ink 35".to_string()).unwrap();
        assert_eq!(name, "printer ink");
        assert_eq!(amount, "35");

        assert!(split_expense("ink".to_string()).is_err());
    }

    #[test]
    fn edit_keeps_value_tail_whole() {
        let (category, id, field, value) =
            split_edit("pc abc-123 notes brought own headset".to_string()).unwrap();
        assert_eq!(category, "pc");
        assert_eq!(id, "abc-123");
        assert_eq!(field, "notes");
        assert_eq!(value, "brought own headset");

        assert!(split_edit("pc abc-123 notes".to_string()).is_err());
    }
}
