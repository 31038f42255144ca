use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::users;
use migration::MigratorTrait;
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

#[derive(Parser, Debug)]
#[command(name = "daybook_admin")]
#[command(about = "Admin utilities for Daybook (manage staff accounts)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./daybook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a staff account; the password is prompted interactively.
    Create(UserCreateArgs),
    /// List all accounts with their roles.
    List,
    /// Change an account's role.
    SetRole(SetRoleArgs),
    /// Reset an account's password interactively.
    SetPassword(UsernameArg),
    /// Remove an account.
    Delete(UsernameArg),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, default_value = users::ROLE_WORKER)]
    role: String,
    #[arg(long)]
    telegram_id: Option<String>,
}

#[derive(Args, Debug)]
struct SetRoleArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    role: String,
}

#[derive(Args, Debug)]
struct UsernameArg {
    #[arg(long)]
    username: String,
}

fn parse_role(raw: &str) -> Result<String, String> {
    match raw {
        users::ROLE_ADMIN | users::ROLE_WORKER => Ok(raw.to_string()),
        other => Err(format!(
            "unsupported role: {other} (use {} or {})",
            users::ROLE_WORKER,
            users::ROLE_ADMIN
        )),
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn find_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<users::Model, Box<dyn Error + Send + Sync>> {
    match users::Entity::find_by_id(username).one(db).await? {
        Some(user) => Ok(user),
        None => {
            eprintln!("user not found: {username}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    let User { command } = match cli.command {
        Command::User(user) => user,
    };

    match command {
        UserCommand::Create(args) => {
            let role = match parse_role(&args.role) {
                Ok(role) => role,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;

            let user = users::ActiveModel {
                username: ActiveValue::Set(args.username.clone()),
                password: ActiveValue::Set(password),
                role: ActiveValue::Set(role.clone()),
                telegram_id: ActiveValue::Set(args.telegram_id),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {} ({role})", args.username);
        }
        UserCommand::List => {
            let accounts = users::Entity::find().all(&db).await?;
            if accounts.is_empty() {
                println!("no users");
            }
            for user in accounts {
                let paired = match user.telegram_id {
                    Some(id) => format!("telegram:{id}"),
                    None => "unpaired".to_string(),
                };
                println!("{}\t{}\t{paired}", user.username, user.role);
            }
        }
        UserCommand::SetRole(args) => {
            let role = match parse_role(&args.role) {
                Ok(role) => role,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            find_user(&db, &args.username).await?;
            let user = users::ActiveModel {
                username: ActiveValue::Set(args.username.clone()),
                role: ActiveValue::Set(role.clone()),
                ..Default::default()
            };
            users::Entity::update(user).exec(&db).await?;

            println!("updated role for {}: {role}", args.username);
        }
        UserCommand::SetPassword(args) => {
            find_user(&db, &args.username).await?;
            let password = prompt_password_twice()?;

            let user = users::ActiveModel {
                username: ActiveValue::Set(args.username.clone()),
                password: ActiveValue::Set(password),
                ..Default::default()
            };
            users::Entity::update(user).exec(&db).await?;

            println!("updated password for {}", args.username);
        }
        UserCommand::Delete(args) => {
            find_user(&db, &args.username).await?;
            users::Entity::delete_by_id(args.username.clone())
                .exec(&db)
                .await?;
            println!("deleted user: {}", args.username);
        }
    }

    Ok(())
}
