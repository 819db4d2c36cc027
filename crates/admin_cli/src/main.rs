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
use engine::{Engine, EngineError, password};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod seed;

#[derive(Parser, Debug)]
#[command(name = "budget_admin")]
#[command(about = "Admin utilities for the budget tracker (users, sample data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./budget.db?mode=rwc"
    )]
    database_url: String,

    /// bcrypt work factor for new password hashes.
    #[arg(long, default_value_t = password::DEFAULT_COST)]
    bcrypt_cost: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Wipe every table and load the fixed sample data.
    Seed,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Keeps the terminal in raw mode while a password is typed.
struct RawMode;

impl RawMode {
    fn enable() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Print `line` on a fresh terminal line (raw mode needs explicit `\r`).
fn notice(out: &mut impl Write, line: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(line),
        Print("\r\n")
    )?;
    Ok(())
}

/// Read a line from the terminal, echoing `*` for each character.
fn read_masked(prompt: &str) -> CliResult<String> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    execute!(out, cursor::MoveToColumn(0), Print(prompt))?;

    let mut typed = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if ctrl => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace if typed.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !ctrl => {
                typed.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    Ok(typed)
}

/// Ask for a new password and its confirmation, up to three times.
fn prompt_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = read_masked("Password: ")?;
        if first.is_empty() {
            notice(&mut out, "Password must not be empty.")?;
            continue;
        }
        if read_masked("Confirm password: ")? == first {
            return Ok(first);
        }
        notice(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .password_cost(cli.bcrypt_cost)
        .build()
        .await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;

            match engine.register(&args.username, &password).await {
                Ok(user) => println!("created user: {} (id {})", user.username, user.id),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Seed => {
            println!("Seeding database...");
            let summary = seed::seed(&engine).await?;
            println!(
                "seeded {} users, {} categories, {} items, {} shared budgets",
                summary.users, summary.categories, summary.items, summary.shared
            );
        }
    }

    Ok(())
}
