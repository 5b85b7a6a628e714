//! Binary entrypoint for the shellbbs CLI.
//!
//! Commands:
//! - `serve` - run the SSH BBS server
//! - `init` - create a starter `config.toml` and seed the data directory
//! - `admin <subcommand>` - maintenance operations straight against the
//!   store: adduser, setrole, deleteuser, resetpassword, addforum,
//!   editforum, deleteforum, deletetopic, deletepost
//!
//! See the library crate docs for module-level details: `shellbbs::`.
use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use shellbbs::bbs::BbsServer;
use shellbbs::config::Config;
use shellbbs::storage::Store;
use shellbbs::validation;

#[derive(Parser)]
#[command(name = "shellbbs")]
#[command(about = "A multi-user forum BBS served over SSH")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the SSH server
    Serve,
    /// Initialize a new configuration and seed the data directory
    Init,
    /// Operate directly on the store, bypassing the session layer
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a user (password prompted interactively)
    Adduser {
        username: String,
        /// user, moderator or admin
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Change a user's role
    Setrole { username: String, role: String },
    /// Delete a user
    Deleteuser { username: String },
    /// Set a new password for a user (prompted interactively)
    Resetpassword { username: String },
    /// Create a forum (name and description prompted on stdin)
    Addforum,
    /// Edit a forum's name and description
    Editforum { id: String },
    /// Delete a forum and everything under it
    Deleteforum { id: String },
    /// Delete a topic and its posts
    Deletetopic { id: String },
    /// Delete a single post
    Deletepost { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Serve => {
            let config = match pre_config {
                Some(c) => c,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting shellbbs v{}", env!("CARGO_PKG_VERSION"));
            let store = Arc::new(Store::new(&config.storage.data_dir).await?);
            store.ensure_seed().await?;
            BbsServer::run(config, store).await?;
        }
        Commands::Init => {
            info!("Initializing new configuration");
            let config = Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            let store = Store::new(&config.storage.data_dir).await?;
            store.ensure_seed().await?;
            info!("Seeded data directory at {}", config.storage.data_dir);
            println!("Done. Review {} before starting the server.", cli.config);
        }
        Commands::Admin { command } => {
            let config = match pre_config {
                Some(c) => c,
                None => Config::load(&cli.config).await?,
            };
            let store = Store::new(&config.storage.data_dir).await?;
            run_admin(command, &store).await?;
        }
    }

    Ok(())
}

async fn run_admin(command: AdminCommands, store: &Store) -> Result<()> {
    match command {
        AdminCommands::Adduser { username, role } => {
            let role = validation::validate_role(&role)?;
            let password = prompt_new_password()?;
            let user = store.create_user(&username, &password, role).await?;
            println!("Created user '{}' with role {}.", user.username, user.role);
        }
        AdminCommands::Setrole { username, role } => {
            let role = validation::validate_role(&role)?;
            let user = store.set_role(&username, role).await?;
            println!("'{}' is now {}.", user.username, user.role);
        }
        AdminCommands::Deleteuser { username } => {
            store.delete_user(&username).await?;
            println!("Deleted user '{}'.", username);
        }
        AdminCommands::Resetpassword { username } => {
            let password = prompt_new_password()?;
            store.reset_password(&username, &password).await?;
            println!("Password updated for '{}'.", username);
        }
        AdminCommands::Addforum => {
            let name = prompt("Forum name: ")?;
            let description = prompt("Description: ")?;
            let forum = store.create_forum(name.trim(), description.trim()).await?;
            println!("Created forum '{}' (id {}).", forum.name, forum.id);
        }
        AdminCommands::Editforum { id } => {
            let id = parse_id(&id)?;
            let name = prompt("New name: ")?;
            let description = prompt("New description: ")?;
            let forum = store
                .update_forum(id, name.trim(), description.trim())
                .await?;
            println!("Updated forum '{}' (id {}).", forum.name, forum.id);
        }
        AdminCommands::Deleteforum { id } => {
            let id = parse_id(&id)?;
            store.delete_forum(id).await?;
            println!("Deleted forum {} and everything under it.", id);
        }
        AdminCommands::Deletetopic { id } => {
            let id = parse_id(&id)?;
            store.delete_topic(id).await?;
            println!("Deleted topic {} and its posts.", id);
        }
        AdminCommands::Deletepost { id } => {
            let id = parse_id(&id)?;
            store.delete_post(id).await?;
            println!("Deleted post {}.", id);
        }
    }
    Ok(())
}

/// Malformed ids are rejected here, before any store call.
fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("'{}' is not a valid id", raw))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn prompt_new_password() -> Result<String> {
    let pass1 = rpassword::prompt_password("New password: ")?;
    validation::validate_password(&pass1)?;
    let pass2 = rpassword::prompt_password("Confirm password: ")?;
    if pass1 != pass2 {
        bail!("Passwords do not match");
    }
    Ok(pass1)
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.as_deref())
            .and_then(|l| l.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
